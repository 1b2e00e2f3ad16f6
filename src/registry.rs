//! The column registry: ordered descriptors plus the two lookups that bind
//! a logical column to its storage.
//!
//! - name → column index
//! - column index → slot, i.e. the position of the column's values within
//!   the storage array for its type. A column's slot is the number of
//!   columns of the same type registered before it, so the slots of each
//!   type form a contiguous run starting at 0.
//!
//! Tables and rows each own their registry; deriving a row or column from a
//! table clones it, so later changes to one are never visible in the other.

use crate::column::ColumnInfo;
use crate::error::{FrameError, Result};
use crate::types::ColumnType;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnRegistry {
    info: Vec<ColumnInfo>,
    slots: Vec<usize>,
    name_to_col: HashMap<String, usize>,
}

impl ColumnRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from descriptors, in order.
    ///
    /// # Errors
    /// [`FrameError::ColumnRejected`] naming the first descriptor that
    /// [`add`](Self::add) refused.
    pub fn from_columns(columns: impl IntoIterator<Item = ColumnInfo>) -> Result<Self> {
        let mut registry = Self::new();
        for (index, ci) in columns.into_iter().enumerate() {
            let name = ci.name().to_string();
            registry
                .add(ci)
                .map_err(|reason| FrameError::ColumnRejected {
                    index,
                    name,
                    reason: Box::new(reason),
                })?;
        }
        Ok(registry)
    }

    /// Register a new column after the existing ones.
    ///
    /// # Errors
    /// Fails if the descriptor does not pass [`ColumnInfo::check`] or if the
    /// name is already registered.
    pub fn add(&mut self, ci: ColumnInfo) -> Result<()> {
        ci.check()?;
        if let Some(&first) = self.name_to_col.get(ci.name()) {
            return Err(FrameError::DuplicateName {
                name: ci.name().to_string(),
                first,
                second: self.info.len(),
            });
        }

        let slot = self
            .info
            .iter()
            .filter(|existing| existing.column_type() == ci.column_type())
            .count();

        self.slots.push(slot);
        self.name_to_col.insert(ci.name().to_string(), self.info.len());
        self.info.push(ci);
        Ok(())
    }

    /// The first structural difference between two registries, if any.
    ///
    /// Column count is compared first, then each column's type, then each
    /// name, then each slot.
    #[must_use]
    pub fn first_difference(&self, other: &ColumnRegistry) -> Option<String> {
        if self.info.len() != other.info.len() {
            return Some(format!(
                "differing numbers of columns: {} != {}",
                self.info.len(),
                other.info.len()
            ));
        }
        for (i, (ci, oci)) in self.info.iter().zip(&other.info).enumerate() {
            if ci.column_type() != oci.column_type() {
                return Some(format!(
                    "{} has a different type: {} != {}",
                    self.col_desc(i),
                    ci.column_type(),
                    oci.column_type()
                ));
            }
            if ci.name() != oci.name() {
                return Some(format!(
                    "{} has a different name: {:?} != {:?}",
                    self.col_desc(i),
                    ci.name(),
                    oci.name()
                ));
            }
        }
        for (i, (slot, other_slot)) in self.slots.iter().zip(&other.slots).enumerate() {
            if slot != other_slot {
                return Some(format!(
                    "{} has a different slot: {slot} != {other_slot}",
                    self.col_desc(i)
                ));
            }
        }
        None
    }

    /// True when both registries describe the same layout.
    #[must_use]
    pub fn matches(&self, other: &ColumnRegistry) -> bool {
        self.first_difference(other).is_none()
    }

    /// Human-readable description of column `i`.
    #[must_use]
    pub fn col_desc(&self, i: usize) -> String {
        match self.info.get(i) {
            Some(ci) => format!("column {i} ({:?}: {})", ci.name(), ci.column_type()),
            None => format!("invalid column index: {i}"),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.info.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.info
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.info.iter().map(ColumnInfo::name).collect()
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_col.get(name).copied()
    }

    #[must_use]
    pub fn slot_of(&self, index: usize) -> Option<usize> {
        self.slots.get(index).copied()
    }

    #[must_use]
    pub fn info(&self, index: usize) -> Option<&ColumnInfo> {
        self.info.get(index)
    }

    /// Column index for `name`, or [`FrameError::UnknownColumn`].
    pub(crate) fn require_name(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| FrameError::UnknownColumn(name.to_string()))
    }

    /// `index` itself when in range, or [`FrameError::IndexOutOfRange`].
    pub(crate) fn require_index(&self, index: usize) -> Result<usize> {
        if index < self.info.len() {
            Ok(index)
        } else {
            Err(FrameError::IndexOutOfRange {
                index,
                count: self.info.len(),
            })
        }
    }

    /// Check that column `index` holds `wanted`, returning its slot.
    pub(crate) fn require_type(
        &self,
        index: usize,
        wanted: ColumnType,
        describe: impl FnOnce() -> String,
    ) -> Result<usize> {
        let actual = self.info[index].column_type();
        if actual != wanted {
            return Err(FrameError::WrongColumnType {
                column: describe(),
                actual,
                wanted,
            });
        }
        self.slots
            .get(index)
            .copied()
            .ok_or(FrameError::TypesNotSet)
    }

    // ---- staged construction, used by `Table` while names/types arrive ----

    /// Size the descriptor list to `n` untyped, unnamed columns.
    pub(crate) fn reserve_pending(&mut self, n: usize) {
        self.info = vec![ColumnInfo::pending("", ColumnType::Unknown); n];
        self.slots.clear();
        self.name_to_col.clear();
    }

    /// Rename every column; `names` must already be checked for length and
    /// uniqueness.
    pub(crate) fn rename_all(&mut self, names: &[String]) {
        debug_assert_eq!(names.len(), self.info.len());
        self.name_to_col = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        for (ci, name) in self.info.iter_mut().zip(names) {
            ci.set_name(name.as_str());
        }
    }

    /// Type column `index` and record its slot.
    pub(crate) fn assign_type(&mut self, index: usize, column_type: ColumnType, slot: usize) {
        debug_assert_eq!(index, self.slots.len());
        self.info[index].set_column_type(column_type);
        self.slots.push(slot);
    }

    /// True once every column has been given a type and a slot.
    pub(crate) fn is_typed(&self) -> bool {
        !self.info.is_empty() && self.slots.len() == self.info.len()
    }
}
