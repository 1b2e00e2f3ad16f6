//! Physical storage shared by tables and rows.
//!
//! A table keeps one array of columns per concrete type; a row keeps one
//! array of cells per concrete type. In both cases a column's position within
//! its type's array is the slot recorded in the
//! [`ColumnRegistry`](crate::registry::ColumnRegistry).

use crate::column::ColumnData;
use crate::value::{BoolVal, FloatVal, IntVal, TextVal};

/// Per-type column arrays for a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnStore {
    pub bools: Vec<Vec<BoolVal>>,
    pub ints: Vec<Vec<IntVal>>,
    pub floats: Vec<Vec<FloatVal>>,
    pub texts: Vec<Vec<TextVal>>,
}

impl ColumnStore {
    /// Same number of (empty) columns per type.
    pub fn empty_like(&self) -> Self {
        Self {
            bools: vec![Vec::new(); self.bools.len()],
            ints: vec![Vec::new(); self.ints.len()],
            floats: vec![Vec::new(); self.floats.len()],
            texts: vec![Vec::new(); self.texts.len()],
        }
    }
}

/// Per-type cell arrays for a single row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowCells {
    pub bools: Vec<BoolVal>,
    pub ints: Vec<IntVal>,
    pub floats: Vec<FloatVal>,
    pub texts: Vec<TextVal>,
}

/// Maps a cell wrapper to its array in each container.
pub trait Lane: Sized {
    fn store_lane(store: &ColumnStore) -> &Vec<Vec<Self>>;
    fn store_lane_mut(store: &mut ColumnStore) -> &mut Vec<Vec<Self>>;
    fn row_lane(cells: &RowCells) -> &Vec<Self>;
    fn row_lane_mut(cells: &mut RowCells) -> &mut Vec<Self>;
    fn wrap_column(values: Vec<Self>) -> ColumnData;
    fn column_slice(data: &ColumnData) -> Option<&[Self]>;
}

macro_rules! lane {
    ($wrapper:ty, $field:ident, $variant:ident) => {
        impl Lane for $wrapper {
            fn store_lane(store: &ColumnStore) -> &Vec<Vec<Self>> {
                &store.$field
            }

            fn store_lane_mut(store: &mut ColumnStore) -> &mut Vec<Vec<Self>> {
                &mut store.$field
            }

            fn row_lane(cells: &RowCells) -> &Vec<Self> {
                &cells.$field
            }

            fn row_lane_mut(cells: &mut RowCells) -> &mut Vec<Self> {
                &mut cells.$field
            }

            fn wrap_column(values: Vec<Self>) -> ColumnData {
                ColumnData::$variant(values)
            }

            fn column_slice(data: &ColumnData) -> Option<&[Self]> {
                match data {
                    ColumnData::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

lane!(BoolVal, bools, Bool);
lane!(IntVal, ints, Int);
lane!(FloatVal, floats, Float);
lane!(TextVal, texts, Text);

/// Run `$body` with `$T` bound to the cell wrapper of a concrete column type,
/// or evaluate `$unknown` for [`ColumnType::Unknown`](crate::types::ColumnType::Unknown).
macro_rules! with_cell_type {
    ($column_type:expr, |$T:ident| $body:expr, unknown => $unknown:expr) => {
        match $column_type {
            $crate::types::ColumnType::Bool => {
                type $T = $crate::value::BoolVal;
                $body
            }
            $crate::types::ColumnType::Int => {
                type $T = $crate::value::IntVal;
                $body
            }
            $crate::types::ColumnType::Float => {
                type $T = $crate::value::FloatVal;
                $body
            }
            $crate::types::ColumnType::Text => {
                type $T = $crate::value::TextVal;
                $body
            }
            $crate::types::ColumnType::Unknown => $unknown,
        }
    };
}

pub(crate) use with_cell_type;
