//! Byte-source helpers for the reader.

pub mod compression;
pub mod lines;
