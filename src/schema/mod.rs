//! Schema inference: header discovery, canonical field resolution and
//! row normalization.

mod fields;
mod header;
mod normalize;

pub use fields::{CanonicalField, ColumnMap, FieldResolver, FieldSpec};
pub use header::{locate_header, HeaderMatch, HEADER_SCAN_ROWS};
pub use normalize::{normalize_rows, CanonicalRow, Table};
