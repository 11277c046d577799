//! Column layout model for fixed-width survey extracts.
//!
//! A [`ColumnLayout`] is an ordered list of [`FieldDescriptor`]s describing
//! where each variable sits on a record line.

pub mod error;
pub mod field;
pub mod layout;

pub use error::{LayoutError, Result};
pub use field::{FieldDescriptor, FieldType};
pub use layout::ColumnLayout;
