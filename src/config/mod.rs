pub mod columns;
pub mod settings;

pub use columns::{ColumnIndex, ColumnMapping};
pub use settings::*;
