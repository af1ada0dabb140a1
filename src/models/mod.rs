pub mod error;
pub mod milestone;
pub mod participant;

pub use error::*;
pub use milestone::*;
pub use participant::*;
