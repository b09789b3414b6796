pub mod enums;
pub mod scan;
pub mod stats;

pub use enums::*;
pub use scan::*;
pub use stats::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
