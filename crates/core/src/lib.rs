pub mod config;
pub mod error;
pub mod field;
pub mod types;

pub use config::{QcSettings, load_submission};
pub use error::{Error, Result};
pub use field::{FieldPath, Section};
pub use types::*;
