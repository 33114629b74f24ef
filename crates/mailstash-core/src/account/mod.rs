//! Account management module.
//!
//! Provides account configuration and validation.

mod model;
mod validation;

pub use model::{Account, Security, ServerConfig};
pub use validation::{ValidationError, ValidationResult, validate_account};
pub(crate) use validation::is_valid_email;
