//! Request validation for inbound DTOs.

mod validation;
pub use validation::{FieldRule, Validate};
