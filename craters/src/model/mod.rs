//! Crater view over a matched candidate, and the field of all craters of one image.

mod crater;
mod field;

pub use crater::Crater;
pub use field::{CraterField, FieldStats};
