//! Authentication Triage common types and errors.
//!
//! This crate provides the foundational vocabulary shared across at-core and
//! at-config:
//! - The closed `Action` enumeration with its wire representations
//! - The risk `Feature` vocabulary shared by state spaces, reward weights,
//!   and the CSV column contract
//! - The unified error type with stable codes and categories
//! - Schema versioning for persisted artifacts

pub mod action;
pub mod error;
pub mod feature;
pub mod schema;

pub use action::Action;
pub use error::{Error, ErrorCategory, Result};
pub use feature::Feature;
pub use schema::SCHEMA_VERSION;
