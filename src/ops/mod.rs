//! High-level operations.
//!
//! This module contains the implementation of modcheck commands.

pub mod discover;
pub mod report;
pub mod validate;

pub use discover::{discover, load_declarations, DiscoveryOptions};
pub use report::{format_module_list, format_report, violation_diagnostic, OutputFormat};
pub use validate::{validate, Exemptions, ValidationReport};
