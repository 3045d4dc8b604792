//! Command implementations

pub mod completions;
pub mod modules;
pub mod validate;
