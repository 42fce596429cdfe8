//! Command implementations.

pub mod build;
pub mod ping;
pub mod serve;
pub mod validate;
