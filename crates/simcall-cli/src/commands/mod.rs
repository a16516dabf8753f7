//! CLI command implementations.

pub mod common;
pub mod emit;
pub mod inspect;
pub mod version;
