//! Source configuration

pub mod null_handling;
pub mod source_config;

pub use null_handling::*;
pub use source_config::*;
