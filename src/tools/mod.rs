//! Tools module - browser tools exposed to the act model

pub mod registry;

pub use registry::ToolRegistry;
