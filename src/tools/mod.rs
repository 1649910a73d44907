//! Tools module - Tool implementations for the assistant
//!
//! Contains the calendar tools and the tool registry.

pub mod calendar;
pub mod registry;

pub use registry::ToolRegistry;
