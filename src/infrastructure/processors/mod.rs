// Processors module
pub mod css_processor;

pub use css_processor::*;
