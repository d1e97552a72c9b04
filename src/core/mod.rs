// Core domain layer
pub mod models;
pub mod classifier;
pub mod services;
pub mod interfaces;

pub use models::*;
pub use classifier::*;
pub use services::*;
pub use interfaces::*;
