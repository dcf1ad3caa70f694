pub mod classifier;
pub mod errors;
pub mod models;
pub mod value_objects;

// Re-export commonly used types
pub use classifier::classify;
pub use errors::{ProviderError, RetentionError, ValidationError as DomainValidationError};
pub use models::*;
pub use value_objects::*;
