mod provider_errors;
mod retention_errors;
mod validation_errors;

pub use provider_errors::*;
pub use retention_errors::*;
pub use validation_errors::*;
