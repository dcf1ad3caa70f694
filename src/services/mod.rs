mod retention_service_impl;

pub use retention_service_impl::RetentionServiceImpl;
