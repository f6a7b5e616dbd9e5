//! Object store abstraction, its backends, and content type inference.

pub mod bucket_store;
pub mod content_type;
pub mod disk_store;
#[cfg(test)]
pub mod memory_store;
pub mod retry;
pub mod store;
