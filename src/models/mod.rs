//! Core data models for the image proxy.
//!
//! Both entities are request-scoped: a `ProxyRequest` is built per inbound
//! request and a `StoredObject` is produced by the store for one response.

pub mod object;
pub mod request;
