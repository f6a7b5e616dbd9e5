pub mod headers;
pub mod proxy_handlers;
