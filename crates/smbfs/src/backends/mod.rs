//! Session backends.
//!
//! Backends implement the [`Client`](crate::session::Client) family of
//! traits for different transports.

pub mod memory;

pub use memory::{MemoryServer, ServerEvent};
