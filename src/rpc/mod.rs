//! Typed access to the library backend RPC service

pub mod classify;
pub mod client;
pub mod messages;
pub mod status;

pub use classify::{classify, is_not_found, requires_reauth, RpcFailure};
pub use client::{HttpLibraryClient, LibraryBackend, RpcResult};
pub use status::Code;
