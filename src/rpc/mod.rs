//! JSON-RPC interface for dashboard clients

pub mod server;
pub mod types;

pub use server::RpcServer;
pub use types::{RpcError, RpcRequest, RpcResponse};
