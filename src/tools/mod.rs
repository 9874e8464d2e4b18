//! Nutrilabel Tools module
//!
//! Tool implementations behind the MCP server. Each returns a serializable
//! response or a human-readable error message.

pub mod foods;
pub mod nutrition;
pub mod recipes;
pub mod status;
