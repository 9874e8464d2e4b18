//! MCP server
//!
//! Stdio MCP service exposing the recipe-to-label tools.

pub mod server;

pub use server::NutrilabelService;
