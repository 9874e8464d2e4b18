//! Nutrilabel Library
//!
//! Recipe text parsing, food database matching and nutrition label calculation.

pub mod build_info;
pub mod config;
pub mod error;
pub mod matching;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod parser;
pub mod tools;
