//! Build information module
//!
//! Contains compile-time constants for build number and timestamp.

use serde::Serialize;

/// Build number, incremented on each recompilation
pub const BUILD_NUMBER: u64 = match option_env!("NUTRILABEL_BUILD_NUMBER") {
    Some(s) => match parse_u64(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("NUTRILABEL_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

/// Crate version, also reported as the MCP server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Shown under the name in the startup banner
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Digits only; anything else yields `None`
const fn parse_u64(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut result: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return None;
        }
        result = result * 10 + (b - b'0') as u64;
        i += 1;
    }
    Some(result)
}

/// Build information structure for serialization
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub description: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
            description: DESCRIPTION,
        }
    }

    /// One-line form shared by the banner, `parse_recipe --version` and the status tool
    pub fn summary(&self) -> String {
        format!("{} {} (build {}, {})", self.name, self.version, self.build_number, self.build_timestamp)
    }

    /// Startup banner lines, framed by rules as wide as the widest line
    pub fn banner_lines(&self) -> Vec<String> {
        let body = [self.summary(), self.description.to_string()];
        let width = body.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
        let rule = "=".repeat(width);

        let mut lines = vec![rule.clone()];
        lines.extend(body.iter().map(|l| format!("  {}", l)));
        lines.push(rule);
        lines
    }
}

/// Print the startup banner to stderr (stdout carries the MCP stream)
pub fn print_startup_banner() {
    for line in BuildInfo::current().banner_lines() {
        eprintln!("{}", line);
    }
}
