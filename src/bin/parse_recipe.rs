//! Utility to parse a recipe file (or stdin) and print the result as JSON

use std::io::Read;

use nutrilabel::build_info::BuildInfo;
use nutrilabel::config::Config;
use nutrilabel::tools::recipes;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("--version") {
        println!("{}", BuildInfo::current().summary());
        return Ok(());
    }

    let text = match arg.as_deref() {
        Some("-") | None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)?,
    };

    let config = Config::from_env()?;
    let response = recipes::parse_recipe(&text, &config.input_limits)?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    for pending in &response.pending_specifications {
        eprintln!("Needs specification: {} ({})", pending.original_line, pending.prompt);
    }
    for error in &response.errors {
        eprintln!("Not parsed: {}", error);
    }

    Ok(())
}
