//! Nutrilabel
//!
//! An MCP server that turns pasted recipes into nutrition facts labels.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutrilabel::build_info;
use nutrilabel::config::Config;
use nutrilabel::matching::{FdcClient, FoodDatabase};
use nutrilabel::mcp::NutrilabelService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutrilabel=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env()?;
    if config.food_database_configured() {
        eprintln!("Food database: {}", config.fdc_base_url);
    } else {
        eprintln!("Food database: not configured (set NUTRILABEL_FDC_API_KEY to enable search_foods)");
    }

    let database: Arc<dyn FoodDatabase> = Arc::new(FdcClient::from_config(&config)?);

    // Create the nutrilabel service
    let service = NutrilabelService::new(config, database);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
