//! Workbook editor server binary
//!
//! Serves the browser grid and the session REST API.

use clap::Parser;
use std::time::Duration;
use workbook_editor::api::{run_api_server, ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "workbook-server")]
#[command(version)]
#[command(about = "Workbook Editor server - edit Excel and CSV files in the browser")]
#[command(long_about = r#"
Workbook Editor server

Serves the grid page at / and one endpoint per editor action:
  - POST   /api/v1/sessions              - Start a session
  - POST   /api/v1/sessions/:id/upload   - Stage a file (multipart 'file')
  - POST   /api/v1/sessions/:id/load     - Load Workbook
  - GET    /api/v1/sessions/:id/grid     - Show a sheet (?sheet=NAME)
  - POST   /api/v1/sessions/:id/edit     - Apply an edit
  - GET    /api/v1/sessions/:id/download - Download the result
  - DELETE /api/v1/sessions/:id          - Discard a session

Example usage:
  workbook-server                           # Start on localhost:8080
  workbook-server --host 0.0.0.0 --port 3000
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "WORKBOOK_EDITOR_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "WORKBOOK_EDITOR_PORT")]
    port: u16,

    /// Maximum upload size in megabytes
    #[arg(
        long,
        default_value = "64",
        env = "WORKBOOK_EDITOR_MAX_UPLOAD_MB",
        value_parser = clap::value_parser!(u32).range(1..=4096)
    )]
    max_upload_mb: u32,

    /// Minutes of inactivity before a session is discarded
    #[arg(
        long,
        default_value = "30",
        env = "WORKBOOK_EDITOR_SESSION_IDLE_MINS",
        value_parser = clap::value_parser!(u64).range(1..=10_080)
    )]
    session_idle_mins: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        max_upload_bytes: ApiConfig::upload_limit_bytes(args.max_upload_mb),
        session_idle_timeout: Duration::from_secs(args.session_idle_mins * 60),
    };

    run_api_server(config).await
}
