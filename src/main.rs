use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use workbook_editor::api::ApiConfig;
use workbook_editor::cli;

#[derive(Parser)]
#[command(name = "workbook-editor")]
#[command(about = "Edit Excel and CSV workbooks in the browser.")]
#[command(long_about = "Workbook Editor - upload, edit, download

Upload an .xlsx, .xls or .csv file, edit its sheets in a grid and download
the result in the original format (Excel sources come back as .xlsx).

COMMANDS:
  serve    - Start the browser editor
  inspect  - Show the sheets a file loads as
  convert  - Load a file and write it back out as a download would

EXAMPLES:
  workbook-editor serve --port 3000
  workbook-editor inspect budget.xlsx --verbose
  workbook-editor convert data.csv out/")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ServeArgs {
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

#[derive(Subcommand)]
enum Commands {
    /// Start the browser editor
    Serve(ServeArgs),

    /// Show the sheets, columns and row counts a file loads as
    Inspect {
        /// Path to .xlsx, .xls or .csv file
        file: PathBuf,

        /// Preview the first rows of each sheet
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Load a file and write it back out exactly as a download would.

Excel inputs (.xlsx, .xls) are written as updated_workbook.xlsx,
CSV inputs as updated_data.csv, inside the output directory.")]
    /// Load a file and re-export it
    Convert {
        /// Path to .xlsx, .xls or .csv file
        input: PathBuf,

        /// Directory to write the exported file into
        output_dir: PathBuf,

        /// Show verbose conversion steps
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => cli::serve(ApiConfig {
            host: args.host,
            port: args.port,
            max_upload_bytes: ApiConfig::upload_limit_bytes(args.max_upload_mb),
            session_idle_timeout: Duration::from_secs(args.session_idle_mins * 60),
        }),

        Commands::Inspect { file, verbose } => Ok(cli::inspect(file, verbose)?),

        Commands::Convert {
            input,
            output_dir,
            verbose,
        } => {
            cli::convert(input, output_dir, verbose)?;
            Ok(())
        }
    }
}
