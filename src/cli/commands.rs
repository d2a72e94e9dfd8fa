use crate::api::{run_api_server, ApiConfig};
use crate::codec::{export_workbook, ingest, FileFormat};
use crate::error::EditorResult;
use crate::types::{Table, Workbook};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

fn read_workbook(input: &Path) -> EditorResult<(Workbook, FileFormat)> {
    let format = FileFormat::from_file_name(&input.to_string_lossy())?;
    let bytes = fs::read(input)?;
    Ok((ingest(&bytes, format)?, format))
}

fn print_table_summary(name: &str, table: &Table, preview_rows: usize) {
    println!(
        "   📊 {} - {} columns, {} rows",
        name.bright_blue(),
        table.column_count(),
        table.row_count()
    );
    if table.column_count() > 0 {
        println!("      {}", table.columns().join(" | ").dimmed());
    }
    for row in table.rows().iter().take(preview_rows) {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("      {}", cells.join(" | "));
    }
}

/// Execute the inspect command
pub fn inspect(file: PathBuf, verbose: bool) -> EditorResult<()> {
    println!("{}", "📖 Workbook Editor - Inspect".bold().green());
    println!("   File: {}\n", file.display());

    let (workbook, format) = read_workbook(&file)?;

    println!(
        "   Format: {}, {} sheet(s)\n",
        format.to_string().bright_yellow(),
        workbook.len()
    );
    let preview_rows = if verbose { 5 } else { 0 };
    for (name, table) in workbook.iter() {
        print_table_summary(name, table, preview_rows);
    }
    println!();

    Ok(())
}

/// Execute the convert command (load and re-export, as a download would)
pub fn convert(input: PathBuf, output_dir: PathBuf, verbose: bool) -> EditorResult<PathBuf> {
    println!("{}", "🔁 Workbook Editor - Convert".bold().green());
    println!("   Input:  {}", input.display());

    let (workbook, format) = read_workbook(&input)?;
    if verbose {
        println!("   Found {} sheet(s)", workbook.len());
        for (name, table) in workbook.iter() {
            print_table_summary(name, table, 0);
        }
    }

    let download = export_workbook(&workbook, format)?;
    fs::create_dir_all(&output_dir)?;
    let output = output_dir.join(download.file_name);
    fs::write(&output, &download.bytes)?;

    println!("   Output: {}\n", output.display());
    println!("{}", "✅ Convert Complete!".bold().green());

    Ok(output)
}

/// Execute the serve command
pub fn serve(config: ApiConfig) -> anyhow::Result<()> {
    println!("{}", "🌐 Workbook Editor - Serve".bold().green());
    println!("   Open http://{}:{}/ in a browser\n", config.host, config.port);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_api_server(config))
}
