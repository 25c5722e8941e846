//! export_schemas - write JSON schemas of the quotation output types
//!
//! Usage: export_schemas [--out-dir <dir>]

use anyhow::{Context, Result};
use boq_quotation::domain::entities::QuotationExportData;
use boq_quotation::domain::value_objects::QuotationResponse;
use clap::Parser;
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "export_schemas")]
#[command(about = "Write JSON schemas for quotation responses and exports")]
struct Cli {
    /// Directory to write the schema files into
    #[arg(long, default_value = "schemas")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;

    let schemas = [
        ("quotation_response.json", schema_for!(QuotationResponse)),
        ("quotation_export.json", schema_for!(QuotationExportData)),
    ];
    for (file, schema) in schemas {
        let path = cli.out_dir.join(file);
        fs::write(&path, serde_json::to_string_pretty(&schema)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}
