//! Minimal CLI: HAR directory in, OpenAPI document out.
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

/// Generate an OpenAPI spec from recorded HAR files
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// directory containing .har files (searched recursively)
    har_directory: PathBuf,

    /// only process entries whose URL starts with this value, and group them
    /// under it (e.g. 'http://localhost:8080/api/v1')
    #[arg(long)]
    base_url: Option<String>,

    /// omit JSON Schema constraints (minimum, maximum, minItems, ...)
    #[arg(long, default_value_t = false)]
    no_constraints: bool,

    /// serialization format for the document
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Yaml,
    Json,
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        let document = crate::generate_spec(
            &self.har_directory,
            self.base_url.as_deref(),
            !self.no_constraints,
        )
        .with_context(|| {
            format!("failed to build spec from {}", self.har_directory.display())
        })?;

        let rendered = match self.format {
            OutputFormat::Yaml => serde_yaml::to_string(&document)?,
            OutputFormat::Json => serde_json::to_string_pretty(&document)?,
        };

        match &self.out {
            Some(out) => {
                if let Some(parent) = out.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(out, &rendered)
                    .with_context(|| format!("failed to write {}", out.display()))?;
            }
            None => println!("{rendered}"),
        }
        Ok(())
    }
}
