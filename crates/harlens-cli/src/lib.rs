use clap::ValueEnum;
use harlens_core::dataset::ExportFormat;

pub mod commands;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }

    /// The row export this format asks for, if any.
    pub fn export_format(&self) -> Option<ExportFormat> {
        match self {
            OutputFormat::Pretty => None,
            OutputFormat::Json => Some(ExportFormat::Json),
            OutputFormat::Csv => Some(ExportFormat::Csv),
        }
    }
}
