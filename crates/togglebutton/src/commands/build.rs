//! `togglebutton build` command implementation.

use std::path::PathBuf;

use clap::Args;
use togglebutton_config::{CliSettings, Config};
use togglebutton_site::BuildReport;

use super::create_app;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    pub(crate) source_dir: Option<PathBuf>,

    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    pub(crate) output_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover togglebutton.toml).
    #[arg(short, long, env = "TOGGLEBUTTON_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    /// Document language used to pick translated hints (overrides config).
    #[arg(short, long)]
    pub(crate) language: Option<String>,

    /// Site name used in page titles (overrides config).
    #[arg(long)]
    pub(crate) site_name: Option<String>,

    /// Fail if any page produced warnings or errors.
    #[arg(long)]
    pub(crate) strict: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            language: self.language,
            site_name: self.site_name,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        config.validate()?;
        tracing::debug!(
            config_path = ?config.config_path,
            language = config.language.as_deref(),
            "Configuration loaded"
        );

        let source_dir = config.docs_resolved.source_dir.clone();
        let output_dir = config.docs_resolved.output_dir.clone();
        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        output.info(&format!("Source: {}", source_dir.display()));
        output.info(&format!("Output: {}", output_dir.display()));

        let builder = create_app(config)?.init()?;
        let report = builder.build(&source_dir, &output_dir)?;

        report_diagnostics(&output, &report);
        if self.strict && !report.diagnostics.is_empty() {
            return Err(CliError::Strict(report.diagnostics.len()));
        }

        output.success(&format!(
            "Built {} page(s) to {}",
            report.pages,
            output_dir.display()
        ));
        Ok(())
    }
}

fn report_diagnostics(output: &Output, report: &BuildReport) {
    for diagnostic in &report.diagnostics {
        output.diagnostic(diagnostic);
    }
    if !report.diagnostics.is_empty() {
        output.warning(&format!(
            "{} error(s), {} warning(s)",
            report.error_count(),
            report.warning_count()
        ));
    }
}
