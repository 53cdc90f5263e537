//! `togglebutton config` command implementation.
//!
//! Lists the configuration values registered by extensions together with
//! their defaults and the effective values after loading.

use std::path::PathBuf;

use clap::Args;
use serde_json::json;
use togglebutton_config::{CliSettings, Config, ConfigValue};
use togglebutton_site::App;

use super::create_app;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the config command.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover togglebutton.toml).
    #[arg(short, long, env = "TOGGLEBUTTON_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    /// Document language (overrides config).
    #[arg(short, long)]
    pub(crate) language: Option<String>,

    /// Print as JSON.
    #[arg(long)]
    pub(crate) json: bool,
}

/// One row of the listing.
#[derive(Debug, PartialEq, Eq)]
struct ValueRow {
    name: String,
    rebuild: String,
    default: ConfigValue,
    value: ConfigValue,
}

impl ConfigArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            language: self.language,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        config.validate()?;
        let app = create_app(config)?;
        let rows = value_rows(&app);

        if self.json {
            output.result(&serde_json::to_string_pretty(&to_json(&app, &rows))?);
            return Ok(());
        }

        for (name, metadata) in app.extensions() {
            output.highlight(&format!("{name} {}", metadata.version));
        }
        for row in &rows {
            output.result(&format!(
                "{:<28} {:<5} {} (default: {})",
                row.name, row.rebuild, row.value, row.default
            ));
        }
        Ok(())
    }
}

fn value_rows(app: &App) -> Vec<ValueRow> {
    app.config_values()
        .iter()
        .map(|decl| ValueRow {
            name: decl.name.clone(),
            rebuild: decl.rebuild.to_string(),
            default: decl.default.clone(),
            value: app
                .config()
                .lookup(&decl.name)
                .unwrap_or_else(|| decl.default.clone()),
        })
        .collect()
}

fn to_json(app: &App, rows: &[ValueRow]) -> serde_json::Value {
    let values: Vec<_> = rows
        .iter()
        .map(|row| {
            json!({
                "name": row.name,
                "rebuild": row.rebuild,
                "default": value_json(&row.default),
                "value": value_json(&row.value),
            })
        })
        .collect();
    let extensions: serde_json::Map<_, _> = app
        .extensions()
        .iter()
        .map(|(name, metadata)| (name.clone(), json!(metadata)))
        .collect();
    json!({ "extensions": extensions, "values": values })
}

fn value_json(value: &ConfigValue) -> serde_json::Value {
    match value {
        ConfigValue::Str(s) => json!(s),
        ConfigValue::Bool(b) => json!(b),
        ConfigValue::None => serde_json::Value::Null,
    }
}
