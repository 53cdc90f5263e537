//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod config;

pub(crate) use build::BuildArgs;
pub(crate) use config::ConfigArgs;

use togglebutton_config::Config;
use togglebutton_site::{App, extension};

use crate::error::CliError;

/// Create the build application with the togglebutton extension set up.
pub(crate) fn create_app(config: Config) -> Result<App, CliError> {
    let mut app = App::new(config);
    app.setup_extension(extension::NAME, extension::setup)?;
    Ok(app)
}
