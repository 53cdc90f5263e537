//! Build application: registries and lifecycle hooks.
//!
//! Extensions register configuration values, directives, assets and hook
//! callbacks on an [`App`]. Hooks receive the application and the loaded
//! [`Config`] as explicit arguments.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use togglebutton_config::{Config, ConfigValue};
use togglebutton_renderer::DocumentParser;
use togglebutton_renderer::directive::ContainerDirective;

use crate::builder::StaticSiteBuilder;

/// What has to be redone when a configuration value changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rebuild {
    /// HTML output only.
    Html,
    /// Parsed documents.
    Env,
    /// Built into the application itself.
    Core,
}

impl fmt::Display for Rebuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Html => "html",
            Self::Env => "env",
            Self::Core => "core",
        })
    }
}

/// A registered configuration value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigValueDecl {
    /// Host-level name, e.g. `togglebutton_hint`.
    pub name: String,
    /// Value used when the configuration file does not set it.
    pub default: ConfigValue,
    /// Rebuild scope.
    pub rebuild: Rebuild,
}

/// Lifecycle events, in the order they fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Event {
    /// Configuration is loaded and validated.
    ConfigInited,
    /// The site builder is about to be created.
    BuilderInited,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ConfigInited => "config-inited",
            Self::BuilderInited => "builder-inited",
        })
    }
}

/// A script included in every page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Script {
    /// File in the static directory.
    File(String),
    /// Inline script body.
    Inline(String),
}

/// Where static files come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StaticSource {
    /// Stylesheet and script bundled with `togglebutton-assets`.
    Bundled,
    /// Files under a directory on disk.
    Directory(PathBuf),
}

/// Page assets collected from extensions, in registration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetManifest {
    /// Stylesheets in the static directory.
    pub stylesheets: Vec<String>,
    /// Scripts, file and inline.
    pub scripts: Vec<Script>,
    /// Sources copied into the static directory.
    pub static_sources: Vec<StaticSource>,
}

/// Extension metadata returned from setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExtensionMetadata {
    /// Extension version.
    pub version: &'static str,
    /// Whether documents may be read in parallel.
    pub parallel_read_safe: bool,
    /// Whether pages may be written in parallel.
    pub parallel_write_safe: bool,
}

/// Extension setup entry point.
pub type SetupFn = fn(&mut App) -> Result<ExtensionMetadata, AppError>;

type Hook = Box<dyn Fn(&mut App, &Config) -> Result<(), AppError>>;

/// Application error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A configuration value was registered twice.
    #[error("config value \"{0}\" is already registered")]
    DuplicateConfigValue(String),
    /// A registered name has no counterpart in the configuration model.
    #[error("config value \"{0}\" is not part of the configuration model")]
    UnknownConfigValue(String),
    /// A hook callback failed.
    #[error("{event} hook failed: {message}")]
    Hook {
        /// Event being emitted.
        event: Event,
        /// Failure description.
        message: String,
    },
}

/// The build application.
///
/// # Example
///
/// ```
/// use togglebutton_config::Config;
/// use togglebutton_site::{App, Event, Script};
///
/// let mut app = App::new(Config::default());
/// app.connect(Event::ConfigInited, |app, config| {
///     let language = config.language.as_deref().unwrap_or("en");
///     app.add_js_file(Script::Inline(format!("let lang = {language:?};")));
///     Ok(())
/// });
/// app.emit(Event::ConfigInited).unwrap();
///
/// assert_eq!(app.assets().scripts, vec![Script::Inline(r#"let lang = "en";"#.to_owned())]);
/// ```
pub struct App {
    config: Arc<Config>,
    config_values: Vec<ConfigValueDecl>,
    parser: DocumentParser,
    assets: AssetManifest,
    hooks: BTreeMap<Event, Vec<Hook>>,
    extensions: Vec<(String, ExtensionMetadata)>,
}

impl App {
    /// Create an application around a loaded configuration.
    ///
    /// The core `language` value is registered up front.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            config_values: vec![ConfigValueDecl {
                name: "language".to_owned(),
                default: ConfigValue::None,
                rebuild: Rebuild::Core,
            }],
            parser: DocumentParser::new(),
            assets: AssetManifest::default(),
            hooks: BTreeMap::new(),
            extensions: Vec::new(),
        }
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Declare a configuration value.
    pub fn add_config_value(
        &mut self,
        name: &str,
        default: ConfigValue,
        rebuild: Rebuild,
    ) -> Result<(), AppError> {
        if self.has_config_value(name) {
            return Err(AppError::DuplicateConfigValue(name.to_owned()));
        }
        if self.config.lookup(name).is_none() {
            return Err(AppError::UnknownConfigValue(name.to_owned()));
        }
        self.config_values.push(ConfigValueDecl {
            name: name.to_owned(),
            default,
            rebuild,
        });
        Ok(())
    }

    /// Whether a configuration value has been declared.
    #[must_use]
    pub fn has_config_value(&self, name: &str) -> bool {
        self.config_values.iter().any(|v| v.name == name)
    }

    /// Declared configuration values, in registration order.
    #[must_use]
    pub fn config_values(&self) -> &[ConfigValueDecl] {
        &self.config_values
    }

    /// Register a container directive.
    ///
    /// Replaces any directive already registered under the same name.
    pub fn add_directive<D: ContainerDirective + 'static>(&mut self, directive: D) {
        if self.parser.directive_names().any(|n| n == directive.name()) {
            tracing::warn!(directive = directive.name(), "Overriding registered directive");
        }
        self.parser = std::mem::take(&mut self.parser).with_container(directive);
    }

    /// Include a stylesheet from the static directory in every page.
    pub fn add_css_file(&mut self, name: &str) {
        self.assets.stylesheets.push(name.to_owned());
    }

    /// Include a script in every page.
    pub fn add_js_file(&mut self, script: Script) {
        self.assets.scripts.push(script);
    }

    /// Copy files from `source` into the static directory.
    pub fn add_static_source(&mut self, source: StaticSource) {
        if !self.assets.static_sources.contains(&source) {
            self.assets.static_sources.push(source);
        }
    }

    /// Register a hook for `event`. Hooks run in registration order.
    pub fn connect<F>(&mut self, event: Event, hook: F)
    where
        F: Fn(&mut App, &Config) -> Result<(), AppError> + 'static,
    {
        self.hooks.entry(event).or_default().push(Box::new(hook));
    }

    /// Run an extension's setup once.
    pub fn setup_extension(&mut self, name: &str, setup: SetupFn) -> Result<(), AppError> {
        if self.extensions.iter().any(|(n, _)| n == name) {
            tracing::debug!(extension = name, "Extension already set up");
            return Ok(());
        }
        let metadata = setup(self)?;
        tracing::debug!(extension = name, version = metadata.version, "Extension set up");
        self.extensions.push((name.to_owned(), metadata));
        Ok(())
    }

    /// Extensions set up so far, with their metadata.
    #[must_use]
    pub fn extensions(&self) -> &[(String, ExtensionMetadata)] {
        &self.extensions
    }

    /// Run every hook registered for `event`.
    ///
    /// Stops at the first failing hook. Hooks registered while the event is
    /// being emitted run on the next emission.
    pub fn emit(&mut self, event: Event) -> Result<(), AppError> {
        let mut hooks = self.hooks.remove(&event).unwrap_or_default();
        tracing::debug!(%event, hooks = hooks.len(), "Emitting event");

        let config = Arc::clone(&self.config);
        let result = hooks.iter().try_for_each(|hook| hook(self, &config));

        if let Some(added) = self.hooks.remove(&event) {
            hooks.extend(added);
        }
        self.hooks.insert(event, hooks);
        result
    }

    /// Collected page assets.
    #[must_use]
    pub fn assets(&self) -> &AssetManifest {
        &self.assets
    }

    /// The document parser with every registered directive.
    #[must_use]
    pub fn parser(&self) -> &DocumentParser {
        &self.parser
    }

    /// Fire the lifecycle events and create the site builder.
    ///
    /// Configured static directories are copied after every source
    /// registered by extensions, so their files take precedence.
    pub fn init(mut self) -> Result<StaticSiteBuilder, AppError> {
        self.emit(Event::ConfigInited)?;
        self.emit(Event::BuilderInited)?;

        let config = Arc::clone(&self.config);
        for dir in &config.docs_resolved.static_dirs {
            self.add_static_source(StaticSource::Directory(dir.clone()));
        }

        let site_name = self.config.docs_resolved.site_name.clone();
        Ok(StaticSiteBuilder::new(self.parser, self.assets).with_site_name(site_name))
    }
}
