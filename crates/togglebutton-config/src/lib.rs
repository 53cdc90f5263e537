//! Configuration management for togglebutton.
//!
//! Parses `togglebutton.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Path values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `docs.source_dir`
//! - `docs.output_dir`
//! - `docs.static_dirs`

mod expand;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override build output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the document language.
    pub language: Option<String>,
    /// Override the site name.
    pub site_name: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "togglebutton.toml";

/// Default CSS selector for elements that receive a toggle button.
pub const DEFAULT_SELECTOR: &str = ".toggle, .admonition.dropdown";
/// Default hint shown next to a collapsed toggle.
pub const DEFAULT_HINT: &str = "Click to show";
/// Default hint shown next to an expanded toggle.
pub const DEFAULT_HINT_HIDE: &str = "Click to hide";

/// Translated strings keyed by language code.
pub type LanguageMap = BTreeMap<String, LanguageStrings>;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document language (e.g. `"fr"`), used to pick translated hints.
    pub language: Option<String>,
    /// Documentation paths as written in TOML.
    docs: DocsConfigRaw,
    /// Toggle button settings.
    pub togglebutton: ToggleConfig,
    /// Translated toggle strings, keyed by language.
    pub language_map: Option<LanguageMap>,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Toggle button settings consumed by the extension hooks.
///
/// This is the value object handed to lifecycle callbacks; nothing reads it
/// from global state.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToggleConfig {
    /// CSS selector the client script attaches toggle buttons to.
    pub selector: String,
    /// Hint text for collapsed blocks.
    pub hint: String,
    /// Hint text for expanded blocks.
    pub hint_hide: String,
    /// Whether toggles are expanded when the page is printed.
    pub open_on_print: bool,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            selector: DEFAULT_SELECTOR.to_owned(),
            hint: DEFAULT_HINT.to_owned(),
            hint_hide: DEFAULT_HINT_HIDE.to_owned(),
            open_on_print: true,
        }
    }
}

impl ToggleConfig {
    /// Apply translated strings for `language` from `language_map`.
    ///
    /// Only keys present in the language entry override the current values.
    /// A missing language, a missing map, or an entry without toggle keys
    /// leaves the settings untouched.
    pub fn localize(&mut self, language: Option<&str>, language_map: Option<&LanguageMap>) {
        let (Some(language), Some(map)) = (language, language_map) else {
            return;
        };
        let Some(strings) = map.get(language) else {
            return;
        };

        if let Some(hint) = &strings.hint {
            self.hint.clone_from(hint);
        }
        if let Some(hint_hide) = &strings.hint_hide {
            self.hint_hide.clone_from(hint_hide);
        }
        if let Some(open_on_print) = strings.open_on_print {
            self.open_on_print = open_on_print;
        }
    }
}

/// Translated toggle strings for one language.
///
/// Keys follow the names used in language maps shared with other extensions,
/// so unrelated keys in the same table are ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct LanguageStrings {
    /// Replacement for [`ToggleConfig::hint`].
    #[serde(rename = "togglebutton_hint")]
    pub hint: Option<String>,
    /// Replacement for [`ToggleConfig::hint_hide`].
    #[serde(rename = "togglebutton_hint_hide")]
    pub hint_hide: Option<String>,
    /// Replacement for [`ToggleConfig::open_on_print`].
    #[serde(rename = "togglebutton_open_on_print")]
    pub open_on_print: Option<bool>,
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    site_name: Option<String>,
    static_dirs: Vec<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
    /// Directory the HTML site is written to.
    pub output_dir: PathBuf,
    /// Site name used in page titles.
    pub site_name: String,
    /// Extra directories copied into the site's static directory, in order.
    pub static_dirs: Vec<PathBuf>,
}

/// A single named configuration value, as exposed to the build host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigValue {
    /// A string value.
    Str(String),
    /// A boolean value.
    Bool(bool),
    /// Unset.
    None,
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::None => f.write_str("None"),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`docs.source_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `togglebutton.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration from a TOML string, resolving paths against `base`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    /// Toggle settings with translations for the configured language applied.
    #[must_use]
    pub fn localized_toggle(&self) -> ToggleConfig {
        let mut toggle = self.togglebutton.clone();
        toggle.localize(self.language.as_deref(), self.language_map.as_ref());
        toggle
    }

    /// Look up a configuration value by its host-level name.
    ///
    /// Returns `None` for names this configuration does not know about.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ConfigValue> {
        let value = match name {
            "language" => self
                .language
                .clone()
                .map_or(ConfigValue::None, ConfigValue::Str),
            "togglebutton_selector" => ConfigValue::Str(self.togglebutton.selector.clone()),
            "togglebutton_hint" => ConfigValue::Str(self.togglebutton.hint.clone()),
            "togglebutton_hint_hide" => ConfigValue::Str(self.togglebutton.hint_hide.clone()),
            "togglebutton_open_on_print" => ConfigValue::Bool(self.togglebutton.open_on_print),
            "language_map" => match &self.language_map {
                Some(map) => ConfigValue::Str(
                    map.keys().map(String::as_str).collect::<Vec<_>>().join(", "),
                ),
                None => ConfigValue::None,
            },
            _ => return None,
        };
        Some(value)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(language) = &settings.language {
            self.language = Some(language.clone());
        }
        if let Some(site_name) = &settings.site_name {
            self.docs_resolved.site_name.clone_from(site_name);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            language: None,
            docs: DocsConfigRaw::default(),
            togglebutton: ToggleConfig::default(),
            language_map: None,
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                output_dir: base.join("_build/html"),
                site_name: "Documentation".to_owned(),
                static_dirs: Vec::new(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.togglebutton.selector, "togglebutton.selector")?;
        require_non_empty(&self.togglebutton.hint, "togglebutton.hint")?;
        require_non_empty(&self.togglebutton.hint_hide, "togglebutton.hint_hide")?;
        if let Some(language) = &self.language {
            require_non_empty(language, "language")?;
        }
        for (language, strings) in self.language_map.iter().flatten() {
            if let Some(hint) = &strings.hint {
                require_non_empty(hint, &format!("language_map.{language}.togglebutton_hint"))?;
            }
            if let Some(hint_hide) = &strings.hint_hide {
                require_non_empty(
                    hint_hide,
                    &format!("language_map.{language}.togglebutton_hint_hide"),
                )?;
            }
        }
        Ok(())
    }

    /// Expand environment variable references in path strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.docs.source_dir {
            self.docs.source_dir = Some(expand::expand_env(dir, "docs.source_dir")?);
        }
        if let Some(ref dir) = self.docs.output_dir {
            self.docs.output_dir = Some(expand::expand_env(dir, "docs.output_dir")?);
        }
        for dir in &mut self.docs.static_dirs {
            *dir = expand::expand_env(dir, "docs.static_dirs")?;
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(self.docs.output_dir.as_deref(), "_build/html"),
            site_name: self
                .docs
                .site_name
                .clone()
                .unwrap_or_else(|| "Documentation".to_owned()),
            static_dirs: self
                .docs
                .static_dirs
                .iter()
                .map(|dir| config_dir.join(dir))
                .collect(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(
            config.docs_resolved.output_dir,
            PathBuf::from("/test/_build/html")
        );
        assert_eq!(config.docs_resolved.site_name, "Documentation");
        assert_eq!(config.togglebutton, ToggleConfig::default());
        assert!(config.language.is_none());
        assert!(config.language_map.is_none());
    }

    #[test]
    fn test_toggle_defaults() {
        let toggle = ToggleConfig::default();
        assert_eq!(toggle.selector, ".toggle, .admonition.dropdown");
        assert_eq!(toggle.hint, "Click to show");
        assert_eq!(toggle.hint_hide, "Click to hide");
        assert!(toggle.open_on_print);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.togglebutton, ToggleConfig::default());
    }

    #[test]
    fn test_parse_togglebutton_section() {
        let toml = r#"
[togglebutton]
selector = ".toggle"
hint = "Expand"
open_on_print = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.togglebutton.selector, ".toggle");
        assert_eq!(config.togglebutton.hint, "Expand");
        assert_eq!(config.togglebutton.hint_hide, "Click to hide");
        assert!(!config.togglebutton.open_on_print);
    }

    #[test]
    fn test_parse_language_map() {
        let toml = r#"
language = "fr"

[language_map.fr]
togglebutton_hint = "Cliquer pour afficher"
togglebutton_hint_hide = "Cliquer pour masquer"
togglebutton_open_on_print = false
copybutton_message = "Copié"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let map = config.language_map.as_ref().unwrap();
        assert_eq!(
            map["fr"],
            LanguageStrings {
                hint: Some("Cliquer pour afficher".to_owned()),
                hint_hide: Some("Cliquer pour masquer".to_owned()),
                open_on_print: Some(false),
            }
        );
    }

    #[test]
    fn test_localized_toggle_applies_translation() {
        let toml = r#"
language = "fr"

[language_map.fr]
togglebutton_hint = "Cliquer pour afficher"
togglebutton_open_on_print = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let toggle = config.localized_toggle();

        assert_eq!(toggle.hint, "Cliquer pour afficher");
        // Keys absent from the translation keep their configured value
        assert_eq!(toggle.hint_hide, "Click to hide");
        assert!(!toggle.open_on_print);
        // The stored settings are not modified
        assert_eq!(config.togglebutton.hint, "Click to show");
    }

    #[test]
    fn test_localize_without_language_is_noop() {
        let mut map = LanguageMap::new();
        map.insert(
            "de".to_owned(),
            LanguageStrings {
                hint: Some("Anzeigen".to_owned()),
                ..LanguageStrings::default()
            },
        );

        let mut toggle = ToggleConfig::default();
        toggle.localize(None, Some(&map));
        assert_eq!(toggle, ToggleConfig::default());
    }

    #[test]
    fn test_localize_missing_language_is_noop() {
        let mut map = LanguageMap::new();
        map.insert(
            "de".to_owned(),
            LanguageStrings {
                hint: Some("Anzeigen".to_owned()),
                ..LanguageStrings::default()
            },
        );

        let mut toggle = ToggleConfig::default();
        toggle.localize(Some("fr"), Some(&map));
        assert_eq!(toggle, ToggleConfig::default());
    }

    #[test]
    fn test_localize_entry_without_toggle_keys_is_noop() {
        let mut map = LanguageMap::new();
        map.insert("fr".to_owned(), LanguageStrings::default());

        let mut toggle = ToggleConfig::default();
        toggle.localize(Some("fr"), Some(&map));
        assert_eq!(toggle, ToggleConfig::default());
    }

    #[test]
    fn test_localize_without_map_is_noop() {
        let mut toggle = ToggleConfig::default();
        toggle.localize(Some("fr"), None);
        assert_eq!(toggle, ToggleConfig::default());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
source_dir = "manual"
output_dir = "public"
site_name = "Handbook"
"#;
        let config = Config::from_toml_str(toml, Path::new("/project")).unwrap();

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/manual")
        );
        assert_eq!(
            config.docs_resolved.output_dir,
            PathBuf::from("/project/public")
        );
        assert_eq!(config.docs_resolved.site_name, "Handbook");
        assert!(config.docs_resolved.static_dirs.is_empty());
    }

    #[test]
    fn test_resolve_static_dirs() {
        let toml = r#"
[docs]
static_dirs = ["assets", "/shared/static"]
"#;
        let config = Config::from_toml_str(toml, Path::new("/project")).unwrap();

        assert_eq!(
            config.docs_resolved.static_dirs,
            vec![
                PathBuf::from("/project/assets"),
                PathBuf::from("/shared/static")
            ]
        );
    }

    #[test]
    fn test_expand_env_vars_source_dir() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TOGGLE_CFG_SOURCE", "content");
        }

        let toml = r#"
[docs]
source_dir = "${TOGGLE_CFG_SOURCE}/docs"
"#;
        let config = Config::from_toml_str(toml, Path::new("/project")).unwrap();
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/content/docs")
        );

        unsafe {
            std::env::remove_var("TOGGLE_CFG_SOURCE");
        }
    }

    #[test]
    fn test_validate_empty_selector() {
        let toml = r#"
[togglebutton]
selector = "  "
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("togglebutton.selector"));
    }

    #[test]
    fn test_validate_empty_hint() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.togglebutton.hint = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("togglebutton.hint"));
    }

    #[test]
    fn test_validate_empty_translated_hint() {
        let toml = r#"
[language_map.fr]
togglebutton_hint = ""
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("language_map.fr.togglebutton_hint"));
    }

    #[test]
    fn test_validate_empty_translated_hint_hide() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.language_map = Some(LanguageMap::from([(
            "de".to_owned(),
            LanguageStrings {
                hint_hide: Some(" ".to_owned()),
                ..LanguageStrings::default()
            },
        )]));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("language_map.de.togglebutton_hint_hide"));
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            output_dir: Some(PathBuf::from("/tmp/site")),
            language: Some("fr".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/tmp/site"));
        assert_eq!(config.language.as_deref(), Some("fr"));
        // Unchanged
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.docs_resolved.site_name, "Documentation");
        assert!(config.language.is_none());
    }

    #[test]
    fn test_lookup() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(
            config.lookup("togglebutton_hint"),
            Some(ConfigValue::Str("Click to show".to_owned()))
        );
        assert_eq!(
            config.lookup("togglebutton_open_on_print"),
            Some(ConfigValue::Bool(true))
        );
        assert_eq!(config.lookup("language_map"), Some(ConfigValue::None));
        assert_eq!(config.lookup("unknown_key"), None);
    }

    #[test]
    fn test_load_explicit_path_not_found() {
        let err = Config::load(Some(Path::new("/nonexistent/togglebutton.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("togglebutton.toml");
        std::fs::write(&path, "[togglebutton]\nhint = \"Open\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.togglebutton.hint, "Open");
        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.docs_resolved.source_dir, dir.path().join("docs"));
    }

    #[test]
    fn test_config_value_display() {
        assert_eq!(ConfigValue::Str("a".to_owned()).to_string(), "\"a\"");
        assert_eq!(ConfigValue::Bool(false).to_string(), "false");
        assert_eq!(ConfigValue::None.to_string(), "None");
    }
}
