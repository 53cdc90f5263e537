//! The togglebutton extension.
//!
//! Registers the `toggle` directive, its configuration values, the bundled
//! stylesheet and script, and the inline scripts that pass settings to the
//! script.

use togglebutton_assets::{SCRIPT, STYLESHEET, inline};
use togglebutton_config::{Config, ConfigValue, DEFAULT_HINT, DEFAULT_HINT_HIDE, DEFAULT_SELECTOR};
use togglebutton_renderer::ToggleDirective;

use crate::app::{App, AppError, Event, ExtensionMetadata, Rebuild, Script, StaticSource};

/// Extension name.
pub const NAME: &str = "togglebutton";

/// Extension version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Set up the extension on `app`.
///
/// # Example
///
/// ```
/// use togglebutton_config::Config;
/// use togglebutton_site::{App, extension};
///
/// let mut app = App::new(Config::default());
/// let metadata = extension::setup(&mut app).unwrap();
///
/// assert!(metadata.parallel_read_safe);
/// assert!(app.has_config_value("togglebutton_selector"));
/// ```
pub fn setup(app: &mut App) -> Result<ExtensionMetadata, AppError> {
    app.connect(Event::BuilderInited, add_static_path);
    app.add_css_file(STYLESHEET);

    app.add_config_value(
        "togglebutton_selector",
        ConfigValue::Str(DEFAULT_SELECTOR.to_owned()),
        Rebuild::Html,
    )?;
    if !app.has_config_value("language_map") {
        app.add_config_value("language_map", ConfigValue::None, Rebuild::Env)?;
    }
    app.add_config_value(
        "togglebutton_hint",
        ConfigValue::Str(DEFAULT_HINT.to_owned()),
        Rebuild::Html,
    )?;
    app.add_config_value(
        "togglebutton_hint_hide",
        ConfigValue::Str(DEFAULT_HINT_HIDE.to_owned()),
        Rebuild::Html,
    )?;
    app.add_config_value(
        "togglebutton_open_on_print",
        ConfigValue::Bool(true),
        Rebuild::Html,
    )?;

    app.connect(Event::BuilderInited, insert_selector);
    app.connect(Event::ConfigInited, initialize_js_assets);
    app.add_directive(ToggleDirective);

    Ok(ExtensionMetadata {
        version: VERSION,
        parallel_read_safe: true,
        parallel_write_safe: true,
    })
}

fn add_static_path(app: &mut App, _config: &Config) -> Result<(), AppError> {
    app.add_static_source(StaticSource::Bundled);
    Ok(())
}

/// Page globals for the hint labels and print behavior, then the script.
fn initialize_js_assets(app: &mut App, config: &Config) -> Result<(), AppError> {
    let toggle = config.localized_toggle();
    tracing::debug!(
        language = config.language.as_deref(),
        hint = %toggle.hint,
        "Toggle hints resolved"
    );

    app.add_js_file(Script::Inline(inline::hint_show(&toggle.hint)));
    app.add_js_file(Script::Inline(inline::hint_hide(&toggle.hint_hide)));
    app.add_js_file(Script::Inline(inline::open_on_print(toggle.open_on_print)));
    app.add_js_file(Script::File(SCRIPT.to_owned()));
    Ok(())
}

fn insert_selector(app: &mut App, config: &Config) -> Result<(), AppError> {
    app.add_js_file(Script::Inline(inline::selector(&config.togglebutton.selector)));
    Ok(())
}
