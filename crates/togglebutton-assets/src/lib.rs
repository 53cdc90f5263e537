//! Bundled frontend assets for collapsible toggle blocks.
//!
//! The stylesheet and script are compiled into the binary via `rust-embed`.
//! Page-level settings reach the script through small inline scripts built
//! by the [`inline`] module.

use std::borrow::Cow;

pub mod inline;

/// Stylesheet file name, relative to the static directory.
pub const STYLESHEET: &str = "togglebutton.css";

/// Script file name, relative to the static directory.
pub const SCRIPT: &str = "togglebutton.js";

#[derive(rust_embed::RustEmbed)]
#[folder = "static"]
#[prefix = ""]
struct Assets;

/// Get a bundled asset by path (relative to the static directory).
///
/// Returns the file contents if the asset exists, `None` otherwise.
pub fn get(path: &str) -> Option<Cow<'static, [u8]>> {
    Assets::get(path).map(|f| f.data)
}

/// Iterate all bundled asset paths.
pub fn iter() -> impl Iterator<Item = Cow<'static, str>> {
    Assets::iter()
}
