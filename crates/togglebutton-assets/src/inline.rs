//! Inline scripts carrying page settings to `togglebutton.js`.
//!
//! String values are written as JSON string literals, which are valid
//! JavaScript, so quotes and backslashes in configured text cannot end the
//! literal early.

use serde_json::Value;

fn literal(value: &str) -> String {
    Value::from(value).to_string()
}

/// `let toggleHintShow = "...";`
#[must_use]
pub fn hint_show(hint: &str) -> String {
    format!("let toggleHintShow = {};", literal(hint))
}

/// `let toggleHintHide = "...";`
#[must_use]
pub fn hint_hide(hint: &str) -> String {
    format!("let toggleHintHide = {};", literal(hint))
}

/// `let toggleOpenOnPrint = "true";` or `"false"`.
///
/// The flag is emitted as a string; the script compares against `"true"`.
#[must_use]
pub fn open_on_print(open: bool) -> String {
    format!("let toggleOpenOnPrint = {};", literal(&open.to_string()))
}

/// `var togglebuttonSelector = "...";`
#[must_use]
pub fn selector(selector: &str) -> String {
    format!("var togglebuttonSelector = {};", literal(selector))
}
