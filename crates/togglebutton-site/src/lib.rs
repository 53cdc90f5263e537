//! Build application and static site generation for togglebutton.
//!
//! An [`App`] collects what extensions register during setup. Firing its
//! lifecycle events produces a [`StaticSiteBuilder`] that renders a
//! markdown directory to HTML.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use togglebutton_config::Config;
//! use togglebutton_site::{App, extension};
//!
//! let mut app = App::new(Config::default());
//! app.setup_extension(extension::NAME, extension::setup)?;
//! let builder = app.init()?;
//! let report = builder.build(Path::new("docs"), Path::new("_build/html"))?;
//! println!("{} pages", report.pages);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod app;
mod builder;
pub mod extension;
mod scanner;
mod template;

pub use app::{
    App, AppError, AssetManifest, ConfigValueDecl, Event, ExtensionMetadata, Rebuild, Script,
    SetupFn, StaticSource,
};
pub use builder::{BuildError, BuildReport, STATIC_DIR, StaticSiteBuilder};
pub use scanner::{PageSource, scan_pages};
pub use togglebutton_renderer::{Diagnostic, Level};
