//! Static site builder.
//!
//! Renders every markdown page under a source directory to HTML and copies
//! static assets into `_static/`. Pages are rendered in parallel on the
//! global rayon thread pool.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use togglebutton_renderer::{Diagnostic, DocumentParser, Level};

use crate::app::{AssetManifest, StaticSource};
use crate::scanner::{PageSource, scan_pages};
use crate::template::{PageData, render_page};

/// Name of the static directory inside the output directory.
pub const STATIC_DIR: &str = "_static";

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Source directory does not exist.
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// I/O error on a specific path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// A bundled asset could not be found.
    #[error("Bundled asset missing: {0}")]
    MissingAsset(String),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> BuildError + '_ {
    move |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Outcome of a site build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Pages written.
    pub pages: usize,
    /// Files copied into the static directory.
    pub static_files: usize,
    /// Diagnostics from every page, ordered by page then line.
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    /// Number of error diagnostics.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Number of warning diagnostics.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count()
    }
}

/// Builds a static HTML site from a markdown source directory.
pub struct StaticSiteBuilder {
    parser: DocumentParser,
    assets: AssetManifest,
    site_name: String,
}

impl StaticSiteBuilder {
    /// Create a builder from a configured parser and page assets.
    #[must_use]
    pub fn new(parser: DocumentParser, assets: AssetManifest) -> Self {
        Self {
            parser,
            assets,
            site_name: "Documentation".to_owned(),
        }
    }

    /// Set the site name used in page titles.
    #[must_use]
    pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = site_name.into();
        self
    }

    /// Build the site from `source_dir` into `output_dir`.
    ///
    /// Directive problems are collected as diagnostics and never fail the
    /// build; I/O failures do.
    pub fn build(&self, source_dir: &Path, output_dir: &Path) -> Result<BuildReport, BuildError> {
        if !source_dir.is_dir() {
            return Err(BuildError::SourceNotFound(source_dir.to_path_buf()));
        }

        let pages = scan_pages(source_dir);
        tracing::info!(
            pages = pages.len(),
            source = %source_dir.display(),
            output = %output_dir.display(),
            "Building site"
        );

        fs::create_dir_all(output_dir).map_err(io_error(output_dir))?;

        let results: Vec<Result<Vec<Diagnostic>, BuildError>> = pages
            .par_iter()
            .map(|page| self.build_page(page, output_dir))
            .collect();

        let mut diagnostics = Vec::new();
        for result in results {
            diagnostics.extend(result?);
        }
        for diagnostic in &diagnostics {
            match diagnostic.level {
                Level::Warning => tracing::warn!("{diagnostic}"),
                Level::Error => tracing::error!("{diagnostic}"),
            }
        }

        let static_files = self.copy_static(&output_dir.join(STATIC_DIR))?;

        let report = BuildReport {
            pages: pages.len(),
            static_files,
            diagnostics,
        };
        tracing::info!(
            pages = report.pages,
            static_files = report.static_files,
            errors = report.error_count(),
            warnings = report.warning_count(),
            "Site built"
        );
        Ok(report)
    }

    /// Render one page and write it to the output directory.
    fn build_page(&self, page: &PageSource, output_dir: &Path) -> Result<Vec<Diagnostic>, BuildError> {
        let markdown =
            fs::read_to_string(&page.source_path).map_err(io_error(&page.source_path))?;
        let document = self
            .parser
            .parse_source(&markdown, Some(page.relative_path.as_path()));

        let title = document.title();
        let static_prefix = format!("{}{STATIC_DIR}/", "../".repeat(page.depth()));
        let body = document.to_html();
        let html = render_page(&PageData {
            title: title.as_deref(),
            site_name: &self.site_name,
            html_content: &body,
            static_prefix: &static_prefix,
            stylesheets: &self.assets.stylesheets,
            scripts: &self.assets.scripts,
        });

        let output_path = output_dir.join(page.output_path());
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        fs::write(&output_path, html).map_err(io_error(&output_path))?;
        tracing::debug!(page = %page.relative_path.display(), "Page written");

        Ok(document.diagnostics)
    }

    /// Copy static sources into `static_dir`, returning the file count.
    fn copy_static(&self, static_dir: &Path) -> Result<usize, BuildError> {
        let mut copied = 0;
        for source in &self.assets.static_sources {
            copied += match source {
                StaticSource::Bundled => write_bundled(static_dir)?,
                StaticSource::Directory(dir) => copy_dir(dir, static_dir)?,
            };
        }
        Ok(copied)
    }
}

fn write_bundled(static_dir: &Path) -> Result<usize, BuildError> {
    let mut count = 0;
    for name in togglebutton_assets::iter() {
        let data =
            togglebutton_assets::get(&name).ok_or_else(|| BuildError::MissingAsset(name.to_string()))?;
        let target = static_dir.join(&*name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        fs::write(&target, &*data).map_err(io_error(&target))?;
        count += 1;
    }
    Ok(count)
}

fn copy_dir(source: &Path, target: &Path) -> Result<usize, BuildError> {
    let entries = fs::read_dir(source).map_err(io_error(source))?;
    fs::create_dir_all(target).map_err(io_error(target))?;

    let mut count = 0;
    for entry in entries {
        let entry = entry.map_err(io_error(source))?;
        let path = entry.path();
        let destination = target.join(entry.file_name());
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            count += copy_dir(&path, &destination)?;
        } else {
            fs::copy(&path, &destination).map_err(io_error(&path))?;
            count += 1;
        }
    }
    Ok(count)
}
