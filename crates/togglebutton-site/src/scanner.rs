//! Markdown page discovery by filesystem walking.

use std::fs;
use std::path::{Path, PathBuf};

/// A markdown page found under the source directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageSource {
    /// Absolute path of the `.md` file.
    pub source_path: PathBuf,
    /// Path relative to the source directory (e.g. `guide/setup.md`).
    pub relative_path: PathBuf,
}

impl PageSource {
    /// Output path relative to the output directory (e.g. `guide/setup.html`).
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.relative_path.with_extension("html")
    }

    /// Number of directories between the page and the output root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.relative_path.components().count().saturating_sub(1)
    }
}

/// Find markdown pages under `source_dir`, sorted by relative path.
///
/// Entries whose names start with `.` or `_` are skipped, which keeps build
/// output and hidden directories out of the page set. A missing directory
/// yields no pages.
pub fn scan_pages(source_dir: &Path) -> Vec<PageSource> {
    let mut pages = Vec::new();
    scan_directory(source_dir, Path::new(""), &mut pages);
    pages.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    pages
}

fn scan_directory(dir: &Path, relative: &Path, pages: &mut Vec<PageSource>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name();
        let name_str = name.to_string_lossy();
        if name_str.starts_with('.') || name_str.starts_with('_') {
            continue;
        }

        let path = entry.path();
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
        if is_dir {
            scan_directory(&path, &relative.join(&name), pages);
        } else if path.extension().is_some_and(|e| e == "md") {
            pages.push(PageSource {
                source_path: path,
                relative_path: relative.join(&name),
            });
        }
    }
}
