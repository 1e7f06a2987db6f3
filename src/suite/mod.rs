//! Test suite artifact - the generated Python unittest program.
//!
//! The suite is held in memory as a template plus a named pattern field and is
//! only serialized to Python source when the interpreter needs a file on disk.
//! Materialization is a scoped resource: the file is removed when the
//! [`SuiteFile`] guard is dropped, on every exit path.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::Result;

/// Fixed relative name of the materialized suite file
pub const SUITE_FILE_NAME: &str = "regex_test.py";

/// Placeholder pattern emitted by the test-suite generator
pub const PLACEHOLDER_PATTERN: &str = "YOUR_REGEX_PATTERN_HERE";

/// Field holding the pattern under test inside the generated program
const PATTERN_FIELD: &str = "self.regex_pattern";

/// In-memory test suite: generated template plus the pattern under test.
#[derive(Debug, Clone)]
pub struct TestSuite {
    template: String,
    pattern: Option<String>,
}

impl TestSuite {
    /// Wrap a generated unittest program.
    ///
    /// The template is taken as-is; malformed generator output is not
    /// validated here and will surface as a failing run later.
    pub fn from_generated(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            pattern: None,
        }
    }

    /// The raw template text, as given to the pattern generator for context.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The current pattern under test, if one has been set.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Set the pattern under test for the next render.
    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = Some(pattern.into());
    }

    /// Serialize to Python source, substituting the pattern assignment line.
    ///
    /// Exactly the first line of the form `self.regex_pattern = r"..."` is
    /// rewritten, preserving indentation. If no such line exists the template
    /// is returned unchanged and a warning is logged; the mismatch shows up
    /// later as a confusing run outcome rather than an error here.
    pub fn render(&self) -> String {
        let Some(pattern) = &self.pattern else {
            return self.template.clone();
        };

        let mut replaced = false;
        let mut lines = Vec::new();
        for line in self.template.lines() {
            if !replaced && is_pattern_assignment(line) {
                replaced = true;
                let indent = &line[..line.len() - line.trim_start().len()];
                lines.push(format!("{indent}{PATTERN_FIELD} = r\"{pattern}\""));
            } else {
                lines.push(line.to_string());
            }
        }

        if !replaced {
            warn!("No pattern assignment line found in suite template, leaving it unchanged");
        }

        let mut rendered = lines.join("\n");
        if self.template.ends_with('\n') {
            rendered.push('\n');
        }
        rendered
    }
}

/// Does this line assign the pattern field a raw string literal?
fn is_pattern_assignment(line: &str) -> bool {
    let trimmed = line.trim_start();
    let Some(rest) = trimmed.strip_prefix(PATTERN_FIELD) else {
        return false;
    };
    let rest = rest.trim_start();
    let Some(rest) = rest.strip_prefix('=') else {
        return false;
    };
    rest.trim_start().starts_with("r\"")
}

/// Scoped on-disk materialization of a [`TestSuite`].
///
/// The file lives for the whole refinement loop and is deleted exactly once,
/// when the guard drops.
#[derive(Debug)]
pub struct SuiteFile {
    path: PathBuf,
}

impl SuiteFile {
    /// Write the suite source under the given directory.
    pub fn materialize(dir: &Path, source: &str) -> Result<Self> {
        let path = dir.join(SUITE_FILE_NAME);
        fs::write(&path, source)?;
        info!("Materialized test suite at {}", path.display());
        Ok(Self { path })
    }

    /// Location of the materialized file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with freshly rendered source.
    pub fn rewrite(&self, source: &str) -> Result<()> {
        fs::write(&self.path, source)?;
        Ok(())
    }
}

impl Drop for SuiteFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Failed to remove suite file {}: {}", self.path.display(), e);
        } else {
            info!("Removed suite file {}", self.path.display());
        }
    }
}
