//! The path-assignment filter.
//!
//! `FileSetter` decides which output file each resource belongs to. It
//! renders a filename pattern against the resource's name, namespace, and
//! kind, records the result in the reserved `path` annotation together with
//! a `mode` annotation, and establishes the canonical output ordering that
//! a file-splitting writer relies on. The filter itself never touches the
//! filesystem.

use crate::annotations;
use crate::errors::{Error, Result};
use crate::filters::Filter;
use crate::resource::Resource;

/// Assigns each resource a destination path and file mode.
///
/// Pattern placeholders: `%n` (name), `%s` (namespace, empty when absent),
/// `%k` (kind, case preserved as found in the document). A pattern with no
/// placeholders is legal and maps every resource to the same literal path;
/// the filter does not deduplicate, since collision handling is a writer
/// concern.
///
/// The output sequence is a stable sort of the input by rendered path,
/// ascending byte order, so nodes rendering to equal paths keep their
/// relative input order.
#[derive(Debug, Clone)]
pub struct FileSetter {
    pattern: String,
    mode: u32,
}

impl Default for FileSetter {
    fn default() -> Self {
        Self {
            pattern: annotations::DEFAULT_PATTERN.to_string(),
            mode: annotations::DEFAULT_MODE,
        }
    }
}

impl FileSetter {
    /// Create a `FileSetter` with the default pattern (`%n_%k.yaml`) and
    /// mode (`0600`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `FileSetter` with a custom filename pattern.
    ///
    /// An unrecognized placeholder is an [`Error::Configuration`], reported
    /// here rather than per node.
    pub fn with_pattern(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        validate_pattern(&pattern)?;
        Ok(Self {
            pattern,
            mode: annotations::DEFAULT_MODE,
        })
    }

    /// Override the file mode recorded on each resource.
    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    fn render(&self, resource: &Resource) -> String {
        let mut out = String::with_capacity(self.pattern.len());
        let mut chars = self.pattern.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            // validated at construction
            match chars.next() {
                Some('n') => out.push_str(resource.name()),
                Some('s') => out.push_str(resource.namespace()),
                Some('k') => out.push_str(resource.kind()),
                _ => {}
            }
        }
        out
    }
}

impl Filter for FileSetter {
    fn name(&self) -> &str {
        "FileSetter"
    }

    fn filter(&self, mut resources: Vec<Resource>) -> Result<Vec<Resource>> {
        let mode = self.mode.to_string();
        for resource in &mut resources {
            let path = self.render(resource);
            resource.set_annotation(annotations::PATH, &path);
            resource.set_annotation(annotations::MODE, &mode);
        }
        // Vec::sort_by_key is stable: equal paths keep input order.
        resources.sort_by_key(|r| annotations::path(r).unwrap_or_default());
        Ok(resources)
    }
}

fn validate_pattern(pattern: &str) -> Result<()> {
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        match chars.next() {
            Some('n') | Some('s') | Some('k') => {}
            Some(other) => {
                return Err(Error::configuration(format!(
                    "unrecognized placeholder %{other} in filename pattern {pattern:?}"
                )))
            }
            None => {
                return Err(Error::configuration(format!(
                    "dangling % in filename pattern {pattern:?}"
                )))
            }
        }
    }
    Ok(())
}
