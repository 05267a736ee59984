//! Reserved annotation keys and path conventions.
//!
//! Annotations are the only contract between pipeline stages: a filter
//! records where a resource should live and a writer reads that record
//! back, without either side knowing about the other. The keys below are
//! part of the on-wire format and must match exactly.

use crate::resource::Resource;

/// Relative output-file path computed for a resource.
pub const PATH: &str = "path";

/// POSIX permission bits for the destination file, as a decimal string.
pub const MODE: &str = "mode";

/// Default file mode, `384` decimal = `0600` octal.
pub const DEFAULT_MODE: u32 = 0o600;

/// Default filename pattern for the path-assignment filter.
///
/// Deliberately omits the namespace: same-named resources across namespaces
/// are distinguished only by kind unless the caller opts into a
/// namespace-aware pattern such as `%n_%s_%k.yaml`.
pub const DEFAULT_PATTERN: &str = "%n_%k.yaml";

/// Read the `path` annotation.
pub fn path(resource: &Resource) -> Option<String> {
    resource.annotation(PATH)
}

/// Read the `mode` annotation, parsed back to permission bits.
pub fn mode(resource: &Resource) -> Option<u32> {
    resource.annotation(MODE)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_384_decimal() {
        assert_eq!(DEFAULT_MODE, 384);
    }

    #[test]
    fn test_mode_accessor_parses_decimal_string() {
        let mut r = Resource::parse("kind: ConfigMap\n").unwrap();
        r.set_annotation(MODE, "384");
        assert_eq!(mode(&r), Some(0o600));
    }

    #[test]
    fn test_path_accessor() {
        let mut r = Resource::parse("kind: ConfigMap\n").unwrap();
        assert_eq!(path(&r), None);
        r.set_annotation(PATH, "cm.yaml");
        assert_eq!(path(&r), Some("cm.yaml".to_string()));
    }
}
