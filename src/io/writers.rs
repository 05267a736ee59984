//! Writers serialize resource sequences to one or more destinations.

use std::io::Write as IoWrite;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::annotations;
use crate::errors::{Error, Result};
use crate::resource::Resource;

/// The document-boundary marker emitted between consecutive documents
/// written to the same destination.
const DOCUMENT_SEPARATOR: &str = "---\n";

/// Consumes an ordered resource sequence and serializes it.
pub trait Writer {
    fn write(&mut self, resources: &[Resource]) -> Result<()>;
}

/// Writes the whole sequence to a single byte stream, in sequence order,
/// with the `---` marker between consecutive documents. Annotations are
/// written as-is.
pub struct ByteWriter<W: IoWrite> {
    sink: W,
}

impl<W: IoWrite> ByteWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }
}

impl<W: IoWrite> Writer for ByteWriter<W> {
    fn write(&mut self, resources: &[Resource]) -> Result<()> {
        for (i, resource) in resources.iter().enumerate() {
            if i > 0 {
                self.sink
                    .write_all(DOCUMENT_SEPARATOR.as_bytes())
                    .map_err(|e| Error::write("byte stream", e.into()))?;
            }
            let doc = resource.to_yaml_string()?;
            self.sink
                .write_all(doc.as_bytes())
                .map_err(|e| Error::write("byte stream", e.into()))?;
        }
        self.sink
            .flush()
            .map_err(|e| Error::write("byte stream", e.into()))
    }
}

/// Cloneable in-memory destination for capturing writer output.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bytes written so far, as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock().expect("mutex poisoned")).into_owned()
    }
}

impl IoWrite for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// What a file-splitting writer does when several resources render to the
/// same destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathCollision {
    /// Write all colliding resources into one multi-document file, in
    /// sequence order, separated by the boundary marker.
    #[default]
    Merge,
    /// Fail on the first duplicate path.
    Error,
}

/// Splits a sequence across files under a package root.
///
/// Resources are grouped by their `path` annotation; groups are written in
/// first-appearance order and nodes within a group keep sequence order.
/// Resources lacking a `path` annotation fall back to a configurable
/// default file. The `mode` annotation, when present, is applied as POSIX
/// permission bits on the destination (unix only); when several resources
/// merge into one file, the first resource's mode wins and later modes in
/// the group are ignored.
///
/// Both reserved annotations are stripped before serializing: they are
/// pipeline-internal metadata, not part of the package on disk.
pub struct LocalPackageWriter {
    root: PathBuf,
    default_path: String,
    on_collision: PathCollision,
    keep_reserved_annotations: bool,
}

impl LocalPackageWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            default_path: "resources.yaml".to_string(),
            on_collision: PathCollision::default(),
            keep_reserved_annotations: false,
        }
    }

    /// Destination file for resources without a `path` annotation.
    pub fn default_path(mut self, path: impl Into<String>) -> Self {
        self.default_path = path.into();
        self
    }

    /// Collision policy for duplicate destination paths.
    pub fn on_collision(mut self, policy: PathCollision) -> Self {
        self.on_collision = policy;
        self
    }

    /// Keep the reserved `path`/`mode` annotations in the written files.
    pub fn keep_reserved_annotations(mut self) -> Self {
        self.keep_reserved_annotations = true;
        self
    }

    fn destination(&self, relative: &str) -> Result<PathBuf> {
        let rel = Path::new(relative);
        let escapes = rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, Component::ParentDir));
        if escapes {
            return Err(Error::write(
                relative,
                Error::configuration("path annotation must stay inside the package root"),
            ));
        }
        Ok(self.root.join(rel))
    }
}

impl Writer for LocalPackageWriter {
    fn write(&mut self, resources: &[Resource]) -> Result<()> {
        // group by path annotation, first-appearance order
        let mut groups: Vec<(String, Vec<Resource>)> = Vec::new();
        for resource in resources {
            let path = annotations::path(resource).unwrap_or_else(|| self.default_path.clone());
            match groups.iter_mut().find(|(p, _)| *p == path) {
                Some((_, group)) => group.push(resource.clone()),
                None => groups.push((path, vec![resource.clone()])),
            }
        }

        for (path, group) in groups {
            if self.on_collision == PathCollision::Error && group.len() > 1 {
                return Err(Error::write(
                    &path,
                    Error::configuration(format!(
                        "{} resources assigned to the same path",
                        group.len()
                    )),
                ));
            }
            let mode = annotations::mode(&group[0]);
            let destination = self.destination(&path)?;
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent).map_err(|e| Error::write(&path, e.into()))?;
            }

            let mut out = String::new();
            for (i, resource) in group.into_iter().enumerate() {
                if i > 0 {
                    out.push_str(DOCUMENT_SEPARATOR);
                }
                let mut resource = resource;
                if !self.keep_reserved_annotations {
                    resource.remove_annotation(annotations::PATH);
                    resource.remove_annotation(annotations::MODE);
                }
                out.push_str(&resource.to_yaml_string()?);
            }
            std::fs::write(&destination, out).map_err(|e| Error::write(&path, e.into()))?;
            log::debug!("wrote {}", destination.display());

            #[cfg(unix)]
            if let Some(mode) = mode {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&destination, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| Error::write(&path, e.into()))?;
            }
            #[cfg(not(unix))]
            let _ = mode;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resource(yaml: &str) -> Resource {
        Resource::parse(yaml).unwrap()
    }

    #[test]
    fn test_byte_writer_separates_documents() {
        let buffer = SharedBuffer::new();
        let mut writer = ByteWriter::new(buffer.clone());
        writer
            .write(&[resource("kind: A\n"), resource("kind: B\n")])
            .unwrap();
        assert_eq!(buffer.contents(), "kind: A\n---\nkind: B\n");
    }

    #[test]
    fn test_byte_writer_empty_sequence() {
        let buffer = SharedBuffer::new();
        ByteWriter::new(buffer.clone()).write(&[]).unwrap();
        assert_eq!(buffer.contents(), "");
    }

    #[test]
    fn test_package_writer_splits_by_path_annotation() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = resource("kind: A\nmetadata:\n  name: a\n");
        a.set_annotation(annotations::PATH, "a.yaml");
        let mut b = resource("kind: B\nmetadata:\n  name: b\n");
        b.set_annotation(annotations::PATH, "sub/b.yaml");

        LocalPackageWriter::new(dir.path()).write(&[a, b]).unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.yaml")).unwrap(),
            "kind: A\nmetadata:\n  name: a\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("sub/b.yaml")).unwrap(),
            "kind: B\nmetadata:\n  name: b\n"
        );
    }

    #[test]
    fn test_package_writer_merges_same_path_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut nodes = Vec::new();
        for kind in ["A", "B"] {
            let mut r = resource(&format!("kind: {kind}\n"));
            r.set_annotation(annotations::PATH, "all.yaml");
            nodes.push(r);
        }
        LocalPackageWriter::new(dir.path()).write(&nodes).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("all.yaml")).unwrap(),
            "kind: A\n---\nkind: B\n"
        );
    }

    #[test]
    fn test_package_writer_collision_error_policy() {
        let dir = tempfile::tempdir().unwrap();
        let mut nodes = Vec::new();
        for kind in ["A", "B"] {
            let mut r = resource(&format!("kind: {kind}\n"));
            r.set_annotation(annotations::PATH, "all.yaml");
            nodes.push(r);
        }
        let err = LocalPackageWriter::new(dir.path())
            .on_collision(PathCollision::Error)
            .write(&nodes)
            .unwrap_err();
        assert!(err.to_string().contains("all.yaml"));
    }

    #[test]
    fn test_package_writer_default_destination() {
        let dir = tempfile::tempdir().unwrap();
        LocalPackageWriter::new(dir.path())
            .default_path("fallback.yaml")
            .write(&[resource("kind: A\n")])
            .unwrap();
        assert!(dir.path().join("fallback.yaml").exists());
    }

    #[test]
    fn test_package_writer_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = resource("kind: A\n");
        r.set_annotation(annotations::PATH, "../escape.yaml");
        assert!(LocalPackageWriter::new(dir.path()).write(&[r]).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_package_writer_applies_mode_bits() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let mut r = resource("kind: A\n");
        r.set_annotation(annotations::PATH, "a.yaml");
        r.set_annotation(annotations::MODE, "384");
        LocalPackageWriter::new(dir.path()).write(&[r]).unwrap();
        let mode = std::fs::metadata(dir.path().join("a.yaml"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_package_writer_merge_takes_first_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let mut nodes = Vec::new();
        for (kind, mode) in [("A", "384"), ("B", "420")] {
            let mut r = resource(&format!("kind: {kind}\n"));
            r.set_annotation(annotations::PATH, "all.yaml");
            r.set_annotation(annotations::MODE, mode);
            nodes.push(r);
        }
        LocalPackageWriter::new(dir.path()).write(&nodes).unwrap();
        let mode = std::fs::metadata(dir.path().join("all.yaml"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_package_writer_keep_reserved_annotations() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = resource("kind: A\n");
        r.set_annotation(annotations::PATH, "a.yaml");
        LocalPackageWriter::new(dir.path())
            .keep_reserved_annotations()
            .write(&[r])
            .unwrap();
        let content = std::fs::read_to_string(dir.path().join("a.yaml")).unwrap();
        assert!(content.contains("path: a.yaml"));
    }
}
