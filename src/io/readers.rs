//! Readers produce ordered resource sequences.

use std::io::Read;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::annotations;
use crate::errors::{Error, Result};
use crate::pkgfile;
use crate::resource::Resource;

/// Produces an ordered sequence of resource nodes.
///
/// Reading is a single pass; a reader is not required to support reading
/// the same stream twice.
pub trait Reader {
    fn read(&mut self) -> Result<Vec<Resource>>;
}

/// Reads a multi-document YAML stream from any [`std::io::Read`].
///
/// Documents are emitted in stream order. An empty stream yields an empty
/// sequence, not an error.
pub struct ByteReader<R: Read> {
    input: R,
}

impl<R: Read> ByteReader<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: Read> Reader for ByteReader<R> {
    fn read(&mut self) -> Result<Vec<Resource>> {
        let mut buf = String::new();
        self.input.read_to_string(&mut buf)?;
        Resource::parse_all(&buf)
    }
}

/// Reads every YAML file under a package directory.
///
/// Files are visited in sorted path order so the emitted sequence is
/// deterministic. The reserved package manifest and anything under `.git`
/// are skipped. Each node is annotated with the package-relative path of
/// the file it came from, so a [`LocalPackageWriter`](crate::io::writers::LocalPackageWriter)
/// can round-trip the package layout.
pub struct LocalPackageReader {
    path: PathBuf,
}

impl LocalPackageReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Reader for LocalPackageReader {
    fn read(&mut self) -> Result<Vec<Resource>> {
        let mut resources = Vec::new();
        let walker = WalkDir::new(&self.path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git");
        for entry in walker {
            let entry = entry.map_err(|e| Error::package(&self.path, e.to_string()))?;
            if !entry.file_type().is_file() || !is_yaml_file(entry.path()) {
                continue;
            }
            if entry.file_name() == pkgfile::FILENAME {
                continue;
            }
            let content = std::fs::read_to_string(entry.path())?;
            let mut nodes = Resource::parse_all(&content)
                .map_err(|e| Error::package(entry.path(), e.to_string()))?;
            let relative = entry
                .path()
                .strip_prefix(&self.path)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .into_owned();
            log::debug!("read {} resources from {relative}", nodes.len());
            for node in &mut nodes {
                node.set_annotation(annotations::PATH, &relative);
            }
            resources.append(&mut nodes);
        }
        Ok(resources)
    }
}

fn is_yaml_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_reader_preserves_stream_order() {
        let stream = "kind: B\n---\nkind: A\n";
        let mut reader = ByteReader::new(stream.as_bytes());
        let nodes = reader.read().unwrap();
        let kinds: Vec<&str> = nodes.iter().map(Resource::kind).collect();
        assert_eq!(kinds, vec!["B", "A"]);
    }

    #[test]
    fn test_byte_reader_empty_stream() {
        let mut reader = ByteReader::new("".as_bytes());
        assert!(reader.read().unwrap().is_empty());
    }

    #[test]
    fn test_byte_reader_malformed_stream() {
        let mut reader = ByteReader::new("kind: [oops\n".as_bytes());
        assert!(reader.read().is_err());
    }

    #[test]
    fn test_local_package_reader_annotates_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.yaml"), "kind: A\n").unwrap();
        std::fs::write(dir.path().join("sub/b.yaml"), "kind: B\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not yaml\n").unwrap();
        std::fs::write(dir.path().join(pkgfile::FILENAME), "name: pkg\n").unwrap();

        let nodes = LocalPackageReader::new(dir.path()).read().unwrap();
        let got: Vec<(String, String)> = nodes
            .iter()
            .map(|n| (n.kind().to_string(), annotations::path(n).unwrap()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("A".to_string(), "a.yaml".to_string()),
                ("B".to_string(), "sub/b.yaml".to_string()),
            ]
        );
    }
}
