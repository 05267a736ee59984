//! The package manifest.
//!
//! One reserved file per package records where the package's resources came
//! from. The manifest is read and written independently of the pipeline and
//! is never part of a resource sequence; package readers skip it and
//! golden-fixture comparisons exclude it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Reserved manifest filename, one per package directory.
pub const FILENAME: &str = "Pkgfile";

/// `apiVersion` written into new manifests.
pub const API_VERSION: &str = "resio.dev/v1alpha1";

/// `kind` written into new manifests.
pub const KIND: &str = "Pkgfile";

/// Package provenance metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PkgFile {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<Upstream>,
}

/// Where a package was fetched from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Upstream {
    pub repo: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub directory: String,
    #[serde(rename = "ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

impl PkgFile {
    /// A fresh manifest with no upstream.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            name: name.into(),
            upstream: None,
        }
    }

    /// Load the manifest from a package directory. Unknown fields are
    /// rejected.
    pub fn read(dir: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(dir.join(FILENAME))?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Store the manifest into a package directory.
    pub fn write(&self, dir: &Path) -> Result<()> {
        std::fs::write(dir.join(FILENAME), serde_yaml::to_string(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut pkg = PkgFile::new("hello-world");
        pkg.upstream = Some(Upstream {
            repo: "https://example.com/packages.git".to_string(),
            directory: "hello-world".to_string(),
            reference: "v0.2.0".to_string(),
            commit: None,
        });
        pkg.write(dir.path()).unwrap();

        let loaded = PkgFile::read(dir.path()).unwrap();
        assert_eq!(loaded, pkg);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(FILENAME),
            "apiVersion: resio.dev/v1alpha1\nkind: Pkgfile\nname: x\nbogus: y\n",
        )
        .unwrap();
        assert!(PkgFile::read(dir.path()).is_err());
    }

    #[test]
    fn test_ref_field_name_on_the_wire() {
        let mut pkg = PkgFile::new("x");
        pkg.upstream = Some(Upstream {
            repo: "r".to_string(),
            reference: "main".to_string(),
            ..Default::default()
        });
        let yaml = serde_yaml::to_string(&pkg).unwrap();
        assert!(yaml.contains("ref: main"), "got: {yaml}");
    }
}
