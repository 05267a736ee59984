//! # resio
//!
//! A fidelity-preserving YAML resource pipeline: the document-processing
//! substrate beneath a configuration-package management tool.
//!
//! Collections of resource manifests flow through a composable pipeline of
//! pure transformations and are re-serialized, optionally split across
//! multiple named outputs. Higher-level operations (setting fields,
//! annotating provenance, splitting a bundle into per-resource files) are
//! all expressed as [`Filter`] stages over the same in-memory sequence of
//! [`Resource`] nodes.
//!
//! ```no_run
//! use resio::{ByteReader, ByteWriter, FileSetter, Pipeline};
//!
//! let input = std::io::stdin();
//! let output = std::io::stdout();
//! Pipeline::new()
//!     .input(ByteReader::new(input))
//!     .filter(FileSetter::new())
//!     .output(ByteWriter::new(output))
//!     .execute()?;
//! # Ok::<(), resio::Error>(())
//! ```

pub mod annotations;
pub mod copyutil;
pub mod errors;
pub mod filters;
pub mod gitutil;
pub mod io;
pub mod pipeline;
pub mod pkgfile;
pub mod resource;

// Re-export commonly used types
pub use crate::errors::{Error, Result};
pub use crate::filters::{FileSetter, Filter, SetAnnotation};
pub use crate::io::{
    ByteReader, ByteWriter, LocalPackageReader, LocalPackageWriter, PathCollision, Reader,
    SharedBuffer, Writer,
};
pub use crate::pipeline::Pipeline;
pub use crate::pkgfile::PkgFile;
pub use crate::resource::Resource;
