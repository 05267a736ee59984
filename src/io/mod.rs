//! Reading and writing resource sequences.
//!
//! Readers produce an ordered sequence of [`Resource`](crate::resource::Resource)
//! nodes from a document stream or a package directory; writers serialize a
//! sequence back out, optionally splitting it across files. Stream lifecycle
//! stays with the caller: a reader or writer borrows its stream for a single
//! `read` or `write` call and never closes it.

pub mod readers;
pub mod writers;

pub use readers::{ByteReader, LocalPackageReader, Reader};
pub use writers::{ByteWriter, LocalPackageWriter, PathCollision, SharedBuffer, Writer};
