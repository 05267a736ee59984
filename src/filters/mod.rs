//! Pure transformations over an ordered resource sequence.
//!
//! A filter is the single composition capability of the pipeline: it
//! consumes the sequence produced by the previous stage and returns a new
//! one. Filters may reorder, add, remove, or mutate nodes, but must be
//! side-effect-free with respect to everything outside the sequence they
//! are given; all tunable behavior is supplied at construction time.

pub mod fileset;
pub mod set_annotation;

pub use fileset::FileSetter;
pub use set_annotation::SetAnnotation;

use crate::errors::Result;
use crate::resource::Resource;

/// A pure transformation from one ordered resource sequence to another.
///
/// Implementations take ownership of the sequence and give ownership of the
/// result back, so a filter can never mutate nodes it did not receive as
/// input.
pub trait Filter {
    /// The filter name, used in error and log messages.
    fn name(&self) -> &str;

    /// Transform the sequence.
    fn filter(&self, resources: Vec<Resource>) -> Result<Vec<Resource>>;
}
