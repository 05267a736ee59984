//! Orchestration of readers, filters, and writers.

use crate::errors::{Error, Result};
use crate::filters::Filter;
use crate::io::{Reader, Writer};
use crate::resource::Resource;

/// One read-transform-write execution over an in-memory resource sequence.
///
/// `execute` reads all documents from all inputs, concatenating their
/// sequences in input-list order and preserving intra-stream document
/// order; applies each filter in list order, each seeing the previous
/// filter's complete output; then passes the identical final sequence to
/// every output writer, in output-list order.
///
/// Execution is strictly sequential; the first error from any stage aborts
/// the run. Writers that completed before a failing writer stay written;
/// no other partial-output guarantee is made.
#[derive(Default)]
pub struct Pipeline {
    pub inputs: Vec<Box<dyn Reader>>,
    pub filters: Vec<Box<dyn Filter>>,
    pub outputs: Vec<Box<dyn Writer>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, reader: impl Reader + 'static) -> Self {
        self.inputs.push(Box::new(reader));
        self
    }

    pub fn filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn output(mut self, writer: impl Writer + 'static) -> Self {
        self.outputs.push(Box::new(writer));
        self
    }

    /// Run the pipeline to completion.
    ///
    /// Consumes the pipeline: readers are single-pass, so a pipeline is not
    /// re-executable.
    pub fn execute(mut self) -> Result<()> {
        let mut resources: Vec<Resource> = Vec::new();
        for input in &mut self.inputs {
            resources.append(&mut input.read()?);
        }
        log::debug!("read {} resources", resources.len());

        for (stage, filter) in self.filters.iter().enumerate() {
            resources = filter
                .filter(resources)
                .map_err(|e| Error::filter(filter.name(), stage, e))?;
            log::debug!(
                "filter {} (stage {stage}) produced {} resources",
                filter.name(),
                resources.len()
            );
        }

        for output in &mut self.outputs {
            output.write(&resources)?;
        }
        Ok(())
    }
}
