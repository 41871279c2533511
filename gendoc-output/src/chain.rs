//! Ordered generator chain.
//!
//! Generators run one at a time in push order. Each pushed generator is
//! linked to the one pushed before it, so links are acyclic by construction
//! and a generator's predecessor has always completed before it starts.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use serde::Serialize;

use crate::error::OutputError;
use crate::generator::{GenerationState, GeneratorRef, OutputGenerator};
use crate::provision::ProvisionReport;

/// Outcome of running a single generator.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorReport {
    pub name: String,
    pub output_subpath: String,
    pub provision: ProvisionReport,
    pub written: Vec<PathBuf>,
}

/// The ordered generators of one session.
pub struct GeneratorChain<S: ?Sized + 'static> {
    generators: Vec<GeneratorRef<S>>,
}

impl<S: ?Sized + 'static> Default for GeneratorChain<S> {
    fn default() -> Self {
        GeneratorChain {
            generators: Vec::new(),
        }
    }
}

impl<S: ?Sized + 'static> GeneratorChain<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `generator`, linking it to the current last generator.
    ///
    /// Returns the typed handle so callers can inspect the generator after
    /// the run.
    pub fn push<G>(&mut self, generator: G) -> Result<Rc<RefCell<G>>, OutputError>
    where
        G: OutputGenerator<S> + 'static,
    {
        let handle = Rc::new(RefCell::new(generator));
        if let Some(last) = self.generators.last() {
            handle.borrow_mut().base_mut().link_previous(last)?;
        }
        let erased: GeneratorRef<S> = handle.clone();
        self.generators.push(erased);
        Ok(handle)
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub fn generators(&self) -> &[GeneratorRef<S>] {
        &self.generators
    }

    /// Provision and run every generator in order against `store`.
    ///
    /// Stops at the first fatal error; generators after it do not run.
    pub fn run(&self, store: Rc<S>) -> Result<Vec<GeneratorReport>, OutputError> {
        let mut reports = Vec::with_capacity(self.generators.len());

        for (index, generator) in self.generators.iter().enumerate() {
            let mut generator =
                generator
                    .try_borrow_mut()
                    .map_err(|_| OutputError::Generation {
                        generator: format!("#{index}"),
                        message: "generator is borrowed elsewhere".to_string(),
                    })?;
            let name = generator.name().to_string();
            tracing::info!(generator = %name, position = index, "running generator");

            let provision = generator.base_mut().copy_template_files()?;
            generator.generate_output(Rc::clone(&store))?;

            let state = generator.base().state();
            match state {
                GenerationState::Unbound => {
                    return Err(OutputError::BindSkipped { generator: name });
                }
                GenerationState::Bound => generator.base_mut().complete()?,
                GenerationState::Completed => {}
            }

            let base = generator.base();
            reports.push(GeneratorReport {
                name,
                output_subpath: base.output_subpath().to_string(),
                provision,
                written: base.written_files().to_vec(),
            });
        }

        Ok(reports)
    }
}
