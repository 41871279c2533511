//! # gendoc-output
//!
//! Template provisioning and generator chaining for gendoc.
//!
//! Every concrete generator embeds a [`GeneratorBase`]. The
//! [`GeneratorChain`] runs them in order: it provisions each generator's
//! template subtree (static assets copied, `-template` files registered),
//! then calls its entry point with the shared, read-only store.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::rc::Rc;
//!
//! use gendoc_core::Settings;
//! use gendoc_output::{AssetGenerator, GeneratorChain, OutputError};
//!
//! fn run(settings: &Settings) -> Result<(), OutputError> {
//!     let mut chain = GeneratorChain::<()>::new();
//!     chain.push(AssetGenerator::new(settings, "html")?)?;
//!     chain.push(AssetGenerator::new(settings, "docset")?)?;
//!     for report in chain.run(Rc::new(()))? {
//!         println!("{}: {} templates", report.name, report.provision.registry.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod chain;
pub mod classify;
pub mod error;
pub mod generator;
pub mod provision;
pub mod registry;
pub mod writer;

pub use chain::{GeneratorChain, GeneratorReport};
pub use classify::{classify, is_template, EntryKind, TEMPLATE_MARKER};
pub use error::OutputError;
pub use generator::{
    AssetGenerator, GenerationState, GeneratorBase, GeneratorRef, OutputGenerator,
    WeakGeneratorRef,
};
pub use provision::{provision, AssetCopy, ProvisionReport, SkippedEntry};
pub use registry::{TemplateHandle, TemplateRegistry};
pub use writer::write_string;
