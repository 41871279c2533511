//! `gendoc templates <subpath>` — list registry keys or look one up by suffix.

use anyhow::{bail, Context, Result};
use clap::Args;
use gendoc_output::GeneratorBase;

use super::SettingsArgs;

/// Arguments for `gendoc templates`.
#[derive(Args, Debug)]
pub struct TemplatesArgs {
    /// Output subpath whose templates to list.
    pub subpath: String,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Print only the first template key ending with this suffix.
    #[arg(long)]
    pub suffix: Option<String>,
}

impl TemplatesArgs {
    pub fn run(self) -> Result<()> {
        let settings = self.settings.resolve()?;
        let mut base = GeneratorBase::<()>::new(self.subpath.as_str(), &settings, &self.subpath)
            .with_context(|| format!("invalid output subpath '{}'", self.subpath))?;
        let report = base
            .copy_template_files()
            .with_context(|| format!("provisioning '{}' failed", self.subpath))?;
        tracing::debug!(
            subpath = %self.subpath,
            templates = report.registry.len(),
            skipped = report.skipped.len(),
            "discovered templates"
        );

        match &self.suffix {
            Some(suffix) => match base.template_key_ending_with(suffix) {
                Some(key) => println!("{key}"),
                None => bail!("no template key ends with '{suffix}'"),
            },
            None => {
                for key in base.templates().keys() {
                    println!("{key}");
                }
            }
        }
        Ok(())
    }
}
