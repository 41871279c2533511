pub mod provision;
pub mod templates;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use gendoc_core::Settings;

/// Where to find the template and output roots.
#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Settings YAML file (default: ~/.gendoc/settings.yaml).
    #[arg(long, conflicts_with_all = ["templates", "output"])]
    pub settings: Option<PathBuf>,

    /// Template root; overrides the settings file.
    #[arg(long, requires = "output")]
    pub templates: Option<PathBuf>,

    /// Output root; overrides the settings file.
    #[arg(long, requires = "templates")]
    pub output: Option<PathBuf>,
}

impl SettingsArgs {
    pub fn resolve(&self) -> Result<Settings> {
        match (&self.templates, &self.output, &self.settings) {
            (Some(templates), Some(output), _) => {
                Settings::new(absolute(templates)?, absolute(output)?)
                    .context("invalid template/output paths")
            }
            (_, _, Some(file)) => Settings::load_at(file)
                .with_context(|| format!("could not load settings from {}", file.display())),
            _ => Settings::load().context("could not load default settings"),
        }
    }
}

fn absolute(path: &std::path::Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("could not determine current directory")?;
    Ok(cwd.join(path))
}
