//! `gendoc provision` — copy static assets and report discovered templates.

use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use gendoc_output::{AssetCopy, AssetGenerator, GeneratorChain, GeneratorReport};

use super::SettingsArgs;

/// Arguments for `gendoc provision`.
#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Output subpaths to provision, in chain order (default: the roots themselves).
    pub subpaths: Vec<String>,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Print the provisioning reports as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ProvisionArgs {
    pub fn run(self) -> Result<()> {
        let settings = self.settings.resolve()?;

        let subpaths = if self.subpaths.is_empty() {
            vec![String::new()]
        } else {
            self.subpaths.clone()
        };

        let mut chain = GeneratorChain::<()>::new();
        for subpath in &subpaths {
            let generator = AssetGenerator::new(&settings, subpath)
                .with_context(|| format!("invalid output subpath '{subpath}'"))?;
            chain.push(generator)?;
        }

        tracing::info!(generators = chain.len(), "running provisioning chain");
        let reports = chain.run(Rc::new(())).context("provisioning failed")?;
        tracing::info!(
            templates = reports.iter().map(|r| r.provision.registry.len()).sum::<usize>(),
            copied = reports.iter().map(|r| r.provision.copied()).sum::<usize>(),
            "provisioning finished"
        );

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&reports).context("failed to serialize reports")?
            );
        } else {
            for report in &reports {
                print_report(report);
            }
        }
        Ok(())
    }
}

fn print_report(report: &GeneratorReport) {
    let provision = &report.provision;
    println!(
        "{} '{}' ({} copied, {} unchanged, {} templates)",
        "✓".green().bold(),
        report.name,
        provision.copied(),
        provision.unchanged(),
        provision.registry.len()
    );

    for asset in &provision.assets {
        match asset {
            AssetCopy::Copied { path } => println!("  ✎  {}", path.display()),
            AssetCopy::Unchanged { path } => println!("  ·  {}", path.display()),
        }
    }
    for key in provision.registry.keys() {
        println!("  {}  {key}", "T".cyan());
    }
    for skipped in &provision.skipped {
        println!(
            "  {}  {} ({})",
            "!".yellow().bold(),
            skipped.path.display(),
            skipped.reason
        );
    }
}
