//! Writes the template mapping file used by the export server.

use anyhow::{Context, Result};
use clap::Parser;
use deckgen::template::{TemplateSource, map_templates, write_template_maps};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Discover the title/content layouts and placeholder roles of templates
#[derive(Parser, Debug)]
#[command(name = "template-mapper", version)]
struct Cli {
    /// Directory holding the template files
    #[arg(long, default_value = "src/resources")]
    resources_dir: PathBuf,

    /// Mapping file to write [default: <RESOURCES_DIR>/template-maps.json]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Template to map, as ID=FILE (repeatable; defaults to the built-in set)
    #[arg(long = "template", value_name = "ID=FILE")]
    templates: Vec<TemplateSource>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let sources = if cli.templates.is_empty() {
        TemplateSource::defaults()
    } else {
        cli.templates
    };
    let output = cli
        .output
        .unwrap_or_else(|| cli.resources_dir.join("template-maps.json"));

    let maps = map_templates(&cli.resources_dir, &sources).context("Failed to map templates")?;

    for (id, descriptor) in &maps {
        println!(
            "{}: {} layouts, title layout {}, content layout {} ({})",
            id,
            descriptor.layouts.len(),
            descriptor.title_layout_index,
            descriptor.content_layout_index,
            descriptor.template_file,
        );
    }

    write_template_maps(&output, &maps)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {}", output.display());

    Ok(())
}
