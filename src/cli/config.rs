//! Config command handlers

use crate::cli::ConfigInitArgs;
use anyhow::Context;
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../pingpad.example.toml");

/// Handle `pingpad config init` command
pub fn handle_config_init(args: &ConfigInitArgs) -> anyhow::Result<String> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        );
    }

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&args.output, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(format!(
        "✓ Configuration file created: {}\n  Edit this file to point at your Pingpad backend.",
        args.output.display()
    ))
}
