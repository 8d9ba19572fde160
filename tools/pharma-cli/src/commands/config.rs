//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use pharma_commerce::money::Currency;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");

    if let Some(path) = ctx.config_file() {
        ctx.output.debug(&format!("Loaded from {}", path.display()));
    }

    ctx.output.info("[storage]");
    ctx.output.kv("dir", &ctx.config.storage.dir);
    ctx.output.kv("cart_key", &ctx.config.storage.cart_key);

    ctx.output.info("[display]");
    ctx.output.kv("currency", &ctx.config.display.currency);

    ctx.output.info("[sync]");
    ctx.output
        .kv("max_retries", &ctx.config.sync.max_retries.to_string());
    ctx.output
        .kv("retry_base_ms", &ctx.config.sync.retry_base_ms.to_string());
    ctx.output
        .kv("retry_max_ms", &ctx.config.sync.retry_max_ms.to_string());

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(config_path) = ctx.config_file() else {
        bail!("No config file found. Run `pharma config init` to create one.");
    };
    let config_path = config_path.to_string_lossy().to_string();

    let mut config = CliConfig::load(&config_path)?;
    set_config_value(&mut config, key, value)?;
    config.save(&config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("pharma.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Collect errors and warnings for a config.
fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if config.storage.dir.trim().is_empty() {
        errors.push("storage.dir is required".to_string());
    }

    if config.storage.cart_key.trim().is_empty() {
        errors.push("storage.cart_key is required".to_string());
    }

    if Currency::from_code(&config.display.currency).is_none() {
        errors.push(format!(
            "display.currency '{}' is not supported (use NPR, INR or USD)",
            config.display.currency
        ));
    }

    if config.sync.retry_base_ms > config.sync.retry_max_ms {
        errors.push("sync.retry_base_ms must not exceed sync.retry_max_ms".to_string());
    }

    if config.sync.max_retries > 10 {
        warnings.push(format!(
            "sync.max_retries = {} will make failing queries very slow",
            config.sync.max_retries
        ));
    }

    (errors, warnings)
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["storage", "dir"] => config.storage.dir = value.to_string(),
        ["storage", "cart_key"] => config.storage.cart_key = value.to_string(),
        ["display", "currency"] => config.display.currency = value.to_uppercase(),
        ["sync", "max_retries"] => config.sync.max_retries = value.parse()?,
        ["sync", "retry_base_ms"] => config.sync.retry_base_ms = value.parse()?,
        ["sync", "retry_max_ms"] => config.sync.retry_max_ms = value.parse()?,
        _ => bail!("Unknown config key: {}", key),
    }

    Ok(())
}
