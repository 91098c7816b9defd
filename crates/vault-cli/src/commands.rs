use std::io::Read;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use tracing::debug;
use vault_sdk::{Config, ConfigProps, Timestamp, VaultConfig, Vaults};

use crate::cli::*;
use crate::records::AnyRecord;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<VaultConfig> {
    match path {
        Some(path) => Ok(VaultConfig::load(path)?),
        None => Ok(VaultConfig::default()),
    }
}

pub fn run_command(cli: Cli, config: VaultConfig) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Id(args) => cmd_id(args, format),
        Command::Document(args) => cmd_document(args),
        Command::Validate(args) => cmd_validate(args, format),
        Command::Dependents(args) => cmd_dependents(args, config, format),
        Command::Config => cmd_config(&config, format),
    }
}

fn cmd_id(args: BuildArgs, format: OutputFormat) -> anyhow::Result<()> {
    let now = construction_time(args.at.as_deref())?;
    let record = AnyRecord::build(args.kind, read_json(&args.input)?, now)?;
    let version = record.version_id().map(|v| v.to_hex());
    match format {
        OutputFormat::Json => print_json(&json!({
            "kind": record.kind(),
            "id": record.id().to_hex(),
            "versionId": version,
        }))?,
        OutputFormat::Text => {
            let id = record.id().to_hex();
            println!("{} {} {}", "✓".green().bold(), record.kind(), id.yellow());
            if let Some(version) = version {
                println!("  version: {}", version.cyan());
            }
        }
    }
    Ok(())
}

fn cmd_document(args: BuildArgs) -> anyhow::Result<()> {
    let now = construction_time(args.at.as_deref())?;
    let record = AnyRecord::build(args.kind, read_json(&args.input)?, now)?;
    print_json(&record.to_json_document()?)
}

fn cmd_validate(args: ValidateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let record = AnyRecord::from_stored(args.kind, read_json(&args.input)?)?;
    let violations = match record.validate() {
        Ok(()) => Vec::new(),
        Err(err) => err.violations,
    };
    match format {
        OutputFormat::Json => print_json(&json!({
            "kind": record.kind(),
            "id": record.id().to_hex(),
            "valid": violations.is_empty(),
            "violations": violations
                .iter()
                .map(|v| json!({"field": v.field, "reason": v.reason}))
                .collect::<Vec<_>>(),
        }))?,
        OutputFormat::Text if violations.is_empty() => {
            let id = record.id().short_hex();
            println!("{} valid {} {}", "✓".green().bold(), record.kind(), id.yellow());
        }
        OutputFormat::Text => {
            println!("{} invalid {}", "✗".red().bold(), record.kind());
            for v in &violations {
                println!("  {}: {}", v.field.bold(), v.reason);
            }
        }
    }
    if violations.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} violation(s)", violations.len())
    }
}

fn cmd_dependents(
    args: DependentsArgs,
    config: VaultConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let props: Vec<ConfigProps> = serde_json::from_value(read_json(&args.configs)?)
        .with_context(|| format!("{} is not an array of configurations", args.configs))?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let vaults = Vaults::in_memory(config);
    let hits = runtime.block_on(dependents(&vaults, props, &args.service, &args.source))?;

    match format {
        OutputFormat::Json => {
            let listed: Vec<_> = hits
                .iter()
                .map(|c| {
                    json!({
                        "id": c.id.to_hex(),
                        "service": c.service,
                        "source": c.source,
                        "provider": c.provider,
                    })
                })
                .collect();
            print_json(&serde_json::Value::Array(listed))?;
        }
        OutputFormat::Text if hits.is_empty() => {
            println!("No configuration depends on {}/{}.", args.service, args.source);
        }
        OutputFormat::Text => {
            for c in &hits {
                println!(
                    "{} {}/{} ({})",
                    c.id.short_hex().yellow(),
                    c.service.bold(),
                    c.source,
                    c.provider.cyan()
                );
            }
        }
    }
    Ok(())
}

/// Register every configuration, then query for dependents of one job.
async fn dependents(
    vaults: &Vaults,
    props: Vec<ConfigProps>,
    service: &str,
    source: &str,
) -> anyhow::Result<Vec<Config>> {
    let ctx = vaults.context();
    for p in props {
        let job = format!("{}/{}/{}", p.service, p.source, p.provider);
        vaults
            .register_config(&ctx, p)
            .await
            .with_context(|| format!("failed to register {job}"))?;
        debug!(job = %job, "registered configuration");
    }
    Ok(vaults.configs.find_dependents(&ctx, service, source).await?)
}

fn cmd_config(config: &VaultConfig, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(config)?),
        OutputFormat::Text => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn read_json(input: &str) -> anyhow::Result<serde_json::Value> {
    let text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))?
    };
    serde_json::from_str(&text).with_context(|| format!("{input} is not valid JSON"))
}

fn construction_time(at: Option<&str>) -> anyhow::Result<Timestamp> {
    match at {
        Some(at) => Ok(Timestamp::parse(at)?),
        None => Ok(Timestamp::now()),
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
