//! `hca config` -- show or initialize configuration.

use std::env;

use anyhow::{Context, Result, bail};
use hca_config::{CONFIG_FILE, HcaConfig, ensure_hca_dir, save_config};

use crate::cli::{ConfigArgs, ConfigCommands};
use crate::context::RuntimeContext;
use crate::output::output_json;

pub fn run(ctx: &RuntimeContext, args: &ConfigArgs) -> Result<()> {
    match &args.command {
        ConfigCommands::Show => show(ctx),
        ConfigCommands::Init { force } => init(ctx, *force),
    }
}

fn show(ctx: &RuntimeContext) -> Result<()> {
    if ctx.json {
        let out = serde_json::json!({
            "config_dir": ctx.config_dir,
            "config": ctx.config,
        });
        output_json(&out)?;
        return Ok(());
    }

    match &ctx.config_dir {
        Some(dir) => println!("# {}", dir.join(CONFIG_FILE).display()),
        None => println!("# no .hca directory found; defaults and environment only"),
    }
    print!("{}", serde_yaml::to_string(&ctx.config)?);
    Ok(())
}

fn init(ctx: &RuntimeContext, force: bool) -> Result<()> {
    let target = match &ctx.config_dir {
        Some(dir) if force || !dir.join(CONFIG_FILE).exists() => dir.clone(),
        Some(dir) => bail!(
            "{} already exists (use --force to overwrite)",
            dir.join(CONFIG_FILE).display()
        ),
        None => {
            let cwd = env::current_dir().context("cannot determine current directory")?;
            ensure_hca_dir(&cwd)?
        }
    };

    save_config(&target, &HcaConfig::default())?;
    let path = target.join(CONFIG_FILE);
    tracing::debug!(path = %path.display(), "wrote default configuration");

    if ctx.json {
        output_json(&serde_json::json!({ "path": path }))?;
    } else {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
