//! `hca` -- inspect HCA metadata bundles from the command line.
//!
//! Parses CLI arguments with clap, resolves the runtime context (layered
//! configuration plus global flags), and dispatches to command handlers.

mod bundle_dir;
mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;

use cli::{Cli, Commands};
use context::RuntimeContext;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    let result = RuntimeContext::from_global_args(&cli.global).and_then(|ctx| {
        init_logging(&ctx);

        // Dispatch to command handler
        match &cli.command {
            Some(Commands::Version) => commands::version::run(&ctx),
            Some(Commands::Summary(args)) => commands::summary::run(&ctx, args),
            Some(Commands::Roots(args)) => commands::roots::run(&ctx, args),
            Some(Commands::Sequencing(args)) => commands::sequencing::run(&ctx, args),
            Some(Commands::Show(args)) => commands::show::run(&ctx, args),
            Some(Commands::Lookup(args)) => commands::lookup::run(&ctx, args),
            Some(Commands::Config(args)) => commands::config_cmd::run(&ctx, args),
            None => {
                // No subcommand -- print help
                use clap::CommandFactory;
                Cli::command().print_help().ok();
                println!();
                Ok(())
            }
        }
    });

    // Handle errors: print message and exit with code 1
    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

/// Installs the stderr subscriber. Warnings (such as deprecated schemas)
/// are always shown; `--verbose` or a configured level raises the detail.
fn init_logging(ctx: &RuntimeContext) {
    let filter = match (&ctx.config.log.level, ctx.verbose) {
        (Some(level), _) => level.clone(),
        (None, true) => "hca=debug,hca_metadata=debug,hca_lookup=debug,hca_config=debug".to_string(),
        (None, false) => "warn".to_string(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
