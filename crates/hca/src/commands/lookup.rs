//! `hca lookup` -- resolve a property key in one metadata document.
//!
//! The key is translated for the document's schema version before it is
//! resolved, so keys can be written against the current schema.

use std::fs;

use anyhow::{Context, Result};
use hca_lookup::document_version;
use serde_json::Value;

use crate::cli::LookupArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

pub fn run(ctx: &RuntimeContext, args: &LookupArgs) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let document: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;

    let resolver = ctx.resolver()?;
    let fallbacks: Vec<&str> = args.fallbacks.iter().map(String::as_str).collect();
    let version = document_version(&document);
    tracing::debug!(
        key = %args.key,
        translated = %resolver.translate(&args.key, version.as_ref()),
        version = ?version,
        "looking up property"
    );

    let value = match &args.default {
        Some(default) => {
            let default: Value = serde_json::from_str(default)
                .with_context(|| format!("--default {default:?} is not valid JSON"))?;
            resolver
                .lookup_or(&document, &args.key, &fallbacks, Some(default))?
                .unwrap_or(Value::Null)
        }
        None => resolver.lookup(&document, &args.key, &fallbacks)?,
    };

    if ctx.json {
        output_json(&value)?;
    } else {
        print_value(&value);
    }
    Ok(())
}

/// Strings print bare, one per line for lists of strings; anything else as
/// JSON.
fn print_value(value: &Value) {
    match value {
        Value::String(s) => println!("{s}"),
        Value::Array(items) if items.iter().all(Value::is_string) => {
            for item in items.iter().filter_map(Value::as_str) {
                println!("{item}");
            }
        }
        other => match serde_json::to_string_pretty(other) {
            Ok(json) => println!("{json}"),
            Err(_) => println!("{other}"),
        },
    }
}
