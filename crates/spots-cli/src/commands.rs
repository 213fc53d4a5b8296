use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde_json::{json, Value};
use spots_apply::{validate, Applier, FixedSize, InMemoryView, Renderer, RendererRegistry};
use spots_diff::{Changes, Reconciliation};
use spots_sdk::{Matching, SpotsConfig};
use spots_types::{Component, Item, Size};
use tracing::debug;

use crate::cli::*;

/// Size given to rows rendered by the CLI's stand-in renderers.
const ROW_SIZE: Size = Size {
    width: 320.0,
    height: 44.0,
};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => SpotsConfig::load(path)?,
        None => SpotsConfig::default(),
    };
    match cli.command {
        Command::Diff(args) => cmd_diff(args, &config, &cli.format),
        Command::Apply(args) => cmd_apply(args, &config, &cli.format),
        Command::Validate(args) => cmd_validate(args, &cli.format),
    }
}

fn cmd_diff(args: DiffArgs, config: &SpotsConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let old = load_items(&args.old)?;
    let new = load_items(&args.new)?;
    let rec = matching(args.key.as_deref(), config).reconcile(&old, &new);

    match format {
        OutputFormat::Json => print_json(&rec)?,
        OutputFormat::Text => print_reconciliation(&rec),
    }
    Ok(())
}

fn cmd_apply(args: ApplyArgs, config: &SpotsConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let old = load_items(&args.old)?;
    let new = load_items(&args.new)?;
    let rec = matching(args.key.as_deref(), config).reconcile(&old, &new);

    let registry = registry_for(config, &args.kinds, old.iter().chain(&new));
    let mut view = InMemoryView::with_items(registry, &old);
    let report = Applier::new(config.apply.clone()).apply(&rec, &new, &mut view);

    match format {
        OutputFormat::Json => print_json(&json!({
            "changes": rec.changes,
            "report": report,
            "rows": view.items(),
        }))?,
        OutputFormat::Text => {
            print_reconciliation(&rec);
            println!();
            let outcome = format!("{:?}", report.outcome);
            if report.is_clean() {
                println!("{} {} ({} view updates)", "✓".green().bold(), outcome.bold(), report.applied);
            } else {
                println!("{} {} ({} view updates, {} skipped)", "!".yellow().bold(), outcome.bold(), report.applied, report.issues.len());
                for issue in &report.issues {
                    println!("  {} {}", "skipped:".yellow(), issue);
                }
            }
            println!("\nRows:");
            for (index, row) in view.rows().iter().enumerate() {
                println!(
                    "  {:>3}  {:<12} {}  {}",
                    index,
                    row.item.kind.cyan(),
                    row.item.title,
                    format!("{}x{}", row.rendered.width, row.rendered.height).dimmed()
                );
            }
        }
    }
    Ok(())
}

fn cmd_validate(args: ValidateArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.changes)
        .with_context(|| format!("reading {}", args.changes.display()))?;
    let changes: Changes = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", args.changes.display()))?;
    let validated = validate(&changes, args.size);

    match format {
        OutputFormat::Json => print_json(&json!({
            "changes": validated.changes,
            "issues": validated.issues,
        }))?,
        OutputFormat::Text => {
            print_changes(&validated.changes);
            if validated.issues.is_empty() {
                println!("{} All indices fit a collection of {}", "✓".green().bold(), args.size);
            } else {
                for issue in &validated.issues {
                    println!("  {} {}", "dropped:".red(), issue);
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read a snapshot: either a JSON array of items or a component.
pub(crate) fn load_items(path: &Path) -> anyhow::Result<Vec<Item>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    let mut component = match value {
        Value::Array(_) => Component::default().with_items(
            serde_json::from_value(value)
                .with_context(|| format!("decoding items in {}", path.display()))?,
        ),
        _ => Component::from_json(&text)
            .with_context(|| format!("decoding component in {}", path.display()))?,
    };

    // Items without a kind take the component's.
    if !component.kind.is_empty() {
        let kind = component.kind.clone();
        for item in component.items.iter_mut().filter(|i| i.kind.is_empty()) {
            item.kind = kind.clone();
        }
    }
    debug!(path = %path.display(), items = component.len(), "loaded snapshot");
    Ok(component.items)
}

fn matching(key: Option<&str>, config: &SpotsConfig) -> Matching {
    match key.or(config.match_key.as_deref()) {
        Some(key) => Matching::keyed(key),
        None => Matching::Content,
    }
}

/// Stand-in renderers: `only` when given, otherwise every kind in `items`.
pub(crate) fn registry_for<'a>(
    config: &SpotsConfig,
    only: &[String],
    items: impl Iterator<Item = &'a Item>,
) -> RendererRegistry {
    let kinds: BTreeSet<String> = if only.is_empty() {
        items.map(|item| item.kind.clone()).collect()
    } else {
        only.iter().cloned().collect()
    };

    let mut registry = config.registry();
    for kind in kinds {
        registry.register(kind, || Renderer::row(FixedSize(ROW_SIZE)));
    }
    registry
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_reconciliation(rec: &Reconciliation) {
    println!(
        "{} {} → {} ({} → {} items)",
        "Snapshot".bold(),
        rec.base.short_hex().dimmed(),
        rec.target.short_hex().dimmed(),
        rec.old_len,
        rec.new_len
    );
    print_changes(&rec.changes);
    for ambiguous in &rec.ambiguous {
        println!(
            "  {} new {} took old {} of {} candidates",
            "ambiguous:".yellow(),
            ambiguous.new_index,
            ambiguous.chosen,
            ambiguous.candidates
        );
    }
}

fn print_changes(changes: &Changes) {
    if changes.is_empty() {
        println!("{} No changes.", "✓".green());
        return;
    }

    let list = |set: &BTreeSet<usize>| {
        set.iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let buckets = [
        ("insertions", list(&changes.insertions)),
        ("deletions", list(&changes.deletions)),
        (
            "moved",
            changes
                .moved
                .iter()
                .map(|(from, to)| format!("{from}→{to}"))
                .collect::<Vec<_>>()
                .join(", "),
        ),
        ("reloads", list(&changes.reloads)),
        ("updates", list(&changes.updates)),
        ("child updates", list(&changes.child_updates)),
    ];
    for (name, indices) in buckets {
        if !indices.is_empty() {
            println!("  {:<14} {}", format!("{name}:").cyan(), indices);
        }
    }
}
