//! Human-readable run report printed by the binary.

use crate::config::GenerationConfig;
use crate::generator::GenerationResult;

const TITLE: &str = "Entity generation";

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn section(out: &mut String, title: &str) {
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.len()));
    out.push('\n');
}

/// Title, effective settings and the tables about to be processed.
pub fn render_plan(connection: &str, config: &GenerationConfig) -> String {
    let mut out = String::new();
    out.push_str(TITLE);
    out.push('\n');
    out.push_str(&"=".repeat(TITLE.len()));
    out.push_str("\n\n");

    let listing = [
        format!("Connection: {}", connection),
        format!("Repository generation: {}", yes_no(config.generate_repositories)),
        format!("Overwrite files: {}", yes_no(config.overwrite_existing)),
        format!("Dry-run: {}", yes_no(config.dry_run)),
        format!("Entity path: {}", config.entity_path.display()),
        format!("Repository path: {}", config.repository_path.display()),
    ];
    for line in &listing {
        out.push_str(&format!(" * {}\n", line));
    }
    out.push('\n');

    if config.tables.is_empty() {
        out.push_str("Tables to process: all available tables.\n");
    } else {
        out.push_str(&format!("Tables to process: {}\n", config.tables.join(", ")));
    }
    out
}

/// Generated files, skipped files and errors of a finished run.
pub fn render_summary(result: &GenerationResult, dry_run: bool) -> String {
    let mut out = String::new();

    if dry_run {
        out.push_str("[NOTE] Dry-run mode: no files were created or modified.\n\n");
    }

    if !result.entities.is_empty() {
        section(&mut out, "Entities");
        for (table, file) in &result.entities {
            out.push_str(&format!(" - {} -> {}\n", table, file.display()));
        }
        out.push('\n');
    }

    if !result.repositories.is_empty() {
        section(&mut out, "Repositories");
        for (table, file) in &result.repositories {
            out.push_str(&format!(" - {} -> {}\n", table, file.display()));
        }
        out.push('\n');
    }

    if !result.skipped.is_empty() {
        out.push_str("[WARNING] Skipped files:\n");
        for file in &result.skipped {
            out.push_str(&format!(" - {}\n", file.display()));
        }
        out.push_str(
            "Use --overwrite to replace them or delete them manually before running again.\n\n",
        );
    }

    if result.is_success() {
        out.push_str("[OK] Generation completed successfully.\n");
    } else {
        out.push_str("[ERROR] Errors detected:\n");
        for message in result.error_messages() {
            out.push_str(&format!(" - {}\n", message));
        }
    }
    out
}
