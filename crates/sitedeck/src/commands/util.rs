//! Shared helpers for command handlers.

use std::io::{IsTerminal, Read};
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;

use sitedeck_core::editor::form::SECRET_MASK;
use sitedeck_core::{FormDescriptor, GlobalConfig, SiteConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, the operation is refused.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Split a `KEY=VALUE` argument. The value may be empty or contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(&str, &str), CliError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(CliError::Validation {
            field: raw.into(),
            reason: "expected KEY=VALUE".into(),
        }),
    }
}

/// Read a `--from-file` argument; `-` reads stdin.
pub fn read_text_input(path: &Path) -> Result<String, CliError> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(path)?)
}

// ── Secrets ─────────────────────────────────────────────────────────

fn mask(secret: &mut String) {
    if !secret.is_empty() {
        *secret = SECRET_MASK.to_owned();
    }
}

/// Copy of `site` with its password masked unless `reveal` is set.
pub fn mask_site(site: &SiteConfig, reveal: bool) -> SiteConfig {
    let mut shown = site.clone();
    if !reveal {
        mask(&mut shown.password);
    }
    shown
}

/// Copy of `global` with its API key masked unless `reveal` is set.
pub fn mask_global(global: &GlobalConfig, reveal: bool) -> GlobalConfig {
    let mut shown = global.clone();
    if !reveal {
        mask(&mut shown.openrouter_api_key);
    }
    shown
}

// ── Detail views ────────────────────────────────────────────────────

/// One line per form field, in form order, followed by `extra`.
pub fn form_detail<T: Serialize>(
    value: &T,
    form: &FormDescriptor,
    reveal: bool,
    extra: &[(&str, String)],
) -> String {
    let json = serde_json::to_value(value).unwrap_or(Value::Null);
    let mut pairs: Vec<(String, String)> = form
        .fields()
        .iter()
        .map(|field| {
            let current = json.get(&field.name).unwrap_or(&Value::Null);
            (field.title.clone(), field.display_value(current, reveal))
        })
        .collect();
    pairs.extend(extra.iter().map(|(label, v)| ((*label).to_owned(), v.clone())));
    output::render_detail(&pairs)
}

// ── Progress ────────────────────────────────────────────────────────

/// A steady spinner on stderr; hidden with `--quiet`.
pub fn spinner(global: &GlobalOpts, message: impl Into<String>) -> ProgressBar {
    let bar = if global.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    bar.set_style(spinner_style());
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
