//! Site command handlers.

use std::collections::HashSet;

use futures_util::future::join_all;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};
use serde::Serialize;
use tabled::Tabled;

use sitedeck_core::{DeleteOutcome, Editor, FetchSummaryResponse, SiteConfig, SiteManager};

use crate::cli::{EditArgs, GlobalOpts, OutputFormat, SitesArgs, SitesCommand};
use crate::error::CliError;
use crate::output;

use super::{edit, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Product URL")]
    product_url: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Password")]
    password: String,
    #[tabled(rename = "Subscription URL")]
    subscription_url: String,
}

impl SiteRow {
    /// `site` is expected to be masked already.
    fn new(site: &SiteConfig, manager: &SiteManager) -> Self {
        Self {
            id: site.id.clone(),
            name: site.name.clone(),
            product_url: site.product_url.clone(),
            username: site.username.clone(),
            password: site.password.clone(),
            subscription_url: manager.subscription_url(&site.id),
        }
    }
}

/// One successful fetch, for structured output.
#[derive(Serialize)]
struct FetchRecord {
    id: String,
    #[serde(flatten)]
    summary: FetchSummaryResponse,
}

#[derive(Tabled)]
struct FetchRow {
    #[tabled(rename = "Site")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Bytes")]
    bytes: u64,
    #[tabled(rename = "Cached")]
    cached: bool,
}

impl From<&FetchRecord> for FetchRow {
    fn from(r: &FetchRecord) -> Self {
        Self {
            id: r.id.clone(),
            name: r.summary.name.clone(),
            bytes: r.summary.content_length,
            cached: r.summary.cached,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    manager: &SiteManager,
    args: SitesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SitesCommand::List { reveal } => {
            let snap = manager.refresh().await?;
            if snap.is_empty() && matches!(global.output, OutputFormat::Table) {
                output::note(global, "No sites configured. Create one with: sitedeck sites create");
                return Ok(());
            }
            let sites: Vec<SiteConfig> = snap.iter().map(|s| util::mask_site(s, reveal)).collect();
            let out = output::render_list(
                &global.output,
                &sites,
                |s| SiteRow::new(s, manager),
                |s| s.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Get { id, reveal } => {
            let site = manager.get_site(&id).await?;
            let form = manager.session().site_form().await?;
            let url = manager.subscription_url(&site.id);
            let out = output::render_single(
                &global.output,
                &util::mask_site(&site, reveal),
                |_| util::form_detail(&site, &form, reveal, &[("Subscription URL", url.clone())]),
                |s| s.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Create { from_file, edit } => {
            let mut editor = manager.new_site_editor().await?;
            if let Some(path) = from_file {
                editor.edit_text(util::read_text_input(&path)?)?;
            } else if !interactive_edit(&mut editor, &edit, global)? {
                output::note(global, "Editor closed without saving; nothing created");
                return Ok(());
            }

            let site = submit(manager, &mut editor, global).await?;
            output::success(global, &format!("Site '{}' created", site.id));
            output::print_output(&manager.subscription_url(&site.id), global.quiet);
            Ok(())
        }

        SitesCommand::Edit { id, edit } => {
            let mut editor = manager.edit_site(&id).await?;
            if !interactive_edit(&mut editor, &edit, global)? || !editor.is_dirty() {
                output::note(global, "No changes");
                return Ok(());
            }
            submit(manager, &mut editor, global).await?;
            output::success(global, &format!("Site '{id}' updated"));
            Ok(())
        }

        SitesCommand::Set { id, assignments } => {
            let mut editor = manager.edit_site(&id).await?;
            for assignment in &assignments {
                let (key, value) = util::parse_assignment(assignment)?;
                editor.set_field(key, value)?;
            }
            if !editor.is_dirty() {
                output::note(global, "No changes");
                return Ok(());
            }
            submit(manager, &mut editor, global).await?;
            output::success(global, &format!("Site '{id}' updated"));
            Ok(())
        }

        SitesCommand::Delete { id } => {
            let confirmed = util::confirm(
                &format!("Delete site '{id}'? This cannot be undone."),
                global.yes,
                "sites delete",
            )?;
            match manager.delete_site(&id, |_| confirmed).await? {
                DeleteOutcome::Deleted => output::success(global, &format!("Site '{id}' deleted")),
                DeleteOutcome::Cancelled => output::note(global, "Cancelled"),
            }
            Ok(())
        }

        SitesCommand::Fetch { ids } => fetch(manager, ids, global).await,

        SitesCommand::Url { id } => {
            output::print_output(&manager.subscription_url(&id), global.quiet);
            Ok(())
        }

        SitesCommand::Content { id, no_cache } => {
            let bar = util::spinner(global, format!("Loading subscription for '{id}'…"));
            let result = manager.subscription_content(&id, !no_cache).await;
            bar.finish_and_clear();
            output::print_output(&result?, global.quiet);
            Ok(())
        }
    }
}

/// Run the chosen interactive view. `false` means nothing was entered.
fn interactive_edit(
    editor: &mut Editor<SiteConfig>,
    how: &EditArgs,
    global: &GlobalOpts,
) -> Result<bool, CliError> {
    if how.form {
        edit::prompt_form(editor, global)?;
        Ok(true)
    } else {
        edit::edit_in_editor(editor, global)
    }
}

async fn submit(
    manager: &SiteManager,
    editor: &mut Editor<SiteConfig>,
    global: &GlobalOpts,
) -> Result<SiteConfig, CliError> {
    let bar = util::spinner(global, "Saving…");
    let result = manager.submit(editor).await;
    bar.finish_and_clear();
    Ok(result?)
}

// ── Fetch ───────────────────────────────────────────────────────────

/// Fetch every distinct id concurrently, one spinner each.
async fn fetch(
    manager: &SiteManager,
    mut ids: Vec<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut seen = HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
    let total = ids.len();

    let progress = if global.quiet {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    } else {
        MultiProgress::new()
    };

    let runs = ids.iter().map(|id| {
        let bar = progress.add(ProgressBar::new_spinner());
        bar.set_style(util::spinner_style());
        bar.set_prefix(id.clone());
        bar.set_message("fetching…");
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        async move {
            let result = manager.fetch(id).await;
            bar.finish_and_clear();
            (id.clone(), result)
        }
    });
    let results = join_all(runs).await;

    let mut records = Vec::new();
    let mut errors = Vec::new();
    for (id, result) in results {
        match result {
            Ok(summary) => {
                output::success(global, &format!("{id}: {summary}"));
                records.push(FetchRecord { id, summary });
            }
            Err(e) => {
                output::failure(global, &format!("{id}: {e}"));
                errors.push(e);
            }
        }
    }

    if !records.is_empty() {
        let out = output::render_list(
            &global.output,
            &records,
            |r| FetchRow::from(r),
            |r| r.id.clone(),
        );
        output::print_output(&out, global.quiet);
    }

    match errors.len() {
        0 => Ok(()),
        1 if total == 1 => Err(errors.remove(0).into()),
        failed => Err(CliError::FetchesFailed { failed, total }),
    }
}
