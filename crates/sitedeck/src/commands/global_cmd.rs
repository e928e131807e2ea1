//! Global configuration command handlers.

use sitedeck_core::{Editor, FormDescriptor, GlobalConfig, SiteManager};

use crate::cli::{GlobalArgs, GlobalCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::{edit, util};

pub async fn handle(
    manager: &SiteManager,
    args: GlobalArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let session = manager.session();
    match args.command {
        GlobalCommand::Show { reveal } => {
            let config = session.global_config().await?;
            // Only the table rendering is driven by the schema.
            let form = if matches!(global.output, OutputFormat::Table) {
                session.global_form().await?
            } else {
                FormDescriptor::default()
            };
            let out = output::render_single(
                &global.output,
                &util::mask_global(&config, reveal),
                |_| util::form_detail(config.as_ref(), &form, reveal, &[]),
                |_| "global".into(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GlobalCommand::Edit { edit: how } => {
            let (mut editor, entered) = if how.form {
                let mut editor = session.edit_global_form().await?;
                edit::prompt_form(&mut editor, global)?;
                (editor, true)
            } else {
                let mut editor = session.edit_global().await?;
                let entered = edit::edit_in_editor(&mut editor, global)?;
                (editor, entered)
            };
            save_if_dirty(manager, &mut editor, entered, global).await
        }

        GlobalCommand::Set { assignments } => {
            let mut editor = session.edit_global_form().await?;
            for assignment in &assignments {
                let (key, value) = util::parse_assignment(assignment)?;
                editor.set_field(key, value)?;
            }
            save_if_dirty(manager, &mut editor, true, global).await
        }
    }
}

async fn save_if_dirty(
    manager: &SiteManager,
    editor: &mut Editor<GlobalConfig>,
    entered: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !entered || !editor.is_dirty() {
        output::note(global, "No changes");
        return Ok(());
    }
    let bar = util::spinner(global, "Saving…");
    let result = manager.session().save_global(editor).await;
    bar.finish_and_clear();
    result?;
    output::success(global, "Global configuration saved");
    Ok(())
}
