//! Command dispatch: bridges CLI args -> `SiteManager` -> output formatting.

pub mod config_cmd;
pub mod edit;
pub mod global_cmd;
pub mod schema;
pub mod sites;
pub mod util;

use sitedeck_core::SiteManager;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a console-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    manager: &SiteManager,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Sites(args) => sites::handle(manager, args, global).await,
        Command::Global(args) => global_cmd::handle(manager, args, global).await,
        Command::Schema(args) => schema::handle(manager, args, global).await,
        // Handled in main before a manager exists.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
