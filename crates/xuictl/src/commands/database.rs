//! Database command handlers.

use xuictl_api::Api;

use crate::cli::{DbArgs, DbCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(api: &Api, args: DbArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        DbCommand::Export => {
            api.database.export().await?;
            output::print_status(
                "Backup requested; the panel delivers it to its configured admins",
                global.quiet,
            );
            Ok(())
        }
    }
}
