//! Command dispatch: bridges CLI args -> panel API calls -> output formatting.

pub mod clients;
pub mod config_cmd;
pub mod database;
pub mod inbounds;
pub mod util;

use xuictl_api::Api;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a panel-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, api: &Api, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Inbounds(args) => inbounds::handle(api, args, global).await,
        Command::Clients(args) => clients::handle(api, args, global).await,
        Command::Db(args) => database::handle(api, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
