use super::Context;
use crate::{
    libs::{household::Household, messages::Message, validation, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct RecurringArgs {
    #[command(subcommand)]
    command: RecurringCommand,
}

#[derive(Debug, Subcommand)]
enum RecurringCommand {
    /// Recurring task definitions, newest first
    List {
        /// Include paused definitions
        #[arg(short, long)]
        all: bool,
    },
    /// Pause or resume a definition
    Toggle { id: i64 },
}

pub fn cmd(ctx: &Context, args: RecurringArgs) -> Result<()> {
    let db = ctx.open_db()?;
    let household = Household::new(&db.conn);

    match args.command {
        RecurringCommand::List { all } => {
            let definitions = household.recurring(ctx.actor()?, all)?;
            if definitions.is_empty() {
                msg_info!(Message::NoRecurringTasksFound);
                return Ok(());
            }
            msg_print!(Message::RecurringTasksHeader, true);
            View::recurring(&definitions)?;
        }
        RecurringCommand::Toggle { id } => {
            let definition = household.toggle_recurring(ctx.actor()?, validation::id("id", id)?)?;
            if definition.is_active {
                msg_success!(Message::RecurringTaskResumed(definition.title));
            } else {
                msg_success!(Message::RecurringTaskPaused(definition.title));
            }
        }
    }

    Ok(())
}
