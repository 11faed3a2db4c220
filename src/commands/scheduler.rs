use super::Context;
use crate::{
    libs::{config::Config, daemon, generator::Generator, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct SchedulerArgs {
    #[command(subcommand)]
    command: SchedulerCommand,
}

#[derive(Debug, Subcommand)]
enum SchedulerCommand {
    /// Run the scheduler in the foreground
    Run {
        /// Run a single sweep and exit
        #[arg(long)]
        once: bool,
    },
    /// Start the scheduler in the background
    Start,
    /// Stop the background scheduler
    Stop,
}

pub async fn cmd(ctx: &Context, args: SchedulerArgs) -> Result<()> {
    match args.command {
        SchedulerCommand::Run { once: true } => {
            let config = Config::read()?.scheduler.unwrap_or_default();
            let db = ctx.open_db()?;
            let report = Generator::new(&db.conn).with_debounce(config.debounce()).sweep()?;
            msg_success!(Message::SweepCompleted(
                report.examined,
                report.generated.len(),
                report.skipped,
                report.failed
            ));
            Ok(())
        }
        SchedulerCommand::Run { once: false } => daemon::run_with_signal_handling(ctx.open_db()?).await,
        SchedulerCommand::Start => daemon::spawn(ctx.db.as_deref()),
        SchedulerCommand::Stop => daemon::stop(),
    }
}
