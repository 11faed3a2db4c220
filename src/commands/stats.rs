use super::Context;
use crate::{
    libs::{household::Household, messages::Message, stats::StatsWindow, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::Utc;
use clap::{Args, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Window {
    /// Last 7 days
    Weekly,
    /// Last 30 days
    Monthly,
}

impl From<Window> for StatsWindow {
    fn from(window: Window) -> Self {
        match window {
            Window::Weekly => StatsWindow::Weekly,
            Window::Monthly => StatsWindow::Monthly,
        }
    }
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[arg(value_enum)]
    window: Window,
}

pub fn cmd(ctx: &Context, args: StatsArgs) -> Result<()> {
    let db = ctx.open_db()?;
    let window = StatsWindow::from(args.window);
    let now = Utc::now();

    let totals = Household::new(&db.conn).stats_at(ctx.actor()?, window, now)?;
    if totals.is_empty() {
        msg_info!(Message::NoStatsFound);
        return Ok(());
    }

    let since = window.since(now).format("%Y-%m-%d").to_string();
    msg_print!(Message::StatsHeader(window.to_string(), since), true);
    View::stats(&totals)?;
    Ok(())
}
