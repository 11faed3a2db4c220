use super::Context;
use crate::{
    libs::{accounts::Accounts, messages::Message, validation, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// Register a new member; the first one becomes administrator
    Register {
        /// Display name, letters and spaces
        name: String,
        email: String,
    },
    /// Approved members ranked by points
    List,
    /// Members waiting for approval (admin)
    Pending,
    /// Every member with approval details (admin)
    All,
    /// Approve a member (admin)
    Approve { id: i64 },
    /// Revoke a member's approval (admin)
    Revoke { id: i64 },
    /// Delete a member (admin)
    Delete { id: i64 },
    /// Zero every member's points and clear the history (admin)
    ResetScores {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(ctx: &Context, args: UserArgs) -> Result<()> {
    let db = ctx.open_db()?;
    let accounts = Accounts::new(&db.conn);

    match args.command {
        UserCommand::Register { name, email } => {
            let new_user = validation::new_user(&name, &email)?;
            let registration = accounts.register(&new_user)?;
            if registration.first_user {
                msg_success!(Message::AdminRegistered(registration.user.name.clone()));
            } else {
                msg_success!(Message::UserRegistered(registration.user.name.clone()));
                msg_info!(Message::UserPendingApproval);
            }
            msg_print!(format!("id: {}", registration.user.id));
        }
        UserCommand::List => {
            let users = accounts.leaderboard(ctx.actor()?)?;
            if users.is_empty() {
                msg_info!(Message::NoUsersFound);
                return Ok(());
            }
            msg_print!(Message::LeaderboardHeader, true);
            View::leaderboard(&users)?;
        }
        UserCommand::Pending => {
            let users = accounts.pending(ctx.actor()?)?;
            if users.is_empty() {
                msg_info!(Message::NoPendingUsers);
                return Ok(());
            }
            msg_print!(Message::PendingUsersHeader, true);
            View::pending_users(&users)?;
        }
        UserCommand::All => {
            let users = accounts.all(ctx.actor()?)?;
            msg_print!(Message::AllUsersHeader, true);
            View::users(&users)?;
        }
        UserCommand::Approve { id } => {
            let user = accounts.approve(ctx.actor()?, validation::id("id", id)?)?;
            msg_success!(Message::UserApproved(user.name));
        }
        UserCommand::Revoke { id } => {
            let user = accounts.revoke(ctx.actor()?, validation::id("id", id)?)?;
            msg_success!(Message::UserRevoked(user.name));
        }
        UserCommand::Delete { id } => {
            accounts.delete(ctx.actor()?, validation::id("id", id)?)?;
            msg_success!(Message::UserDeleted(id));
        }
        UserCommand::ResetScores { yes } => {
            let actor = ctx.actor()?;
            let confirmed = yes
                || Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::ConfirmResetScores.to_string())
                    .default(false)
                    .interact()?;
            if !confirmed {
                msg_info!(Message::ResetCancelled);
                return Ok(());
            }
            let count = accounts.reset_scores(actor)?;
            msg_success!(Message::ScoresReset(count));
        }
    }

    Ok(())
}
