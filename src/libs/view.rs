use crate::libs::stats::UserPoints;
use crate::libs::task::{RecurringTaskView, TaskSuggestion, TaskView};
use crate::libs::user::{User, UserView};
use anyhow::Result;
use chrono::{DateTime, Utc};
use prettytable::{row, Table};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct View {}

impl View {
    pub fn leaderboard(users: &[User]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["#", "ID", "NAME", "POINTS", "ROLE"]);
        for (rank, user) in users.iter().enumerate() {
            table.add_row(row![rank + 1, user.id, user.name, r->user.points, user.role]);
        }
        table.printstd();

        Ok(())
    }

    pub fn pending_users(users: &[User]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "EMAIL", "REGISTERED"]);
        for user in users {
            table.add_row(row![user.id, user.name, user.email, format_date(user.created_at)]);
        }
        table.printstd();

        Ok(())
    }

    pub fn users(users: &[UserView]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "EMAIL", "ROLE", "POINTS", "APPROVED", "APPROVED BY"]);
        for view in users {
            let user = &view.user;
            let approved = match user.approved_at {
                Some(at) if user.is_approved => format_date(at),
                _ if user.is_approved => "yes".to_string(),
                _ => "pending".to_string(),
            };
            table.add_row(row![
                user.id,
                user.name,
                user.email,
                user.role,
                r->user.points,
                approved,
                view.approved_by_name.as_deref().unwrap_or("-")
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn tasks(tasks: &[TaskView]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "POINTS", "ASSIGNED", "REPEATS", "CREATED", "DONE BY", "DONE AT"]);
        for view in tasks {
            let task = &view.task;
            let repeats = task.recurrence().map(|r| r.to_string()).unwrap_or_default();
            table.add_row(row![
                task.id,
                task.title,
                r->task.points,
                view.assigned_to_name.as_deref().unwrap_or("-"),
                repeats,
                format_date(task.created_at),
                view.completed_by_name.as_deref().unwrap_or(""),
                task.completed_at.map(format_date).unwrap_or_default()
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn recurring(definitions: &[RecurringTaskView]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "POINTS", "REPEATS", "ASSIGNED", "ACTIVE", "LAST GENERATED"]);
        for view in definitions {
            let definition = &view.task;
            table.add_row(row![
                definition.id,
                definition.title,
                r->definition.points,
                definition.recurrence(),
                view.assigned_to_name.as_deref().unwrap_or("-"),
                if definition.is_active { "yes" } else { "no" },
                definition.last_generated.map(format_date).unwrap_or_else(|| "never".to_string())
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn stats(totals: &[UserPoints]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["#", "NAME", "POINTS"]);
        for (rank, entry) in totals.iter().enumerate() {
            table.add_row(row![rank + 1, entry.name, r->entry.points]);
        }
        table.printstd();

        Ok(())
    }

    pub fn suggestions(suggestions: &[TaskSuggestion]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["TITLE", "POINTS", "USED", "LAST USED"]);
        for suggestion in suggestions {
            table.add_row(row![
                suggestion.title,
                r->suggestion.points,
                r->suggestion.usage_count,
                format_date(suggestion.last_used)
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn migrations(history: &[(u32, String, String)]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["VERSION", "NAME", "APPLIED"]);
        for (version, name, applied_at) in history {
            table.add_row(row![version, name, applied_at]);
        }
        table.printstd();

        Ok(())
    }
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format(DATE_FORMAT).to_string()
}
