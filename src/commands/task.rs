use super::Context;
use crate::{
    db::users::Users,
    libs::{
        error::ChoreError,
        household::{CreatedTask, Household},
        messages::Message,
        validation::{self, TaskInput},
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: TaskCommand,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Create a one-off or recurring task
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Points awarded on completion (1-100)
        #[arg(short, long)]
        points: i64,
        /// Member the task is assigned to
        #[arg(short, long)]
        assign: i64,
        /// Repeat every COUNT days, weeks or months
        #[arg(long, num_args = 2, value_names = ["COUNT", "PERIOD"])]
        every: Option<Vec<String>>,
    },
    /// All tasks, newest first
    List,
    /// Complete a task and collect its points
    Complete {
        id: i64,
        /// Member credited with the completion; defaults to the acting member
        #[arg(long)]
        by: Option<i64>,
    },
    /// Suggest titles from earlier tasks
    Suggest { query: String },
}

pub fn cmd(ctx: &Context, args: TaskArgs) -> Result<()> {
    let db = ctx.open_db()?;
    let household = Household::new(&db.conn);

    match args.command {
        TaskCommand::Create {
            title,
            description,
            points,
            assign,
            every,
        } => {
            let input = task_input(title, description, points, assign, every)?;
            let draft = input.validate()?;
            match household.create_task(ctx.actor()?, draft)? {
                CreatedTask::Simple(task) => {
                    msg_success!(Message::TaskCreated(task.id, task.title));
                }
                CreatedTask::Recurring { definition, first } => {
                    msg_success!(Message::RecurringTaskCreated(
                        definition.id,
                        definition.title.clone(),
                        definition.recurrence().to_string()
                    ));
                    msg_success!(Message::TaskCreated(first.id, first.title));
                }
            }
        }
        TaskCommand::List => {
            let tasks = household.tasks(ctx.actor()?)?;
            if tasks.is_empty() {
                msg_info!(Message::NoTasksFound);
                return Ok(());
            }
            msg_print!(Message::TasksHeader, true);
            View::tasks(&tasks)?;
        }
        TaskCommand::Complete { id, by } => {
            let completion = household.complete_task(ctx.actor()?, validation::id("id", id)?, by)?;
            let name = Users::new(&db.conn)
                .get(completion.completed_by)?
                .map(|user| user.name)
                .unwrap_or_else(|| completion.completed_by.to_string());
            msg_success!(Message::TaskCompleted(name, completion.points));
            if let Some(next) = completion.next_task {
                msg_info!(Message::NextOccurrenceQueued(
                    next.id,
                    next.created_at.format("%Y-%m-%d %H:%M").to_string()
                ));
            }
        }
        TaskCommand::Suggest { query } => {
            let suggestions = household.suggestions(ctx.actor()?, &query)?;
            if suggestions.is_empty() {
                msg_info!(Message::NoSuggestionsFound(query));
                return Ok(());
            }
            msg_print!(Message::SuggestionsHeader(query), true);
            View::suggestions(&suggestions)?;
        }
    }

    Ok(())
}

fn task_input(
    title: String,
    description: Option<String>,
    points: i64,
    assign: i64,
    every: Option<Vec<String>>,
) -> Result<TaskInput, ChoreError> {
    let mut input = TaskInput {
        title,
        description,
        points,
        assigned_to: assign,
        ..Default::default()
    };

    if let Some(every) = every {
        let [count, period] = every.as_slice() else {
            return Err(ChoreError::validation(Message::RecurrenceValueRequired.to_string()));
        };
        let count = count
            .parse::<i64>()
            .map_err(|_| ChoreError::validation(format!("Invalid recurrence value '{}'", count)))?;
        input.is_recurring = true;
        input.recurrence_type = Some(period.to_lowercase());
        input.recurrence_value = Some(count);
    }

    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::recurrence::RecurrenceType;
    use crate::libs::task::TaskCreation;

    #[test]
    fn every_builds_a_recurring_draft() {
        let every = Some(vec!["2".to_string(), "Weeks".to_string()]);
        let draft = task_input("Mow the lawn".to_string(), None, 10, 1, every)
            .unwrap()
            .validate()
            .unwrap();
        match draft.creation {
            TaskCreation::Recurring(r) => {
                assert_eq!(r.kind, RecurrenceType::Weeks);
                assert_eq!(r.value, 2);
            }
            TaskCreation::Simple => panic!("expected a recurring draft"),
        }
    }

    #[test]
    fn every_rejects_a_non_numeric_count() {
        let every = Some(vec!["often".to_string(), "days".to_string()]);
        let err = task_input("Dishes".to_string(), None, 3, 1, every).unwrap_err();
        assert!(matches!(err, ChoreError::Validation(_)));
    }
}
