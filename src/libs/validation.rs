//! Boundary validation.
//!
//! Raw command input is checked here and turned into the typed values the
//! core works with. Nothing past this module sees an unchecked title, an
//! out-of-range point value, or a half-specified recurrence.

use crate::libs::error::{ChoreError, ChoreResult};
use crate::libs::recurrence::{Recurrence, RecurrenceType};
use crate::libs::task::{TaskCreation, TaskDraft};
use crate::libs::user::NewUser;

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 255;
pub const TITLE_MAX_LEN: usize = 255;
pub const DESCRIPTION_MAX_LEN: usize = 1000;
pub const POINTS_MIN: i64 = 1;
pub const POINTS_MAX: i64 = 100;
pub const QUERY_MAX_LEN: usize = 100;

/// Unvalidated task creation request as it arrives from the command line.
#[derive(Debug, Clone, Default)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub points: i64,
    pub assigned_to: i64,
    pub is_recurring: bool,
    pub recurrence_type: Option<String>,
    pub recurrence_value: Option<i64>,
}

impl TaskInput {
    /// Validates every field and folds the recurrence fields into a
    /// [`TaskCreation`] variant.
    ///
    /// Recurrence fields are required when `is_recurring` is set and ignored
    /// otherwise.
    pub fn validate(self) -> ChoreResult<TaskDraft> {
        let title = title(&self.title)?;
        let description = description(self.description.as_deref())?;
        let points = points(self.points)?;
        let assigned_to = id("assigned_to", self.assigned_to)?;

        let creation = if self.is_recurring {
            let kind = self
                .recurrence_type
                .as_deref()
                .ok_or_else(|| ChoreError::validation("recurrence_type is required for recurring tasks"))?
                .parse::<RecurrenceType>()?;
            let value = self
                .recurrence_value
                .ok_or_else(|| ChoreError::validation("recurrence_value is required for recurring tasks"))?;
            TaskCreation::Recurring(recurrence(kind, value)?)
        } else {
            TaskCreation::Simple
        };

        Ok(TaskDraft {
            title,
            description,
            points,
            assigned_to,
            creation,
        })
    }
}

pub fn new_user(name: &str, email: &str) -> ChoreResult<NewUser> {
    Ok(NewUser {
        name: user_name(name)?,
        email: self::email(email)?,
    })
}

/// 2–50 characters, letters and spaces only.
pub fn user_name(raw: &str) -> ChoreResult<String> {
    let name = raw.trim();
    let len = name.chars().count();
    if len < NAME_MIN_LEN {
        return Err(ChoreError::validation(format!("Name must be at least {} characters long", NAME_MIN_LEN)));
    }
    if len > NAME_MAX_LEN {
        return Err(ChoreError::validation(format!("Name cannot exceed {} characters", NAME_MAX_LEN)));
    }
    if !name.chars().all(|c| c.is_alphabetic() || c == ' ') {
        return Err(ChoreError::validation("Name can only contain letters and spaces"));
    }
    Ok(name.to_string())
}

/// Structural email check; stored lowercased so uniqueness is case-insensitive.
pub fn email(raw: &str) -> ChoreResult<String> {
    let email = raw.trim().to_lowercase();
    if email.len() > EMAIL_MAX_LEN {
        return Err(ChoreError::validation(format!("Email cannot exceed {} characters", EMAIL_MAX_LEN)));
    }
    let invalid = || ChoreError::validation("Please provide a valid email address");
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty());
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(email)
}

pub fn title(raw: &str) -> ChoreResult<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ChoreError::validation("Title is required"));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(ChoreError::validation(format!("Title cannot exceed {} characters", TITLE_MAX_LEN)));
    }
    Ok(title.to_string())
}

/// Empty descriptions are stored as `None`.
pub fn description(raw: Option<&str>) -> ChoreResult<Option<String>> {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(ChoreError::validation(format!(
            "Description cannot exceed {} characters",
            DESCRIPTION_MAX_LEN
        )));
    }
    Ok(Some(text.to_string()))
}

pub fn points(value: i64) -> ChoreResult<i64> {
    if !(POINTS_MIN..=POINTS_MAX).contains(&value) {
        return Err(ChoreError::validation(format!(
            "Points must be between {} and {}, got {}",
            POINTS_MIN, POINTS_MAX, value
        )));
    }
    Ok(value)
}

pub fn recurrence(kind: RecurrenceType, value: i64) -> ChoreResult<Recurrence> {
    let value = u32::try_from(value).map_err(|_| ChoreError::validation(format!("Invalid recurrence value {}", value)))?;
    Recurrence::new(kind, value)
}

pub fn id(field: &str, value: i64) -> ChoreResult<i64> {
    if value <= 0 {
        return Err(ChoreError::validation(format!("{} must be a positive id, got {}", field, value)));
    }
    Ok(value)
}

/// Suggestion search text: trimmed, 1–100 characters.
pub fn query(raw: &str) -> ChoreResult<String> {
    let query = raw.trim();
    if query.is_empty() {
        return Err(ChoreError::validation("Search query is required"));
    }
    if query.chars().count() > QUERY_MAX_LEN {
        return Err(ChoreError::validation(format!("Search query cannot exceed {} characters", QUERY_MAX_LEN)));
    }
    Ok(query.to_string())
}
