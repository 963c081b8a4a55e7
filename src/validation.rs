//! Input checks for task payloads. Pure functions, no store access.

use chrono::NaiveDate;

use crate::error::ApiError;
use crate::models::task::{CreateTaskRequest, NewTask, TaskUpdate, UpdateTaskRequest};

pub const TITLE_REQUIRED: &str = "title is required";
pub const INVALID_DUE_DATE: &str = "invalid due_date format";

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_create(request: CreateTaskRequest) -> Result<NewTask, ApiError> {
    let title = required_title(request.title)?;
    if let Some(due_date) = &request.due_date {
        check_due_date(due_date)?;
    }
    Ok(NewTask {
        title,
        description: request.description,
        due_date: request.due_date,
    })
}

pub fn validate_update(request: UpdateTaskRequest) -> Result<TaskUpdate, ApiError> {
    let title = match request.title {
        Some(title) => Some(required_title(title)?),
        None => None,
    };
    if let Some(Some(due_date)) = &request.due_date {
        check_due_date(due_date)?;
    }
    Ok(TaskUpdate {
        title,
        description: request.description,
        due_date: request.due_date,
        completed: request.completed,
    })
}

fn required_title(title: Option<String>) -> Result<String, ApiError> {
    match title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => Ok(title.to_string()),
        _ => Err(ApiError::Validation(TITLE_REQUIRED.to_string())),
    }
}

/// Accepts calendar dates in `YYYY-MM-DD` form only.
fn check_due_date(due_date: &str) -> Result<(), ApiError> {
    // chrono tolerates signs, padding and unpadded fields; only the canonical form round-trips
    match NaiveDate::parse_from_str(due_date, DUE_DATE_FORMAT) {
        Ok(date) if date.format(DUE_DATE_FORMAT).to_string() == due_date => Ok(()),
        _ => Err(ApiError::Validation(INVALID_DUE_DATE.to_string())),
    }
}
