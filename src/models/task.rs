use diesel::{AsChangeset, Insertable, Queryable, Selectable};
use serde::{Deserialize, Deserializer, Serialize};

use crate::repository::schema::tasks;

/// A task as it is returned to clients.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A row of the `tasks` table. `completed` is kept as the stored 0/1 flag.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TaskRow {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub completed: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub completed: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial update. `None` leaves a column untouched, `Some(None)` writes NULL.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<String>>,
    pub completed: Option<i32>,
    pub updated_at: String,
}

pub fn completed_to_flag(completed: bool) -> i32 {
    i32::from(completed)
}

pub fn flag_to_completed(flag: i32) -> bool {
    flag != 0
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            completed: flag_to_completed(row.completed),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Body of `POST /api/tasks`. Unknown fields are ignored.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

/// Body of `PUT /api/tasks/{id}`. Every field is optional; an explicit
/// `null` is distinguished from an absent field.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
    pub completed: Option<bool>,
}

/// Creation input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

/// Update input that passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<String>>,
    pub completed: Option<bool>,
}

impl TaskUpdate {
    pub fn into_changeset(self, updated_at: String) -> TaskChangeset {
        TaskChangeset {
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            completed: self.completed.map(completed_to_flag),
            updated_at,
        }
    }
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_maps_completed_flag_to_bool() {
        let row = TaskRow {
            id: 1,
            title: "Buy milk".to_string(),
            description: None,
            due_date: Some("2024-05-01".to_string()),
            completed: 1,
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000000Z".to_string(),
        };
        let task = Task::from(row);
        assert!(task.completed);
        assert_eq!(task.due_date.as_deref(), Some("2024-05-01"));
        assert!(!flag_to_completed(0));
        assert_eq!(completed_to_flag(true), 1);
        assert_eq!(completed_to_flag(false), 0);
    }

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let request: UpdateTaskRequest =
            serde_json::from_str(r#"{"description": null, "completed": true}"#).unwrap();
        assert_eq!(request.description, Some(None));
        assert_eq!(request.due_date, None);
        assert_eq!(request.title, None);
        assert_eq!(request.completed, Some(true));
    }

    #[test]
    fn test_requests_ignore_unknown_fields() {
        let request: CreateTaskRequest =
            serde_json::from_str(r#"{"title": "Write report", "priority": "high"}"#).unwrap();
        assert_eq!(request.title.as_deref(), Some("Write report"));
    }

    #[test]
    fn test_task_serializes_missing_optionals_as_null() {
        let task = Task {
            id: 3,
            title: "Walk dog".to_string(),
            description: None,
            due_date: None,
            completed: false,
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000000Z".to_string(),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert!(value["description"].is_null());
        assert!(value["due_date"].is_null());
        assert_eq!(value["completed"], false);
    }
}
