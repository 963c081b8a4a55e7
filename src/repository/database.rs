use chrono::{SecondsFormat, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::error::ApiError;
use crate::models::task::{completed_to_flag, NewTask, NewTaskRow, Task, TaskRow, TaskUpdate};
use crate::repository::schema::{tasks, CREATE_TASKS_TABLE};

const BUSY_TIMEOUT_MS: u32 = 5000;

/// Handle to the SQLite file. Holds no open connection; every operation
/// opens its own and drops it before returning.
#[derive(Debug, Clone)]
pub struct Database {
    database_url: String,
}

/// Current time in the fixed wire format, e.g. `2024-05-01T09:15:02.123456Z`.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl Database {
    pub fn new(database_url: impl Into<String>) -> Self {
        Database {
            database_url: database_url.into(),
        }
    }

    pub fn connection(&self) -> Result<SqliteConnection, ApiError> {
        let mut conn = SqliteConnection::establish(&self.database_url)?;
        // concurrent writers wait on the file lock instead of failing fast
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
        Ok(conn)
    }

    /// Creates the `tasks` table if it is missing. Safe to run on every start.
    pub fn init_schema(&self) -> Result<(), ApiError> {
        let conn = &mut self.connection()?;
        conn.batch_execute(CREATE_TASKS_TABLE)?;
        Ok(())
    }

    pub fn create_task(&self, task: NewTask) -> Result<Task, ApiError> {
        let conn = &mut self.connection()?;
        let now = timestamp();
        let row = NewTaskRow {
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            completed: completed_to_flag(false),
            created_at: now.clone(),
            updated_at: now,
        };
        let created = diesel::insert_into(tasks::table)
            .values(&row)
            .returning(TaskRow::as_returning())
            .get_result::<TaskRow>(conn)?;
        Ok(created.into())
    }

    pub fn get_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let conn = &mut self.connection()?;
        let rows = tasks::table
            .order(tasks::id.asc())
            .select(TaskRow::as_select())
            .load::<TaskRow>(conn)?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    pub fn get_task_by_id(&self, task_id: i32) -> Result<Option<Task>, ApiError> {
        let conn = &mut self.connection()?;
        let row = tasks::table
            .find(task_id)
            .select(TaskRow::as_select())
            .first::<TaskRow>(conn)
            .optional()?;
        Ok(row.map(Task::from))
    }

    /// Applies the fields present in `update` and always refreshes
    /// `updated_at`, so an empty update acts as a touch.
    pub fn update_task_by_id(
        &self,
        task_id: i32,
        update: TaskUpdate,
    ) -> Result<Option<Task>, ApiError> {
        let conn = &mut self.connection()?;
        let changes = update.into_changeset(timestamp());
        let row = diesel::update(tasks::table.find(task_id))
            .set(&changes)
            .returning(TaskRow::as_returning())
            .get_result::<TaskRow>(conn)
            .optional()?;
        Ok(row.map(Task::from))
    }

    /// Returns whether a row existed and was removed.
    pub fn delete_task_by_id(&self, task_id: i32) -> Result<bool, ApiError> {
        let conn = &mut self.connection()?;
        let count = diesel::delete(tasks::table.find(task_id)).execute(conn)?;
        Ok(count > 0)
    }
}
