use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Serialize;

use crate::error::ApiError;
use crate::models::task::{CreateTaskRequest, UpdateTaskRequest};
use crate::repository::database::Database;
use crate::validation::{validate_create, validate_update};

#[derive(Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

#[post("/tasks")]
pub async fn create_task(
    db: web::Data<Database>,
    payload: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let new_task = validate_create(payload.into_inner())?;
    let task = web::block(move || db.create_task(new_task)).await??;
    tracing::info!(task_id = task.id, "task created");
    Ok(HttpResponse::Created().json(task))
}

#[get("/tasks")]
pub async fn get_tasks(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    let tasks = web::block(move || db.get_tasks()).await??;
    Ok(HttpResponse::Ok().json(tasks))
}

#[get("/tasks/{id}")]
pub async fn get_task_by_id(
    db: web::Data<Database>,
    id: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let task_id = id.into_inner();
    let task = web::block(move || db.get_task_by_id(task_id)).await??;
    match task {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(ApiError::task_not_found(task_id)),
    }
}

#[put("/tasks/{id}")]
pub async fn update_task_by_id(
    db: web::Data<Database>,
    id: web::Path<i32>,
    payload: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let task_id = id.into_inner();
    let update = validate_update(payload.into_inner())?;
    let task = web::block(move || db.update_task_by_id(task_id, update)).await??;
    match task {
        Some(task) => {
            tracing::info!(task_id, completed = task.completed, "task updated");
            Ok(HttpResponse::Ok().json(task))
        }
        None => Err(ApiError::task_not_found(task_id)),
    }
}

#[delete("/tasks/{id}")]
pub async fn delete_task_by_id(
    db: web::Data<Database>,
    id: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let task_id = id.into_inner();
    if !web::block(move || db.delete_task_by_id(task_id)).await?? {
        return Err(ApiError::task_not_found(task_id));
    }
    tracing::info!(task_id, "task deleted");
    Ok(HttpResponse::Ok().json(DeletedResponse {
        message: "task deleted".to_string(),
    }))
}

async fn method_not_allowed() -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("invalid JSON payload: {}", err)).into()
    });
    // a non-numeric id never names a task
    let path_config = web::PathConfig::default()
        .error_handler(|_err, _req| ApiError::NotFound("not found".to_string()).into());

    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .app_data(path_config)
            .service(create_task)
            .service(get_tasks)
            .service(get_task_by_id)
            .service(update_task_by_id)
            .service(delete_task_by_id)
            // reached only when no method-specific resource above matched
            .service(web::resource("/tasks").to(method_not_allowed))
            .service(web::resource("/tasks/{id}").to(method_not_allowed)),
    );
}
