use actix_web::{get, web, App, HttpResponse, HttpServer, Responder, Result};
use anyhow::Context;
use serde::Serialize;
use serde_json::json;

use crate::config::Config;
use crate::error::ErrorBody;
use crate::repository::database::Database;

mod api;
mod config;
mod error;
mod models;
mod repository;
mod telemetry;
mod validation;

#[derive(Serialize)]
pub struct Response {
    pub message: String,
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Task Management API",
        "endpoints": {
            "create_task": "POST /api/tasks",
            "list_tasks": "GET /api/tasks",
            "get_task": "GET /api/tasks/<id>",
            "update_task": "PUT /api/tasks/<id>",
            "delete_task": "DELETE /api/tasks/<id>"
        }
    }))
}

#[get("/health")]
async fn healthcheck() -> impl Responder {
    let response = Response {
        message: "Everything is working fine".to_string(),
    };
    HttpResponse::Ok().json(response)
}

async fn not_found() -> Result<HttpResponse> {
    let response = ErrorBody {
        error: "not found".to_string(),
    };
    Ok(HttpResponse::NotFound().json(response))
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(api::tasks::config)
        .service(index)
        .service(healthcheck)
        .default_service(web::route().to(not_found));
}

/// Prepares the store before the server accepts requests.
fn setup(config: &Config) -> anyhow::Result<web::Data<Database>> {
    let db = Database::new(config.database_url.clone());
    db.init_schema()
        .with_context(|| format!("failed to initialise tasks table in {}", config.database_url))?;
    Ok(web::Data::new(db))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init()?;
    let config = Config::new()?;
    let app_data = setup(&config)?;

    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database_url,
        "starting server"
    );
    HttpServer::new(move || {
        App::new()
            .app_data(app_data.clone())
            .configure(routes)
            .wrap(actix_web::middleware::Logger::default())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}
