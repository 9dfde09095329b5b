use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::db::Store;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

/*
    GET /health
*/
pub async fn health_check<S: Store>(store: web::Data<S>) -> impl Responder {
    let database = check_database(store.get_ref()).await;

    let status = if database.status == "ok" { "ok" } else { "degraded" };
    let mut services = HashMap::new();
    services.insert("database".to_string(), database);

    HttpResponse::Ok().json(HealthStatus {
        status: status.to_string(),
        services,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn check_database<S: Store>(store: &S) -> ServiceStatus {
    match store.ping().await {
        Ok(()) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("Connected successfully".to_string()),
        },
        Err(e) => {
            log::error!("Database health check failed: {}", e);
            ServiceStatus {
                status: "error".to_string(),
                details: Some("Failed to reach the database".to_string()),
            }
        }
    }
}
