//! HTTP surface
//!
//! `GET /api/search?q=<query>` returns the aggregated records as a JSON
//! array. Caller errors map to 400, source failures to 500, both with an
//! `{"error": "..."}` body.

use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::orchestrator::Aggregator;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[get("/api/search")]
pub async fn api_search(
    aggregator: web::Data<Aggregator>,
    params: web::Query<SearchParams>,
) -> impl Responder {
    let query = params.q.as_deref().unwrap_or_default();
    info!(query = %query, "Received search query");

    match aggregator.search(query).await {
        Ok(products) => {
            info!("Returning {} products for query: {}", products.len(), query);
            HttpResponse::Ok().json(products)
        }
        Err(e) if e.is_client_error() => {
            HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))
        }
        Err(e) => {
            error!(
                partial = e.partial_results().len(),
                "Error during search: {}", e
            );
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

#[get("/healthz")]
pub async fn healthz() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

/// Register every route on an `App`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_search).service(healthz);
}

/// Serve until the process is stopped
///
/// Each request runs its own search; the aggregator holds no per-request
/// state, so sharing it across workers is safe.
pub async fn serve(aggregator: Aggregator, bind: &str) -> std::io::Result<()> {
    let data = web::Data::new(aggregator);

    info!("Starting server on http://{}", bind);
    HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
        .bind(bind)?
        .run()
        .await
}
