use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use actix_cors::Cors;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use mealfit_core::{Concept, Error, SuitabilityResult};
use mealfit_store::ArtifactStore;

/// Hard cap on results per request.
pub const MAX_COUNT: usize = 100;
/// Results returned when the request leaves `count` unset.
pub const DEFAULT_COUNT: usize = 15;

#[derive(Deserialize)]
struct RecommendRequest {
    concept: String,
    #[serde(default = "default_count")]
    count: usize,
    #[serde(default)]
    items: Vec<String>,
}

fn default_count() -> usize {
    DEFAULT_COUNT
}

#[derive(Serialize)]
struct RecommendResponse {
    concept: String,
    count: usize,
    items: Vec<SuitabilityResult>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(store: Arc<ArtifactStore>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(store.clone()))
                .route("/menus/recommend", web::post().to(recommend))
                .route("/menus/concepts", web::get().to(list_concepts))
                .route("/healthz", web::get().to(healthz))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

async fn recommend(
    store: web::Data<Arc<ArtifactStore>>,
    request: web::Json<RecommendRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();

    if request.count == 0 || request.count > MAX_COUNT {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("count must be between 1 and {MAX_COUNT}")
        })));
    }

    match store.recommend(&request.concept, &request.items, request.count) {
        Ok(items) => Ok(HttpResponse::Ok().json(RecommendResponse {
            concept: request.concept,
            count: items.len(),
            items,
        })),
        Err(Error::NotReady) => Ok(HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "error": "Catalog is still loading"
        }))),
        Err(Error::UnknownConcept(name)) => Ok(HttpResponse::BadRequest().json(
            serde_json::json!({
                "error": format!("Unknown concept: {name}")
            }),
        )),
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": e.to_string()
        }))),
    }
}

async fn list_concepts(_store: web::Data<Arc<ArtifactStore>>) -> ActixResult<HttpResponse> {
    let concepts: Vec<&str> = Concept::ALL.iter().map(|c| c.as_str()).collect();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "concepts": concepts })))
}

async fn healthz(store: web::Data<Arc<ArtifactStore>>) -> ActixResult<HttpResponse> {
    let ready = store.ready();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": if ready { "ready" } else { "loading" },
        "catalog_size": store.catalog_size(),
    })))
}
