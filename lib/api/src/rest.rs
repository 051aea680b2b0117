use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};
use stockroom_core::{CatalogItem, Error, NewProduct, Recommendation};
use tracing::{debug, error};

use crate::state::AppState;

const DEFAULT_TOP_N: usize = 5;
const DEFAULT_PAGE_LIMIT: usize = 100;
const MAX_PAGE_LIMIT: usize = 1000;

#[derive(Deserialize)]
struct ListQuery {
    offset: Option<usize>,
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct TopNQuery {
    top_n: Option<usize>,
}

#[derive(Serialize)]
struct ProductList {
    total: usize,
    offset: usize,
    limit: usize,
    products: Vec<CatalogItem>,
}

#[derive(Serialize)]
struct RecommendationResponse {
    product_id: String,
    recommendations: Vec<Recommendation>,
}

#[derive(Serialize)]
struct UserRecommendationResponse {
    user_id: String,
    recommendations: Vec<Recommendation>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: AppState, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Register every route; `AppState` must be provided as app data
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/products", web::get().to(list_products))
        .route("/products", web::post().to(create_product))
        .route("/products/{id}", web::get().to(get_product))
        .route("/products/{id}", web::delete().to(delete_product))
        .route("/recommend/{id}", web::get().to(recommend))
        .route("/users/{user_id}/recommendations", web::get().to(recommend_for_user));
}

fn error_response(e: &Error) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        Error::InvalidProduct(_) => HttpResponse::BadRequest().json(body),
        Error::ProductNotFound(_) => HttpResponse::NotFound().json(body),
        _ => {
            error!("Request failed: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// Rebuild the index off the async workers
async fn refresh(state: &AppState) -> Result<(), HttpResponse> {
    let state = state.clone();
    match web::block(move || state.refresh()).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(error_response(&e)),
        Err(e) => {
            error!("Index rebuild task failed: {}", e);
            Err(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Index rebuild failed"
            })))
        }
    }
}

async fn root() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the Stockroom catalog API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "products": "/products",
            "product": "/products/{id}",
            "recommendations": "/recommend/{product_id}",
            "user_recommendations": "/users/{user_id}/recommendations"
        }
    })))
}

async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> ActixResult<HttpResponse> {
    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT);

    match state.storage.list_products() {
        Ok(products) => {
            let total = products.len();
            let products = products.into_iter().skip(offset).take(limit).collect();
            Ok(HttpResponse::Ok().json(ProductList { total, offset, limit, products }))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    match state.storage.require_product(&id) {
        Ok(product) => Ok(HttpResponse::Ok().json(product)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn create_product(
    state: web::Data<AppState>,
    req: web::Json<NewProduct>,
) -> ActixResult<HttpResponse> {
    let product = match state.storage.create_product(req.into_inner()) {
        Ok(product) => product,
        Err(e) => return Ok(error_response(&e)),
    };

    if let Err(response) = refresh(&state).await {
        return Ok(response);
    }
    Ok(HttpResponse::Created().json(product))
}

async fn delete_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    match state.storage.delete_product(&id) {
        Ok(true) => {}
        Ok(false) => return Ok(error_response(&Error::ProductNotFound(id))),
        Err(e) => return Ok(error_response(&e)),
    }

    if let Err(response) = refresh(&state).await {
        return Ok(response);
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Product {} deleted successfully", id)
    })))
}

async fn recommend(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<TopNQuery>,
) -> ActixResult<HttpResponse> {
    let product_id = path.into_inner();
    if let Err(e) = state.storage.require_product(&product_id) {
        return Ok(error_response(&e));
    }

    let top_n = query.top_n.unwrap_or(DEFAULT_TOP_N);
    let recommendations = state.recommender.recommend(&product_id, top_n);
    debug!(%product_id, top_n, returned = recommendations.len(), "Recommendations served");

    Ok(HttpResponse::Ok().json(RecommendationResponse {
        product_id,
        recommendations,
    }))
}

async fn recommend_for_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<TopNQuery>,
) -> ActixResult<HttpResponse> {
    let user_id = path.into_inner();
    let top_n = query.top_n.unwrap_or(DEFAULT_TOP_N);

    let state = state.get_ref().clone();
    let lookup_user = user_id.clone();
    let result = web::block(move || {
        state
            .recommender
            .recommend_for_user(&lookup_user, top_n, state.storage.as_ref())
    })
    .await;

    match result {
        Ok(Ok(recommendations)) => Ok(HttpResponse::Ok().json(UserRecommendationResponse {
            user_id,
            recommendations,
        })),
        Ok(Err(e)) => Ok(error_response(&e)),
        Err(e) => {
            error!("User recommendation task failed: {}", e);
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Recommendation lookup failed"
            })))
        }
    }
}
