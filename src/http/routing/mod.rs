use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::http::routes::health::{self, HealthInfo};

pub fn app(api: Router, info: HealthInfo, cors: CorsLayer) -> Router {
    Router::new()
        .merge(health::router(info))
        .merge(api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
