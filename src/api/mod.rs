mod health;
mod resource;

pub use health::{health_check, HealthState};
pub use resource::{
    create, get_one, institution_routes, list, plant_routes, remove, DataResponse, ResourceState,
};

use crate::config::Config;
use crate::security::with_security_headers;
use crate::store::Stores;
use axum::{routing::get, Router};
use std::time::Instant;
use tower_http::trace::TraceLayer;

/// Full application router: health at the root, each resource nested under
/// its configured prefix.
pub fn router(stores: Stores, config: &Config) -> Router {
    let settings = config.handler;

    let app = Router::new()
        .route("/health", get(health_check))
        .with_state(HealthState {
            probe: stores.probe,
            start_time: Instant::now(),
        })
        .nest(&config.plants_prefix, plant_routes(stores.plants, settings))
        .nest(
            &config.institutions_prefix,
            institution_routes(stores.institutions, settings),
        )
        .layer(TraceLayer::new_for_http());

    with_security_headers(app)
}
