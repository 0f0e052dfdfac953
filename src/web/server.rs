use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::predict::{Observer, TleLoader};
use crate::tracker::Tracker;

use super::api::{elements, passes, tracker as tracker_api};
use super::api_doc::ApiDoc;
use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tracker: Arc<Mutex<Tracker>>,
    pub tle_loader: Option<Arc<RwLock<TleLoader>>>,
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();

    let observer = match config.station.observer() {
        Ok(observer) => observer,
        Err(e) => {
            log::warn!("{}; falling back to 0°N 0°E", e);
            Observer::default()
        }
    };
    let tracker = Tracker::new(observer);

    let tle_loader = if let Some(ref predict_config) = config.predict {
        let mut loader = TleLoader::new(predict_config.tle_folder.clone());
        if let Err(e) = loader.load_all() {
            log::warn!("failed to initialize TLE loader: {}", e);
        }
        Some(Arc::new(RwLock::new(loader)))
    } else {
        None
    };

    let state = AppState {
        config: Arc::new(config),
        tracker: Arc::new(Mutex::new(tracker)),
        tle_loader,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Prediction endpoints
        .route("/api/passes", get(passes::list_passes))
        .route("/api/elements", get(elements::list_elements))
        // Tracker endpoints
        .route("/api/tracker/run", post(tracker_api::run))
        .route("/api/tracker/stop", post(tracker_api::stop))
        .route("/api/tracker/status", get(tracker_api::status))
        .route(
            "/api/tracker/status/sample",
            get(tracker_api::status_sample),
        )
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
