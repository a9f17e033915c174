use std::{sync::Arc, time::Duration};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    config::StoreConfig,
    db::Store,
    error::{AppError, ServerError, StoreError},
};

pub const SAVE_RECIPE_PATH: &str = "/api/save-recipe";
pub const SAVED_RECIPES_PATH: &str = "/api/saved-recipes";

type HandlerResult<T> = Result<T, AppError>;

pub fn router(store: Arc<Store>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(SAVE_RECIPE_PATH, post(save_recipe_handler))
        .route(SAVED_RECIPES_PATH, get(saved_recipes_handler))
        .layer(cors)
        .with_state(store)
}

/// Runs a database call on the blocking pool.
async fn with_store<T, F>(store: Arc<Store>, f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&Store) -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&store)).await?
}

async fn save_recipe_handler(
    State(store): State<Arc<Store>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> HandlerResult<impl IntoResponse> {
    let Json(document) = payload.map_err(|e| {
        log::warn!("Rejected recipe payload: {e}");
        AppError::MalformedPayload
    })?;
    if !document.is_object() {
        log::warn!("Rejected recipe payload: not a JSON object");
        return Err(AppError::MalformedPayload);
    }

    let id = with_store(store, move |store| store.insert_recipe(&document))
        .await
        .map_err(|e| {
            log::error!("Error saving recipe: {e}");
            AppError::Persistence(e)
        })?;
    log::info!("Saved recipe {id}");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Recipe saved successfully" })),
    ))
}

async fn saved_recipes_handler(State(store): State<Arc<Store>>) -> HandlerResult<Json<Vec<Value>>> {
    let recipes = with_store(store, |store| store.list_recipes())
        .await
        .map_err(|e| {
            log::error!("Error fetching saved recipes: {e}");
            AppError::Persistence(e)
        })?;
    Ok(Json(recipes))
}

/// Opens the database, serves until a shutdown signal, then closes the database.
pub async fn start_server(config: StoreConfig) -> Result<(), ServerError> {
    log::info!("Initializing store...");
    let store = Arc::new(match config.database_path() {
        Some(path) => Store::open(&path)?,
        None => Store::open_in_memory()?,
    });

    let app = router(store.clone());

    let address = format!("0.0.0.0:{}", config.port);
    log::info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    log::info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server shutting down...");
    match Arc::try_unwrap(store) {
        Ok(store) => store.close()?,
        Err(_) => log::warn!("Store still in use at shutdown, leaving connection to drop"),
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => log::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                log::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                log::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                log::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
