use axum::{routing::get, Router};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // A missing or short token secret is a deployment error, not something to
    // paper over with a default.
    let config = crate::config::config();
    if let Err(e) = config.validate() {
        tracing::error!("Refusing to start: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Starting Notes API in {:?} mode", config.environment);

    // Best effort at startup; the health endpoint reports degraded state if
    // the database is still unreachable.
    if let Err(e) = database::manager::DatabaseManager::migrate().await {
        tracing::warn!("Migrations not applied: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("NOTES_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Notes API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes (token acquisition)
        .merge(auth_public_routes())
        // Everything else requires a bearer token
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
}

fn protected_routes() -> Router {
    use handlers::protected::{auth, notes};

    Router::new()
        .route(
            "/notes",
            get(notes::note_list).post(notes::note_create),
        )
        .route(
            "/notes/:id",
            get(notes::note_get)
                .put(notes::note_update)
                .delete(notes::note_delete),
        )
        .route("/auth/whoami", get(auth::whoami_get))
        // Token validation runs before any of the routes above; the decoded
        // user id is the only identity the handlers ever see.
        .layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

async fn root() -> axum::response::Json<serde_json::Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Notes API (Rust)",
            "version": version,
            "description": "Multi-tenant note-taking backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/auth/register, /auth/login (public - token acquisition)",
                "whoami": "/auth/whoami (protected)",
                "notes": "/notes[/:id] (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
