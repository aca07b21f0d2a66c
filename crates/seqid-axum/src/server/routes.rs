use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use seqid::{Allocation, ListingCategory};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use super::{error::AppError, state::AppState};

/// One entry of `GET /categories`.
#[derive(Debug, Serialize)]
pub struct CategoryView {
    slug: String,
    prefix: String,
}

/// Body of a successful claim.
#[derive(Debug, Serialize)]
pub struct Claimed {
    id: String,
}

/// Builds the application router with a permissive CORS layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/categories", get(categories))
        .route("/categories/{slug}/claim", post(claim_category))
        .route("/ids/{prefix}", post(allocate))
        .route("/ids/{prefix}/claim", post(claim))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Prefixes must not end in a digit: the boundary between prefix and
/// sequence number would be ambiguous.
fn validate_prefix(prefix: &str) -> Result<&str, AppError> {
    let valid = prefix
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-')
        && prefix.bytes().last().is_some_and(|b| !b.is_ascii_digit());
    if valid {
        Ok(prefix)
    } else {
        Err(AppError::InvalidPrefix(prefix.to_owned()))
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn categories() -> Json<Vec<CategoryView>> {
    Json(
        ListingCategory::all()
            .into_iter()
            .map(|category| CategoryView {
                slug: category.to_string(),
                prefix: category.prefix(),
            })
            .collect(),
    )
}

async fn allocate(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> Result<Json<Allocation>, AppError> {
    let prefix = validate_prefix(&prefix)?;
    let allocation = state.allocator().try_allocate(prefix).await?;
    tracing::debug!(prefix, ?allocation, "allocated identifier");
    Ok(Json(allocation))
}

async fn claim(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> Result<(StatusCode, Json<Claimed>), AppError> {
    let prefix = validate_prefix(&prefix)?;
    let id = state.claims().claim(prefix).await?;
    tracing::info!(prefix, %id, "claimed identifier");
    Ok((StatusCode::CREATED, Json(Claimed { id })))
}

async fn claim_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Json<Claimed>), AppError> {
    let category: ListingCategory = slug.parse()?;
    let prefix = category.prefix();
    let id = state.claims().claim(&prefix).await?;
    tracing::info!(%category, %id, "claimed identifier");
    Ok((StatusCode::CREATED, Json(Claimed { id })))
}
