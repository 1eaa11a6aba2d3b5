/// Resolution API endpoints
///
/// Plain JSON transport in front of the resolver for the CCIP-Read
/// protocol server to call. The wire-level calldata decoding and response
/// signing live in that server, not here; these handlers never fail a
/// well-formed request: a missing record is a sentinel value, not an
/// error status.
use crate::{
    context::AppContext,
    resolver::{AddrResponse, ContenthashResponse, TextResponse},
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

/// Build resolution routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/resolve/addr", get(resolve_addr))
        .route("/resolve/text", get(resolve_text))
        .route("/resolve/contenthash", get(resolve_contenthash))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddrParams {
    /// Full ENS name, e.g. "sarah.joescoffee.eth"
    pub name: String,
    /// SLIP-44 coin type the gateway decoded from the query
    pub coin_type: u64,
}

pub async fn resolve_addr(
    State(ctx): State<AppContext>,
    Query(params): Query<AddrParams>,
) -> Json<AddrResponse> {
    Json(ctx.resolver.addr(&params.name, params.coin_type).await)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextParams {
    pub name: String,
    /// Text record key, e.g. "points" or "joined"
    pub key: String,
}

pub async fn resolve_text(
    State(ctx): State<AppContext>,
    Query(params): Query<TextParams>,
) -> Json<TextResponse> {
    Json(ctx.resolver.text(&params.name, &params.key).await)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContenthashParams {
    pub name: String,
}

pub async fn resolve_contenthash(
    State(ctx): State<AppContext>,
    Query(params): Query<ContenthashParams>,
) -> Json<ContenthashResponse> {
    Json(ctx.resolver.contenthash(&params.name).await)
}
