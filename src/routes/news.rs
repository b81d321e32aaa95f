//! Market news proxy route

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::NewsError;
use crate::news::Article;
use crate::server::AppState;

/// Query string for `/api/news`
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub limit: Option<String>,
}

/// Response body for `/api/news`
#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub articles: Vec<Article>,
}

/// Fetch the provider feed and reshape it for the front end.
pub async fn get_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<NewsResponse>, NewsError> {
    let limit = query
        .limit
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "8".to_string());
    info!("Fetching news (limit={})", limit);

    let articles = state.news.fetch_articles(&limit).await?;
    Ok(Json(NewsResponse { articles }))
}
