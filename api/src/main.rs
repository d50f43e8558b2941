use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use ayat_lib::{AppState, AyatError, Config, CorpusVariant, Mode, ParsedQuery, SearchPage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

// === Request/Response types ===

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
    page: Option<usize>,
}

#[derive(Deserialize)]
struct PatternQuery {
    q: String,
}

#[derive(Serialize)]
struct CorpusHealth {
    variant: CorpusVariant,
    verses: Option<usize>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    corpora: Vec<CorpusHealth>,
    cached_queries: usize,
}

#[derive(Serialize)]
struct PatternResponse {
    mode: Option<Mode>,
    /// Validated query
    query: String,
    /// Compiled pattern source; absent for title lookups and invalid input
    pattern: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn status_for(err: &AyatError) -> StatusCode {
    match err {
        AyatError::CorpusNotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
        AyatError::Pattern(_) | AyatError::Corpus(_) | AyatError::Other(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn api_error(err: AyatError) -> ApiError {
    (status_for(&err), Json(ErrorResponse { error: err.to_string() }))
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let corpora: Vec<CorpusHealth> = state
        .store
        .status()
        .into_iter()
        .map(|(variant, verses)| CorpusHealth { variant, verses })
        .collect();
    let status = if corpora.iter().all(|c| c.verses.is_some()) { "ok" } else { "loading" };

    Json(HealthResponse {
        status: status.to_string(),
        corpora,
        cached_queries: state.cache.stats().0,
    })
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchPage>, ApiError> {
    let page = params.page.unwrap_or(1);
    state.search(&params.q, page).map(Json).map_err(api_error)
}

async fn pattern(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PatternQuery>,
) -> Result<Json<PatternResponse>, ApiError> {
    let response = match ParsedQuery::parse(&params.q) {
        ParsedQuery::Invalid => PatternResponse { mode: None, query: String::new(), pattern: None },
        ParsedQuery::Title { keyword, keynum } => PatternResponse {
            mode: Some(Mode::Normal),
            query: format!("{}:{}", keyword, keynum.unwrap_or_default()),
            pattern: None,
        },
        ParsedQuery::Content { mode, keyword } => {
            let compiled = state.engine.compile(mode, &keyword).map_err(api_error)?;
            PatternResponse {
                mode: Some(mode),
                query: keyword,
                pattern: Some(compiled.source().to_string()),
            }
        }
    };
    Ok(Json(response))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr.clone();
    tracing::info!(data_dir = ?config.data_dir, per_page = config.per_page, "starting");

    let state = Arc::new(AppState::new(config));

    // Searches answer 503 until their corpus is in
    let loader = Arc::clone(&state);
    tokio::spawn(async move {
        let ready = loader.load_all().await;
        tracing::info!(ready, total = CorpusVariant::ALL.len(), "corpus loading finished");
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/search", get(search))
        .route("/pattern", get(pattern))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_is_unavailable() {
        let (status, Json(body)) = api_error(AyatError::CorpusNotReady("normal".to_string()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.error.contains("normal"));
    }

    #[test]
    fn test_other_errors_are_internal() {
        assert_eq!(status_for(&AyatError::Corpus("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(&AyatError::Pattern("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
