//! API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<ApiState>`.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::data::coingecko::{CoinGeckoClient, CoinPrice, CoinSearchHit, TrendingCoin};
use crate::engine::cycle::{run_cycle, CycleReport};
use crate::engine::scanner::MarketRouter;
use crate::error::{BetRequestError, EvaluationError};
use crate::platforms::{verify_bet, SportsbookPlatform};
use crate::strategy::OpportunityScanner;
use crate::types::{
    BetRequest, BetVerification, BettingHistory, Market, MarketOdds, OpportunityScore, Position,
    SimulatedBet, StakeRecommendation,
};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
///
/// Nothing here is mutated by requests; every opportunity response is
/// computed from a fresh market scan.
pub struct ApiState {
    pub router: MarketRouter,
    pub scanner: OpportunityScanner,
    pub coingecko: Option<CoinGeckoClient>,
    pub bankroll: Decimal,
}

impl ApiState {
    pub fn new(
        router: MarketRouter,
        scanner: OpportunityScanner,
        coingecko: Option<CoinGeckoClient>,
        bankroll: Decimal,
    ) -> Self {
        Self {
            router,
            scanner,
            coingecko,
            bankroll,
        }
    }
}

pub type AppState = Arc<ApiState>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ApiError {
    Evaluation(EvaluationError),
    BadRequest(String),
    NotFound(String),
    Unavailable(&'static str),
    Upstream(anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Evaluation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unavailable(what) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("{what} is not enabled"),
            ),
            ApiError::Upstream(e) => {
                warn!(error = %e, "Upstream request failed");
                (StatusCode::BAD_GATEWAY, format!("{e:#}"))
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<EvaluationError> for ApiError {
    fn from(e: EvaluationError) -> Self {
        ApiError::Evaluation(e)
    }
}

impl From<BetRequestError> for ApiError {
    fn from(e: BetRequestError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        // Validation failures surfaced through a platform stay client errors.
        match e.downcast_ref::<BetRequestError>() {
            Some(invalid) => ApiError::BadRequest(invalid.to_string()),
            None => ApiError::Upstream(e),
        }
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct OddsQuery {
    pub platform: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateBody {
    pub market_id: String,
    pub outcome_index: usize,
    pub stake: Decimal,
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StakeQuery {
    pub bankroll: Option<Decimal>,
    pub confidence: Decimal,
    pub risk_tolerance: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct SimulateBody {
    pub platform: String,
    pub market_id: String,
    pub position: String,
    pub amount: Decimal,
    #[serde(default)]
    pub odds: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub vs: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /api/markets
pub async fn get_markets(State(state): State<AppState>) -> ApiResult<Vec<Market>> {
    Ok(Json(state.router.scan_all().await?))
}

/// GET /api/markets/:id/odds?platform=
pub async fn get_market_odds(
    State(state): State<AppState>,
    Path(market_id): Path<String>,
    Query(query): Query<OddsQuery>,
) -> ApiResult<MarketOdds> {
    let platform = match query.platform {
        Some(platform) => {
            ensure_platform(&state, &platform)?;
            platform
        }
        None => find_market(&state, &market_id, None).await?.platform,
    };
    Ok(Json(state.router.market_odds(&platform, &market_id).await?))
}

/// GET /api/opportunities
pub async fn get_opportunities(State(state): State<AppState>) -> ApiResult<CycleReport> {
    let report = run_cycle(&state.router, &state.scanner, state.bankroll, 0).await?;
    Ok(Json(report))
}

/// POST /api/evaluate
pub async fn evaluate(
    State(state): State<AppState>,
    Json(body): Json<EvaluateBody>,
) -> ApiResult<OpportunityScore> {
    let market = find_market(&state, &body.market_id, body.platform.as_deref()).await?;
    let score = state
        .scanner
        .evaluator()
        .evaluate(&market, body.outcome_index, body.stake)?;
    Ok(Json(score))
}

/// GET /api/stake?bankroll=&confidence=&risk_tolerance=
pub async fn get_stake(
    State(state): State<AppState>,
    Query(query): Query<StakeQuery>,
) -> ApiResult<StakeRecommendation> {
    let recommendation = state.scanner.sizer().recommend(
        query.bankroll.unwrap_or(state.bankroll),
        query.confidence,
        query
            .risk_tolerance
            .unwrap_or(state.scanner.config().risk_tolerance),
    )?;
    Ok(Json(recommendation))
}

/// POST /api/bets/simulate
pub async fn simulate_bet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SimulateBody>,
) -> ApiResult<SimulatedBet> {
    let (agent_id, session_id) = tracking_ids(&headers);
    info!(
        agent_id,
        session_id,
        platform = %body.platform,
        market_id = %body.market_id,
        "Bet simulation requested"
    );

    let request = BetRequest {
        market_id: body.market_id,
        position: body.position.parse::<Position>()?,
        amount: body.amount,
        odds: body.odds,
    };

    let platform = ensure_platform(&state, &body.platform)?;
    Ok(Json(platform.simulate_bet(&request).await?))
}

/// GET /api/bets/:tx_hash/verify
pub async fn verify(Path(tx_hash): Path<String>) -> Json<BetVerification> {
    Json(verify_bet(&tx_hash))
}

/// GET /api/bets/history
pub async fn get_history(State(state): State<AppState>) -> ApiResult<BettingHistory> {
    Ok(Json(state.router.betting_history().await?))
}

/// GET /api/coins/trending
pub async fn get_trending(State(state): State<AppState>) -> ApiResult<Vec<TrendingCoin>> {
    let client = coingecko(&state)?;
    Ok(Json(client.trending().await?))
}

/// GET /api/coins/:id/price?vs=
pub async fn get_coin_price(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
    Query(query): Query<PriceQuery>,
) -> ApiResult<CoinPrice> {
    let client = coingecko(&state)?;
    let vs = query.vs.unwrap_or_else(|| "usd".to_string());
    Ok(Json(client.coin_price(&coin_id, &vs).await?))
}

/// GET /api/coins/search?q=
pub async fn search_coins(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<CoinSearchHit>> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(ApiError::BadRequest("search query must not be empty".into()));
    }
    let client = coingecko(&state)?;
    Ok(Json(client.search(q).await?))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ensure_platform<'a>(
    state: &'a ApiState,
    name: &str,
) -> Result<&'a dyn SportsbookPlatform, ApiError> {
    state
        .router
        .platform(name)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown platform: {name}")))
}

async fn find_market(
    state: &ApiState,
    market_id: &str,
    platform: Option<&str>,
) -> Result<Market, ApiError> {
    if let Some(name) = platform {
        ensure_platform(state, name)?;
    }
    state
        .router
        .find_market(market_id, platform)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Unknown market: {market_id}")))
}

fn coingecko(state: &ApiState) -> Result<&CoinGeckoClient, ApiError> {
    state
        .coingecko
        .as_ref()
        .ok_or(ApiError::Unavailable("CoinGecko"))
}

fn tracking_ids(headers: &HeaderMap) -> (&str, &str) {
    (
        header_or_dash(headers, "x-agent-id"),
        header_or_dash(headers, "x-session-id"),
    )
}

fn header_or_dash<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::azuro::AzuroCatalog;
    use axum::http::HeaderValue;
    use rust_decimal_macros::dec;

    fn state() -> AppState {
        Arc::new(ApiState::new(
            MarketRouter::new(vec![Box::new(AzuroCatalog::with_sample_markets())]),
            OpportunityScanner::default(),
            None,
            dec!(1),
        ))
    }

    #[tokio::test]
    async fn test_health_handler() {
        assert_eq!(health().await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_evaluate_handler() {
        let Json(score) = evaluate(
            State(state()),
            Json(EvaluateBody {
                market_id: "2".into(),
                outcome_index: 1,
                stake: dec!(10),
                platform: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(score.expected_payout, dec!(21));
        assert_eq!(score.roi_percent, dec!(110));
    }

    #[tokio::test]
    async fn test_evaluate_unknown_market_is_not_found() {
        let err = evaluate(
            State(state()),
            Json(EvaluateBody {
                market_id: "404".into(),
                outcome_index: 0,
                stake: dec!(1),
                platform: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_stake_defaults_to_agent_bankroll() {
        let Json(rec) = get_stake(
            State(state()),
            Query(StakeQuery {
                bankroll: None,
                confidence: dec!(0.5),
                risk_tolerance: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(rec.stake, dec!(0.05));
    }

    #[test]
    fn test_bet_request_error_maps_to_bad_request() {
        let err: ApiError =
            anyhow::Error::new(BetRequestError::InvalidAmount(Decimal::ZERO)).into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = anyhow::anyhow!("timeout").into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_tracking_ids() {
        let mut headers = HeaderMap::new();
        headers.insert("x-agent-id", HeaderValue::from_static("agent-7"));
        assert_eq!(tracking_ids(&headers), ("agent-7", "-"));
    }
}
