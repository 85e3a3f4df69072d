use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::PlannerConfig;
use crate::core::{
    EmergencyFundProfile, EmergencyFundRecommendation, FeasibilityResult, FireProjection, Goal,
    GoalPlan, HouseholdFinancials, Months, MortgageConfig, delay_months, evaluate, goal_delay,
    plan_goal, project_fire, recommend_emergency_fund,
};

/// A household snapshot paired with the mortgage it is being tested against.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityRequest {
    pub financials: HouseholdFinancials,
    pub mortgage: MortgageConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FirePayload {
    investable_assets: f64,
    monthly_income: f64,
    monthly_expenses: f64,
    annual_real_return: Option<f64>,
    safe_withdrawal_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoalPlanPayload {
    goal: Goal,
    #[serde(default)]
    monthly_contribution: f64,
    #[serde(default)]
    annual_return: f64,
    today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoalDelayPayload {
    expense_amount: f64,
    monthly_savings_rate: f64,
    outstanding_gap: Option<f64>,
    goal: Option<Goal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmergencyFundPayload {
    #[serde(flatten)]
    profile: EmergencyFundProfile,
    min_months: Option<u32>,
    max_months: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoalDelayResponse {
    delay: Months,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type SharedConfig = Arc<PlannerConfig>;

pub fn router(config: PlannerConfig) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/feasibility", post(feasibility_handler))
        .route("/api/fire", post(fire_handler))
        .route("/api/goal/plan", post(goal_plan_handler))
        .route("/api/goal/delay", post(goal_delay_handler))
        .route("/api/emergency-fund", post(emergency_fund_handler))
        .fallback(not_found_handler)
        .with_state(Arc::new(config))
}

pub async fn run_http_server(port: u16, config: PlannerConfig) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(config);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "household planner API listening");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn feasibility_handler(Json(request): Json<FeasibilityRequest>) -> Response {
    respond(feasibility_response(request))
}

async fn fire_handler(
    State(config): State<SharedConfig>,
    Json(payload): Json<FirePayload>,
) -> Response {
    respond(fire_response(payload, &config))
}

async fn goal_plan_handler(Json(payload): Json<GoalPlanPayload>) -> Response {
    respond(goal_plan_response(payload, Local::now().date_naive()))
}

async fn goal_delay_handler(Json(payload): Json<GoalDelayPayload>) -> Response {
    respond(goal_delay_response(payload))
}

async fn emergency_fund_handler(
    State(config): State<SharedConfig>,
    Json(payload): Json<EmergencyFundPayload>,
) -> Response {
    respond(emergency_fund_response(payload, &config))
}

fn respond<T: Serialize>(result: Result<T, String>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(msg) => {
            warn!(error = %msg, "rejected API request");
            error_response(StatusCode::BAD_REQUEST, &msg)
        }
    }
}

pub fn feasibility_response(request: FeasibilityRequest) -> Result<FeasibilityResult, String> {
    evaluate(&request.financials, &request.mortgage).map_err(|e| e.to_string())
}

fn fire_response(payload: FirePayload, config: &PlannerConfig) -> Result<FireProjection, String> {
    project_fire(
        payload.investable_assets,
        payload.monthly_income,
        payload.monthly_expenses,
        payload.annual_real_return.unwrap_or(config.fire_real_return),
        payload
            .safe_withdrawal_rate
            .unwrap_or(config.safe_withdrawal_rate),
    )
    .map_err(|e| e.to_string())
}

fn goal_plan_response(payload: GoalPlanPayload, today: NaiveDate) -> Result<GoalPlan, String> {
    plan_goal(
        &payload.goal,
        payload.today.unwrap_or(today),
        payload.monthly_contribution,
        payload.annual_return,
    )
    .map_err(|e| e.to_string())
}

fn goal_delay_response(payload: GoalDelayPayload) -> Result<GoalDelayResponse, String> {
    let delay = match (payload.outstanding_gap, payload.goal) {
        (Some(gap), _) => delay_months(payload.expense_amount, payload.monthly_savings_rate, gap),
        (None, Some(goal)) => goal_delay(payload.expense_amount, payload.monthly_savings_rate, &goal),
        (None, None) => return Err("either outstandingGap or goal is required".to_string()),
    };
    Ok(GoalDelayResponse { delay })
}

fn emergency_fund_response(
    payload: EmergencyFundPayload,
    config: &PlannerConfig,
) -> Result<EmergencyFundRecommendation, String> {
    recommend_emergency_fund(
        &payload.profile,
        payload.min_months.unwrap_or(config.emergency_min_months),
        payload.max_months.unwrap_or(config.emergency_max_months),
    )
    .map_err(|e| e.to_string())
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
