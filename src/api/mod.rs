mod inputs;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::{
    CostOfDelay, DebtTrap, SimulationError, SimulationResult, Strategy, WealthIllusion,
    cost_of_delay, debt_trap, run_rent_vs_buy_seeded, wealth_illusion,
};

pub use inputs::{
    ApiRiskProfile, CliRiskProfile, DebtArgs, DebtPayload, DelayArgs, DelayPayload,
    IllusionArgs, IllusionInputs, IllusionPayload, InputError, MAX_AGE, MAX_TRIALS, MAX_YEARS,
    RentVsBuyArgs, RentVsBuyPayload, build_illusion_inputs, build_loan_terms, build_profile,
    build_simulation_config,
};

#[derive(Parser, Debug)]
#[command(
    name = "reality-check",
    about = "Personal-finance reality checks: delay cost, rent vs buy, wealth illusion, debt trap"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "REALITY_CHECK_LOG",
        default_value = "info",
        help = "Log filter used when RUST_LOG is unset"
    )]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API over HTTP
    Serve(ServeArgs),
    /// Monthly SIP needed now versus at the ideal start age
    CostOfDelay(DelayArgs),
    /// True cost of a financed purchase and its opportunity cost
    DebtTrap(DebtArgs),
    /// Nominal versus post-tax, inflation-adjusted value of a SIP
    WealthIllusion(IllusionArgs),
    /// Monte Carlo comparison of renting and investing versus buying
    RentVsBuy(RentVsBuyArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "REALITY_CHECK_PORT", default_value_t = 8080)]
    pub port: u16,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Input(_) | AppError::Simulation(_) => StatusCode::BAD_REQUEST,
            AppError::Encode(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentVsBuyResponse {
    #[serde(flatten)]
    pub result: SimulationResult,
    pub rent_win_probability_pct: f64,
    pub rent_advantage: f64,
    pub verdict: Strategy,
    pub seed: u64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn cost_of_delay_response(args: &DelayArgs) -> Result<CostOfDelay, AppError> {
    let profile = build_profile(args)?;
    Ok(cost_of_delay(profile))
}

pub fn debt_trap_response(args: &DebtArgs) -> Result<DebtTrap, AppError> {
    let terms = build_loan_terms(args)?;
    Ok(debt_trap(terms))
}

pub fn wealth_illusion_response(args: &IllusionArgs) -> Result<WealthIllusion, AppError> {
    let inputs = build_illusion_inputs(args)?;
    Ok(wealth_illusion(
        inputs.payment,
        inputs.years,
        inputs.return_pct,
        inputs.inflation_pct,
    ))
}

pub fn rent_vs_buy_response(args: &RentVsBuyArgs) -> Result<RentVsBuyResponse, AppError> {
    let config = build_simulation_config(args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let result = run_rent_vs_buy_seeded(config, args.trials, seed)?;
    Ok(RentVsBuyResponse {
        result,
        rent_win_probability_pct: result.rent_win_probability_pct(),
        rent_advantage: result.rent_advantage(),
        verdict: result.verdict(),
        seed,
    })
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Serve(args) => run_http_server(args.port).await?,
        Command::CostOfDelay(args) => print_json(&cost_of_delay_response(&args)?)?,
        Command::DebtTrap(args) => print_json(&debt_trap_response(&args)?)?,
        Command::WealthIllusion(args) => print_json(&wealth_illusion_response(&args)?)?,
        Command::RentVsBuy(args) => print_json(&rent_vs_buy_response(&args)?)?,
    }
    Ok(())
}

fn print_json<T: Serialize>(body: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(body)?);
    Ok(())
}

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/cost-of-delay",
            get(cost_of_delay_get_handler).post(cost_of_delay_post_handler),
        )
        .route(
            "/api/debt-trap",
            get(debt_trap_get_handler).post(debt_trap_post_handler),
        )
        .route(
            "/api/wealth-illusion",
            get(wealth_illusion_get_handler).post(wealth_illusion_post_handler),
        )
        .route(
            "/api/rent-vs-buy",
            get(rent_vs_buy_get_handler).post(rent_vs_buy_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "reality-check HTTP API listening");
    tracing::info!("Local access: http://127.0.0.1:{port}/api/cost-of-delay");

    axum::serve(listener, router()).await
}

type QueryPayload<P> = Result<Query<P>, QueryRejection>;
type JsonPayload<P> = Result<Json<P>, JsonRejection>;

async fn cost_of_delay_get_handler(payload: QueryPayload<DelayPayload>) -> Response {
    let args = payload.map(|Query(p)| DelayArgs::from(p));
    respond("cost-of-delay", args.map_err(rejected_payload), cost_of_delay_response)
}

async fn cost_of_delay_post_handler(payload: JsonPayload<DelayPayload>) -> Response {
    let args = payload.map(|Json(p)| DelayArgs::from(p));
    respond("cost-of-delay", args.map_err(rejected_payload), cost_of_delay_response)
}

async fn debt_trap_get_handler(payload: QueryPayload<DebtPayload>) -> Response {
    let args = payload.map(|Query(p)| DebtArgs::from(p));
    respond("debt-trap", args.map_err(rejected_payload), debt_trap_response)
}

async fn debt_trap_post_handler(payload: JsonPayload<DebtPayload>) -> Response {
    let args = payload.map(|Json(p)| DebtArgs::from(p));
    respond("debt-trap", args.map_err(rejected_payload), debt_trap_response)
}

async fn wealth_illusion_get_handler(payload: QueryPayload<IllusionPayload>) -> Response {
    let args = payload.map(|Query(p)| IllusionArgs::from(p));
    respond("wealth-illusion", args.map_err(rejected_payload), wealth_illusion_response)
}

async fn wealth_illusion_post_handler(payload: JsonPayload<IllusionPayload>) -> Response {
    let args = payload.map(|Json(p)| IllusionArgs::from(p));
    respond("wealth-illusion", args.map_err(rejected_payload), wealth_illusion_response)
}

async fn rent_vs_buy_get_handler(payload: QueryPayload<RentVsBuyPayload>) -> Response {
    let args = payload.map(|Query(p)| RentVsBuyArgs::from(p));
    respond("rent-vs-buy", args.map_err(rejected_payload), rent_vs_buy_response)
}

async fn rent_vs_buy_post_handler(payload: JsonPayload<RentVsBuyPayload>) -> Response {
    let args = payload.map(|Json(p)| RentVsBuyArgs::from(p));
    respond("rent-vs-buy", args.map_err(rejected_payload), rent_vs_buy_response)
}

fn rejected_payload(rejection: impl std::fmt::Display) -> InputError {
    InputError::Payload(rejection.to_string())
}

fn respond<A, T: Serialize>(
    endpoint: &'static str,
    args: Result<A, InputError>,
    engine: fn(&A) -> Result<T, AppError>,
) -> Response {
    match args.map_err(AppError::from).and_then(|args| engine(&args)) {
        Ok(body) => {
            tracing::info!(endpoint, "request served");
            json_response(StatusCode::OK, body)
        }
        Err(err) => {
            tracing::warn!(endpoint, error = %err, "request rejected");
            error_response(err.status(), &err.to_string())
        }
    }
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
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

#[cfg(test)]
fn request_from_json<P, A>(json: &str) -> Result<A, InputError>
where
    P: serde::de::DeserializeOwned + Into<A>,
{
    let payload = serde_json::from_str::<P>(json).map_err(rejected_payload)?;
    Ok(payload.into())
}
