use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    CombinedRow, DirectEconomics, DirectRow, FlowAssumptions, FlowSplit, Params, PointsMechanics,
    PointsRow, combine, direct_economics, flow_split, points_mechanics, simulate_direct,
    simulate_points,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Parser, Debug)]
#[command(
    name = "propsim",
    about = "Two-path cohort revenue projector (points vs direct purchase)"
)]
struct Cli {
    #[arg(
        long,
        default_value = "100,500,1000,5000,10000,20000,50000",
        help = "Comma-separated applicant cohort sizes"
    )]
    cohorts: String,
    #[arg(long, default_value_t = 60.0, help = "Challenge pass rate in percent")]
    pass_rate: f64,
    #[arg(
        long,
        default_value_t = 40.0,
        help = "Share of funded traders withdrawing again in month 2, in percent"
    )]
    withdraw_rate: f64,
    #[arg(
        long,
        default_value_t = 39.6,
        help = "Challenge fee fronted per applicant in USD"
    )]
    challenge_fee: f64,
    #[arg(
        long,
        default_value_t = 98.6,
        help = "Month-1 net revenue per funded trader on the points path in USD"
    )]
    net_month1: f64,
    #[arg(
        long,
        default_value_t = 59.0,
        help = "Month-2 net revenue per returning withdrawer on the points path in USD"
    )]
    net_month2: f64,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Net revenue per funded trader on the direct-purchase path in USD"
    )]
    net_direct: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    cohorts: Option<String>,
    pass_rate: Option<f64>,
    withdraw_rate: Option<f64>,
    challenge_fee: Option<f64>,
    net_month1: Option<f64>,
    net_month2: Option<f64>,
    net_direct: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    cohorts: Vec<u32>,
    pass_rate_pct: f64,
    withdraw_rate_pct: f64,
    challenge_fee: f64,
    net_month1_per_trader: f64,
    net_month2_per_trader: f64,
    net_direct_per_trader: f64,
    points_rows: Vec<PointsRow>,
    direct_rows: Vec<DirectRow>,
    combined_rows: Vec<CombinedRow>,
    flow_split: FlowSplit,
    points_mechanics: PointsMechanics,
    direct_economics: DirectEconomics,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn parse_cohorts(raw: &str) -> Result<Vec<u32>, String> {
    let mut cohorts = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err("--cohorts must not contain empty entries".to_string());
        }
        let traders = entry
            .parse::<u32>()
            .map_err(|_| format!("--cohorts entry '{entry}' is not a positive integer"))?;
        if traders == 0 {
            return Err("--cohorts entries must be > 0".to_string());
        }
        cohorts.push(traders);
    }

    if cohorts.is_empty() {
        return Err("--cohorts must contain at least one cohort size".to_string());
    }

    Ok(cohorts)
}

fn build_params(cli: &Cli) -> Result<(Vec<u32>, Params), String> {
    let cohorts = parse_cohorts(&cli.cohorts)?;

    if !(0.0..=100.0).contains(&cli.pass_rate) {
        return Err("--pass-rate must be between 0 and 100".to_string());
    }

    if !(0.0..=100.0).contains(&cli.withdraw_rate) {
        return Err("--withdraw-rate must be between 0 and 100".to_string());
    }

    for (name, value) in [
        ("--challenge-fee", cli.challenge_fee),
        ("--net-month1", cli.net_month1),
        ("--net-month2", cli.net_month2),
        ("--net-direct", cli.net_direct),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be a finite amount >= 0"));
        }
    }

    Ok((
        cohorts,
        Params {
            pass_rate_pct: cli.pass_rate,
            withdraw_rate_pct: cli.withdraw_rate,
            challenge_fee: cli.challenge_fee,
            net_month1: cli.net_month1,
            net_month2: cli.net_month2,
            net_direct: cli.net_direct,
        },
    ))
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("propsim HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let (cohorts, params) = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    json_response(StatusCode::OK, build_simulate_response(&cohorts, &params))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
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
fn api_request_from_json(json: &str) -> Result<(Vec<u32>, Params), String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<(Vec<u32>, Params), String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.cohorts {
        cli.cohorts = v;
    }
    if let Some(v) = payload.pass_rate {
        cli.pass_rate = v;
    }
    if let Some(v) = payload.withdraw_rate {
        cli.withdraw_rate = v;
    }
    if let Some(v) = payload.challenge_fee {
        cli.challenge_fee = v;
    }
    if let Some(v) = payload.net_month1 {
        cli.net_month1 = v;
    }
    if let Some(v) = payload.net_month2 {
        cli.net_month2 = v;
    }
    if let Some(v) = payload.net_direct {
        cli.net_direct = v;
    }

    build_params(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        cohorts: "100,500,1000,5000,10000,20000,50000".to_string(),
        pass_rate: 60.0,
        withdraw_rate: 40.0,
        challenge_fee: 39.6,
        net_month1: 98.6,
        net_month2: 59.0,
        net_direct: 10.0,
    }
}

fn build_simulate_response(cohorts: &[u32], params: &Params) -> SimulateResponse {
    let points = simulate_points(cohorts, params);
    let direct = simulate_direct(cohorts, params);
    let combined = combine(&points, &direct);
    let assumptions = FlowAssumptions::default();

    SimulateResponse {
        cohorts: cohorts.to_vec(),
        pass_rate_pct: params.pass_rate_pct,
        withdraw_rate_pct: params.withdraw_rate_pct,
        challenge_fee: params.challenge_fee,
        net_month1_per_trader: params.net_month1,
        net_month2_per_trader: params.net_month2,
        net_direct_per_trader: params.net_direct,
        points_rows: points.iter().map(PointsRow::rounded).collect(),
        direct_rows: direct.iter().map(DirectRow::rounded).collect(),
        combined_rows: combined.iter().map(CombinedRow::rounded).collect(),
        flow_split: flow_split(&assumptions),
        points_mechanics: points_mechanics(&assumptions, params.challenge_fee),
        direct_economics: direct_economics(&assumptions),
    }
}

pub fn run_cli(raw_args: &[String]) -> Result<(), String> {
    let cli = Cli::parse_from(raw_args);
    let (cohorts, params) = build_params(&cli)?;
    print!("{}", render_tables(&cohorts, &params));
    Ok(())
}

fn render_tables(cohorts: &[u32], params: &Params) -> String {
    let full_points = simulate_points(cohorts, params);
    let full_direct = simulate_direct(cohorts, params);
    let combined: Vec<CombinedRow> = combine(&full_points, &full_direct)
        .iter()
        .map(CombinedRow::rounded)
        .collect();
    let points: Vec<PointsRow> = full_points.iter().map(PointsRow::rounded).collect();
    let direct: Vec<DirectRow> = full_direct.iter().map(DirectRow::rounded).collect();

    let mut out = String::new();

    let _ = writeln!(out, "Table 1: First-Month Results (Points Path)");
    let _ = writeln!(
        out,
        "{:>8} {:>10} {:>14} {:>16} {:>14}",
        "Traders", "Funded", "Expense (USD)", "Net M1 (USD)", "ROI M1 (%)"
    );
    for row in &points {
        let _ = writeln!(
            out,
            "{:>8} {:>10.1} {:>14.2} {:>16.2} {:>14.1}",
            row.traders, row.funded, row.expense, row.net_month1, row.roi_month1
        );
    }

    let _ = writeln!(out, "\nTable 2: Two-Month Cohort Outcomes (Points Path)");
    let _ = writeln!(
        out,
        "{:>8} {:>10} {:>14} {:>14} {:>12} {:>14} {:>14} {:>12}",
        "Traders", "Funded", "Expense", "Net M1", "Withdraw M2", "Net M2", "Total Net", "ROI (%)"
    );
    for row in &points {
        let _ = writeln!(
            out,
            "{:>8} {:>10.1} {:>14.2} {:>14.2} {:>12.1} {:>14.2} {:>14.2} {:>12.1}",
            row.traders,
            row.funded,
            row.expense,
            row.net_month1,
            row.withdrawers_month2,
            row.net_month2,
            row.total_net,
            row.roi_combined
        );
    }

    let _ = writeln!(out, "\nTable 3: Direct-Purchase Path (First Month)");
    let _ = writeln!(
        out,
        "{:>8} {:>10} {:>20}",
        "Traders", "Funded", "Net Direct M1 (USD)"
    );
    for row in &direct {
        let _ = writeln!(
            out,
            "{:>8} {:>10.1} {:>20.2}",
            row.traders, row.funded, row.net_direct_month1
        );
    }

    let _ = writeln!(out, "\nTable 4: Combined Two-Path First-Month Projection");
    let _ = writeln!(
        out,
        "{:>8} {:>16} {:>16} {:>18}",
        "Traders", "Points Net", "Direct Net", "Total Combined"
    );
    for row in &combined {
        let _ = writeln!(
            out,
            "{:>8} {:>16.2} {:>16.2} {:>18.2}",
            row.traders, row.points_net_month1, row.direct_net_month1, row.total_net_combined
        );
    }

    let assumptions = FlowAssumptions::default();
    let mechanics = points_mechanics(&assumptions, params.challenge_fee);
    let _ = writeln!(
        out,
        "\nMechanics: 1 pt = {:.4} USD, {:.0} pts per {:.0} USD of flow, {:.0} USD volume to clear the challenge",
        mechanics.point_value,
        mechanics.points_per_flow,
        assumptions.flow_volume,
        mechanics.volume_required
    );

    out
}
