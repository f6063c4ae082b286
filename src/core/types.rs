use serde::Serialize;

/// Scalar parameter set for one projection run. Rates are percentages
/// (0-100) as entered in the UI; the engine divides by 100.
#[derive(Debug, Clone, Copy)]
pub struct Params {
    pub pass_rate_pct: f64,
    pub withdraw_rate_pct: f64,
    pub challenge_fee: f64,
    pub net_month1: f64,
    pub net_month2: f64,
    pub net_direct: f64,
}

/// One points-path cohort outcome. Values carry full f64 precision until
/// `rounded()` is applied at the presentation boundary.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsRow {
    pub traders: u32,
    pub funded: f64,
    pub expense: f64,
    pub net_month1: f64,
    pub roi_month1: f64,
    pub withdrawers_month2: f64,
    pub net_month2: f64,
    pub total_net: f64,
    pub roi_combined: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectRow {
    pub traders: u32,
    pub funded: f64,
    pub net_direct_month1: f64,
}

/// Join of the two paths' first-month nets, keyed by cohort size.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedRow {
    pub traders: u32,
    pub points_net_month1: f64,
    pub direct_net_month1: f64,
    pub total_net_combined: f64,
}
