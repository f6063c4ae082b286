use super::types::{CombinedRow, DirectRow, Params, PointsRow};

/// Points-path projection: one row per cohort, input order preserved.
pub fn simulate_points(cohorts: &[u32], params: &Params) -> Vec<PointsRow> {
    let pass_rate = params.pass_rate_pct / 100.0;
    let withdraw_rate = params.withdraw_rate_pct / 100.0;

    let mut rows = Vec::with_capacity(cohorts.len());
    for &traders in cohorts {
        let applicants = traders as f64;
        let funded = applicants * pass_rate;
        let expense = applicants * params.challenge_fee;
        let net_month1 = funded * params.net_month1;
        let withdrawers_month2 = funded * withdraw_rate;
        let net_month2 = withdrawers_month2 * params.net_month2;
        let total_net = net_month1 + net_month2;

        rows.push(PointsRow {
            traders,
            funded,
            expense,
            net_month1,
            roi_month1: roi_pct(net_month1, expense),
            withdrawers_month2,
            net_month2,
            total_net,
            roi_combined: roi_pct(total_net, expense),
        });
    }
    rows
}

/// Direct-purchase projection: no fee to recoup, so no expense or ROI column.
pub fn simulate_direct(cohorts: &[u32], params: &Params) -> Vec<DirectRow> {
    let pass_rate = params.pass_rate_pct / 100.0;

    let mut rows = Vec::with_capacity(cohorts.len());
    for &traders in cohorts {
        let funded = traders as f64 * pass_rate;
        rows.push(DirectRow {
            traders,
            funded,
            net_direct_month1: funded * params.net_direct,
        });
    }
    rows
}

/// Joins the two paths' first-month nets by cohort size. Points rows drive
/// the output order; each consumes the first unconsumed direct row with the
/// same cohort key, so duplicates pair up positionally among themselves and
/// unmatched points rows are dropped. Sums are taken over unrounded values.
pub fn combine(points: &[PointsRow], direct: &[DirectRow]) -> Vec<CombinedRow> {
    let mut consumed = vec![false; direct.len()];
    let mut rows = Vec::with_capacity(points.len());

    for row in points {
        let matched = direct
            .iter()
            .enumerate()
            .find(|(idx, d)| !consumed[*idx] && d.traders == row.traders);
        let Some((idx, direct_row)) = matched else {
            continue;
        };
        consumed[idx] = true;

        rows.push(CombinedRow {
            traders: row.traders,
            points_net_month1: row.net_month1,
            direct_net_month1: direct_row.net_direct_month1,
            total_net_combined: row.net_month1 + direct_row.net_direct_month1,
        });
    }
    rows
}

// A free challenge has no expense to recoup; ROI is reported as 0 there.
fn roi_pct(net: f64, expense: f64) -> f64 {
    if expense > 0.0 {
        net / expense * 100.0
    } else {
        0.0
    }
}

pub fn round_dp(value: f64, dp: u32) -> f64 {
    let scale = 10f64.powi(dp as i32);
    (value * scale).round() / scale
}

impl PointsRow {
    /// Display rounding: counts to 1 dp, currency to 2, ROI to 1.
    pub fn rounded(&self) -> PointsRow {
        PointsRow {
            traders: self.traders,
            funded: round_dp(self.funded, 1),
            expense: round_dp(self.expense, 2),
            net_month1: round_dp(self.net_month1, 2),
            roi_month1: round_dp(self.roi_month1, 1),
            withdrawers_month2: round_dp(self.withdrawers_month2, 1),
            net_month2: round_dp(self.net_month2, 2),
            total_net: round_dp(self.total_net, 2),
            roi_combined: round_dp(self.roi_combined, 1),
        }
    }
}

impl DirectRow {
    pub fn rounded(&self) -> DirectRow {
        DirectRow {
            traders: self.traders,
            funded: round_dp(self.funded, 1),
            net_direct_month1: round_dp(self.net_direct_month1, 2),
        }
    }
}

impl CombinedRow {
    pub fn rounded(&self) -> CombinedRow {
        CombinedRow {
            traders: self.traders,
            points_net_month1: round_dp(self.points_net_month1, 2),
            direct_net_month1: round_dp(self.direct_net_month1, 2),
            total_net_combined: round_dp(self.total_net_combined, 2),
        }
    }
}
