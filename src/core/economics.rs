use serde::Serialize;

/// Platform flow assumptions behind the explainer tables: how each $1000 of
/// trading flow is monetized and how challenge points are earned back.
#[derive(Debug, Clone, Copy)]
pub struct FlowAssumptions {
    pub flow_volume: f64,
    pub spread_pct: f64,
    pub tx_fee_pct: f64,
    pub tx_fee_cap: f64,
    pub tech_share_pct: f64,
    pub ops_share_pct: f64,
    pub pool_share_pct: f64,
    pub points_needed: f64,
    pub withdraw_share_pct: f64,
    pub assumed_gain: f64,
}

impl Default for FlowAssumptions {
    fn default() -> Self {
        Self {
            flow_volume: 1000.0,
            spread_pct: 2.0,
            tx_fee_pct: 0.7,
            tx_fee_cap: 2.0,
            tech_share_pct: 20.0,
            ops_share_pct: 40.0,
            pool_share_pct: 40.0,
            points_needed: 500.0,
            withdraw_share_pct: 80.0,
            assumed_gain: 500.0,
        }
    }
}

/// Gross revenue split for one unit of flow volume.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSplit {
    pub flow_volume: f64,
    pub spread: f64,
    pub tx_fee: f64,
    pub gross: f64,
    pub tech: f64,
    pub ops: f64,
    pub pool: f64,
}

/// How a funded trader earns back the challenge fee in points.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsMechanics {
    pub challenge_fee: f64,
    pub points_needed: f64,
    pub point_value: f64,
    pub points_per_flow: f64,
    pub volume_required: f64,
}

/// Per-trader platform take on the direct-purchase path.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectEconomics {
    pub withdrawn: f64,
    pub spread: f64,
    pub tx_fee: f64,
    pub net: f64,
}

pub fn flow_split(assumptions: &FlowAssumptions) -> FlowSplit {
    let spread = assumptions.flow_volume * assumptions.spread_pct / 100.0;
    let tx_fee =
        (assumptions.flow_volume * assumptions.tx_fee_pct / 100.0).min(assumptions.tx_fee_cap);
    let gross = spread + tx_fee;

    FlowSplit {
        flow_volume: assumptions.flow_volume,
        spread,
        tx_fee,
        gross,
        tech: gross * assumptions.tech_share_pct / 100.0,
        ops: gross * assumptions.ops_share_pct / 100.0,
        pool: gross * assumptions.pool_share_pct / 100.0,
    }
}

pub fn points_mechanics(assumptions: &FlowAssumptions, challenge_fee: f64) -> PointsMechanics {
    let split = flow_split(assumptions);

    // A zero fee or zero point target makes the earn-back ratios moot;
    // report 0 rather than dividing, matching the ROI policy.
    let point_value = if assumptions.points_needed > 0.0 {
        challenge_fee / assumptions.points_needed
    } else {
        0.0
    };
    let points_per_flow = if point_value > 0.0 {
        split.pool / point_value
    } else {
        0.0
    };
    let volume_required = if points_per_flow > 0.0 {
        assumptions.points_needed / points_per_flow * assumptions.flow_volume
    } else {
        0.0
    };

    PointsMechanics {
        challenge_fee,
        points_needed: assumptions.points_needed,
        point_value,
        points_per_flow,
        volume_required,
    }
}

pub fn direct_economics(assumptions: &FlowAssumptions) -> DirectEconomics {
    let withdrawn = assumptions.assumed_gain * assumptions.withdraw_share_pct / 100.0;
    let spread = withdrawn * assumptions.spread_pct / 100.0;
    let tx_fee = (withdrawn * assumptions.tx_fee_pct / 100.0).min(assumptions.tx_fee_cap);

    DirectEconomics {
        withdrawn,
        spread,
        tx_fee,
        net: spread + tx_fee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn flow_split_matches_documented_unit_economics() {
        let split = flow_split(&FlowAssumptions::default());
        assert_approx(split.flow_volume, 1000.0);
        assert_approx(split.spread, 20.0);
        assert_approx(split.tx_fee, 2.0);
        assert_approx(split.gross, 22.0);
        assert_approx(split.tech, 4.4);
        assert_approx(split.ops, 8.8);
        assert_approx(split.pool, 8.8);
    }

    #[test]
    fn tx_fee_stays_uncapped_below_the_cap() {
        let assumptions = FlowAssumptions {
            flow_volume: 100.0,
            ..FlowAssumptions::default()
        };
        let split = flow_split(&assumptions);
        assert_approx(split.tx_fee, 0.7);
    }

    #[test]
    fn points_mechanics_matches_documented_thresholds() {
        let mechanics = points_mechanics(&FlowAssumptions::default(), 39.6);
        assert_approx(mechanics.point_value, 0.0792);
        assert!(
            (mechanics.points_per_flow - 111.111).abs() < 0.01,
            "got {}",
            mechanics.points_per_flow
        );
        assert_approx(mechanics.volume_required, 4500.0);
    }

    #[test]
    fn points_mechanics_reports_zero_ratios_for_free_challenge() {
        let mechanics = points_mechanics(&FlowAssumptions::default(), 0.0);
        assert_approx(mechanics.point_value, 0.0);
        assert_approx(mechanics.points_per_flow, 0.0);
        assert_approx(mechanics.volume_required, 0.0);
    }

    #[test]
    fn direct_economics_matches_documented_take() {
        let economics = direct_economics(&FlowAssumptions::default());
        assert_approx(economics.withdrawn, 400.0);
        assert_approx(economics.spread, 8.0);
        assert_approx(economics.tx_fee, 2.0);
        assert_approx(economics.net, 10.0);
    }
}
