mod economics;
mod engine;
mod types;

pub use economics::{
    DirectEconomics, FlowAssumptions, FlowSplit, PointsMechanics, direct_economics, flow_split,
    points_mechanics,
};
pub use engine::{combine, round_dp, simulate_direct, simulate_points};
pub use types::{CombinedRow, DirectRow, Params, PointsRow};
