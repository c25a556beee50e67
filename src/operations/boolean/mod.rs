mod engine;
mod event;
mod fill;
mod intersect_op;
mod mono;
mod queue;
mod select;
mod status;
mod subtract;
mod union;
mod xor;

pub use engine::{boolean_execute, Sweep, SweepResult, SweepSegment};
pub use fill::{Fill, FillRule, Windings};
pub use intersect_op::Intersect;
pub use mono::CurveRef;
pub use select::{
    region_in_result, select_boundary, should_keep_segment, BooleanOp, BoundarySegment,
    KeepDecision,
};
pub use subtract::Subtract;
pub use union::Union;
pub use xor::Xor;
