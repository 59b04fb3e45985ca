pub mod cost_kind;
pub mod cross_entropy;
pub mod mse;

pub use cost_kind::CostKind;
pub use cross_entropy::CrossEntropyCost;
pub use mse::MseCost;
