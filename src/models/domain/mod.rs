pub mod exercise;
pub mod unit;
pub mod unit_plan;
pub use exercise::Exercise;
pub use unit::{Chapter, GeneratedUnit};
pub use unit_plan::{UnitPlan, UnitPlanFilter};
