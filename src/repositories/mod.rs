pub mod unit_plan_repository;

pub use unit_plan_repository::{MongoUnitPlanRepository, UnitPlanRepository};
