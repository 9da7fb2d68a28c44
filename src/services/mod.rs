pub mod descriptor_service;
pub mod evaluation_service;
pub mod exercise_service;
pub mod model_service;
pub mod unit_generation_service;
pub mod unit_plan_service;
