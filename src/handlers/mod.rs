pub mod descriptor_handler;
pub mod evaluation_handler;
pub mod health_handler;
pub mod unit_plan_handler;

use actix_web::web;

pub use descriptor_handler::{get_criterion, list_subjects};
pub use evaluation_handler::create_evaluation;
pub use health_handler::{health_check, health_check_ready};
pub use unit_plan_handler::{
    generate_units, get_unit_plan, list_teacher_unit_plans, save_unit_plan,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_ready)
        .service(list_subjects)
        .service(get_criterion)
        .service(create_evaluation)
        .service(generate_units)
        .service(save_unit_plan)
        .service(get_unit_plan)
        .service(list_teacher_unit_plans);
}
