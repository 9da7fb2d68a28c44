use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use pei_planner::{app_state::AppState, config::Config, graphql, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };
    let schema = graphql::create_schema(state.clone());

    log::info!("Starting HTTP server on {}:{}", host, port);
    log::info!("GraphiQL playground: http://{}:{}/graphql", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(handlers::configure)
            .configure(graphql::schema::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
