// src/main.rs

mod activity;
mod app_state;
mod auth;
mod chat;
mod config;
mod dashboard_data;
mod error;
mod extract;
mod fixtures;
mod models;
mod notification;
mod pagination;
mod project;
mod repository;
mod response;
mod routes;
mod search;
mod task;
mod upload;
mod user_management;

#[cfg(test)]
mod test_support;

use std::io;

use actix_cors::Cors;
use actix_web::{http, middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::info;

use crate::app_state::AppState;
use crate::auth::Authentication;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = config::Config::from_env();
    let state = web::Data::new(AppState::seeded(config.clone()).map_err(io::Error::other)?);

    info!("Mock API listening on http://{}{}", config.bind_addr, config.api_prefix);
    info!("Allowed CORS origin: {}", config.frontend_origin);
    info!(
        "Simulated latency: {:?} (uploads {:?})",
        config.latency, config.upload_latency
    );

    let frontend_origin = config.frontend_origin.clone();
    let jwt_secret = config.jwt_secret.clone();
    let api_prefix = config.api_prefix.clone();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                http::header::CONTENT_TYPE,
                http::header::ACCEPT,
                http::header::AUTHORIZATION,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Authentication::new(&jwt_secret))
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .service(routes::api_scope(&api_prefix))
            .default_service(web::to(routes::unhandled))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
