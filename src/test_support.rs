/// Builds the full service (auth middleware, route table, fallback) around
/// a `web::Data<AppState>`, the same way `main` does.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(crate::auth::Authentication::new(&$state.config.jwt_secret))
                .app_data($state.clone())
                .service(crate::routes::api_scope(&$state.config.api_prefix))
                .default_service(actix_web::web::to(crate::routes::unhandled)),
        )
        .await
    };
}

pub(crate) use test_app;
