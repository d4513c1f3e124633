// Route table. Handlers are matched by (method, pattern) in registration
// order, so literal segments such as `/tasks/today` come before `/{id}`.

use actix_web::{error::InternalError, web, HttpRequest, HttpResponse, Resource, ResponseError, Scope};
use log::debug;

use crate::error::{ApiError, ApiResult};
use crate::{
    activity, auth, chat, dashboard_data, notification, project, search, task, upload,
    user_management,
};

/// Every endpoint, mounted under `prefix`.
pub fn api_scope(prefix: &str) -> Scope {
    web::scope(prefix)
        .app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/auth")
                .service(resource("/login").route(web::post().to(auth::login)))
                .service(resource("/me").route(web::get().to(auth::me)))
                .service(resource("/logout").route(web::post().to(auth::logout))),
        )
        .service(
            web::scope("/users")
                .service(resource("").route(web::get().to(user_management::list_users)))
                .service(
                    resource("/{user_id}")
                        .route(web::get().to(user_management::get_user))
                        .route(web::put().to(user_management::update_user)),
                ),
        )
        .service(
            web::scope("/projects")
                .service(
                    resource("")
                        .route(web::get().to(project::list_projects))
                        .route(web::post().to(project::create_project)),
                )
                .service(
                    resource("/{project_id}")
                        .route(web::get().to(project::get_project))
                        .route(web::put().to(project::update_project))
                        .route(web::delete().to(project::delete_project)),
                )
                .service(
                    resource("/{project_id}/members").route(web::post().to(project::add_member)),
                )
                .service(
                    resource("/{project_id}/members/{user_id}")
                        .route(web::delete().to(project::remove_member)),
                ),
        )
        .service(
            web::scope("/tasks")
                .service(
                    resource("")
                        .route(web::get().to(task::list_tasks))
                        .route(web::post().to(task::create_task)),
                )
                .service(resource("/today").route(web::get().to(task::today_tasks)))
                .service(
                    resource("/{task_id}")
                        .route(web::get().to(task::get_task))
                        .route(web::put().to(task::update_task))
                        .route(web::delete().to(task::delete_task)),
                )
                .service(
                    resource("/{task_id}/status")
                        .route(web::patch().to(task::update_task_status)),
                )
                .service(resource("/{task_id}/assign").route(web::patch().to(task::assign_task)))
                .service(
                    resource("/{task_id}/comments").route(web::post().to(task::add_comment)),
                ),
        )
        .service(
            web::scope("/messages")
                .service(resource("/channels").route(web::get().to(chat::list_channels)))
                .service(
                    resource("/channels/{channel_id}/messages")
                        .route(web::get().to(chat::list_channel_messages)),
                ),
        )
        .service(resource("/activities").route(web::get().to(activity::list_activities)))
        .service(
            resource("/notifications").route(web::get().to(notification::list_notifications)),
        )
        .service(
            web::scope("/dashboard")
                .service(resource("/stats").route(web::get().to(dashboard_data::stats)))
                .service(
                    resource("/project-progress")
                        .route(web::get().to(dashboard_data::project_progress)),
                )
                .service(resource("/task-stats").route(web::get().to(dashboard_data::task_stats)))
                .service(
                    resource("/project-category-distribution")
                        .route(web::get().to(dashboard_data::category_distribution)),
                )
                .service(
                    resource("/today-tasks").route(web::get().to(dashboard_data::today_tasks)),
                ),
        )
        .service(resource("/search").route(web::get().to(search::search)))
        .service(resource("/upload").route(web::post().to(upload::upload)))
        .default_service(web::to(unhandled))
}

/// A resource whose unmatched methods answer like an unknown path.
fn resource(path: &str) -> Resource {
    web::resource(path).default_service(web::to(unhandled))
}

/// Fallback for anything the table does not cover.
pub async fn unhandled(req: HttpRequest) -> ApiResult<HttpResponse> {
    debug!("No route for {} {}", req.method(), req.path());
    Err(ApiError::Unhandled)
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = ApiError::BadRequest(err.to_string()).error_response();
        InternalError::from_response(err, response).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = ApiError::BadRequest(err.to_string()).error_response();
        InternalError::from_response(err, response).into()
    })
}
