//! HTTP handlers and route configuration.

mod health;
mod posts;
mod profiles;
mod upload;
mod users;

use actix_web::web;
use circle_shared::Validate;

use crate::middleware::auth::RequireAuth;
use crate::middleware::error::{AppError, AppResult, json_error_handler, path_error_handler};

/// Unwrap a JSON body, rejecting it with every failing field listed.
fn validated<T: Validate>(body: web::Json<T>) -> AppResult<T> {
    let body = body.into_inner();
    body.validate().map_err(AppError::Validation)?;
    Ok(body)
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/users")
                        .route("/register", web::post().to(users::register))
                        .route("/login", web::post().to(users::login))
                        .service(
                            web::resource("")
                                .wrap(RequireAuth)
                                .route(web::get().to(users::me)),
                        ),
                )
                // Protected routes
                .service(
                    web::scope("/posts")
                        .wrap(RequireAuth)
                        .route("", web::post().to(posts::create))
                        .route("", web::get().to(posts::list))
                        .route("/like/{id}", web::put().to(posts::like))
                        .route("/unlike/{id}", web::put().to(posts::unlike))
                        .route("/comment/{id}", web::post().to(posts::comment))
                        .route(
                            "/comment/{id}/{comment_id}",
                            web::delete().to(posts::remove_comment),
                        )
                        .route("/{id}", web::get().to(posts::get))
                        .route("/{id}", web::delete().to(posts::delete)),
                )
                .service(
                    web::scope("/profiles")
                        .wrap(RequireAuth)
                        .route("", web::post().to(profiles::upsert))
                        .route("", web::get().to(profiles::list))
                        .route("", web::delete().to(profiles::delete_account))
                        .route("/me", web::get().to(profiles::me))
                        .route("/user/{user_id}", web::get().to(profiles::by_user))
                        .route("/upload", web::post().to(upload::upload))
                        .route("/experience", web::put().to(profiles::add_experience))
                        .route(
                            "/experience/{id}",
                            web::delete().to(profiles::remove_experience),
                        )
                        .route("/education", web::put().to(profiles::add_education))
                        .route(
                            "/education/{id}",
                            web::delete().to(profiles::remove_education),
                        )
                        .route("/follow/{user_id}", web::put().to(profiles::follow))
                        .route("/unfollow/{user_id}", web::put().to(profiles::unfollow))
                        .route("/followers", web::get().to(profiles::my_followers))
                        .route("/followers/{user_id}", web::get().to(profiles::followers))
                        .route("/following", web::get().to(profiles::my_following))
                        .route("/following/{user_id}", web::get().to(profiles::following)),
                ),
        );
}
