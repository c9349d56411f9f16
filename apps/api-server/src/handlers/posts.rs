//! Posts, likes and comments.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use circle_core::domain::{Comment, Post, PostChange, User};
use circle_shared::MessageResponse;
use circle_shared::dto::TextRequest;

use super::validated;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// The stored account behind a token; tokens outlive deleted accounts.
async fn caller(state: &AppState, identity: Identity) -> AppResult<User> {
    state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

async fn find_post(state: &AppState, id: Uuid) -> AppResult<Post> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<TextRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body)?;
    let user = caller(&state, identity).await?;

    let post = state.posts.create(Post::new(&user, req.text)).await?;

    Ok(HttpResponse::Created().json(post))
}

/// GET /api/posts - newest first.
pub async fn list(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.posts.list_recent().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id} - author only.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    post.ensure_author(identity.user_id)?;

    state.posts.delete(post.id).await?;
    tracing::info!(post_id = %post.id, user_id = %identity.user_id, "Post removed");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post removed")))
}

/// PUT /api/posts/like/{id} - returns the post's likes.
pub async fn like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user = caller(&state, identity).await?;
    let change = PostChange::Like { user: user.id };
    let post = state.posts.modify(path.into_inner(), change).await?;

    Ok(HttpResponse::Ok().json(post.likes))
}

/// PUT /api/posts/unlike/{id} - returns the post's likes.
pub async fn unlike(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user = caller(&state, identity).await?;
    let change = PostChange::Unlike { user: user.id };
    let post = state.posts.modify(path.into_inner(), change).await?;

    Ok(HttpResponse::Ok().json(post.likes))
}

/// POST /api/posts/comment/{id} - returns the post's comments.
pub async fn comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<TextRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body)?;
    let user = caller(&state, identity).await?;

    let change = PostChange::Comment(Comment::new(&user, req.text));
    let post = state.posts.modify(path.into_inner(), change).await?;

    Ok(HttpResponse::Ok().json(post.comments))
}

/// DELETE /api/posts/comment/{id}/{comment_id} - comment author only.
pub async fn remove_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let user = caller(&state, identity).await?;
    let change = PostChange::RemoveComment {
        comment_id,
        user: user.id,
    };
    let post = state.posts.modify(post_id, change).await?;

    tracing::info!(%post_id, %comment_id, "Comment removed");

    Ok(HttpResponse::Ok().json(post.comments))
}
