// /api/posts handlers

use serde_json::Value;
use warp::http::StatusCode;

use crate::blog::{PostDraft, PostPatch};
use crate::db::PostFilter;
use crate::models::MessageResponse;
use crate::state::AppState;

// GET /api/posts
pub async fn list_posts_handler(
    filter: PostFilter,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let posts = state.posts.list_published(&filter).await?;
    Ok(warp::reply::json(&posts))
}

// GET /api/posts/admin/all
pub async fn list_all_posts_handler(
    _username: String,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let posts = state.posts.list_all().await?;
    Ok(warp::reply::json(&posts))
}

// GET /api/posts/{slug}
pub async fn get_post_handler(
    slug: String,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let post = state.posts.get_by_slug(&slug).await?;
    Ok(warp::reply::json(&post))
}

// POST /api/posts
pub async fn create_post_handler(
    username: String,
    state: AppState,
    draft: PostDraft,
) -> Result<impl warp::Reply, warp::Rejection> {
    tracing::debug!("{} creating post '{}'", username, draft.title);
    let post = state.posts.create(draft).await?;

    Ok(warp::reply::with_status(
        warp::reply::json(&post),
        StatusCode::CREATED,
    ))
}

// PUT /api/posts/{id}
pub async fn update_post_handler(
    id: i32,
    _username: String,
    state: AppState,
    body: Value,
) -> Result<impl warp::Reply, warp::Rejection> {
    let patch = PostPatch::from_json(body)?;
    let post = state.posts.update(id, patch).await?;
    Ok(warp::reply::json(&post))
}

// DELETE /api/posts/{id}
pub async fn delete_post_handler(
    id: i32,
    _username: String,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    state.posts.delete(id).await?;
    Ok(warp::reply::json(&MessageResponse::new("Post deleted")))
}

// GET /api/categories
pub async fn list_categories_handler(state: AppState) -> Result<impl warp::Reply, warp::Rejection> {
    let categories = state.posts.list_categories().await?;
    Ok(warp::reply::json(&categories))
}
