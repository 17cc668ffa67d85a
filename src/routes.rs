// Route definitions

use serde::de::DeserializeOwned;
use warp::http::Method;
use warp::{Filter, Rejection};

use crate::auth::with_auth;
use crate::db::PostFilter;
use crate::error::handle_rejection;
use crate::handlers;
use crate::state::{with_state, AppState};
use crate::upload::MAX_UPLOAD_BYTES;

/// Largest accepted JSON body
const MAX_JSON_BYTES: u64 = 1024 * 1024;

/// Size-limited JSON body
fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
{
    warp::body::content_length_limit(MAX_JSON_BYTES).and(warp::body::json())
}

pub fn configure_routes(
    state: AppState,
) -> impl Filter<Extract = impl warp::Reply, Error = Rejection> + Clone {
    let api = warp::path("api");
    let auth = with_auth(state.tokens().clone());

    // POST /api/auth/login
    let login = api
        .and(warp::path!("auth" / "login"))
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(json_body())
        .and_then(handlers::login_handler);

    // GET /api/auth/verify
    let verify = api
        .and(warp::path!("auth" / "verify"))
        .and(warp::get())
        .and(auth.clone())
        .and(with_state(state.clone()))
        .and_then(handlers::verify_handler);

    // PUT /api/auth/password
    let change_password = api
        .and(warp::path!("auth" / "password"))
        .and(warp::put())
        .and(auth.clone())
        .and(with_state(state.clone()))
        .and(json_body())
        .and_then(handlers::change_password_handler);

    // GET /api/posts?category=&tag=
    let list_posts = api
        .and(warp::path!("posts"))
        .and(warp::get())
        .and(warp::query::<PostFilter>())
        .and(with_state(state.clone()))
        .and_then(handlers::list_posts_handler);

    // GET /api/posts/admin/all
    let list_all_posts = api
        .and(warp::path!("posts" / "admin" / "all"))
        .and(warp::get())
        .and(auth.clone())
        .and(with_state(state.clone()))
        .and_then(handlers::list_all_posts_handler);

    // GET /api/posts/{slug}
    let get_post = api
        .and(warp::path!("posts" / String))
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::get_post_handler);

    // POST /api/posts
    let create_post = api
        .and(warp::path!("posts"))
        .and(warp::post())
        .and(auth.clone())
        .and(with_state(state.clone()))
        .and(json_body())
        .and_then(handlers::create_post_handler);

    // PUT /api/posts/{id}
    let update_post = api
        .and(warp::path!("posts" / i32))
        .and(warp::put())
        .and(auth.clone())
        .and(with_state(state.clone()))
        .and(json_body())
        .and_then(handlers::update_post_handler);

    // DELETE /api/posts/{id}
    let delete_post = api
        .and(warp::path!("posts" / i32))
        .and(warp::delete())
        .and(auth.clone())
        .and(with_state(state.clone()))
        .and_then(handlers::delete_post_handler);

    // GET /api/categories
    let list_categories = api
        .and(warp::path!("categories"))
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::list_categories_handler);

    // POST /api/upload
    let upload = api
        .and(warp::path!("upload"))
        .and(warp::post())
        .and(auth)
        .and(with_state(state.clone()))
        .and(warp::multipart::form().max_length(MAX_UPLOAD_BYTES))
        .and_then(handlers::upload_handler);

    // POST /api/chat
    let chat = api
        .and(warp::path!("chat"))
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(json_body())
        .and_then(handlers::chat_handler);

    // GET /api/health
    let health = api
        .and(warp::path!("health"))
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::health_handler);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(vec!["authorization", "content-type"]);

    // Combine routes
    login
        .or(verify)
        .or(change_password)
        .or(list_all_posts)
        .or(list_posts)
        .or(get_post)
        .or(create_post)
        .or(update_post)
        .or(delete_post)
        .or(list_categories)
        .or(upload)
        .or(chat)
        .or(health)
        .recover(handle_rejection)
        .with(cors)
        .with(warp::trace::request())
}
