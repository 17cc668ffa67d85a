// /api/auth handlers

use crate::models::{LoginRequest, LoginResponse, MessageResponse, PasswordChangeRequest};
use crate::state::AppState;

// POST /api/auth/login
pub async fn login_handler(
    state: AppState,
    request: LoginRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let session = state
        .accounts
        .login(&request.username, &request.password)
        .await?;

    Ok(warp::reply::json(&LoginResponse::from(session)))
}

// GET /api/auth/verify
pub async fn verify_handler(
    username: String,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let profile = state.accounts.verify(&username).await?;
    Ok(warp::reply::json(&profile))
}

// PUT /api/auth/password
pub async fn change_password_handler(
    username: String,
    state: AppState,
    request: PasswordChangeRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    state
        .accounts
        .change_password(&username, &request.current_password, &request.new_password)
        .await?;

    Ok(warp::reply::json(&MessageResponse::new("Password updated")))
}
