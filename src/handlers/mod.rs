// Handlers module

pub mod auth;
pub mod chat;
pub mod health;
pub mod posts;
pub mod upload;

pub use auth::{change_password_handler, login_handler, verify_handler};
pub use chat::chat_handler;
pub use health::health_handler;
pub use posts::{
    create_post_handler, delete_post_handler, get_post_handler, list_all_posts_handler,
    list_categories_handler, list_posts_handler, update_post_handler,
};
pub use upload::upload_handler;
