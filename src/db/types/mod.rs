pub mod category;
pub mod post;
pub mod user;

pub use category::Category;
pub use post::{NewPost, Post, PostField, PostFilter};
pub use user::{User, UserProfile};
