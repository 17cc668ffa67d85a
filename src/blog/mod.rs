//! Post/category service: CRUD, slug derivation and view counting

pub mod patch;
pub mod service;
pub mod slug;

pub use patch::{PostDraft, PostPatch};
pub use service::PostService;
pub use slug::slugify;
