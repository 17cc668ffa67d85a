use tracing::info;

use crate::blog::patch::{PostDraft, PostPatch};
use crate::blog::slug::slugify;
use crate::db::{BlogDb, Category, NewPost, Post, PostField, PostFilter};
use crate::error::AppError;

/// Post and category operations on top of the blog store
#[derive(Clone)]
pub struct PostService {
    db: BlogDb,
}

impl PostService {
    pub fn new(db: BlogDb) -> Self {
        Self { db }
    }

    /// Published posts, newest first
    pub async fn list_published(&self, filter: &PostFilter) -> Result<Vec<Post>, AppError> {
        Ok(self.db.list_published_posts(filter).await?)
    }

    /// Every post including drafts, newest first
    pub async fn list_all(&self) -> Result<Vec<Post>, AppError> {
        Ok(self.db.list_all_posts().await?)
    }

    /// Fetch a post by slug; each call counts one view
    pub async fn get_by_slug(&self, slug: &str) -> Result<Post, AppError> {
        self.db.view_post(slug).await.map_err(|err| match err {
            crate::db::Error::NotFoundError(_) => AppError::NotFound("Post not found".to_string()),
            other => other.into(),
        })
    }

    /// Create a post, deriving the slug from the title when none is given
    pub async fn create(&self, draft: PostDraft) -> Result<Post, AppError> {
        if draft.title.trim().is_empty() {
            return Err(AppError::BadRequest("Title must not be empty".to_string()));
        }

        let slug = match draft.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => slugify(&draft.title),
        };
        if slug.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Cannot derive a slug from title '{}'",
                draft.title
            )));
        }

        let new_post = NewPost {
            title: draft.title,
            slug,
            content: draft.content,
            excerpt: draft.excerpt,
            cover_image: draft.cover_image,
            category: draft.category,
            tags: draft.tags,
            published: draft.published,
        };

        let post = self.db.insert_post(&new_post).await.map_err(|err| match err {
            crate::db::Error::ConflictError(_) => {
                AppError::Conflict(format!("Slug '{}' already exists", new_post.slug))
            }
            other => other.into(),
        })?;

        info!("Created post {} ({})", post.id, post.slug);
        Ok(post)
    }

    /// Apply the supplied fields and refresh `updated_at`
    pub async fn update(&self, id: i32, patch: PostPatch) -> Result<Post, AppError> {
        let new_slug = patch.fields().iter().find_map(|field| match field {
            PostField::Slug(slug) => Some(slug.clone()),
            _ => None,
        });

        self.db
            .update_post(id, patch.fields())
            .await
            .map_err(|err| match err {
                crate::db::Error::NotFoundError(_) => {
                    AppError::NotFound("Post not found".to_string())
                }
                crate::db::Error::ConflictError(_) => AppError::Conflict(format!(
                    "Slug '{}' already exists",
                    new_slug.as_deref().unwrap_or_default()
                )),
                other => other.into(),
            })
    }

    /// Permanently delete a post
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.db.delete_post(id).await.map_err(|err| match err {
            crate::db::Error::NotFoundError(_) => AppError::NotFound("Post not found".to_string()),
            other => other.into(),
        })?;

        info!("Deleted post {}", id);
        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.db.list_categories().await?)
    }
}
