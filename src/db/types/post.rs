use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

/// A blog post as stored in the `posts` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    /// Free-text category name, not a foreign key
    pub category: String,
    pub tags: Option<String>,
    pub published: bool,
    pub views: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            title: row.get("title"),
            slug: row.get("slug"),
            content: row.get("content"),
            excerpt: row.get("excerpt"),
            cover_image: row.get("cover_image"),
            category: row.get("category"),
            tags: row.get("tags"),
            published: row.get("published"),
            views: row.get("views"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

/// Column list shared by every query returning posts
pub(crate) const POST_COLUMNS: &str = "id, title, slug, content, excerpt, cover_image, category, \
     tags, published, views, created_at, updated_at";

/// Post data for inserting a new row; the slug is already resolved
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub category: String,
    pub tags: Option<String>,
    pub published: bool,
}

/// A single column assignment in a partial post update
#[derive(Debug, Clone, PartialEq)]
pub enum PostField {
    Title(String),
    Slug(String),
    Content(String),
    Excerpt(Option<String>),
    CoverImage(Option<String>),
    Category(String),
    Tags(Option<String>),
    Published(bool),
}

impl PostField {
    /// Column this field writes to
    pub fn column(&self) -> &'static str {
        match self {
            PostField::Title(_) => "title",
            PostField::Slug(_) => "slug",
            PostField::Content(_) => "content",
            PostField::Excerpt(_) => "excerpt",
            PostField::CoverImage(_) => "cover_image",
            PostField::Category(_) => "category",
            PostField::Tags(_) => "tags",
            PostField::Published(_) => "published",
        }
    }

    pub(crate) fn value(&self) -> &(dyn ToSql + Sync) {
        match self {
            PostField::Title(v) | PostField::Slug(v) | PostField::Content(v) | PostField::Category(v) => v,
            PostField::Excerpt(v) | PostField::CoverImage(v) | PostField::Tags(v) => v,
            PostField::Published(v) => v,
        }
    }
}

/// Filters for the public post listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostFilter {
    /// Exact category match
    pub category: Option<String>,
    /// Substring match against the tags column
    pub tag: Option<String>,
}

impl PostFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a category (builder pattern)
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to posts tagged with `tag` (builder pattern)
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_field_columns() {
        assert_eq!(PostField::Title("t".into()).column(), "title");
        assert_eq!(PostField::CoverImage(None).column(), "cover_image");
        assert_eq!(PostField::Published(true).column(), "published");
    }

    #[test]
    fn test_post_serializes_with_snake_case_columns() {
        let now = Utc::now();
        let post = Post {
            id: 1,
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            content: "Body".to_string(),
            excerpt: None,
            cover_image: Some("https://img/x.png".to_string()),
            category: "news".to_string(),
            tags: None,
            published: true,
            views: 3,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["cover_image"], "https://img/x.png");
        assert_eq!(value["views"], 3);
        assert!(value["excerpt"].is_null());
    }

    #[test]
    fn test_filter_builder() {
        let filter = PostFilter::new().with_category("rust").with_tag("async");
        assert_eq!(filter.category.as_deref(), Some("rust"));
        assert_eq!(filter.tag.as_deref(), Some("async"));
    }
}
