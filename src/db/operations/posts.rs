use crate::db::{
    error::{Error, Result},
    types::post::{NewPost, Post, PostField, PostFilter, POST_COLUMNS},
};
use deadpool_postgres::Pool;
use tokio_postgres::types::ToSql;

/// List published posts, newest first
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `filter` - Optional category (exact) and tag (literal substring) restrictions
pub async fn list_published(pool: &Pool, filter: &PostFilter) -> Result<Vec<Post>> {
    let conn = pool.get().await?;

    let sql = format!(
        "SELECT {} FROM posts
         WHERE published = TRUE
           AND ($1::TEXT IS NULL OR category = $1)
           AND ($2::TEXT IS NULL OR strpos(tags, $2) > 0)
         ORDER BY created_at DESC, id DESC",
        POST_COLUMNS
    );

    let rows = conn.query(&sql, &[&filter.category, &filter.tag]).await?;

    Ok(rows.iter().map(Post::from_row).collect())
}

/// List every post including drafts, newest first
pub async fn list_all(pool: &Pool) -> Result<Vec<Post>> {
    let conn = pool.get().await?;

    let sql = format!("SELECT {} FROM posts ORDER BY created_at DESC, id DESC", POST_COLUMNS);
    let rows = conn.query(&sql, &[]).await?;

    Ok(rows.iter().map(Post::from_row).collect())
}

/// Fetch a post by slug and count the view
///
/// The increment and the read happen in one statement, so the returned
/// post already carries the new view count.
///
/// # Errors
///
/// * `Error::NotFoundError` - No post has this slug
pub async fn fetch_and_count_view(pool: &Pool, slug: &str) -> Result<Post> {
    let conn = pool.get().await?;

    let sql = format!(
        "UPDATE posts SET views = views + 1 WHERE slug = $1 RETURNING {}",
        POST_COLUMNS
    );

    let row = conn
        .query_opt(&sql, &[&slug])
        .await?
        .ok_or_else(|| Error::NotFoundError(format!("post with slug '{}'", slug)))?;

    Ok(Post::from_row(&row))
}

/// Fetch a post by id without side effects
pub async fn find_by_id(pool: &Pool, id: i32) -> Result<Option<Post>> {
    let conn = pool.get().await?;

    let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
    let row = conn.query_opt(&sql, &[&id]).await?;

    Ok(row.as_ref().map(Post::from_row))
}

/// Insert a new post
///
/// # Errors
///
/// * `Error::ConflictError` - The slug is already taken
pub async fn insert(pool: &Pool, post: &NewPost) -> Result<Post> {
    let conn = pool.get().await?;

    let sql = format!(
        "INSERT INTO posts (title, slug, content, excerpt, cover_image, category, tags, published)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {}",
        POST_COLUMNS
    );

    let row = conn
        .query_one(
            &sql,
            &[
                &post.title,
                &post.slug,
                &post.content,
                &post.excerpt,
                &post.cover_image,
                &post.category,
                &post.tags,
                &post.published,
            ],
        )
        .await?;

    Ok(Post::from_row(&row))
}

/// Apply the given column assignments to a post and refresh `updated_at`
///
/// An empty field list still touches `updated_at`.
///
/// # Errors
///
/// * `Error::NotFoundError` - No post has this id
/// * `Error::ConflictError` - A new slug collides with another post
pub async fn update(pool: &Pool, id: i32, fields: &[PostField]) -> Result<Post> {
    let conn = pool.get().await?;

    let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(fields.len() + 1);
    let mut assignments = Vec::with_capacity(fields.len() + 1);

    for field in fields {
        params.push(field.value());
        assignments.push(format!("{} = ${}", field.column(), params.len()));
    }
    assignments.push("updated_at = NOW()".to_string());
    params.push(&id);

    let sql = format!(
        "UPDATE posts SET {} WHERE id = ${} RETURNING {}",
        assignments.join(", "),
        params.len(),
        POST_COLUMNS
    );

    let row = conn
        .query_opt(&sql, &params)
        .await?
        .ok_or_else(|| Error::NotFoundError(format!("post {}", id)))?;

    Ok(Post::from_row(&row))
}

/// Permanently delete a post
///
/// # Errors
///
/// * `Error::NotFoundError` - No post has this id
pub async fn delete(pool: &Pool, id: i32) -> Result<()> {
    let conn = pool.get().await?;

    let deleted = conn.execute("DELETE FROM posts WHERE id = $1", &[&id]).await?;
    if deleted == 0 {
        return Err(Error::NotFoundError(format!("post {}", id)));
    }

    Ok(())
}
