use crate::db::{error::Result, types::Category};
use deadpool_postgres::Pool;

/// List all categories ordered by name
pub async fn list(pool: &Pool) -> Result<Vec<Category>> {
    let conn = pool.get().await?;

    let rows = conn
        .query("SELECT id, name, slug FROM categories ORDER BY name", &[])
        .await?;

    Ok(rows.iter().map(Category::from_row).collect())
}

/// Insert a category, ignoring duplicates
pub async fn insert_if_absent(pool: &Pool, name: &str, slug: &str) -> Result<bool> {
    let conn = pool.get().await?;

    let inserted = conn
        .execute(
            "INSERT INTO categories (name, slug) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            &[&name, &slug],
        )
        .await?;

    Ok(inserted == 1)
}
