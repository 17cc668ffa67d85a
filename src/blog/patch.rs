//! Partial post updates
//!
//! A patch records only the keys the caller actually sent. A key sent as
//! `null` clears a nullable column; a missing key leaves the column alone.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::db::PostField;
use crate::error::AppError;

/// Body of a create request
#[derive(Debug, Clone, Deserialize)]
pub struct PostDraft {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub published: bool,
}

/// Ordered set of column assignments taken from a JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    fields: Vec<PostField>,
}

impl PostPatch {
    /// Build a patch from a request body
    ///
    /// Keys that aren't patchable (`id`, `views`, timestamps) or unknown are
    /// ignored. A key with the wrong JSON type is a `BadRequest`.
    pub fn from_json(body: Value) -> Result<Self, AppError> {
        match body {
            Value::Object(map) => Self::from_map(map),
            _ => Err(AppError::BadRequest(
                "Update body must be a JSON object".to_string(),
            )),
        }
    }

    fn from_map(map: Map<String, Value>) -> Result<Self, AppError> {
        let mut fields = Vec::with_capacity(map.len());

        for (key, value) in map {
            let field = match key.as_str() {
                "title" => PostField::Title(required_text(&key, value)?),
                "slug" => PostField::Slug(required_text(&key, value)?),
                "content" => PostField::Content(string(&key, value)?),
                "category" => PostField::Category(string(&key, value)?),
                "excerpt" => PostField::Excerpt(nullable_string(&key, value)?),
                "cover_image" => PostField::CoverImage(nullable_string(&key, value)?),
                "tags" => PostField::Tags(nullable_string(&key, value)?),
                "published" => match value {
                    Value::Bool(b) => PostField::Published(b),
                    _ => return Err(wrong_type(&key, "a boolean")),
                },
                _ => continue,
            };
            fields.push(field);
        }

        Ok(Self { fields })
    }

    pub fn with_field(mut self, field: PostField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[PostField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn wrong_type(key: &str, expected: &str) -> AppError {
    AppError::BadRequest(format!("Field '{}' must be {}", key, expected))
}

fn string(key: &str, value: Value) -> Result<String, AppError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(wrong_type(key, "a string")),
    }
}

fn required_text(key: &str, value: Value) -> Result<String, AppError> {
    let s = string(key, value)?;
    if s.trim().is_empty() {
        return Err(AppError::BadRequest(format!("Field '{}' must not be empty", key)));
    }
    Ok(s)
}

fn nullable_string(key: &str, value: Value) -> Result<Option<String>, AppError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        _ => Err(wrong_type(key, "a string or null")),
    }
}
