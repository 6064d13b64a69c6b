//! Post model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, Tag};

/// Post entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub is_published: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: String,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(default)]
    pub reading_time: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Case-insensitive match of `query` against title, content and summary
    ///
    /// An empty or blank query matches every post.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
            || self
                .summary
                .as_deref()
                .is_some_and(|summary| summary.to_lowercase().contains(&needle))
    }
}

/// New post creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<String>,
}

/// Post update payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PostUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<String>>,
}

/// Per-author totals shown on the profile dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStats {
    pub total_posts: usize,
    pub published_posts: usize,
    pub draft_posts: usize,
}

impl PostStats {
    pub fn from_posts(posts: &[Post]) -> Self {
        let published_posts = posts.iter().filter(|post| post.is_published).count();
        Self {
            total_posts: posts.len(),
            published_posts,
            draft_posts: posts.len() - published_posts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, content: &str, summary: Option<&str>, is_published: bool) -> Post {
        Post {
            post_id: "1".to_string(),
            title: title.to_string(),
            slug: "slug".to_string(),
            content: content.to_string(),
            summary: summary.map(str::to_string),
            cover_image: None,
            is_published,
            published_at: None,
            author_id: "1".to_string(),
            categories: vec![],
            tags: vec![],
            views: None,
            likes: None,
            reading_time: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_matches_query_is_case_insensitive() {
        let post = post("Rust in Production", "Body", Some("Lessons LEARNED"), true);
        assert!(post.matches_query("rust"));
        assert!(post.matches_query("learned"));
        assert!(post.matches_query("  body "));
        assert!(!post.matches_query("python"));
        assert!(post.matches_query("   "));
    }

    #[test]
    fn test_post_stats_from_posts() {
        let posts = vec![
            post("a", "", None, true),
            post("b", "", None, false),
            post("c", "", None, true),
        ];
        assert_eq!(
            PostStats::from_posts(&posts),
            PostStats {
                total_posts: 3,
                published_posts: 2,
                draft_posts: 1,
            }
        );
        assert_eq!(PostStats::from_posts(&[]), PostStats::default());
    }

    #[test]
    fn test_post_deserializes_without_optional_fields() {
        let json = r#"{
            "post_id": "7",
            "title": "Hello",
            "slug": "hello",
            "content": "World",
            "is_published": false,
            "author_id": "2",
            "created_at": "2023-01-15T08:30:00Z",
            "updated_at": "2023-01-15T08:30:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert!(post.categories.is_empty());
        assert_eq!(post.summary, None);
    }
}
