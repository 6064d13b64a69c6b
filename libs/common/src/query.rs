//! List filters and their query-string encoding
//!
//! The same structs are serialized into the request path by the client and
//! deserialized from the query string by the backend.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Filters that can be appended to an endpoint path as a query string
pub trait QueryParams {
    /// Present parameters in the order they should appear
    fn pairs(&self) -> Vec<(&'static str, String)>;

    /// Form-urlencoded query string without the leading `?`
    fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }
}

/// Append the filter's query string to `path`, omitting the `?` when empty
pub fn with_query(path: &str, params: &impl QueryParams) -> String {
    let query = params.to_query_string();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// Join `segments` onto `base`, percent-encoding each one so that ids and
/// slugs cannot introduce extra path segments, a query or a fragment
pub fn resource_path(base: &str, segments: &[&str]) -> String {
    let mut path = base.trim_end_matches('/').to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&urlencoding::encode(segment));
    }
    path
}

fn push<T: ToString>(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: &Option<T>) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

/// Offset pagination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl QueryParams for Pagination {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "skip", &self.skip);
        push(&mut pairs, "limit", &self.limit);
        pairs
    }
}

/// Pagination plus publication flag, used by the per-category, per-tag and
/// per-author post listings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageFilter {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub published: Option<bool>,
}

impl QueryParams for PageFilter {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "skip", &self.skip);
        push(&mut pairs, "limit", &self.limit);
        push(&mut pairs, "published", &self.published);
        pairs
    }
}

/// Filters for `GET /posts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostFilter {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub published: Option<bool>,
    pub category_id: Option<String>,
    pub tag_id: Option<String>,
    pub author_id: Option<String>,
}

impl PostFilter {
    pub fn published() -> Self {
        Self {
            published: Some(true),
            ..Self::default()
        }
    }
}

impl QueryParams for PostFilter {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "skip", &self.skip);
        push(&mut pairs, "limit", &self.limit);
        push(&mut pairs, "published", &self.published);
        push(&mut pairs, "category_id", &self.category_id);
        push(&mut pairs, "tag_id", &self.tag_id);
        push(&mut pairs, "author_id", &self.author_id);
        pairs
    }
}

/// Filters for `GET /categories`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub with_post_count: Option<bool>,
}

impl QueryParams for CategoryFilter {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "skip", &self.skip);
        push(&mut pairs, "limit", &self.limit);
        push(&mut pairs, "with_post_count", &self.with_post_count);
        pairs
    }
}

/// Filters for `GET /comments`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentFilter {
    pub post_id: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl QueryParams for CommentFilter {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "post_id", &self.post_id);
        push(&mut pairs, "skip", &self.skip);
        push(&mut pairs, "limit", &self.limit);
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_leaves_path_untouched() {
        assert_eq!(with_query("/posts", &PostFilter::default()), "/posts");
        assert_eq!(with_query("/tags", &Pagination::default()), "/tags");
    }

    #[test]
    fn test_post_filter_keeps_declaration_order() {
        let filter = PostFilter {
            skip: Some(10),
            limit: Some(5),
            published: Some(true),
            category_id: Some("3".to_string()),
            tag_id: Some("4".to_string()),
            author_id: Some("1".to_string()),
        };
        assert_eq!(
            with_query("/posts", &filter),
            "/posts?skip=10&limit=5&published=true&category_id=3&tag_id=4&author_id=1"
        );
    }

    #[test]
    fn test_only_present_fields_are_encoded() {
        let filter = PostFilter {
            published: Some(false),
            author_id: Some("7".to_string()),
            ..PostFilter::default()
        };
        assert_eq!(filter.to_query_string(), "published=false&author_id=7");

        let filter = CategoryFilter {
            with_post_count: Some(true),
            ..CategoryFilter::default()
        };
        assert_eq!(filter.to_query_string(), "with_post_count=true");
    }

    #[test]
    fn test_resource_path_encodes_each_segment() {
        assert_eq!(resource_path("/posts", &["slug", "hello"]), "/posts/slug/hello");
        assert_eq!(
            resource_path("/posts", &["slug", "a/b?c#d"]),
            "/posts/slug/a%2Fb%3Fc%23d"
        );
        assert_eq!(resource_path("/tags/", &["1", "posts", "2"]), "/tags/1/posts/2");
    }

    #[test]
    fn test_values_are_form_encoded() {
        let filter = CommentFilter {
            post_id: Some("a b&c".to_string()),
            ..CommentFilter::default()
        };
        assert_eq!(filter.to_query_string(), "post_id=a+b%26c");
    }
}
