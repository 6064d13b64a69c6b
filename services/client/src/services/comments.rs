use std::collections::{HashMap, HashSet};

use common::{
    models::{Comment, CommentUpdate, NewComment},
    query::{CommentFilter, resource_path, with_query},
};
use serde::de::IgnoredAny;

use crate::{api::ApiClient, error::ApiResult};

const COMMENTS: &str = "/comments";

/// A comment with its replies nested below it
#[derive(Debug, Clone, PartialEq)]
pub struct CommentThread {
    pub comment: Comment,
    pub replies: Vec<CommentThread>,
}

impl CommentThread {
    /// Number of comments in the thread, root included
    pub fn comment_count(&self) -> usize {
        1 + self
            .replies
            .iter()
            .map(CommentThread::comment_count)
            .sum::<usize>()
    }
}

/// Arrange a flat comment list into reply trees
///
/// Roots are ordered newest first and replies oldest first. A reply whose
/// parent is not in the list becomes a root.
pub fn build_threads(comments: Vec<Comment>) -> Vec<CommentThread> {
    let ids: HashSet<String> = comments.iter().map(|c| c.comment_id.clone()).collect();

    let mut roots = Vec::new();
    let mut children: HashMap<String, Vec<Comment>> = HashMap::new();
    for comment in comments {
        match comment.parent_id.clone() {
            Some(parent_id) if ids.contains(&parent_id) => {
                children.entry(parent_id).or_default().push(comment)
            }
            _ => roots.push(comment),
        }
    }

    roots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    roots
        .into_iter()
        .map(|root| attach(root, &mut children))
        .collect()
}

fn attach(comment: Comment, children: &mut HashMap<String, Vec<Comment>>) -> CommentThread {
    let mut replies = children.remove(&comment.comment_id).unwrap_or_default();
    replies.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    CommentThread {
        replies: replies
            .into_iter()
            .map(|reply| attach(reply, children))
            .collect(),
        comment,
    }
}

#[derive(Clone)]
pub struct CommentService {
    api: ApiClient,
}

impl CommentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filter: &CommentFilter) -> ApiResult<Vec<Comment>> {
        self.api.get(&with_query(COMMENTS, filter)).await
    }

    pub async fn get_by_id(&self, comment_id: &str) -> ApiResult<Comment> {
        self.api.get(&resource_path(COMMENTS, &[comment_id])).await
    }

    pub async fn create(&self, comment: &NewComment) -> ApiResult<Comment> {
        self.api.post(COMMENTS, comment).await
    }

    pub async fn update(&self, comment_id: &str, content: &str) -> ApiResult<Comment> {
        let update = CommentUpdate {
            content: content.to_string(),
        };
        self.api
            .put(&resource_path(COMMENTS, &[comment_id]), &update)
            .await
    }

    pub async fn delete(&self, comment_id: &str) -> ApiResult<()> {
        self.api.delete(&resource_path(COMMENTS, &[comment_id])).await
    }

    pub async fn list_by_post(&self, post_id: &str) -> ApiResult<Vec<Comment>> {
        self.api.get(&resource_path(COMMENTS, &["post", post_id])).await
    }

    pub async fn like(&self, comment_id: &str) -> ApiResult<()> {
        self.api
            .post::<_, IgnoredAny>(&resource_path(COMMENTS, &[comment_id, "like"]), &())
            .await?;
        Ok(())
    }

    pub async fn unlike(&self, comment_id: &str) -> ApiResult<()> {
        self.api
            .delete::<IgnoredAny>(&resource_path(COMMENTS, &[comment_id, "like"]))
            .await?;
        Ok(())
    }

    /// Comments on a post arranged as reply trees
    pub async fn threads_for_post(&self, post_id: &str) -> ApiResult<Vec<CommentThread>> {
        Ok(build_threads(self.list_by_post(post_id).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn comment(id: &str, parent: Option<&str>, minutes: i64) -> Comment {
        let at = Utc::now() + Duration::minutes(minutes);
        Comment {
            comment_id: id.to_string(),
            content: format!("comment {id}"),
            post_id: "1".to_string(),
            user_id: "1".to_string(),
            parent_id: parent.map(str::to_string),
            likes: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn ids(threads: &[CommentThread]) -> Vec<&str> {
        threads
            .iter()
            .map(|t| t.comment.comment_id.as_str())
            .collect()
    }

    #[test]
    fn test_replies_nest_under_parents() {
        let threads = build_threads(vec![
            comment("1", None, 0),
            comment("2", Some("1"), 5),
            comment("3", Some("2"), 6),
            comment("4", None, 10),
        ]);

        assert_eq!(ids(&threads), vec!["4", "1"]);
        assert_eq!(threads[1].comment_count(), 3);
        assert_eq!(ids(&threads[1].replies), vec!["2"]);
        assert_eq!(ids(&threads[1].replies[0].replies), vec!["3"]);
    }

    #[test]
    fn test_replies_are_oldest_first() {
        let threads = build_threads(vec![
            comment("1", None, 0),
            comment("late", Some("1"), 20),
            comment("early", Some("1"), 1),
        ]);

        assert_eq!(ids(&threads[0].replies), vec!["early", "late"]);
    }

    #[test]
    fn test_orphaned_reply_becomes_root() {
        let threads = build_threads(vec![comment("1", None, 0), comment("2", Some("gone"), 3)]);
        assert_eq!(ids(&threads), vec!["2", "1"]);
    }

    #[test]
    fn test_empty_list() {
        assert!(build_threads(Vec::new()).is_empty());
    }
}
