use common::{
    models::{NewPost, Post, PostStats, PostUpdate},
    query::{PageFilter, PostFilter, resource_path, with_query},
};

use crate::{api::ApiClient, error::ApiResult};

const POSTS: &str = "/posts";

/// Page size used when walking an author's whole listing
const STATS_PAGE_SIZE: u32 = 100;

#[derive(Clone)]
pub struct PostService {
    api: ApiClient,
}

impl PostService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filter: &PostFilter) -> ApiResult<Vec<Post>> {
        self.api.get(&with_query(POSTS, filter)).await
    }

    pub async fn get_by_id(&self, post_id: &str) -> ApiResult<Post> {
        self.api.get(&resource_path(POSTS, &[post_id])).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> ApiResult<Post> {
        self.api.get(&resource_path(POSTS, &["slug", slug])).await
    }

    pub async fn create(&self, post: &NewPost) -> ApiResult<Post> {
        self.api.post(POSTS, post).await
    }

    pub async fn update(&self, post_id: &str, update: &PostUpdate) -> ApiResult<Post> {
        self.api.put(&resource_path(POSTS, &[post_id]), update).await
    }

    pub async fn delete(&self, post_id: &str) -> ApiResult<()> {
        self.api.delete(&resource_path(POSTS, &[post_id])).await
    }

    pub async fn list_by_category(
        &self,
        category_id: &str,
        filter: &PageFilter,
    ) -> ApiResult<Vec<Post>> {
        let path = resource_path(POSTS, &["category", category_id]);
        self.api.get(&with_query(&path, filter)).await
    }

    pub async fn list_by_tag(&self, tag_id: &str, filter: &PageFilter) -> ApiResult<Vec<Post>> {
        let path = resource_path(POSTS, &["tag", tag_id]);
        self.api.get(&with_query(&path, filter)).await
    }

    pub async fn list_by_user(&self, user_id: &str, filter: &PageFilter) -> ApiResult<Vec<Post>> {
        let path = resource_path(POSTS, &["user", user_id]);
        self.api.get(&with_query(&path, filter)).await
    }

    /// Posts whose title, content or summary contain `query`
    ///
    /// Matching happens client side over the filtered listing. A blank
    /// query returns the whole listing.
    pub async fn search(&self, query: &str, filter: &PostFilter) -> ApiResult<Vec<Post>> {
        let posts = self.list(filter).await?;
        if query.trim().is_empty() {
            return Ok(posts);
        }

        Ok(posts
            .into_iter()
            .filter(|post| post.matches_query(query))
            .collect())
    }

    /// Dashboard totals for one author, drafts included
    pub async fn author_stats(&self, author_id: &str) -> ApiResult<PostStats> {
        let mut posts: Vec<Post> = Vec::new();
        loop {
            let filter = PageFilter {
                skip: Some(posts.len() as u32),
                limit: Some(STATS_PAGE_SIZE),
                published: None,
            };
            let page = self.list_by_user(author_id, &filter).await?;
            let last = page.len() < STATS_PAGE_SIZE as usize;
            posts.extend(page);
            if last {
                break;
            }
        }
        Ok(PostStats::from_posts(&posts))
    }
}
