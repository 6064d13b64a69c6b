use common::{
    models::{NewTag, Tag, TagUpdate},
    query::{Pagination, resource_path, with_query},
};
use serde::de::IgnoredAny;

use crate::{api::ApiClient, error::ApiResult};

const TAGS: &str = "/tags";

#[derive(Clone)]
pub struct TagService {
    api: ApiClient,
}

impl TagService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, pagination: &Pagination) -> ApiResult<Vec<Tag>> {
        self.api.get(&with_query(TAGS, pagination)).await
    }

    pub async fn get_by_id(&self, tag_id: &str) -> ApiResult<Tag> {
        self.api.get(&resource_path(TAGS, &[tag_id])).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> ApiResult<Tag> {
        self.api.get(&resource_path(TAGS, &["slug", slug])).await
    }

    pub async fn create(&self, tag: &NewTag) -> ApiResult<Tag> {
        self.api.post(TAGS, tag).await
    }

    pub async fn update(&self, tag_id: &str, update: &TagUpdate) -> ApiResult<Tag> {
        self.api.put(&resource_path(TAGS, &[tag_id]), update).await
    }

    pub async fn delete(&self, tag_id: &str) -> ApiResult<()> {
        self.api.delete(&resource_path(TAGS, &[tag_id])).await
    }

    /// Attach a tag to a post
    pub async fn add_post(&self, tag_id: &str, post_id: &str) -> ApiResult<()> {
        self.api
            .post::<_, IgnoredAny>(&resource_path(TAGS, &[tag_id, "posts", post_id]), &())
            .await
            .map(|_| ())
    }

    pub async fn remove_post(&self, tag_id: &str, post_id: &str) -> ApiResult<()> {
        self.api
            .delete::<IgnoredAny>(&resource_path(TAGS, &[tag_id, "posts", post_id]))
            .await
            .map(|_| ())
    }
}
