use common::{
    models::{Category, CategoryUpdate, NewCategory},
    query::{CategoryFilter, resource_path, with_query},
};
use serde::de::IgnoredAny;

use crate::{api::ApiClient, error::ApiResult};

const CATEGORIES: &str = "/categories";

#[derive(Clone)]
pub struct CategoryService {
    api: ApiClient,
}

impl CategoryService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filter: &CategoryFilter) -> ApiResult<Vec<Category>> {
        self.api.get(&with_query(CATEGORIES, filter)).await
    }

    pub async fn get_by_id(&self, category_id: &str) -> ApiResult<Category> {
        self.api.get(&resource_path(CATEGORIES, &[category_id])).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> ApiResult<Category> {
        self.api.get(&resource_path(CATEGORIES, &["slug", slug])).await
    }

    pub async fn create(&self, category: &NewCategory) -> ApiResult<Category> {
        self.api.post(CATEGORIES, category).await
    }

    pub async fn update(&self, category_id: &str, update: &CategoryUpdate) -> ApiResult<Category> {
        self.api
            .put(&resource_path(CATEGORIES, &[category_id]), update)
            .await
    }

    pub async fn delete(&self, category_id: &str) -> ApiResult<()> {
        self.api.delete(&resource_path(CATEGORIES, &[category_id])).await
    }

    pub async fn add_post(&self, category_id: &str, post_id: &str) -> ApiResult<()> {
        let path = resource_path(CATEGORIES, &[category_id, "posts", post_id]);
        self.api.post::<_, IgnoredAny>(&path, &()).await?;
        Ok(())
    }

    pub async fn remove_post(&self, category_id: &str, post_id: &str) -> ApiResult<()> {
        let path = resource_path(CATEGORIES, &[category_id, "posts", post_id]);
        self.api.delete::<IgnoredAny>(&path).await?;
        Ok(())
    }
}
