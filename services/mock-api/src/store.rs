//! In-memory record store backing the mock API
//!
//! Posts keep their category and tag links as ID lists and are rendered
//! into the wire [`Post`] shape with the linked records embedded.

use chrono::Utc;
use common::{
    models::{
        Category, CategoryUpdate, Comment, NewCategory, NewComment, NewPost, NewTag, Post,
        PostUpdate, Tag, TagUpdate, User,
    },
    query::{CategoryFilter, CommentFilter, PageFilter, Pagination, PostFilter},
    validation::slugify,
};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

const DEFAULT_LIMIT: u32 = 100;
const WORDS_PER_MINUTE: usize = 200;

/// Store failures, mapped onto HTTP statuses by the route layer
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User row with its password hash
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

/// Post row; categories and tags are stored as links
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub post_id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub summary: Option<String>,
    pub cover_image: Option<String>,
    pub is_published: bool,
    pub published_at: Option<chrono::DateTime<Utc>>,
    pub author_id: String,
    pub category_ids: Vec<String>,
    pub tag_ids: Vec<String>,
    pub views: u64,
    pub likes: u64,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

/// All mock records
#[derive(Debug, Default)]
pub struct BlogStore {
    pub users: Vec<UserRecord>,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    pub posts: Vec<PostRecord>,
    pub comments: Vec<Comment>,
    comment_likes: HashSet<(String, String)>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn page<T>(items: Vec<T>, skip: Option<u32>, limit: Option<u32>) -> Vec<T> {
    items
        .into_iter()
        .skip(skip.unwrap_or(0) as usize)
        .take(limit.unwrap_or(DEFAULT_LIMIT) as usize)
        .collect()
}

fn reading_time(content: &str) -> String {
    let words = content.split_whitespace().count();
    format!("{} min read", (words / WORDS_PER_MINUTE).max(1))
}

impl BlogStore {
    // ---- users ----

    pub fn find_user(&self, user_id: &str) -> Option<&UserRecord> {
        self.users.iter().find(|record| record.user.user_id == user_id)
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users
            .iter()
            .find(|record| record.user.email.eq_ignore_ascii_case(email))
    }

    pub fn insert_user(
        &mut self,
        email: &str,
        username: &str,
        full_name: Option<String>,
        password_hash: String,
    ) -> StoreResult<User> {
        if self.find_user_by_email(email).is_some() {
            return Err(StoreError::Conflict(
                "The user with this email already exists in the system".to_string(),
            ));
        }
        if self.users.iter().any(|record| record.user.username == username) {
            return Err(StoreError::Conflict(
                "The user with this username already exists in the system".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            user_id: new_id(),
            username: username.to_string(),
            email: email.to_string(),
            full_name,
            bio: None,
            profile_picture: None,
            is_active: true,
            is_superuser: false,
            created_at: now,
            updated_at: now,
        };
        self.users.push(UserRecord {
            user: user.clone(),
            password_hash,
        });

        Ok(user)
    }

    // ---- posts ----

    fn render_post(&self, record: &PostRecord) -> Post {
        Post {
            post_id: record.post_id.clone(),
            title: record.title.clone(),
            slug: record.slug.clone(),
            content: record.content.clone(),
            summary: record.summary.clone(),
            cover_image: record.cover_image.clone(),
            is_published: record.is_published,
            published_at: record.published_at,
            author_id: record.author_id.clone(),
            categories: self
                .categories
                .iter()
                .filter(|category| record.category_ids.contains(&category.category_id))
                .cloned()
                .collect(),
            tags: self
                .tags
                .iter()
                .filter(|tag| record.tag_ids.contains(&tag.tag_id))
                .cloned()
                .collect(),
            views: Some(record.views),
            likes: Some(record.likes),
            reading_time: Some(reading_time(&record.content)),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    fn post_record(&self, post_id: &str) -> StoreResult<&PostRecord> {
        self.posts
            .iter()
            .find(|record| record.post_id == post_id)
            .ok_or(StoreError::NotFound("Post"))
    }

    fn post_record_mut(&mut self, post_id: &str) -> StoreResult<&mut PostRecord> {
        self.posts
            .iter_mut()
            .find(|record| record.post_id == post_id)
            .ok_or(StoreError::NotFound("Post"))
    }

    pub fn list_posts(&self, filter: &PostFilter) -> Vec<Post> {
        let mut records: Vec<&PostRecord> = self
            .posts
            .iter()
            .filter(|record| filter.published.is_none_or(|p| record.is_published == p))
            .filter(|record| {
                filter
                    .category_id
                    .as_ref()
                    .is_none_or(|id| record.category_ids.contains(id))
            })
            .filter(|record| {
                filter
                    .tag_id
                    .as_ref()
                    .is_none_or(|id| record.tag_ids.contains(id))
            })
            .filter(|record| {
                filter
                    .author_id
                    .as_ref()
                    .is_none_or(|id| &record.author_id == id)
            })
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let posts: Vec<Post> = records
            .into_iter()
            .map(|record| self.render_post(record))
            .collect();
        page(posts, filter.skip, filter.limit)
    }

    pub fn list_posts_where(&self, base: PostFilter, paging: &PageFilter) -> Vec<Post> {
        self.list_posts(&PostFilter {
            skip: paging.skip,
            limit: paging.limit,
            published: paging.published,
            ..base
        })
    }

    pub fn get_post(&self, post_id: &str) -> StoreResult<Post> {
        self.post_record(post_id).map(|record| self.render_post(record))
    }

    pub fn get_post_by_slug(&self, slug: &str) -> StoreResult<Post> {
        self.posts
            .iter()
            .find(|record| record.slug == slug)
            .map(|record| self.render_post(record))
            .ok_or(StoreError::NotFound("Post"))
    }

    pub fn post_author(&self, post_id: &str) -> StoreResult<String> {
        self.post_record(post_id).map(|record| record.author_id.clone())
    }

    fn unique_post_slug(&self, title: &str) -> String {
        let base = match slugify(title) {
            slug if slug.is_empty() => "post".to_string(),
            slug => slug,
        };
        let mut slug = base.clone();
        let mut n = 2;
        while self.posts.iter().any(|record| record.slug == slug) {
            slug = format!("{base}-{n}");
            n += 1;
        }
        slug
    }

    fn check_links(&self, category_ids: &[String], tag_ids: &[String]) -> StoreResult<()> {
        for id in category_ids {
            if !self.categories.iter().any(|c| &c.category_id == id) {
                return Err(StoreError::NotFound("Category"));
            }
        }
        for id in tag_ids {
            if !self.tags.iter().any(|t| &t.tag_id == id) {
                return Err(StoreError::NotFound("Tag"));
            }
        }
        Ok(())
    }

    pub fn insert_post(&mut self, author_id: &str, new_post: NewPost) -> StoreResult<Post> {
        self.check_links(&new_post.category_ids, &new_post.tag_ids)?;

        let now = Utc::now();
        let record = PostRecord {
            post_id: new_id(),
            slug: self.unique_post_slug(&new_post.title),
            title: new_post.title,
            content: new_post.content,
            summary: new_post.summary,
            cover_image: new_post.cover_image,
            is_published: new_post.is_published,
            published_at: new_post.is_published.then_some(now),
            author_id: author_id.to_string(),
            category_ids: new_post.category_ids,
            tag_ids: new_post.tag_ids,
            views: 0,
            likes: 0,
            created_at: now,
            updated_at: now,
        };
        let post = self.render_post(&record);
        self.posts.push(record);

        Ok(post)
    }

    pub fn update_post(&mut self, post_id: &str, update: PostUpdate) -> StoreResult<Post> {
        self.check_links(
            update.category_ids.as_deref().unwrap_or_default(),
            update.tag_ids.as_deref().unwrap_or_default(),
        )?;
        let new_slug = match &update.title {
            Some(title) if self.post_record(post_id)?.title != *title => {
                Some(self.unique_post_slug(title))
            }
            _ => None,
        };

        let record = self.post_record_mut(post_id)?;
        let now = Utc::now();
        if let Some(title) = update.title {
            record.title = title;
        }
        if let Some(slug) = new_slug {
            record.slug = slug;
        }
        if let Some(content) = update.content {
            record.content = content;
        }
        if update.summary.is_some() {
            record.summary = update.summary;
        }
        if update.cover_image.is_some() {
            record.cover_image = update.cover_image;
        }
        if let Some(is_published) = update.is_published {
            if is_published && !record.is_published {
                record.published_at = Some(now);
            }
            record.is_published = is_published;
        }
        if let Some(category_ids) = update.category_ids {
            record.category_ids = category_ids;
        }
        if let Some(tag_ids) = update.tag_ids {
            record.tag_ids = tag_ids;
        }
        record.updated_at = now;

        self.get_post(post_id)
    }

    pub fn delete_post(&mut self, post_id: &str) -> StoreResult<()> {
        self.post_record(post_id)?;
        self.posts.retain(|record| record.post_id != post_id);
        self.comments.retain(|comment| comment.post_id != post_id);
        Ok(())
    }

    // ---- categories ----

    fn category_post_count(&self, category_id: &str) -> u64 {
        self.posts
            .iter()
            .filter(|record| record.category_ids.iter().any(|id| id == category_id))
            .count() as u64
    }

    pub fn list_categories(&self, filter: &CategoryFilter) -> Vec<Category> {
        let with_count = filter.with_post_count.unwrap_or(false);
        let categories: Vec<Category> = self
            .categories
            .iter()
            .map(|category| Category {
                post_count: with_count.then(|| self.category_post_count(&category.category_id)),
                ..category.clone()
            })
            .collect();
        page(categories, filter.skip, filter.limit)
    }

    pub fn get_category(&self, category_id: &str) -> StoreResult<Category> {
        self.categories
            .iter()
            .find(|category| category.category_id == category_id)
            .cloned()
            .ok_or(StoreError::NotFound("Category"))
    }

    pub fn get_category_by_slug(&self, slug: &str) -> StoreResult<Category> {
        self.categories
            .iter()
            .find(|category| category.slug == slug)
            .cloned()
            .ok_or(StoreError::NotFound("Category"))
    }

    pub fn insert_category(&mut self, new_category: NewCategory) -> StoreResult<Category> {
        if self.categories.iter().any(|c| c.slug == new_category.slug) {
            return Err(StoreError::Conflict(
                "Category with this slug already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let category = Category {
            category_id: new_id(),
            name: new_category.name,
            description: new_category.description,
            slug: new_category.slug,
            post_count: None,
            created_at: now,
            updated_at: now,
        };
        self.categories.push(category.clone());

        Ok(category)
    }

    pub fn update_category(
        &mut self,
        category_id: &str,
        update: CategoryUpdate,
    ) -> StoreResult<Category> {
        if let Some(slug) = &update.slug {
            if self
                .categories
                .iter()
                .any(|c| &c.slug == slug && c.category_id != category_id)
            {
                return Err(StoreError::Conflict(
                    "Category with this slug already exists".to_string(),
                ));
            }
        }

        let category = self
            .categories
            .iter_mut()
            .find(|category| category.category_id == category_id)
            .ok_or(StoreError::NotFound("Category"))?;
        if let Some(name) = update.name {
            category.name = name;
        }
        if update.description.is_some() {
            category.description = update.description;
        }
        if let Some(slug) = update.slug {
            category.slug = slug;
        }
        category.updated_at = Utc::now();

        Ok(category.clone())
    }

    pub fn delete_category(&mut self, category_id: &str) -> StoreResult<()> {
        self.get_category(category_id)?;
        self.categories.retain(|c| c.category_id != category_id);
        for record in &mut self.posts {
            record.category_ids.retain(|id| id != category_id);
        }
        Ok(())
    }

    pub fn link_category(&mut self, category_id: &str, post_id: &str, linked: bool) -> StoreResult<()> {
        self.get_category(category_id)?;
        let record = self.post_record_mut(post_id)?;
        record.category_ids.retain(|id| id != category_id);
        if linked {
            record.category_ids.push(category_id.to_string());
        }
        Ok(())
    }

    // ---- tags ----

    pub fn list_tags(&self, pagination: &Pagination) -> Vec<Tag> {
        page(self.tags.clone(), pagination.skip, pagination.limit)
    }

    pub fn get_tag(&self, tag_id: &str) -> StoreResult<Tag> {
        self.tags
            .iter()
            .find(|tag| tag.tag_id == tag_id)
            .cloned()
            .ok_or(StoreError::NotFound("Tag"))
    }

    pub fn get_tag_by_slug(&self, slug: &str) -> StoreResult<Tag> {
        self.tags
            .iter()
            .find(|tag| tag.slug == slug)
            .cloned()
            .ok_or(StoreError::NotFound("Tag"))
    }

    pub fn insert_tag(&mut self, new_tag: NewTag) -> StoreResult<Tag> {
        if self.tags.iter().any(|t| t.slug == new_tag.slug) {
            return Err(StoreError::Conflict(
                "Tag with this slug already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let tag = Tag {
            tag_id: new_id(),
            name: new_tag.name,
            slug: new_tag.slug,
            created_at: now,
            updated_at: now,
        };
        self.tags.push(tag.clone());

        Ok(tag)
    }

    pub fn update_tag(&mut self, tag_id: &str, update: TagUpdate) -> StoreResult<Tag> {
        if let Some(slug) = &update.slug {
            if self.tags.iter().any(|t| &t.slug == slug && t.tag_id != tag_id) {
                return Err(StoreError::Conflict(
                    "Tag with this slug already exists".to_string(),
                ));
            }
        }

        let tag = self
            .tags
            .iter_mut()
            .find(|tag| tag.tag_id == tag_id)
            .ok_or(StoreError::NotFound("Tag"))?;
        if let Some(name) = update.name {
            tag.name = name;
        }
        if let Some(slug) = update.slug {
            tag.slug = slug;
        }
        tag.updated_at = Utc::now();

        Ok(tag.clone())
    }

    pub fn delete_tag(&mut self, tag_id: &str) -> StoreResult<()> {
        self.get_tag(tag_id)?;
        self.tags.retain(|t| t.tag_id != tag_id);
        for record in &mut self.posts {
            record.tag_ids.retain(|id| id != tag_id);
        }
        Ok(())
    }

    pub fn link_tag(&mut self, tag_id: &str, post_id: &str, linked: bool) -> StoreResult<()> {
        self.get_tag(tag_id)?;
        let record = self.post_record_mut(post_id)?;
        record.tag_ids.retain(|id| id != tag_id);
        if linked {
            record.tag_ids.push(tag_id.to_string());
        }
        Ok(())
    }

    // ---- comments ----

    pub fn list_comments(&self, filter: &CommentFilter) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|comment| {
                filter
                    .post_id
                    .as_ref()
                    .is_none_or(|id| &comment.post_id == id)
            })
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        page(comments, filter.skip, filter.limit)
    }

    pub fn get_comment(&self, comment_id: &str) -> StoreResult<Comment> {
        self.comments
            .iter()
            .find(|comment| comment.comment_id == comment_id)
            .cloned()
            .ok_or(StoreError::NotFound("Comment"))
    }

    pub fn insert_comment(&mut self, user_id: &str, new_comment: NewComment) -> StoreResult<Comment> {
        self.post_record(&new_comment.post_id)?;
        if let Some(parent_id) = &new_comment.replied_to_comment_id {
            let parent = self.get_comment(parent_id)?;
            if parent.post_id != new_comment.post_id {
                return Err(StoreError::Conflict(
                    "Parent comment belongs to another post".to_string(),
                ));
            }
        }

        let now = Utc::now();
        let comment = Comment {
            comment_id: new_id(),
            content: new_comment.content,
            post_id: new_comment.post_id,
            user_id: user_id.to_string(),
            parent_id: new_comment.replied_to_comment_id,
            likes: Some(0),
            created_at: now,
            updated_at: now,
        };
        self.comments.push(comment.clone());

        Ok(comment)
    }

    pub fn update_comment(&mut self, comment_id: &str, content: String) -> StoreResult<Comment> {
        let comment = self
            .comments
            .iter_mut()
            .find(|comment| comment.comment_id == comment_id)
            .ok_or(StoreError::NotFound("Comment"))?;
        comment.content = content;
        comment.updated_at = Utc::now();

        Ok(comment.clone())
    }

    /// Delete a comment together with every reply below it
    pub fn delete_comment(&mut self, comment_id: &str) -> StoreResult<()> {
        self.get_comment(comment_id)?;

        let mut doomed: HashSet<String> = HashSet::from([comment_id.to_string()]);
        loop {
            let before = doomed.len();
            for comment in &self.comments {
                if comment.parent_id.as_ref().is_some_and(|p| doomed.contains(p)) {
                    doomed.insert(comment.comment_id.clone());
                }
            }
            if doomed.len() == before {
                break;
            }
        }

        self.comments.retain(|comment| !doomed.contains(&comment.comment_id));
        self.comment_likes.retain(|(id, _)| !doomed.contains(id));
        Ok(())
    }

    /// Record or remove a like; repeated likes by one user count once
    pub fn set_comment_like(&mut self, comment_id: &str, user_id: &str, liked: bool) -> StoreResult<()> {
        self.get_comment(comment_id)?;
        let key = (comment_id.to_string(), user_id.to_string());
        if liked {
            self.comment_likes.insert(key);
        } else {
            self.comment_likes.remove(&key);
        }

        let count = self
            .comment_likes
            .iter()
            .filter(|(id, _)| id == comment_id)
            .count() as u64;
        if let Some(comment) = self
            .comments
            .iter_mut()
            .find(|comment| comment.comment_id == comment_id)
        {
            comment.likes = Some(count);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_post() -> (BlogStore, Post) {
        let mut store = BlogStore::default();
        let category = store
            .insert_category(NewCategory {
                name: "Technology".to_string(),
                description: None,
                slug: "technology".to_string(),
            })
            .unwrap();
        let post = store
            .insert_post(
                "1",
                NewPost {
                    title: "Hello World".to_string(),
                    content: "Some words".to_string(),
                    summary: None,
                    cover_image: None,
                    is_published: true,
                    category_ids: vec![category.category_id],
                    tag_ids: vec![],
                },
            )
            .unwrap();
        (store, post)
    }

    #[test]
    fn test_insert_post_embeds_categories_and_slug() {
        let (_, post) = store_with_post();
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.categories.len(), 1);
        assert_eq!(post.reading_time.as_deref(), Some("1 min read"));
        assert!(post.published_at.is_some());
    }

    #[test]
    fn test_duplicate_titles_get_distinct_slugs() {
        let (mut store, _) = store_with_post();
        let second = store
            .insert_post(
                "1",
                NewPost {
                    title: "Hello, World".to_string(),
                    content: String::new(),
                    summary: None,
                    cover_image: None,
                    is_published: false,
                    category_ids: vec![],
                    tag_ids: vec![],
                },
            )
            .unwrap();
        assert_eq!(second.slug, "hello-world-2");
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let mut store = BlogStore::default();
        let result = store.insert_post(
            "1",
            NewPost {
                title: "x".to_string(),
                content: String::new(),
                summary: None,
                cover_image: None,
                is_published: false,
                category_ids: vec!["missing".to_string()],
                tag_ids: vec![],
            },
        );
        assert_eq!(result, Err(StoreError::NotFound("Category")));
    }

    #[test]
    fn test_delete_comment_removes_replies() {
        let (mut store, post) = store_with_post();
        let root = store
            .insert_comment(
                "1",
                NewComment {
                    content: "root".to_string(),
                    post_id: post.post_id.clone(),
                    replied_to_comment_id: None,
                },
            )
            .unwrap();
        let reply = store
            .insert_comment(
                "2",
                NewComment {
                    content: "reply".to_string(),
                    post_id: post.post_id.clone(),
                    replied_to_comment_id: Some(root.comment_id.clone()),
                },
            )
            .unwrap();
        store
            .insert_comment(
                "1",
                NewComment {
                    content: "nested".to_string(),
                    post_id: post.post_id.clone(),
                    replied_to_comment_id: Some(reply.comment_id.clone()),
                },
            )
            .unwrap();

        store.delete_comment(&root.comment_id).unwrap();
        assert!(store.comments.is_empty());
    }

    #[test]
    fn test_likes_are_counted_once_per_user() {
        let (mut store, post) = store_with_post();
        let comment = store
            .insert_comment(
                "1",
                NewComment {
                    content: "nice".to_string(),
                    post_id: post.post_id,
                    replied_to_comment_id: None,
                },
            )
            .unwrap();

        store.set_comment_like(&comment.comment_id, "2", true).unwrap();
        store.set_comment_like(&comment.comment_id, "2", true).unwrap();
        store.set_comment_like(&comment.comment_id, "3", true).unwrap();
        assert_eq!(store.get_comment(&comment.comment_id).unwrap().likes, Some(2));

        store.set_comment_like(&comment.comment_id, "3", false).unwrap();
        assert_eq!(store.get_comment(&comment.comment_id).unwrap().likes, Some(1));
    }

    #[test]
    fn test_category_post_count_only_on_request() {
        let (store, _) = store_with_post();
        let plain = store.list_categories(&CategoryFilter::default());
        assert_eq!(plain[0].post_count, None);

        let counted = store.list_categories(&CategoryFilter {
            with_post_count: Some(true),
            ..CategoryFilter::default()
        });
        assert_eq!(counted[0].post_count, Some(1));
    }
}
