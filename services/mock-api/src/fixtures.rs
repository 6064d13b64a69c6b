//! Sample records the mock API starts with

use chrono::{DateTime, TimeZone, Utc};
use common::models::{Category, Comment, Tag, User};
use tracing::info;

use crate::{
    password::hash_password,
    store::{BlogStore, PostRecord, UserRecord},
};

/// Password shared by every fixture user
pub const FIXTURE_PASSWORD: &str = "password123";

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn user(
    id: &str,
    username: &str,
    email: &str,
    full_name: &str,
    bio: &str,
    is_superuser: bool,
    joined: DateTime<Utc>,
) -> User {
    User {
        user_id: id.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        full_name: Some(full_name.to_string()),
        bio: Some(bio.to_string()),
        profile_picture: Some("/placeholder.svg?height=200&width=200".to_string()),
        is_active: true,
        is_superuser,
        created_at: joined,
        updated_at: joined,
    }
}

fn category(id: &str, name: &str, slug: &str, description: &str) -> Category {
    Category {
        category_id: id.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        slug: slug.to_string(),
        post_count: None,
        created_at: at(2023, 1, 1, 0, 0),
        updated_at: at(2023, 1, 1, 0, 0),
    }
}

fn tag(id: &str, name: &str, slug: &str) -> Tag {
    Tag {
        tag_id: id.to_string(),
        name: name.to_string(),
        slug: slug.to_string(),
        created_at: at(2023, 1, 1, 0, 0),
        updated_at: at(2023, 1, 1, 0, 0),
    }
}

#[allow(clippy::too_many_arguments)]
fn post(
    id: &str,
    title: &str,
    slug: &str,
    summary: &str,
    content: &str,
    author_id: &str,
    category_ids: &[&str],
    tag_ids: &[&str],
    published: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
) -> PostRecord {
    PostRecord {
        post_id: id.to_string(),
        title: title.to_string(),
        slug: slug.to_string(),
        content: content.to_string(),
        summary: Some(summary.to_string()),
        cover_image: Some("/placeholder.svg?height=400&width=800".to_string()),
        is_published: published.is_some(),
        published_at: published,
        author_id: author_id.to_string(),
        category_ids: category_ids.iter().map(|id| id.to_string()).collect(),
        tag_ids: tag_ids.iter().map(|id| id.to_string()).collect(),
        views: 0,
        likes: 0,
        created_at,
        updated_at: created_at,
    }
}

fn comment(
    id: &str,
    post_id: &str,
    user_id: &str,
    parent_id: Option<&str>,
    content: &str,
    created_at: DateTime<Utc>,
) -> Comment {
    Comment {
        comment_id: id.to_string(),
        content: content.to_string(),
        post_id: post_id.to_string(),
        user_id: user_id.to_string(),
        parent_id: parent_id.map(str::to_string),
        likes: Some(0),
        created_at,
        updated_at: created_at,
    }
}

/// Build a store holding the sample users, taxonomy, posts and comments
pub fn seeded_store() -> anyhow::Result<BlogStore> {
    let mut store = BlogStore::default();
    let password_hash = hash_password(FIXTURE_PASSWORD)?;

    store.users = vec![
        user(
            "1",
            "johndoe",
            "john@example.com",
            "John Doe",
            "Tech enthusiast and software developer with a passion for writing about emerging technologies.",
            false,
            at(2023, 1, 15, 8, 30),
        ),
        user(
            "2",
            "janedoe",
            "jane@example.com",
            "Jane Doe",
            "Science writer and researcher focusing on climate change and sustainability.",
            false,
            at(2023, 2, 10, 14, 20),
        ),
        user(
            "3",
            "alexsmith",
            "alex@example.com",
            "Alex Smith",
            "UX designer and design systems advocate.",
            true,
            at(2023, 3, 5, 11, 45),
        ),
    ]
    .into_iter()
    .map(|user| UserRecord {
        user,
        password_hash: password_hash.clone(),
    })
    .collect();

    store.categories = vec![
        category(
            "1",
            "Technology",
            "technology",
            "Articles about the latest in technology, programming, and digital innovation.",
        ),
        category(
            "2",
            "Science",
            "science",
            "Exploring scientific discoveries, research, and advancements.",
        ),
        category(
            "3",
            "Design",
            "design",
            "Articles about UI/UX design, graphic design, and creative processes.",
        ),
        category(
            "4",
            "Business",
            "business",
            "Insights on entrepreneurship, management, and business strategies.",
        ),
        category(
            "5",
            "Culture",
            "culture",
            "Exploring cultural trends, arts, and societal developments.",
        ),
    ];

    store.tags = vec![
        tag("1", "JavaScript", "javascript"),
        tag("2", "React", "react"),
        tag("3", "AI", "ai"),
        tag("4", "Climate", "climate"),
        tag("5", "UX", "ux"),
        tag("6", "Productivity", "productivity"),
    ];

    store.posts = vec![
        post(
            "1",
            "The Future of JavaScript: What's Coming in 2024",
            "future-of-javascript-2024",
            "A look at the TC39 proposals most likely to land in the language soon.",
            "JavaScript continues to evolve at a rapid pace. The TC39 committee has been \
             working on several proposals, from the pipeline operator to records and tuples, \
             that could make it into the language specification soon.",
            "1",
            &["1"],
            &["1", "2"],
            Some(at(2023, 12, 10, 9, 0)),
            at(2023, 12, 10, 9, 0),
        ),
        post(
            "2",
            "Climate Models Explained",
            "climate-models-explained",
            "How researchers simulate the planet and what the uncertainty bands mean.",
            "Climate models divide the atmosphere and oceans into a grid and step physical \
             equations forward in time. Understanding their assumptions helps read the \
             headlines with a critical eye.",
            "2",
            &["2"],
            &["4"],
            Some(at(2023, 11, 22, 16, 30)),
            at(2023, 11, 22, 16, 30),
        ),
        post(
            "3",
            "Design Systems That Scale",
            "design-systems-that-scale",
            "Principles for keeping a component library consistent across teams.",
            "A design system is a product, not a project. Tokens, documentation and a \
             contribution model matter as much as the components themselves.",
            "3",
            &["3"],
            &["5"],
            Some(at(2023, 10, 5, 12, 0)),
            at(2023, 10, 5, 12, 0),
        ),
        post(
            "4",
            "AI Tools for Everyday Productivity",
            "ai-tools-for-everyday-productivity",
            "Assistants, summarizers and automations worth trying this year.",
            "Language models are now embedded in editors, inboxes and calendars. Used with \
             care, they remove friction from routine work.",
            "1",
            &["1", "4"],
            &["3", "6"],
            Some(at(2024, 1, 8, 7, 45)),
            at(2024, 1, 8, 7, 45),
        ),
        post(
            "5",
            "Notes on Remote Team Rituals",
            "notes-on-remote-team-rituals",
            "Draft: what worked and what did not for a distributed team.",
            "Work in progress.",
            "1",
            &["4", "5"],
            &["6"],
            None,
            at(2024, 1, 20, 18, 0),
        ),
    ];

    store.comments = vec![
        comment(
            "1",
            "1",
            "2",
            None,
            "Great overview! I'm especially excited about records and tuples.",
            at(2023, 12, 11, 10, 0),
        ),
        comment(
            "2",
            "1",
            "1",
            Some("1"),
            "Thanks Jane! Same here, immutable data structures are long overdue.",
            at(2023, 12, 11, 12, 30),
        ),
        comment(
            "3",
            "1",
            "3",
            None,
            "Would love a follow-up on the decorators proposal.",
            at(2023, 12, 12, 9, 15),
        ),
        comment(
            "4",
            "2",
            "1",
            None,
            "The section on uncertainty bands cleared up a lot for me.",
            at(2023, 11, 23, 8, 0),
        ),
    ];

    info!(
        "Seeded {} users, {} categories, {} tags, {} posts, {} comments",
        store.users.len(),
        store.categories.len(),
        store.tags.len(),
        store.posts.len(),
        store.comments.len()
    );

    Ok(store)
}
