//! Resource services: one method per endpoint

mod categories;
mod comments;
mod posts;
mod tags;

pub use categories::CategoryService;
pub use comments::{CommentService, CommentThread, build_threads};
pub use posts::PostService;
pub use tags::TagService;
