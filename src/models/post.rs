use super::{CommentWithAuthor, TagWithCount, UserSummary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub slug: String,
    pub image: Option<String>,
    pub published_at: String,
    pub author_id: i64,
}

/// A post together with everything the list and detail pages need: the
/// author, the like-count aggregate, and — when the query asked for them —
/// prefetched tags and comments plus the batch-annotated comment count.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub author: UserSummary,
    pub likes_count: i64,
    /// Tags carrying their own post-count annotation. Empty unless the
    /// query was built with `prefetch_tags`.
    pub tags: Vec<TagWithCount>,
    /// Newest first. Empty unless the query was built with
    /// `prefetch_comments`.
    pub comments: Vec<CommentWithAuthor>,
    /// Set by `posts::with_comments_count`; `None` means nobody computed it.
    pub comments_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub body: String,
    pub slug: Option<String>,
    pub image: Option<String>,
    pub published_at: Option<String>,
    pub author_id: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}
