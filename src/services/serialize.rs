use crate::models::{CommentWithAuthor, PostDetail, TagWithCount};
use serde::Serialize;

/// Flat display record for list views: teaser instead of the full body.
#[derive(Debug, Clone, Serialize)]
pub struct SerializedPost {
    pub title: String,
    pub teaser_text: String,
    pub author: String,
    pub comments_amount: i64,
    pub image_url: Option<String>,
    pub published_at: String,
    pub slug: String,
    pub tags: Vec<TagWithCount>,
    /// `None` when the post has no tags; templates must guard on it.
    pub first_tag_title: Option<String>,
}

/// Detail-page record: full body, full comment list and the like count.
#[derive(Debug, Clone, Serialize)]
pub struct SerializedPostDetail {
    pub title: String,
    pub text: String,
    pub author: String,
    pub comments: Vec<CommentWithAuthor>,
    pub likes_amount: i64,
    pub image_url: Option<String>,
    pub published_at: String,
    pub slug: String,
    pub tags: Vec<TagWithCount>,
}

fn image_url(image: Option<&str>) -> Option<String> {
    image.map(|file| format!("/media/{}", file))
}

/// Truncates on character boundaries, so a multi-byte body never splits
/// mid-codepoint.
fn teaser(text: &str, len: usize) -> String {
    text.chars().take(len).collect()
}

/// Expects the comment-count annotation to have been computed by
/// `posts::with_comments_count`; an unannotated post serializes as zero.
pub fn serialize_post(detail: &PostDetail, teaser_length: usize) -> SerializedPost {
    SerializedPost {
        title: detail.post.title.clone(),
        teaser_text: teaser(&detail.post.body, teaser_length),
        author: detail.author.username.clone(),
        comments_amount: detail.comments_count.unwrap_or(0),
        image_url: image_url(detail.post.image.as_deref()),
        published_at: detail.post.published_at.clone(),
        slug: detail.post.slug.clone(),
        first_tag_title: detail.tags.first().map(|t| t.tag.title.clone()),
        tags: detail.tags.clone(),
    }
}

pub fn serialize_post_detail(detail: &PostDetail) -> SerializedPostDetail {
    SerializedPostDetail {
        title: detail.post.title.clone(),
        text: detail.post.body.clone(),
        author: detail.author.username.clone(),
        comments: detail.comments.clone(),
        likes_amount: detail.likes_count,
        image_url: image_url(detail.post.image.as_deref()),
        published_at: detail.post.published_at.clone(),
        slug: detail.post.slug.clone(),
        tags: detail.tags.clone(),
    }
}
