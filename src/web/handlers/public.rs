use crate::services::posts::{self, PostQuery};
use crate::services::serialize::{serialize_post, serialize_post_detail, SerializedPost};
use crate::services::tags;
use crate::web::error::AppResult;
use crate::web::state::AppState;
use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;
use tera::Context;

fn make_context(state: &AppState) -> Context {
    let mut ctx = Context::new();
    ctx.insert("site", &state.config.site);
    ctx
}

fn render_not_found(state: &AppState) -> AppResult<Response> {
    let ctx = make_context(state);
    let html = state.templates.render("404.html", &ctx)?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}

/// The most-liked posts, enriched the way every page block needs them:
/// tags, author, comment counts.
fn most_popular_posts(state: &AppState) -> Result<Vec<SerializedPost>> {
    let mut posts = PostQuery::new()
        .popular()
        .limit(state.config.content.front_page_limit)
        .prefetch_tags()
        .fetch(&state.db)?;
    posts::with_comments_count(&state.db, &mut posts)?;

    let teaser_length = state.config.content.teaser_length;
    Ok(posts
        .iter()
        .map(|p| serialize_post(p, teaser_length))
        .collect())
}

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let limit = state.config.content.front_page_limit;

    let mut fresh = PostQuery::new()
        .fresh()
        .limit(limit)
        .prefetch_tags()
        .fetch(&state.db)?;
    posts::with_comments_count(&state.db, &mut fresh)?;

    let teaser_length = state.config.content.teaser_length;
    let most_fresh_posts: Vec<SerializedPost> = fresh
        .iter()
        .map(|p| serialize_post(p, teaser_length))
        .collect();

    let mut ctx = make_context(&state);
    ctx.insert("most_popular_posts", &most_popular_posts(&state)?);
    ctx.insert("page_posts", &most_fresh_posts);
    ctx.insert("popular_tags", &tags::popular(&state.db, limit)?);

    let html = state.templates.render("index.html", &ctx)?;
    Ok(Html(html))
}

pub async fn post_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let post = posts::get_post_by_slug(&state.db, &slug)?;

    match post {
        Some(post) => {
            let mut ctx = make_context(&state);
            ctx.insert("post", &serialize_post_detail(&post));
            ctx.insert("most_popular_posts", &most_popular_posts(&state)?);
            ctx.insert(
                "popular_tags",
                &tags::popular(&state.db, state.config.content.front_page_limit)?,
            );

            let html = state.templates.render("post-details.html", &ctx)?;
            Ok(Html(html).into_response())
        }
        None => render_not_found(&state),
    }
}

pub async fn tag_filter(
    State(state): State<Arc<AppState>>,
    Path(tag_title): Path<String>,
) -> AppResult<Response> {
    let tag = tags::get_tag_by_title(&state.db, &tag_title)?;

    match tag {
        Some(tag) => {
            let mut related = PostQuery::new()
                .tag(tag.id)
                .limit(state.config.content.tag_page_limit)
                .prefetch_tags()
                .fetch(&state.db)?;
            posts::with_comments_count(&state.db, &mut related)?;

            let teaser_length = state.config.content.teaser_length;
            let related_posts: Vec<SerializedPost> = related
                .iter()
                .map(|p| serialize_post(p, teaser_length))
                .collect();

            let mut ctx = make_context(&state);
            ctx.insert("tag", &tag.title);
            ctx.insert("posts", &related_posts);
            ctx.insert("most_popular_posts", &most_popular_posts(&state)?);
            ctx.insert(
                "popular_tags",
                &tags::popular(&state.db, state.config.content.front_page_limit)?,
            );

            let html = state.templates.render("posts-list.html", &ctx)?;
            Ok(Html(html).into_response())
        }
        None => render_not_found(&state),
    }
}

// Placeholder page; visit statistics and a feedback form may land here later.
pub async fn contacts(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let ctx = make_context(&state);
    let html = state.templates.render("contacts.html", &ctx)?;
    Ok(Html(html))
}

pub async fn serve_media(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    // Prevent path traversal attacks
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let file_path = state.media_dir.join(&filename);

    let canonical_media = state.media_dir.canonicalize().unwrap_or_default();
    let canonical_file = match file_path.canonicalize() {
        Ok(p) => p,
        Err(_) => return Ok(StatusCode::NOT_FOUND.into_response()),
    };

    if !canonical_file.starts_with(&canonical_media) {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let content = tokio::fs::read(&file_path).await?;
    let mime = mime_guess::from_path(&filename).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.as_ref())], content).into_response())
}
