use crate::models::{
    Comment, CommentWithAuthor, CreatePost, Post, PostDetail, Tag, TagWithCount, UserSummary,
};
use crate::services::slug::generate_slug;
use crate::Database;
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use rusqlite::ToSql;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostOrder {
    /// Newest first. Matches the default listing order of the blog.
    #[default]
    Fresh,
    /// Most-liked first, post id as the deterministic tie-break.
    Popular,
    /// Oldest first, used by the year archive.
    Chronological,
}

/// Accumulates filters, ordering and prefetch hints; nothing touches the
/// database until [`PostQuery::fetch`].
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    order: PostOrder,
    limit: Option<usize>,
    year: Option<i32>,
    tag_id: Option<i64>,
    slug: Option<String>,
    with_tags: bool,
    with_comments: bool,
}

impl PostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn popular(mut self) -> Self {
        self.order = PostOrder::Popular;
        self
    }

    pub fn fresh(mut self) -> Self {
        self.order = PostOrder::Fresh;
        self
    }

    /// Posts published in the given year, oldest first.
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self.order = PostOrder::Chronological;
        self
    }

    pub fn tag(mut self, tag_id: i64) -> Self {
        self.tag_id = Some(tag_id);
        self
    }

    pub fn slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn prefetch_tags(mut self) -> Self {
        self.with_tags = true;
        self
    }

    pub fn prefetch_comments(mut self) -> Self {
        self.with_comments = true;
        self
    }

    /// Materializes the query. One main statement fetches the posts with
    /// their author and like count; prefetched tags and comments are then
    /// batch-loaded with a single `IN (…)` query each and merged back by
    /// post id, so enriching N posts never costs N round trips.
    pub fn fetch(&self, db: &Database) -> Result<Vec<PostDetail>> {
        let conn = db.get()?;

        let mut sql = String::from(
            r#"
            SELECT p.id, p.title, p.body, p.slug, p.image, p.published_at,
                   p.author_id, u.username,
                   (SELECT COUNT(*) FROM post_likes pl WHERE pl.post_id = p.id) AS likes_count
            FROM posts p
            JOIN users u ON u.id = p.author_id
            "#,
        );
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(tag_id) = self.tag_id {
            sql.push_str("JOIN post_tags pt ON pt.post_id = p.id AND pt.tag_id = ?\n");
            params.push(Box::new(tag_id));
        }

        let mut filters: Vec<&str> = Vec::new();
        if let Some(slug) = &self.slug {
            filters.push("p.slug = ?");
            params.push(Box::new(slug.clone()));
        }
        if let Some(year) = self.year {
            filters.push("strftime('%Y', p.published_at) = ?");
            params.push(Box::new(format!("{:04}", year)));
        }
        if !filters.is_empty() {
            sql.push_str("WHERE ");
            sql.push_str(&filters.join(" AND "));
            sql.push('\n');
        }

        sql.push_str(match self.order {
            PostOrder::Fresh => "ORDER BY p.published_at DESC, p.id DESC\n",
            PostOrder::Popular => "ORDER BY likes_count DESC, p.id\n",
            PostOrder::Chronological => "ORDER BY p.published_at, p.id\n",
        });

        if let Some(limit) = self.limit {
            sql.push_str("LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let mut posts: Vec<PostDetail> = stmt
            .query_map(param_refs.as_slice(), |row| {
                Ok(PostDetail {
                    post: Post {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        body: row.get(2)?,
                        slug: row.get(3)?,
                        image: row.get(4)?,
                        published_at: row.get(5)?,
                        author_id: row.get(6)?,
                    },
                    author: UserSummary {
                        id: row.get(6)?,
                        username: row.get(7)?,
                    },
                    likes_count: row.get(8)?,
                    tags: Vec::new(),
                    comments: Vec::new(),
                    comments_count: None,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if posts.is_empty() {
            return Ok(posts);
        }

        if self.with_tags {
            attach_tags(db, &mut posts)?;
        }
        if self.with_comments {
            attach_comments(db, &mut posts)?;
        }

        Ok(posts)
    }
}

fn id_placeholders(posts: &[PostDetail]) -> (String, Vec<i64>) {
    let ids: Vec<i64> = posts.iter().map(|p| p.post.id).collect();
    let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    (placeholders, ids)
}

/// Batch-loads each post's tags, each tag annotated with how many posts
/// carry it overall.
fn attach_tags(db: &Database, posts: &mut [PostDetail]) -> Result<()> {
    let conn = db.get()?;
    let (placeholders, ids) = id_placeholders(posts);

    let sql = format!(
        r#"
        SELECT pt.post_id, t.id, t.title, t.created_at,
               (SELECT COUNT(*) FROM post_tags pt2 WHERE pt2.tag_id = t.id) AS posts_count
        FROM tags t
        JOIN post_tags pt ON pt.tag_id = t.id
        WHERE pt.post_id IN ({})
        ORDER BY t.title
        "#,
        placeholders
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();
    let rows = stmt.query_map(param_refs.as_slice(), |row| {
        Ok((
            row.get::<_, i64>(0)?,
            TagWithCount {
                tag: Tag {
                    id: row.get(1)?,
                    title: row.get(2)?,
                    created_at: row.get(3)?,
                },
                posts_count: row.get(4)?,
            },
        ))
    })?;

    let mut tags_by_post: HashMap<i64, Vec<TagWithCount>> = HashMap::new();
    for row in rows {
        let (post_id, tag) = row?;
        tags_by_post.entry(post_id).or_default().push(tag);
    }

    for post in posts.iter_mut() {
        post.tags = tags_by_post.remove(&post.post.id).unwrap_or_default();
    }
    Ok(())
}

/// Batch-loads each post's comments newest-first, author joined in.
fn attach_comments(db: &Database, posts: &mut [PostDetail]) -> Result<()> {
    let conn = db.get()?;
    let (placeholders, ids) = id_placeholders(posts);

    let sql = format!(
        r#"
        SELECT c.id, c.post_id, c.author_id, c.body, c.published_at, u.username
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id IN ({})
        ORDER BY c.published_at DESC, c.id DESC
        "#,
        placeholders
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();
    let rows = stmt.query_map(param_refs.as_slice(), |row| {
        Ok(CommentWithAuthor {
            comment: Comment {
                id: row.get(0)?,
                post_id: row.get(1)?,
                author_id: row.get(2)?,
                body: row.get(3)?,
                published_at: row.get(4)?,
            },
            author: UserSummary {
                id: row.get(2)?,
                username: row.get(5)?,
            },
        })
    })?;

    let mut comments_by_post: HashMap<i64, Vec<CommentWithAuthor>> = HashMap::new();
    for row in rows {
        let comment = row?;
        comments_by_post
            .entry(comment.comment.post_id)
            .or_default()
            .push(comment);
    }

    for post in posts.iter_mut() {
        post.comments = comments_by_post.remove(&post.post.id).unwrap_or_default();
    }
    Ok(())
}

/// Annotates every post with its comment count using one aggregate query
/// keyed by post id. Posts without comments get `Some(0)`, never `None`.
pub fn with_comments_count(db: &Database, posts: &mut [PostDetail]) -> Result<()> {
    if posts.is_empty() {
        return Ok(());
    }

    let conn = db.get()?;
    let (placeholders, ids) = id_placeholders(posts);

    let sql = format!(
        "SELECT post_id, COUNT(*) FROM comments WHERE post_id IN ({}) GROUP BY post_id",
        placeholders
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();
    let counts: HashMap<i64, i64> = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<Result<HashMap<_, _>, _>>()?;

    for post in posts.iter_mut() {
        post.comments_count = Some(counts.get(&post.post.id).copied().unwrap_or(0));
    }
    Ok(())
}

pub fn get_post_by_slug(db: &Database, slug: &str) -> Result<Option<PostDetail>> {
    let posts = PostQuery::new()
        .slug(slug)
        .prefetch_tags()
        .prefetch_comments()
        .fetch(db)?;
    Ok(posts.into_iter().next())
}

pub fn create_post(db: &Database, post: &CreatePost) -> Result<i64> {
    let conn = db.get()?;

    let is_staff: bool = conn.query_row(
        "SELECT is_staff FROM users WHERE id = ?",
        [post.author_id],
        |row| row.get(0),
    )?;
    if !is_staff {
        anyhow::bail!("posts can only be authored by staff users");
    }

    let slug = post
        .slug
        .clone()
        .unwrap_or_else(|| generate_slug(&post.title));
    let published_at = post
        .published_at
        .clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

    conn.execute(
        "INSERT INTO posts (title, body, slug, image, published_at, author_id)
         VALUES (?, ?, ?, ?, ?, ?)",
        (
            &post.title,
            &post.body,
            &slug,
            &post.image,
            &published_at,
            post.author_id,
        ),
    )?;
    let post_id = conn.last_insert_rowid();
    drop(conn);

    for title in &post.tags {
        let tag_id = super::tags::get_or_create_tag(db, title)?;
        add_tag_to_post(db, post_id, tag_id)?;
    }

    Ok(post_id)
}

/// Cascades to the post's comments, likes and tag links.
pub fn delete_post(db: &Database, id: i64) -> Result<()> {
    let conn = db.get()?;
    conn.execute("DELETE FROM posts WHERE id = ?", [id])?;
    Ok(())
}

pub fn add_tag_to_post(db: &Database, post_id: i64, tag_id: i64) -> Result<()> {
    let conn = db.get()?;
    conn.execute(
        "INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)",
        (post_id, tag_id),
    )?;
    Ok(())
}

pub fn like_post(db: &Database, post_id: i64, user_id: i64) -> Result<()> {
    let conn = db.get()?;
    conn.execute(
        "INSERT OR IGNORE INTO post_likes (post_id, user_id) VALUES (?, ?)",
        (post_id, user_id),
    )?;
    Ok(())
}

pub fn unlike_post(db: &Database, post_id: i64, user_id: i64) -> Result<()> {
    let conn = db.get()?;
    conn.execute(
        "DELETE FROM post_likes WHERE post_id = ? AND user_id = ?",
        (post_id, user_id),
    )?;
    Ok(())
}
