use crate::models::{Comment, CommentWithAuthor, UserSummary};
use crate::Database;
use anyhow::Result;
use chrono::{SecondsFormat, Utc};

pub fn create_comment(
    db: &Database,
    post_id: i64,
    author_id: i64,
    body: &str,
    published_at: Option<&str>,
) -> Result<i64> {
    let published_at = published_at
        .map(String::from)
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO comments (post_id, author_id, body, published_at) VALUES (?, ?, ?, ?)",
        (post_id, author_id, body, &published_at),
    )?;
    Ok(conn.last_insert_rowid())
}

/// A post's comments oldest-first, authors joined in.
pub fn list_for_post(db: &Database, post_id: i64) -> Result<Vec<CommentWithAuthor>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        r#"
        SELECT c.id, c.post_id, c.author_id, c.body, c.published_at, u.username
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = ?
        ORDER BY c.published_at, c.id
        "#,
    )?;
    let comments = stmt
        .query_map([post_id], |row| {
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
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(comments)
}
