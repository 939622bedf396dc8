use crate::models::{Tag, TagWithCount};
use crate::Database;
use anyhow::Result;

/// Tag titles are stored lowercased; the originally supplied casing is not
/// preserved.
pub fn create_tag(db: &Database, title: &str) -> Result<i64> {
    let title = title.to_lowercase();
    let conn = db.get()?;
    conn.execute("INSERT INTO tags (title) VALUES (?)", [&title])?;
    Ok(conn.last_insert_rowid())
}

pub fn get_or_create_tag(db: &Database, title: &str) -> Result<i64> {
    let title = title.to_lowercase();
    let conn = db.get()?;
    conn.execute("INSERT OR IGNORE INTO tags (title) VALUES (?)", [&title])?;
    let id = conn.query_row("SELECT id FROM tags WHERE title = ?", [&title], |row| {
        row.get(0)
    })?;
    Ok(id)
}

pub fn get_tag_by_title(db: &Database, title: &str) -> Result<Option<Tag>> {
    let conn = db.get()?;
    let tag = conn
        .query_row(
            "SELECT id, title, created_at FROM tags WHERE title = ?",
            [title],
            |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )
        .ok();
    Ok(tag)
}

/// Tags ordered by how many posts carry them, most first. Title is the
/// tie-break so equal counts still come back in a stable order.
pub fn popular(db: &Database, limit: usize) -> Result<Vec<TagWithCount>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        r#"
        SELECT t.id, t.title, t.created_at, COUNT(pt.post_id) AS posts_count
        FROM tags t
        LEFT JOIN post_tags pt ON pt.tag_id = t.id
        GROUP BY t.id
        ORDER BY posts_count DESC, t.title
        LIMIT ?
        "#,
    )?;
    let tags = stmt
        .query_map([limit as i64], |row| {
            Ok(TagWithCount {
                tag: Tag {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    created_at: row.get(2)?,
                },
                posts_count: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

pub fn list_tags(db: &Database) -> Result<Vec<Tag>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare("SELECT id, title, created_at FROM tags ORDER BY title")?;
    let tags = stmt
        .query_map([], |row| {
            Ok(Tag {
                id: row.get(0)?,
                title: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

/// Removes the tag and its post associations; the posts themselves stay.
pub fn delete_tag(db: &Database, id: i64) -> Result<()> {
    let conn = db.get()?;
    conn.execute("DELETE FROM tags WHERE id = ?", [id])?;
    Ok(())
}
