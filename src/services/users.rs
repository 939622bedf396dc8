use crate::models::User;
use crate::Database;
use anyhow::Result;

pub fn create_user(db: &Database, username: &str, is_staff: bool) -> Result<i64> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO users (username, is_staff) VALUES (?, ?)",
        (username, is_staff),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_user(db: &Database, id: i64) -> Result<Option<User>> {
    let conn = db.get()?;
    let user = conn
        .query_row(
            "SELECT id, username, is_staff, created_at FROM users WHERE id = ?",
            [id],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    is_staff: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        )
        .ok();
    Ok(user)
}

pub fn list_users(db: &Database) -> Result<Vec<User>> {
    let conn = db.get()?;
    let mut stmt =
        conn.prepare("SELECT id, username, is_staff, created_at FROM users ORDER BY username")?;
    let users = stmt
        .query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                is_staff: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

pub fn delete_user(db: &Database, username: &str) -> Result<bool> {
    let conn = db.get()?;
    let deleted = conn.execute("DELETE FROM users WHERE username = ?", [username])?;
    Ok(deleted > 0)
}
