use crate::Database;
use crate::models::{CommentRow, PostRow, UserRow};
use anyhow::Result;
use rusqlite::Connection;

/// Which unique constraint a user write collided with.
///
/// The form-level "already taken" checks are advisory and may race;
/// these are the authoritative outcomes, surfaced from SQLite itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserConflict {
    Username,
    Email,
}

/// Inspect a failed user insert/update for a unique-constraint violation.
pub fn user_conflict(err: &anyhow::Error) -> Option<UserConflict> {
    let sqlite = err.downcast_ref::<rusqlite::Error>()?;
    if let rusqlite::Error::SqliteFailure(code, Some(msg)) = sqlite {
        if code.code == rusqlite::ErrorCode::ConstraintViolation {
            if msg.contains("users.username") {
                return Some(UserConflict::Username);
            }
            if msg.contains("users.email") {
                return Some(UserConflict::Email);
            }
        }
    }
    None
}

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO users (id, username, email, password) VALUES (?1, ?2, ?3, ?4)",
            (id, username, email, password_hash),
        )?;
        Ok(())
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        query_user(&self.conn()?, "id", id)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        query_user(&self.conn()?, "email", email)
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        query_user(&self.conn()?, "username", username)
    }

    pub fn update_user_fields(&self, id: &str, username: &str, email: &str) -> Result<()> {
        self.conn()?.execute(
            "UPDATE users SET username = ?2, email = ?3 WHERE id = ?1",
            (id, username, email),
        )?;
        Ok(())
    }

    pub fn update_user_image(&self, id: &str, image_file: &str) -> Result<()> {
        self.conn()?.execute(
            "UPDATE users SET image_file = ?2 WHERE id = ?1",
            (id, image_file),
        )?;
        Ok(())
    }

    // -- Posts --

    pub fn create_post(&self, id: &str, title: &str, content: &str, author_id: &str) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO posts (id, title, content, author_id) VALUES (?1, ?2, ?3, ?4)",
            (id, title, content, author_id),
        )?;
        Ok(())
    }

    pub fn get_post(&self, id: &str) -> Result<Option<PostRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{POST_SELECT} WHERE p.id = ?1"))?;
        let row = stmt.query_row([id], post_from_row).optional()?;
        Ok(row)
    }

    /// Overwrites title and content only; id and date_posted are preserved.
    pub fn update_post(&self, id: &str, title: &str, content: &str) -> Result<()> {
        self.conn()?.execute(
            "UPDATE posts SET title = ?2, content = ?3 WHERE id = ?1",
            (id, title, content),
        )?;
        Ok(())
    }

    pub fn delete_post(&self, id: &str) -> Result<()> {
        self.conn()?.execute("DELETE FROM posts WHERE id = ?1", [id])?;
        Ok(())
    }

    pub fn list_posts(&self, limit: u32, offset: u64) -> Result<Vec<PostRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{POST_SELECT} ORDER BY p.date_posted DESC, p.rowid DESC LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
            .query_map(rusqlite::params![limit, offset as i64], post_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count_posts(&self) -> Result<u64> {
        let n: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    pub fn list_posts_by_author(
        &self,
        author_id: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<PostRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{POST_SELECT} WHERE p.author_id = ?1
             ORDER BY p.date_posted DESC, p.rowid DESC LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
            .query_map(
                rusqlite::params![author_id, limit, offset as i64],
                post_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count_posts_by_author(&self, author_id: &str) -> Result<u64> {
        let n: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM posts WHERE author_id = ?1",
            [author_id],
            |row| row.get(0),
        )?;
        Ok(n as u64)
    }

    // -- Comments --

    pub fn create_comment(&self, id: &str, content: &str, author_id: &str) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO comments (id, content, author_id) VALUES (?1, ?2, ?3)",
            (id, content, author_id),
        )?;
        Ok(())
    }

    pub fn recent_comments(&self, limit: u32) -> Result<Vec<CommentRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT c.id, c.content, c.author_id, u.username, u.image_file, c.created_at
             FROM comments c
             JOIN users u ON c.author_id = u.id
             ORDER BY c.created_at DESC, c.rowid DESC
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map([limit], |row| {
                Ok(CommentRow {
                    id: row.get(0)?,
                    content: row.get(1)?,
                    author_id: row.get(2)?,
                    author_username: row.get(3)?,
                    author_image: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

// JOIN users so every listed post carries its author's name and picture
// in a single query (eliminates N+1).
const POST_SELECT: &str = "SELECT p.id, p.title, p.content, p.date_posted, p.author_id,
        u.username, u.image_file
 FROM posts p
 JOIN users u ON p.author_id = u.id";

fn post_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<PostRow, rusqlite::Error> {
    Ok(PostRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        date_posted: row.get(3)?,
        author_id: row.get(4)?,
        author_username: row.get(5)?,
        author_image: row.get(6)?,
    })
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, username, email, password, image_file, created_at
         FROM users WHERE {column} = ?1"
    ))?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                password: row.get(3)?,
                image_file: row.get(4)?,
                created_at: row.get(5)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn add_user(db: &Database, username: &str, email: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_user(&id, username, email, "$argon2id$fake").unwrap();
        id
    }

    fn add_post(db: &Database, author_id: &str, title: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_post(&id, title, "some content", author_id).unwrap();
        id
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let db = db();
        add_user(&db, "alice", "alice@example.com");

        let err = db
            .create_user(&Uuid::new_v4().to_string(), "alice", "other@example.com", "h")
            .unwrap_err();
        assert_eq!(user_conflict(&err), Some(UserConflict::Username));

        // nothing was persisted for the losing insert
        assert!(db.get_user_by_email("other@example.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let db = db();
        add_user(&db, "alice", "alice@example.com");

        let err = db
            .create_user(&Uuid::new_v4().to_string(), "bob", "alice@example.com", "h")
            .unwrap_err();
        assert_eq!(user_conflict(&err), Some(UserConflict::Email));
    }

    #[test]
    fn user_lookups_agree() {
        let db = db();
        let id = add_user(&db, "alice", "alice@example.com");

        let by_id = db.get_user_by_id(&id).unwrap().unwrap();
        let by_email = db.get_user_by_email("alice@example.com").unwrap().unwrap();
        let by_name = db.get_user_by_username("alice").unwrap().unwrap();

        assert_eq!(by_id.id, id);
        assert_eq!(by_email.id, id);
        assert_eq!(by_name.id, id);
        assert_eq!(by_id.image_file, "default.png");
        assert!(db.get_user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn profile_update_conflicts_are_detected() {
        let db = db();
        add_user(&db, "alice", "alice@example.com");
        let bob = add_user(&db, "bob", "bob@example.com");

        let err = db
            .update_user_fields(&bob, "alice", "bob@example.com")
            .unwrap_err();
        assert_eq!(user_conflict(&err), Some(UserConflict::Username));

        // a clean rename goes through
        db.update_user_fields(&bob, "robert", "bob@example.com").unwrap();
        assert_eq!(db.get_user_by_id(&bob).unwrap().unwrap().username, "robert");
    }

    #[test]
    fn image_update_only_touches_image() {
        let db = db();
        let id = add_user(&db, "alice", "alice@example.com");

        db.update_user_image(&id, "a1b2c3d4e5f60708.png").unwrap();
        let user = db.get_user_by_id(&id).unwrap().unwrap();
        assert_eq!(user.image_file, "a1b2c3d4e5f60708.png");
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn posts_list_most_recent_first() {
        let db = db();
        let alice = add_user(&db, "alice", "alice@example.com");
        add_post(&db, &alice, "first");
        add_post(&db, &alice, "second");
        add_post(&db, &alice, "third");

        let page1 = db.list_posts(2, 0).unwrap();
        assert_eq!(page1.len(), 2);
        assert_eq!(page1[0].title, "third");
        assert_eq!(page1[1].title, "second");
        assert_eq!(page1[0].author_username, "alice");

        let page2 = db.list_posts(2, 2).unwrap();
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0].title, "first");

        // beyond the last page is simply empty
        assert!(db.list_posts(2, 10).unwrap().is_empty());
        assert_eq!(db.count_posts().unwrap(), 3);
    }

    #[test]
    fn per_author_listing_filters() {
        let db = db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let bob = add_user(&db, "bob", "bob@example.com");
        add_post(&db, &alice, "hers");
        add_post(&db, &bob, "his");

        let posts = db.list_posts_by_author(&alice, 10, 0).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "hers");
        assert_eq!(db.count_posts_by_author(&alice).unwrap(), 1);
        assert_eq!(db.count_posts_by_author(&bob).unwrap(), 1);
    }

    #[test]
    fn update_post_preserves_id_and_date() {
        let db = db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let post_id = add_post(&db, &alice, "draft");

        let before = db.get_post(&post_id).unwrap().unwrap();
        db.update_post(&post_id, "final", "rewritten").unwrap();
        let after = db.get_post(&post_id).unwrap().unwrap();

        assert_eq!(after.title, "final");
        assert_eq!(after.content, "rewritten");
        assert_eq!(after.id, before.id);
        assert_eq!(after.date_posted, before.date_posted);
        assert_eq!(after.author_id, alice);
    }

    #[test]
    fn delete_post_removes_row() {
        let db = db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let post_id = add_post(&db, &alice, "gone soon");

        db.delete_post(&post_id).unwrap();
        assert!(db.get_post(&post_id).unwrap().is_none());
        assert_eq!(db.count_posts().unwrap(), 0);
    }

    #[test]
    fn comment_requires_existing_author() {
        let db = db();
        let err = db
            .create_comment(&Uuid::new_v4().to_string(), "hi", "no-such-user")
            .unwrap_err();
        assert!(user_conflict(&err).is_none());
        assert!(err.to_string().to_lowercase().contains("constraint"));
    }

    #[test]
    fn recent_comments_carry_author() {
        let db = db();
        let alice = add_user(&db, "alice", "alice@example.com");
        db.create_comment(&Uuid::new_v4().to_string(), "one", &alice).unwrap();
        db.create_comment(&Uuid::new_v4().to_string(), "two", &alice).unwrap();

        let comments = db.recent_comments(10).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "two");
        assert_eq!(comments[0].author_username, "alice");
    }
}
