/// Database row types — these map directly to SQLite rows.
/// Kept separate from the form/view types in quill-web so the DB layer
/// stays independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_file: String,
    pub created_at: String,
}

/// A post joined with its author, so listings render without a second
/// lookup per row.
pub struct PostRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date_posted: String,
    pub author_id: String,
    pub author_username: String,
    pub author_image: String,
}

pub struct CommentRow {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub author_username: String,
    pub author_image: String,
    pub created_at: String,
}
