//! Comment storage. Comments hang off a post and cascade with it.

use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct CommentStore {
    pool: SqlitePool,
}

/// A comment as stored.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i64,
    pub uuid: String,
    pub post_id: i64,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A comment joined with its parent post, for the public listing.
#[derive(Debug, Clone)]
pub struct CommentWithPost {
    pub uuid: String,
    pub content: String,
    pub post_uuid: String,
    pub post_title: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    uuid: String,
    post_id: i64,
    content: String,
    created_at: String,
    updated_at: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            uuid: row.uuid,
            post_id: row.post_id,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentWithPostRow {
    uuid: String,
    content: String,
    post_uuid: String,
    post_title: String,
    created_at: String,
    updated_at: String,
}

impl From<CommentWithPostRow> for CommentWithPost {
    fn from(row: CommentWithPostRow) -> Self {
        Self {
            uuid: row.uuid,
            content: row.content,
            post_uuid: row.post_uuid,
            post_title: row.post_title,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl CommentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new comment under a post. Returns the comment UUID.
    pub async fn create(&self, post_id: i64, content: &str) -> Result<String, sqlx::Error> {
        let uuid = uuid::Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO comments (uuid, post_id, content) VALUES (?, ?, ?)")
            .bind(&uuid)
            .bind(post_id)
            .bind(content)
            .execute(&self.pool)
            .await?;

        Ok(uuid)
    }

    /// Get a comment by UUID.
    pub async fn get_by_uuid(&self, uuid: &str) -> Result<Option<Comment>, sqlx::Error> {
        let row: Option<CommentRow> = sqlx::query_as(
            "SELECT id, uuid, post_id, content, created_at, updated_at
             FROM comments WHERE uuid = ?",
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Comment::from))
    }

    /// List all comments with parent post info, newest first.
    pub async fn list_all(&self) -> Result<Vec<CommentWithPost>, sqlx::Error> {
        let rows: Vec<CommentWithPostRow> = sqlx::query_as(
            "SELECT c.uuid, c.content,
                    p.uuid AS post_uuid, p.title AS post_title,
                    c.created_at, c.updated_at
             FROM comments c JOIN posts p ON p.id = c.post_id
             ORDER BY c.created_at DESC, c.id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CommentWithPost::from).collect())
    }

    /// Update a comment's content.
    pub async fn update(&self, id: i64, content: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE comments SET content = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(content)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a comment by ID.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
