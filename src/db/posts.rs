//! Post storage.

use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct PostStore {
    pool: SqlitePool,
}

/// A post as stored.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: i64,
    pub uuid: String,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A post joined with its author, for the public listing.
#[derive(Debug, Clone)]
pub struct PostWithAuthor {
    pub uuid: String,
    pub title: String,
    pub content: String,
    pub author_uuid: String,
    pub author_name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    uuid: String,
    user_id: i64,
    title: String,
    content: String,
    created_at: String,
    updated_at: String,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            uuid: row.uuid,
            user_id: row.user_id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostWithAuthorRow {
    uuid: String,
    title: String,
    content: String,
    author_uuid: String,
    author_name: String,
    created_at: String,
    updated_at: String,
}

impl From<PostWithAuthorRow> for PostWithAuthor {
    fn from(row: PostWithAuthorRow) -> Self {
        Self {
            uuid: row.uuid,
            title: row.title,
            content: row.content,
            author_uuid: row.author_uuid,
            author_name: row.author_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl PostStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new post. Returns the post UUID.
    pub async fn create(
        &self,
        user_id: i64,
        title: &str,
        content: &str,
    ) -> Result<String, sqlx::Error> {
        let uuid = uuid::Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO posts (uuid, user_id, title, content) VALUES (?, ?, ?, ?)")
            .bind(&uuid)
            .bind(user_id)
            .bind(title)
            .bind(content)
            .execute(&self.pool)
            .await?;

        Ok(uuid)
    }

    /// Get a post by UUID.
    pub async fn get_by_uuid(&self, uuid: &str) -> Result<Option<Post>, sqlx::Error> {
        let row: Option<PostRow> = sqlx::query_as(
            "SELECT id, uuid, user_id, title, content, created_at, updated_at
             FROM posts WHERE uuid = ?",
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Post::from))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>, sqlx::Error> {
        let row: Option<PostRow> = sqlx::query_as(
            "SELECT id, uuid, user_id, title, content, created_at, updated_at
             FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Post::from))
    }

    /// Get a post by UUID joined with its author.
    pub async fn get_with_author(&self, uuid: &str) -> Result<Option<PostWithAuthor>, sqlx::Error> {
        let row: Option<PostWithAuthorRow> = sqlx::query_as(
            "SELECT p.uuid, p.title, p.content,
                    u.uuid AS author_uuid, u.name AS author_name,
                    p.created_at, p.updated_at
             FROM posts p JOIN users u ON u.id = p.user_id
             WHERE p.uuid = ?",
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(PostWithAuthor::from))
    }

    /// List all posts with author info, newest first.
    pub async fn list_all(&self) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
        let rows: Vec<PostWithAuthorRow> = sqlx::query_as(
            "SELECT p.uuid, p.title, p.content,
                    u.uuid AS author_uuid, u.name AS author_name,
                    p.created_at, p.updated_at
             FROM posts p JOIN users u ON u.id = p.user_id
             ORDER BY p.created_at DESC, p.id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(PostWithAuthor::from).collect())
    }

    /// Update a post's title and content.
    pub async fn update(&self, id: i64, title: &str, content: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE posts SET title = ?, content = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(title)
        .bind(content)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a post by ID. Comments cascade.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
