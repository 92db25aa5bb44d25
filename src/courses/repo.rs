use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::AppError;

/// A course in the catalog. Rows are seeded by an external process; this
/// application only reads them.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Course {
    pub id: i32,
    pub title: String,
    pub instructor: String,
}

pub async fn list_courses(db: &PgPool) -> Result<Vec<Course>, AppError> {
    let courses = sqlx::query_as::<_, Course>(
        r#"
        SELECT id, title, instructor
        FROM courses
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(courses)
}
