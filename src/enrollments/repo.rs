use std::collections::HashSet;

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::error::AppError;

/// One row of the admin report: an enrollment joined with its course.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EnrollmentReport {
    pub student_username: String,
    pub course_title: String,
    pub instructor: String,
    #[serde(with = "time::serde::rfc3339")]
    pub enrollment_date: OffsetDateTime,
}

/// Record an enrollment. The UNIQUE (student_username, course_id) constraint
/// arbitrates concurrent duplicates, so at most one row ever exists per pair;
/// a repeat apply writes nothing and still reads as success to the caller.
/// Returns whether a row was actually inserted.
pub async fn enroll(db: &PgPool, student_username: &str, course_id: i32) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO enrollments (student_username, course_id)
        VALUES ($1, $2)
        ON CONFLICT (student_username, course_id) DO NOTHING
        "#,
    )
    .bind(student_username)
    .bind(course_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Course ids the student is enrolled in, for the catalog's
/// "already enrolled" state.
pub async fn list_for_student(
    db: &PgPool,
    student_username: &str,
) -> Result<HashSet<i32>, AppError> {
    let ids = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT course_id
        FROM enrollments
        WHERE student_username = $1
        "#,
    )
    .bind(student_username)
    .fetch_all(db)
    .await?;
    Ok(ids.into_iter().collect())
}

/// Full enrollment report for admins, newest first.
pub async fn list_all(db: &PgPool) -> Result<Vec<EnrollmentReport>, AppError> {
    let rows = sqlx::query_as::<_, EnrollmentReport>(
        r#"
        SELECT
            e.student_username,
            c.title AS course_title,
            c.instructor,
            e.enrollment_date
        FROM enrollments e
        JOIN courses c ON e.course_id = c.id
        ORDER BY e.enrollment_date DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}
