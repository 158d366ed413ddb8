use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::NewComment;
use crate::errors::RequestError;
use crate::models::Comment;

use super::query_builder::CommentListing;
use super::{check_exists, Lookup};

/// An article with no comments yields an empty list; only an unknown
/// article is a 404.
pub async fn get_comments_for_article_in_db(
    pool: &SqlitePool,
    article_id: i64,
    listing: &CommentListing,
) -> Result<Vec<Comment>, RequestError> {
    let comments = sqlx::query_as::<Sqlite, Comment>(listing.query())
        .bind(article_id)
        .bind(listing.pagination.limit)
        .bind(listing.pagination.offset())
        .fetch_all(pool);

    let (article_exists, comments) =
        tokio::join!(check_exists(pool, Lookup::ArticleId(article_id)), comments);
    if !article_exists? {
        return Err(RequestError::not_found());
    }
    Ok(comments?)
}

/// Unknown articles and authors are a 404, checked before anything is
/// written.
pub async fn add_comment_to_article_in_db(
    pool: &SqlitePool,
    article_id: i64,
    NewComment { username, body }: NewComment,
) -> Result<Comment, RequestError> {
    let (article_exists, author_exists) = tokio::try_join!(
        check_exists(pool, Lookup::ArticleId(article_id)),
        check_exists(pool, Lookup::Username(&username)),
    )?;
    if !article_exists || !author_exists {
        return Err(RequestError::not_found());
    }

    let comment = sqlx::query_as::<Sqlite, Comment>(
        r#"
        INSERT INTO comments (body, article_id, author)
        VALUES (?1, ?2, ?3)
        RETURNING comment_id, body, article_id, author, votes, created_at
        "#,
    )
    .bind(body)
    .bind(article_id)
    .bind(username)
    .fetch_one(pool)
    .await?;
    tracing::info!(comment_id = comment.comment_id, article_id, "comment added");
    Ok(comment)
}

/// A row left untouched is either missing (404) or an increment that is
/// absent or would overflow the count (400).
pub async fn update_comment_votes_in_db(
    pool: &SqlitePool,
    comment_id: i64,
    inc_votes: Option<i64>,
) -> Result<Comment, RequestError> {
    let mut tx = pool.begin().await?;

    let comment = sqlx::query_as::<Sqlite, Comment>(
        r#"
        UPDATE comments
        SET votes = votes + ?1
        WHERE comment_id = ?2 AND typeof(votes + ?1) = 'integer'
        RETURNING comment_id, body, article_id, author, votes, created_at
        "#,
    )
    .bind(inc_votes)
    .bind(comment_id)
    .fetch_optional(&mut tx)
    .await?;

    let Some(comment) = comment else {
        return Err(
            if check_exists(&mut tx, Lookup::CommentId(comment_id)).await? {
                RequestError::bad_request()
            } else {
                RequestError::not_found()
            },
        );
    };

    tx.commit().await?;
    Ok(comment)
}

pub async fn delete_comment_in_db(pool: &SqlitePool, comment_id: i64) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM comments WHERE comment_id = ?1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RequestError::not_found());
    }
    tracing::info!(comment_id, "comment deleted");
    Ok(())
}
