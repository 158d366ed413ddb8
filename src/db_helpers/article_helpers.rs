use sqlx::{Executor, Sqlite, SqlitePool};

use crate::data_formats::NewArticle;
use crate::errors::RequestError;
use crate::models::{Article, ArticleSummary};

use super::query_builder::{ArticleListing, ARTICLE_COUNT_QUERY};
use super::{check_exists, Lookup};

const SINGLE_ARTICLE_QUERY: &str = r#"
            SELECT articles.article_id               AS "article_id",
                   articles.title                    AS "title",
                   articles.topic                    AS "topic",
                   articles.author                   AS "author",
                   articles.body                     AS "body",
                   articles.created_at               AS "created_at",
                   articles.votes                    AS "votes",
                   articles.article_img_url          AS "article_img_url",
                   COUNT(comments.comment_id)        AS "comment_count"
            FROM   articles
                LEFT JOIN comments
                        ON comments.article_id = articles.article_id
            WHERE  articles.article_id = ?1
            GROUP  BY articles.article_id
"#;

const INSERT_ARTICLE_QUERY: &str = r#"
            INSERT INTO articles (author, topic, title, body, article_img_url)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING article_id, title, topic, author, body, created_at, votes,
                      article_img_url, 0 AS comment_count
"#;

pub async fn fetch_article<'e, E>(
    executor: E,
    article_id: i64,
) -> Result<Option<Article>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<Sqlite, Article>(SINGLE_ARTICLE_QUERY)
        .bind(article_id)
        .fetch_optional(executor)
        .await
}

/// Returns the requested page together with the number of rows matching the
/// topic filter before pagination.
pub async fn list_articles_in_db(
    pool: &SqlitePool,
    listing: &ArticleListing,
) -> Result<(Vec<ArticleSummary>, i64), RequestError> {
    let topic = listing.topic.as_deref();
    let articles = sqlx::query_as::<Sqlite, ArticleSummary>(listing.query())
        .bind(topic)
        .bind(listing.pagination.limit)
        .bind(listing.pagination.offset())
        .fetch_all(pool);
    let total_count = sqlx::query_scalar::<Sqlite, i64>(ARTICLE_COUNT_QUERY)
        .bind(topic)
        .fetch_one(pool);

    match topic {
        Some(slug) => {
            let (topic_exists, articles, total_count) = tokio::join!(
                check_exists(pool, Lookup::TopicSlug(slug)),
                articles,
                total_count
            );
            // An unknown topic wins over an empty page
            if !topic_exists? {
                return Err(RequestError::not_found());
            }
            Ok((articles?, total_count?))
        }
        None => Ok(tokio::try_join!(articles, total_count)?),
    }
}

pub async fn get_article_by_id_in_db(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Article, RequestError> {
    fetch_article(pool, article_id)
        .await?
        .ok_or_else(RequestError::not_found)
}

pub async fn create_article_in_db(
    pool: &SqlitePool,
    NewArticle {
        author,
        topic,
        title,
        body,
        article_img_url,
    }: NewArticle,
) -> Result<Article, RequestError> {
    let (author_exists, topic_exists) = tokio::try_join!(
        check_exists(pool, Lookup::Username(&author)),
        check_exists(pool, Lookup::TopicSlug(&topic)),
    )?;
    if !author_exists || !topic_exists {
        return Err(RequestError::not_found());
    }

    let article = sqlx::query_as::<Sqlite, Article>(INSERT_ARTICLE_QUERY)
        .bind(author)
        .bind(topic)
        .bind(title)
        .bind(body)
        .bind(article_img_url)
        .fetch_one(pool)
        .await?;
    tracing::info!(article_id = article.article_id, "article created");
    Ok(article)
}

/// Adds `inc_votes` to the stored count. The result may go negative, but a
/// missing increment or one that would overflow the count is a 400.
pub async fn update_article_votes_in_db(
    pool: &SqlitePool,
    article_id: i64,
    inc_votes: Option<i64>,
) -> Result<Article, RequestError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE articles
        SET votes = votes + ?1
        WHERE article_id = ?2 AND typeof(votes + ?1) = 'integer'
        "#,
    )
    .bind(inc_votes)
    .bind(article_id)
    .execute(&mut tx)
    .await?;
    if result.rows_affected() == 0 {
        return Err(
            if check_exists(&mut tx, Lookup::ArticleId(article_id)).await? {
                RequestError::bad_request()
            } else {
                RequestError::not_found()
            },
        );
    }

    let article = fetch_article(&mut tx, article_id)
        .await?
        .ok_or_else(RequestError::not_found)?;

    tx.commit().await?;
    Ok(article)
}
