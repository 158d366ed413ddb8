//! Fixture data for local development and the integration tests.

use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use sqlx::{Sqlite, SqlitePool};

use crate::models::{Topic, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedData {
    Test,
    Development,
}

impl FromStr for SeedData {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "test" => Ok(SeedData::Test),
            "development" | "dev" => Ok(SeedData::Development),
            other => Err(anyhow!("unknown seed data set `{other}`")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ArticleRow {
    title: String,
    topic: String,
    author: String,
    body: String,
    created_at: NaiveDateTime,
    votes: i64,
    article_img_url: String,
}

#[derive(Debug, Deserialize)]
struct CommentRow {
    body: String,
    /// Position of the article in `articles.json`, counting from 1.
    article_id: usize,
    author: String,
    votes: i64,
    created_at: NaiveDateTime,
}

struct Fixture {
    topics: Vec<Topic>,
    users: Vec<User>,
    articles: Vec<ArticleRow>,
    comments: Vec<CommentRow>,
}

impl SeedData {
    fn load(self) -> Result<Fixture> {
        let (topics, users, articles, comments) = match self {
            SeedData::Test => (
                include_str!("../data/test/topics.json"),
                include_str!("../data/test/users.json"),
                include_str!("../data/test/articles.json"),
                include_str!("../data/test/comments.json"),
            ),
            SeedData::Development => (
                include_str!("../data/development/topics.json"),
                include_str!("../data/development/users.json"),
                include_str!("../data/development/articles.json"),
                include_str!("../data/development/comments.json"),
            ),
        };
        Ok(Fixture {
            topics: serde_json::from_str(topics).context("Failed to parse topics")?,
            users: serde_json::from_str(users).context("Failed to parse users")?,
            articles: serde_json::from_str(articles).context("Failed to parse articles")?,
            comments: serde_json::from_str(comments).context("Failed to parse comments")?,
        })
    }
}

/// Empties every table and reloads it from the chosen fixture set.
pub async fn seed(pool: &SqlitePool, data: SeedData) -> Result<()> {
    let fixture = data.load()?;
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM comments").execute(&mut tx).await?;
    sqlx::query("DELETE FROM articles").execute(&mut tx).await?;
    sqlx::query("DELETE FROM users").execute(&mut tx).await?;
    sqlx::query("DELETE FROM topics").execute(&mut tx).await?;
    sqlx::query("DELETE FROM sqlite_sequence WHERE name IN ('articles', 'comments')")
        .execute(&mut tx)
        .await?;

    for Topic { slug, description } in &fixture.topics {
        sqlx::query("INSERT INTO topics (slug, description) VALUES (?1, ?2)")
            .bind(slug)
            .bind(description)
            .execute(&mut tx)
            .await?;
    }

    for User {
        username,
        name,
        avatar_url,
    } in &fixture.users
    {
        sqlx::query("INSERT INTO users (username, name, avatar_url) VALUES (?1, ?2, ?3)")
            .bind(username)
            .bind(name)
            .bind(avatar_url)
            .execute(&mut tx)
            .await?;
    }

    let mut article_ids = Vec::with_capacity(fixture.articles.len());
    for article in &fixture.articles {
        let article_id = sqlx::query_scalar::<Sqlite, i64>(
            r#"
            INSERT INTO articles (title, topic, author, body, created_at, votes, article_img_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING article_id
            "#,
        )
        .bind(&article.title)
        .bind(&article.topic)
        .bind(&article.author)
        .bind(&article.body)
        .bind(article.created_at)
        .bind(article.votes)
        .bind(&article.article_img_url)
        .fetch_one(&mut tx)
        .await
        .with_context(|| format!("Failed to insert article `{}`", article.title))?;
        article_ids.push(article_id);
    }

    for comment in &fixture.comments {
        let article_id = comment
            .article_id
            .checked_sub(1)
            .and_then(|index| article_ids.get(index).copied())
            .ok_or_else(|| anyhow!("comment refers to unknown article {}", comment.article_id))?;
        sqlx::query(
            r#"
            INSERT INTO comments (body, article_id, author, votes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&comment.body)
        .bind(article_id)
        .bind(&comment.author)
        .bind(comment.votes)
        .bind(comment.created_at)
        .execute(&mut tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(
        topics = fixture.topics.len(),
        users = fixture.users.len(),
        articles = fixture.articles.len(),
        comments = fixture.comments.len(),
        "database seeded with {:?} data",
        data
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_sets_parse() {
        let fixture = SeedData::Test.load().unwrap();
        assert_eq!(fixture.topics.len(), 3);
        assert_eq!(fixture.users.len(), 4);
        assert_eq!(fixture.articles.len(), 13);
        assert_eq!(fixture.comments.len(), 18);

        let fixture = SeedData::Development.load().unwrap();
        assert!(fixture
            .comments
            .iter()
            .all(|comment| (1..=fixture.articles.len()).contains(&comment.article_id)));
    }

    #[test]
    fn seed_data_names() {
        assert_eq!("test".parse::<SeedData>().unwrap(), SeedData::Test);
        assert_eq!("dev".parse::<SeedData>().unwrap(), SeedData::Development);
        assert!("production".parse::<SeedData>().is_err());
    }
}
