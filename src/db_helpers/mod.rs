use sqlx::{Executor, Sqlite};

mod article_helpers;
mod comment_helpers;
pub mod query_builder;
mod topic_helpers;
mod user_helpers;

pub use article_helpers::*;
pub use comment_helpers::*;
pub use topic_helpers::*;
pub use user_helpers::*;

// ----------------- Existence Checks -----------------

/// A `(table, column, value)` triple that can be checked for a matching row.
/// The table and column come from the variant, never from the caller.
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    TopicSlug(&'a str),
    Username(&'a str),
    ArticleId(i64),
    CommentId(i64),
}

impl Lookup<'_> {
    fn query(&self) -> &'static str {
        match self {
            Lookup::TopicSlug(_) => "SELECT EXISTS (SELECT 1 FROM topics WHERE slug = ?1)",
            Lookup::Username(_) => "SELECT EXISTS (SELECT 1 FROM users WHERE username = ?1)",
            Lookup::ArticleId(_) => {
                "SELECT EXISTS (SELECT 1 FROM articles WHERE article_id = ?1)"
            }
            Lookup::CommentId(_) => {
                "SELECT EXISTS (SELECT 1 FROM comments WHERE comment_id = ?1)"
            }
        }
    }
}

/// Reports whether at least one row matches. Read-only; callers decide what
/// a missing row means for them.
pub async fn check_exists<'e, E>(executor: E, lookup: Lookup<'_>) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = sqlx::query_scalar::<Sqlite, bool>(lookup.query());
    let query = match lookup {
        Lookup::TopicSlug(value) | Lookup::Username(value) => query.bind(value),
        Lookup::ArticleId(value) | Lookup::CommentId(value) => query.bind(value),
    };
    query.fetch_one(executor).await
}
