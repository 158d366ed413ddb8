//! Validation and query selection for the article and comment listings.
//!
//! Client parameters are parsed into closed enums first; each
//! `(column, direction)` pair then maps onto a query string fixed at compile
//! time. Only the topic, article id, limit and offset are ever bound, and
//! nothing the client sends is spliced into SQL text.

use std::str::FromStr;

use crate::{data_formats::ListingQuery, errors::RequestError};

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_PAGE: i64 = 1;
/// Upper bound (inclusive) for both `limit` and `p`.
pub const MAX_PAGINATION_VALUE: i64 = 10_000;

/// Rows matching the (optional) topic filter, ignoring pagination.
pub const ARTICLE_COUNT_QUERY: &str =
    "SELECT COUNT(*) FROM articles WHERE (?1 IS NULL OR articles.topic = ?1)";

// Binds: ?1 topic (nullable), ?2 limit, ?3 offset
macro_rules! article_listing {
    ($column:literal $direction:literal) => {
        concat!(
            "SELECT articles.article_id AS article_id, ",
            "articles.title AS title, ",
            "articles.topic AS topic, ",
            "articles.author AS author, ",
            "articles.created_at AS created_at, ",
            "articles.votes AS votes, ",
            "articles.article_img_url AS article_img_url, ",
            "COUNT(comments.comment_id) AS comment_count ",
            "FROM articles ",
            "LEFT JOIN comments ON comments.article_id = articles.article_id ",
            "WHERE (?1 IS NULL OR articles.topic = ?1) ",
            "GROUP BY articles.article_id ",
            "ORDER BY ",
            $column,
            " ",
            $direction,
            " LIMIT ?2 OFFSET ?3"
        )
    };
}

// Binds: ?1 article id, ?2 limit, ?3 offset
macro_rules! comment_listing {
    ($column:literal $direction:literal) => {
        concat!(
            "SELECT comment_id, body, article_id, author, votes, created_at ",
            "FROM comments ",
            "WHERE article_id = ?1 ",
            "ORDER BY ",
            $column,
            " ",
            $direction,
            " LIMIT ?2 OFFSET ?3"
        )
    };
}

macro_rules! ordered_templates {
    ($name:ident: $sort:ident => $template:ident { $($variant:ident => $column:literal),+ $(,)? }) => {
        fn $name(sort: $sort, order: SortOrder) -> &'static str {
            match (sort, order) {
                $(
                    ($sort::$variant, SortOrder::Asc) => $template!($column "ASC"),
                    ($sort::$variant, SortOrder::Desc) => $template!($column "DESC"),
                )+
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = RequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(RequestError::bad_request())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArticleSort {
    Author,
    Title,
    ArticleId,
    Topic,
    #[default]
    CreatedAt,
    Votes,
    CommentCount,
}

impl FromStr for ArticleSort {
    type Err = RequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "author" => Ok(ArticleSort::Author),
            "title" => Ok(ArticleSort::Title),
            "article_id" => Ok(ArticleSort::ArticleId),
            "topic" => Ok(ArticleSort::Topic),
            "created_at" => Ok(ArticleSort::CreatedAt),
            "votes" => Ok(ArticleSort::Votes),
            "comment_count" => Ok(ArticleSort::CommentCount),
            _ => Err(RequestError::bad_request()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentSort {
    CommentId,
    Author,
    Body,
    Votes,
    #[default]
    CreatedAt,
}

impl FromStr for CommentSort {
    type Err = RequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "comment_id" => Ok(CommentSort::CommentId),
            "author" => Ok(CommentSort::Author),
            "body" => Ok(CommentSort::Body),
            "votes" => Ok(CommentSort::Votes),
            "created_at" => Ok(CommentSort::CreatedAt),
            _ => Err(RequestError::bad_request()),
        }
    }
}

ordered_templates!(article_template: ArticleSort => article_listing {
    Author => "articles.author",
    Title => "articles.title",
    ArticleId => "articles.article_id",
    Topic => "articles.topic",
    CreatedAt => "articles.created_at",
    Votes => "articles.votes",
    CommentCount => "comment_count",
});

ordered_templates!(comment_template: CommentSort => comment_listing {
    CommentId => "comment_id",
    Author => "author",
    Body => "body",
    Votes => "votes",
    CreatedAt => "created_at",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub page: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            limit: DEFAULT_LIMIT,
            page: DEFAULT_PAGE,
        }
    }
}

impl Pagination {
    pub fn parse(limit: Option<&str>, page: Option<&str>) -> Result<Self, RequestError> {
        Ok(Pagination {
            limit: parse_bounded(limit, DEFAULT_LIMIT)?,
            page: parse_bounded(page, DEFAULT_PAGE)?,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

fn parse_bounded(raw: Option<&str>, default: i64) -> Result<i64, RequestError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<i64>() {
        Ok(value) if (1..=MAX_PAGINATION_VALUE).contains(&value) => Ok(value),
        _ => Err(RequestError::bad_request()),
    }
}

fn parse_or_default<T>(raw: Option<&str>) -> Result<T, RequestError>
where
    T: FromStr<Err = RequestError> + Default,
{
    raw.map(str::parse).transpose().map(Option::unwrap_or_default)
}

/// A validated `GET /api/articles` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleListing {
    pub sort: ArticleSort,
    pub order: SortOrder,
    pub topic: Option<String>,
    pub pagination: Pagination,
}

impl ArticleListing {
    pub fn parse(query: ListingQuery) -> Result<Self, RequestError> {
        let pagination = Pagination::parse(query.limit.as_deref(), query.p.as_deref())?;
        let sort = parse_or_default(query.sort_by.as_deref())?;
        let order = parse_or_default(query.order.as_deref())?;
        Ok(ArticleListing {
            sort,
            order,
            // An empty `topic=` means no filter
            topic: query.topic.filter(|topic| !topic.is_empty()),
            pagination,
        })
    }

    pub fn query(&self) -> &'static str {
        article_template(self.sort, self.order)
    }
}

/// A validated `GET /api/articles/:article_id/comments` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentListing {
    pub sort: CommentSort,
    pub order: SortOrder,
    pub pagination: Pagination,
}

impl CommentListing {
    pub fn parse(query: ListingQuery) -> Result<Self, RequestError> {
        let pagination = Pagination::parse(query.limit.as_deref(), query.p.as_deref())?;
        let sort = parse_or_default(query.sort_by.as_deref())?;
        let order = parse_or_default(query.order.as_deref())?;
        Ok(CommentListing {
            sort,
            order,
            pagination,
        })
    }

    pub fn query(&self) -> &'static str {
        comment_template(self.sort, self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ListingQuery {
        let mut query = ListingQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "sort_by" => query.sort_by = value,
                "order" => query.order = value,
                "topic" => query.topic = value,
                "limit" => query.limit = value,
                "p" => query.p = value,
                _ => {}
            }
        }
        query
    }

    #[test]
    fn defaults_apply_when_nothing_is_supplied() {
        let listing = ArticleListing::parse(ListingQuery::default()).unwrap();
        assert_eq!(listing.sort, ArticleSort::CreatedAt);
        assert_eq!(listing.order, SortOrder::Desc);
        assert_eq!(listing.topic, None);
        assert_eq!(listing.pagination, Pagination { limit: 10, page: 1 });
        assert_eq!(listing.pagination.offset(), 0);
        assert!(listing.query().contains("ORDER BY articles.created_at DESC"));
    }

    #[test]
    fn order_is_case_insensitive() {
        for order in ["asc", "ASC", "Asc"] {
            let listing = ArticleListing::parse(query(&[("order", order)])).unwrap();
            assert_eq!(listing.order, SortOrder::Asc);
        }
        assert!(ArticleListing::parse(query(&[("order", "up")])).is_err());
    }

    #[test]
    fn sort_by_outside_the_whitelist_is_rejected() {
        for column in ["body", "votes; DROP TABLE articles", "VOTES", ""] {
            let result = ArticleListing::parse(query(&[("sort_by", column)]));
            assert!(
                matches!(result, Err(RequestError::BadRequest(_))),
                "{column} should be rejected"
            );
        }
    }

    #[test]
    fn pagination_bounds_are_inclusive() {
        let listing =
            ArticleListing::parse(query(&[("limit", "10000"), ("p", "10000")])).unwrap();
        assert_eq!(listing.pagination.limit, 10_000);
        assert_eq!(listing.pagination.offset(), 9_999 * 10_000);

        let listing = ArticleListing::parse(query(&[("limit", "1"), ("p", "1")])).unwrap();
        assert_eq!(listing.pagination, Pagination { limit: 1, page: 1 });

        for (key, value) in [
            ("limit", "0"),
            ("limit", "10001"),
            ("limit", "-3"),
            ("limit", "ten"),
            ("limit", "2.5"),
            ("limit", ""),
            ("p", "0"),
            ("p", "10001"),
            ("p", "cat"),
        ] {
            assert!(
                ArticleListing::parse(query(&[(key, value)])).is_err(),
                "{key}={value} should be rejected"
            );
        }
    }

    #[test]
    fn page_becomes_an_offset() {
        let listing = ArticleListing::parse(query(&[("limit", "5"), ("p", "3")])).unwrap();
        assert_eq!(listing.pagination.offset(), 10);
    }

    #[test]
    fn empty_topic_means_no_filter() {
        let listing = ArticleListing::parse(query(&[("topic", "")])).unwrap();
        assert_eq!(listing.topic, None);
        let listing = ArticleListing::parse(query(&[("topic", "cats")])).unwrap();
        assert_eq!(listing.topic.as_deref(), Some("cats"));
    }

    #[test]
    fn every_article_sort_selects_its_own_template() {
        let cases = [
            ("author", "articles.author"),
            ("title", "articles.title"),
            ("article_id", "articles.article_id"),
            ("topic", "articles.topic"),
            ("created_at", "articles.created_at"),
            ("votes", "articles.votes"),
            ("comment_count", "comment_count"),
        ];
        for (sort_by, column) in cases {
            let listing =
                ArticleListing::parse(query(&[("sort_by", sort_by), ("order", "asc")])).unwrap();
            assert!(listing
                .query()
                .contains(&format!("ORDER BY {column} ASC LIMIT ?2 OFFSET ?3")));
        }
    }

    #[test]
    fn article_listing_keeps_articles_without_comments() {
        let listing = ArticleListing::parse(ListingQuery::default()).unwrap();
        assert!(listing.query().contains("LEFT JOIN comments"));
        assert!(listing.query().contains("GROUP BY articles.article_id"));
    }

    #[test]
    fn comment_listing_has_its_own_whitelist() {
        let listing = CommentListing::parse(query(&[("sort_by", "votes")])).unwrap();
        assert_eq!(listing.sort, CommentSort::Votes);
        assert!(listing.query().contains("ORDER BY votes DESC"));

        assert!(CommentListing::parse(query(&[("sort_by", "comment_count")])).is_err());
        assert!(CommentListing::parse(query(&[("p", "0")])).is_err());
    }
}
