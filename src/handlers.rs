use axum::{http::StatusCode, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    data_formats::{
        ArticleWrapper, CommentWrapper, CreateArticleRequest, CreateCommentRequest,
        EndpointsWrapper, ListingQuery, MultipleArticlesWrapper, MultipleCommentsWrapper,
        MultipleUsersWrapper, NewArticle, NewComment, TopicsWrapper, UserWrapper, VoteRequest,
    },
    db_helpers::{
        add_comment_to_article_in_db, create_article_in_db, delete_comment_in_db,
        get_article_by_id_in_db, get_comments_for_article_in_db, get_topics_in_db,
        get_user_by_username_in_db, get_users_in_db, list_articles_in_db,
        query_builder::{ArticleListing, CommentListing},
        update_article_votes_in_db, update_comment_votes_in_db,
    },
    errors::RequestError,
    extractors::{JsonBody, PathId, PathParam, QueryParams},
    models::{Article, Comment, User},
    JsonResponse,
};

type JsonResult<T> = Result<JsonResponse<T>, RequestError>;

const ENDPOINTS: &str = include_str!("../endpoints.json");

// ----------------- Helper Handlers -----------------
pub async fn get_endpoints() -> JsonResult<EndpointsWrapper> {
    let endpoints = serde_json::from_str(ENDPOINTS)
        .map_err(|e| RequestError::ServerError(format!("endpoints.json: {e}")))?;
    Ok((StatusCode::OK, Json(EndpointsWrapper { endpoints })))
}

pub async fn not_found() -> RequestError {
    RequestError::not_found()
}

// ----------------- Topic Handlers -----------------
pub async fn get_topics(Extension(pool): Extension<SqlitePool>) -> JsonResult<TopicsWrapper> {
    let topics = get_topics_in_db(&pool).await?;
    Ok((StatusCode::OK, Json(TopicsWrapper { topics })))
}

// ----------------- Article Handlers -----------------
pub async fn list_articles(
    Extension(pool): Extension<SqlitePool>,
    QueryParams(query): QueryParams<ListingQuery>,
) -> JsonResult<MultipleArticlesWrapper> {
    let listing = ArticleListing::parse(query)?;
    let (articles, total_count) = list_articles_in_db(&pool, &listing).await?;
    Ok((
        StatusCode::OK,
        Json(MultipleArticlesWrapper {
            articles,
            total_count,
        }),
    ))
}

pub async fn get_article(
    Extension(pool): Extension<SqlitePool>,
    PathId(article_id): PathId,
) -> JsonResult<ArticleWrapper<Article>> {
    let article = get_article_by_id_in_db(&pool, article_id).await?;
    Ok((StatusCode::OK, Json(ArticleWrapper { article })))
}

pub async fn post_article(
    Extension(pool): Extension<SqlitePool>,
    JsonBody(request): JsonBody<CreateArticleRequest>,
) -> JsonResult<ArticleWrapper<Article>> {
    let new_article = NewArticle::try_from(request)?;
    let article = create_article_in_db(&pool, new_article).await?;
    Ok((StatusCode::CREATED, Json(ArticleWrapper { article })))
}

pub async fn patch_article(
    Extension(pool): Extension<SqlitePool>,
    PathId(article_id): PathId,
    JsonBody(VoteRequest { inc_votes }): JsonBody<VoteRequest>,
) -> JsonResult<ArticleWrapper<Article>> {
    let article = update_article_votes_in_db(&pool, article_id, inc_votes).await?;
    Ok((StatusCode::OK, Json(ArticleWrapper { article })))
}

// ----------------- Comment Handlers -----------------
pub async fn get_article_comments(
    Extension(pool): Extension<SqlitePool>,
    PathId(article_id): PathId,
    QueryParams(query): QueryParams<ListingQuery>,
) -> JsonResult<MultipleCommentsWrapper> {
    let listing = CommentListing::parse(query)?;
    let comments = get_comments_for_article_in_db(&pool, article_id, &listing).await?;
    Ok((StatusCode::OK, Json(MultipleCommentsWrapper { comments })))
}

pub async fn post_comment(
    Extension(pool): Extension<SqlitePool>,
    PathId(article_id): PathId,
    JsonBody(request): JsonBody<CreateCommentRequest>,
) -> JsonResult<CommentWrapper<Comment>> {
    let new_comment = NewComment::try_from(request)?;
    let comment = add_comment_to_article_in_db(&pool, article_id, new_comment).await?;
    Ok((StatusCode::CREATED, Json(CommentWrapper { comment })))
}

pub async fn patch_comment(
    Extension(pool): Extension<SqlitePool>,
    PathId(comment_id): PathId,
    JsonBody(VoteRequest { inc_votes }): JsonBody<VoteRequest>,
) -> JsonResult<CommentWrapper<Comment>> {
    let comment = update_comment_votes_in_db(&pool, comment_id, inc_votes).await?;
    Ok((StatusCode::OK, Json(CommentWrapper { comment })))
}

pub async fn delete_comment(
    Extension(pool): Extension<SqlitePool>,
    PathId(comment_id): PathId,
) -> Result<StatusCode, RequestError> {
    delete_comment_in_db(&pool, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------- User Handlers -----------------
pub async fn get_users(Extension(pool): Extension<SqlitePool>) -> JsonResult<MultipleUsersWrapper> {
    let users = get_users_in_db(&pool).await?;
    Ok((StatusCode::OK, Json(MultipleUsersWrapper { users })))
}

pub async fn get_user(
    Extension(pool): Extension<SqlitePool>,
    PathParam(username): PathParam<String>,
) -> JsonResult<UserWrapper<User>> {
    let user = get_user_by_username_in_db(&pool, &username).await?;
    Ok((StatusCode::OK, Json(UserWrapper { user })))
}
