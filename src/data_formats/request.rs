use serde::{Deserialize, Serialize};

use crate::errors::RequestError;

pub const DEFAULT_ARTICLE_IMG_URL: &str =
    "https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700";

// ----------------- Article Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct CreateArticleRequest {
    pub author: Option<String>,
    pub topic: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub article_img_url: Option<String>,
}

/// An article insert whose required fields are known to be present.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub author: String,
    pub topic: String,
    pub title: String,
    pub body: String,
    pub article_img_url: String,
}

impl TryFrom<CreateArticleRequest> for NewArticle {
    type Error = RequestError;

    fn try_from(
        CreateArticleRequest {
            author,
            topic,
            title,
            body,
            article_img_url,
        }: CreateArticleRequest,
    ) -> Result<Self, Self::Error> {
        Ok(NewArticle {
            author: required(author)?,
            topic: required(topic)?,
            title: required(title)?,
            body: required(body)?,
            article_img_url: article_img_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_ARTICLE_IMG_URL.to_string()),
        })
    }
}

// ----------------- Comment Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct CreateCommentRequest {
    pub username: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub username: String,
    pub body: String,
}

impl TryFrom<CreateCommentRequest> for NewComment {
    type Error = RequestError;

    fn try_from(
        CreateCommentRequest { username, body }: CreateCommentRequest,
    ) -> Result<Self, Self::Error> {
        Ok(NewComment {
            username: required(username)?,
            body: required(body)?,
        })
    }
}

// ----------------- Vote Request -----------------
/// `inc_votes` stays optional here: a missing increment is rejected by the
/// NOT NULL constraint on `votes`, after the target row has been located.
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct VoteRequest {
    pub inc_votes: Option<i64>,
}

fn required(field: Option<String>) -> Result<String, RequestError> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(RequestError::bad_request()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_without_image_gets_the_default() {
        let request: CreateArticleRequest = serde_json::from_value(serde_json::json!({
            "author": "butter_bridge",
            "topic": "cats",
            "title": "Cats on keyboards",
            "body": "A survey",
            "unexpected": true
        }))
        .unwrap();
        let article = NewArticle::try_from(request).unwrap();
        assert_eq!(article.article_img_url, DEFAULT_ARTICLE_IMG_URL);
    }

    #[test]
    fn article_missing_a_required_field_is_rejected() {
        let request = CreateArticleRequest {
            author: Some("butter_bridge".into()),
            topic: Some("cats".into()),
            title: Some(String::new()),
            body: Some("body".into()),
            article_img_url: None,
        };
        assert!(matches!(
            NewArticle::try_from(request),
            Err(RequestError::BadRequest(_))
        ));
    }

    #[test]
    fn comment_requires_username_and_body() {
        let request = CreateCommentRequest {
            username: None,
            body: Some("hello".into()),
        };
        assert!(NewComment::try_from(request).is_err());
    }
}
