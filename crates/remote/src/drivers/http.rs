use async_trait::async_trait;
use domain::{
    protocol::{RawComment, RawPostPayload},
    Comment, CreateComment, DeleteComment, PostId, ToggleLike, UpdateComment, UserId,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::RemoteError;
use crate::traits::{CommentWriter, LikeDelta, PostReader, PostWithComments};

#[derive(Clone)]
pub struct HttpConfig {
    pub base_url: String,
}

/// 对接真实评论 API 的驱动。路由沿用原有 REST 习惯：
/// `/posts/:id`、`/posts/:id/comments`、`/comments/:id`、`/likes/toggle`。
pub struct HttpBackend {
    config: HttpConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: HttpConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

/// 失败响应体：服务端有时用 `error` 字段，有时用 `message`。
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let fallback = format!("request failed with status {}", status.as_u16());
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error.or(body.message).unwrap_or(fallback),
        Err(_) => fallback,
    };
    Err(RemoteError::Status {
        code: status.as_u16(),
        message,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleResponse {
    add_like: bool,
}

#[async_trait]
impl PostReader for HttpBackend {
    async fn fetch_post(
        &self,
        post_id: &PostId,
        viewer: &UserId,
    ) -> Result<PostWithComments, RemoteError> {
        let url = self.url(&format!("/posts/{}", post_id));
        debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .query(&[("userId", viewer.as_str())])
            .send()
            .await?;
        let payload: RawPostPayload = check(resp).await?.json().await?;

        // `_id` → `id` 等归一化只发生在这一边界
        Ok(PostWithComments {
            post: payload.post.normalize(),
            comments: payload
                .comments
                .into_iter()
                .map(RawComment::normalize)
                .collect(),
        })
    }
}

#[async_trait]
impl CommentWriter for HttpBackend {
    async fn create_comment(&self, req: CreateComment) -> Result<Comment, RemoteError> {
        let url = self.url(&format!("/posts/{}/comments", req.post_id));
        debug!("POST {}", url);

        let body = json!({
            "message": req.message,
            "parentId": req.parent_id,
            "user": { "_id": req.author.id, "name": req.author.name },
        });
        let resp = self.client.post(&url).json(&body).send().await?;
        let raw: RawComment = check(resp).await?.json().await?;
        Ok(raw.normalize())
    }

    async fn update_comment(&self, req: UpdateComment) -> Result<Comment, RemoteError> {
        let url = self.url(&format!("/comments/{}", req.id));
        debug!("PUT {}", url);

        let body = json!({ "message": req.message, "userId": req.author_id });
        let resp = self.client.put(&url).json(&body).send().await?;
        let raw: RawComment = check(resp).await?.json().await?;
        Ok(raw.normalize())
    }

    async fn delete_comment(&self, req: DeleteComment) -> Result<Comment, RemoteError> {
        let url = self.url(&format!("/comments/{}", req.id));
        debug!("DELETE {}", url);

        // DELETE 也带 JSON body (userId)，沿用既有服务端约定
        let body = json!({ "userId": req.author_id });
        let resp = self.client.delete(&url).json(&body).send().await?;
        let raw: RawComment = check(resp).await?.json().await?;
        Ok(raw.normalize())
    }

    async fn toggle_like(&self, req: ToggleLike) -> Result<LikeDelta, RemoteError> {
        let url = self.url("/likes/toggle");
        debug!("POST {}", url);

        let body = json!({ "user": req.author_id, "commentId": req.id });
        let resp = self.client.post(&url).json(&body).send().await?;
        let parsed: ToggleResponse = check(resp).await?.json().await?;
        Ok(LikeDelta {
            add_like: parsed.add_like,
        })
    }
}
