use crate::models::{Author, Comment, CommentId, Post, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// 远端原始记录。历史接口同时存在 `_id` 和 `id` 两种写法，
/// 归一化只在这个边界做一次，下游一律用规范的 `Comment`。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(alias = "user", default)]
    pub author: Option<RawAuthor>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub liked_by_me: bool,
    #[serde(default)]
    pub deleted: bool,
}

/// 作者字段有时是裸 ID 字符串 (未 populate)，有时是完整对象。
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawAuthor {
    Id(String),
    Full {
        #[serde(alias = "_id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl RawAuthor {
    fn normalize(self) -> Author {
        match self {
            RawAuthor::Id(id) => Author {
                id: UserId::new_unchecked(id),
                name: None,
            },
            RawAuthor::Full { id, name } => Author {
                id: UserId::new_unchecked(id),
                name,
            },
        }
    }
}

impl RawComment {
    pub fn normalize(self) -> Comment {
        // deleted 标志与空 message 归一为同一种表示
        let message = if self.deleted { None } else { self.message };
        Comment {
            id: CommentId::new_unchecked(self.id),
            parent_id: self
                .parent_id
                .filter(|p| !p.is_empty())
                .map(CommentId::new_unchecked),
            message,
            author: self
                .author
                .map(RawAuthor::normalize)
                .unwrap_or_else(|| Author {
                    id: UserId::new_unchecked(String::new()),
                    name: None,
                }),
            created_at: self.created_at.unwrap_or(DateTime::UNIX_EPOCH),
            like_count: self.like_count,
            liked_by_me: self.liked_by_me,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawPost {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl RawPost {
    pub fn normalize(self) -> Post {
        Post {
            id: PostId::new_unchecked(self.id),
            title: self.title,
            body: self.body,
        }
    }
}

/// 读协作方的响应：`{ post, comments }`。
#[derive(Debug, Deserialize)]
pub struct RawPostPayload {
    pub post: RawPost,
    #[serde(default)]
    pub comments: Vec<RawComment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_underscore_id_and_null_parent() {
        let raw: RawComment = serde_json::from_str(
            r#"{
                "_id": "64ab01",
                "parentId": null,
                "message": "first!",
                "user": { "_id": "u1", "name": "John Doe" },
                "createdAt": "2024-03-01T10:00:00Z",
                "likeCount": 3,
                "likedByMe": false
            }"#,
        )
        .unwrap();

        let c = raw.normalize();
        assert_eq!(c.id.as_str(), "64ab01");
        assert_eq!(c.parent_id, None);
        assert_eq!(c.message.as_deref(), Some("first!"));
        assert_eq!(c.author.id.as_str(), "u1");
        assert_eq!(c.author.name.as_deref(), Some("John Doe"));
        assert_eq!(c.like_count, 3);
        assert!(!c.liked_by_me);
    }

    #[test]
    fn accepts_plain_id_and_missing_counts() {
        let raw: RawComment = serde_json::from_str(
            r#"{ "id": "c2", "parentId": "c1", "message": "reply", "user": "u2" }"#,
        )
        .unwrap();

        let c = raw.normalize();
        assert_eq!(c.id.as_str(), "c2");
        assert_eq!(c.parent_id.as_ref().map(|p| p.as_str()), Some("c1"));
        assert_eq!(c.author.id.as_str(), "u2");
        assert_eq!(c.author.name, None);
        assert_eq!(c.like_count, 0);
        assert!(!c.liked_by_me);
    }

    #[test]
    fn deleted_flag_clears_message() {
        let raw: RawComment = serde_json::from_str(
            r#"{ "_id": "c3", "message": "stale", "deleted": true }"#,
        )
        .unwrap();

        let c = raw.normalize();
        assert!(c.is_deleted());
        assert_eq!(c.message, None);
    }

    #[test]
    fn post_payload_round_trip() {
        let payload: RawPostPayload = serde_json::from_str(
            r#"{
                "post": { "_id": "p1", "title": "Hello", "body": "World" },
                "comments": [ { "_id": "c1", "message": "hi" } ]
            }"#,
        )
        .unwrap();

        let post = payload.post.normalize();
        assert_eq!(post.id.as_str(), "p1");
        assert_eq!(post.title, "Hello");
        assert_eq!(payload.comments.len(), 1);
    }
}
