use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    pub fn new(s: impl Into<String>) -> Result<Self, String> {
        let s = s.into();
        if s.is_empty() {
            return Err("Comment ID cannot be empty.".to_string());
        }
        if s.len() > 128 {
            return Err("Comment ID is too long (max 128 chars).".to_string());
        }
        Ok(Self(s))
    }

    pub fn new_unchecked(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(s: impl Into<String>) -> Result<Self, String> {
        let s = s.into();
        if s.is_empty() {
            return Err("Post ID cannot be empty.".to_string());
        }
        if s.len() > 128 {
            return Err("Post ID is too long (max 128 chars).".to_string());
        }
        Ok(Self(s))
    }

    pub fn new_unchecked(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(s: impl Into<String>) -> Result<Self, String> {
        let s = s.into();
        if s.is_empty() {
            return Err("User ID cannot be empty.".to_string());
        }
        Ok(Self(s))
    }

    pub fn new_unchecked(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 作者信息可能只有部分字段 (远端有时不 populate)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub name: Option<String>,
}

impl Author {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Anonymous")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    /// `None` 表示根评论 (直接挂在文章下)。
    pub parent_id: Option<CommentId>,
    /// `None` 表示已软删除；ID 和线程结构保留，内容不可见。
    pub message: Option<String>,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub like_count: u32,
    pub liked_by_me: bool,
}

impl Comment {
    /// deleted ⟺ message 为空。
    pub fn is_deleted(&self) -> bool {
        self.message.is_none()
    }

    /// 软删除表示：清空内容并清除点赞 (远端会同步 purge likes)。
    pub fn into_deleted(mut self) -> Self {
        self.message = None;
        self.like_count = 0;
        self.liked_by_me = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Comment {
        Comment {
            id: CommentId::new_unchecked("c1".into()),
            parent_id: None,
            message: Some("hello".into()),
            author: Author {
                id: UserId::new_unchecked("u1".into()),
                name: Some("Ferris".into()),
            },
            created_at: Utc::now(),
            like_count: 3,
            liked_by_me: true,
        }
    }

    #[test]
    fn deleted_iff_message_absent() {
        let c = sample();
        assert!(!c.is_deleted());

        let d = c.into_deleted();
        assert!(d.is_deleted());
        assert_eq!(d.message, None);
        assert_eq!(d.like_count, 0);
        assert!(!d.liked_by_me);
        assert_eq!(d.id.as_str(), "c1");
    }

    #[test]
    fn ids_reject_empty() {
        assert!(CommentId::new("").is_err());
        assert!(PostId::new("").is_err());
        assert!(UserId::new("").is_err());
        assert!(CommentId::new("abc").is_ok());
    }

    #[test]
    fn author_display_falls_back() {
        let a = Author {
            id: UserId::new_unchecked("u9".into()),
            name: None,
        };
        assert_eq!(a.display_name(), "Anonymous");
    }
}
