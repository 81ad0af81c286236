use crate::models::{Author, Comment, CommentId, PostId, UserId};
use serde::Serialize;
use thiserror::Error;

/// 本地状态的四种变更意图。reducer 只认这个枚举。
#[derive(Debug, Clone)]
pub enum CommentMutation {
    /// 远端确认创建后，把权威评论对象前插到扁平集合。
    Create { comment: Comment },
    /// 原位替换 `id` 对应的元素；找不到则静默跳过。
    Update { id: CommentId, comment: Comment },
    /// 与 Update 同样的替换语义，内容为服务端确认的软删除表示。
    /// 元素永不移除，子回复保持可达。
    Delete { id: CommentId, comment: Comment },
    /// 乐观点赞切换：以本地当前计数为基数加减，下界为 0。
    ToggleLike { id: CommentId, add_like: bool },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("message is required")]
    MissingMessage,
    #[error("postId is required")]
    MissingPostId,
    #[error("author is required")]
    MissingAuthor,
}

// --- 写协作方的请求载荷 ---

#[derive(Debug, Clone, Serialize)]
pub struct CreateComment {
    pub post_id: PostId,
    pub message: String,
    pub parent_id: Option<CommentId>,
    pub author: Author,
}

impl CreateComment {
    /// 缺字段在调远端之前就地拒绝，不发请求。
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.message.trim().is_empty() {
            return Err(ValidationError::MissingMessage);
        }
        if self.post_id.as_str().is_empty() {
            return Err(ValidationError::MissingPostId);
        }
        if self.author.id.as_str().is_empty() {
            return Err(ValidationError::MissingAuthor);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateComment {
    pub post_id: PostId,
    pub id: CommentId,
    pub message: String,
    pub author_id: UserId,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteComment {
    pub post_id: PostId,
    pub id: CommentId,
    pub author_id: UserId,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleLike {
    pub post_id: PostId,
    pub id: CommentId,
    pub author_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(message: &str, author_id: &str) -> CreateComment {
        CreateComment {
            post_id: PostId::new_unchecked("p1".into()),
            message: message.to_string(),
            parent_id: None,
            author: Author {
                id: UserId::new_unchecked(author_id.into()),
                name: None,
            },
        }
    }

    #[test]
    fn create_rejects_blank_message() {
        assert_eq!(
            req("   ", "u1").validate(),
            Err(ValidationError::MissingMessage)
        );
        assert_eq!(req("", "u1").validate(), Err(ValidationError::MissingMessage));
    }

    #[test]
    fn create_rejects_missing_author() {
        assert_eq!(req("hi", "").validate(), Err(ValidationError::MissingAuthor));
    }

    #[test]
    fn create_accepts_well_formed() {
        assert_eq!(req("hi", "u1").validate(), Ok(()));
    }
}
