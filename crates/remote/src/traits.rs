use async_trait::async_trait;
use domain::{Comment, CreateComment, DeleteComment, Post, PostId, ToggleLike, UpdateComment, UserId};

use crate::error::RemoteError;

/// 读协作方的响应：文章本体加扁平评论列表。
/// 每条评论的 like_count / liked_by_me 已按请求的 viewer 算好。
#[derive(Debug, Clone)]
pub struct PostWithComments {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// 点赞切换的结果增量：远端告知这次是加赞还是取消。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeDelta {
    pub add_like: bool,
}

#[async_trait]
pub trait PostReader: Send + Sync {
    async fn fetch_post(
        &self,
        post_id: &PostId,
        viewer: &UserId,
    ) -> Result<PostWithComments, RemoteError>;
}

/// 写协作方。成功时返回权威评论对象 (或点赞增量)，
/// 调用方用它做本地 reducer 合并，而不是自己拼占位对象。
#[async_trait]
pub trait CommentWriter: Send + Sync {
    async fn create_comment(&self, req: CreateComment) -> Result<Comment, RemoteError>;
    async fn update_comment(&self, req: UpdateComment) -> Result<Comment, RemoteError>;
    /// 软删除：返回内容已清空的评论表示，远端同时 purge 其点赞。
    async fn delete_comment(&self, req: DeleteComment) -> Result<Comment, RemoteError>;
    async fn toggle_like(&self, req: ToggleLike) -> Result<LikeDelta, RemoteError>;
}

pub trait Backend: PostReader + CommentWriter {}

impl<T: PostReader + CommentWriter> Backend for T {}
