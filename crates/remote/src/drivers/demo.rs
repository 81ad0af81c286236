use async_trait::async_trait;
use chrono::{Duration, Utc};
use domain::{
    Author, Comment, CommentId, CreateComment, DeleteComment, Post, PostId, ToggleLike,
    UpdateComment, UserId,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::error::RemoteError;
use crate::traits::{CommentWriter, LikeDelta, PostReader, PostWithComments};

/// 后端不可用时的兜底驱动：内存里模拟整套服务端语义
/// (ID 生成、软删除连带 purge likes、按 viewer 的点赞状态)。
/// 初始化时选定，不是藏在错误处理里的运行期分支。
#[derive(Clone)]
pub struct DemoBackend {
    store: Arc<Mutex<DemoStore>>,
}

struct DemoStore {
    post: Post,
    comments: Vec<StoredComment>,
    // 点赞单独存 (comment, user) 对，和真实服务端的 Like 集合一致
    likes: HashSet<(CommentId, UserId)>,
}

/// 存储形态不含 viewer 相关字段，like_count / liked_by_me 读取时计算。
#[derive(Clone)]
struct StoredComment {
    id: CommentId,
    parent_id: Option<CommentId>,
    message: Option<String>,
    author: Author,
    created_at: chrono::DateTime<Utc>,
}

fn gen_id() -> CommentId {
    CommentId::new_unchecked(format!("{:x}", rand::random::<u128>()))
}

impl DemoStore {
    fn view(&self, c: &StoredComment, viewer: &UserId) -> Comment {
        let like_count = self
            .likes
            .iter()
            .filter(|(comment_id, _)| *comment_id == c.id)
            .count() as u32;
        Comment {
            id: c.id.clone(),
            parent_id: c.parent_id.clone(),
            message: c.message.clone(),
            author: c.author.clone(),
            created_at: c.created_at,
            like_count,
            liked_by_me: self.likes.contains(&(c.id.clone(), viewer.clone())),
        }
    }

    fn find(&mut self, id: &CommentId) -> Result<&mut StoredComment, RemoteError> {
        self.comments
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or(RemoteError::NotFound)
    }
}

impl DemoBackend {
    /// 带示例数据，演示嵌套评论时开箱即用。
    pub fn new() -> Self {
        let john = Author {
            id: UserId::new_unchecked("demo-john".into()),
            name: Some("John Doe".into()),
        };
        let jane = Author {
            id: UserId::new_unchecked("demo-jane".into()),
            name: Some("Jane Smith".into()),
        };
        let c1 = CommentId::new_unchecked("demo-comment-1".into());
        let c2 = CommentId::new_unchecked("demo-comment-2".into());
        let now = Utc::now();

        let comments = vec![
            StoredComment {
                id: c1.clone(),
                parent_id: None,
                message: Some(
                    "This is a sample comment to show how the nested comment system works!".into(),
                ),
                author: john,
                created_at: now - Duration::hours(1),
            },
            StoredComment {
                id: c2.clone(),
                parent_id: Some(c1.clone()),
                message: Some(
                    "This is a reply to the first comment. You can nest comments infinitely!"
                        .into(),
                ),
                author: jane,
                created_at: now - Duration::minutes(30),
            },
        ];

        let mut likes = HashSet::new();
        for i in 1..=3 {
            likes.insert((c1.clone(), UserId::new_unchecked(format!("demo-liker-{}", i))));
        }
        likes.insert((c2.clone(), UserId::new_unchecked("demo-liker-1".into())));

        Self {
            store: Arc::new(Mutex::new(DemoStore {
                post: Post {
                    id: PostId::new_unchecked("demo-post".into()),
                    title: "Nested comments demo".into(),
                    body: "A canned post served entirely from memory.".into(),
                },
                comments,
                likes,
            })),
        }
    }

    /// 空状态，测试用。
    pub fn empty() -> Self {
        Self {
            store: Arc::new(Mutex::new(DemoStore {
                post: Post {
                    id: PostId::new_unchecked("demo-post".into()),
                    title: "Nested comments demo".into(),
                    body: String::new(),
                },
                comments: Vec::new(),
                likes: HashSet::new(),
            })),
        }
    }
}

impl Default for DemoBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostReader for DemoBackend {
    async fn fetch_post(
        &self,
        _post_id: &PostId,
        viewer: &UserId,
    ) -> Result<PostWithComments, RemoteError> {
        let store = self.store.lock().unwrap();
        let comments = store
            .comments
            .iter()
            .map(|c| store.view(c, viewer))
            .collect();
        Ok(PostWithComments {
            post: store.post.clone(),
            comments,
        })
    }
}

#[async_trait]
impl CommentWriter for DemoBackend {
    async fn create_comment(&self, req: CreateComment) -> Result<Comment, RemoteError> {
        // 和真实服务端一样在接收侧再挡一次缺字段
        if req.message.trim().is_empty() || req.author.id.as_str().is_empty() {
            return Err(RemoteError::Status {
                code: 400,
                message: "message, userId, and postId are required".into(),
            });
        }

        let mut store = self.store.lock().unwrap();
        let stored = StoredComment {
            id: gen_id(),
            parent_id: req.parent_id,
            message: Some(req.message),
            author: req.author.clone(),
            created_at: Utc::now(),
        };
        debug!("demo: created comment {}", stored.id);
        let view = store.view(&stored, &req.author.id);
        store.comments.push(stored);
        Ok(view)
    }

    async fn update_comment(&self, req: UpdateComment) -> Result<Comment, RemoteError> {
        let mut store = self.store.lock().unwrap();
        let slot = store.find(&req.id)?;
        if slot.author.id != req.author_id {
            return Err(RemoteError::Status {
                code: 403,
                message: "You can only edit your own comments".into(),
            });
        }
        slot.message = Some(req.message);
        let updated = slot.clone();
        Ok(store.view(&updated, &req.author_id))
    }

    async fn delete_comment(&self, req: DeleteComment) -> Result<Comment, RemoteError> {
        let mut store = self.store.lock().unwrap();
        let slot = store.find(&req.id)?;
        if slot.author.id != req.author_id {
            return Err(RemoteError::Status {
                code: 403,
                message: "You can only delete your own comments".into(),
            });
        }
        // 软删除：保留 ID 以维持评论树结构，但清空内容
        slot.message = None;
        let deleted = slot.clone();
        // 连带 purge 该评论的所有点赞
        store.likes.retain(|(comment_id, _)| *comment_id != req.id);
        Ok(store.view(&deleted, &req.author_id))
    }

    async fn toggle_like(&self, req: ToggleLike) -> Result<LikeDelta, RemoteError> {
        let mut store = self.store.lock().unwrap();
        store.find(&req.id)?;

        let key = (req.id.clone(), req.author_id.clone());
        let add_like = if store.likes.contains(&key) {
            store.likes.remove(&key);
            false
        } else {
            store.likes.insert(key);
            true
        };
        Ok(LikeDelta { add_like })
    }
}
