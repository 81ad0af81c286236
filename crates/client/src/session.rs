use domain::{
    Author, Comment, CommentId, CommentMutation, CreateComment, DeleteComment, Post, PostId,
    ToggleLike, UpdateComment,
};
use remote::Backend;
use state::CommentTreeIndex;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::status::{ActionKind, ActionStatus, ActionTracker};

/// 单篇文章的评论会话：扁平集合 + 派生树索引的唯一所有者。
///
/// 句柄可 Clone，同一视图树里按引用传递；不同文章各占一个会话，
/// 没有全局单例。写操作分两段：先调远端，成功后再过 reducer
/// 合并本地状态，不整页重拉。
///
/// 并发语义沿用乐观模型：不同 in-flight 动作互不排序，同一条评论
/// 上的竞态由后返回者覆盖。视图卸载时 `close()`，迟到的响应会被
/// 丢弃而不是落到已死的状态上。
#[derive(Clone)]
pub struct PostSession {
    post_id: PostId,
    viewer: Author,
    backend: Arc<dyn Backend>,
    inner: Arc<Mutex<SessionState>>,
    alive: CancellationToken,
}

#[derive(Default)]
struct SessionState {
    post: Option<Post>,
    comments: Vec<Comment>,
    index: CommentTreeIndex,
    actions: ActionTracker,
}

impl SessionState {
    // 索引是集合的纯函数，每次变更后整体重建
    fn rebuild_index(&mut self) {
        self.index = CommentTreeIndex::build(&self.comments);
    }
}

impl PostSession {
    pub fn new(backend: Arc<dyn Backend>, post_id: PostId, viewer: Author) -> Self {
        Self {
            post_id,
            viewer,
            backend,
            inner: Arc::new(Mutex::new(SessionState::default())),
            alive: CancellationToken::new(),
        }
    }

    /// 视图卸载。之后任何 in-flight 响应都不再落盘。
    pub fn close(&self) {
        self.alive.cancel();
    }

    // --- 读侧 ---

    pub fn post(&self) -> Option<Post> {
        self.inner.lock().unwrap().post.clone()
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.inner.lock().unwrap().comments.clone()
    }

    pub fn root_comments(&self) -> Vec<Comment> {
        self.inner.lock().unwrap().index.roots().to_vec()
    }

    pub fn replies_of(&self, parent_id: &CommentId) -> Vec<Comment> {
        self.inner.lock().unwrap().index.replies(parent_id).to_vec()
    }

    pub fn status(&self, kind: ActionKind) -> ActionStatus {
        self.inner.lock().unwrap().actions.status(kind)
    }

    // --- 写侧：两段式，先远端后 reducer ---
    // 返回值表示本地状态是否被这次动作更新；失败原因看 status()。

    pub async fn load(&self) -> bool {
        self.begin(ActionKind::Load);
        let result = self.backend.fetch_post(&self.post_id, &self.viewer.id).await;
        if self.alive.is_cancelled() {
            return false;
        }
        match result {
            Ok(fetched) => {
                info!(
                    "Loaded post {} with {} comment(s)",
                    self.post_id,
                    fetched.comments.len()
                );
                let mut s = self.inner.lock().unwrap();
                s.post = Some(fetched.post);
                s.comments = fetched.comments;
                s.rebuild_index();
                s.actions.finish_ok(ActionKind::Load);
                true
            }
            Err(e) => self.fail(ActionKind::Load, e.to_string()),
        }
    }

    pub async fn create_comment(
        &self,
        message: impl Into<String>,
        parent_id: Option<CommentId>,
    ) -> bool {
        let req = CreateComment {
            post_id: self.post_id.clone(),
            message: message.into(),
            parent_id,
            author: self.viewer.clone(),
        };
        // 本地校验失败直接落到 Create 的错误位，不发请求
        if let Err(e) = req.validate() {
            return self.fail(ActionKind::Create, e.to_string());
        }

        self.begin(ActionKind::Create);
        let result = self.backend.create_comment(req).await;
        if self.alive.is_cancelled() {
            return false;
        }
        match result {
            Ok(comment) => {
                let mut s = self.inner.lock().unwrap();
                state::apply(&mut s.comments, CommentMutation::Create { comment });
                s.rebuild_index();
                s.actions.finish_ok(ActionKind::Create);
                true
            }
            Err(e) => self.fail(ActionKind::Create, e.to_string()),
        }
    }

    pub async fn update_comment(&self, id: CommentId, message: impl Into<String>) -> bool {
        self.begin(ActionKind::Update);
        let result = self
            .backend
            .update_comment(UpdateComment {
                post_id: self.post_id.clone(),
                id: id.clone(),
                message: message.into(),
                author_id: self.viewer.id.clone(),
            })
            .await;
        if self.alive.is_cancelled() {
            return false;
        }
        match result {
            Ok(comment) => {
                let mut s = self.inner.lock().unwrap();
                state::apply(&mut s.comments, CommentMutation::Update { id, comment });
                s.rebuild_index();
                s.actions.finish_ok(ActionKind::Update);
                true
            }
            Err(e) => self.fail(ActionKind::Update, e.to_string()),
        }
    }

    pub async fn delete_comment(&self, id: CommentId) -> bool {
        self.begin(ActionKind::Delete);
        let result = self
            .backend
            .delete_comment(DeleteComment {
                post_id: self.post_id.clone(),
                id: id.clone(),
                author_id: self.viewer.id.clone(),
            })
            .await;
        if self.alive.is_cancelled() {
            return false;
        }
        match result {
            // 软删除 = 原位替换为服务端确认的表示，元素不移除
            Ok(comment) => {
                let mut s = self.inner.lock().unwrap();
                state::apply(&mut s.comments, CommentMutation::Delete { id, comment });
                s.rebuild_index();
                s.actions.finish_ok(ActionKind::Delete);
                true
            }
            Err(e) => self.fail(ActionKind::Delete, e.to_string()),
        }
    }

    pub async fn toggle_like(&self, id: CommentId) -> bool {
        self.begin(ActionKind::Like);
        let result = self
            .backend
            .toggle_like(ToggleLike {
                post_id: self.post_id.clone(),
                id: id.clone(),
                author_id: self.viewer.id.clone(),
            })
            .await;
        if self.alive.is_cancelled() {
            return false;
        }
        match result {
            // 增量以本地当前计数为基数；其他人的并发点赞要等下次整拉
            Ok(delta) => {
                let mut s = self.inner.lock().unwrap();
                state::apply(
                    &mut s.comments,
                    CommentMutation::ToggleLike {
                        id,
                        add_like: delta.add_like,
                    },
                );
                s.rebuild_index();
                s.actions.finish_ok(ActionKind::Like);
                true
            }
            Err(e) => self.fail(ActionKind::Like, e.to_string()),
        }
    }

    fn begin(&self, kind: ActionKind) {
        self.inner.lock().unwrap().actions.begin(kind);
    }

    fn fail(&self, kind: ActionKind, message: String) -> bool {
        warn!("{:?} action failed: {}", kind, message);
        self.inner.lock().unwrap().actions.finish_err(kind, message);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::UserId;
    use remote::DemoBackend;

    fn viewer() -> Author {
        Author {
            id: UserId::new_unchecked("viewer".into()),
            name: Some("Viewer".into()),
        }
    }

    fn demo_session() -> PostSession {
        PostSession::new(
            Arc::new(DemoBackend::new()),
            PostId::new_unchecked("demo-post".into()),
            viewer(),
        )
    }

    fn cid(id: &str) -> CommentId {
        CommentId::new_unchecked(id.into())
    }

    #[tokio::test]
    async fn load_builds_walkable_tree() {
        let session = demo_session();
        assert!(session.load().await);

        assert!(session.post().is_some());
        let roots = session.root_comments();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id.as_str(), "demo-comment-1");

        let replies = session.replies_of(&roots[0].id);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].id.as_str(), "demo-comment-2");
        assert!(session.replies_of(&replies[0].id).is_empty());

        let s = session.status(ActionKind::Load);
        assert!(!s.in_flight);
        assert_eq!(s.error, None);
    }

    #[tokio::test]
    async fn new_reply_appears_first_among_siblings() {
        let session = demo_session();
        session.load().await;

        assert!(session.create_comment("me too!", Some(cid("demo-comment-1"))).await);

        // 前插 + 稳定分组 ⇒ 新回复排在旧回复前面
        let replies = session.replies_of(&cid("demo-comment-1"));
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].message.as_deref(), Some("me too!"));
        assert_eq!(replies[1].id.as_str(), "demo-comment-2");
        assert_eq!(session.comments().len(), 3);
    }

    #[tokio::test]
    async fn blank_message_fails_locally_without_remote_call() {
        let session = demo_session();
        session.load().await;
        let before = session.comments();

        assert!(!session.create_comment("   ", None).await);

        assert_eq!(session.comments(), before);
        assert_eq!(
            session.status(ActionKind::Create).error.as_deref(),
            Some("message is required")
        );
    }

    #[tokio::test]
    async fn like_toggle_round_trip() {
        let session = demo_session();
        session.load().await;

        // 种子数据：demo-comment-1 有 3 个赞，viewer 未赞
        assert!(session.toggle_like(cid("demo-comment-1")).await);
        let liked = &session.root_comments()[0];
        assert_eq!(liked.like_count, 4);
        assert!(liked.liked_by_me);

        assert!(session.toggle_like(cid("demo-comment-1")).await);
        let unliked = &session.root_comments()[0];
        assert_eq!(unliked.like_count, 3);
        assert!(!unliked.liked_by_me);
    }

    #[tokio::test]
    async fn delete_keeps_replies_reachable() {
        let session = demo_session();
        session.load().await;

        assert!(session.create_comment("parent", None).await);
        let parent_id = session.root_comments()[0].id.clone();
        assert!(session.create_comment("child", Some(parent_id.clone())).await);

        assert!(session.delete_comment(parent_id.clone()).await);

        let roots = session.root_comments();
        let deleted = roots.iter().find(|c| c.id == parent_id).unwrap();
        assert!(deleted.is_deleted());
        assert_eq!(deleted.like_count, 0);

        let replies = session.replies_of(&parent_id);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].message.as_deref(), Some("child"));
    }

    #[tokio::test]
    async fn remote_failure_lands_on_its_own_action_kind() {
        let session = demo_session();
        session.load().await;
        let before = session.comments();

        // demo-comment-1 属于 demo-john，viewer 无权编辑
        assert!(!session.update_comment(cid("demo-comment-1"), "hijack").await);

        assert_eq!(session.comments(), before);
        assert_eq!(
            session.status(ActionKind::Update).error.as_deref(),
            Some("You can only edit your own comments")
        );
        // 其他动作的状态不受影响
        assert_eq!(session.status(ActionKind::Create).error, None);
        assert_eq!(session.status(ActionKind::Delete).error, None);
    }

    #[tokio::test]
    async fn closed_session_discards_late_results() {
        let session = demo_session();
        session.load().await;
        let before = session.comments();

        session.close();
        assert!(!session.create_comment("too late", None).await);
        assert_eq!(session.comments(), before);
    }

    #[tokio::test]
    async fn sessions_are_per_post_handles() {
        // 两个会话各自拥有独立状态，互不共享
        let a = demo_session();
        let b = demo_session();
        a.load().await;
        b.load().await;

        a.create_comment("only in a", None).await;
        assert_eq!(a.comments().len(), 3);
        assert_eq!(b.comments().len(), 2);

        // 同一会话的 Clone 句柄共享状态
        let a2 = a.clone();
        assert_eq!(a2.comments().len(), 3);
    }
}
