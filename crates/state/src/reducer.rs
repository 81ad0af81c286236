use domain::{Comment, CommentMutation};

/// 把一次变更意图落到扁平集合上。
///
/// 只在远端写成功之后调用 (乐观确认模型，不整页重拉)。
/// 四个分支都是全函数：输入类型正确就不会失败；
/// 目标 id 不在集合里时 Update / Delete / ToggleLike 静默跳过。
pub fn apply(comments: &mut Vec<Comment>, mutation: CommentMutation) {
    match mutation {
        // 新评论前插，分组后在兄弟节点里排最前
        CommentMutation::Create { comment } => {
            comments.insert(0, comment);
        }
        CommentMutation::Update { id, comment } | CommentMutation::Delete { id, comment } => {
            if let Some(slot) = comments.iter_mut().find(|c| c.id == id) {
                *slot = comment;
            }
        }
        CommentMutation::ToggleLike { id, add_like } => {
            if let Some(slot) = comments.iter_mut().find(|c| c.id == id) {
                slot.liked_by_me = add_like;
                slot.like_count = if add_like {
                    slot.like_count + 1
                } else {
                    // 下界为 0，不会变负
                    slot.like_count.saturating_sub(1)
                };
            }
        }
    }
}
