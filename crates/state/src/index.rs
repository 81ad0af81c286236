use domain::{Comment, CommentId};
use std::collections::HashMap;

/// 扁平集合上的 parent → children 分组索引。
///
/// 纯函数式：它不持有独立可变状态，集合每次变更后整体重建。
/// 分组是稳定的：组内保持输入的相对顺序，不按时间重排。
#[derive(Debug, Default)]
pub struct CommentTreeIndex {
    groups: HashMap<Option<CommentId>, Vec<Comment>>,
}

impl CommentTreeIndex {
    pub fn build(comments: &[Comment]) -> Self {
        let mut groups: HashMap<Option<CommentId>, Vec<Comment>> = HashMap::new();
        for comment in comments {
            groups
                .entry(comment.parent_id.clone())
                .or_default()
                .push(comment.clone());
        }
        Self { groups }
    }

    /// 根评论 (parent 为空)。没有时返回空切片，不报错。
    pub fn roots(&self) -> &[Comment] {
        self.groups.get(&None).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `parent_id` 的直接回复。没有回复时返回空切片，永不为 None。
    pub fn replies(&self, parent_id: &CommentId) -> &[Comment] {
        self.groups
            .get(&Some(parent_id.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
