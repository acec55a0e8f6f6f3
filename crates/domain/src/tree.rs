//! Two-level comment tree: root comments, each owning its replies.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::models::{CommentId, CommentRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentTreeNode {
    #[serde(flatten)]
    pub record: CommentRecord,
    pub replies: Vec<CommentTreeNode>,
}

impl CommentTreeNode {
    fn leaf(record: CommentRecord) -> Self {
        Self {
            record,
            replies: Vec::new(),
        }
    }

    pub fn id(&self) -> CommentId {
        self.record.id
    }
}

/// Builds the tree from the accumulated flat record list.
///
/// Roots keep their order of first appearance, and so do replies under each root. A
/// reply is attached when its parent is a root anywhere in `records`, even one that
/// appears later. Replies whose parent is missing, or is itself a reply, are left out.
/// Repeated ids keep the first occurrence.
pub fn assemble(records: &[CommentRecord]) -> Vec<CommentTreeNode> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut roots = Vec::new();
    let mut root_index: HashMap<CommentId, usize> = HashMap::new();

    for record in records.iter().filter(|r| r.is_root()) {
        if !seen.insert(record.id) {
            continue;
        }
        root_index.insert(record.id, roots.len());
        roots.push(CommentTreeNode::leaf(record.clone()));
    }

    for record in records {
        let Some(parent_id) = record.parent_id else {
            continue;
        };
        if !seen.insert(record.id) {
            continue;
        }
        match root_index.get(&parent_id) {
            Some(&idx) => roots[idx]
                .replies
                .push(CommentTreeNode::leaf(record.clone())),
            None => debug!(
                "Dropping reply {} (parent {} not loaded as a root)",
                record.id, parent_id
            ),
        }
    }

    roots
}

/// Number of comments that made it into the tree, roots and replies.
pub fn node_count(tree: &[CommentTreeNode]) -> usize {
    tree.iter().map(|n| 1 + n.replies.len()).sum()
}
