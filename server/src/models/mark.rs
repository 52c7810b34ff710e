use serde::{Deserialize, Serialize};

/// Whether a mark is a like or a dislike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Like,
    Dislike,
}

impl MarkKind {
    pub fn is_like(self) -> bool {
        matches!(self, MarkKind::Like)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarksCount {
    pub likes: i64,
    pub dislikes: i64,
}
