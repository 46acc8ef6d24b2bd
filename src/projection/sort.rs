use serde::{Deserialize, Serialize};

use crate::core::Item;

/// View ordering for `project`
///
/// Every variant uses a stable sort, so ties keep their prior relative
/// order. That is the documented tie-break for `MostLiked`; `PinnedFirst`
/// additionally orders newest-first within the pinned and unpinned groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    MostLiked,
    PinnedFirst,
}

impl SortOrder {
    pub fn apply(&self, items: &mut [Item]) {
        match self {
            SortOrder::Newest => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => items.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortOrder::MostLiked => items.sort_by(|a, b| b.like_count().cmp(&a.like_count())),
            SortOrder::PinnedFirst => items.sort_by(|a, b| {
                b.pinned
                    .cmp(&a.pinned)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::MostLiked => "most_liked",
            SortOrder::PinnedFirst => "pinned_first",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
