use tokio::sync::Mutex;

use crate::domain::{AddResult, Item, ListView, RemoveResult, SegmentOutcome, ShoppingList};

#[derive(Debug, Default)]
struct StoreState {
    list: ShoppingList,
    /// Copy of `list` taken right before the last add/remove/clear.
    history: Option<ShoppingList>,
}

impl StoreState {
    fn remember(&mut self) {
        self.history = Some(self.list.clone());
    }
}

/// Single owner of the shopping list and its one-level undo snapshot.
///
/// Every operation holds the same lock for its whole read-modify-write, so
/// concurrent callers never lose updates or observe a half-applied command.
#[derive(Debug, Default)]
pub struct ListStore {
    state: Mutex<StoreState>,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a restored list. Undo history always starts out empty.
    pub fn with_list(list: ShoppingList) -> Self {
        Self {
            state: Mutex::new(StoreState {
                list,
                history: None,
            }),
        }
    }

    /// Append every non-blank comma-separated segment of `raw`.
    ///
    /// The undo snapshot is taken even when nothing ends up being added.
    pub async fn add(&self, raw: &str) -> AddResult {
        let mut st = self.state.lock().await;
        st.remember();

        let segments: Vec<SegmentOutcome> = raw
            .split(',')
            .map(|segment| match Item::normalize(segment) {
                Some(item) => SegmentOutcome::Added(item),
                None => SegmentOutcome::Empty,
            })
            .collect();

        let mut added = 0usize;
        for segment in &segments {
            if let SegmentOutcome::Added(item) = segment {
                st.list.push(item.clone());
                added += 1;
            }
        }

        if added == 0 {
            return AddResult::NoItemsSpecified;
        }
        tracing::debug!(added, total = st.list.len(), "items added");
        AddResult::Added(segments)
    }

    /// Remove the first item containing `raw` (trimmed, case-insensitive).
    pub async fn remove(&self, raw: &str) -> RemoveResult {
        let mut st = self.state.lock().await;
        st.remember();

        let query = raw.trim();
        if query.is_empty() {
            return RemoveResult::NoItemSpecified;
        }

        match st.list.remove_first_match(query) {
            Some(item) => {
                tracing::debug!(item = %item, total = st.list.len(), "item removed");
                RemoveResult::Removed(item)
            }
            None => RemoveResult::NotFound,
        }
    }

    pub async fn clear(&self) {
        let mut st = self.state.lock().await;
        st.remember();
        st.list = ShoppingList::new();
        tracing::debug!("list cleared");
    }

    /// Put back the snapshot taken before the last mutation.
    ///
    /// Undo does not take a snapshot of its own, so repeating it re-applies the
    /// same state. With no snapshot yet the list is left as is.
    pub async fn undo(&self) -> ListView {
        let mut st = self.state.lock().await;
        if let Some(prev) = st.history.clone() {
            st.list = prev;
            tracing::debug!(total = st.list.len(), "list restored from undo snapshot");
        }
        st.list.view()
    }

    pub async fn show(&self) -> ListView {
        self.state.lock().await.list.view()
    }

    /// Clone of the live list, for persistence.
    pub async fn current(&self) -> ShoppingList {
        self.state.lock().await.list.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.list.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.list.is_empty()
    }
}
