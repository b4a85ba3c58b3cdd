use serde::{Deserialize, Serialize};

/// Conversation a reply is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// A single normalized shopping list entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(String);

impl Item {
    /// Trim and title-case raw user text. Returns `None` for blank input.
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(title_case(trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match used by `/remove`.
    pub fn contains_ignore_case(&self, needle_lower: &str) -> bool {
        self.0.to_lowercase().contains(needle_lower)
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upper-case a letter when the previous char is not alphabetic, lower-case it otherwise.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Ordered, non-unique list of items. Insertion order is display order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShoppingList(Vec<Item>);

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, item: Item) {
        self.0.push(item);
    }

    /// Remove the first item (list order) whose text contains `query`, ignoring case.
    pub fn remove_first_match(&mut self, query: &str) -> Option<Item> {
        let needle = query.to_lowercase();
        let idx = self.0.iter().position(|it| it.contains_ignore_case(&needle))?;
        Some(self.0.remove(idx))
    }

    pub fn view(&self) -> ListView {
        if self.0.is_empty() {
            ListView::Empty
        } else {
            ListView::Items(self.0.clone())
        }
    }
}

impl From<Vec<Item>> for ShoppingList {
    fn from(items: Vec<Item>) -> Self {
        Self(items)
    }
}

/// Read-only view returned to callers; an empty list is its own variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListView {
    Empty,
    Items(Vec<Item>),
}

/// Per-segment outcome of `/add`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentOutcome {
    Added(Item),
    /// The segment between two commas was blank.
    Empty,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddResult {
    Added(Vec<SegmentOutcome>),
    NoItemsSpecified,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoveResult {
    Removed(Item),
    NotFound,
    NoItemSpecified,
}
