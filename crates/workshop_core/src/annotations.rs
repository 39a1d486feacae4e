//! User-scoped annotations: checklist items and starred tips.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarredTip {
    pub id: String,
    pub text: String,
    pub section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotations {
    checklist: Vec<ChecklistItem>,
    starred_tips: Vec<StarredTip>,
}

impl Annotations {
    pub fn new(checklist: Vec<ChecklistItem>, starred_tips: Vec<StarredTip>) -> Self {
        let mut annotations = Self::default();
        annotations.merge_checklist(checklist);
        for tip in starred_tips {
            annotations.star(tip);
        }
        annotations
    }

    pub fn checklist(&self) -> &[ChecklistItem] {
        &self.checklist
    }

    pub fn starred_tips(&self) -> &[StarredTip] {
        &self.starred_tips
    }

    /// Adds a tip unless one with the same id is already starred.
    /// Returns whether the tip was added.
    pub fn star(&mut self, tip: StarredTip) -> bool {
        if self.starred_tips.iter().any(|existing| existing.id == tip.id) {
            return false;
        }
        self.starred_tips.push(tip);
        true
    }

    pub fn unstar(&mut self, id: &str) -> bool {
        let before = self.starred_tips.len();
        self.starred_tips.retain(|tip| tip.id != id);
        before != self.starred_tips.len()
    }

    /// Merges server items by id. Known items keep their local `done` flag
    /// when it is set, new items are appended in server order.
    pub fn merge_checklist(&mut self, items: Vec<ChecklistItem>) -> bool {
        let mut changed = false;
        for item in items {
            match self.checklist.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => {
                    let merged = ChecklistItem {
                        done: existing.done || item.done,
                        ..item
                    };
                    if *existing != merged {
                        *existing = merged;
                        changed = true;
                    }
                }
                None => {
                    self.checklist.push(item);
                    changed = true;
                }
            }
        }
        changed
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        match self.checklist.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.done = !item.done;
                true
            }
            None => false,
        }
    }
}
