//! Keyboard highlight over the filtered result list

/// Highlighted row of a list of `item_count` results.
///
/// `highlighted` is `None` when no row is highlighted and always indexes a row
/// of the list otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    highlighted: Option<usize>,
    item_count: usize,
}

impl SelectionState {
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Highlighted index, `-1` when nothing is highlighted
    pub fn highlighted_index(&self) -> i64 {
        self.highlighted.map_or(-1, |index| index as i64)
    }

    pub fn is_highlighted(&self, index: usize) -> bool {
        self.highlighted == Some(index)
    }

    /// A new list replaced the old one; nothing stays highlighted
    pub fn list_replaced(&mut self, item_count: usize) {
        self.highlighted = None;
        self.item_count = item_count;
    }

    pub fn move_down(&mut self) {
        if self.item_count == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            None => 0,
            Some(index) => (index + 1).min(self.item_count - 1),
        });
    }

    pub fn move_up(&mut self) {
        self.highlighted = match self.highlighted {
            None | Some(0) => None,
            Some(index) => Some(index - 1),
        };
    }

    /// Highlight `index` if it is a row of the list
    pub fn highlight(&mut self, index: usize) -> bool {
        if index < self.item_count {
            self.highlighted = Some(index);
            true
        } else {
            false
        }
    }

    /// Index to commit, if a row is highlighted
    pub fn commit(&self) -> Option<usize> {
        self.highlighted.filter(|index| *index < self.item_count)
    }
}
