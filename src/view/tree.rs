use std::collections::HashSet;

use crate::note::FileNode;

/// A flattened representation of a note tree node for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatItem {
    pub id: String,
    pub name: String,
    pub is_dir: bool,
    pub depth: usize,
    pub is_expanded: bool,
    pub is_last_sibling: bool,
    /// Id of the enclosing directory, `None` at root level.
    pub parent_id: Option<String>,
}

/// Cursor and expansion state for the tree panel.
///
/// Directories start expanded; only collapsed ids are tracked, so folders
/// created or uploaded into during a session show their contents at once.
#[derive(Debug, Clone, Default)]
pub struct TreeView {
    pub flat_items: Vec<FlatItem>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    collapsed: HashSet<String>,
}

impl TreeView {
    pub fn new(files: &[FileNode]) -> Self {
        let mut view = Self::default();
        view.flatten(files);
        view
    }

    /// Rebuild the flat list from the working tree.
    ///
    /// The cursor follows the node it was on when that node is still
    /// visible, otherwise it is clamped into range.
    pub fn flatten(&mut self, files: &[FileNode]) {
        let current = self.selected_id().map(str::to_string);
        self.collapsed.retain(|id| crate::note::contains_id(files, id));
        self.flat_items.clear();
        Self::flatten_level(files, 0, None, &self.collapsed, &mut self.flat_items);

        if let Some(idx) = current.as_deref().and_then(|id| self.find_index_by_id(id)) {
            self.selected_index = idx;
        } else if self.selected_index >= self.flat_items.len() {
            self.selected_index = self.flat_items.len().saturating_sub(1);
        }
    }

    fn flatten_level(
        nodes: &[FileNode],
        depth: usize,
        parent_id: Option<&str>,
        collapsed: &HashSet<String>,
        items: &mut Vec<FlatItem>,
    ) {
        for (i, node) in nodes.iter().enumerate() {
            let is_expanded = node.is_dir() && !collapsed.contains(node.id());
            items.push(FlatItem {
                id: node.id().to_string(),
                name: node.name().to_string(),
                is_dir: node.is_dir(),
                depth,
                is_expanded,
                is_last_sibling: i == nodes.len() - 1,
                parent_id: parent_id.map(str::to_string),
            });
            if is_expanded {
                Self::flatten_level(node.children(), depth + 1, Some(node.id()), collapsed, items);
            }
        }
    }

    pub fn selected_item(&self) -> Option<&FlatItem> {
        self.flat_items.get(self.selected_index)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_item().map(|item| item.id.as_str())
    }

    /// Directory that new children should go into for the item under the
    /// cursor: the item itself when it is a directory, otherwise its parent.
    pub fn target_dir(&self) -> Option<&str> {
        let item = self.selected_item()?;
        if item.is_dir {
            Some(item.id.as_str())
        } else {
            item.parent_id.as_deref()
        }
    }

    pub fn find_index_by_id(&self, id: &str) -> Option<usize> {
        self.flat_items.iter().position(|item| item.id == id)
    }

    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.flat_items.len() {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.flat_items.len().saturating_sub(1);
    }

    /// Move the cursor onto `id`, expanding its ancestors if needed.
    pub fn reveal(&mut self, files: &[FileNode], id: &str) {
        let mut path = Vec::new();
        if Self::ancestors_of(files, id, &mut path) {
            for ancestor in path {
                self.collapsed.remove(&ancestor);
            }
            self.flatten(files);
            if let Some(idx) = self.find_index_by_id(id) {
                self.selected_index = idx;
            }
        }
    }

    fn ancestors_of(nodes: &[FileNode], id: &str, path: &mut Vec<String>) -> bool {
        for node in nodes {
            if node.id() == id {
                return true;
            }
            if node.is_dir() {
                path.push(node.id().to_string());
                if Self::ancestors_of(node.children(), id, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    /// Expand the directory under the cursor. Returns false if the cursor
    /// is not on a collapsed directory.
    pub fn expand_selected(&mut self, files: &[FileNode]) -> bool {
        let Some(item) = self.selected_item() else {
            return false;
        };
        if !item.is_dir || item.is_expanded {
            return false;
        }
        let id = item.id.clone();
        self.collapsed.remove(&id);
        self.flatten(files);
        true
    }

    /// Collapse the directory under the cursor, or jump to the parent.
    pub fn collapse_selected(&mut self, files: &[FileNode]) {
        let Some(item) = self.selected_item() else {
            return;
        };

        if item.is_dir && item.is_expanded {
            let id = item.id.clone();
            self.collapsed.insert(id);
            self.flatten(files);
            return;
        }

        if let Some(parent) = item.parent_id.clone() {
            if let Some(idx) = self.find_index_by_id(&parent) {
                self.selected_index = idx;
            }
        }
    }

    /// Update the scroll offset to ensure the selected item is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }
}
