use super::node::{find_node, FileNode};

/// First `File` in pre-order, depth-first, children in array order.
pub fn find_first_file(files: &[FileNode]) -> Option<&FileNode> {
    for node in files {
        match node {
            FileNode::File(_) => return Some(node),
            FileNode::Directory(dir) => {
                if let Some(found) = find_first_file(&dir.children) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// The file currently shown in the content panel, tracked by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<String>,
}

impl Selection {
    /// Start with the first viewable file of `files` selected.
    pub fn first_in(files: &[FileNode]) -> Self {
        Self {
            selected: find_first_file(files).map(|n| n.id().to_string()),
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Resolve the selected id against `files`.
    pub fn resolve<'a>(&self, files: &'a [FileNode]) -> Option<&'a FileNode> {
        self.selected.as_deref().and_then(|id| find_node(files, id))
    }

    /// Select a file by id. Directories and unknown ids are rejected and the
    /// current selection is kept. Returns whether the selection changed.
    pub fn select(&mut self, files: &[FileNode], id: &str) -> bool {
        match find_node(files, id) {
            Some(node) if node.is_file() => {
                let changed = self.selected.as_deref() != Some(id);
                self.selected = Some(id.to_string());
                changed
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// After a structural change, fall back to the first viewable file if
    /// the selected node no longer exists. Returns whether the selection
    /// changed.
    pub fn reconcile(&mut self, files: &[FileNode]) -> bool {
        if let Some(node) = self.resolve(files) {
            if node.is_file() {
                return false;
            }
        }
        let before = self.selected.take();
        match find_first_file(files) {
            Some(first) => self.selected = Some(first.id().to_string()),
            None => self.clear(),
        }
        before != self.selected
    }
}
