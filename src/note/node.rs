use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A file entry: a leaf carrying an opaque text payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    pub updated_at: DateTime<Utc>,
    /// Text payload handed to the renderer. Absent until populated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Byte count, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// A directory entry. Children are kept in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub id: String,
    pub name: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub children: Vec<FileNode>,
}

/// A node in a note's file tree.
///
/// Ids are unique across the whole tree; every operation addresses nodes by
/// id alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileNode {
    File(FileEntry),
    Directory(DirectoryEntry),
}

impl FileNode {
    /// Build a file node stamped with the current time.
    pub fn file(id: impl Into<String>, name: impl Into<String>) -> Self {
        FileNode::File(FileEntry {
            id: id.into(),
            name: name.into(),
            updated_at: Utc::now(),
            content: None,
            size: None,
        })
    }

    /// Build an empty directory node stamped with the current time.
    pub fn directory(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::directory_with(id, name, Vec::new())
    }

    /// Build a directory node holding the given children.
    pub fn directory_with(
        id: impl Into<String>,
        name: impl Into<String>,
        children: Vec<FileNode>,
    ) -> Self {
        FileNode::Directory(DirectoryEntry {
            id: id.into(),
            name: name.into(),
            updated_at: Utc::now(),
            children,
        })
    }

    pub fn id(&self) -> &str {
        match self {
            FileNode::File(f) => &f.id,
            FileNode::Directory(d) => &d.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FileNode::File(f) => &f.name,
            FileNode::Directory(d) => &d.name,
        }
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        match self {
            FileNode::File(f) => f.updated_at,
            FileNode::Directory(d) => d.updated_at,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FileNode::File(_))
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, FileNode::Directory(_))
    }

    /// Children of a directory; files have none.
    pub fn children(&self) -> &[FileNode] {
        match self {
            FileNode::File(_) => &[],
            FileNode::Directory(d) => &d.children,
        }
    }

    /// Text payload of a file node.
    pub fn content(&self) -> Option<&str> {
        match self {
            FileNode::File(f) => f.content.as_deref(),
            FileNode::Directory(_) => None,
        }
    }
}

/// Who can see a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

impl Visibility {
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Public => Visibility::Private,
            Visibility::Private => Visibility::Public,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Visibility::Public => "Public",
            Visibility::Private => "Private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A study note: the aggregate root owning the file tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub author_id: String,
    #[serde(default)]
    pub files: Vec<FileNode>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub dislike_count: u64,
    #[serde(default)]
    pub view_count: u64,
    /// Mean star rating over `rating_count` votes.
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub rating_count: u64,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Create an empty note owned by `author_id`.
    pub fn new(
        title: impl Into<String>,
        author_id: impl Into<String>,
        visibility: Visibility,
    ) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            author_id: author_id.into(),
            files: Vec::new(),
            visibility,
            like_count: 0,
            dislike_count: 0,
            view_count: 0,
            rating: 0.0,
            rating_count: 0,
            updated_at: Utc::now(),
        }
    }
}

/// Generate a fresh node or note id: 128 random bits as 32 hex digits.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Find a node by id anywhere in the tree.
pub fn find_node<'a>(files: &'a [FileNode], id: &str) -> Option<&'a FileNode> {
    for node in files {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = find_node(node.children(), id) {
            return Some(found);
        }
    }
    None
}

/// Whether any node in the tree carries `id`.
pub fn contains_id(files: &[FileNode], id: &str) -> bool {
    find_node(files, id).is_some()
}

/// Total number of nodes at every depth.
pub fn count_nodes(files: &[FileNode]) -> usize {
    files
        .iter()
        .map(|node| 1 + count_nodes(node.children()))
        .sum()
}

/// Number of `File` nodes at every depth.
pub fn count_files(files: &[FileNode]) -> usize {
    files
        .iter()
        .map(|node| match node {
            FileNode::File(_) => 1,
            FileNode::Directory(d) => count_files(&d.children),
        })
        .sum()
}
