//! Structural edits on a note's file tree.
//!
//! Every operation takes the current tree by reference and returns a freshly
//! built tree. The input is never mutated, so a snapshot taken before the
//! edit stays valid as a rollback target. Addressing a missing id, or a file
//! where a directory is required, yields a tree equal to the input.

use chrono::Utc;

use super::node::{generate_id, DirectoryEntry, FileEntry, FileNode};

/// Body given to freshly uploaded files until their content is processed.
pub const UPLOAD_PLACEHOLDER: &str =
    "# Uploaded File\n\nThis file was just uploaded and its content will be processed.";

/// A file chosen for upload: its display name and byte size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadItem {
    pub name: String,
    pub size: u64,
}

impl UploadItem {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Remove the node with `target` (and its whole subtree) wherever it occurs.
pub fn delete_node(files: &[FileNode], target: &str) -> Vec<FileNode> {
    files
        .iter()
        .filter(|node| node.id() != target)
        .map(|node| match node {
            FileNode::Directory(dir) => FileNode::Directory(DirectoryEntry {
                id: dir.id.clone(),
                name: dir.name.clone(),
                updated_at: dir.updated_at,
                children: delete_node(&dir.children, target),
            }),
            file => file.clone(),
        })
        .collect()
}

/// Append a new empty folder to the root (`parent == None`) or to the
/// children of the directory with id `parent`.
///
/// The name is stored as given; callers trim and reject empty names.
pub fn create_folder(files: &[FileNode], parent: Option<&str>, name: &str) -> Vec<FileNode> {
    let folder = FileNode::Directory(DirectoryEntry {
        id: generate_id(),
        name: name.to_string(),
        updated_at: Utc::now(),
        children: Vec::new(),
    });
    append_to(files, parent, std::slice::from_ref(&folder))
}

/// Append one file per item, in item order, to the root or to the directory
/// with id `parent`.
pub fn upload_files(
    files: &[FileNode],
    parent: Option<&str>,
    items: &[UploadItem],
) -> Vec<FileNode> {
    if items.is_empty() {
        return files.to_vec();
    }
    let now = Utc::now();
    let new_files: Vec<FileNode> = items
        .iter()
        .map(|item| {
            FileNode::File(FileEntry {
                id: generate_id(),
                name: item.name.clone(),
                updated_at: now,
                content: Some(UPLOAD_PLACEHOLDER.to_string()),
                size: Some(item.size),
            })
        })
        .collect();
    append_to(files, parent, &new_files)
}

/// Set the name of the node with `target` and refresh its timestamp.
///
/// Sibling names are not required to be unique.
pub fn rename_node(files: &[FileNode], target: &str, new_name: &str) -> Vec<FileNode> {
    files
        .iter()
        .map(|node| match node {
            FileNode::File(file) if file.id == target => FileNode::File(FileEntry {
                name: new_name.to_string(),
                updated_at: Utc::now(),
                ..file.clone()
            }),
            FileNode::Directory(dir) if dir.id == target => FileNode::Directory(DirectoryEntry {
                id: dir.id.clone(),
                name: new_name.to_string(),
                updated_at: Utc::now(),
                children: dir.children.clone(),
            }),
            FileNode::Directory(dir) => FileNode::Directory(DirectoryEntry {
                id: dir.id.clone(),
                name: dir.name.clone(),
                updated_at: dir.updated_at,
                children: rename_node(&dir.children, target, new_name),
            }),
            file => file.clone(),
        })
        .collect()
}

fn append_to(files: &[FileNode], parent: Option<&str>, new_nodes: &[FileNode]) -> Vec<FileNode> {
    match parent {
        None => {
            let mut out = files.to_vec();
            out.extend_from_slice(new_nodes);
            out
        }
        Some(parent_id) => append_under(files, parent_id, new_nodes),
    }
}

fn append_under(files: &[FileNode], parent_id: &str, new_nodes: &[FileNode]) -> Vec<FileNode> {
    files
        .iter()
        .map(|node| match node {
            FileNode::Directory(dir) => {
                let children = if dir.id == parent_id {
                    let mut children = dir.children.clone();
                    children.extend_from_slice(new_nodes);
                    children
                } else {
                    append_under(&dir.children, parent_id, new_nodes)
                };
                FileNode::Directory(DirectoryEntry {
                    id: dir.id.clone(),
                    name: dir.name.clone(),
                    updated_at: dir.updated_at,
                    children,
                })
            }
            file => file.clone(),
        })
        .collect()
}
