use std::sync::Arc;

use crate::models::post::Post;

pub fn find_node<'a>(nodes: &'a [Arc<Post>], id: &str) -> Option<&'a Arc<Post>> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.replies, id) {
            return Some(found);
        }
    }
    None
}

/// Finds the node whose direct replies contain `id`. Roots have no parent.
pub fn find_parent<'a>(nodes: &'a [Arc<Post>], id: &str) -> Option<&'a Arc<Post>> {
    for node in nodes {
        if node.replies.iter().any(|reply| reply.id == id) {
            return Some(node);
        }
        if let Some(found) = find_parent(&node.replies, id) {
            return Some(found);
        }
    }
    None
}

/// Root-to-target chain of nodes, ending with the target itself.
pub fn path_to<'a>(nodes: &'a [Arc<Post>], id: &str) -> Option<Vec<&'a Arc<Post>>> {
    let mut path = Vec::new();
    if collect_path(nodes, id, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn collect_path<'a>(nodes: &'a [Arc<Post>], id: &str, path: &mut Vec<&'a Arc<Post>>) -> bool {
    for node in nodes {
        path.push(node);
        if node.id == id || collect_path(&node.replies, id, path) {
            return true;
        }
        path.pop();
    }
    false
}

pub fn contains(nodes: &[Arc<Post>], id: &str) -> bool {
    find_node(nodes, id).is_some()
}
