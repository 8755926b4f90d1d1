use crate::dependency_tree::domain::DependencyNode;
use serde::Serialize;

/// The merged tree of every scanned project.
///
/// A single project is shown without a wrapper; as soon as a second project
/// arrives, the project roots are grouped under an anonymous wrapper node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "root", rename_all = "camelCase")]
pub enum CompositeTree {
    #[default]
    Empty,
    Single(DependencyNode),
    /// Anonymous wrapper holding at least two project roots.
    Multiple(DependencyNode),
}

impl CompositeTree {
    /// Merges the filtered tree of one project.
    ///
    /// A tree with the same root identity as an already merged project
    /// replaces it; otherwise the tree is added next to the existing ones.
    pub fn append_project(&mut self, filtered_root: DependencyNode) {
        let current = std::mem::take(self);
        *self = match current {
            CompositeTree::Empty => CompositeTree::Single(filtered_root),
            CompositeTree::Single(existing) if are_root_nodes_equal(&existing, &filtered_root) => {
                CompositeTree::Single(filtered_root)
            }
            CompositeTree::Single(existing) => {
                let mut wrapper = DependencyNode::wrapper();
                wrapper.children_mut().push(existing);
                wrapper.children_mut().push(filtered_root);
                CompositeTree::Multiple(wrapper)
            }
            CompositeTree::Multiple(mut wrapper) => {
                let children = wrapper.children_mut();
                children.retain(|child| !are_root_nodes_equal(child, &filtered_root));
                children.push(filtered_root);
                CompositeTree::Multiple(wrapper)
            }
        };
    }

    /// Removes the project whose root identity matches `root`.
    ///
    /// Returns `true` when a project was removed. A wrapper left with one
    /// project collapses back to that project's root.
    pub fn remove_project(&mut self, root: &DependencyNode) -> bool {
        let current = std::mem::take(self);
        let (next, removed) = match current {
            CompositeTree::Single(existing) if are_root_nodes_equal(&existing, root) => {
                (CompositeTree::Empty, true)
            }
            CompositeTree::Multiple(mut wrapper) => {
                let children = wrapper.children_mut();
                let before = children.len();
                children.retain(|child| !are_root_nodes_equal(child, root));
                let removed = children.len() != before;
                let next = match children.len() {
                    0 => CompositeTree::Empty,
                    1 => CompositeTree::Single(children.remove(0)),
                    _ => CompositeTree::Multiple(wrapper),
                };
                (next, removed)
            }
            other => (other, false),
        };
        *self = next;
        removed
    }

    pub fn root(&self) -> Option<&DependencyNode> {
        match self {
            CompositeTree::Empty => None,
            CompositeTree::Single(root) | CompositeTree::Multiple(root) => Some(root),
        }
    }

    /// Project roots in merge order.
    pub fn projects(&self) -> Vec<&DependencyNode> {
        match self {
            CompositeTree::Empty => Vec::new(),
            CompositeTree::Single(root) => vec![root],
            CompositeTree::Multiple(wrapper) => wrapper.children().iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CompositeTree::Empty)
    }
}

/// Whether two trees are roots of the same project.
///
/// Both must carry general info, or both lack it; when present, the
/// component id and path must match. Issues and children are ignored.
pub fn are_root_nodes_equal(a: &DependencyNode, b: &DependencyNode) -> bool {
    match (a.general_info(), b.general_info()) {
        (Some(left), Some(right)) => {
            left.component_id() == right.component_id() && left.path() == right.path()
        }
        (None, None) => true,
        _ => false,
    }
}
