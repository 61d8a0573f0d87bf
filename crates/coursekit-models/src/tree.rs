//! In-memory parent map used to check page hierarchies before writing them.

use std::collections::HashMap;
use std::fmt;

use crate::ids::PageId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    UnknownPage(PageId),
    UnknownParent { page: PageId, parent: PageId },
    SelfParent(PageId),
    Cycle(PageId),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPage(id) => write!(f, "Page {} does not belong to this course", id),
            Self::UnknownParent { page, parent } => {
                write!(f, "Parent {} of page {} does not belong to this course", parent, page)
            }
            Self::SelfParent(id) => write!(f, "Page {} cannot be its own parent", id),
            Self::Cycle(id) => write!(f, "Page {} would become its own ancestor", id),
        }
    }
}

impl std::error::Error for TreeError {}

/// Child to parent edges for every page of one course.
#[derive(Debug, Clone, Default)]
pub struct PageTree {
    parents: HashMap<PageId, Option<PageId>>,
}

impl PageTree {
    pub fn from_edges(edges: impl IntoIterator<Item = (PageId, Option<PageId>)>) -> Self {
        Self {
            parents: edges.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.parents.contains_key(&id)
    }

    pub fn parent_of(&self, id: PageId) -> Option<PageId> {
        self.parents.get(&id).copied().flatten()
    }

    /// Moves `id` under `parent` (`None` for the root level).
    pub fn reassign(&mut self, id: PageId, parent: Option<PageId>) -> Result<(), TreeError> {
        let Some(slot) = self.parents.get_mut(&id) else {
            return Err(TreeError::UnknownPage(id));
        };
        *slot = parent;
        Ok(())
    }

    /// Checks that every parent exists in the tree and no page is its own
    /// ancestor.
    pub fn validate(&self) -> Result<(), TreeError> {
        for (&page, &parent) in &self.parents {
            let Some(parent) = parent else { continue };
            if parent == page {
                return Err(TreeError::SelfParent(page));
            }
            if !self.contains(parent) {
                return Err(TreeError::UnknownParent { page, parent });
            }
        }

        for &page in self.parents.keys() {
            self.check_ancestors(page)?;
        }

        Ok(())
    }

    // A walk longer than the node count must have revisited a node.
    fn check_ancestors(&self, page: PageId) -> Result<(), TreeError> {
        let mut current = self.parent_of(page);
        let mut steps = 0;

        while let Some(id) = current {
            if id == page || steps > self.parents.len() {
                return Err(TreeError::Cycle(page));
            }
            steps += 1;
            current = self.parent_of(id);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_flat_trees_are_valid() {
        assert!(PageTree::default().validate().is_ok());

        let tree = PageTree::from_edges((0..5).map(|_| (PageId::new(), None)));
        assert_eq!(tree.len(), 5);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_deep_chain_is_valid() {
        let ids: Vec<PageId> = (0..50).map(|_| PageId::new()).collect();
        let edges = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, if i == 0 { None } else { Some(ids[i - 1]) }));
        let tree = PageTree::from_edges(edges);

        assert!(tree.validate().is_ok());
        assert_eq!(tree.parent_of(ids[49]), Some(ids[48]));
    }

    #[test]
    fn test_self_parent() {
        let a = PageId::new();
        let tree = PageTree::from_edges([(a, Some(a))]);
        assert_eq!(tree.validate(), Err(TreeError::SelfParent(a)));
    }

    #[test]
    fn test_two_node_cycle_after_reassign() {
        let (a, b) = (PageId::new(), PageId::new());
        let mut tree = PageTree::from_edges([(a, None), (b, Some(a))]);
        assert!(tree.validate().is_ok());

        tree.reassign(a, Some(b)).unwrap();
        assert!(matches!(tree.validate(), Err(TreeError::Cycle(_))));
    }

    #[test]
    fn test_cycle_not_through_every_node() {
        let (root, a, b, c) = (PageId::new(), PageId::new(), PageId::new(), PageId::new());
        let tree = PageTree::from_edges([(root, None), (a, Some(c)), (b, Some(a)), (c, Some(b))]);
        assert!(matches!(tree.validate(), Err(TreeError::Cycle(_))));
    }

    #[test]
    fn test_unknown_parent() {
        let (a, missing) = (PageId::new(), PageId::new());
        let tree = PageTree::from_edges([(a, Some(missing))]);
        assert_eq!(
            tree.validate(),
            Err(TreeError::UnknownParent {
                page: a,
                parent: missing
            })
        );
    }

    #[test]
    fn test_reassign_unknown_page() {
        let mut tree = PageTree::from_edges([(PageId::new(), None)]);
        let stranger = PageId::new();
        assert_eq!(tree.reassign(stranger, None), Err(TreeError::UnknownPage(stranger)));
    }
}
