//! Ordered book catalog.
//!
//! Records live in an unbalanced binary search tree keyed by identifier.
//! Identifier lookups walk a single path; title lookups have to visit every
//! node because titles are not the ordering key.

use std::{cmp::Ordering, fmt};

use crate::book::{BookRecord, normalize_title};

/// One tree node. Every id in `left` sorts before `record.id`, every id in
/// `right` sorts after it.
struct CatalogNode {
    /// The record stored here
    record: BookRecord,
    /// Subtree of smaller ids
    left: Option<Box<CatalogNode>>,
    /// Subtree of larger ids
    right: Option<Box<CatalogNode>>,
}

impl CatalogNode {
    /// A node without children
    fn leaf(record: BookRecord) -> Self {
        Self { record, left: None, right: None }
    }
}

/// Book catalog ordered by identifier.
///
/// The tree is not rebalanced, so ids inserted in sorted order build a
/// single long path. Every walk is a loop and teardown uses a work stack, so
/// depth never reaches the call stack.
#[derive(Default)]
pub struct Catalog {
    /// Root of the search tree
    root: Option<Box<CatalogNode>>,
    /// Number of records in the tree
    len: usize,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Drop for Catalog {
    fn drop(&mut self) {
        let mut pending: Vec<Box<CatalogNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the catalog holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of records held
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Insert a record keyed by its id.
    ///
    /// An id that is already present leaves the existing record untouched and
    /// returns `false`; this is not an error.
    pub fn insert(&mut self, record: BookRecord) -> bool {
        let mut slot = &mut self.root;
        loop {
            match slot {
                None => {
                    *slot = Some(Box::new(CatalogNode::leaf(record)));
                    self.len = self.len.saturating_add(1);
                    return true;
                }
                Some(node) => match record.id.cmp(&node.record.id) {
                    Ordering::Less => slot = &mut node.left,
                    Ordering::Greater => slot = &mut node.right,
                    Ordering::Equal => return false,
                },
            }
        }
    }

    /// Remove the record with exactly this id. Returns `false` if absent.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(slot) = find_slot(&mut self.root, id) else {
            return false;
        };
        unlink(slot);
        self.len = self.len.saturating_sub(1);
        true
    }

    /// Look up a record by id. The id is trimmed; a blank id finds nothing.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BookRecord> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }

        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match id.cmp(node.record.id.as_str()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.record),
            };
        }
        None
    }

    /// Whether a record with this id exists. Blank ids report `false`.
    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Whether **no** record carries this title (compared after normalization).
    ///
    /// Returns `false` when the title is cataloged and `true` when it is not.
    /// A blank title is always reported unavailable.
    #[must_use]
    pub fn is_title_unavailable(&self, title: &str) -> bool {
        let wanted = normalize_title(title);
        if wanted.is_empty() {
            return true;
        }
        !self.iter().any(|record| normalize_title(&record.title) == wanted)
    }

    /// Records in ascending id order
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref())
    }
}

impl FromIterator<BookRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = BookRecord>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for record in iter {
            catalog.insert(record);
        }
        catalog
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a BookRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The slot holding `id` in the subtree at `slot`, if any
fn find_slot<'a>(
    mut slot: &'a mut Option<Box<CatalogNode>>,
    id: &str,
) -> Option<&'a mut Option<Box<CatalogNode>>> {
    loop {
        let ordering = match slot.as_deref() {
            None => return None,
            Some(node) => id.cmp(node.record.id.as_str()),
        };
        if ordering == Ordering::Equal {
            return Some(slot);
        }
        let Some(node) = slot else {
            return None;
        };
        slot = if ordering == Ordering::Less { &mut node.left } else { &mut node.right };
    }
}

/// Detach the node in `slot`, splicing its subtrees back in
fn unlink(slot: &mut Option<Box<CatalogNode>>) {
    let Some(node) = slot else {
        return;
    };

    let successor = match (&node.left, &node.right) {
        (Some(_), Some(right)) => Some(min_record(right).clone()),
        _ => None,
    };

    if let Some(successor) = successor {
        // Two children: pull the in-order successor up and splice out its old node,
        // which has no left child.
        if let Some(successor_slot) = find_slot(&mut node.right, &successor.id) {
            let rest = successor_slot.as_mut().and_then(|old| old.right.take());
            *successor_slot = rest;
        }
        node.record = successor;
    } else {
        let child = node.left.take().or_else(|| node.right.take());
        *slot = child;
    }
}

/// The record with the smallest id in the subtree rooted at `node`
fn min_record(node: &CatalogNode) -> &BookRecord {
    let mut current = node;
    while let Some(left) = current.left.as_deref() {
        current = left;
    }
    &current.record
}

/// In-order iterator over a [`Catalog`].
///
/// Cloning it gives an independent cursor; calling [`Catalog::iter`] again
/// restarts from the smallest id.
#[derive(Clone)]
pub struct Iter<'a> {
    /// Nodes whose left subtree is already queued but which are not yet yielded
    stack: Vec<&'a CatalogNode>,
}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("pending", &self.stack.len()).finish()
    }
}

impl<'a> Iter<'a> {
    /// Start a traversal at `root`
    fn new(root: Option<&'a CatalogNode>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    /// Queue `node` and every left descendant
    fn push_left_spine(&mut self, mut node: Option<&'a CatalogNode>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a BookRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.record)
    }
}
