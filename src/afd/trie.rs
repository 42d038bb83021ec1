// # Attribute-Set Trie
//
// Maps A-set keys to values, storing each key as its ascending sorted column
// list along a trie path. Besides exact get/set/delete, the frontiers in the
// search engine (`minValidFD`, `maxNonFD`) and the hitting-set engine need two
// containment queries that must short-circuit as soon as a match is found:
//
// - `contains_subset_of(q)`  — does any stored key sit *inside* `q`?
// - `contains_superset_of(q)` — does any stored key sit *around* `q`?
//
// Both are plain DFS over "skip this target element" vs. "descend through the
// matching child" choices; see the two recursive walks below.

use super::bitset::AttrSet;
use std::collections::BTreeMap;

struct Node<V> {
    children: BTreeMap<usize, Node<V>>,
    value: Option<V>,
}

impl<V> Node<V> {
    fn new() -> Self {
        Node { children: BTreeMap::new(), value: None }
    }
}

pub struct Trie<V> {
    root: Node<V>,
    len: usize,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    pub fn new() -> Self {
        Trie { root: Node::new(), len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores `value` under `key`, replacing any prior value for that exact key.
    pub fn set(&mut self, key: AttrSet, value: V) -> Option<V> {
        let path = key.to_sorted_vec();
        let mut node = &mut self.root;
        for col in path {
            node = node.children.entry(col).or_insert_with(Node::new);
        }
        let prev = node.value.replace(value);
        if prev.is_none() {
            self.len += 1;
        }
        prev
    }

    pub fn get(&self, key: AttrSet) -> Option<&V> {
        let path = key.to_sorted_vec();
        let mut node = &self.root;
        for col in path {
            node = node.children.get(&col)?;
        }
        node.value.as_ref()
    }

    pub fn delete(&mut self, key: AttrSet) -> Option<V> {
        let path = key.to_sorted_vec();
        let mut node = &mut self.root;
        for col in &path {
            node = node.children.get_mut(col)?;
        }
        let removed = node.value.take();
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// True iff some stored key is a subset of `query`.
    pub fn contains_subset_of(&self, query: AttrSet) -> bool {
        let target = query.to_sorted_vec();
        Self::subset_bool(&self.root, &target, 0)
    }

    fn subset_bool(node: &Node<V>, target: &[usize], ti: usize) -> bool {
        if node.value.is_some() {
            return true;
        }
        if ti >= target.len() {
            return false;
        }
        if Self::subset_bool(node, target, ti + 1) {
            return true;
        }
        if let Some(child) = node.children.get(&target[ti]) {
            if Self::subset_bool(child, target, ti + 1) {
                return true;
            }
        }
        false
    }

    /// True iff some stored key is a superset of `query`.
    pub fn contains_superset_of(&self, query: AttrSet) -> bool {
        let target = query.to_sorted_vec();
        Self::superset_bool(&self.root, &target, 0)
    }

    fn superset_bool(node: &Node<V>, target: &[usize], ti: usize) -> bool {
        if ti >= target.len() {
            return Self::subtree_has_value(node);
        }
        for (_, child) in node.children.range(..target[ti]) {
            if Self::superset_bool(child, target, ti) {
                return true;
            }
        }
        if let Some(child) = node.children.get(&target[ti]) {
            if Self::superset_bool(child, target, ti + 1) {
                return true;
            }
        }
        false
    }

    fn subtree_has_value(node: &Node<V>) -> bool {
        if node.value.is_some() {
            return true;
        }
        node.children.values().any(Self::subtree_has_value)
    }

    /// All stored keys that are subsets of `query`, paired with their values.
    pub fn subsets_of(&self, query: AttrSet) -> Vec<(AttrSet, &V)> {
        let target = query.to_sorted_vec();
        let mut out = Vec::new();
        let mut path = Vec::new();
        Self::collect_subsets(&self.root, &target, 0, &mut path, &mut out);
        out
    }

    fn collect_subsets<'a>(
        node: &'a Node<V>,
        target: &[usize],
        ti: usize,
        path: &mut Vec<usize>,
        out: &mut Vec<(AttrSet, &'a V)>,
    ) {
        if let Some(v) = &node.value {
            out.push((Self::path_to_attrset(path), v));
        }
        Self::explore_ti(node, target, ti, path, out);
    }

    fn explore_ti<'a>(
        node: &'a Node<V>,
        target: &[usize],
        ti: usize,
        path: &mut Vec<usize>,
        out: &mut Vec<(AttrSet, &'a V)>,
    ) {
        if ti >= target.len() {
            return;
        }
        Self::explore_ti(node, target, ti + 1, path, out);
        if let Some(child) = node.children.get(&target[ti]) {
            path.push(target[ti]);
            Self::collect_subsets(child, target, ti + 1, path, out);
            path.pop();
        }
    }

    fn path_to_attrset(path: &[usize]) -> AttrSet {
        let mut bits = 0u64;
        for &c in path {
            bits |= 1u64 << c;
        }
        AttrSet(bits)
    }

    /// All stored (key, value) pairs, in no particular order.
    pub fn enumerate(&self) -> Vec<(AttrSet, &V)> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        Self::walk_all(&self.root, &mut path, &mut out);
        out
    }

    fn walk_all<'a>(node: &'a Node<V>, path: &mut Vec<usize>, out: &mut Vec<(AttrSet, &'a V)>) {
        if let Some(v) = &node.value {
            out.push((Self::path_to_attrset(path), v));
        }
        for (&col, child) in &node.children {
            path.push(col);
            Self::walk_all(child, path, out);
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(bits: &[usize]) -> AttrSet {
        bits.iter().fold(AttrSet::EMPTY, |a, &b| a.set_bit(b))
    }

    #[test]
    fn exact_get_set_delete() {
        let mut t = Trie::new();
        t.set(set(&[0, 2]), "a");
        assert_eq!(t.get(set(&[0, 2])), Some(&"a"));
        assert_eq!(t.get(set(&[0])), None);
        assert_eq!(t.delete(set(&[0, 2])), Some("a"));
        assert_eq!(t.get(set(&[0, 2])), None);
    }

    #[test]
    fn contains_subset_of_finds_stored_subset() {
        let mut t = Trie::new();
        t.set(set(&[1]), ());
        assert!(t.contains_subset_of(set(&[1, 2, 3])));
        assert!(!t.contains_subset_of(set(&[2, 3])));
    }

    #[test]
    fn contains_superset_of_finds_stored_superset() {
        let mut t = Trie::new();
        t.set(set(&[1, 2, 3]), ());
        assert!(t.contains_superset_of(set(&[1, 3])));
        assert!(!t.contains_superset_of(set(&[1, 4])));
    }

    #[test]
    fn contains_superset_of_empty_query_is_nonempty_check() {
        let mut t = Trie::new();
        assert!(!t.contains_superset_of(AttrSet::EMPTY));
        t.set(set(&[5]), ());
        assert!(t.contains_superset_of(AttrSet::EMPTY));
    }

    #[test]
    fn subsets_of_collects_all_without_duplicates() {
        let mut t = Trie::new();
        t.set(set(&[1]), "a");
        t.set(set(&[2]), "b");
        t.set(set(&[1, 2]), "c");
        let mut found = t.subsets_of(set(&[1, 2, 3]));
        found.sort_by_key(|(k, _)| k.0);
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn enumerate_returns_every_stored_key() {
        let mut t = Trie::new();
        t.set(set(&[0]), 1);
        t.set(set(&[0, 1]), 2);
        assert_eq!(t.enumerate().len(), 2);
    }
}
