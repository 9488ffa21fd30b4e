//! Disjoint sets over arbitrary copyable keys, with path compression and union by rank.
//!
//! Kruskal's generator keys these by cell coordinate to reject edges that would close a loop.

use std::hash::Hash;

use crate::utils::{self, FnvHashMap};

#[derive(Debug, Clone)]
pub struct UnionFind<T: Hash + Eq + Copy> {
    parent: FnvHashMap<T, T>,
    rank: FnvHashMap<T, u8>,
}

impl<T: Hash + Eq + Copy> UnionFind<T> {
    pub fn with_capacity(capacity: usize) -> UnionFind<T> {
        UnionFind {
            parent: utils::fnv_hashmap(capacity),
            rank: utils::fnv_hashmap(capacity),
        }
    }

    /// Add `item` as its own singleton set. Re-adding an existing item leaves its set untouched.
    pub fn make_set(&mut self, item: T) {
        if !self.parent.contains_key(&item) {
            let _ = self.parent.insert(item, item);
            let _ = self.rank.insert(item, 0);
        }
    }

    /// The representative of `item`'s set. Unknown items become singletons first.
    ///
    /// Walks to the root then points every node on the walk straight at it, without recursion so
    /// long chains cannot exhaust the stack.
    pub fn find(&mut self, item: T) -> T {
        self.make_set(item);

        let mut root = item;
        while let Some(&parent) = self.parent.get(&root) {
            if parent == root {
                break;
            }
            root = parent;
        }

        let mut current = item;
        while current != root {
            let next = self.parent.insert(current, root).unwrap_or(root);
            current = next;
        }
        root
    }

    /// Merge the sets holding `a` and `b`. Returns false if they were already one set.
    pub fn union(&mut self, a: T, b: T) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        let rank_a = self.rank.get(&root_a).cloned().unwrap_or(0);
        let rank_b = self.rank.get(&root_b).cloned().unwrap_or(0);
        if rank_a < rank_b {
            let _ = self.parent.insert(root_a, root_b);
        } else if rank_a > rank_b {
            let _ = self.parent.insert(root_b, root_a);
        } else {
            let _ = self.parent.insert(root_b, root_a);
            let _ = self.rank.insert(root_a, rank_a.saturating_add(1));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    #[test]
    fn singletons_are_their_own_root() {
        let mut sets = UnionFind::with_capacity(4);
        sets.make_set(1);
        sets.make_set(2);
        assert_eq!(sets.find(1), 1);
        assert_eq!(sets.find(2), 2);
        assert_eq!(sets.parent.len(), 2);
    }

    #[test]
    fn union_joins_and_rejects_repeats() {
        let mut sets = UnionFind::with_capacity(4);
        assert!(sets.union('a', 'b'));
        assert!(sets.union('c', 'd'));
        assert!(!sets.union('b', 'a'));
        assert_eq!(sets.find('a'), sets.find('b'));
        assert_ne!(sets.find('a'), sets.find('c'));
        assert!(sets.union('b', 'd'));
        assert_eq!(sets.find('a'), sets.find('c'));
        assert!(!sets.union('a', 'd'));
    }

    #[test]
    fn long_chains_stay_shallow() {
        let mut sets = UnionFind::with_capacity(100_000);
        for n in 1..100_000u32 {
            assert!(sets.union(n - 1, n));
        }
        let root = sets.find(99_999);
        assert_eq!(sets.find(0), root);
        assert!(sets.parent.values().all(|parent| *parent == root || sets.parent[parent] == root));
    }

    #[test]
    fn union_count_matches_component_count() {
        fn p(pairs: Vec<(u8, u8)>) -> bool {
            let mut sets = UnionFind::with_capacity(256);
            for n in 0..=255u8 {
                sets.make_set(n);
            }
            let merges = pairs.iter().filter(|(a, b)| sets.union(*a, *b)).count();
            let mut roots = (0..=255u8).map(|n| sets.find(n)).collect::<Vec<_>>();
            roots.sort();
            roots.dedup();
            roots.len() == 256 - merges
        }
        quickcheck(p as fn(Vec<(u8, u8)>) -> bool);
    }
}
