use bit_set::BitSet;
use fnv::FnvHasher;
use std::{
    collections::{HashMap, HashSet},
    hash::{BuildHasherDefault, Hash}
};

use crate::cells::Coordinate;

pub type FnvHashSet<T> = HashSet<T, BuildHasherDefault<FnvHasher>>;
pub type FnvHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FnvHasher>>;

/// Construct a hash set with the specified capacity. The hashing algorithm is much faster than the default
/// on short keys such as the coordinate pairs used throughout the crate.
/// Note it is less robust against security attacks on key collisions.
pub fn fnv_hashset<T: Hash + Eq>(capacity: usize) -> FnvHashSet<T> {
    let fnv = BuildHasherDefault::<FnvHasher>::default();
    HashSet::<T, _>::with_capacity_and_hasher(capacity, fnv)
}

/// Construct a hash map with the specified capacity, see `fnv_hashset`.
pub fn fnv_hashmap<K: Hash + Eq, V>(capacity: usize) -> FnvHashMap<K, V> {
    let fnv = BuildHasherDefault::<FnvHasher>::default();
    HashMap::<K, V, _>::with_capacity_and_hasher(capacity, fnv)
}

/// A membership set over the cells of one square grid, stored as a bit per row-major index.
#[derive(Debug, Clone)]
pub struct CellSet {
    bits: BitSet,
    dimension: usize,
}

impl CellSet {
    pub fn new(dimension: usize) -> CellSet {
        CellSet {
            bits: BitSet::with_capacity(dimension * dimension),
            dimension,
        }
    }

    /// Returns true if the coordinate was not already present.
    #[inline]
    pub fn insert(&mut self, coord: Coordinate) -> bool {
        self.bits.insert(self.index(coord))
    }

    #[inline]
    fn index(&self, coord: Coordinate) -> usize {
        coord.y * self.dimension + coord.x
    }
}
