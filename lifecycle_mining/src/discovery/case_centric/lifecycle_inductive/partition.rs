use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::core::event_data::lifecycle::Activity;

/// A block of a [`Partition`]
pub type Block = BTreeSet<Activity>;

///
/// Partition of an alphabet into disjoint, non-empty blocks
///
/// Starts from the finest partition (one block per activity) and is only
/// ever coarsened by merging blocks (disjoint-set forest with union by size).
///
#[derive(Debug, Clone)]
pub struct Partition {
    elements: Vec<Activity>,
    index: HashMap<Activity, usize>,
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl Partition {
    /// One block per (distinct) activity
    pub fn finest<'a, I: IntoIterator<Item = &'a Activity>>(alphabet: I) -> Self {
        let elements: Vec<Activity> = alphabet
            .into_iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index = elements
            .iter()
            .enumerate()
            .map(|(i, a)| (a.clone(), i))
            .collect();
        Self {
            parent: (0..elements.len()).collect(),
            size: vec![1; elements.len()],
            elements,
            index,
        }
    }

    fn find(&self, mut i: usize) -> usize {
        while self.parent[i] != i {
            i = self.parent[i];
        }
        i
    }

    /// Merge the blocks of `a` and `b`; returns `true` if two blocks were joined
    pub fn merge(&mut self, a: &Activity, b: &Activity) -> bool {
        let (Some(&i), Some(&j)) = (self.index.get(a), self.index.get(b)) else {
            return false;
        };
        let (ri, rj) = (self.find(i), self.find(j));
        if ri == rj {
            return false;
        }
        let (big, small) = if self.size[ri] >= self.size[rj] {
            (ri, rj)
        } else {
            (rj, ri)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        true
    }

    /// Merge the blocks of every pair of distinct activities satisfying `join`
    pub fn merge_where<F: FnMut(&Activity, &Activity) -> bool>(&mut self, mut join: F) {
        for i in 0..self.elements.len() {
            for j in (i + 1)..self.elements.len() {
                let (a, b) = (&self.elements[i], &self.elements[j]);
                if self.find(i) != self.find(j) && join(a, b) {
                    let (a, b) = (a.clone(), b.clone());
                    self.merge(&a, &b);
                }
            }
        }
    }

    /// Returns `true` if `a` and `b` are in the same block
    pub fn same_block(&self, a: &Activity, b: &Activity) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&i), Some(&j)) => self.find(i) == self.find(j),
            _ => false,
        }
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        (0..self.elements.len())
            .filter(|&i| self.find(i) == i)
            .count()
    }

    /// Returns `true` if the partitioned alphabet is empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Blocks, ordered by their smallest activity
    pub fn blocks(&self) -> Vec<Block> {
        let mut by_root: BTreeMap<usize, Block> = BTreeMap::new();
        for (i, a) in self.elements.iter().enumerate() {
            by_root.entry(self.find(i)).or_default().insert(a.clone());
        }
        let mut blocks: Vec<Block> = by_root.into_values().collect();
        blocks.sort_by(|x, y| x.first().cmp(&y.first()));
        blocks
    }
}

/// Index of the block containing `activity` (compared by its collapsed view)
pub fn block_index(blocks: &[Block], activity: &Activity) -> Option<usize> {
    let a = activity.as_default();
    blocks.iter().position(|b| b.contains(&a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::act;

    fn alphabet(labels: &str) -> Vec<Activity> {
        labels.split_whitespace().map(act).collect()
    }

    #[test]
    fn finest_partition() {
        let p = Partition::finest(&alphabet("c a b a"));
        assert_eq!(p.len(), 3);
        let blocks = p.blocks();
        assert_eq!(blocks[0].first(), Some(&act("a")));
        assert_eq!(blocks[2].first(), Some(&act("c")));
    }

    #[test]
    fn merges_are_transitive() {
        let mut p = Partition::finest(&alphabet("a b c d e"));
        assert!(p.merge(&act("a"), &act("c")));
        assert!(p.merge(&act("c"), &act("e")));
        assert!(!p.merge(&act("e"), &act("a")));
        assert!(!p.merge(&act("a"), &act("x")));
        assert!(p.same_block(&act("a"), &act("e")));
        assert!(!p.same_block(&act("a"), &act("b")));
        let blocks = p.blocks();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], alphabet("a c e").into_iter().collect::<Block>());
        assert_eq!(block_index(&blocks, &Activity::start("e")), Some(0));
        assert_eq!(block_index(&blocks, &act("d")), Some(2));
    }

    #[test]
    fn blocks_cover_alphabet_disjointly() {
        let letters = alphabet("a b c d e f g");
        let mut p = Partition::finest(&letters);
        p.merge_where(|a, b| (a.label.as_bytes()[0] % 3) == (b.label.as_bytes()[0] % 3));
        let blocks = p.blocks();
        assert_eq!(blocks.len(), 3);
        let mut covered: Vec<Activity> = blocks.iter().flatten().cloned().collect();
        covered.sort();
        assert_eq!(covered, letters);
    }
}
