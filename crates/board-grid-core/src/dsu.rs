/// Disjoint-set forest over element indices.
///
/// Parents and ranks live in parallel arrays addressed by element index,
/// so the elements themselves stay immutable while the grouping
/// bookkeeping is confined here. Path compression plus union-by-rank
/// keep `find` near constant time.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// `len` singleton sets, each element its own root.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root representative of the set containing `i`, compressing the
    /// path on the way up.
    pub fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Merge the sets containing `i` and `j`.
    ///
    /// Returns `true` if two distinct sets were merged, `false` if the
    /// elements already shared a root. The lower-rank root is attached
    /// under the higher-rank one; a tie increments the surviving root's
    /// rank.
    pub fn union(&mut self, i: usize, j: usize) -> bool {
        let mut root_i = self.find(i);
        let mut root_j = self.find(j);
        if root_i == root_j {
            return false;
        }
        if self.rank[root_i] < self.rank[root_j] {
            std::mem::swap(&mut root_i, &mut root_j);
        }
        self.parent[root_j] = root_i;
        if self.rank[root_i] == self.rank[root_j] {
            self.rank[root_i] += 1;
        }
        true
    }

    /// Partition all elements into groups of indices.
    ///
    /// Groups are ordered by the first element encountered (ascending
    /// index scan); members within a group are ascending as well.
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let mut slot_of_root: Vec<Option<usize>> = vec![None; self.len()];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for i in 0..self.len() {
            let root = self.find(i);
            match slot_of_root[root] {
                Some(slot) => groups[slot].push(i),
                None => {
                    slot_of_root[root] = Some(groups.len());
                    groups.push(vec![i]);
                }
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitive_unions_share_a_root() {
        let mut sets = DisjointSet::new(5);
        assert!(sets.union(0, 1));
        assert!(sets.union(1, 2));
        assert_eq!(sets.find(0), sets.find(2));
        assert_ne!(sets.find(0), sets.find(3));
    }

    #[test]
    fn group_count_is_len_minus_effective_unions() {
        let mut sets = DisjointSet::new(6);
        let mut merged = 0;
        for (i, j) in [(0, 1), (2, 3), (1, 0), (3, 2), (0, 2)] {
            if sets.union(i, j) {
                merged += 1;
            }
        }
        assert_eq!(merged, 3);
        assert_eq!(sets.groups().len(), 6 - merged);
    }

    #[test]
    fn groups_preserve_first_occurrence_order() {
        let mut sets = DisjointSet::new(4);
        sets.union(2, 3);
        let groups = sets.groups();
        assert_eq!(groups, vec![vec![0], vec![1], vec![2, 3]]);
    }

    #[test]
    fn singleton_sets_survive() {
        let mut sets = DisjointSet::new(3);
        let groups = sets.groups();
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| g.len() == 1));
    }
}
