//! Disjoint-set forest over `u32` indices.
//!
//! Representatives are always the smallest index in their block, which is
//! what the coset machinery relies on when merging a coincidence: the
//! larger coset dies, the smaller survives.

/// Union-find with path compression. Indices grow on demand via
/// [`UnionFind::add_entry`].
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<u32>,
    nr_blocks: usize,
}

impl UnionFind {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            nr_blocks: size,
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Append a fresh singleton block and return its index.
    pub fn add_entry(&mut self) -> u32 {
        let i = self.parent.len() as u32;
        self.parent.push(i);
        self.nr_blocks += 1;
        i
    }

    /// Canonical representative of `i`, compressing the path walked.
    pub fn find(&mut self, i: u32) -> u32 {
        let mut root = i;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut cur = i;
        while cur != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    /// Representative lookup without compression, for shared queries.
    pub fn find_const(&self, i: u32) -> u32 {
        let mut root = i;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        root
    }

    /// Merge the blocks of `i` and `j`. The smaller representative wins.
    /// Returns `true` if the blocks were distinct.
    pub fn unite(&mut self, i: u32, j: u32) -> bool {
        let a = self.find(i);
        let b = self.find(j);
        if a == b {
            return false;
        }
        let (keep, kill) = if a < b { (a, b) } else { (b, a) };
        self.parent[kill as usize] = keep;
        self.nr_blocks -= 1;
        true
    }

    /// Number of distinct blocks.
    pub fn nr_blocks(&self) -> usize {
        self.nr_blocks
    }

    /// Renumber representatives into `{0, .., nr_blocks - 1}` in order of
    /// first appearance, returning the index -> block-number lookup. The
    /// structure itself is reset to `nr_blocks` fresh singletons.
    pub fn compress(&mut self) -> Vec<u32> {
        let mut lookup = vec![0u32; self.parent.len()];
        let mut number = vec![u32::MAX; self.parent.len()];
        let mut next = 0u32;
        for i in 0..self.parent.len() as u32 {
            let rep = self.find(i);
            if number[rep as usize] == u32::MAX {
                number[rep as usize] = next;
                next += 1;
            }
            lookup[i as usize] = number[rep as usize];
        }
        *self = UnionFind::new(next as usize);
        lookup
    }

    /// Like [`UnionFind::compress`] but leaves the structure untouched.
    pub fn normalise(&mut self) -> Vec<u32> {
        let mut lookup = vec![0u32; self.parent.len()];
        let mut number = vec![u32::MAX; self.parent.len()];
        let mut next = 0u32;
        for i in 0..self.parent.len() as u32 {
            let rep = self.find(i);
            if number[rep as usize] == u32::MAX {
                number[rep as usize] = next;
                next += 1;
            }
            lookup[i as usize] = number[rep as usize];
        }
        lookup
    }
}
