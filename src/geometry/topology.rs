// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Edge incidence and connectivity queries

use super::Mesh;
use ahash::AHashMap;

/// Directed edge usage counts of a mesh
pub(crate) struct EdgeUse {
    directed: AHashMap<(usize, usize), u32>,
}

impl EdgeUse {
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let mut directed = AHashMap::with_capacity(mesh.triangles.len() * 3);
        for triangle in &mesh.triangles {
            for edge in triangle.edges() {
                *directed.entry(edge).or_insert(0) += 1;
            }
        }
        Self { directed }
    }

    fn reverse_count(&self, (a, b): (usize, usize)) -> u32 {
        self.directed.get(&(b, a)).copied().unwrap_or(0)
    }

    /// Every undirected edge is used exactly twice
    pub fn is_watertight(&self) -> bool {
        self.directed
            .iter()
            .all(|(&edge, &count)| count + self.reverse_count(edge) == 2)
    }

    /// Every directed edge is used once and paired with its reverse
    pub fn is_winding_consistent(&self) -> bool {
        self.directed
            .iter()
            .all(|(&edge, &count)| count == 1 && self.reverse_count(edge) == 1)
    }
}

/// Union-find over vertex indices
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return;
        }
        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
    }
}

/// Count groups of triangles connected through shared vertices
pub(crate) fn connected_components(mesh: &Mesh) -> usize {
    let count = mesh.vertices.len();
    let mut sets = DisjointSet::new(count);
    let mut referenced = vec![false; count];

    for triangle in &mesh.triangles {
        let [a, b, c] = triangle.indices;
        if a >= count || b >= count || c >= count {
            continue;
        }
        sets.union(a, b);
        sets.union(b, c);
        referenced[a] = true;
        referenced[b] = true;
        referenced[c] = true;
    }

    let mut roots: Vec<usize> = (0..count)
        .filter(|&vertex| referenced[vertex])
        .map(|vertex| sets.find(vertex))
        .collect();
    roots.sort_unstable();
    roots.dedup();
    roots.len()
}
