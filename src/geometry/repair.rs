// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Clean-up passes that turn polygon soup into a closed indexed surface

use super::{Mesh, Triangle};
use ahash::AHashMap;
use nalgebra::Point3;

/// Upper bound on T-junction passes; each pass splits one edge per triangle
const MAX_T_JUNCTION_PASSES: usize = 64;

type CellKey = (i64, i64, i64);

fn cell_key(point: &Point3<f64>, cell: f64) -> CellKey {
    (
        (point.x / cell).floor() as i64,
        (point.y / cell).floor() as i64,
        (point.z / cell).floor() as i64,
    )
}

/// Vertex indices sorted along each axis, for slab range queries
struct AxisOrder {
    sorted: [Vec<usize>; 3],
}

impl AxisOrder {
    fn new(mesh: &Mesh) -> Self {
        let mut referenced = vec![false; mesh.vertices.len()];
        for triangle in &mesh.triangles {
            for &index in &triangle.indices {
                referenced[index] = true;
            }
        }
        let used: Vec<usize> = (0..mesh.vertices.len())
            .filter(|&index| referenced[index])
            .collect();

        let sorted = [0, 1, 2].map(|axis| {
            let mut order = used.clone();
            order.sort_by(|&a, &b| mesh.vertices[a][axis].total_cmp(&mesh.vertices[b][axis]));
            order
        });
        Self { sorted }
    }
}

impl Mesh {
    /// Clean up raw boolean output: weld, drop slivers, stitch T-junctions,
    /// cancel coincident opposite faces and drop unused vertices
    pub fn repair(&mut self, tolerance: f64) {
        let welded = self.weld_vertices(tolerance);
        let degenerate = self.remove_degenerate_triangles(tolerance);
        let split = self.split_t_junctions(tolerance);
        let cancelled = self.cancel_opposing_triangles();
        let orphaned = self.remove_orphaned_vertices();
        log::trace!(
            "repair: welded {welded}, dropped {degenerate} slivers, split {split} T-junctions, \
             cancelled {cancelled} faces, removed {orphaned} orphans"
        );
    }

    /// Weld vertices that are within `tolerance` of each other
    ///
    /// The first vertex of each cluster is kept. Returns the number of
    /// vertices removed.
    pub fn weld_vertices(&mut self, tolerance: f64) -> usize {
        if self.vertices.is_empty() {
            return 0;
        }

        let cell = tolerance.max(1e-12);
        let mut grid: AHashMap<CellKey, Vec<usize>> = AHashMap::new();
        let mut welded: Vec<Point3<f64>> = Vec::with_capacity(self.vertices.len());
        let mut remap = Vec::with_capacity(self.vertices.len());

        for vertex in &self.vertices {
            let (kx, ky, kz) = cell_key(vertex, cell);
            let mut found = None;

            'search: for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let Some(bucket) = grid.get(&(kx + dx, ky + dy, kz + dz)) else {
                            continue;
                        };
                        if let Some(&existing) = bucket
                            .iter()
                            .find(|&&candidate| (welded[candidate] - *vertex).norm() <= tolerance)
                        {
                            found = Some(existing);
                            break 'search;
                        }
                    }
                }
            }

            let index = found.unwrap_or_else(|| {
                let index = welded.len();
                welded.push(*vertex);
                grid.entry((kx, ky, kz)).or_default().push(index);
                index
            });
            remap.push(index);
        }

        for triangle in &mut self.triangles {
            for index in &mut triangle.indices {
                *index = remap[*index];
            }
        }

        let removed = self.vertices.len() - welded.len();
        self.vertices = welded;
        removed
    }

    /// Remove triangles with repeated corners or a height below `tolerance`
    ///
    /// Returns the number of triangles removed.
    pub fn remove_degenerate_triangles(&mut self, tolerance: f64) -> usize {
        let original_count = self.triangles.len();
        let vertices = &self.vertices;

        self.triangles.retain(|triangle| {
            if triangle.has_repeated_vertex() {
                return false;
            }
            let [a, b, c] = triangle.indices;
            let (p0, p1, p2) = (vertices[a], vertices[b], vertices[c]);
            let longest = (p1 - p0)
                .norm()
                .max((p2 - p1).norm())
                .max((p0 - p2).norm());
            if longest <= tolerance {
                return false;
            }
            let height = (p1 - p0).cross(&(p2 - p0)).norm() / longest;
            height > tolerance
        });

        original_count - self.triangles.len()
    }

    /// Split triangles whose edges pass through other vertices
    ///
    /// Boolean output routinely contains T-junctions where one side of an
    /// edge was cut and the other was not. Each offending triangle is fanned
    /// from its opposite corner through the points lying on the edge. Returns
    /// the number of triangles split.
    pub fn split_t_junctions(&mut self, tolerance: f64) -> usize {
        if self.triangles.is_empty() {
            return 0;
        }

        let order = AxisOrder::new(self);
        let mut total = 0;

        for _ in 0..MAX_T_JUNCTION_PASSES {
            let mut next = Vec::with_capacity(self.triangles.len());
            let mut splits = 0;

            for triangle in &self.triangles {
                match self.first_t_junction(triangle, &order, tolerance) {
                    Some((edge, points)) => {
                        let opposite = triangle.indices[(edge + 2) % 3];
                        let mut chain = Vec::with_capacity(points.len() + 2);
                        chain.push(triangle.indices[edge]);
                        chain.extend(points);
                        chain.push(triangle.indices[(edge + 1) % 3]);
                        next.extend(
                            chain
                                .windows(2)
                                .map(|pair| Triangle::new([pair[0], pair[1], opposite])),
                        );
                        splits += 1;
                    }
                    None => next.push(*triangle),
                }
            }

            self.triangles = next;
            total += splits;
            if splits == 0 {
                return total;
            }
        }

        log::warn!("T-junction repair stopped after {MAX_T_JUNCTION_PASSES} passes");
        total
    }

    /// First edge of `triangle` with vertices in its interior, and those
    /// vertices ordered from the edge start
    fn first_t_junction(
        &self,
        triangle: &Triangle,
        order: &AxisOrder,
        tolerance: f64,
    ) -> Option<(usize, Vec<usize>)> {
        (0..3).find_map(|edge| {
            let start = triangle.indices[edge];
            let end = triangle.indices[(edge + 1) % 3];
            let opposite = triangle.indices[(edge + 2) % 3];
            let points = self.points_on_segment(start, end, opposite, order, tolerance);
            (!points.is_empty()).then_some((edge, points))
        })
    }

    fn points_on_segment(
        &self,
        start: usize,
        end: usize,
        opposite: usize,
        order: &AxisOrder,
        tolerance: f64,
    ) -> Vec<usize> {
        let a = self.vertices[start];
        let b = self.vertices[end];
        let direction = b - a;
        let length_squared = direction.norm_squared();
        if length_squared <= tolerance * tolerance {
            return Vec::new();
        }

        // query the slab along the axis where the edge is thinnest
        let axis = direction.iamin();
        let low = a[axis].min(b[axis]) - tolerance;
        let high = a[axis].max(b[axis]) + tolerance;
        let sorted = &order.sorted[axis];
        let first = sorted.partition_point(|&index| self.vertices[index][axis] < low);

        let mut found: Vec<(f64, usize)> = sorted[first..]
            .iter()
            .take_while(|&&index| self.vertices[index][axis] <= high)
            .filter(|&&index| index != start && index != end && index != opposite)
            .filter_map(|&index| {
                let point = self.vertices[index];
                let t = (point - a).dot(&direction) / length_squared;
                if t <= 0.0 || t >= 1.0 {
                    return None;
                }
                let off_line = (point - (a + direction * t)).norm();
                let clear_of_ends =
                    (point - a).norm() > tolerance && (point - b).norm() > tolerance;
                (off_line <= tolerance && clear_of_ends).then_some((t, index))
            })
            .collect();

        found.sort_by(|x, y| x.0.total_cmp(&y.0));
        found.into_iter().map(|(_, index)| index).collect()
    }

    /// Remove pairs of triangles over the same corners with opposite winding
    ///
    /// Such pairs are zero-thickness walls left where two solids touched.
    /// Returns the number of triangles removed.
    pub fn cancel_opposing_triangles(&mut self) -> usize {
        let mut faces: AHashMap<[usize; 3], (Vec<usize>, Vec<usize>)> = AHashMap::new();

        for (position, triangle) in self.triangles.iter().enumerate() {
            let [a, b, c] = triangle.indices;
            // rotate the smallest index to the front, keeping the winding
            let rotated = if a < b && a < c {
                [a, b, c]
            } else if b < c {
                [b, c, a]
            } else {
                [c, a, b]
            };
            let forward = rotated[1] < rotated[2];
            let mut key = rotated;
            key.sort_unstable();
            let entry = faces.entry(key).or_default();
            if forward {
                entry.0.push(position);
            } else {
                entry.1.push(position);
            }
        }

        let mut remove = vec![false; self.triangles.len()];
        let mut removed = 0;
        for (forward, backward) in faces.values() {
            for (&f, &b) in forward.iter().zip(backward.iter()) {
                remove[f] = true;
                remove[b] = true;
                removed += 2;
            }
        }

        if removed > 0 {
            let mut position = 0;
            self.triangles.retain(|_| {
                let keep = !remove[position];
                position += 1;
                keep
            });
        }
        removed
    }

    /// Remove orphaned vertices (vertices not referenced by any triangle)
    /// Returns the number of vertices removed
    pub fn remove_orphaned_vertices(&mut self) -> usize {
        if self.triangles.is_empty() {
            let removed = self.vertices.len();
            self.vertices.clear();
            return removed;
        }

        let mut used_vertices = vec![false; self.vertices.len()];
        for triangle in &self.triangles {
            for &index in &triangle.indices {
                used_vertices[index] = true;
            }
        }

        // old index -> new index
        let mut new_indices = vec![0; self.vertices.len()];
        let mut new_vertices = Vec::with_capacity(self.vertices.len());
        for (old_index, &used) in used_vertices.iter().enumerate() {
            if used {
                new_indices[old_index] = new_vertices.len();
                new_vertices.push(self.vertices[old_index]);
            }
        }

        for triangle in &mut self.triangles {
            for index in &mut triangle.indices {
                *index = new_indices[*index];
            }
        }

        let removed = self.vertices.len() - new_vertices.len();
        self.vertices = new_vertices;
        removed
    }
}
