// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! BSP trees over convex polygons
//!
//! Nodes live in a flat arena and are visited with explicit work stacks, so
//! deep trees built from finely tessellated meshes cannot overflow the stack.

use super::plane::{Plane, Split};
use super::polygon::Polygon;

#[derive(Debug, Clone, Default)]
struct Node {
    plane: Option<Plane>,
    /// Polygons lying in `plane`, facing either way
    polygons: Vec<Polygon>,
    front: Option<usize>,
    back: Option<usize>,
}

/// Solid represented as a BSP tree; node 0 is the root
#[derive(Debug, Clone)]
pub struct BspTree {
    nodes: Vec<Node>,
    epsilon: f64,
}

impl BspTree {
    pub fn new(polygons: Vec<Polygon>, epsilon: f64) -> Self {
        let mut tree = Self {
            nodes: vec![Node::default()],
            epsilon,
        };
        tree.build(polygons);
        tree
    }

    /// Insert polygons, splitting them down the existing tree
    ///
    /// A node without a plane takes the plane of the first polygon that
    /// reaches it.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        let mut stack = vec![(0, polygons)];

        while let Some((index, polygons)) = stack.pop() {
            let Some(first) = polygons.first() else {
                continue;
            };
            let plane = *self.nodes[index].plane.get_or_insert(first.plane);

            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                match plane.split(polygon, self.epsilon) {
                    Split::Coplanar { polygon, .. } => self.nodes[index].polygons.push(polygon),
                    Split::Front(polygon) => front.push(polygon),
                    Split::Back(polygon) => back.push(polygon),
                    Split::Spanning { front: f, back: b } => {
                        front.extend(f);
                        back.extend(b);
                    }
                }
            }

            if !front.is_empty() {
                let child = self.child(index, true);
                stack.push((child, front));
            }
            if !back.is_empty() {
                let child = self.child(index, false);
                stack.push((child, back));
            }
        }
    }

    /// Existing child of a node, or a new empty one
    fn child(&mut self, index: usize, front: bool) -> usize {
        let existing = if front {
            self.nodes[index].front
        } else {
            self.nodes[index].back
        };
        if let Some(child) = existing {
            return child;
        }

        let child = self.nodes.len();
        self.nodes.push(Node::default());
        if front {
            self.nodes[index].front = Some(child);
        } else {
            self.nodes[index].back = Some(child);
        }
        child
    }

    /// Swap solid and empty space
    pub fn invert(&mut self) {
        for node in &mut self.nodes {
            for polygon in &mut node.polygons {
                polygon.flip();
            }
            node.plane = node.plane.map(|plane| plane.flipped());
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Remove the parts of `polygons` inside this solid
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![(0, polygons)];

        while let Some((index, polygons)) = stack.pop() {
            let node = &self.nodes[index];
            let Some(plane) = node.plane else {
                result.extend(polygons);
                continue;
            };

            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                match plane.split(polygon, self.epsilon) {
                    Split::Coplanar {
                        polygon,
                        facing_front: true,
                    }
                    | Split::Front(polygon) => front.push(polygon),
                    Split::Coplanar {
                        polygon,
                        facing_front: false,
                    }
                    | Split::Back(polygon) => back.push(polygon),
                    Split::Spanning { front: f, back: b } => {
                        front.extend(f);
                        back.extend(b);
                    }
                }
            }

            match node.front {
                Some(child) => stack.push((child, front)),
                None => result.extend(front),
            }
            // without a back child, whatever lies behind is inside the solid
            if let Some(child) = node.back {
                stack.push((child, back));
            }
        }

        result
    }

    /// Remove the parts of this tree's polygons inside `other`
    pub fn clip_to(&mut self, other: &BspTree) {
        for node in &mut self.nodes {
            node.polygons = other.clip_polygons(std::mem::take(&mut node.polygons));
        }
    }

    pub fn into_polygons(self) -> Vec<Polygon> {
        self.nodes
            .into_iter()
            .flat_map(|node| node.polygons)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::bsp::polygon;
    use crate::geometry::Primitive;
    use nalgebra::{Point3, Vector3};

    const EPSILON: f64 = 1e-5;

    fn cube_tree(size: f64) -> BspTree {
        let cube = Primitive::cube(Vector3::new(size, size, size), true).to_mesh();
        BspTree::new(polygon::from_mesh(&cube), EPSILON)
    }

    fn area(polygon: &Polygon) -> f64 {
        let origin = polygon.vertices[0];
        polygon.vertices[1..]
            .windows(2)
            .map(|pair| (pair[0] - origin).cross(&(pair[1] - origin)).norm() * 0.5)
            .sum()
    }

    fn triangle_at(center: Point3<f64>) -> Polygon {
        Polygon::new(vec![
            center + Vector3::new(-0.1, -0.1, 0.0),
            center + Vector3::new(0.1, -0.1, 0.0),
            center + Vector3::new(0.0, 0.1, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_keeps_every_polygon() {
        let tree = cube_tree(2.0);
        assert_eq!(tree.into_polygons().len(), 12);
    }

    #[test]
    fn test_clip_removes_inside() {
        let tree = cube_tree(2.0);
        let inside = triangle_at(Point3::origin());
        let outside = triangle_at(Point3::new(5.0, 0.0, 0.0));

        let kept = tree.clip_polygons(vec![inside, outside.clone()]);
        assert_eq!(kept, vec![outside]);
    }

    #[test]
    fn test_invert_swaps_inside_and_outside() {
        let mut tree = cube_tree(2.0);
        tree.invert();
        let inside = triangle_at(Point3::origin());
        let outside = triangle_at(Point3::new(5.0, 0.0, 0.0));

        let kept = tree.clip_polygons(vec![inside.clone(), outside]);
        assert_eq!(kept, vec![inside]);
    }

    #[test]
    fn test_straddling_polygon_is_cut() {
        let tree = cube_tree(2.0);
        let long = Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(4.0, 0.5, 0.0),
            Point3::new(0.0, 0.5, 0.0),
        ])
        .unwrap();

        let kept = tree.clip_polygons(vec![long]);
        let area: f64 = kept.iter().map(area).sum();
        assert!((area - 1.5).abs() < 1e-12);
        assert!(kept.iter().flat_map(|p| &p.vertices).all(|v| v.x >= 1.0 - EPSILON));
    }
}
