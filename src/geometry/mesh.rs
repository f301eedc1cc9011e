// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation and solid properties

use super::{topology, BoundingBox};
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Triangle defined by three vertex indices, counter-clockwise seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }

    /// Same triangle with the opposite winding
    pub fn flipped(&self) -> Self {
        let [a, b, c] = self.indices;
        Self::new([a, c, b])
    }

    /// Directed edges in winding order
    pub fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.indices;
        [(a, b), (b, c), (c, a)]
    }

    /// True when two corners share a vertex index
    pub fn has_repeated_vertex(&self) -> bool {
        let [a, b, c] = self.indices;
        a == b || b == c || a == c
    }
}

/// Indexed triangle mesh
///
/// Meshes handed to boolean operations are expected to be closed solids:
/// every edge shared by exactly two triangles with opposite directions and
/// triangles wound counter-clockwise when seen from outside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new()
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    pub fn from_parts(vertices: Vec<Point3<f64>>, triangles: Vec<Triangle>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, position: Point3<f64>) -> usize {
        let index = self.vertices.len();
        self.vertices.push(position);
        index
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// A mesh without triangles encloses nothing
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Corner positions of a triangle
    pub fn corners(&self, triangle: &Triangle) -> [Point3<f64>; 3] {
        let [a, b, c] = triangle.indices;
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Transform all vertices by a matrix
    ///
    /// Matrices with a negative determinant mirror the mesh, so the winding is
    /// flipped to keep triangles facing outward.
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        for vertex in &mut self.vertices {
            *vertex = matrix.transform_point(vertex);
        }
        if matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0 {
            self.invert();
        }
    }

    pub fn translate(&mut self, offset: &Vector3<f64>) {
        for vertex in &mut self.vertices {
            *vertex += offset;
        }
    }

    /// Consuming variant of [`Mesh::translate`]
    pub fn translated(mut self, offset: Vector3<f64>) -> Self {
        self.translate(&offset);
        self
    }

    /// Flip every triangle, turning the solid inside out
    pub fn invert(&mut self) {
        for triangle in &mut self.triangles {
            *triangle = triangle.flipped();
        }
    }

    /// Append another mesh without any boolean processing
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);

        for triangle in &other.triangles {
            let [a, b, c] = triangle.indices;
            self.triangles
                .push(Triangle::new([a + offset, b + offset, c + offset]));
        }
    }

    /// Signed enclosed volume; positive for outward facing closed meshes
    pub fn volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|triangle| {
                let [p0, p1, p2] = self.corners(triangle);
                p0.coords.dot(&p1.coords.cross(&p2.coords))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Total surface area
    pub fn area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|triangle| {
                let [p0, p1, p2] = self.corners(triangle);
                (p1 - p0).cross(&(p2 - p0)).norm() * 0.5
            })
            .sum()
    }

    /// Bounds of the vertices referenced by triangles
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(
            self.triangles
                .iter()
                .flat_map(|triangle| triangle.indices.iter())
                .map(|&index| &self.vertices[index]),
        )
    }

    /// Size of the bounds along each axis
    pub fn extents(&self) -> Vector3<f64> {
        self.bounds().size()
    }

    /// True when every coordinate is finite
    pub fn is_finite(&self) -> bool {
        self.vertices
            .iter()
            .all(|vertex| vertex.coords.iter().all(|c| c.is_finite()))
    }

    /// True when every triangle index points at an existing vertex
    pub fn has_valid_indices(&self) -> bool {
        let count = self.vertices.len();
        self.triangles
            .iter()
            .all(|triangle| triangle.indices.iter().all(|&index| index < count))
    }

    /// Every undirected edge is shared by exactly two triangles
    pub fn is_watertight(&self) -> bool {
        !self.is_empty() && topology::EdgeUse::from_mesh(self).is_watertight()
    }

    /// Every directed edge appears once and its reverse appears once
    pub fn is_winding_consistent(&self) -> bool {
        !self.is_empty() && topology::EdgeUse::from_mesh(self).is_winding_consistent()
    }

    /// Closed, consistently wound solid with a positive finite volume
    pub fn is_volume(&self) -> bool {
        if self.is_empty() || !self.has_valid_indices() || !self.is_finite() {
            return false;
        }
        let edges = topology::EdgeUse::from_mesh(self);
        if !edges.is_watertight() || !edges.is_winding_consistent() {
            return false;
        }
        let volume = self.volume();
        volume.is_finite() && volume > 0.0
    }

    /// Number of connected components
    pub fn body_count(&self) -> usize {
        topology::connected_components(self)
    }
}
