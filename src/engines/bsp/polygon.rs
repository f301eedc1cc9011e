// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Convex planar polygons

use super::plane::Plane;
use crate::geometry::{Mesh, Triangle};
use nalgebra::Point3;

/// Convex polygon with counter-clockwise vertices seen from the front
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point3<f64>>,
    pub plane: Plane,
}

impl Polygon {
    /// Polygon with the plane of its first three vertices
    pub fn new(vertices: Vec<Point3<f64>>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(&vertices[0], &vertices[1], &vertices[2])?;
        Some(Self { vertices, plane })
    }

    /// Polygon lying in a known plane, `None` below three vertices
    pub fn with_plane(vertices: Vec<Point3<f64>>, plane: Plane) -> Option<Self> {
        (vertices.len() >= 3).then_some(Self { vertices, plane })
    }

    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane = self.plane.flipped();
    }
}

/// Polygons of every non-degenerate triangle of a mesh
pub fn from_mesh(mesh: &Mesh) -> Vec<Polygon> {
    mesh.triangles
        .iter()
        .filter_map(|triangle| Polygon::new(mesh.corners(triangle).to_vec()))
        .collect()
}

/// Fan-triangulate polygons into an unwelded mesh
pub fn to_mesh(polygons: &[Polygon]) -> Mesh {
    let vertex_count = polygons.iter().map(|p| p.vertices.len()).sum();
    let triangle_count = vertex_count - 2 * polygons.len();
    let mut mesh = Mesh::with_capacity(vertex_count, triangle_count);

    for polygon in polygons {
        let first = mesh.vertex_count();
        mesh.vertices.extend_from_slice(&polygon.vertices);
        for i in 1..polygon.vertices.len() - 1 {
            mesh.add_triangle(Triangle::new([first, first + i, first + i + 1]));
        }
    }

    mesh
}
