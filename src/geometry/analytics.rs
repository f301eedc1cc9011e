// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry analytics and statistics

use super::{BoundingBox, Mesh};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geometry statistics for a mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshStats {
    /// Signed volume in cubic units
    pub volume: f64,
    /// Total surface area in square units
    pub surface_area: f64,
    pub bounds: BoundingBox,
    /// Center of mass for closed meshes, bounds center otherwise
    pub centroid: Point3<f64>,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub body_count: usize,
    pub is_watertight: bool,
    /// Closed, consistently wound and with positive volume
    pub is_volume: bool,
}

impl MeshStats {
    pub fn empty() -> Self {
        Self {
            volume: 0.0,
            surface_area: 0.0,
            bounds: BoundingBox::empty(),
            centroid: Point3::origin(),
            vertex_count: 0,
            triangle_count: 0,
            body_count: 0,
            is_watertight: false,
            is_volume: false,
        }
    }

    pub fn extents(&self) -> Vector3<f64> {
        self.bounds.size()
    }
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.extents();
        write!(
            f,
            "{} vertices, {} triangles, {} bodies, volume {:.4}, area {:.4}, \
             size {:.3} x {:.3} x {:.3}, watertight: {}",
            self.vertex_count,
            self.triangle_count,
            self.body_count,
            self.volume,
            self.surface_area,
            size.x,
            size.y,
            size.z,
            self.is_watertight
        )
    }
}

/// Analyze mesh geometry and compute statistics
pub fn analyze(mesh: &Mesh) -> MeshStats {
    if mesh.vertices.is_empty() || mesh.triangles.is_empty() {
        return MeshStats::empty();
    }

    let bounds = mesh.bounds();
    let volume = mesh.volume();
    let is_watertight = mesh.is_watertight();

    MeshStats {
        volume,
        surface_area: mesh.area(),
        bounds,
        centroid: calculate_centroid(mesh, volume, is_watertight)
            .unwrap_or_else(|| bounds.center()),
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        body_count: mesh.body_count(),
        is_watertight,
        is_volume: mesh.is_volume(),
    }
}

/// Volume-weighted centroid of the tetrahedra spanned from the origin
fn calculate_centroid(mesh: &Mesh, volume: f64, is_watertight: bool) -> Option<Point3<f64>> {
    if !is_watertight || volume.abs() < f64::EPSILON {
        return None;
    }

    let weighted = mesh
        .triangles
        .iter()
        .map(|triangle| {
            let [p0, p1, p2] = mesh.corners(triangle);
            let signed = p0.coords.dot(&p1.coords.cross(&p2.coords)) / 6.0;
            (p0.coords + p1.coords + p2.coords) * (signed / 4.0)
        })
        .fold(Vector3::zeros(), |acc, v| acc + v);

    Some(Point3::from(weighted / volume))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_stats() {
        let mesh = Primitive::cube(Vector3::new(2.0, 2.0, 2.0), false).to_mesh();
        let stats = analyze(&mesh);

        assert_relative_eq!(stats.volume, 8.0, epsilon = 1e-12);
        assert_relative_eq!(stats.surface_area, 24.0, epsilon = 1e-12);
        assert_relative_eq!(stats.centroid, Point3::new(1.0, 1.0, 1.0), epsilon = 1e-12);
        assert_eq!(stats.body_count, 1);
        assert!(stats.is_volume);
    }

    #[test]
    fn test_empty_stats() {
        let stats = analyze(&Mesh::empty());
        assert_eq!(stats, MeshStats::empty());
        assert_eq!(stats.extents(), Vector3::zeros());
    }

    #[test]
    fn test_display() {
        let mesh = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_mesh();
        let text = analyze(&mesh).to_string();
        assert!(text.starts_with("8 vertices, 12 triangles, 1 bodies"));
    }
}
