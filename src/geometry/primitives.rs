// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric primitives generator

use super::{Mesh, Triangle};
use ahash::AHashMap;
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

/// Geometric primitives
pub enum Primitive {
    Cube { size: Vector3<f64>, center: bool },
    Icosphere { radius: f64, subdivisions: u32 },
    Cylinder { h: f64, r: f64, segments: u32 },
}

impl Primitive {
    pub fn cube(size: Vector3<f64>, center: bool) -> Self {
        Self::Cube { size, center }
    }

    /// Sphere built by subdividing an icosahedron
    pub fn icosphere(radius: f64, subdivisions: u32) -> Self {
        Self::Icosphere {
            radius,
            subdivisions,
        }
    }

    /// Cylinder along +z from the origin
    pub fn cylinder(h: f64, r: f64, segments: u32) -> Self {
        let segments = if segments >= 3 { segments } else { 32 };
        Self::Cylinder { h, r, segments }
    }

    pub fn to_mesh(&self) -> Mesh {
        match self {
            Self::Cube { size, center } => generate_cube_mesh(*size, *center),
            Self::Icosphere {
                radius,
                subdivisions,
            } => generate_icosphere_mesh(*radius, *subdivisions),
            Self::Cylinder { h, r, segments } => generate_cylinder_mesh(*h, *r, *segments),
        }
    }
}

fn generate_cube_mesh(size: Vector3<f64>, center: bool) -> Mesh {
    let min = if center {
        Point3::from(-size / 2.0)
    } else {
        Point3::origin()
    };
    let max = min + size;

    let vertices = vec![
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];

    let faces = [
        // z+
        [4, 5, 6],
        [4, 6, 7],
        // z-
        [1, 0, 3],
        [1, 3, 2],
        // x+
        [5, 1, 2],
        [5, 2, 6],
        // x-
        [0, 4, 7],
        [0, 7, 3],
        // y+
        [7, 6, 2],
        [7, 2, 3],
        // y-
        [0, 1, 5],
        [0, 5, 4],
    ];

    Mesh::from_parts(vertices, faces.into_iter().map(Triangle::new).collect())
}

fn generate_icosphere_mesh(radius: f64, subdivisions: u32) -> Mesh {
    let t = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let mut vertices: Vec<Point3<f64>> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .into_iter()
    .map(|[x, y, z]| Point3::from(Vector3::new(x, y, z).normalize()))
    .collect();

    let mut faces: Vec<[usize; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: AHashMap<(usize, usize), usize> = AHashMap::new();
        let mut midpoint = |a: usize, b: usize, vertices: &mut Vec<Point3<f64>>| {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let mid = nalgebra::center(&vertices[a], &vertices[b]);
                vertices.push(Point3::from(mid.coords.normalize()));
                vertices.len() - 1
            })
        };

        let mut next = Vec::with_capacity(faces.len() * 4);
        for &[a, b, c] in &faces {
            let ab = midpoint(a, b, &mut vertices);
            let bc = midpoint(b, c, &mut vertices);
            let ca = midpoint(c, a, &mut vertices);
            next.extend([[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
        }
        faces = next;
    }

    for vertex in &mut vertices {
        vertex.coords *= radius;
    }

    let mut mesh = Mesh::from_parts(vertices, faces.into_iter().map(Triangle::new).collect());
    if mesh.volume() < 0.0 {
        mesh.invert();
    }
    mesh
}

fn generate_cylinder_mesh(height: f64, radius: f64, segments: u32) -> Mesh {
    let segments = segments as usize;
    let mut mesh = Mesh::with_capacity(2 + segments * 2, segments * 4);

    let bottom_center = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
    let top_center = mesh.add_vertex(Point3::new(0.0, 0.0, height));

    let mut bottom = Vec::with_capacity(segments);
    let mut top = Vec::with_capacity(segments);
    for i in 0..segments {
        let angle = 2.0 * PI * i as f64 / segments as f64;
        let (sin, cos) = angle.sin_cos();
        bottom.push(mesh.add_vertex(Point3::new(radius * cos, radius * sin, 0.0)));
        top.push(mesh.add_vertex(Point3::new(radius * cos, radius * sin, height)));
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        mesh.add_triangle(Triangle::new([bottom_center, bottom[next], bottom[i]]));
        mesh.add_triangle(Triangle::new([top_center, top[i], top[next]]));
        mesh.add_triangle(Triangle::new([bottom[i], bottom[next], top[i]]));
        mesh.add_triangle(Triangle::new([top[i], bottom[next], top[next]]));
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_generation() {
        let mesh = generate_cube_mesh(Vector3::new(10.0, 10.0, 10.0), false);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.is_volume());
        assert_relative_eq!(mesh.volume(), 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_icosphere_counts() {
        for subdivisions in 0..4 {
            let mesh = generate_icosphere_mesh(1.0, subdivisions);
            let faces = 20 * 4usize.pow(subdivisions);
            assert_eq!(mesh.triangle_count(), faces);
            // Euler characteristic of a sphere: V - E + F = 2
            assert_eq!(mesh.vertex_count(), faces / 2 + 2);
            assert!(mesh.is_volume());
        }
    }

    #[test]
    fn test_icosphere_lies_on_sphere() {
        let mesh = generate_icosphere_mesh(2.5, 3);
        for vertex in &mesh.vertices {
            assert_relative_eq!(vertex.coords.norm(), 2.5, epsilon = 1e-12);
        }
        let sphere = 4.0 / 3.0 * PI * 2.5_f64.powi(3);
        assert!(mesh.volume() < sphere);
        assert!(mesh.volume() > sphere * 0.97);
    }

    #[test]
    fn test_cylinder_is_volume() {
        let mesh = generate_cylinder_mesh(10.0, 5.0, 32);
        assert!(mesh.is_volume(), "Cylinder mesh should be a closed outward solid");
        assert_eq!(mesh.vertex_count(), 2 + 32 * 2);
        assert_eq!(mesh.triangle_count(), 32 * 4);
        assert_relative_eq!(mesh.bounds().max.z, 10.0);
    }
}
