// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Splitting planes

use super::polygon::Polygon;
use nalgebra::{Point3, Vector3};

/// Position of a point or polygon relative to a plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Coplanar,
    Front,
    Back,
    /// Vertices on both sides
    Spanning,
}

impl Classification {
    fn combine(self, other: Classification) -> Classification {
        use Classification::*;
        match (self, other) {
            (Coplanar, side) | (side, Coplanar) => side,
            (Front, Front) => Front,
            (Back, Back) => Back,
            _ => Spanning,
        }
    }
}

/// Result of splitting a polygon by a plane
#[derive(Debug)]
pub enum Split {
    Coplanar { polygon: Polygon, facing_front: bool },
    Front(Polygon),
    Back(Polygon),
    Spanning {
        front: Option<Polygon>,
        back: Option<Polygon>,
    },
}

/// Oriented plane `normal · p = w`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f64>,
    pub w: f64,
}

impl Plane {
    /// Plane through three counter-clockwise points, `None` when they are collinear
    pub fn from_points(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Self> {
        let normal = (b - a).cross(&(c - a)).try_normalize(f64::EPSILON)?;
        Some(Self {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            w: -self.w,
        }
    }

    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) - self.w
    }

    pub fn classify_point(&self, point: &Point3<f64>, epsilon: f64) -> Classification {
        let distance = self.signed_distance(point);
        if distance > epsilon {
            Classification::Front
        } else if distance < -epsilon {
            Classification::Back
        } else {
            Classification::Coplanar
        }
    }

    /// Split a polygon by this plane
    ///
    /// Pieces keep the plane of the polygon they were cut from. Pieces with
    /// fewer than three vertices are dropped.
    pub fn split(&self, polygon: Polygon, epsilon: f64) -> Split {
        let types: Vec<Classification> = polygon
            .vertices
            .iter()
            .map(|vertex| self.classify_point(vertex, epsilon))
            .collect();
        let kind = types
            .iter()
            .fold(Classification::Coplanar, |acc, &side| acc.combine(side));

        match kind {
            Classification::Coplanar => {
                let facing_front = self.normal.dot(&polygon.plane.normal) > 0.0;
                Split::Coplanar {
                    polygon,
                    facing_front,
                }
            }
            Classification::Front => Split::Front(polygon),
            Classification::Back => Split::Back(polygon),
            Classification::Spanning => {
                let count = polygon.vertices.len();
                let mut front = Vec::with_capacity(count + 1);
                let mut back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);

                    if ti != Classification::Back {
                        front.push(vi);
                    }
                    if ti != Classification::Front {
                        back.push(vi);
                    }
                    if ti.combine(tj) == Classification::Spanning {
                        let t = (self.w - self.normal.dot(&vi.coords))
                            / self.normal.dot(&(vj - vi));
                        let crossing = vi + (vj - vi) * t;
                        front.push(crossing);
                        back.push(crossing);
                    }
                }

                Split::Spanning {
                    front: Polygon::with_plane(front, polygon.plane),
                    back: Polygon::with_plane(back, polygon.plane),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-5;

    fn xy_plane() -> Plane {
        Plane {
            normal: Vector3::z(),
            w: 0.0,
        }
    }

    fn square_at_x(x: f64, z0: f64, z1: f64) -> Polygon {
        Polygon::new(vec![
            Point3::new(x, 0.0, z0),
            Point3::new(x, 1.0, z0),
            Point3::new(x, 1.0, z1),
            Point3::new(x, 0.0, z1),
        ])
        .unwrap()
    }

    #[test]
    fn test_plane_from_points() {
        let plane = Plane::from_points(
            &Point3::new(0.0, 0.0, 2.0),
            &Point3::new(1.0, 0.0, 2.0),
            &Point3::new(0.0, 1.0, 2.0),
        )
        .unwrap();

        assert_relative_eq!(plane.normal, Vector3::z());
        assert_relative_eq!(plane.w, 2.0);
        let collinear = [0.0, 1.0, 2.0].map(|x| Point3::new(x, 0.0, 0.0));
        assert!(Plane::from_points(&collinear[0], &collinear[1], &collinear[2]).is_none());
    }

    #[test]
    fn test_classify_point() {
        let plane = xy_plane();
        let above = Point3::new(0.0, 0.0, 1.0);
        assert_eq!(plane.classify_point(&above, EPSILON), Classification::Front);
        assert_eq!(plane.flipped().classify_point(&above, EPSILON), Classification::Back);
        assert_eq!(
            plane.classify_point(&Point3::new(0.0, 0.0, -1.0), EPSILON),
            Classification::Back
        );
        assert_eq!(
            plane.classify_point(&Point3::new(5.0, 5.0, 1e-7), EPSILON),
            Classification::Coplanar
        );
    }

    #[test]
    fn test_split_spanning_polygon() {
        let polygon = square_at_x(0.0, -1.0, 3.0);
        let parent = polygon.plane;

        match xy_plane().split(polygon, EPSILON) {
            Split::Spanning {
                front: Some(front),
                back: Some(back),
            } => {
                assert_eq!(front.vertices.len(), 4);
                assert_eq!(back.vertices.len(), 4);
                assert!(front.vertices.iter().all(|v| v.z >= 0.0));
                assert!(back.vertices.iter().all(|v| v.z <= 0.0));
                let height = |p: &Polygon| {
                    let (low, high) = p.vertices.iter().fold((f64::MAX, f64::MIN), |(l, h), v| {
                        (l.min(v.z), h.max(v.z))
                    });
                    high - low
                };
                assert_relative_eq!(height(&front), 3.0, epsilon = 1e-12);
                assert_relative_eq!(height(&back), 1.0, epsilon = 1e-12);
                assert_eq!(front.plane, parent);
            }
            other => panic!("expected a spanning split, got {other:?}"),
        }
    }

    #[test]
    fn test_split_one_sided_and_coplanar() {
        let plane = xy_plane();
        assert!(matches!(plane.split(square_at_x(0.0, 1.0, 2.0), EPSILON), Split::Front(_)));
        assert!(matches!(plane.split(square_at_x(0.0, -2.0, 0.0), EPSILON), Split::Back(_)));

        let floor = Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ])
        .unwrap();
        assert!(matches!(
            plane.split(floor, EPSILON),
            Split::Coplanar { facing_front: false, .. }
        ));
    }
}
