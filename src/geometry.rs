//! Planar geometry for zone membership tests.

use serde::Deserialize;

use crate::error::{Error, Result};

/// A point in frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from(v: [f32; 2]) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// A simple polygon, implicitly closed (last vertex connects to the first).
///
/// Geometry is immutable after construction. Self-intersection is not
/// checked; the membership test assumes a simple polygon.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Build a polygon from at least 3 vertices.
    pub fn new(vertices: Vec<Point>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::configuration(format!(
                "polygon requires at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Arithmetic mean of the vertices. Used for placing zone labels.
    pub fn centroid(&self) -> Point {
        let n = self.vertices.len() as f32;
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), v| (sx + v.x, sy + v.y));
        Point::new(sx / n, sy / n)
    }

    /// Ray-casting membership test, O(V).
    ///
    /// Boundary rule: a point exactly on an edge (or vertex) counts as
    /// inside. Edge membership is tested explicitly before crossings are
    /// counted, so the rule holds regardless of ray direction.
    pub fn contains(&self, p: Point) -> bool {
        let n = self.vertices.len();
        let mut inside = false;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];

            if on_segment(p, a, b) {
                return true;
            }

            // Horizontal ray toward +x; half-open edge interval avoids
            // double-counting at shared vertices.
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

const EDGE_EPSILON: f32 = 1e-6;

/// True when `p` lies on the closed segment `ab`.
fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if cross.abs() > EDGE_EPSILON * (b.x - a.x).hypot(b.y - a.y).max(1.0) {
        return false;
    }
    let within_x = p.x >= a.x.min(b.x) - EDGE_EPSILON && p.x <= a.x.max(b.x) + EDGE_EPSILON;
    let within_y = p.y >= a.y.min(b.y) - EDGE_EPSILON && p.y <= a.y.max(b.y) + EDGE_EPSILON;
    within_x && within_y
}
