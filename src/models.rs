use std::ops::{Add, Mul, Sub};

use image::GrayImage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Rotate by 90 degrees: (x, y) -> (-y, x).
    pub fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn as_f32(self) -> (f32, f32) {
        (self.x as f32, self.y as f32)
    }
}

impl Add for Point2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// A convex 4-vertex polygon approximating one detected contour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    pub vertices: [Point2; 4],
    /// Area of the source contour, in square pixels.
    pub area: f64,
}

impl Quadrilateral {
    pub fn new(vertices: [Point2; 4], area: f64) -> Self {
        Self { vertices, area }
    }

    /// Edge `index` runs from vertex `index` to vertex `index + 1` (wrapping).
    /// Indices above 3 are clamped.
    pub fn edge(&self, index: usize) -> Edge {
        let i = index.min(3);
        Edge {
            start: self.vertices[i],
            end: self.vertices[(i + 1) % 4],
        }
    }
}

/// A quadrilateral edge; every property is derived from its endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Point2,
    pub end: Point2,
}

impl Edge {
    pub fn direction(&self) -> Point2 {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// Unit perpendicular of the direction, or `None` for a zero-length edge.
    pub fn unit_normal(&self) -> Option<Point2> {
        let normal = self.direction().perpendicular();
        let len = normal.length();
        if len < f64::EPSILON {
            return None;
        }
        Some(normal * (1.0 / len))
    }

    pub fn midpoint(&self) -> Point2 {
        self.start.midpoint(self.end)
    }
}

/// Oriented ROI region: `[start, end, end + offset, start + offset]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionPolygon {
    pub points: [Point2; 4],
}

impl SelectionPolygon {
    /// `(min_x, min_y, max_x, max_y)` of the four points.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.points.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), p| {
                (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
            },
        )
    }

    /// Length of the side lying on the selected edge.
    pub fn edge_length(&self) -> f64 {
        (self.points[1] - self.points[0]).length()
    }
}

/// Top-left of an ROI in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoiLocation {
    pub x: i64,
    pub y: i64,
}

/// One extracted ROI plus the geometry it came from.
#[derive(Debug, Clone)]
pub struct RoiRecord {
    pub image: GrayImage,
    pub width: u32,
    pub height: u32,
    /// Centroid of the source quadrilateral.
    pub center: Point2,
    pub edge_index: usize,
    pub quadrilateral: [Point2; 4],
    pub selection: [Point2; 4],
    pub location: RoiLocation,
    pub area: f64,
}
