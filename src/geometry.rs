//! Polygon math shared by the contour filter and the ROI builder.
//!
//! Contour-level functions work on integer pixel coordinates as returned by
//! `imageproc::contours`; quadrilateral-level functions work on [`Point2`].
//! Signed areas use image coordinates (y down), so a positive area means the
//! polygon winds clockwise on screen.

use imageproc::point::Point;

use crate::models::Point2;

/// Shoelace area, signed. Positive for clockwise-on-screen winding.
pub fn signed_area(poly: &[Point<i32>]) -> f64 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let twice: i64 = (0..n)
        .map(|i| {
            let a = poly[i];
            let b = poly[(i + 1) % n];
            a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
        })
        .sum();
    twice as f64 / 2.0
}

pub fn area(poly: &[Point<i32>]) -> f64 {
    signed_area(poly).abs()
}

/// Length of the closed polyline through `poly`.
pub fn perimeter(poly: &[Point<i32>]) -> f64 {
    let n = poly.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| {
            let a = poly[i];
            let b = poly[(i + 1) % n];
            ((b.x - a.x) as f64).hypot((b.y - a.y) as f64)
        })
        .sum()
}

/// Rotate a closed contour to start at its raster-first point and make it
/// wind clockwise on screen. Traversal order is otherwise preserved.
pub fn normalize_winding(points: &mut [Point<i32>]) {
    let Some(first) = points
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| (p.y, p.x))
        .map(|(i, _)| i)
    else {
        return;
    };
    points.rotate_left(first);
    if signed_area(points) < 0.0 {
        points[1..].reverse();
    }
}

/// Drop points lying on a straight run between their neighbours, keeping
/// only the corners of the boundary chain.
pub fn compress_chain(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let compressed: Vec<Point<i32>> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            let (dx0, dy0) = (cur.x - prev.x, cur.y - prev.y);
            let (dx1, dy1) = (next.x - cur.x, next.y - cur.y);
            dx0 as i64 * dy1 as i64 != dy0 as i64 * dx1 as i64 || dx0 * dx1 + dy0 * dy1 < 0
        })
        .map(|i| points[i])
        .collect();
    if compressed.is_empty() {
        points[..1].to_vec()
    } else {
        compressed
    }
}

#[derive(Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

/// Douglas-Peucker simplification of a closed contour.
///
/// The first split runs between a start point and the point farthest from it,
/// refined over three passes so the split does not depend on where tracing
/// began. Span indices are unwrapped and taken modulo the contour length.
pub fn approx_poly_dp(contour: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let n = contour.len();
    if n == 0 {
        return Vec::new();
    }
    let eps_sq = epsilon * epsilon;
    let at = |i: usize| contour[i % n];

    let farthest_from = |origin: usize| {
        let o = contour[origin];
        (1..n).fold((0, 0.0), |(far, best), j| {
            let p = at(origin + j);
            let (dx, dy) = ((p.x - o.x) as f64, (p.y - o.y) as f64);
            let d = dx * dx + dy * dy;
            if d > best { (j, d) } else { (far, best) }
        })
    };

    let mut start = 0;
    let (mut far, mut max_dist) = farthest_from(start);
    for _ in 0..2 {
        start = (start + far) % n;
        (far, max_dist) = farthest_from(start);
    }

    if max_dist <= eps_sq {
        return vec![contour[start]];
    }

    let mut poly = Vec::new();
    let mut stack = vec![
        Span {
            start: start + far,
            end: start + n,
        },
        Span {
            start,
            end: start + far,
        },
    ];

    while let Some(span) = stack.pop() {
        let first = at(span.start);
        if span.end <= span.start + 1 {
            poly.push(first);
            continue;
        }

        let last = at(span.end);
        let (dx, dy) = ((last.x - first.x) as f64, (last.y - first.y) as f64);
        let mut split = span.start;
        let mut max_dev = 0.0;
        for i in (span.start + 1)..span.end {
            let p = at(i);
            let dev = ((p.y - first.y) as f64 * dx - (p.x - first.x) as f64 * dy).abs();
            if dev > max_dev {
                max_dev = dev;
                split = i;
            }
        }

        if max_dev * max_dev <= eps_sq * (dx * dx + dy * dy) {
            poly.push(first);
        } else {
            stack.push(Span {
                start: split,
                end: span.end,
            });
            stack.push(Span {
                start: span.start,
                end: split,
            });
        }
    }

    poly
}

/// True when every turn has the same sign. Collinear turns count as non-convex.
pub fn is_convex(poly: &[Point<i32>]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut orientation = 0u8;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        let c = poly[(i + 2) % n];
        let cross = (b.x - a.x) as i64 * (c.y - b.y) as i64
            - (b.y - a.y) as i64 * (c.x - b.x) as i64;
        orientation |= match cross.signum() {
            1 => 1,
            -1 => 2,
            _ => 3,
        };
        if orientation == 3 {
            return false;
        }
    }
    true
}

/// Centroid from the first-order moments of the polygon. `None` when the
/// zeroth moment (area) is effectively zero.
pub fn centroid(poly: &[Point2]) -> Option<Point2> {
    let n = poly.len();
    let (mut m00, mut m10, mut m01) = (0.0, 0.0, 0.0);
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        let cross = a.x * b.y - b.x * a.y;
        m00 += cross;
        m10 += (a.x + b.x) * cross;
        m01 += (a.y + b.y) * cross;
    }
    m00 *= 0.5;
    if m00.abs() < 1e-9 {
        return None;
    }
    Some(Point2::new(m10 / (6.0 * m00), m01 / (6.0 * m00)))
}
