//! Centripetal Catmull-Rom curves through edge routing points, emitted as
//! SVG path data.

use crate::layout::Point;

use super::num;

const EPSILON: f64 = 1e-12;

/// Curve parameter; 0.5 is the centripetal variant.
pub const ALPHA: f64 = 0.5;

/// Path data for a smooth curve through `points`.
///
/// Two points give a straight line; each further point adds one cubic
/// Bézier segment whose tangents follow the neighboring points.
pub fn catmull_rom_path(points: &[Point]) -> String {
    match points {
        [] => String::new(),
        [p] => format!("M{},{}", num(p.x), num(p.y)),
        [p0, p1] => format!(
            "M{},{}L{},{}",
            num(p0.x),
            num(p0.y),
            num(p1.x),
            num(p1.y)
        ),
        _ => {
            let mut d = format!("M{},{}", num(points[0].x), num(points[0].y));
            for i in 0..points.len() - 1 {
                let before = i.checked_sub(1).map(|j| points[j]);
                let after = points.get(i + 2).copied();
                let (c1, c2) = control_points(before, points[i], points[i + 1], after);
                let end = points[i + 1];
                d.push_str(&format!(
                    "C{},{},{},{},{},{}",
                    num(c1.x),
                    num(c1.y),
                    num(c2.x),
                    num(c2.y),
                    num(end.x),
                    num(end.y)
                ));
            }
            d
        }
    }
}

/// `|b - a|^(2·ALPHA)`, and its square root.
fn knot(a: Point, b: Point) -> (f64, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let l2a = (dx * dx + dy * dy).powf(ALPHA);
    (l2a.sqrt(), l2a)
}

/// Bézier control points for the segment `p1 → p2`.
///
/// A missing neighbor (curve start or end) leaves that control point on the
/// segment endpoint.
fn control_points(p0: Option<Point>, p1: Point, p2: Point, p3: Option<Point>) -> (Point, Point) {
    let (l12_a, l12_2a) = knot(p1, p2);

    let mut c1 = p1;
    if let Some(p0) = p0 {
        let (l01_a, l01_2a) = knot(p0, p1);
        if l01_a > EPSILON {
            let a = 2.0 * l01_2a + 3.0 * l01_a * l12_a + l12_2a;
            let n = 3.0 * l01_a * (l01_a + l12_a);
            c1 = Point::new(
                (p1.x * a - p0.x * l12_2a + p2.x * l01_2a) / n,
                (p1.y * a - p0.y * l12_2a + p2.y * l01_2a) / n,
            );
        }
    }

    let mut c2 = p2;
    if let Some(p3) = p3 {
        let (l23_a, l23_2a) = knot(p2, p3);
        if l23_a > EPSILON {
            let b = 2.0 * l23_2a + 3.0 * l23_a * l12_a + l12_2a;
            let m = 3.0 * l23_a * (l23_a + l12_a);
            c2 = Point::new(
                (p2.x * b + p1.x * l23_2a - p3.x * l12_2a) / m,
                (p2.y * b + p1.y * l23_2a - p3.y * l12_2a) / m,
            );
        }
    }

    (c1, c2)
}
