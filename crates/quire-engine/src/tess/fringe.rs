//! Outward anti-aliasing band along the boundary of a covered region.
//!
//! Boundaries are walked with the covered side on the positive side of each
//! directed edge (`edge.cross(to_inside) > 0`). The band is `width` wide,
//! starts at full coverage on the boundary and fades to zero outside it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use core::f32::consts::FRAC_PI_4;

use crate::coords::Vec2;

use super::{MeshSink, Vertex};

/// Normals closer than 120 degrees share a mitered offset (length at most 2).
const MITER_MIN_DOT: f32 = -0.5;

/// Largest angle covered by one triangle of a corner fan.
const FAN_STEP: f32 = FRAC_PI_4;

/// Grid used to merge mesh vertices that share a position.
const WELD_SCALE: f32 = 1.0e4;

const MIN_AREA2: f32 = 1e-7;

#[derive(Debug, Copy, Clone, PartialEq)]
enum Corner {
    /// Both edges end their band on this offset.
    Miter(Vec2),
    /// Each edge keeps its own normal; convex gaps get a fan.
    Split,
}

fn outward(a: Vec2, b: Vec2) -> Vec2 {
    let d = (b - a).normalized();
    Vec2::new(d.y, -d.x)
}

fn corner(n_in: Vec2, n_out: Vec2) -> Corner {
    let dot = n_in.dot(n_out);
    if dot >= MITER_MIN_DOT {
        Corner::Miter((n_in + n_out) / (1.0 + dot))
    } else {
        Corner::Split
    }
}

#[inline]
fn offset(corner: Option<Corner>, own: Vec2) -> Vec2 {
    match corner {
        Some(Corner::Miter(m)) => m,
        _ => own,
    }
}

/// Closes the gap between two split bands at a convex corner with a small fan.
fn bridge(sink: &mut MeshSink<'_>, p: Vec2, n_in: Vec2, n_out: Vec2, width: f32) {
    let sweep = n_in.cross(n_out).atan2(n_in.dot(n_out));
    // Reflex corner: the two bands already overlap.
    if !(sweep > 0.0) {
        return;
    }
    let steps = (sweep / FAN_STEP).ceil().max(1.0) as usize;
    let step = sweep / steps as f32;
    let mut prev = n_in;
    for k in 1..=steps {
        let next = if k == steps { n_out } else { n_in.rotated(step * k as f32) };
        sink.tri(
            Vertex::solid(p),
            Vertex::clear(p + prev * width),
            Vertex::clear(p + next * width),
        );
        prev = next;
    }
}

/// Fringe around one closed polygon, covered side positive.
pub(crate) fn fringe_loop(sink: &mut MeshSink<'_>, pts: &[Vec2], width: f32) {
    let n = pts.len();
    if n < 3 || !(width > 0.0) {
        return;
    }
    let normals: Vec<Vec2> = (0..n).map(|i| outward(pts[i], pts[(i + 1) % n])).collect();
    let corners: Vec<Corner> = (0..n)
        .map(|i| corner(normals[(i + n - 1) % n], normals[i]))
        .collect();

    for i in 0..n {
        let j = (i + 1) % n;
        let own = normals[i];
        let start = offset(Some(corners[i]), own);
        let end = offset(Some(corners[j]), own);
        sink.fringe(pts[i], pts[j], pts[i] + start * width, pts[j] + end * width);
        if corners[i] == Corner::Split {
            bridge(sink, pts[i], normals[(i + n - 1) % n], own, width);
        }
    }
}

/// Fringe around the boundary of an indexed triangle mesh.
///
/// Vertices sharing a position are merged first. A boundary edge is one not
/// cancelled by an opposite-facing triangle edge, so overlapping or stacked
/// triangles never produce a band inside the covered area. Corners are
/// mitered where exactly one boundary edge enters and one leaves a vertex.
pub(crate) fn fringe_mesh(sink: &mut MeshSink<'_>, positions: &[Vec2], indices: &[u32], width: f32) {
    if !(width > 0.0) {
        return;
    }

    let mut welded: HashMap<(i64, i64), u32> = HashMap::with_capacity(positions.len());
    let mut points: Vec<Vec2> = Vec::with_capacity(positions.len());
    let remap: Vec<u32> = positions
        .iter()
        .map(|&p| {
            let key = ((p.x * WELD_SCALE).round() as i64, (p.y * WELD_SCALE).round() as i64);
            *welded.entry(key).or_insert_with(|| {
                points.push(p);
                (points.len() - 1) as u32
            })
        })
        .collect();

    // Net count per undirected edge; `order` keeps output deterministic.
    let mut net: HashMap<(u32, u32), i32> = HashMap::with_capacity(indices.len());
    let mut order: Vec<(u32, u32)> = Vec::with_capacity(indices.len());
    for tri in indices.chunks_exact(3) {
        let (Some(&a), Some(&b), Some(&c)) = (
            remap.get(tri[0] as usize),
            remap.get(tri[1] as usize),
            remap.get(tri[2] as usize),
        ) else {
            continue;
        };
        let (pa, pb, pc) = (points[a as usize], points[b as usize], points[c as usize]);
        let area2 = (pb - pa).cross(pc - pa);
        if !(area2.abs() > MIN_AREA2) {
            continue;
        }
        let (b, c) = if area2 > 0.0 { (b, c) } else { (c, b) };
        for (u, v) in [(a, b), (b, c), (c, a)] {
            let (key, dir) = if u < v { ((u, v), 1) } else { ((v, u), -1) };
            match net.entry(key) {
                Entry::Occupied(mut e) => *e.get_mut() += dir,
                Entry::Vacant(e) => {
                    e.insert(dir);
                    order.push(key);
                }
            }
        }
    }

    let edges: Vec<(usize, usize)> = order
        .iter()
        .filter_map(|&(u, v)| match net.get(&(u, v)).copied().unwrap_or(0) {
            0 => None,
            n if n > 0 => Some((u as usize, v as usize)),
            _ => Some((v as usize, u as usize)),
        })
        .collect();
    if edges.is_empty() {
        return;
    }

    let count = points.len();
    let mut entering: Vec<Option<usize>> = vec![None; count];
    let mut leaving: Vec<Option<usize>> = vec![None; count];
    let mut in_degree = vec![0u32; count];
    let mut out_degree = vec![0u32; count];
    for (k, &(u, v)) in edges.iter().enumerate() {
        leaving[u] = Some(k);
        out_degree[u] += 1;
        entering[v] = Some(k);
        in_degree[v] += 1;
    }

    let normals: Vec<Vec2> = edges.iter().map(|&(u, v)| outward(points[u], points[v])).collect();
    let corners: Vec<Option<Corner>> = (0..count)
        .map(|v| match (entering[v], leaving[v]) {
            (Some(i), Some(o)) if in_degree[v] == 1 && out_degree[v] == 1 => {
                Some(corner(normals[i], normals[o]))
            }
            _ => None,
        })
        .collect();

    for (k, &(u, v)) in edges.iter().enumerate() {
        let own = normals[k];
        let start = offset(corners[u], own);
        let end = offset(corners[v], own);
        sink.fringe(points[u], points[v], points[u] + start * width, points[v] + end * width);
    }
    for v in 0..count {
        if let (Some(Corner::Split), Some(i), Some(o)) = (corners[v], entering[v], leaving[v]) {
            bridge(sink, points[v], normals[i], normals[o], width);
        }
    }
}
