//! Fix-candidate search and the fix metric.
//!
//! For every rectangle, find the adjacent rectangles of *other*
//! fingerprints whose union with it is again a rectangle, and rank each
//! pairing. Groups are indexed by bounding box so that most fingerprints are
//! never examined, and candidate rectangles are found by binary search on
//! their corners rather than by scanning.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashSet;

use gridlint_core::vector::NORM_MULTIPLIER;
use gridlint_core::{Rectangle, Vector};

use crate::config::MetricConfig;
use crate::model::{Fingerprint, Groups, ProposedFix};

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

/// Shannon term `-p log2 p`, zero at `p = 0`.
pub fn entropy(p: f64) -> f64 {
    if p <= 0.0 {
        0.0
    } else {
        -p * p.log2()
    }
}

/// Binary entropy (bits) of splitting `n1 + n2` cells into the two sizes.
pub fn size_entropy(n1: i64, n2: i64) -> f64 {
    let total = (n1 + n2) as f64;
    entropy(n1 as f64 / total) + entropy(n2 as f64 / total)
}

/// Negative normalized entropy of the two sizes: near 0 when very unequal,
/// -1 when equal.
pub fn entropy_drop(n1: i64, n2: i64) -> f64 {
    let total = (n1 + n2) as f64;
    -size_entropy(n1, n2) / total.log2()
}

/// Rank merging `target` (fingerprint value `target_fp`) with `other`.
///
/// More negative means more anomalous: small regions next to much larger
/// ones, with nearby fingerprints, score lowest.
///
/// For a fixed smaller side and distance, a lopsided pair scores below a
/// balanced one: `entropy_drop` approaches -1 as the sizes even out, which
/// shrinks the numerator. A 2-cell region next to 2 cells scores -0.25;
/// next to 12 cells it scores about -0.42.
pub fn fix_metric(
    target_fp: f64,
    target: &Rectangle,
    other_fp: f64,
    other: &Rectangle,
    metric: &MetricConfig,
) -> f64 {
    let n_min = target.area().min(other.area());
    let n_max = target.area().max(other.area());
    let fix_distance =
        ((target_fp - other_fp).abs() / NORM_MULTIPLIER as f64).max(metric.min_fix_distance);
    let drop = entropy_drop(n_min, n_max);
    let ranking = (1.0 + metric.entropy_weight * drop) / (fix_distance * n_min as f64);
    -ranking
}

// ---------------------------------------------------------------------------
// Group index
// ---------------------------------------------------------------------------

/// One group's rectangles, searchable by either corner.
struct GroupIndex {
    /// Sorted by upper-left corner.
    rects: Vec<Rectangle>,
    upper_lefts: Vec<Vector>,
    /// Bottom-right corners, sorted, with their index into `rects`.
    bottom_rights: Vec<(Vector, usize)>,
    bounding_box: Rectangle,
}

impl GroupIndex {
    fn new(group: &[Rectangle]) -> Option<Self> {
        let mut rects: Vec<Rectangle> =
            group.iter().copied().filter(|r| !r.is_invalid()).collect();
        let first = *rects.first()?;
        rects.sort_by_key(|r| (r.upper_left.x, r.upper_left.y));

        let upper_lefts = rects.iter().map(|r| r.upper_left).collect();
        let mut bottom_rights: Vec<(Vector, usize)> = rects
            .iter()
            .enumerate()
            .map(|(i, r)| (r.bottom_right, i))
            .collect();
        bottom_rights.sort();

        let bounding_box = rects.iter().fold(first, |bb, r| bb.bounding_box(r));

        Some(Self {
            rects,
            upper_lefts,
            bottom_rights,
            bounding_box,
        })
    }

    fn by_upper_left(&self, v: Vector) -> Option<Rectangle> {
        self.upper_lefts.binary_search(&v).ok().map(|i| self.rects[i])
    }

    fn by_bottom_right(&self, v: Vector) -> Option<Rectangle> {
        self.bottom_rights
            .binary_search_by_key(&v, |(br, _)| *br)
            .ok()
            .map(|i| self.rects[self.bottom_rights[i].1])
    }

    /// Rectangles of this group that sit flush against `rect` on one side and
    /// share its full edge.
    fn matching_rectangles(&self, rect: &Rectangle) -> Vec<Rectangle> {
        let (x1, y1) = (rect.upper_left.x, rect.upper_left.y);
        let (x2, y2) = (rect.bottom_right.x, rect.bottom_right.y);
        let mut matches = Vec::new();

        // left
        if let Some(r) = self.by_bottom_right(Vector::cell(x1 - 1, y2)) {
            if r.upper_left.y == y1 {
                matches.push(r);
            }
        }
        // up
        if let Some(r) = self.by_bottom_right(Vector::cell(x2, y1 - 1)) {
            if r.upper_left.x == x1 {
                matches.push(r);
            }
        }
        // right
        if let Some(r) = self.by_upper_left(Vector::cell(x2 + 1, y1)) {
            if r.bottom_right.y == y2 {
                matches.push(r);
            }
        }
        // down
        if let Some(r) = self.by_upper_left(Vector::cell(x1, y2 + 1)) {
            if r.bottom_right.x == x2 {
                matches.push(r);
            }
        }
        matches
    }
}

/// True if `rect` could never touch anything inside `bb`.
fn outside_extended_bounds(rect: &Rectangle, bb: &Rectangle) -> bool {
    rect.bottom_right.x + 1 < bb.upper_left.x
        || rect.bottom_right.y + 1 < bb.upper_left.y
        || bb.bottom_right.x + 1 < rect.upper_left.x
        || bb.bottom_right.y + 1 < rect.upper_left.y
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Every mergeable pairing of differently-fingerprinted rectangles, most
/// anomalous first.
pub fn find_all_proposed_fixes(groups: &Groups, metric: &MetricConfig) -> Vec<ProposedFix> {
    let index: BTreeMap<Fingerprint, GroupIndex> = groups
        .iter()
        .filter_map(|(fp, rects)| GroupIndex::new(rects).map(|g| (*fp, g)))
        .collect();

    let mut by_x: Vec<Fingerprint> = index.keys().copied().collect();
    by_x.sort_by_key(|fp| (index[fp].bounding_box.upper_left.x, *fp));
    let mut by_y: Vec<Fingerprint> = index.keys().copied().collect();
    by_y.sort_by_key(|fp| (index[fp].bounding_box.upper_left.y, *fp));

    let mut all = Vec::new();
    for (fp, group) in &index {
        for rect in &group.rects {
            // A box whose upper-left lies past `rect`'s far edge + 1 on either
            // axis is out of reach. Both orderings are sorted on that corner,
            // so the reachable boxes are a prefix of each; scan the shorter.
            let reach_x = by_x.partition_point(|f| {
                index[f].bounding_box.upper_left.x <= rect.bottom_right.x + 1
            });
            let reach_y = by_y.partition_point(|f| {
                index[f].bounding_box.upper_left.y <= rect.bottom_right.y + 1
            });
            let reachable = if reach_x < reach_y {
                &by_x[..reach_x]
            } else {
                &by_y[..reach_y]
            };

            for other_fp in reachable {
                if other_fp == fp {
                    continue;
                }
                let other = &index[other_fp];
                if outside_extended_bounds(rect, &other.bounding_box) {
                    continue;
                }

                for candidate in other.matching_rectangles(rect) {
                    let score = fix_metric(fp.value(), rect, other_fp.value(), &candidate, metric);
                    all.push(ProposedFix::new(score, *rect, candidate));
                }
            }
        }
    }

    let mut fixes = dedup_fixes(all);
    fixes.sort_by(|a, b| a.score.total_cmp(&b.score));
    fixes
}

/// Drop exact repeats (same rectangles, same score), keeping first-seen
/// order.
fn dedup_fixes(fixes: Vec<ProposedFix>) -> Vec<ProposedFix> {
    let mut seen: FxHashSet<(Rectangle, Rectangle, OrderedFloat<f64>)> = FxHashSet::default();
    fixes
        .into_iter()
        .filter(|f| seen.insert((f.rect1, f.rect2, OrderedFloat(f.score))))
        .collect()
}
