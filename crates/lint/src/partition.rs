//! Region partitioning: cells → maximal same-fingerprint rectangles.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use gridlint_core::{Rectangle, Vector};

use crate::model::{Fingerprint, FingerprintMap, Groups};

/// Group cells by fingerprint, collapse vertical runs, then merge.
pub fn identify_groups(fingerprints: &FingerprintMap, merge_iteration_cap: usize) -> Groups {
    let mut by_fingerprint: Groups = BTreeMap::new();
    for (fp, cells) in group_cells(fingerprints) {
        let runs = vertical_runs(&cells);
        by_fingerprint.insert(fp, merge_individual_groups(runs, merge_iteration_cap));
    }
    by_fingerprint
}

/// Cell addresses per fingerprint, each list sorted column-major.
fn group_cells(fingerprints: &FingerprintMap) -> BTreeMap<Fingerprint, Vec<Vector>> {
    let mut groups: BTreeMap<Fingerprint, Vec<Vector>> = BTreeMap::new();
    for (address, fp) in fingerprints {
        groups.entry(*fp).or_default().push(*address);
    }
    for cells in groups.values_mut() {
        cells.sort_by_key(|v| (v.x, v.y));
    }
    groups
}

/// Collapse column-major sorted cells into single-column rectangles.
pub fn vertical_runs(sorted: &[Vector]) -> Vec<Rectangle> {
    let mut out = Vec::new();
    let Some((&first, rest)) = sorted.split_first() else {
        return out;
    };

    let (mut start, mut end) = (first, first);
    for &v in rest {
        if v.x == end.x && v.y == end.y + 1 {
            end = v;
        } else {
            out.push(Rectangle::new(start, end));
            start = v;
            end = v;
        }
    }
    out.push(Rectangle::new(start, end));
    out
}

/// Greedily merge mergeable rectangles until a pass makes no merge.
///
/// Each pass walks the sorted list; every rectangle takes the first later
/// partner it can merge with, provided neither was already merged during
/// this pass. If the loop runs past `cap` passes the group is abandoned and
/// replaced by the single [`Rectangle::INVALID`] sentinel.
pub fn merge_individual_groups(mut group: Vec<Rectangle>, cap: usize) -> Vec<Rectangle> {
    group.sort();
    let mut iterations = 0;

    loop {
        let mut merged = Vec::new();
        let mut deleted: FxHashSet<Rectangle> = FxHashSet::default();

        for (i, head) in group.iter().enumerate() {
            for other in &group[i + 1..] {
                if !head.is_mergeable(other) {
                    continue;
                }
                if deleted.contains(head) || deleted.contains(other) {
                    continue;
                }
                merged.push(head.bounding_box(other));
                deleted.insert(*head);
                deleted.insert(*other);
                break;
            }
        }

        if merged.is_empty() {
            return group;
        }

        merged.extend(group.iter().filter(|r| !deleted.contains(*r)));
        merged.sort();
        group = merged;

        iterations += 1;
        if iterations > cap {
            log::warn!(
                "merge did not converge after {cap} passes, abandoning group of {} rectangles",
                group.len()
            );
            return vec![Rectangle::INVALID];
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn rect(x1: i64, y1: i64, x2: i64, y2: i64) -> Rectangle {
        Rectangle::new(Vector::cell(x1, y1), Vector::cell(x2, y2))
    }

    #[test]
    fn vertical_runs_break_on_gaps_and_columns() {
        let cells = vec![
            Vector::cell(1, 1),
            Vector::cell(1, 2),
            Vector::cell(1, 4),
            Vector::cell(2, 5),
            Vector::cell(2, 6),
        ];
        assert_eq!(
            vertical_runs(&cells),
            vec![rect(1, 1, 1, 2), rect(1, 4, 1, 4), rect(2, 5, 2, 6)]
        );
        assert!(vertical_runs(&[]).is_empty());
    }

    #[test]
    fn merge_side_by_side_columns() {
        let columns = vec![rect(3, 1, 3, 5), rect(1, 1, 1, 5), rect(2, 1, 2, 5)];
        assert_eq!(merge_individual_groups(columns, 2000), vec![rect(1, 1, 3, 5)]);
    }

    #[test]
    fn merge_keeps_unmergeable() {
        let group = vec![rect(1, 1, 1, 5), rect(2, 1, 2, 4), rect(5, 5, 5, 5)];
        assert_eq!(
            merge_individual_groups(group.clone(), 2000),
            vec![rect(1, 1, 1, 5), rect(2, 1, 2, 4), rect(5, 5, 5, 5)]
        );
    }

    #[test]
    fn merge_cap_returns_sentinel() {
        // Needs two passes; a cap of zero abandons after the first.
        let columns = vec![rect(1, 1, 1, 2), rect(2, 1, 2, 2), rect(3, 1, 3, 2)];
        assert_eq!(merge_individual_groups(columns.clone(), 0), vec![Rectangle::INVALID]);
        assert_eq!(merge_individual_groups(columns, 5), vec![rect(1, 1, 3, 2)]);
    }

    #[test]
    fn identify_groups_by_fingerprint() {
        let mut fps = FingerprintMap::default();
        for row in 12..=20 {
            fps.insert(Vector::cell(4, row), Fingerprint::Hash(1));
        }
        fps.insert(Vector::cell(4, 21), Fingerprint::Hash(2));
        let groups = identify_groups(&fps, 2000);
        assert_eq!(groups[&Fingerprint::Hash(1)], vec![rect(4, 12, 4, 20)]);
        assert_eq!(groups[&Fingerprint::Hash(2)], vec![rect(4, 21, 4, 21)]);
    }

    #[test]
    fn partition_covers_every_cell_once() {
        // A checkerboard of three fingerprints plus a solid block.
        let mut fps = FingerprintMap::default();
        for x in 1..=7 {
            for y in 1..=6 {
                let fp = if x >= 5 {
                    Fingerprint::NoDependencies
                } else {
                    Fingerprint::Hash((x + y) % 3)
                };
                fps.insert(Vector::cell(x, y), fp);
            }
        }
        let groups = identify_groups(&fps, 2000);

        for (fp, rects) in &groups {
            let mut seen = BTreeSet::new();
            let mut count = 0;
            for r in rects {
                for cell in r.cells() {
                    seen.insert(cell);
                    count += 1;
                }
            }
            let expected: BTreeSet<Vector> = fps
                .iter()
                .filter(|(_, f)| *f == fp)
                .map(|(v, _)| *v)
                .collect();
            assert_eq!(seen, expected, "fingerprint {fp}");
            assert_eq!(count, expected.len(), "fingerprint {fp} duplicated cells");
        }
        assert_eq!(groups[&Fingerprint::NoDependencies], vec![rect(5, 1, 7, 6)]);
    }
}
