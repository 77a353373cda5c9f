use std::collections::HashMap;

use bevy::math::DVec3;

use crate::engine::assets::drillhole::DrillholeSegment;
use crate::engine::presentation::step::Dataset;

/// Segments of one drillhole, ordered by `depth_from`.
#[derive(Debug, Clone, PartialEq)]
pub struct HoleGroup {
    pub hole_id: String,
    pub segments: Vec<DrillholeSegment>,
}

/// Group segments by hole, keeping first-seen hole order.
///
/// Every segment lands in exactly one group. Within a hole, segments are
/// stably sorted by `depth_from`, so input order breaks ties.
pub fn group_by_hole(segments: &[DrillholeSegment]) -> Vec<HoleGroup> {
    let mut groups: Vec<HoleGroup> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for segment in segments {
        let slot = *slots.entry(segment.hole_id.as_str()).or_insert_with(|| {
            groups.push(HoleGroup {
                hole_id: segment.hole_id.clone(),
                segments: Vec::new(),
            });
            groups.len() - 1
        });

        groups[slot].segments.push(segment.clone());
    }

    for group in &mut groups {
        group
            .segments
            .sort_by(|a, b| a.depth_from.total_cmp(&b.depth_from));
    }

    groups
}

/// Both drillhole record collections, raw and grouped.
#[derive(Debug, Clone, Default)]
pub struct DrillholeIndex {
    lithology: Vec<DrillholeSegment>,
    assay: Vec<DrillholeSegment>,
    lithology_groups: Vec<HoleGroup>,
    assay_groups: Vec<HoleGroup>,
}

impl DrillholeIndex {
    pub fn new(lithology: Vec<DrillholeSegment>, assay: Vec<DrillholeSegment>) -> Self {
        let lithology_groups = group_by_hole(&lithology);
        let assay_groups = group_by_hole(&assay);
        Self {
            lithology,
            assay,
            lithology_groups,
            assay_groups,
        }
    }

    /// Stored records, including ones excluded from rendering.
    pub fn segments(&self, dataset: Dataset) -> &[DrillholeSegment] {
        match dataset {
            Dataset::Lithology => &self.lithology,
            Dataset::Assay => &self.assay,
        }
    }

    pub fn groups(&self, dataset: Dataset) -> &[HoleGroup] {
        match dataset {
            Dataset::Lithology => &self.lithology_groups,
            Dataset::Assay => &self.assay_groups,
        }
    }

    /// Segments with a positive depth span, hole by hole.
    pub fn renderable_segments(&self, dataset: Dataset) -> impl Iterator<Item = &DrillholeSegment> {
        self.groups(dataset)
            .iter()
            .flat_map(|group| group.segments.iter())
            .filter(|segment| segment.has_positive_length())
    }

    /// Reference points of every stored segment across both collections.
    pub fn reference_points(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.lithology
            .iter()
            .chain(self.assay.iter())
            .map(DrillholeSegment::reference_point)
    }

    pub fn hole_count(&self, dataset: Dataset) -> usize {
        self.groups(dataset).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(hole: &str, from: f64, to: f64) -> DrillholeSegment {
        DrillholeSegment {
            hole_id: hole.to_string(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            depth_from: from,
            depth_to: to,
            lithology: None,
            grade: None,
        }
    }

    #[test]
    fn test_shared_hole_keeps_insertion_order() {
        let groups = group_by_hole(&[segment("DH-01", 0.0, 10.0), segment("DH-01", 10.0, 25.0)]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].hole_id, "DH-01");
        assert_eq!(groups[0].segments[0].depth_to, 10.0);
        assert_eq!(groups[0].segments[1].depth_to, 25.0);
    }

    #[test]
    fn test_groups_partition_every_segment() {
        let data = vec![
            segment("A", 0.0, 5.0),
            segment("B", 0.0, 3.0),
            segment("A", 5.0, 9.0),
            segment("C", 1.0, 2.0),
            segment("B", 3.0, 4.0),
            segment("C", 6.0, 6.0),
        ];
        let groups = group_by_hole(&data);

        let keys: Vec<&str> = groups.iter().map(|g| g.hole_id.as_str()).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);

        let total: usize = groups.iter().map(|g| g.segments.len()).sum();
        assert_eq!(total, data.len());
        for s in &data {
            let owners = groups
                .iter()
                .filter(|g| g.segments.contains(s))
                .count();
            assert_eq!(owners, 1);
            let owner = groups.iter().find(|g| g.segments.contains(s)).unwrap();
            assert_eq!(owner.hole_id, s.hole_id);
        }
    }

    #[test]
    fn test_segments_sorted_by_depth() {
        let groups = group_by_hole(&[segment("A", 20.0, 30.0), segment("A", 0.0, 20.0)]);
        assert_eq!(groups[0].segments[0].depth_from, 0.0);
        assert_eq!(groups[0].segments[1].depth_from, 20.0);
    }

    #[test]
    fn test_non_positive_spans_are_grouped_but_not_rendered() {
        let data = vec![
            segment("A", 10.0, 10.0),
            segment("A", 12.0, 11.0),
            segment("A", 0.0, 4.0),
            segment("Z", 3.0, 3.0),
        ];
        let index = DrillholeIndex::new(data.clone(), Vec::new());

        assert_eq!(index.segments(Dataset::Lithology).len(), 4);
        assert_eq!(index.renderable_segments(Dataset::Lithology).count(), 1);
        let keys: Vec<&str> = index
            .groups(Dataset::Lithology)
            .iter()
            .map(|g| g.hole_id.as_str())
            .collect();
        assert_eq!(keys, vec!["A", "Z"]);
        assert_eq!(index.groups(Dataset::Lithology)[0].segments.len(), 3);
        assert_eq!(index.groups(Dataset::Lithology)[1].segments.len(), 1);
    }

    #[test]
    fn test_reference_points_span_both_collections() {
        let index = DrillholeIndex::new(
            vec![segment("A", 0.0, 1.0)],
            vec![segment("B", 0.0, 1.0), segment("B", 1.0, 2.0)],
        );
        assert_eq!(index.reference_points().count(), 3);
        assert_eq!(index.hole_count(Dataset::Assay), 1);
    }
}
