//! Segment grouping and winner selection
//!
//! A flat segment list for one (entity, reference) pair may mix several
//! alignment attempts: a single alignment split into non-overlapping pieces,
//! plus competing or duplicate alignments covering the same entity region.
//! [`split_into_groups`] partitions the list so that each group reads as one
//! coherent alignment, and [`select_covering_group`] picks the group covering
//! the most entity residues.

use tracing::warn;

use super::model::AlignmentSegment;

/// One partitioned alignment attempt: ordered segments that do not overlap
/// each other on the entity sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentGroup {
    pub segments: Vec<AlignmentSegment>,
}

impl AlignmentGroup {
    fn new(first: AlignmentSegment) -> Self {
        Self {
            segments: vec![first],
        }
    }

    /// Total entity residues covered by this group
    pub fn coverage_length(&self) -> i64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    fn accepts(&self, candidate: &AlignmentSegment) -> bool {
        self.segments.iter().all(|s| !s.overlaps_entity(candidate))
    }
}

/// Partition segments into disjoint alignment attempts.
///
/// Each segment joins the first existing group it does not overlap on entity
/// coordinates; a segment overlapping every group so far starts a new,
/// competing group. Input order is preserved within groups and across group
/// creation, so downstream tie-breaks are deterministic.
pub fn split_into_groups(segments: &[AlignmentSegment]) -> Vec<AlignmentGroup> {
    let mut groups: Vec<AlignmentGroup> = Vec::new();
    for segment in segments {
        match groups.iter_mut().find(|g| g.accepts(segment)) {
            Some(group) => group.segments.push(segment.clone()),
            None => groups.push(AlignmentGroup::new(segment.clone())),
        }
    }
    groups
}

/// Select the alignment attempt with the greatest entity coverage.
///
/// Ties go to the first-encountered group. A group whose coverage is not
/// positive indicates mismatched begin/length fields upstream; it is logged
/// and excluded rather than failing the entity. Returns `None` when no group
/// survives.
pub fn select_covering_group(
    context: &str,
    segments: &[AlignmentSegment],
) -> Option<Vec<AlignmentSegment>> {
    let mut best: Option<AlignmentGroup> = None;
    for group in split_into_groups(segments) {
        let coverage = group.coverage_length();
        if coverage <= 0 {
            warn!(
                "Skipping inconsistent alignment group for {} (coverage {})",
                context, coverage
            );
            continue;
        }
        let replace = match best {
            Some(ref current) => coverage > current.coverage_length(),
            None => true,
        };
        if replace {
            best = Some(group);
        }
    }
    best.map(|g| g.segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(entity_beg: i64, length: i64) -> AlignmentSegment {
        AlignmentSegment {
            database_name: "UNP".to_string(),
            database_accession: "P01901".to_string(),
            database_isoform: None,
            entity_beg,
            database_beg: entity_beg,
            length,
        }
    }

    #[test]
    fn test_split_alignment_stays_in_one_group() {
        let segments = vec![segment(1, 100), segment(101, 100)];
        let groups = split_into_groups(&segments);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].segments.len(), 2);
        assert_eq!(groups[0].coverage_length(), 200);
    }

    #[test]
    fn test_competing_duplicates_form_separate_groups() {
        let segments = vec![segment(1, 100), segment(1, 90)];
        let groups = split_into_groups(&segments);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].coverage_length(), 100);
        assert_eq!(groups[1].coverage_length(), 90);
    }

    #[test]
    fn test_longest_coverage_wins() {
        // group 1: 1-100 + 101-120 = 120 residues; group 2: 1-45 = 45
        let segments = vec![segment(1, 100), segment(1, 45), segment(101, 20)];
        let winner = select_covering_group("test", &segments).unwrap();
        assert_eq!(winner.len(), 2);
        assert_eq!(winner.iter().map(|s| s.length).sum::<i64>(), 120);
    }

    #[test]
    fn test_tie_goes_to_first_group() {
        let first = segment(1, 100);
        let second = segment(5, 100);
        let winner = select_covering_group("test", &[first.clone(), second]).unwrap();
        assert_eq!(winner, vec![first]);
    }

    #[test]
    fn test_nonpositive_coverage_rejected() {
        assert!(select_covering_group("test", &[segment(10, -5)]).is_none());
    }

    #[test]
    fn test_nonpositive_group_does_not_block_others() {
        let good = segment(1, 50);
        let winner = select_covering_group("test", &[segment(1, -5), good.clone()]).unwrap();
        assert_eq!(winner, vec![good]);
    }

    #[test]
    fn test_empty_input() {
        assert!(select_covering_group("test", &[]).is_none());
        assert!(split_into_groups(&[]).is_empty());
    }
}
