//! Drop-target selection for pointer-drag reordering.
//!
//! The UI reports the pointer's vertical coordinate and the vertical centers
//! of the other visible tasks in the target column (the dragged task itself
//! excluded), in list order. The engine answers with the index the task
//! should land at.

/// Computes the insertion index for a dragged task.
///
/// For each candidate, `offset = pointer_y - center`. Among candidates the
/// pointer sits above (negative offset), the one with the offset closest to
/// zero is the first task the pointer has risen above; the drop lands
/// immediately before it. With the pointer below every candidate, or with an
/// empty column, the drop appends.
///
/// The result is always within `0..=centers.len()`, and moves monotonically
/// as the pointer moves.
pub fn insertion_index(pointer_y: f64, centers: &[f64]) -> usize {
    let mut best_offset = f64::NEG_INFINITY;
    let mut best_index = None;

    for (index, center) in centers.iter().enumerate() {
        let offset = pointer_y - center;
        if offset < 0.0 && offset > best_offset {
            best_offset = offset;
            best_index = Some(index);
        }
    }

    best_index.unwrap_or(centers.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_column_appends() {
        assert_eq!(insertion_index(120.0, &[]), 0);
    }

    #[test]
    fn test_pointer_between_candidates() {
        // Centers at 50, 150, 250 with pointer at 120: offsets are
        // 70, -30, -130; -30 is the closest-to-zero negative offset,
        // so the drop lands before the candidate at 150.
        assert_eq!(insertion_index(120.0, &[50.0, 150.0, 250.0]), 1);
    }

    #[test]
    fn test_pointer_above_everything_inserts_first() {
        assert_eq!(insertion_index(10.0, &[50.0, 150.0, 250.0]), 0);
    }

    #[test]
    fn test_pointer_below_everything_appends() {
        assert_eq!(insertion_index(300.0, &[50.0, 150.0, 250.0]), 3);
    }

    #[test]
    fn test_pointer_exactly_on_center_falls_through() {
        // Zero offset is not negative; the pointer has not risen above
        // that candidate, so the drop targets the next one down.
        assert_eq!(insertion_index(150.0, &[50.0, 150.0, 250.0]), 2);
    }

    #[test]
    fn test_index_is_monotonic_in_pointer_position() {
        let centers = [50.0, 150.0, 250.0];
        let mut last = 0;
        for y in (0..400).map(f64::from) {
            let index = insertion_index(y, &centers);
            assert!(index >= last, "index regressed at y={}", y);
            assert!(index <= centers.len());
            last = index;
        }
    }
}
