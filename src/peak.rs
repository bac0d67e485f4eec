//! Peak search over 1-D magnitude or power profiles
//!
//! A single left-to-right sweep over `x[1..len-1]` (end points are never
//! peaks). Candidates must clear the absolute `height`, stand at least
//! `threshold` above both immediate neighbours, keep `distance` to the last
//! accepted peak and, when `width > 1`, be at least `width` samples wide at
//! half prominence.
//!
//! A candidate closer than `distance` to the last accepted peak replaces it
//! when higher and is dropped otherwise. Only the last accepted peak is
//! compared, so the result is a locally greedy selection in scan order, not
//! the globally tallest set.

use tracing::trace;

/// Conditions a sample must meet to be reported as a peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakSearchOptions {
    /// Minimum absolute amplitude (exclusive)
    pub height: f32,
    /// Minimum vertical distance to both neighbouring samples
    pub threshold: f32,
    /// Minimum horizontal distance (>= 1) in samples between peaks
    pub distance: usize,
    /// Minimum peak width in samples at half prominence
    pub width: usize,
}

impl Default for PeakSearchOptions {
    fn default() -> Self {
        Self {
            height: f32::NEG_INFINITY,
            threshold: f32::EPSILON,
            distance: 1,
            width: 1,
        }
    }
}

/// Find peaks in `x`, writing their indices to `peak_indices`
///
/// At most `max_peaks` indices are written; the search stops once that many
/// peaks are held. Returns the number of valid leading entries.
pub fn peak_search(
    x: &[f32],
    peak_indices: &mut [usize],
    max_peaks: usize,
    opts: &PeakSearchOptions,
) -> usize {
    assert!(
        peak_indices.len() >= max_peaks,
        "peak index buffer holds {} entries, need {}",
        peak_indices.len(),
        max_peaks
    );
    if max_peaks == 0 || x.len() < 3 {
        return 0;
    }

    let mut count = 0usize;
    let mut last_peak = 0usize;

    for i in 1..x.len() - 1 {
        if x[i] <= opts.height {
            continue;
        }

        let sample_thresh = x[i] - opts.threshold;
        if sample_thresh < x[i - 1] || sample_thresh < x[i + 1] {
            continue;
        }

        let mut replace = false;
        if count > 0 && i - last_peak < opts.distance {
            if x[last_peak] < x[i] {
                replace = true;
            } else {
                continue;
            }
        }

        if opts.width > 1 {
            let prominence = prominence(x, i);
            let w = width(x, i, prominence * 0.5);
            if usize::try_from(w).map_or(true, |w| w < opts.width) {
                trace!(index = i, width = w, "peak too narrow");
                continue;
            }
        }

        if replace {
            trace!(old = last_peak, new = i, "peak replaced");
            peak_indices[count - 1] = i;
        } else {
            peak_indices[count] = i;
            count += 1;
        }
        last_peak = i;

        if count >= max_peaks {
            break;
        }
    }
    count
}

/// Allocating variant of [`peak_search`]
pub fn find_peaks(x: &[f32], max_peaks: usize, opts: &PeakSearchOptions) -> Vec<usize> {
    let mut indices = vec![0usize; max_peaks];
    let count = peak_search(x, &mut indices, max_peaks, opts);
    indices.truncate(count);
    indices
}

/// Topographic prominence of the sample at `peak`
///
/// Walks each side until a higher sample is met, tracking the lowest
/// sample on the way. The prominence is measured from the higher of the
/// two minima.
pub fn prominence(x: &[f32], peak: usize) -> f32 {
    let peak_val = x[peak];
    let min_lhs = base_level(x[..peak].iter().rev(), peak_val);
    let min_rhs = base_level(x[peak + 1..].iter(), peak_val);

    peak_val - min_lhs.max(min_rhs)
}

/// Lowest sample met before the walk reaches one higher than `peak_val`
fn base_level<'a>(side: impl Iterator<Item = &'a f32>, peak_val: f32) -> f32 {
    side.take_while(|&&v| v <= peak_val)
        .fold(peak_val, |min, &v| min.min(v))
}

/// Width in samples of the peak at `peak`, measured `depth` below its top
///
/// The width is the distance between the nearest sample on each side that
/// falls below `x[peak] - depth`. A side without such a sample contributes
/// nothing: the result is then the right crossing index alone, or minus the
/// left crossing index, which understates or distorts the width of peaks
/// touching the array boundary.
pub fn width(x: &[f32], peak: usize, depth: f32) -> isize {
    let level = x[peak] - depth;
    let mut width = 0isize;

    if let Some(right) = (peak + 1..x.len()).find(|&i| x[i] < level) {
        width = right as isize;
    }
    if let Some(left) = (0..peak).rev().find(|&i| x[i] < level) {
        width -= left as isize;
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: [f32; 9] = [0.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 2.0, 0.0];

    fn opts_with_distance(distance: usize) -> PeakSearchOptions {
        PeakSearchOptions {
            distance,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let opts = PeakSearchOptions::default();
        assert_eq!(opts.height, f32::NEG_INFINITY);
        assert_eq!(opts.threshold, f32::EPSILON);
        assert_eq!(opts.distance, 1);
        assert_eq!(opts.width, 1);
    }

    #[test]
    fn test_scenario_distance_two() {
        let mut indices = [usize::MAX; 8];
        let count = peak_search(&SCENARIO, &mut indices, 8, &opts_with_distance(2));
        assert_eq!(count, 3);
        assert_eq!(&indices[..count], &[1, 4, 7]);
    }

    #[test]
    fn test_close_lower_peak_is_replaced() {
        // Index 4 lies within 4 of index 1 and is higher: it takes its slot.
        // Index 7 then lies within 4 of index 4 and is lower: dropped.
        assert_eq!(find_peaks(&SCENARIO, 8, &opts_with_distance(4)), vec![4]);
    }

    #[test]
    fn test_replacement_only_looks_at_last_peak() {
        // 3 is replaced by 4, which is replaced by 5. Index 1 is lost even
        // though it lies 4 samples from the surviving peak.
        let x = [0.0, 3.0, 0.0, 4.0, 0.0, 5.0, 0.0];
        assert_eq!(find_peaks(&x, 8, &opts_with_distance(3)), vec![5]);
    }

    #[test]
    fn test_replacement_chain() {
        // Rising peaks each within distance of the last one keep replacing it
        let x = [0.0, 1.0, 0.0, 2.0, 0.0, 3.0, 0.0, 4.0, 0.0];
        let mut indices = [usize::MAX; 4];
        let count = peak_search(&x, &mut indices, 4, &opts_with_distance(3));
        assert_eq!(count, 1);
        assert_eq!(indices[0], 7);
        assert_eq!(indices[1], usize::MAX);
    }

    #[test]
    fn test_extreme_distance_keeps_single_slot() {
        // Every later candidate is within reach of the last accepted peak
        let opts = opts_with_distance(usize::MAX);
        assert_eq!(find_peaks(&SCENARIO, 8, &opts), vec![4]);
    }

    #[test]
    fn test_extreme_width_rejects_everything() {
        let opts = PeakSearchOptions {
            width: usize::MAX,
            ..Default::default()
        };
        assert!(find_peaks(&SCENARIO, 8, &opts).is_empty());
    }

    #[test]
    fn test_flat_sequence_has_no_peaks() {
        let x = [2.0f32; 16];
        assert!(find_peaks(&x, 4, &PeakSearchOptions::default()).is_empty());
    }

    #[test]
    fn test_max_peaks_zero_writes_nothing() {
        let mut indices: [usize; 0] = [];
        assert_eq!(peak_search(&SCENARIO, &mut indices, 0, &PeakSearchOptions::default()), 0);

        let mut indices = [usize::MAX; 2];
        assert_eq!(peak_search(&SCENARIO, &mut indices, 0, &PeakSearchOptions::default()), 0);
        assert_eq!(indices, [usize::MAX; 2]);
    }

    #[test]
    fn test_stops_at_max_peaks() {
        assert_eq!(find_peaks(&SCENARIO, 2, &PeakSearchOptions::default()), vec![1, 4]);
    }

    #[test]
    fn test_end_points_never_peaks() {
        let x = [9.0, 1.0, 5.0, 1.0, 9.0];
        assert_eq!(find_peaks(&x, 4, &PeakSearchOptions::default()), vec![2]);
        assert!(find_peaks(&[3.0, 1.0], 4, &PeakSearchOptions::default()).is_empty());
    }

    #[test]
    fn test_height_and_threshold() {
        let opts = PeakSearchOptions {
            height: 1.5,
            ..Default::default()
        };
        assert_eq!(find_peaks(&SCENARIO, 8, &opts), vec![4, 7]);

        let opts = PeakSearchOptions {
            threshold: 2.0,
            ..Default::default()
        };
        assert_eq!(find_peaks(&SCENARIO, 8, &opts), vec![4, 7]);

        let opts = PeakSearchOptions {
            threshold: 2.5,
            ..Default::default()
        };
        assert!(find_peaks(&SCENARIO, 8, &opts).is_empty());
    }

    #[test]
    fn test_prominence() {
        assert_eq!(prominence(&SCENARIO, 4), 3.0);
        // Walk from index 7 stops at index 4 (higher); lowest on the way is 0
        assert_eq!(prominence(&SCENARIO, 7), 2.0);
        // Shallower side decides
        let x = [0.0, 2.0, 5.0, 3.0, 4.0];
        assert_eq!(prominence(&x, 2), 2.0);
    }

    #[test]
    fn test_width() {
        let x = [0.0, 1.0, 4.0, 6.0, 4.0, 1.0, 0.0];
        // Level 6 - 3 = 3: crossings at 1 and 5
        assert_eq!(width(&x, 3, 3.0), 4);
    }

    #[test]
    fn test_width_missing_crossing() {
        // No left crossing: width is the right crossing index alone
        let x = [5.0, 6.0, 1.0, 0.0];
        assert_eq!(width(&x, 1, 2.0), 2);
        // No right crossing: minus the left crossing index
        let x = [0.0, 1.0, 6.0, 5.0];
        assert_eq!(width(&x, 2, 2.0), -1);
    }

    #[test]
    fn test_width_filter() {
        // Narrow spike at 2, broad hill around 7
        let x = [0.0, 0.0, 5.0, 0.0, 0.0, 2.0, 4.0, 5.0, 4.0, 2.0, 0.0];
        let opts = PeakSearchOptions {
            width: 3,
            ..Default::default()
        };
        assert_eq!(find_peaks(&x, 4, &opts), vec![7]);
        assert_eq!(find_peaks(&x, 4, &PeakSearchOptions::default()), vec![2, 7]);
    }
}
