//! Elementary array operations over flat buffers

use rustfft::num_complex::Complex32;

/// Subtract the arithmetic mean from every element
pub fn mean_removal(v: &mut [f32]) {
    assert!(!v.is_empty(), "mean removal of an empty array");

    let mean = v.iter().sum::<f32>() / v.len() as f32;
    for x in v.iter_mut() {
        *x -= mean;
    }
}

/// Subtract the complex arithmetic mean from every element
///
/// The mean is accumulated in a first pass and removed in a second.
pub fn cmplx_mean_removal(v: &mut [Complex32]) {
    assert!(!v.is_empty(), "mean removal of an empty array");

    let mut sum = Complex32::new(0.0, 0.0);
    for x in v.iter() {
        sum += *x;
    }
    let mean = sum / v.len() as f32;

    for x in v.iter_mut() {
        *x -= mean;
    }
}

/// Rotate left by `k` positions; `k` may exceed the length
pub fn rotate(v: &mut [f32], k: usize) {
    if v.is_empty() {
        return;
    }
    let len = v.len();
    v.rotate_left(k % len);
}

/// Reverse the element order
pub fn flip(v: &mut [f32]) {
    v.reverse();
}

/// Swap spectrum halves of `dim` consecutive rows of `len` complex bins
///
/// Each row is rotated left by `ceil(len/2)` elements, moving the DC bin to
/// the centre of the row.
pub fn shift_cfft(v: &mut [Complex32], len: usize, dim: usize) {
    assert_eq!(v.len(), len * dim, "buffer does not hold {} rows of {}", dim, len);
    if len == 0 {
        return;
    }

    let shift = (len + 1) / 2;
    for row in v.chunks_exact_mut(len) {
        row.rotate_left(shift);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_removal_zero_mean() {
        let mut v = vec![1.0f32, 2.0, 3.0, 10.0, -4.0];
        mean_removal(&mut v);
        let mean: f32 = v.iter().sum::<f32>() / v.len() as f32;
        assert!(mean.abs() < 1e-6);
        assert!((v[0] - (1.0 - 2.4)).abs() < 1e-6);
    }

    #[test]
    fn test_mean_removal_second_pass_is_noop() {
        let mut v = vec![0.5f32, -1.25, 7.0, 3.5, 2.0, -0.75];
        mean_removal(&mut v);
        let once = v.clone();
        mean_removal(&mut v);
        for (a, b) in v.iter().zip(&once) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cmplx_mean_removal() {
        let mut v = vec![
            Complex32::new(1.0, 2.0),
            Complex32::new(3.0, -2.0),
            Complex32::new(5.0, 6.0),
        ];
        cmplx_mean_removal(&mut v);
        assert_eq!(v[0], Complex32::new(-2.0, 0.0));
        assert_eq!(v[1], Complex32::new(0.0, -4.0));
        assert_eq!(v[2], Complex32::new(2.0, 4.0));
    }

    #[test]
    #[should_panic(expected = "empty")]
    fn test_mean_removal_empty_panics() {
        mean_removal(&mut []);
    }

    #[test]
    fn test_rotate() {
        let mut v = vec![1.0f32, 2.0, 3.0, 4.0, 5.0];
        rotate(&mut v, 2);
        assert_eq!(v, vec![3.0, 4.0, 5.0, 1.0, 2.0]);

        // Wraps around the length
        let mut v = vec![1.0f32, 2.0, 3.0];
        rotate(&mut v, 7);
        assert_eq!(v, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_flip() {
        let mut v = vec![1.0f32, 2.0, 3.0, 4.0];
        flip(&mut v);
        assert_eq!(v, vec![4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_shift_cfft_even_and_odd() {
        let c = |x: f32| Complex32::new(x, 0.0);

        let mut even: Vec<Complex32> = (0..4).map(|i| c(i as f32)).collect();
        shift_cfft(&mut even, 4, 1);
        assert_eq!(even, vec![c(2.0), c(3.0), c(0.0), c(1.0)]);

        let mut odd: Vec<Complex32> = (0..5).map(|i| c(i as f32)).collect();
        shift_cfft(&mut odd, 5, 1);
        assert_eq!(odd, vec![c(3.0), c(4.0), c(0.0), c(1.0), c(2.0)]);
    }

    #[test]
    fn test_shift_cfft_rows_independent() {
        let c = |x: f32| Complex32::new(x, 0.0);
        let mut v: Vec<Complex32> = (0..8).map(|i| c(i as f32)).collect();
        shift_cfft(&mut v, 4, 2);
        assert_eq!(
            v,
            vec![c(2.0), c(3.0), c(0.0), c(1.0), c(6.0), c(7.0), c(4.0), c(5.0)]
        );
    }
}
