use num_traits::{Float, FromPrimitive};

/// Returns `n` evenly spaced values from `start` to `end` inclusive.
///
/// Callers guarantee `n >= 2`.
pub fn linspace<T>(start: T, end: T, n: usize) -> impl Iterator<Item = T>
where
    T: Float + FromPrimitive,
{
    let dy = (end - start) / T::from_usize(n - 1).unwrap();
    (0..n).map(move |i| start + T::from_usize(i).unwrap() * dy)
}

#[cfg(test)]
mod tests {
    use super::linspace;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints() {
        let ys: Vec<f64> = linspace(7.1, 7.3, 100).collect();
        assert_eq!(ys.len(), 100);
        assert_relative_eq!(ys[0], 7.1);
        assert_relative_eq!(*ys.last().unwrap(), 7.3);
    }

    #[test]
    fn test_linspace_even_spacing() {
        let ys: Vec<f64> = linspace(-1.0, 1.0, 5).collect();
        for pair in ys.windows(2) {
            assert_relative_eq!(pair[1] - pair[0], 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_linspace_descending() {
        let ys: Vec<f64> = linspace(3.0, 0.0, 4).collect();
        assert_eq!(ys, vec![3.0, 2.0, 1.0, 0.0]);
    }
}
