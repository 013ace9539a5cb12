use crate::artifact::Norm;

/// Scales sparse `(index, value)` entries in place. Zero vectors are left alone.
pub(crate) fn normalize_sparse(entries: &mut [(usize, f64)], norm: Norm) {
    let magnitude = match norm {
        Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
        Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
    };
    if magnitude > 1e-10 {
        for (_, v) in entries.iter_mut() {
            *v /= magnitude;
        }
    }
}

/// Logistic function that does not overflow for large negative inputs.
pub(crate) fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_is_stable() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(1000.0) <= 1.0);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_sparse() {
        let mut entries = vec![(0, 3.0), (4, 4.0)];
        normalize_sparse(&mut entries, Norm::L2);
        assert!((entries[0].1 - 0.6).abs() < 1e-12);
        assert!((entries[1].1 - 0.8).abs() < 1e-12);

        let mut entries = vec![(1, 1.0), (2, 3.0)];
        normalize_sparse(&mut entries, Norm::L1);
        assert!((entries[1].1 - 0.75).abs() < 1e-12);

        let mut empty: Vec<(usize, f64)> = Vec::new();
        normalize_sparse(&mut empty, Norm::L2);
        assert!(empty.is_empty());
    }
}
