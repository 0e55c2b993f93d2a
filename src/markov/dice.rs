//! Roll distributions for fair dice.

/// PMF of the sum of `dice` fair dice with `faces` faces, indexed by total.
///
/// The returned vector has length `dice * faces + 1`; totals below `dice`
/// have probability zero.
pub fn dice_sum_pmf(dice: usize, faces: usize) -> Vec<f64> {
    let mut pmf = vec![1.0];
    if faces == 0 {
        return pmf;
    }
    let p_face = 1.0 / faces as f64;
    for _ in 0..dice {
        let mut next = vec![0.0; pmf.len() + faces];
        for (total, &p) in pmf.iter().enumerate() {
            if p == 0.0 {
                continue;
            }
            for face in 1..=faces {
                next[total + face] += p * p_face;
            }
        }
        pmf = next;
    }
    pmf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_die() {
        let pmf = dice_sum_pmf(1, 6);
        assert_eq!(pmf.len(), 7);
        assert_eq!(pmf[0], 0.0);
        for &p in &pmf[1..] {
            assert!((p - 1.0 / 6.0).abs() < 1e-15);
        }
    }

    #[test]
    fn two_dice_triangle() {
        let pmf = dice_sum_pmf(2, 6);
        assert_eq!(pmf.len(), 13);
        assert_eq!(&pmf[..2], &[0.0, 0.0]);
        for total in 2..=12usize {
            let ways = 6 - (7i32 - total as i32).abs();
            assert!((pmf[total] - ways as f64 / 36.0).abs() < 1e-15, "total={total}");
        }
        assert!((pmf.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }
}
