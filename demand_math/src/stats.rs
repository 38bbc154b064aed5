//! Summary statistics
//!
//! Sums here are independent of input order: values are sorted before a
//! compensated (Neumaier) summation, so the same multiset always yields the
//! same bit pattern.

use crate::{MathError, Result};

/// Order-independent sum of `values`
pub fn stable_sum(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut sum = 0.0;
    let mut compensation = 0.0;
    for value in sorted {
        let t = sum + value;
        if sum.abs() >= value.abs() {
            compensation += (sum - t) + value;
        } else {
            compensation += (value - t) + sum;
        }
        sum = t;
    }

    sum + compensation
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty slice".to_string(),
        ));
    }

    Ok(stable_sum(values) / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator)
pub fn sample_std_dev(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Sample standard deviation needs at least 2 values, got {}",
            values.len()
        )));
    }

    let mean = mean(values)?;
    let squares: Vec<f64> = values.iter().map(|v| (v - mean).powi(2)).collect();

    Ok((stable_sum(&squares) / (values.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stable_sum_ignores_order() {
        let forward = [1e16, 1.0, -1e16, 3.5, 0.1, 0.2];
        let mut reversed = forward;
        reversed.reverse();

        assert_eq!(stable_sum(&forward).to_bits(), stable_sum(&reversed).to_bits());
        assert_relative_eq!(stable_sum(&forward), 4.8, epsilon = 1e-9);
    }

    #[test]
    fn test_mean_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values).unwrap(), 5.0);
        assert_relative_eq!(sample_std_dev(&values).unwrap(), 2.138089935, epsilon = 1e-8);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(stable_sum(&[]), 0.0);
        assert!(mean(&[]).is_err());
        assert!(sample_std_dev(&[1.0]).is_err());
    }
}
