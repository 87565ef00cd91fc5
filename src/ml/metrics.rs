//! Held-out evaluation metrics shared by both regression backends.

/// Mean squared error.
#[must_use]
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    assert_eq!(actual.len(), predicted.len());
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64
}

/// Coefficient of determination. 1.0 is a perfect fit; a constant-mean
/// predictor scores 0.0. When the actuals have zero variance the score is
/// 0.0 unless residuals are also zero.
#[must_use]
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    assert_eq!(actual.len(), predicted.len());
    if actual.is_empty() {
        return 0.0;
    }

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions_score_zero_mse_and_unit_r2() {
        let actual = [1.0, 2.0, 3.0];
        assert_eq!(mean_squared_error(&actual, &actual), 0.0);
        assert_eq!(r2_score(&actual, &actual), 1.0);
    }

    #[test]
    fn known_mse_value() {
        let actual = [1.0, 2.0];
        let predicted = [2.0, 4.0];
        assert_eq!(mean_squared_error(&actual, &predicted), 2.5);
    }

    #[test]
    fn mean_predictor_has_zero_r2() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [2.0, 2.0, 2.0];
        assert!(r2_score(&actual, &predicted).abs() < 1e-12);
    }

    #[test]
    fn constant_actuals_do_not_divide_by_zero() {
        let actual = [5.0, 5.0];
        assert_eq!(r2_score(&actual, &[5.0, 5.0]), 1.0);
        assert_eq!(r2_score(&actual, &[4.0, 6.0]), 0.0);
    }
}
