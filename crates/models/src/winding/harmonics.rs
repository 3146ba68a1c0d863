use std::f64::consts::SQRT_2;

use ndarray::{Array1, ArrayView2, Axis, Zip};

/// RMS value of each column of a peak-amplitude harmonic matrix.
///
/// Rows are harmonics, columns are samples. Each harmonic contributes its
/// peak over √2, summed in quadrature.
#[must_use]
pub fn rms(peaks: ArrayView2<'_, f64>) -> Array1<f64> {
    peaks
        .mapv(|x| (x / SQRT_2).powi(2))
        .sum_axis(Axis(0))
        .mapv(f64::sqrt)
}

/// Equivalent proximity-loss frequency of each sample.
///
/// The quadrature sum of `f·H` over harmonics divided by the RMS field, so
/// that `f_eq²·H_rms²` equals `Σ f_h²·H_h,rms²`. Samples with no field get an
/// equivalent frequency of zero.
#[must_use]
pub fn equivalent_frequency(
    frequencies: ArrayView2<'_, f64>,
    h_peaks: ArrayView2<'_, f64>,
    h_rms: &Array1<f64>,
) -> Array1<f64> {
    let weighted = Zip::from(frequencies)
        .and(h_peaks)
        .map_collect(|&f, &h| (f * h / SQRT_2).powi(2))
        .sum_axis(Axis(0))
        .mapv(f64::sqrt);

    Zip::from(&weighted)
        .and(h_rms)
        .map_collect(|&weighted, &h_rms| if h_rms > 0.0 { weighted / h_rms } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn rms_of_single_and_multiple_harmonics() {
        // Columns: one 2.0 peak; two harmonics 3.0 and 4.0 (peak 5.0 in quadrature).
        let peaks = array![[2.0, 3.0], [0.0, 4.0]];

        let rms = rms(peaks.view());

        assert_relative_eq!(rms[0], 2.0 / SQRT_2);
        assert_relative_eq!(rms[1], 5.0 / SQRT_2);
    }

    #[test]
    fn equivalent_frequency_weights_by_field() {
        let f = array![[1e3, 1e3, 1e3], [3e3, 3e3, 3e3]];
        let h = array![[10.0, 10.0, 0.0], [0.0, 10.0, 0.0]];
        let h_rms = rms(h.view());

        let f_eq = equivalent_frequency(f.view(), h.view(), &h_rms);

        assert_relative_eq!(f_eq[0], 1e3);
        // √((1e3² + 3e3²)/2)
        assert_relative_eq!(f_eq[1], (5e6_f64).sqrt(), max_relative = 1e-12);
        assert_eq!(f_eq[2], 0.0);
    }
}
