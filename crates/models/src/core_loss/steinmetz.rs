use std::f64::consts::PI;

use statrs::function::gamma::gamma;

/// Steinmetz parameters `(k, α, β)` of the law `p = k·f^α·B^β`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteinmetzParams {
    pub k: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl SteinmetzParams {
    /// Builds the parameters whose power law passes through `(f, b, p)`.
    ///
    /// The exponents are taken as given and `k` is back-solved so that
    /// `k·f^α·B^β` reproduces `p` exactly.
    #[must_use]
    pub fn through_point(p: f64, f: f64, b: f64, alpha: f64, beta: f64) -> Self {
        let k = p / (f.powf(alpha) * b.powf(beta));
        Self { k, alpha, beta }
    }

    /// Sinusoidal loss density `k·f^α·B^β`.
    #[must_use]
    pub fn loss_density(&self, f: f64, b_peak: f64) -> f64 {
        self.k * f.powf(self.alpha) * b_peak.powf(self.beta)
    }

    /// Coefficient `ki` of the improved generalized Steinmetz equation.
    ///
    /// `ki = k / ((2π)^(α−1) · ∫₀^2π |cos θ|^α dθ · 2^(β−α))`, with the
    /// integral in closed form `2√π·Γ((1+α)/2) / Γ(1+α/2)`.
    #[must_use]
    pub fn igse_coefficient(&self) -> f64 {
        let Self { k, alpha, beta } = *self;

        let angular = (2.0 * PI).powf(alpha - 1.0);
        let cos_integral = 2.0 * PI.sqrt() * gamma((1.0 + alpha) / 2.0) / gamma(1.0 + alpha / 2.0);
        let swing = 2.0_f64.powf(beta - alpha);

        k / (angular * cos_integral * swing)
    }

    /// Loss density for a triangular flux waveform.
    ///
    /// The flux rises over `duty / f` and falls over `(1 − duty) / f` with a
    /// peak-to-peak swing of `2·b_peak`. `duty` must lie in (0, 1).
    #[must_use]
    pub fn triangular_loss_density(&self, f: f64, duty: f64, b_peak: f64) -> f64 {
        let Self { alpha, beta, .. } = *self;
        let ki = self.igse_coefficient();

        let t_rise = duty / f;
        let t_fall = (1.0 - duty) / f;
        let swing = 2.0 * b_peak;

        let segment = |t: f64| (swing / t).abs().powf(alpha) * t;

        f * ki * swing.powf(beta - alpha) * (segment(t_rise) + segment(t_fall))
    }
}

/// Local exponent of a power law from two symmetric log-space perturbations.
///
/// `p_up` and `p_down` are evaluated at `x·factor` and `x/factor`.
#[must_use]
pub fn local_exponent(p_up: f64, p_down: f64, factor: f64) -> f64 {
    (p_up / p_down).ln() / (2.0 * factor.ln())
}
