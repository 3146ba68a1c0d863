use magloss_core::ModelError;
use serde::{Deserialize, Serialize};

/// Tunable numerics of the core loss model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreLossConfig {
    /// Relative perturbation ε used to extract local Steinmetz exponents.
    ///
    /// The loss map is sampled at `x·(1+ε)` and `x/(1+ε)` around the
    /// operating point for both frequency and flux density.
    pub steinmetz_perturbation: f64,
}

impl Default for CoreLossConfig {
    fn default() -> Self {
        Self {
            steinmetz_perturbation: 0.1,
        }
    }
}

impl CoreLossConfig {
    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] if the perturbation is not a
    /// finite positive number.
    pub fn validate(&self) -> Result<(), ModelError> {
        let eps = self.steinmetz_perturbation;
        if eps.is_finite() && eps > 0.0 {
            Ok(())
        } else {
            Err(ModelError::InvalidConfig(format!(
                "steinmetz_perturbation must be finite and positive, got {eps}"
            )))
        }
    }
}
