//! Core losses for sinusoidal and triangular flux excitation.
//!
//! Sinusoidal losses are read directly from each material's tabulated loss
//! map. Triangular (PWM) losses use the improved generalized Steinmetz
//! equation, with the Steinmetz parameters extracted from the local gradient
//! of the loss map at the operating point.

mod material;
mod steinmetz;

use std::{fmt, sync::Arc};

use magloss_core::{
    Flagged, Interpolator, MaterialSet, ModelError, SampleIndexer, Violations, merge_violations,
};
use ndarray::{Array1, ArrayView1, Zip};

pub use material::{CoreMaterial, CoreParams, LossMapDef};
pub use steinmetz::{SteinmetzParams, local_exponent};

use crate::CoreLossConfig;

/// Core losses of every sample.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreLosses {
    /// `true` where every check passed.
    pub valid: Array1<bool>,
    /// Checks each sample failed.
    pub violations: Array1<Violations>,
    /// Loss density [W/m³].
    pub loss_density: Array1<f64>,
    /// Loss [W].
    pub losses: Array1<f64>,
}

/// Steinmetz parameters extracted around each sample's operating point.
#[derive(Debug, Clone, PartialEq)]
pub struct SteinmetzFit {
    pub params: Array1<SteinmetzParams>,
    /// Frequency the parameters were extracted at, after clamping [Hz].
    pub frequency: Array1<f64>,
    /// AC flux density peak the parameters were extracted at, after clamping [T].
    pub flux_density: Array1<f64>,
    /// Union of the violations of all five loss-map evaluations.
    pub violations: Array1<Violations>,
}

impl SteinmetzFit {
    #[must_use]
    pub fn valid(&self) -> Array1<bool> {
        self.violations.mapv(Violations::is_empty)
    }

    #[must_use]
    pub fn k(&self) -> Array1<f64> {
        self.params.mapv(|p| p.k)
    }

    #[must_use]
    pub fn alpha(&self) -> Array1<f64> {
        self.params.mapv(|p| p.alpha)
    }

    #[must_use]
    pub fn beta(&self) -> Array1<f64> {
        self.params.mapv(|p| p.beta)
    }
}

/// Per-sample copies of the material constants.
struct CoreProps {
    rho: Array1<f64>,
    kappa: Array1<f64>,
    c_offset: Array1<f64>,
    t_max: Array1<f64>,
    b_sat_max: Array1<f64>,
    p_max: Array1<f64>,
    p_scale: Array1<f64>,
}

impl CoreProps {
    fn new(indexer: &SampleIndexer, materials: &MaterialSet<CoreMaterial>) -> Self {
        let records = materials.records();
        let broadcast = |f: fn(&CoreParams) -> f64| indexer.broadcast(records, |r| f(r.param()));

        Self {
            rho: broadcast(|p| p.rho),
            kappa: broadcast(|p| p.kappa),
            c_offset: broadcast(|p| p.c_offset),
            t_max: broadcast(|p| p.t_max),
            b_sat_max: broadcast(|p| p.b_sat_max),
            p_max: broadcast(|p| p.p_max),
            p_scale: broadcast(|p| p.p_scale),
        }
    }
}

/// Vectorized core loss model over a fixed set of samples.
///
/// Constructed once per sample chunk; every getter is a pure function of its
/// inputs and returns one entry per sample.
pub struct CoreLossModel {
    interpolator: Interpolator<CoreMaterial>,
    volume: Array1<f64>,
    props: CoreProps,
    config: CoreLossConfig,
}

impl CoreLossModel {
    /// Creates a model for samples made of `material_ids` with core `volume` [m³].
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, if a sample references a
    /// material missing from `materials`, or if `volume` does not have one
    /// finite, non-negative entry per sample.
    pub fn new<S: AsRef<str>>(
        materials: Arc<MaterialSet<CoreMaterial>>,
        material_ids: &[S],
        volume: Array1<f64>,
        config: CoreLossConfig,
    ) -> Result<Self, ModelError> {
        config.validate()?;

        let indexer = materials.indexer(material_ids)?;
        ModelError::check_length("volume", indexer.len(), volume.len())?;
        ModelError::check_domain("volume", &volume, |v| v >= 0.0)?;

        log::debug!(
            "core loss model: {} samples, samples per material {:?}",
            indexer.len(),
            materials.ids().zip(indexer.counts()).collect::<Vec<_>>()
        );

        let props = CoreProps::new(&indexer, &materials);
        let interpolator = Interpolator::new(materials, &indexer)?;

        Ok(Self {
            interpolator,
            volume,
            props,
            config,
        })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.volume.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.volume.is_empty()
    }

    /// Core mass [kg].
    #[must_use]
    pub fn get_mass(&self) -> Array1<f64> {
        &self.volume * &self.props.rho
    }

    /// Core cost: `volume·rho·kappa + c_offset`.
    #[must_use]
    pub fn get_cost(&self) -> Array1<f64> {
        &self.get_mass() * &self.props.kappa + &self.props.c_offset
    }

    /// Maximum operating temperature [°C].
    #[must_use]
    pub fn get_temperature_limit(&self) -> Array1<f64> {
        self.props.t_max.clone()
    }

    /// Saturation flux density limit [T].
    #[must_use]
    pub fn get_flux_density_limit(&self) -> Array1<f64> {
        self.props.b_sat_max.clone()
    }

    /// Scaled loss density [W/m³] read from the loss map.
    ///
    /// Only the interpolation-domain checks are applied.
    ///
    /// # Errors
    ///
    /// Fails if any input does not have one entry per sample.
    pub fn get_loss_density_map(
        &self,
        f: ArrayView1<'_, f64>,
        b_ac_peak: ArrayView1<'_, f64>,
        b_dc: ArrayView1<'_, f64>,
        t: ArrayView1<'_, f64>,
    ) -> Result<Flagged, ModelError> {
        let mut map = self.interpolator.evaluate(&[f.view(), b_ac_peak.view(), b_dc.view(), t.view()])?;
        map.value *= &self.props.p_scale;
        Ok(map)
    }

    /// Losses under sinusoidal flux excitation.
    ///
    /// A sample is valid iff no query coordinate was clamped, the loss density
    /// is within the material's ceiling, and `b_ac_peak + b_dc` is within the
    /// saturation limit.
    ///
    /// # Errors
    ///
    /// Fails if any input does not have one entry per sample.
    pub fn get_losses_sinusoidal(
        &self,
        f: ArrayView1<'_, f64>,
        b_ac_peak: ArrayView1<'_, f64>,
        b_dc: ArrayView1<'_, f64>,
        t: ArrayView1<'_, f64>,
    ) -> Result<CoreLosses, ModelError> {
        let Flagged {
            value: loss_density,
            violations,
        } = self.get_loss_density_map(f, b_ac_peak, b_dc, t)?;

        Ok(self.finish(loss_density, violations, b_ac_peak, b_dc))
    }

    /// Extracts local Steinmetz parameters from the loss-map gradient.
    ///
    /// The map is evaluated at the operating point and at `f` and `b_ac_peak`
    /// each scaled up and down by `1 + ε`; `α` and `β` follow from the log
    /// ratios and `k` is back-solved through the center point. The fit is
    /// invalid if any of the five evaluations was clamped.
    ///
    /// # Errors
    ///
    /// Fails if any input does not have one entry per sample.
    pub fn get_steinmetz_parameters(
        &self,
        f: ArrayView1<'_, f64>,
        b_ac_peak: ArrayView1<'_, f64>,
        b_dc: ArrayView1<'_, f64>,
        t: ArrayView1<'_, f64>,
    ) -> Result<SteinmetzFit, ModelError> {
        let factor = 1.0 + self.config.steinmetz_perturbation;

        let f = self.interpolator.clamp_axis(0, f)?;
        let b = self.interpolator.clamp_axis(1, b_ac_peak)?;

        let f_up = f.value.mapv(|x| x * factor);
        let f_down = f.value.mapv(|x| x / factor);
        let b_up = b.value.mapv(|x| x * factor);
        let b_down = b.value.mapv(|x| x / factor);

        let map = |f: &Array1<f64>, b: &Array1<f64>| {
            self.get_loss_density_map(f.view(), b.view(), b_dc, t)
        };
        let center = map(&f.value, &b.value)?;
        let p_f_up = map(&f_up, &b.value)?;
        let p_f_down = map(&f_down, &b.value)?;
        let p_b_up = map(&f.value, &b_up)?;
        let p_b_down = map(&f.value, &b_down)?;

        let mut violations = center.violations;
        for other in [
            &f.violations,
            &b.violations,
            &p_f_up.violations,
            &p_f_down.violations,
            &p_b_up.violations,
            &p_b_down.violations,
        ] {
            merge_violations(&mut violations, other);
        }

        let exponent = |up: &Flagged, down: &Flagged| {
            Zip::from(&up.value)
                .and(&down.value)
                .map_collect(|&up, &down| local_exponent(up, down, factor))
        };
        let alpha = exponent(&p_f_up, &p_f_down);
        let beta = exponent(&p_b_up, &p_b_down);

        let params = Zip::from(&center.value)
            .and(&f.value)
            .and(&b.value)
            .and(&alpha)
            .and(&beta)
            .map_collect(|&p, &f, &b, &alpha, &beta| {
                SteinmetzParams::through_point(p, f, b, alpha, beta)
            });

        Ok(SteinmetzFit {
            params,
            frequency: f.value,
            flux_density: b.value,
            violations,
        })
    }

    /// Losses under triangular (PWM) flux excitation via the IGSE.
    ///
    /// `duty_cycle` is the fraction of the period during which the flux
    /// rises. A duty cycle outside (0, 1) is flagged and evaluated at 0.5.
    /// Validity combines the Steinmetz fit validity with the loss-density and
    /// saturation checks of [`CoreLossModel::get_losses_sinusoidal`].
    ///
    /// # Errors
    ///
    /// Fails if any input does not have one entry per sample.
    pub fn get_losses_triangular(
        &self,
        f: ArrayView1<'_, f64>,
        duty_cycle: ArrayView1<'_, f64>,
        b_ac_peak: ArrayView1<'_, f64>,
        b_dc: ArrayView1<'_, f64>,
        t: ArrayView1<'_, f64>,
    ) -> Result<CoreLosses, ModelError> {
        ModelError::check_length("duty_cycle", self.len(), duty_cycle.len())?;

        let SteinmetzFit {
            params,
            frequency,
            flux_density,
            mut violations,
        } = self.get_steinmetz_parameters(f, b_ac_peak, b_dc, t)?;

        let duty = Zip::from(&mut violations)
            .and(duty_cycle)
            .map_collect(|violations, &d| {
                if d > 0.0 && d < 1.0 {
                    d
                } else {
                    *violations |= Violations::DUTY_CYCLE;
                    0.5
                }
            });

        let loss_density = Zip::from(&params)
            .and(&frequency)
            .and(&duty)
            .and(&flux_density)
            .map_collect(|params, &f, &d, &b| params.triangular_loss_density(f, d, b));

        Ok(self.finish(loss_density, violations, b_ac_peak, b_dc))
    }

    /// Applies the loss-density and saturation checks and scales by volume.
    fn finish(
        &self,
        loss_density: Array1<f64>,
        mut violations: Array1<Violations>,
        b_ac_peak: ArrayView1<'_, f64>,
        b_dc: ArrayView1<'_, f64>,
    ) -> CoreLosses {
        Zip::from(&mut violations)
            .and(&loss_density)
            .and(&self.props.p_max)
            .and(b_ac_peak)
            .and(b_dc)
            .and(&self.props.b_sat_max)
            .for_each(|violations, &p, &p_max, &b_ac, &b_dc, &b_sat| {
                *violations |= Violations::when(p > p_max, Violations::LOSS_DENSITY);
                *violations |= Violations::when(b_ac + b_dc > b_sat, Violations::SATURATION);
            });

        CoreLosses {
            valid: violations.mapv(Violations::is_empty),
            losses: &loss_density * &self.volume,
            loss_density,
            violations,
        }
    }
}

impl fmt::Debug for CoreLossModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreLossModel")
            .field("samples", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
