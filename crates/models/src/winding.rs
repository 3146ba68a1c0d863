//! Litz-wire winding losses.
//!
//! Losses are split into a DC term, a low-frequency AC term and a
//! high-frequency proximity term. Harmonic inputs are matrices with one row
//! per harmonic and one column per sample, holding peak amplitudes.

mod harmonics;
mod material;

use std::{f64::consts::PI, fmt, sync::Arc};

use magloss_core::{Flagged, Interpolator, MaterialSet, ModelError, SampleIndexer, Violations};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};
use uom::si::{
    electrical_conductivity::siemens_per_meter,
    f64::{ElectricalConductivity, Frequency},
    frequency::hertz,
    length::meter,
};

pub use harmonics::{equivalent_frequency, rms};
pub use material::{ConductivityDef, WindingMaterial, WindingParams};

use crate::physics;

/// Loss terms of every sample, either as densities or as volume-scaled losses.
#[derive(Debug, Clone, PartialEq)]
pub struct LossBreakdown {
    /// Sum of the three terms.
    pub total: Array1<f64>,
    pub dc: Array1<f64>,
    /// Low-frequency AC (resistive) term.
    pub ac_lf: Array1<f64>,
    /// High-frequency proximity term.
    pub ac_hf: Array1<f64>,
}

impl LossBreakdown {
    fn new(dc: Array1<f64>, ac_lf: Array1<f64>, ac_hf: Array1<f64>) -> Self {
        Self {
            total: &dc + &ac_lf + &ac_hf,
            dc,
            ac_lf,
            ac_hf,
        }
    }

    fn scaled(&self, volume: &Array1<f64>) -> Self {
        Self {
            total: &self.total * volume,
            dc: &self.dc * volume,
            ac_lf: &self.ac_lf * volume,
            ac_hf: &self.ac_hf * volume,
        }
    }
}

/// Winding losses of every sample.
#[derive(Debug, Clone, PartialEq)]
pub struct WindingLosses {
    /// `true` where every check passed.
    pub valid: Array1<bool>,
    /// Checks each sample failed.
    pub violations: Array1<Violations>,
    /// Loss densities [W/m³].
    pub density: LossBreakdown,
    /// Losses [W].
    pub losses: LossBreakdown,
    /// RMS AC current density [A/m²].
    pub j_rms: Array1<f64>,
    /// RMS magnetic field [A/m].
    pub h_rms: Array1<f64>,
    /// Equivalent proximity-loss frequency [Hz].
    pub f_eq: Array1<f64>,
}

/// Per-sample copies of the material constants, with the fill mixture applied.
struct WindingProps {
    fill: Array1<f64>,
    density: Array1<f64>,
    cost_density: Array1<f64>,
    c_offset: Array1<f64>,
    d_strand: Array1<f64>,
    t_max: Array1<f64>,
    j_rms_max: Array1<f64>,
    p_max: Array1<f64>,
    f_max: Array1<f64>,
    p_scale: Array1<f64>,
}

impl WindingProps {
    fn new(
        indexer: &SampleIndexer,
        materials: &MaterialSet<WindingMaterial>,
        fill_pack: &Array1<f64>,
    ) -> Self {
        let records = materials.records();
        let broadcast =
            |f: fn(&WindingParams) -> f64| indexer.broadcast(records, |r| f(r.param()));

        let fill = &broadcast(|p| p.fill_litz) * fill_pack;
        let rho_conductor = broadcast(|p| p.rho_conductor);
        let rho_iso = broadcast(|p| p.rho_iso);
        let kappa_conductor = broadcast(|p| p.kappa_conductor);
        let kappa_iso = broadcast(|p| p.kappa_iso);

        let density = Zip::from(&fill)
            .and(&rho_conductor)
            .and(&rho_iso)
            .map_collect(|&fill, &rc, &ri| fill * rc + (1.0 - fill) * ri);
        let cost_density = Zip::from(&fill)
            .and(&rho_conductor)
            .and(&rho_iso)
            .and(&kappa_conductor)
            .and(&kappa_iso)
            .map_collect(|&fill, &rc, &ri, &kc, &ki| fill * rc * kc + (1.0 - fill) * ri * ki);

        Self {
            fill,
            density,
            cost_density,
            c_offset: broadcast(|p| p.c_offset),
            d_strand: broadcast(|p| p.d_strand),
            t_max: broadcast(|p| p.t_max),
            j_rms_max: broadcast(|p| p.j_rms_max),
            p_max: broadcast(|p| p.p_max),
            f_max: broadcast(|p| p.f_max),
            p_scale: broadcast(|p| p.p_scale),
        }
    }
}

/// Vectorized litz winding loss model over a fixed set of samples.
pub struct WindingLossModel {
    interpolator: Interpolator<WindingMaterial>,
    volume: Array1<f64>,
    props: WindingProps,
}

impl WindingLossModel {
    /// Creates a model for samples made of `material_ids` with winding
    /// `volume` [m³] and packing fill factor `fill_pack`.
    ///
    /// # Errors
    ///
    /// Fails if a sample references a material missing from `materials`, if
    /// `volume` or `fill_pack` does not have one entry per sample, or if a
    /// volume is negative or a packing fill factor is outside (0, 1].
    pub fn new<S: AsRef<str>>(
        materials: Arc<MaterialSet<WindingMaterial>>,
        material_ids: &[S],
        volume: Array1<f64>,
        fill_pack: Array1<f64>,
    ) -> Result<Self, ModelError> {
        let indexer = materials.indexer(material_ids)?;
        ModelError::check_length("volume", indexer.len(), volume.len())?;
        ModelError::check_length("fill_pack", indexer.len(), fill_pack.len())?;
        ModelError::check_domain("volume", &volume, |v| v >= 0.0)?;
        ModelError::check_domain("fill_pack", &fill_pack, |x| x > 0.0 && x <= 1.0)?;

        log::debug!(
            "winding loss model: {} samples, samples per material {:?}",
            indexer.len(),
            materials.ids().zip(indexer.counts()).collect::<Vec<_>>()
        );

        let props = WindingProps::new(&indexer, &materials, &fill_pack);
        let interpolator = Interpolator::new(materials, &indexer)?;

        Ok(Self {
            interpolator,
            volume,
            props,
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

    /// Winding mass [kg], mixing conductor and filler by the total fill factor.
    #[must_use]
    pub fn get_mass(&self) -> Array1<f64> {
        &self.volume * &self.props.density
    }

    /// Winding cost: `c_offset + volume·(fill·ρc·κc + (1−fill)·ρiso·κiso)`.
    #[must_use]
    pub fn get_cost(&self) -> Array1<f64> {
        &self.volume * &self.props.cost_density + &self.props.c_offset
    }

    /// Maximum operating temperature [°C].
    #[must_use]
    pub fn get_temperature_limit(&self) -> Array1<f64> {
        self.props.t_max.clone()
    }

    /// Combined RMS current density limit [A/m²].
    #[must_use]
    pub fn get_current_density_limit(&self) -> Array1<f64> {
        self.props.j_rms_max.clone()
    }

    /// Conductor conductivity [S/m] at temperature `t` [°C].
    ///
    /// Temperatures outside the tabulated range are clamped and flagged.
    ///
    /// # Errors
    ///
    /// Fails if `t` does not have one entry per sample.
    pub fn get_conductivity(&self, t: ArrayView1<'_, f64>) -> Result<Flagged, ModelError> {
        self.interpolator.evaluate(&[t])
    }

    /// Winding losses for harmonic excitation plus a DC current density.
    ///
    /// `f`, `j` and `h` hold harmonic frequencies [Hz], peak current
    /// densities [A/m²] and peak magnetic fields [A/m]. A sample is valid iff
    /// its temperature was inside the conductivity table, the total loss
    /// density is within the ceiling, the combined RMS current density is
    /// within the limit and the equivalent frequency is within the limit.
    /// Non-finite harmonic or `j_dc` entries are treated as zero and their
    /// samples are flagged [`Violations::NON_FINITE`].
    ///
    /// # Errors
    ///
    /// Fails if the harmonic matrices do not share the shape
    /// `[harmonics, samples]`, or if `j_dc` or `t` does not have one entry
    /// per sample.
    pub fn get_losses(
        &self,
        f: ArrayView2<'_, f64>,
        j: ArrayView2<'_, f64>,
        h: ArrayView2<'_, f64>,
        j_dc: ArrayView1<'_, f64>,
        t: ArrayView1<'_, f64>,
    ) -> Result<WindingLosses, ModelError> {
        let expected = [f.nrows(), self.len()];
        for (name, matrix) in [("f", f.view()), ("j", j.view()), ("h", h.view())] {
            let found = [matrix.nrows(), matrix.ncols()];
            if found != expected {
                return Err(ModelError::ShapeMismatch {
                    name,
                    expected,
                    found,
                });
            }
        }
        ModelError::check_length("j_dc", self.len(), j_dc.len())?;

        let mut non_finite = j_dc.mapv(|x| !x.is_finite());
        let j_dc = j_dc.mapv(finite_or_zero);
        let f = finite_columns(f, &mut non_finite);
        let j = finite_columns(j, &mut non_finite);
        let h = finite_columns(h, &mut non_finite);

        let Flagged {
            value: sigma,
            mut violations,
        } = self.get_conductivity(t)?;

        let j_rms = rms(j.view());
        let h_rms = rms(h.view());
        let f_eq = equivalent_frequency(f.view(), h.view(), &h_rms);

        let resistive = Zip::from(&self.props.p_scale)
            .and(&self.props.fill)
            .and(&sigma)
            .map_collect(|&scale, &fill, &sigma| scale / (fill * sigma));
        let dc = &resistive * &j_dc.mapv(|j| j * j);
        let ac_lf = &resistive * &j_rms.mapv(|j| j * j);

        let inverse_skin_depth_4 = Zip::from(&sigma).and(&f_eq).map_collect(|&sigma, &f| {
            let delta = physics::skin_depth(
                ElectricalConductivity::new::<siemens_per_meter>(sigma),
                Frequency::new::<hertz>(f),
            );
            delta.get::<meter>().powi(4).recip()
        });
        let scaled_fill = &self.props.p_scale * &self.props.fill;
        let ac_hf = Zip::from(&scaled_fill)
            .and(&sigma)
            .and(&self.props.d_strand)
            .and(&inverse_skin_depth_4)
            .and(&h_rms)
            .map_collect(|&scaled_fill, &sigma, &d, &inv_delta_4, &h| {
                proximity_loss_density(scaled_fill, sigma, d, inv_delta_4, h)
            });

        let density = LossBreakdown::new(dc, ac_lf, ac_hf);

        Zip::from(&mut violations)
            .and(&density.total)
            .and(&self.props.p_max)
            .and(&f_eq)
            .and(&self.props.f_max)
            .for_each(|violations, &p, &p_max, &f_eq, &f_max| {
                *violations |= Violations::when(!p.is_finite(), Violations::NON_FINITE);
                *violations |= Violations::when(p > p_max, Violations::LOSS_DENSITY);
                *violations |= Violations::when(f_eq > f_max, Violations::FREQUENCY);
            });
        Zip::from(&mut violations)
            .and(&j_dc)
            .and(&j_rms)
            .and(&self.props.j_rms_max)
            .and(&non_finite)
            .for_each(|violations, &j_dc, &j_rms, &j_max, &bad| {
                let combined = j_dc.hypot(j_rms);
                *violations |= Violations::when(combined > j_max, Violations::CURRENT_DENSITY);
                *violations |= Violations::when(bad, Violations::NON_FINITE);
            });

        Ok(WindingLosses {
            valid: violations.mapv(Violations::is_empty),
            violations,
            losses: density.scaled(&self.volume),
            density,
            j_rms,
            h_rms,
            f_eq,
        })
    }
}

impl fmt::Debug for WindingLossModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindingLossModel")
            .field("samples", &self.len())
            .finish_non_exhaustive()
    }
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}

/// Copies a harmonic matrix with non-finite entries zeroed, marking the
/// affected samples in `non_finite`.
fn finite_columns(values: ArrayView2<'_, f64>, non_finite: &mut Array1<bool>) -> Array2<f64> {
    Zip::from(non_finite)
        .and(values.columns())
        .for_each(|bad, column| *bad |= column.iter().any(|x| !x.is_finite()));
    values.mapv(finite_or_zero)
}

/// Proximity loss density `scale·gr·32·fill/(σ·π²·d⁴)·H²` with the
/// geometric factor `gr = π²·d⁶/(128·δ⁴)`.
///
/// `scaled_fill` is `scale·fill`.
fn proximity_loss_density(
    scaled_fill: f64,
    sigma: f64,
    d_strand: f64,
    inverse_skin_depth_4: f64,
    h_rms: f64,
) -> f64 {
    let gr = PI.powi(2) * d_strand.powi(6) * inverse_skin_depth_4 / 128.0;
    gr * 32.0 * scaled_fill / (sigma * PI.powi(2) * d_strand.powi(4)) * h_rms.powi(2)
}
