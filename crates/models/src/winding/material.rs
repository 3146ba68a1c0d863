use magloss_core::{
    Axis, AxisScale, MaterialClass, MaterialKind, Surface, TableError, material::check_param,
};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Marker for litz-wire winding material tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindingMaterial;

/// Constant properties of a litz-wire winding material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindingParams {
    /// Conductor density [kg/m³].
    pub rho_conductor: f64,
    /// Filler (insulation) density [kg/m³].
    pub rho_iso: f64,
    /// Conductor cost per unit mass.
    pub kappa_conductor: f64,
    /// Filler cost per unit mass.
    pub kappa_iso: f64,
    /// Fixed cost offset.
    pub c_offset: f64,
    /// Fraction of the bundle cross-section occupied by strands.
    pub fill_litz: f64,
    /// Strand diameter [m].
    pub d_strand: f64,
    /// Maximum operating temperature [°C].
    pub t_max: f64,
    /// Combined RMS current density limit [A/m²].
    pub j_rms_max: f64,
    /// Loss density ceiling [W/m³].
    pub p_max: f64,
    /// Equivalent frequency limit [Hz].
    pub f_max: f64,
    /// Scaling factor applied to every loss term.
    pub p_scale: f64,
}

/// Conductor conductivity versus temperature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConductivityDef {
    /// Temperature [°C].
    pub t_vec: Vec<f64>,
    /// Electrical conductivity [S/m].
    pub sigma_vec: Vec<f64>,
}

impl MaterialKind for WindingMaterial {
    const CLASS: MaterialClass = MaterialClass::Winding;
    type Param = WindingParams;
    type Interp = ConductivityDef;

    fn validate(id: &str, param: &WindingParams) -> Result<(), TableError> {
        check_param(id, "rho_conductor", param.rho_conductor, |x| x > 0.0)?;
        check_param(id, "rho_iso", param.rho_iso, |x| x >= 0.0)?;
        check_param(id, "kappa_conductor", param.kappa_conductor, |x| x >= 0.0)?;
        check_param(id, "kappa_iso", param.kappa_iso, |x| x >= 0.0)?;
        check_param(id, "c_offset", param.c_offset, |x| x >= 0.0)?;
        check_param(id, "fill_litz", param.fill_litz, |x| x > 0.0 && x <= 1.0)?;
        check_param(id, "d_strand", param.d_strand, |x| x > 0.0)?;
        check_param(id, "t_max", param.t_max, |_| true)?;
        check_param(id, "j_rms_max", param.j_rms_max, |x| x > 0.0)?;
        check_param(id, "p_max", param.p_max, |x| x > 0.0)?;
        check_param(id, "f_max", param.f_max, |x| x > 0.0)?;
        check_param(id, "p_scale", param.p_scale, |x| x > 0.0)
    }

    fn surface(id: &str, interp: Option<ConductivityDef>) -> Result<Option<Surface>, TableError> {
        let ConductivityDef { t_vec, sigma_vec } =
            interp.ok_or_else(|| TableError::MissingSurface { id: id.to_owned() })?;

        if sigma_vec.iter().any(|&sigma| sigma.is_nan() || sigma <= 0.0) {
            return Err(TableError::InvalidSurface {
                id: id.to_owned(),
                reason: "`sigma_vec` must be strictly positive".to_owned(),
            });
        }

        let axis = Axis::new("t", AxisScale::Linear, t_vec)
            .map_err(|e| TableError::interpolation(id, e))?;
        let values = Array1::from(sigma_vec).into_dyn();

        Surface::new(vec![axis], values, AxisScale::Linear)
            .map(Some)
            .map_err(|e| TableError::interpolation(id, e))
    }
}
