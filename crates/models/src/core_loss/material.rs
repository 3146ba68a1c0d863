use magloss_core::{
    Axis, AxisScale, MaterialClass, MaterialKind, Surface, TableError, material::check_param,
};
use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

/// Marker for core (ferrite) material tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreMaterial;

/// Constant properties of a core material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreParams {
    /// Density [kg/m³].
    pub rho: f64,
    /// Cost per unit mass.
    pub kappa: f64,
    /// Fixed cost offset.
    pub c_offset: f64,
    /// Maximum operating temperature [°C].
    pub t_max: f64,
    /// Saturation flux density limit [T].
    pub b_sat_max: f64,
    /// Loss density ceiling [W/m³].
    pub p_max: f64,
    /// Scaling factor applied to the tabulated loss map.
    pub p_scale: f64,
}

/// Tabulated loss map of a core material.
///
/// `p_mat[i][j][k][l]` is the loss density [W/m³] at `f_vec[i]`,
/// `b_ac_peak_vec[j]`, `b_dc_vec[k]` and `t_vec[l]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LossMapDef {
    /// Frequency [Hz].
    pub f_vec: Vec<f64>,
    /// AC flux density peak [T].
    pub b_ac_peak_vec: Vec<f64>,
    /// DC flux density bias [T].
    pub b_dc_vec: Vec<f64>,
    /// Temperature [°C].
    pub t_vec: Vec<f64>,
    pub p_mat: Vec<Vec<Vec<Vec<f64>>>>,
}

impl MaterialKind for CoreMaterial {
    const CLASS: MaterialClass = MaterialClass::Core;
    type Param = CoreParams;
    type Interp = LossMapDef;

    fn validate(id: &str, param: &CoreParams) -> Result<(), TableError> {
        check_param(id, "rho", param.rho, |x| x > 0.0)?;
        check_param(id, "kappa", param.kappa, |x| x >= 0.0)?;
        check_param(id, "c_offset", param.c_offset, |x| x >= 0.0)?;
        check_param(id, "t_max", param.t_max, |_| true)?;
        check_param(id, "b_sat_max", param.b_sat_max, |x| x > 0.0)?;
        check_param(id, "p_max", param.p_max, |x| x > 0.0)?;
        check_param(id, "p_scale", param.p_scale, |x| x > 0.0)
    }

    fn surface(id: &str, interp: Option<LossMapDef>) -> Result<Option<Surface>, TableError> {
        let map = interp.ok_or_else(|| TableError::MissingSurface { id: id.to_owned() })?;
        let shape = [
            map.f_vec.len(),
            map.b_ac_peak_vec.len(),
            map.b_dc_vec.len(),
            map.t_vec.len(),
        ];
        let values = loss_values(id, map.p_mat, shape)?;

        let axes = [
            ("f", AxisScale::Log10, map.f_vec),
            ("b_ac_peak", AxisScale::Log10, map.b_ac_peak_vec),
            ("b_dc", AxisScale::Linear, map.b_dc_vec),
            ("t", AxisScale::Linear, map.t_vec),
        ]
        .into_iter()
        .map(|(name, scale, points)| Axis::new(name, scale, points))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TableError::interpolation(id, e))?;

        Surface::new(axes, values, AxisScale::Log10)
            .map(Some)
            .map_err(|e| TableError::interpolation(id, e))
    }
}

/// Flattens the nested loss map, rejecting ragged levels.
fn loss_values(
    id: &str,
    p_mat: Vec<Vec<Vec<Vec<f64>>>>,
    shape: [usize; 4],
) -> Result<ArrayD<f64>, TableError> {
    let ragged = || TableError::InvalidSurface {
        id: id.to_owned(),
        reason: format!("`p_mat` must have shape {shape:?}"),
    };

    if p_mat.len() != shape[0] {
        return Err(ragged());
    }

    let mut flat = Vec::with_capacity(shape.iter().product());
    for plane in p_mat {
        if plane.len() != shape[1] {
            return Err(ragged());
        }
        for row in plane {
            if row.len() != shape[2] {
                return Err(ragged());
            }
            for column in row {
                if column.len() != shape[3] {
                    return Err(ragged());
                }
                flat.extend(column);
            }
        }
    }

    ArrayD::from_shape_vec(IxDyn(&shape), flat).map_err(|_| ragged())
}

#[cfg(test)]
mod tests {
    use magloss_core::{InterpError, MaterialSet};
    use serde_json::json;

    use super::*;

    fn table(p_mat: serde_json::Value, f_vec: serde_json::Value) -> serde_json::Value {
        json!({
            "type": "core",
            "data": [{
                "id": "N87",
                "param": {
                    "rho": 4850.0, "kappa": 5.0, "c_offset": 0.0, "t_max": 130.0,
                    "b_sat_max": 0.4, "p_max": 1e6, "p_scale": 1.0
                },
                "interp": {
                    "f_vec": f_vec,
                    "b_ac_peak_vec": [0.01, 0.1],
                    "b_dc_vec": [0.0],
                    "t_vec": [25.0, 100.0],
                    "p_mat": p_mat
                }
            }]
        })
    }

    fn load(value: serde_json::Value) -> Result<MaterialSet<CoreMaterial>, TableError> {
        MaterialSet::new(serde_json::from_value(value)?)
    }

    #[test]
    fn builds_four_axis_surface() {
        let p_mat = json!([
            [[[1e2, 2e2]], [[1e4, 2e4]]],
            [[[1e3, 2e3]], [[1e5, 2e5]]]
        ]);
        let set = load(table(p_mat, json!([1e4, 1e5]))).unwrap();

        let surface = set.records()[0].surface().unwrap();
        let names: Vec<_> = surface.axes().iter().map(Axis::name).collect();
        assert_eq!(names, ["f", "b_ac_peak", "b_dc", "t"]);
        assert_eq!(surface.value_scale(), AxisScale::Log10);
    }

    #[test]
    fn rejects_ragged_loss_map() {
        let p_mat = json!([
            [[[1e2, 2e2]], [[1e4]]],
            [[[1e3, 2e3]], [[1e5, 2e5]]]
        ]);
        assert!(matches!(
            load(table(p_mat, json!([1e4, 1e5]))),
            Err(TableError::InvalidSurface { .. })
        ));
    }

    #[test]
    fn rejects_non_positive_log_data() {
        let p_mat = json!([
            [[[1e2, 2e2]], [[1e4, 2e4]]],
            [[[1e3, 0.0]], [[1e5, 2e5]]]
        ]);
        assert!(matches!(
            load(table(p_mat, json!([1e4, 1e5]))),
            Err(TableError::Interpolation {
                source: InterpError::NonFiniteValues { .. },
                ..
            })
        ));

        let p_mat = json!([
            [[[1e2, 2e2]], [[1e4, 2e4]]],
            [[[1e3, 2e3]], [[1e5, 2e5]]]
        ]);
        assert!(matches!(
            load(table(p_mat, json!([0.0, 1e5]))),
            Err(TableError::Interpolation {
                source: InterpError::NonFiniteAxis { axis: "f", .. },
                ..
            })
        ));
    }
}
