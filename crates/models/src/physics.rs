//! Physical constants and unit-checked helper formulas.

use std::f64::consts::PI;

use uom::si::{
    f64::{ElectricalConductivity, Frequency, Length, MagneticPermeability},
    length::meter,
    magnetic_permeability::henry_per_meter,
};

/// Vacuum permeability `μ0 = 4π·10⁻⁷ H/m`.
#[must_use]
pub fn vacuum_permeability() -> MagneticPermeability {
    MagneticPermeability::new::<henry_per_meter>(4.0e-7 * PI)
}

/// Skin depth `δ = 1/√(π·μ0·σ·f)` of a non-magnetic conductor.
///
/// Returns an infinite depth at zero frequency.
#[must_use]
pub fn skin_depth(conductivity: ElectricalConductivity, frequency: Frequency) -> Length {
    // π·μ0·σ·f has units of 1/m², so its base value is in 1/m².
    let inverse_area = PI * vacuum_permeability() * conductivity * frequency;
    Length::new::<meter>(inverse_area.value.sqrt().recip())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::{electrical_conductivity::siemens_per_meter, frequency::hertz};

    use super::*;

    #[test]
    fn copper_skin_depth_at_100_khz() {
        let delta = skin_depth(
            ElectricalConductivity::new::<siemens_per_meter>(58.0e6),
            Frequency::new::<hertz>(100e3),
        );

        // δ = 1/√(π·4π·10⁻⁷·58·10⁶·10⁵) ≈ 0.209 mm
        let expected = 1.0 / (PI * 4.0e-7 * PI * 58.0e6 * 100e3_f64).sqrt();
        assert_relative_eq!(delta.get::<meter>(), expected, max_relative = 1e-12);
        assert_relative_eq!(delta.get::<meter>(), 0.209e-3, max_relative = 1e-2);
    }

    #[test]
    fn dc_skin_depth_is_infinite() {
        let delta = skin_depth(
            ElectricalConductivity::new::<siemens_per_meter>(58.0e6),
            Frequency::new::<hertz>(0.0),
        );

        assert!(delta.get::<meter>().is_infinite());
    }
}
