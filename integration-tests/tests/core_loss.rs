use std::{f64::consts::PI, thread};

use approx::assert_relative_eq;
use integration_tests::{core_materials, power_law};
use magloss_core::{ModelError, Violations};
use magloss_models::{CoreLossConfig, CoreLossModel};
use ndarray::{Array1, array};

fn model(ids: &[&str]) -> CoreLossModel {
    let volume = Array1::from_elem(ids.len(), 2e-6);
    CoreLossModel::new(
        core_materials().unwrap(),
        ids,
        volume,
        CoreLossConfig::default(),
    )
    .unwrap()
}

#[test]
fn every_getter_returns_one_entry_per_sample() {
    let model = model(&["power_law", "alpha_one", "alpha_two", "power_law"]);
    let f = array![2e5, 5e4, 3e5, 2e6];
    let b = array![0.05, 0.2, 0.02, 0.1];
    let b_dc = array![0.0, 0.05, 0.1, 0.0];
    let t = array![50.0, 25.0, 100.0, 60.0];
    let duty = array![0.5, 0.3, 0.7, 0.5];

    assert_eq!(model.len(), 4);
    assert_eq!(model.get_mass().len(), 4);
    assert_eq!(model.get_cost().len(), 4);
    assert_eq!(model.get_temperature_limit().len(), 4);
    assert_eq!(model.get_flux_density_limit().len(), 4);

    let map = model
        .get_loss_density_map(f.view(), b.view(), b_dc.view(), t.view())
        .unwrap();
    assert_eq!(map.len(), 4);

    let sine = model
        .get_losses_sinusoidal(f.view(), b.view(), b_dc.view(), t.view())
        .unwrap();
    assert_eq!(sine.valid.len(), 4);
    assert_eq!(sine.losses.len(), 4);

    let fit = model
        .get_steinmetz_parameters(f.view(), b.view(), b_dc.view(), t.view())
        .unwrap();
    assert_eq!(fit.params.len(), 4);

    let triangle = model
        .get_losses_triangular(f.view(), duty.view(), b.view(), b_dc.view(), t.view())
        .unwrap();
    assert_eq!(triangle.loss_density.len(), 4);
}

#[test]
fn mass_and_cost() {
    let model = model(&["power_law"]);

    // 2e-6 m³ · 4850 kg/m³
    assert_relative_eq!(model.get_mass()[0], 9.7e-3, max_relative = 1e-12);
    assert_relative_eq!(model.get_cost()[0], 0.5 + 9.7e-3 * 5.0, max_relative = 1e-12);
    assert_eq!(model.get_temperature_limit(), array![120.0]);
    assert_eq!(model.get_flux_density_limit(), array![0.35]);
}

#[test]
fn sinusoidal_losses_inside_the_map() {
    let model = model(&["power_law"]);

    let losses = model
        .get_losses_sinusoidal(
            array![2e5].view(),
            array![0.05].view(),
            array![0.02].view(),
            array![50.0].view(),
        )
        .unwrap();

    let expected = power_law::loss_density(power_law::ALPHA, 2e5, 0.05);
    assert!(losses.valid[0]);
    assert_relative_eq!(losses.loss_density[0], expected, max_relative = 1e-10);
    assert_relative_eq!(losses.losses[0], expected * 2e-6, max_relative = 1e-10);
}

#[test]
fn out_of_range_queries_return_the_boundary_value() {
    let model = model(&["power_law", "power_law", "power_law"]);

    let losses = model
        .get_losses_sinusoidal(
            array![2e6, 5e3, 1e5].view(),
            array![0.1, 0.1, 0.1].view(),
            array![0.0, 0.0, 0.0].view(),
            array![50.0, 50.0, 150.0].view(),
        )
        .unwrap();

    assert_eq!(losses.valid, array![false, false, false]);
    assert!(losses.violations.iter().all(|v| *v == Violations::CLAMPED));

    let at = |f| power_law::loss_density(power_law::ALPHA, f, 0.1);
    assert_relative_eq!(losses.loss_density[0], at(1e6), max_relative = 1e-10);
    assert_relative_eq!(losses.loss_density[1], at(1e4), max_relative = 1e-10);
    assert_relative_eq!(losses.loss_density[2], at(1e5), max_relative = 1e-10);
}

#[test]
fn flux_beyond_saturation_is_flagged() {
    let model = model(&["power_law", "power_law"]);

    let losses = model
        .get_losses_sinusoidal(
            array![1e5, 1e5].view(),
            array![0.3, 0.2].view(),
            array![0.1, 0.1].view(),
            array![50.0, 50.0].view(),
        )
        .unwrap();

    assert_eq!(losses.violations[0], Violations::SATURATION);
    assert!(losses.violations[1].is_empty());
    assert_eq!(losses.valid, array![false, true]);
}

#[test]
fn steinmetz_parameters_recover_the_power_law() {
    let model = model(&["power_law", "alpha_two"]);

    let fit = model
        .get_steinmetz_parameters(
            array![2e5, 4e4].view(),
            array![0.05, 0.15].view(),
            array![0.05, 0.0].view(),
            array![40.0, 90.0].view(),
        )
        .unwrap();

    assert_eq!(fit.valid(), array![true, true]);
    assert_relative_eq!(fit.alpha()[0], power_law::ALPHA, max_relative = 1e-9);
    assert_relative_eq!(fit.beta()[0], power_law::BETA, max_relative = 1e-9);
    assert_relative_eq!(fit.k()[0], power_law::K, max_relative = 1e-7);
    assert_relative_eq!(fit.alpha()[1], 2.0, max_relative = 1e-9);
    assert_relative_eq!(fit.beta()[1], power_law::BETA, max_relative = 1e-9);
    assert_relative_eq!(fit.k()[1], power_law::K, max_relative = 1e-7);
}

#[test]
fn steinmetz_fit_at_the_map_edge_is_invalid() {
    let model = model(&["power_law"]);

    let fit = model
        .get_steinmetz_parameters(
            array![1e6].view(),
            array![0.05].view(),
            array![0.0].view(),
            array![50.0].view(),
        )
        .unwrap();

    assert!(!fit.valid()[0]);
    assert!(fit.violations[0].contains(Violations::CLAMPED));
    assert!(fit.params[0].k.is_finite());
}

#[test]
fn triangular_matches_sinusoidal_for_linear_frequency_dependence() {
    let model = model(&["alpha_one"]);
    let (f, b, b_dc, t) = (array![1e5], array![0.1], array![0.0], array![25.0]);

    let sine = model
        .get_losses_sinusoidal(f.view(), b.view(), b_dc.view(), t.view())
        .unwrap();
    let triangle = model
        .get_losses_triangular(f.view(), array![0.5].view(), b.view(), b_dc.view(), t.view())
        .unwrap();

    assert!(triangle.valid[0]);
    assert_relative_eq!(
        triangle.loss_density[0],
        sine.loss_density[0],
        max_relative = 1e-9
    );
}

#[test]
fn triangular_to_sinusoidal_ratio_for_quadratic_frequency_dependence() {
    // With α = 2 and duty 0.5 the IGSE triangle carries 8/π² of the sine loss.
    let model = model(&["alpha_two"]);
    let (f, b, b_dc, t) = (array![1e5], array![0.1], array![0.0], array![25.0]);

    let sine = model
        .get_losses_sinusoidal(f.view(), b.view(), b_dc.view(), t.view())
        .unwrap();
    let triangle = model
        .get_losses_triangular(f.view(), array![0.5].view(), b.view(), b_dc.view(), t.view())
        .unwrap();

    assert_relative_eq!(
        triangle.loss_density[0] / sine.loss_density[0],
        8.0 / (PI * PI),
        max_relative = 1e-9
    );
}

#[test]
fn duty_cycle_handling() {
    let model = model(&["power_law"; 4]);
    let f = array![1e5, 1e5, 1e5, 1e5];
    let b = array![0.1, 0.1, 0.1, 0.1];
    let b_dc = array![0.0, 0.0, 0.0, 0.0];
    let t = array![50.0, 50.0, 50.0, 50.0];

    let losses = model
        .get_losses_triangular(
            f.view(),
            array![0.2, 0.8, 0.0, 0.5].view(),
            b.view(),
            b_dc.view(),
            t.view(),
        )
        .unwrap();

    assert_relative_eq!(
        losses.loss_density[0],
        losses.loss_density[1],
        max_relative = 1e-12
    );
    // Skewed duty concentrates the flux slew, raising losses for α > 1.
    assert!(losses.loss_density[0] > losses.loss_density[3]);

    assert_eq!(losses.violations[2], Violations::DUTY_CYCLE);
    assert_eq!(losses.loss_density[2], losses.loss_density[3]);
    assert_eq!(losses.valid, array![true, true, false, true]);
}

#[test]
fn repeated_calls_are_bit_identical() {
    let model = model(&["power_law", "alpha_one", "alpha_two"]);
    let f = array![2e5, 2e6, 3e4];
    let duty = array![0.3, 0.5, 1.2];
    let b = array![0.05, 0.1, 0.25];
    let b_dc = array![0.0, 0.1, 0.05];
    let t = array![25.0, 80.0, 10.0];

    let first = model
        .get_losses_triangular(f.view(), duty.view(), b.view(), b_dc.view(), t.view())
        .unwrap();
    let second = model
        .get_losses_triangular(f.view(), duty.view(), b.view(), b_dc.view(), t.view())
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn non_finite_inputs_stay_contained() {
    let model = model(&["power_law", "power_law"]);

    let losses = model
        .get_losses_sinusoidal(
            array![f64::NAN, 1e5].view(),
            array![0.1, 0.1].view(),
            array![0.0, 0.0].view(),
            array![50.0, 50.0].view(),
        )
        .unwrap();

    assert!(losses.violations[0].contains(Violations::NON_FINITE));
    assert!(losses.loss_density[0].is_finite());
    assert!(losses.valid[1]);
    assert_relative_eq!(
        losses.loss_density[1],
        power_law::loss_density(power_law::ALPHA, 1e5, 0.1),
        max_relative = 1e-10
    );
}

#[test]
fn length_mismatch_is_an_error() {
    let model = model(&["power_law", "power_law"]);

    let err = model
        .get_losses_sinusoidal(
            array![1e5].view(),
            array![0.1, 0.1].view(),
            array![0.0, 0.0].view(),
            array![50.0, 50.0].view(),
        )
        .unwrap_err();

    assert!(matches!(err, ModelError::LengthMismatch { .. }));
}

#[test]
fn invalid_perturbation_is_rejected() {
    let config = CoreLossConfig {
        steinmetz_perturbation: 0.0,
    };

    let result = CoreLossModel::new(core_materials().unwrap(), &["power_law"], array![1e-6], config);

    assert!(matches!(result, Err(ModelError::InvalidConfig(_))));
}

#[test]
fn invalid_volume_is_rejected() {
    for volume in [f64::NAN, -1e-6] {
        let result = CoreLossModel::new(
            core_materials().unwrap(),
            &["power_law", "alpha_one"],
            array![1e-6, volume],
            CoreLossConfig::default(),
        );

        assert!(matches!(
            result,
            Err(ModelError::InvalidInput {
                name: "volume",
                index: 1,
                ..
            })
        ));
    }
}

#[test]
fn shared_model_serves_concurrent_callers() {
    let model = model(&["power_law", "alpha_one", "alpha_two", "power_law"]);
    let f = array![2e5, 5e4, 3e5, 1e4];
    let b = array![0.05, 0.2, 0.02, 0.1];
    let zeros = Array1::zeros(4);
    let t = Array1::from_elem(4, 50.0);

    let sequential = model
        .get_losses_sinusoidal(f.view(), b.view(), zeros.view(), t.view())
        .unwrap();

    let concurrent: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let (model, f, b, zeros, t) = (&model, &f, &b, &zeros, &t);
                scope.spawn(move || {
                    model
                        .get_losses_sinusoidal(f.view(), b.view(), zeros.view(), t.view())
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for losses in concurrent {
        assert_eq!(losses, sequential);
    }
}
