use std::sync::Arc;

use integration_tests::{core_materials, fixture_path, insulation_materials, winding_materials};
use magloss_core::{MaterialClass, MaterialSet, ModelError, TableError};
use magloss_models::{
    CoreLossConfig, CoreLossModel, CoreMaterial, InsulationModel, WindingLossModel,
    WindingMaterial,
};
use ndarray::{Array1, array};

#[test]
fn fixtures_load() {
    assert_eq!(core_materials().unwrap().len(), 3);
    assert_eq!(winding_materials().unwrap().len(), 2);
    assert_eq!(insulation_materials().unwrap().len(), 2);
}

#[test]
fn unknown_material_is_fatal() {
    let err = InsulationModel::new(
        insulation_materials().unwrap(),
        &["epoxy", "mystery", "kapton"],
        array![1e-6, 1e-6, 1e-6],
    )
    .unwrap_err();

    match err {
        ModelError::UnknownMaterial { sample, id } => {
            assert_eq!(sample, 1);
            assert_eq!(id, "mystery");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = CoreLossModel::new(
        core_materials().unwrap(),
        &["N87"],
        array![1e-6],
        CoreLossConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::UnknownMaterial { sample: 0, .. }));
}

#[test]
fn wrong_class_is_fatal() {
    let err = MaterialSet::<CoreMaterial>::from_path(fixture_path("winding.json")).unwrap_err();
    assert!(matches!(
        err,
        TableError::ClassMismatch {
            expected: MaterialClass::Core,
            found: MaterialClass::Winding,
        }
    ));

    let err = MaterialSet::<WindingMaterial>::from_path(fixture_path("iso.json")).unwrap_err();
    assert!(matches!(
        err,
        TableError::ClassMismatch {
            expected: MaterialClass::Winding,
            found: MaterialClass::Iso,
        }
    ));
}

#[test]
fn missing_table_file_is_fatal() {
    let err = MaterialSet::<CoreMaterial>::from_path(fixture_path("missing.json")).unwrap_err();
    assert!(matches!(err, TableError::Io(_)));
}

#[test]
fn empty_sample_set() {
    let ids: [&str; 0] = [];
    let model = WindingLossModel::new(
        winding_materials().unwrap(),
        &ids,
        Array1::zeros(0),
        Array1::zeros(0),
    )
    .unwrap();

    assert!(model.is_empty());
    assert_eq!(model.get_mass().len(), 0);
}

#[test]
fn models_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<CoreLossModel>();
    assert_send_sync::<WindingLossModel>();
    assert_send_sync::<InsulationModel>();
    assert_send_sync::<Arc<MaterialSet<CoreMaterial>>>();
}
