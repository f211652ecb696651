use jf_project::schema::*;
use jf_project::{ProjectError, ValidationError, build_system, validate_engine};

fn base() -> EngineDef {
    serde_yaml::from_str(
        r#"
version: 1
name: Split
flight: { mass_flow_kgps: 100.0, mach: 0.3, temperature_k: 288.15, pressure_pa: 101325.0 }
components:
  - { id: c, name: Compressor, kind: { type: compressor, eta: 0.9, pi: 3.0 } }
  - { id: t, name: Turbine, kind: { type: turbine, eta: 0.9 } }
  - { id: b, name: Burner, kind: { type: combustor, eta: 0.99, t01_k: 1300.0 } }
  - { id: n1, name: Nozzle 1, kind: { type: nozzle, eta: 0.95 } }
  - { id: n2, name: Nozzle 2, kind: { type: nozzle, eta: 0.95 } }
shafts:
  - { id: s, members: [c, t], eta: 0.99 }
streams:
  - { id: main, components: [c, b, t] }
  - { id: left, components: [n1] }
  - { id: right, components: [n2] }
diversions:
  - { parent: main, fraction: 0.5, first: left, second: right, labels: [l, r] }
"#,
    )
    .unwrap()
}

#[test]
fn base_definition_is_valid_and_builds() {
    let def = base();
    validate_engine(&def).unwrap();

    let mut built = build_system(&def).unwrap();
    let left = built.stream("left").unwrap();
    assert_eq!(built.system.stream(left).unwrap().path, "1.l");
    built.system.run().unwrap();
    assert_eq!(built.system.exhaust_streams().unwrap().len(), 2);
}

#[test]
fn unsupported_version() {
    let mut def = base();
    def.version = 7;
    assert_eq!(
        validate_engine(&def),
        Err(ValidationError::UnsupportedVersion { version: 7 })
    );
}

#[test]
fn duplicate_component_id() {
    let mut def = base();
    let copy = def.components[0].clone();
    def.components.push(copy);
    assert!(matches!(
        validate_engine(&def),
        Err(ValidationError::DuplicateId { id, .. }) if id == "c"
    ));
}

#[test]
fn component_on_two_streams() {
    let mut def = base();
    def.streams[1].components.push("c".to_string());
    assert!(matches!(
        validate_engine(&def),
        Err(ValidationError::DuplicateId { id, .. }) if id == "c"
    ));
}

#[test]
fn dangling_references() {
    let mut def = base();
    def.shafts[0].members.push("ghost".to_string());
    assert!(matches!(
        validate_engine(&def),
        Err(ValidationError::MissingReference { id, .. }) if id == "ghost"
    ));

    let mut def = base();
    def.diversions[0].parent = "nowhere".to_string();
    assert!(matches!(
        validate_engine(&def),
        Err(ValidationError::MissingReference { id, .. }) if id == "nowhere"
    ));
}

#[test]
fn compressor_needs_exactly_one_ratio() {
    let mut def = base();
    def.components[0].kind = ComponentKind::Compressor(RatioDef {
        eta: 0.9,
        pi: Some(3.0),
        tau: Some(1.4),
    });
    assert!(matches!(
        validate_engine(&def),
        Err(ValidationError::InvalidValue { .. })
    ));

    def.components[0].kind = ComponentKind::Compressor(RatioDef {
        eta: 0.9,
        pi: None,
        tau: None,
    });
    assert!(matches!(
        validate_engine(&def),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn fraction_out_of_range() {
    let mut def = base();
    def.diversions[0].fraction = -0.1;
    assert!(matches!(
        validate_engine(&def),
        Err(ValidationError::InvalidValue { field, .. }) if field.contains("fraction")
    ));
}

#[test]
fn streams_branch_once() {
    let mut def = base();
    for id in ["x", "y"] {
        def.streams.push(StreamDef {
            id: id.to_string(),
            components: vec![],
        });
    }
    def.diversions.push(DiversionDef {
        parent: "main".to_string(),
        fraction: 0.3,
        first: "x".to_string(),
        second: "y".to_string(),
        labels: None,
    });
    assert!(matches!(
        validate_engine(&def),
        Err(ValidationError::DuplicateId { id, .. }) if id == "main"
    ));

    let mut def = base();
    def.streams.push(StreamDef {
        id: "mixed".to_string(),
        components: vec![],
    });
    def.merges.push(MergeDef {
        parents: ("main".to_string(), "left".to_string()),
        into: "mixed".to_string(),
    });
    assert!(matches!(
        validate_engine(&def),
        Err(ValidationError::DuplicateId { id, .. }) if id == "main"
    ));
}

#[test]
fn self_derived_streams_are_rejected() {
    let mut def = base();
    // left feeds main which feeds left
    def.merges.push(MergeDef {
        parents: ("left".to_string(), "right".to_string()),
        into: "main".to_string(),
    });
    assert!(validate_engine(&def).is_err());
}

#[test]
fn afterburner_needs_a_schedule() {
    let mut def = base();
    def.components[2].kind = ComponentKind::Afterburner(BurnerDef {
        eta: 0.9,
        fuel: None,
        pi: None,
        t01_k: None,
        fuel_mf_kgps: None,
    });
    assert!(validate_engine(&def).is_err());
}

#[test]
fn build_rejects_invalid_definitions() {
    let mut def = base();
    def.shafts[0].eta = 1.5;
    assert!(matches!(
        build_system(&def),
        Err(ProjectError::Validation(_))
    ));
}
