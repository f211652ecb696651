use std::path::PathBuf;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn demos_load_and_validate() {
    for name in ["turbojet.yaml", "turbofan.yaml"] {
        let def = jf_project::load_yaml(&demo(name))
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        jf_project::validate_engine(&def)
            .unwrap_or_else(|e| panic!("Failed to validate {}: {}", name, e));
    }
}

#[test]
fn turbojet_demo_runs() {
    let def = jf_project::load_yaml(&demo("turbojet.yaml")).unwrap();
    let mut built = jf_project::build_system(&def).unwrap();
    built.system.run().unwrap();

    let hpc = built.system.stage("0.cp2").unwrap();
    assert!((hpc.state.t0 - 711.4819).abs() < 0.7);
    assert!((hpc.state.p0 - 1_491_504.0).abs() < 1_500.0);

    let core = built.stream("core").unwrap();
    let exhaust = built.system.stream_performance(core).unwrap();
    assert!((exhaust.exit_velocity.value - 840.3).abs() < 0.05 * 840.3);
}

#[test]
fn turbofan_demo_maps_names_to_paths() {
    let def = jf_project::load_yaml(&demo("turbofan.yaml")).unwrap();
    let mut built = jf_project::build_system(&def).unwrap();
    built.system.run().unwrap();

    let path = |id: &str| {
        built
            .system
            .stream(built.stream(id).unwrap())
            .unwrap()
            .path
            .clone()
    };
    assert_eq!(path("intake"), "0");
    assert_eq!(path("core"), "1.s");
    assert_eq!(path("bypass"), "1.m");

    let fan = built.component("fan").unwrap();
    assert_eq!(built.system.stage_path(fan).as_deref(), Some("0.fn"));
    assert_eq!(built.shafts.len(), 3);

    let summary = built.system.summary().unwrap();
    assert_eq!(summary.exhausts.len(), 2);
    assert!(summary.thrust > 0.0);
    assert!(summary.sfc.is_some());
}
