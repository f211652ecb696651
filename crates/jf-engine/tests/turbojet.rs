//! Twin-spool turbojet with afterburner, end to end.

use jf_components::{Combustor, Compressor, Inlet, Nozzle, Turbine};
use jf_core::units::{k, kgps, pa};
use jf_core::within_fraction;
use jf_engine::{EngineError, StageQuantity, System};
use jf_fluids::{FluidState, Fuel, GasProperties, RatioSpec};

fn turbojet() -> System {
    let air = FluidState::new(
        kgps(160.0),
        GasProperties::air_and_products(1000.0),
        0.0,
        k(288.0),
        pa(101_325.0),
    )
    .unwrap();

    let mut engine = System::new();
    let s = engine.root_stream(air).unwrap();
    engine.connect(s, Inlet::with_recovery("inlet", 0.92).unwrap()).unwrap();
    let c1 = engine
        .connect(s, Compressor::new("lpc", 0.85, RatioSpec::Pressure(4.0)).unwrap())
        .unwrap();
    let c2 = engine
        .connect(s, Compressor::new("hpc", 0.85, RatioSpec::Pressure(4.0)).unwrap())
        .unwrap();
    engine
        .connect(
            s,
            Combustor::chamber("burner", Fuel::jet_a(), 0.97)
                .unwrap()
                .with_exit_temperature(1450.0)
                .unwrap(),
        )
        .unwrap();
    let t1 = engine.connect(s, Turbine::self_sizing("hpt", 0.9).unwrap()).unwrap();
    let t2 = engine.connect(s, Turbine::self_sizing("lpt", 0.9).unwrap()).unwrap();
    engine
        .connect(
            s,
            Combustor::afterburner("reheat", Fuel::jet_a(), 0.95)
                .unwrap()
                .with_exit_temperature(1850.0)
                .unwrap(),
        )
        .unwrap();
    engine.connect(s, Nozzle::new("nozzle", 0.95).unwrap()).unwrap();

    engine.add_shaft(&[c1, t2], 0.99).unwrap();
    engine.add_shaft(&[c2, t1], 0.99).unwrap();
    engine
}

fn assert_near(actual: f64, expected: f64, fraction: f64) {
    assert!(
        within_fraction(actual, expected, fraction),
        "{actual} not within {fraction} of {expected}"
    );
}

#[test]
fn compression_matches_reference() {
    let mut engine = turbojet();
    engine.run().unwrap();

    let inlet = engine.stage("0.il").unwrap();
    assert_near(inlet.state.t0, 288.0, 1e-3);
    assert_near(inlet.state.p0, 93_219.0, 1e-3);

    let lpc = engine.stage("0.cp1").unwrap();
    assert_near(lpc.state.t0, 452.6663, 1e-3);
    assert_near(lpc.state.p0, 372_876.0, 1e-3);

    let hpc = engine.stage("0.cp2").unwrap();
    assert_near(hpc.state.t0, 711.4819, 1e-3);
    assert_near(hpc.state.p0, 1_491_504.0, 1e-3);
}

#[test]
fn hot_section_matches_reference() {
    let mut engine = turbojet();
    engine.run().unwrap();

    assert_near(engine.stage("0.cc").unwrap().state.t0, 1450.0, 1e-6);
    assert_near(engine.stage("0.tb1").unwrap().state.t0, 1227.1, 0.05);
    assert_near(engine.stage("0.tb2").unwrap().state.t0, 1085.3, 0.05);
    assert_near(engine.stage("0.ab").unwrap().state.t0, 1850.0, 1e-6);

    let stream = engine.stream_by_path("0").unwrap().id;
    let exhaust = engine.stream_performance(stream).unwrap();
    assert!(exhaust.choked);
    assert_near(exhaust.exit_velocity.value, 840.3, 0.05);
}

#[test]
fn turbines_balance_their_shafts() {
    let mut engine = turbojet();
    engine.run().unwrap();

    let hpc = engine.stage("0.cp2").unwrap().work();
    let hpt = engine.stage("0.tb1").unwrap().work();
    assert_near(-hpt, hpc / 0.99, 1e-9);

    let lpc = engine.stage("0.cp1").unwrap().work();
    let lpt = engine.stage("0.tb2").unwrap().work();
    assert_near(-lpt, lpc / 0.99, 1e-9);
}

#[test]
fn fuel_and_efficiencies() {
    let mut engine = turbojet();
    engine.run().unwrap();

    let burner_fuel = engine.stage("0.cc").unwrap().fuel_mf;
    assert_near(burner_fuel, 3.326, 0.01);

    let fuel = engine.fuel_mass_flow().unwrap().value;
    let reheat_fuel = engine.stage("0.ab").unwrap().fuel_mf;
    assert_near(fuel, burner_fuel + reheat_fuel, 1e-12);
    assert_near(engine.heat_input().unwrap().value, fuel * 43.0e6, 1e-9);

    let thrust = engine.thrust().unwrap().value;
    assert!(thrust > 0.0);
    assert_near(engine.sfc().unwrap(), fuel / thrust, 1e-12);

    // Static engine: no propulsive work is done on the airframe
    assert_eq!(engine.propulsive_efficiency().unwrap(), 0.0);
    assert_eq!(engine.overall_efficiency().unwrap(), 0.0);
    let thermal = engine.thermal_efficiency().unwrap();
    assert!(thermal > 0.0 && thermal < 1.0);

    let work = engine.work_required().unwrap().value;
    let compressors = engine.stage("0.cp1").unwrap().work() + engine.stage("0.cp2").unwrap().work();
    assert_near(work, compressors, 1e-12);
}

#[test]
fn profiles_follow_stage_order() {
    let mut engine = turbojet();
    engine.run().unwrap();

    let temps = engine.profile_by_path("0", StageQuantity::Temperature).unwrap();
    let paths: Vec<&str> = temps.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(
        paths,
        ["0.il", "0.cp1", "0.cp2", "0.cc", "0.tb1", "0.tb2", "0.ab", "0.nz"]
    );
    assert!(temps[3].value > temps[2].value);

    let entropy = engine.profile_by_path("0", StageQuantity::SpecificEntropy).unwrap();
    // Lossy compression and heat addition both raise entropy
    assert!(entropy[2].value > entropy[0].value);
    assert!(entropy[3].value > entropy[2].value);
}

#[test]
fn summary_serializes() {
    let mut engine = turbojet();
    engine.run().unwrap();

    let summary = engine.summary().unwrap();
    assert_eq!(summary.exhausts.len(), 1);
    assert_eq!(summary.exhausts[0].path, "0");
    assert!(summary.thermal_efficiency.is_some());

    let json = serde_json::to_string(&summary).unwrap();
    let back: jf_engine::PerformanceSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(back.exhausts, summary.exhausts);
}

#[test]
fn runs_only_once() {
    let mut engine = turbojet();
    assert_eq!(engine.thrust(), Err(EngineError::NotRun));
    assert_eq!(engine.stage("0.cc").err(), Some(EngineError::NotRun));
    engine.run().unwrap();
    assert_eq!(engine.run(), Err(EngineError::AlreadyRun));
}

#[test]
fn unknown_stage_path_is_reported() {
    let mut engine = turbojet();
    engine.run().unwrap();
    assert_eq!(
        engine.stage("0.cp3").err(),
        Some(EngineError::StageNotFound {
            path: "0.cp3".to_string()
        })
    );
}
