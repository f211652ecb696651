//! Integration tests chaining components by hand.

use jf_components::{
    Combustor, ComponentResult, Compressor, EngineComponent, Inlet, NoContext, Nozzle, Role,
    StageContext, Turbine,
};
use jf_core::units::{k, kgps, pa};
use jf_fluids::{FluidState, Fuel, GasProperties, RatioSpec};

/// Shaft with a single, already executed consumer.
struct SingleConsumer {
    work: f64,
    eta: f64,
}

impl StageContext for SingleConsumer {
    fn shaft_work_demand(&self) -> ComponentResult<f64> {
        Ok(self.work / self.eta)
    }

    fn downstream_work_demand(&self) -> ComponentResult<f64> {
        Ok(self.work / self.eta)
    }
}

fn run(component: &dyn EngineComponent, gas: &mut FluidState, ctx: &dyn StageContext) -> f64 {
    let out = component.transfer(gas, ctx).unwrap();
    gas.add_fuel(out.fuel_mf).unwrap();
    gas.apply(&out.record);
    out.record.work
}

#[test]
fn reversible_compressor_undone_by_reversible_turbine() {
    let mut gas = FluidState::new(
        kgps(50.0),
        GasProperties::constant(1005.0, 1.4),
        0.0,
        k(288.0),
        pa(101_325.0),
    )
    .unwrap();
    let (t_start, p_start) = (gas.t0, gas.p0);

    let compressor = Compressor::new("c", 1.0, RatioSpec::Pressure(6.0)).unwrap();
    let turbine = Turbine::self_sizing("t", 1.0).unwrap();

    let work = run(&compressor, &mut gas, &NoContext);
    run(&turbine, &mut gas, &SingleConsumer { work, eta: 1.0 });

    assert!((gas.t0 - t_start).abs() < 1e-9 * t_start);
    assert!((gas.p0 - p_start).abs() < 1e-6 * p_start);
}

#[test]
fn self_sized_turbine_supplies_work_over_shaft_efficiency() {
    let mut gas = FluidState::new(
        kgps(160.0),
        GasProperties::air_and_products(600.0),
        0.0,
        k(288.0),
        pa(101_325.0),
    )
    .unwrap();
    let compressor = Compressor::new("c", 0.85, RatioSpec::Pressure(4.0)).unwrap();
    let work = run(&compressor, &mut gas, &NoContext);

    let cc = Combustor::chamber("cc", Fuel::jet_a(), 0.97)
        .unwrap()
        .with_exit_temperature(1400.0)
        .unwrap();
    let ctx = SingleConsumer { work, eta: 0.99 };
    run(&cc, &mut gas, &ctx);

    let cp = gas.cp().unwrap();
    let (mf, t0) = (gas.mf, gas.t0);
    let turbine = Turbine::self_sizing("t", 0.9).unwrap();
    let out = turbine.transfer(&gas, &ctx).unwrap();
    let lhs = mf * cp * t0 * (1.0 - out.record.tau);
    assert!((lhs - work / 0.99).abs() < 1e-6 * work);
}

#[test]
fn roles_classify_components() {
    let inlet = Inlet::with_recovery("il", 0.92).unwrap();
    let nozzle = Nozzle::new("nz", 0.95).unwrap();
    let turbine = Turbine::self_sizing("tb", 0.9).unwrap();
    assert_eq!(inlet.role(), Role::Passive);
    assert_eq!(turbine.role(), Role::WorkProducer);
    assert!(nozzle.is_exhaust());
    assert!(!inlet.is_exhaust());
}
