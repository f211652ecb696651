// jf-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, Force as UomForce, MassRate as UomMassRate, Power as UomPower,
    Pressure as UomPressure, Ratio as UomRatio,
    ThermodynamicTemperature as UomThermodynamicTemperature, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Force = UomForce;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn newtons(v: f64) -> Force {
    use uom::si::force::newton;
    Force::new::<newton>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

pub mod constants {
    /// Specific gas constant of air and lean combustion products [J/(kg·K)].
    pub const R_AIR: f64 = 287.0;

    /// Lower heating value of kerosene-type jet fuel [J/kg].
    pub const LHV_JET_A: f64 = 43.0e6;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        assert_eq!(pa(101_325.0).value, 101_325.0);
        assert_eq!(k(288.0).value, 288.0);
        assert_eq!(kgps(160.0).value, 160.0);
        assert_eq!(mps(840.0).value, 840.0);
        assert_eq!(newtons(1.0e5).value, 1.0e5);
        assert_eq!(watts(3.91e6).value, 3.91e6);
        assert_eq!(m2(0.5).value, 0.5);
        assert_eq!(unitless(0.5).value, 0.5);
    }
}
