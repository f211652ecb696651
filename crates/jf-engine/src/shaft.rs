//! Shafts: mechanical coupling between work producers and consumers.

use jf_core::{CompId, ShaftId};

/// A spool linking turbines to the compressors, fans, propellers and
/// electrical loads they drive.
///
/// The shaft never touches the flow; it only balances work. Its turbines
/// must supply
///
/// ```text
/// W = (Σ w_geared / eta_gearbox + Σ w_direct) / eta
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Shaft {
    pub id: ShaftId,
    /// Mechanical efficiency
    pub eta: f64,
    /// Gearbox efficiency applied to fans and propellers
    pub eta_gearbox: f64,
    pub members: Vec<CompId>,
}

/// Work a consumer puts on the shaft, as seen by the balance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConsumerWork {
    pub work: f64,
    pub geared: bool,
}

impl Shaft {
    /// Work the shaft's producers must extract for the given consumers [W].
    pub fn required_work(&self, consumers: impl IntoIterator<Item = ConsumerWork>) -> f64 {
        let exerted: f64 = consumers
            .into_iter()
            .map(|c| {
                if c.geared {
                    c.work / self.eta_gearbox
                } else {
                    c.work
                }
            })
            .sum();
        exerted / self.eta
    }
}
