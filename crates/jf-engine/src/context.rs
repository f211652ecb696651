//! Engine-level context handed to each executing stage.

use std::collections::BTreeSet;

use jf_components::{ComponentError, ComponentResult, Role, StageContext};
use jf_core::{CompId, ShaftId, StreamId};

use crate::system::System;

/// Where in the system a stage is executing.
pub(crate) struct RunContext<'a> {
    system: &'a System,
    stream: StreamId,
    position: usize,
    component: CompId,
}

impl<'a> RunContext<'a> {
    pub(crate) fn new(system: &'a System, stream: StreamId, position: usize, component: CompId) -> Self {
        Self {
            system,
            stream,
            position,
            component,
        }
    }

    fn collect_producer_shafts(&self, components: &[CompId], shafts: &mut BTreeSet<ShaftId>) {
        for &c in components {
            let is_producer = self
                .system
                .component(c)
                .is_ok_and(|comp| comp.role() == Role::WorkProducer);
            if let (true, Some(shaft)) = (is_producer, self.system.shaft_of(c)) {
                shafts.insert(shaft);
            }
        }
    }
}

impl StageContext for RunContext<'_> {
    /// Shaft demand minus what producers on the same shaft already extracted.
    fn shaft_work_demand(&self) -> ComponentResult<f64> {
        let code = self
            .system
            .component(self.component)
            .map(|c| c.code())
            .unwrap_or("stage");
        let shaft_id = self
            .system
            .shaft_of(self.component)
            .ok_or(ComponentError::NotOnShaft { code })?;
        let demand = self.system.shaft_required_work(shaft_id)?;

        let shaft = self
            .system
            .shaft(shaft_id)
            .map_err(|_| ComponentError::InvalidArg {
                what: "shaft outside the system",
            })?;
        let extracted: f64 = shaft
            .members
            .iter()
            .filter(|m| **m != self.component)
            .filter_map(|m| self.system.snapshot(*m))
            .filter(|s| s.role == Role::WorkProducer)
            .map(|s| -s.record.work)
            .sum();
        Ok((demand - extracted).max(0.0))
    }

    /// Required work of every distinct shaft driven by a turbine after this
    /// stage, in this stream or any stream it feeds.
    fn downstream_work_demand(&self) -> ComponentResult<f64> {
        let outside = |_| ComponentError::InvalidArg {
            what: "stream outside the system",
        };
        let mut shafts = BTreeSet::new();

        let here = self.system.components_of(self.stream).map_err(outside)?;
        let after = here.get(self.position + 1..).unwrap_or_default();
        self.collect_producer_shafts(after, &mut shafts);

        for stream in self.system.graph().descendants(self.stream).map_err(outside)? {
            let components = self.system.components_of(stream).map_err(outside)?;
            self.collect_producer_shafts(components, &mut shafts);
        }

        shafts
            .into_iter()
            .map(|s| self.system.shaft_required_work(s))
            .sum()
    }
}
