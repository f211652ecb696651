//! The engine system: component arena, shafts, streams and execution.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use jf_components::{ComponentError, ComponentResult, EngineComponent, Role};
use jf_core::{CompId, ShaftId, StreamId};
use jf_fluids::FluidState;
use tracing::{debug, info};

use crate::context::RunContext;
use crate::error::{EngineError, EngineResult};
use crate::graph::StreamGraph;
use crate::shaft::{ConsumerWork, Shaft};
use crate::snapshot::StageSnapshot;
use crate::stream::{Branch, Stream, StreamOrigin, child_path, stage_code};

/// A complete engine: every component, the shafts coupling them and the
/// streams they sit on.
///
/// Components, shafts and streams live in arenas owned by the system and
/// refer to each other by id. Build the system declaratively, call
/// [`System::run`] once, then query stages and performance.
#[derive(Debug, Default)]
pub struct System {
    components: Vec<Box<dyn EngineComponent>>,
    /// Stream each component is connected to.
    placement: Vec<Option<StreamId>>,
    /// Shaft each component is linked to.
    shaft_of: Vec<Option<ShaftId>>,
    snapshots: Vec<Option<StageSnapshot>>,
    shafts: Vec<Shaft>,
    streams: Vec<Stream>,
    graph: StreamGraph,
    ran: bool,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Components and shafts
    // ------------------------------------------------------------------

    /// Add a component without placing it on a stream.
    pub fn add_component<C: EngineComponent + 'static>(&mut self, component: C) -> CompId {
        self.add_boxed(Box::new(component))
    }

    pub fn add_boxed(&mut self, component: Box<dyn EngineComponent>) -> CompId {
        let id = CompId::from_usize(self.components.len());
        self.components.push(component);
        self.placement.push(None);
        self.shaft_of.push(None);
        self.snapshots.push(None);
        id
    }

    pub fn component(&self, id: CompId) -> EngineResult<&dyn EngineComponent> {
        self.components
            .get(id.slot())
            .map(|c| c.as_ref())
            .ok_or(EngineError::UnknownId {
                what: "component",
                id,
            })
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Link components on a shaft with mechanical efficiency `eta`.
    pub fn add_shaft(&mut self, members: &[CompId], eta: f64) -> EngineResult<ShaftId> {
        self.add_geared_shaft(members, eta, 1.0)
    }

    /// Shaft whose fans and propellers are driven through a gearbox.
    pub fn add_geared_shaft(
        &mut self,
        members: &[CompId],
        eta: f64,
        eta_gearbox: f64,
    ) -> EngineResult<ShaftId> {
        for value in [eta, eta_gearbox] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(EngineError::InvalidArg {
                    what: "shaft efficiencies must be in (0,1]",
                });
            }
        }
        let mut seen = HashSet::new();
        for &member in members {
            let component = self.component(member)?;
            if self.shaft_of[member.slot()].is_some() || !seen.insert(member) {
                return Err(EngineError::AlreadyOnShaft {
                    name: component.name().to_string(),
                });
            }
        }

        let id = ShaftId::from_usize(self.shafts.len());
        for &member in members {
            self.shaft_of[member.slot()] = Some(id);
        }
        self.shafts.push(Shaft {
            id,
            eta,
            eta_gearbox,
            members: members.to_vec(),
        });
        Ok(id)
    }

    pub fn shaft(&self, id: ShaftId) -> EngineResult<&Shaft> {
        self.shafts
            .get(id.slot())
            .ok_or(EngineError::UnknownId { what: "shaft", id })
    }

    pub fn shafts(&self) -> &[Shaft] {
        &self.shafts
    }

    pub fn shaft_of(&self, component: CompId) -> Option<ShaftId> {
        self.shaft_of.get(component.slot()).copied().flatten()
    }

    /// Work the producers of `shaft` must supply, from the consumers'
    /// recorded work and fixed demands.
    pub fn shaft_required_work(&self, shaft: ShaftId) -> ComponentResult<f64> {
        let shaft = self
            .shafts
            .get(shaft.slot())
            .ok_or(ComponentError::InvalidArg {
                what: "shaft outside the system",
            })?;
        let mut consumers = Vec::with_capacity(shaft.members.len());
        for member in &shaft.members {
            let component = &self.components[member.slot()];
            if component.role() != Role::WorkConsumer {
                continue;
            }
            let work = match component.fixed_work_demand() {
                Some(work) => work,
                None => self.snapshots[member.slot()]
                    .as_ref()
                    .map(|s| s.record.work)
                    .ok_or_else(|| ComponentError::ShaftWorkUnavailable {
                        member: component.name().to_string(),
                    })?,
            };
            consumers.push(ConsumerWork {
                work,
                geared: component.geared(),
            });
        }
        Ok(shaft.required_work(consumers))
    }

    // ------------------------------------------------------------------
    // Streams
    // ------------------------------------------------------------------

    fn unique_path(&self, base: String) -> String {
        let taken = |p: &str| self.streams.iter().any(|s| s.path == p);
        if !taken(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}.{n}");
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn push_stream(
        &mut self,
        base_path: String,
        origin: StreamOrigin,
        generation: u32,
    ) -> EngineResult<StreamId> {
        let id = StreamId::from_usize(self.streams.len());
        let path = self.unique_path(base_path);
        let stream = Stream::new(id, path, origin, generation);
        let parents = stream.parents();
        self.streams.push(stream);
        self.graph.add_stream(id);
        for parent in parents {
            self.graph.link(parent, id)?;
        }
        Ok(id)
    }

    fn check_open(&self) -> EngineResult<()> {
        if self.ran {
            Err(EngineError::AlreadyRun)
        } else {
            Ok(())
        }
    }

    /// A stream's outlet feeds at most one diversion or merge.
    fn check_unbranched(&self, stream: StreamId) -> EngineResult<()> {
        if self.graph.is_leaf(stream)? {
            Ok(())
        } else {
            Err(EngineError::AlreadyBranched {
                path: self.stream(stream)?.path.clone(),
            })
        }
    }

    /// Root stream with no fluid assigned yet.
    pub fn add_stream(&mut self) -> EngineResult<StreamId> {
        self.check_open()?;
        self.push_stream("0".to_string(), StreamOrigin::Root, 0)
    }

    /// Root stream fed by `gas`.
    pub fn root_stream(&mut self, gas: FluidState) -> EngineResult<StreamId> {
        let id = self.add_stream()?;
        self.assign_gas(id, gas)?;
        Ok(id)
    }

    /// Feed a root stream with `gas`.
    pub fn assign_gas(&mut self, stream: StreamId, gas: FluidState) -> EngineResult<()> {
        self.check_open()?;
        let s = self.stream_mut(stream)?;
        if s.origin != StreamOrigin::Root {
            return Err(EngineError::InvalidArg {
                what: "only root streams take an assigned fluid state",
            });
        }
        s.inlet = Some(gas);
        Ok(())
    }

    pub fn stream(&self, id: StreamId) -> EngineResult<&Stream> {
        self.streams
            .get(id.slot())
            .ok_or(EngineError::UnknownId { what: "stream", id })
    }

    fn stream_mut(&mut self, id: StreamId) -> EngineResult<&mut Stream> {
        self.streams
            .get_mut(id.slot())
            .ok_or(EngineError::UnknownId { what: "stream", id })
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    pub fn graph(&self) -> &StreamGraph {
        &self.graph
    }

    /// Append an existing component to the end of `stream`.
    pub fn attach(&mut self, stream: StreamId, component: CompId) -> EngineResult<()> {
        self.check_open()?;
        let path = self.stream(stream)?.path.clone();
        let name = self.component(component)?.name().to_string();
        if let Some(other) = self.placement[component.slot()] {
            return Err(EngineError::AlreadyConnected {
                name,
                stream: self.stream(other)?.path.clone(),
            });
        }
        debug!(stream = %path, component = %name, "connect");
        self.placement[component.slot()] = Some(stream);
        self.stream_mut(stream)?.components.push(component);
        Ok(())
    }

    /// Add `component` and append it to the end of `stream`.
    pub fn connect<C: EngineComponent + 'static>(
        &mut self,
        stream: StreamId,
        component: C,
    ) -> EngineResult<CompId> {
        self.check_open()?;
        self.stream(stream)?;
        let id = self.add_component(component);
        self.attach(stream, id)?;
        Ok(id)
    }

    /// Split `stream` into a child carrying `fraction` of its flow and a
    /// child carrying the rest, in that order.
    ///
    /// The child with the larger flow is labelled `m` (main), the other `s`
    /// (secondary); an even split makes the first child main.
    pub fn divert(&mut self, stream: StreamId, fraction: f64) -> EngineResult<(StreamId, StreamId)> {
        if fraction >= 0.5 {
            self.divert_named(stream, fraction, ("m", "s"))
        } else {
            self.divert_named(stream, fraction, ("s", "m"))
        }
    }

    /// [`System::divert`] with explicit child labels.
    pub fn divert_named(
        &mut self,
        stream: StreamId,
        fraction: f64,
        names: (&str, &str),
    ) -> EngineResult<(StreamId, StreamId)> {
        self.check_open()?;
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(EngineError::InvalidFraction { fraction });
        }
        self.check_unbranched(stream)?;
        let parent = self.stream(stream)?;
        let generation = parent.generation + 1;
        let first_path = child_path(&parent.path, generation, names.0);
        let second_path = child_path(&parent.path, generation, names.1);

        let first = self.push_stream(
            first_path,
            StreamOrigin::Diversion {
                parent: stream,
                fraction,
                branch: Branch::First,
            },
            generation,
        )?;
        let second = self.push_stream(
            second_path,
            StreamOrigin::Diversion {
                parent: stream,
                fraction,
                branch: Branch::Second,
            },
            generation,
        )?;
        Ok((first, second))
    }

    /// Mix two streams into a new one.
    ///
    /// Merges landing in the same generation share a base path; later ones
    /// get a `.2`, `.3` suffix.
    pub fn merge(&mut self, a: StreamId, b: StreamId) -> EngineResult<StreamId> {
        self.check_open()?;
        if a == b {
            return Err(EngineError::SelfMerge {
                path: self.stream(a)?.path.clone(),
            });
        }
        self.check_unbranched(a)?;
        self.check_unbranched(b)?;
        let (sa, sb) = (self.stream(a)?, self.stream(b)?);
        let generation = sa.generation.max(sb.generation) + 1;
        self.push_stream(
            generation.to_string(),
            StreamOrigin::Merge { parents: [a, b] },
            generation,
        )
    }

    /// Streams grouped by generation, ascending, each group in execution
    /// order.
    pub fn generations(&self) -> EngineResult<Vec<Vec<StreamId>>> {
        let mut by_generation: BTreeMap<u32, Vec<StreamId>> = BTreeMap::new();
        for id in self.graph.topological_order()? {
            let generation = self.stream(id)?.generation;
            by_generation.entry(generation).or_default().push(id);
        }
        by_generation
            .into_values()
            .map(|streams| self.execution_order(streams))
            .collect()
    }

    /// Shafts that components of `stream` with `role` are linked to.
    fn shafts_on(&self, stream: StreamId, role: Role) -> EngineResult<BTreeSet<ShaftId>> {
        Ok(self
            .components_of(stream)?
            .iter()
            .filter(|c| self.components[c.slot()].role() == role)
            .filter_map(|c| self.shaft_of(*c))
            .collect())
    }

    /// Order streams of one generation by id, moving ahead every stream
    /// whose consumers drive a shaft with a producer on a sibling stream.
    fn execution_order(&self, mut streams: Vec<StreamId>) -> EngineResult<Vec<StreamId>> {
        streams.sort();
        let driven = streams
            .iter()
            .map(|&s| self.shafts_on(s, Role::WorkProducer))
            .collect::<EngineResult<Vec<_>>>()?;

        let (mut first, mut rest) = (Vec::new(), Vec::new());
        for (i, &stream) in streams.iter().enumerate() {
            let consumed = self.shafts_on(stream, Role::WorkConsumer)?;
            let feeds_sibling = driven
                .iter()
                .enumerate()
                .any(|(j, shafts)| j != i && !shafts.is_disjoint(&consumed));
            if feeds_sibling {
                first.push(stream);
            } else {
                rest.push(stream);
            }
        }
        first.extend(rest);
        Ok(first)
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    pub fn has_run(&self) -> bool {
        self.ran
    }

    /// Execute every stream, generation by generation.
    ///
    /// A system runs once; a failure leaves it partially evaluated and it
    /// must be rebuilt.
    pub fn run(&mut self) -> EngineResult<()> {
        self.check_open()?;
        self.ran = true;

        let generations = self.generations()?;
        for (generation, streams) in generations.iter().enumerate() {
            info!(generation, streams = streams.len(), "running generation");
            for &stream in streams {
                self.run_stream(stream)?;
            }
        }
        Ok(())
    }

    fn outlet(&self, stream: StreamId) -> EngineResult<&FluidState> {
        self.stream(stream)?.outlet.as_ref().ok_or(EngineError::NotRun)
    }

    fn stream_inlet(&self, stream: StreamId) -> EngineResult<FluidState> {
        let s = self.stream(stream)?;
        match s.origin {
            StreamOrigin::Root => s.inlet.clone().ok_or_else(|| EngineError::MissingFluidState {
                stream: s.path.clone(),
            }),
            StreamOrigin::Diversion {
                parent,
                fraction,
                branch,
            } => {
                let (first, second) = self.outlet(parent)?.divert(fraction)?;
                Ok(match branch {
                    Branch::First => first,
                    Branch::Second => second,
                })
            }
            StreamOrigin::Merge { parents: [a, b] } => {
                Ok(FluidState::mix(self.outlet(a)?, self.outlet(b)?)?)
            }
        }
    }

    fn stage_codes(&self, stream: &Stream) -> Vec<&'static str> {
        stream
            .components
            .iter()
            .map(|c| self.components[c.slot()].code())
            .collect()
    }

    fn run_stream(&mut self, id: StreamId) -> EngineResult<()> {
        let mut gas = self.stream_inlet(id)?;
        self.stream_mut(id)?.inlet = Some(gas.clone());
        let stream = self.stream(id)?;
        let (path, components) = (stream.path.clone(), stream.components.clone());
        let codes = self.stage_codes(stream);
        debug!(stream = %path, stages = components.len(), mf = gas.mf, "running stream");

        for (position, &cid) in components.iter().enumerate() {
            let stage = format!("{path}.{}", stage_code(&codes, position));
            let component = &self.components[cid.slot()];
            let out = {
                let ctx = RunContext::new(self, id, position, cid);
                component
                    .transfer(&gas, &ctx)
                    .map_err(|source| EngineError::Component {
                        stage: stage.clone(),
                        source,
                    })?
            };

            gas.add_fuel(out.fuel_mf)?;
            gas.apply(&out.record);

            if out.fuel_mf > 0.0 {
                debug!(stage = %stage, fuel_mf = out.fuel_mf, heat = out.record.heat, "fuel resolved");
            }
            if out.choked {
                debug!(stage = %stage, pi = out.record.pi, "nozzle choked");
            }
            debug!(stage = %stage, t0 = gas.t0, p0 = gas.p0, "stage executed");

            let snapshot = StageSnapshot {
                component: cid,
                stream: id,
                path: stage,
                name: component.name().to_string(),
                role: component.role(),
                record: out.record,
                fuel_mf: out.fuel_mf,
                choked: out.choked,
                specific_volume: gas.specific_volume(),
                specific_enthalpy: gas.specific_enthalpy()?,
                specific_entropy: gas.specific_entropy()?,
                state: gas.clone(),
            };
            self.snapshots[cid.slot()] = Some(snapshot);
        }

        let stream = self.stream_mut(id)?;
        stream.outlet = Some(gas);
        stream.ran = true;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stage lookup
    // ------------------------------------------------------------------

    /// Stage path of a connected component.
    pub fn stage_path(&self, component: CompId) -> Option<String> {
        let stream = self.stream(self.placement.get(component.slot()).copied().flatten()?).ok()?;
        let position = stream.components.iter().position(|c| *c == component)?;
        let codes = self.stage_codes(stream);
        Some(format!("{}.{}", stream.path, stage_code(&codes, position)))
    }

    /// Every stage path, stream by stream.
    pub fn stage_paths(&self) -> Vec<String> {
        self.streams
            .iter()
            .flat_map(|stream| {
                let codes = self.stage_codes(stream);
                (0..codes.len())
                    .map(|i| format!("{}.{}", stream.path, stage_code(&codes, i)))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn snapshot(&self, component: CompId) -> Option<&StageSnapshot> {
        self.snapshots.get(component.slot())?.as_ref()
    }

    /// Executed stage at `path`, e.g. `0.cp2` or `1.m.nz`.
    pub fn stage(&self, path: &str) -> EngineResult<&StageSnapshot> {
        if let Some(found) = self.snapshots.iter().flatten().find(|s| s.path == path) {
            return Ok(found);
        }
        if self.stage_paths().iter().any(|p| p == path) {
            Err(EngineError::NotRun)
        } else {
            Err(EngineError::StageNotFound {
                path: path.to_string(),
            })
        }
    }

    pub fn stream_by_path(&self, path: &str) -> EngineResult<&Stream> {
        self.streams
            .iter()
            .find(|s| s.path == path)
            .ok_or_else(|| EngineError::StreamNotFound {
                path: path.to_string(),
            })
    }

    /// Snapshots of a run stream, in stage order.
    pub fn stream_stages(&self, id: StreamId) -> EngineResult<Vec<&StageSnapshot>> {
        let stream = self.stream(id)?;
        if !stream.ran {
            return Err(EngineError::NotRun);
        }
        stream
            .components
            .iter()
            .map(|c| self.snapshot(*c).ok_or(EngineError::NotRun))
            .collect()
    }

    /// Every executed stage.
    pub fn snapshots(&self) -> impl Iterator<Item = &StageSnapshot> {
        self.snapshots.iter().flatten()
    }

    pub(crate) fn components_of(&self, stream: StreamId) -> EngineResult<&[CompId]> {
        Ok(&self.stream(stream)?.components)
    }
}
