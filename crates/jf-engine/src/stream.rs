//! Streams: ordered component sequences sharing one fluid state.

use jf_core::{CompId, StreamId};
use jf_fluids::FluidState;

/// Which share of a diverted parent a child stream carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Branch {
    /// `fraction` of the parent flow
    First,
    /// `1 - fraction` of the parent flow
    Second,
}

/// How a stream obtains its fluid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StreamOrigin {
    /// Fed from an assigned fluid state.
    Root,
    /// One share of a diverted parent.
    Diversion {
        parent: StreamId,
        fraction: f64,
        branch: Branch,
    },
    /// Mixture of two parents.
    Merge { parents: [StreamId; 2] },
}

#[derive(Clone, Debug)]
pub struct Stream {
    pub id: StreamId,
    /// Hierarchical identifier, e.g. `0`, `1.m`, `2.s.m`.
    pub path: String,
    pub origin: StreamOrigin,
    /// Root streams are generation 0; derived streams one past their newest parent.
    pub generation: u32,
    pub components: Vec<CompId>,
    /// Fluid entering the first component.
    pub inlet: Option<FluidState>,
    /// Fluid leaving the last component, once run.
    pub outlet: Option<FluidState>,
    pub ran: bool,
}

impl Stream {
    pub(crate) fn new(id: StreamId, path: String, origin: StreamOrigin, generation: u32) -> Self {
        Self {
            id,
            path,
            origin,
            generation,
            components: Vec::new(),
            inlet: None,
            outlet: None,
            ran: false,
        }
    }

    /// Parent streams (none, one or two).
    pub fn parents(&self) -> Vec<StreamId> {
        match self.origin {
            StreamOrigin::Root => Vec::new(),
            StreamOrigin::Diversion { parent, .. } => vec![parent],
            StreamOrigin::Merge { parents } => parents.to_vec(),
        }
    }

    /// Diversion fraction carried by this stream, if diverted.
    pub fn fraction(&self) -> Option<f64> {
        match self.origin {
            StreamOrigin::Diversion {
                fraction, branch, ..
            } => Some(match branch {
                Branch::First => fraction,
                Branch::Second => 1.0 - fraction,
            }),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Path of a child stream: the parent's generation part replaced by
/// `generation`, then `label`.
pub(crate) fn child_path(parent_path: &str, generation: u32, label: &str) -> String {
    match parent_path.split_once('.') {
        Some((_, rest)) => format!("{generation}.{rest}.{label}"),
        None => format!("{generation}.{label}"),
    }
}

/// Stage suffix for the component at `position` given every stage code of
/// the stream: `cp` alone, `cp1`/`cp2` when repeated.
pub(crate) fn stage_code(codes: &[&'static str], position: usize) -> String {
    let code = codes[position];
    let repeats = codes.iter().filter(|c| **c == code).count();
    if repeats > 1 {
        let index = codes[..=position].iter().filter(|c| **c == code).count();
        format!("{code}{index}")
    } else {
        code.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_paths_replace_generation() {
        assert_eq!(child_path("0", 1, "m"), "1.m");
        assert_eq!(child_path("1.s", 2, "m"), "2.s.m");
        assert_eq!(child_path("3", 4, "core"), "4.core");
    }

    #[test]
    fn stage_codes_index_only_repeats() {
        let codes = ["il", "cp", "cp", "cc", "tb", "tb", "ab", "nz"];
        assert_eq!(stage_code(&codes, 0), "il");
        assert_eq!(stage_code(&codes, 1), "cp1");
        assert_eq!(stage_code(&codes, 2), "cp2");
        assert_eq!(stage_code(&codes, 5), "tb2");
        assert_eq!(stage_code(&codes, 7), "nz");
    }
}
