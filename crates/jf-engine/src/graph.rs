//! Stream dependency graph.
//!
//! One node per stream, one edge from each parent stream to each stream
//! it feeds (diversion children, merge products).

use jf_core::StreamId;
use petgraph::{
    Direction,
    algo::toposort,
    graph::{DiGraph, NodeIndex},
    visit::Bfs,
};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Default)]
pub struct StreamGraph {
    graph: DiGraph<StreamId, ()>,
    /// Stream slot -> graph node.
    nodes: Vec<NodeIndex>,
}

impl StreamGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stream. Streams must be added in id order.
    pub fn add_stream(&mut self, id: StreamId) {
        debug_assert_eq!(id.slot(), self.nodes.len());
        let node = self.graph.add_node(id);
        self.nodes.push(node);
    }

    fn node(&self, id: StreamId) -> EngineResult<NodeIndex> {
        self.nodes
            .get(id.slot())
            .copied()
            .ok_or(EngineError::UnknownId { what: "stream", id })
    }

    /// Record that `child` is fed by `parent`.
    pub fn link(&mut self, parent: StreamId, child: StreamId) -> EngineResult<()> {
        let (p, c) = (self.node(parent)?, self.node(child)?);
        self.graph.add_edge(p, c, ());
        Ok(())
    }

    fn neighbors(&self, id: StreamId, dir: Direction) -> EngineResult<Vec<StreamId>> {
        let node = self.node(id)?;
        let mut ids: Vec<StreamId> = self
            .graph
            .neighbors_directed(node, dir)
            .map(|n| self.graph[n])
            .collect();
        ids.sort();
        Ok(ids)
    }

    pub fn parents(&self, id: StreamId) -> EngineResult<Vec<StreamId>> {
        self.neighbors(id, Direction::Incoming)
    }

    pub fn children(&self, id: StreamId) -> EngineResult<Vec<StreamId>> {
        self.neighbors(id, Direction::Outgoing)
    }

    pub fn is_leaf(&self, id: StreamId) -> EngineResult<bool> {
        Ok(self.children(id)?.is_empty())
    }

    /// Every stream reachable from `id`, excluding `id` itself.
    pub fn descendants(&self, id: StreamId) -> EngineResult<Vec<StreamId>> {
        let start = self.node(id)?;
        let mut bfs = Bfs::new(&self.graph, start);
        let mut out = Vec::new();
        while let Some(node) = bfs.next(&self.graph) {
            if node != start {
                out.push(self.graph[node]);
            }
        }
        out.sort();
        Ok(out)
    }

    /// Streams in an order where every parent precedes its children.
    pub fn topological_order(&self) -> EngineResult<Vec<StreamId>> {
        let order = toposort(&self.graph, None).map_err(|_| EngineError::Cycle)?;
        Ok(order.into_iter().map(|n| self.graph[n]).collect())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jf_core::Id;

    fn diamond() -> StreamGraph {
        // 0 -> {1, 2} -> 3
        let mut g = StreamGraph::new();
        for i in 0..4 {
            g.add_stream(Id::from_index(i));
        }
        let id = Id::from_index;
        g.link(id(0), id(1)).unwrap();
        g.link(id(0), id(2)).unwrap();
        g.link(id(1), id(3)).unwrap();
        g.link(id(2), id(3)).unwrap();
        g
    }

    #[test]
    fn parents_and_children() {
        let g = diamond();
        let id = Id::from_index;
        assert_eq!(g.children(id(0)).unwrap(), vec![id(1), id(2)]);
        assert_eq!(g.parents(id(3)).unwrap(), vec![id(1), id(2)]);
        assert!(g.is_leaf(id(3)).unwrap());
        assert!(!g.is_leaf(id(1)).unwrap());
    }

    #[test]
    fn descendants_exclude_self() {
        let g = diamond();
        let id = Id::from_index;
        assert_eq!(g.descendants(id(0)).unwrap(), vec![id(1), id(2), id(3)]);
        assert_eq!(g.descendants(id(2)).unwrap(), vec![id(3)]);
        assert!(g.descendants(id(3)).unwrap().is_empty());
    }

    #[test]
    fn topological_order_puts_parents_first() {
        let g = diamond();
        let order = g.topological_order().unwrap();
        let pos = |i: u32| order.iter().position(|s| s.index() == i).unwrap();
        assert!(pos(0) < pos(1));
        assert!(pos(1) < pos(3));
        assert!(pos(2) < pos(3));
    }

    #[test]
    fn unknown_stream_is_an_error() {
        let g = diamond();
        assert!(g.children(Id::from_index(9)).is_err());
    }
}
