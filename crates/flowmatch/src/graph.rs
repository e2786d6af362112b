use std::fmt;
use std::ops::Range;

use crate::error::Error;
use crate::error::Result;

pub type VertexId = usize;
pub type EdgeId = usize;
pub type Cost = i64;
pub type Capacity = u32;

/// Teardown hook for vertex or edge payloads. Called once per present payload
/// when the graph is dropped.
pub type Cleanup<T> = Box<dyn FnMut(T)>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Edge<E = ()> {
    pub source: VertexId,
    pub target: VertexId,
    pub cost: Cost,
    pub capacity: Capacity,
    payload: Option<E>,
}

impl<E> Edge<E> {
    #[inline]
    pub fn payload(&self) -> Option<&E> {
        self.payload.as_ref()
    }
}

#[derive(Debug)]
struct Vertex<V> {
    payload: Option<V>,
    out_edges: Vec<EdgeId>,
    in_edges: Vec<EdgeId>,
}

impl<V> Vertex<V> {
    fn new(payload: Option<V>) -> Self {
        Self {
            payload,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        }
    }
}

/// Directed graph with cost/capacity edges and both outbound and inbound
/// adjacency.
///
/// Vertices are numbered `0..order()` in insertion order and are never
/// removed. Edges live in one arena; each vertex keeps the ids of the edges
/// leaving it and the edges entering it. At most one edge exists per ordered
/// pair `(source, target)`.
///
/// `source()`/`sink()` are only set once the graph has been turned into a
/// flow network by [`bipartite_to_flow`](crate::bipartite_to_flow).
pub struct Graph<V = (), E = ()> {
    // edges are declared first so their payloads are dropped before vertex payloads
    edges: Vec<Edge<E>>,
    vertices: Vec<Vertex<V>>,
    source: Option<VertexId>,
    sink: Option<VertexId>,
    edge_cleanup: Option<Cleanup<E>>,
    vertex_cleanup: Option<Cleanup<V>>,
}

impl<V, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> Graph<V, E> {
    pub fn new() -> Self {
        Self::with_cleanup(None, None)
    }

    pub fn with_cleanup(
        vertex_cleanup: Option<Cleanup<V>>,
        edge_cleanup: Option<Cleanup<E>>,
    ) -> Self {
        Self {
            edges: Vec::new(),
            vertices: Vec::new(),
            source: None,
            sink: None,
            edge_cleanup,
            vertex_cleanup,
        }
    }

    pub fn with_capacity(vertices: usize, edges: usize) -> Result<Self> {
        let mut graph = Self::new();
        graph.vertices.try_reserve_exact(vertices)?;
        graph.edges.try_reserve_exact(edges)?;
        Ok(graph)
    }

    /// Number of vertices.
    #[inline]
    pub fn order(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    #[inline]
    pub fn size(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn vertices(&self) -> Range<VertexId> {
        0..self.order()
    }

    #[inline]
    pub fn source(&self) -> Option<VertexId> {
        self.source
    }

    #[inline]
    pub fn sink(&self) -> Option<VertexId> {
        self.sink
    }

    pub(crate) fn set_terminals(&mut self, source: VertexId, sink: VertexId) {
        self.source = Some(source);
        self.sink = Some(sink);
    }

    /// Appends a vertex and returns its index, which is always the previous
    /// order of the graph.
    pub fn add_vertex(&mut self, payload: Option<V>) -> Result<VertexId> {
        self.vertices.try_reserve(1)?;
        let id = self.vertices.len();
        self.vertices.push(Vertex::new(payload));
        Ok(id)
    }

    /// Adds the edge `from -> to`.
    ///
    /// Fails with [`Error::EdgeExists`] if the pair is already connected; the
    /// existing edge is left untouched. `i64::MIN` is refused as a cost since
    /// its residual counterpart could not be represented.
    pub fn add_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        cost: Cost,
        capacity: Capacity,
        payload: Option<E>,
    ) -> Result<EdgeId> {
        self.check_range(from)?;
        self.check_range(to)?;
        if cost.checked_neg().is_none() {
            return Err(Error::InvalidCost(cost));
        }
        if self.find_edge_id(from, to).is_some() {
            return Err(Error::EdgeExists { from, to });
        }

        // reserve everything up front so a failed allocation leaves no half-linked edge
        self.edges.try_reserve(1)?;
        self.vertices[from].out_edges.try_reserve(1)?;
        self.vertices[to].in_edges.try_reserve(1)?;

        let id = self.edges.len();
        self.edges.push(Edge {
            source: from,
            target: to,
            cost,
            capacity,
            payload,
        });
        self.vertices[from].out_edges.push(id);
        self.vertices[to].in_edges.push(id);
        Ok(id)
    }

    pub fn indegree(&self, v: VertexId) -> Result<usize> {
        self.vertices
            .get(v)
            .map(|vertex| vertex.in_edges.len())
            .ok_or(Error::VertexNotFound(v))
    }

    pub fn outdegree(&self, v: VertexId) -> Result<usize> {
        self.vertices
            .get(v)
            .map(|vertex| vertex.out_edges.len())
            .ok_or(Error::VertexNotFound(v))
    }

    /// Capacity of `u -> v`, or 0 when the vertices are not connected.
    pub fn capacity(&self, u: VertexId, v: VertexId) -> Result<Capacity> {
        self.check_range(u)?;
        self.check_range(v)?;
        Ok(self
            .find_edge_id(u, v)
            .map_or(0, |id| self.edges[id].capacity))
    }

    pub fn set_capacity(&mut self, u: VertexId, v: VertexId, capacity: Capacity) -> Result<()> {
        self.check_range(u)?;
        self.check_range(v)?;
        let id = self
            .find_edge_id(u, v)
            .ok_or(Error::EdgeNotFound { from: u, to: v })?;
        self.edges[id].capacity = capacity;
        Ok(())
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge<E>> {
        self.edges.get(id)
    }

    pub fn find_edge(&self, u: VertexId, v: VertexId) -> Option<&Edge<E>> {
        self.find_edge_id(u, v).map(|id| &self.edges[id])
    }

    #[inline]
    pub fn cost(&self, u: VertexId, v: VertexId) -> Option<Cost> {
        self.find_edge(u, v).map(|edge| edge.cost)
    }

    #[inline]
    pub fn vertex_payload(&self, v: VertexId) -> Option<&V> {
        self.vertices.get(v).and_then(|vertex| vertex.payload.as_ref())
    }

    #[inline]
    pub fn edge_payload(&self, id: EdgeId) -> Option<&E> {
        self.edges.get(id).and_then(Edge::payload)
    }

    /// All edges in insertion order.
    #[inline]
    pub fn edges(&self) -> std::slice::Iter<'_, Edge<E>> {
        self.edges.iter()
    }

    /// Edges leaving `v`, in insertion order.
    ///
    /// # Panics
    /// If `v` is not a vertex of the graph.
    #[inline]
    pub fn out_edges(&self, v: VertexId) -> IncidentEdges<'_, E> {
        IncidentEdges {
            ids: self.vertices[v].out_edges.iter(),
            edges: &self.edges,
        }
    }

    /// Edges entering `v`, in insertion order.
    ///
    /// # Panics
    /// If `v` is not a vertex of the graph.
    #[inline]
    pub fn in_edges(&self, v: VertexId) -> IncidentEdges<'_, E> {
        IncidentEdges {
            ids: self.vertices[v].in_edges.iter(),
            edges: &self.edges,
        }
    }

    /// Structural copy: same vertices and edges (cost, capacity) in the same
    /// index order, without payloads, cleanup hooks or flow terminals.
    ///
    /// Copying payloads is not supported and yields [`Error::Unsupported`].
    pub fn clone_graph(&self, copy_payloads: bool) -> Result<Self> {
        if copy_payloads {
            return Err(Error::Unsupported("payload copy on graph clone"));
        }

        let mut clone = Self::with_capacity(self.order(), self.size())?;
        for v in self.vertices() {
            let id = clone.add_vertex(None)?;
            debug_assert_eq!(id, v);
        }
        // walk by source vertex so the per-vertex out-edge order is preserved
        for u in self.vertices() {
            for edge in self.out_edges(u) {
                clone.add_edge(edge.source, edge.target, edge.cost, edge.capacity, None)?;
            }
        }
        Ok(clone)
    }

    fn find_edge_id(&self, u: VertexId, v: VertexId) -> Option<EdgeId> {
        self.vertices
            .get(u)?
            .out_edges
            .iter()
            .copied()
            .find(|&id| self.edges[id].target == v)
    }

    #[inline]
    fn check_range(&self, v: VertexId) -> Result<()> {
        if v < self.order() {
            Ok(())
        } else {
            Err(Error::VertexOutOfRange {
                vertex: v,
                order: self.order(),
            })
        }
    }
}

impl<V, E> Drop for Graph<V, E> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.edge_cleanup.as_mut() {
            for edge in &mut self.edges {
                if let Some(payload) = edge.payload.take() {
                    cleanup(payload);
                }
            }
        }
        if let Some(cleanup) = self.vertex_cleanup.as_mut() {
            for vertex in &mut self.vertices {
                if let Some(payload) = vertex.payload.take() {
                    cleanup(payload);
                }
            }
        }
    }
}

impl<V, E> fmt::Debug for Graph<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("order", &self.order())
            .field("size", &self.size())
            .field("source", &self.source)
            .field("sink", &self.sink)
            .finish()
    }
}

pub struct IncidentEdges<'a, E> {
    ids: std::slice::Iter<'a, EdgeId>,
    edges: &'a [Edge<E>],
}

impl<'a, E> Iterator for IncidentEdges<'a, E> {
    type Item = &'a Edge<E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|&id| &self.edges[id])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<E> ExactSizeIterator for IncidentEdges<'_, E> {}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::ErrorKind;

    fn path_graph(n: usize) -> Graph {
        let mut g = Graph::new();
        for _ in 0..n {
            g.add_vertex(None).unwrap();
        }
        for u in 1..n {
            g.add_edge(u - 1, u, u as i64, 1, None).unwrap();
        }
        g
    }

    #[test]
    fn vertices_are_numbered_in_insertion_order() {
        let mut g: Graph<&str> = Graph::new();
        assert_eq!(g.order(), 0);
        for (i, name) in ["a", "b", "c"].into_iter().enumerate() {
            assert_eq!(g.add_vertex(Some(name)).unwrap(), i);
        }
        assert_eq!(g.order(), 3);
        assert_eq!(g.vertex_payload(1), Some(&"b"));
        assert_eq!(g.vertex_payload(3), None);
        assert_eq!(g.source(), None);
        assert_eq!(g.sink(), None);
    }

    #[test]
    fn add_edge_links_both_adjacency_lists() {
        let mut g = path_graph(3);
        g.add_edge(0, 2, -4, 7, None).unwrap();

        assert_eq!(g.outdegree(0).unwrap(), 2);
        assert_eq!(g.indegree(0).unwrap(), 0);
        assert_eq!(g.indegree(2).unwrap(), 2);
        assert_eq!(g.outdegree(2).unwrap(), 0);

        let targets: Vec<_> = g.out_edges(0).map(|e| e.target).collect();
        assert_eq!(targets, vec![1, 2]);
        let sources: Vec<_> = g.in_edges(2).map(|e| e.source).collect();
        assert_eq!(sources, vec![1, 0]);
        assert_eq!(g.cost(0, 2), Some(-4));
        assert_eq!(g.size(), 3);
    }

    #[test]
    fn add_edge_rejects_bad_parameters() {
        let mut g = path_graph(2);
        let err = g.add_edge(0, 2, 0, 1, None).unwrap_err();
        assert_eq!(err, Error::VertexOutOfRange { vertex: 2, order: 2 });
        assert_eq!(err.kind(), ErrorKind::BadParameter);

        let err = g.add_edge(5, 0, 0, 1, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadParameter);

        let err = g.add_edge(1, 0, i64::MIN, 1, None).unwrap_err();
        assert_eq!(err, Error::InvalidCost(i64::MIN));

        g.add_edge(1, 0, i64::MAX, 1, None).unwrap();
        assert_eq!(g.size(), 2);
    }

    #[test]
    fn duplicate_edge_keeps_first() {
        let mut g = path_graph(2);
        let err = g.add_edge(0, 1, 99, 42, None).unwrap_err();
        assert_eq!(err, Error::EdgeExists { from: 0, to: 1 });
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(g.cost(0, 1), Some(1));
        assert_eq!(g.capacity(0, 1).unwrap(), 1);
        assert_eq!(g.size(), 1);
        assert_eq!(g.outdegree(0).unwrap(), 1);
        assert_eq!(g.indegree(1).unwrap(), 1);

        // the reverse direction is a different pair
        g.add_edge(1, 0, 3, 0, None).unwrap();
    }

    #[test]
    fn degree_of_unknown_vertex_is_not_found() {
        let g = path_graph(2);
        assert_eq!(g.indegree(2), Err(Error::VertexNotFound(2)));
        assert_eq!(g.outdegree(9).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn capacity_get_and_set() {
        let mut g = path_graph(3);
        assert_eq!(g.capacity(0, 1).unwrap(), 1);
        assert_eq!(g.capacity(0, 2).unwrap(), 0);
        assert_eq!(g.capacity(1, 0).unwrap(), 0);
        assert!(g.capacity(0, 3).is_err());

        g.set_capacity(0, 1, 5).unwrap();
        assert_eq!(g.capacity(0, 1).unwrap(), 5);

        let err = g.set_capacity(0, 2, 1).unwrap_err();
        assert_eq!(err, Error::EdgeNotFound { from: 0, to: 2 });
        assert_eq!(g.capacity(0, 2).unwrap(), 0);
    }

    #[test]
    fn clone_is_structural_and_independent() {
        let mut g: Graph<u32, String> = Graph::new();
        for i in 0..4 {
            g.add_vertex(Some(i)).unwrap();
        }
        g.add_edge(0, 2, 5, 1, Some("a".to_string())).unwrap();
        g.add_edge(0, 3, 1, 1, Some("b".to_string())).unwrap();
        g.add_edge(1, 3, 1, 1, None).unwrap();

        let mut clone = g.clone_graph(false).unwrap();
        assert_eq!(clone.order(), g.order());
        assert_eq!(clone.size(), g.size());
        for u in g.vertices() {
            assert_eq!(clone.vertex_payload(u), None);
            let a: Vec<_> = g.out_edges(u).map(|e| (e.target, e.cost, e.capacity)).collect();
            let b: Vec<_> = clone.out_edges(u).map(|e| (e.target, e.cost, e.capacity)).collect();
            assert_eq!(a, b, "u={u}");
        }
        assert!(clone.edges().all(|e| e.payload().is_none()));

        clone.set_capacity(0, 2, 0).unwrap();
        clone.set_capacity(1, 3, 9).unwrap();
        assert_eq!(g.capacity(0, 2).unwrap(), 1);
        assert_eq!(g.capacity(1, 3).unwrap(), 1);
    }

    #[test]
    fn clone_with_payloads_is_unsupported() {
        let g = path_graph(2);
        let err = g.clone_graph(true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn cleanup_runs_once_per_payload_edges_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let vlog = Rc::clone(&log);
            let elog = Rc::clone(&log);
            let mut g: Graph<u32, u32> = Graph::with_cleanup(
                Some(Box::new(move |v: u32| vlog.borrow_mut().push(format!("v{v}")))),
                Some(Box::new(move |e: u32| elog.borrow_mut().push(format!("e{e}")))),
            );
            g.add_vertex(Some(0)).unwrap();
            g.add_vertex(None).unwrap();
            g.add_vertex(Some(2)).unwrap();
            g.add_edge(0, 1, 0, 1, Some(10)).unwrap();
            g.add_edge(0, 2, 0, 1, None).unwrap();
            g.add_edge(2, 1, 0, 1, Some(21)).unwrap();
            assert!(g.add_edge(0, 1, 0, 1, Some(99)).is_err());
            assert!(log.borrow().is_empty());
        }
        assert_eq!(*log.borrow(), vec!["e10", "e21", "v0", "v2"]);
    }

    #[test]
    fn payloads_without_cleanup_are_dropped() {
        let marker = Rc::new(());
        {
            let mut g: Graph<Rc<()>, Rc<()>> = Graph::new();
            g.add_vertex(Some(Rc::clone(&marker))).unwrap();
            g.add_vertex(None).unwrap();
            g.add_edge(0, 1, 0, 1, Some(Rc::clone(&marker))).unwrap();
            assert_eq!(Rc::strong_count(&marker), 3);
        }
        assert_eq!(Rc::strong_count(&marker), 1);
    }
}
