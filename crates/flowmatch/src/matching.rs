use tracing::debug;
use tracing::warn;

use crate::bellman_ford::BellmanFord;
use crate::dijkstra_potential::PotentialDijkstra;
use crate::error::Result;
use crate::graph::Cost;
use crate::graph::Graph;
use crate::graph::VertexId;
use crate::ssp::FlowResult;
use crate::ssp::min_cost_flow;
use crate::transform::bipartite_to_flow;

/// Shortest-path oracle used by the successive shortest paths loop.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Oracle {
    #[default]
    BellmanFord,
    PotentialDijkstra,
}

impl Oracle {
    pub fn label(self) -> &'static str {
        match self {
            Self::BellmanFord => "bellman_ford",
            Self::PotentialDijkstra => "potential_dijkstra",
        }
    }
}

/// Matched `(left, right)` pairs, sorted.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Matching {
    pairs: Vec<(VertexId, VertexId)>,
}

impl Matching {
    #[inline]
    pub fn pairs(&self) -> &[(VertexId, VertexId)] {
        &self.pairs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (VertexId, VertexId)> {
        self.pairs.iter()
    }

    pub fn into_pairs(self) -> Vec<(VertexId, VertexId)> {
        self.pairs
    }

    pub fn partner_of_left(&self, u: VertexId) -> Option<VertexId> {
        self.pairs.iter().find(|&&(a, _)| a == u).map(|&(_, b)| b)
    }

    pub fn partner_of_right(&self, v: VertexId) -> Option<VertexId> {
        self.pairs.iter().find(|&&(_, b)| b == v).map(|&(a, _)| a)
    }

    /// Sum of the costs `graph` assigns to the matched edges. `None` if a pair
    /// is not an edge of `graph` or the sum overflows.
    pub fn total_cost<V, E>(&self, graph: &Graph<V, E>) -> Option<Cost> {
        self.pairs
            .iter()
            .try_fold(0_i64, |acc, &(u, v)| acc.checked_add(graph.cost(u, v)?))
    }
}

impl<'a> IntoIterator for &'a Matching {
    type Item = &'a (VertexId, VertexId);
    type IntoIter = std::slice::Iter<'a, (VertexId, VertexId)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Minimum-cost bipartite assignment with a configurable oracle.
///
/// ```
/// use flowmatch::{Graph, MatchingSolver, Oracle};
///
/// let mut g: Graph = Graph::new();
/// let task = g.add_vertex(None).unwrap();
/// let slot = g.add_vertex(None).unwrap();
/// g.add_edge(task, slot, 3, 1, None).unwrap();
///
/// let matching = MatchingSolver::new()
///     .with_oracle(Oracle::PotentialDijkstra)
///     .solve(&g)
///     .unwrap();
/// assert_eq!(matching.pairs(), &[(task, slot)]);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchingSolver {
    oracle: Oracle,
}

impl MatchingSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_oracle(mut self, oracle: Oracle) -> Self {
        self.oracle = oracle;
        self
    }

    #[inline]
    pub fn oracle(&self) -> Oracle {
        self.oracle
    }

    /// Computes a maximum matching of minimum total cost.
    ///
    /// `graph` must be unidirectionally bipartite: every edge runs from a
    /// vertex without in-edges to a vertex without out-edges. It is not
    /// modified; the flow network is built on a structural clone that is
    /// dropped before returning.
    pub fn solve<V, E>(&self, graph: &Graph<V, E>) -> Result<Matching> {
        self.solve_inner(graph).inspect_err(|err| {
            if err.is_invariant_violation() {
                warn!(%err, oracle = self.oracle.label(), "bipartite assignment aborted");
            }
        })
    }

    fn solve_inner<V, E>(&self, graph: &Graph<V, E>) -> Result<Matching> {
        let n = graph.order();
        let mut network = graph.clone_graph(false)?;
        bipartite_to_flow(&mut network)?;

        let FlowResult {
            mut flow,
            augmentations,
            value,
            cost,
        } = match self.oracle {
            Oracle::BellmanFord => min_cost_flow(&mut network, &mut BellmanFord)?,
            Oracle::PotentialDijkstra => {
                min_cost_flow(&mut network, &mut PotentialDijkstra::new())?
            }
        };
        drop(network);

        // source and sink come after the original vertices, so the top-left
        // block holds exactly the original edges
        flow.shrink(n);
        let mut pairs = Vec::new();
        pairs.try_reserve_exact(usize::try_from(value).unwrap_or(0))?;
        pairs.extend(flow.positive_entries().map(|(u, v, _)| (u, v)));

        debug!(
            oracle = self.oracle.label(),
            matched = pairs.len(),
            augmentations,
            cost,
            "solved bipartite assignment"
        );
        Ok(Matching { pairs })
    }
}

/// [`MatchingSolver`] with the default Bellman–Ford oracle.
pub fn solve_bipartite_assignment<V, E>(graph: &Graph<V, E>) -> Result<Matching> {
    MatchingSolver::new().solve(graph)
}
