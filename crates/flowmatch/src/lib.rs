mod bellman_ford;
mod dijkstra_potential;
mod flow_matrix;
mod matching;
mod ssp;
mod transform;

pub mod error;
pub mod generator;
pub mod graph;

pub use bellman_ford::BellmanFord;
pub use bellman_ford::bellman_ford;
pub use dijkstra_potential::PotentialDijkstra;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;
pub use flow_matrix::FlowMatrix;
pub use graph::Edge;
pub use graph::Graph;
pub use graph::VertexId;
pub use matching::Matching;
pub use matching::MatchingSolver;
pub use matching::Oracle;
pub use matching::solve_bipartite_assignment;
pub use ssp::FlowResult;
pub use ssp::min_cost_flow;
pub use transform::FlowTerminals;
pub use transform::bipartite_to_flow;

/// Cheapest-path search over a residual flow network.
///
/// - Only edges with positive residual capacity may be used; costs may be
///   negative.
/// - `pred` has one slot per vertex and receives the shortest path tree:
///   `pred[v]` is the vertex before `v`, `None` when `v` was not reached and
///   always `None` for `source`.
/// - Returns whether `target` was reached.
pub trait ShortestPathOracle {
    fn shortest_path<V, E>(
        &mut self,
        graph: &Graph<V, E>,
        source: VertexId,
        target: VertexId,
        pred: &mut [Option<VertexId>],
    ) -> Result<bool>;

    /// Forgets state carried between queries. Called before a new flow
    /// computation starts.
    fn reset(&mut self) {}
}
