use tracing::debug;
use tracing::trace;

use crate::ShortestPathOracle;
use crate::error::Error;
use crate::error::Result;
use crate::flow_matrix::FlowMatrix;
use crate::graph::Capacity;
use crate::graph::Cost;
use crate::graph::Graph;
use crate::graph::VertexId;

/// Outcome of [`min_cost_flow`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlowResult {
    /// Flow over the vertices of the flow network, including source and sink
    pub flow: FlowMatrix,
    pub augmentations: usize,
    /// Units shipped from source to sink
    pub value: i64,
    pub cost: Cost,
}

/// Successive shortest paths on a network built by
/// [`bipartite_to_flow`](crate::bipartite_to_flow).
///
/// While `oracle` finds a cheapest source–sink path over edges with positive
/// residual capacity, the path's bottleneck is pushed along it: the flow
/// matrix is updated and the residual capacities of every path edge and its
/// twin are adjusted in `graph`. The result is a minimum-cost maximum flow.
pub fn min_cost_flow<V, E, O>(graph: &mut Graph<V, E>, oracle: &mut O) -> Result<FlowResult>
where
    O: ShortestPathOracle,
{
    let (Some(source), Some(sink)) = (graph.source(), graph.sink()) else {
        return Err(Error::NotTransformed);
    };

    let n = graph.order();
    let mut flow = FlowMatrix::new(n)?;
    let mut pred: Vec<Option<VertexId>> = Vec::new();
    pred.try_reserve_exact(n)?;
    pred.resize(n, None);
    let mut path = Vec::new();

    let mut augmentations = 0_usize;
    let mut value = 0_i64;
    let mut cost: Cost = 0;

    oracle.reset();
    while oracle.shortest_path(graph, source, sink, &mut pred)? {
        collect_path(&pred, source, sink, &mut path)?;
        let bottleneck = path_bottleneck(graph, &path)?;
        let amount = i64::from(bottleneck);

        let path_cost = augment_path(graph, &mut flow, &path, bottleneck)?;

        augmentations += 1;
        value += amount;
        cost = path_cost
            .checked_mul(amount)
            .and_then(|c| c.checked_add(cost))
            .ok_or(Error::CostOverflow {
                from: source,
                to: sink,
            })?;
        trace!(
            iteration = augmentations,
            bottleneck,
            path_cost,
            hops = path.len(),
            "augmented along shortest path"
        );
    }

    debug!(n, augmentations, value, cost, "min-cost flow converged");
    trace!(flow = %flow, "final flow");
    Ok(FlowResult {
        flow,
        augmentations,
        value,
        cost,
    })
}

/// Rebuilds the `source -> sink` path from the predecessor chain as a list of
/// `(u, v)` hops in path order.
fn collect_path(
    pred: &[Option<VertexId>],
    source: VertexId,
    sink: VertexId,
    path: &mut Vec<(VertexId, VertexId)>,
) -> Result<()> {
    path.clear();
    let mut v = sink;
    while v != source {
        let u = pred[v].ok_or(Error::BrokenPath { vertex: v })?;
        path.push((u, v));
        if path.len() > pred.len() {
            return Err(Error::BrokenPath { vertex: v });
        }
        v = u;
    }
    path.reverse();
    Ok(())
}

/// Pushes `bottleneck` units along `path`: records them in `flow`, takes them
/// from each hop's residual capacity and hands them to its twin. Returns the
/// per-unit cost of the path.
fn augment_path<V, E>(
    graph: &mut Graph<V, E>,
    flow: &mut FlowMatrix,
    path: &[(VertexId, VertexId)],
    bottleneck: Capacity,
) -> Result<Cost> {
    let amount = i64::from(bottleneck);
    let mut path_cost: Cost = 0;
    for &(u, v) in path {
        let forward = graph
            .find_edge(u, v)
            .ok_or(Error::MissingResidualEdge { from: u, to: v })?;
        path_cost = path_cost
            .checked_add(forward.cost)
            .ok_or(Error::CostOverflow { from: u, to: v })?;
        let remaining = forward
            .capacity
            .checked_sub(bottleneck)
            .ok_or(Error::BrokenPath { vertex: v })?;

        let backward = graph
            .find_edge(v, u)
            .ok_or(Error::MissingResidualEdge { from: v, to: u })?;
        let returned = backward
            .capacity
            .checked_add(bottleneck)
            .ok_or(Error::CapacityOverflow { from: v, to: u })?;

        flow.augment(u, v, amount);
        graph.set_capacity(u, v, remaining)?;
        graph.set_capacity(v, u, returned)?;
    }
    Ok(path_cost)
}

/// Smallest residual capacity along `path`.
fn path_bottleneck<V, E>(graph: &Graph<V, E>, path: &[(VertexId, VertexId)]) -> Result<Capacity> {
    let mut min = Capacity::MAX;
    for &(u, v) in path {
        let edge = graph
            .find_edge(u, v)
            .ok_or(Error::MissingResidualEdge { from: u, to: v })?;
        // a saturated hop would make the augmentation loop forever
        if edge.capacity == 0 {
            return Err(Error::BrokenPath { vertex: v });
        }
        min = min.min(edge.capacity);
    }
    Ok(min)
}
