use tracing::debug;
use tracing::warn;

use crate::error::Error;
use crate::error::Result;
use crate::graph::Graph;
use crate::graph::VertexId;

/// Terminals and partition sizes of a flow network built by
/// [`bipartite_to_flow`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FlowTerminals {
    pub source: VertexId,
    pub sink: VertexId,
    pub left: usize,
    pub right: usize,
}

/// Turns a unidirectionally bipartite graph into a residual flow network.
///
/// Every vertex must have only out-edges (left side), only in-edges (right
/// side), or none at all. A source is connected to each left vertex and each
/// right vertex to a sink, all with cost 0 and capacity 1. Then every edge
/// `(u, v)` gets a residual twin `(v, u)` with cost `-cost(u, v)` and capacity
/// 0. From here on capacities are residual capacities.
///
/// Source and sink are appended after the existing vertices, so original
/// vertex indices keep their meaning in the flow network.
///
/// The graph is validated before it is touched: a vertex with both in- and
/// out-edges or an empty side leaves it unchanged.
pub fn bipartite_to_flow<V, E>(graph: &mut Graph<V, E>) -> Result<FlowTerminals> {
    if graph.source().is_some() || graph.sink().is_some() {
        return Err(Error::AlreadyTransformed);
    }

    let order = graph.order();
    let mut left = 0;
    let mut right = 0;
    for u in 0..order {
        let inbound = graph.indegree(u)?;
        let outbound = graph.outdegree(u)?;
        match (inbound > 0, outbound > 0) {
            (true, true) => {
                warn!(vertex = u, inbound, outbound, "graph is not unidirectionally bipartite");
                return Err(Error::NotBipartite { vertex: u });
            }
            (true, false) => right += 1,
            (false, true) => left += 1,
            (false, false) => {}
        }
    }
    if left == 0 || right == 0 {
        return Err(Error::DegeneratePartition { left, right });
    }

    let source = graph.add_vertex(None)?;
    let sink = graph.add_vertex(None)?;
    graph.set_terminals(source, sink);

    for u in 0..order {
        if graph.outdegree(u)? > 0 {
            graph.add_edge(source, u, 0, 1, None)?;
        } else if graph.indegree(u)? > 0 {
            graph.add_edge(u, sink, 0, 1, None)?;
        }
    }

    // residual twins, including those of the source/sink edges added above
    let forward = graph.size();
    let mut residual = 0_usize;
    for id in 0..forward {
        let (u, v, cost) = match graph.edge(id) {
            Some(edge) => (edge.source, edge.target, edge.cost),
            None => break,
        };
        match graph.add_edge(v, u, -cost, 0, None) {
            Ok(_) => residual += 1,
            Err(Error::EdgeExists { .. }) => {}
            Err(err) => return Err(err),
        }
    }

    debug!(order, left, right, forward, residual, "built flow network");
    Ok(FlowTerminals {
        source,
        sink,
        left,
        right,
    })
}
