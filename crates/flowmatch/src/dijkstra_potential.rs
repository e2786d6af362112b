use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::ShortestPathOracle;
use crate::bellman_ford::bellman_ford;
use crate::bellman_ford::check_query;
use crate::error::Error;
use crate::error::Result;
use crate::graph::Cost;
use crate::graph::Graph;
use crate::graph::VertexId;

/// Binary-heap Dijkstra over reduced costs `c(u, v) + p(u) - p(v)`.
///
/// The first query seeds the potentials `p` with a Bellman–Ford run, which
/// copes with the negative costs of the initial network. Every later query
/// runs Dijkstra and folds the new distances into `p`, which keeps all
/// reduced costs of the residual graph non-negative as long as the graph is
/// only changed by augmenting along the returned shortest paths.
///
/// Potentials belong to one flow network and one source.
/// [`min_cost_flow`](crate::min_cost_flow) resets them before it starts, and
/// a query from a different source or on a graph of a different order seeds
/// them again.
#[derive(Clone, Debug, Default)]
pub struct PotentialDijkstra {
    potential: Vec<Option<Cost>>,
    seeded: Option<VertexId>,
}

impl PotentialDijkstra {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current potentials; `None` for vertices unreachable from the source.
    pub fn potentials(&self) -> &[Option<Cost>] {
        &self.potential
    }
}

impl ShortestPathOracle for PotentialDijkstra {
    fn shortest_path<V, E>(
        &mut self,
        graph: &Graph<V, E>,
        source: VertexId,
        target: VertexId,
        pred: &mut [Option<VertexId>],
    ) -> Result<bool> {
        check_query(graph, source, target, pred)?;

        if self.seeded != Some(source) || self.potential.len() != graph.order() {
            self.potential = bellman_ford(graph, source, pred)?;
            self.seeded = Some(source);
            return Ok(self.potential[target].is_some());
        }

        let reduced = dijkstra_reduced(graph, source, &self.potential, pred)?;
        for (v, (p, d)) in self.potential.iter_mut().zip(&reduced).enumerate() {
            *p = match (*p, *d) {
                (Some(p), Some(d)) => Some(
                    p.checked_add(d)
                        .ok_or(Error::CostOverflow { from: source, to: v })?,
                ),
                _ => None,
            };
        }
        Ok(reduced[target].is_some())
    }

    fn reset(&mut self) {
        self.potential.clear();
        self.seeded = None;
    }
}

fn dijkstra_reduced<V, E>(
    graph: &Graph<V, E>,
    source: VertexId,
    potential: &[Option<Cost>],
    pred: &mut [Option<VertexId>],
) -> Result<Vec<Option<Cost>>> {
    let n = graph.order();
    let mut dist: Vec<Option<Cost>> = Vec::new();
    dist.try_reserve_exact(n)?;
    dist.resize(n, None);
    pred.fill(None);
    if potential[source].is_none() {
        return Ok(dist);
    }

    let mut heap = BinaryHeap::new();
    dist[source] = Some(0);
    heap.push(Reverse((0_i64, source)));

    while let Some(Reverse((d, u))) = heap.pop() {
        if dist[u] != Some(d) {
            continue;
        }
        let Some(pu) = potential[u] else {
            continue;
        };

        for edge in graph.out_edges(u) {
            if edge.capacity == 0 {
                continue;
            }
            let v = edge.target;
            // vertices the previous round could not reach stay unreachable
            let Some(pv) = potential[v] else {
                continue;
            };
            let overflow = Error::CostOverflow { from: u, to: v };
            let reduced = edge
                .cost
                .checked_add(pu)
                .and_then(|c| c.checked_sub(pv))
                .ok_or(overflow.clone())?;
            if reduced < 0 {
                return Err(Error::NegativeReducedCost { from: u, to: v });
            }
            let cand = d.checked_add(reduced).ok_or(overflow)?;
            if dist[v].is_none_or(|dv| cand < dv) {
                dist[v] = Some(cand);
                pred[v] = Some(u);
                heap.push(Reverse((cand, v)));
            }
        }
    }

    Ok(dist)
}
