use tracing::warn;

use crate::ShortestPathOracle;
use crate::error::Error;
use crate::error::Result;
use crate::graph::Cost;
use crate::graph::Graph;
use crate::graph::VertexId;

/// Bellman–Ford over the residual graph: only edges with positive capacity
/// are usable and costs may be negative.
#[derive(Clone, Copy, Debug, Default)]
pub struct BellmanFord;

impl ShortestPathOracle for BellmanFord {
    fn shortest_path<V, E>(
        &mut self,
        graph: &Graph<V, E>,
        source: VertexId,
        target: VertexId,
        pred: &mut [Option<VertexId>],
    ) -> Result<bool> {
        check_query(graph, source, target, pred)?;
        let dist = bellman_ford(graph, source, pred)?;
        Ok(dist[target].is_some())
    }
}

/// Least-cost distances from `source` over edges with positive residual
/// capacity; `None` marks unreachable vertices. `pred` receives the shortest
/// path tree, with `pred[source] == None`.
///
/// Fails with [`Error::CostOverflow`] when a path cost leaves the `i64` range
/// and with [`Error::NegativeCycle`] when a negative-cost cycle is reachable
/// from `source`.
pub fn bellman_ford<V, E>(
    graph: &Graph<V, E>,
    source: VertexId,
    pred: &mut [Option<VertexId>],
) -> Result<Vec<Option<Cost>>> {
    let n = graph.order();
    check_query(graph, source, source, pred)?;

    let mut dist: Vec<Option<Cost>> = Vec::new();
    dist.try_reserve_exact(n)?;
    dist.resize(n, None);
    pred.fill(None);
    dist[source] = Some(0);

    for _ in 1..n {
        let mut relaxed = false;
        for u in 0..n {
            let Some(du) = dist[u] else {
                continue;
            };
            for edge in graph.out_edges(u) {
                if edge.capacity == 0 {
                    continue;
                }
                let v = edge.target;
                let cand = du
                    .checked_add(edge.cost)
                    .ok_or(Error::CostOverflow { from: u, to: v })?;
                if dist[v].is_none_or(|dv| cand < dv) {
                    dist[v] = Some(cand);
                    pred[v] = Some(u);
                    relaxed = true;
                }
            }
        }
        // a pass without any update means the labels are final
        if !relaxed {
            break;
        }
    }

    for u in 0..n {
        let Some(du) = dist[u] else {
            continue;
        };
        for edge in graph.out_edges(u) {
            if edge.capacity == 0 {
                continue;
            }
            let v = edge.target;
            let cand = du
                .checked_add(edge.cost)
                .ok_or(Error::CostOverflow { from: u, to: v })?;
            if dist[v].is_none_or(|dv| cand < dv) {
                warn!(origin = source, from = u, to = v, "negative-cost cycle detected");
                return Err(Error::NegativeCycle { origin: source });
            }
        }
    }

    debug_assert!(pred[source].is_none());
    Ok(dist)
}

pub(crate) fn check_query<V, E>(
    graph: &Graph<V, E>,
    source: VertexId,
    target: VertexId,
    pred: &[Option<VertexId>],
) -> Result<()> {
    let order = graph.order();
    if pred.len() != order {
        return Err(Error::PredecessorLength {
            len: pred.len(),
            order,
        });
    }
    for vertex in [source, target] {
        if vertex >= order {
            return Err(Error::VertexOutOfRange { vertex, order });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::error::ErrorKind;

    fn graph_with(n: usize, edges: &[(usize, usize, i64, u32)]) -> Graph {
        let mut g = Graph::new();
        for _ in 0..n {
            g.add_vertex(None).unwrap();
        }
        for &(u, v, c, cap) in edges {
            g.add_edge(u, v, c, cap, None).unwrap();
        }
        g
    }

    fn path_to(pred: &[Option<VertexId>], target: VertexId) -> Vec<VertexId> {
        let mut path = vec![target];
        let mut v = target;
        while let Some(u) = pred[v] {
            path.push(u);
            v = u;
        }
        path.reverse();
        path
    }

    #[test]
    fn prefers_cheaper_path_through_negative_edge() {
        let g = graph_with(4, &[(0, 1, 4, 1), (0, 2, 1, 1), (2, 1, -3, 1), (1, 3, 1, 1)]);
        let mut pred = vec![Some(7); 4];
        let dist = bellman_ford(&g, 0, &mut pred).unwrap();
        assert_eq!(dist, vec![Some(0), Some(-2), Some(1), Some(-1)]);
        assert_eq!(pred[0], None);
        assert_eq!(path_to(&pred, 3), vec![0, 2, 1, 3]);

        let found = BellmanFord.shortest_path(&g, 0, 3, &mut pred).unwrap();
        assert!(found);
    }

    #[test]
    fn zero_capacity_edges_are_ignored() {
        let g = graph_with(3, &[(0, 1, 0, 0), (0, 2, 5, 1), (2, 1, 5, 1)]);
        let mut pred = vec![None; 3];
        let dist = bellman_ford(&g, 0, &mut pred).unwrap();
        assert_eq!(dist[1], Some(10));
        assert_eq!(pred[1], Some(2));

        let g = graph_with(2, &[(0, 1, 0, 0)]);
        let mut pred = vec![None; 2];
        assert!(!BellmanFord.shortest_path(&g, 0, 1, &mut pred).unwrap());
        assert_eq!(pred, vec![None, None]);
    }

    #[test]
    fn unreachable_vertices_have_no_predecessor() {
        let g = graph_with(5, &[(0, 1, 2, 1), (3, 4, 1, 1)]);
        let mut pred = vec![Some(0); 5];
        assert!(!BellmanFord.shortest_path(&g, 0, 4, &mut pred).unwrap());
        assert_eq!(pred, vec![None, Some(0), None, None, None]);
    }

    #[test]
    fn negative_cycle_is_an_invariant_violation() {
        let g = graph_with(4, &[(0, 1, 1, 1), (1, 2, -2, 1), (2, 1, 1, 1), (2, 3, 0, 1)]);
        let mut pred = vec![None; 4];
        let err = BellmanFord.shortest_path(&g, 0, 3, &mut pred).unwrap_err();
        assert_eq!(err, Error::NegativeCycle { origin: 0 });
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    }

    #[test]
    fn negative_cycle_behind_zero_capacity_is_harmless() {
        let g = graph_with(3, &[(0, 1, 1, 1), (1, 2, -2, 1), (2, 1, 1, 0)]);
        let mut pred = vec![None; 3];
        assert!(BellmanFord.shortest_path(&g, 0, 2, &mut pred).unwrap());
    }

    #[test]
    fn cost_overflow_is_reported() {
        let g = graph_with(3, &[(0, 1, i64::MAX, 1), (1, 2, 1, 1)]);
        let mut pred = vec![None; 3];
        let err = bellman_ford(&g, 0, &mut pred).unwrap_err();
        assert_eq!(err, Error::CostOverflow { from: 1, to: 2 });
    }

    #[test]
    fn malformed_queries_are_bad_parameters() {
        let g = graph_with(3, &[(0, 1, 1, 1)]);
        let mut short = vec![None; 2];
        assert_eq!(
            BellmanFord.shortest_path(&g, 0, 1, &mut short),
            Err(Error::PredecessorLength { len: 2, order: 3 })
        );
        let mut pred = vec![None; 3];
        assert_eq!(
            BellmanFord
                .shortest_path(&g, 0, 3, &mut pred)
                .unwrap_err()
                .kind(),
            ErrorKind::BadParameter
        );
        assert!(BellmanFord.shortest_path(&g, 4, 0, &mut pred).is_err());
    }

    #[test]
    fn matches_dag_dynamic_programming_random() {
        for seed in 0..20_u64 {
            let mut rng = StdRng::seed_from_u64(0xBE11_0000 + seed);
            let n = 24;
            let mut edges = Vec::new();
            for u in 0..n {
                for v in (u + 1)..n {
                    if rng.random_bool(0.3) {
                        let cap = if rng.random_bool(0.8) { 1 } else { 0 };
                        edges.push((u, v, rng.random_range(-50..=50_i64), cap));
                    }
                }
            }
            let g = graph_with(n, &edges);

            // edges only go from lower to higher index, so index order is topological
            let mut expected: Vec<Option<i64>> = vec![None; n];
            expected[0] = Some(0);
            for u in 0..n {
                let Some(du) = expected[u] else {
                    continue;
                };
                for &(a, b, c, cap) in &edges {
                    if a == u && cap > 0 {
                        let cand = du + c;
                        if expected[b].is_none_or(|d| cand < d) {
                            expected[b] = Some(cand);
                        }
                    }
                }
            }

            let mut pred = vec![None; n];
            let dist = bellman_ford(&g, 0, &mut pred).unwrap();
            assert_eq!(dist, expected, "seed={seed}");
            for v in 1..n {
                if let Some(u) = pred[v] {
                    let c = g.cost(u, v).unwrap();
                    assert_eq!(dist[u].unwrap() + c, dist[v].unwrap(), "seed={seed} v={v}");
                }
            }
        }
    }
}
