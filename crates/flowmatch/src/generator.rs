use std::ops::Range;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index::sample;

use crate::error::Result;
use crate::graph::Graph;
use crate::graph::VertexId;

const C_MAX: i64 = 1_000_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BipartiteCase {
    /// Few candidate slots per task
    Sparse,
    /// Every task can take about half of the slots
    Dense,
    /// Three times as many tasks as slots
    Unbalanced,
    /// Complete, all costs zero
    ZeroCost,
    /// Sparse with costs of both signs
    NegativeCost,
}

impl BipartiteCase {
    pub const ALL: [BipartiteCase; 5] = [
        Self::Sparse,
        Self::Dense,
        Self::Unbalanced,
        Self::ZeroCost,
        Self::NegativeCost,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Sparse => "sparse",
            Self::Dense => "dense",
            Self::Unbalanced => "unbalanced",
            Self::ZeroCost => "zero_cost",
            Self::NegativeCost => "negative_cost",
        }
    }
}

/// Random unidirectionally bipartite graph: every edge runs from `left` to
/// `right`, all with capacity 1.
#[derive(Debug)]
pub struct GeneratedInstance {
    pub graph: Graph,
    pub left: Range<VertexId>,
    pub right: Range<VertexId>,
}

/// Builds an instance with `size` left vertices (at least 2). Every left
/// vertex gets at least one edge, so both sides are non-empty.
pub fn generate_case(case: BipartiteCase, size: usize, seed: u64) -> Result<GeneratedInstance> {
    let mut rng = StdRng::seed_from_u64(seed);
    let left = size.max(2);
    match case {
        BipartiteCase::Sparse => random_degree_case(&mut rng, left, left, 3, 0..=C_MAX),
        BipartiteCase::Dense => density_case(&mut rng, left, left, 0.5, 0..=C_MAX),
        BipartiteCase::Unbalanced => {
            random_degree_case(&mut rng, left, left / 3 + 1, 2, 0..=C_MAX)
        }
        BipartiteCase::ZeroCost => density_case(&mut rng, left, left, 1.0, 0..=0),
        BipartiteCase::NegativeCost => random_degree_case(&mut rng, left, left, 3, -C_MAX..=C_MAX),
    }
}

fn random_degree_case(
    rng: &mut StdRng,
    left: usize,
    right: usize,
    degree: usize,
    costs: std::ops::RangeInclusive<i64>,
) -> Result<GeneratedInstance> {
    let mut instance = empty_instance(left, right)?;
    for u in instance.left.clone() {
        let k = rng.random_range(1..=degree.min(right));
        for offset in sample(rng, right, k) {
            let v = instance.right.start + offset;
            instance
                .graph
                .add_edge(u, v, rng.random_range(costs.clone()), 1, None)?;
        }
    }
    Ok(instance)
}

fn density_case(
    rng: &mut StdRng,
    left: usize,
    right: usize,
    density: f64,
    costs: std::ops::RangeInclusive<i64>,
) -> Result<GeneratedInstance> {
    let mut instance = empty_instance(left, right)?;
    for u in instance.left.clone() {
        // one guaranteed candidate keeps every task on the left side
        let anchor = rng.random_range(instance.right.clone());
        for v in instance.right.clone() {
            if v == anchor || rng.random_bool(density) {
                instance
                    .graph
                    .add_edge(u, v, rng.random_range(costs.clone()), 1, None)?;
            }
        }
    }
    Ok(instance)
}

fn empty_instance(left: usize, right: usize) -> Result<GeneratedInstance> {
    let mut graph = Graph::with_capacity(left + right, left * right.min(8))?;
    for _ in 0..left + right {
        graph.add_vertex(None)?;
    }
    Ok(GeneratedInstance {
        graph,
        left: 0..left,
        right: left..left + right,
    })
}
