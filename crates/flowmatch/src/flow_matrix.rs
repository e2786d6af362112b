use std::fmt;

use crate::error::Error;
use crate::error::Result;
use crate::graph::VertexId;

/// Dense `n × n` table of flow values, row-major.
///
/// Every mutation goes through [`FlowMatrix::augment`], which keeps
/// `get(u, v) == -get(v, u)` for all pairs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlowMatrix {
    order: usize,
    values: Vec<i64>,
}

impl FlowMatrix {
    /// Zero flow over `order` vertices. The `order²` cells are reserved
    /// fallibly.
    pub fn new(order: usize) -> Result<Self> {
        let cells = order.checked_mul(order).ok_or(Error::OutOfMemory)?;
        let mut values = Vec::new();
        values.try_reserve_exact(cells)?;
        values.resize(cells, 0);
        Ok(Self { order, values })
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    pub fn get(&self, u: VertexId, v: VertexId) -> i64 {
        self.values[self.order * u + v]
    }

    #[inline]
    pub fn row(&self, u: VertexId) -> &[i64] {
        &self.values[self.order * u..self.order * (u + 1)]
    }

    /// Pushes `amount` units from `u` to `v`.
    #[inline]
    pub fn augment(&mut self, u: VertexId, v: VertexId, amount: i64) {
        let n = self.order;
        self.values[n * u + v] += amount;
        self.values[n * v + u] -= amount;
        debug_assert_eq!(self.get(u, v), -self.get(v, u), "skew symmetry ({u}, {v})");
    }

    /// Sum of `flow[v][*]`. Under skew symmetry this is outflow minus inflow.
    pub fn net_outflow(&self, v: VertexId) -> i64 {
        self.row(v).iter().sum()
    }

    pub fn is_skew_symmetric(&self) -> bool {
        (0..self.order).all(|u| (u..self.order).all(|v| self.get(u, v) == -self.get(v, u)))
    }

    /// Keeps only the top-left `new_order × new_order` block, in place.
    ///
    /// ```text
    ///  1  2  3  4        1  2  3
    ///  5  6  7  8   ->   5  6  7
    ///  9 10 11 12        9 10 11
    /// 13 14 15 16
    /// ```
    pub fn shrink(&mut self, new_order: usize) {
        assert!(new_order <= self.order, "cannot grow a flow matrix");
        let old = self.order;
        // rows only move towards the front, so copying front to back is safe
        for u in 0..new_order {
            self.values
                .copy_within(old * u..old * u + new_order, new_order * u);
        }
        self.values.truncate(new_order * new_order);
        self.order = new_order;
    }

    /// Cells with strictly positive flow, in row-major order.
    pub fn positive_entries(&self) -> impl Iterator<Item = (VertexId, VertexId, i64)> + '_ {
        let n = self.order;
        self.values
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f > 0)
            .map(move |(idx, &f)| (idx / n, idx % n, f))
    }
}

impl fmt::Display for FlowMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "flow={{")?;
        for u in 0..self.order {
            write!(f, "u={u}| ")?;
            for value in self.row(u) {
                write!(f, "{value:2},")?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}
