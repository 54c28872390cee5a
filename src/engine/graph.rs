//! Category dependency graph
//!
//! An edge `parent -> child` means "parent blocks child": a child-category
//! notification is only admitted to the active queue while the parent
//! category has no active members. The graph is kept acyclic; every edge
//! insertion runs a depth-first reachability check first.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{OrchestratorError, Result};
use crate::notification::Category;

/// DFS node colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Directed acyclic graph over [`Category`], stored as index-based adjacency lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    children: [Vec<usize>; Category::COUNT],
    parents: [Vec<usize>; Category::COUNT],
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(parent, child)` pairs, rejecting the first edge that closes a cycle
    pub fn with_edges<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Category, Category)>,
    {
        let mut graph = Self::new();
        for (parent, child) in edges {
            graph.add_edge(parent, child)?;
        }
        Ok(graph)
    }

    /// Insert `parent -> child`.
    ///
    /// Returns `Ok(false)` if the edge already exists. Fails with
    /// `CycleDetected` (graph unchanged) if `child` already reaches `parent`,
    /// including the self-edge case.
    pub fn add_edge(&mut self, parent: Category, child: Category) -> Result<bool> {
        if self.has_edge(parent, child) {
            return Ok(false);
        }
        if parent == child || self.reaches(child, parent) {
            debug!(parent = %parent, child = %child, "Rejected dependency edge (cycle)");
            return Err(OrchestratorError::CycleDetected { parent, child });
        }

        self.children[parent.index()].push(child.index());
        self.parents[child.index()].push(parent.index());
        Ok(true)
    }

    /// Returns whether the edge existed
    pub fn remove_edge(&mut self, parent: Category, child: Category) -> bool {
        let (p, c) = (parent.index(), child.index());
        let before = self.children[p].len();
        self.children[p].retain(|&i| i != c);
        self.parents[c].retain(|&i| i != p);
        self.children[p].len() != before
    }

    pub fn has_edge(&self, parent: Category, child: Category) -> bool {
        self.children[parent.index()].contains(&child.index())
    }

    /// Categories that block `category` directly
    pub fn parents(&self, category: Category) -> impl Iterator<Item = Category> + '_ {
        self.parents[category.index()]
            .iter()
            .filter_map(|&i| Category::from_index(i))
    }

    /// Categories blocked directly by `category`
    pub fn children(&self, category: Category) -> impl Iterator<Item = Category> + '_ {
        self.children[category.index()]
            .iter()
            .filter_map(|&i| Category::from_index(i))
    }

    /// True when every direct blocker of `category` has zero active members
    pub fn is_admissible(&self, category: Category, active_counts: &[usize; Category::COUNT]) -> bool {
        self.parents[category.index()]
            .iter()
            .all(|&p| active_counts[p] == 0)
    }

    /// Whether `a` blocks `b` directly or transitively
    pub fn dominates(&self, a: Category, b: Category) -> bool {
        a != b && self.reaches(a, b)
    }

    /// Every edge as `(parent, child)`, ordered by parent then insertion
    pub fn edges(&self) -> Vec<(Category, Category)> {
        Category::ALL
            .iter()
            .flat_map(|&parent| self.children(parent).map(move |child| (parent, child)))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.children.iter().map(Vec::len).sum()
    }

    /// Adjacency mapping for categories that block at least one other
    pub fn adjacency(&self) -> BTreeMap<Category, Vec<Category>> {
        Category::ALL
            .iter()
            .filter(|c| !self.children[c.index()].is_empty())
            .map(|&c| (c, self.children(c).collect()))
            .collect()
    }

    /// Full three-colour DFS over every node; true if any back edge exists
    pub fn has_cycle(&self) -> bool {
        let mut marks = [Mark::Unvisited; Category::COUNT];
        (0..Category::COUNT).any(|start| marks[start] == Mark::Unvisited && self.visit(start, &mut marks))
    }

    fn visit(&self, node: usize, marks: &mut [Mark; Category::COUNT]) -> bool {
        marks[node] = Mark::InProgress;
        for &next in &self.children[node] {
            match marks[next] {
                Mark::InProgress => return true,
                Mark::Unvisited => {
                    if self.visit(next, marks) {
                        return true;
                    }
                }
                Mark::Done => {}
            }
        }
        marks[node] = Mark::Done;
        false
    }

    /// Depth-first search from `from`; true if `to` is reachable
    fn reaches(&self, from: Category, to: Category) -> bool {
        let target = to.index();
        let mut marks = [Mark::Unvisited; Category::COUNT];
        let mut stack = vec![from.index()];

        while let Some(node) = stack.pop() {
            if node == target {
                return true;
            }
            if marks[node] != Mark::Unvisited {
                continue;
            }
            marks[node] = Mark::InProgress;
            stack.extend(
                self.children[node]
                    .iter()
                    .copied()
                    .filter(|&next| marks[next] == Mark::Unvisited),
            );
            marks[node] = Mark::Done;
        }
        false
    }
}
