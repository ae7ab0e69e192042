//! Frontiers hold the nodes that have been generated but not yet expanded.
//! The order in which a frontier hands nodes back is what distinguishes one
//! search algorithm from another.

use crate::grid::Position;
use crate::search::{Heuristic, HeuristicValue, NodeId, SearchNode};
use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::collections::VecDeque;
use std::fmt::Debug;

pub trait Frontier: Debug {
    fn insert(&mut self, node: &SearchNode);

    /// Remove the next node to expand, `None` once the frontier is empty.
    fn extract(&mut self) -> Option<NodeId>;

    fn is_empty(&self) -> bool;

    fn len(&self) -> usize;
}

/// First in, first out. Gives breadth-first search.
#[derive(Debug, Default)]
pub struct FifoFrontier {
    queue: VecDeque<NodeId>,
}

impl FifoFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for FifoFrontier {
    fn insert(&mut self, node: &SearchNode) {
        self.queue.push_back(node.get_node_id());
    }

    fn extract(&mut self) -> Option<NodeId> {
        self.queue.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Last in, first out. Gives depth-first search, and depth-limited search
/// when the engine bounds the depth.
#[derive(Debug, Default)]
pub struct LifoFrontier {
    stack: Vec<NodeId>,
}

impl LifoFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for LifoFrontier {
    fn insert(&mut self, node: &SearchNode) {
        self.stack.push(node.get_node_id());
    }

    fn extract(&mut self) -> Option<NodeId> {
        self.stack.pop()
    }

    fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    fn len(&self) -> usize {
        self.stack.len()
    }
}

/// How a [`BestFirstFrontier`] ranks nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// h(n), greedy best-first search
    Heuristic,
    /// g(n) + h(n), A* search
    CostPlusHeuristic,
}

/// Nodes come out lowest priority first, with ties going to the node that
/// was created first.
#[derive(Debug)]
pub struct BestFirstFrontier {
    target: Position,
    priority: Priority,
    heuristic: Box<dyn Heuristic>,
    queue: PriorityQueue<NodeId, Reverse<(HeuristicValue, NodeId)>>,
}

impl BestFirstFrontier {
    pub fn new(target: Position, priority: Priority, heuristic: Box<dyn Heuristic>) -> Self {
        Self {
            target,
            priority,
            heuristic,
            queue: PriorityQueue::new(),
        }
    }

    fn priority_of(&self, node: &SearchNode) -> HeuristicValue {
        let h = self.heuristic.evaluate(&node.get_position(), &self.target);
        match self.priority {
            Priority::Heuristic => h,
            Priority::CostPlusHeuristic => h + node.get_cost() as f64,
        }
    }
}

impl Frontier for BestFirstFrontier {
    fn insert(&mut self, node: &SearchNode) {
        let priority = self.priority_of(node);
        let node_id = node.get_node_id();
        self.queue.push(node_id, Reverse((priority, node_id)));
    }

    fn extract(&mut self) -> Option<NodeId> {
        self.queue.pop().map(|(node_id, _)| node_id)
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;
    use crate::search::ManhattanDistance;

    fn nodes() -> Vec<SearchNode> {
        let root = SearchNode::new_root(NodeId::new(0), Position::new(0, 0));
        let a = SearchNode::new_with_parent(
            NodeId::new(1),
            &root,
            Direction::Right,
            Position::new(0, 1),
            5,
        );
        let b = SearchNode::new_with_parent(
            NodeId::new(2),
            &root,
            Direction::Down,
            Position::new(1, 0),
            1,
        );
        vec![root, a, b]
    }

    fn drain(frontier: &mut dyn Frontier) -> Vec<usize> {
        let mut order = vec![];
        while let Some(node_id) = frontier.extract() {
            order.push(node_id.id());
        }
        assert!(frontier.is_empty());
        order
    }

    #[test]
    fn fifo_preserves_insertion_order() {
        let mut frontier = FifoFrontier::new();
        nodes().iter().for_each(|node| frontier.insert(node));
        assert_eq!(frontier.len(), 3);
        assert_eq!(drain(&mut frontier), vec![0, 1, 2]);
    }

    #[test]
    fn lifo_reverses_insertion_order() {
        let mut frontier = LifoFrontier::new();
        nodes().iter().for_each(|node| frontier.insert(node));
        assert_eq!(drain(&mut frontier), vec![2, 1, 0]);
    }

    #[test]
    fn greedy_ties_break_by_node_id() {
        // Both children are one step from the target, the root is two.
        let mut frontier = BestFirstFrontier::new(
            Position::new(1, 1),
            Priority::Heuristic,
            Box::new(ManhattanDistance),
        );
        nodes().iter().rev().for_each(|node| frontier.insert(node));
        assert_eq!(drain(&mut frontier), vec![1, 2, 0]);
    }

    #[test]
    fn a_star_accounts_for_path_cost() {
        // f(a) = 5 + 1, f(b) = 1 + 1, f(root) = 0 + 2
        let mut frontier = BestFirstFrontier::new(
            Position::new(1, 1),
            Priority::CostPlusHeuristic,
            Box::new(ManhattanDistance),
        );
        nodes().iter().for_each(|node| frontier.insert(node));
        assert_eq!(drain(&mut frontier), vec![0, 2, 1]);
    }
}
