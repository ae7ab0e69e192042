use crate::grid::{Direction, Position};
use crate::search::{NodeId, SearchNode, Solution, NO_NODE};
use segvec::{Linear, SegVec};

/// A [`SearchSpace`] owns every node created during one search. Nodes refer
/// to their parent by [`NodeId`], so the path to any node can be recovered
/// without the nodes owning one another.
///
/// Nodes are never deduplicated: the same position may be generated many
/// times, each copy being a distinct node.
#[derive(Debug)]
pub struct SearchSpace {
    root_node_id: NodeId,
    nodes: SegVec<SearchNode, Linear>,
}

impl SearchSpace {
    pub fn new(start: Position) -> Self {
        let mut nodes = SegVec::new();
        let root_node_id = NodeId::new(0);
        nodes.push(SearchNode::new_root(root_node_id, start));

        Self {
            root_node_id,
            nodes,
        }
    }

    /// Create a new node for `position`, reached from `parent_id` via
    /// `action`.
    pub fn insert_child(
        &mut self,
        parent_id: NodeId,
        action: Direction,
        position: Position,
        step_cost: u32,
    ) -> NodeId {
        let node_id = NodeId::new(self.nodes.len());
        let child = SearchNode::new_with_parent(
            node_id,
            self.get_node(parent_id),
            action,
            position,
            step_cost,
        );
        self.nodes.push(child);
        node_id
    }

    #[inline(always)]
    pub fn get_root_node(&self) -> &SearchNode {
        self.get_node(self.root_node_id)
    }

    #[inline(always)]
    pub fn get_node(&self, node_id: NodeId) -> &SearchNode {
        self.nodes.get(node_id.id()).expect("Invalid node id")
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    /// Walk the parent links from `goal_id` back to the root and return the
    /// path in start to goal order.
    pub fn extract_solution(&self, goal_id: NodeId) -> Solution {
        let goal_node = self.get_node(goal_id);
        let mut actions = vec![];
        let mut positions = vec![goal_node.get_position()];
        let mut current_node = goal_node;
        while NO_NODE != current_node.get_parent_id() {
            if let Some(action) = current_node.get_action() {
                actions.push(action);
            }
            current_node = self.get_node(current_node.get_parent_id());
            positions.push(current_node.get_position());
        }
        actions.reverse();
        positions.reverse();
        Solution::new(actions, positions, goal_node.get_cost())
    }
}
