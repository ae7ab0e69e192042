use crate::grid::{Direction, Position};

/// Index of a [`SearchNode`] in its [`crate::search::SearchSpace`]. Ids are
/// handed out in creation order, so they double as the tie-breaker of the
/// priority frontiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(id: usize) -> Self {
        Self(id)
    }

    #[inline(always)]
    pub fn id(&self) -> usize {
        self.0
    }
}

/// Parent id of the root node.
pub const NO_NODE: NodeId = NodeId(usize::MAX);

/// A [`SearchNode`] is a node in the search space. It records how the search
/// reached a position: the parent it was generated from, the action taken,
/// and the accumulated cost and depth of that path.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Unique identifier of the node
    node_id: NodeId,
    /// Position of the agent at this node
    position: Position,
    /// Parent node, [`NO_NODE`] for the root
    parent_id: NodeId,
    /// Action that led to this node, `None` for the root
    action: Option<Direction>,
    /// Sum of the step costs from the root to this node
    cost: u32,
    /// Number of actions from the root to this node
    depth: usize,
}

impl SearchNode {
    /// Create the root of a search. It has no parent, no action, zero cost
    /// and zero depth.
    pub fn new_root(node_id: NodeId, position: Position) -> Self {
        Self {
            node_id,
            position,
            parent_id: NO_NODE,
            action: None,
            cost: 0,
            depth: 0,
        }
    }

    /// Create a node reached from `parent` by taking `action`, paying
    /// `step_cost` for it.
    pub fn new_with_parent(
        node_id: NodeId,
        parent: &SearchNode,
        action: Direction,
        position: Position,
        step_cost: u32,
    ) -> Self {
        Self {
            node_id,
            position,
            parent_id: parent.node_id,
            action: Some(action),
            cost: parent.cost + step_cost,
            depth: parent.depth + 1,
        }
    }

    pub fn get_node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn get_position(&self) -> Position {
        self.position
    }

    pub fn get_parent_id(&self) -> NodeId {
        self.parent_id
    }

    pub fn get_action(&self) -> Option<Direction> {
        self.action
    }

    pub fn get_cost(&self) -> u32 {
        self.cost
    }

    pub fn get_depth(&self) -> usize {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.parent_id == NO_NODE
    }
}
