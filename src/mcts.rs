//! Monte Carlo Tree Search guided by UCT

use log::{debug, trace};
use rand::{rngs::StdRng, seq::IndexedRandom, SeedableRng};

use std::time::{Duration, Instant};

use crate::board::{Board, Player};
use crate::config::SearchConfig;
use crate::strategy::SearchStrategy;

type NodeId = usize;

const ROOT: NodeId = 0;

struct Node {
    board: Board,
    // the column played to reach this node, absent for the root
    column: Option<usize>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    visits: u32,
    wins: f64,
}

impl Node {
    fn new(board: Board, column: Option<usize>, parent: Option<NodeId>) -> Self {
        Self {
            board,
            column,
            parent,
            children: Vec::new(),
            visits: 0,
            wins: 0.0,
        }
    }
}

/// Arena-backed search tree, rebuilt for every move
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn new(board: Board) -> Self {
        Self {
            nodes: vec![Node::new(board, None, None)],
        }
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len();
        if let Some(parent) = node.parent {
            self.nodes[parent].children.push(id);
        }
        self.nodes.push(node);
        id
    }

    fn untried_moves(&self, id: NodeId) -> Vec<usize> {
        let node = self.get(id);
        legal_moves(&node.board)
            .into_iter()
            .filter(|&column| {
                !node
                    .children
                    .iter()
                    .any(|&child| self.get(child).column == Some(column))
            })
            .collect()
    }

    fn is_fully_expanded(&self, id: NodeId) -> bool {
        self.untried_moves(id).is_empty()
    }

    /// Upper confidence bound of a node, infinite until it has been visited
    fn uct_score(&self, id: NodeId, exploration_weight: f64) -> f64 {
        let node = self.get(id);
        if node.visits == 0 {
            return f64::INFINITY;
        }
        let parent_visits = node.parent.map_or(node.visits, |parent| self.get(parent).visits);
        let visits = node.visits as f64;
        node.wins / visits + exploration_weight * ((parent_visits as f64).ln() / visits).sqrt()
    }

    /// The child with the highest UCT score, keeping the first on ties
    fn best_child(&self, id: NodeId, exploration_weight: f64) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for &child in self.get(id).children.iter() {
            let score = self.uct_score(child, exploration_weight);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child, score));
            }
        }
        best.map(|(child, _)| child)
    }
}

// a finished game has no moves left to try
fn legal_moves(board: &Board) -> Vec<usize> {
    if board.is_game_over() {
        Vec::new()
    } else {
        board.find_available_columns()
    }
}

/// A Monte Carlo Tree Search agent
///
/// # Notes
/// Every call builds a fresh tree rooted at the given board and runs
/// selection, expansion, a biased random rollout and backpropagation until
/// either the iteration cap or the time limit is reached. The time limit is
/// only checked between iterations. Rewards are `+1`, `-1` or `0` from the
/// AI's point of view, and the move played is the root child with the best
/// average reward.
pub struct MonteCarloTreeSearch {
    player: Player,
    iterations: usize,
    time_limit: Duration,
    exploration_weight: f64,
    rng: StdRng,

    /// The number of iterations completed by the last search (for diagnostics only)
    pub iterations_run: usize,
    /// The number of nodes in the last search tree (for diagnostics only)
    pub node_count: usize,
}

impl MonteCarloTreeSearch {
    pub fn new(player: Player, config: &SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            player,
            iterations: config.iterations,
            time_limit: config.time_limit,
            exploration_weight: config.exploration_weight,
            rng,
            iterations_run: 0,
            node_count: 0,
        }
    }

    fn search(&mut self, board: &Board) -> Option<usize> {
        let mut tree = Tree::new(board.clone());
        let start = Instant::now();

        self.iterations_run = 0;
        while self.iterations_run < self.iterations && start.elapsed() < self.time_limit {
            let leaf = self.select(&mut tree);
            let result = self.rollout(&tree.get(leaf).board);
            Self::backpropagate(&mut tree, leaf, result);
            self.iterations_run += 1;
        }
        self.node_count = tree.len();

        for &child in tree.get(ROOT).children.iter() {
            let node = tree.get(child);
            trace!(
                "mcts column {:?}: {} / {} visits",
                node.column,
                node.wins,
                node.visits
            );
        }

        // exploration is switched off for the final choice
        let best = tree.best_child(ROOT, 0.0).and_then(|id| tree.get(id).column);
        debug!(
            "mcts: column {:?} after {} iterations in {:?}, {} nodes",
            best,
            self.iterations_run,
            start.elapsed(),
            self.node_count
        );
        best
    }

    /// Descends through fully expanded nodes, then expands one new child
    fn select(&mut self, tree: &mut Tree) -> NodeId {
        let mut id = ROOT;
        while tree.is_fully_expanded(id) && !tree.get(id).children.is_empty() {
            let unvisited: Vec<NodeId> = tree
                .get(id)
                .children
                .iter()
                .copied()
                .filter(|&child| tree.get(child).visits == 0)
                .collect();
            if let Some(&child) = unvisited.choose(&mut self.rng) {
                return child;
            }
            match tree.best_child(id, self.exploration_weight) {
                Some(child) => id = child,
                None => break,
            }
        }
        self.expand(tree, id)
    }

    fn expand(&mut self, tree: &mut Tree, id: NodeId) -> NodeId {
        let untried = tree.untried_moves(id);
        match untried.choose(&mut self.rng) {
            Some(&column) => {
                let mut board = tree.get(id).board.clone();
                board.drop_piece(column, self.player);
                tree.push(Node::new(board, Some(column), Some(id)))
            }
            None => id,
        }
    }

    /// Plays the game out from `board` with the opponent moving first,
    /// each side taking a win, then a block, then a random column
    fn rollout(&mut self, board: &Board) -> f64 {
        let mut board = board.clone();
        let mut turn = self.player.opponent();

        while !board.is_game_over() {
            let available = board.find_available_columns();
            let column = available
                .iter()
                .copied()
                .find(|&column| board.is_winning_move(column, turn))
                .or_else(|| {
                    available
                        .iter()
                        .copied()
                        .find(|&column| board.is_winning_move(column, turn.opponent()))
                })
                .or_else(|| available.choose(&mut self.rng).copied());

            match column {
                Some(column) => {
                    board.drop_piece(column, turn);
                }
                None => break,
            }
            turn = turn.opponent();
        }

        match board.winner() {
            Some(winner) if winner == self.player => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        }
    }

    fn backpropagate(tree: &mut Tree, leaf: NodeId, result: f64) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = tree.get_mut(id);
            node.visits += 1;
            node.wins += result;
            current = node.parent;
        }
    }
}

impl SearchStrategy for MonteCarloTreeSearch {
    fn get_move(&mut self, board: &Board) -> Option<usize> {
        let first = board.find_available_columns().first().copied()?;
        Some(self.search(board).unwrap_or(first))
    }

    fn player(&self) -> Player {
        self.player
    }

    fn name(&self) -> &'static str {
        "Monte Carlo Tree Search"
    }
}
