//! The player: one rule engine bound to one game tree.
//!
//! Every mutating operation edits or navigates the tree and then rebuilds
//! the engine by replaying the nodes from the root to the current node.
//! Prisoner counts and ko are not reversible, so the tree is the only
//! source of truth and the engine is always derived from it.
//!
//! Listeners registered with [`Player::add_listener`] run after each
//! successful mutation, once state has settled, and get read-only access.

use std::fmt;

use log::{debug, info, warn};

use crate::board::{ScanTable, StoneType};
use crate::constants::{MAX_SIZE, MIN_SIZE};
use crate::mapper::{self, add_move, add_setup, move_from, setup_moves_from};
use crate::point::{Move, Point};
use crate::position::{MoveError, RuleEngine};
use crate::sgf::{self, ParseError};
use crate::tree::{GameNode, GameTree, NodeId};

/// Why a player could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// The text is not a well-formed record
    Parse(ParseError),
    /// The root has no usable `SZ` property
    MissingSize,
    /// `SZ` is outside what the coordinate encoding supports
    InvalidSize(i64),
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerError::Parse(e) => write!(f, "{e}"),
            PlayerError::MissingSize => write!(f, "cannot get board size from the record"),
            PlayerError::InvalidSize(n) => {
                write!(f, "unsupported board size {n} (expected {MIN_SIZE}..={MAX_SIZE})")
            }
        }
    }
}

impl std::error::Error for PlayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlayerError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for PlayerError {
    fn from(e: ParseError) -> Self {
        PlayerError::Parse(e)
    }
}

/// Callback run after each successful mutation.
pub type Listener = Box<dyn FnMut(&Player)>;

pub struct Player {
    tree: GameTree,
    rule: RuleEngine,
    listeners: Vec<Listener>,
}

impl Player {
    /// Bind to an existing tree. The root must declare a board size.
    ///
    /// The engine is replayed up to the tree's current node.
    pub fn new(tree: GameTree) -> Result<Self, PlayerError> {
        let size = mapper::board_size(&tree).ok_or(PlayerError::MissingSize)?;
        if size < MIN_SIZE as i64 || size > MAX_SIZE as i64 {
            return Err(PlayerError::InvalidSize(size));
        }
        let mut player = Self {
            tree,
            rule: RuleEngine::new(size as usize),
            listeners: Vec::new(),
        };
        player.replay();
        info!("player ready on a {size}x{size} board");
        Ok(player)
    }

    /// A player on a fresh record of the given size.
    pub fn with_size(size: usize) -> Result<Self, PlayerError> {
        let mut tree = GameTree::new();
        mapper::init_tree(&mut tree, Some(size));
        Self::new(tree)
    }

    /// Parse `text` and bind to it, filling `FF` and `GM` if absent.
    pub fn from_sgf(text: &str) -> Result<Self, PlayerError> {
        let mut tree = sgf::parse(text)?;
        if tree.root().is_none() {
            return Err(PlayerError::MissingSize);
        }
        mapper::init_tree(&mut tree, None);
        Self::new(tree)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn size(&self) -> usize {
        self.rule.size()
    }

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub fn rule(&self) -> &RuleEngine {
        &self.rule
    }

    pub fn stone(&self, x: i32, y: i32) -> Option<StoneType> {
        self.rule.stone(x, y)
    }

    pub fn next_stone(&self) -> StoneType {
        self.rule.next_stone()
    }

    pub fn prisoners(&self, stone: StoneType) -> usize {
        self.rule.prisoners(stone)
    }

    pub fn move_count(&self) -> usize {
        self.rule.move_count()
    }

    pub fn score(&self, stone: StoneType) -> usize {
        self.rule.score(stone)
    }

    pub fn territory(&self, stone: StoneType) -> ScanTable {
        self.rule.territory(stone)
    }

    pub fn current(&self) -> NodeId {
        self.tree.current()
    }

    pub fn current_node(&self) -> &GameNode {
        self.tree.current_node()
    }

    /// Variations below the current node.
    pub fn children(&self) -> &[NodeId] {
        self.tree.current_node().children()
    }

    pub fn is_leaf(&self) -> bool {
        !self.tree.current_node().has_child()
    }

    /// The move recorded on the current node.
    pub fn current_move(&self) -> Option<Move> {
        move_from(self.tree.current_node())
    }

    pub fn is_pass(&self) -> bool {
        self.current_move().is_some_and(|m| m.is_pass())
    }

    pub fn to_sgf(&self) -> String {
        self.tree.to_sgf()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Play the next color at `(x, y)` and record it.
    pub fn put_stone(&mut self, x: i32, y: i32) -> Result<(), MoveError> {
        let stone = self.rule.next_stone();
        if let Err(e) = self.rule.put_stone(x, y) {
            debug!("{stone} at ({x}, {y}) rejected: {e}");
            return Err(e);
        }
        add_move(&mut self.tree, x, y, stone);
        self.update();
        Ok(())
    }

    /// Place or remove a stone as a setup edit. Returns false when nothing
    /// changed: the point is off the board or already holds `stone`.
    pub fn set_stone(&mut self, x: i32, y: i32, stone: StoneType) -> bool {
        match self.rule.stone(x, y) {
            None => return false,
            Some(s) if s == stone => return false,
            Some(_) => {}
        }
        if !add_setup(&mut self.tree, x, y, stone) {
            return false;
        }
        self.update();
        true
    }

    /// Record a pass for the next color.
    pub fn pass(&mut self) {
        let stone = self.rule.next_stone();
        add_move(&mut self.tree, Point::PASS.x, Point::PASS.y, stone);
        self.update();
    }

    /// Flip the color to play without recording anything.
    pub fn change_stone(&mut self) {
        let stone = self.rule.next_stone().reverse();
        self.rule.set_next_stone(stone);
        self.notify();
    }

    pub fn back(&mut self) -> bool {
        self.back_n(1) > 0
    }

    /// Step back up to `n` nodes; returns how many were taken.
    pub fn back_n(&mut self, n: usize) -> usize {
        let steps = (0..n).take_while(|_| self.tree.back()).count();
        if steps > 0 {
            self.update();
        }
        steps
    }

    pub fn forward(&mut self) -> bool {
        self.forward_n(1) > 0
    }

    /// Step forward along the selected children up to `n` nodes.
    pub fn forward_n(&mut self, n: usize) -> usize {
        let steps = (0..n).take_while(|_| self.tree.forward()).count();
        if steps > 0 {
            self.update();
        }
        steps
    }

    /// Follow variation `index` of the current node.
    pub fn forward_to(&mut self, index: usize) -> bool {
        if !self.tree.forward_to(index) {
            return false;
        }
        self.update();
        true
    }

    pub fn back_to_head(&mut self) -> usize {
        self.back_n(usize::MAX)
    }

    pub fn forward_to_tail(&mut self) -> usize {
        self.forward_n(usize::MAX)
    }

    /// Splice an empty node between current and its selected child and
    /// step onto it. The board does not change.
    pub fn insert_node(&mut self) -> bool {
        if !self.tree.insert_node() {
            return false;
        }
        self.update();
        true
    }

    /// Delete the current node and everything below it.
    ///
    /// The removed nodes stay allocated inside the tree until [`copy`](Self::copy)
    /// builds a compacted record, so long editing sessions with many cuts keep
    /// growing until then. Node ids handed out earlier stay valid.
    pub fn cut(&mut self) -> bool {
        let cut = self.tree.current();
        if !self.tree.cut() {
            return false;
        }
        info!("cut node {} from the record", cut.index());
        self.update();
        true
    }

    /// Jump to `node`, making it part of the main line.
    pub fn set_current(&mut self, node: NodeId) -> bool {
        if !self.tree.set_current(node) {
            warn!("node {} is not part of this record", node.index());
            return false;
        }
        self.update();
        true
    }

    /// An independent player on a deep copy of the tree. Listeners are not
    /// carried over.
    pub fn copy(&self) -> Player {
        let mut player = Player {
            tree: self.tree.copy(),
            rule: RuleEngine::new(self.size()),
            listeners: Vec::new(),
        };
        player.replay();
        player
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&Player) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn update(&mut self) {
        self.replay();
        self.notify();
    }

    fn notify(&mut self) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in &mut listeners {
            listener(self);
        }
        self.listeners = listeners;
    }

    /// Rebuild the engine from the root down to the current node.
    fn replay(&mut self) {
        self.rule.clear();
        let sequence = self.tree.sequence();
        for &id in &sequence {
            let node = self.tree.node(id);
            if let Some(mv) = move_from(node) {
                self.rule.set_next_stone(mv.stone);
                if mv.is_pass() {
                    self.rule.pass();
                } else if let Err(e) = self.rule.put_stone(mv.x, mv.y) {
                    warn!("recorded move {} at ({}, {}) skipped: {e}", mv.stone, mv.x, mv.y);
                }
            }
            for edit in setup_moves_from(node) {
                self.rule.set_stone(edit.x, edit.y, edit.stone);
            }
        }
        debug!(
            "replayed {} node(s), {} move(s)",
            sequence.len(),
            self.rule.move_count()
        );
    }
}

/// Board followed by a status line.
impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rule.board())?;
        write!(
            f,
            "move {}, {} to play, prisoners black {} white {}",
            self.move_count(),
            self.next_stone(),
            self.prisoners(StoneType::Black),
            self.prisoners(StoneType::White)
        )?;
        if let Some(ko) = self.rule.ko() {
            write!(f, ", ko at {ko}")?;
        }
        let branches = self.children().len();
        if branches > 1 {
            write!(f, ", {branches} variations")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_missing_size() {
        let tree = sgf::parse("(;GM[1];B[aa])").unwrap();
        assert!(matches!(Player::new(tree), Err(PlayerError::MissingSize)));
        assert!(matches!(
            Player::from_sgf(""),
            Err(PlayerError::MissingSize)
        ));
        assert!(matches!(
            Player::from_sgf("(;SZ[x])"),
            Err(PlayerError::MissingSize)
        ));
    }

    #[test]
    fn test_invalid_size() {
        assert_eq!(
            Player::from_sgf("(;SZ[0])").err(),
            Some(PlayerError::InvalidSize(0))
        );
        assert_eq!(
            Player::with_size(53).err(),
            Some(PlayerError::InvalidSize(53))
        );
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = Player::from_sgf("(;SZ[9]").err().unwrap();
        assert!(matches!(err, PlayerError::Parse(_)));
    }

    #[test]
    fn test_put_stone_records_move() {
        let mut player = Player::with_size(9).unwrap();
        player.put_stone(4, 4).unwrap();
        assert_eq!(player.stone(4, 4), Some(StoneType::Black));
        assert_eq!(player.next_stone(), StoneType::White);
        assert_eq!(player.to_sgf(), "(;FF[4]GM[1]SZ[9];B[ee])");
        assert_eq!(
            player.current_move(),
            Some(Move::new(4, 4, StoneType::Black))
        );
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut player = Player::with_size(9).unwrap();
        player.put_stone(4, 4).unwrap();
        let before = player.to_sgf();
        assert_eq!(player.put_stone(4, 4), Err(MoveError::Occupied));
        assert_eq!(player.to_sgf(), before);
        assert_eq!(player.move_count(), 1);
    }

    #[test]
    fn test_pass() {
        let mut player = Player::with_size(9).unwrap();
        player.pass();
        assert!(player.is_pass());
        assert_eq!(player.next_stone(), StoneType::White);
        assert_eq!(player.move_count(), 1);
        assert_eq!(player.to_sgf(), "(;FF[4]GM[1]SZ[9];B[])");
    }

    #[test]
    fn test_back_and_forward_replay() {
        let mut player = Player::with_size(9).unwrap();
        player.put_stone(0, 0).unwrap();
        player.put_stone(1, 0).unwrap();
        player.put_stone(8, 8).unwrap();
        player.put_stone(0, 1).unwrap();
        assert_eq!(player.prisoners(StoneType::White), 1);

        assert!(player.back());
        assert_eq!(player.stone(0, 0), Some(StoneType::Black));
        assert_eq!(player.prisoners(StoneType::White), 0);
        assert_eq!(player.next_stone(), StoneType::White);

        assert_eq!(player.back_to_head(), 3);
        assert_eq!(player.move_count(), 0);
        assert!(!player.back());

        assert_eq!(player.forward_to_tail(), 4);
        assert_eq!(player.stone(0, 0), Some(StoneType::Empty));
        assert_eq!(player.prisoners(StoneType::White), 1);
    }

    #[test]
    fn test_set_stone() {
        let mut player = Player::with_size(9).unwrap();
        assert!(player.set_stone(2, 2, StoneType::White));
        assert_eq!(player.stone(2, 2), Some(StoneType::White));
        assert!(!player.set_stone(2, 2, StoneType::White), "no-op edit");
        assert!(!player.set_stone(9, 9, StoneType::White));
        assert_eq!(player.next_stone(), StoneType::Black);
        assert_eq!(player.move_count(), 0);

        assert!(player.set_stone(2, 2, StoneType::Empty));
        assert_eq!(player.stone(2, 2), Some(StoneType::Empty));
        assert_eq!(player.to_sgf(), "(;FF[4]GM[1]SZ[9];AE[cc])");
    }

    #[test]
    fn test_change_stone() {
        let mut player = Player::with_size(9).unwrap();
        player.change_stone();
        assert_eq!(player.next_stone(), StoneType::White);
        player.put_stone(3, 3).unwrap();
        assert_eq!(player.stone(3, 3), Some(StoneType::White));
        assert_eq!(player.to_sgf(), "(;FF[4]GM[1]SZ[9];W[dd])");
    }

    #[test]
    fn test_cut_and_set_current() {
        let mut player = Player::with_size(9).unwrap();
        player.put_stone(2, 2).unwrap();
        let first = player.current();
        player.back();
        player.put_stone(6, 6).unwrap();
        let second = player.current();
        player.back();
        assert_eq!(player.children().len(), 2);

        assert!(player.set_current(first));
        assert_eq!(player.stone(2, 2), Some(StoneType::Black));
        assert_eq!(player.stone(6, 6), Some(StoneType::Empty));

        assert!(player.cut());
        assert_eq!(player.children(), &[second]);
        assert_eq!(player.move_count(), 0);
        assert!(!player.set_current(first));
    }

    #[test]
    fn test_insert_node_keeps_line() {
        let mut player = Player::with_size(9).unwrap();
        player.put_stone(2, 2).unwrap();
        player.put_stone(6, 6).unwrap();
        player.back();
        assert!(player.insert_node());
        assert_eq!(player.current_move(), None);
        assert_eq!(player.move_count(), 1);
        assert_eq!(player.next_stone(), StoneType::White);
        assert_eq!(player.to_sgf(), "(;FF[4]GM[1]SZ[9];B[cc];;W[gg])");

        assert!(player.forward());
        assert_eq!(player.stone(6, 6), Some(StoneType::White));
    }

    #[test]
    fn test_forward_to_variation() {
        let mut player = Player::with_size(9).unwrap();
        player.put_stone(2, 2).unwrap();
        player.back();
        player.put_stone(6, 6).unwrap();
        player.back();
        assert!(player.forward_to(0));
        assert_eq!(player.stone(2, 2), Some(StoneType::Black));
        assert!(!player.forward_to(3));
    }

    #[test]
    fn test_listeners_run_after_mutations() {
        let mut player = Player::with_size(9).unwrap();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::new(Cell::new(StoneType::Empty));
        {
            let calls = Rc::clone(&calls);
            let seen = Rc::clone(&seen);
            player.add_listener(move |p| {
                calls.set(calls.get() + 1);
                seen.set(p.stone(4, 4).unwrap_or_default());
            });
        }

        player.put_stone(4, 4).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(seen.get(), StoneType::Black, "listener sees settled state");

        let _ = player.put_stone(4, 4);
        assert_eq!(calls.get(), 1, "rejected moves do not notify");

        player.back();
        player.back();
        assert_eq!(calls.get(), 2, "failed navigation does not notify");
    }

    #[test]
    fn test_copy_is_independent() {
        let mut player = Player::with_size(9).unwrap();
        player.put_stone(4, 4).unwrap();
        let mut what_if = player.copy();
        what_if.put_stone(5, 5).unwrap();
        assert_eq!(what_if.stone(4, 4), Some(StoneType::Black));
        assert_eq!(player.stone(5, 5), Some(StoneType::Empty));
        assert!(player.is_leaf());
        assert_eq!(what_if.move_count(), 2);
    }

    #[test]
    fn test_display() {
        let mut player = Player::with_size(3).unwrap();
        player.put_stone(1, 1).unwrap();
        assert_eq!(
            player.to_string(),
            ". . . \n. X . \n. . . \nmove 1, white to play, prisoners black 0 white 0"
        );
    }
}
