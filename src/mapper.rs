//! Translation between moves/setup edits and node properties.
//!
//! Moves are stored as `B` / `W` point properties, one per node. Setup
//! edits are stored as `AB` / `AW` / `AE` point lists; a point appears in at
//! most one of the three lists of a node.

use crate::board::StoneType;
use crate::constants::{DEFAULT_FORMAT, GAME_GO};
use crate::point::{Move, Point};
use crate::sgf::property::{PropIdent, PropValue};
use crate::tree::{GameNode, GameTree};

const MOVE_PROPS: [(PropIdent, StoneType); 2] = [
    (PropIdent::Black, StoneType::Black),
    (PropIdent::White, StoneType::White),
];

const SETUP_PROPS: [(PropIdent, StoneType); 3] = [
    (PropIdent::AddBlack, StoneType::Black),
    (PropIdent::AddWhite, StoneType::White),
    (PropIdent::AddEmpty, StoneType::Empty),
];

/// Move identifier for `stone`; `Empty` has none.
pub fn move_ident(stone: StoneType) -> Option<PropIdent> {
    match stone {
        StoneType::Black => Some(PropIdent::Black),
        StoneType::White => Some(PropIdent::White),
        StoneType::Empty => None,
    }
}

pub fn setup_ident(stone: StoneType) -> PropIdent {
    match stone {
        StoneType::Black => PropIdent::AddBlack,
        StoneType::White => PropIdent::AddWhite,
        StoneType::Empty => PropIdent::AddEmpty,
    }
}

/// The move recorded on `node`, if any.
pub fn move_from(node: &GameNode) -> Option<Move> {
    MOVE_PROPS.iter().find_map(|(ident, stone)| {
        let point = node.get(ident)?.as_point()?;
        Some(Move::at(point, *stone))
    })
}

/// Every setup edit recorded on `node`, `AE` points as `Empty`.
pub fn setup_moves_from(node: &GameNode) -> Vec<Move> {
    let mut moves = Vec::new();
    for (ident, stone) in &SETUP_PROPS {
        if let Some(points) = node.get(ident).and_then(PropValue::as_points) {
            moves.extend(points.iter().map(|&p| Move::at(p, *stone)));
        }
    }
    moves
}

pub fn has_setup(node: &GameNode) -> bool {
    SETUP_PROPS.iter().any(|(ident, _)| node.has(ident))
}

/// Setup lists present on `node` are all parsed and safe to edit in place.
fn setup_is_editable(node: &GameNode) -> bool {
    has_setup(node)
        && SETUP_PROPS
            .iter()
            .all(|(ident, _)| !node.has(ident) || node.get(ident).is_some())
}

/// Record a move below the current node.
///
/// If a child already records exactly this move it is selected and made
/// current instead of adding a duplicate sibling. Returns false for `Empty`.
pub fn add_move(tree: &mut GameTree, x: i32, y: i32, stone: StoneType) -> bool {
    let Some(ident) = move_ident(stone) else {
        return false;
    };
    let point = Point::new(x, y);

    let existing = tree.current_node().children().iter().position(|&child| {
        tree.node(child).get(&ident).and_then(PropValue::as_point) == Some(point)
    });
    if let Some(index) = existing {
        return tree.forward_to(index);
    }

    tree.new_child();
    tree.current_node_mut().set(ident, PropValue::Point(point));
    true
}

/// Record a setup edit.
///
/// A fresh node is added first unless current is a childless node that
/// already carries setup properties, so edits never land on a move node or
/// on a node that has variations below it. Setup lists kept as raw or
/// failed blocks are never edited; a fresh node is added instead.
pub fn add_setup(tree: &mut GameTree, x: i32, y: i32, stone: StoneType) -> bool {
    let point = Point::new(x, y);
    if point.is_pass() {
        return false;
    }
    let ident = setup_ident(stone);

    let current = tree.current_node();
    if current.has_child() || !setup_is_editable(current) {
        tree.new_child();
    }

    let node = tree.current_node_mut();
    remove_setup_point(node, point);
    match node.get_mut(&ident) {
        Some(PropValue::PointList(points)) => points.push(point),
        _ => node.set(ident, PropValue::PointList(vec![point])),
    }
    true
}

/// Drop `point` from all setup lists of `node`, removing lists left empty.
fn remove_setup_point(node: &mut GameNode, point: Point) {
    for (ident, _) in &SETUP_PROPS {
        let Some(PropValue::PointList(points)) = node.get_mut(ident) else {
            continue;
        };
        points.retain(|&p| p != point);
        if points.is_empty() {
            node.remove(ident);
        }
    }
}

/// Board size declared on the root.
pub fn board_size(tree: &GameTree) -> Option<i64> {
    let root = tree.root()?;
    tree.node(root)
        .get(&PropIdent::Size)
        .and_then(PropValue::as_number)
}

/// Make `tree` a usable Go record: ensure a root exists, select first
/// children everywhere, and fill `FF`, `GM` and `SZ` where absent.
pub fn init_tree(tree: &mut GameTree, size: Option<usize>) {
    if tree.root().is_none() {
        tree.new_child();
    }
    tree.reset_indexes();

    let Some(root) = tree.root() else {
        return;
    };
    let node = tree.node_mut(root);
    let mut defaults = vec![
        (PropIdent::FileFormat, PropValue::Number(DEFAULT_FORMAT)),
        (PropIdent::Game, PropValue::Number(GAME_GO)),
    ];
    if let Some(size) = size {
        defaults.push((PropIdent::Size, PropValue::Number(size as i64)));
    }
    for (ident, value) in defaults {
        if !node.has(&ident) {
            node.set(ident, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sgf::property::PropEntry;

    fn new_tree(size: usize) -> GameTree {
        let mut tree = GameTree::new();
        init_tree(&mut tree, Some(size));
        tree
    }

    #[test]
    fn test_init_tree() {
        let tree = new_tree(9);
        assert_eq!(tree.to_sgf(), "(;FF[4]GM[1]SZ[9])");
        assert_eq!(board_size(&tree), Some(9));
        assert_eq!(tree.current(), tree.root().unwrap());
    }

    #[test]
    fn test_init_tree_keeps_existing_values() {
        let mut tree = crate::sgf::parse("(;SZ[13]FF[3])").unwrap();
        init_tree(&mut tree, Some(19));
        assert_eq!(board_size(&tree), Some(13));
        assert_eq!(tree.to_sgf(), "(;SZ[13]FF[3]GM[1])");
    }

    #[test]
    fn test_add_move_and_read_back() {
        let mut tree = new_tree(9);
        assert!(add_move(&mut tree, 2, 3, StoneType::Black));
        assert_eq!(
            move_from(tree.current_node()),
            Some(Move::new(2, 3, StoneType::Black))
        );
        assert!(!add_move(&mut tree, 2, 3, StoneType::Empty));
    }

    #[test]
    fn test_add_move_reuses_existing_child() {
        let mut tree = new_tree(9);
        let root = tree.current();
        add_move(&mut tree, 2, 2, StoneType::Black);
        let first = tree.current();
        tree.back();
        add_move(&mut tree, 3, 3, StoneType::Black);
        tree.back();

        add_move(&mut tree, 2, 2, StoneType::Black);
        assert_eq!(tree.current(), first);
        assert_eq!(tree.node(root).children().len(), 2);
        assert_eq!(tree.node(root).child_index(), 0);

        // Same point, other color, is a different move.
        tree.back();
        add_move(&mut tree, 2, 2, StoneType::White);
        assert_eq!(tree.node(root).children().len(), 3);
    }

    #[test]
    fn test_pass_move() {
        let mut tree = new_tree(9);
        add_move(&mut tree, -1, -1, StoneType::White);
        let mv = move_from(tree.current_node()).unwrap();
        assert!(mv.is_pass());
        assert_eq!(mv.stone, StoneType::White);
        assert_eq!(tree.to_sgf(), "(;FF[4]GM[1]SZ[9];W[])");
    }

    #[test]
    fn test_setup_inserts_node_on_root() {
        let mut tree = new_tree(9);
        let root = tree.current();
        assert!(add_setup(&mut tree, 0, 0, StoneType::Black));
        assert_ne!(tree.current(), root);
        assert!(add_setup(&mut tree, 1, 0, StoneType::Black));
        assert_eq!(tree.node(root).children().len(), 1, "edits share one setup node");
        assert_eq!(
            setup_moves_from(tree.current_node()),
            vec![
                Move::new(0, 0, StoneType::Black),
                Move::new(1, 0, StoneType::Black)
            ]
        );
    }

    #[test]
    fn test_setup_never_lands_on_move_node() {
        let mut tree = new_tree(9);
        add_move(&mut tree, 4, 4, StoneType::Black);
        let mv = tree.current();
        add_setup(&mut tree, 0, 0, StoneType::White);
        assert_ne!(tree.current(), mv);
        assert!(move_from(tree.current_node()).is_none());
    }

    #[test]
    fn test_setup_on_branched_node_adds_child() {
        let mut tree = new_tree(9);
        add_setup(&mut tree, 0, 0, StoneType::Black);
        let setup = tree.current();
        add_move(&mut tree, 4, 4, StoneType::White);
        tree.back();
        add_setup(&mut tree, 1, 1, StoneType::Black);
        assert_ne!(tree.current(), setup);
        assert_eq!(tree.node(setup).children().len(), 2);
    }

    #[test]
    fn test_setup_lists_are_exclusive() {
        let mut tree = new_tree(9);
        add_setup(&mut tree, 0, 0, StoneType::Black);
        add_setup(&mut tree, 1, 1, StoneType::Black);
        add_setup(&mut tree, 0, 0, StoneType::White);
        let node = tree.current_node();
        assert_eq!(
            node.get(&PropIdent::AddBlack),
            Some(&PropValue::PointList(vec![Point::new(1, 1)]))
        );
        assert_eq!(
            node.get(&PropIdent::AddWhite),
            Some(&PropValue::PointList(vec![Point::new(0, 0)]))
        );

        add_setup(&mut tree, 1, 1, StoneType::Empty);
        let node = tree.current_node();
        assert!(!node.has(&PropIdent::AddBlack), "emptied lists are removed");
        assert_eq!(
            node.get(&PropIdent::AddEmpty),
            Some(&PropValue::PointList(vec![Point::new(1, 1)]))
        );
    }

    #[test]
    fn test_setup_keeps_unparsed_lists() {
        let mut tree = crate::sgf::parse("(;SZ[9];AB[aa][zz1])").unwrap();
        tree.forward();
        let failed = tree.current();
        assert!(add_setup(&mut tree, 2, 2, StoneType::Black));
        assert_ne!(tree.current(), failed);
        assert_eq!(
            tree.node(failed).entry(&PropIdent::AddBlack),
            Some(&PropEntry::ParseFailed(vec!["aa".into(), "zz1".into()]))
        );
        assert_eq!(tree.to_sgf(), "(;SZ[9];AB[aa][zz1];AB[cc])");
    }

    #[test]
    fn test_board_size_missing() {
        let tree = crate::sgf::parse("(;GM[1])").unwrap();
        assert_eq!(board_size(&tree), None);
        assert_eq!(board_size(&GameTree::new()), None);
    }
}
