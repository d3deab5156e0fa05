//! Branching game record.
//!
//! Nodes live in an arena owned by [`GameTree`] and refer to each other by
//! [`NodeId`]. Slot 0 is an invisible super-root whose children are the game
//! roots of the collection; its selected child is "the" root. Each node keeps
//! a selected child index, and following those indexes from the super-root
//! gives the main line that [`GameTree::forward`] walks along.
//!
//! Nodes removed by [`GameTree::cut`] stay in the arena but are no longer
//! reachable, so the arena only grows while a record is edited. Ids stay
//! stable for the life of the tree; [`GameTree::copy`] builds a compacted
//! tree that leaves the unreachable nodes behind.

use crate::sgf::property::{PropEntry, PropIdent, PropValue};

/// Index of a node inside its tree's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

const SUPER_ROOT: NodeId = NodeId(0);

/// One record node: its properties, in insertion order, plus tree links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameNode {
    properties: Vec<(PropIdent, PropEntry)>,
    children: Vec<NodeId>,
    child_index: usize,
    parent: Option<NodeId>,
}

impl GameNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn properties(&self) -> impl Iterator<Item = (&PropIdent, &PropEntry)> {
        self.properties.iter().map(|(ident, entry)| (ident, entry))
    }

    pub fn entry(&self, ident: &PropIdent) -> Option<&PropEntry> {
        self.properties
            .iter()
            .find(|(i, _)| i == ident)
            .map(|(_, entry)| entry)
    }

    /// The parsed value of `ident`. Raw and failed entries yield `None`.
    pub fn get(&self, ident: &PropIdent) -> Option<&PropValue> {
        self.entry(ident).and_then(PropEntry::value)
    }

    pub fn get_mut(&mut self, ident: &PropIdent) -> Option<&mut PropValue> {
        self.properties
            .iter_mut()
            .find(|(i, _)| i == ident)
            .and_then(|(_, entry)| match entry {
                PropEntry::Parsed(value) => Some(value),
                _ => None,
            })
    }

    pub fn has(&self, ident: &PropIdent) -> bool {
        self.entry(ident).is_some()
    }

    pub fn set(&mut self, ident: PropIdent, value: PropValue) {
        self.set_entry(ident, PropEntry::Parsed(value));
    }

    /// Replace the entry for `ident` in place, or append it.
    pub fn set_entry(&mut self, ident: PropIdent, entry: PropEntry) {
        match self.properties.iter_mut().find(|(i, _)| *i == ident) {
            Some((_, slot)) => *slot = entry,
            None => self.properties.push((ident, entry)),
        }
    }

    pub fn remove(&mut self, ident: &PropIdent) -> Option<PropEntry> {
        let pos = self.properties.iter().position(|(i, _)| i == ident)?;
        Some(self.properties.remove(pos).1)
    }

    /// Identifiers whose values did not match their grammar.
    pub fn failed_properties(&self) -> impl Iterator<Item = &PropIdent> {
        self.properties
            .iter()
            .filter(|(_, entry)| entry.is_failed())
            .map(|(ident, _)| ident)
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_child(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child_index(&self) -> usize {
        self.child_index
    }

    pub fn selected_child(&self) -> Option<NodeId> {
        self.children.get(self.child_index).copied()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_child_index(&mut self, index: usize) -> bool {
        if index < self.children.len() {
            self.child_index = index;
            return true;
        }
        false
    }

    /// `;` followed by every property, e.g. `;B[dd]C[hello]`.
    pub fn to_sgf(&self) -> String {
        let mut out = String::from(";");
        for (ident, entry) in &self.properties {
            out.push_str(ident.as_str());
            out.push_str(&entry.to_sgf());
        }
        out
    }
}

/// Arena of nodes plus the "current" cursor.
#[derive(Clone, Debug)]
pub struct GameTree {
    nodes: Vec<GameNode>,
    current: NodeId,
}

impl Default for GameTree {
    fn default() -> Self {
        Self::new()
    }
}

impl GameTree {
    /// A tree holding only the super-root.
    pub fn new() -> Self {
        Self {
            nodes: vec![GameNode::new()],
            current: SUPER_ROOT,
        }
    }

    pub fn super_root(&self) -> NodeId {
        SUPER_ROOT
    }

    /// # Panics
    /// If `id` was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &GameNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut GameNode {
        &mut self.nodes[id.0]
    }

    /// The selected game root, if the collection has any.
    pub fn root(&self) -> Option<NodeId> {
        self.node(SUPER_ROOT).selected_child()
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn current_node(&self) -> &GameNode {
        self.node(self.current)
    }

    pub fn current_node_mut(&mut self) -> &mut GameNode {
        let current = self.current;
        self.node_mut(current)
    }

    /// Append `node` to `parent`'s children and select it.
    pub fn add_child(&mut self, parent: NodeId, mut node: GameNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        let p = self.node_mut(parent);
        p.children.push(id);
        p.child_index = p.children.len() - 1;
        id
    }

    /// Add an empty child below current and move onto it.
    pub fn new_child(&mut self) -> NodeId {
        let id = self.add_child(self.current, GameNode::new());
        self.current = id;
        id
    }

    /// Splice an empty node between current and its selected child, then
    /// move onto it. Without children this is [`new_child`](Self::new_child).
    pub fn insert_node(&mut self) -> bool {
        if self.current == SUPER_ROOT {
            return false;
        }
        let cur = self.current;
        let Some(child) = self.node(cur).selected_child() else {
            self.new_child();
            return true;
        };

        let id = NodeId(self.nodes.len());
        self.nodes.push(GameNode {
            children: vec![child],
            parent: Some(cur),
            ..GameNode::new()
        });
        let index = self.node(cur).child_index;
        self.node_mut(cur).children[index] = id;
        self.node_mut(child).parent = Some(id);
        self.current = id;
        debug_assert!(self.links_are_consistent());
        true
    }

    /// Step to the selected child.
    pub fn forward(&mut self) -> bool {
        if self.current == SUPER_ROOT {
            return false;
        }
        match self.current_node().selected_child() {
            Some(child) => {
                self.current = child;
                true
            }
            None => false,
        }
    }

    /// Select child `index` and step onto it.
    pub fn forward_to(&mut self, index: usize) -> bool {
        if self.current == SUPER_ROOT || !self.current_node_mut().set_child_index(index) {
            return false;
        }
        self.forward()
    }

    /// Step to the parent. The root is as far back as it goes.
    pub fn back(&mut self) -> bool {
        match self.current_node().parent {
            Some(parent) if parent != SUPER_ROOT => {
                self.current = parent;
                true
            }
            _ => false,
        }
    }

    /// Detach current (with its subtree) from its parent and step up.
    /// The root cannot be cut. Detached nodes keep their arena slots.
    pub fn cut(&mut self) -> bool {
        let cut = self.current;
        if !self.back() {
            return false;
        }
        let parent = self.current_node_mut();
        parent.children.retain(|&c| c != cut);
        parent.child_index = 0;
        debug_assert!(self.links_are_consistent());
        true
    }

    /// True if `id` is reachable from the selected root.
    pub fn contains(&self, id: NodeId) -> bool {
        if id.0 >= self.nodes.len() || id == SUPER_ROOT {
            return false;
        }
        let mut node = id;
        while let Some(parent) = self.node(node).parent {
            if !self.node(parent).children.contains(&node) {
                return false;
            }
            if parent == SUPER_ROOT {
                return self.root() == Some(node);
            }
            node = parent;
        }
        false
    }

    /// Make `id` current and point every ancestor's selected index at the
    /// path leading to it, so the main line runs through `id`.
    pub fn set_current(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.current = id;
        let mut node = id;
        while let Some(parent) = self.node(node).parent {
            if parent == SUPER_ROOT {
                break;
            }
            let Some(index) = self.node(parent).children.iter().position(|&c| c == node) else {
                unreachable!("contains() checked the path");
            };
            self.node_mut(parent).child_index = index;
            node = parent;
        }
        true
    }

    /// Nodes from the root down to current, inclusive.
    pub fn sequence(&self) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut node = self.current;
        while node != SUPER_ROOT {
            nodes.push(node);
            match self.node(node).parent {
                Some(parent) => node = parent,
                None => break,
            }
        }
        nodes.reverse();
        nodes
    }

    /// Number of nodes between the root and current (the root is depth 0).
    pub fn depth(&self) -> usize {
        self.sequence().len().saturating_sub(1)
    }

    /// Select the first child everywhere and move current to the root.
    pub fn reset_indexes(&mut self) {
        let mut stack = vec![SUPER_ROOT];
        while let Some(id) = stack.pop() {
            let node = self.node_mut(id);
            node.child_index = 0;
            stack.extend(node.children.iter().copied());
        }
        debug_assert!(self.links_are_consistent());
        self.current = self.root().unwrap_or(SUPER_ROOT);
    }

    /// Every reachable child names its parent correctly.
    pub fn links_are_consistent(&self) -> bool {
        let mut stack = vec![SUPER_ROOT];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if !node.children.is_empty() && node.child_index >= node.children.len() {
                return false;
            }
            for &child in &node.children {
                if self.node(child).parent != Some(id) {
                    return false;
                }
                stack.push(child);
            }
        }
        true
    }

    /// Deep copy holding only reachable nodes. Current is relocated by
    /// walking both trees along their selected children.
    pub fn copy(&self) -> GameTree {
        let mut tree = GameTree::new();
        tree.nodes[0].properties = self.node(SUPER_ROOT).properties.clone();
        tree.nodes[0].child_index = self.node(SUPER_ROOT).child_index;

        let mut stack = vec![(SUPER_ROOT, SUPER_ROOT)];
        while let Some((from, to)) = stack.pop() {
            for &child in &self.node(from).children {
                let src = self.node(child);
                let id = NodeId(tree.nodes.len());
                tree.nodes.push(GameNode {
                    properties: src.properties.clone(),
                    children: Vec::new(),
                    child_index: src.child_index,
                    parent: Some(to),
                });
                tree.nodes[to.0].children.push(id);
                stack.push((child, id));
            }
        }

        let mut original = Some(SUPER_ROOT);
        let mut mirror = Some(SUPER_ROOT);
        tree.current = tree.root().unwrap_or(SUPER_ROOT);
        while let (Some(a), Some(b)) = (original, mirror) {
            if a == self.current {
                tree.current = b;
                break;
            }
            original = self.node(a).selected_child();
            mirror = tree.node(b).selected_child();
        }
        tree
    }

    /// Serialize the whole collection.
    ///
    /// A run of only children is written flat; a node with zero or several
    /// children wraps each child subtree in parentheses. The super-root
    /// always wraps, so output starts with `(`.
    pub fn to_sgf(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<Emit> = self
            .node(SUPER_ROOT)
            .children
            .iter()
            .rev()
            .map(|&child| Emit::Open(child))
            .collect();

        while let Some(step) = stack.pop() {
            let Emit::Open(child) = step else {
                out.push(')');
                continue;
            };
            out.push('(');
            out.push_str(&self.node(child).to_sgf());
            let mut id = child;
            while let &[only] = &self.node(id).children[..] {
                out.push_str(&self.node(only).to_sgf());
                id = only;
            }
            stack.push(Emit::Close);
            stack.extend(self.node(id).children.iter().rev().map(|&c| Emit::Open(c)));
        }
        out
    }
}

/// Pending serialization work: a child subtree to open, or a `)` to emit.
enum Emit {
    Open(NodeId),
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    fn with_root() -> GameTree {
        let mut tree = GameTree::new();
        tree.new_child();
        tree
    }

    fn comment(tree: &mut GameTree, text: &str) {
        tree.current_node_mut().set(PropIdent::Comment, PropValue::Text(text.into()));
    }

    #[test]
    fn test_new_tree() {
        let tree = GameTree::new();
        assert_eq!(tree.root(), None);
        assert_eq!(tree.current(), tree.super_root());
        assert_eq!(tree.to_sgf(), "");
    }

    #[test]
    fn test_navigation() {
        let mut tree = with_root();
        let root = tree.current();
        let a = tree.new_child();
        let b = tree.new_child();
        assert_eq!(tree.sequence(), vec![root, a, b]);
        assert_eq!(tree.depth(), 2);

        assert!(tree.back());
        assert!(tree.back());
        assert!(!tree.back(), "cannot step back past the root");
        assert!(tree.forward());
        assert!(tree.forward());
        assert_eq!(tree.current(), b);
        assert!(!tree.forward());
    }

    #[test]
    fn test_forward_to_changes_selection() {
        let mut tree = with_root();
        let root = tree.current();
        let a = tree.new_child();
        tree.back();
        let b = tree.new_child();
        tree.back();
        assert_eq!(tree.node(root).selected_child(), Some(b));

        assert!(tree.forward_to(0));
        assert_eq!(tree.current(), a);
        assert_eq!(tree.node(root).child_index(), 0);

        tree.back();
        assert!(!tree.forward_to(5));
        assert_eq!(tree.current(), root);
    }

    #[test]
    fn test_cut() {
        let mut tree = with_root();
        let root = tree.current();
        let a = tree.new_child();
        tree.new_child();
        tree.back();
        tree.back();
        let b = tree.new_child();
        assert!(tree.cut());
        assert_eq!(tree.current(), root);
        assert_eq!(tree.node(root).children(), &[a]);
        assert_eq!(tree.node(root).child_index(), 0);
        assert!(!tree.contains(b));
        assert!(tree.contains(a));

        assert!(!tree.cut(), "the root cannot be cut");
    }

    #[test]
    fn test_insert_node() {
        let mut tree = with_root();
        let root = tree.current();
        let a = tree.new_child();
        tree.back();
        assert!(tree.insert_node());
        let inserted = tree.current();
        assert_eq!(tree.node(root).children(), &[inserted]);
        assert_eq!(tree.node(inserted).children(), &[a]);
        assert_eq!(tree.node(a).parent(), Some(inserted));
        assert!(tree.links_are_consistent());

        // At a leaf it simply appends.
        tree.forward();
        assert!(tree.insert_node());
        assert_eq!(tree.node(a).children(), &[tree.current()]);
    }

    #[test]
    fn test_set_current_rethreads_main_line() {
        let mut tree = with_root();
        let root = tree.current();
        let a = tree.new_child();
        let a2 = tree.new_child();
        tree.back();
        tree.back();
        let b = tree.new_child();
        assert_eq!(tree.node(root).selected_child(), Some(b));

        assert!(tree.set_current(a2));
        assert_eq!(tree.current(), a2);
        assert_eq!(tree.node(root).selected_child(), Some(a));
        assert_eq!(tree.sequence(), vec![root, a, a2]);

        assert!(tree.cut());
        assert!(!tree.set_current(a2), "cut nodes are no longer part of the tree");
        assert!(!tree.set_current(tree.super_root()));
    }

    #[test]
    fn test_serialize_flat_and_branches() {
        let mut tree = with_root();
        tree.current_node_mut().set(PropIdent::Size, PropValue::Number(9));
        tree.new_child();
        tree.current_node_mut().set(PropIdent::Black, PropValue::Point(Point::new(2, 2)));
        assert_eq!(tree.to_sgf(), "(;SZ[9];B[cc])");

        tree.new_child();
        tree.current_node_mut().set(PropIdent::White, PropValue::Point(Point::new(3, 3)));
        tree.back();
        tree.new_child();
        tree.current_node_mut().set(PropIdent::White, PropValue::Point(Point::PASS));
        assert_eq!(tree.to_sgf(), "(;SZ[9];B[cc](;W[dd])(;W[]))");
    }

    #[test]
    fn test_serialize_escapes() {
        let mut tree = with_root();
        comment(&mut tree, "a]b\\");
        assert_eq!(tree.to_sgf(), "(;C[a\\]b\\ ])");
    }

    #[test]
    fn test_copy_is_independent() {
        let mut tree = with_root();
        comment(&mut tree, "root");
        let a = tree.new_child();
        comment(&mut tree, "a");
        tree.back();
        tree.new_child();
        comment(&mut tree, "b");
        tree.back();
        tree.forward_to(0);
        assert_eq!(tree.current(), a);

        let mut copy = tree.copy();
        assert_eq!(copy.to_sgf(), tree.to_sgf());
        assert_eq!(
            copy.current_node().get(&PropIdent::Comment),
            Some(&PropValue::Text("a".into()))
        );

        comment(&mut copy, "changed");
        copy.new_child();
        assert_eq!(
            tree.current_node().get(&PropIdent::Comment),
            Some(&PropValue::Text("a".into()))
        );
        assert!(!tree.current_node().has_child());
    }

    #[test]
    fn test_copy_drops_cut_nodes() {
        let mut tree = with_root();
        tree.new_child();
        tree.new_child();
        tree.cut();
        assert_eq!(tree.nodes.len(), 4);
        let copy = tree.copy();
        assert_eq!(copy.nodes.len(), 3);
        assert_eq!(copy.sequence().len(), 2);
        assert_eq!(copy.to_sgf(), tree.to_sgf());
        assert!(copy.links_are_consistent());
    }

    #[test]
    fn test_node_properties_keep_order() {
        let mut node = GameNode::new();
        node.set(PropIdent::Size, PropValue::Number(19));
        node.set(PropIdent::Komi, PropValue::Real(6.5));
        node.set(PropIdent::Size, PropValue::Number(9));
        assert_eq!(node.to_sgf(), ";SZ[9]KM[6.5]");
        assert!(node.remove(&PropIdent::Size).is_some());
        assert!(!node.has(&PropIdent::Size));
        assert_eq!(node.to_sgf(), ";KM[6.5]");
    }
}
