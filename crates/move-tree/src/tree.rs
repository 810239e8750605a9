//! Move tree for a game record: one mainline plus variations at any node.
//!
//! Nodes live in an arena owned by the tree. Parent and child links are arena
//! slots; callers address nodes only by their string ids.

use std::collections::HashMap;

use tracing::debug;

use crate::chess_game::STANDARD_START_FEN;
use crate::error::TreeError;
use crate::game_state::{GameState, MoveInput, PlayedMove};
use crate::node::{mainline_id, variation_id, MoveNode, MoveNumber};
use crate::pgn::extract_clock_annotations;

#[derive(Debug, Clone)]
pub struct MoveTree {
    nodes: Vec<MoveNode>,
    index: HashMap<String, usize>,
    /// Arena slots of the mainline, root first
    mainline: Vec<usize>,
    current: usize,
    /// Last value handed out for variation ids; never rewinds, even across rebuilds
    variation_counter: u64,
}

impl Default for MoveTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveTree {
    /// Create a tree holding only the root at the standard starting position
    pub fn new() -> Self {
        Self::with_root(STANDARD_START_FEN.to_string(), 0)
    }

    fn with_root(position_key: String, variation_counter: u64) -> Self {
        let root = MoveNode::root(position_key);
        let mut index = HashMap::new();
        index.insert(root.id.clone(), 0);
        Self {
            nodes: vec![root],
            index,
            mainline: vec![0],
            current: 0,
            variation_counter,
        }
    }

    /// Rebuild the tree from a game record, discarding all previous nodes.
    ///
    /// The rules engine loads the notation, then every ply of its history is
    /// replayed from the starting position to derive ids and positions.
    /// Returns the replayed history. If the engine rejects the notation the
    /// error is returned and the tree keeps its previous contents.
    pub fn build_from_notation<G: GameState>(
        &mut self,
        text: &str,
        game: &mut G,
    ) -> Result<Vec<PlayedMove>, TreeError> {
        game.load_notation(text)?;
        let history = game.history_verbose();

        let mut clocks: HashMap<usize, String> = extract_clock_annotations(text)
            .into_iter()
            .map(|clock| (clock.move_index, clock.time))
            .collect();

        game.reset();
        let mut tree = Self::with_root(game.position_encoding(), self.variation_counter);

        for (ply, played) in history.iter().enumerate() {
            let number = MoveNumber::new(game.move_number(), game.side_to_move());
            let detail = game.apply_move(&played.to_input())?;
            let position_key = game.position_encoding();

            let parent = tree.mainline[tree.mainline.len() - 1];
            let slot = tree.nodes.len();
            let mut node = MoveNode::new(
                mainline_id(number, &played.san),
                slot,
                parent,
                number,
                played.san.clone(),
                detail,
                position_key,
            );
            node.clock_remaining = clocks.remove(&ply);
            tree.insert(node, true);
        }

        debug!(
            plies = history.len(),
            clocks = tree.nodes.iter().filter(|n| n.clock_remaining.is_some()).count(),
            "Built move tree from notation"
        );

        *self = tree;
        Ok(history)
    }

    /// Register a node, link it under its parent, and extend the mainline if asked.
    fn insert(&mut self, mut node: MoveNode, on_mainline: bool) -> usize {
        let slot = self.nodes.len();
        node.slot = slot;
        if on_mainline {
            node.mainline_index = Some(self.mainline.len());
            self.mainline.push(slot);
        }
        if let Some(parent) = node.parent {
            self.nodes[parent].children.push(slot);
        }
        self.index.insert(node.id.clone(), slot);
        self.nodes.push(node);
        slot
    }

    /// Existing child of `parent` playing the same move, if any. `played` must
    /// come from the rules engine so that equivalent inputs compare equal.
    fn find_existing(&self, parent: usize, played: &PlayedMove) -> Option<usize> {
        let same = |slot: &usize| {
            self.nodes[*slot]
                .detail
                .as_ref()
                .is_some_and(|detail| detail.same_move(played))
        };

        if let Some(i) = self.nodes[parent].mainline_index {
            if let Some(successor) = self.mainline.get(i + 1) {
                if same(successor) {
                    return Some(*successor);
                }
            }
        }
        self.nodes[parent].children.iter().find(|slot| same(slot)).copied()
    }

    /// Add an explored move below `parent_id`.
    ///
    /// Returns the existing node when the same move was already recorded there,
    /// `Ok(None)` when `parent_id` is unknown, and an error when the rules
    /// engine rejects the move. The new node joins the mainline only when its
    /// parent is the current mainline tip.
    pub fn add_move<G: GameState + Default>(
        &mut self,
        parent_id: &str,
        mv: &MoveInput,
    ) -> Result<Option<&MoveNode>, TreeError> {
        let Some(&parent) = self.index.get(parent_id) else {
            debug!(parent_id, "add_move: unknown parent");
            return Ok(None);
        };

        let (number, detail, position_key) = {
            let mut probe = G::default();
            probe.load_position(&self.nodes[parent].position_key)?;
            let number = MoveNumber::new(probe.move_number(), probe.side_to_move());
            let detail = probe.apply_move(mv)?;
            (number, detail, probe.position_encoding())
        };

        if let Some(existing) = self.find_existing(parent, &detail) {
            return Ok(Some(&self.nodes[existing]));
        }

        let extends_mainline =
            self.nodes[parent].is_mainline() && self.mainline.last() == Some(&parent);
        let move_text = if mv.san.is_empty() {
            detail.san.clone()
        } else {
            mv.san.clone()
        };

        let mut id = mainline_id(number, &move_text);
        if !extends_mainline || self.index.contains_key(&id) {
            self.variation_counter += 1;
            id = variation_id(number, &move_text, self.variation_counter);
        }

        debug!(parent_id, id = %id, mainline = extends_mainline, "Adding move");
        let node = MoveNode::new(id, 0, parent, number, move_text, detail, position_key);
        let slot = self.insert(node, extends_mainline);
        Ok(Some(&self.nodes[slot]))
    }

    pub fn find_node(&self, id: &str) -> Option<&MoveNode> {
        self.index.get(id).map(|&slot| &self.nodes[slot])
    }

    pub(crate) fn find_node_mut(&mut self, id: &str) -> Option<&mut MoveNode> {
        let slot = *self.index.get(id)?;
        self.nodes.get_mut(slot)
    }

    pub fn root(&self) -> &MoveNode {
        &self.nodes[0]
    }

    /// Mainline nodes from the root to the tip
    pub fn mainline(&self) -> Vec<&MoveNode> {
        self.mainline.iter().map(|&slot| &self.nodes[slot]).collect()
    }

    pub fn mainline_len(&self) -> usize {
        self.mainline.len()
    }

    /// Last node of the mainline (the root when no moves were played)
    pub fn last_mainline(&self) -> &MoveNode {
        &self.nodes[self.mainline[self.mainline.len() - 1]]
    }

    /// All recorded children of a node; the first is its primary continuation.
    pub fn children(&self, id: &str) -> Vec<&MoveNode> {
        self.find_node(id)
            .map(|node| node.children.iter().map(|&slot| &self.nodes[slot]).collect())
            .unwrap_or_default()
    }

    /// Children that start a side line rather than continue the node's own line.
    pub fn variations(&self, id: &str) -> Vec<&MoveNode> {
        self.children(id).into_iter().skip(1).collect()
    }

    pub fn parent(&self, id: &str) -> Option<&MoveNode> {
        let node = self.find_node(id)?;
        node.parent.map(|slot| &self.nodes[slot])
    }

    /// Total number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Every node in creation order
    pub fn iter(&self) -> impl Iterator<Item = &MoveNode> {
        self.nodes.iter()
    }

    // ---- Cursor ----

    pub fn current(&self) -> &MoveNode {
        &self.nodes[self.current]
    }

    pub fn set_current(&mut self, id: &str) -> bool {
        match self.index.get(id) {
            Some(&slot) => {
                self.current = slot;
                true
            }
            None => false,
        }
    }

    pub fn go_to_root(&mut self) {
        self.current = 0;
    }

    /// Step forward: the mainline successor when on the mainline, otherwise the
    /// first recorded child. Returns None at a leaf without moving.
    pub fn next_move(&mut self) -> Option<&MoveNode> {
        let node = &self.nodes[self.current];
        let next = match node.mainline_index {
            Some(i) if i + 1 < self.mainline.len() => Some(self.mainline[i + 1]),
            _ => node.children.first().copied(),
        }?;
        self.current = next;
        Some(&self.nodes[next])
    }

    /// Step back to the mainline predecessor or the parent. Returns None at the root.
    pub fn previous_move(&mut self) -> Option<&MoveNode> {
        let node = &self.nodes[self.current];
        let previous = match node.mainline_index {
            Some(i) if i > 0 => Some(self.mainline[i - 1]),
            _ => node.parent,
        }?;
        self.current = previous;
        Some(&self.nodes[previous])
    }

    // ---- Paths ----

    /// Nodes from just after the root up to and including `id`.
    pub fn path_to_node(&self, id: &str) -> Vec<&MoveNode> {
        let Some(node) = self.find_node(id) else {
            return Vec::new();
        };

        if let Some(i) = node.mainline_index {
            return self.mainline[1..=i].iter().map(|&slot| &self.nodes[slot]).collect();
        }

        let mut path = Vec::new();
        let mut cursor = Some(node.slot);
        while let Some(slot) = cursor {
            let step = &self.nodes[slot];
            if step.is_root() {
                break;
            }
            path.push(step);
            cursor = step.parent;
        }
        path.reverse();
        path
    }

    /// Display text and move detail of every move leading to `id`.
    pub fn moves_to_node(&self, id: &str) -> Vec<(&str, &PlayedMove)> {
        self.path_to_node(id)
            .into_iter()
            .filter_map(|node| Some((node.move_text.as_deref()?, node.detail.as_ref()?)))
            .collect()
    }
}
