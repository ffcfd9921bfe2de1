//! Hierarchy outline traversal
//!
//! Produces one row per scene and, for rows the GUI reports open, one row
//! per child node, depth first. The GUI answers each row with what the user
//! did to it; those answers become [`Intent`]s, applied after the pass.

use bitflags::bitflags;

use crate::editor::{CreateKind, Intent, IntentQueue, SceneSet, Selection};
use crate::scene::{NodeId, SceneGraph, SceneId};

bitflags! {
    /// Presentation hints for a hierarchy row
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RowFlags: u8 {
        /// Node without children; no expand arrow and no close call
        const LEAF = 1 << 0;
        /// Row expands only when its arrow is clicked
        const OPEN_ON_ARROW = 1 << 1;
        /// Row is the current selection
        const SELECTED = 1 << 2;
        /// Row stands for a scene
        const SCENE = 1 << 3;
        /// Node is hidden from renders
        const HIDDEN = 1 << 4;
    }
}

/// One line of the outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyRow<'a> {
    /// Scene or node the row stands for
    pub target: Selection,
    /// Text to show
    pub name: &'a str,
    /// Indentation level; scenes are at 0
    pub depth: usize,
    /// Presentation hints
    pub flags: RowFlags,
}

/// What the user did to a row this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowResponse {
    /// Row is expanded
    pub open: bool,
    /// Row was clicked
    pub clicked: bool,
    /// "Delete" picked from the row's context menu
    pub context_delete: bool,
    /// Entry picked from the row's "Create" context menu
    pub context_create: Option<CreateKind>,
    /// Node dragged onto this row
    pub dropped: Option<NodeId>,
}

/// Immediate-mode tree widget driven by [`DisplayTraversal`]
pub trait HierarchyView {
    /// Show a row and report the user's interaction with it
    fn row(&mut self, row: &HierarchyRow<'_>) -> RowResponse;

    /// Called after the children of an open, non-leaf row
    fn close_row(&mut self, _target: Selection) {}
}

enum Step {
    Scene(SceneId),
    Node(NodeId, usize),
    Close(Selection),
}

/// Per-frame outline of a scene set
pub struct DisplayTraversal<'a> {
    set: &'a SceneSet,
}

impl<'a> DisplayTraversal<'a> {
    /// Traversal over every open scene
    pub const fn new(set: &'a SceneSet) -> Self {
        Self { set }
    }

    /// Show every row and record the resulting intents
    ///
    /// Returns the number of rows shown.
    pub fn run(&self, view: &mut impl HierarchyView, intents: &mut IntentQueue) -> usize {
        let graph = self.set.graph();
        let max_depth = self.set.config().max_traversal_depth;
        let mut rows = 0;

        let mut stack: Vec<Step> = self
            .set
            .scenes()
            .iter()
            .rev()
            .map(|&scene| Step::Scene(scene))
            .collect();
        while let Some(step) = stack.pop() {
            match step {
                Step::Scene(id) => {
                    let Some(scene) = graph.scene(id) else {
                        continue;
                    };
                    let target = Selection::Scene(id);
                    let mut flags = RowFlags::OPEN_ON_ARROW | RowFlags::SCENE;
                    flags.set(RowFlags::SELECTED, self.set.is_current(target));

                    let response = view.row(&HierarchyRow {
                        target,
                        name: scene.name(),
                        depth: 0,
                        flags,
                    });
                    rows += 1;
                    record(target, &response, intents);

                    if response.open {
                        stack.push(Step::Close(target));
                        push_children(&mut stack, graph, scene.root(), 1);
                    }
                }
                Step::Node(id, depth) => {
                    let Some(node) = graph.node(id) else {
                        continue;
                    };
                    let target = Selection::Node(id);
                    let leaf = node.is_leaf();
                    let mut flags = if leaf {
                        RowFlags::LEAF
                    } else {
                        RowFlags::OPEN_ON_ARROW
                    };
                    flags.set(RowFlags::SELECTED, self.set.is_current(target));
                    flags.set(RowFlags::HIDDEN, !node.visible);

                    let response = view.row(&HierarchyRow {
                        target,
                        name: node.name(),
                        depth,
                        flags,
                    });
                    rows += 1;
                    record(target, &response, intents);

                    if response.open && !leaf {
                        stack.push(Step::Close(target));
                        if depth < max_depth {
                            push_children(&mut stack, graph, id, depth + 1);
                        } else {
                            log::warn!("Hierarchy outline stopped at depth {max_depth}");
                        }
                    }
                }
                Step::Close(target) => view.close_row(target),
            }
        }
        rows
    }
}

/// Queue a node's children so they pop in order
fn push_children(stack: &mut Vec<Step>, graph: &SceneGraph, parent: NodeId, depth: usize) {
    let first = stack.len();
    graph.for_each_child(parent, |child, _| stack.push(Step::Node(child, depth)));
    stack[first..].reverse();
}

/// Turn a row response into intents
///
/// Context menu actions carry the row they were opened from, so they fail
/// rather than hit another row when an earlier intent removed it.
fn record(target: Selection, response: &RowResponse, intents: &mut IntentQueue) {
    if response.clicked {
        intents.push(Intent::Select(target));
    }
    if let Some(node) = response.dropped {
        intents.push(Intent::Reparent { node, target });
    }
    if response.context_delete {
        intents.push(Intent::Delete(target));
    }
    if let Some(kind) = response.context_create {
        intents.push(Intent::Create {
            kind,
            under: target,
        });
    }
}
