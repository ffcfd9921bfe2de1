//! Editing session state
//!
//! The [`SceneSet`] owns the scene graph together with the state an editor
//! keeps around it: the ordered list of open scenes, the current scene, the
//! single current selection and the current camera. GUI code never mutates
//! it directly while a traversal is running; it records [`Intent`]s that are
//! applied once the pass is over.

pub mod intent;
pub mod naming;
pub mod notice;
pub mod scene_set;
pub mod selection;
pub mod view;

pub use intent::{CreateKind, Intent, IntentQueue};
pub use naming::{NameGenerator, NodeKind};
pub use notice::Notice;
pub use scene_set::SceneSet;
pub use selection::Selection;
pub use view::{EditorView, ViewMode};
