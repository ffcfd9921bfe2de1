//! Render traversal
//!
//! Walks one scene per frame and records what the rendering collaborator
//! should draw. Children are emitted before their parent; a node's own
//! components follow in attachment order. Hidden nodes are skipped with
//! their whole subtree.

use crate::config::EditorConfig;
use crate::editor::{SceneSet, Selection, ViewMode};
use crate::foundation::color::Color;
use crate::foundation::math::{Mat3, Mat4, Mat4Ext, Point3};
use crate::scene::{
    CameraComponent, ComponentRef, MeshHandle, NodeId, SceneError, SceneGraph, SceneId,
    SceneResult,
};

/// Per-draw uniform block in the layout the primitive shader expects
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PrimitiveUniform {
    /// Local-to-world matrix, column major
    pub transform: [[f32; 4]; 4],
    /// Inverse transpose of the upper 3x3, padded to 4x4
    pub normal_matrix: [[f32; 4]; 4],
    /// Flat color
    pub color: [f32; 4],
}

impl PrimitiveUniform {
    /// Build the uniform block for a world matrix and color
    pub fn new(world: &Mat4, color: Color) -> Self {
        let linear: Mat3 = world.fixed_view::<3, 3>(0, 0).into_owned();
        let normal = linear
            .try_inverse()
            .map_or_else(Mat3::identity, |inverse| inverse.transpose());

        Self {
            transform: (*world).into(),
            normal_matrix: normal.to_homogeneous().into(),
            color: color.to_array(),
        }
    }
}

/// How a primitive is rasterized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStyle {
    /// Shaded fill
    Fill,
    /// Flat wireframe drawn over the selected primitive
    SelectedWireframe,
}

/// Pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Left edge
    pub x: u32,
    /// Bottom edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Rectangle anchored at the origin
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Bottom-left preview of the given height, as wide as the aspect ratio asks
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn preview(aspect_ratio: f32, height: u32) -> Self {
        let width = (aspect_ratio * height as f32).round().max(1.0) as u32;
        Self::new(width, height)
    }
}

/// Matrices and target rectangle for rendering through a camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// World-to-camera matrix
    pub view: Mat4,
    /// Projection matrix
    pub projection: Mat4,
    /// Target rectangle
    pub viewport: Viewport,
}

impl CameraView {
    /// View through a camera owned by a node with the given world matrix
    ///
    /// Scale on the node is ignored.
    pub fn from_camera(camera: &CameraComponent, world: &Mat4, viewport: Viewport) -> Self {
        let view = world
            .rigid_part()
            .try_inverse()
            .unwrap_or_else(Mat4::identity);
        Self {
            view,
            projection: camera.projection_matrix(),
            viewport,
        }
    }
}

/// Per-frame settings for the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    /// Camera the frame is drawn through
    pub camera: CameraView,
    /// Color the target is cleared to
    pub clear_color: Color,
    /// Ambient light of the rendered scene
    pub ambient_light: Color,
    /// Point light placed at the viewing camera
    pub light_position: Point3,
}

/// One recorded draw
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Mesh draw
    Primitive {
        /// Owning node
        node: NodeId,
        /// Local-to-world matrix
        world: Mat4,
        /// Mesh to draw
        mesh: MeshHandle,
        /// Draw color
        color: Color,
        /// Fill or selection wireframe
        style: DrawStyle,
    },
    /// Axes gizmo at the selected node
    Axes {
        /// Owning node
        node: NodeId,
        /// World position
        origin: Point3,
        /// World orientation without scale
        rotation: Mat3,
    },
    /// Single colored segment
    Line {
        /// Start point
        from: Point3,
        /// End point
        to: Point3,
        /// Line color
        color: Color,
    },
    /// Editor ground grid on the `y = 0` plane, drawn first
    Ground,
    /// Inset rendering of the scene through the selected camera
    CameraPreview {
        /// Node carrying the camera
        node: NodeId,
        /// Matrices and inset rectangle
        view: CameraView,
    },
}

impl DrawCommand {
    /// Uniform block for primitive draws
    pub fn uniform(&self) -> Option<PrimitiveUniform> {
        match self {
            Self::Primitive { world, color, .. } => Some(PrimitiveUniform::new(world, *color)),
            _ => None,
        }
    }
}

/// Draws recorded for one frame
#[derive(Debug, Clone, Default)]
pub struct RenderQueue {
    commands: Vec<DrawCommand>,
}

impl RenderQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a draw
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Recorded draws in submission order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded draws
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of filled primitive draws
    pub fn primitive_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Primitive { style: DrawStyle::Fill, .. }))
            .count()
    }

    /// Nodes with a filled primitive draw, in draw order
    pub fn drawn_nodes(&self) -> Vec<NodeId> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Primitive { node, style: DrawStyle::Fill, .. } => Some(*node),
                _ => None,
            })
            .collect()
    }

    /// Drop all recorded draws
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

enum Visit {
    Enter(NodeId, usize),
    Emit(NodeId),
}

/// Per-frame walk of one scene
pub struct RenderTraversal<'a> {
    graph: &'a SceneGraph,
    config: &'a EditorConfig,
    selected: Option<NodeId>,
}

impl<'a> RenderTraversal<'a> {
    /// Traversal without selection overlays
    pub const fn new(graph: &'a SceneGraph, config: &'a EditorConfig) -> Self {
        Self {
            graph,
            config,
            selected: None,
        }
    }

    /// Draw overlays for the selected node
    #[must_use]
    pub const fn with_selection(mut self, selection: Selection) -> Self {
        self.selected = selection.node();
        self
    }

    /// Record the draws of a scene into `queue`
    pub fn run(&self, scene: SceneId, queue: &mut RenderQueue) -> SceneResult<()> {
        let root = self
            .graph
            .scene(scene)
            .ok_or(SceneError::SceneNotFound(scene))?
            .root();
        let max_depth = self.config.max_traversal_depth;
        let mut truncated = false;

        let mut stack = vec![Visit::Enter(root, 0)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(id, depth) => {
                    let Some(node) = self.graph.node(id) else {
                        continue;
                    };
                    if !node.visible {
                        continue;
                    }
                    stack.push(Visit::Emit(id));
                    if depth >= max_depth {
                        truncated |= !node.is_leaf();
                        continue;
                    }
                    stack.extend(
                        node.children()
                            .iter()
                            .rev()
                            .map(|&child| Visit::Enter(child, depth + 1)),
                    );
                }
                Visit::Emit(id) => self.emit(id, queue),
            }
        }

        if truncated {
            log::warn!("Render traversal stopped at depth {max_depth}");
        }
        Ok(())
    }

    fn emit(&self, id: NodeId, queue: &mut RenderQueue) {
        let (Some(node), Some(world)) = (self.graph.node(id), self.graph.world_matrix(id)) else {
            return;
        };
        let selected = self.selected == Some(id);

        for component in node.components().iter() {
            match component {
                ComponentRef::Transform(_) if selected => {
                    let rigid = world.rigid_part();
                    queue.push(DrawCommand::Axes {
                        node: id,
                        origin: world.origin(),
                        rotation: rigid.fixed_view::<3, 3>(0, 0).into_owned(),
                    });
                }
                ComponentRef::Transform(_) => {}
                ComponentRef::Primitive(primitive) => {
                    let Some(mesh) = primitive.mesh() else {
                        continue;
                    };
                    queue.push(DrawCommand::Primitive {
                        node: id,
                        world,
                        mesh,
                        color: primitive.color,
                        style: DrawStyle::Fill,
                    });
                    if selected {
                        queue.push(DrawCommand::Primitive {
                            node: id,
                            world,
                            mesh,
                            color: self.config.selected_wireframe_color,
                            style: DrawStyle::SelectedWireframe,
                        });
                    }
                }
                ComponentRef::Camera(camera) if selected => {
                    let frustum =
                        camera.frustum(&world.rigid_part(), self.config.frustum_max_depth);
                    for (from, to) in frustum.edges() {
                        queue.push(DrawCommand::Line {
                            from,
                            to,
                            color: self.config.frustum_wireframe_color,
                        });
                    }
                    let viewport =
                        Viewport::preview(camera.aspect_ratio(), self.config.preview_height);
                    queue.push(DrawCommand::CameraPreview {
                        node: id,
                        view: CameraView::from_camera(camera, &world, viewport),
                    });
                }
                ComponentRef::Camera(_) => {}
            }
        }
    }
}

/// Fill `queue` for the current frame of a session
///
/// In editor mode the current scene is drawn through the editor view with
/// selection overlays, after the ground grid when it is shown. In renderer
/// mode the current camera's scene is drawn through that camera without
/// overlays; with no current camera nothing is rendered and `None` is
/// returned. Clear color and ambient light come from the rendered scene.
pub fn render_frame(
    set: &SceneSet,
    target: Viewport,
    queue: &mut RenderQueue,
) -> SceneResult<Option<FrameView>> {
    queue.clear();
    let graph = set.graph();

    let (scene_id, camera, light_position) = match set.view_mode() {
        ViewMode::Editor => {
            let view = set.view();
            if view.show_ground {
                queue.push(DrawCommand::Ground);
            }
            RenderTraversal::new(graph, set.config())
                .with_selection(set.selection())
                .run(set.current_scene(), queue)?;
            let camera = CameraView {
                view: view.view_matrix(),
                projection: view.projection_matrix(),
                viewport: target,
            };
            (set.current_scene(), camera, Point3::from(view.position))
        }
        ViewMode::Renderer => {
            let Some(node) = set.current_camera() else {
                log::trace!("No current camera, skipping render");
                return Ok(None);
            };
            let (Some(entry), Some(camera), Some(world)) =
                (graph.node(node), graph.camera(node), graph.world_matrix(node))
            else {
                return Ok(None);
            };
            RenderTraversal::new(graph, set.config()).run(entry.scene(), queue)?;
            let camera = CameraView::from_camera(camera, &world, target);
            (entry.scene(), camera, world.origin())
        }
    };

    let scene = graph
        .scene(scene_id)
        .ok_or(SceneError::SceneNotFound(scene_id))?;
    Ok(Some(FrameView {
        camera,
        clear_color: scene.background_color,
        ambient_light: scene.ambient_light,
        light_position,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::NodeKind;
    use crate::foundation::math::Vec3;
    use crate::scene::{BuiltinMesh, Frustum, Primitive};
    use approx::assert_relative_eq;

    fn demo() -> (SceneSet, NodeId, NodeId, NodeId) {
        let mut set = SceneSet::default();
        let parent = set.create_object(NodeKind::Box).unwrap();
        let child = set.create_object(NodeKind::Sphere).unwrap();
        set.select(Selection::Scene(set.current_scene())).unwrap();
        let camera = set.create_object(NodeKind::Camera).unwrap();
        (set, parent, child, camera)
    }

    #[test]
    fn test_children_are_drawn_before_parents() {
        let (set, parent, child, _) = demo();
        let mut queue = RenderQueue::new();

        RenderTraversal::new(set.graph(), set.config())
            .run(set.current_scene(), &mut queue)
            .unwrap();

        assert_eq!(queue.drawn_nodes(), vec![child, parent]);
    }

    #[test]
    fn test_hidden_subtree_is_skipped() {
        let (mut set, parent, _, _) = demo();
        set.toggle_visible(parent).unwrap();
        let mut queue = RenderQueue::new();

        RenderTraversal::new(set.graph(), set.config())
            .run(set.current_scene(), &mut queue)
            .unwrap();

        assert!(queue.is_empty());
    }

    #[test]
    fn test_none_mesh_draws_nothing() {
        let mut set = SceneSet::default();
        let node = set.create_object(NodeKind::Object).unwrap();
        set.graph_mut()
            .add_component(node, Primitive::empty().into())
            .unwrap();
        let mut queue = RenderQueue::new();

        RenderTraversal::new(set.graph(), set.config())
            .run(set.current_scene(), &mut queue)
            .unwrap();
        assert_eq!(queue.primitive_count(), 0);

        set.graph_mut()
            .primitive_mut(node)
            .unwrap()
            .set_builtin(BuiltinMesh::Box);
        RenderTraversal::new(set.graph(), set.config())
            .run(set.current_scene(), &mut queue)
            .unwrap();
        assert_eq!(queue.primitive_count(), 1);
    }

    #[test]
    fn test_selected_primitive_gets_wireframe_and_axes() {
        let (set, parent, _, _) = demo();
        let mut queue = RenderQueue::new();

        RenderTraversal::new(set.graph(), set.config())
            .with_selection(Selection::Node(parent))
            .run(set.current_scene(), &mut queue)
            .unwrap();

        let parent_draws: Vec<_> = queue
            .commands()
            .iter()
            .filter(|c| match c {
                DrawCommand::Primitive { node, .. } | DrawCommand::Axes { node, .. } => {
                    *node == parent
                }
                _ => false,
            })
            .collect();
        assert!(matches!(parent_draws[0], DrawCommand::Axes { .. }));
        assert!(matches!(
            parent_draws[1],
            DrawCommand::Primitive { style: DrawStyle::Fill, .. }
        ));
        assert!(matches!(
            parent_draws[2],
            DrawCommand::Primitive { style: DrawStyle::SelectedWireframe, color, .. }
                if *color == set.config().selected_wireframe_color
        ));
    }

    #[test]
    fn test_selected_camera_draws_frustum_and_preview() {
        let (set, _, _, camera) = demo();
        let mut queue = RenderQueue::new();

        RenderTraversal::new(set.graph(), set.config())
            .with_selection(Selection::Node(camera))
            .run(set.current_scene(), &mut queue)
            .unwrap();

        let lines = queue
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, Frustum::EDGE_COUNT);

        let preview = queue.commands().iter().find_map(|c| match c {
            DrawCommand::CameraPreview { view, .. } => Some(*view),
            _ => None,
        });
        assert_eq!(preview.unwrap().viewport, Viewport::new(200, 200));
    }

    #[test]
    fn test_renderer_mode_needs_current_camera() {
        let (mut set, _, _, camera) = demo();
        set.set_view_mode(ViewMode::Renderer);
        let mut queue = RenderQueue::new();

        let target = Viewport::new(800, 600);
        assert_eq!(render_frame(&set, target, &mut queue).unwrap(), None);
        assert!(queue.is_empty());

        set.graph_mut()
            .set_local_position(camera, Vec3::new(0.0, 0.0, 5.0))
            .unwrap();
        set.set_current_camera(camera, true).unwrap();
        let scene = set.current_scene();
        set.graph_mut().scene_mut(scene).unwrap().background_color = Color::BLACK;
        let frame = render_frame(&set, target, &mut queue).unwrap().unwrap();

        assert_eq!(queue.primitive_count(), 2);
        assert!(!queue.commands().contains(&DrawCommand::Ground));
        assert_relative_eq!(
            frame.camera.view.transform_point(&Point3::origin()),
            Point3::new(0.0, 0.0, -5.0),
            epsilon = 1e-5
        );
        assert_eq!(frame.camera.viewport, target);
        assert_eq!(frame.clear_color, Color::BLACK);
        assert_eq!(frame.ambient_light, set.config().scene_ambient_light);
        assert_relative_eq!(frame.light_position, Point3::new(0.0, 0.0, 5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_editor_frame_carries_scene_lighting_and_ground() {
        let (mut set, _, _, _) = demo();
        let scene = set.current_scene();
        let ambient = Color::from_rgb8(10, 20, 30);
        set.graph_mut().scene_mut(scene).unwrap().ambient_light = ambient;
        let mut queue = RenderQueue::new();
        let target = Viewport::new(640, 480);

        let frame = render_frame(&set, target, &mut queue).unwrap().unwrap();
        assert_eq!(queue.commands()[0], DrawCommand::Ground);
        assert_eq!(queue.primitive_count(), 2);
        assert_eq!(frame.clear_color, set.config().scene_background);
        assert_eq!(frame.ambient_light, ambient);
        assert_relative_eq!(frame.light_position, Point3::from(set.view().position));

        set.view_mut().show_ground = false;
        render_frame(&set, target, &mut queue).unwrap();
        assert!(!queue.commands().contains(&DrawCommand::Ground));
        assert_eq!(queue.primitive_count(), 2);
    }

    #[test]
    fn test_only_primitive_draws_have_uniforms() {
        let (set, parent, _, _) = demo();
        let mut queue = RenderQueue::new();
        RenderTraversal::new(set.graph(), set.config())
            .run(set.current_scene(), &mut queue)
            .unwrap();
        queue.push(DrawCommand::Ground);

        let uniforms: Vec<_> = queue.commands().iter().filter_map(DrawCommand::uniform).collect();
        assert_eq!(uniforms.len(), 2);

        let world = set.graph().world_matrix(parent).unwrap();
        let color = set.graph().primitive(parent).unwrap().color;
        assert_eq!(uniforms[1], PrimitiveUniform::new(&world, color));
    }

    #[test]
    fn test_uniform_normal_matrix_undoes_scale() {
        let world = Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 1.0, 1.0));
        let uniform = PrimitiveUniform::new(&world, Color::WHITE);

        assert_relative_eq!(uniform.normal_matrix[0][0], 0.5);
        assert_relative_eq!(uniform.transform[0][0], 2.0);
        assert_eq!(bytemuck::bytes_of(&uniform).len(), 36 * 4);
    }
}
