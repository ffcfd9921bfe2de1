//! Scripted scene editor session
//!
//! Builds the startup scene, then plays a few frames of hierarchy
//! interaction through a console outline: select, drag and drop, context
//! menu create/delete, and the last-scene guard. Each frame logs the outline
//! and a summary of the render queue.
//!
//! Usage: `scene_editor_demo [config.toml|config.ron]`

use std::collections::{HashMap, HashSet};

use scene_editor::foundation::logging;
use scene_editor::prelude::*;
use scene_editor::traversal::render_frame;

/// Application errors
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("scene: {0}")]
    Scene(#[from] SceneError),
}

/// Nodes of the startup scene the script refers to
struct StartupScene {
    camera: NodeId,
    object1: NodeId,
    object2: NodeId,
    sphere1: NodeId,
    box2: NodeId,
}

/// Camera, box, two object chains with spheres and a box at the leaves
fn build_startup_scene(set: &mut SceneSet) -> Result<StartupScene, AppError> {
    let root = set
        .graph()
        .scene(set.current_scene())
        .map(Scene::root)
        .ok_or(SceneError::SceneNotFound(set.current_scene()))?;

    let camera = set.create_child(root, NodeKind::Camera)?;
    let box1 = set.create_child(root, NodeKind::Box)?;
    let object1 = set.create_child(root, NodeKind::Object)?;
    let object2 = set.create_child(root, NodeKind::Object)?;
    let object3 = set.create_child(object1, NodeKind::Object)?;
    let object4 = set.create_child(object1, NodeKind::Object)?;
    let object5 = set.create_child(object2, NodeKind::Object)?;
    let object6 = set.create_child(object5, NodeKind::Object)?;
    let sphere1 = set.create_child(object3, NodeKind::Sphere)?;
    let box2 = set.create_child(object4, NodeKind::Box)?;
    set.create_child(object6, NodeKind::Sphere)?;

    let graph = set.graph_mut();
    graph.set_local_position(camera, Vec3::new(0.0, 2.0, 8.0))?;
    graph.set_local_position(box1, Vec3::new(-2.0, 0.0, 0.0))?;
    graph.set_local_position(object1, Vec3::new(2.0, 0.0, 0.0))?;
    graph.set_local_position(object2, Vec3::new(0.0, 0.0, -3.0))?;
    graph.set_local_euler_angles(object2, Vec3::new(0.0, 45.0, 0.0))?;
    graph.set_local_scale(object5, Vec3::new(0.5, 0.5, 0.5))?;
    if let Some(primitive) = graph.primitive_mut(sphere1) {
        primitive.color = Color::from_rgb8(64, 160, 255);
    }

    set.set_current_camera(camera, true)?;
    set.select(Selection::Scene(set.current_scene()))?;

    Ok(StartupScene {
        camera,
        object1,
        object2,
        sphere1,
        box2,
    })
}

/// Outline printed through the logger, with every row expanded
#[derive(Default)]
struct ConsoleOutline {
    responses: HashMap<Selection, RowResponse>,
    collapsed: HashSet<Selection>,
}

impl HierarchyView for ConsoleOutline {
    fn row(&mut self, row: &HierarchyRow<'_>) -> RowResponse {
        let marker = if row.flags.contains(RowFlags::SELECTED) {
            '*'
        } else {
            ' '
        };
        let hidden = if row.flags.contains(RowFlags::HIDDEN) {
            " (hidden)"
        } else {
            ""
        };
        log::info!("{marker} {}{}{hidden}", "  ".repeat(row.depth), row.name);

        let mut response = self.responses.remove(&row.target).unwrap_or_default();
        response.open = !self.collapsed.contains(&row.target);
        response
    }
}

/// Show the outline, apply what the user did, then record the frame
fn frame(set: &mut SceneSet, outline: &mut ConsoleOutline, label: &str) -> Result<(), AppError> {
    log::info!("--- {label} ---");

    let mut intents = IntentQueue::new();
    DisplayTraversal::new(set).run(outline, &mut intents);
    let pending = intents.len();
    let applied = set.apply_all(&mut intents);
    if pending > 0 {
        log::info!("Applied {applied}/{pending} intents");
    }
    for notice in set.take_notices() {
        log::warn!("{notice}");
    }

    let mut queue = RenderQueue::new();
    match render_frame(set, Viewport::new(1280, 720), &mut queue)? {
        Some(frame) => log::info!(
            "Rendered {} primitives in {} draws into {}x{}, clear {:?}",
            queue.primitive_count(),
            queue.len(),
            frame.camera.viewport.width,
            frame.camera.viewport.height,
            frame.clear_color.to_array()
        ),
        None => log::info!("Nothing to render"),
    }
    Ok(())
}

fn respond(outline: &mut ConsoleOutline, target: impl Into<Selection>, response: RowResponse) {
    outline.responses.insert(target.into(), response);
}

fn run() -> Result<(), AppError> {
    let config = match std::env::args().nth(1) {
        Some(path) => EditorConfig::load_from_file(&path)?,
        None => EditorConfig::default(),
    };
    logging::init_with_filter(&config.log_filter);
    log::info!("Starting scene editor demo");

    let mut set = SceneSet::new(config, NameGenerator::new());
    set.view_mut().set_default_view(16.0 / 9.0);
    let startup = build_startup_scene(&mut set)?;
    let first_scene = set.current_scene();
    let mut outline = ConsoleOutline::default();

    frame(&mut set, &mut outline, "startup")?;

    respond(&mut outline, startup.sphere1, RowResponse { clicked: true, ..Default::default() });
    frame(&mut set, &mut outline, "select Sphere 1")?;

    respond(
        &mut outline,
        startup.object2,
        RowResponse { dropped: Some(startup.sphere1), ..Default::default() },
    );
    frame(&mut set, &mut outline, "drop Sphere 1 onto Object 2")?;

    respond(
        &mut outline,
        startup.object1,
        RowResponse {
            context_create: Some(CreateKind::Node(NodeKind::Sphere)),
            ..Default::default()
        },
    );
    frame(&mut set, &mut outline, "create Sphere under Object 1")?;

    set.apply(Intent::FocusCameraOn(startup.box2))?;
    set.apply(Intent::ToggleVisible(startup.object1))?;
    respond(&mut outline, startup.box2, RowResponse { clicked: true, ..Default::default() });
    frame(&mut set, &mut outline, "hide Object 1, select Box 2")?;

    set.apply(Intent::Create {
        kind: CreateKind::Scene,
        under: Selection::None,
    })?;
    let second_scene = set.current_scene();
    set.apply(Intent::Create {
        kind: CreateKind::Node(NodeKind::Box),
        under: Selection::Scene(second_scene),
    })?;
    outline.collapsed.insert(Selection::Scene(first_scene));
    frame(&mut set, &mut outline, "second scene")?;

    respond(&mut outline, second_scene, RowResponse { context_delete: true, ..Default::default() });
    frame(&mut set, &mut outline, "delete second scene")?;

    respond(&mut outline, first_scene, RowResponse { context_delete: true, ..Default::default() });
    frame(&mut set, &mut outline, "delete last scene")?;

    set.set_view_mode(ViewMode::Renderer);
    frame(&mut set, &mut outline, "renderer view")?;

    outline.collapsed.clear();
    respond(&mut outline, startup.camera, RowResponse { context_delete: true, ..Default::default() });
    frame(&mut set, &mut outline, "delete current camera")?;

    log::info!("Scene editor demo finished");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::panic::set_hook(Box::new(|panic_info| {
        if let Some(location) = panic_info.location() {
            eprintln!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(payload) = panic_info.payload().downcast_ref::<&str>() {
            eprintln!("Panic message: {payload}");
        } else if let Some(payload) = panic_info.payload().downcast_ref::<String>() {
            eprintln!("Panic message: {payload}");
        }
    }));

    run().map_err(|e| {
        log::error!("Scene editor demo failed: {e}");
        e.into()
    })
}
