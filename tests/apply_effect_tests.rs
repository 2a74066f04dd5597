//! Effect application tests
//!
//! Tests for:
//! - Per-pass binding and hiding with sort offsets
//! - Sort priority on the same node and along the ancestor chain
//! - Bindings left untouched when resolution fails
//! - Custom tag managers

use std::cell::RefCell;
use std::rc::Rc;

use prism::effect::{EffectId, EffectOverrides, MemoryEffectSource};
use prism::errors::PipelineError;
use prism::pipeline::PipelineContext;
use prism::renderer::{Pass, PassMask, PipelineSettings, ShaderHandle, TagStateManager};
use prism::scene::{NodeHandle, NodeKind, PassBinding, Scene};

// ============================================================================
// Helper
// ============================================================================

const ALL_PASSES: &str = "fx/all.json";
const NO_SHADOWS: &str = "fx/no_shadows.json";
const GBUFFER_ONLY: &str = "fx/gbuffer_only.json";

fn pipeline() -> PipelineContext {
    let mut pipeline = PipelineContext::new(PipelineSettings::default());
    pipeline.effects_mut().add_source(
        MemoryEffectSource::new()
            .with(ALL_PASSES, "{}")
            .with(NO_SHADOWS, r#"{ "options": { "render_shadows": false } }"#)
            .with(
                GBUFFER_ONLY,
                r#"{ "options": { "render_shadows": false, "render_voxel": false, "render_envmap": false } }"#,
            ),
    );
    pipeline
}

fn renderable(scene: &mut Scene, name: &str) -> NodeHandle {
    scene.build_node(name).with_kind(NodeKind::Renderable).build()
}

fn none() -> EffectOverrides {
    EffectOverrides::new()
}

fn bound_sort(scene: &Scene, node: NodeHandle, pass: Pass) -> Option<i32> {
    match scene.get_node(node)?.binding(pass)? {
        PassBinding::Bound(state) => Some(state.sort),
        PassBinding::Hidden { .. } => None,
    }
}

// ============================================================================
// Per-pass Bindings
// ============================================================================

#[test]
fn disabled_shadows_hide_node_from_shadow_pass() {
    let mut scene = Scene::new();
    let mut pipeline = pipeline();
    let mesh = renderable(&mut scene, "mesh");

    pipeline.apply_effect(&mut scene, mesh, NO_SHADOWS, &none(), 0).unwrap();

    let node = scene.get_node(mesh).unwrap();
    assert!(matches!(node.binding(Pass::Shadows), Some(PassBinding::Hidden { sort: 25 })));
    assert!(!scene.is_visible_in(mesh, Pass::Shadows));
    assert!(scene.is_visible_in(mesh, Pass::GBuffer));

    let mask = scene.draw_mask(mesh);
    assert!(!mask.contains(pipeline.tag_manager().shadow_mask()));
    assert_eq!(mask, PassMask::GBUFFER | PassMask::VOXELIZE | PassMask::ENVMAP);
}

#[test]
fn enabled_pass_binds_at_offset_sort() {
    let mut scene = Scene::new();
    let mut pipeline = pipeline();
    let mesh = renderable(&mut scene, "mesh");

    let fx = pipeline.apply_effect(&mut scene, mesh, ALL_PASSES, &none(), 30).unwrap();

    assert_eq!(bound_sort(&scene, mesh, Pass::GBuffer), Some(30));
    assert_eq!(bound_sort(&scene, mesh, Pass::Shadows), Some(55));
    assert_eq!(bound_sort(&scene, mesh, Pass::Voxelize), Some(65));
    assert_eq!(bound_sort(&scene, mesh, Pass::Envmap), Some(75));

    let Some(PassBinding::Bound(state)) = scene.get_node(mesh).unwrap().binding(Pass::Shadows)
    else {
        panic!("shadow pass should be bound");
    };
    assert_eq!(Some(state.shader), fx.shader(Pass::Shadows));
    assert_eq!(state.effect_id, fx.id());
    assert_eq!(scene.draw_mask(mesh), PassMask::all());
}

#[test]
fn override_turns_pass_on() {
    let mut scene = Scene::new();
    let mut pipeline = pipeline();
    let mesh = renderable(&mut scene, "mesh");

    let overrides = EffectOverrides::new().with("render_shadows", true);
    pipeline.apply_effect(&mut scene, mesh, NO_SHADOWS, &overrides, 30).unwrap();
    assert_eq!(bound_sort(&scene, mesh, Pass::Shadows), Some(55));
}

// ============================================================================
// Sort Priority
// ============================================================================

#[test]
fn lower_sort_never_downgrades() {
    let mut scene = Scene::new();
    let mut pipeline = pipeline();
    let mesh = renderable(&mut scene, "mesh");

    let high = pipeline.apply_effect(&mut scene, mesh, ALL_PASSES, &none(), 30).unwrap();
    pipeline.apply_effect(&mut scene, mesh, GBUFFER_ONLY, &none(), 10).unwrap();

    // Every pass keeps the sort-30 effect.
    for pass in Pass::ALL {
        let binding = scene.get_node(mesh).unwrap().binding(pass).copied();
        match binding {
            Some(PassBinding::Bound(state)) => assert_eq!(state.effect_id, high.id(), "{pass}"),
            other => panic!("{pass}: expected the sort-30 binding, got {other:?}"),
        }
    }
    assert!(scene.is_visible_in(mesh, Pass::Shadows));
}

#[test]
fn equal_or_higher_sort_replaces() {
    let mut scene = Scene::new();
    let mut pipeline = pipeline();
    let mesh = renderable(&mut scene, "mesh");

    pipeline.apply_effect(&mut scene, mesh, ALL_PASSES, &none(), 10).unwrap();
    pipeline.apply_effect(&mut scene, mesh, NO_SHADOWS, &none(), 10).unwrap();
    assert!(!scene.is_visible_in(mesh, Pass::Shadows));

    pipeline.apply_effect(&mut scene, mesh, ALL_PASSES, &none(), 20).unwrap();
    assert_eq!(bound_sort(&scene, mesh, Pass::Shadows), Some(45));
}

#[test]
fn ancestor_with_higher_sort_wins() {
    let mut scene = Scene::new();
    let mut pipeline = pipeline();
    let group = scene.build_node("group").build();
    let mesh = scene
        .build_node("mesh")
        .with_kind(NodeKind::Renderable)
        .with_parent(group)
        .build();

    pipeline.apply_effect(&mut scene, group, NO_SHADOWS, &none(), 50).unwrap();
    pipeline.apply_effect(&mut scene, mesh, ALL_PASSES, &none(), 0).unwrap();

    // Shadows: group hides at 75, mesh binds at 25.
    assert!(!scene.is_visible_in(mesh, Pass::Shadows));
    // GBuffer: group binds at 50, mesh at 0; the group's shader governs.
    let effective = scene.effective_binding(mesh, Pass::GBuffer).unwrap();
    assert_eq!(effective.sort(), 50);
}

#[test]
fn descendant_with_equal_or_higher_sort_wins() {
    let mut scene = Scene::new();
    let mut pipeline = pipeline();
    let group = scene.build_node("group").build();
    let mesh = scene
        .build_node("mesh")
        .with_kind(NodeKind::Renderable)
        .with_parent(group)
        .build();

    pipeline.apply_effect(&mut scene, group, NO_SHADOWS, &none(), 0).unwrap();
    pipeline.apply_effect(&mut scene, mesh, ALL_PASSES, &none(), 0).unwrap();
    assert!(scene.is_visible_in(mesh, Pass::Shadows), "tie favors the deeper node");
    assert!(!scene.is_visible_in(group, Pass::Shadows));
}

#[test]
fn reapplying_ancestor_at_lower_sort_keeps_descendant_binding() {
    let mut scene = Scene::new();
    let mut pipeline = pipeline();
    let group = scene.build_node("group").build();
    let mesh = scene
        .build_node("mesh")
        .with_kind(NodeKind::Renderable)
        .with_parent(group)
        .build();

    pipeline.apply_effect(&mut scene, group, ALL_PASSES, &none(), 50).unwrap();
    let mesh_fx = pipeline.apply_effect(&mut scene, mesh, ALL_PASSES, &none(), 60).unwrap();
    pipeline.apply_effect(&mut scene, group, GBUFFER_ONLY, &none(), 10).unwrap();

    assert_eq!(bound_sort(&scene, group, Pass::GBuffer), Some(50), "group keeps sort 50");
    for (pass, expected) in [
        (Pass::GBuffer, 60),
        (Pass::Shadows, 85),
        (Pass::Voxelize, 95),
        (Pass::Envmap, 105),
    ] {
        let effective = scene.effective_binding(mesh, pass).unwrap();
        assert_eq!(effective.sort(), expected, "{pass}");
        match effective {
            PassBinding::Bound(state) => assert_eq!(state.effect_id, mesh_fx.id(), "{pass}"),
            PassBinding::Hidden { .. } => panic!("{pass}: mesh should stay bound"),
        }
        assert!(scene.is_visible_in(mesh, pass), "{pass}");
    }
}

#[test]
fn default_effect_is_overridden_by_regular_effects() {
    let mut scene = Scene::new();
    let mut pipeline = pipeline();
    let mesh = renderable(&mut scene, "mesh");
    let unlit = renderable(&mut scene, "unlit");

    pipeline.set_default_effect(&mut scene).unwrap();
    assert!(!scene.is_visible_in(mesh, Pass::Shadows));
    assert!(scene.is_visible_in(mesh, Pass::GBuffer));

    pipeline.apply_effect(&mut scene, mesh, ALL_PASSES, &none(), 0).unwrap();
    assert!(scene.is_visible_in(mesh, Pass::Shadows));
    assert!(!scene.is_visible_in(unlit, Pass::Shadows));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn failed_resolution_leaves_bindings_untouched() {
    let mut scene = Scene::new();
    let mut pipeline = pipeline();
    let mesh = renderable(&mut scene, "mesh");

    pipeline.apply_effect(&mut scene, mesh, NO_SHADOWS, &none(), 0).unwrap();
    let before = scene.get_node(mesh).unwrap().clone();

    let missing = pipeline.apply_effect(&mut scene, mesh, "fx/missing.json", &none(), 100);
    assert!(matches!(missing, Err(PipelineError::Load { .. })));

    let bad_option = EffectOverrides::new().with("render_sparkles", true);
    let config = pipeline.apply_effect(&mut scene, mesh, ALL_PASSES, &bad_option, 100);
    assert!(matches!(config, Err(PipelineError::Config { .. })));

    let after = scene.get_node(mesh).unwrap();
    for pass in Pass::ALL {
        assert_eq!(before.binding(pass), after.binding(pass), "{pass} changed");
    }
}

#[test]
fn stale_node_is_rejected() {
    let mut scene = Scene::new();
    let mut pipeline = pipeline();
    let mesh = renderable(&mut scene, "mesh");
    scene.remove_node(mesh);

    assert!(matches!(
        pipeline.apply_effect(&mut scene, mesh, ALL_PASSES, &none(), 0),
        Err(PipelineError::InvalidNode(_))
    ));
}

// ============================================================================
// Custom Tag Manager
// ============================================================================

#[derive(Default)]
struct Recorded {
    applied: Vec<(Pass, i32)>,
    hidden: Vec<(Pass, i32)>,
}

struct RecordingTags(Rc<RefCell<Recorded>>);

impl TagStateManager for RecordingTags {
    fn apply_state(
        &mut self,
        _scene: &mut Scene,
        _node: NodeHandle,
        pass: Pass,
        _shader: ShaderHandle,
        _effect_id: EffectId,
        sort: i32,
    ) -> bool {
        self.0.borrow_mut().applied.push((pass, sort));
        true
    }

    fn hide(&mut self, _scene: &mut Scene, _node: NodeHandle, pass: Pass, sort: i32) -> bool {
        self.0.borrow_mut().hidden.push((pass, sort));
        true
    }
}

#[test]
fn custom_tag_manager_receives_every_pass() {
    let mut scene = Scene::new();
    let mut pipeline = pipeline();
    let mesh = renderable(&mut scene, "mesh");

    let recorded = Rc::new(RefCell::new(Recorded::default()));
    pipeline.set_tag_manager(Box::new(RecordingTags(Rc::clone(&recorded))));
    pipeline.apply_effect(&mut scene, mesh, NO_SHADOWS, &none(), 5).unwrap();

    let recorded = recorded.borrow();
    assert_eq!(
        recorded.applied,
        vec![(Pass::GBuffer, 5), (Pass::Voxelize, 40), (Pass::Envmap, 50)]
    );
    assert_eq!(recorded.hidden, vec![(Pass::Shadows, 30)]);
    // The custom manager owns the scene side; nothing was written.
    assert!(scene.get_node(mesh).unwrap().binding(Pass::GBuffer).is_none());
}
