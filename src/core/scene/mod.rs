//=========================================================================
// Scene System
//=========================================================================
//
// Scene trait and name-keyed scene management.
//
// Architecture:
//   SceneManager
//     ├─ scenes: HashMap<String, Box<dyn Scene>>
//     └─ active: Option<String>
//
// Flow:
//   update(ctx, dt) → active Scene::update()
//   render(ctx, renderer) → active Scene::render()
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::context::EngineContext;
use crate::core::services::RenderService;

//=== Module Declarations =================================================

mod scene_manager;

//=== Public API ==========================================================

pub use scene_manager::SceneManager;

//=== Scene Trait =========================================================

/// Defines scene behavior with lifecycle hooks and per-frame logic.
///
/// Scenes are registered in the [`SceneManager`] under a name and one of
/// them is active at a time. Each scene keeps its own state between
/// activations.
///
/// # Minimal Implementation
///
/// Only `update()` is required; the hooks and `render()` default to
/// doing nothing:
///
/// ```
/// use ember_engine::prelude::*;
///
/// struct MainScene;
///
/// impl Scene for MainScene {
///     fn update(&mut self, _ctx: &mut EngineContext, _dt: f32) {}
/// }
/// ```
pub trait Scene {
    /// Called when the scene becomes active.
    fn on_enter(&mut self, _ctx: &mut EngineContext) {}

    /// Called when another scene replaces this one.
    fn on_exit(&mut self, _ctx: &mut EngineContext) {}

    /// Called once per frame with the elapsed time since the last frame.
    fn update(&mut self, ctx: &mut EngineContext, dt: f32);

    /// Called once per frame, after `update`, to draw the scene.
    ///
    /// Commands submitted here draw before the deferred batch, so batched
    /// draws composite on top.
    fn render(&mut self, _ctx: &mut EngineContext, _renderer: &mut dyn RenderService) {}
}
