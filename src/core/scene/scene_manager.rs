//=========================================================================
// Scene Manager
//=========================================================================
//
// Manages scene registration, the active-scene selection, and lifecycle
// hooks.
//
// Scenes are stored in a HashMap by name; exactly one is active at a
// time. Scenes keep their state while inactive, so switching back and
// forth does not reset them.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::Scene;
use crate::core::context::EngineContext;
use crate::core::services::RenderService;

//=== Scene Manager =======================================================

/// Name-keyed scene registry with a single active scene.
///
/// The engine forwards `update`/`render` to whichever scene is active and
/// switches the selection on request, firing `on_exit`/`on_enter` hooks
/// around the change.
#[derive(Default)]
pub struct SceneManager {
    scenes: HashMap<String, Box<dyn Scene>>,
    active: Option<String>,
}

impl SceneManager {
    //--- Construction -----------------------------------------------------

    /// Creates a manager with no scenes and no active selection.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene under a name.
    ///
    /// Registration does not activate the scene; activation happens via
    /// [`set_active`](Self::set_active) (or `Engine::run`'s start scene).
    /// Re-registering a name replaces the previous scene.
    pub fn register<T>(&mut self, name: impl Into<String>, scene: T)
    where
        T: Scene + 'static,
    {
        let name = name.into();
        if self.scenes.insert(name.clone(), Box::new(scene)).is_some() {
            warn!("scene {:?} was already registered and has been replaced", name);
        }
    }

    /// Returns `true` if a scene is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// Name of the currently active scene, if any.
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    //--- Activation -------------------------------------------------------

    /// Switches the active scene by name.
    ///
    /// Fires `on_exit` on the outgoing scene, then `on_enter` on the
    /// incoming one. Selecting the already-active scene is a no-op.
    /// Returns `false` (with a warning) if `name` is not registered; the
    /// previous selection stays active in that case.
    pub fn set_active(&mut self, name: &str, ctx: &mut EngineContext) -> bool {
        if !self.scenes.contains_key(name) {
            warn!("attempted to activate unregistered scene {:?}", name);
            return false;
        }

        if self.active.as_deref() == Some(name) {
            debug!("scene {:?} is already active", name);
            return true;
        }

        if let Some(current) = self.active.take() {
            debug!("leaving scene {:?}", current);
            if let Some(scene) = self.scenes.get_mut(&current) {
                scene.on_exit(ctx);
            }
        }

        debug!("entering scene {:?}", name);
        self.active = Some(name.to_owned());
        if let Some(scene) = self.scenes.get_mut(name) {
            scene.on_enter(ctx);
        }

        true
    }

    //--- Frame Forwarding -------------------------------------------------

    /// Updates the active scene; no-op when nothing is active.
    pub fn update(&mut self, ctx: &mut EngineContext, dt: f32) {
        let Some(name) = self.active.as_deref() else {
            return;
        };

        if let Some(scene) = self.scenes.get_mut(name) {
            scene.update(ctx, dt);
        }
    }

    /// Renders the active scene; no-op when nothing is active.
    pub fn render(&mut self, ctx: &mut EngineContext, renderer: &mut dyn RenderService) {
        let Some(name) = self.active.as_deref() else {
            return;
        };

        if let Some(scene) = self.scenes.get_mut(name) {
            scene.render(ctx, renderer);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
