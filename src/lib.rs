//=========================================================================
// Ember Engine — Library Root
//
// This crate defines the public API surface of the Ember Engine, a 2D
// game-engine shell: platform bring-up, a fixed frame loop, and a scene
// manager the loop delegates to.
//
// Responsibilities:
// - Expose the engine facade (`Engine`) and its lifecycle operations
// - Expose the `core` systems (scenes, input, draw batch, services)
//   for engine-level extensibility
// - Keep the native backend (`platform`) hidden behind the service
//   traits, so hosts and tests can substitute their own
//
// Typical usage:
// ```no_run
// use ember_engine::prelude::*;
//
// struct Menu;
//
// impl Scene for Menu {
//     fn update(&mut self, ctx: &mut EngineContext, _dt: f32) {
//         if ctx.input.is_key_pressed(KeyCode::Escape) {
//             ctx.control.quit();
//         }
//     }
// }
//
// fn main() {
//     let mut engine = Engine::new();
//     if engine.init("Demo", 0, 0, 800, 600, WindowFlags::CENTERED).is_err() {
//         return;
//     }
//     engine.register_scene("menu", Menu);
//     engine.run("menu");
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the engine-internal systems (context, scenes, input,
// draw batch, capability traits). It is public for extensibility; most
// hosts only need the `Engine` facade and the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` holds the native winit/wgpu/fontdue/rodio backend and is
// not part of the API surface; custom backends implement the traits in
// `core::services` instead.
//
// `engine` defines the engine facade and frame loop.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineState};
