//=========================================================================
// Ember Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     Engine::new()  ──init()──>  Running  ──run(scene)──>  [Frame Loop]
//         │                          │
//         │                          └─ owns platform services,
//         │                             scene manager, context
//         └─ Uninitialized
//
//     Frame: events → update(dt) → render → tick → end-of-frame reset
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::config::{WindowConfig, WindowFlags};
use crate::core::context::EngineContext;
use crate::core::error::EngineError;
use crate::core::scene::{Scene, SceneManager};
use crate::core::services::{
    AudioService, Clock, DisplayService, EventService, FontService, Platform, RenderService,
};
use crate::platform::WinitPlatform;

//=== EngineState =========================================================

/// Engine lifecycle states.
///
/// ```text
/// Uninitialized ──init ok──> Running ──quit / fatal──> Stopped
///       │                                                ^
///       └───────────init failure stays here──────────────┘ (terminal)
/// ```
///
/// `Stopped` is terminal: a stopped engine does not restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Before a successful `init`, or after a failed one.
    Uninitialized,

    /// Bring-up completed; the frame loop may run.
    Running,

    /// The loop exited (gracefully or abnormally). Terminal.
    Stopped,
}

//=== TickControl =========================================================

//
// Outcome of one frame-loop iteration. `Fatal` carries the terminate
// message to the loop boundary, replacing unwinding-based control flow.
//
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Quit,
    Fatal(String),
}

//=== Services ============================================================

//
// The owned platform service set. Declaration order is drop order, which
// encodes reverse-acquisition release: the renderer goes before the
// window it draws to, subsystem handles (event loop, audio, fonts) last.
//
pub(crate) struct Services {
    pub render: Box<dyn RenderService>,
    pub display: Box<dyn DisplayService>,
    pub fonts: Box<dyn FontService>,
    pub audio: Box<dyn AudioService>,
    pub events: Box<dyn EventService>,
    pub clock: Box<dyn Clock>,
}

//=== Engine ==============================================================

/// The engine: lifecycle state machine plus frame loop.
///
/// An `Engine` is a plain value — construct one per program (or several
/// in tests), no global state. Lifecycle: [`Engine::init`] brings up the
/// platform services in a fixed order, [`Engine::run`] blocks in the
/// frame loop until a quit or terminate signal, then tears everything
/// down and returns.
///
/// # Examples
///
/// ```no_run
/// use ember_engine::prelude::*;
///
/// struct Menu;
///
/// impl Scene for Menu {
///     fn update(&mut self, ctx: &mut EngineContext, _dt: f32) {
///         if ctx.input.is_key_pressed(KeyCode::Escape) {
///             ctx.control.quit();
///         }
///     }
/// }
///
/// let mut engine = Engine::new();
/// engine
///     .init("My Game", 0, 0, 1280, 720, WindowFlags::RESIZABLE_CENTERED)
///     .expect("engine bring-up failed");
/// engine.register_scene("menu", Menu);
/// engine.run("menu");
/// ```
pub struct Engine {
    state: EngineState,
    services: Option<Services>,
    scenes: SceneManager,
    context: EngineContext,
}

impl Engine {
    //--- Construction -----------------------------------------------------

    /// Creates an uninitialized engine.
    pub fn new() -> Self {
        Self {
            state: EngineState::Uninitialized,
            services: None,
            scenes: SceneManager::new(),
            context: EngineContext::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// `true` between a successful `init` and the loop exit.
    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    //--- Scene Access -----------------------------------------------------

    /// Registers a scene under a name. Shorthand for
    /// [`scenes_mut().register(...)`](SceneManager::register).
    pub fn register_scene<T>(&mut self, name: impl Into<String>, scene: T)
    where
        T: Scene + 'static,
    {
        self.scenes.register(name, scene);
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    //--- Initialization ---------------------------------------------------

    /// Brings up the engine against the native winit/wgpu platform.
    ///
    /// Performs, in strict order: multimedia subsystem (event loop), audio,
    /// fonts, window, renderer, event pump. Bring-up short-circuits at the
    /// first failure: the error is logged once, partial state is released,
    /// the engine stays `Uninitialized`, and the failure is returned.
    ///
    /// On success the engine transitions to `Running`.
    pub fn init(
        &mut self,
        title: &str,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        flags: WindowFlags,
    ) -> Result<(), EngineError> {
        let config = WindowConfig::new(title, x, y, width, height, flags);
        self.init_with(WinitPlatform::new(), &config)
    }

    /// Brings up the engine against any [`Platform`] implementation.
    ///
    /// This is the seam that lets tests (and exotic hosts) run the full
    /// frame loop without a window system: supply a platform whose services
    /// are fakes.
    pub fn init_with<P: Platform>(
        &mut self,
        mut platform: P,
        config: &WindowConfig,
    ) -> Result<(), EngineError> {
        if self.state != EngineState::Uninitialized {
            warn!("init() called on an engine that is already {:?}", self.state);
            return Err(EngineError::AlreadyInitialized);
        }

        match Self::bring_up(&mut platform, config) {
            Ok(services) => {
                self.services = Some(services);
                self.state = EngineState::Running;
                info!(
                    "engine initialized: {:?} {}x{}",
                    config.title, config.width, config.height
                );
                Ok(())
            }
            Err(e) => {
                // Partial bring-up state died with the platform's locals.
                error!("engine initialization failed: {}", e);
                Err(e)
            }
        }
    }

    fn bring_up<P: Platform>(
        platform: &mut P,
        config: &WindowConfig,
    ) -> Result<Services, EngineError> {
        platform.init_multimedia()?;
        let audio = platform.init_audio()?;
        let fonts = platform.init_fonts()?;
        let display = platform.create_display(config)?;
        let render = platform.create_renderer()?;
        let events = platform.create_events()?;
        let clock = platform.create_clock();

        Ok(Services {
            render,
            display,
            fonts,
            audio,
            events,
            clock,
        })
    }

    //--- Execution --------------------------------------------------------

    /// Runs the frame loop with the named scene active; blocks until exit.
    ///
    /// # Lifecycle
    ///
    /// 1. Activates the named scene (unregistered name: error, teardown,
    ///    return).
    /// 2. While `Running`: events → update(dt) → render → clock tick →
    ///    end-of-frame reset → pending scene switch → quit check.
    /// 3. On quit (graceful) or a terminate signal (logged once, exactly
    ///    here), tears down all services and returns.
    ///
    /// A terminate signal never propagates past this method.
    ///
    /// # Preconditions
    ///
    /// Must be called while `Running` (after a successful `init`).
    /// Violations log a warning and return immediately; services, if any,
    /// are released when the engine value drops.
    pub fn run(&mut self, scene: &str) {
        if self.state != EngineState::Running {
            warn!("run() called while {:?}; ignoring", self.state);
            return;
        }

        if !self.scenes.set_active(scene, &mut self.context) {
            error!("start scene {:?} is not registered", scene);
            self.state = EngineState::Stopped;
            self.destroy();
            return;
        }

        info!("entering frame loop with scene {:?}", scene);

        while self.state == EngineState::Running {
            match self.tick() {
                TickControl::Continue => {}
                TickControl::Quit => {
                    info!("quit requested, leaving frame loop");
                    self.state = EngineState::Stopped;
                }
                TickControl::Fatal(message) => {
                    error!("{}", message);
                    self.state = EngineState::Stopped;
                }
            }
        }

        self.destroy();
        info!("engine shut down");
    }

    //
    // One frame. Steering requests raised by scene code are observed at
    // step boundaries: a fatal signal aborts the frame at the next
    // boundary, a quit request lets the frame finish and stops the loop
    // afterwards.
    //
    fn tick(&mut self) -> TickControl {
        let Some(services) = self.services.as_mut() else {
            return TickControl::Fatal("engine services missing while running".into());
        };

        //--- 1. Events ----------------------------------------------------
        let frame = services.events.collect();
        if frame.close_requested {
            info!("window close requested");
            self.context.control.quit();
        }
        self.context.input.apply(&frame.events);

        //--- 2. Update ----------------------------------------------------
        let dt = services.clock.delta_time();
        self.scenes.update(&mut self.context, dt);
        if let Some(message) = self.context.control.take_fatal() {
            return TickControl::Fatal(message);
        }

        //--- 3. Render ----------------------------------------------------
        // Fixed order: clear → viewport → scene → deferred batch → color
        // reset → present.
        let renderer = services.render.as_mut();
        renderer.clear();
        renderer.update_viewport(services.display.size());
        self.scenes.render(&mut self.context, renderer);
        if let Some(message) = self.context.control.take_fatal() {
            return TickControl::Fatal(message);
        }
        for command in self.context.draw.drain() {
            renderer.submit(command);
        }
        renderer.reset_draw_color();
        renderer.present();

        //--- 4. Frame boundary --------------------------------------------
        services.clock.tick();
        services.events.end_frame();
        self.context.input.end_frame();

        if let Some(name) = self.context.control.take_pending_scene() {
            self.scenes.set_active(&name, &mut self.context);
        }

        if self.context.control.quit_requested() {
            return TickControl::Quit;
        }

        TickControl::Continue
    }

    //--- Shutdown ---------------------------------------------------------

    /// Marks the loop for graceful exit; the current frame still finishes.
    ///
    /// Idempotent; safe to call at any lifecycle stage. From inside scene
    /// code, use [`EngineControl::quit`](crate::core::EngineControl::quit)
    /// on the context instead.
    pub fn quit(&mut self) {
        self.context.control.quit();
        if self.state == EngineState::Running {
            self.state = EngineState::Stopped;
        }
    }

    /// Raises the abnormal-exit signal.
    ///
    /// From inside scene code, use
    /// [`EngineControl::terminate`](crate::core::EngineControl::terminate)
    /// on the context; the loop boundary logs the message and exits without
    /// crashing the process.
    pub fn terminate(&mut self, message: impl Into<String>) {
        self.context.control.terminate(message);
    }

    //
    // Releases all platform services, reverse-acquisition order (encoded
    // in the `Services` field order). The loop boundary calls this exactly
    // once per run; the option guard keeps a second call harmless.
    //
    fn destroy(&mut self) {
        if let Some(services) = self.services.take() {
            info!("releasing engine services");
            drop(services);
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WindowConfig;
    use crate::core::draw::{Color, DrawCommand, Rect};
    use crate::core::input::{InputEvent, KeyCode, Modifiers};
    use crate::core::services::FrameInput;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::sync::{Mutex, OnceLock};

    //=====================================================================
    // Log Capture
    //
    // The `log` facade allows one logger per process, so every test in
    // this binary shares the capture. Assertions count only error records
    // containing a test-unique substring, which keeps concurrently
    // running tests from interfering with each other.
    //=====================================================================

    struct CaptureLogger {
        records: Mutex<Vec<(log::Level, String)>>,
    }

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    fn capture() -> &'static CaptureLogger {
        static CAPTURE: OnceLock<&'static CaptureLogger> = OnceLock::new();
        CAPTURE.get_or_init(|| {
            let logger: &'static CaptureLogger = Box::leak(Box::new(CaptureLogger {
                records: Mutex::new(Vec::new()),
            }));
            log::set_logger(logger).expect("another logger is installed");
            log::set_max_level(log::LevelFilter::Trace);
            logger
        })
    }

    fn errors_containing(needle: &str) -> usize {
        capture()
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, message)| *level == log::Level::Error && message.contains(needle))
            .count()
    }

    //=====================================================================
    // Fake Services
    //=====================================================================

    #[derive(Default)]
    struct Recorder {
        /// Frame-loop operations, in call order.
        ops: RefCell<Vec<String>>,
        /// Bring-up steps, in call order (kept apart from frame ops so
        /// frame-sequence assertions stay exact).
        bring_up: RefCell<Vec<&'static str>>,
        drops: RefCell<Vec<&'static str>>,
    }

    impl Recorder {
        fn op(&self, op: impl Into<String>) {
            self.ops.borrow_mut().push(op.into());
        }

        fn up(&self, step: &'static str) {
            self.bring_up.borrow_mut().push(step);
        }

        fn ops(&self) -> Vec<String> {
            self.ops.borrow().clone()
        }

        fn bring_ups(&self) -> Vec<&'static str> {
            self.bring_up.borrow().clone()
        }

        fn drop_count(&self, service: &str) -> usize {
            self.drops.borrow().iter().filter(|s| **s == service).count()
        }
    }

    struct FakeRender {
        rec: Rc<Recorder>,
    }

    impl RenderService for FakeRender {
        fn clear(&mut self) {
            self.rec.op("clear");
        }

        fn update_viewport(&mut self, size: (u32, u32)) {
            self.rec.op(format!("viewport:{}x{}", size.0, size.1));
        }

        fn submit(&mut self, command: DrawCommand) {
            let color = match command {
                DrawCommand::Rect { color, .. } | DrawCommand::Line { color, .. } => color,
            };
            self.rec
                .op(format!("submit:{},{},{}", color.r, color.g, color.b));
        }

        fn set_draw_color(&mut self, _color: Color) {
            self.rec.op("set_color");
        }

        fn reset_draw_color(&mut self) {
            self.rec.op("reset");
        }

        fn present(&mut self) {
            self.rec.op("present");
        }
    }

    impl Drop for FakeRender {
        fn drop(&mut self) {
            self.rec.drops.borrow_mut().push("render");
        }
    }

    struct FakeDisplay {
        rec: Rc<Recorder>,
        size: (u32, u32),
    }

    impl DisplayService for FakeDisplay {
        fn size(&self) -> (u32, u32) {
            self.size
        }
    }

    impl Drop for FakeDisplay {
        fn drop(&mut self) {
            self.rec.drops.borrow_mut().push("display");
        }
    }

    #[derive(Default)]
    struct EventScript {
        /// Event batches delivered per frame, in order; empty afterwards.
        frames: Vec<Vec<InputEvent>>,
        /// Report a window close request on this 1-based frame.
        close_on: Option<u32>,
    }

    struct FakeEvents {
        rec: Rc<Recorder>,
        script: EventScript,
        frame: u32,
    }

    impl EventService for FakeEvents {
        fn collect(&mut self) -> FrameInput {
            self.frame += 1;
            self.rec.op("collect");

            let index = (self.frame - 1) as usize;
            FrameInput {
                events: self.script.frames.get(index).cloned().unwrap_or_default(),
                close_requested: self.script.close_on == Some(self.frame),
            }
        }

        fn end_frame(&mut self) {
            self.rec.op("end_frame");
        }
    }

    impl Drop for FakeEvents {
        fn drop(&mut self) {
            self.rec.drops.borrow_mut().push("events");
        }
    }

    struct FakeFonts {
        rec: Rc<Recorder>,
    }

    impl FontService for FakeFonts {
        fn load(&mut self, _name: &str, _bytes: &[u8]) -> Result<(), EngineError> {
            Ok(())
        }

        fn contains(&self, _name: &str) -> bool {
            false
        }
    }

    impl Drop for FakeFonts {
        fn drop(&mut self) {
            self.rec.drops.borrow_mut().push("fonts");
        }
    }

    struct FakeAudio {
        rec: Rc<Recorder>,
        volume: f32,
    }

    impl AudioService for FakeAudio {
        fn set_master_volume(&mut self, volume: f32) {
            self.volume = volume;
        }

        fn master_volume(&self) -> f32 {
            self.volume
        }
    }

    impl Drop for FakeAudio {
        fn drop(&mut self) {
            self.rec.drops.borrow_mut().push("audio");
        }
    }

    struct ManualClock {
        dt: f32,
    }

    impl Clock for ManualClock {
        fn delta_time(&self) -> f32 {
            self.dt
        }

        fn tick(&mut self) {}
    }

    //=====================================================================
    // Fake Platform
    //=====================================================================

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum FailAt {
        Multimedia,
        Audio,
        Fonts,
        Display,
        Renderer,
        Events,
    }

    struct FakePlatform {
        rec: Rc<Recorder>,
        fail_at: Option<FailAt>,
    }

    impl FakePlatform {
        fn new(rec: &Rc<Recorder>) -> Self {
            Self {
                rec: rec.clone(),
                fail_at: None,
            }
        }

        fn failing_at(rec: &Rc<Recorder>, step: FailAt) -> Self {
            Self {
                rec: rec.clone(),
                fail_at: Some(step),
            }
        }
    }

    impl Platform for FakePlatform {
        fn init_multimedia(&mut self) -> Result<(), EngineError> {
            self.rec.up("multimedia");
            if self.fail_at == Some(FailAt::Multimedia) {
                return Err(EngineError::MultimediaInit("fake failure".into()));
            }
            Ok(())
        }

        fn init_audio(&mut self) -> Result<Box<dyn AudioService>, EngineError> {
            self.rec.up("audio");
            if self.fail_at == Some(FailAt::Audio) {
                return Err(EngineError::AudioInit("fake failure".into()));
            }
            Ok(Box::new(FakeAudio {
                rec: self.rec.clone(),
                volume: 1.0,
            }))
        }

        fn init_fonts(&mut self) -> Result<Box<dyn FontService>, EngineError> {
            self.rec.up("fonts");
            if self.fail_at == Some(FailAt::Fonts) {
                return Err(EngineError::FontInit("fake failure".into()));
            }
            Ok(Box::new(FakeFonts {
                rec: self.rec.clone(),
            }))
        }

        fn create_display(
            &mut self,
            config: &WindowConfig,
        ) -> Result<Box<dyn DisplayService>, EngineError> {
            self.rec.up("display");
            if self.fail_at == Some(FailAt::Display) {
                return Err(EngineError::WindowCreation("fake failure".into()));
            }
            Ok(Box::new(FakeDisplay {
                rec: self.rec.clone(),
                size: (config.width, config.height),
            }))
        }

        fn create_renderer(&mut self) -> Result<Box<dyn RenderService>, EngineError> {
            self.rec.up("renderer");
            if self.fail_at == Some(FailAt::Renderer) {
                return Err(EngineError::RendererInit("fake failure".into()));
            }
            Ok(Box::new(FakeRender {
                rec: self.rec.clone(),
            }))
        }

        fn create_events(&mut self) -> Result<Box<dyn EventService>, EngineError> {
            self.rec.up("events");
            if self.fail_at == Some(FailAt::Events) {
                return Err(EngineError::MultimediaInit("fake failure".into()));
            }
            Ok(Box::new(FakeEvents {
                rec: self.rec.clone(),
                script: EventScript::default(),
                frame: 0,
            }))
        }

        fn create_clock(&mut self) -> Box<dyn Clock> {
            Box::new(ManualClock { dt: 0.25 })
        }
    }

    //=====================================================================
    // Scripted Scene
    //=====================================================================

    #[derive(Default, Clone)]
    struct SceneCounters {
        updates: Rc<Cell<u32>>,
        renders: Rc<Cell<u32>>,
        deltas: Rc<RefCell<Vec<f32>>>,
    }

    #[derive(Default)]
    struct ScriptedScene {
        counters: SceneCounters,
        /// Call `quit` on this 1-based update.
        quit_on: Option<u32>,
        /// Call `terminate(message)` on this 1-based update.
        terminate_on: Option<(u32, &'static str)>,
        /// Call `terminate(message)` on this 1-based render.
        terminate_render_on: Option<(u32, &'static str)>,
        /// Request this scene on the 1-based update.
        switch_on: Option<(u32, &'static str)>,
        /// Push a red rect into the deferred batch each update.
        draw_deferred: bool,
        /// Submit a blue rect directly each render.
        draw_scene: bool,
    }

    impl Scene for ScriptedScene {
        fn update(&mut self, ctx: &mut EngineContext, dt: f32) {
            let n = self.counters.updates.get() + 1;
            self.counters.updates.set(n);
            self.counters.deltas.borrow_mut().push(dt);

            if self.draw_deferred {
                ctx.draw.rect(Rect::new(0.0, 0.0, 8.0, 8.0), Color::RED);
            }
            if let Some((frame, name)) = self.switch_on {
                if n == frame {
                    ctx.control.switch_scene(name);
                }
            }
            if let Some((frame, message)) = self.terminate_on {
                if n == frame {
                    ctx.control.terminate(message);
                }
            }
            if self.quit_on == Some(n) {
                ctx.control.quit();
            }
        }

        fn render(&mut self, ctx: &mut EngineContext, renderer: &mut dyn RenderService) {
            let n = self.counters.renders.get() + 1;
            self.counters.renders.set(n);

            if self.draw_scene {
                renderer.submit(DrawCommand::Rect {
                    rect: Rect::new(0.0, 0.0, 4.0, 4.0),
                    color: Color::BLUE,
                });
            }
            if let Some((frame, message)) = self.terminate_render_on {
                if n == frame {
                    ctx.control.terminate(message);
                }
            }
        }
    }

    fn init_fake_engine(rec: &Rc<Recorder>) -> Engine {
        let mut engine = Engine::new();
        engine
            .init_with(FakePlatform::new(rec), &WindowConfig::default())
            .expect("fake bring-up cannot fail");
        engine
    }

    //=====================================================================
    // Lifecycle Tests
    //=====================================================================

    #[test]
    fn new_engine_is_uninitialized() {
        let engine = Engine::new();
        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert!(!engine.is_running());
    }

    #[test]
    fn successful_init_transitions_to_running() {
        let rec = Rc::new(Recorder::default());
        let engine = init_fake_engine(&rec);
        assert_eq!(engine.state(), EngineState::Running);
    }

    #[test]
    fn bring_up_follows_acquisition_order() {
        let rec = Rc::new(Recorder::default());
        let _engine = init_fake_engine(&rec);

        assert_eq!(
            rec.bring_ups(),
            vec!["multimedia", "audio", "fonts", "display", "renderer", "events"]
        );
    }

    #[test]
    fn init_failure_keeps_engine_uninitialized_and_logs_once() {
        capture();
        let rec = Rc::new(Recorder::default());
        let mut engine = Engine::new();

        let result = engine.init_with(
            FakePlatform::failing_at(&rec, FailAt::Audio),
            &WindowConfig::default(),
        );

        assert!(matches!(result, Err(EngineError::AudioInit(_))));
        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert_eq!(errors_containing("audio subsystem init failed"), 1);
    }

    #[test]
    fn init_failure_short_circuits_later_steps() {
        let rec = Rc::new(Recorder::default());
        let mut engine = Engine::new();

        let _ = engine.init_with(
            FakePlatform::failing_at(&rec, FailAt::Fonts),
            &WindowConfig::default(),
        );

        assert_eq!(rec.bring_ups(), vec!["multimedia", "audio", "fonts"]);
    }

    #[test]
    fn init_failure_releases_partial_state() {
        let rec = Rc::new(Recorder::default());
        let mut engine = Engine::new();

        let _ = engine.init_with(
            FakePlatform::failing_at(&rec, FailAt::Renderer),
            &WindowConfig::default(),
        );

        // Audio, fonts and display were created before the failing step
        // and must already be gone.
        assert_eq!(rec.drop_count("audio"), 1);
        assert_eq!(rec.drop_count("fonts"), 1);
        assert_eq!(rec.drop_count("display"), 1);
    }

    #[test]
    fn double_init_is_rejected() {
        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);

        let result = engine.init_with(FakePlatform::new(&rec), &WindowConfig::default());

        assert!(matches!(result, Err(EngineError::AlreadyInitialized)));
        assert_eq!(engine.state(), EngineState::Running);
    }

    #[test]
    fn run_before_init_is_ignored() {
        let mut engine = Engine::new();
        let counters = SceneCounters::default();
        engine.register_scene(
            "menu",
            ScriptedScene {
                counters: counters.clone(),
                ..Default::default()
            },
        );

        engine.run("menu");

        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert_eq!(counters.updates.get(), 0);
    }

    #[test]
    fn run_with_unregistered_scene_tears_down() {
        capture();
        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);

        engine.run("nowhere");

        assert_eq!(engine.state(), EngineState::Stopped);
        assert_eq!(rec.drop_count("render"), 1);
        assert_eq!(errors_containing("\"nowhere\" is not registered"), 1);
    }

    //=====================================================================
    // Quit Semantics
    //=====================================================================

    #[test]
    fn quit_during_frame_finishes_it_and_stops() {
        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);
        let counters = SceneCounters::default();
        engine.register_scene(
            "menu",
            ScriptedScene {
                counters: counters.clone(),
                quit_on: Some(1),
                ..Default::default()
            },
        );

        engine.run("menu");

        // The quitting frame still renders; no second frame begins.
        assert_eq!(counters.updates.get(), 1);
        assert_eq!(counters.renders.get(), 1);
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[test]
    fn five_updates_then_quit_yields_five_renders() {
        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);
        let counters = SceneCounters::default();
        engine.register_scene(
            "menu",
            ScriptedScene {
                counters: counters.clone(),
                quit_on: Some(5),
                ..Default::default()
            },
        );

        engine.run("menu");

        assert_eq!(counters.updates.get(), 5);
        assert_eq!(counters.renders.get(), 5);
        assert_eq!(rec.drop_count("render"), 1);
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[test]
    fn repeated_quit_requests_equal_one() {
        struct DoubleQuit {
            counters: SceneCounters,
        }

        impl Scene for DoubleQuit {
            fn update(&mut self, ctx: &mut EngineContext, _dt: f32) {
                self.counters.updates.set(self.counters.updates.get() + 1);
                ctx.control.quit();
                ctx.control.quit();
            }
        }

        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);
        let counters = SceneCounters::default();
        engine.register_scene(
            "menu",
            DoubleQuit {
                counters: counters.clone(),
            },
        );

        engine.run("menu");

        assert_eq!(counters.updates.get(), 1);
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[test]
    fn engine_quit_before_run_prevents_frames() {
        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);
        let counters = SceneCounters::default();
        engine.register_scene(
            "menu",
            ScriptedScene {
                counters: counters.clone(),
                ..Default::default()
            },
        );

        engine.quit();
        engine.quit();
        engine.run("menu");

        assert_eq!(counters.updates.get(), 0);
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[test]
    fn window_close_request_quits_after_full_frame() {
        let rec = Rc::new(Recorder::default());
        let mut engine = Engine::new();
        engine
            .init_with(
                ClosingPlatform {
                    inner: FakePlatform::new(&rec),
                    close_on: 3,
                },
                &WindowConfig::default(),
            )
            .expect("bring-up");

        let counters = SceneCounters::default();
        engine.register_scene(
            "menu",
            ScriptedScene {
                counters: counters.clone(),
                ..Default::default()
            },
        );

        engine.run("menu");

        // The close arrives at frame 3's event step; that frame still
        // updates and renders, then the loop stops.
        assert_eq!(counters.updates.get(), 3);
        assert_eq!(counters.renders.get(), 3);
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    struct ClosingPlatform {
        inner: FakePlatform,
        close_on: u32,
    }

    impl Platform for ClosingPlatform {
        fn init_multimedia(&mut self) -> Result<(), EngineError> {
            self.inner.init_multimedia()
        }

        fn init_audio(&mut self) -> Result<Box<dyn AudioService>, EngineError> {
            self.inner.init_audio()
        }

        fn init_fonts(&mut self) -> Result<Box<dyn FontService>, EngineError> {
            self.inner.init_fonts()
        }

        fn create_display(
            &mut self,
            config: &WindowConfig,
        ) -> Result<Box<dyn DisplayService>, EngineError> {
            self.inner.create_display(config)
        }

        fn create_renderer(&mut self) -> Result<Box<dyn RenderService>, EngineError> {
            self.inner.create_renderer()
        }

        fn create_events(&mut self) -> Result<Box<dyn EventService>, EngineError> {
            Ok(Box::new(FakeEvents {
                rec: self.inner.rec.clone(),
                script: EventScript {
                    frames: Vec::new(),
                    close_on: Some(self.close_on),
                },
                frame: 0,
            }))
        }

        fn create_clock(&mut self) -> Box<dyn Clock> {
            self.inner.create_clock()
        }
    }

    //=====================================================================
    // Terminate Semantics
    //=====================================================================

    #[test]
    fn terminate_in_update_skips_render_and_tears_down() {
        capture();
        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);
        let counters = SceneCounters::default();
        engine.register_scene(
            "menu",
            ScriptedScene {
                counters: counters.clone(),
                terminate_on: Some((3, "fatal scene state")),
                ..Default::default()
            },
        );

        engine.run("menu");

        assert_eq!(counters.updates.get(), 3);
        // The terminating frame never reaches render.
        assert_eq!(counters.renders.get(), 2);
        assert_eq!(rec.drop_count("render"), 1);
        assert_eq!(errors_containing("fatal scene state"), 1);
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[test]
    fn terminate_in_render_skips_present() {
        capture();
        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);
        let counters = SceneCounters::default();
        engine.register_scene(
            "menu",
            ScriptedScene {
                counters: counters.clone(),
                terminate_render_on: Some((1, "fatal during render")),
                ..Default::default()
            },
        );

        engine.run("menu");

        let ops = rec.ops();
        assert!(!ops.contains(&"present".to_string()));
        assert_eq!(errors_containing("fatal during render"), 1);
        assert_eq!(rec.drop_count("render"), 1);
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[test]
    fn first_terminate_message_wins() {
        capture();
        struct DoubleTerminate;

        impl Scene for DoubleTerminate {
            fn update(&mut self, ctx: &mut EngineContext, _dt: f32) {
                ctx.control.terminate("first signal wins");
                ctx.control.terminate("second signal ignored");
            }
        }

        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);
        engine.register_scene("menu", DoubleTerminate);

        engine.run("menu");

        assert_eq!(errors_containing("first signal wins"), 1);
        assert_eq!(errors_containing("second signal ignored"), 0);
    }

    //=====================================================================
    // Render Order
    //=====================================================================

    #[test]
    fn frame_follows_fixed_step_order() {
        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);
        let counters = SceneCounters::default();
        engine.register_scene(
            "menu",
            ScriptedScene {
                counters: counters.clone(),
                quit_on: Some(1),
                draw_deferred: true,
                draw_scene: true,
                ..Default::default()
            },
        );

        engine.run("menu");

        assert_eq!(
            rec.ops(),
            vec![
                "collect",
                "clear",
                "viewport:800x600",
                "submit:0,0,255", // scene render draws first...
                "submit:255,0,0", // ...then the deferred batch on top
                "reset",
                "present",
                "end_frame",
            ]
        );
    }

    #[test]
    fn render_order_repeats_every_frame() {
        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);
        let counters = SceneCounters::default();
        engine.register_scene(
            "menu",
            ScriptedScene {
                counters: counters.clone(),
                quit_on: Some(3),
                ..Default::default()
            },
        );

        engine.run("menu");

        let per_frame = [
            "collect",
            "clear",
            "viewport:800x600",
            "reset",
            "present",
            "end_frame",
        ];
        let expected: Vec<String> = per_frame
            .iter()
            .cycle()
            .take(per_frame.len() * 3)
            .map(|s| s.to_string())
            .collect();
        assert_eq!(rec.ops(), expected);
    }

    //=====================================================================
    // Teardown
    //=====================================================================

    #[test]
    fn destroy_releases_in_reverse_acquisition_order() {
        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);
        let counters = SceneCounters::default();
        engine.register_scene(
            "menu",
            ScriptedScene {
                counters,
                quit_on: Some(1),
                ..Default::default()
            },
        );

        engine.run("menu");

        assert_eq!(
            *rec.drops.borrow(),
            vec!["render", "display", "fonts", "audio", "events"]
        );
    }

    #[test]
    fn destroy_runs_once_even_on_fatal_exit() {
        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);
        let counters = SceneCounters::default();
        engine.register_scene(
            "menu",
            ScriptedScene {
                counters,
                terminate_on: Some((1, "boom once")),
                ..Default::default()
            },
        );

        engine.run("menu");

        assert_eq!(rec.drop_count("render"), 1);
        assert_eq!(rec.drop_count("events"), 1);
    }

    //=====================================================================
    // Frame Data Flow
    //=====================================================================

    #[test]
    fn delta_time_reaches_scene_unmodified() {
        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);
        let counters = SceneCounters::default();
        engine.register_scene(
            "menu",
            ScriptedScene {
                counters: counters.clone(),
                quit_on: Some(3),
                ..Default::default()
            },
        );

        engine.run("menu");

        // ManualClock reports a constant 0.25s delta.
        assert_eq!(*counters.deltas.borrow(), vec![0.25, 0.25, 0.25]);
    }

    #[test]
    fn input_deltas_reset_at_frame_boundary() {
        struct PressProbe {
            observed: Rc<RefCell<Vec<bool>>>,
            quit_on: u32,
            frame: u32,
        }

        impl Scene for PressProbe {
            fn update(&mut self, ctx: &mut EngineContext, _dt: f32) {
                self.frame += 1;
                self.observed
                    .borrow_mut()
                    .push(ctx.input.is_key_pressed(KeyCode::Space));
                if self.frame == self.quit_on {
                    ctx.control.quit();
                }
            }
        }

        struct TypingPlatform {
            inner: FakePlatform,
        }

        impl Platform for TypingPlatform {
            fn init_multimedia(&mut self) -> Result<(), EngineError> {
                self.inner.init_multimedia()
            }

            fn init_audio(&mut self) -> Result<Box<dyn AudioService>, EngineError> {
                self.inner.init_audio()
            }

            fn init_fonts(&mut self) -> Result<Box<dyn FontService>, EngineError> {
                self.inner.init_fonts()
            }

            fn create_display(
                &mut self,
                config: &WindowConfig,
            ) -> Result<Box<dyn DisplayService>, EngineError> {
                self.inner.create_display(config)
            }

            fn create_renderer(&mut self) -> Result<Box<dyn RenderService>, EngineError> {
                self.inner.create_renderer()
            }

            fn create_events(&mut self) -> Result<Box<dyn EventService>, EngineError> {
                Ok(Box::new(FakeEvents {
                    rec: self.inner.rec.clone(),
                    script: EventScript {
                        // Space goes down on frame 1, nothing afterwards.
                        frames: vec![vec![InputEvent::KeyDown {
                            key: KeyCode::Space,
                            modifiers: Modifiers::NONE,
                        }]],
                        close_on: None,
                    },
                    frame: 0,
                }))
            }

            fn create_clock(&mut self) -> Box<dyn Clock> {
                self.inner.create_clock()
            }
        }

        let rec = Rc::new(Recorder::default());
        let mut engine = Engine::new();
        engine
            .init_with(
                TypingPlatform {
                    inner: FakePlatform::new(&rec),
                },
                &WindowConfig::default(),
            )
            .expect("bring-up");

        let observed = Rc::new(RefCell::new(Vec::new()));
        engine.register_scene(
            "menu",
            PressProbe {
                observed: observed.clone(),
                quit_on: 2,
                frame: 0,
            },
        );

        engine.run("menu");

        // Pressed on the delivery frame only; the end-of-frame reset
        // clears the delta before frame 2.
        assert_eq!(*observed.borrow(), vec![true, false]);
    }

    #[test]
    fn scene_switch_applies_at_tick_boundary() {
        let rec = Rc::new(Recorder::default());
        let mut engine = init_fake_engine(&rec);

        let first = SceneCounters::default();
        let second = SceneCounters::default();
        engine.register_scene(
            "menu",
            ScriptedScene {
                counters: first.clone(),
                switch_on: Some((1, "game")),
                ..Default::default()
            },
        );
        engine.register_scene(
            "game",
            ScriptedScene {
                counters: second.clone(),
                quit_on: Some(1),
                ..Default::default()
            },
        );

        engine.run("menu");

        // Frame 1 belongs entirely to "menu" (including its render); the
        // switch lands before frame 2.
        assert_eq!(first.updates.get(), 1);
        assert_eq!(first.renders.get(), 1);
        assert_eq!(second.updates.get(), 1);
        assert_eq!(engine.scenes().active_name(), Some("game"));
    }
}
