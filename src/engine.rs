//=========================================================================
// KPIA Runtime
//
// Main entry point that wires the orchestration core together.
//
// Architecture:
// ```text
//     KpiaBuilder  ──build()──>  Kpia  ──start()──>  [Running]
//         │                       │
//         ├─ with_config()        ├─ handle_key()   key → Command → Store
//         ├─ with_clock()         ├─ frame()        auth → timers → autosave → render
//         ├─ with_bindings()      └─ stop()         flush → detach
//         └─ with_renderer()
// ```
//
// The host owns the window, the render loop and the threads. It calls
// `frame()` once per display frame and forwards key presses in between;
// everything here runs on the caller's thread.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use winit::event::WindowEvent;

//=== Internal Dependencies ===============================================

use crate::core::config::KpiaConfig;
use crate::core::input::{KeyInput, Routed, ShortcutBindings, ShortcutRouter};
use crate::core::persistence::{
    auth_channel, AuthEventSender, AuthListener, AuthProvider, AutoSaver, ProfileStore,
    SessionService,
};
use crate::core::scene::{
    CameraController, CameraRig, FrameOutcome, Scene, SceneDirector, SceneRegistry, SceneRenderer,
};
use crate::core::state::{GalaxyCatalog, SaveOutcome, Store, StoreEvent};
use crate::core::timing::{Clock, SystemClock};
use crate::platform::KeyboardTranslator;

//=== KpiaBuilder =========================================================

/// Builder for configuring and constructing a [`Kpia`] runtime.
///
/// # Default Values
///
/// - **Config**: [`KpiaConfig::default()`] (2 s transitions, swap at 80%,
///   3 s auto-save debounce)
/// - **Clock**: wall clock
/// - **Catalog**: built-in galaxies
/// - **Profile store**: none (saves are skipped)
/// - **Bindings**: [`ShortcutBindings::defaults()`]
/// - **Intro**: startup sequence plays on `start()`
///
/// # Examples
///
/// ```no_run
/// use kpia_core::core::persistence::AnonymousAuth;
/// use kpia_core::KpiaBuilder;
///
/// let mut kpia = KpiaBuilder::new().build();
/// kpia.start(&AnonymousAuth);
/// loop {
///     let report = kpia.frame();
///     for event in report.events {
///         println!("{:?}", event);
///     }
/// }
/// ```
pub struct KpiaBuilder {
    config: KpiaConfig,
    clock: Arc<dyn Clock>,
    catalog: GalaxyCatalog,
    profiles: Option<Arc<dyn ProfileStore>>,
    bindings: ShortcutBindings,
    registry: SceneRegistry,
    auth_listener: Option<AuthListener>,
    play_intro: bool,
}

impl KpiaBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: KpiaConfig::default(),
            clock: Arc::new(SystemClock::new()),
            catalog: GalaxyCatalog::builtin(),
            profiles: None,
            bindings: ShortcutBindings::defaults(),
            registry: SceneRegistry::new(),
            auth_listener: None,
            play_intro: true,
        }
    }

    //--- Configuration ----------------------------------------------------

    /// Replaces the whole configuration.
    ///
    /// # Panics
    ///
    /// Panics if the config fails [`KpiaConfig::validate`]. Configs read
    /// with [`KpiaConfig::from_file`] are already validated.
    pub fn with_config(mut self, config: KpiaConfig) -> Self {
        if let Err(e) = config.validate() {
            panic!("Invalid config: {}", e);
        }
        self.config = config;
        self
    }

    /// Sets the length of a scene transition.
    ///
    /// Default: 2000 ms
    ///
    /// # Panics
    ///
    /// Panics if `duration` is shorter than one millisecond, the timer
    /// resolution.
    pub fn with_transition_duration(mut self, duration: Duration) -> Self {
        let millis = duration.as_millis() as u64;
        assert!(millis > 0, "Transition duration must be positive, got {:?}", duration);
        self.config.transition_duration_ms = millis;
        self
    }

    /// Sets the fraction of a transition at which the scene swaps.
    ///
    /// Default: 0.8
    ///
    /// # Panics
    ///
    /// Panics if `ratio` is outside `[0, 1]`.
    pub fn with_midpoint_ratio(mut self, ratio: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&ratio),
            "Midpoint ratio must be within [0, 1], got {}",
            ratio
        );
        self.config.transition_midpoint_ratio = ratio;
        self
    }

    /// Sets the quiet period before a progress change is saved.
    ///
    /// Default: 3000 ms
    pub fn with_autosave_debounce(mut self, debounce: Duration) -> Self {
        self.config.autosave_debounce_ms = debounce.as_millis() as u64;
        self
    }

    //--- Collaborators ----------------------------------------------------

    /// Drives every timer from `clock` instead of the wall clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_catalog(mut self, catalog: GalaxyCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_profile_store(mut self, profiles: Arc<dyn ProfileStore>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn with_bindings(mut self, bindings: ShortcutBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Subscribes to an existing auth channel.
    ///
    /// Without one, the runtime creates its own and exposes the sender
    /// through [`Kpia::auth_sender`].
    pub fn with_auth_listener(mut self, listener: AuthListener) -> Self {
        self.auth_listener = Some(listener);
        self
    }

    /// Registers a scene renderer with the built-in camera resolver.
    pub fn with_renderer<R>(mut self, scene: Scene, renderer: R) -> Self
    where
        R: SceneRenderer + 'static,
    {
        self.registry.register_renderer(scene, renderer);
        self
    }

    pub fn with_registry(mut self, registry: SceneRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Whether `start()` plays the startup sequence. Default: true
    pub fn with_intro(mut self, play_intro: bool) -> Self {
        self.play_intro = play_intro;
        self
    }

    //--- Build ------------------------------------------------------------

    /// Builds the runtime around a [`CameraRig`].
    pub fn build(self) -> Kpia<CameraRig> {
        self.build_with_camera(CameraRig::default())
    }

    /// Builds the runtime around the host's own camera controller.
    pub fn build_with_camera<C: CameraController>(self, camera: C) -> Kpia<C> {
        info!(
            "Building KPIA runtime (transition: {} ms, autosave: {} ms, policy: {:?})",
            self.config.transition_duration_ms,
            self.config.autosave_debounce_ms,
            self.config.transition_policy
        );

        let (auth_sender, listener) = match self.auth_listener {
            Some(listener) => (None, listener),
            None => {
                let (sender, listener) = auth_channel();
                (Some(sender), listener)
            }
        };

        let autosaver = AutoSaver::new(self.config.autosave_debounce());

        let mut store = Store::builder()
            .with_config(self.config)
            .with_shared_clock(self.clock)
            .with_catalog(self.catalog);
        if let Some(profiles) = self.profiles {
            store = store.with_profile_store(profiles);
        }

        Kpia {
            store: store.build(),
            director: SceneDirector::new(self.registry, camera),
            router: ShortcutRouter::new(self.bindings),
            keyboard: KeyboardTranslator::new(),
            autosaver,
            session: SessionService::new(listener),
            auth_sender,
            play_intro: self.play_intro,
            running: false,
        }
    }
}

impl Default for KpiaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Reports =============================================================

/// Everything that happened during one [`Kpia::frame`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub outcome: FrameOutcome,

    /// Store events in the order they were published.
    pub events: Vec<StoreEvent>,

    /// Auth events applied from the session channel.
    pub auth_events: usize,

    /// Transition phases and sequence cues that fired.
    pub timers_fired: usize,

    /// Set if the auto-saver attempted a save this frame.
    pub save: Option<SaveOutcome>,
}

/// Result of [`Kpia::stop`].
#[derive(Debug, Clone, PartialEq)]
pub struct StopReport {
    /// Events published since the last frame.
    pub events: Vec<StoreEvent>,

    /// Set if a pending save was flushed.
    pub save: Option<SaveOutcome>,
}

//=== Kpia ================================================================

/// KPIA orchestration runtime.
///
/// # Architecture
///
/// ```text
/// Kpia (host thread)
///   ├─► Store            state, transitions, sequences, persistence actions
///   ├─► ShortcutRouter   key → Command
///   ├─► SceneDirector    per-scene renderer + shared camera
///   ├─► SessionService   auth channel → Store
///   └─► AutoSaver        ProgressChanged → debounced save
/// ```
pub struct Kpia<C: CameraController = CameraRig> {
    store: Store,
    director: SceneDirector<C>,
    router: ShortcutRouter,
    keyboard: KeyboardTranslator,
    autosaver: AutoSaver,
    session: SessionService,
    auth_sender: Option<AuthEventSender>,
    play_intro: bool,
    running: bool,
}

impl<C: CameraController> Kpia<C> {
    //--- Lifecycle --------------------------------------------------------

    /// Restores any existing session, starts auto-save and plays the intro.
    ///
    /// Calling `start` on a running runtime does nothing.
    pub fn start(&mut self, auth: &dyn AuthProvider) {
        if self.running {
            warn!("KPIA runtime already started");
            return;
        }
        info!("Starting KPIA runtime");

        self.session.start(auth, &mut self.store);
        self.autosaver.start();

        if self.play_intro && self.store.state().scene == Scene::Start {
            self.store.set_startup_active(true);
        }
        self.running = true;
    }

    /// Flushes a pending save and detaches from auth and auto-save.
    pub fn stop(&mut self) -> StopReport {
        if !self.running {
            debug!("KPIA runtime stop requested while stopped");
        }

        let mut events = self.store.drain_events();
        self.autosaver.observe(&events, self.store.now());
        let save = self.autosaver.flush(&mut self.store);
        events.extend(self.store.drain_events());

        self.autosaver.stop();
        self.session.stop();
        self.running = false;
        info!("KPIA runtime stopped");

        StopReport { events, save }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    //--- Input ------------------------------------------------------------

    /// Routes one key press and dispatches the resulting command.
    ///
    /// The host should suppress the key's default handling when the
    /// result [`prevents_default`](Routed::prevents_default), and release
    /// text-field focus on [`Routed::Blur`].
    pub fn handle_key(&mut self, input: &KeyInput) -> Routed {
        let routed = self.router.route(input, self.store.state(), self.store.catalog());
        if let Routed::Command(command) = &routed {
            self.store.dispatch(command.clone());
        }
        routed
    }

    /// Feeds a raw window event through the keyboard translator.
    ///
    /// Returns `None` for events that are not key presses.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Option<Routed> {
        let input = self.keyboard.translate_window_event(event)?;
        Some(self.handle_key(&input))
    }

    /// Reported by the host when a text input gains or loses focus.
    pub fn set_text_input_focused(&mut self, focused: bool) {
        self.keyboard.set_text_input_focused(focused);
    }

    //--- frame() ----------------------------------------------------------
    //
    // One display frame:
    //   1. apply queued auth events
    //   2. fire due transition phases and sequence cues
    //   3. hand the frame's events to the auto-saver, save if due
    //   4. render the current scene
    //
    pub fn frame(&mut self) -> FrameReport {
        let auth_events = self.session.pump(&mut self.store);
        let timers_fired = self.store.update();

        let mut events = self.store.drain_events();
        self.autosaver.observe(&events, self.store.now());
        let save = self.autosaver.poll(&mut self.store);
        if save.is_some() {
            events.extend(self.store.drain_events());
        }

        let outcome = self.director.frame(self.store.state());

        FrameReport {
            outcome,
            events,
            auth_events,
            timers_fired,
            save,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn director(&self) -> &SceneDirector<C> {
        &self.director
    }

    pub fn director_mut(&mut self) -> &mut SceneDirector<C> {
        &mut self.director
    }

    pub fn router(&self) -> &ShortcutRouter {
        &self.router
    }

    /// Key bindings, re-bindable while running.
    pub fn bindings_mut(&mut self) -> &mut ShortcutBindings {
        self.router.bindings_mut()
    }

    pub fn autosaver(&self) -> &AutoSaver {
        &self.autosaver
    }

    /// Sender for the runtime's own auth channel, if it created one.
    pub fn auth_sender(&self) -> Option<AuthEventSender> {
        self.auth_sender.clone()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
