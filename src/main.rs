//! Duck Hunt entry point
//!
//! In the browser this wires DOM input, the payment bridge and sound to the
//! simulation and drives it from `requestAnimationFrame`. Natively it runs a
//! headless autopilot game and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, KeyboardEvent, MouseEvent};

    use duck_hunt::audio::{AudioManager, SoundEffect};
    use duck_hunt::consts::{GAME_HEIGHT, GAME_WIDTH};
    use duck_hunt::payment::{PaymentConfig, PaymentError, PaymentKind, PaymentStatus};
    use duck_hunt::platform;
    use duck_hunt::season::{self, SeasonLedger};
    use duck_hunt::sim::autopilot::Autopilot;
    use duck_hunt::sim::rng::seeded;
    use duck_hunt::sim::{
        Action, FrameScheduler, GameEvent, GamePhase, GameState, LoopDriver, dispatch,
    };
    use duck_hunt::{LocalLedger, Settings, Tuning};

    // Bridge to the page's wallet integration
    #[wasm_bindgen(inline_js = "
        export function request_payment(kind, price) {
            if (typeof window.duckHuntPay === 'function') {
                return window.duckHuntPay(kind, price);
            }
            return Promise.reject(new Error('No wallet available'));
        }

        export function publish_state(json) {
            if (typeof window.duckHuntRender === 'function') {
                window.duckHuntRender(json);
            }
        }
    ")]
    extern "C" {
        #[wasm_bindgen(catch)]
        fn request_payment(kind: &str, price: &str) -> Result<js_sys::Promise, JsValue>;
        fn publish_state(json: &str);
    }

    /// LocalStorage key for a tuning override
    const TUNING_KEY: &str = "duck_hunt_tuning";

    /// `requestAnimationFrame` behind the loop driver's scheduler seam
    struct RafScheduler {
        game: Weak<RefCell<Game>>,
        next_token: u32,
        /// Token and browser id of the frame in flight
        pending: Option<(u32, i32)>,
    }

    impl FrameScheduler for RafScheduler {
        type Handle = u32;

        fn request_frame(&mut self) -> u32 {
            self.next_token = self.next_token.wrapping_add(1);
            let token = self.next_token;
            let game = self.game.clone();
            let closure = Closure::once(move |time: f64| {
                if let Some(game) = game.upgrade() {
                    game_loop(&game, token, time);
                }
            });
            if let Some(window) = web_sys::window() {
                match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                    Ok(id) => self.pending = Some((token, id)),
                    Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
                }
            }
            closure.forget();
            token
        }

        fn cancel_frame(&mut self, handle: u32) {
            if let Some((token, id)) = self.pending.take() {
                if token == handle {
                    if let Some(window) = web_sys::window() {
                        let _ = window.cancel_animation_frame(id);
                    }
                } else {
                    self.pending = Some((token, id));
                }
            }
        }
    }

    struct Game {
        state: GameState,
        driver: LoopDriver<RafScheduler>,
        rng: Pcg32,
        audio: AudioManager,
        settings: Settings,
        ledger: LocalLedger,
        prices: PaymentConfig,
        /// Idle/demo mode
        autopilot: Option<Autopilot>,
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64, game: Weak<RefCell<Game>>) -> Self {
            let settings = Settings::load();
            let tuning = load_tuning();
            Self {
                state: GameState::with_tuning(tuning),
                driver: LoopDriver::new(RafScheduler {
                    game,
                    next_token: 0,
                    pending: None,
                }),
                rng: seeded(seed),
                audio: AudioManager::new(&settings),
                settings,
                ledger: LocalLedger::load(),
                prices: PaymentConfig::default(),
                autopilot: None,
                last_phase: GamePhase::Menu,
            }
        }

        /// Dispatch an action now. Returns payments the page has to collect.
        fn apply(&mut self, action: Action) -> Vec<PaymentKind> {
            let now = platform::now_ms();
            dispatch(&mut self.state, action, now);
            self.settle(now)
        }

        /// Bring scheduling, sound and the page up to date with the state
        fn settle(&mut self, now: f64) -> Vec<PaymentKind> {
            self.driver.sync(&self.state);

            let mut requests = Vec::new();
            for event in self.state.drain_events() {
                if let GameEvent::PaymentRequested(kind) = event {
                    requests.push(kind);
                }
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }

            if self.state.phase != self.last_phase {
                log::debug!("Phase {:?} -> {:?}", self.last_phase, self.state.phase);
                if self.state.phase == GamePhase::Victory {
                    self.record_victory(now);
                }
                self.last_phase = self.state.phase;
            }

            self.update_hud();
            requests
        }

        fn record_victory(&mut self, now: f64) {
            let stats = &self.state.stats;
            log::info!(
                "{}! score {} accuracy {:.0}%",
                season::hunter_title(stats.accuracy()),
                stats.score,
                stats.accuracy()
            );
            let Some(wallet) = self.state.wallet.clone() else {
                log::info!("No wallet connected; golden ticket not recorded");
                return;
            };
            let completion_ms = (now - self.state.game_started_at).max(0.0) as u64;
            match self.ledger.record_completion(
                &wallet,
                stats.score,
                stats.total_ducks_shot,
                completion_ms,
                platform::epoch_ms() as u64,
            ) {
                Ok(ticket) => {
                    self.ledger.save();
                    set_text("ticket-id", &ticket.id);
                    set_text("ticket-entries", &ticket.raffle_entries().to_string());
                }
                Err(e) => log::warn!("Golden ticket not recorded: {}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = document() else { return };
            let stats = &self.state.stats;
            let level = self.state.current_level();

            set_text_in(&document, "hud-score", &stats.score.to_string());
            set_text_in(&document, "hud-level", &format!("{} - {}", level.id, level.title));
            set_text_in(&document, "hud-wave", &format!("{}/{}", stats.wave, level.waves));
            let now = platform::now_ms();
            let bullets = if stats.rapid_fire_active(now) {
                "∞".to_string()
            } else {
                stats.bullets.to_string()
            };
            set_text_in(&document, "hud-bullets", &bullets);
            set_text_in(&document, "hud-lives", &stats.lives.to_string());
            set_text_in(
                &document,
                "hud-time",
                &format!("{:.0}", self.state.time_remaining.ceil()),
            );
            set_text_in(
                &document,
                "hud-ducks",
                &format!(
                    "{}/{}",
                    stats.ducks_shot,
                    level.required_ducks(self.state.tuning.success_ratio)
                ),
            );

            let phase = self.state.phase;
            show_in(&document, "menu", phase == GamePhase::Menu);
            show_in(&document, "payment", phase == GamePhase::AwaitingPayment);
            show_in(&document, "pause-menu", phase == GamePhase::Paused);
            show_in(&document, "wave-end", phase == GamePhase::WaveEnd);
            show_in(&document, "game-over", phase == GamePhase::GameOver);
            show_in(&document, "victory", phase == GamePhase::Victory);
            show_in(&document, "next-level-btn", self.state.level_complete());
            show_in(&document, "idle-badge", self.autopilot.is_some());

            match &self.state.payment {
                PaymentStatus::Idle => set_text_in(&document, "payment-status", ""),
                PaymentStatus::Pending(kind) => set_text_in(
                    &document,
                    "payment-status",
                    &format!("{} ({} USDC)...", kind.title(), self.prices.price(*kind)),
                ),
                PaymentStatus::Failed { error, .. } => {
                    set_text_in(&document, "payment-status", &error.to_string())
                }
            }

            match phase {
                GamePhase::WaveEnd => {
                    let verdict = if self.state.wave_succeeded() {
                        "Wave cleared!"
                    } else {
                        "Not enough ducks - try again"
                    };
                    set_text_in(&document, "wave-result", verdict);
                }
                GamePhase::GameOver | GamePhase::Victory => {
                    set_text_in(&document, "final-score", &stats.score.to_string());
                    set_text_in(&document, "final-accuracy", &format!("{:.0}%", stats.accuracy()));
                    set_text_in(&document, "hunter-title", season::hunter_title(stats.accuracy()));
                }
                _ => {}
            }

            if let Ok(json) = serde_json::to_string(&self.state) {
                publish_state(&json);
            }
        }
    }

    fn load_tuning() -> Tuning {
        let Some(tuning) = platform::load_json::<Tuning>(TUNING_KEY) else {
            return Tuning::default();
        };
        match tuning.validate() {
            Ok(()) => {
                log::info!("Using tuning override");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning override: {}", e);
                Tuning::default()
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn set_text_in(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(document) = document() {
            set_text_in(&document, id, text);
        }
    }

    fn show_in(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Dispatch an action from an event handler
    fn act(game: &Rc<RefCell<Game>>, action: Action) {
        let requests = game.borrow_mut().apply(action);
        for kind in requests {
            collect_payment(game.clone(), kind);
        }
    }

    fn js_error_message(value: &JsValue) -> String {
        value
            .dyn_ref::<js_sys::Error>()
            .map(|e| String::from(e.message()))
            .or_else(|| value.as_string())
            .unwrap_or_else(|| "unknown payment error".to_string())
    }

    /// Run the page's payment flow and feed the result back as an action
    fn collect_payment(game: Rc<RefCell<Game>>, kind: PaymentKind) {
        let (dev_mode, price) = {
            let g = game.borrow();
            (g.settings.dev_mode, g.prices.price(kind).to_string())
        };
        if dev_mode {
            log::info!("Dev mode: auto-confirming {}", kind.as_str());
            act(&game, Action::PaymentConfirmed(kind));
            return;
        }

        wasm_bindgen_futures::spawn_local(async move {
            let result = match request_payment(kind.as_str(), &price) {
                Ok(promise) => JsFuture::from(promise).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(value) => {
                    // The bridge resolves with the paying wallet's address
                    if let Some(address) = value.as_string() {
                        act(&game, Action::SetWallet(Some(address)));
                    }
                    act(&game, Action::PaymentConfirmed(kind));
                }
                Err(e) => {
                    let error = PaymentError::from_host_message(&js_error_message(&e));
                    act(&game, Action::PaymentFailed(kind, error));
                }
            }
        });
    }

    fn game_loop(game: &Rc<RefCell<Game>>, token: u32, time: f64) {
        let mut g = game.borrow_mut();
        let g = &mut *g;

        if let Some(pilot) = g.autopilot.as_mut() {
            if let Some(action) = pilot.next_action(&g.state, time) {
                dispatch(&mut g.state, action, time);
            }
        }

        if g.driver.on_frame(token, &mut g.state, time, &mut g.rng).is_none() {
            return;
        }

        // Idle mode moves straight on to the next wave
        if g.state.phase == GamePhase::WaveEnd {
            if let Some(pilot) = g.autopilot.as_mut() {
                if let Some(action) = pilot.next_action(&g.state, time) {
                    dispatch(&mut g.state, action, time);
                }
            }
        }

        // Ticks never request payments
        let _ = g.settle(time);
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Duck Hunt starting...");

        let Some(document) = document() else {
            log::error!("No document to attach to");
            return;
        };
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new_cyclic(|weak| RefCell::new(Game::new(seed, weak.clone())));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(&document, game.clone());

        game.borrow_mut().settle(platform::now_ms());
        log::info!("Duck Hunt running!");
    }

    fn setup_input_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        // Shots on the play field
        if let Some(field) = document.get_element_by_id("game-area") {
            let game = game.clone();
            let field_clone = field.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = field_clone.get_bounding_client_rect();
                if rect.width() <= 0.0 || rect.height() <= 0.0 {
                    return;
                }
                let x = (event.client_x() as f64 - rect.left()) * GAME_WIDTH as f64 / rect.width();
                let y = (event.client_y() as f64 - rect.top()) * GAME_HEIGHT as f64 / rect.height();
                game.borrow().audio.resume();
                act(
                    &game,
                    Action::Shoot {
                        x: x as f32,
                        y: y as f32,
                    },
                );
            });
            let _ = field
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    "p" | "P" | "Escape" => {
                        let phase = game.borrow().state.phase;
                        match phase {
                            GamePhase::Playing => act(&game, Action::Pause),
                            GamePhase::Paused => act(&game, Action::Resume),
                            _ => {}
                        }
                    }
                    "i" | "I" => {
                        let mut g = game.borrow_mut();
                        g.autopilot = match g.autopilot {
                            Some(_) => None,
                            None => Some(Autopilot::default()),
                        };
                        log::info!("Idle mode: {}", g.autopilot.is_some());
                        g.update_hud();
                    }
                    "m" | "M" => toggle_mute(&game),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn toggle_mute(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        let g = &mut *g;
        let muted = g.settings.toggle_mute();
        g.settings.save();
        g.audio.apply_settings(&g.settings);
        set_text("mute-btn", if muted { "Unmute" } else { "Mute" });
    }

    /// Attach a click handler that maps the current state to an action
    fn on_click(
        document: &Document,
        id: &str,
        game: Rc<RefCell<Game>>,
        action: impl Fn(&GameState) -> Option<Action> + 'static,
    ) {
        let Some(btn) = document.get_element_by_id(id) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let next = action(&game.borrow().state);
            if let Some(next) = next {
                game.borrow().audio.play(SoundEffect::Click);
                act(&game, next);
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        on_click(document, "start-btn", game.clone(), |_| Some(Action::Start));
        on_click(document, "pause-btn", game.clone(), |_| Some(Action::Pause));
        on_click(document, "resume-btn", game.clone(), |_| Some(Action::Resume));
        on_click(document, "next-wave-btn", game.clone(), |_| Some(Action::NextWave));
        on_click(document, "next-level-btn", game.clone(), |_| Some(Action::NextLevel));
        on_click(document, "buy-life-btn", game.clone(), |_| {
            Some(Action::RequestPayment(PaymentKind::ExtraLife))
        });
        on_click(document, "continue-btn", game.clone(), |_| {
            Some(Action::RequestPayment(PaymentKind::Continue))
        });
        on_click(document, "retry-payment-btn", game.clone(), |state| {
            state.payment.kind().map(Action::RequestPayment)
        });
        on_click(document, "cancel-payment-btn", game.clone(), |_| {
            Some(Action::CancelPayment)
        });
        on_click(document, "menu-btn", game.clone(), |_| Some(Action::GoToMenu));
        on_click(document, "reset-btn", game.clone(), |_| Some(Action::ResetGame));

        if let Some(btn) = document.get_element_by_id("mute-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                toggle_mute(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden
                    && game.borrow().state.phase == GamePhase::Playing
                {
                    log::info!("Auto-paused (tab hidden)");
                    act(&game, Action::Pause);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let should_pause = {
                    let g = game.borrow();
                    g.settings.mute_on_blur && g.state.phase == GamePhase::Playing
                };
                if should_pause {
                    log::info!("Auto-paused (window blur)");
                    act(&game, Action::Pause);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use duck_hunt::season::{self, SeasonLedger};
    use duck_hunt::sim::autopilot::Autopilot;
    use duck_hunt::sim::rng::seeded;
    use duck_hunt::sim::{Action, GamePhase, GameState, LoopDriver, ManualScheduler, dispatch};
    use duck_hunt::{LocalLedger, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Duck Hunt (native) starting headless autopilot run...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(2024u64);
    let tuning = match args.next() {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
            match loaded {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("Bad tuning file {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => Tuning::default(),
    };

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60 * 30;

    let mut state = GameState::with_tuning(tuning);
    let mut rng = seeded(seed);
    let mut pilot = Autopilot::default();
    let mut driver = LoopDriver::new(ManualScheduler::new());
    let mut ledger = LocalLedger::new();

    dispatch(&mut state, Action::SetPaid(true), 0.0);
    dispatch(&mut state, Action::SetWallet(Some("0xdemo".to_string())), 0.0);
    dispatch(&mut state, Action::Start, 0.0);
    driver.sync(&state);

    let mut events = 0usize;
    let mut now = 0.0;
    for _ in 0..MAX_FRAMES {
        if matches!(state.phase, GamePhase::GameOver | GamePhase::Victory) {
            break;
        }
        if let Some(action) = pilot.next_action(&state, now) {
            dispatch(&mut state, action, now);
            driver.sync(&state);
        }
        driver.run_frame(&mut state, now, &mut rng);
        events += state.drain_events().len();
        now += FRAME_MS;
    }

    let stats = &state.stats;
    log::info!(
        "Finished in {:?} after {:.0}s: level {} wave {}, score {}, accuracy {:.0}%, {} events",
        state.phase,
        now / 1000.0,
        stats.level,
        stats.wave,
        stats.score,
        stats.accuracy(),
        events
    );

    match state.phase {
        GamePhase::Victory => {
            log::info!("{}", season::hunter_title(stats.accuracy()));
            match ledger.record_completion(
                "0xdemo",
                stats.score,
                stats.total_ducks_shot,
                (now - state.game_started_at) as u64,
                duck_hunt::platform::epoch_ms() as u64,
            ) {
                Ok(ticket) => log::info!(
                    "Golden ticket {} worth {} raffle entries",
                    ticket.id,
                    ticket.raffle_entries()
                ),
                Err(e) => log::warn!("Golden ticket not recorded: {}", e),
            }
        }
        GamePhase::GameOver => {
            log::info!("Game over: {:?}", stats.game_over_reason);
        }
        _ => log::info!("Demo stopped before the game ended"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
