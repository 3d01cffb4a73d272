//! Browser binding
//!
//! The page owns rendering and input; it drives the game by calling `tick`
//! once per animation frame and applies the returned JSON report.

use wasm_bindgen::prelude::*;

use crate::session::Session;
use crate::settings::Settings;
use crate::sim::{Attempt, GameEvent, LaneShift, Outcome, TickInput, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

fn frame_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Game instance exposed to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    attempt: Attempt,
    input: TickInput,
    last_outcome: Option<Outcome>,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a session; an empty string means default settings
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<WebGame, JsError> {
        let settings = Settings::from_json_or_default(settings_json)?;
        let mut session = Session::new(settings)?;
        let seed = js_sys::Date::now() as u64;
        let attempt = session.start_attempt(seed)?;
        log::info!("Started session with seed: {}", seed);
        Ok(Self {
            session,
            attempt,
            input: TickInput::default(),
            last_outcome: None,
        })
    }

    /// Advance one frame; returns the tick report as JSON
    pub fn tick(&mut self, now_ms: f64) -> Result<String, JsError> {
        let report = tick(&mut self.attempt, &self.input, now_ms);
        self.input.steer = None;

        for event in &report.events {
            if let GameEvent::Resolved { outcome, .. } = event {
                self.session.record(outcome);
                self.last_outcome = Some(*outcome);
            }
        }
        Ok(serde_json::to_string(&report)?)
    }

    /// Advance one frame using the page's performance clock
    pub fn tick_now(&mut self) -> Result<String, JsError> {
        self.tick(frame_now())
    }

    pub fn steer_left(&mut self) {
        self.input.steer = Some(LaneShift::Left);
    }

    pub fn steer_right(&mut self) {
        self.input.steer = Some(LaneShift::Right);
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// Fresh attempt at the session's current level
    ///
    /// After a success that is the next level; after a failure it is a retry.
    pub fn next_attempt(&mut self) -> Result<(), JsError> {
        let seed = js_sys::Date::now() as u64;
        self.attempt = self.session.start_attempt(seed)?;
        self.input = TickInput {
            autopilot: self.input.autopilot,
            ..Default::default()
        };
        self.last_outcome = None;
        Ok(())
    }

    /// Apply new settings and start over from their starting level; an empty
    /// string means default settings
    pub fn restart(&mut self, settings_json: &str) -> Result<(), JsError> {
        let settings = Settings::from_json_or_default(settings_json)?;
        self.session.apply_settings(settings)?;
        self.next_attempt()
    }

    pub fn level(&self) -> u32 {
        self.session.level()
    }

    pub fn is_resolved(&self) -> bool {
        self.attempt.is_resolved()
    }

    /// End-screen data for the last finished attempt, or an empty string
    pub fn outcome_json(&self) -> Result<String, JsError> {
        let Some(outcome) = &self.last_outcome else {
            return Ok(String::new());
        };
        let value = serde_json::json!({
            "outcome": outcome,
            "headline": outcome.headline(self.attempt.runner.held),
        });
        Ok(value.to_string())
    }
}
