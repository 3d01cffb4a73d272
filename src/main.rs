//! Cat Stack Dash entry point
//!
//! Native builds run a headless autopilot session and log each attempt.
//! The browser build is driven through `web::WebGame`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use cat_stack_dash::host::{AudioSink, DisplaySink, Presenter, Visual, WorldSink};
    use cat_stack_dash::sim::{HudFrame, Outcome, OutcomeTier, TickInput, tick};
    use cat_stack_dash::{Session, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const ATTEMPTS: u32 = 5;
    /// Give up on an attempt after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    /// Counts visuals instead of drawing them
    #[derive(Default)]
    struct CountingWorld {
        next: u64,
        spawned: u64,
        despawned: u64,
    }

    impl WorldSink for CountingWorld {
        type Handle = u64;

        fn spawn_visual(&mut self, _visual: &Visual) -> u64 {
            self.next += 1;
            self.spawned += 1;
            self.next
        }

        fn despawn_visual(&mut self, _handle: u64) {
            self.despawned += 1;
        }
    }

    struct LogAudio;

    impl AudioSink for LogAudio {
        fn on_crossing_complete(&mut self) {
            log::debug!("sfx: crossing complete");
        }

        fn on_outcome(&mut self, tier: OutcomeTier) {
            log::debug!("sfx: {:?} jingle", tier);
        }
    }

    #[derive(Default)]
    struct LogDisplay {
        last: Option<HudFrame>,
    }

    impl DisplaySink for LogDisplay {
        fn hud(&mut self, frame: &HudFrame) {
            if self.last.as_ref().map(|f| f.phase) != Some(frame.phase) {
                log::debug!("HUD: {:?}", frame);
            }
            self.last = Some(*frame);
        }

        fn outcome(&mut self, outcome: &Outcome, headline: &str) {
            log::info!(
                "{} | score {} (distance {}, collected {}, crossing {}) shortfall {}",
                headline,
                outcome.score,
                outcome.breakdown.distance_points,
                outcome.breakdown.collected_points,
                outcome.breakdown.crossing_points,
                outcome.shortfall
            );
        }
    }

    fn load_settings() -> Result<Settings, Box<dyn std::error::Error>> {
        match std::env::args().nth(1) {
            Some(path) => {
                let json = std::fs::read_to_string(&path)?;
                Ok(Settings::from_json(&json)?)
            }
            None => Ok(Settings::default()),
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let settings = load_settings()?;
        let mut session = Session::new(settings)?;
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        for seed in 0..u64::from(ATTEMPTS) {
            let mut attempt = session.start_attempt(seed)?;
            let mut presenter = Presenter::new(CountingWorld::default());
            let mut display = LogDisplay::default();

            let mut now = 0.0;
            for _ in 0..MAX_FRAMES {
                let report = tick(&mut attempt, &input, now);
                presenter.present(&report, &mut LogAudio, &mut display);
                if attempt.is_resolved() {
                    break;
                }
                now += FRAME_MS;
            }

            let Some(outcome) = attempt.outcome().copied() else {
                log::warn!("Attempt {} did not resolve", session.attempts());
                continue;
            };
            let world = presenter.world();
            log::info!(
                "Attempt {} took {} ticks, {} visuals spawned, {} despawned",
                session.attempts(),
                attempt.time_ticks,
                world.spawned,
                world.despawned
            );
            session.record(&outcome);
        }

        log::info!(
            "Session finished at level {} after {} attempts",
            session.level(),
            session.attempts()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Cat Stack Dash (native) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry point is web::start
}
