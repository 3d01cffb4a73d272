//! Collaborator interfaces
//!
//! The simulation only produces events. Rendering, audio and the HUD live
//! behind these traits; `Presenter` routes each tick's events to them and
//! owns the mapping from logical ids to visual handles.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{COLLECTIBLE_HOVER_HEIGHT, HAZARD_HOVER_HEIGHT, PATH_HEIGHT};
use crate::sim::{EntityKind, GameEvent, HudFrame, Lane, Outcome, OutcomeTier, TickReport};
use crate::world_position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualKind {
    Collectible,
    Hazard,
    PathSegment,
}

/// What the world sink is asked to show
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    pub kind: VisualKind,
    pub position: Vec3,
}

/// Scene graph owner
pub trait WorldSink {
    type Handle;

    fn spawn_visual(&mut self, visual: &Visual) -> Self::Handle;
    fn despawn_visual(&mut self, handle: Self::Handle);
}

/// Fire-and-forget sound cues
pub trait AudioSink {
    fn on_collect(&mut self) {}
    fn on_hazard_hit(&mut self) {}
    fn on_crossing_complete(&mut self) {}
    fn on_outcome(&mut self, _tier: OutcomeTier) {}
}

/// HUD and end screen
pub trait DisplaySink {
    fn hud(&mut self, frame: &HudFrame);
    fn outcome(&mut self, outcome: &Outcome, headline: &str);
}

/// Routes tick reports to the collaborators
pub struct Presenter<W: WorldSink> {
    world: W,
    entities: HashMap<u32, W::Handle>,
    segments: Vec<W::Handle>,
}

impl<W: WorldSink> Presenter<W> {
    pub fn new(world: W) -> Self {
        Self {
            world,
            entities: HashMap::new(),
            segments: Vec::new(),
        }
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    /// Visuals currently alive for entities and path segments
    pub fn live_visuals(&self) -> usize {
        self.entities.len() + self.segments.len()
    }

    pub fn present<A: AudioSink, D: DisplaySink>(
        &mut self,
        report: &TickReport,
        audio: &mut A,
        display: &mut D,
    ) {
        for event in &report.events {
            match event {
                GameEvent::EntitySpawned {
                    id,
                    kind,
                    lane,
                    position,
                } => {
                    let visual = match kind {
                        EntityKind::Collectible => Visual {
                            kind: VisualKind::Collectible,
                            position: world_position(*lane, *position, COLLECTIBLE_HOVER_HEIGHT),
                        },
                        EntityKind::Hazard => Visual {
                            kind: VisualKind::Hazard,
                            position: world_position(*lane, *position, HAZARD_HOVER_HEIGHT),
                        },
                    };
                    let handle = self.world.spawn_visual(&visual);
                    self.entities.insert(*id, handle);
                }
                GameEvent::EntityDespawned { id } => {
                    if let Some(handle) = self.entities.remove(id) {
                        self.world.despawn_visual(handle);
                    }
                }
                GameEvent::SegmentBuilt { position, .. } => {
                    let visual = Visual {
                        kind: VisualKind::PathSegment,
                        position: world_position(Lane::Center, *position, PATH_HEIGHT),
                    };
                    let handle = self.world.spawn_visual(&visual);
                    self.segments.push(handle);
                }
                GameEvent::Collected { .. } => audio.on_collect(),
                GameEvent::HazardHit { .. } => audio.on_hazard_hit(),
                GameEvent::CrossingComplete { .. } => audio.on_crossing_complete(),
                GameEvent::Resolved { outcome, unspent } => {
                    audio.on_outcome(outcome.tier);
                    display.outcome(outcome, outcome.headline(*unspent));
                }
                GameEvent::StunEnded
                | GameEvent::LaneChanged { .. }
                | GameEvent::PhaseChanged { .. } => {}
            }
        }
        display.hud(&report.hud);
    }

    /// Release every visual, e.g. before a restart
    pub fn clear(&mut self) {
        for (_, handle) in self.entities.drain() {
            self.world.despawn_visual(handle);
        }
        for handle in self.segments.drain(..) {
            self.world.despawn_visual(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{Attempt, LevelTarget, PatternTable, TickInput, tick};

    #[derive(Default)]
    struct Scene {
        next: u32,
        live: Vec<(u32, Visual)>,
    }

    impl WorldSink for Scene {
        type Handle = u32;

        fn spawn_visual(&mut self, visual: &Visual) -> u32 {
            self.next += 1;
            self.live.push((self.next, *visual));
            self.next
        }

        fn despawn_visual(&mut self, handle: u32) {
            self.live.retain(|(h, _)| *h != handle);
        }
    }

    #[derive(Default)]
    struct Sounds(Vec<&'static str>);

    impl AudioSink for Sounds {
        fn on_collect(&mut self) {
            self.0.push("collect");
        }
        fn on_hazard_hit(&mut self) {
            self.0.push("hit");
        }
        fn on_crossing_complete(&mut self) {
            self.0.push("crossed");
        }
        fn on_outcome(&mut self, tier: OutcomeTier) {
            self.0.push(match tier {
                OutcomeTier::Success => "win",
                OutcomeTier::Failure => "lose",
            });
        }
    }

    #[derive(Default)]
    struct Screen {
        frames: u32,
        title: Option<String>,
    }

    impl DisplaySink for Screen {
        fn hud(&mut self, _frame: &HudFrame) {
            self.frames += 1;
        }
        fn outcome(&mut self, _outcome: &Outcome, headline: &str) {
            self.title = Some(headline.to_string());
        }
    }

    #[test]
    fn test_full_attempt_is_presented() {
        let table = PatternTable::default();
        let mut attempt =
            Attempt::new(LevelTarget::for_level(1), Settings::default(), &table, 21).unwrap();
        let entity_count = attempt.entities.len();

        let mut presenter = Presenter::new(Scene::default());
        let mut sounds = Sounds::default();
        let mut screen = Screen::default();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        let report = tick(&mut attempt, &input, 0.0);
        presenter.present(&report, &mut sounds, &mut screen);
        assert_eq!(presenter.world().live.len(), entity_count);
        assert!(
            presenter
                .world()
                .live
                .iter()
                .all(|(_, v)| v.position.z <= 0.0)
        );

        let mut now = 0.0;
        while !attempt.is_resolved() {
            now += 1000.0 / 60.0;
            let report = tick(&mut attempt, &input, now);
            presenter.present(&report, &mut sounds, &mut screen);
            assert!(now < 600_000.0);
        }

        let segments = attempt.crossing.path().len() as usize;
        let segment_visuals = presenter
            .world()
            .live
            .iter()
            .filter(|(_, v)| v.kind == VisualKind::PathSegment)
            .count();
        assert_eq!(segment_visuals, segments);
        assert_eq!(presenter.live_visuals(), presenter.world().live.len());
        assert!(screen.title.is_some());
        assert!(screen.frames > 0);
        assert!(matches!(sounds.0.last(), Some(&"win") | Some(&"lose")));

        presenter.clear();
        assert!(presenter.world().live.is_empty());
    }
}
