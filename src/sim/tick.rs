//! Fixed timestep simulation tick
//!
//! The world owns one level attempt: the session, the targets, the needles in
//! flight and the shooter. `World::tick` advances all of it deterministically.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combat;
use super::events::GameEvent;
use super::needle::{Needle, NeedleTier};
use super::session::{GameSession, LevelOutcome};
use super::snapshot::SessionSnapshot;
use super::target::Virus;
use crate::consts::*;
use crate::error::SimError;
use crate::tuning::ConfigBundle;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Fire a needle toward this world position (click/tap)
    pub fire_at: Option<Vec2>,
    /// Flip the super-needle toggle
    pub toggle_super: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the world aims and fires by itself
    pub autopilot: bool,
}

/// Playfield size; the origin is the centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Needle spawn point near the bottom edge
    pub fn shooter_pos(&self) -> Vec2 {
        let margin = SHOOTER_BOTTOM_MARGIN.max(self.height * SHOOTER_BOTTOM_FRACTION);
        Vec2::new(0.0, -self.height / 2.0 + margin)
    }

    /// Target centres, spread evenly across the row
    pub fn target_positions(&self, count: u32) -> Vec<Vec2> {
        let y = self.height * TARGET_ROW_FRACTION;
        if count <= 1 {
            return vec![Vec2::new(0.0, y)];
        }
        let available = self.width * TARGET_SPREAD_FRACTION;
        let spacing = available / (count - 1) as f32;
        (0..count)
            .map(|i| Vec2::new(-available / 2.0 + i as f32 * spacing, y))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct World {
    bundle: ConfigBundle,
    session: GameSession,
    targets: Vec<Virus>,
    needles: Vec<Needle>,
    playfield: Playfield,
    next_needle_id: u32,
    time_ticks: u64,
    events: Vec<GameEvent>,
}

impl World {
    /// Build an attempt at `level_id` (unknown ids fall back to the first level)
    pub fn new(
        bundle: &ConfigBundle,
        level_id: u32,
        seed: u64,
        playfield: Playfield,
    ) -> Result<Self, SimError> {
        let mut session = GameSession::new(bundle, level_id, seed)?;
        let level = session.level().clone();
        let variant = bundle.variant(&level.variant_id);
        let archetype = bundle.archetype(level.archetype);

        let count = level.spawn_count();
        let targets: Vec<Virus> = playfield
            .target_positions(count)
            .into_iter()
            .map(|pos| Virus::new(&level, variant, archetype, pos))
            .collect();
        session.set_total_hp(level.hp * count as f32);

        log::info!(
            "World ready: level {} with {} target(s) on {}x{}",
            level.level_id,
            targets.len(),
            playfield.width,
            playfield.height
        );

        Ok(Self {
            bundle: bundle.clone(),
            session,
            targets,
            needles: Vec::new(),
            playfield,
            next_needle_id: 1,
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    /// Advance the attempt by `dt` real seconds
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        // Handle pause toggle
        if input.pause {
            let paused = !self.session.is_paused();
            self.session.set_paused(paused);
            log::debug!("Paused: {}", paused);
        }

        // Don't tick if paused or the attempt is over
        if self.session.is_paused() || self.session.is_over() {
            return;
        }

        if input.toggle_super {
            self.session.toggle_super();
        }

        let mut aim = input.fire_at;
        if input.autopilot && aim.is_none() && self.needles.is_empty() {
            aim = self.autopilot_aim();
        }
        if let Some(aim) = aim {
            self.fire(aim);
        }

        self.time_ticks += 1;
        self.session.advance_time(dt);
        let game_dt = dt * self.session.time_scale();

        for needle in &mut self.needles {
            needle.step(game_dt);
        }

        let regen_rate = self.session.regen_rate();
        for (i, virus) in self.targets.iter_mut().enumerate() {
            let report = virus.step(game_dt, regen_rate);
            if report.healed > 0.0 {
                self.session.apply_level_heal(report.healed);
            }
            for phase in report.phases {
                self.events.push(GameEvent::PhaseTriggered { target: i, phase });
            }
        }

        combat::resolve(
            &mut self.session,
            &mut self.targets,
            &mut self.needles,
            &self.playfield,
            &mut self.events,
        );
        self.needles.retain(|n| n.is_alive());

        self.update_boss_phase();
        self.check_outcome();
    }

    /// Launch a needle from the shooter toward `aim`; returns its id
    pub fn fire(&mut self, aim: Vec2) -> Option<u32> {
        if self.session.is_paused() || self.session.is_over() || !self.session.can_fire() {
            return None;
        }
        let origin = self.playfield.shooter_pos();
        let dir = aim - origin;
        if dir.length() <= MIN_AIM_DISTANCE {
            return None;
        }

        let tier = if self.session.take_super_needle() {
            NeedleTier::Super
        } else {
            NeedleTier::Normal
        };
        self.session.consume_needle();

        let id = self.next_needle_id;
        self.next_needle_id += 1;
        let bounces = self.session.level().needle_bounces();
        self.needles.push(Needle::new(id, origin, dir, tier, bounces));
        self.events.push(GameEvent::NeedleFired {
            needle_id: id,
            is_super: tier == NeedleTier::Super,
        });
        Some(id)
    }

    /// Nearest real weak point of the first live target, led by its rotation
    fn autopilot_aim(&self) -> Option<Vec2> {
        let origin = self.playfield.shooter_pos();
        let virus = self.targets.iter().find(|v| !v.is_dead())?;
        let target = virus.nearest_weak_point(origin)?;
        let flight = origin.distance(target) / NEEDLE_SPEED;
        let lead = Vec2::from_angle(virus.current_speed() * flight);
        Some(virus.pos + lead.rotate(target - virus.pos))
    }

    fn update_boss_phase(&mut self) {
        let (active, total) = self
            .targets
            .iter()
            .map(Virus::phase_progress)
            .fold((0, 0), |(a, t), (pa, pt)| (a.max(pa), t.max(pt)));
        self.session.set_boss_phase_progress(active, total);
    }

    fn check_outcome(&mut self) {
        if self.session.is_over() {
            return;
        }
        let level_id = self.session.level_id();

        if self.session.hp() <= 0.0 || self.targets.iter().all(Virus::is_dead) {
            self.session.mark_cleared();
            self.events.push(GameEvent::LevelCleared { level_id });
            return;
        }

        let out_of_needles =
            self.session.needle_limit_enabled() && self.session.needles_remaining() == 0;
        if out_of_needles && self.needles.is_empty() {
            self.session.apply_failure();
            self.events.push(GameEvent::LevelFailed {
                level_id,
                carried_gauge: self.session.gauge(),
            });
        }
    }

    /// Fresh attempt at the same level; a failed attempt hands over its carried gauge
    pub fn retry(&self, seed: u64) -> Result<World, SimError> {
        let mut world = World::new(&self.bundle, self.level_id(), seed, self.playfield)?;
        if self.session.outcome() == LevelOutcome::Failed {
            world.session.carry_gauge(self.session.gauge());
            log::info!("Retry level {} with gauge {:.3}", self.level_id(), self.session.gauge());
        }
        Ok(world)
    }

    /// Fresh attempt at the next level, `None` after the last one
    pub fn next_level(&self, seed: u64) -> Result<Option<World>, SimError> {
        match self.bundle.next_level_id(self.level_id()) {
            Some(next) => World::new(&self.bundle, next, seed, self.playfield).map(Some),
            None => Ok(None),
        }
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn targets(&self) -> &[Virus] {
        &self.targets
    }

    pub fn needles(&self) -> &[Needle] {
        &self.needles
    }

    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    pub fn level_id(&self) -> u32 {
        self.session.level_id()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::HitKind;
    use crate::tuning::{BossPhaseConfig, EconomyConfig, EnemyArchetypeId, LevelConfig};

    /// One stationary target with a single weak point
    fn still_bundle(hp: f32, needle_limit: Option<u32>) -> ConfigBundle {
        let mut level = LevelConfig::basic(1, EnemyArchetypeId::Standard, "S1", hp, 1, 0.0);
        if let Some(limit) = needle_limit {
            level.limit_needles_enabled = true;
            level.limit_needles = Some(limit);
        }
        let next = LevelConfig::basic(2, EnemyArchetypeId::Standard, "S1", hp, 2, 0.5);
        ConfigBundle {
            levels: vec![level, next],
            economy: EconomyConfig {
                super_needle_p_base: 0.0,
                super_needle_p_min: 0.0,
                super_needle_p_cap: 0.0,
                ..EconomyConfig::default()
            },
            ..ConfigBundle::default()
        }
    }

    fn world(bundle: &ConfigBundle) -> World {
        World::new(bundle, 1, 12345, Playfield::default()).unwrap()
    }

    /// Tick with no input until `done` holds; returns ticks used
    fn run_until(world: &mut World, max_ticks: u32, done: impl Fn(&World) -> bool) -> u32 {
        for i in 0..max_ticks {
            if done(world) {
                return i;
            }
            world.tick(&TickInput::default(), SIM_DT);
        }
        max_ticks
    }

    fn weak_point_pos(world: &World) -> Vec2 {
        world.targets()[0].weak_points[0].pos
    }

    #[test]
    fn test_world_layout() {
        let w = World::new(&ConfigBundle::default(), 1, 1, Playfield::default()).unwrap();
        assert_eq!(w.targets().len(), 1);
        assert!((w.targets()[0].pos - Vec2::new(0.0, 192.0)).length() < 1e-3);
        assert!((w.playfield().shooter_pos() - Vec2::new(0.0, -448.0)).length() < 1e-3);
        assert_eq!(w.session().hp_max(), 6.0);
    }

    #[test]
    fn test_multi_target_aggregate_hp() {
        let mut level = LevelConfig::basic(1, EnemyArchetypeId::Standard, "S1", 4.0, 2, 0.5);
        level.multi_target_enabled = true;
        level.target_count = Some(3);
        let bundle = ConfigBundle {
            levels: vec![level],
            ..ConfigBundle::default()
        };
        let w = world(&bundle);
        assert_eq!(w.targets().len(), 3);
        assert!((w.targets()[0].pos.x + 288.0).abs() < 1e-3);
        assert!(w.targets()[1].pos.x.abs() < 1e-3);
        assert!((w.targets()[2].pos.x - 288.0).abs() < 1e-3);
        assert_eq!(w.session().hp_max(), 12.0);
        assert_eq!(w.session().hp(), 12.0);
    }

    #[test]
    fn test_unknown_level_falls_back() {
        let w = World::new(&ConfigBundle::default(), 404, 1, Playfield::default()).unwrap();
        assert_eq!(w.level_id(), 1);
    }

    #[test]
    fn test_fire_rejected_at_shooter() {
        let mut w = world(&still_bundle(3.0, None));
        let origin = w.playfield().shooter_pos();
        assert_eq!(w.fire(origin), None);
        assert!(w.fire(origin + Vec2::Y).is_some());
        assert_eq!(w.needles().len(), 1);
    }

    #[test]
    fn test_shot_hits_weak_point() {
        let mut w = world(&still_bundle(3.0, None));
        let aim = weak_point_pos(&w);
        w.tick(&TickInput { fire_at: Some(aim), ..Default::default() }, SIM_DT);
        assert_eq!(w.needles().len(), 1);
        run_until(&mut w, 600, |w| w.needles().is_empty());

        assert_eq!(w.session().combo(), 1);
        assert_eq!(w.session().hp(), 2.0);
        assert_eq!(w.targets()[0].hp, 2.0);
        let events = w.drain_events();
        assert!(matches!(events[0], GameEvent::NeedleFired { needle_id: 1, is_super: false }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::Hit { kind: HitKind::WeakPoint, .. })));
        assert!(w.drain_events().is_empty());
    }

    #[test]
    fn test_tick_pause() {
        let mut w = world(&still_bundle(3.0, None));
        let aim = weak_point_pos(&w);
        w.tick(&TickInput { fire_at: Some(aim), ..Default::default() }, SIM_DT);
        let ticks = w.time_ticks();

        // Pause
        w.tick(&TickInput { pause: true, ..Default::default() }, SIM_DT);
        assert!(w.session().is_paused());
        let pos = w.needles()[0].pos;
        for _ in 0..10 {
            w.tick(&TickInput::default(), SIM_DT);
        }
        assert_eq!(w.needles()[0].pos, pos);
        assert_eq!(w.time_ticks(), ticks);
        assert_eq!(w.fire(aim), None);

        // Unpause
        w.tick(&TickInput { pause: true, ..Default::default() }, SIM_DT);
        assert!(!w.session().is_paused());
        assert!(w.needles()[0].pos.y > pos.y);
    }

    #[test]
    fn test_autopilot_clears_still_target() {
        let mut w = world(&still_bundle(3.0, None));
        let input = TickInput { autopilot: true, ..Default::default() };
        for _ in 0..6000 {
            if w.session().is_over() {
                break;
            }
            w.tick(&input, SIM_DT);
        }
        assert_eq!(w.session().outcome(), LevelOutcome::Cleared);
        assert!(w.targets()[0].is_dead());
        let events = w.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::Hit { kind: HitKind::Kill, .. })));
        assert!(matches!(events.last(), Some(GameEvent::LevelCleared { level_id: 1 })));
    }

    #[test]
    fn test_needle_limit_failure_carries_gauge() {
        let mut w = world(&still_bundle(5.0, Some(2)));

        // One hit builds some gauge
        let aim = weak_point_pos(&w);
        w.tick(&TickInput { fire_at: Some(aim), ..Default::default() }, SIM_DT);
        run_until(&mut w, 600, |w| w.needles().is_empty());
        let gauge = w.session().gauge();
        assert!(gauge > 0.0);

        // Last needle goes straight down and out
        let down = w.playfield().shooter_pos() - Vec2::new(0.0, 200.0);
        w.tick(&TickInput { fire_at: Some(down), ..Default::default() }, SIM_DT);
        run_until(&mut w, 600, |w| w.session().is_over());

        assert_eq!(w.session().outcome(), LevelOutcome::Failed);
        assert_eq!(w.session().needles_remaining(), 0);
        let carried = w.session().gauge();
        assert!((carried - gauge * 0.5).abs() < 1e-6);
        assert!(
            w.drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::LevelFailed { level_id: 1, .. }))
        );

        // Retry starts fresh but keeps the carried gauge
        let retry = w.retry(1).unwrap();
        assert_eq!(retry.session().outcome(), LevelOutcome::InProgress);
        assert_eq!(retry.session().needles_remaining(), 2);
        assert!((retry.session().gauge() - carried).abs() < 1e-6);
    }

    #[test]
    fn test_next_level() {
        let w = world(&still_bundle(3.0, None));
        let next = w.next_level(5).unwrap().unwrap();
        assert_eq!(next.level_id(), 2);
        assert!(next.next_level(5).unwrap().is_none());
    }

    #[test]
    fn test_toggle_super_fires_super_needle() {
        let mut bundle = still_bundle(5.0, None);
        bundle.economy.gauge_a = 1.0;
        let mut w = world(&bundle);
        let aim = weak_point_pos(&w);
        w.tick(&TickInput { fire_at: Some(aim), ..Default::default() }, SIM_DT);
        run_until(&mut w, 600, |w| w.needles().is_empty());
        assert_eq!(w.session().super_needles(), 1);
        w.drain_events();

        let aim = weak_point_pos(&w);
        w.tick(
            &TickInput {
                fire_at: Some(aim),
                toggle_super: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert!(w.needles()[0].is_super());
        assert_eq!(w.session().super_needles(), 0);
        assert!(matches!(w.drain_events()[0], GameEvent::NeedleFired { is_super: true, .. }));
    }

    #[test]
    fn test_regen_heal_mirrored_into_session() {
        let mut bundle = still_bundle(10.0, None);
        bundle.levels[0].regen_enabled = true;
        bundle.levels[0].regen_base = Some(1.0);
        bundle.levels[0].regen_delay = Some(0.5);
        let mut w = world(&bundle);
        assert!(w.session().regen_rate() > 0.0);

        w.targets[0].apply_damage(4.0);
        w.session.apply_level_damage(4.0);
        for _ in 0..120 {
            w.tick(&TickInput::default(), SIM_DT);
        }

        let target_hp = w.targets()[0].hp;
        assert!(target_hp > 6.0);
        assert!((target_hp - w.session().hp()).abs() < 1e-4);
    }

    #[test]
    fn test_phase_trigger_emits_event() {
        let mut bundle = still_bundle(10.0, None);
        bundle.levels[0].boss_phases = vec![BossPhaseConfig::at(0.5)];
        let mut w = world(&bundle);

        w.targets[0].apply_damage(6.0);
        w.session.apply_level_damage(6.0);
        w.tick(&TickInput::default(), SIM_DT);
        w.tick(&TickInput::default(), SIM_DT);

        let phases: Vec<_> = w
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::PhaseTriggered { .. }))
            .collect();
        assert_eq!(phases, vec![GameEvent::PhaseTriggered { target: 0, phase: 0 }]);
        assert_eq!(w.session().boss_phase_progress(), (1, 1));
    }

    #[test]
    fn test_determinism() {
        // Two worlds with the same seed should produce identical results
        let bundle = ConfigBundle::default();
        let mut w1 = World::new(&bundle, 15, 99999, Playfield::default()).unwrap();
        let mut w2 = World::new(&bundle, 15, 99999, Playfield::default()).unwrap();
        let input = TickInput { autopilot: true, ..Default::default() };

        for _ in 0..2400 {
            w1.tick(&input, SIM_DT);
            w2.tick(&input, SIM_DT);
        }

        assert_eq!(w1.time_ticks(), w2.time_ticks());
        assert_eq!(w1.snapshot(), w2.snapshot());
        assert_eq!(w1.drain_events(), w2.drain_events());
    }
}
