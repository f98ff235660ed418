use log::info;
use pixcade::{
    audio::Cue,
    context::Context,
    event::{Event, KeyCode, KeyEventKind},
    game::Model,
    phase::{Phase, PhaseEvent},
    util::wrap,
};

pub const FIELD_W: f32 = 40.0;
/// rows: 0 goals, 1-6 river, 7 median, 8-12 road, 13 start
pub const FIELD_H: u16 = 14;
pub const GOAL_ROW: u16 = 0;
pub const MEDIAN_ROW: u16 = 7;
pub const START_ROW: u16 = 13;

pub const GOAL_XS: [f32; 5] = [3.0, 11.0, 19.0, 27.0, 35.0];
pub const GOAL_W: f32 = 3.0;

/// seconds a frog gets to reach a goal slot
pub const ATTEMPT_TIME: f32 = 30.0;

/// lane speed scale per level, a fixed per-level factor
pub fn level_factor(level: u32) -> f32 {
    1.0 + 0.15 * (level.saturating_sub(1)) as f32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneKind {
    /// cars kill on contact
    Road,
    /// logs and turtles carry the frog; open water drowns it
    River,
}

#[derive(Debug, Clone)]
pub struct Lane {
    pub y: u16,
    pub kind: LaneKind,
    pub speed: f32,
    pub len: f32,
    pub xs: Vec<f32>,
}

impl Lane {
    /// advance and wrap every entity; lane traffic is an endless stream
    /// circling the extended range [-len, FIELD_W)
    pub fn step(&mut self, dt: f32) {
        for x in self.xs.iter_mut() {
            *x = wrap(*x + self.speed * dt + self.len, FIELD_W + self.len) - self.len;
        }
    }

    /// entity under the frog cell, if any
    pub fn hit(&self, fx: f32) -> Option<usize> {
        self.xs
            .iter()
            .position(|&x| x < fx + 1.0 && x + self.len > fx)
    }
}

fn build_lanes(level: u32) -> Vec<Lane> {
    let f = level_factor(level);
    let mut lanes = vec![];
    // river: alternating directions, logs long, turtles short
    let river: [(f32, f32, usize); 6] = [
        (3.0, 6.0, 3),
        (-4.0, 4.0, 3),
        (5.0, 5.0, 3),
        (-3.0, 3.0, 4),
        (4.0, 6.0, 2),
        (-5.0, 4.0, 3),
    ];
    for (i, (speed, len, count)) in river.iter().enumerate() {
        lanes.push(Lane {
            y: 1 + i as u16,
            kind: LaneKind::River,
            speed: speed * f,
            len: *len,
            xs: (0..*count)
                .map(|k| k as f32 * (FIELD_W / *count as f32))
                .collect(),
        });
    }
    // road: cars, tighter and faster further down
    let road: [(f32, f32, usize); 5] = [
        (-4.0, 2.0, 3),
        (5.0, 2.0, 3),
        (-6.0, 3.0, 2),
        (7.0, 2.0, 2),
        (-5.0, 2.0, 3),
    ];
    for (i, (speed, len, count)) in road.iter().enumerate() {
        lanes.push(Lane {
            y: 8 + i as u16,
            kind: LaneKind::Road,
            speed: speed * f,
            len: *len,
            xs: (0..*count)
                .map(|k| k as f32 * (FIELD_W / *count as f32))
                .collect(),
        });
    }
    lanes
}

pub struct FroggerModel {
    pub lanes: Vec<Lane>,
    pub frog_x: f32,
    pub frog_y: u16,
    pub goals: [bool; 5],
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub time_left: f32,
}

impl FroggerModel {
    pub fn new() -> Self {
        Self {
            lanes: build_lanes(1),
            frog_x: FIELD_W / 2.0,
            frog_y: START_ROW,
            goals: [false; 5],
            score: 0,
            lives: 3,
            level: 1,
            time_left: ATTEMPT_TIME,
        }
    }

    fn reset(&mut self) {
        self.score = 0;
        self.lives = 3;
        self.level = 1;
        self.goals = [false; 5];
        self.lanes = build_lanes(1);
        self.respawn();
    }

    fn respawn(&mut self) {
        self.frog_x = FIELD_W / 2.0;
        self.frog_y = START_ROW;
        self.time_left = ATTEMPT_TIME;
    }

    fn lane_at(&self, y: u16) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.y == y)
    }

    fn lose_life(&mut self, ctx: &mut Context) {
        self.lives = self.lives.saturating_sub(1);
        ctx.play(Cue::Hit);
        if self.lives == 0 {
            info!("frog out of lives, score {}", self.score);
            ctx.phase_event(PhaseEvent::Lose);
            ctx.play(Cue::GameOver);
        } else {
            self.respawn();
        }
    }

    /// goal slot index covering x, if any
    fn goal_slot(x: f32) -> Option<usize> {
        GOAL_XS
            .iter()
            .position(|&gx| x + 0.5 >= gx && x + 0.5 < gx + GOAL_W)
    }

    fn hop(&mut self, ctx: &mut Context, dx: f32, dy: i32) {
        let nx = (self.frog_x + dx).clamp(0.0, FIELD_W - 1.0);
        let ny = self.frog_y as i32 + dy;
        if !(0..=START_ROW as i32).contains(&ny) {
            return;
        }
        let ny = ny as u16;
        if ny == GOAL_ROW {
            match Self::goal_slot(nx) {
                // an occupied or missed slot rejects the hop
                Some(slot) if !self.goals[slot] => {
                    self.goals[slot] = true;
                    self.score += 50 + self.time_left as u64;
                    self.respawn();
                    if self.goals.iter().all(|&g| g) {
                        self.level += 1;
                        self.goals = [false; 5];
                        self.lanes = build_lanes(self.level);
                        self.score += 100;
                        ctx.play_seq(&[(0.0, Cue::Bonus), (0.3, Cue::LevelUp)]);
                    } else {
                        ctx.play(Cue::Bonus);
                    }
                }
                _ => {}
            }
            return;
        }
        self.frog_x = nx;
        self.frog_y = ny;
        ctx.play(Cue::Move);
    }

    /// per-frame hazards: traffic motion, riding, drowning, the clock
    fn step_world(&mut self, ctx: &mut Context, dt: f32) {
        for lane in self.lanes.iter_mut() {
            lane.step(dt);
        }

        self.time_left -= dt;
        if self.time_left <= 0.0 {
            self.lose_life(ctx);
            return;
        }

        let fx = self.frog_x;
        // (fatal, carried-by) for the frog's current row
        let (dead, ride) = match self.lane_at(self.frog_y) {
            Some(lane) => match lane.kind {
                LaneKind::Road => (lane.hit(fx).is_some(), None),
                LaneKind::River => match lane.hit(fx) {
                    Some(_) => (false, Some(lane.speed)),
                    None => (true, None),
                },
            },
            None => (false, None),
        };
        if dead {
            self.lose_life(ctx);
            return;
        }
        if let Some(speed) = ride {
            // ride the platform; carried off the field drowns
            let nx = fx + speed * dt;
            if nx < 0.0 || nx > FIELD_W - 1.0 {
                self.lose_life(ctx);
            } else {
                self.frog_x = nx;
            }
        }
    }
}

impl Model for FroggerModel {
    fn init(&mut self, ctx: &mut Context) {
        ctx.rand.srand_now();
        ctx.phase = Phase::Ready;
        ctx.input_events.clear();
        self.reset();
    }

    fn handle_input(&mut self, ctx: &mut Context, _dt: f32) {
        let es = ctx.input_events.clone();
        for e in &es {
            let Event::Key(key) = e;
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match ctx.phase {
                Phase::Ready => {
                    if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                        ctx.phase_event(PhaseEvent::Start);
                    }
                }
                Phase::Playing => match key.code {
                    KeyCode::Up | KeyCode::Char('w') => self.hop(ctx, 0.0, -1),
                    KeyCode::Down | KeyCode::Char('s') => self.hop(ctx, 0.0, 1),
                    KeyCode::Left | KeyCode::Char('a') => self.hop(ctx, -1.0, 0),
                    KeyCode::Right | KeyCode::Char('d') => self.hop(ctx, 1.0, 0),
                    KeyCode::Char('p') => ctx.phase_event(PhaseEvent::PauseToggle),
                    _ => {}
                },
                Phase::Paused => {
                    if key.code == KeyCode::Char('p') {
                        ctx.phase_event(PhaseEvent::PauseToggle);
                    }
                }
                Phase::Over | Phase::Win => {
                    if key.code == KeyCode::Char('r') {
                        self.reset();
                        ctx.phase_event(PhaseEvent::Restart);
                    }
                }
            }
        }
    }

    fn handle_auto(&mut self, ctx: &mut Context, dt: f32) {
        self.step_world(ctx, dt);
    }

    fn handle_event(&mut self, _ctx: &mut Context, _dt: f32) {}
    fn handle_timer(&mut self, _ctx: &mut Context, _dt: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn playing() -> (Context, FroggerModel) {
        let mut ctx = Context::new("frogger-test");
        ctx.phase = Phase::Playing;
        let mut m = FroggerModel::new();
        m.reset();
        (ctx, m)
    }

    fn river_lane(m: &FroggerModel) -> u16 {
        m.lanes
            .iter()
            .filter(|l| l.kind == LaneKind::River)
            .map(|l| l.y)
            .sorted()
            .next()
            .unwrap()
    }

    #[test]
    fn riding_a_log_carries_the_frog() {
        let (mut ctx, mut m) = playing();
        let y = river_lane(&m);
        let lane = m.lanes.iter_mut().find(|l| l.y == y).unwrap();
        lane.speed = 5.0;
        lane.xs = vec![10.0];
        lane.len = 6.0;
        m.frog_y = y;
        m.frog_x = 12.0;
        let fx = m.frog_x;
        m.step_world(&mut ctx, 0.1);
        assert_eq!(m.lives, 3);
        assert!(m.frog_x > fx);
    }

    #[test]
    fn open_water_drowns() {
        let (mut ctx, mut m) = playing();
        let y = river_lane(&m);
        let lane = m.lanes.iter_mut().find(|l| l.y == y).unwrap();
        lane.xs = vec![];
        m.frog_y = y;
        m.frog_x = 20.0;
        m.step_world(&mut ctx, 0.016);
        assert_eq!(m.lives, 2);
        assert_eq!(m.frog_y, START_ROW);
    }

    #[test]
    fn cars_kill_on_contact() {
        let (mut ctx, mut m) = playing();
        let lane = m
            .lanes
            .iter_mut()
            .find(|l| l.kind == LaneKind::Road)
            .unwrap();
        let (y, speed) = (lane.y, lane.speed);
        lane.xs = vec![20.0 - speed * 0.016];
        lane.len = 2.0;
        m.frog_y = y;
        m.frog_x = 20.0;
        m.step_world(&mut ctx, 0.016);
        assert_eq!(m.lives, 2);
    }

    #[test]
    fn goal_slots_fill_once_and_reject_double_entry() {
        let (mut ctx, mut m) = playing();
        m.frog_y = 1;
        m.frog_x = GOAL_XS[2] + 1.0;
        m.hop(&mut ctx, 0.0, -1);
        assert!(m.goals[2]);
        assert_eq!(m.frog_y, START_ROW);
        assert!(m.score >= 50);

        // hop into the same slot again: rejected, frog stays put
        m.frog_y = 1;
        m.frog_x = GOAL_XS[2] + 1.0;
        let score = m.score;
        m.hop(&mut ctx, 0.0, -1);
        assert_eq!(m.frog_y, 1);
        assert_eq!(m.score, score);
    }

    #[test]
    fn missing_every_slot_rejects_the_hop() {
        let (mut ctx, mut m) = playing();
        m.frog_y = 1;
        // between slot 0 and slot 1
        m.frog_x = GOAL_XS[0] + GOAL_W + 1.0;
        m.hop(&mut ctx, 0.0, -1);
        assert_eq!(m.frog_y, 1);
        assert!(m.goals.iter().all(|&g| !g));
    }

    #[test]
    fn filling_all_goals_levels_up_and_speeds_lanes() {
        let (mut ctx, mut m) = playing();
        m.goals = [true, true, true, true, false];
        let base = m.lanes[0].speed.abs();
        m.frog_y = 1;
        m.frog_x = GOAL_XS[4] + 1.0;
        m.hop(&mut ctx, 0.0, -1);
        assert_eq!(m.level, 2);
        assert!(m.goals.iter().all(|&g| !g));
        assert!(m.lanes[0].speed.abs() > base);
    }

    #[test]
    fn the_clock_running_out_costs_a_life() {
        let (mut ctx, mut m) = playing();
        m.time_left = 0.01;
        m.step_world(&mut ctx, 0.016);
        assert_eq!(m.lives, 2);
        assert!((m.time_left - ATTEMPT_TIME).abs() < 1e-6);
    }

    #[test]
    fn lane_entities_wrap_the_extended_range() {
        let mut lane = Lane {
            y: 8,
            kind: LaneKind::Road,
            speed: 10.0,
            len: 2.0,
            xs: vec![FIELD_W - 1.0],
        };
        lane.step(1.0);
        // moved past the right edge and re-entered from the left
        assert!(lane.xs[0] >= -lane.len && lane.xs[0] < FIELD_W - 1.0);
    }
}
