use itertools::Itertools;
use log::info;
use pixcade::{
    audio::Cue,
    context::Context,
    event::{Event, KeyCode, KeyEventKind},
    game::Model,
    phase::{Phase, PhaseEvent},
    util::{aabb_hit, Cadence},
};

pub const FIELD_W: f32 = 60.0;
pub const FIELD_H: f32 = 26.0;

pub const INVADER_W: f32 = 3.0;
pub const INVADER_H: f32 = 1.0;
pub const FORM_ROWS: usize = 4;
pub const FORM_COLS: usize = 8;
/// vertical increment applied when the formation reverses
pub const DROP_STEP: f32 = 1.0;
/// horizontal speed gained per kill within a wave
pub const KILL_BUMP: f32 = 0.06;

pub const TANK_W: f32 = 3.0;
const TANK_SPEED: f32 = 22.0;
const SHOT_SPEED: f32 = 26.0;
const BOMB_SPEED: f32 = 9.0;
const MAX_PLAYER_SHOTS: usize = 3;
const BARRIER_HP: u8 = 4;

/// base horizontal step per formation move; wave entry always recomputes
/// from this formula and discards per-kill increments of the old wave
pub fn base_speed(level: u32) -> f32 {
    1.0 + 0.25 * (level.saturating_sub(1)) as f32
}

/// seconds between formation steps
pub fn step_interval(level: u32) -> f32 {
    (0.6 - 0.05 * (level.saturating_sub(1)) as f32).max(0.15)
}

#[derive(Debug, Clone, Copy)]
pub struct Invader {
    pub x: f32,
    pub y: f32,
    /// 0 = bottom tier, 1 = middle, 2 = top; higher tiers score more
    pub kind: u8,
    pub alive: bool,
    pub frame: bool,
}

impl Invader {
    pub fn points(&self) -> u64 {
        match self.kind {
            0 => 10,
            1 => 20,
            _ => 30,
        }
    }
}

/// The wave formation moving in lock-step. All alive members probe their
/// next horizontal step first; if any would cross a boundary the whole
/// formation reverses and drops exactly once for that step.
pub struct Formation {
    pub members: Vec<Invader>,
    pub dir: f32,
    pub speed: f32,
}

pub enum StepOutcome {
    Advanced,
    Dropped,
}

impl Formation {
    pub fn new(level: u32) -> Self {
        let mut members = vec![];
        for row in 0..FORM_ROWS {
            for col in 0..FORM_COLS {
                members.push(Invader {
                    x: 2.0 + col as f32 * 5.0,
                    y: 2.0 + row as f32 * 2.0,
                    kind: match row {
                        0 => 2,
                        1 => 1,
                        _ => 0,
                    },
                    alive: true,
                    frame: false,
                });
            }
        }
        Self {
            members,
            dir: 1.0,
            speed: base_speed(level),
        }
    }

    pub fn alive_count(&self) -> usize {
        self.members.iter().filter(|m| m.alive).count()
    }

    /// lowest edge of any alive member
    pub fn lowest_y(&self) -> f32 {
        self.members
            .iter()
            .filter(|m| m.alive)
            .map(|m| m.y + INVADER_H)
            .fold(0.0, f32::max)
    }

    pub fn step(&mut self, right_bound: f32) -> StepOutcome {
        let dx = self.speed * self.dir;
        let crosses = match self
            .members
            .iter()
            .filter(|m| m.alive)
            .map(|m| m.x + dx)
            .minmax()
            .into_option()
        {
            Some((lo, hi)) => lo < 0.0 || hi + INVADER_W > right_bound,
            None => false,
        };
        if crosses {
            self.dir = -self.dir;
            for m in self.members.iter_mut().filter(|m| m.alive) {
                m.y += DROP_STEP;
            }
            StepOutcome::Dropped
        } else {
            for m in self.members.iter_mut().filter(|m| m.alive) {
                m.x += dx;
                m.frame = !m.frame;
            }
            StepOutcome::Advanced
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Shot {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Barrier {
    pub x: f32,
    pub y: f32,
    pub hp: u8,
}

fn build_barriers() -> Vec<Barrier> {
    let mut out = vec![];
    for b in 0..4 {
        let base = 6.0 + b as f32 * 14.0;
        for seg in 0..5 {
            out.push(Barrier {
                x: base + seg as f32,
                y: FIELD_H - 5.0,
                hp: BARRIER_HP,
            });
        }
    }
    out
}

pub struct InvadersModel {
    pub formation: Formation,
    pub tank_x: f32,
    pub shots: Vec<Shot>,
    pub bombs: Vec<Shot>,
    pub barriers: Vec<Barrier>,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    stepper: Cadence,
    bomb_timer: Cadence,
}

impl InvadersModel {
    pub fn new() -> Self {
        Self {
            formation: Formation::new(1),
            tank_x: FIELD_W / 2.0,
            shots: vec![],
            bombs: vec![],
            barriers: build_barriers(),
            score: 0,
            lives: 3,
            level: 1,
            stepper: Cadence::new(step_interval(1)),
            bomb_timer: Cadence::new(1.2),
        }
    }

    fn reset(&mut self) {
        self.score = 0;
        self.lives = 3;
        self.level = 1;
        self.start_wave();
    }

    /// wave entry: new formation with the level speed, fresh barriers
    fn start_wave(&mut self) {
        self.formation = Formation::new(self.level);
        self.stepper = Cadence::new(step_interval(self.level));
        self.bomb_timer = Cadence::new((1.2 - 0.1 * (self.level - 1) as f32).max(0.5));
        self.shots.clear();
        self.bombs.clear();
        self.barriers = build_barriers();
        self.tank_x = FIELD_W / 2.0;
    }

    fn tank_row(&self) -> f32 {
        FIELD_H - 2.0
    }

    fn shoot(&mut self, ctx: &mut Context) {
        if self.shots.len() >= MAX_PLAYER_SHOTS {
            return;
        }
        self.shots.push(Shot {
            x: self.tank_x + TANK_W / 2.0,
            y: self.tank_row() - 1.0,
            vy: -SHOT_SPEED,
        });
        ctx.play(Cue::Shoot);
    }

    /// player shots against invaders then barriers. Projectiles iterate
    /// in reverse insertion order, obstacles in storage order, stopping
    /// at the first hit; the ordering decides which of two overlapping
    /// targets absorbs the shot.
    fn collide_shots(&mut self, ctx: &mut Context) {
        for si in (0..self.shots.len()).rev() {
            let s = self.shots[si];
            let mut consumed = false;
            for m in self.formation.members.iter_mut() {
                if m.alive && aabb_hit(s.x, s.y, 1.0, 1.0, m.x, m.y, INVADER_W, INVADER_H) {
                    m.alive = false;
                    self.score += m.points();
                    self.formation.speed += KILL_BUMP;
                    consumed = true;
                    ctx.play(Cue::Explosion);
                    break;
                }
            }
            if !consumed {
                for b in self.barriers.iter_mut() {
                    if b.hp > 0 && aabb_hit(s.x, s.y, 1.0, 1.0, b.x, b.y, 1.0, 1.0) {
                        b.hp -= 1;
                        consumed = true;
                        ctx.play(Cue::Hit);
                        break;
                    }
                }
            }
            if consumed {
                self.shots.remove(si);
            }
        }
    }

    fn collide_bombs(&mut self, ctx: &mut Context) {
        let (tx, ty) = (self.tank_x, self.tank_row());
        for bi in (0..self.bombs.len()).rev() {
            let s = self.bombs[bi];
            let mut consumed = false;
            for b in self.barriers.iter_mut() {
                if b.hp > 0 && aabb_hit(s.x, s.y, 1.0, 1.0, b.x, b.y, 1.0, 1.0) {
                    b.hp -= 1;
                    consumed = true;
                    ctx.play(Cue::Hit);
                    break;
                }
            }
            if !consumed && aabb_hit(s.x, s.y, 1.0, 1.0, tx, ty, TANK_W, 1.0) {
                consumed = true;
                self.lose_life(ctx);
            }
            if consumed {
                self.bombs.remove(bi);
            }
        }
    }

    fn lose_life(&mut self, ctx: &mut Context) {
        self.lives = self.lives.saturating_sub(1);
        ctx.play(Cue::Explosion);
        if self.lives == 0 {
            info!("tank destroyed, score {}", self.score);
            ctx.phase_event(PhaseEvent::Lose);
            ctx.play(Cue::GameOver);
        } else {
            // reset, not destroy: respawn centered with the sky cleared
            self.tank_x = FIELD_W / 2.0;
            self.bombs.clear();
        }
    }

    fn drop_bomb(&mut self, ctx: &mut Context) {
        let alive: Vec<usize> = self
            .formation
            .members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.alive)
            .map(|(i, _)| i)
            .collect();
        if alive.is_empty() {
            return;
        }
        let m = self.formation.members[alive[ctx.rand.pick(alive.len())]];
        self.bombs.push(Shot {
            x: m.x + INVADER_W / 2.0,
            y: m.y + INVADER_H,
            vy: BOMB_SPEED,
        });
    }
}

impl Model for InvadersModel {
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
                    KeyCode::Char(' ') => self.shoot(ctx),
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
        // tank movement from held keys, clamped to the field
        let mut vx = 0.0;
        if ctx.input.is_held(KeyCode::Left) || ctx.input.is_held(KeyCode::Char('a')) {
            vx -= TANK_SPEED;
        }
        if ctx.input.is_held(KeyCode::Right) || ctx.input.is_held(KeyCode::Char('d')) {
            vx += TANK_SPEED;
        }
        self.tank_x = (self.tank_x + vx * dt).clamp(1.0, FIELD_W - 1.0 - TANK_W);

        // projectiles move every frame; off-field ones are removed
        for s in &mut self.shots {
            s.y += s.vy * dt;
        }
        self.shots.retain(|s| s.y > 0.0);
        for s in &mut self.bombs {
            s.y += s.vy * dt;
        }
        self.bombs.retain(|s| s.y < FIELD_H);

        // the formation moves in discrete lock-steps
        if self.stepper.tick(dt) {
            self.formation.step(FIELD_W);
        }
        if self.bomb_timer.tick(dt) {
            self.drop_bomb(ctx);
        }

        self.collide_shots(ctx);
        self.collide_bombs(ctx);

        // reaching the tank's row ends the game immediately
        if self.formation.lowest_y() >= self.tank_row() {
            ctx.phase_event(PhaseEvent::Lose);
            ctx.play(Cue::GameOver);
            return;
        }

        if self.formation.alive_count() == 0 {
            self.level += 1;
            self.start_wave();
            ctx.play(Cue::LevelUp);
        }
    }

    fn handle_event(&mut self, _ctx: &mut Context, _dt: f32) {}
    fn handle_timer(&mut self, _ctx: &mut Context, _dt: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formation_reverses_and_drops_exactly_once() {
        let mut f = Formation {
            members: vec![
                Invader { x: 0.0, y: 2.0, kind: 0, alive: true, frame: false },
                Invader { x: 40.0, y: 2.0, kind: 0, alive: true, frame: false },
                Invader { x: 80.0, y: 2.0, kind: 0, alive: true, frame: false },
            ],
            dir: 1.0,
            speed: 10.0,
        };
        // first step advances: 90 + width stays inside 100
        assert!(matches!(f.step(100.0), StepOutcome::Advanced));
        assert_eq!(f.members[2].x, 90.0);
        // next step would push the rightmost edge past 100: the whole
        // formation flips and drops once, horizontal positions unchanged
        assert!(matches!(f.step(100.0), StepOutcome::Dropped));
        assert_eq!(f.dir, -1.0);
        for m in &f.members {
            assert_eq!(m.y, 2.0 + DROP_STEP);
        }
        assert_eq!(f.members[2].x, 90.0);
        // and the step after that advances left
        assert!(matches!(f.step(100.0), StepOutcome::Advanced));
        assert_eq!(f.members[0].x, 0.0);
    }

    #[test]
    fn dead_members_do_not_probe_the_boundary() {
        let mut f = Formation {
            members: vec![
                Invader { x: 90.0, y: 2.0, kind: 0, alive: false, frame: false },
                Invader { x: 10.0, y: 2.0, kind: 0, alive: true, frame: false },
            ],
            dir: 1.0,
            speed: 10.0,
        };
        // the dead member at the edge is ignored
        assert!(matches!(f.step(100.0), StepOutcome::Advanced));
        assert_eq!(f.members[1].x, 20.0);
        assert_eq!(f.members[0].x, 90.0);
    }

    #[test]
    fn newest_shot_wins_a_shared_target() {
        let mut ctx = Context::new("invaders-test");
        ctx.phase = Phase::Playing;
        let mut m = InvadersModel::new();
        m.barriers.clear();
        for inv in &mut m.formation.members {
            inv.alive = false;
        }
        m.formation.members[0] = Invader {
            x: 10.0,
            y: 5.0,
            kind: 0,
            alive: true,
            frame: false,
        };
        // two shots overlapping the same invader; reverse insertion
        // order means the later shot consumes the kill
        m.shots.push(Shot { x: 11.0, y: 5.0, vy: 0.0 });
        m.shots.push(Shot { x: 12.0, y: 5.0, vy: 0.0 });
        m.collide_shots(&mut ctx);
        assert!(!m.formation.members[0].alive);
        // the earlier shot survives: its target died before its turn
        assert_eq!(m.shots.len(), 1);
        assert_eq!(m.shots[0].x, 11.0);
        assert_eq!(m.score, 10);
    }

    #[test]
    fn kill_bump_raises_speed_but_wave_entry_resets_it() {
        let mut ctx = Context::new("invaders-test");
        ctx.phase = Phase::Playing;
        let mut m = InvadersModel::new();
        let base = m.formation.speed;
        m.shots.push(Shot { x: 3.0, y: 2.5, vy: 0.0 });
        m.collide_shots(&mut ctx);
        assert!(m.formation.speed > base);
        // next wave recomputes from the level formula, discarding bumps
        m.level = 2;
        m.start_wave();
        assert_eq!(m.formation.speed, base_speed(2));
    }

    #[test]
    fn barrier_absorbs_bombs_until_destroyed() {
        let mut ctx = Context::new("invaders-test");
        ctx.phase = Phase::Playing;
        let mut m = InvadersModel::new();
        m.barriers = vec![Barrier { x: 10.0, y: 20.0, hp: 2 }];
        m.bombs.push(Shot { x: 10.5, y: 20.5, vy: 0.0 });
        m.collide_bombs(&mut ctx);
        assert_eq!(m.barriers[0].hp, 1);
        assert!(m.bombs.is_empty());
        // a spent barrier no longer blocks
        m.barriers[0].hp = 0;
        m.bombs.push(Shot { x: 10.5, y: 20.5, vy: 0.0 });
        m.collide_bombs(&mut ctx);
        assert_eq!(m.bombs.len(), 1);
    }

    #[test]
    fn reaching_the_tank_row_is_terminal() {
        let mut ctx = Context::new("invaders-test");
        ctx.phase = Phase::Playing;
        let mut m = InvadersModel::new();
        for inv in &mut m.formation.members {
            inv.alive = false;
        }
        m.formation.members[0].alive = true;
        m.formation.members[0].y = FIELD_H - 3.0;
        m.handle_auto(&mut ctx, 0.016);
        assert_eq!(ctx.phase, Phase::Over);
    }
}
