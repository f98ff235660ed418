use itertools::iproduct;
use log::info;
use pixcade::{
    audio::Cue,
    context::Context,
    event::{Event, KeyCode, KeyEventKind},
    game::Model,
    phase::{Phase, PhaseEvent},
    util::aabb_hit,
};

pub const FIELD_W: f32 = 60.0;
pub const FIELD_H: f32 = 24.0;

pub const PADDLE_W: f32 = 10.0;
const PADDLE_SPEED: f32 = 34.0;

pub const BRICK_ROWS: usize = 6;
pub const BRICK_COLS: usize = 9;
pub const BRICK_W: f32 = 6.0;
pub const BRICK_H: f32 = 1.0;

/// ball speed per level, a fixed per-level increment
pub fn ball_speed(level: u32) -> f32 {
    18.0 + 2.0 * (level.saturating_sub(1)) as f32
}

#[derive(Debug, Clone, Copy)]
pub struct Brick {
    pub x: f32,
    pub y: f32,
    pub hp: u8,
    pub points: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub attached: bool,
}

fn build_bricks() -> Vec<Brick> {
    // top two rows take two hits; higher rows pay more
    iproduct!(0..BRICK_ROWS, 0..BRICK_COLS)
        .map(|(row, col)| Brick {
            x: 3.0 + col as f32 * (BRICK_W + 0.0),
            y: 2.0 + row as f32 * BRICK_H,
            hp: if row < 2 { 2 } else { 1 },
            points: (BRICK_ROWS - row) as u64 * 10,
        })
        .collect()
}

pub struct BreakoutModel {
    pub paddle_x: f32,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
}

impl BreakoutModel {
    pub fn new() -> Self {
        Self {
            paddle_x: (FIELD_W - PADDLE_W) / 2.0,
            ball: Ball {
                x: 0.0,
                y: 0.0,
                vx: 0.0,
                vy: 0.0,
                attached: true,
            },
            bricks: build_bricks(),
            score: 0,
            lives: 3,
            level: 1,
        }
    }

    fn reset(&mut self) {
        self.score = 0;
        self.lives = 3;
        self.level = 1;
        self.bricks = build_bricks();
        self.paddle_x = (FIELD_W - PADDLE_W) / 2.0;
        self.attach_ball();
    }

    fn paddle_y(&self) -> f32 {
        FIELD_H - 2.0
    }

    fn attach_ball(&mut self) {
        self.ball.attached = true;
        self.ball.vx = 0.0;
        self.ball.vy = 0.0;
    }

    fn launch(&mut self, ctx: &mut Context) {
        if !self.ball.attached {
            return;
        }
        let speed = ball_speed(self.level);
        self.ball.attached = false;
        self.ball.vx = speed * 0.4;
        self.ball.vy = -speed * 0.8;
        ctx.play(Cue::Shoot);
    }

    /// reflect-with-flip at the side and top walls
    fn bounce_walls(&mut self, ctx: &mut Context) {
        let b = &mut self.ball;
        if b.x <= 0.0 {
            b.x = 0.0;
            b.vx = b.vx.abs();
            ctx.play(Cue::Move);
        } else if b.x >= FIELD_W - 1.0 {
            b.x = FIELD_W - 1.0;
            b.vx = -b.vx.abs();
            ctx.play(Cue::Move);
        }
        if b.y <= 0.0 {
            b.y = 0.0;
            b.vy = b.vy.abs();
            ctx.play(Cue::Move);
        }
    }

    /// paddle bounce with the hit offset steering the rebound angle
    fn bounce_paddle(&mut self, ctx: &mut Context) {
        let (py, b) = (self.paddle_y(), &mut self.ball);
        if b.vy > 0.0
            && aabb_hit(b.x, b.y, 1.0, 1.0, self.paddle_x, py, PADDLE_W, 1.0)
        {
            let speed = ball_speed(self.level);
            let center = self.paddle_x + PADDLE_W / 2.0;
            let offset = ((b.x + 0.5 - center) / (PADDLE_W / 2.0)).clamp(-1.0, 1.0);
            b.vy = -b.vy.abs();
            b.vx = offset * speed * 0.8;
            ctx.play(Cue::Move);
        }
    }

    /// at most one brick reacts per step: the first overlapping brick in
    /// storage order absorbs the hit and flips the ball vertically
    fn hit_brick(&mut self, ctx: &mut Context) {
        let b = self.ball;
        for brick in self.bricks.iter_mut() {
            if brick.hp > 0
                && aabb_hit(b.x, b.y, 1.0, 1.0, brick.x, brick.y, BRICK_W, BRICK_H)
            {
                brick.hp -= 1;
                if brick.hp == 0 {
                    self.score += brick.points;
                }
                self.ball.vy = -self.ball.vy;
                ctx.play(Cue::Hit);
                break;
            }
        }
    }

    fn lose_ball(&mut self, ctx: &mut Context) {
        self.lives = self.lives.saturating_sub(1);
        ctx.play(Cue::Explosion);
        if self.lives == 0 {
            info!("out of balls, score {}", self.score);
            ctx.phase_event(PhaseEvent::Lose);
            ctx.play(Cue::GameOver);
        } else {
            self.attach_ball();
        }
    }

    fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| b.hp > 0).count()
    }
}

impl Model for BreakoutModel {
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
                    KeyCode::Char(' ') => self.launch(ctx),
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
        // paddle clamps to the field
        let mut vx = 0.0;
        if ctx.input.is_held(KeyCode::Left) || ctx.input.is_held(KeyCode::Char('a')) {
            vx -= PADDLE_SPEED;
        }
        if ctx.input.is_held(KeyCode::Right) || ctx.input.is_held(KeyCode::Char('d')) {
            vx += PADDLE_SPEED;
        }
        self.paddle_x = (self.paddle_x + vx * dt).clamp(0.0, FIELD_W - PADDLE_W);

        if self.ball.attached {
            // serve position rides the paddle center
            self.ball.x = self.paddle_x + PADDLE_W / 2.0;
            self.ball.y = self.paddle_y() - 1.0;
            return;
        }

        self.ball.x += self.ball.vx * dt;
        self.ball.y += self.ball.vy * dt;

        self.bounce_walls(ctx);
        self.bounce_paddle(ctx);
        self.hit_brick(ctx);

        if self.ball.y >= FIELD_H {
            self.lose_ball(ctx);
            return;
        }

        if self.bricks_left() == 0 {
            self.level += 1;
            self.bricks = build_bricks();
            self.attach_ball();
            ctx.play(Cue::LevelUp);
        }
    }

    fn handle_event(&mut self, _ctx: &mut Context, _dt: f32) {}
    fn handle_timer(&mut self, _ctx: &mut Context, _dt: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> (Context, BreakoutModel) {
        let mut ctx = Context::new("breakout-test");
        ctx.phase = Phase::Playing;
        let mut m = BreakoutModel::new();
        m.reset();
        (ctx, m)
    }

    #[test]
    fn side_walls_reflect_with_direction_flip() {
        let (mut ctx, mut m) = playing();
        m.ball = Ball { x: -0.5, y: 10.0, vx: -5.0, vy: 3.0, attached: false };
        m.bounce_walls(&mut ctx);
        assert!(m.ball.vx > 0.0);
        assert_eq!(m.ball.x, 0.0);
        m.ball = Ball { x: FIELD_W, y: 10.0, vx: 5.0, vy: 3.0, attached: false };
        m.bounce_walls(&mut ctx);
        assert!(m.ball.vx < 0.0);
        // vertical speed untouched by side walls
        assert_eq!(m.ball.vy, 3.0);
    }

    #[test]
    fn paddle_clamps_to_bounds() {
        let (mut ctx, mut m) = playing();
        m.paddle_x = 1.0;
        ctx.input.apply(&Event::Key(pixcade::event::KeyEvent::new(
            KeyCode::Left,
            pixcade::event::KeyModifiers::NONE,
        )));
        for _ in 0..60 {
            m.handle_auto(&mut ctx, 0.05);
        }
        assert_eq!(m.paddle_x, 0.0);
    }

    #[test]
    fn one_brick_reacts_per_step() {
        let (mut ctx, mut m) = playing();
        // aim the ball into the brick rows: overlapping the first two
        // bricks of row 0 at once
        m.ball = Ball { x: 8.5, y: 2.2, vx: 0.0, vy: -4.0, attached: false };
        let before: u8 = m.bricks.iter().map(|b| b.hp).sum();
        m.hit_brick(&mut ctx);
        let after: u8 = m.bricks.iter().map(|b| b.hp).sum();
        assert_eq!(before - after, 1);
        assert!(m.ball.vy > 0.0);
    }

    #[test]
    fn two_hit_bricks_pay_only_when_destroyed() {
        let (mut ctx, mut m) = playing();
        m.bricks = vec![Brick { x: 10.0, y: 5.0, hp: 2, points: 50 }];
        m.ball = Ball { x: 11.0, y: 5.0, vx: 0.0, vy: -4.0, attached: false };
        m.hit_brick(&mut ctx);
        assert_eq!(m.score, 0);
        assert_eq!(m.bricks[0].hp, 1);
        m.ball.vy = -4.0;
        m.hit_brick(&mut ctx);
        assert_eq!(m.score, 50);
    }

    #[test]
    fn bottom_exit_costs_a_life_and_reattaches() {
        let (mut ctx, mut m) = playing();
        m.ball = Ball { x: 30.0, y: FIELD_H + 1.0, vx: 0.0, vy: 5.0, attached: false };
        m.handle_auto(&mut ctx, 0.016);
        assert_eq!(m.lives, 2);
        assert!(m.ball.attached);
        assert_eq!(ctx.phase, Phase::Playing);
        // last life ends the game
        m.lives = 1;
        m.ball = Ball { x: 30.0, y: FIELD_H + 1.0, vx: 0.0, vy: 5.0, attached: false };
        m.handle_auto(&mut ctx, 0.016);
        assert_eq!(ctx.phase, Phase::Over);
    }

    #[test]
    fn clearing_the_wall_levels_up() {
        let (mut ctx, mut m) = playing();
        for b in &mut m.bricks {
            b.hp = 0;
        }
        m.ball = Ball { x: 30.0, y: 12.0, vx: 1.0, vy: 1.0, attached: false };
        m.handle_auto(&mut ctx, 0.016);
        assert_eq!(m.level, 2);
        assert!(m.ball.attached);
        assert_eq!(m.bricks_left(), BRICK_ROWS * BRICK_COLS);
        assert!(ball_speed(2) > ball_speed(1));
    }
}
