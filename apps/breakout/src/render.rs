use crate::model::{BreakoutModel, BRICK_W, FIELD_H, FIELD_W, PADDLE_W};
use pixcade::{
    context::Context,
    game::Render,
    phase::Phase,
    render::panel::Panel,
    render::sprite::{Sprite, TextAlign},
    render::style::Color,
};

const SCREEN_W: u16 = FIELD_W as u16 + 2;
const SCREEN_H: u16 = FIELD_H as u16 + 3;

const ROW_COLORS: [Color; 6] = [
    Color::LightRed,
    Color::LightMagenta,
    Color::LightYellow,
    Color::LightGreen,
    Color::LightCyan,
    Color::LightBlue,
];

pub struct BreakoutRender {
    pub panel: Panel,
}

impl BreakoutRender {
    pub fn new() -> Self {
        let mut t = Panel::new();

        let mut border = Sprite::new(0, 0, SCREEN_W, FIELD_H as u16 + 2);
        border.draw_border(Color::DarkGray);
        border.set_color_str(1, 0, "BREAKOUT", Color::Indexed(222), Color::Reset);
        t.add_sprite(border, "BORDER");
        t.add_sprite(Sprite::new(1, 1, FIELD_W as u16, FIELD_H as u16), "FIELD");
        t.add_sprite(Sprite::new(0, SCREEN_H - 1, SCREEN_W, 1), "MSG");

        Self { panel: t }
    }

    fn draw_field(&mut self, ctx: &mut Context, d: &mut BreakoutModel) {
        let l = self.panel.get_sprite("FIELD");
        l.clear();

        for brick in d.bricks.iter().filter(|b| b.hp > 0) {
            let row = (brick.y - 2.0) as usize;
            let glyph = if brick.hp > 1 { '▓' } else { '▒' };
            for i in 0..BRICK_W as u16 {
                l.set_char(
                    brick.x as u16 + i,
                    brick.y as u16,
                    glyph,
                    ROW_COLORS[row % ROW_COLORS.len()],
                    Color::Reset,
                );
            }
        }

        if ctx.phase != Phase::Ready {
            for i in 0..PADDLE_W as u16 {
                l.set_char(
                    d.paddle_x as u16 + i,
                    (FIELD_H - 2.0) as u16,
                    '▀',
                    Color::White,
                    Color::Reset,
                );
            }
            l.set_char(
                d.ball.x as u16,
                d.ball.y as u16,
                '●',
                Color::LightYellow,
                Color::Reset,
            );
        }
    }

    fn draw_msg(&mut self, ctx: &mut Context, d: &mut BreakoutModel) {
        let l = self.panel.get_sprite("MSG");
        l.clear();
        l.set_color_str(
            0,
            0,
            &format!("score {}  lives {}  level {}", d.score, d.lives, d.level),
            Color::White,
            Color::Reset,
        );
        let (text, color) = match ctx.phase {
            Phase::Ready => ("space starts", Color::LightGreen),
            Phase::Playing => {
                if d.ball.attached {
                    ("space serves", Color::LightGreen)
                } else {
                    ("", Color::Reset)
                }
            }
            Phase::Paused => ("PAUSED", Color::LightYellow),
            Phase::Over => ("GAME OVER - r restarts", Color::LightRed),
            Phase::Win => ("", Color::Reset),
        };
        if !text.is_empty() {
            l.draw_text(0, text, TextAlign::Right, color, Color::Reset);
        }
    }
}

impl Render for BreakoutRender {
    type Model = BreakoutModel;

    fn init(&mut self, ctx: &mut Context, _data: &mut Self::Model) {
        if let Err(e) = ctx.adapter.init(SCREEN_W, SCREEN_H, "breakout") {
            log::warn!("adapter init failed: {}", e);
        }
        self.panel.init(ctx);
    }

    fn handle_event(&mut self, _ctx: &mut Context, _data: &mut Self::Model, _dt: f32) {}
    fn handle_timer(&mut self, _ctx: &mut Context, _model: &mut Self::Model, _dt: f32) {}

    fn draw(&mut self, ctx: &mut Context, model: &mut Self::Model, _dt: f32) {
        self.draw_field(ctx, model);
        self.draw_msg(ctx, model);
        self.panel.draw(ctx).unwrap();
    }
}
