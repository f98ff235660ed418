use crate::model::{AsteroidsModel, FIELD_H, FIELD_W};
use pixcade::{
    context::Context,
    game::Render,
    phase::Phase,
    render::panel::Panel,
    render::sprite::{Sprite, TextAlign},
    render::style::Color,
};
use std::f32::consts::TAU;

const SCREEN_W: u16 = FIELD_W as u16 + 2;
const SCREEN_H: u16 = FIELD_H as u16 + 3;

/// rock sprites are square cutouts big enough for the largest tier
const ROCK_SPRITE: u16 = 9;

/// ship glyph per heading octant, the terminal stand-in for a rotation
/// transform
const SHIP_GLYPHS: [char; 8] = ['→', '↘', '↓', '↙', '←', '↖', '↑', '↗'];

pub struct AsteroidsRender {
    pub panel: Panel,
}

impl AsteroidsRender {
    pub fn new() -> Self {
        let mut t = Panel::new();

        let mut border = Sprite::new(0, 0, SCREEN_W, FIELD_H as u16 + 2);
        border.draw_border(Color::DarkGray);
        border.set_color_str(1, 0, "ASTEROIDS", Color::Indexed(222), Color::Reset);
        t.add_sprite(border, "BORDER");

        Self { panel: t }
    }

    fn ship_glyph(angle: f32) -> char {
        let a = angle.rem_euclid(TAU);
        let octant = ((a / (TAU / 8.0)).round() as usize) % 8;
        SHIP_GLYPHS[octant]
    }

    /// one pooled sprite per rock; the field and message sprites go on
    /// top so they stay in front of the pool layer
    fn create_sprites(&mut self, _ctx: &mut Context, d: &mut AsteroidsModel) {
        self.panel
            .create_objpool_sprites(&d.rocks, ROCK_SPRITE, ROCK_SPRITE, |_bl| {});
        self.panel
            .add_sprite(Sprite::new(1, 1, FIELD_W as u16, FIELD_H as u16), "FIELD");
        self.panel
            .add_sprite(Sprite::new(0, SCREEN_H - 1, SCREEN_W, 1), "MSG");
    }

    fn draw_rocks(&mut self, d: &mut AsteroidsModel) {
        self.panel.draw_objpool(&mut d.rocks, |pl, o| {
            pl.clear();
            let r = o.obj.radius() as i32;
            let c = ROCK_SPRITE as i32 / 2;
            if r > 1 {
                pl.draw_circle(c, c, r, 'o', Color::Gray);
            } else {
                pl.set_char(c as u16, c as u16, '*', Color::Gray, Color::Reset);
            }
            let x = (1.0 + o.obj.x) as i32 - c;
            let y = (1.0 + o.obj.y) as i32 - c;
            pl.set_pos(x.max(0) as u16, y.max(0) as u16);
        });
    }

    fn draw_field(&mut self, ctx: &mut Context, d: &mut AsteroidsModel) {
        let l = self.panel.get_sprite("FIELD");
        l.clear();

        for s in &d.shots {
            l.set_char(s.x as u16, s.y as u16, '·', Color::White, Color::Reset);
        }

        if ctx.phase != Phase::Ready {
            // blink through the respawn grace window
            let visible = d.ship.invuln <= 0.0 || ctx.stage % 10 < 5;
            if visible {
                let color = if d.ship.thrusting {
                    Color::LightYellow
                } else {
                    Color::White
                };
                l.set_char(
                    d.ship.x as u16,
                    d.ship.y as u16,
                    Self::ship_glyph(d.ship.angle),
                    color,
                    Color::Reset,
                );
            }
        }
    }

    fn draw_msg(&mut self, ctx: &mut Context, d: &mut AsteroidsModel) {
        let l = self.panel.get_sprite("MSG");
        l.clear();
        l.set_color_str(
            0,
            0,
            &format!("score {}  lives {}  wave {}", d.score, d.lives, d.level),
            Color::White,
            Color::Reset,
        );
        let (text, color) = match ctx.phase {
            Phase::Ready => ("space starts", Color::LightGreen),
            Phase::Playing => ("", Color::Reset),
            Phase::Paused => ("PAUSED", Color::LightYellow),
            Phase::Over => ("GAME OVER - r restarts", Color::LightRed),
            Phase::Win => ("", Color::Reset),
        };
        if !text.is_empty() {
            l.draw_text(0, text, TextAlign::Right, color, Color::Reset);
        }
    }
}

impl Render for AsteroidsRender {
    type Model = AsteroidsModel;

    fn init(&mut self, ctx: &mut Context, data: &mut Self::Model) {
        if let Err(e) = ctx.adapter.init(SCREEN_W, SCREEN_H, "asteroids") {
            log::warn!("adapter init failed: {}", e);
        }
        self.create_sprites(ctx, data);
        self.panel.init(ctx);
    }

    fn handle_event(&mut self, _ctx: &mut Context, _data: &mut Self::Model, _dt: f32) {}
    fn handle_timer(&mut self, _ctx: &mut Context, _model: &mut Self::Model, _dt: f32) {}

    fn draw(&mut self, ctx: &mut Context, model: &mut Self::Model, _dt: f32) {
        self.draw_rocks(model);
        self.draw_field(ctx, model);
        self.draw_msg(ctx, model);
        self.panel.draw(ctx).unwrap();
    }
}
