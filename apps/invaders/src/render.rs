use crate::model::{InvadersModel, FIELD_H, FIELD_W};
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

const TIER_COLORS: [Color; 3] = [Color::LightGreen, Color::LightCyan, Color::LightMagenta];

pub struct InvadersRender {
    pub panel: Panel,
}

impl InvadersRender {
    pub fn new() -> Self {
        let mut t = Panel::new();

        let mut border = Sprite::new(0, 0, SCREEN_W, FIELD_H as u16 + 2);
        border.draw_border(Color::DarkGray);
        border.set_color_str(1, 0, "INVADERS", Color::Indexed(222), Color::Reset);
        t.add_sprite(border, "BORDER");
        t.add_sprite(Sprite::new(1, 1, FIELD_W as u16, FIELD_H as u16), "FIELD");
        t.add_sprite(Sprite::new(0, SCREEN_H - 1, SCREEN_W, 1), "MSG");

        Self { panel: t }
    }

    fn draw_field(&mut self, ctx: &mut Context, d: &mut InvadersModel) {
        let l = self.panel.get_sprite("FIELD");
        l.clear();

        for m in d.formation.members.iter().filter(|m| m.alive) {
            let glyph = if m.frame { "/^\\" } else { "|^|" };
            l.set_color_str(
                m.x as u16,
                m.y as u16,
                glyph,
                TIER_COLORS[m.kind as usize % TIER_COLORS.len()],
                Color::Reset,
            );
        }

        for b in d.barriers.iter().filter(|b| b.hp > 0) {
            let ch = match b.hp {
                1 => '░',
                2 => '▒',
                3 => '▓',
                _ => '█',
            };
            l.set_char(b.x as u16, b.y as u16, ch, Color::Green, Color::Reset);
        }

        for s in &d.shots {
            l.set_char(s.x as u16, s.y as u16, '|', Color::White, Color::Reset);
        }
        for s in &d.bombs {
            l.set_char(s.x as u16, s.y as u16, '!', Color::LightRed, Color::Reset);
        }

        if ctx.phase != Phase::Ready {
            l.set_color_str(
                d.tank_x as u16,
                (FIELD_H - 2.0) as u16,
                "▄█▄",
                Color::LightYellow,
                Color::Reset,
            );
        }
    }

    fn draw_msg(&mut self, ctx: &mut Context, d: &mut InvadersModel) {
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
            Phase::Win => ("YOU WIN", Color::LightGreen),
        };
        if !text.is_empty() {
            l.draw_text(0, text, TextAlign::Right, color, Color::Reset);
        }
    }
}

impl Render for InvadersRender {
    type Model = InvadersModel;

    fn init(&mut self, ctx: &mut Context, _data: &mut Self::Model) {
        if let Err(e) = ctx.adapter.init(SCREEN_W, SCREEN_H, "invaders") {
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
