// Pixcade
// copyright pixcade contributors 2024～2026

//! Panel composites tagged sprites into a double buffer and flushes the
//! diff through the adapter. Sprites draw in insertion order, so a late
//! overlay sprite (pause banner, game-over text) covers the play field.
//!
//! creat-/draw_objpool bind pooled game objects to pooled sprites, one
//! sprite per live object, recycled exactly like the objects themselves.

use crate::{
    context::Context,
    render::{buffer::Buffer, sprite::Sprite},
    util::objpool::{GObj, GameObjPool, GameObject},
};
use log::info;
use std::{collections::HashMap, io};

pub struct Panel {
    pub buffers: [Buffer; 2],
    pub current: usize,
    pub tag_index: HashMap<String, usize>,
    pub sprites: Vec<Sprite>,
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel {
    pub fn new() -> Self {
        Panel {
            buffers: [Buffer::default(), Buffer::default()],
            current: 0,
            tag_index: HashMap::new(),
            sprites: vec![],
        }
    }

    /// size the double buffer to the adapter's screen area
    pub fn init(&mut self, ctx: &mut Context) {
        let size = ctx.adapter.size();
        self.buffers[0].resize(size);
        self.buffers[1].resize(size);
        info!("panel init size...{:?}", size);
    }

    pub fn add_sprite(&mut self, sp: Sprite, tag: &str) {
        self.tag_index.insert(tag.to_string(), self.sprites.len());
        self.sprites.push(sp);
    }

    /// panics on an unknown tag: sprite tags are fixed at init time and a
    /// miss is a programming error, not a runtime condition
    pub fn get_sprite(&mut self, tag: &str) -> &mut Sprite {
        let idx = self.tag_index[tag];
        &mut self.sprites[idx]
    }

    pub fn reset(&mut self, ctx: &mut Context) {
        ctx.adapter.reset();
    }

    pub fn draw(&mut self, ctx: &mut Context) -> io::Result<()> {
        for sp in &self.sprites {
            if !sp.is_hidden() {
                let (x, y) = (sp.content.area.x, sp.content.area.y);
                self.buffers[self.current].merge_at(x, y, &sp.content);
            }
        }
        let cb = &self.buffers[self.current];
        let pb = &self.buffers[1 - self.current];
        if let Err(e) = ctx.adapter.draw_all(cb, pb) {
            log::warn!("draw_all failed: {}", e);
        }
        let _ = ctx.adapter.hide_cursor();

        // Swap buffers
        self.buffers[1 - self.current].reset();
        self.current = 1 - self.current;
        Ok(())
    }

    /// create max_count hidden sprites for a pool and call f to init each
    pub fn create_objpool_sprites<T, F>(
        &mut self,
        pool: &GameObjPool<T>,
        size_x: u16,
        size_y: u16,
        mut f: F,
    ) where
        T: GObj,
        F: FnMut(&mut Sprite),
    {
        for i in 0..pool.max_count {
            let mut bl = Sprite::new(0, 0, size_x, size_y);
            f(&mut bl);
            bl.set_hidden(true);
            self.add_sprite(bl, &format!("{}{}", &pool.prefix, i));
        }
    }

    /// bind each active pooled object to a sprite and call f to draw it;
    /// sprites of deactivated objects are hidden and recycled
    pub fn draw_objpool<T, F>(&mut self, os: &mut GameObjPool<T>, mut f: F)
    where
        T: GObj,
        F: FnMut(&mut Sprite, &GameObject<T>),
    {
        for o in &os.pool {
            if !o.active {
                if let Some(oid) = os.map.remove(&o.id) {
                    self.get_sprite(&format!("{}{}", os.prefix, oid))
                        .set_hidden(true);
                }
                continue;
            }
            let psid = match os.map.get(&o.id) {
                Some(oid) => *oid,
                _ => {
                    let mut mi = 0;
                    for i in 0..os.max_count {
                        let pp = self.get_sprite(&format!("{}{}", os.prefix, i));
                        if pp.is_hidden() {
                            mi = i;
                            break;
                        }
                    }
                    os.map.insert(o.id, mi);
                    mi
                }
            };
            let pl = self.get_sprite(&format!("{}{}", os.prefix, psid));
            pl.set_hidden(false);
            f(pl, o);
        }
    }
}
