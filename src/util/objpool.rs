// Pixcade
// copyright pixcade contributors 2024～2026

//! A simple object pool for the short-lived actors every game churns
//! through (bullets, fragments, lane traffic). Recycling keeps the entity
//! collections free of stale entries: deactivating an object frees its
//! slot the same step.
//!
//! render::panel provides create_objpool_sprites and draw_objpool to bind
//! pooled objects to sprites.

use std::collections::HashMap;

/// pooled game object interface; reset re-initializes a recycled slot
pub trait GObj {
    fn new() -> Self;
    fn reset(&mut self, otype: u8, args: &[f32]);
}

/// pool entry; id is the slot index, used to identify the object.
/// To recycle an object, simply set the active flag to false.
pub struct GameObject<T>
where
    T: GObj,
{
    pub id: usize,
    pub obj: T,
    pub active: bool,
}

/// The pool itself. map keeps the object-id to sprite-id binding used by
/// panel::draw_objpool; prefix names the sprites of this pool.
pub struct GameObjPool<T>
where
    T: GObj,
{
    pub map: HashMap<usize, usize>,
    pub pool: Vec<GameObject<T>>,
    pub prefix: String,
    pub max_count: usize,
}

impl<T> GameObjPool<T>
where
    T: GObj,
{
    pub fn new(pre: &str, mc: usize) -> Self {
        Self {
            map: HashMap::new(),
            pool: vec![],
            prefix: pre.to_string(),
            max_count: mc,
        }
    }

    /// activate a recycled slot or grow the pool, returns the slot id
    pub fn create(&mut self, otype: u8, args: &[f32]) -> usize {
        for o in &mut self.pool {
            if !o.active {
                o.obj.reset(otype, args);
                o.active = true;
                return o.id;
            }
        }
        let l = self.pool.len();
        let mut bo = T::new();
        bo.reset(otype, args);
        self.pool.push(GameObject {
            id: l,
            obj: bo,
            active: true,
        });
        l
    }

    /// run a closure over every active object
    pub fn update_active<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut GameObject<T>),
    {
        for o in self.pool.iter_mut().filter(|o| o.active) {
            f(o);
        }
    }

    pub fn count_active(&self) -> usize {
        self.pool.iter().filter(|o| o.active).count()
    }

    /// deactivate everything, e.g. on wave or life reset
    pub fn clear(&mut self) {
        for o in &mut self.pool {
            o.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Dot {
        t: u8,
        x: f32,
    }

    impl GObj for Dot {
        fn new() -> Self {
            Default::default()
        }
        fn reset(&mut self, t: u8, args: &[f32]) {
            self.t = t;
            self.x = args.first().copied().unwrap_or(0.0);
        }
    }

    #[test]
    fn create_recycles_inactive_slots() {
        let mut p: GameObjPool<Dot> = GameObjPool::new("dot", 8);
        let a = p.create(1, &[1.0]);
        let b = p.create(2, &[2.0]);
        assert_eq!((a, b), (0, 1));
        p.pool[0].active = false;
        let c = p.create(3, &[3.0]);
        assert_eq!(c, 0);
        assert_eq!(p.pool[0].obj.t, 3);
        assert_eq!(p.pool.len(), 2);
    }

    #[test]
    fn clear_and_count() {
        let mut p: GameObjPool<Dot> = GameObjPool::new("dot", 8);
        p.create(0, &[]);
        p.create(0, &[]);
        assert_eq!(p.count_active(), 2);
        p.clear();
        assert_eq!(p.count_active(), 0);
    }
}
