// Pixcade
// copyright pixcade contributors 2024～2026

//! A global event center and a global timer center, plus the unified
//! input Event types in event::input.
//!
//! Timers count in frames and announce expiry through the event center;
//! renders subscribe with event_register and poll with event_check. The
//! centers are thread_local: the whole engine is single-threaded and one
//! game instance runs per process.

use crate::GAME_FRAME;
use serde::Serialize;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

thread_local! {
    static GAME_TIMER: Rc<RefCell<Timers>> = Rc::new(RefCell::new(Timers::new()));
    static EVENT_CENTER: Rc<RefCell<HashMap<String, HashMap<String, bool>>>> =
        Rc::new(RefCell::new(HashMap::new()));
}

/// subscribe func to an event; flags are consumed by event_check
pub fn event_register(event: &str, func: &str) {
    EVENT_CENTER.with(|ec| {
        let mut ec_ref = ec.borrow_mut();
        match ec_ref.get_mut(event) {
            Some(ht) => {
                ht.insert(func.to_string(), false);
            }
            None => {
                let mut h: HashMap<String, bool> = HashMap::new();
                h.insert(func.to_string(), false);
                ec_ref.insert(event.to_string(), h);
            }
        }
    });
}

/// poll and consume a pending notification for func
pub fn event_check(event: &str, func: &str) -> bool {
    EVENT_CENTER.with(|ec| {
        let mut ec_ref = ec.borrow_mut();
        if let Some(ht) = ec_ref.get_mut(event) {
            if let Some(flag) = ht.get_mut(func) {
                if *flag {
                    *flag = false;
                    return true;
                }
            }
        }
        false
    })
}

/// notify every subscriber of event
pub fn event_emit(event: &str) {
    EVENT_CENTER.with(|ec| {
        let mut ec_ref = ec.borrow_mut();
        if let Some(ht) = ec_ref.get_mut(event) {
            for value in ht.values_mut() {
                if !(*value) {
                    *value = true;
                }
            }
        }
    });
}

pub fn timer_register(name: &str, time: f32, func: &str) {
    GAME_TIMER.with(|gt| {
        gt.borrow_mut().register(name, time, func);
    });
}

pub fn timer_set_time(name: &str, time: f32) {
    GAME_TIMER.with(|gt| {
        gt.borrow_mut().set_time(name, time);
    });
}

/// remaining frames of a running timer
pub fn timer_stage(name: &str) -> u32 {
    GAME_TIMER.with(|gt| gt.borrow_mut().stage(name))
}

pub fn timer_rstage(name: &str) -> u32 {
    GAME_TIMER.with(|gt| gt.borrow_mut().rstage(name))
}

pub fn timer_percent(name: &str) -> f32 {
    GAME_TIMER.with(|gt| gt.borrow_mut().percent(name))
}

pub fn timer_exdata(name: &str) -> Option<Vec<u8>> {
    GAME_TIMER.with(|gt| gt.borrow_mut().exdata(name))
}

/// start a registered timer, carrying value to the expiry subscriber
pub fn timer_fire<T>(name: &str, value: T)
where
    T: Serialize,
{
    GAME_TIMER.with(|gt| {
        gt.borrow_mut().fire(name, value);
    });
}

pub fn timer_cancel(name: &str, nocall: bool) {
    GAME_TIMER.with(|gt| {
        gt.borrow_mut().cancel(name, nocall);
    });
}

/// advance all running timers by one frame; called once per simulation
/// step and never while a game is paused
pub fn timer_update() {
    GAME_TIMER.with(|gt| {
        gt.borrow_mut().update();
    });
}

pub struct Timer {
    time: u32,
    count: u32,
    exdata: Vec<u8>,
}

#[derive(Default)]
pub struct Timers {
    pub timers: HashMap<String, Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self { ..Self::default() }
    }

    pub fn register(&mut self, name: &str, time: f32, callback: &str) {
        if self.timers.contains_key(name) {
            return;
        }
        let timer = Timer {
            time: 0,
            count: (time * GAME_FRAME as f32) as u32,
            exdata: vec![],
        };
        self.timers.insert(name.to_string(), timer);
        event_register(name, callback);
    }

    pub fn stage(&mut self, name: &str) -> u32 {
        self.timers.get(name).map_or(0, |t| t.time)
    }

    pub fn rstage(&mut self, name: &str) -> u32 {
        self.timers.get(name).map_or(0, |t| t.count - t.time)
    }

    pub fn percent(&mut self, name: &str) -> f32 {
        self.timers
            .get(name)
            .map_or(0.0, |t| t.time as f32 / t.count as f32)
    }

    pub fn set_time(&mut self, name: &str, time: f32) {
        if let Some(timer) = self.timers.get_mut(name) {
            timer.count = (time * GAME_FRAME as f32) as u32;
            // a very small time may round the count to 0 and the timer
            // could then never trigger; keep at least one frame
            if timer.count == 0 {
                timer.count = 1;
            }
        }
    }

    pub fn exdata(&mut self, name: &str) -> Option<Vec<u8>> {
        self.timers.get(name).map(|t| t.exdata.clone())
    }

    pub fn fire<T>(&mut self, name: &str, value: T)
    where
        T: Serialize,
    {
        if let Some(timer) = self.timers.get_mut(name) {
            timer.time = timer.count;
            timer.exdata = bincode::serde::encode_to_vec(&value, bincode::config::standard())
                .unwrap_or_default();
        }
    }

    pub fn cancel(&mut self, name: &str, nocall: bool) {
        if let Some(timer) = self.timers.get_mut(name) {
            timer.time = 0;
            if !nocall {
                event_emit(name);
            }
        }
    }

    pub fn update(&mut self) {
        for (name, timer) in &mut self.timers {
            if timer.time > 0 {
                timer.time -= 1;
                if timer.time == 0 {
                    event_emit(name);
                }
            }
        }
    }
}

mod input;
pub use input::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_flags_are_consumed_once() {
        event_register("ev.test", "cb");
        assert!(!event_check("ev.test", "cb"));
        event_emit("ev.test");
        assert!(event_check("ev.test", "cb"));
        assert!(!event_check("ev.test", "cb"));
    }

    #[test]
    fn timer_counts_frames_and_announces() {
        timer_register("tm.test", 1.0, "cb");
        assert_eq!(timer_stage("tm.test"), 0);
        assert_eq!(timer_rstage("tm.test"), GAME_FRAME);
        timer_fire("tm.test", 0u8);
        assert_eq!(timer_stage("tm.test"), GAME_FRAME);
        for _ in 0..GAME_FRAME {
            timer_update();
        }
        assert!(event_check("tm.test", "cb"));
    }

    #[test]
    fn timer_set_time_never_rounds_to_zero() {
        timer_register("tm.small", 1.0, "cb");
        timer_set_time("tm.small", 0.001);
        timer_fire("tm.small", 0u8);
        timer_update();
        assert!(event_check("tm.small", "cb"));
    }

    #[test]
    fn timer_cancel_without_call_stays_silent() {
        timer_register("tm.cancel", 1.0, "cb");
        timer_fire("tm.cancel", 0u8);
        timer_cancel("tm.cancel", true);
        timer_update();
        assert!(!event_check("tm.cancel", "cb"));
    }
}
