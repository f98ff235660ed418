// Pixcade
// copyright pixcade contributors 2024～2026

//! The phase machine every game shares: Ready accepts a start, Playing is
//! the only phase in which simulation runs, Playing and Paused are fully
//! reversible, Over and Win are terminal and accept only a restart.
//! Actions that are not valid for the current phase leave it unchanged.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Ready,
    Playing,
    Paused,
    Over,
    Win,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Start,
    PauseToggle,
    Lose,
    Win,
    Restart,
}

impl Phase {
    /// the transition table; every pair not listed is a no-op
    pub fn apply(self, ev: PhaseEvent) -> Phase {
        match (self, ev) {
            (Phase::Ready, PhaseEvent::Start) => Phase::Playing,
            (Phase::Playing, PhaseEvent::PauseToggle) => Phase::Paused,
            (Phase::Paused, PhaseEvent::PauseToggle) => Phase::Playing,
            (Phase::Playing, PhaseEvent::Lose) => Phase::Over,
            (Phase::Playing, PhaseEvent::Win) => Phase::Win,
            (Phase::Over, PhaseEvent::Restart) | (Phase::Win, PhaseEvent::Restart) => {
                Phase::Playing
            }
            _ => self,
        }
    }

    /// true only while simulation (movement, timers, collisions) runs
    pub fn is_running(self) -> bool {
        self == Phase::Playing
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Over | Phase::Win)
    }
}

#[cfg(test)]
mod tests {
    use super::Phase::{self, Over, Paused, Playing, Ready};
    use super::PhaseEvent::{Lose, PauseToggle, Restart, Start};

    #[test]
    fn happy_path() {
        let p = Ready.apply(Start);
        assert_eq!(p, Playing);
        assert_eq!(p.apply(Lose), Over);
        assert_eq!(Over.apply(Restart), Playing);
    }

    #[test]
    fn pause_is_the_only_reversible_pair() {
        assert_eq!(Playing.apply(PauseToggle), Paused);
        assert_eq!(Paused.apply(PauseToggle), Playing);
        // paused can not lose, win or restart
        assert_eq!(Paused.apply(Lose), Paused);
        assert_eq!(Paused.apply(super::PhaseEvent::Win), Paused);
        assert_eq!(Paused.apply(Restart), Paused);
    }

    #[test]
    fn terminal_phases_accept_only_restart() {
        for t in [Over, Phase::Win] {
            assert_eq!(t.apply(Start), t);
            assert_eq!(t.apply(PauseToggle), t);
            assert_eq!(t.apply(Lose), t);
            assert_eq!(t.apply(Restart), Playing);
            assert!(t.is_terminal());
        }
    }

    #[test]
    fn ready_ignores_everything_but_start() {
        assert_eq!(Ready.apply(PauseToggle), Ready);
        assert_eq!(Ready.apply(Lose), Ready);
        assert_eq!(Ready.apply(Restart), Ready);
        assert!(!Ready.is_running());
        assert!(Playing.is_running());
    }
}
