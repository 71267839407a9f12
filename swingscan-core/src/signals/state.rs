//! FLAT/LONG position replay.
//!
//! The state is rebuilt from the first bar on every evaluation. Exit is only
//! consulted while LONG, so a bar where entry and exit both hold while FLAT
//! opens a position.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionState {
    #[default]
    Flat,
    Long,
}

impl PositionState {
    pub fn is_open(self) -> bool {
        self == PositionState::Long
    }
}

/// What a single step did to the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    #[default]
    Unchanged,
    Opened,
    Closed,
}

/// One bar of the state machine.
pub fn step(state: PositionState, entry: bool, exit: bool) -> (PositionState, Transition) {
    match state {
        PositionState::Flat if entry => (PositionState::Long, Transition::Opened),
        PositionState::Long if exit => (PositionState::Flat, Transition::Closed),
        s => (s, Transition::Unchanged),
    }
}

/// Per-bar states and transitions from a full replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replay {
    pub states: Vec<PositionState>,
    pub transitions: Vec<Transition>,
}

impl Replay {
    pub fn last_state(&self) -> PositionState {
        self.states.last().copied().unwrap_or_default()
    }

    pub fn last_transition(&self) -> Transition {
        self.transitions.last().copied().unwrap_or_default()
    }
}

/// Replay entry/exit flags from FLAT. Slices are read pairwise up to the shorter one.
pub fn replay(entries: &[bool], exits: &[bool]) -> Replay {
    let mut state = PositionState::Flat;
    let mut out = Replay {
        states: Vec::with_capacity(entries.len()),
        transitions: Vec::with_capacity(entries.len()),
    };

    for (&entry, &exit) in entries.iter().zip(exits) {
        let (next, transition) = step(state, entry, exit);
        state = next;
        out.states.push(next);
        out.transitions.push(transition);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use PositionState::{Flat, Long};

    #[test]
    fn step_table() {
        assert_eq!(step(Flat, true, false), (Long, Transition::Opened));
        assert_eq!(step(Flat, false, true), (Flat, Transition::Unchanged));
        assert_eq!(step(Flat, true, true), (Long, Transition::Opened));
        assert_eq!(step(Long, true, false), (Long, Transition::Unchanged));
        assert_eq!(step(Long, false, true), (Flat, Transition::Closed));
        assert_eq!(step(Long, true, true), (Flat, Transition::Closed));
    }

    #[test]
    fn replay_opens_once_until_exit() {
        let entries = [false, true, true, false, true];
        let exits = [false, false, false, true, false];
        let r = replay(&entries, &exits);
        assert_eq!(r.states, vec![Flat, Long, Long, Flat, Long]);
        assert_eq!(
            r.transitions,
            vec![
                Transition::Unchanged,
                Transition::Opened,
                Transition::Unchanged,
                Transition::Closed,
                Transition::Opened,
            ]
        );
        assert_eq!(r.last_state(), Long);
        assert_eq!(r.last_transition(), Transition::Opened);
    }

    #[test]
    fn empty_replay_is_flat() {
        let r = replay(&[], &[]);
        assert_eq!(r.last_state(), Flat);
        assert_eq!(r.last_transition(), Transition::Unchanged);
    }
}
