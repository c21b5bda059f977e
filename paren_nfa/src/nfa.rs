use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Range;

use log::trace;

/// A state ID in the NFA
pub type StateId = usize;

/// The character written for the empty-string literal, both in expressions
/// and in candidate strings.
pub const EPSILON_MARKER: char = '1';

/// The character written for the empty-language literal.
pub const EMPTY_LANGUAGE_MARKER: char = '0';

/// Outgoing edges of one state, grouped by label.
pub type Edges = BTreeMap<Label, Vec<StateId>>;

/// The full transition relation of an automaton.
pub type TransitionTable = BTreeMap<StateId, Edges>;

/// The label carried by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    /// Taken without consuming input
    Epsilon,
    /// Taken by consuming exactly this symbol
    Symbol(char),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Epsilon => write!(f, "ε"),
            Label::Symbol(ch) => write!(f, "'{}'", ch),
        }
    }
}

/// A state named during a construction call.
///
/// `Fresh(n)` is the n-th id minted for the construction in progress;
/// `Absorbed(id)` is an id already owned by a consumed sub-automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateRef {
    Fresh(usize),
    Absorbed(StateId),
}

/// Allocator for state ids shared by every automaton built in one session.
///
/// Ids handed out between two calls to [`Session::reset`] never repeat, so
/// transition tables built from them can be merged without renumbering.
#[derive(Debug, Default)]
pub struct Session {
    next_id: StateId,
}

impl Session {
    /// Create a session whose first id is 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session. Automata built before the reset must not be
    /// combined with automata built after it.
    pub fn reset(&mut self) {
        trace!("resetting state counter at {}", self.next_id);
        self.next_id = 0;
    }

    /// The id the next reservation will start at
    pub fn next_id(&self) -> StateId {
        self.next_id
    }

    /// Reserve `count` consecutive ids
    pub fn reserve(&mut self, count: usize) -> Range<StateId> {
        let start = self.next_id;
        self.next_id += count;
        start..self.next_id
    }
}

/// A nondeterministic finite automaton with epsilon transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    state_count: usize,
    start: StateId,
    finals: BTreeSet<StateId>,
    transitions: TransitionTable,
}

impl Automaton {
    /// Number of states this automaton accounts for, absorbed ones included
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn finals(&self) -> &BTreeSet<StateId> {
        &self.finals
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(&state)
    }

    /// True when no state accepts, i.e. the automaton recognises nothing
    pub fn is_empty_language(&self) -> bool {
        self.finals.is_empty()
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    /// Targets reachable from `state` under `label`, in insertion order
    pub fn targets(&self, state: StateId, label: Label) -> &[StateId] {
        self.transitions
            .get(&state)
            .and_then(|edges| edges.get(&label))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every id mentioned as the start, a final state or a transition endpoint
    pub fn state_ids(&self) -> BTreeSet<StateId> {
        let mut ids = BTreeSet::new();
        ids.insert(self.start);
        ids.extend(self.finals.iter().copied());
        for (&from, edges) in &self.transitions {
            ids.insert(from);
            for targets in edges.values() {
                ids.extend(targets.iter().copied());
            }
        }
        ids
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "states: {}", self.state_count)?;
        writeln!(f, "start: {}", self.start)?;
        writeln!(f, "finals: {:?}", self.finals)?;
        for (from, edges) in &self.transitions {
            for (label, targets) in edges {
                writeln!(f, "  {} --{}--> {:?}", from, label, targets)?;
            }
        }
        Ok(())
    }
}

/// The entry and exit points of an automaton whose table has been
/// absorbed into a [`Builder`].
#[derive(Debug, Clone)]
pub struct Fragment {
    pub start: StateId,
    pub finals: BTreeSet<StateId>,
}

/// An automaton under construction.
///
/// A builder owns the block of fresh ids reserved when it was created and
/// resolves [`StateRef`]s against it.
#[derive(Debug)]
pub struct Builder {
    automaton: Automaton,
    fresh: Range<StateId>,
}

impl Builder {
    /// Begin an automaton of `local_state_count` states, minting
    /// `fresh_ids_needed` new ids from the session. The start state defaults
    /// to the first fresh id (or the next unreserved id when none is minted)
    /// until [`Builder::set_start`] is called.
    pub fn new(session: &mut Session, local_state_count: usize, fresh_ids_needed: usize) -> Self {
        let fresh = session.reserve(fresh_ids_needed);
        Self {
            automaton: Automaton {
                state_count: local_state_count,
                start: fresh.start,
                finals: BTreeSet::new(),
                transitions: TransitionTable::new(),
            },
            fresh,
        }
    }

    pub fn resolve(&self, state: StateRef) -> StateId {
        match state {
            StateRef::Fresh(index) => {
                debug_assert!(
                    index < self.fresh.len(),
                    "fresh state {} outside a block of {}",
                    index,
                    self.fresh.len()
                );
                self.fresh.start + index
            }
            StateRef::Absorbed(id) => id,
        }
    }

    pub fn set_start(&mut self, state: StateRef) {
        self.automaton.start = self.resolve(state);
    }

    pub fn add_final(&mut self, state: StateRef) {
        let id = self.resolve(state);
        self.automaton.finals.insert(id);
    }

    /// Replace the accepting set wholesale
    pub fn set_finals(&mut self, finals: BTreeSet<StateId>) {
        self.automaton.finals = finals;
    }

    /// Append `to` under `(from, label)`. Duplicates are kept.
    pub fn add_transition(&mut self, from: StateRef, to: StateRef, label: Label) {
        let from = self.resolve(from);
        let to = self.resolve(to);
        self.automaton
            .transitions
            .entry(from)
            .or_default()
            .entry(label)
            .or_default()
            .push(to);
    }

    /// Remove the first `(from, label) -> to` transition, if any
    pub fn remove_transition(&mut self, from: StateRef, to: StateRef, label: Label) -> bool {
        let from = self.resolve(from);
        let to = self.resolve(to);
        let Some(edges) = self.automaton.transitions.get_mut(&from) else {
            return false;
        };
        let Some(targets) = edges.get_mut(&label) else {
            return false;
        };
        let Some(position) = targets.iter().position(|&target| target == to) else {
            return false;
        };
        targets.remove(position);
        if targets.is_empty() {
            edges.remove(&label);
        }
        if edges.is_empty() {
            self.automaton.transitions.remove(&from);
        }
        true
    }

    /// Take over the transition table of `other`, consuming it
    pub fn absorb(&mut self, other: Automaton) -> Fragment {
        for (from, edges) in other.transitions {
            let merged = self.automaton.transitions.entry(from).or_default();
            for (label, mut targets) in edges {
                merged.entry(label).or_default().append(&mut targets);
            }
        }
        Fragment {
            start: other.start,
            finals: other.finals,
        }
    }

    pub fn finish(self) -> Automaton {
        self.automaton
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_reserves_consecutive_blocks() {
        let mut session = Session::new();
        assert_eq!(session.reserve(2), 0..2);
        assert_eq!(session.reserve(0), 2..2);
        assert_eq!(session.reserve(3), 2..5);
        assert_eq!(session.next_id(), 5);

        session.reset();
        assert_eq!(session.next_id(), 0);
        assert_eq!(session.reserve(1), 0..1);
    }

    #[test]
    fn test_builder_resolves_fresh_and_absorbed() {
        let mut session = Session::new();
        session.reserve(10);

        let mut builder = Builder::new(&mut session, 2, 2);
        assert_eq!(builder.resolve(StateRef::Fresh(0)), 10);
        assert_eq!(builder.resolve(StateRef::Fresh(1)), 11);
        assert_eq!(builder.resolve(StateRef::Absorbed(3)), 3);

        builder.set_start(StateRef::Fresh(0));
        builder.add_final(StateRef::Fresh(1));
        builder.add_transition(StateRef::Fresh(0), StateRef::Fresh(1), Label::Symbol('x'));
        let nfa = builder.finish();

        assert_eq!(nfa.start(), 10);
        assert!(nfa.is_final(11));
        assert_eq!(nfa.targets(10, Label::Symbol('x')), &[11]);
        assert!(nfa.targets(10, Label::Epsilon).is_empty());
        assert!(nfa.targets(11, Label::Symbol('x')).is_empty());
    }

    #[test]
    fn test_transitions_keep_duplicates_and_order() {
        let mut session = Session::new();
        let mut builder = Builder::new(&mut session, 3, 3);
        builder.add_transition(StateRef::Fresh(0), StateRef::Fresh(2), Label::Epsilon);
        builder.add_transition(StateRef::Fresh(0), StateRef::Fresh(1), Label::Epsilon);
        builder.add_transition(StateRef::Fresh(0), StateRef::Fresh(2), Label::Epsilon);

        assert!(builder.remove_transition(StateRef::Fresh(0), StateRef::Fresh(2), Label::Epsilon));
        assert!(!builder.remove_transition(StateRef::Fresh(1), StateRef::Fresh(2), Label::Epsilon));

        let nfa = builder.finish();
        assert_eq!(nfa.targets(0, Label::Epsilon), &[1, 2]);
    }

    #[test]
    fn test_absorb_moves_table() {
        let mut session = Session::new();
        let mut inner = Builder::new(&mut session, 2, 2);
        inner.add_final(StateRef::Fresh(1));
        inner.add_transition(StateRef::Fresh(0), StateRef::Fresh(1), Label::Symbol('a'));
        let inner = inner.finish();

        let mut outer = Builder::new(&mut session, 3, 1);
        let fragment = outer.absorb(inner);
        assert_eq!(fragment.start, 0);
        assert_eq!(fragment.finals, BTreeSet::from([1]));

        outer.add_transition(StateRef::Fresh(0), StateRef::Absorbed(fragment.start), Label::Epsilon);
        let nfa = outer.finish();
        assert_eq!(nfa.start(), 2);
        assert_eq!(nfa.targets(0, Label::Symbol('a')), &[1]);
        assert_eq!(nfa.targets(2, Label::Epsilon), &[0]);
        assert_eq!(nfa.state_ids(), BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn test_display_lists_transitions() {
        let mut session = Session::new();
        let mut builder = Builder::new(&mut session, 2, 2);
        builder.add_final(StateRef::Fresh(1));
        builder.add_transition(StateRef::Fresh(0), StateRef::Fresh(1), Label::Symbol('a'));
        let dump = builder.finish().to_string();

        assert!(dump.contains("states: 2"));
        assert!(dump.contains("start: 0"));
        assert!(dump.contains("finals: {1}"));
        assert!(dump.contains("0 --'a'--> [1]"));
    }
}
