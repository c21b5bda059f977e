//! Thompson-style construction rules.
//!
//! Every rule mints its own states from the [`Session`] and takes the
//! automata it combines by value: their transition tables move into the
//! result, so a sub-automaton cannot be reused once it has been glued in.

use crate::nfa::{Automaton, Builder, Label, Session, StateRef, EMPTY_LANGUAGE_MARKER, EPSILON_MARKER};
use StateRef::{Absorbed, Fresh};

/// Build the automaton for a one-character expression, if it is one of
/// the base literals.
pub fn base(session: &mut Session, ch: char) -> Option<Automaton> {
    match ch {
        EMPTY_LANGUAGE_MARKER => Some(empty_language(session)),
        EPSILON_MARKER => Some(empty_string(session)),
        ch if ch.is_ascii_lowercase() => Some(literal(session, ch)),
        _ => None,
    }
}

/// Two states joined by `symbol`
pub fn literal(session: &mut Session, symbol: char) -> Automaton {
    let mut builder = Builder::new(session, 2, 2);
    builder.set_start(Fresh(0));
    builder.add_final(Fresh(1));
    builder.add_transition(Fresh(0), Fresh(1), Label::Symbol(symbol));
    builder.finish()
}

/// A lone non-accepting state
pub fn empty_language(session: &mut Session) -> Automaton {
    let mut builder = Builder::new(session, 1, 1);
    builder.set_start(Fresh(0));
    builder.finish()
}

/// A lone accepting state
pub fn empty_string(session: &mut Session) -> Automaton {
    let mut builder = Builder::new(session, 1, 1);
    builder.set_start(Fresh(0));
    builder.add_final(Fresh(0));
    builder.finish()
}

/// Kleene closure.
///
/// The inner start state becomes the only accepting state. Every inner final
/// state feeds a fresh hub state, which loops back to the start. When the
/// inner start is already accepting, its own edge into the hub is dropped.
pub fn star(session: &mut Session, inner: Automaton) -> Automaton {
    let mut builder = Builder::new(session, inner.state_count() + 1, 1);
    let hub = Fresh(0);
    let inner = builder.absorb(inner);
    let start = Absorbed(inner.start);

    builder.set_start(start);
    builder.add_final(start);

    for &state in &inner.finals {
        builder.add_transition(Absorbed(state), hub, Label::Epsilon);
    }
    if inner.finals.contains(&inner.start) {
        builder.remove_transition(start, hub, Label::Epsilon);
    }

    builder.add_transition(hub, start, Label::Epsilon);
    builder.finish()
}

/// `left` followed by `right`
pub fn concat(session: &mut Session, left: Automaton, right: Automaton) -> Automaton {
    let mut builder = Builder::new(session, left.state_count() + right.state_count(), 0);
    let left = builder.absorb(left);
    let right = builder.absorb(right);

    builder.set_start(Absorbed(left.start));
    builder.set_finals(right.finals);
    for &state in &left.finals {
        builder.add_transition(Absorbed(state), Absorbed(right.start), Label::Epsilon);
    }
    builder.finish()
}

/// `left` or `right`, entered through a fresh hub state
pub fn union(session: &mut Session, left: Automaton, right: Automaton) -> Automaton {
    let mut builder = Builder::new(session, left.state_count() + right.state_count() + 1, 1);
    let hub = Fresh(0);
    let left = builder.absorb(left);
    let right = builder.absorb(right);

    builder.set_start(hub);
    builder.set_finals(left.finals.union(&right.finals).copied().collect());
    builder.add_transition(hub, Absorbed(left.start), Label::Epsilon);
    builder.add_transition(hub, Absorbed(right.start), Label::Epsilon);
    builder.finish()
}
