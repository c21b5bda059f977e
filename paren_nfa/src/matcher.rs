use crate::nfa::{Automaton, Label, StateId, EPSILON_MARKER};
use log::trace;
use std::collections::HashSet;

/// A backtracking matcher that runs an NFA over whole candidate strings
pub struct Matcher<'a> {
    nfa: &'a Automaton,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher for the given NFA
    pub fn new(nfa: &'a Automaton) -> Self {
        Self { nfa }
    }

    /// Check if the entire input is accepted.
    ///
    /// Every nondeterministic branch is explored depth-first, so the cost is
    /// exponential in the worst case. An `EPSILON_MARKER` character in the
    /// input may always be skipped without moving.
    pub fn is_match(&self, input: &str) -> bool {
        let chars: Vec<char> = input.chars().collect();
        let mut path = HashSet::new();
        let accepted = self.search(&chars, self.nfa.start(), 0, &mut path);
        trace!("{:?} {}", input, if accepted { "accepted" } else { "rejected" });
        accepted
    }

    /// Visit `(state, position)` unless it already lies on the current path;
    /// returning to it would be an epsilon cycle that consumed nothing.
    fn search(
        &self,
        chars: &[char],
        state: StateId,
        position: usize,
        path: &mut HashSet<(StateId, usize)>,
    ) -> bool {
        if !path.insert((state, position)) {
            trace!("epsilon cycle back to {} at {}", state, position);
            return false;
        }
        let found = self.step(chars, state, position, path);
        path.remove(&(state, position));
        found
    }

    fn step(
        &self,
        chars: &[char],
        state: StateId,
        position: usize,
        path: &mut HashSet<(StateId, usize)>,
    ) -> bool {
        let epsilon = self.nfa.targets(state, Label::Epsilon);

        // End of input: accept here or somewhere reachable without input
        if position == chars.len() {
            return self.nfa.is_final(state)
                || epsilon.iter().any(|&next| self.search(chars, next, position, path));
        }

        if epsilon.iter().any(|&next| self.search(chars, next, position, path)) {
            return true;
        }

        let current = chars[position];
        let consumed = self.nfa.targets(state, Label::Symbol(current));
        if consumed.iter().any(|&next| self.search(chars, next, position + 1, path)) {
            return true;
        }

        current == EPSILON_MARKER && self.search(chars, state, position + 1, path)
    }
}

/// Check whether `nfa` accepts the whole of `input`
pub fn accepts(nfa: &Automaton, input: &str) -> bool {
    Matcher::new(nfa).is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;
    use crate::nfa::{Builder, Session, StateRef};

    #[test]
    fn test_simple_char_match() {
        let nfa = compile("a").unwrap();
        let matcher = Matcher::new(&nfa);

        assert!(matcher.is_match("a"));
        assert!(!matcher.is_match("b"));
        assert!(!matcher.is_match(""));
        assert!(!matcher.is_match("aa"));
    }

    #[test]
    fn test_nondeterministic_choice() {
        // 0 -a-> 1, 0 -a-> 2, 2 -b-> 3; only 3 accepts
        let mut session = Session::new();
        let mut builder = Builder::new(&mut session, 4, 4);
        builder.add_transition(StateRef::Fresh(0), StateRef::Fresh(1), Label::Symbol('a'));
        builder.add_transition(StateRef::Fresh(0), StateRef::Fresh(2), Label::Symbol('a'));
        builder.add_transition(StateRef::Fresh(2), StateRef::Fresh(3), Label::Symbol('b'));
        builder.add_final(StateRef::Fresh(3));
        let nfa = builder.finish();

        assert!(accepts(&nfa, "ab"));
        assert!(!accepts(&nfa, "a"));
    }

    #[test]
    fn test_epsilon_after_end_of_input() {
        let nfa = compile("(a.1)").unwrap();
        assert!(accepts(&nfa, "a"));
        assert!(!accepts(&nfa, ""));
    }

    #[test]
    fn test_marker_in_input_is_skipped() {
        let eps = compile("1").unwrap();
        assert!(accepts(&eps, ""));
        assert!(accepts(&eps, "1"));
        assert!(accepts(&eps, "111"));

        let ab = compile("(a.b)").unwrap();
        assert!(accepts(&ab, "a1b"));
        assert!(accepts(&ab, "1ab1"));
        assert!(!accepts(&ab, "a0b"));

        let phi = compile("0").unwrap();
        assert!(!accepts(&phi, "1"));
    }

    #[test]
    fn test_epsilon_cycle_terminates() {
        // (1.1) reaches its final state only through an epsilon edge, so the
        // star closes a cycle of epsilon transitions through the hub.
        let nfa = compile("((1.1)*)").unwrap();
        assert!(accepts(&nfa, ""));
        assert!(!accepts(&nfa, "a"));

        let nfa = compile("((a+1)*)").unwrap();
        assert!(accepts(&nfa, ""));
        assert!(accepts(&nfa, "aaa"));
        assert!(!accepts(&nfa, "ab"));
    }
}
