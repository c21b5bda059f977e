//! Fully-Parenthesized Regular Expressions to Thompson NFAs
//!
//! This library validates regular expressions written over lowercase letters
//! with the literals `0` (the empty language) and `1` (the empty string),
//! where every operator sits alone inside its own pair of parentheses:
//! `(E+E)` for union, `(E.E)` for concatenation and `(E*)` for closure.
//! A valid expression is compiled into an NFA by Thompson-style
//! construction, and candidate strings are then tested against it by a
//! backtracking search over epsilon and symbol transitions.
//!
//! ```
//! use paren_nfa::{accepts, compile};
//!
//! let nfa = compile("((a+b).(c*))").unwrap();
//! assert!(accepts(&nfa, "acc"));
//! assert!(!accepts(&nfa, "ab"));
//! ```
//!
//! State ids come from a [`Session`]. Every automaton built within one
//! session gets ids of its own, which lets the construction rules glue
//! sub-automata together without renumbering.

pub mod compiler;
pub mod construct;
pub mod matcher;
pub mod nfa;
pub mod scanner;

pub use compiler::{compile, Compiler};
pub use matcher::{accepts, Matcher};
pub use nfa::{Automaton, Label, Session, StateId, StateRef};

/// The result of validating and compiling an expression
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur during compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileError {
    /// The expression is malformed: unbalanced parentheses, a group without
    /// exactly one operator of its own, a missing operand, or a character
    /// outside the expression alphabet
    Invalid,
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Invalid => write!(f, "malformed regular expression"),
        }
    }
}

impl std::error::Error for CompileError {}
