use std::ops::Range;

use log::{debug, trace};

use crate::construct;
use crate::nfa::{Automaton, Session};
use crate::scanner::{self, Operator, OperatorMap};
use crate::{CompileError, CompileResult};

/// Compiler that validates a fully-parenthesized expression and builds its NFA
pub struct Compiler<'s> {
    session: &'s mut Session,
}

/// The scanned expression being compiled
struct Source<'e> {
    chars: &'e [char],
    operators: &'e OperatorMap,
}

impl<'s> Compiler<'s> {
    /// Create a compiler drawing state ids from `session`
    pub fn new(session: &'s mut Session) -> Self {
        Self { session }
    }

    /// Validate `expression` and compile it to an NFA
    pub fn compile(mut self, expression: &str) -> CompileResult<Automaton> {
        let chars: Vec<char> = expression.chars().collect();
        let operators = scanner::scan(&chars)?;
        let source = Source {
            chars: &chars,
            operators: &operators,
        };

        let nfa = self.compile_range(&source, 0..chars.len())?;
        debug!(
            "compiled {:?} into {} states (start {}, {} final)",
            expression,
            nfa.state_count(),
            nfa.start(),
            nfa.finals().len()
        );
        Ok(nfa)
    }

    /// Compile the sub-expression occupying `range`
    fn compile_range(&mut self, source: &Source<'_>, range: Range<usize>) -> CompileResult<Automaton> {
        if range.is_empty() {
            trace!("empty operand at {}", range.start);
            return Err(CompileError::Invalid);
        }

        if range.len() == 1 {
            let ch = source.chars[range.start];
            return construct::base(self.session, ch).ok_or_else(|| {
                trace!("{:?} at {} is not a literal", ch, range.start);
                CompileError::Invalid
            });
        }

        let Some(op_index) = source.operators.operator_for(range.start) else {
            trace!("no group opens at {}", range.start);
            return Err(CompileError::Invalid);
        };
        // The closing parenthesis sits at `range.end - 1`.
        let close = range.end - 1;
        debug_assert!(op_index < close, "operator at {} outside {:?}", op_index, range);

        let operator = Operator::from_char(source.chars[op_index]).ok_or(CompileError::Invalid)?;
        trace!("'{}' group {:?} split at {}", operator.as_char(), range, op_index);

        let left = self.compile_range(source, range.start + 1..op_index)?;
        match operator {
            // Anything between '*' and the closing parenthesis is not compiled.
            Operator::Star => Ok(construct::star(self.session, left)),
            Operator::Union => {
                let right = self.compile_range(source, op_index + 1..close)?;
                Ok(construct::union(self.session, left, right))
            }
            Operator::Concat => {
                let right = self.compile_range(source, op_index + 1..close)?;
                Ok(construct::concat(self.session, left, right))
            }
        }
    }
}

impl Session {
    /// Compile `expression` with ids drawn from this session
    pub fn compile(&mut self, expression: &str) -> CompileResult<Automaton> {
        Compiler::new(self).compile(expression)
    }
}

/// Compile `expression` in a session of its own
pub fn compile(expression: &str) -> CompileResult<Automaton> {
    Session::new().compile(expression)
}
