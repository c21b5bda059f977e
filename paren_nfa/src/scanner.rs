use std::collections::HashMap;

use log::trace;

use crate::nfa::{EMPTY_LANGUAGE_MARKER, EPSILON_MARKER};
use crate::{CompileError, CompileResult};

/// An operator owning a bracket group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `+`
    Union,
    /// `.`
    Concat,
    /// `*`
    Star,
}

impl Operator {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Operator::Union),
            '.' => Some(Operator::Concat),
            '*' => Some(Operator::Star),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Operator::Union => '+',
            Operator::Concat => '.',
            Operator::Star => '*',
        }
    }
}

/// True for every character an expression may contain
pub fn is_expression_char(ch: char) -> bool {
    ch.is_ascii_lowercase()
        || ch == EMPTY_LANGUAGE_MARKER
        || ch == EPSILON_MARKER
        || ch == '('
        || ch == ')'
        || Operator::from_char(ch).is_some()
}

/// For each opening parenthesis, the index of the operator directly inside it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorMap {
    operators: HashMap<usize, usize>,
}

impl OperatorMap {
    pub fn operator_for(&self, open: usize) -> Option<usize> {
        self.operators.get(&open).copied()
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

/// Check bracket nesting and locate the single operator of every group.
///
/// Rejects unbalanced parentheses, groups without an operator (including
/// `()`), groups with more than one operator at their own level, operators
/// outside any group, and characters outside the expression alphabet.
pub fn scan(chars: &[char]) -> CompileResult<OperatorMap> {
    let mut open: Vec<usize> = Vec::new();
    let mut operators = HashMap::new();

    for (index, &ch) in chars.iter().enumerate() {
        if !is_expression_char(ch) {
            trace!("unexpected character {:?} at {}", ch, index);
            return Err(CompileError::Invalid);
        }

        match ch {
            '(' => open.push(index),
            ')' => {
                let top = open.pop().ok_or(CompileError::Invalid)?;
                if !operators.contains_key(&top) {
                    trace!("group opened at {} closed without an operator", top);
                    return Err(CompileError::Invalid);
                }
            }
            _ if Operator::from_char(ch).is_some() => {
                let top = *open.last().ok_or(CompileError::Invalid)?;
                if operators.insert(top, index).is_some() {
                    trace!("second operator at {} in group opened at {}", index, top);
                    return Err(CompileError::Invalid);
                }
            }
            _ => {}
        }
    }

    if !open.is_empty() {
        trace!("{} unclosed group(s)", open.len());
        return Err(CompileError::Invalid);
    }

    Ok(OperatorMap { operators })
}
