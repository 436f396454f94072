//! Regex to NFA compilation.
//!
//! The surface syntax is deliberately small:
//!
//! - letters of the alphabet, and `ε` for the empty word,
//! - grouping with `(` and `)`,
//! - postfix `*` for repetition (highest precedence),
//! - implicit concatenation by juxtaposition,
//! - `|` for alternation (lowest precedence).
//!
//! All binary operators are left-associative. There is no escape syntax: any
//! other character is rejected with [`Error::InvalidRegex`].
//!
//! Compilation runs in three passes:
//!
//! 1. tokenize and insert an explicit concatenation operator between
//!    juxtaposed operands,
//! 2. convert to postfix with the shunting-yard algorithm,
//! 3. evaluate the postfix stream with Thompson's construction.
//!
//! # Examples
//!
//! ```
//! use sl2z_automata::automaton::Automaton;
//!
//! let nfa = Automaton::from_regex(['a', 'b'], "(a|b)*abb").unwrap();
//! assert!(nfa.is_valid_word("abb"));
//! assert!(nfa.is_valid_word("babaabb"));
//! assert!(!nfa.is_valid_word("abab"));
//! ```

use std::collections::BTreeSet;
use std::fmt;

use log::{debug, trace};

use crate::automaton::Automaton;
use crate::error::{Error, Result};
use crate::types::{StateId, Symbol};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Token {
    Symbol(Symbol),
    Open,
    Close,
    Star,
    Concat,
    Union,
}

impl Token {
    /// Binding strength of binary operators.
    fn precedence(self) -> Option<u8> {
        match self {
            Token::Concat => Some(2),
            Token::Union => Some(1),
            _ => None,
        }
    }

    /// Can this token end an operand?
    fn ends_operand(self) -> bool {
        matches!(self, Token::Symbol(_) | Token::Close | Token::Star)
    }

    /// Can this token start an operand?
    fn starts_operand(self) -> bool {
        matches!(self, Token::Symbol(_) | Token::Open)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Symbol(symbol) => write!(f, "{}", symbol),
            Token::Open => write!(f, "("),
            Token::Close => write!(f, ")"),
            Token::Star => write!(f, "*"),
            Token::Concat => write!(f, "."),
            Token::Union => write!(f, "|"),
        }
    }
}

fn invalid(position: usize, reason: impl Into<String>) -> Error {
    Error::InvalidRegex {
        position,
        reason: reason.into(),
    }
}

/// Splits `pattern` into positioned tokens and inserts explicit concatenations.
fn tokenize(pattern: &str, alphabet: &BTreeSet<char>) -> Result<Vec<(usize, Token)>> {
    let mut tokens: Vec<(usize, Token)> = Vec::new();
    for (pos, c) in pattern.chars().enumerate() {
        let token = match c {
            '(' => Token::Open,
            ')' => Token::Close,
            '*' => Token::Star,
            '|' => Token::Union,
            c => match Symbol::from(c) {
                Symbol::Epsilon => Token::Symbol(Symbol::Epsilon),
                Symbol::Char(c) if alphabet.contains(&c) => Token::Symbol(Symbol::Char(c)),
                Symbol::Char(c) => return Err(invalid(pos, format!("unexpected character '{}'", c))),
            },
        };
        if let Some(&(_, prev)) = tokens.last() {
            if prev == Token::Open && token == Token::Close {
                return Err(invalid(pos, "empty group"));
            }
            if prev.ends_operand() && token.starts_operand() {
                tokens.push((pos, Token::Concat));
            }
        }
        tokens.push((pos, token));
    }
    Ok(tokens)
}

/// Shunting-yard conversion to postfix.
///
/// `*` is a postfix operator binding tighter than anything else, so it goes
/// straight to the output.
fn to_postfix(tokens: Vec<(usize, Token)>) -> Result<Vec<(usize, Token)>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<(usize, Token)> = Vec::new();

    for (pos, token) in tokens {
        match token {
            Token::Symbol(_) | Token::Star => output.push((pos, token)),
            Token::Concat | Token::Union => {
                let precedence = token.precedence();
                while let Some(&(_, top)) = operators.last() {
                    if top.precedence().is_some() && top.precedence() >= precedence {
                        output.extend(operators.pop());
                    } else {
                        break;
                    }
                }
                operators.push((pos, token));
            }
            Token::Open => operators.push((pos, token)),
            Token::Close => loop {
                match operators.pop() {
                    Some((_, Token::Open)) => break,
                    Some(op) => output.push(op),
                    None => return Err(invalid(pos, "unmatched ')'")),
                }
            },
        }
    }

    while let Some((pos, op)) = operators.pop() {
        if op == Token::Open {
            return Err(invalid(pos, "unclosed '('"));
        }
        output.push((pos, op));
    }
    Ok(output)
}

/// A sub-automaton under construction, with one entry and one exit state.
#[derive(Debug, Copy, Clone)]
struct Fragment {
    entry: StateId,
    exit: StateId,
}

struct Thompson {
    nfa: Automaton,
    stack: Vec<Fragment>,
}

impl Thompson {
    fn pop(&mut self, pos: usize, op: Token) -> Result<Fragment> {
        self.stack
            .pop()
            .ok_or_else(|| invalid(pos, format!("missing operand for '{}'", op)))
    }

    fn fresh(&mut self) -> Result<StateId> {
        self.nfa.add_state(false, false)
    }

    fn symbol(&mut self, symbol: Symbol) -> Result<()> {
        let entry = self.fresh()?;
        let exit = self.fresh()?;
        self.nfa.add_transition(entry, exit, symbol)?;
        self.stack.push(Fragment { entry, exit });
        Ok(())
    }

    fn star(&mut self, pos: usize) -> Result<()> {
        let inner = self.pop(pos, Token::Star)?;
        let entry = self.fresh()?;
        let exit = self.fresh()?;
        self.nfa.add_transition(entry, inner.entry, Symbol::Epsilon)?;
        self.nfa.add_transition(entry, exit, Symbol::Epsilon)?;
        self.nfa.add_transition(inner.exit, inner.entry, Symbol::Epsilon)?;
        self.nfa.add_transition(inner.exit, exit, Symbol::Epsilon)?;
        self.stack.push(Fragment { entry, exit });
        Ok(())
    }

    /// Splices `right` onto `left` by moving the edges of `right.entry` to
    /// `left.exit`. Fragment entries never have incoming edges, so the old
    /// entry can be dropped without scanning for them.
    fn concat(&mut self, pos: usize) -> Result<()> {
        let right = self.pop(pos, Token::Concat)?;
        let left = self.pop(pos, Token::Concat)?;
        let edges: Vec<(Symbol, StateId)> = self.nfa.transitions().outgoing(right.entry).collect();
        for (symbol, to) in edges {
            self.nfa.add_transition(left.exit, to, symbol)?;
        }
        self.nfa.delete_state(right.entry, true)?;
        self.stack.push(Fragment {
            entry: left.entry,
            exit: right.exit,
        });
        Ok(())
    }

    fn union(&mut self, pos: usize) -> Result<()> {
        let right = self.pop(pos, Token::Union)?;
        let left = self.pop(pos, Token::Union)?;
        let entry = self.fresh()?;
        let exit = self.fresh()?;
        for branch in [left, right] {
            self.nfa.add_transition(entry, branch.entry, Symbol::Epsilon)?;
            self.nfa.add_transition(branch.exit, exit, Symbol::Epsilon)?;
        }
        self.stack.push(Fragment { entry, exit });
        Ok(())
    }
}

impl Automaton {
    /// Compiles `pattern` into an NFA over `alphabet` using Thompson's construction.
    ///
    /// The result has exactly one start state and exactly one goal state.
    /// The empty pattern denotes the language containing only the empty word.
    pub fn from_regex(alphabet: impl IntoIterator<Item = char>, pattern: &str) -> Result<Automaton> {
        let nfa = Automaton::new(alphabet);
        debug!("from_regex(pattern = {:?}, alphabet = {:?})", pattern, nfa.alphabet());

        let tokens = tokenize(pattern, nfa.alphabet())?;
        let postfix = to_postfix(tokens)?;
        trace!("from_regex: postfix = {}", postfix_string(&postfix));

        let mut builder = Thompson { nfa, stack: Vec::new() };
        if postfix.is_empty() {
            let state = builder.fresh()?;
            builder.nfa.set_start_state(state)?;
            builder.nfa.set_goal_state(state)?;
            return Ok(builder.nfa);
        }

        for &(pos, token) in &postfix {
            match token {
                Token::Symbol(symbol) => builder.symbol(symbol)?,
                Token::Star => builder.star(pos)?,
                Token::Concat => builder.concat(pos)?,
                Token::Union => builder.union(pos)?,
                Token::Open | Token::Close => unreachable!("parentheses never reach the postfix stream"),
            }
        }

        let end = pattern.chars().count();
        let fragment = match builder.stack.as_slice() {
            [fragment] => *fragment,
            _ => return Err(invalid(end, "dangling operands")),
        };
        let mut nfa = builder.nfa;
        nfa.set_start_state(fragment.entry)?;
        nfa.set_goal_state(fragment.exit)?;
        debug!(
            "from_regex: {} states, {} transitions",
            nfa.num_states(),
            nfa.num_transitions()
        );
        Ok(nfa)
    }
}

fn postfix_string(postfix: &[(usize, Token)]) -> String {
    postfix.iter().map(|(_, token)| token.to_string()).collect()
}
