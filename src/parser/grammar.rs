//! Grammar representation
//!
//! A [`Grammar`] is an immutable list of [`Production`]s over [`Sign`]s plus a
//! designated start symbol. Everything downstream (First/Follow computation,
//! table construction, parsing) reads it without mutating it.
//!
//! The types are generic over the terminal kind `T` and the non-terminal kind
//! `N`, so the same machinery drives the C-minus grammar in
//! [`rules`](super::rules) and small textbook grammars in tests.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;

use thiserror::Error;

/// Bound shared by terminal and non-terminal kinds.
pub trait Symbol: Copy + Ord + Hash + fmt::Debug + fmt::Display {}

impl<S> Symbol for S where S: Copy + Ord + Hash + fmt::Debug + fmt::Display {}

/// A grammar symbol.
///
/// Two signs are equal when their kinds are equal; lexemes and lines of
/// matched terminals live on the parse tree, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sign<T, N> {
    Terminal(T),
    NonTerminal(N),
    /// The empty string. Only ever appears inside First sets.
    Epsilon,
    /// End-of-input marker (`#`). Appears in Follow sets, table columns and
    /// at the bottom of the parser stack.
    End,
}

impl<T, N> Sign<T, N> {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Sign::Terminal(_))
    }

    pub fn is_non_terminal(&self) -> bool {
        matches!(self, Sign::NonTerminal(_))
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Sign::Epsilon)
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Sign::End)
    }
}

impl<T: fmt::Display, N: fmt::Display> fmt::Display for Sign<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Terminal(t) => write!(f, "{}", t),
            Sign::NonTerminal(n) => write!(f, "{}", n),
            Sign::Epsilon => write!(f, "ε"),
            Sign::End => write!(f, "#"),
        }
    }
}

/// A single rewrite rule `left -> right`. An empty `right` is the epsilon
/// production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production<T, N> {
    pub left: N,
    pub right: Vec<Sign<T, N>>,
}

impl<T, N> Production<T, N> {
    pub fn new(left: N, right: Vec<Sign<T, N>>) -> Self {
        Production { left, right }
    }

    pub fn is_epsilon(&self) -> bool {
        self.right.is_empty()
    }
}

impl<T: fmt::Display, N: fmt::Display> fmt::Display for Production<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.left)?;
        if self.right.is_empty() {
            return write!(f, " ε");
        }
        for sign in &self.right {
            write!(f, " {}", sign)?;
        }
        Ok(())
    }
}

/// A token as handed over by the lexer: its kind, the matched text and the
/// line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<T> {
    pub kind: T,
    pub lexeme: String,
    pub line: usize,
}

impl<T> Token<T> {
    pub fn new(kind: T, lexeme: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }
}

/// Errors raised while validating a grammar or building its parse table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// The start symbol has no production.
    #[error("start symbol '{0}' has no production")]
    MissingStart(String),

    /// A right-hand side uses a non-terminal that no production defines.
    #[error("non-terminal '{non_terminal}' used in '{production}' has no production")]
    UndefinedNonTerminal {
        non_terminal: String,
        production: String,
    },

    /// A right-hand side contains the epsilon or end-of-input marker.
    #[error("reserved sign '{sign}' used in '{production}'")]
    ReservedSign { sign: String, production: String },

    /// Two different productions claim the same table cell; the grammar is
    /// not LL(1).
    #[error(
        "grammar is not LL(1): cell [{non_terminal}, {lookahead}] claimed by '{existing}' and '{incoming}'"
    )]
    Conflict {
        non_terminal: String,
        lookahead: String,
        existing: String,
        incoming: String,
    },
}

/// Immutable production list plus start symbol.
#[derive(Debug, Clone)]
pub struct Grammar<T, N> {
    start: N,
    productions: Vec<Production<T, N>>,
    terminals: BTreeSet<T>,
    non_terminals: BTreeSet<N>,
}

impl<T: Symbol, N: Symbol> Grammar<T, N> {
    /// Build a grammar, checking that every right-hand sign belongs to the
    /// grammar's sign set.
    pub fn new(start: N, productions: Vec<Production<T, N>>) -> Result<Self, GrammarError> {
        let non_terminals: BTreeSet<N> = productions.iter().map(|p| p.left).collect();

        if !non_terminals.contains(&start) {
            return Err(GrammarError::MissingStart(start.to_string()));
        }

        let mut terminals = BTreeSet::new();
        for production in &productions {
            for sign in &production.right {
                match sign {
                    Sign::Terminal(t) => {
                        terminals.insert(*t);
                    }
                    Sign::NonTerminal(n) => {
                        if !non_terminals.contains(n) {
                            return Err(GrammarError::UndefinedNonTerminal {
                                non_terminal: n.to_string(),
                                production: production.to_string(),
                            });
                        }
                    }
                    Sign::Epsilon | Sign::End => {
                        return Err(GrammarError::ReservedSign {
                            sign: sign.to_string(),
                            production: production.to_string(),
                        });
                    }
                }
            }
        }

        Ok(Grammar {
            start,
            productions,
            terminals,
            non_terminals,
        })
    }

    pub fn start(&self) -> N {
        self.start
    }

    pub fn productions(&self) -> &[Production<T, N>] {
        &self.productions
    }

    pub fn production(&self, index: usize) -> Option<&Production<T, N>> {
        self.productions.get(index)
    }

    pub fn terminals(&self) -> &BTreeSet<T> {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &BTreeSet<N> {
        &self.non_terminals
    }

    /// All productions whose left-hand side is `left`, with their indices.
    pub fn productions_of(&self, left: N) -> impl Iterator<Item = (usize, &Production<T, N>)> {
        self.productions
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.left == left)
    }
}
