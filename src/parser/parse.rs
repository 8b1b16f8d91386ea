//! Table-driven predictive parser
//!
//! The parser keeps an explicit stack of pending signs, each paired with the
//! parse-tree node it will fill in, and a cursor into the token slice. The
//! end of the slice acts as the end-of-input sentinel.
//!
//! # Step
//!
//! - Terminal on top: it must match the current token, which is recorded on
//!   the node before the cursor advances.
//! - Non-terminal on top: `M[top, lookahead]` selects a production; one child
//!   node per right-hand sign is attached and the signs are pushed in reverse
//!   so the leftmost is expanded next.
//! - End marker on top: parsing succeeds if the input is exhausted.
//!
//! There is no backtracking and no error recovery: the first mismatch or
//! empty table cell is reported as a [`SyntaxError`].

use thiserror::Error;
use tracing::{debug, trace};

use super::grammar::{Grammar, Sign, Symbol, Token};
use super::table::ParseTable;
use super::tree::ParseTreeNode;

/// Parse failure. Always fatal; carries the line of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// A terminal on the stack did not match the current token.
    #[error("line {line}: expected {expected}, found '{found}'")]
    Mismatch {
        expected: String,
        found: String,
        line: usize,
    },

    /// No production of the non-terminal on the stack starts with the
    /// current token.
    #[error("line {line}: unexpected '{found}' while parsing {non_terminal}")]
    UnexpectedToken {
        non_terminal: String,
        found: String,
        line: usize,
    },

    /// The input ran out while something was still expected.
    #[error("line {line}: unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String, line: usize },
}

impl SyntaxError {
    pub fn line(&self) -> usize {
        match self {
            SyntaxError::Mismatch { line, .. }
            | SyntaxError::UnexpectedToken { line, .. }
            | SyntaxError::UnexpectedEnd { line, .. } => *line,
        }
    }

    pub fn is_at_end(&self) -> bool {
        matches!(self, SyntaxError::UnexpectedEnd { .. })
    }
}

/// Tree node under construction; children are arena indices.
struct PendingNode<T, N> {
    sign: Sign<T, N>,
    production: Option<usize>,
    lexeme: Option<String>,
    line: usize,
    children: Vec<usize>,
}

impl<T, N> PendingNode<T, N> {
    fn new(sign: Sign<T, N>, line: usize) -> Self {
        PendingNode {
            sign,
            production: None,
            lexeme: None,
            line,
            children: Vec::new(),
        }
    }
}

/// LL(1) driver over a grammar and its predictive table.
pub struct Parser<'a, T, N> {
    grammar: &'a Grammar<T, N>,
    table: &'a ParseTable<T, N>,
}

impl<'a, T: Symbol, N: Symbol> Parser<'a, T, N> {
    pub fn new(grammar: &'a Grammar<T, N>, table: &'a ParseTable<T, N>) -> Self {
        Parser { grammar, table }
    }

    /// Parse `tokens` (without a trailing end marker) into a tree rooted at
    /// the grammar's start symbol.
    pub fn parse(&self, tokens: &[Token<T>]) -> Result<ParseTreeNode<T, N>, SyntaxError> {
        let start = Sign::NonTerminal(self.grammar.start());
        let end_line = tokens.last().map(|t| t.line).unwrap_or(1);
        let first_line = tokens.first().map(|t| t.line).unwrap_or(1);

        let mut nodes = vec![PendingNode::new(start, first_line)];
        let mut stack: Vec<(Sign<T, N>, Option<usize>)> = vec![(Sign::End, None), (start, Some(0))];
        let mut cursor = 0;

        while let Some((top, node)) = stack.pop() {
            let token = tokens.get(cursor);
            let lookahead = token.map_or(Sign::End, |t| Sign::Terminal(t.kind));
            let line = token.map_or(end_line, |t| t.line);
            trace!(%top, %lookahead, line, "parser step");

            match top {
                Sign::End => match token {
                    None => break,
                    Some(token) => {
                        return Err(SyntaxError::Mismatch {
                            expected: "end of input".to_string(),
                            found: token.lexeme.clone(),
                            line,
                        });
                    }
                },
                Sign::Terminal(expected) => match token {
                    Some(token) if token.kind == expected => {
                        if let Some(id) = node {
                            nodes[id].lexeme = Some(token.lexeme.clone());
                            nodes[id].line = token.line;
                        }
                        cursor += 1;
                    }
                    Some(token) => {
                        return Err(SyntaxError::Mismatch {
                            expected: expected.to_string(),
                            found: token.lexeme.clone(),
                            line,
                        });
                    }
                    None => {
                        return Err(SyntaxError::UnexpectedEnd {
                            expected: expected.to_string(),
                            line,
                        });
                    }
                },
                Sign::NonTerminal(non_terminal) => {
                    let Some(index) = self.table.get(non_terminal, lookahead) else {
                        return Err(match token {
                            Some(token) => SyntaxError::UnexpectedToken {
                                non_terminal: non_terminal.to_string(),
                                found: token.lexeme.clone(),
                                line,
                            },
                            None => SyntaxError::UnexpectedEnd {
                                expected: non_terminal.to_string(),
                                line,
                            },
                        });
                    };
                    let production = &self.grammar.productions()[index];

                    let mut children = Vec::with_capacity(production.right.len());
                    for sign in &production.right {
                        children.push(nodes.len());
                        nodes.push(PendingNode::new(*sign, line));
                    }
                    for (sign, child) in production.right.iter().zip(&children).rev() {
                        stack.push((*sign, Some(*child)));
                    }
                    if let Some(id) = node {
                        nodes[id].production = Some(index);
                        nodes[id].line = line;
                        nodes[id].children = children;
                    }
                }
                Sign::Epsilon => {}
            }
        }

        debug!(tokens = tokens.len(), nodes = nodes.len(), "parse complete");
        Ok(assemble(nodes).unwrap_or_else(|| ParseTreeNode::new(start, first_line)))
    }
}

/// Turn the arena into an owned tree. Children are always pushed after their
/// parent, so walking the arena backwards finds every child already built.
fn assemble<T, N>(nodes: Vec<PendingNode<T, N>>) -> Option<ParseTreeNode<T, N>>
where
    T: Symbol,
    N: Symbol,
{
    let mut built: Vec<Option<ParseTreeNode<T, N>>> = Vec::new();
    built.resize_with(nodes.len(), || None);

    for (id, node) in nodes.into_iter().enumerate().rev() {
        let children = node
            .children
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[id] = Some(ParseTreeNode {
            sign: node.sign,
            production: node.production,
            lexeme: node.lexeme,
            line: node.line,
            children,
        });
    }

    built.into_iter().next().flatten()
}
