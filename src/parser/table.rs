//! Predictive parsing table
//!
//! `M[A, a]` holds the index of the production to expand `A` with when the
//! lookahead is `a`. For every production `A -> β` the production is placed
//! under each terminal of First(β); if β can vanish it is also placed under
//! each member of Follow(A), including the end-of-input column. A cell that
//! would receive a second, different production means the grammar is not
//! LL(1) and the build fails.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::debug;

use super::first_follow::FirstFollow;
use super::grammar::{Grammar, GrammarError, Sign, Symbol};

/// LL(1) parse table: `(non-terminal, lookahead) -> production index`.
#[derive(Debug, Clone)]
pub struct ParseTable<T, N> {
    cells: FxHashMap<(N, Sign<T, N>), usize>,
}

impl<T: Symbol, N: Symbol> PartialEq for ParseTable<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl<T: Symbol, N: Symbol> Eq for ParseTable<T, N> {}

impl<T: Symbol, N: Symbol> ParseTable<T, N> {
    /// Build the table for `grammar` from its precomputed First/Follow sets.
    pub fn build(grammar: &Grammar<T, N>, sets: &FirstFollow<T, N>) -> Result<Self, GrammarError> {
        let mut table = ParseTable {
            cells: FxHashMap::default(),
        };

        for (index, production) in grammar.productions().iter().enumerate() {
            let first = sets.first_of_sequence(&production.right);

            for lookahead in first.iter().filter(|s| s.is_terminal()) {
                table.insert(grammar, production.left, *lookahead, index)?;
            }

            if first.contains(&Sign::Epsilon) {
                for lookahead in sets.follow_of(production.left) {
                    table.insert(grammar, production.left, *lookahead, index)?;
                }
            }
        }

        debug!(cells = table.cells.len(), "parse table built");
        Ok(table)
    }

    fn insert(
        &mut self,
        grammar: &Grammar<T, N>,
        left: N,
        lookahead: Sign<T, N>,
        index: usize,
    ) -> Result<(), GrammarError> {
        match self.cells.get(&(left, lookahead)) {
            Some(&existing) if existing != index => Err(GrammarError::Conflict {
                non_terminal: left.to_string(),
                lookahead: lookahead.to_string(),
                existing: production_text(grammar, existing),
                incoming: production_text(grammar, index),
            }),
            Some(_) => Ok(()),
            None => {
                self.cells.insert((left, lookahead), index);
                Ok(())
            }
        }
    }

    /// Production to expand `non_terminal` with under `lookahead`, if any.
    pub fn get(&self, non_terminal: N, lookahead: Sign<T, N>) -> Option<usize> {
        self.cells.get(&(non_terminal, lookahead)).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All filled cells in a stable order.
    pub fn entries(&self) -> Vec<(N, Sign<T, N>, usize)> {
        let mut entries: Vec<_> = self.cells.iter().map(|(&(n, s), &p)| (n, s, p)).collect();
        entries.sort();
        entries
    }

    /// Render the table one cell per line for inspection.
    pub fn display<'a>(&'a self, grammar: &'a Grammar<T, N>) -> TableDisplay<'a, T, N> {
        TableDisplay {
            table: self,
            grammar,
        }
    }
}

fn production_text<T: Symbol, N: Symbol>(grammar: &Grammar<T, N>, index: usize) -> String {
    grammar
        .production(index)
        .map(|p| p.to_string())
        .unwrap_or_else(|| format!("<production {}>", index))
}

pub struct TableDisplay<'a, T, N> {
    table: &'a ParseTable<T, N>,
    grammar: &'a Grammar<T, N>,
}

impl<T: Symbol, N: Symbol> fmt::Display for TableDisplay<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (non_terminal, lookahead, index) in self.table.entries() {
            writeln!(
                f,
                "[{}, {}] {}",
                non_terminal,
                lookahead,
                production_text(self.grammar, index)
            )?;
        }
        Ok(())
    }
}
