//! First and Follow sets
//!
//! Both sets are computed as monotone fixpoints: every pass walks all
//! productions and unions newly discovered members into the relevant set,
//! stopping after a pass that adds nothing. Set members are kept in
//! `BTreeSet`s so iteration order (and every diagnostic derived from it) is
//! stable.

use std::collections::BTreeSet;
use std::fmt;

use rustc_hash::FxHashMap;
use tracing::debug;

use super::grammar::{Grammar, Sign, Symbol};

pub type SignSet<T, N> = BTreeSet<Sign<T, N>>;

/// First sets of every non-terminal and Follow sets of every non-terminal.
#[derive(Debug, Clone)]
pub struct FirstFollow<T, N> {
    first: FxHashMap<N, SignSet<T, N>>,
    follow: FxHashMap<N, SignSet<T, N>>,
    empty: SignSet<T, N>,
}

impl<T: Symbol, N: Symbol> PartialEq for FirstFollow<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.first == other.first && self.follow == other.follow
    }
}

impl<T: Symbol, N: Symbol> Eq for FirstFollow<T, N> {}

impl<T: Symbol, N: Symbol> FirstFollow<T, N> {
    /// Compute First and then Follow for `grammar`.
    pub fn compute(grammar: &Grammar<T, N>) -> Self {
        let mut sets = FirstFollow {
            first: grammar
                .non_terminals()
                .iter()
                .map(|n| (*n, SignSet::new()))
                .collect(),
            follow: grammar
                .non_terminals()
                .iter()
                .map(|n| (*n, SignSet::new()))
                .collect(),
            empty: SignSet::new(),
        };
        sets.compute_firsts(grammar);
        sets.compute_follows(grammar);
        sets
    }

    fn compute_firsts(&mut self, grammar: &Grammar<T, N>) {
        let mut passes = 0;
        loop {
            passes += 1;
            let mut changed = false;
            for production in grammar.productions() {
                let found = self.first_of_sequence(&production.right);
                let set = self.first.entry(production.left).or_default();
                let before = set.len();
                set.extend(found);
                changed |= set.len() != before;
            }
            if !changed {
                break;
            }
        }
        debug!(passes, "first sets converged");
    }

    fn compute_follows(&mut self, grammar: &Grammar<T, N>) {
        self.follow.entry(grammar.start()).or_default().insert(Sign::End);

        let mut passes = 0;
        loop {
            passes += 1;
            let mut changed = false;
            for production in grammar.productions() {
                for (i, sign) in production.right.iter().enumerate() {
                    let Sign::NonTerminal(target) = *sign else {
                        continue;
                    };

                    let rest = self.first_of_sequence(&production.right[i + 1..]);
                    let mut additions: SignSet<T, N> =
                        rest.iter().filter(|s| !s.is_epsilon()).copied().collect();
                    if rest.contains(&Sign::Epsilon) {
                        additions.extend(self.follow_of(production.left).iter().copied());
                    }

                    let set = self.follow.entry(target).or_default();
                    let before = set.len();
                    set.extend(additions);
                    changed |= set.len() != before;
                }
            }
            if !changed {
                break;
            }
        }
        debug!(passes, "follow sets converged");
    }

    /// First set of a single sign. A terminal's First set is itself; the
    /// markers are their own First sets too.
    pub fn first_of(&self, sign: &Sign<T, N>) -> SignSet<T, N> {
        match sign {
            Sign::NonTerminal(n) => self.first.get(n).cloned().unwrap_or_default(),
            other => BTreeSet::from([*other]),
        }
    }

    /// First set of a sign sequence. Contains [`Sign::Epsilon`] exactly when
    /// every sign of the sequence can derive the empty string (in particular
    /// for the empty sequence).
    pub fn first_of_sequence(&self, signs: &[Sign<T, N>]) -> SignSet<T, N> {
        let mut result = SignSet::new();
        for sign in signs {
            let first = self.first_of(sign);
            let nullable = first.contains(&Sign::Epsilon);
            result.extend(first.into_iter().filter(|s| !s.is_epsilon()));
            if !nullable {
                return result;
            }
        }
        result.insert(Sign::Epsilon);
        result
    }

    pub fn follow_of(&self, non_terminal: N) -> &SignSet<T, N> {
        self.follow.get(&non_terminal).unwrap_or(&self.empty)
    }

    pub fn first_of_non_terminal(&self, non_terminal: N) -> &SignSet<T, N> {
        self.first.get(&non_terminal).unwrap_or(&self.empty)
    }

    /// Render both sets of every non-terminal of `grammar` for inspection.
    pub fn display<'a>(&'a self, grammar: &'a Grammar<T, N>) -> SetsDisplay<'a, T, N> {
        SetsDisplay {
            sets: self,
            grammar,
        }
    }
}

pub struct SetsDisplay<'a, T, N> {
    sets: &'a FirstFollow<T, N>,
    grammar: &'a Grammar<T, N>,
}

fn write_set<T: Symbol, N: Symbol>(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    non_terminal: N,
    set: &SignSet<T, N>,
) -> fmt::Result {
    let members: Vec<String> = set.iter().map(|s| s.to_string()).collect();
    writeln!(f, "{}({}) = {{ {} }}", label, non_terminal, members.join(", "))
}

impl<T: Symbol, N: Symbol> fmt::Display for SetsDisplay<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &non_terminal in self.grammar.non_terminals() {
            write_set(f, "FIRST", non_terminal, self.sets.first_of_non_terminal(non_terminal))?;
            write_set(f, "FOLLOW", non_terminal, self.sets.follow_of(non_terminal))?;
        }
        Ok(())
    }
}
