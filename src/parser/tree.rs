//! Parse tree produced by the table-driven parser
//!
//! Each node owns its children exclusively; the root owns the whole tree.
//! Non-terminal nodes remember which production expanded them, terminal nodes
//! remember the lexeme and line of the token they matched.
//!
//! Right-recursive lists make the tree as deep as the program is long, so
//! every traversal here (including drop) keeps its own stack instead of
//! recursing.

use std::fmt;

use super::grammar::{Grammar, Sign, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTreeNode<T, N> {
    pub sign: Sign<T, N>,
    /// Index of the production used to expand this node (non-terminals only).
    pub production: Option<usize>,
    /// Matched text (terminals only).
    pub lexeme: Option<String>,
    pub line: usize,
    pub children: Vec<ParseTreeNode<T, N>>,
}

impl<T: Symbol, N: Symbol> ParseTreeNode<T, N> {
    pub fn new(sign: Sign<T, N>, line: usize) -> Self {
        ParseTreeNode {
            sign,
            production: None,
            lexeme: None,
            line,
            children: Vec::new(),
        }
    }

    pub fn lexeme(&self) -> &str {
        self.lexeme.as_deref().unwrap_or("")
    }

    /// Nodes of the tree rooted here in pre-order, with their depth.
    pub fn preorder(&self) -> Preorder<'_, T, N> {
        Preorder {
            pending: vec![(self, 0)],
        }
    }

    /// Number of nodes in the tree rooted here.
    pub fn size(&self) -> usize {
        self.preorder().count()
    }

    /// Leaves in left-to-right order, i.e. the matched token kinds.
    pub fn leaves(&self) -> Vec<T> {
        self.preorder()
            .filter_map(|(node, _)| match node.sign {
                Sign::Terminal(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    /// Check that every expanded node's children spell out the right-hand
    /// side of the production recorded on it.
    pub fn conforms_to(&self, grammar: &Grammar<T, N>) -> bool {
        self.preorder().all(|(node, _)| node.conforms_locally(grammar))
    }

    fn conforms_locally(&self, grammar: &Grammar<T, N>) -> bool {
        match (self.sign, self.production) {
            (Sign::NonTerminal(left), Some(index)) => {
                let Some(production) = grammar.production(index) else {
                    return false;
                };
                production.left == left
                    && production.right.len() == self.children.len()
                    && production
                        .right
                        .iter()
                        .zip(&self.children)
                        .all(|(sign, child)| *sign == child.sign)
            }
            (Sign::Terminal(_), None) => self.children.is_empty(),
            _ => false,
        }
    }
}

/// Pre-order iterator over a parse tree
pub struct Preorder<'a, T, N> {
    pending: Vec<(&'a ParseTreeNode<T, N>, usize)>,
}

impl<'a, T, N> Iterator for Preorder<'a, T, N> {
    type Item = (&'a ParseTreeNode<T, N>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.pending.pop()?;
        self.pending
            .extend(node.children.iter().rev().map(|c| (c, depth + 1)));
        Some((node, depth))
    }
}

impl<T, N> Drop for ParseTreeNode<T, N> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl<T: Symbol, N: Symbol> fmt::Display for ParseTreeNode<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (node, depth) in self.preorder() {
            write!(f, "{:indent$}{}", "", node.sign, indent = depth * 2)?;
            if let Some(lexeme) = &node.lexeme {
                write!(f, " '{}' (line {})", lexeme, node.line)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestNode = ParseTreeNode<&'static str, &'static str>;

    fn leaf(kind: &'static str, line: usize) -> TestNode {
        let mut node = TestNode::new(Sign::Terminal(kind), line);
        node.lexeme = Some(kind.to_string());
        node
    }

    /// `L -> x L | ε` expanded `length` times.
    fn chain(length: usize) -> TestNode {
        let mut tail = TestNode::new(Sign::NonTerminal("L"), length + 1);
        tail.production = Some(1);
        for line in (1..=length).rev() {
            let mut node = TestNode::new(Sign::NonTerminal("L"), line);
            node.production = Some(0);
            node.children = vec![leaf("x", line), tail];
            tail = node;
        }
        tail
    }

    #[test]
    fn test_preorder_and_leaves() {
        let tree = chain(3);
        assert_eq!(tree.size(), 7);
        assert_eq!(tree.leaves(), vec!["x", "x", "x"]);
        let depths: Vec<_> = tree.preorder().map(|(_, d)| d).collect();
        assert_eq!(depths, vec![0, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_display_indents_by_depth() {
        let text = chain(1).to_string();
        assert_eq!(text, "L\n  x 'x' (line 1)\n  L\n");
    }

    #[test]
    fn test_deep_tree_traversal_and_drop() {
        let tree = chain(200_000);
        assert_eq!(tree.size(), 400_001);
        assert_eq!(tree.leaves().len(), 200_000);
        drop(tree);
    }
}
