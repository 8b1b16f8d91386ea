//! Compilation pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Table-driven parser → Parse tree → Evaluator → Code
//! ```
//!
//! A [`Frontend`] builds the grammar, its First/Follow sets and the parse
//! table once; every compilation through it then runs the lexer, the parser
//! and a fresh [`Evaluator`].

use thiserror::Error;
use tracing::debug;

use crate::parser::first_follow::FirstFollow;
use crate::parser::grammar::GrammarError;
use crate::parser::lexer::{self, LexError, Token, TokenKind};
use crate::parser::parse::{Parser, SyntaxError};
use crate::parser::rules::{self, CGrammar, NonTerminal};
use crate::parser::table::ParseTable;
use crate::semantic::code::Instruction;
use crate::semantic::engine::{Evaluation, Evaluator, Node};
use crate::semantic::errors::SemanticError;

/// Failure of any compilation stage
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Every semantic error of the run, in source order of detection
    #[error("{} semantic error(s)", .0.len())]
    Semantic(Vec<SemanticError>),
}

pub struct Frontend {
    grammar: CGrammar,
    sets: FirstFollow<TokenKind, NonTerminal>,
    table: ParseTable<TokenKind, NonTerminal>,
}

impl Frontend {
    /// Build the C-minus grammar and its parse table.
    pub fn new() -> Result<Self, GrammarError> {
        let grammar = rules::grammar()?;
        let sets = FirstFollow::compute(&grammar);
        let table = ParseTable::build(&grammar, &sets)?;
        debug!(
            productions = grammar.productions().len(),
            cells = table.len(),
            "frontend ready"
        );
        Ok(Frontend {
            grammar,
            sets,
            table,
        })
    }

    pub fn grammar(&self) -> &CGrammar {
        &self.grammar
    }

    pub fn sets(&self) -> &FirstFollow<TokenKind, NonTerminal> {
        &self.sets
    }

    pub fn table(&self) -> &ParseTable<TokenKind, NonTerminal> {
        &self.table
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, LexError> {
        lexer::tokenize(source)
    }

    pub fn parse_tokens(&self, tokens: &[Token]) -> Result<Node, SyntaxError> {
        Parser::new(&self.grammar, &self.table).parse(tokens)
    }

    /// Tokenize and parse `source`.
    pub fn parse(&self, source: &str) -> Result<Node, CompileError> {
        let tokens = self.tokenize(source)?;
        Ok(self.parse_tokens(&tokens)?)
    }

    /// Run the evaluator over a parse tree, keeping errors and symbol
    /// tables for inspection.
    pub fn analyze(&self, tree: &Node) -> Evaluation {
        Evaluator::new().evaluate(tree)
    }

    pub fn compile_tokens(&self, tokens: &[Token]) -> Result<Vec<Instruction>, CompileError> {
        let tree = self.parse_tokens(tokens)?;
        let evaluation = self.analyze(&tree);
        if evaluation.is_ok() {
            Ok(evaluation.code)
        } else {
            Err(CompileError::Semantic(evaluation.errors))
        }
    }

    /// Compile `source` to three-address code.
    pub fn compile(&self, source: &str) -> Result<Vec<Instruction>, CompileError> {
        let tokens = self.tokenize(source)?;
        self.compile_tokens(&tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontend_reusable() {
        let frontend = Frontend::new().unwrap();
        let first = frontend.compile("int f(int a) { return a * a; }").unwrap();
        let second = frontend.compile("int f(int a) { return a * a; }").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stage_errors() {
        let frontend = Frontend::new().unwrap();
        assert!(matches!(frontend.compile("int $;"), Err(CompileError::Lex(_))));
        assert!(matches!(
            frontend.compile("int x"),
            Err(CompileError::Syntax(SyntaxError::UnexpectedEnd { .. }))
        ));
        match frontend.compile("int x; int x; void v;") {
            Err(CompileError::Semantic(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected semantic errors, got {:?}", other),
        }
    }

    #[test]
    fn test_semantic_error_message() {
        let frontend = Frontend::new().unwrap();
        let err = frontend.compile("int x; int x;").unwrap_err();
        assert_eq!(err.to_string(), "1 semantic error(s)");
    }
}
