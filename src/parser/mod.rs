//! C-minus source code parser
//!
//! This module turns source text into a parse tree:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`grammar`]: Signs, productions and grammar validation
//! - [`first_follow`]: First/Follow fixpoint computation
//! - [`table`]: LL(1) predictive table construction and conflict detection
//! - [`parse`]: Table-driven parser (tokens → parse tree)
//! - [`tree`]: Parse tree nodes
//! - [`rules`]: The concrete C-minus grammar
//!
//! # Parser Implementation
//!
//! Predictive LL(1) parsing driven by a table built at startup from the
//! grammar in [`rules`]. The grammar machinery is generic over the terminal
//! and non-terminal kinds, so any grammar can be loaded into it.

pub mod first_follow;
pub mod grammar;
pub mod lexer;
pub mod parse;
pub mod rules;
pub mod table;
pub mod tree;
