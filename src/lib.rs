//! # Introduction
//!
//! `cminus` is a front end for C-minus, a small C-like language. It parses
//! source with an LL(1) predictive table built from the language grammar at
//! startup, then evaluates an attribute grammar over the parse tree to check
//! declarations and emit three-address code.
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → Parse tree → Evaluator → Three-address code
//! ```
//!
//! 1. [`parser`]: tokenizes the source, computes First/Follow sets, builds
//!    the predictive table and drives the table-driven parser.
//! 2. [`semantic`]: walks the parse tree with inherited and synthesized
//!    attributes, fills the symbol tables and generates
//!    [`semantic::code::Instruction`]s.
//! 3. [`compile`]: the [`compile::Frontend`] tying both together.
//!
//! ## Supported language
//!
//! Types: `int`, `void`, one-dimensional `int` arrays.
//! Control flow: `if/else`, `while`, `return`.
//! Expressions: `+ - * /`, the six comparisons, array indexing, calls.
//!
//! ```
//! use cminus::compile::Frontend;
//!
//! let frontend = Frontend::new().unwrap();
//! let code = frontend.compile("int f(int a) { return a + 1; }").unwrap();
//! let text: Vec<String> = code.iter().map(|i| i.to_string()).collect();
//! assert_eq!(text, ["f:", "_v0 := a + 1", "return _v0"]);
//! ```

pub mod compile;
pub mod parser;
pub mod semantic;
