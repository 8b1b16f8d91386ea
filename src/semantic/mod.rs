//! Semantic analysis and three-address code generation
//!
//! This module evaluates the attribute grammar attached to the C-minus
//! productions:
//! - [`engine`]: Tree walk, attribute records and per-production dispatch
//! - [`declarations`], [`statements`], [`expressions`]: Semantic actions
//! - [`symbols`]: Global, local and function tables
//! - [`temps`]: Fresh temporary and label names
//! - [`code`]: Three-address instructions
//! - [`errors`]: Semantic error types
//!
//! # Evaluation Model
//!
//! One depth-first pass over the parse tree. Inherited attributes are computed
//! for each child right before it is visited; synthesized attributes,
//! including each subtree's code, are returned to the parent. Semantic errors
//! are collected and the walk continues.

pub mod code;
pub mod constants;
pub mod declarations;
pub mod engine;
pub mod errors;
pub mod expressions;
pub mod statements;
pub mod symbols;
pub mod temps;
