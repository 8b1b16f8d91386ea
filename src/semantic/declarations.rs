//! Declaration actions
//!
//! Global and local variables, function signatures and parameters. A function
//! is entered into the function table, and its parameters into a fresh local
//! table, just before its body is visited, so the body can call the function
//! recursively.

use tracing::{debug, trace};

use super::code::Instruction;
use super::engine::{take, Attributes, Declarator, Evaluator, Inherited, ParamDecl};
use super::errors::SemanticError;
use super::symbols::{BaseType, FunctionRecord, Scope, SymbolError, SymbolKind};

impl Evaluator {
    /// Append a variable to the table of `scope`. `follow` is the completed
    /// `var-define-follow`. Void variables, invalid lengths and variables
    /// that overflow the table are reported and not recorded.
    pub(crate) fn declare_variable(
        &mut self,
        scope: Scope,
        declarator: &Declarator,
        follow: &Attributes,
    ) {
        let name = declarator.name.clone();
        let line = declarator.line;

        if declarator.ty == BaseType::Void {
            self.errors.push(SemanticError::VoidVariable { name, line });
            return;
        }

        let kind = match (follow.is_array, follow.length) {
            (false, _) => SymbolKind::Int,
            (true, Some(length)) => SymbolKind::Array { length },
            (true, None) => {
                self.errors.push(SemanticError::InvalidArrayLength {
                    name,
                    length: follow.lexeme.clone(),
                    line,
                });
                return;
            }
        };

        let Some(table) = self.symbols.table_mut(scope) else {
            return;
        };
        match table.append(&declarator.name, kind) {
            Ok(offset) => {
                trace!(name = %declarator.name, offset, "declared variable");
            }
            Err(SymbolError::Conflict(_)) => {
                self.errors.push(SemanticError::Redefinition { name, line })
            }
            Err(SymbolError::Overflow(_)) => {
                self.errors.push(SemanticError::StorageOverflow { name, line })
            }
        }
    }

    /// `define-type -> var-define-follow`
    pub(crate) fn define_global(
        &mut self,
        inherited: &Inherited,
        children: &[Attributes],
    ) -> Attributes {
        if let (Some(declarator), Some(follow)) = (&inherited.declarator, children.first()) {
            self.declare_variable(Scope::Global, declarator, follow);
        }
        Attributes::default()
    }

    /// `local-var-define -> type ID var-define-follow`
    pub(crate) fn define_local(
        &mut self,
        inherited: &Inherited,
        children: &[Attributes],
    ) -> Attributes {
        if let [ty, name, follow] = children {
            let declarator = Declarator {
                name: name.lexeme.clone(),
                ty: ty.ty.unwrap_or(BaseType::Int),
                line: name.line,
            };
            self.declare_variable(inherited.scope, &declarator, follow);
        }
        Attributes::default()
    }

    /// `var-define-follow -> [ NUM ] ;`. `length` stays unset when the
    /// literal does not fit in a `usize`.
    pub(crate) fn array_length(children: &[Attributes]) -> Attributes {
        let lexeme = children.get(1).map(|n| n.lexeme.clone()).unwrap_or_default();
        Attributes {
            length: lexeme.parse().ok(),
            lexeme,
            is_array: true,
            ..Default::default()
        }
    }

    /// Register the function named by the inherited declarator and create its
    /// local table holding `params`. Returns the scope of the body.
    pub(crate) fn enter_function(&mut self, inherited: &Inherited, params: &[ParamDecl]) -> Scope {
        let table = self.symbols.new_local();
        let scope = Scope::Function(table);

        let Some(declarator) = &inherited.declarator else {
            return scope;
        };

        let record = FunctionRecord {
            name: declarator.name.clone(),
            return_type: declarator.ty,
            params: params
                .iter()
                .map(|p| SymbolKind::Param { array: p.array })
                .collect(),
            table,
        };
        if self.symbols.functions.append(record).is_err() {
            self.errors.push(SemanticError::FunctionRedefinition {
                name: declarator.name.clone(),
                line: declarator.line,
            });
        }

        for param in params {
            let Some(locals) = self.symbols.table_mut(scope) else {
                break;
            };
            if locals
                .append(&param.name, SymbolKind::Param { array: param.array })
                .is_err()
            {
                self.errors.push(SemanticError::Redefinition {
                    name: param.name.clone(),
                    line: param.line,
                });
            }
        }

        debug!(function = %declarator.name, params = params.len(), "entered function");
        scope
    }

    /// `fun-define-follow -> ( params ) code-block`
    pub(crate) fn function_body(inherited: &Inherited, mut children: Vec<Attributes>) -> Attributes {
        let body = take(&mut children, 3);
        let mut code = Vec::with_capacity(body.code.len() + 1);
        if let Some(declarator) = &inherited.declarator {
            code.push(Instruction::Label(declarator.name.clone()));
        }
        code.extend(body.code);
        Attributes::with_code(code)
    }

    /// `param-list -> param param-follow` and `param-follow -> , param param-follow`
    pub(crate) fn param_list(mut children: Vec<Attributes>, first: usize) -> Attributes {
        let mut params = take(&mut children, first).params;
        params.extend(take(&mut children, first + 1).params);
        Attributes {
            params,
            ..Default::default()
        }
    }

    /// `param -> int ID array-subscript`
    pub(crate) fn param(children: &[Attributes]) -> Attributes {
        let params = match children {
            [_, name, subscript] => vec![ParamDecl {
                name: name.lexeme.clone(),
                line: name.line,
                array: subscript.is_array,
            }],
            _ => Vec::new(),
        };
        Attributes {
            params,
            ..Default::default()
        }
    }
}
