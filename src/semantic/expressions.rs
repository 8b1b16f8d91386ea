//! Expression actions
//!
//! Operator chains such as `a - b - c` are parsed right-recursively
//! (`additive-expr -> term additive-expr-follow`). Each follow node hands up
//! its `(operator, operand)` pairs and the operands' code; the head of the
//! chain folds them from the left once all operand code is known, which keeps
//! subtraction and division left-associative. A chain without continuation
//! emits nothing and passes its single operand's place through.

use super::code::Instruction;
use super::engine::{take, Attributes, Evaluator, Ident, Inherited, Suffix};
use super::errors::SemanticError;
use super::symbols::Scope;

impl Evaluator {
    /// `expression -> additive-expr expression-follow`
    pub(crate) fn relational(&mut self, mut children: Vec<Attributes>) -> Attributes {
        let lhs = take(&mut children, 0);
        let rest = take(&mut children, 1);

        let Some(op) = rest.operator else {
            return lhs;
        };

        let dst = self.temps.new_temp();
        let mut code = lhs.code;
        code.extend(rest.code);
        code.push(Instruction::Binary {
            dst: dst.clone(),
            lhs: lhs.place,
            op,
            rhs: rest.place,
        });
        Attributes {
            code,
            place: dst,
            ..Default::default()
        }
    }

    /// `expression-follow -> rel-op additive-expr`
    pub(crate) fn relational_follow(mut children: Vec<Attributes>) -> Attributes {
        let op = take(&mut children, 0).operator;
        let rhs = take(&mut children, 1);
        Attributes {
            operator: op,
            place: rhs.place,
            code: rhs.code,
            ..Default::default()
        }
    }

    /// `additive-expr -> term additive-expr-follow` and `term -> factor term-follow`
    pub(crate) fn fold_chain(&mut self, mut children: Vec<Attributes>) -> Attributes {
        let head = take(&mut children, 0);
        let follow = take(&mut children, 1);

        if follow.tail.is_empty() {
            return head;
        }

        let mut code = head.code;
        code.extend(follow.code);

        let mut place = head.place;
        for (op, rhs) in follow.tail {
            let dst = self.temps.new_temp();
            code.push(Instruction::Binary {
                dst: dst.clone(),
                lhs: place,
                op,
                rhs,
            });
            place = dst;
        }

        Attributes {
            code,
            place,
            ..Default::default()
        }
    }

    /// `X-follow -> op operand X-follow`
    pub(crate) fn chain_link(mut children: Vec<Attributes>) -> Attributes {
        let op = take(&mut children, 0).operator;
        let operand = take(&mut children, 1);
        let rest = take(&mut children, 2);

        let mut tail = Vec::with_capacity(rest.tail.len() + 1);
        if let Some(op) = op {
            tail.push((op, operand.place));
        }
        tail.extend(rest.tail);

        let mut code = operand.code;
        code.extend(rest.code);

        Attributes {
            code,
            tail,
            ..Default::default()
        }
    }

    /// `factor -> NUM`
    pub(crate) fn number(mut children: Vec<Attributes>) -> Attributes {
        let literal = take(&mut children, 0);
        Attributes {
            constant: literal.lexeme.parse().ok(),
            place: literal.lexeme,
            ..Default::default()
        }
    }

    /// `factor -> ID id-factor-follow`: a variable, an element read or a call.
    pub(crate) fn identifier_factor(
        &mut self,
        inherited: &Inherited,
        mut children: Vec<Attributes>,
    ) -> Attributes {
        let id = take(&mut children, 0);
        let follow = take(&mut children, 1);
        let ident = Ident {
            name: id.lexeme,
            line: id.line,
        };

        match follow.suffix {
            None => {
                self.check_variable(inherited.scope, &ident);
                Attributes {
                    place: ident.name,
                    ..Default::default()
                }
            }
            Some(Suffix::Index { place, constant }) => {
                self.check_element(inherited.scope, &ident, constant);
                let dst = self.temps.new_temp();
                let mut code = follow.code;
                code.push(Instruction::IndexedLoad {
                    dst: dst.clone(),
                    array: ident.name,
                    index: place,
                });
                Attributes {
                    code,
                    place: dst,
                    ..Default::default()
                }
            }
            Some(Suffix::Call(args)) => self.emit_call(&ident, args, follow.code),
        }
    }

    /// `var-follow -> [ expression ]`
    pub(crate) fn subscript(mut children: Vec<Attributes>) -> Attributes {
        let index = take(&mut children, 1);
        Attributes {
            suffix: Some(Suffix::Index {
                place: index.place,
                constant: index.constant,
            }),
            code: index.code,
            ..Default::default()
        }
    }

    /// `id-factor-follow -> ( args )`
    pub(crate) fn call_suffix(mut children: Vec<Attributes>) -> Attributes {
        let args = take(&mut children, 1);
        Attributes {
            suffix: Some(Suffix::Call(args.args)),
            code: args.code,
            ..Default::default()
        }
    }

    /// `arg-list -> expression arg-list-follow` and
    /// `arg-list-follow -> , expression arg-list-follow`
    pub(crate) fn arg_list(mut children: Vec<Attributes>, first: usize) -> Attributes {
        let value = take(&mut children, first);
        let rest = take(&mut children, first + 1);

        let mut args = Vec::with_capacity(rest.args.len() + 1);
        args.push(value.place);
        args.extend(rest.args);

        let mut code = value.code;
        code.extend(rest.code);

        Attributes {
            code,
            args,
            ..Default::default()
        }
    }

    /// Argument code, one `param` per argument, the call and the result
    /// capture. Checked against the function table; the code is emitted even
    /// when the check fails.
    pub(crate) fn emit_call(
        &mut self,
        callee: &Ident,
        args: Vec<String>,
        mut code: Vec<Instruction>,
    ) -> Attributes {
        match self.symbols.functions.query(&callee.name) {
            Some(function) if function.params.len() != args.len() => {
                self.errors.push(SemanticError::ArgumentCountMismatch {
                    function: callee.name.clone(),
                    expected: function.params.len(),
                    got: args.len(),
                    line: callee.line,
                });
            }
            Some(_) => {}
            None => self.errors.push(SemanticError::UndefinedFunction {
                name: callee.name.clone(),
                line: callee.line,
            }),
        }

        let argc = args.len();
        code.extend(args.into_iter().map(Instruction::Param));
        code.push(Instruction::Call {
            function: callee.name.clone(),
            argc,
        });

        let dst = self.temps.new_temp();
        code.push(Instruction::CallResult { dst: dst.clone() });
        Attributes {
            code,
            place: dst,
            ..Default::default()
        }
    }

    /// Report `ident` if it names no variable visible from `scope`.
    pub(crate) fn check_variable(&mut self, scope: Scope, ident: &Ident) {
        if self.symbols.resolve(scope, &ident.name).is_none() {
            self.errors.push(SemanticError::UndefinedVariable {
                name: ident.name.clone(),
                line: ident.line,
            });
        }
    }

    /// Check a subscripted use of `ident`; `constant` is the index when it is
    /// a literal.
    pub(crate) fn check_element(&mut self, scope: Scope, ident: &Ident, constant: Option<i64>) {
        let error = match self.symbols.resolve(scope, &ident.name) {
            None => Some(SemanticError::UndefinedVariable {
                name: ident.name.clone(),
                line: ident.line,
            }),
            Some(record) if !record.kind.is_array() => Some(SemanticError::NotAnArray {
                name: ident.name.clone(),
                line: ident.line,
            }),
            Some(record) => match (constant, record.kind.length()) {
                (Some(index), Some(length)) if index < 0 || index as u64 >= length as u64 => {
                    Some(SemanticError::IndexOutOfBounds {
                        name: ident.name.clone(),
                        index,
                        length,
                        line: ident.line,
                    })
                }
                _ => None,
            },
        };
        self.errors.extend(error);
    }
}
