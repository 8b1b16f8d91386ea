//! Statement actions
//!
//! # Control flow layout
//!
//! ```text
//! if (c) { A } else { B }        while (c) { A }
//!
//!     <code of c>                Ltest:
//!     if c goto Lcons                <code of c>
//! Lalt:                              if c goto Lbody
//!     <code of B>                    goto Lend
//!     goto Ljoin                 Lbody:
//! Lcons:                             <code of A>
//!     <code of A>                    goto Ltest
//!     goto Ljoin                 Lend:
//! Ljoin:
//! ```
//!
//! Labels are allocated when the statement is completed, after its nested
//! statements.

use super::code::Instruction;
use super::engine::{take, Attributes, Evaluator, Inherited, Suffix};

impl Evaluator {
    /// `normal-statement-follow -> var-follow = expression ;`
    pub(crate) fn assignment(
        &mut self,
        inherited: &Inherited,
        mut children: Vec<Attributes>,
    ) -> Attributes {
        let Some(target) = &inherited.target else {
            return Attributes::default();
        };
        let subscript = take(&mut children, 0);
        let value = take(&mut children, 2);

        let mut code = subscript.code;
        code.extend(value.code);

        match subscript.suffix {
            Some(Suffix::Index { place, constant }) => {
                self.check_element(inherited.scope, target, constant);
                code.push(Instruction::IndexedStore {
                    array: target.name.clone(),
                    index: place,
                    value: value.place,
                });
            }
            _ => {
                self.check_variable(inherited.scope, target);
                code.push(Instruction::Assign {
                    dst: target.name.clone(),
                    src: value.place,
                });
            }
        }

        Attributes::with_code(code)
    }

    /// `normal-statement-follow -> call-follow ;`
    pub(crate) fn call_statement(
        &mut self,
        inherited: &Inherited,
        mut children: Vec<Attributes>,
    ) -> Attributes {
        let Some(target) = &inherited.target else {
            return Attributes::default();
        };
        let call = take(&mut children, 0);
        self.emit_call(target, call.args, call.code)
    }

    /// `selection-statement -> if ( expression ) { code-list } selection-follow`
    pub(crate) fn selection(&mut self, mut children: Vec<Attributes>) -> Attributes {
        let test = take(&mut children, 2);
        let consequent = take(&mut children, 5);
        let alternative = take(&mut children, 7);

        let cons_label = self.temps.new_label();
        let alt_label = self.temps.new_label();
        let join_label = self.temps.new_label();

        let mut code = test.code;
        code.push(Instruction::IfGoto {
            cond: test.place,
            label: cons_label.clone(),
        });
        code.push(Instruction::Label(alt_label));
        code.extend(alternative.code);
        code.push(Instruction::Goto(join_label.clone()));
        code.push(Instruction::Label(cons_label));
        code.extend(consequent.code);
        code.push(Instruction::Goto(join_label.clone()));
        code.push(Instruction::Label(join_label));

        Attributes::with_code(code)
    }

    /// `iteration-statement -> while ( expression ) iteration-follow`
    pub(crate) fn iteration(&mut self, mut children: Vec<Attributes>) -> Attributes {
        let test = take(&mut children, 2);
        let body = take(&mut children, 4);

        let test_label = self.temps.new_label();
        let body_label = self.temps.new_label();
        let end_label = self.temps.new_label();

        let mut code = vec![Instruction::Label(test_label.clone())];
        code.extend(test.code);
        code.push(Instruction::IfGoto {
            cond: test.place,
            label: body_label.clone(),
        });
        code.push(Instruction::Goto(end_label.clone()));
        code.push(Instruction::Label(body_label));
        code.extend(body.code);
        code.push(Instruction::Goto(test_label));
        code.push(Instruction::Label(end_label));

        Attributes::with_code(code)
    }

    /// `return-follow -> expression ;`
    pub(crate) fn return_value(mut children: Vec<Attributes>) -> Attributes {
        let value = take(&mut children, 0);
        let mut code = value.code;
        code.push(Instruction::Return(Some(value.place)));
        Attributes::with_code(code)
    }
}
