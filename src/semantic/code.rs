//! Three-address code
//!
//! Each [`Instruction`] renders to exactly one line of output. Labels render
//! as `name:`, everything else as an operation line.

use std::fmt;

use super::constants::RESULT_NAME;

/// Binary operators of the expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
        };
        f.write_str(op)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `dst := src`
    Assign { dst: String, src: String },
    /// `dst := lhs op rhs`
    Binary {
        dst: String,
        lhs: String,
        op: BinOp,
        rhs: String,
    },
    /// `array[index] := value`
    IndexedStore {
        array: String,
        index: String,
        value: String,
    },
    /// `dst := array[index]`
    IndexedLoad {
        dst: String,
        array: String,
        index: String,
    },
    /// `param x`
    Param(String),
    /// `call f, n`
    Call { function: String, argc: usize },
    /// `dst := result`
    CallResult { dst: String },
    /// `return` or `return x`
    Return(Option<String>),
    /// `goto L`
    Goto(String),
    /// `if c goto L`
    IfGoto { cond: String, label: String },
    /// `L:`
    Label(String),
}

impl Instruction {
    pub fn is_label(&self) -> bool {
        matches!(self, Instruction::Label(_))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Assign { dst, src } => write!(f, "{} := {}", dst, src),
            Instruction::Binary { dst, lhs, op, rhs } => {
                write!(f, "{} := {} {} {}", dst, lhs, op, rhs)
            }
            Instruction::IndexedStore {
                array,
                index,
                value,
            } => write!(f, "{}[{}] := {}", array, index, value),
            Instruction::IndexedLoad { dst, array, index } => {
                write!(f, "{} := {}[{}]", dst, array, index)
            }
            Instruction::Param(name) => write!(f, "param {}", name),
            Instruction::Call { function, argc } => write!(f, "call {}, {}", function, argc),
            Instruction::CallResult { dst } => write!(f, "{} := {}", dst, RESULT_NAME),
            Instruction::Return(None) => write!(f, "return"),
            Instruction::Return(Some(value)) => write!(f, "return {}", value),
            Instruction::Goto(label) => write!(f, "goto {}", label),
            Instruction::IfGoto { cond, label } => write!(f, "if {} goto {}", cond, label),
            Instruction::Label(label) => write!(f, "{}:", label),
        }
    }
}

/// Render a listing one instruction per line.
pub fn listing(code: &[Instruction]) -> String {
    let mut out = String::new();
    for instruction in code {
        out.push_str(&instruction.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_text() {
        let cases = [
            (
                Instruction::Assign {
                    dst: "x".into(),
                    src: "1".into(),
                },
                "x := 1",
            ),
            (
                Instruction::Binary {
                    dst: "_v0".into(),
                    lhs: "a".into(),
                    op: BinOp::Le,
                    rhs: "b".into(),
                },
                "_v0 := a <= b",
            ),
            (
                Instruction::IndexedStore {
                    array: "a".into(),
                    index: "0".into(),
                    value: "1".into(),
                },
                "a[0] := 1",
            ),
            (
                Instruction::IndexedLoad {
                    dst: "_v1".into(),
                    array: "a".into(),
                    index: "i".into(),
                },
                "_v1 := a[i]",
            ),
            (Instruction::Param("x".into()), "param x"),
            (
                Instruction::Call {
                    function: "f".into(),
                    argc: 2,
                },
                "call f, 2",
            ),
            (Instruction::CallResult { dst: "_v2".into() }, "_v2 := result"),
            (Instruction::Return(None), "return"),
            (Instruction::Return(Some("x".into())), "return x"),
            (Instruction::Goto("__b0".into()), "goto __b0"),
            (
                Instruction::IfGoto {
                    cond: "_v0".into(),
                    label: "__b1".into(),
                },
                "if _v0 goto __b1",
            ),
            (Instruction::Label("main".into()), "main:"),
        ];
        for (instruction, text) in cases {
            assert_eq!(instruction.to_string(), text);
        }
    }

    #[test]
    fn test_listing() {
        let code = vec![
            Instruction::Label("f".into()),
            Instruction::Return(Some("1".into())),
        ];
        assert_eq!(listing(&code), "f:\nreturn 1\n");
        assert!(code[0].is_label());
        assert!(!code[1].is_label());
    }
}
