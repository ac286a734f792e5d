use std::fmt;

use crate::parser::{BinOpKind, UnaryOpKind};

/// One three-address instruction. Operands are already-formatted values:
/// literal text, a variable name or a temporary.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Binary {
        dest: String,
        left: String,
        op: BinOpKind,
        right: String,
    },
    Unary {
        dest: String,
        op: UnaryOpKind,
        operand: String,
    },
    Copy {
        dest: String,
        src: String,
    },
    Param(String),
    Call {
        dest: String,
        func: String,
        argc: usize,
    },
    Label(String),
    Goto(String),
    IfFalse {
        cond: String,
        label: String,
    },
    FuncBegin(String),
    FuncEnd(String),
    Return(Option<String>),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Binary {
                dest,
                left,
                op,
                right,
            } => write!(f, "{} = {} {} {}", dest, left, op, right),
            Instruction::Unary { dest, op, operand } => write!(f, "{} = {}{}", dest, op, operand),
            Instruction::Copy { dest, src } => write!(f, "{} = {}", dest, src),
            Instruction::Param(value) => write!(f, "param {}", value),
            Instruction::Call { dest, func, argc } => {
                write!(f, "{} = call {}, {}", dest, func, argc)
            }
            Instruction::Label(label) => write!(f, "{}:", label),
            Instruction::Goto(label) => write!(f, "goto {}", label),
            Instruction::IfFalse { cond, label } => write!(f, "ifFalse {} goto {}", cond, label),
            Instruction::FuncBegin(name) => write!(f, "func begin {}", name),
            Instruction::FuncEnd(name) => write!(f, "func end {}", name),
            Instruction::Return(Some(value)) => write!(f, "return {}", value),
            Instruction::Return(None) => write!(f, "return"),
        }
    }
}
