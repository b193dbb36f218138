//! This AST describes a validated IPPcode24 program.
//!
//! A source file starts with the `.IPPcode24` header (case-insensitive)
//! and holds at most one instruction per line. `#` starts a comment.
//!
//! ```text
//! .IPPcode24
//! DEFVAR GF@counter          # variables are FRAME@name
//! MOVE GF@counter int@0x1F   # constants are type@literal
//! LABEL loop
//! JUMPIFEQ end GF@counter nil@nil
//! READ GF@counter int
//! WRITE string@done\010      # \ddd escapes a character code
//! ```
//!
//! Nothing beyond lexical form is checked here: a variable may be used
//! without being declared, and jumps may target labels that never appear.
use std::borrow::Cow;
use std::fmt;

use super::opcodes::Opcode;

/// The language identifier carried by every program.
pub const LANGUAGE: &str = "IPPcode24";

/// The storage scope a variable lives in.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Frame {
    GF,
    LF,
    TF,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::convert::TryFrom<&str> for Frame {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Frame names are case-sensitive.
        match value {
            "GF" => Ok(Frame::GF),
            "LF" => Ok(Frame::LF),
            "TF" => Ok(Frame::TF),
            _    => Err("invalid frame name"),
        }
    }
}

/// A typed literal.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Constant {
    Nil,
    /// The parsed value and the literal as written (`0x1F`, `-0o17`, ...).
    /// `value` is `None` for literals too wide for 64 bits.
    Int { value: Option<i64>, literal: String },
    Bool(bool),
    /// The literal as written, `\ddd` escapes left undecoded.
    Str(String),
}

impl Constant {
    pub fn type_name(&self) -> &'static str {
        match self {
            Constant::Nil        => "nil",
            Constant::Int { .. } => "int",
            Constant::Bool(_)    => "bool",
            Constant::Str(_)     => "string",
        }
    }

    /// The text after the `@`, exactly as it appeared in the source.
    pub fn literal(&self) -> &str {
        match self {
            Constant::Nil                 => "nil",
            Constant::Int { literal, .. } => literal.as_str(),
            Constant::Bool(true)          => "true",
            Constant::Bool(false)         => "false",
            Constant::Str(s)              => s.as_str(),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}@{}", self.type_name(), self.literal())
    }
}

/// A classified operand.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Operand {
    Var(Frame, String),
    Const(Constant),
    Label(String),
    Type(String),
}

impl Operand {
    /// The operand's type as named in the XML representation.
    pub fn type_name(&self) -> &'static str {
        match self {
            Operand::Var(_, _)  => "var",
            Operand::Const(c)   => c.type_name(),
            Operand::Label(_)   => "label",
            Operand::Type(_)    => "type",
        }
    }

    /// The operand's value as named in the XML representation.
    pub fn value(&self) -> Cow<str> {
        match self {
            Operand::Var(frame, name) => Cow::Owned(format!("{}@{}", frame, name)),
            Operand::Const(c)         => Cow::Borrowed(c.literal()),
            Operand::Label(name) |
            Operand::Type(name)       => Cow::Borrowed(name.as_str()),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Const(c) => write!(f, "{}", c),
            _                 => write!(f, "{}", self.value()),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Instruction {
    /// 1-based position among the program's instructions.
    pub order:    usize,
    pub opcode:   Opcode,
    pub operands: Vec<Operand>,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for op in self.operands.iter() {
            write!(f, " {}", op)?;
        }
        Ok(())
    }
}

/// A validated program. Instructions are only ever appended.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Program {
    language:     &'static str,
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new() -> Self {
        Program { language: LANGUAGE, instructions: Vec::with_capacity(256) }
    }

    pub fn language(&self) -> &'static str {
        self.language
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub(super) fn push(&mut self, ins: Instruction) {
        self.instructions.push(ins);
    }
}

impl Default for Program {
    fn default() -> Self {
        Program::new()
    }
}
