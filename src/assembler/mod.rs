//! The Assembler module is in charge of taking an
//! IPPcode24 source file and producing a validated `Program`
//! from the AST submodule, ready to be written out as XML.
//!
//! It does this by implementing a line tokenizer and a
//! table-driven validator for each instruction's operands.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod opcodes;
pub mod parser;
pub mod xml;
