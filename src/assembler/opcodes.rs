//! The opcode table maps every IPPcode24 mnemonic to the operands it expects.
//!
//! ```text
//! MOVE        <var> <symb>         CREATEFRAME              PUSHFRAME
//! POPFRAME                         DEFVAR      <var>        CALL  <label>
//! RETURN                           PUSHS       <symb>       POPS  <var>
//! ADD SUB MUL IDIV LT GT EQ AND OR <var> <symb> <symb>
//! NOT INT2CHAR STRLEN TYPE         <var> <symb>
//! STRI2INT CONCAT GETCHAR SETCHAR  <var> <symb> <symb>
//! READ        <var> <type>         WRITE EXIT DPRINT <symb>
//! LABEL JUMP  <label>              JUMPIFEQ JUMPIFNEQ <label> <symb> <symb>
//! BREAK
//! ```
use std::fmt;

/// The role an operand position plays for a given opcode.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OperandRole {
    Variable,
    SymbolOrConstant,
    Label,
    TypeName,
}

impl fmt::Display for OperandRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OperandRole::Variable         => write!(f, "<var>"),
            OperandRole::SymbolOrConstant => write!(f, "<symb>"),
            OperandRole::Label            => write!(f, "<label>"),
            OperandRole::TypeName         => write!(f, "<type>"),
        }
    }
}

use OperandRole::*;

const ROLES_NONE: &[OperandRole] = &[];
const ROLES_V:    &[OperandRole] = &[Variable];
const ROLES_S:    &[OperandRole] = &[SymbolOrConstant];
const ROLES_L:    &[OperandRole] = &[Label];
const ROLES_VS:   &[OperandRole] = &[Variable, SymbolOrConstant];
const ROLES_VT:   &[OperandRole] = &[Variable, TypeName];
const ROLES_VSS:  &[OperandRole] = &[Variable, SymbolOrConstant, SymbolOrConstant];
const ROLES_LSS:  &[OperandRole] = &[Label, SymbolOrConstant, SymbolOrConstant];

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Opcode {
    MOVE,
    CREATEFRAME,
    PUSHFRAME,
    POPFRAME,
    DEFVAR,
    CALL,
    RETURN,
    PUSHS,
    POPS,
    ADD,
    SUB,
    MUL,
    IDIV,
    LT,
    GT,
    EQ,
    AND,
    OR,
    NOT,
    INT2CHAR,
    STRI2INT,
    READ,
    WRITE,
    CONCAT,
    STRLEN,
    GETCHAR,
    SETCHAR,
    TYPE,
    LABEL,
    JUMP,
    JUMPIFEQ,
    JUMPIFNEQ,
    EXIT,
    DPRINT,
    BREAK,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

impl Opcode {
    /// Every opcode in the table, in declaration order.
    pub const ALL: [Opcode; 35] = {
        use Opcode::*;
        [
            MOVE, CREATEFRAME, PUSHFRAME, POPFRAME, DEFVAR, CALL, RETURN,
            PUSHS, POPS, ADD, SUB, MUL, IDIV, LT, GT, EQ, AND, OR, NOT,
            INT2CHAR, STRI2INT, READ, WRITE, CONCAT, STRLEN, GETCHAR,
            SETCHAR, TYPE, LABEL, JUMP, JUMPIFEQ, JUMPIFNEQ, EXIT, DPRINT,
            BREAK,
        ]
    };

    /// Looks up a mnemonic, ignoring case.
    pub fn lookup(mnemonic: &str) -> Option<Opcode> {
        use Opcode::*;
        match mnemonic.to_uppercase().as_str() {
            "MOVE"        => Some(MOVE),
            "CREATEFRAME" => Some(CREATEFRAME),
            "PUSHFRAME"   => Some(PUSHFRAME),
            "POPFRAME"    => Some(POPFRAME),
            "DEFVAR"      => Some(DEFVAR),
            "CALL"        => Some(CALL),
            "RETURN"      => Some(RETURN),
            "PUSHS"       => Some(PUSHS),
            "POPS"        => Some(POPS),
            "ADD"         => Some(ADD),
            "SUB"         => Some(SUB),
            "MUL"         => Some(MUL),
            "IDIV"        => Some(IDIV),
            "LT"          => Some(LT),
            "GT"          => Some(GT),
            "EQ"          => Some(EQ),
            "AND"         => Some(AND),
            "OR"          => Some(OR),
            "NOT"         => Some(NOT),
            "INT2CHAR"    => Some(INT2CHAR),
            "STRI2INT"    => Some(STRI2INT),
            "READ"        => Some(READ),
            "WRITE"       => Some(WRITE),
            "CONCAT"      => Some(CONCAT),
            "STRLEN"      => Some(STRLEN),
            "GETCHAR"     => Some(GETCHAR),
            "SETCHAR"     => Some(SETCHAR),
            "TYPE"        => Some(TYPE),
            "LABEL"       => Some(LABEL),
            "JUMP"        => Some(JUMP),
            "JUMPIFEQ"    => Some(JUMPIFEQ),
            "JUMPIFNEQ"   => Some(JUMPIFNEQ),
            "EXIT"        => Some(EXIT),
            "DPRINT"      => Some(DPRINT),
            "BREAK"       => Some(BREAK),
            _ => None,
        }
    }

    /// The canonical (uppercase) mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        use Opcode::*;
        match self {
            MOVE        => "MOVE",
            CREATEFRAME => "CREATEFRAME",
            PUSHFRAME   => "PUSHFRAME",
            POPFRAME    => "POPFRAME",
            DEFVAR      => "DEFVAR",
            CALL        => "CALL",
            RETURN      => "RETURN",
            PUSHS       => "PUSHS",
            POPS        => "POPS",
            ADD         => "ADD",
            SUB         => "SUB",
            MUL         => "MUL",
            IDIV        => "IDIV",
            LT          => "LT",
            GT          => "GT",
            EQ          => "EQ",
            AND         => "AND",
            OR          => "OR",
            NOT         => "NOT",
            INT2CHAR    => "INT2CHAR",
            STRI2INT    => "STRI2INT",
            READ        => "READ",
            WRITE       => "WRITE",
            CONCAT      => "CONCAT",
            STRLEN      => "STRLEN",
            GETCHAR     => "GETCHAR",
            SETCHAR     => "SETCHAR",
            TYPE        => "TYPE",
            LABEL       => "LABEL",
            JUMP        => "JUMP",
            JUMPIFEQ    => "JUMPIFEQ",
            JUMPIFNEQ   => "JUMPIFNEQ",
            EXIT        => "EXIT",
            DPRINT      => "DPRINT",
            BREAK       => "BREAK",
        }
    }

    /// The ordered operand roles this opcode expects. Every operand is mandatory.
    pub fn operands(&self) -> &'static [OperandRole] {
        use Opcode::*;
        match self {
            CREATEFRAME | PUSHFRAME | POPFRAME |
            RETURN      | BREAK                 => ROLES_NONE,

            DEFVAR | POPS                       => ROLES_V,

            PUSHS | WRITE | EXIT | DPRINT       => ROLES_S,

            CALL | LABEL | JUMP                 => ROLES_L,

            MOVE     | NOT    | INT2CHAR |
            STRLEN   | TYPE                     => ROLES_VS,

            READ                                => ROLES_VT,

            ADD      | SUB    | MUL     | IDIV |
            LT       | GT     | EQ      | AND  |
            OR       | STRI2INT | CONCAT |
            GETCHAR  | SETCHAR              => ROLES_VSS,

            JUMPIFEQ | JUMPIFNEQ                => ROLES_LSS,
        }
    }
}
