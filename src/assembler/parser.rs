//! The Parser module takes numbered lines from the lexer, checks the
//! header and validates every instruction against the opcode table,
//! building a `Program`.
//!
//! Parsing is fail-fast: the first error ends the run and the partially
//! built program is dropped.
use std::convert::TryFrom;
use std::io;

use regex::Regex;

use super::ast::*;
use super::error::{ParseError, SyntaxError};
use super::lexer::Line;
use super::opcodes::{Opcode, OperandRole};

/// Characters allowed in identifiers besides letters and digits.
const SPECIAL_CHARS: &str = r"_\-$&%*!?";

/// Digit characters outside `\p{Nd}` that still count as digits in names:
/// superscripts, subscripts, circled and parenthesized digits, Ethiopic,
/// New Tai Lue, Kharoshthi and digit-comma forms.
const OTHER_DIGITS: &str = concat!(
    r"\x{B2}\x{B3}\x{B9}\x{2070}\x{2074}-\x{2079}\x{2080}-\x{2089}",
    r"\x{2460}-\x{2468}\x{2474}-\x{247C}\x{2488}-\x{2490}\x{24EA}",
    r"\x{24F5}-\x{24FD}\x{24FF}\x{2776}-\x{277E}\x{2780}-\x{2788}",
    r"\x{278A}-\x{2792}\x{1369}-\x{1371}\x{19DA}\x{10A40}-\x{10A43}",
    r"\x{1F100}-\x{1F10A}",
);

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum State {
    AwaitingHeader,
    Parsing,
}

pub struct Parser<I> {
    lines:        I,
    program:      Program,
    state:        State,
    identifier:   Regex,
    /// Number of the last line read, blank or not.
    line_count:   usize,
    /// Non-blank lines seen, the header included.
    instr_count:  usize,
}

impl<I> Parser<I>
where
    I: Iterator<Item = Result<Line, (usize, io::Error)>>,
{
    pub fn new(lines: I) -> Self {
        let pattern = format!(r"^[\p{{L}}{0}][\p{{L}}\p{{Nd}}{1}{0}]*$", SPECIAL_CHARS, OTHER_DIGITS);
        Parser {
            lines,
            program:     Program::new(),
            state:       State::AwaitingHeader,
            identifier:  Regex::new(&pattern).expect("identifier pattern is valid"),
            line_count:  0,
            instr_count: 0,
        }
    }

    /// Run the parser, consuming itself and returning the finished program.
    pub fn run(mut self) -> Result<Program, ParseError> {
        while let Some(line) = self.lines.next() {
            let line = line.map_err(|(line, source)| ParseError::Input { line, source })?;
            self.line_count = line.number;

            let mnemonic = match &line.mnemonic {
                Some(m) => m,
                None => continue,
            };
            trace!("line {}: {} {:?}", line.number, mnemonic, line.operands);

            match self.state {
                State::AwaitingHeader => {
                    self.header(&line, mnemonic)?;
                    self.state = State::Parsing;
                },
                State::Parsing => {
                    let ins = self.instruction(self.instr_count, &line)?;
                    debug!("{:>4}: {}", ins.order, ins);
                    self.program.push(ins);
                },
            }
            self.instr_count += 1;
        }

        match self.state {
            State::AwaitingHeader => Err(ParseError::MissingHeader),
            State::Parsing => {
                if self.program.len() + 1 != self.instr_count {
                    return Err(ParseError::Internal(format!(
                        "{} instruction(s) built from {} non-blank line(s)",
                        self.program.len(), self.instr_count
                    )));
                }
                info!("parsed {} line(s), {} instruction(s)", self.line_count, self.program.len());
                Ok(self.program)
            },
        }
    }

    fn header(&self, line: &Line, mnemonic: &str) -> Result<(), ParseError> {
        if mnemonic.to_uppercase() != format!(".{}", LANGUAGE).to_uppercase() {
            return Err(ParseError::InvalidHeader { line: line.number, found: mnemonic.to_owned() });
        }
        if !line.operands.is_empty() {
            warn!("ignoring {} token(s) after the header on line {}", line.operands.len(), line.number);
        }
        Ok(())
    }

    /// Validates one non-blank line into an instruction numbered `order`.
    fn instruction(&self, order: usize, line: &Line) -> Result<Instruction, ParseError> {
        let mnemonic = line.mnemonic.as_deref().unwrap_or_default();

        let opcode = Opcode::lookup(mnemonic).ok_or_else(|| ParseError::InvalidOpcode {
            line:   line.number,
            opcode: mnemonic.to_owned(),
        })?;

        let syntax = |error: SyntaxError| ParseError::Syntax {
            line: line.number,
            opcode: mnemonic.to_owned(),
            error,
        };

        let roles = opcode.operands();
        let (expected, found) = (roles.len(), line.operands.len());
        if found < expected {
            return Err(syntax(SyntaxError::TooFewOperands { expected, found }));
        }
        if found > expected {
            return Err(syntax(SyntaxError::TooManyOperands { expected, found }));
        }

        let operands = roles
            .iter()
            .zip(line.operands.iter())
            .map(|(role, tok)| self.operand(*role, tok))
            .collect::<Result<Vec<Operand>, SyntaxError>>()
            .map_err(syntax)?;

        Ok(Instruction { order, opcode, operands })
    }

    fn operand(&self, role: OperandRole, tok: &str) -> Result<Operand, SyntaxError> {
        match role {
            OperandRole::Variable => self.variable(tok).map_err(|reason| {
                SyntaxError::InvalidVariable { operand: tok.to_owned(), reason }
            }),

            OperandRole::SymbolOrConstant => match self.variable(tok) {
                Ok(var) => Ok(var),
                Err(var_reason) => constant(tok).map(Operand::Const).map_err(|const_reason| {
                    SyntaxError::InvalidSymbol { operand: tok.to_owned(), var_reason, const_reason }
                }),
            },

            OperandRole::Label => match self.name(tok) {
                Ok(())  => Ok(Operand::Label(tok.to_owned())),
                Err(_)  => Err(SyntaxError::InvalidLabel { operand: tok.to_owned() }),
            },

            OperandRole::TypeName => match tok {
                "int" | "string" | "bool" => Ok(Operand::Type(tok.to_owned())),
                _ => Err(SyntaxError::InvalidType { operand: tok.to_owned() }),
            },
        }
    }

    /// `FRAME@name`
    fn variable(&self, tok: &str) -> Result<Operand, &'static str> {
        let (frame, name) = split_at_sign(tok).ok_or("frame name is absent")?;
        let frame = Frame::try_from(frame)?;
        self.name(name)?;
        Ok(Operand::Var(frame, name.to_owned()))
    }

    /// Identifiers start with a letter or special character, followed by
    /// letters, digits or special characters.
    fn name(&self, s: &str) -> Result<(), &'static str> {
        if s.is_empty() {
            Err("name is empty")
        } else if self.identifier.is_match(s) {
            Ok(())
        } else {
            Err("illegal characters in name")
        }
    }
}

/// Splits at the first `@`.
fn split_at_sign(tok: &str) -> Option<(&str, &str)> {
    let idx = tok.find('@')?;
    Some((&tok[..idx], &tok[idx + 1..]))
}

/// `type@literal`
fn constant(tok: &str) -> Result<Constant, &'static str> {
    let (kind, literal) = split_at_sign(tok).ok_or("type is absent")?;

    match kind {
        "nil" => match literal {
            "nil" => Ok(Constant::Nil),
            _     => Err("invalid value for nil type"),
        },
        "int" => {
            let value = integer(literal)?;
            Ok(Constant::Int { value, literal: literal.to_owned() })
        },
        "bool" => match literal {
            "true"  => Ok(Constant::Bool(true)),
            "false" => Ok(Constant::Bool(false)),
            _       => Err("invalid value for bool type"),
        },
        "string" => {
            if string_escapes_valid(literal) {
                Ok(Constant::Str(literal.to_owned()))
            } else {
                Err("invalid escape expression in string")
            }
        },
        _ => Err("invalid type"),
    }
}

/// Parses an integer literal.
///
/// `0x`/`-0x` selects hexadecimal, `0o`/`-0o` octal (prefixes are
/// case-insensitive); anything else is decimal with an optional sign.
/// Single underscores may separate digits.
///
/// Only the digits decide whether the literal is valid. The value is
/// `None` when it does not fit in 64 bits.
fn integer(literal: &str) -> Result<Option<i64>, &'static str> {
    const INVALID: &str = "invalid integer value";

    let (negative, unsigned) = match literal.strip_prefix('-') {
        Some(rest) => (true, rest),
        None       => (false, literal),
    };

    let prefix = unsigned.get(..2).map(|p| p.to_ascii_lowercase());
    let (radix, digits) = match prefix.as_deref() {
        Some("0x") => (16, &unsigned[2..]),
        Some("0o") => (8, &unsigned[2..]),
        _ => {
            // A `+` sign is only allowed on decimal literals.
            let digits = match (negative, unsigned.strip_prefix('+')) {
                (false, Some(rest)) => rest,
                _                   => unsigned,
            };
            (10, digits)
        },
    };

    let digits = strip_separators(digits, radix != 10).ok_or(INVALID)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(INVALID);
    }

    let signed = if negative { format!("-{}", digits) } else { digits };
    Ok(i64::from_str_radix(&signed, radix).ok())
}

/// Removes `_` digit separators, rejecting doubled or trailing ones and a
/// leading one unless it directly follows a base prefix.
fn strip_separators(digits: &str, after_prefix: bool) -> Option<String> {
    if digits.ends_with('_') || digits.contains("__") || (digits.starts_with('_') && !after_prefix) {
        return None;
    }
    Some(digits.replace('_', ""))
}

/// Every backslash must be followed by exactly three decimal digits.
/// The digits are not range checked.
fn string_escapes_valid(literal: &str) -> bool {
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            for _ in 0..3 {
                match chars.next() {
                    Some(d) if d.is_ascii_digit() => {},
                    _ => return false,
                }
            }
        }
    }
    true
}
