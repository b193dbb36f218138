//! This lexer splits IPPcode24 source into lines of raw tokens.
//!
//! Tokens are runs of anything other than spaces, tabs and `#`. A `#`
//! starts a comment running to the end of the line. The lexer does not
//! look at what the tokens mean; classifying operands is the parser's job.
use std::io::{self, BufRead, BufReader, Read};

/// One source line, split into an optional mnemonic and its operand tokens.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Line {
    /// 1-based line number in the source.
    pub number:   usize,
    pub mnemonic: Option<String>,
    /// Every token after the mnemonic; never truncated.
    pub operands: Vec<String>,
}

impl Line {
    /// Empty and comment-only lines are blank.
    pub fn is_blank(&self) -> bool {
        self.mnemonic.is_none()
    }
}

/// Reads numbered lines from `reader`.
/// Read failures are yielded with the number of the line that failed.
pub fn lines<T: Read + ?Sized>(reader: Box<T>) -> impl Iterator<Item = Result<Line, (usize, io::Error)>> {
    BufReader::new(reader)
        .lines()
        .enumerate()
        .map(|(index, line)| match line {
            Ok(s)  => Ok(tokenize_line(&s, index + 1)),
            Err(e) => Err((index + 1, e)),
        })
}

pub fn tokenize_line(line: &str, line_num: usize) -> Line {
    let code = match line.find('#') {
        Some(idx) => &line[..idx],
        None      => line,
    };

    let mut tokens = code
        .split(|c: char| c == ' ' || c == '\t')
        .filter(|tok| !tok.is_empty())
        .map(str::to_owned);

    let mnemonic = tokens.next();
    let operands = tokens.collect();

    Line { number: line_num, mnemonic, operands }
}
