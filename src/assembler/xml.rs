//! Renders a finished `Program` as the XML document read by the interpreter.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <program language="IPPcode24">
//!   <instruction order="1" opcode="DEFVAR">
//!     <arg1 type="var">GF@x</arg1>
//!   </instruction>
//! </program>
//! ```
use std::borrow::Cow;
use std::io::{self, Write};

use super::ast::{Instruction, Program};

const INDENT: &str = "  ";

pub fn write_program<W: Write + ?Sized>(program: &Program, out: &mut W) -> io::Result<()> {
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;

    let language = escape(program.language(), true);
    if program.is_empty() {
        writeln!(out, r#"<program language="{}" />"#, language)?;
        return out.flush();
    }

    writeln!(out, r#"<program language="{}">"#, language)?;
    for ins in program.instructions() {
        write_instruction(ins, out)?;
    }
    writeln!(out, "</program>")?;
    out.flush()
}

fn write_instruction<W: Write + ?Sized>(ins: &Instruction, out: &mut W) -> io::Result<()> {
    let open = format!(r#"{}<instruction order="{}" opcode="{}""#, INDENT, ins.order, ins.opcode);
    if ins.operands.is_empty() {
        return writeln!(out, "{} />", open);
    }

    writeln!(out, "{}>", open)?;
    for (idx, op) in ins.operands.iter().enumerate() {
        let open = format!(r#"{0}{0}<arg{1} type="{2}""#, INDENT, idx + 1, op.type_name());
        let value = op.value();
        if value.is_empty() {
            writeln!(out, "{} />", open)?;
        } else {
            writeln!(out, "{}>{}</arg{}>", open, escape(&value, false), idx + 1)?;
        }
    }
    writeln!(out, "{}</instruction>", INDENT)
}

/// Escapes markup characters; quotes too when inside an attribute.
fn escape(s: &str, attribute: bool) -> Cow<str> {
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>') || (attribute && c == '"');
    if !s.chars().any(needs_escape) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&'              => out.push_str("&amp;"),
            '<'              => out.push_str("&lt;"),
            '>'              => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _                => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::lexer::lines;
    use super::super::parser::Parser;

    fn render(src: &str) -> String {
        let program = Parser::new(lines(Box::new(src.as_bytes()))).run().ok().unwrap();
        let mut out: Vec<u8> = Vec::new();
        write_program(&program, &mut out).ok().unwrap();
        String::from_utf8(out).ok().unwrap()
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain", false), "plain");
        assert_eq!(escape("a<b>&c", false), "a&lt;b&gt;&amp;c");
        assert_eq!(escape(r#"say "hi""#, false), r#"say "hi""#);
        assert_eq!(escape(r#"say "hi""#, true), "say &quot;hi&quot;");
    }

    #[test]
    fn test_write_program() {
        let xml = render(".IPPcode24\nDEFVAR GF@x\nmove GF@x int@0x1F\nCREATEFRAME\nWRITE string@a<b&c\\010\n");
        assert_eq!(xml, concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<program language=\"IPPcode24\">\n",
            "  <instruction order=\"1\" opcode=\"DEFVAR\">\n",
            "    <arg1 type=\"var\">GF@x</arg1>\n",
            "  </instruction>\n",
            "  <instruction order=\"2\" opcode=\"MOVE\">\n",
            "    <arg1 type=\"var\">GF@x</arg1>\n",
            "    <arg2 type=\"int\">0x1F</arg2>\n",
            "  </instruction>\n",
            "  <instruction order=\"3\" opcode=\"CREATEFRAME\" />\n",
            "  <instruction order=\"4\" opcode=\"WRITE\">\n",
            "    <arg1 type=\"string\">a&lt;b&amp;c\\010</arg1>\n",
            "  </instruction>\n",
            "</program>\n",
        ));
    }

    #[test]
    fn test_write_program_operand_types() {
        let xml = render(".IPPcode24\nREAD LF@in bool\nJUMPIFNEQ end nil@nil bool@true\n");
        assert!(xml.contains("<arg2 type=\"type\">bool</arg2>"));
        assert!(xml.contains("<arg1 type=\"label\">end</arg1>"));
        assert!(xml.contains("<arg2 type=\"nil\">nil</arg2>"));
        assert!(xml.contains("<arg3 type=\"bool\">true</arg3>"));
    }

    #[test]
    fn test_write_empty_operand() {
        let xml = render(".IPPcode24\nCONCAT GF@s string@ string@x\n");
        assert!(xml.contains("    <arg2 type=\"string\" />\n"));
        assert!(xml.contains("    <arg3 type=\"string\">x</arg3>\n"));
        assert!(!xml.contains("<arg2 type=\"string\"></arg2>"));
    }

    #[test]
    fn test_write_empty_program() {
        assert_eq!(
            render(".IPPcode24 # nothing else\n"),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<program language=\"IPPcode24\" />\n"
        );
    }
}
