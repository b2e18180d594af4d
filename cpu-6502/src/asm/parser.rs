//! Recursive-descent parser: tokens -> `IrNode`s. Each statement is a label
//! definition, a directive, or an instruction; a parse error resyncs at the
//! next newline so the rest of the file is still checked.

use colored::*;

use super::ir::{DirectiveNode, DirectiveValue, InstructionNode, IrNode, LabelNode, Operand};
use super::lexer::{Token, TokenKind};
use crate::opcodes::{instruction_mode_to_opcode, match_instruction, is_branch, Mode};

#[derive(Debug, Clone)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl ParseError {
    /// Renders the same message with ANSI color for interactive terminals.
    pub fn to_colored_string(&self) -> String {
        format!(
            "{} {}",
            format!("line {}:", self.line).cyan(),
            self.message.bright_red()
        )
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Parser {
        Parser { tokens, position: 0 }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn peek(&self, offset: usize) -> &Token {
        let index = (self.position + offset).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn skip_to_next_line(&mut self) {
        while !self.is_at_end() && self.current().kind != TokenKind::Newline {
            self.advance();
        }
        if self.current().kind == TokenKind::Newline {
            self.advance();
        }
    }

    /// Parses the whole token stream, collecting every recoverable error
    /// instead of stopping at the first one.
    pub fn parse(mut self) -> (Vec<IrNode>, Vec<ParseError>) {
        let mut nodes = Vec::new();
        let mut errors = Vec::new();

        while !self.is_at_end() {
            if self.current().kind == TokenKind::Newline {
                self.advance();
                continue;
            }

            match self.parse_statement() {
                Ok(node) => nodes.push(node),
                Err(error) => {
                    errors.push(error);
                    self.skip_to_next_line();
                }
            }
        }

        (nodes, errors)
    }

    fn parse_statement(&mut self) -> Result<IrNode, ParseError> {
        let line = self.current().line;

        if let TokenKind::Identifier(_) = &self.current().kind {
            if self.peek(1).kind == TokenKind::Colon {
                return self.parse_label();
            }
        }

        if matches!(self.current().kind, TokenKind::Org | TokenKind::Word | TokenKind::Byte) {
            return self.parse_directive();
        }

        if let TokenKind::Identifier(_) = &self.current().kind {
            return self.parse_instruction();
        }

        Err(ParseError {
            line,
            message: format!("expected label, directive, or instruction, found '{}'", self.current().text),
        })
    }

    fn parse_label(&mut self) -> Result<IrNode, ParseError> {
        let line = self.current().line;
        let name = match &self.current().kind {
            TokenKind::Identifier(name) => name.clone(),
            _ => unreachable!("parse_label called without an identifier"),
        };
        self.advance();
        self.advance(); // colon
        Ok(IrNode::Label(LabelNode { name, address: 0, line }))
    }

    fn parse_directive(&mut self) -> Result<IrNode, ParseError> {
        let line = self.current().line;
        let name = match self.current().kind {
            TokenKind::Org => "org",
            TokenKind::Word => "word",
            TokenKind::Byte => "byte",
            _ => unreachable!("parse_directive called on a non-directive token"),
        }
        .to_string();
        self.advance();

        let value = match name.as_str() {
            "org" => {
                let number = self.expect_number(line, ".org")?;
                DirectiveValue::Number(number)
            }
            "word" => match &self.current().kind {
                TokenKind::Number(n) => {
                    let n = *n;
                    self.advance();
                    DirectiveValue::Number(n as u16)
                }
                TokenKind::Identifier(label) => {
                    let label = label.clone();
                    self.advance();
                    DirectiveValue::Label(label)
                }
                _ => {
                    return Err(ParseError {
                        line,
                        message: ".word directive requires a number or label".to_string(),
                    })
                }
            },
            "byte" => {
                let number = self.expect_number(line, ".byte")?;
                if number > 0xFF {
                    return Err(ParseError {
                        line,
                        message: format!(".byte value {} out of range 0-255", number),
                    });
                }
                DirectiveValue::Number(number)
            }
            _ => unreachable!(),
        };

        Ok(IrNode::Directive(DirectiveNode { name, value, line }))
    }

    fn expect_number(&mut self, line: usize, directive: &str) -> Result<u16, ParseError> {
        match self.current().kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok(n as u16)
            }
            _ => Err(ParseError {
                line,
                message: format!("{} directive requires a number", directive),
            }),
        }
    }

    fn parse_instruction(&mut self) -> Result<IrNode, ParseError> {
        let line = self.current().line;
        let mnemonic = match &self.current().kind {
            TokenKind::Identifier(name) => name.clone(),
            _ => unreachable!("parse_instruction called without an identifier"),
        };

        let instruction = match_instruction(&mnemonic)
            .ok_or_else(|| ParseError { line, message: format!("unknown instruction '{}'", mnemonic) })?;
        self.advance();

        let has_operand = !self.is_at_end() && self.current().kind != TokenKind::Newline;
        let (operand, mut mode) = if has_operand {
            self.parse_operand(line)?
        } else {
            (Operand::None, Mode::Implied)
        };

        // Branch mnemonics always use relative addressing, regardless of how
        // the operand token looked to the generic operand parser.
        if is_branch(instruction) {
            mode = Mode::Relative;
        }
        let operand = match operand {
            Operand::Address { value, .. } if is_branch(instruction) => Operand::Address { value, mode },
            Operand::Label { name, .. } if is_branch(instruction) => Operand::Label { name, mode },
            other => other,
        };

        if instruction_mode_to_opcode(instruction, mode).is_err() {
            return Err(ParseError {
                line,
                message: format!("invalid addressing mode for instruction {}", mnemonic.to_ascii_uppercase()),
            });
        }

        Ok(IrNode::Instruction(InstructionNode {
            mnemonic: mnemonic.to_ascii_lowercase(),
            mode,
            operand,
            line,
        }))
    }

    fn parse_operand(&mut self, line: usize) -> Result<(Operand, Mode), ParseError> {
        match &self.current().kind {
            TokenKind::Hash => self.parse_immediate(line),
            TokenKind::LParen => self.parse_indirect(line),
            TokenKind::Identifier(name) if name == "A" => {
                self.advance();
                Ok((Operand::None, Mode::Accumulator))
            }
            _ => self.parse_zero_page_or_absolute(line),
        }
    }

    fn parse_immediate(&mut self, line: usize) -> Result<(Operand, Mode), ParseError> {
        self.advance(); // '#'
        match self.current().kind.clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok((Operand::Immediate(n as u16), Mode::Immediate))
            }
            TokenKind::Identifier(label) => {
                self.advance();
                Ok((Operand::Label { name: label, mode: Mode::Immediate }, Mode::Immediate))
            }
            _ => Err(ParseError { line, message: "expected number or label after '#'".to_string() }),
        }
    }

    fn parse_zero_page_or_absolute(&mut self, line: usize) -> Result<(Operand, Mode), ParseError> {
        match self.current().kind.clone() {
            TokenKind::Number(n) => {
                let address = n as u16;
                self.advance();
                let default_mode = if address <= 0xFF { Mode::ZeroPage } else { Mode::Absolute };
                let mode = self.parse_optional_index(default_mode, address <= 0xFF)?;
                Ok((Operand::Address { value: address, mode }, mode))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                // Forward label references default to Absolute width; a
                // later numeric literal could still be zero-page, but a
                // label's eventual address is not known at parse time.
                let mode = self.parse_optional_index(Mode::Absolute, false)?;
                Ok((Operand::Label { name, mode }, mode))
            }
            _ => Err(ParseError { line, message: "expected an address or a label".to_string() }),
        }
    }

    fn parse_optional_index(&mut self, base_mode: Mode, zero_page: bool) -> Result<Mode, ParseError> {
        if self.current().kind != TokenKind::Comma {
            return Ok(base_mode);
        }
        self.advance();
        match self.current().kind {
            TokenKind::XIndex => {
                self.advance();
                Ok(if zero_page { Mode::ZeroPageX } else { Mode::AbsoluteX })
            }
            TokenKind::YIndex => {
                self.advance();
                Ok(if zero_page { Mode::ZeroPageY } else { Mode::AbsoluteY })
            }
            _ => Err(ParseError {
                line: self.current().line,
                message: "expected X or Y after ','".to_string(),
            }),
        }
    }

    fn parse_indirect(&mut self, line: usize) -> Result<(Operand, Mode), ParseError> {
        self.advance(); // '('
        let (address_value, label_name) = match self.current().kind.clone() {
            TokenKind::Number(n) => {
                self.advance();
                (Some(n as u16), None)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                (None, Some(name))
            }
            _ => return Err(ParseError { line, message: "expected an address or a label in indirect addressing".to_string() }),
        };

        // (addr,X)
        if self.current().kind == TokenKind::Comma && self.peek(1).kind == TokenKind::XIndex {
            self.advance();
            self.advance();
            self.expect_rparen(line)?;
            return Ok(self.finish_indirect(address_value, label_name, Mode::IndirectX));
        }

        self.expect_rparen(line)?;

        // (addr),Y
        if self.current().kind == TokenKind::Comma && self.peek(1).kind == TokenKind::YIndex {
            self.advance();
            self.advance();
            return Ok(self.finish_indirect(address_value, label_name, Mode::IndirectY));
        }

        Ok(self.finish_indirect(address_value, label_name, Mode::Indirect))
    }

    fn finish_indirect(&self, address_value: Option<u16>, label_name: Option<String>, mode: Mode) -> (Operand, Mode) {
        match (address_value, label_name) {
            (Some(value), _) => (Operand::Address { value, mode }, mode),
            (None, Some(name)) => (Operand::Label { name, mode }, mode),
            _ => unreachable!("parse_indirect always produces one of address or label"),
        }
    }

    fn expect_rparen(&mut self, line: usize) -> Result<(), ParseError> {
        if self.current().kind != TokenKind::RParen {
            return Err(ParseError { line, message: "expected ')'".to_string() });
        }
        self.advance();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::asm::lexer::Lexer;

    fn parse(source: &str) -> (Vec<IrNode>, Vec<ParseError>) {
        let tokens = Lexer::new(source).tokenize();
        Parser::new(tokens).parse()
    }

    #[test]
    fn parses_a_label_definition() {
        let (nodes, errors) = parse("loop:\n");
        assert!(errors.is_empty());
        assert!(matches!(&nodes[0], IrNode::Label(node) if node.name == "loop"));
    }

    #[test]
    fn parses_immediate_instruction() {
        let (nodes, errors) = parse("LDA #$10\n");
        assert!(errors.is_empty());
        match &nodes[0] {
            IrNode::Instruction(node) => {
                assert_eq!(node.mode, Mode::Immediate);
                assert_eq!(node.operand, Operand::Immediate(0x10));
            }
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn numeric_operand_under_256_infers_zero_page() {
        let (nodes, _) = parse("LDA $10\n");
        assert!(matches!(&nodes[0], IrNode::Instruction(node) if node.mode == Mode::ZeroPage));
    }

    #[test]
    fn label_operand_defaults_to_absolute() {
        let (nodes, _) = parse("JMP target\n");
        assert!(matches!(&nodes[0], IrNode::Instruction(node) if node.mode == Mode::Absolute));
    }

    #[test]
    fn branch_to_a_label_forces_relative_mode() {
        let (nodes, _) = parse("BNE target\n");
        assert!(matches!(&nodes[0], IrNode::Instruction(node) if node.mode == Mode::Relative));
    }

    #[test]
    fn invalid_addressing_mode_is_rejected() {
        let (_, errors) = parse("JSR #$10\n");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn a_parse_error_does_not_block_later_lines() {
        let (nodes, errors) = parse("@\nNOP\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn indirect_addressing_modes() {
        let (nodes, _) = parse("LDA ($10,X)\nLDA ($10),Y\nJMP ($1000)\n");
        assert!(matches!(&nodes[0], IrNode::Instruction(node) if node.mode == Mode::IndirectX));
        assert!(matches!(&nodes[1], IrNode::Instruction(node) if node.mode == Mode::IndirectY));
        assert!(matches!(&nodes[2], IrNode::Instruction(node) if node.mode == Mode::Indirect));
    }
}
