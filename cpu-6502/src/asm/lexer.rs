//! Tokenizer for 6502 assembly source. Whitespace other than newlines is
//! insignificant; `;` starts a comment that runs to end of line.

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    Number(u32),
    String(String),
    Plus,
    Minus,
    Hash,
    Comma,
    Colon,
    LParen,
    RParen,
    XIndex,
    YIndex,
    Org,
    Word,
    Byte,
    Newline,
    Eof,
    Unknown(char),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            source,
            chars: source.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn advance(&mut self) {
        if self.current() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.current() {
                Some(c) if c.is_whitespace() && c != '\n' => self.advance(),
                Some(';') => {
                    while self.current().is_some() && self.current() != Some('\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        if self.current() == Some('.') {
            result.push('.');
            self.advance();
        }
        while let Some(c) = self.current() {
            if c.is_alphanumeric() || c == '_' {
                result.push(c);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_number(&mut self) -> Result<u32, String> {
        match self.current() {
            Some('$') => {
                self.advance();
                let mut digits = String::new();
                while let Some(c) = self.current() {
                    if c.is_ascii_hexdigit() {
                        digits.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
                u32::from_str_radix(&digits, 16).map_err(|_| format!("invalid hex literal '${}'", digits))
            }
            Some('%') => {
                self.advance();
                let mut digits = String::new();
                while let Some(c) = self.current() {
                    if c == '0' || c == '1' {
                        digits.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
                u32::from_str_radix(&digits, 2).map_err(|_| format!("invalid binary literal '%{}'", digits))
            }
            _ => {
                let mut digits = String::new();
                while let Some(c) = self.current() {
                    if c.is_ascii_digit() {
                        digits.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
                digits.parse::<u32>().map_err(|_| format!("invalid decimal literal '{}'", digits))
            }
        }
    }

    fn read_string(&mut self) -> String {
        let mut result = String::new();
        self.advance(); // opening quote
        while let Some(c) = self.current() {
            if c == '"' {
                break;
            }
            if c == '\\' {
                self.advance();
                match self.current() {
                    Some('n') => result.push('\n'),
                    Some('t') => result.push('\t'),
                    Some('r') => result.push('\r'),
                    Some(other) => result.push(other),
                    None => break,
                }
                self.advance();
            } else {
                result.push(c);
                self.advance();
            }
        }
        if self.current() == Some('"') {
            self.advance();
        }
        result
    }

    /// Tokenizes the full source. Numeric parse failures are collected as
    /// `Unknown` tokens so the parser can report them with line context
    /// instead of the lexer aborting outright.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let (line, column) = (self.line, self.column);

            let Some(c) = self.current() else {
                tokens.push(Token { kind: TokenKind::Eof, text: String::new(), line, column });
                break;
            };

            if c == '\n' {
                self.advance();
                tokens.push(Token { kind: TokenKind::Newline, text: "\\n".to_string(), line, column });
                continue;
            }

            if c.is_alphabetic() || c == '_' || c == '.' {
                let text = self.read_identifier();
                let kind = match text.as_str() {
                    "X" | "x" => TokenKind::XIndex,
                    "Y" | "y" => TokenKind::YIndex,
                    ".org" | "org" => TokenKind::Org,
                    ".word" | "word" => TokenKind::Word,
                    ".byte" | "byte" => TokenKind::Byte,
                    _ => TokenKind::Identifier(text.clone()),
                };
                tokens.push(Token { kind, text, line, column });
                continue;
            }

            if c.is_ascii_digit() || c == '$' || c == '%' {
                let text: String = self.peek_number_text();
                match self.read_number() {
                    Ok(value) => tokens.push(Token { kind: TokenKind::Number(value), text, line, column }),
                    Err(message) => tokens.push(Token { kind: TokenKind::Unknown('?'), text: message, line, column }),
                }
                continue;
            }

            if c == '"' {
                let value = self.read_string();
                tokens.push(Token { kind: TokenKind::String(value.clone()), text: value, line, column });
                continue;
            }

            let single = |kind: TokenKind, text: &str| Token { kind, text: text.to_string(), line, column };
            let token = match c {
                '+' => single(TokenKind::Plus, "+"),
                '-' => single(TokenKind::Minus, "-"),
                '#' => single(TokenKind::Hash, "#"),
                ',' => single(TokenKind::Comma, ","),
                ':' => single(TokenKind::Colon, ":"),
                '(' => single(TokenKind::LParen, "("),
                ')' => single(TokenKind::RParen, ")"),
                other => single(TokenKind::Unknown(other), &other.to_string()),
            };
            self.advance();
            tokens.push(token);
        }
        tokens
    }

    fn peek_number_text(&self) -> String {
        let mut end = self.position;
        if matches!(self.chars.get(end), Some('$') | Some('%')) {
            end += 1;
        }
        while matches!(self.chars.get(end), Some(c) if c.is_ascii_hexdigit() || *c == '_') {
            end += 1;
        }
        self.chars[self.position..end].iter().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn skips_whitespace_and_comments() {
        let tokens = kinds("  LDA #$10 ; load it\n");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Identifier("LDA".to_string()),
                TokenKind::Hash,
                TokenKind::Number(0x10),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn reads_all_three_number_bases() {
        let tokens = kinds("$FF %1010 42");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Number(0xFF),
                TokenKind::Number(0b1010),
                TokenKind::Number(42),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn recognizes_register_index_markers() {
        let tokens = kinds("LDA $10,X");
        assert!(tokens.contains(&TokenKind::XIndex));
    }

    #[test]
    fn label_definitions_use_colon() {
        let tokens = kinds("loop:");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Identifier("loop".to_string()),
                TokenKind::Colon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn directive_keywords_accept_dot_and_bare_forms() {
        assert_eq!(kinds(".org")[0], TokenKind::Org);
        assert_eq!(kinds("org")[0], TokenKind::Org);
    }

    #[test]
    fn unknown_character_is_reported() {
        let tokens = kinds("@");
        assert_eq!(tokens[0].kind, TokenKind::Unknown('@'));
    }
}
