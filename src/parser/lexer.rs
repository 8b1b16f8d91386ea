//! Lexer (tokenizer) for C-minus source code
//!
//! Converts raw source text into a flat list of [`Token`]s, each carrying its
//! [`TokenKind`], the matched text and the line it appears on. Whitespace,
//! `//` line comments and `/* */` block comments are dropped. No end-of-input
//! token is emitted; the parser treats the end of the list as the sentinel.

use std::fmt;

use thiserror::Error;

use super::grammar;

pub type Token = grammar::Token<TokenKind>;

/// Every terminal of the C-minus grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    // Keywords
    Else,
    If,
    Int,
    Return,
    Void,
    While,

    // Arithmetic
    Plus,  // +
    Minus, // -
    Star,  // *
    Slash, // /

    // Comparison
    Gt,    // >
    Ge,    // >=
    Lt,    // <
    Le,    // <=
    EqEq,  // ==
    NotEq, // !=

    Assign, // =

    // Punctuation
    Semicolon, // ;
    Comma,     // ,
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }

    Ident,
    Num,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Int => write!(f, "'int'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::Void => write!(f, "'void'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Assign => write!(f, "'='"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::Num => write!(f, "number"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at line {line}, column {column}: {message}")]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// Lexer for C-minus source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let (start, line, column) = (self.position, self.line, self.column);
        let ch = self.advance().ok_or_else(|| self.error("Unexpected end of file"))?;

        let kind = match ch {
            '0'..='9' => return self.number_literal(ch, line, column),
            'a'..='z' | 'A'..='Z' | '_' => return Ok(self.identifier_or_keyword(ch, line)),

            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '=' => self.either('=', TokenKind::EqEq, TokenKind::Assign),
            '<' => self.either('=', TokenKind::Le, TokenKind::Lt),
            '>' => self.either('=', TokenKind::Ge, TokenKind::Gt),
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::NotEq
                } else {
                    return Err(LexError {
                        message: "Unexpected character: '!'".to_string(),
                        line,
                        column,
                    });
                }
            }
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,

            _ => {
                return Err(LexError {
                    message: format!("Unexpected character: '{}'", ch),
                    line,
                    column,
                });
            }
        };

        let lexeme: String = self.input[start..self.position].iter().collect();
        Ok(Token::new(kind, lexeme, line))
    }

    /// Two-character operator if the next char is `second`, else the single one.
    fn either(&mut self, second: char, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some(second) {
            self.advance();
            double
        } else {
            single
        }
    }

    /// Parse numeric literal (integers only)
    fn number_literal(
        &mut self,
        first_digit: char,
        line: usize,
        column: usize,
    ) -> Result<Token, LexError> {
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if num_str.parse::<i32>().is_err() {
            return Err(LexError {
                message: format!("Invalid integer literal: {}", num_str),
                line,
                column,
            });
        }

        Ok(Token::new(TokenKind::Num, num_str, line))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, line: usize) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = match ident.as_str() {
            "else" => TokenKind::Else,
            "if" => TokenKind::If,
            "int" => TokenKind::Int,
            "return" => TokenKind::Return,
            "void" => TokenKind::Void,
            "while" => TokenKind::While,
            _ => TokenKind::Ident,
        };

        Token::new(kind, ident, line)
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let (line, column) = (self.line, self.column);
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance(); // skip '*'
                self.advance(); // skip '/'
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            line,
            column,
        })
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn error(&self, message: &str) -> LexError {
        LexError {
            message: message.to_string(),
            line: self.line,
            column: self.column,
        }
    }
}

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = tokenize("int main(void) { return 0; }").unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[1].lexeme, "main");
        assert_eq!(tokens[2].kind, TokenKind::LParen);
        assert_eq!(tokens[3].kind, TokenKind::Void);
        assert_eq!(tokens[4].kind, TokenKind::RParen);
        assert_eq!(tokens[5].kind, TokenKind::LBrace);
        assert_eq!(tokens[6].kind, TokenKind::Return);
        assert_eq!(tokens[7].kind, TokenKind::Num);
        assert_eq!(tokens[7].lexeme, "0");
        assert_eq!(tokens[8].kind, TokenKind::Semicolon);
        assert_eq!(tokens[9].kind, TokenKind::RBrace);
        assert_eq!(tokens.len(), 10);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("<= < >= > == != = + - * /"),
            vec![
                TokenKind::Le,
                TokenKind::Lt,
                TokenKind::Ge,
                TokenKind::Gt,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Assign,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
            ]
        );
    }

    #[test]
    fn test_operator_lexemes() {
        let tokens = tokenize("a<=b").unwrap();
        assert_eq!(tokens[1].lexeme, "<=");
        let tokens = tokenize("x=1").unwrap();
        assert_eq!(tokens[1].lexeme, "=");
    }

    #[test]
    fn test_comments_and_lines() {
        let tokens = tokenize("int x; // comment\nint y; /* block\ncomment */ int z;").unwrap();

        let names: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Ident)
            .map(|t| (t.lexeme.as_str(), t.line))
            .collect();
        assert_eq!(names, vec![("x", 1), ("y", 2), ("z", 3)]);
        assert_eq!(tokens.len(), 9);
    }

    #[test]
    fn test_keywords_need_word_boundary() {
        let tokens = tokenize("iffy whiles int0").unwrap();
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Ident));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("int x;\n  x = 1 @ 2;").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 9);
    }

    #[test]
    fn test_lone_bang_rejected() {
        assert!(tokenize("!x").is_err());
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("int x; /* never closed").unwrap_err();
        assert_eq!(err.message, "Unterminated block comment");
    }

    #[test]
    fn test_literal_out_of_range() {
        assert!(tokenize("99999999999").is_err());
    }
}
