//! Java Lexer
//!
//! Fast, simple tokenization of Java source text.
//! Comments and whitespace are dropped; every token keeps its 1-based line
//! and 0-based character column so the checker can map it back to the source.

use super::ParseError;

/// Token types in Java source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier, including contextual keywords like "var" or "yield"
    Ident,
    /// Reserved keyword like "class", "if", "int"
    Keyword,
    /// Number, character or string literal
    Literal,
    /// Multi-line `"""` string
    TextBlock,
    /// Operator or separator like "{", ">>=" is split into single '>' chars
    Punct,
}

/// A token with its text content and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    /// True when this token is punctuation or a keyword with the given text
    pub fn is(&self, text: &str) -> bool {
        matches!(self.kind, TokenKind::Punct | TokenKind::Keyword) && self.text == text
    }

    /// Column just past the last character of the token (single-line tokens)
    pub fn end_column(&self) -> usize {
        self.column + self.text.chars().count()
    }

    /// Position of the closing `"""` of a text block token
    pub fn text_block_end(&self) -> (usize, usize) {
        let mut cursor = Cursor::new(&self.text);
        cursor.line = self.line;
        cursor.column = self.column;
        let body = cursor.chars.len().saturating_sub(3);
        while cursor.pos < body {
            cursor.bump();
        }
        (cursor.line, cursor.column)
    }
}

const KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "void",
    "volatile",
    "while",
];

/// Operators longest-first. '>' is deliberately absent from every compound
/// so generic closers never need splitting; the parser glues shifts back.
const OPERATORS: &[&str] = &[
    "<<=", "...", "->", "::", "++", "--", "&&", "||", "==", "!=", "<=", "+=", "-=", "*=", "/=",
    "&=", "|=", "^=", "%=", "<<", "(", ")", "{", "}", "[", "]", ";", ",", ".", "@", "=", ">",
    "<", "!", "~", "?", ":", "+", "-", "*", "/", "&", "|", "^", "%",
];

/// Character cursor that tracks line and column
struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Cursor {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else if ch == '\r' {
            // A lone '\r' ends a line; "\r\n" is handled by the '\n'.
            if self.peek() != Some('\n') {
                self.line += 1;
                self.column = 0;
            }
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.line, self.column, message)
    }
}

/// Tokenize Java source text
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();

    while let Some(ch) = cursor.peek() {
        let line = cursor.line;
        let column = cursor.column;

        // Skip whitespace
        if ch.is_whitespace() {
            cursor.bump();
            continue;
        }

        // Comments
        if cursor.starts_with("//") {
            while let Some(c) = cursor.peek() {
                if c == '\n' || c == '\r' {
                    break;
                }
                cursor.bump();
            }
            continue;
        }
        if cursor.starts_with("/*") {
            cursor.bump();
            cursor.bump();
            loop {
                if cursor.starts_with("*/") {
                    cursor.bump();
                    cursor.bump();
                    break;
                }
                if cursor.bump().is_none() {
                    return Err(ParseError::new(line, column, "unterminated comment"));
                }
            }
            continue;
        }

        if cursor.starts_with("\"\"\"") {
            let text = lex_text_block(&mut cursor, line, column)?;
            tokens.push(Token {
                kind: TokenKind::TextBlock,
                text,
                line,
                column,
            });
            continue;
        }

        if ch == '"' || ch == '\'' {
            let text = lex_quoted(&mut cursor, ch)?;
            tokens.push(Token {
                kind: TokenKind::Literal,
                text,
                line,
                column,
            });
            continue;
        }

        if ch.is_ascii_digit() || (ch == '.' && cursor.peek_at(1).is_some_and(|c| c.is_ascii_digit()))
        {
            let text = lex_number(&mut cursor);
            tokens.push(Token {
                kind: TokenKind::Literal,
                text,
                line,
                column,
            });
            continue;
        }

        if ch.is_alphabetic() || ch == '_' || ch == '$' {
            let mut text = String::new();
            while let Some(c) = cursor.peek() {
                if c.is_alphanumeric() || c == '_' || c == '$' {
                    text.push(c);
                    cursor.bump();
                } else {
                    break;
                }
            }
            // "non-sealed" is the only hyphenated modifier
            if text == "non" && cursor.starts_with("-sealed") {
                for _ in 0.."-sealed".len() {
                    cursor.bump();
                }
                text.push_str("-sealed");
            }
            let kind = if KEYWORDS.contains(&text.as_str()) {
                TokenKind::Keyword
            } else {
                TokenKind::Ident
            };
            tokens.push(Token {
                kind,
                text,
                line,
                column,
            });
            continue;
        }

        match OPERATORS.iter().find(|op| cursor.starts_with(op)) {
            Some(op) => {
                for _ in 0..op.len() {
                    cursor.bump();
                }
                tokens.push(Token {
                    kind: TokenKind::Punct,
                    text: (*op).to_string(),
                    line,
                    column,
                });
            }
            None => return Err(cursor.error(format!("unexpected character '{}'", ch))),
        }
    }

    Ok(tokens)
}

fn lex_quoted(cursor: &mut Cursor, quote: char) -> Result<String, ParseError> {
    let mut text = String::new();
    if let Some(c) = cursor.bump() {
        text.push(c);
    }
    loop {
        match cursor.bump() {
            Some('\\') => {
                text.push('\\');
                if let Some(escaped) = cursor.bump() {
                    text.push(escaped);
                }
            }
            Some(c) if c == quote => {
                text.push(c);
                return Ok(text);
            }
            Some('\n') | None => return Err(cursor.error("unterminated literal")),
            Some(c) => text.push(c),
        }
    }
}

fn lex_text_block(cursor: &mut Cursor, line: usize, column: usize) -> Result<String, ParseError> {
    let mut text = String::from("\"\"\"");
    for _ in 0..3 {
        cursor.bump();
    }
    loop {
        if cursor.starts_with("\\") {
            text.push('\\');
            cursor.bump();
            if let Some(c) = cursor.bump() {
                text.push(c);
            }
            continue;
        }
        if cursor.starts_with("\"\"\"") {
            for _ in 0..3 {
                cursor.bump();
            }
            text.push_str("\"\"\"");
            return Ok(text);
        }
        match cursor.bump() {
            Some(c) => text.push(c),
            None => return Err(ParseError::new(line, column, "unterminated text block")),
        }
    }
}

fn lex_number(cursor: &mut Cursor) -> String {
    let mut text = String::new();
    let mut prev = '\0';
    while let Some(c) = cursor.peek() {
        let exponent_sign = (c == '+' || c == '-')
            && matches!(prev, 'e' | 'E' | 'p' | 'P')
            && !text.starts_with("0x")
            && !text.starts_with("0X");
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
            if c == '.' {
                let fraction = cursor.peek_at(1).is_some_and(|n| {
                    n.is_ascii_digit()
                        || matches!(n, 'e' | 'E' | 'f' | 'F' | 'd' | 'D')
                        || !(n.is_alphabetic() || n == '_' || n == '.')
                });
                if text.contains('.') || !fraction {
                    break;
                }
            }
            text.push(c);
            prev = c;
            cursor.bump();
        } else {
            break;
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_simple_statement() {
        let tokens = tokenize("int x = 42;").unwrap();

        assert_eq!(texts(&tokens), vec!["int", "x", "=", "42", ";"]);
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[3].kind, TokenKind::Literal);
    }

    #[test]
    fn test_positions_are_line_and_char_column() {
        let tokens = tokenize("class A {\n\tint x;\n}").unwrap();

        let int_token = tokens.iter().find(|t| t.text == "int").unwrap();
        assert_eq!(int_token.line, 2);
        assert_eq!(int_token.column, 1);
        let close = tokens.last().unwrap();
        assert_eq!((close.line, close.column), (3, 0));
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize("a /* x\n y */ b // tail\nc").unwrap();

        assert_eq!(texts(&tokens), vec!["a", "b", "c"]);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn test_greater_than_is_never_combined() {
        let tokens = tokenize("a >>= b >= c").unwrap();

        assert_eq!(texts(&tokens), vec!["a", ">", ">", "=", "b", ">", "=", "c"]);
    }

    #[test]
    fn test_string_and_char_literals() {
        let tokens = tokenize(r#"s = "a \" b" + 'c';"#).unwrap();

        assert_eq!(tokens[2].text, r#""a \" b""#);
        assert_eq!(tokens[4].text, "'c'");
    }

    #[test]
    fn test_text_block_spans_lines() {
        let tokens = tokenize("s = \"\"\"\n  hi\n  \"\"\";\nx").unwrap();

        assert_eq!(tokens[2].kind, TokenKind::TextBlock);
        assert_eq!(tokens[3].text, ";");
        assert_eq!(tokens[3].line, 3);
        assert_eq!(tokens[4].line, 4);
        assert_eq!(tokens[2].text_block_end(), (3, 2));
    }

    #[test]
    fn test_text_block_end_on_crlf_lines() {
        let tokens = tokenize("s = \"\"\"\r\n  hi\r\n\t\"\"\";").unwrap();

        assert_eq!(tokens[2].text_block_end(), (3, 1));
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("1.5e-3 0x1F 10L 3.0f").unwrap();

        assert_eq!(texts(&tokens), vec!["1.5e-3", "0x1F", "10L", "3.0f"]);
    }

    #[test]
    fn test_method_reference_and_lambda_arrows() {
        let tokens = tokenize("x -> y::z").unwrap();

        assert_eq!(texts(&tokens), vec!["x", "->", "y", "::", "z"]);
    }

    #[test]
    fn test_unterminated_comment_is_error() {
        let err = tokenize("a /* never closed").unwrap_err();
        assert_eq!(err.line, 1);
    }
}
