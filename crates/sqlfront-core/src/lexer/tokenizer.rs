//! SQL Tokenizer implementation.

use super::{Keyword, LexError, MAX_OPERATOR_LEN, Operator, Span, Token, TokenKind};

/// Characters that may start or continue a symbol run.
const SYMBOL_CHARS: &str = "+-*/%|=!<>&~(),;.";

/// A lexer that tokenizes SQL input.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advances while `pred` holds.
    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    /// Skips whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.advance_while(char::is_whitespace);

            // -- line comment
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                self.advance_while(|c| c != '\n');
                continue;
            }

            // /* block comment */, unterminated runs to end of input
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    /// Source text of the current token.
    fn text(&self) -> &'a str {
        &self.input[self.start..self.pos]
    }

    /// Creates a token spanning from the token start to the current position.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.text(), Span::new(self.start, self.pos))
    }

    /// Scans a bare word: keyword, word operator or identifier.
    fn scan_word(&mut self) -> Token {
        self.advance_while(is_word_char);
        let text = self.text();

        if let Some(op) = Operator::from_word(text) {
            self.make_token(TokenKind::Operator(op))
        } else if let Some(keyword) = Keyword::from_str(text) {
            self.make_token(TokenKind::Keyword(keyword))
        } else {
            self.make_token(TokenKind::Identifier(text.to_string()))
        }
    }

    /// Scans a quoted identifier (`"..."` or `` `...` ``) with doubled-delimiter escaping.
    fn scan_quoted_identifier(&mut self, quote: char) -> Result<Token, LexError> {
        let value = self
            .scan_delimited(quote)
            .ok_or(LexError::UnterminatedIdentifier { offset: self.start })?;
        Ok(self.make_token(TokenKind::Identifier(value)))
    }

    /// Scans a `[bracketed]` identifier. Brackets have no escape.
    fn scan_bracket_identifier(&mut self) -> Result<Token, LexError> {
        self.advance(); // [
        let content_start = self.pos;
        self.advance_while(|c| c != ']');
        if self.peek().is_none() {
            return Err(LexError::UnterminatedIdentifier { offset: self.start });
        }
        let value = self.input[content_start..self.pos].to_string();
        self.advance(); // ]
        Ok(self.make_token(TokenKind::Identifier(value)))
    }

    /// Scans a string literal.
    fn scan_string(&mut self) -> Result<Token, LexError> {
        let value = self
            .scan_delimited('\'')
            .ok_or(LexError::UnterminatedString { offset: self.start })?;
        Ok(self.make_token(TokenKind::Text(value)))
    }

    /// Reads a `quote`-delimited body where a doubled quote stands for one.
    ///
    /// Returns `None` when the input ends before the closing quote.
    fn scan_delimited(&mut self, quote: char) -> Option<String> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.advance()? {
                c if c == quote => {
                    if self.peek() == Some(quote) {
                        value.push(quote);
                        self.advance();
                    } else {
                        return Some(value);
                    }
                }
                c => value.push(c),
            }
        }
    }

    /// Scans a blob literal (`X'...'` or `x'...'`).
    fn scan_blob(&mut self) -> Result<Token, LexError> {
        self.advance(); // X/x
        self.advance(); // '
        let content_start = self.pos;
        self.advance_while(|c| c != '\'');
        if self.peek().is_none() {
            return Err(LexError::UnterminatedBlob { offset: self.start });
        }
        let digits = &self.input[content_start..self.pos];
        self.advance(); // '

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(LexError::InvalidBlob {
                offset: self.start,
                reason: "non-hexadecimal character",
            });
        }
        if digits.len() % 2 != 0 {
            return Err(LexError::InvalidBlob {
                offset: self.start,
                reason: "odd number of hex digits",
            });
        }

        let bytes = digits
            .as_bytes()
            .chunks(2)
            .map(|pair| (hex_value(pair[0]) << 4) | hex_value(pair[1]))
            .collect();
        Ok(self.make_token(TokenKind::Blob(bytes)))
    }

    /// Scans a number: integer, decimal, exponent or `0x` hexadecimal.
    fn scan_number(&mut self) -> Result<Token, LexError> {
        if self.peek() == Some('0') && matches!(self.peek_next(), Some('x' | 'X')) {
            self.advance();
            self.advance();
            let digits_start = self.pos;
            self.advance_while(|c| c.is_ascii_hexdigit());
            if self.pos == digits_start {
                return Err(self.malformed_number());
            }
        } else {
            self.advance_while(|c| c.is_ascii_digit());
            if self.peek() == Some('.') {
                self.advance();
                self.advance_while(|c| c.is_ascii_digit());
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                self.advance();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                let digits_start = self.pos;
                self.advance_while(|c| c.is_ascii_digit());
                if self.pos == digits_start {
                    return Err(self.malformed_number());
                }
            }
        }

        // A second dot or an identifier character glued to the number.
        if self.peek().is_some_and(|c| c == '.' || is_word_char(c)) {
            return Err(self.malformed_number());
        }

        Ok(self.make_token(TokenKind::Numeric(self.text().to_string())))
    }

    fn malformed_number(&mut self) -> LexError {
        self.advance_while(|c| c == '.' || is_word_char(c));
        LexError::MalformedNumber {
            offset: self.start,
            text: self.text().to_string(),
        }
    }

    /// Scans a placeholder: `?`, `?NNN`, `:name`, `@name` or `$name`.
    fn scan_placeholder(&mut self) -> Result<Token, LexError> {
        let sigil = self.advance();
        if sigil == Some('?') {
            self.advance_while(|c| c.is_ascii_digit());
        } else {
            let name_start = self.pos;
            self.advance_while(is_word_char);
            if self.pos == name_start {
                return Err(LexError::InvalidPlaceholder { offset: self.start });
            }
        }
        Ok(self.make_token(TokenKind::Placeholder(self.text().to_string())))
    }

    /// Scans one operator out of a symbol run.
    ///
    /// Tries the longest prefix of at most [`MAX_OPERATOR_LEN`] symbol
    /// characters, then backs off one character at a time.
    fn scan_symbol(&mut self) -> Result<Token, LexError> {
        let run_len = self.input[self.pos..]
            .chars()
            .take(MAX_OPERATOR_LEN)
            .take_while(|c| SYMBOL_CHARS.contains(*c))
            .count();

        for len in (1..=run_len).rev() {
            // Symbol characters are ASCII, so char count equals byte count.
            let candidate = &self.input[self.pos..self.pos + len];
            if let Some(op) = Operator::from_symbol(candidate) {
                self.pos += len;
                return Ok(self.make_token(TokenKind::Operator(op)));
            }
        }

        let symbol = self.peek().map(String::from).unwrap_or_default();
        Err(LexError::UnknownSymbol {
            offset: self.start,
            symbol,
        })
    }

    /// Scans the next token.
    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        match c {
            '\'' => self.scan_string(),
            '"' | '`' => self.scan_quoted_identifier(c),
            '[' => self.scan_bracket_identifier(),
            'X' | 'x' if self.peek_next() == Some('\'') => self.scan_blob(),
            '?' | ':' | '@' | '$' => self.scan_placeholder(),
            c if c.is_ascii_digit() => self.scan_number(),
            '.' if self.peek_next().is_some_and(|n| n.is_ascii_digit()) => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => Ok(self.scan_word()),
            _ => self.scan_symbol(),
        }
    }

    /// Tokenizes the entire input and returns all tokens.
    ///
    /// A word operator directly following another word operator is
    /// contracted with it when the pair names a composite operator
    /// (`IS NOT`, `NOT IN`, `NOT LIKE`, ...).
    ///
    /// # Errors
    ///
    /// Returns the first [`LexError`] encountered.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens: Vec<Token> = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();

            let contracted = match (tokens.last(), &token.kind) {
                (Some(prev), TokenKind::Operator(next)) if next.is_word() => prev
                    .as_operator()
                    .and_then(|first| first.contract(*next)),
                _ => None,
            };

            match (contracted, tokens.last_mut()) {
                (Some(composite), Some(prev)) => {
                    prev.span = prev.span.merge(token.span);
                    prev.text = self.input[prev.span.start..prev.span.end].to_string();
                    prev.kind = TokenKind::Operator(composite);
                }
                _ => tokens.push(token),
            }

            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

const fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize().unwrap()
    }

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn lex_err(input: &str) -> LexError {
        Lexer::new(input).tokenize().unwrap_err()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(String::from(name))
    }

    fn num(text: &str) -> TokenKind {
        TokenKind::Numeric(String::from(text))
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(token_kinds(""), vec![TokenKind::Eof]);
        assert_eq!(token_kinds("   \n\t  "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_comments_produce_nothing() {
        assert_eq!(
            token_kinds("SELECT -- comment\nFROM /* block */ WHERE"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        assert_eq!(
            token_kinds("SELECT /* never closed"),
            vec![TokenKind::Keyword(Keyword::Select), TokenKind::Eof]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            token_kinds("foo bar_baz _qux"),
            vec![ident("foo"), ident("bar_baz"), ident("_qux"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        assert_eq!(
            token_kinds("\"column name\" `another` [third one] \"say \"\"hi\"\"\""),
            vec![
                ident("column name"),
                ident("another"),
                ident("third one"),
                ident("say \"hi\""),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            token_kinds("'hello' 'it''s'"),
            vec![
                TokenKind::Text(String::from("hello")),
                TokenKind::Text(String::from("it's")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            token_kinds("42 1.5 .5 1. 1e10 2.5E-3 0x1F"),
            vec![
                num("42"),
                num("1.5"),
                num(".5"),
                num("1."),
                num("1e10"),
                num("2.5E-3"),
                num("0x1F"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_malformed_numbers() {
        for input in ["1e", "1e+", "1.2.3", "12abc", "0x"] {
            assert!(
                matches!(lex_err(input), LexError::MalformedNumber { offset: 0, .. }),
                "{input}"
            );
        }
    }

    #[test]
    fn test_blob() {
        assert_eq!(
            token_kinds("X'CAFE' x''"),
            vec![
                TokenKind::Blob(vec![0xCA, 0xFE]),
                TokenKind::Blob(Vec::new()),
                TokenKind::Eof
            ]
        );
        assert!(matches!(lex_err("X'ABC'"), LexError::InvalidBlob { .. }));
        assert!(matches!(lex_err("X'ZZ'"), LexError::InvalidBlob { .. }));
        assert_eq!(lex_err("  X'AB"), LexError::UnterminatedBlob { offset: 2 });
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            token_kinds("? ?3 :name @x $y"),
            vec![
                TokenKind::Placeholder(String::from("?")),
                TokenKind::Placeholder(String::from("?3")),
                TokenKind::Placeholder(String::from(":name")),
                TokenKind::Placeholder(String::from("@x")),
                TokenKind::Placeholder(String::from("$y")),
                TokenKind::Eof,
            ]
        );
        assert_eq!(lex_err("a = :"), LexError::InvalidPlaceholder { offset: 4 });
    }

    #[test]
    fn test_operators_longest_match() {
        assert_eq!(
            token_kinds("a<=b<>c!=d==e||f<<g"),
            vec![
                ident("a"),
                TokenKind::Operator(Operator::LtEq),
                ident("b"),
                TokenKind::Operator(Operator::NotEq),
                ident("c"),
                TokenKind::Operator(Operator::NotEq),
                ident("d"),
                TokenKind::Operator(Operator::Eq),
                ident("e"),
                TokenKind::Operator(Operator::Concat),
                ident("f"),
                TokenKind::Operator(Operator::LeftShift),
                ident("g"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_symbol_run_backs_off() {
        // "=(" is not an operator, so the run splits into "=" and "(".
        assert_eq!(
            token_kinds("=(-1)"),
            vec![
                TokenKind::Operator(Operator::Eq),
                TokenKind::Operator(Operator::LeftParen),
                TokenKind::Operator(Operator::Minus),
                num("1"),
                TokenKind::Operator(Operator::RightParen),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unknown_symbol() {
        assert_eq!(
            lex_err("a ! b"),
            LexError::UnknownSymbol {
                offset: 2,
                symbol: String::from("!"),
            }
        );
        assert!(matches!(lex_err("a # b"), LexError::UnknownSymbol { offset: 2, .. }));
    }

    #[test]
    fn test_word_operator_contraction() {
        assert_eq!(
            token_kinds("a IS NOT NULL AND b NOT IN (1) OR c not like 'x'"),
            vec![
                ident("a"),
                TokenKind::Operator(Operator::IsNot),
                TokenKind::Keyword(Keyword::Null),
                TokenKind::Operator(Operator::And),
                ident("b"),
                TokenKind::Operator(Operator::NotIn),
                TokenKind::Operator(Operator::LeftParen),
                num("1"),
                TokenKind::Operator(Operator::RightParen),
                TokenKind::Operator(Operator::Or),
                ident("c"),
                TokenKind::Operator(Operator::NotLike),
                TokenKind::Text(String::from("x")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_contraction_spans_both_words() {
        let tokens = tokenize("x NOT  BETWEEN 1 AND 2");
        assert_eq!(tokens[1].kind, TokenKind::Operator(Operator::NotBetween));
        assert_eq!(tokens[1].span, Span::new(2, 14));
        assert_eq!(tokens[1].text, "NOT  BETWEEN");
    }

    #[test]
    fn test_not_null_is_not_contracted() {
        assert_eq!(
            token_kinds("NOT NULL"),
            vec![
                TokenKind::Operator(Operator::Not),
                TokenKind::Keyword(Keyword::Null),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_unterminated_literals_report_opening_offset() {
        assert_eq!(lex_err("SELECT 'abc"), LexError::UnterminatedString { offset: 7 });
        assert_eq!(lex_err("SELECT \"abc"), LexError::UnterminatedIdentifier { offset: 7 });
        assert_eq!(lex_err("SELECT [abc"), LexError::UnterminatedIdentifier { offset: 7 });
    }

    #[test]
    fn test_spans_and_text() {
        let tokens = tokenize("SELECT  id");
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens[1].span, Span::new(8, 10));
        assert_eq!(tokens[1].text, "id");
        assert_eq!(tokens[2].span, Span::at(10));
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(
            token_kinds("main.users.id"),
            vec![
                ident("main"),
                TokenKind::Operator(Operator::Dot),
                ident("users"),
                TokenKind::Operator(Operator::Dot),
                ident("id"),
                TokenKind::Eof,
            ]
        );
    }
}
