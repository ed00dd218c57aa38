//! Hand-rolled scanner for macro scripts.
//!
//! The [`Scanner`] keeps a single lexeme of lookahead. Besides the general
//! tokenizer it has two restricted modes used right after `FOR EACH` and
//! `FROM`, where the grammar expects an ASN.1 selector or a named annotation
//! instead of ordinary tokens. The scanner never fails: problems are reported
//! through an [`TokenKind::Illegal`] lexeme carrying a message and location.

use std::fmt;

/// Default upper bound for the length of a single lexeme.
pub const MAX_LEXEME_LENGTH: usize = 4096;

/// A position in the macro text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Byte offset from the start of the text.
    pub pos: usize,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column, counted in bytes.
    pub column: u32,
}

impl Location {
    pub const fn new(pos: usize, line: u32, column: u32) -> Self {
        Self { pos, line, column }
    }

    fn inc_column(&mut self) {
        self.pos += 1;
        self.column += 1;
    }

    fn inc_line(&mut self) {
        self.pos += 1;
        self.line += 1;
        self.column = 1;
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(0, 1, 1)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Kind of the current lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    /// End of the macro text.
    Eos,

    Assignment,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Semicolon,
    Dot,
    Mult,
    Div,
    Minus,
    Plus,
    Greater,
    Less,
    /// `>=`
    NotLess,
    /// `<=`
    NotGreater,
    /// `<>`
    NotEqual,

    IntNumber,
    FloatNumber,
    /// `"..."` literal
    String,
    /// `%...%` literal, a prompt shown to the user
    Ask,
    BoolConst,
    Ident,
    AsnSelector,
    NamedAnnot,
    Comment,

    KwMacro,
    KwVars,
    KwFor,
    KwEach,
    KwFrom,
    KwChoice,
    KwRange,
    KwWhere,
    KwDo,
    KwDone,
    /// `do_p`
    KwDoParallel,
}

/// Payload of the current lexeme.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexemeValue {
    #[default]
    None,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// The scanner's single lookahead slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: TokenKind,
    pub value: LexemeValue,
    /// Where scanning will resume.
    pub position: Location,
    /// First character of the lexeme.
    pub start: Location,
    pub error_location: Location,
    pub error_message: String,
}

impl Default for Lexeme {
    fn default() -> Self {
        Self {
            token: TokenKind::Illegal,
            value: LexemeValue::None,
            position: Location::default(),
            start: Location::default(),
            error_location: Location::default(),
            error_message: String::new(),
        }
    }
}

impl Lexeme {
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            LexemeValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.value {
            LexemeValue::Int(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.value {
            LexemeValue::Float(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            LexemeValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

fn keyword(word: &str) -> Option<TokenKind> {
    let token = match word.to_ascii_lowercase().as_str() {
        "macro" => TokenKind::KwMacro,
        "var" | "vars" => TokenKind::KwVars,
        "for" => TokenKind::KwFor,
        "each" => TokenKind::KwEach,
        "from" => TokenKind::KwFrom,
        "choice" => TokenKind::KwChoice,
        "range" => TokenKind::KwRange,
        "where" => TokenKind::KwWhere,
        "do" => TokenKind::KwDo,
        "done" => TokenKind::KwDone,
        "do_p" => TokenKind::KwDoParallel,
        "true" | "false" => TokenKind::BoolConst,
        _ => return None,
    };
    Some(token)
}

fn is_selector_char(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, b'_' | b'-' | b'*' | b'.')
}

fn is_named_annot_char(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, b'.' | b'#')
}

/// Tokenizer over an immutable macro text.
#[derive(Debug, Clone)]
pub struct Scanner {
    source: String,
    max_length: usize,
    lexeme: Lexeme,
}

impl Scanner {
    pub fn new(source: impl Into<String>) -> Self {
        Self::with_max_length(source, MAX_LEXEME_LENGTH)
    }

    pub fn with_max_length(source: impl Into<String>, max_length: usize) -> Self {
        Self {
            source: source.into(),
            max_length,
            lexeme: Lexeme::default(),
        }
    }

    /// Replace the text and rewind to line 1, column 1.
    ///
    /// No lexeme is read; call [`next_token`](Self::next_token) to prime the
    /// lookahead.
    pub fn reset(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.lexeme = Lexeme::default();
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn token(&self) -> TokenKind {
        self.lexeme.token
    }

    pub fn lexeme(&self) -> &Lexeme {
        &self.lexeme
    }

    pub fn error_location(&self) -> Location {
        self.lexeme.error_location
    }

    /// Render the current lexeme for diagnostics.
    pub fn string_repr(&self) -> String {
        let lexeme = &self.lexeme;
        match &lexeme.value {
            LexemeValue::Str(s) => return s.clone(),
            LexemeValue::Int(n) => return n.to_string(),
            LexemeValue::Float(n) => return n.to_string(),
            LexemeValue::Bool(b) => return b.to_string(),
            LexemeValue::None => {}
        }
        if lexeme.token == TokenKind::Eos {
            return "end of text".to_string();
        }
        let raw = self
            .source
            .get(lexeme.start.pos..lexeme.position.pos)
            .unwrap_or_default();
        if !raw.is_empty() {
            return raw.to_string();
        }
        self.source
            .get(lexeme.position.pos..)
            .and_then(|rest| rest.chars().next())
            .map(String::from)
            .unwrap_or_default()
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        match self.source.as_bytes().get(self.lexeme.position.pos + offset) {
            None | Some(0) => None,
            Some(&ch) => Some(ch),
        }
    }

    fn set(&mut self, token: TokenKind) -> TokenKind {
        self.lexeme.token = token;
        token
    }

    fn single(&mut self, token: TokenKind) -> TokenKind {
        self.lexeme.position.inc_column();
        self.set(token)
    }

    fn fail(&mut self, message: &str) -> TokenKind {
        self.lexeme.error_message = message.to_string();
        self.set(TokenKind::Illegal)
    }

    fn init_for_next(&mut self) {
        self.lexeme.error_message.clear();
        self.lexeme.value = LexemeValue::None;
        while let Some(ch) = self.peek() {
            match ch {
                b' ' | b'\t' | b'\r' => self.lexeme.position.inc_column(),
                b'\n' => self.lexeme.position.inc_line(),
                _ => break,
            }
        }
        self.lexeme.start = self.lexeme.position;
        self.lexeme.error_location = self.lexeme.position;
    }

    fn skip_to_eol(&mut self) {
        while self.peek().is_some_and(|ch| ch != b'\n') {
            self.lexeme.position.inc_column();
        }
    }

    /// Scan the next general-purpose lexeme.
    ///
    /// `--` starts a comment running to the end of the line. It is skipped
    /// unless `parse_comment` is set, in which case it becomes a
    /// [`TokenKind::Comment`] holding the text after the dashes.
    pub fn next_token(&mut self, parse_comment: bool) -> TokenKind {
        loop {
            self.init_for_next();
            let Some(ch) = self.peek() else {
                return self.set(TokenKind::Eos);
            };
            let token = match ch {
                b'=' => self.single(TokenKind::Assignment),
                b'(' => self.single(TokenKind::LeftParen),
                b')' => self.single(TokenKind::RightParen),
                b'{' => self.single(TokenKind::LeftBrace),
                b'}' => self.single(TokenKind::RightBrace),
                b'[' => self.single(TokenKind::LeftBracket),
                b']' => self.single(TokenKind::RightBracket),
                b',' => self.single(TokenKind::Comma),
                b';' => self.single(TokenKind::Semicolon),
                b'+' => self.single(TokenKind::Plus),
                b'.' => self.single(TokenKind::Dot),
                b'*' => self.single(TokenKind::Mult),
                b'/' => self.single(TokenKind::Div),
                b'-' => {
                    self.lexeme.position.inc_column();
                    if self.peek() != Some(b'-') {
                        return self.set(TokenKind::Minus);
                    }
                    self.lexeme.position.inc_column();
                    if parse_comment {
                        return self.scan_comment();
                    }
                    self.skip_to_eol();
                    continue;
                }
                b'>' => {
                    self.lexeme.position.inc_column();
                    if self.peek() == Some(b'=') {
                        self.single(TokenKind::NotLess)
                    } else {
                        self.set(TokenKind::Greater)
                    }
                }
                b'<' => {
                    self.lexeme.position.inc_column();
                    match self.peek() {
                        Some(b'=') => self.single(TokenKind::NotGreater),
                        Some(b'>') => self.single(TokenKind::NotEqual),
                        _ => self.set(TokenKind::Less),
                    }
                }
                b'0'..=b'9' => self.scan_number(),
                b'"' | b'%' => self.scan_quoted(ch),
                _ if ch.is_ascii_alphabetic() => self.scan_word(),
                _ => self.fail("Symbol is not allowed"),
            };
            return token;
        }
    }

    fn scan_comment(&mut self) -> TokenKind {
        let begin = self.lexeme.position.pos;
        while self.peek().is_some_and(|ch| ch != b'\n')
            && self.lexeme.position.pos - begin < self.max_length
        {
            self.lexeme.position.inc_column();
        }
        let text = String::from_utf8_lossy(&self.source.as_bytes()[begin..self.lexeme.position.pos])
            .into_owned();
        self.skip_to_eol();
        self.lexeme.value = LexemeValue::Str(text);
        self.set(TokenKind::Comment)
    }

    fn scan_number(&mut self) -> TokenKind {
        self.skip_digits();
        if self.peek() == Some(b'.') {
            self.lexeme.position.inc_column();
            self.skip_digits();
            return match self.scanned_text().parse::<f64>() {
                Ok(value) => {
                    self.lexeme.value = LexemeValue::Float(value);
                    self.set(TokenKind::FloatNumber)
                }
                Err(_) => self.fail("Invalid number"),
            };
        }

        match self.scanned_text().parse::<i64>() {
            Ok(number) => {
                self.lexeme.value = LexemeValue::Int(number);
                self.set(TokenKind::IntNumber)
            }
            Err(_) => self.fail("Number is too large"),
        }
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            self.lexeme.position.inc_column();
        }
    }

    fn scanned_text(&self) -> &str {
        self.source
            .get(self.lexeme.start.pos..self.lexeme.position.pos)
            .unwrap_or_default()
    }

    fn scan_quoted(&mut self, delimiter: u8) -> TokenKind {
        self.lexeme.position.inc_column();
        let mut text = Vec::new();
        loop {
            let Some(ch) = self.peek() else {
                self.lexeme.value = LexemeValue::Str(String::from_utf8_lossy(&text).into_owned());
                return self.fail("String is not closed");
            };
            let escaped = (ch == delimiter || ch == b'\\') && self.peek_at(1) == Some(delimiter);
            if ch == delimiter && !escaped {
                self.lexeme.position.inc_column();
                break;
            }
            if text.len() >= self.max_length {
                self.lexeme.value = LexemeValue::Str(String::from_utf8_lossy(&text).into_owned());
                return self.fail("String is too long");
            }
            if escaped {
                self.lexeme.position.inc_column();
                self.lexeme.position.inc_column();
                text.push(delimiter);
            } else {
                if ch == b'\n' {
                    self.lexeme.position.inc_line();
                } else {
                    self.lexeme.position.inc_column();
                }
                text.push(ch);
            }
        }

        self.lexeme.value = LexemeValue::Str(String::from_utf8_lossy(&text).into_owned());
        if delimiter == b'"' {
            self.set(TokenKind::String)
        } else {
            self.set(TokenKind::Ask)
        }
    }

    /// Consume characters accepted by `accept`, failing once the lexeme
    /// grows past the configured maximum.
    fn take_while(&mut self, accept: fn(u8) -> bool, too_long: &str) -> Result<String, TokenKind> {
        let begin = self.lexeme.position.pos;
        while self.peek().is_some_and(accept) {
            if self.lexeme.position.pos - begin >= self.max_length {
                return Err(self.fail(too_long));
            }
            self.lexeme.position.inc_column();
        }
        Ok(self.source[begin..self.lexeme.position.pos].to_string())
    }

    fn scan_word(&mut self) -> TokenKind {
        let word = match self.take_while(
            |ch| ch.is_ascii_alphanumeric() || ch == b'_',
            "Identifier is too long",
        ) {
            Ok(word) => word,
            Err(token) => return token,
        };

        let token = keyword(&word).unwrap_or(TokenKind::Ident);
        self.lexeme.value = if token == TokenKind::BoolConst {
            LexemeValue::Bool(word.eq_ignore_ascii_case("true"))
        } else {
            LexemeValue::Str(word)
        };
        self.set(token)
    }

    /// Scan an ASN.1 selector such as `Seq-feat` or `Seqdesc.molinfo`.
    pub fn next_asn_selector(&mut self) -> TokenKind {
        self.init_for_next();
        if !self
            .peek()
            .is_some_and(|ch| ch.is_ascii_alphabetic() || ch == b'*')
        {
            return self.fail("ASN.1 selector expected");
        }

        let selector = match self.take_while(is_selector_char, "String is too long") {
            Ok(selector) => selector,
            Err(token) => return token,
        };
        let reserved =
            selector.eq_ignore_ascii_case("where") || selector.eq_ignore_ascii_case("do");
        self.lexeme.value = LexemeValue::Str(selector);
        if reserved {
            return self.fail("ASN.1 selector expected");
        }
        self.set(TokenKind::AsnSelector)
    }

    /// Scan a named annotation accession such as `NA000000123.1`.
    pub fn next_named_annot(&mut self) -> TokenKind {
        self.init_for_next();
        if !self.source.as_bytes()[self.lexeme.position.pos..].starts_with(b"NA") {
            return self.fail("Named annotation (NA number) expected");
        }

        match self.take_while(is_named_annot_char, "String is too long") {
            Ok(annot) => {
                self.lexeme.value = LexemeValue::Str(annot);
                self.set(TokenKind::NamedAnnot)
            }
            Err(token) => token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tokens(input: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(input);
        let mut result = Vec::new();
        loop {
            let token = scanner.next_token(false);
            result.push(token);
            if matches!(token, TokenKind::Eos | TokenKind::Illegal) {
                return result;
            }
        }
    }

    #[test]
    fn test_punctuation() {
        use TokenKind::*;
        assert_eq!(
            tokens("= ( ) { } [ ] , ; . * / + - > < >= <= <>"),
            vec![
                Assignment,
                LeftParen,
                RightParen,
                LeftBrace,
                RightBrace,
                LeftBracket,
                RightBracket,
                Comma,
                Semicolon,
                Dot,
                Mult,
                Div,
                Plus,
                Minus,
                Greater,
                Less,
                NotLess,
                NotGreater,
                NotEqual,
                Eos
            ]
        );
    }

    #[rstest]
    #[case("macro", TokenKind::KwMacro)]
    #[case("MACRO", TokenKind::KwMacro)]
    #[case("Var", TokenKind::KwVars)]
    #[case("vars", TokenKind::KwVars)]
    #[case("FOR", TokenKind::KwFor)]
    #[case("each", TokenKind::KwEach)]
    #[case("From", TokenKind::KwFrom)]
    #[case("choice", TokenKind::KwChoice)]
    #[case("range", TokenKind::KwRange)]
    #[case("WHERE", TokenKind::KwWhere)]
    #[case("do", TokenKind::KwDo)]
    #[case("DONE", TokenKind::KwDone)]
    #[case("DO_P", TokenKind::KwDoParallel)]
    #[case("TRUE", TokenKind::BoolConst)]
    #[case("dont", TokenKind::Ident)]
    #[case("do_it_2", TokenKind::Ident)]
    fn test_keywords_are_case_insensitive(#[case] input: &str, #[case] expected: TokenKind) {
        let mut scanner = Scanner::new(input);
        assert_eq!(scanner.next_token(false), expected);
    }

    #[test]
    fn test_bool_values() {
        let mut scanner = Scanner::new("true False");
        scanner.next_token(false);
        assert_eq!(scanner.lexeme().as_bool(), Some(true));
        scanner.next_token(false);
        assert_eq!(scanner.lexeme().as_bool(), Some(false));
    }

    #[test]
    fn test_numbers() {
        let mut scanner = Scanner::new("42 3.25 7.");
        assert_eq!(scanner.next_token(false), TokenKind::IntNumber);
        assert_eq!(scanner.lexeme().as_int(), Some(42));

        assert_eq!(scanner.next_token(false), TokenKind::FloatNumber);
        let value = scanner.lexeme().as_float().unwrap();
        assert!((value - 3.25).abs() < 1e-9);

        assert_eq!(scanner.next_token(false), TokenKind::FloatNumber);
        assert_eq!(scanner.lexeme().as_float(), Some(7.0));
    }

    #[test]
    fn test_floats_are_read_exactly() {
        let mut scanner = Scanner::new("0.000000025 12345678901234567890.5");
        assert_eq!(scanner.next_token(false), TokenKind::FloatNumber);
        assert_eq!(scanner.lexeme().as_float(), Some(0.000000025));

        assert_eq!(scanner.next_token(false), TokenKind::FloatNumber);
        assert_eq!(scanner.lexeme().as_float(), Some(12345678901234567890.5));
    }

    #[test]
    fn test_sign_is_a_separate_token() {
        let mut scanner = Scanner::new("-5");
        assert_eq!(scanner.next_token(false), TokenKind::Minus);
        assert_eq!(scanner.next_token(false), TokenKind::IntNumber);
        assert_eq!(scanner.lexeme().as_int(), Some(5));
    }

    #[test]
    fn test_number_overflow_is_illegal() {
        let mut scanner = Scanner::new("99999999999999999999");
        assert_eq!(scanner.next_token(false), TokenKind::Illegal);
        assert_eq!(scanner.lexeme().error_message, "Number is too large");
    }

    #[test]
    fn test_strings_and_asks() {
        let mut scanner = Scanner::new(r#""hello world" %Enter name%"#);
        assert_eq!(scanner.next_token(false), TokenKind::String);
        assert_eq!(scanner.lexeme().as_str(), Some("hello world"));
        assert_eq!(scanner.next_token(false), TokenKind::Ask);
        assert_eq!(scanner.lexeme().as_str(), Some("Enter name"));
        assert_eq!(scanner.next_token(false), TokenKind::Eos);
    }

    #[rstest]
    #[case(r#""say ""hi""""#, r#"say "hi""#)]
    #[case(r#""say \"hi\"""#, r#"say "hi""#)]
    #[case(r#""""#, "")]
    #[case("%100%% sure%", "100% sure")]
    fn test_embedded_delimiters(#[case] input: &str, #[case] expected: &str) {
        let mut scanner = Scanner::new(input);
        let token = scanner.next_token(false);
        assert!(matches!(token, TokenKind::String | TokenKind::Ask));
        assert_eq!(scanner.lexeme().as_str(), Some(expected));
        assert_eq!(scanner.next_token(false), TokenKind::Eos);
    }

    #[test]
    fn test_unclosed_string() {
        let mut scanner = Scanner::new("x = \"abc");
        scanner.next_token(false);
        scanner.next_token(false);
        assert_eq!(scanner.next_token(false), TokenKind::Illegal);
        assert_eq!(scanner.lexeme().error_message, "String is not closed");
        assert_eq!(scanner.error_location(), Location::new(4, 1, 5));
    }

    #[test]
    fn test_overlong_lexemes() {
        let mut scanner = Scanner::with_max_length("\"abcdef\"", 4);
        assert_eq!(scanner.next_token(false), TokenKind::Illegal);
        assert_eq!(scanner.lexeme().error_message, "String is too long");

        let mut scanner = Scanner::with_max_length("abcdef", 4);
        assert_eq!(scanner.next_token(false), TokenKind::Illegal);
        assert_eq!(scanner.lexeme().error_message, "Identifier is too long");

        let mut scanner = Scanner::with_max_length("abcd", 4);
        assert_eq!(scanner.next_token(false), TokenKind::Ident);
    }

    #[test]
    fn test_illegal_symbol() {
        let mut scanner = Scanner::new("  !x");
        assert_eq!(scanner.next_token(false), TokenKind::Illegal);
        assert_eq!(scanner.lexeme().error_message, "Symbol is not allowed");
        assert_eq!(scanner.error_location(), Location::new(2, 1, 3));
        assert_eq!(scanner.string_repr(), "!");
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            tokens("a -- comment here\nb"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eos]
        );
    }

    #[test]
    fn test_comments_can_be_captured() {
        let mut scanner = Scanner::new("--#Keywords: a, b\nnext");
        assert_eq!(scanner.next_token(true), TokenKind::Comment);
        assert_eq!(scanner.lexeme().as_str(), Some("#Keywords: a, b"));
        assert_eq!(scanner.next_token(true), TokenKind::Ident);
    }

    #[test]
    fn test_positions_track_lines_and_columns() {
        let mut scanner = Scanner::new("macro\n  Foo\t\"x\ny\" z");
        scanner.next_token(false);
        assert_eq!(scanner.lexeme().start, Location::new(0, 1, 1));
        scanner.next_token(false);
        assert_eq!(scanner.lexeme().start, Location::new(8, 2, 3));
        scanner.next_token(false);
        assert_eq!(scanner.lexeme().start, Location::new(12, 2, 7));
        scanner.next_token(false);
        assert_eq!(scanner.lexeme().start, Location::new(18, 3, 4));
    }

    #[test]
    fn test_asn_selector_mode() {
        let mut scanner = Scanner::new("  Seqdesc.molinfo-x where");
        assert_eq!(scanner.next_asn_selector(), TokenKind::AsnSelector);
        assert_eq!(scanner.lexeme().as_str(), Some("Seqdesc.molinfo-x"));
        assert_eq!(scanner.next_token(false), TokenKind::KwWhere);

        let mut scanner = Scanner::new("*");
        assert_eq!(scanner.next_asn_selector(), TokenKind::AsnSelector);
    }

    #[rstest]
    #[case("do Bar();")]
    #[case("WHERE x = 1")]
    #[case("1abc")]
    #[case("\"Seq-feat\"")]
    fn test_asn_selector_rejections(#[case] input: &str) {
        let mut scanner = Scanner::new(input);
        assert_eq!(scanner.next_asn_selector(), TokenKind::Illegal);
        assert_eq!(scanner.lexeme().error_message, "ASN.1 selector expected");
        assert_eq!(scanner.error_location(), Location::new(0, 1, 1));
    }

    #[test]
    fn test_named_annot_mode() {
        let mut scanner = Scanner::new(" NA000123.1#2 range");
        assert_eq!(scanner.next_named_annot(), TokenKind::NamedAnnot);
        assert_eq!(scanner.lexeme().as_str(), Some("NA000123.1#2"));
        assert_eq!(scanner.next_token(false), TokenKind::KwRange);

        let mut scanner = Scanner::new("na0001");
        assert_eq!(scanner.next_named_annot(), TokenKind::Illegal);
        assert_eq!(
            scanner.lexeme().error_message,
            "Named annotation (NA number) expected"
        );
    }

    #[test]
    fn test_string_repr() {
        let mut scanner = Scanner::new("Foo >= 12 \"txt\"");
        scanner.next_token(false);
        assert_eq!(scanner.string_repr(), "Foo");
        scanner.next_token(false);
        assert_eq!(scanner.string_repr(), ">=");
        scanner.next_token(false);
        assert_eq!(scanner.string_repr(), "12");
        scanner.next_token(false);
        assert_eq!(scanner.string_repr(), "txt");
        scanner.next_token(false);
        assert_eq!(scanner.string_repr(), "end of text");
    }

    #[test]
    fn test_reset_rewinds() {
        let mut scanner = Scanner::new("a b");
        scanner.next_token(false);
        scanner.next_token(false);
        scanner.reset("c");
        assert_eq!(scanner.lexeme().position, Location::default());
        assert_eq!(scanner.next_token(false), TokenKind::Ident);
        assert_eq!(scanner.lexeme().as_str(), Some("c"));
    }
}
