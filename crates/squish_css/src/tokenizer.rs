use squish_shared::byte_stream::Character::Ch;
use squish_shared::byte_stream::{CharStream, Character, Location};
use squish_shared::errors::{CssError, CssResult};
use std::fmt;

/// Escapable punctuation after a backslash that is not a hex escape.
const ESCAPABLE: &[char] = &[
    ' ', '!', '"', '#', '$', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', ':', ';',
    '<', '=', '>', '?', '@', '[', '\\', ']', '^', '`', '{', '|', '}',
];

#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    Whitespace,
    /// Any ASCII punctuation character not covered by a more specific rule
    Punctuator(char),
    Ident(String),
    /// The value does not include the `@` marker
    AtKeyword(String),
    /// The value does not include the quotes
    QuotedString(String),
    /// The value does not include the `#` marker
    Hash(String),
    /// The digit text as written, e.g. `.5` or `10`
    Number(String),
    /// A scientific postfix following a number, e.g. `e4` or `e-4`
    Scientific(String),
    /// An alphabetic unit run following a number
    Unit(String),
    Comment(String),
    /// `<!--`
    CdataStart,
    /// `-->`
    CdataEnd,
    /// Lowercased, e.g. `u+20-7f`
    UnicodeRange(String),
    /// A raw escape sequence outside an identifier
    Escape(String),
    Eof,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Token {
    /// Type of the token
    pub token_type: TokenType,
    /// Location of the token in the stream
    pub location: Location,
}

impl Token {
    fn new(token_type: TokenType, location: Location) -> Token {
        Token { token_type, location }
    }

    fn new_ident(value: &str, location: Location) -> Token {
        Token::new(TokenType::Ident(value.to_string()), location)
    }

    fn new_punctuator(c: char, location: Location) -> Token {
        Token::new(TokenType::Punctuator(c), location)
    }

    fn new_quoted_string(value: &str, location: Location) -> Token {
        Token::new(TokenType::QuotedString(value.to_string()), location)
    }
}

impl Token {
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        matches!(self.token_type, TokenType::Whitespace)
    }

    #[must_use]
    pub fn is_comment(&self) -> bool {
        matches!(
            self.token_type,
            TokenType::Comment(_) | TokenType::CdataStart | TokenType::CdataEnd
        )
    }

    #[must_use]
    pub fn is_punctuator(&self, c: char) -> bool {
        matches!(self.token_type, TokenType::Punctuator(p) if p == c)
    }

    #[must_use]
    pub fn is_any_punctuator(&self, chars: &[char]) -> bool {
        matches!(self.token_type, TokenType::Punctuator(p) if chars.contains(&p))
    }

    #[must_use]
    pub fn punctuator(&self) -> Option<char> {
        match self.token_type {
            TokenType::Punctuator(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_ident(&self) -> bool {
        matches!(self.token_type, TokenType::Ident(_))
    }

    #[must_use]
    pub fn is_at_keyword(&self) -> bool {
        matches!(self.token_type, TokenType::AtKeyword(_))
    }

    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self.token_type, TokenType::QuotedString(_))
    }

    #[must_use]
    pub fn is_hash(&self) -> bool {
        matches!(self.token_type, TokenType::Hash(_))
    }

    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self.token_type, TokenType::Number(_))
    }

    #[must_use]
    pub fn is_scientific(&self) -> bool {
        matches!(self.token_type, TokenType::Scientific(_))
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        matches!(self.token_type, TokenType::Unit(_))
    }

    #[must_use]
    pub fn is_unicode_range(&self) -> bool {
        matches!(self.token_type, TokenType::UnicodeRange(_))
    }

    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self.token_type, TokenType::Eof)
    }

    /// Compares the textual content of the token
    #[must_use]
    pub fn has_content(&self, content: &str) -> bool {
        self.content() == content
    }

    /// The textual content of the token, without markers
    #[must_use]
    pub fn content(&self) -> String {
        match &self.token_type {
            TokenType::AtKeyword(val)
            | TokenType::Ident(val)
            | TokenType::QuotedString(val)
            | TokenType::Hash(val)
            | TokenType::Number(val)
            | TokenType::Scientific(val)
            | TokenType::Unit(val)
            | TokenType::Comment(val)
            | TokenType::UnicodeRange(val)
            | TokenType::Escape(val) => val.clone(),
            TokenType::Punctuator(c) => c.to_string(),
            TokenType::Whitespace => " ".to_string(),
            TokenType::CdataStart => "<!--".to_string(),
            TokenType::CdataEnd => "-->".to_string(),
            TokenType::Eof => String::new(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token_type {
            TokenType::AtKeyword(val) => write!(f, "@{val}"),
            TokenType::Hash(val) => write!(f, "#{val}"),
            TokenType::Eof => write!(f, "eof"),
            _ => write!(f, "{}", self.content()),
        }
    }
}

/// Tokenizer options, snapshotted from the configuration by the caller.
#[derive(Debug, Clone)]
pub struct TokenizerOptions {
    /// When true, comments are dropped unless they contain a preserve term
    pub remove_comments: bool,
    /// Comments containing one of these terms are always kept
    pub comment_terms: Vec<String>,
    /// Columns a tab character advances the position by
    pub tab_width: u8,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            remove_comments: true,
            comment_terms: vec!["copyright".to_string(), "license".to_string()],
            tab_width: 4,
        }
    }
}

/// CSS tokenizer producing a position-accurate token stream. The stream never
/// contains two adjacent whitespace tokens, also not when a comment between
/// them has been removed.
pub struct Tokenizer<'stream> {
    stream: &'stream mut CharStream,
    /// Full list of all tokens produced by the tokenizer
    tokens: Vec<Token>,
    /// Start position of the stream (this does not have to be 1/1)
    start_location: Location,
    /// Current position relative to the start of the stream
    cur_location: Location,
    options: TokenizerOptions,
}

impl<'stream> Tokenizer<'stream> {
    /// Creates a new tokenizer with the given stream that starts on the given
    /// location. This does not have to be 1/1, but can be any location.
    pub fn new(stream: &'stream mut CharStream, location: Location, options: TokenizerOptions) -> Self {
        Self {
            stream,
            tokens: Vec::new(),
            start_location: location,
            cur_location: Location::default(),
            options,
        }
    }

    /// Tokenizes a complete string in one go
    pub fn tokenize_str(
        data: &str,
        location: Location,
        options: TokenizerOptions,
    ) -> CssResult<Vec<Token>> {
        let mut stream = CharStream::new();
        stream.read_from_str(data);

        Tokenizer::new(&mut stream, location, options).tokenize()
    }

    /// Consumes the whole stream and returns the token list ending in `Eof`
    pub fn tokenize(mut self) -> CssResult<Vec<Token>> {
        while !self.stream.eof() {
            if self.consume_whitespace() {
                continue;
            }
            if self.consume_comment()? {
                continue;
            }
            if self.consume_cdata() {
                continue;
            }
            if self.consume_unicode_range()? {
                continue;
            }
            if self.consume_identifier()? {
                continue;
            }
            if self.consume_numeric()? {
                continue;
            }
            if self.consume_punctuator() {
                continue;
            }
            if self.consume_hash() {
                continue;
            }
            if self.consume_at_keyword()? {
                continue;
            }
            if self.consume_string()? {
                continue;
            }
            if self.consume_escape_token()? {
                continue;
            }
            if self.consume_non_ascii() {
                continue;
            }

            return Err(CssError::with_location(
                format!("Unknown character '{}'", self.current_char()).as_str(),
                self.current_location(),
            ));
        }

        self.tokens
            .push(Token::new(TokenType::Eof, self.current_location()));

        Ok(self.tokens)
    }

    /// Returns the current location and takes the start location into account
    fn current_location(&self) -> Location {
        let line = self.start_location.line() + self.cur_location.line() - 1;
        let column = if self.cur_location.line() == 1 {
            self.start_location.column() + self.cur_location.column() - 1
        } else {
            self.cur_location.column()
        };

        Location::new(line, column, self.cur_location.offset())
    }

    fn current_char(&self) -> Character {
        self.stream.look_ahead(0)
    }

    fn next_char(&mut self) -> Character {
        let c = self.stream.read_and_next();

        self.cur_location.inc_offset();
        match c {
            Ch('\n') => {
                self.cur_location.inc_line();
                self.cur_location.set_column(1);
            }
            Ch('\t') => self.cur_location.add_column(u32::from(self.options.tab_width)),
            _ => self.cur_location.inc_column(),
        }

        c
    }

    fn is_char(&self, offset: usize, c: char) -> bool {
        self.stream.look_ahead(offset) == Ch(c)
    }

    fn look_ahead_slice(&self, len: usize) -> String {
        let mut s = String::new();
        for i in 0..len {
            match self.stream.look_ahead(i) {
                Ch(c) => s.push(c),
                _ => break,
            }
        }

        s
    }

    fn push_token(&mut self, token_type: TokenType, location: Location) {
        self.tokens.push(Token::new(token_type, location));
    }

    /// Whitespace collapses into a single token
    fn consume_whitespace(&mut self) -> bool {
        if !self.current_char().is_whitespace() {
            return false;
        }

        let loc = self.current_location();
        while self.current_char().is_whitespace() {
            self.next_char();
        }

        // The recent token may already be a whitespace when a comment between
        // two whitespace runs has been removed
        if !matches!(self.tokens.last(), Some(t) if t.is_whitespace()) {
            self.push_token(TokenType::Whitespace, loc);
        }

        true
    }

    fn consume_comment(&mut self) -> CssResult<bool> {
        if self.look_ahead_slice(2) != "/*" {
            return Ok(false);
        }

        let loc = self.current_location();
        self.next_char();
        self.next_char();

        let mut content = String::new();
        while !self.stream.eof() && self.look_ahead_slice(2) != "*/" {
            content.push(self.next_char().into());
        }

        if self.stream.eof() {
            return Err(CssError::with_location("Unclosed comment", loc));
        }

        self.next_char();
        self.next_char();

        if !self.options.remove_comments || self.is_preserved_comment(&content) {
            self.push_token(TokenType::Comment(content), loc);
        }

        Ok(true)
    }

    fn is_preserved_comment(&self, content: &str) -> bool {
        let lowered = content.to_lowercase();
        self.options
            .comment_terms
            .iter()
            .any(|term| lowered.contains(&term.to_lowercase()))
    }

    fn consume_cdata(&mut self) -> bool {
        if self.look_ahead_slice(4) == "<!--" {
            let loc = self.current_location();
            for _ in 0..4 {
                self.next_char();
            }
            self.push_token(TokenType::CdataStart, loc);
            return true;
        }

        if self.look_ahead_slice(3) == "-->" {
            let loc = self.current_location();
            for _ in 0..3 {
                self.next_char();
            }
            self.push_token(TokenType::CdataEnd, loc);
            return true;
        }

        false
    }

    fn consume_unicode_range(&mut self) -> CssResult<bool> {
        let start = self.current_char();
        if !(matches!(start, Ch('u' | 'U')) && self.is_char(1, '+')) {
            return Ok(false);
        }

        let loc = self.current_location();
        let mut content = String::new();
        content.push(self.next_char().into());
        content.push(self.next_char().into());

        if !self.is_hex_digit(0) {
            return Err(CssError::with_location("Invalid unicode range", loc));
        }

        while self.is_hex_digit(0) {
            content.push(self.next_char().into());
        }

        if self.is_char(0, '?') {
            while self.is_char(0, '?') {
                content.push(self.next_char().into());
            }
        } else if self.is_char(0, '-') && self.is_hex_digit(1) {
            content.push(self.next_char().into());
            while self.is_hex_digit(0) {
                content.push(self.next_char().into());
            }
        }

        self.push_token(TokenType::UnicodeRange(content.to_lowercase()), loc);

        Ok(true)
    }

    fn is_hex_digit(&self, offset: usize) -> bool {
        matches!(self.stream.look_ahead(offset), Ch(c) if c.is_ascii_hexdigit())
    }

    fn is_ident_start(&self) -> bool {
        match self.current_char() {
            Ch(c) if c.is_ascii_alphabetic() || c == '_' || c == '\\' => true,
            Ch('-') => matches!(self.stream.look_ahead(1), Ch(n) if n == '-' || n.is_ascii_alphabetic()),
            _ => false,
        }
    }

    fn consume_identifier(&mut self) -> CssResult<bool> {
        if !self.is_ident_start() {
            return Ok(false);
        }

        let loc = self.current_location();
        let value = self.consume_ident_chars()?;

        if self.is_char(0, '(') && value == "url" {
            self.push_token(TokenType::Ident(value), loc);
            return self.consume_url_argument().map(|()| true);
        }

        self.push_token(TokenType::Ident(value), loc);

        Ok(true)
    }

    /// Consumes identifier characters including raw escape sequences
    fn consume_ident_chars(&mut self) -> CssResult<String> {
        let mut value = String::new();

        loop {
            match self.current_char() {
                Ch(c) if c.is_ascii_alphanumeric() || c == '-' || c == '_' => {
                    value.push(self.next_char().into());
                }
                Ch('\\') => {
                    value.push_str(&self.consume_escape_chars()?);
                }
                _ => break,
            }
        }

        Ok(value)
    }

    /// The tokenizer is inside `url(`: emit the paren, then the trimmed URL
    /// argument as a string token unless it is already a quoted string.
    fn consume_url_argument(&mut self) -> CssResult<()> {
        let loc = self.current_location();
        self.next_char();
        self.push_token(TokenType::Punctuator('('), loc);

        while self.current_char().is_whitespace() {
            self.next_char();
        }

        if matches!(self.current_char(), Ch('"' | '\'')) {
            // A quoted URL is a regular string literal
            return Ok(());
        }

        let loc = self.current_location();
        let mut content = String::new();

        while !self.stream.eof() && !self.is_char(0, ')') {
            content.push(self.next_char().into());
        }

        if !self.is_char(0, ')') {
            return Err(CssError::with_location("Unclosed url()", loc));
        }

        self.push_token(
            TokenType::QuotedString(content.trim().to_string()),
            loc,
        );

        let loc = self.current_location();
        self.next_char();
        self.push_token(TokenType::Punctuator(')'), loc);

        Ok(())
    }

    fn consume_numeric(&mut self) -> CssResult<bool> {
        let leading_dot = self.is_char(0, '.') && self.current_char_at_is_digit(1);
        if !self.current_char().is_numeric() && !leading_dot {
            return Ok(false);
        }

        let loc = self.current_location();
        let mut value = String::new();
        let mut got_dot = false;

        if leading_dot {
            value.push(self.next_char().into());
            got_dot = true;
        }

        while self.current_char().is_numeric() {
            value.push(self.next_char().into());
        }

        if self.is_char(0, '.') {
            if got_dot {
                return Err(CssError::with_location(
                    "Unexpected '.' in number",
                    self.current_location(),
                ));
            }

            if !self.current_char_at_is_digit(1) {
                return Err(CssError::with_location(
                    "Expected digit after '.'",
                    self.current_location(),
                ));
            }

            value.push(self.next_char().into());
            while self.current_char().is_numeric() {
                value.push(self.next_char().into());
            }
        }

        self.push_token(TokenType::Number(value), loc);

        // Scientific postfix: e4, e+4, e-4
        if self.is_char(0, 'e')
            && (self.current_char_at_is_digit(1)
                || (matches!(self.stream.look_ahead(1), Ch('+' | '-'))
                    && self.current_char_at_is_digit(2)))
        {
            let loc = self.current_location();
            let mut postfix = String::new();
            postfix.push(self.next_char().into());
            if matches!(self.current_char(), Ch('+' | '-')) {
                postfix.push(self.next_char().into());
            }
            while self.current_char().is_numeric() {
                postfix.push(self.next_char().into());
            }

            self.push_token(TokenType::Scientific(postfix), loc);
        }

        // Unit: an alphabetic run directly after the digits
        if matches!(self.current_char(), Ch(c) if c.is_ascii_alphabetic()) {
            let loc = self.current_location();
            let mut unit = String::new();
            while matches!(self.current_char(), Ch(c) if c.is_ascii_alphabetic()) {
                unit.push(self.next_char().into());
            }

            self.push_token(TokenType::Unit(unit), loc);
        }

        Ok(true)
    }

    fn current_char_at_is_digit(&self, offset: usize) -> bool {
        matches!(self.stream.look_ahead(offset), Ch(c) if c.is_ascii_digit())
    }

    fn consume_punctuator(&mut self) -> bool {
        match self.current_char() {
            Ch(c) if c.is_ascii_punctuation() && !matches!(c, '"' | '\'' | '#' | '@' | '\\') => {
                let loc = self.current_location();
                self.next_char();
                self.tokens.push(Token::new_punctuator(c, loc));
                true
            }
            _ => false,
        }
    }

    fn consume_hash(&mut self) -> bool {
        if !self.is_char(0, '#') || self.stream.look_ahead(1) == Character::StreamEnd {
            return false;
        }

        let loc = self.current_location();
        self.next_char();

        let mut value = String::new();
        while matches!(self.current_char(), Ch(c) if c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            value.push(self.next_char().into());
        }

        self.push_token(TokenType::Hash(value), loc);

        true
    }

    fn consume_at_keyword(&mut self) -> CssResult<bool> {
        if !self.is_char(0, '@') {
            return Ok(false);
        }

        let loc = self.current_location();
        self.next_char();

        if !self.is_ident_start() {
            return Err(CssError::with_location("Expected identifier after '@'", loc));
        }

        let value = self.consume_ident_chars()?;
        self.push_token(TokenType::AtKeyword(value), loc);

        Ok(true)
    }

    fn consume_string(&mut self) -> CssResult<bool> {
        let quote = match self.current_char() {
            Ch(c @ ('"' | '\'')) => c,
            _ => return Ok(false),
        };

        let loc = self.current_location();
        self.next_char();

        let mut value = String::new();
        loop {
            match self.current_char() {
                Ch(c) if c == quote => {
                    self.next_char();
                    break;
                }
                Character::StreamEnd => {
                    return Err(CssError::with_location("Unterminated string", loc));
                }
                Ch('\\') => {
                    // Keep the escape as written
                    value.push(self.next_char().into());
                    if !self.stream.eof() {
                        value.push(self.next_char().into());
                    }
                }
                _ => value.push(self.next_char().into()),
            }
        }

        self.push_token(TokenType::QuotedString(value), loc);

        Ok(true)
    }

    fn consume_escape_token(&mut self) -> CssResult<bool> {
        if !self.is_char(0, '\\') {
            return Ok(false);
        }

        let loc = self.current_location();
        let content = self.consume_escape_chars()?;
        self.push_token(TokenType::Escape(content), loc);

        Ok(true)
    }

    /// `\` followed by 1..6 hex digits and an optional single whitespace, or
    /// `\` followed by one escapable punctuation character. The raw text is
    /// returned.
    fn consume_escape_chars(&mut self) -> CssResult<String> {
        let mut content = String::new();
        content.push(self.next_char().into());

        if self.is_hex_digit(0) {
            let mut digits = 0;
            while digits < 6 && self.is_hex_digit(0) {
                content.push(self.next_char().into());
                digits += 1;
            }

            if digits < 6 && self.current_char().is_whitespace() {
                content.push(self.next_char().into());
            }

            return Ok(content);
        }

        match self.current_char() {
            Ch(c) if ESCAPABLE.contains(&c) => {
                content.push(self.next_char().into());
                Ok(content)
            }
            _ => Err(CssError::with_location(
                "Invalid escape sequence",
                self.current_location(),
            )),
        }
    }

    fn consume_non_ascii(&mut self) -> bool {
        if !matches!(self.current_char(), Ch(c) if !c.is_ascii()) {
            return false;
        }

        let loc = self.current_location();
        let mut value = String::new();
        while matches!(self.current_char(), Ch(c) if !c.is_ascii()) {
            value.push(self.next_char().into());
        }

        self.tokens.push(Token::new_ident(value.as_str(), loc));

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_token_eq {
        ($t1:expr, $t2:expr) => {
            assert_eq!($t1.token_type, $t2.token_type)
        };
    }

    fn tokenize(input: &str) -> Vec<Token> {
        Tokenizer::tokenize_str(input, Location::default(), TokenizerOptions::default())
            .expect("tokenizer error")
    }

    fn tokenize_keep_comments(input: &str) -> Vec<Token> {
        let options = TokenizerOptions {
            remove_comments: false,
            ..TokenizerOptions::default()
        };
        Tokenizer::tokenize_str(input, Location::default(), options).expect("tokenizer error")
    }

    #[test]
    fn url_tokenizes_as_ident_paren_string_paren() {
        let tokens = tokenize("url(foo.png)");

        let expected = vec![
            Token::new_ident("url", Location::default()),
            Token::new_punctuator('(', Location::default()),
            Token::new_quoted_string("foo.png", Location::default()),
            Token::new_punctuator(')', Location::default()),
            Token::new(TokenType::Eof, Location::default()),
        ];

        assert_eq!(tokens.len(), expected.len());
        for (t, e) in tokens.iter().zip(expected.iter()) {
            assert_token_eq!(t, e);
        }
    }

    #[test]
    fn url_argument_is_trimmed() {
        let tokens = tokenize("url(  img/a.png   )");
        assert_eq!(
            tokens[2].token_type,
            TokenType::QuotedString("img/a.png".to_string())
        );
    }

    #[test]
    fn quoted_url_stays_a_string() {
        let tokens = tokenize("url(\"foo.png\")");
        assert_eq!(
            tokens[2].token_type,
            TokenType::QuotedString("foo.png".to_string())
        );
    }

    #[test]
    fn no_adjacent_whitespace_tokens() {
        let tokens = tokenize("a  /* gone */  b\n\t c");

        let mut previous_was_whitespace = false;
        for token in &tokens {
            if token.is_whitespace() {
                assert!(!previous_was_whitespace, "two adjacent whitespace tokens");
                previous_was_whitespace = true;
            } else {
                previous_was_whitespace = false;
            }
        }
    }

    #[test]
    fn comment_with_preserve_term_is_kept() {
        let tokens = tokenize("/* Copyright 2019 */ a");
        assert!(matches!(&tokens[0].token_type, TokenType::Comment(c) if c.contains("Copyright")));

        let tokens = tokenize("/* nothing special */ a");
        assert!(!tokens.iter().any(Token::is_comment));

        let tokens = tokenize_keep_comments("/* nothing special */ a");
        assert!(tokens[0].is_comment());
    }

    #[test]
    fn eof_location_is_past_the_end() {
        let tokens = tokenize("a{\n  color: red;\n}");
        let eof = tokens.last().unwrap();

        assert_eq!(eof.token_type, TokenType::Eof);
        assert_eq!(eof.location.line(), 3);
        assert_eq!(eof.location.column(), 2);
    }

    #[test]
    fn tab_advances_column_by_tab_width() {
        let tokens = tokenize("\ta");
        assert_eq!(tokens[1].location.column(), 5);
    }

    #[test]
    fn numbers_with_units_and_percentages() {
        let tokens = tokenize("1.1rem 100% .5s 1e4 2e-2px");

        let expected = [
            TokenType::Number("1.1".to_string()),
            TokenType::Unit("rem".to_string()),
            TokenType::Whitespace,
            TokenType::Number("100".to_string()),
            TokenType::Punctuator('%'),
            TokenType::Whitespace,
            TokenType::Number(".5".to_string()),
            TokenType::Unit("s".to_string()),
            TokenType::Whitespace,
            TokenType::Number("1".to_string()),
            TokenType::Scientific("e4".to_string()),
            TokenType::Whitespace,
            TokenType::Number("2".to_string()),
            TokenType::Scientific("e-2".to_string()),
            TokenType::Unit("px".to_string()),
            TokenType::Eof,
        ];

        assert_eq!(tokens.len(), expected.len());
        for (t, e) in tokens.iter().zip(expected.iter()) {
            assert_eq!(&t.token_type, e);
        }
    }

    #[test]
    fn double_dot_number_is_an_error() {
        let result = Tokenizer::tokenize_str("1.2.3", Location::default(), TokenizerOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn unicode_range_is_lowercased() {
        let tokens = tokenize("U+20-7F");
        assert_eq!(
            tokens[0].token_type,
            TokenType::UnicodeRange("u+20-7f".to_string())
        );

        let tokens = tokenize("u+4??");
        assert_eq!(
            tokens[0].token_type,
            TokenType::UnicodeRange("u+4??".to_string())
        );
    }

    #[test]
    fn hash_and_at_keyword() {
        let tokens = tokenize("#header @media @-webkit-keyframes");

        assert_eq!(tokens[0].token_type, TokenType::Hash("header".to_string()));
        assert_eq!(tokens[2].token_type, TokenType::AtKeyword("media".to_string()));
        assert_eq!(
            tokens[4].token_type,
            TokenType::AtKeyword("-webkit-keyframes".to_string())
        );
    }

    #[test]
    fn cdata_markers() {
        let tokens = tokenize("<!-- a{} -->");
        assert_eq!(tokens[0].token_type, TokenType::CdataStart);
        assert_eq!(tokens[tokens.len() - 2].token_type, TokenType::CdataEnd);
    }

    #[test]
    fn strings_lose_their_quotes() {
        let tokens = tokenize("\"double\" 'single'");
        assert_eq!(
            tokens[0].token_type,
            TokenType::QuotedString("double".to_string())
        );
        assert_eq!(
            tokens[2].token_type,
            TokenType::QuotedString("single".to_string())
        );
    }

    #[test]
    fn identifier_with_escape_keeps_raw_text() {
        let tokens = tokenize("cont\\65 nt");
        assert_eq!(
            tokens[0].token_type,
            TokenType::Ident("cont\\65 nt".to_string())
        );
    }

    #[test]
    fn non_ascii_identifier_run() {
        let tokens = tokenize("日本語 a");
        assert_eq!(tokens[0].token_type, TokenType::Ident("日本語".to_string()));
    }

    #[test]
    fn positions_are_accurate() {
        let tokens = tokenize("a {\n  color: red;\n}");

        // 'color' starts at row 2 column 3
        let color = tokens
            .iter()
            .find(|t| t.has_content("color"))
            .expect("color token");
        assert_eq!(color.location.line(), 2);
        assert_eq!(color.location.column(), 3);
    }

    #[test]
    fn start_location_offsets_first_line() {
        let tokens = Tokenizer::tokenize_str(
            "color: red",
            Location::new(5, 10, 0),
            TokenizerOptions::default(),
        )
        .unwrap();

        assert_eq!(tokens[0].location.line(), 5);
        assert_eq!(tokens[0].location.column(), 10);
    }

    #[test]
    fn unknown_character_is_fatal() {
        let result =
            Tokenizer::tokenize_str("a \u{7f} b", Location::default(), TokenizerOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn produce_valid_stream_of_css_tokens() {
        let tokens = tokenize(
            "
        #header .nav {
            font-size: 1.1rem;
        }

        @media screen (max-width: 200px) {}

        background: url(https://example.org);
        ",
        );

        let expected = [
            TokenType::Whitespace,
            // 1st css rule
            TokenType::Hash("header".to_string()),
            TokenType::Whitespace,
            TokenType::Punctuator('.'),
            TokenType::Ident("nav".to_string()),
            TokenType::Whitespace,
            TokenType::Punctuator('{'),
            TokenType::Whitespace,
            TokenType::Ident("font-size".to_string()),
            TokenType::Punctuator(':'),
            TokenType::Whitespace,
            TokenType::Number("1.1".to_string()),
            TokenType::Unit("rem".to_string()),
            TokenType::Punctuator(';'),
            TokenType::Whitespace,
            TokenType::Punctuator('}'),
            TokenType::Whitespace,
            // 2nd css rule (at-rule)
            TokenType::AtKeyword("media".to_string()),
            TokenType::Whitespace,
            TokenType::Ident("screen".to_string()),
            TokenType::Whitespace,
            TokenType::Punctuator('('),
            TokenType::Ident("max-width".to_string()),
            TokenType::Punctuator(':'),
            TokenType::Whitespace,
            TokenType::Number("200".to_string()),
            TokenType::Unit("px".to_string()),
            TokenType::Punctuator(')'),
            TokenType::Whitespace,
            TokenType::Punctuator('{'),
            TokenType::Punctuator('}'),
            TokenType::Whitespace,
            // 3rd css declaration with an unquoted url
            TokenType::Ident("background".to_string()),
            TokenType::Punctuator(':'),
            TokenType::Whitespace,
            TokenType::Ident("url".to_string()),
            TokenType::Punctuator('('),
            TokenType::QuotedString("https://example.org".to_string()),
            TokenType::Punctuator(')'),
            TokenType::Punctuator(';'),
            TokenType::Whitespace,
            TokenType::Eof,
        ];

        assert_eq!(tokens.len(), expected.len());
        for (token, expected) in tokens.iter().zip(expected.iter()) {
            assert_eq!(&token.token_type, expected);
        }
    }
}
