//! Recursive-descent parser for macro scripts.
//!
//! [`MacroParser`] pulls lexemes from a [`Scanner`] one at a time and builds a
//! [`MacroRep`]. The first error aborts the macro. WHERE clauses are cut out
//! of the text and handed to an [`ExpressionParser`], then flattened and
//! reordered by evaluation cost.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use crate::ast::{
    ArgValue, Argument, DoBlock, ExecMode, FunctionCall, Literal, MacroRep, SeqRange, VarBlock,
    VarValue, Variable, WhereClause,
};
use crate::error::{ErrorReportType, ParseError, ParseErrorKind};
use crate::query::{
    CaseSensitivity, ExpressionOptions, ExpressionParser, ParseMode, QueryContext,
};
use crate::reorder::{flatten, reorder};
use crate::scanner::{LexemeValue, Location, MAX_LEXEME_LENGTH, Scanner, TokenKind};
use crate::where_expr::WhereExpressionParser;

const KEYWORDS_MARKER: &str = "#Keywords:";

/// Settings of a [`MacroParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Functions callable inside WHERE clauses.
    pub where_functions: Vec<String>,
    /// Functions callable as DO-block statements.
    pub do_functions: Vec<String>,
    pub error_report: ErrorReportType,
    pub max_lexeme_length: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            where_functions: Vec::new(),
            do_functions: Vec::new(),
            error_report: ErrorReportType::default(),
            max_lexeme_length: MAX_LEXEME_LENGTH,
        }
    }
}

impl ParserConfig {
    pub fn with_where_functions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.where_functions = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_do_functions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.do_functions = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_error_report(mut self, report: ErrorReportType) -> Self {
        self.error_report = report;
        self
    }

    pub fn with_max_lexeme_length(mut self, length: usize) -> Self {
        self.max_lexeme_length = length;
        self
    }
}

/// Tokens closing a WHERE clause besides ILLEGAL and EOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClauseEnd {
    /// `do` or `do_p` after the macro-level clause.
    Do,
    /// `;` after a per-call clause.
    Semicolon,
}

impl ClauseEnd {
    fn matches(self, token: TokenKind) -> bool {
        match token {
            TokenKind::Illegal | TokenKind::Eos => true,
            TokenKind::KwDo | TokenKind::KwDoParallel => self == ClauseEnd::Do,
            TokenKind::Semicolon => self == ClauseEnd::Semicolon,
            _ => false,
        }
    }
}

/// Parser for one or more macros held in a single text.
///
/// A parser is reusable: each [`parse`](Self::parse) call starts from a clean
/// state and replaces the macro held from the previous call.
pub struct MacroParser {
    scanner: Scanner,
    config: ParserConfig,
    expression_parser: Box<dyn ExpressionParser>,
    macro_rep: Option<MacroRep>,
    /// Assignment targets seen so far in the DO block.
    rt_vars: HashSet<String>,
    /// Pinned location for the next error, if any.
    error_location: Option<Location>,
}

impl Default for MacroParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl MacroParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            scanner: Scanner::with_max_length("", config.max_lexeme_length),
            config,
            expression_parser: Box::new(WhereExpressionParser),
            macro_rep: None,
            rt_vars: HashSet::new(),
            error_location: None,
        }
    }

    /// Replace the WHERE-clause parser.
    pub fn with_expression_parser(mut self, parser: impl ExpressionParser + 'static) -> Self {
        self.expression_parser = Box::new(parser);
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn set_function_names(&mut self, where_functions: Vec<String>, do_functions: Vec<String>) {
        self.config.where_functions = where_functions;
        self.config.do_functions = do_functions;
    }

    /// Load a new text and read its first lexeme.
    pub fn set_source(&mut self, text: impl Into<String>) {
        self.scanner.reset(text);
        self.error_location = None;
        self.macro_rep = None;
        self.advance();
    }

    /// Parse the next macro of the text.
    ///
    /// Returns `Ok(false)` once the text is exhausted. In single-macro mode
    /// the macro must be followed by the end of the text.
    pub fn parse(&mut self, single_macro: bool, ctx: &dyn QueryContext) -> Result<bool, ParseError> {
        self.macro_rep = None;
        self.rt_vars.clear();
        self.error_location = None;

        if self.scanner.token() == TokenKind::Eos {
            return Ok(false);
        }

        let start = self.scanner.lexeme().start.pos;
        let mut rep = self.parse_script(ctx)?;
        let end = self.scanner.lexeme().start.pos;
        rep.source = self
            .scanner
            .source()
            .get(start..end)
            .unwrap_or_default()
            .to_string();
        rep.source_span = start..end;

        if single_macro && self.scanner.token() != TokenKind::Eos {
            let found = self.scanner.string_repr();
            return Err(self.error(
                ParseErrorKind::UnexpectedToken,
                format!("Unexpected token: '{found}'"),
            ));
        }

        log::debug!(
            "parsed macro '{}' with {} statement(s)",
            rep.name,
            rep.do_block.calls.len()
        );
        self.macro_rep = Some(rep);
        Ok(true)
    }

    /// Parse a text holding exactly one macro.
    pub fn parse_macro(
        &mut self,
        text: impl Into<String>,
        ctx: &dyn QueryContext,
    ) -> Result<Option<MacroRep>, ParseError> {
        self.set_source(text);
        if self.parse(true, ctx)? {
            Ok(self.detach_macro())
        } else {
            Ok(None)
        }
    }

    pub fn macro_rep(&self) -> Option<&MacroRep> {
        self.macro_rep.as_ref()
    }

    /// Take ownership of the last parsed macro.
    pub fn detach_macro(&mut self) -> Option<MacroRep> {
        self.macro_rep.take()
    }

    fn advance(&mut self) -> TokenKind {
        self.scanner.next_token(false)
    }

    fn token(&self) -> TokenKind {
        self.scanner.token()
    }

    fn current_str(&self) -> String {
        self.scanner.lexeme().as_str().unwrap_or_default().to_string()
    }

    fn error(&mut self, kind: ParseErrorKind, message: impl Into<String>) -> ParseError {
        let fallback = self.scanner.error_location();
        let location = *self.error_location.get_or_insert(fallback);

        let mut message = message.into();
        let lexeme = self.scanner.lexeme();
        if lexeme.token == TokenKind::Illegal
            && !lexeme.error_message.is_empty()
            && !message.contains(&lexeme.error_message)
        {
            message.push_str(": ");
            message.push_str(&lexeme.error_message);
        }
        ParseError::new(kind, message, location, self.config.error_report)
    }

    /// `<what> expected instead of '<current lexeme>'`
    fn expected(&mut self, kind: ParseErrorKind, what: &str) -> ParseError {
        let found = self.scanner.string_repr();
        self.error(kind, format!("{what} expected instead of '{found}'"))
    }

    fn is_do_function(&self, name: &str) -> bool {
        self.config
            .do_functions
            .iter()
            .any(|f| f.eq_ignore_ascii_case(name))
    }

    fn parse_script(&mut self, ctx: &dyn QueryContext) -> Result<MacroRep, ParseError> {
        if self.token() != TokenKind::KwMacro {
            return Err(self.expected(ParseErrorKind::KeywordExpected, "Keyword 'MACRO'"));
        }
        if self.advance() != TokenKind::Ident {
            return Err(self.error(ParseErrorKind::MacroNameExpected, "Macro name expected"));
        }
        let mut rep = MacroRep::new(self.current_str());

        self.scanner.next_token(true);
        if self.token() == TokenKind::String {
            rep.title = Some(self.current_str());
            self.scanner.next_token(true);
        }

        while self.token() == TokenKind::Comment {
            rep.keywords.extend(meta_keywords(&self.current_str()));
            self.scanner.next_token(true);
        }

        while self.token() == TokenKind::KwVars {
            self.advance();
            self.parse_variables(&mut rep)?;
        }

        self.parse_body(&mut rep, ctx)?;
        Ok(rep)
    }

    fn parse_variables(&mut self, rep: &mut MacroRep) -> Result<(), ParseError> {
        if self.token() != TokenKind::Ident {
            return Err(self.error(
                ParseErrorKind::IdentifierNameExpected,
                "Identifier name expected",
            ));
        }

        let mut block = VarBlock::default();
        while self.token() == TokenKind::Ident {
            let name = self.current_str();
            if rep.has_var(&name) || block.vars.iter().any(|var| var.name == name) {
                return Err(self.error(
                    ParseErrorKind::VariableDefined,
                    format!("Variable '{name}' is already defined"),
                ));
            }

            if self.advance() != TokenKind::Assignment {
                return Err(self.error(ParseErrorKind::AssignmentExpected, "Assignment expected"));
            }

            let value = match self.advance() {
                TokenKind::String => {
                    let value = VarValue::String(self.current_str());
                    self.advance();
                    value
                }
                TokenKind::Ask => {
                    let value = VarValue::Ask(self.current_str());
                    self.advance();
                    value
                }
                TokenKind::KwChoice => {
                    self.advance();
                    VarValue::Choice(self.parse_choice()?)
                }
                TokenKind::BoolConst => {
                    let value = VarValue::Bool(self.scanner.lexeme().as_bool().unwrap_or_default());
                    self.advance();
                    value
                }
                _ => match self.signed_number() {
                    Some(Literal::Int(n)) => VarValue::Int(n),
                    Some(Literal::Float(n)) => VarValue::Float(n),
                    _ => {
                        return Err(self.error(
                            ParseErrorKind::VarDefinitionExpected,
                            format!("Definition of '{name}' variable is incomplete"),
                        ));
                    }
                },
            };
            block.vars.push(Variable { name, value });

            if self.token() == TokenKind::Semicolon {
                self.advance();
            }
        }

        rep.var_blocks.push(block);
        Ok(())
    }

    /// Consume an optional `+`/`-`; true for a minus.
    fn parse_sign(&mut self) -> bool {
        match self.token() {
            TokenKind::Minus => {
                self.advance();
                true
            }
            TokenKind::Plus => {
                self.advance();
                false
            }
            _ => false,
        }
    }

    /// An optionally signed integer or float, or `None` if the lexeme after
    /// the sign is not a number.
    fn signed_number(&mut self) -> Option<Literal> {
        let negative = self.parse_sign();
        let literal = match (self.token(), &self.scanner.lexeme().value) {
            (TokenKind::IntNumber, LexemeValue::Int(n)) => Literal::Int(if negative { -n } else { *n }),
            (TokenKind::FloatNumber, LexemeValue::Float(n)) => {
                Literal::Float(if negative { -n } else { *n })
            }
            _ => return None,
        };
        self.advance();
        Some(literal)
    }

    fn parse_choice(&mut self) -> Result<Vec<Literal>, ParseError> {
        if self.token() != TokenKind::LeftBrace {
            return Err(self.expected(ParseErrorKind::LeftBraceExpected, "Symbol '{'"));
        }

        let mut items = Vec::new();
        loop {
            let item = match self.advance() {
                TokenKind::String => {
                    let item = Literal::String(self.current_str());
                    self.advance();
                    item
                }
                TokenKind::BoolConst => {
                    let item = Literal::Bool(self.scanner.lexeme().as_bool().unwrap_or_default());
                    self.advance();
                    item
                }
                _ => match self.signed_number() {
                    Some(item) => item,
                    None => {
                        return Err(self.error(
                            ParseErrorKind::VarDefinitionExpected,
                            "Variable definition expected",
                        ));
                    }
                },
            };
            items.push(item);
            if self.token() != TokenKind::Comma {
                break;
            }
        }

        if self.token() != TokenKind::RightBrace {
            return Err(self.expected(ParseErrorKind::CommaOrRightBraceExpected, "Comma or '}'"));
        }
        self.advance();
        Ok(items)
    }

    fn parse_body(&mut self, rep: &mut MacroRep, ctx: &dyn QueryContext) -> Result<(), ParseError> {
        if self.token() == TokenKind::KwFor {
            if self.advance() != TokenKind::KwEach {
                return Err(self.expected(ParseErrorKind::KeywordExpected, "Keyword 'FOR EACH'"));
            }
            if self.scanner.next_asn_selector() != TokenKind::AsnSelector {
                return Err(self.expected(ParseErrorKind::AsnSelectorExpected, "ASN.1 selector"));
            }
            rep.for_each = Some(self.current_str());
            self.advance();
        }

        if self.token() == TokenKind::KwFrom {
            if self.scanner.next_named_annot() != TokenKind::NamedAnnot {
                return Err(self.expected(ParseErrorKind::NamedAnnotExpected, "Named annotation"));
            }
            rep.named_annot = Some(self.current_str());
            self.advance();
        }

        if self.token() == TokenKind::KwRange {
            rep.range = Some(self.parse_range()?);
        }

        if self.token() == TokenKind::KwWhere {
            rep.where_clause = Some(self.parse_where(ClauseEnd::Do)?);
        }

        self.parse_do(rep, ctx)
    }

    fn parse_range(&mut self) -> Result<SeqRange, ParseError> {
        let token = self.advance();
        if matches!(
            token,
            TokenKind::KwWhere
                | TokenKind::KwDo
                | TokenKind::KwDoParallel
                | TokenKind::Illegal
                | TokenKind::Eos
        ) {
            return Err(self.expected(ParseErrorKind::RangeExpected, "Sequence range"));
        }
        if token != TokenKind::LeftBracket {
            return Err(self.expected(ParseErrorKind::LeftBracketExpected, "Symbol '['"));
        }

        let mut start = None;
        let mut stop = None;
        let mut found_comma = false;

        self.advance();
        let mut negative = self.parse_sign();
        loop {
            let token = self.token();
            if matches!(
                token,
                TokenKind::RightBracket
                    | TokenKind::KwDo
                    | TokenKind::KwWhere
                    | TokenKind::Illegal
                    | TokenKind::Eos
            ) {
                break;
            }

            match token {
                TokenKind::IntNumber => {
                    let n = self.scanner.lexeme().as_int().unwrap_or_default();
                    let n = if negative { -n } else { n };
                    if start.is_none() && !found_comma {
                        start = Some(n);
                    } else if found_comma && stop.is_none() {
                        stop = Some(n);
                    }
                }
                TokenKind::Comma => found_comma = true,
                TokenKind::FloatNumber | TokenKind::String | TokenKind::BoolConst => {
                    return Err(
                        self.expected(ParseErrorKind::IntegerExpected, "Positive integer number")
                    );
                }
                TokenKind::Semicolon | TokenKind::Dot => {
                    let found = self.scanner.string_repr();
                    return Err(self.error(
                        ParseErrorKind::CommaExpected,
                        format!("Comma expected to separate two positive integers instead of '{found}'"),
                    ));
                }
                TokenKind::RightBrace | TokenKind::RightParen => {
                    return Err(self.expected(ParseErrorKind::RightBracketExpected, "Symbol ']'"));
                }
                _ => {}
            }
            self.advance();
            negative = self.parse_sign();
        }

        let (TokenKind::RightBracket, Some(start), Some(stop)) = (self.token(), start, stop) else {
            return Err(self.error(
                ParseErrorKind::RangeInvalid,
                "Range was not specified as expected: '[start, stop]'",
            ));
        };
        if start < 0 || stop < 0 {
            return Err(self.error(
                ParseErrorKind::RangeInvalid,
                "Start and Stop positions are expected to be positive integers",
            ));
        }
        if start > stop {
            return Err(self.error(
                ParseErrorKind::RangeInvalid,
                "Start position should be less than or equal to the Stop position",
            ));
        }

        self.advance();
        Ok(SeqRange {
            start: start.unsigned_abs(),
            stop: stop.unsigned_abs(),
        })
    }

    /// Cut the clause after `where` out of the text and parse it.
    ///
    /// Leaves the scanner on the token that ended the clause.
    fn parse_where(&mut self, end: ClauseEnd) -> Result<WhereClause, ParseError> {
        let where_location = self.scanner.lexeme().start;
        if end.matches(self.advance()) {
            return Err(self.expected(ParseErrorKind::WhereClauseExpected, "'WHERE' clause"));
        }

        let clause_start = self.scanner.lexeme().start;
        while !end.matches(self.token()) {
            self.advance();
        }
        let clause_end = self.scanner.lexeme().start.pos;
        let text = self
            .scanner
            .source()
            .get(clause_start.pos..clause_end)
            .unwrap_or_default()
            .trim_end()
            .to_string();
        if text.is_empty() {
            let found = self.scanner.string_repr();
            return Err(self.error(
                ParseErrorKind::WhereClauseInvalid,
                format!("Invalid 'WHERE' clause: {found}"),
            ));
        }

        log::debug!("parsing WHERE clause at {clause_start}: {text}");
        let options = ExpressionOptions {
            case_sensitivity: CaseSensitivity::CaseInsensitive,
            mode: ParseMode::SyntaxCheck,
            functions: &self.config.where_functions,
            start: clause_start,
        };
        let mut tree = match self.expression_parser.parse_expression(&text, &options) {
            Ok(tree) => tree,
            Err(err) => {
                log::warn!("rejected WHERE clause '{text}': {err}");
                self.error_location = Some(where_location);
                return Err(self.error(ParseErrorKind::WhereClauseInvalid, "Invalid 'WHERE' clause"));
            }
        };

        flatten(&mut tree);
        reorder(&mut tree);
        Ok(WhereClause {
            text,
            tree,
            location: where_location,
        })
    }

    fn parse_do(&mut self, rep: &mut MacroRep, ctx: &dyn QueryContext) -> Result<(), ParseError> {
        let token = self.token();
        if !matches!(token, TokenKind::KwDo | TokenKind::KwDoParallel) {
            return Err(self.expected(
                ParseErrorKind::KeywordExpected,
                "Keyword 'DO' or keyword 'DO_P'",
            ));
        }

        let location = self.scanner.lexeme().start;
        let mode = if token == TokenKind::KwDoParallel {
            ExecMode::Parallel {
                threads: self.parse_thread_count()?,
            }
        } else {
            ExecMode::Sequential
        };
        rep.do_block = DoBlock {
            mode,
            location,
            calls: Vec::new(),
        };

        self.advance();
        loop {
            if self.token() != TokenKind::Ident {
                return Err(self.expected(
                    ParseErrorKind::FunctionOrObjectNameExpected,
                    "Function or object name",
                ));
            }

            let ident = self.current_str();
            let mut assign_to = None;
            if !self.is_do_function(&ident) {
                self.error_location = Some(self.scanner.lexeme().start);
                if rep.has_var(&ident) {
                    return Err(self.error(
                        ParseErrorKind::AssignmentToConst,
                        format!("Assignment to non-modifiable variable '{ident}' in this context"),
                    ));
                }
                self.rt_vars.insert(ident.clone());

                match self.advance() {
                    TokenKind::Assignment => {}
                    TokenKind::LeftParen => {
                        return Err(self.error(
                            ParseErrorKind::FunctionExpected,
                            format!("Unknown function name: '{ident}'"),
                        ));
                    }
                    _ => {
                        return Err(
                            self.expected(ParseErrorKind::AssignmentExpected, "Assignment operator")
                        );
                    }
                }
                self.advance();
                assign_to = Some(ident);
            }
            self.error_location = None;

            let call = self.parse_function_call(rep, assign_to, ctx)?;
            rep.do_block.calls.push(call);

            if matches!(
                self.token(),
                TokenKind::KwDone | TokenKind::Illegal | TokenKind::Eos
            ) {
                break;
            }
        }

        if self.token() != TokenKind::KwDone {
            return Err(self.expected(
                ParseErrorKind::FunctionOrDoneExpected,
                "Function name or 'DONE'",
            ));
        }
        self.advance();
        Ok(())
    }

    /// Parse `(<n>)` after `do_p`, leaving the scanner on `)`.
    fn parse_thread_count(&mut self) -> Result<NonZeroUsize, ParseError> {
        if self.advance() != TokenKind::LeftParen {
            return Err(self.expected(ParseErrorKind::LeftParenthesisExpected, "Symbol '('"));
        }

        let mut threads: i64 = 0;
        let mut negative = false;
        loop {
            let token = self.advance();
            match token {
                TokenKind::RightParen
                | TokenKind::KwDo
                | TokenKind::KwWhere
                | TokenKind::Ident
                | TokenKind::Illegal
                | TokenKind::Eos => break,
                TokenKind::IntNumber => {
                    let n = self.scanner.lexeme().as_int().unwrap_or_default();
                    threads = if negative { -n } else { n };
                }
                TokenKind::Minus => negative = true,
                TokenKind::FloatNumber | TokenKind::String | TokenKind::BoolConst => {
                    return Err(
                        self.expected(ParseErrorKind::IntegerExpected, "Positive integer number")
                    );
                }
                TokenKind::RightBracket | TokenKind::RightBrace => {
                    return Err(self.expected(ParseErrorKind::RightParenthesisExpected, "Symbol ')'"));
                }
                _ => {}
            }
        }

        if self.token() != TokenKind::RightParen {
            return Err(self.expected(ParseErrorKind::RightParenthesisExpected, "Symbol ')'"));
        }

        match usize::try_from(threads).ok().and_then(NonZeroUsize::new) {
            Some(threads) => Ok(threads),
            None => Err(self.error(
                ParseErrorKind::ThreadCountInvalid,
                "Number of threads is expected to be a positive, non-zero integer",
            )),
        }
    }

    fn parse_function_call(
        &mut self,
        rep: &MacroRep,
        assign_to: Option<String>,
        ctx: &dyn QueryContext,
    ) -> Result<FunctionCall, ParseError> {
        if self.token() != TokenKind::Ident {
            return Err(self.expected(ParseErrorKind::FunctionExpected, "Function name"));
        }
        let name = self.current_str();
        let location = self.scanner.lexeme().start;
        if !self.is_do_function(&name) {
            return Err(self.error(
                ParseErrorKind::FunctionExpected,
                format!("Unknown function name: '{name}'"),
            ));
        }

        if self.advance() != TokenKind::LeftParen {
            return Err(self.expected(ParseErrorKind::LeftParenthesisExpected, "Symbol '('"));
        }

        let mut arguments = Vec::new();
        if self.advance() != TokenKind::RightParen {
            loop {
                let location = self.scanner.lexeme().start;
                let value = match self.token() {
                    TokenKind::Ident => {
                        let ident = self.current_str();
                        let known = rep.has_var(&ident)
                            || self.rt_vars.contains(&ident)
                            || ctx.has_identifier(&ident);
                        if !known {
                            return Err(self.error(
                                ParseErrorKind::UndefinedVariable,
                                format!("Undefined variable: '{ident}'"),
                            ));
                        }
                        self.advance();
                        ArgValue::Ident(ident)
                    }
                    TokenKind::String => {
                        let value = ArgValue::Literal(Literal::String(self.current_str()));
                        self.advance();
                        value
                    }
                    TokenKind::BoolConst => {
                        let value = ArgValue::Literal(Literal::Bool(
                            self.scanner.lexeme().as_bool().unwrap_or_default(),
                        ));
                        self.advance();
                        value
                    }
                    _ => match self.signed_number() {
                        Some(number) => ArgValue::Literal(number),
                        None => {
                            return Err(
                                self.expected(ParseErrorKind::ArgumentExpected, "Function argument")
                            );
                        }
                    },
                };
                arguments.push(Argument { value, location });

                if self.token() != TokenKind::Comma {
                    break;
                }
                self.advance();
            }
        }

        match self.token() {
            TokenKind::RightParen => {}
            TokenKind::Dot => {
                return Err(self.error(
                    ParseErrorKind::WrongVariableUsage,
                    format!("Symbol '\"' expected around the argument of '{name}'"),
                ));
            }
            _ => return Err(self.expected(ParseErrorKind::RightParenthesisExpected, "Symbol ')'")),
        }

        let where_clause = match self.advance() {
            TokenKind::Semicolon => None,
            TokenKind::KwWhere => {
                let clause = self.parse_where(ClauseEnd::Semicolon)?;
                if self.token() != TokenKind::Semicolon {
                    return Err(self.expected(ParseErrorKind::SemicolonExpected, "Symbol ';'"));
                }
                Some(clause)
            }
            _ => {
                return Err(self.expected(
                    ParseErrorKind::EndOfFunction,
                    "Keyword 'WHERE' or semicolon",
                ));
            }
        };
        self.advance();

        Ok(FunctionCall {
            name,
            location,
            arguments,
            assign_to,
            where_clause,
        })
    }
}

/// Comma-separated values following `#Keywords:` in a header comment.
fn meta_keywords(comment: &str) -> Vec<String> {
    let Some((_, list)) = comment.split_once(KEYWORDS_MARKER) else {
        return Vec::new();
    };
    list.split(',')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(String::from)
        .collect()
}
