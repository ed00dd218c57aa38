//! Structured errors raised while parsing a macro.

use thiserror::Error;

use crate::scanner::Location;

/// How an error location is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorReportType {
    /// `Line 3, Pos 7`
    #[default]
    LineAndColumn,
    /// `Pos 42`, the 1-based offset into the text
    Offset,
}

/// Failure classes of the macro grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    UnexpectedToken,
    KeywordExpected,
    MacroNameExpected,
    IdentifierNameExpected,
    VariableDefined,
    AssignmentExpected,
    VarDefinitionExpected,
    LeftBraceExpected,
    CommaOrRightBraceExpected,
    AsnSelectorExpected,
    NamedAnnotExpected,
    RangeExpected,
    LeftBracketExpected,
    RightBracketExpected,
    IntegerExpected,
    CommaExpected,
    RangeInvalid,
    WhereClauseExpected,
    WhereClauseInvalid,
    FunctionOrObjectNameExpected,
    AssignmentToConst,
    FunctionExpected,
    FunctionOrDoneExpected,
    LeftParenthesisExpected,
    RightParenthesisExpected,
    ThreadCountInvalid,
    UndefinedVariable,
    WrongVariableUsage,
    ArgumentExpected,
    SemicolonExpected,
    EndOfFunction,
}

/// The first error found in a macro; parsing stops there.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[Parsing error] {}: {message}", render_location(.location, .report))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub location: Location,
    pub report: ErrorReportType,
}

impl ParseError {
    pub fn new(
        kind: ParseErrorKind,
        message: impl Into<String>,
        location: Location,
        report: ErrorReportType,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
            report,
        }
    }
}

fn render_location(location: &Location, report: &ErrorReportType) -> String {
    match report {
        ErrorReportType::LineAndColumn => format!("Line {}, Pos {}", location.line, location.column),
        ErrorReportType::Offset => format!("Pos {}", location.pos + 1),
    }
}
