//! Front end for a small macro scripting language.
//!
//! A macro names a record subtype to iterate over, an optional WHERE
//! predicate and a list of function calls to run:
//!
//! ```text
//! MACRO Fix_locus "Fix locus tags"
//! VARS prefix = "ABC_"
//! FOR EACH Gene-ref
//! WHERE locus_tag LIKE "abc%"
//! DO
//!     SetQual(prefix);
//! DONE
//! ```
//!
//! [`MacroParser`] turns such text into a [`MacroRep`]; [`MacroLibrary`]
//! parses a whole file of them.

pub mod ast;
pub mod error;
pub mod library;
pub mod parser;
pub mod query;
pub mod reorder;
pub mod scanner;
pub mod where_expr;

pub use ast::MacroRep;
pub use error::{ErrorReportType, ParseError, ParseErrorKind};
pub use library::MacroLibrary;
pub use parser::{MacroParser, ParserConfig};
pub use query::{ExpressionParser, NodeKind, QueryContext, QueryNode};
pub use scanner::{Location, Scanner, TokenKind};
pub use where_expr::WhereExpressionParser;
