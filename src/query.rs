//! Predicate trees built from WHERE clauses, and the seams through which the
//! macro parser reaches its expression parser and host.

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::scanner::Location;

/// Node discriminant of a predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    And,
    Or,
    Xor,
    Not,
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    Like,
    Between,
    Function(String),
    Identifier(String),
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl NodeKind {
    /// `AND`, `OR` and `XOR`, whose operands may be merged and reordered.
    pub fn is_commutative(&self) -> bool {
        matches!(self, NodeKind::And | NodeKind::Or | NodeKind::Xor)
    }

    fn comparison(&self) -> Option<&'static str> {
        match self {
            NodeKind::Eq => Some("="),
            NodeKind::Lt => Some("<"),
            NodeKind::Le => Some("<="),
            NodeKind::Gt => Some(">"),
            NodeKind::Ge => Some(">="),
            NodeKind::Like => Some("LIKE"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryNode {
    pub kind: NodeKind,
    pub children: Vec<QueryNode>,
    /// Absolute position in the macro text.
    pub location: Location,
}

impl QueryNode {
    pub fn new(kind: NodeKind, location: Location) -> Self {
        Self::with_children(kind, Vec::new(), location)
    }

    pub fn with_children(kind: NodeKind, children: Vec<QueryNode>, location: Location) -> Self {
        Self {
            kind,
            children,
            location,
        }
    }

    pub fn function_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Function(name) => Some(name),
            _ => None,
        }
    }

    /// Structural equality that ignores source locations.
    pub fn same_shape(&self, other: &QueryNode) -> bool {
        self.kind == other.kind
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_shape(b))
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_commutative() {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }

    fn fmt_joined(&self, f: &mut fmt::Formatter<'_>, separator: &str) -> fmt::Result {
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                f.write_str(separator)?;
            }
            child.fmt_operand(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::And => self.fmt_joined(f, " AND "),
            NodeKind::Or => self.fmt_joined(f, " OR "),
            NodeKind::Xor => self.fmt_joined(f, " XOR "),
            NodeKind::Not => {
                f.write_str("NOT ")?;
                self.fmt_joined(f, " ")
            }
            NodeKind::In => {
                let Some((value, items)) = self.children.split_first() else {
                    return f.write_str("IN ()");
                };
                value.fmt_operand(f)?;
                f.write_str(" IN (")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt_operand(f)?;
                }
                f.write_str(")")
            }
            NodeKind::Between => match self.children.as_slice() {
                [value, low, high] => {
                    value.fmt_operand(f)?;
                    f.write_str(" BETWEEN ")?;
                    low.fmt_operand(f)?;
                    f.write_str(" AND ")?;
                    high.fmt_operand(f)
                }
                _ => self.fmt_joined(f, " BETWEEN "),
            },
            NodeKind::Function(name) => {
                write!(f, "{name}(")?;
                self.fmt_joined(f, ", ")?;
                f.write_str(")")
            }
            NodeKind::Identifier(name) => f.write_str(name),
            NodeKind::String(text) => write!(f, "\"{}\"", text.replace('"', "\"\"")),
            NodeKind::Int(n) => write!(f, "{n}"),
            NodeKind::Float(n) => crate::ast::write_float(f, *n),
            NodeKind::Bool(b) => write!(f, "{b}"),
            kind => {
                let operator = kind.comparison().unwrap_or("?");
                self.fmt_joined(f, &format!(" {operator} "))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    CaseSensitive,
    #[default]
    CaseInsensitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Reject function names missing from the whitelist.
    #[default]
    SyntaxCheck,
    Permissive,
}

/// Settings handed to an [`ExpressionParser`] with each clause.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionOptions<'a> {
    pub case_sensitivity: CaseSensitivity,
    pub mode: ParseMode,
    pub functions: &'a [String],
    /// Where the clause text begins in the macro text.
    pub start: Location,
}

impl ExpressionOptions<'_> {
    /// Whether `name` may be called from the clause.
    pub fn allows_function(&self, name: &str) -> bool {
        match (self.mode, self.case_sensitivity) {
            (ParseMode::Permissive, _) => true,
            (ParseMode::SyntaxCheck, CaseSensitivity::CaseInsensitive) => {
                self.functions.iter().any(|f| f.eq_ignore_ascii_case(name))
            }
            (ParseMode::SyntaxCheck, CaseSensitivity::CaseSensitive) => {
                self.functions.iter().any(|f| f == name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryParseError {
    #[error("syntax error at {location}: {message}")]
    Syntax { message: String, location: Location },
    #[error("unknown function '{name}' at {location}")]
    UnknownFunction { name: String, location: Location },
    #[error("invalid number '{text}' at {location}")]
    InvalidNumber { text: String, location: Location },
}

/// Turns the raw text of a WHERE clause into a predicate tree.
pub trait ExpressionParser {
    fn parse_expression(
        &self,
        text: &str,
        options: &ExpressionOptions<'_>,
    ) -> Result<QueryNode, QueryParseError>;
}

/// Host-side knowledge consulted while parsing.
pub trait QueryContext {
    /// Whether `name` is an identifier the host binds at run time, making it
    /// a valid function argument.
    fn has_identifier(&self, _name: &str) -> bool {
        false
    }
}

impl QueryContext for () {}

impl QueryContext for HashSet<String> {
    fn has_identifier(&self, name: &str) -> bool {
        self.contains(name)
    }
}
