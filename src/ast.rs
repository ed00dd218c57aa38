use std::fmt;
use std::num::NonZeroUsize;
use std::ops::Range;

use crate::query::QueryNode;
use crate::scanner::Location;

/// Typed constant: a choice item or a function argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// Value bound to a declared variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    String(String),
    /// Prompt text, answered by the user before the macro runs.
    Ask(String),
    Choice(Vec<Literal>),
    Bool(bool),
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    String,
    Ask,
    Choice,
    Bool,
    Int,
    Float,
}

impl VarValue {
    pub fn kind(&self) -> VarKind {
        match self {
            VarValue::String(_) => VarKind::String,
            VarValue::Ask(_) => VarKind::Ask,
            VarValue::Choice(_) => VarKind::Choice,
            VarValue::Bool(_) => VarKind::Bool,
            VarValue::Int(_) => VarKind::Int,
            VarValue::Float(_) => VarKind::Float,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub value: VarValue,
}

/// Definitions introduced by one `vars` keyword.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VarBlock {
    pub vars: Vec<Variable>,
}

/// Inclusive sequence interval of `RANGE [start, stop]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqRange {
    pub start: u64,
    pub stop: u64,
}

/// A parsed and reordered WHERE predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    /// Clause text as written.
    pub text: String,
    pub tree: QueryNode,
    /// The `where` keyword.
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecMode {
    #[default]
    Sequential,
    Parallel { threads: NonZeroUsize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Reference to a variable or run-time identifier.
    Ident(String),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub value: ArgValue,
    pub location: Location,
}

/// One statement of the DO block.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub location: Location,
    pub arguments: Vec<Argument>,
    /// Identifier receiving the return value.
    pub assign_to: Option<String>,
    pub where_clause: Option<WhereClause>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DoBlock {
    pub mode: ExecMode,
    /// The `do`/`do_p` keyword.
    pub location: Location,
    pub calls: Vec<FunctionCall>,
}

/// A fully parsed macro.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MacroRep {
    pub name: String,
    pub title: Option<String>,
    /// Values collected from `#Keywords:` comments.
    pub keywords: Vec<String>,
    pub var_blocks: Vec<VarBlock>,
    /// ASN.1 selector of `FOR EACH`.
    pub for_each: Option<String>,
    /// Accession of `FROM`.
    pub named_annot: Option<String>,
    pub range: Option<SeqRange>,
    pub where_clause: Option<WhereClause>,
    pub do_block: DoBlock,
    /// Offsets of the macro within the parsed text.
    pub source_span: Range<usize>,
    /// The macro's own text.
    pub source: String,
}

impl MacroRep {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// All variables in declaration order.
    pub fn vars(&self) -> impl Iterator<Item = &Variable> {
        self.var_blocks.iter().flat_map(|block| &block.vars)
    }

    pub fn find_var(&self, name: &str) -> Option<&Variable> {
        self.vars().find(|var| var.name == name)
    }

    pub fn has_var(&self, name: &str) -> bool {
        self.find_var(name).is_some()
    }
}

/// Writes `n` in plain decimal with a fractional part, the only float form
/// the scanner reads back.
pub(crate) fn write_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let text = n.to_string();
    if text.contains('.') {
        f.write_str(&text)
    } else {
        write!(f, "{text}.0")
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str, delimiter: char) -> fmt::Result {
    let doubled: String = [delimiter, delimiter].iter().collect();
    write!(
        f,
        "{delimiter}{}{delimiter}",
        text.replace(delimiter, &doubled)
    )
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write_quoted(f, s, '"'),
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Float(n) => write_float(f, *n),
            Literal::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::String(s) => write_quoted(f, s, '"'),
            VarValue::Ask(s) => write_quoted(f, s, '%'),
            VarValue::Choice(items) => {
                f.write_str("CHOICE { ")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(" }")
            }
            VarValue::Bool(b) => write!(f, "{b}"),
            VarValue::Int(n) => write!(f, "{n}"),
            VarValue::Float(n) => write_float(f, *n),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Ident(name) => f.write_str(name),
            ArgValue::Literal(literal) => write!(f, "{literal}"),
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(target) = &self.assign_to {
            write!(f, "{target} = ")?;
        }
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg.value)?;
        }
        f.write_str(")")?;
        if let Some(clause) = &self.where_clause {
            write!(f, " WHERE {}", clause.text)?;
            // A trailing `--` comment would swallow the semicolon.
            if clause.text.lines().last().is_some_and(|line| line.contains("--")) {
                writeln!(f)?;
            }
        }
        f.write_str(";")
    }
}

impl fmt::Display for MacroRep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MACRO {}", self.name)?;
        if let Some(title) = &self.title {
            f.write_str(" ")?;
            write_quoted(f, title, '"')?;
        }
        writeln!(f)?;
        if !self.keywords.is_empty() {
            writeln!(f, "-- #Keywords: {}", self.keywords.join(", "))?;
        }
        for block in &self.var_blocks {
            writeln!(f, "VARS")?;
            for var in &block.vars {
                writeln!(f, "    {} = {}", var.name, var.value)?;
            }
        }
        if let Some(selector) = &self.for_each {
            writeln!(f, "FOR EACH {selector}")?;
        }
        if let Some(annot) = &self.named_annot {
            writeln!(f, "FROM {annot}")?;
        }
        if let Some(range) = &self.range {
            writeln!(f, "RANGE [{}, {}]", range.start, range.stop)?;
        }
        if let Some(clause) = &self.where_clause {
            writeln!(f, "WHERE {}", clause.text)?;
        }
        match self.do_block.mode {
            ExecMode::Sequential => writeln!(f, "DO")?,
            ExecMode::Parallel { threads } => writeln!(f, "DO_P({threads})")?,
        }
        for call in &self.do_block.calls {
            writeln!(f, "    {call}")?;
        }
        f.write_str("DONE")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::NodeKind;

    fn arg(value: ArgValue) -> Argument {
        Argument {
            value,
            location: Location::default(),
        }
    }

    fn sample() -> MacroRep {
        let mut rep = MacroRep::new("Fix_genes");
        rep.title = Some("Fix \"gene\" names".to_string());
        rep.keywords = vec!["gene".to_string(), "cleanup".to_string()];
        rep.var_blocks = vec![
            VarBlock {
                vars: vec![
                    Variable {
                        name: "prefix".into(),
                        value: VarValue::Ask("Prefix?".into()),
                    },
                    Variable {
                        name: "mode".into(),
                        value: VarValue::Choice(vec![
                            Literal::String("a".into()),
                            Literal::Int(-2),
                            Literal::Float(0.5),
                        ]),
                    },
                ],
            },
            VarBlock {
                vars: vec![Variable {
                    name: "strict".into(),
                    value: VarValue::Bool(false),
                }],
            },
        ];
        rep.for_each = Some("Seq-feat".into());
        rep.named_annot = Some("NA000000123.1".into());
        rep.range = Some(SeqRange { start: 10, stop: 20 });
        rep.where_clause = Some(WhereClause {
            text: "data.gene.locus = \"abc\"".into(),
            tree: QueryNode::new(NodeKind::Bool(true), Location::default()),
            location: Location::default(),
        });
        rep.do_block = DoBlock {
            mode: ExecMode::Parallel {
                threads: NonZeroUsize::new(4).unwrap(),
            },
            location: Location::default(),
            calls: vec![
                FunctionCall {
                    name: "Resolve".into(),
                    location: Location::default(),
                    arguments: vec![arg(ArgValue::Literal(Literal::String("data".into())))],
                    assign_to: Some("obj".into()),
                    where_clause: None,
                },
                FunctionCall {
                    name: "SetQual".into(),
                    location: Location::default(),
                    arguments: vec![
                        arg(ArgValue::Ident("obj".into())),
                        arg(ArgValue::Ident("prefix".into())),
                        arg(ArgValue::Literal(Literal::Bool(true))),
                    ],
                    assign_to: None,
                    where_clause: None,
                },
            ],
        };
        rep
    }

    #[test]
    fn test_display_macro() {
        let expected = "\
MACRO Fix_genes \"Fix \"\"gene\"\" names\"
-- #Keywords: gene, cleanup
VARS
    prefix = %Prefix?%
    mode = CHOICE { \"a\", -2, 0.5 }
VARS
    strict = false
FOR EACH Seq-feat
FROM NA000000123.1
RANGE [10, 20]
WHERE data.gene.locus = \"abc\"
DO_P(4)
    obj = Resolve(\"data\");
    SetQual(obj, prefix, true);
DONE";
        assert_eq!(sample().to_string(), expected);
    }

    #[test]
    fn test_vars_lookup() {
        let rep = sample();
        let names: Vec<_> = rep.vars().map(|var| var.name.as_str()).collect();
        assert_eq!(names, ["prefix", "mode", "strict"]);
        assert_eq!(rep.find_var("mode").map(|v| v.value.kind()), Some(VarKind::Choice));
        assert!(rep.has_var("strict"));
        assert!(!rep.has_var("STRICT"));
    }

    #[test]
    fn test_floats_display_without_exponent() {
        assert_eq!(Literal::Float(1e-7).to_string(), "0.0000001");
        assert_eq!(Literal::Float(-2.0).to_string(), "-2.0");
        assert_eq!(
            VarValue::Float(12345678901234567.0).to_string(),
            "12345678901234568.0"
        );
    }

    #[test]
    fn test_call_clause_with_trailing_comment() {
        let call = FunctionCall {
            name: "Bar".into(),
            location: Location::default(),
            arguments: Vec::new(),
            assign_to: None,
            where_clause: Some(WhereClause {
                text: "a = 1 -- note".into(),
                tree: QueryNode::new(NodeKind::Bool(true), Location::default()),
                location: Location::default(),
            }),
        };
        assert_eq!(call.to_string(), "Bar() WHERE a = 1 -- note\n;");
    }

    #[test]
    fn test_sequential_block_display() {
        let rep = MacroRep::new("Empty");
        assert_eq!(rep.to_string(), "MACRO Empty\nDO\nDONE");
    }
}
