use std::collections::HashMap;

use crate::ast::MacroRep;
use crate::error::ParseError;
use crate::parser::{MacroParser, ParserConfig};
use crate::query::QueryContext;

/// Parsed macros, looked up by case-insensitive name.
#[derive(Debug, Default, Clone)]
pub struct MacroLibrary {
    macros: Vec<MacroRep>,
    index: HashMap<String, usize>,
}

impl MacroLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every macro of `text` and add them to the library.
    ///
    /// Nothing is added unless all of them parse. Returns the number of
    /// macros read.
    pub fn load(
        &mut self,
        text: &str,
        config: &ParserConfig,
        ctx: &dyn QueryContext,
    ) -> Result<usize, ParseError> {
        let mut parser = MacroParser::new(config.clone());
        parser.set_source(text);

        let mut parsed = Vec::new();
        loop {
            match parser.parse(false, ctx) {
                Ok(true) => parsed.extend(parser.detach_macro()),
                Ok(false) => break,
                Err(err) => {
                    log::warn!(
                        "macro #{} failed to parse, nothing loaded: {err}",
                        parsed.len() + 1
                    );
                    return Err(err);
                }
            }
        }

        let count = parsed.len();
        for rep in parsed {
            self.define(rep);
        }
        Ok(count)
    }

    /// Add a macro, replacing any macro of the same name.
    pub fn define(&mut self, rep: MacroRep) {
        let key = rep.name.to_ascii_lowercase();
        match self.index.get(&key) {
            Some(&slot) => self.macros[slot] = rep,
            None => {
                self.index.insert(key, self.macros.len());
                self.macros.push(rep);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&MacroRep> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&slot| &self.macros[slot])
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Macros in the order they were first defined.
    pub fn iter(&self) -> impl Iterator<Item = &MacroRep> {
        self.macros.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.macros.iter().map(|rep| rep.name.as_str())
    }
}
