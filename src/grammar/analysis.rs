use serde::Serialize;

use crate::Error;

use super::{
    first::FirstSets,
    follow::FollowSets,
    ll1_table::{Cell, LL1Table},
    pretty_print::OrderedMap,
    Grammar, END_MARK, EPSILON,
};

/// Rendering of a conflicted table cell.
pub const CONFLICT_MARK: &str = "<<conflict>>";

/// FIRST, FOLLOW and the LL(1) table of one grammar for one start symbol.
#[derive(Debug, Clone)]
pub struct Analysis {
    grammar: Grammar,
    start: usize,
    first: FirstSets,
    follow: FollowSets,
    table: LL1Table,
}

impl Analysis {
    /// Fails if `start` is not a nonterminal of `grammar`.
    pub fn new(grammar: Grammar, start: &str) -> Result<Self, Error> {
        let start = grammar
            .get_non_terminal_index(start)
            .ok_or_else(|| Error::UnknownStartSymbol(start.to_string()))?;

        let first = grammar.calculate_first();
        let follow = grammar.calculate_follow(&first, start);
        let table = grammar.generate_ll1_table(&first, &follow);

        Ok(Self {
            grammar,
            start,
            first,
            follow,
            table,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn start(&self) -> &str {
        self.grammar.non_terminals[self.start].name.as_str()
    }

    pub fn first(&self) -> &FirstSets {
        &self.first
    }

    pub fn follow(&self) -> &FollowSets {
        &self.follow
    }

    pub fn table(&self) -> &LL1Table {
        &self.table
    }

    pub fn is_ll1(&self) -> bool {
        self.table.is_ll1()
    }

    /// FIRST of a nonterminal as sorted names, `ε` included when nullable.
    pub fn first_names(&self, non_terminal: usize) -> Vec<&str> {
        let set = self.first.get(non_terminal);
        let mut names: Vec<&str> = set.terminals.iter().map(|s| s.as_str()).collect();
        if set.nullable {
            names.push(EPSILON);
        }
        names.sort();
        names
    }

    /// FOLLOW of a nonterminal as sorted names, `$` included for end of input.
    pub fn follow_names(&self, non_terminal: usize) -> Vec<&str> {
        let set = self.follow.get(non_terminal);
        let mut names: Vec<&str> = set.terminals.iter().map(|s| s.as_str()).collect();
        if set.end_mark {
            names.push(END_MARK);
        }
        names.sort();
        names
    }

    pub fn to_output(&self) -> AnalysisOutput {
        let first = self
            .grammar
            .non_terminal_iter()
            .map(|nt| (nt.name.as_str(), self.first_names(nt.index)))
            .collect();
        let follow = self
            .grammar
            .non_terminal_iter()
            .map(|nt| (nt.name.as_str(), self.follow_names(nt.index)))
            .collect();

        let table = self
            .grammar
            .non_terminal_iter()
            .map(|nt| {
                let mut row: Vec<(&str, CellOutput)> = self
                    .table
                    .row(nt.index)
                    .iter()
                    .map(|(lookahead, cell)| {
                        let cell = match cell {
                            Cell::Production(p) => CellOutput::Production(
                                self.grammar.production_to_vec_str(&nt.productions[*p]),
                            ),
                            Cell::Conflict(_) => CellOutput::Conflict(CONFLICT_MARK),
                        };
                        (lookahead.name(), cell)
                    })
                    .collect();
                row.sort_by(|a, b| a.0.cmp(b.0));
                (nt.name.as_str(), OrderedMap(row))
            })
            .collect();

        AnalysisOutput {
            first: OrderedMap(first),
            follow: OrderedMap(follow),
            table: OrderedMap(table),
            is_ll1: self.is_ll1(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_output())
    }
}

/// A table cell as it is handed to callers: the chosen right-hand side
/// (empty for ε) or [`CONFLICT_MARK`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CellOutput<'a> {
    Production(Vec<&'a str>),
    Conflict(&'static str),
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput<'a> {
    pub first: OrderedMap<&'a str, Vec<&'a str>>,
    pub follow: OrderedMap<&'a str, Vec<&'a str>>,
    pub table: OrderedMap<&'a str, OrderedMap<&'a str, CellOutput<'a>>>,
    pub is_ll1: bool,
}
