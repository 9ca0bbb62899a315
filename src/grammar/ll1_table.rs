use crowbook_text_processing::escape::tex as escape_tex;
use std::collections::{BTreeMap, BTreeSet};

use super::{first::FirstSets, follow::FollowSets, Grammar, END_MARK, EPSILON};

/// A column of the table: a terminal or the end of input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lookahead {
    EndMark,
    Terminal(String),
}

impl Lookahead {
    pub fn terminal(name: &str) -> Self {
        Lookahead::Terminal(name.to_string())
    }

    pub fn name(&self) -> &str {
        match self {
            Lookahead::EndMark => END_MARK,
            Lookahead::Terminal(name) => name.as_str(),
        }
    }
}

/// An occupied cell. Productions are indices into the row nonterminal's
/// production list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Production(usize),
    /// Every production that claimed the cell. Never turns back into a
    /// single production.
    Conflict(BTreeSet<usize>),
}

impl Cell {
    /// Returns false if the cell is a conflict afterwards.
    fn claim(&mut self, production: usize) -> bool {
        match self {
            Cell::Production(p) if *p == production => true,
            Cell::Production(p) => {
                let claimants = BTreeSet::from([*p, production]);
                *self = Cell::Conflict(claimants);
                false
            }
            Cell::Conflict(claimants) => {
                claimants.insert(production);
                false
            }
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Cell::Conflict(_))
    }
}

pub type LL1Row = BTreeMap<Lookahead, Cell>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LL1Table {
    /// Indexed like [`Grammar::non_terminals`]; missing keys are unset cells.
    rows: Vec<LL1Row>,
    is_ll1: bool,
}

impl LL1Table {
    pub fn build(grammar: &Grammar, first: &FirstSets, follow: &FollowSets) -> Self {
        let mut rows: Vec<LL1Row> = vec![BTreeMap::new(); grammar.non_terminals.len()];
        let mut is_ll1 = true;

        for nt in grammar.non_terminal_iter() {
            let row = &mut rows[nt.index];
            let mut claim = |lookahead: Lookahead, production: usize| {
                let cell = row
                    .entry(lookahead.clone())
                    .or_insert(Cell::Production(production));
                if !cell.claim(production) {
                    tracing::debug!(
                        non_terminal = nt.name.as_str(),
                        lookahead = lookahead.name(),
                        production,
                        "LL(1) conflict"
                    );
                    is_ll1 = false;
                }
            };

            for (i, production) in nt.productions.iter().enumerate() {
                let production_first = first.first_of_sequence(production);

                for terminal in &production_first.terminals {
                    claim(Lookahead::terminal(terminal), i);
                }

                if production_first.nullable {
                    let nt_follow = follow.get(nt.index);
                    for terminal in &nt_follow.terminals {
                        claim(Lookahead::terminal(terminal), i);
                    }
                    if nt_follow.end_mark {
                        claim(Lookahead::EndMark, i);
                    }
                }
            }
        }

        tracing::debug!(is_ll1, "LL(1) table built");

        LL1Table { rows, is_ll1 }
    }

    pub fn is_ll1(&self) -> bool {
        self.is_ll1
    }

    pub fn row(&self, non_terminal: usize) -> &LL1Row {
        &self.rows[non_terminal]
    }

    pub fn get(&self, non_terminal: usize, lookahead: &Lookahead) -> Option<&Cell> {
        self.rows[non_terminal].get(lookahead)
    }

    pub fn conflicts(&self) -> impl Iterator<Item = (usize, &Lookahead, &BTreeSet<usize>)> {
        self.rows.iter().enumerate().flat_map(|(nt, row)| {
            row.iter().filter_map(move |(lookahead, cell)| match cell {
                Cell::Conflict(claimants) => Some((nt, lookahead, claimants)),
                Cell::Production(_) => None,
            })
        })
    }

    /// Every terminal of the grammar, sorted, followed by the end marker.
    fn columns(grammar: &Grammar) -> Vec<Lookahead> {
        grammar
            .terminals()
            .into_iter()
            .map(Lookahead::terminal)
            .chain(std::iter::once(Lookahead::EndMark))
            .collect()
    }

    fn cell_rights<'a>(grammar: &'a Grammar, non_terminal: usize, cell: &Cell) -> Vec<Vec<&'a str>> {
        let productions = &grammar.non_terminals[non_terminal].productions;
        let right = |p: usize| {
            let right = grammar.production_to_vec_str(&productions[p]);
            if right.is_empty() {
                vec![EPSILON]
            } else {
                right
            }
        };
        match cell {
            Cell::Production(p) => vec![right(*p)],
            Cell::Conflict(claimants) => claimants.iter().map(|p| right(*p)).collect(),
        }
    }

    pub fn to_plaintext(&self, grammar: &Grammar) -> String {
        let columns = Self::columns(grammar);

        let mut header: Vec<String> = vec![String::new()];
        header.extend(columns.iter().map(|c| c.name().to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for nt in grammar.non_terminal_iter() {
            let mut line: Vec<String> = vec![nt.name.clone()];
            line.extend(columns.iter().map(|c| match self.get(nt.index, c) {
                Some(cell) => Self::cell_rights(grammar, nt.index, cell)
                    .iter()
                    .map(|right| format!("{} -> {}", nt.name, right.join(" ")))
                    .collect::<Vec<_>>()
                    .join(", "),
                None => String::new(),
            }));
            output.push(line);
        }

        let width: Vec<usize> = (0..output[0].len())
            .map(|j| {
                output
                    .iter()
                    .map(|line| line[j].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self, grammar: &Grammar) -> String {
        let columns = Self::columns(grammar);

        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(columns.len()),
        )];
        header.extend(
            columns
                .iter()
                .map(|c| format!("\\text{{{}}}", escape_tex(c.name()))),
        );
        let header = header.join(" & ");

        let mut output: Vec<String> = Vec::new();
        for nt in grammar.non_terminal_iter() {
            let mut line: Vec<String> = vec![escape_tex(nt.name.as_str()).to_string()];
            line.extend(columns.iter().map(|c| {
                let cell = match self.get(nt.index, c) {
                    Some(cell) => cell,
                    None => return String::new(),
                };
                let r = Self::cell_rights(grammar, nt.index, cell)
                    .iter()
                    .map(|right| {
                        format!(
                            "{} \\rightarrow {}",
                            escape_tex(nt.name.as_str()),
                            right
                                .iter()
                                .map(|s| escape_tex(*s))
                                .collect::<Vec<_>>()
                                .join(" \\ ")
                                .replace(EPSILON, "\\epsilon")
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                if cell.is_conflict() {
                    format!("{{\\color{{red}}{}}}", r)
                } else {
                    r
                }
            }));
            output.push(line.join(" & "));
        }

        let output = output.join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }
}

impl Grammar {
    pub fn generate_ll1_table(&self, first: &FirstSets, follow: &FollowSets) -> LL1Table {
        LL1Table::build(self, first, follow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(source: &str, start: &str) -> (Grammar, LL1Table) {
        let g = Grammar::parse(source).unwrap();
        let first = g.calculate_first();
        let follow = g.calculate_follow(&first, g.get_non_terminal_index(start).unwrap());
        let table = g.generate_ll1_table(&first, &follow);
        (g, table)
    }

    #[test]
    fn canonical_ll1_grammar() {
        let (g, table) = build("E -> T E2\nE2 -> + T E2 | ε\nT -> id", "E");
        assert!(table.is_ll1());

        let e = g.get_non_terminal_index("E").unwrap();
        let e2 = g.get_non_terminal_index("E2").unwrap();
        assert_eq!(table.get(e, &Lookahead::terminal("id")), Some(&Cell::Production(0)));
        assert_eq!(table.get(e2, &Lookahead::terminal("+")), Some(&Cell::Production(0)));
        assert_eq!(table.get(e2, &Lookahead::EndMark), Some(&Cell::Production(1)));
        assert_eq!(table.get(e2, &Lookahead::terminal("id")), None);
        assert_eq!(table.conflicts().count(), 0);
    }

    #[test]
    fn classic_conflict() {
        let (g, table) = build("S -> A | B\nA -> a\nB -> a", "S");
        assert!(!table.is_ll1());
        let s = g.get_non_terminal_index("S").unwrap();
        assert_eq!(
            table.get(s, &Lookahead::terminal("a")),
            Some(&Cell::Conflict(BTreeSet::from([0, 1])))
        );
    }

    #[test]
    fn conflict_stays_conflict_and_collects_claimants() {
        let (_, table) = build("S -> a | a b | a c", "S");
        assert!(!table.is_ll1());
        assert_eq!(
            table.get(0, &Lookahead::terminal("a")),
            Some(&Cell::Conflict(BTreeSet::from([0, 1, 2])))
        );
    }

    #[test]
    fn first_follow_conflict_from_nullable_alternative() {
        let (_, table) = build("S -> A a\nA -> a | ε", "S");
        assert!(!table.is_ll1());
        let conflicts: Vec<_> = table.conflicts().map(|(nt, l, _)| (nt, l.clone())).collect();
        assert_eq!(conflicts, vec![(1, Lookahead::terminal("a"))]);
    }

    #[test]
    fn same_production_twice_is_not_a_conflict() {
        let mut cell = Cell::Production(3);
        assert!(cell.claim(3));
        assert_eq!(cell, Cell::Production(3));
        assert!(!cell.claim(1));
        assert!(!cell.claim(3));
        assert_eq!(cell, Cell::Conflict(BTreeSet::from([1, 3])));
    }

    #[test]
    fn conflicts_do_not_depend_on_production_order() {
        let (_, forward) = build("S -> A | B | c\nA -> a\nB -> a | b", "S");
        let (_, backward) = build("S -> c | B | A\nA -> a\nB -> b | a", "S");
        let cells = |t: &LL1Table| -> Vec<(usize, Lookahead)> {
            t.conflicts().map(|(nt, l, _)| (nt, l.clone())).collect()
        };
        assert_eq!(cells(&forward), cells(&backward));
        assert!(!forward.is_ll1());
        assert!(!backward.is_ll1());
    }

    #[test]
    fn every_first_terminal_has_its_production_or_conflict() {
        let (g, table) = build(
            "E -> T E'\nE' -> + T E' | ε\nT -> F T'\nT' -> * F T' | ε\nF -> ( E ) | id",
            "E",
        );
        let first = g.calculate_first();
        for nt in g.non_terminal_iter() {
            for (i, production) in nt.productions.iter().enumerate() {
                for t in &first.first_of_sequence(production).terminals {
                    match table.get(nt.index, &Lookahead::terminal(t)) {
                        Some(Cell::Production(p)) => assert_eq!(*p, i),
                        Some(Cell::Conflict(claimants)) => assert!(claimants.contains(&i)),
                        None => panic!("empty cell for {} on {}", nt.name, t),
                    }
                }
            }
        }
        assert!(table.is_ll1());
    }

    #[test]
    fn plaintext_table() {
        let (g, table) = build("S -> a S | ε", "S");
        assert_eq!(
            table.to_plaintext(&g),
            "  |        a |      $\nS | S -> a S | S -> ε"
        );
    }

    #[test]
    fn latex_marks_conflicts() {
        let (g, table) = build("S -> a | a b", "S");
        let latex = table.to_latex(&g);
        assert!(latex.contains("\\color{red}"));
        assert!(latex.starts_with("\\[\\begin{array}{c|l|l|l}"));
    }
}
