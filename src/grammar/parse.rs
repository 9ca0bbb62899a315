use crate::Error;

use super::{grammar::Symbol, Grammar, ALTERNATION, ARROW, COMMENT, END_MARK, EPSILON};

impl Grammar {
    /// Reads one rule per line: `A -> x B | y | ε`.
    ///
    /// Blank lines and lines starting with `#` are skipped. Rules sharing a
    /// left-hand side accumulate their alternatives in order. A right-hand
    /// symbol is a nonterminal iff it is the left-hand side of some line,
    /// which is why symbols are only resolved once every line has been read.
    pub fn parse(grammar: &str) -> Result<Self, Error> {
        let mut g = Self::new();

        let mut raw_productions: Vec<(usize, &str)> = Vec::new();

        for (i, line) in grammar.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(COMMENT) {
                continue;
            }

            let (left, rights) = line
                .split_once(ARROW)
                .ok_or_else(|| Error::syntax(i + 1, line, "missing \"->\""))?;

            let left = left.trim();
            if left.is_empty() {
                return Err(Error::syntax(i + 1, line, "empty left side"));
            } else if left.split_whitespace().count() != 1 {
                return Err(Error::syntax(i + 1, line, "left side contains whitespace"));
            } else if left == EPSILON {
                return Err(Error::syntax(i + 1, line, "epsilon cannot be a left side"));
            }
            if left == END_MARK || rights.split_whitespace().any(|s| s == END_MARK) {
                return Err(Error::syntax(i + 1, line, "\"$\" is reserved for the end of input"));
            }

            raw_productions.push((g.add_non_terminal(left), rights));
        }

        for (left, rights) in raw_productions {
            for right in rights.split(ALTERNATION).map(str::trim) {
                let symbols = if right == EPSILON {
                    Vec::new()
                } else {
                    right
                        .split_whitespace()
                        .filter(|&s| s != EPSILON)
                        .map(|s| match g.get_non_terminal_index(s) {
                            Some(idx) => Symbol::NonTerminal(idx),
                            None => Symbol::Terminal(s.to_string()),
                        })
                        .collect()
                };
                g.add_production(left, symbols);
            }
        }

        tracing::trace!(non_terminals = g.non_terminals.len(), "grammar parsed");

        Ok(g)
    }
}
