//! FIRST sets of nonterminals and of arbitrary symbol sequences.

use std::collections::BTreeSet;

use super::{grammar::Symbol, Grammar};

/// Terminals that can begin a derivation, and whether the empty string can
/// be derived (the epsilon marker).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstSet {
    pub terminals: BTreeSet<String>,
    pub nullable: bool,
}

impl FirstSet {
    pub fn epsilon() -> Self {
        Self {
            terminals: BTreeSet::new(),
            nullable: true,
        }
    }

    /// Number of elements, counting the epsilon marker.
    pub fn len(&self) -> usize {
        self.terminals.len() + self.nullable as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn union_with(&mut self, other: &FirstSet) {
        self.terminals.extend(other.terminals.iter().cloned());
        self.nullable |= other.nullable;
    }
}

/// FIRST sets indexed like [`Grammar::non_terminals`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets(Vec<FirstSet>);

impl FirstSets {
    pub fn compute(grammar: &Grammar) -> Self {
        let mut sets = FirstSets(vec![FirstSet::default(); grammar.non_terminals.len()]);

        let mut passes = 0;
        loop {
            passes += 1;
            let before = sets.total_len();

            for nt in grammar.non_terminal_iter() {
                let mut first = sets.0[nt.index].clone();
                for production in &nt.productions {
                    first.union_with(&sets.first_of_sequence(production));
                }
                sets.0[nt.index] = first;
            }

            let after = sets.total_len();
            tracing::trace!(passes, before, after, "FIRST pass");
            if after == before {
                break;
            }
        }
        tracing::debug!(passes, "FIRST sets reached a fixed point");

        sets
    }

    pub fn get(&self, non_terminal: usize) -> &FirstSet {
        &self.0[non_terminal]
    }

    /// FIRST of a standalone sequence, scanning left to right: a terminal
    /// stops the scan, a nonterminal stops it unless it can vanish. The
    /// sequence is nullable iff the scan runs off the end.
    pub fn first_of_sequence(&self, sequence: &[Symbol]) -> FirstSet {
        let mut first = FirstSet::default();
        for symbol in sequence {
            match symbol {
                Symbol::Terminal(name) => {
                    first.terminals.insert(name.clone());
                    return first;
                }
                Symbol::NonTerminal(idx) => {
                    let nt = &self.0[*idx];
                    first.terminals.extend(nt.terminals.iter().cloned());
                    if !nt.nullable {
                        return first;
                    }
                }
            }
        }
        first.nullable = true;
        first
    }

    fn total_len(&self) -> usize {
        self.0.iter().map(FirstSet::len).sum()
    }
}

impl Grammar {
    pub fn calculate_first(&self) -> FirstSets {
        FirstSets::compute(self)
    }
}
