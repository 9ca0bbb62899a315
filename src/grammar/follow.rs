use std::collections::BTreeSet;

use super::{first::FirstSets, grammar::Symbol, Grammar};

/// Terminals that can immediately follow a nonterminal, and whether the end
/// of input can.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowSet {
    pub terminals: BTreeSet<String>,
    pub end_mark: bool,
}

impl FollowSet {
    fn single(terminal: &str) -> Self {
        Self {
            terminals: BTreeSet::from([terminal.to_string()]),
            end_mark: false,
        }
    }

    pub fn contains(&self, terminal: &str) -> bool {
        self.terminals.contains(terminal)
    }

    /// Number of elements, counting the end marker.
    pub fn len(&self) -> usize {
        self.terminals.len() + self.end_mark as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn union_with(&mut self, other: &FollowSet) {
        self.terminals.extend(other.terminals.iter().cloned());
        self.end_mark |= other.end_mark;
    }
}

/// FOLLOW sets indexed like [`Grammar::non_terminals`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets(Vec<FollowSet>);

impl FollowSets {
    /// `start` must be an index into `grammar.non_terminals`.
    pub fn compute(grammar: &Grammar, first: &FirstSets, start: usize) -> Self {
        let mut sets = FollowSets(vec![FollowSet::default(); grammar.non_terminals.len()]);
        sets.0[start].end_mark = true;

        let mut passes = 0;
        loop {
            passes += 1;
            let before = sets.total_len();

            for left in grammar.non_terminal_iter() {
                for production in &left.productions {
                    let mut trailer = sets.0[left.index].clone();
                    for symbol in production.iter().rev() {
                        match symbol {
                            Symbol::Terminal(name) => {
                                trailer = FollowSet::single(name);
                            }
                            Symbol::NonTerminal(idx) => {
                                sets.0[*idx].union_with(&trailer);

                                let nt_first = first.get(*idx);
                                if !nt_first.nullable {
                                    trailer = FollowSet::default();
                                }
                                trailer.terminals.extend(nt_first.terminals.iter().cloned());
                            }
                        }
                    }
                }
            }

            let after = sets.total_len();
            tracing::trace!(passes, before, after, "FOLLOW pass");
            if after == before {
                break;
            }
        }
        tracing::debug!(passes, "FOLLOW sets reached a fixed point");

        sets
    }

    pub fn get(&self, non_terminal: usize) -> &FollowSet {
        &self.0[non_terminal]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FollowSet> {
        self.0.iter()
    }

    fn total_len(&self) -> usize {
        self.0.iter().map(FollowSet::len).sum()
    }
}

impl Grammar {
    pub fn calculate_follow(&self, first: &FirstSets, start: usize) -> FollowSets {
        FollowSets::compute(self, first, start)
    }
}
