use std::collections::HashMap;

/// A grammar symbol. The kind is decided once, when the whole grammar text
/// has been read and every left-hand side is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// Index into [`Grammar::non_terminals`].
    NonTerminal(usize),
    Terminal(String),
}

impl Symbol {
    pub fn terminal(&self) -> Option<&str> {
        match self {
            Symbol::NonTerminal(_) => None,
            Symbol::Terminal(name) => Some(name.as_str()),
        }
    }
}

/// An empty production is the epsilon production.
pub type Production = Vec<Symbol>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonTerminal {
    pub index: usize,
    pub name: String,
    pub productions: Vec<Production>,
}

impl NonTerminal {
    pub fn new(index: usize, name: String) -> Self {
        Self {
            index,
            name,
            productions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    /// In the order the left-hand sides first appeared.
    pub non_terminals: Vec<NonTerminal>,
    pub symbol_table: HashMap<String, usize>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.non_terminals.is_empty()
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &NonTerminal> {
        self.non_terminals.iter()
    }

    pub fn get_non_terminal_index(&self, name: &str) -> Option<usize> {
        self.symbol_table.get(name).cloned()
    }

    pub fn get_non_terminal(&self, name: &str) -> Option<&NonTerminal> {
        self.get_non_terminal_index(name)
            .map(|idx| &self.non_terminals[idx])
    }

    pub fn add_non_terminal(&mut self, name: &str) -> usize {
        if let Some(idx) = self.get_non_terminal_index(name) {
            return idx;
        }
        let idx = self.non_terminals.len();
        self.non_terminals
            .push(NonTerminal::new(idx, name.to_string()));
        self.symbol_table.insert(name.to_string(), idx);
        idx
    }

    pub fn add_production(&mut self, left: usize, right: Production) {
        self.non_terminals[left].productions.push(right);
    }

    pub fn get_symbol_name<'a>(&'a self, symbol: &'a Symbol) -> &'a str {
        match symbol {
            Symbol::NonTerminal(idx) => self.non_terminals[*idx].name.as_str(),
            Symbol::Terminal(name) => name.as_str(),
        }
    }

    pub fn production_to_vec_str<'a>(&'a self, production: &'a Production) -> Vec<&'a str> {
        production
            .iter()
            .map(|symbol| self.get_symbol_name(symbol))
            .collect()
    }

    /// Every terminal used by some production, sorted and deduplicated.
    pub fn terminals(&self) -> Vec<&str> {
        let mut terminals: Vec<&str> = self
            .non_terminals
            .iter()
            .flat_map(|nt| nt.productions.iter())
            .flat_map(|production| production.iter())
            .filter_map(|symbol| symbol.terminal())
            .collect();
        terminals.sort();
        terminals.dedup();
        terminals
    }
}
