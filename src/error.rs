#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Line {line}: {reason}: {text}")]
    Syntax {
        line: usize,
        text: String,
        reason: &'static str,
    },

    #[error("start symbol {0:?} is not a nonterminal of the grammar")]
    UnknownStartSymbol(String),

    #[error("grammar has no productions")]
    EmptyGrammar,
}

impl Error {
    pub(crate) fn syntax(line: usize, text: &str, reason: &'static str) -> Self {
        Self::Syntax {
            line,
            text: text.to_string(),
            reason,
        }
    }
}
