extern crate wasm_bindgen;

use serde::Serialize;
use wasm_bindgen::prelude::*;

mod error;
pub mod grammar;
pub use error::Error;
pub use grammar::{Analysis, Grammar};

/// Parses `source` and analyses it from `start`.
///
/// Without a start symbol (or with a blank one) the first left-hand side of
/// the grammar is used.
pub fn analyze(source: &str, start: Option<&str>) -> Result<Analysis, Error> {
    let g = Grammar::parse(source)?;

    let start = match start.map(str::trim).filter(|s| !s.is_empty()) {
        Some(start) => start.to_string(),
        None => g
            .non_terminal_iter()
            .next()
            .map(|nt| nt.name.clone())
            .ok_or(Error::EmptyGrammar)?,
    };

    Analysis::new(g, &start)
}

#[derive(Serialize)]
#[serde(untagged)]
enum Response<'a> {
    Ok {
        ok: bool,
        start: &'a str,
        result: grammar::analysis::AnalysisOutput<'a>,
    },
    Err {
        ok: bool,
        error: String,
    },
}

#[wasm_bindgen]
pub fn analyze_to_json(grammar: &str, start: &str) -> String {
    let analysis = analyze(grammar, Some(start));
    let response = match &analysis {
        Ok(a) => Response::Ok {
            ok: true,
            start: a.start(),
            result: a.to_output(),
        },
        Err(e) => Response::Err {
            ok: false,
            error: e.to_string(),
        },
    };
    serde_json::to_string(&response)
        .unwrap_or_else(|e| format!("{{\"ok\":false,\"error\":\"{}\"}}", e))
}


#[cfg(test)]
mod analyze_tests {
    use crate::grammar::ll1_table::{Cell, Lookahead};
    use crate::{analyze, analyze_to_json, Error};
    use std::collections::BTreeSet;

    const ARITHMETIC: &str = "E -> T E'
E' -> + T E' | ε
T -> F T'
T' -> * F T' | ε
F -> ( E ) | id";

    const LISTS: &str = "list -> [ elements ]
elements -> element elements_tail | ε
elements_tail -> , element elements_tail | ε
element -> num | id | list";

    #[test]
    fn canonical_ll1_grammar() {
        let a = analyze("E -> T E2\nE2 -> + T E2 | ε\nT -> id", Some("E")).unwrap();
        let g = a.grammar();
        let e = g.get_non_terminal_index("E").unwrap();
        let e2 = g.get_non_terminal_index("E2").unwrap();

        assert_eq!(a.first_names(e), vec!["id"]);
        assert_eq!(a.first_names(e2), vec!["+", "ε"]);
        assert_eq!(a.follow_names(e), vec!["$"]);
        assert_eq!(a.follow_names(e2), vec!["$"]);

        let right = |nt: usize, lookahead: Lookahead| match a.table().get(nt, &lookahead) {
            Some(Cell::Production(p)) => {
                g.production_to_vec_str(&g.non_terminals[nt].productions[*p])
            }
            other => panic!("unexpected cell {:?}", other),
        };
        assert_eq!(right(e, Lookahead::terminal("id")), vec!["T", "E2"]);
        assert_eq!(right(e2, Lookahead::terminal("+")), vec!["+", "T", "E2"]);
        assert_eq!(right(e2, Lookahead::EndMark), Vec::<&str>::new());
        assert!(a.is_ll1());
    }

    #[test]
    fn classic_ambiguous_grammar() {
        let a = analyze("S -> A | B\nA -> a\nB -> a", Some("S")).unwrap();
        assert_eq!(
            a.table().get(0, &Lookahead::terminal("a")),
            Some(&Cell::Conflict(BTreeSet::from([0, 1])))
        );
        assert!(!a.is_ll1());
    }

    #[test]
    fn missing_separator_fails_without_result() {
        match analyze("S A", None) {
            Err(Error::Syntax { line, text, .. }) => {
                assert_eq!(line, 1);
                assert_eq!(text, "S A");
            }
            other => panic!("expected a syntax error, got {:?}", other.map(|a| a.is_ll1())),
        }
    }

    #[test]
    fn start_defaults_to_first_left_side() {
        let a = analyze(LISTS, None).unwrap();
        assert_eq!(a.start(), "list");
        let a = analyze(LISTS, Some("  ")).unwrap();
        assert_eq!(a.start(), "list");
        assert!(a.is_ll1());
    }

    #[test]
    fn explicit_start_changes_follow() {
        let a = analyze(LISTS, Some("element")).unwrap();
        let element = a.grammar().get_non_terminal_index("element").unwrap();
        assert_eq!(a.follow_names(element), vec!["$", ",", "]"]);
    }

    #[test]
    fn empty_grammar_has_no_start() {
        assert_eq!(analyze("# nothing\n", None).unwrap_err(), Error::EmptyGrammar);
    }

    #[test]
    fn arithmetic_grammar_is_ll1() {
        let a = analyze(ARITHMETIC, None).unwrap();
        assert!(a.is_ll1());
        let f = a.grammar().get_non_terminal_index("F").unwrap();
        assert_eq!(a.follow_names(f), vec!["$", ")", "*", "+"]);
    }

    #[test]
    fn left_recursive_grammar_is_not_ll1() {
        let a = analyze("E -> E + T | T\nT -> id", None).unwrap();
        assert!(!a.is_ll1());
        assert_eq!(a.table().conflicts().count(), 1);
    }

    #[test]
    fn deterministic_output() {
        let first = analyze(ARITHMETIC, Some("E")).unwrap().to_json().unwrap();
        let second = analyze(ARITHMETIC, Some("E")).unwrap().to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn json_envelope() {
        assert_eq!(
            analyze_to_json("S -> a", ""),
            r#"{"ok":true,"start":"S","result":{"first":{"S":["a"]},"follow":{"S":["$"]},"table":{"S":{"a":["a"]}},"is_ll1":true}}"#
        );
        assert_eq!(
            analyze_to_json("S -> a", "X"),
            r#"{"ok":false,"error":"start symbol \"X\" is not a nonterminal of the grammar"}"#
        );
    }
}
