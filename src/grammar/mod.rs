pub mod analysis;
pub mod first;
pub mod follow;
pub mod grammar;
pub mod ll1_table;
pub mod parse;
pub mod pretty_print;
pub use analysis::Analysis;
pub use grammar::Grammar;

pub const EPSILON: &str = "ε";
pub const END_MARK: &str = "$";
pub const COMMENT: &str = "#";
pub const ARROW: &str = "->";
pub const ALTERNATION: &str = "|";
