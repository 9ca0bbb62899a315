use std::{
    io::Read,
    path::PathBuf,
    str::FromStr,
};

use color_eyre::eyre::{eyre, Error};
use structopt::StructOpt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Productions,
    FirstFollow,
    LL1,
    All,
}

impl FromStr for Output {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prod" => Ok(Output::Productions),
            "nff" | "first-follow" => Ok(Output::FirstFollow),
            "ll1" => Ok(Output::LL1),
            "all" => Ok(Output::All),
            _ => Err(eyre!("unknown output: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Plain,
    LaTeX,
    JSON,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(OutputFormat::Plain),
            "latex" => Ok(OutputFormat::LaTeX),
            "json" => Ok(OutputFormat::JSON),
            _ => Err(eyre!("unknown format: {}", s)),
        }
    }
}

/// FIRST/FOLLOW sets and LL(1) parsing tables.
///
/// Grammar notation: one rule per line, `A -> x B | y | ε`; lines starting
/// with `#` are comments.
#[derive(Debug, StructOpt)]
#[structopt(name = "ll1-helper")]
struct Args {
    /// What to print: prod, first-follow (nff), ll1 or all.
    #[structopt(short, long = "output", default_value = "all")]
    outputs: Vec<Output>,

    /// Start symbol. Defaults to the first left-hand side.
    #[structopt(short, long)]
    start: Option<String>,

    /// plain, latex or json.
    #[structopt(short, long, default_value = "plain")]
    format: OutputFormat,

    /// Grammar file. Reads stdin when omitted.
    grammar: Option<PathBuf>,
}

impl Args {
    fn run(self) -> Result<(), Error> {
        let input = match &self.grammar {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut input = String::new();
                std::io::stdin().read_to_string(&mut input)?;
                input
            }
        };

        let analysis = ll1_helper::analyze(&input, self.start.as_deref())?;
        tracing::debug!(start = analysis.start(), is_ll1 = analysis.is_ll1(), "analysis done");

        let outputs = if self.outputs.contains(&Output::All) {
            vec![Output::Productions, Output::FirstFollow, Output::LL1]
        } else {
            self.outputs
        };

        for output in outputs {
            let text = match output {
                Output::Productions => {
                    let t = analysis.grammar().to_production_output_vec();
                    match self.format {
                        OutputFormat::Plain => t.to_plaintext(),
                        OutputFormat::LaTeX => t.to_latex(),
                        OutputFormat::JSON => serde_json::to_string(&t)?,
                    }
                }
                Output::FirstFollow => {
                    let t = analysis.to_non_terminal_output_vec();
                    match self.format {
                        OutputFormat::Plain => t.to_plaintext(),
                        OutputFormat::LaTeX => t.to_latex(),
                        OutputFormat::JSON => t.to_json()?,
                    }
                }
                Output::LL1 => {
                    let t = analysis.table();
                    match self.format {
                        OutputFormat::Plain => {
                            let verdict = if t.is_ll1() {
                                "grammar is LL(1)"
                            } else {
                                "grammar is not LL(1)"
                            };
                            format!("{}\n{}", t.to_plaintext(analysis.grammar()), verdict)
                        }
                        OutputFormat::LaTeX => t.to_latex(analysis.grammar()),
                        OutputFormat::JSON => analysis.to_json()?,
                    }
                }
                Output::All => continue,
            };
            println!("{}", text);
        }

        Ok(())
    }
}

fn main() -> Result<(), Error> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    Args::from_args().run()
}
