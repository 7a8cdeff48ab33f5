use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;

use cfront::dfa::{build::determinize, minimize::minimize, simulate};
use cfront::grammar::{Grammar, GrammarBuilder, Production};
use cfront::lr::engine::{self, ParseError};
use cfront::lr::lalr;
use cfront::nfa::{merge::merge, thompson::compile_pattern};
use cfront::regex::{to_postfix, PatternError};
use cfront::symbol::Symbol;
use cfront::token::TokenType;

#[derive(Debug, Parser)]
#[command(name = "cfront", about = "Lexer/parser generator demo CLI")]
struct CfrontArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a merged, minimized DFA from `name=pattern` rules and tokenize a file.
    Lex(LexArgs),
    /// Build the LALR(1) table for a hardcoded arithmetic-expression grammar
    /// and parse a hardcoded token sequence against it.
    Parse(ParseArgs),
}

#[derive(Debug, Parser)]
struct ParseArgs {
    /// Suppress progress logging to stdout.
    #[arg(long)]
    no_log: bool,
}

#[derive(Debug, Parser)]
struct LexArgs {
    /// Token rules in declaration order, highest priority first: `NAME=PATTERN`.
    #[arg(long = "pattern", required = true)]
    patterns: Vec<String>,

    /// File to tokenize.
    input: PathBuf,

    /// Suppress progress logging to stdout.
    #[arg(long)]
    no_log: bool,
}

#[derive(Debug, Error)]
enum Error {
    #[error("reading {0}: {1}")]
    InputFile(PathBuf, std::io::Error),
    #[error("rule '{0}' is not of the form NAME=PATTERN")]
    MalformedRule(String),
    #[error("pattern for '{0}': {1}")]
    Pattern(String, PatternError),
    #[error("grammar rejected the hardcoded demo grammar: {0}")]
    Grammar(#[from] cfront::grammar::GrammarError),
    #[error("parse: {0}")]
    Parse(#[from] ParseError),
}

fn main() -> ExitCode {
    env_logger::init();
    let args = CfrontArgs::parse();

    let result = match &args.command {
        Command::Lex(lex_args) => run_lex(lex_args),
        Command::Parse(parse_args) => run_parse(parse_args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_lex(args: &LexArgs) -> Result<(), Error> {
    let log = |s: &str| {
        if !args.no_log {
            println!("{s}");
        }
    };

    let mut nfas = Vec::with_capacity(args.patterns.len());
    for (id, rule) in args.patterns.iter().enumerate() {
        let (name, pattern) = rule
            .split_once('=')
            .ok_or_else(|| Error::MalformedRule(rule.clone()))?;
        let postfix = to_postfix(pattern).map_err(|e| Error::Pattern(name.to_string(), e))?;
        let nfa = compile_pattern(&postfix, TokenType::new(id as u32, name.to_string()))
            .map_err(|e| Error::Pattern(name.to_string(), e))?;
        log(&format!("compiled rule '{name}' ({pattern}) at priority {id}"));
        nfas.push(nfa);
    }

    let merged = merge(nfas);
    let alphabet: Vec<char> = merged.implied_alphabet().into_iter().collect();
    let dfa = determinize(&merged, &alphabet);
    let dfa = minimize(&dfa, &alphabet);
    log(&format!("built DFA with {} states", dfa.states().len()));

    let input =
        std::fs::read_to_string(&args.input).map_err(|e| Error::InputFile(args.input.clone(), e))?;

    for token in simulate::tokenize(&dfa, &input) {
        match token.token_type() {
            Some(t) => println!("{}\t{:?}", t.name, token.lexeme),
            None => println!("ERROR\t{:?}", token.lexeme),
        }
    }

    Ok(())
}

/// The arithmetic-expression grammar `E -> E+T|T`, `T -> T*F|F`,
/// `F -> (E)|id`, hardcoded for the demo.
fn demo_grammar() -> Result<Grammar, Error> {
    let e = Symbol::nonterminal("E");
    let t = Symbol::nonterminal("T");
    let f = Symbol::nonterminal("F");
    let plus = Symbol::terminal("+");
    let star = Symbol::terminal("*");
    let lparen = Symbol::terminal("(");
    let rparen = Symbol::terminal(")");
    let id = Symbol::terminal("id");

    GrammarBuilder::new()
        .nonterminal(e.clone())
        .nonterminal(t.clone())
        .nonterminal(f.clone())
        .terminal(plus.clone())
        .terminal(star.clone())
        .terminal(lparen.clone())
        .terminal(rparen.clone())
        .terminal(id.clone())
        .start(e.clone())
        .production(Production::new(e.clone(), vec![e.clone(), plus, t.clone()]))
        .production(Production::new(e.clone(), vec![t.clone()]))
        .production(Production::new(t.clone(), vec![t.clone(), star, f.clone()]))
        .production(Production::new(t.clone(), vec![f.clone()]))
        .production(Production::new(f.clone(), vec![lparen, e, rparen]))
        .production(Production::new(f, vec![id]))
        .build()
        .map_err(Error::from)
}

fn run_parse(args: &ParseArgs) -> Result<(), Error> {
    let log = |s: &str| {
        if !args.no_log {
            println!("{s}");
        }
    };

    let grammar = demo_grammar()?;
    let table = lalr::build(&grammar);
    log(&format!(
        "built LALR(1) table with {} states ({} conflicts)",
        table.action.len(),
        table.conflicts.len()
    ));

    // "id + id * id", named to match the grammar's own terminal names so
    // `parse_token_types` can map each one onto its terminal by name.
    let tokens = [
        TokenType::new(0, "id"),
        TokenType::new(1, "+"),
        TokenType::new(0, "id"),
        TokenType::new(2, "*"),
        TokenType::new(0, "id"),
    ];

    let reductions = engine::parse_token_types(&table, &tokens, &grammar)?;
    println!("accepted; {} reductions applied", reductions.len());

    Ok(())
}
