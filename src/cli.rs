//! The statelint command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::{path::Path, process};

use clap::Parser;

use crate::{
    discovery::read_document,
    engine::{print_error, BatchPipeline},
    syntax::parser::{StateGrammar, GRAMMAR_SOURCE},
    validation::check_grammar,
    Node, StateError,
};

pub mod args;
pub mod output;

use args::{ArgsCommand, StateArgs};
use output::{print_grammar_check, print_summary, StdoutReport};

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = StateArgs::parse();

    match &args.command {
        ArgsCommand::Check { .. } => {
            let Some(config) = args.command.batch_config() else {
                return;
            };
            let pipeline = BatchPipeline::new(config).unwrap_or_else(|e| exit_with(e));
            let mut report = StdoutReport::new();
            let summary = pipeline.run(&mut report).unwrap_or_else(|e| exit_with(e));
            print_summary(&summary);
            if summary.failures > 0 {
                process::exit(1);
            }
        }

        ArgsCommand::Tree { file, json } => {
            if let Err(e) = print_tree(file, *json) {
                exit_with(e);
            }
        }

        ArgsCommand::Grammar => {
            let check = check_grammar(GRAMMAR_SOURCE).unwrap_or_else(|e| exit_with(e));
            print_grammar_check(&check);
            if !check.is_valid() {
                process::exit(1);
            }
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn print_tree(file: &Path, json: bool) -> Result<(), StateError> {
    let grammar = StateGrammar::new()?;
    let source = read_document(file)?;
    let tree = grammar.parse(&source)?;

    print!("{}", render_tree(&tree, json)?);
    Ok(())
}

fn render_tree(tree: &Node, json: bool) -> Result<String, StateError> {
    if !json {
        return Ok(tree.dump());
    }
    let mut text = serde_json::to_string_pretty(tree).map_err(StateError::serialize)?;
    text.push('\n');
    Ok(text)
}

fn exit_with(error: StateError) -> ! {
    print_error(error);
    process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::to_error_source;

    #[test]
    fn json_tree_is_a_complete_document() {
        let tree = crate::syntax::parser::parse(&to_error_source("doc.txt", "id = 1")).unwrap();
        let text = render_tree(&tree, true).unwrap();
        assert!(text.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["children"][0]["kind"], "declr");
    }
}
