//! Thin CLI exercising the library end to end: loads a graph-types folder,
//! picks the graph type matching a YAML file, converts it, and prints the
//! resulting Mermaid source plus any validation errors to stdout/stderr.

use std::error::Error;
use std::path::PathBuf;

use graphloom::convert::ConversionEngine;
use graphloom::registry::GraphTypeRegistry;

fn print_usage(program: &str) {
    eprintln!("Usage:\n  {program} --graph-types <dir> <file.yaml>\n\n--graph-types points at a folder of v1/v2/... graph-type subfolders (spec.md §4.4).");
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    graph_types_dir: Option<String>,
    file: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--graph-types" => {
                if options.graph_types_dir.is_some() {
                    return Err(());
                }
                options.graph_types_dir = Some(args.next().ok_or(())?);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.file.is_some() {
                    return Err(());
                }
                options.file = Some(arg);
            }
        }
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "graphloom".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let (Some(graph_types_dir), Some(file)) = (options.graph_types_dir, options.file) else {
            print_usage(&program);
            std::process::exit(2);
        };

        let mut registry = GraphTypeRegistry::new();
        let load_errors = registry.reload_from_folder(&PathBuf::from(&graph_types_dir));
        for err in &load_errors {
            eprintln!("graphloom: graph-type load error: {err}");
        }

        let graph_type = registry
            .get_for_file(&file)
            .ok_or_else(|| format!("no registered graph type matches {file}"))?;

        let text = std::fs::read_to_string(&file)?;
        let engine = ConversionEngine::new();
        let result = engine.convert(&text, graph_type);

        println!("{}", result.mermaid_source);
        for error in &result.errors {
            eprintln!("graphloom: {} at {}: {}", error.severity, error.path, error.message);
        }

        if result.has_errors() {
            std::process::exit(1);
        }
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("graphloom: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_graph_types_and_positional_file() {
        let options = parse_options(
            ["--graph-types".to_owned(), "types".to_owned(), "a.flow.yaml".to_owned()].into_iter(),
        )
        .expect("parse options");
        assert_eq!(options.graph_types_dir.as_deref(), Some("types"));
        assert_eq!(options.file.as_deref(), Some("a.flow.yaml"));
    }

    #[test]
    fn rejects_duplicate_graph_types_flag() {
        parse_options(
            ["--graph-types".to_owned(), "a".to_owned(), "--graph-types".to_owned(), "b".to_owned()].into_iter(),
        )
        .unwrap_err();
    }

    #[test]
    fn rejects_multiple_positional_files() {
        parse_options(["one.yaml".to_owned(), "two.yaml".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_unknown_flag() {
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();
    }
}
