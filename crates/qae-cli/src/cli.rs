//! Command definitions and dispatch

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use qae_core::{AuthoringEngine, EngineConfig};
use qae_step::{estimate_duration_ms, ParsedResult, Step, TestCase};
use serde::{de::DeserializeOwned, Serialize};
use std::io::Read;
use std::path::Path;

pub(crate) fn build_cli() -> Command {
    Command::new("qae")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Natural-language test authoring and corpus analysis")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Engine configuration file (TOML)"),
        )
        .subcommand(
            Command::new("parse")
                .about("Interpret a description into scored steps")
                .arg(
                    Arg::new("description")
                        .required(true)
                        .help("Free-text description of the test"),
                )
                .arg(
                    Arg::new("base-url")
                        .long("base-url")
                        .help("Base URL for relative navigation"),
                ),
        )
        .subcommand(
            Command::new("refine")
                .about("Apply feedback to steps or rendered code")
                .arg(
                    Arg::new("steps")
                        .long("steps")
                        .help("JSON file with a step array ('-' for stdin)"),
                )
                .arg(
                    Arg::new("code")
                        .long("code")
                        .conflicts_with("steps")
                        .help("Rendered code file ('-' for stdin)"),
                )
                .arg(
                    Arg::new("feedback")
                        .long("feedback")
                        .short('f')
                        .action(ArgAction::Append)
                        .required(true)
                        .help("One line of feedback; repeat for more"),
                ),
        )
        .subcommand(
            Command::new("variations")
                .about("Suggest variations of a description")
                .arg(Arg::new("description").required(true))
                .arg(
                    Arg::new("max")
                        .long("max")
                        .value_parser(value_parser!(usize))
                        .help("Maximum number of suggestions"),
                ),
        )
        .subcommand(
            Command::new("coverage")
                .about("Find coverage gaps in a test corpus")
                .arg(corpus_arg())
                .arg(
                    Arg::new("page")
                        .long("page")
                        .action(ArgAction::Append)
                        .help("Known page; repeat for more (auto-detected if absent)"),
                )
                .arg(
                    Arg::new("flow")
                        .long("flow")
                        .action(ArgAction::Append)
                        .help("Known flow; repeat for more (auto-detected if absent)"),
                ),
        )
        .subcommand(
            Command::new("fragility")
                .about("Flag brittle locators in a test corpus")
                .arg(corpus_arg())
                .arg(
                    Arg::new("include-passing")
                        .long("include-passing")
                        .action(ArgAction::SetTrue)
                        .help("Also scan tests whose last run passed"),
                )
                .arg(
                    Arg::new("min-confidence")
                        .long("min-confidence")
                        .value_parser(value_parser!(u8).range(0..=100))
                        .help("Drop suggestions below this confidence"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize))
                        .help("Maximum number of suggestions"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Seed for confidence jitter"),
                ),
        )
        .subcommand(
            Command::new("render")
                .about("Render steps as a Playwright test")
                .arg(
                    Arg::new("steps")
                        .long("steps")
                        .required(true)
                        .help("JSON file with a step array ('-' for stdin)"),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .default_value("Generated test")
                        .help("Test title"),
                ),
        )
}

fn corpus_arg() -> Arg {
    Arg::new("tests")
        .long("tests")
        .required(true)
        .help("JSON file with a test array ('-' for stdin)")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseOutput {
    name: String,
    #[serde(flatten)]
    result: ParsedResult,
    estimated_duration_ms: u64,
}

pub(crate) fn run(matches: &ArgMatches) -> Result<()> {
    let config = match matches.get_one::<std::path::PathBuf>("config") {
        Some(path) => {
            let config = EngineConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?;
            tracing::info!(path = %path.display(), "Using engine config");
            config
        }
        None => EngineConfig::default(),
    };

    if let Some((command, _)) = matches.subcommand() {
        tracing::debug!(command, "Running command");
    }

    match matches.subcommand() {
        Some(("parse", args)) => {
            let engine = AuthoringEngine::try_new(config)?;
            let description = string_arg(args, "description")?;
            let base_url = args.get_one::<String>("base-url").map(String::as_str);
            let result = engine.parse(description, base_url);
            print_json(&ParseOutput {
                name: engine.suggest_name(description),
                estimated_duration_ms: estimate_duration_ms(&result.steps),
                result,
            })
        }
        Some(("refine", args)) => {
            let engine = AuthoringEngine::try_new(config)?;
            let feedback: Vec<&str> = args
                .get_many::<String>("feedback")
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect();
            if let Some(path) = args.get_one::<String>("code") {
                let code = read_input(path)?;
                print_json(&engine.refine_code(&code, &feedback))
            } else if let Some(path) = args.get_one::<String>("steps") {
                let steps: Vec<Step> = read_json(path)?;
                print_json(&engine.refine(&steps, &feedback))
            } else {
                bail!("refine needs --steps or --code");
            }
        }
        Some(("variations", args)) => {
            let mut config = config;
            if let Some(max) = args.get_one::<usize>("max") {
                config.variations.max_variations = *max;
            }
            let engine = AuthoringEngine::try_new(config)?;
            print_json(&engine.suggest_variations(string_arg(args, "description")?))
        }
        Some(("coverage", args)) => {
            let engine = AuthoringEngine::try_new(config)?;
            let tests: Vec<TestCase> = read_json(string_arg(args, "tests")?)?;
            let pages = strings(args, "page");
            let flows = strings(args, "flow");
            print_json(&engine.analyze_coverage(&tests, &pages, &flows))
        }
        Some(("fragility", args)) => {
            let mut config = config;
            if args.get_flag("include-passing") {
                config.fragility.include_passing = true;
            }
            if let Some(min) = args.get_one::<u8>("min-confidence") {
                config.fragility.min_confidence = *min;
            }
            if let Some(limit) = args.get_one::<usize>("limit") {
                config.fragility.limit = *limit;
            }
            if let Some(seed) = args.get_one::<u64>("seed") {
                config.fragility.seed = *seed;
            }
            let engine = AuthoringEngine::try_new(config)?;
            let tests: Vec<TestCase> = read_json(string_arg(args, "tests")?)?;
            print_json(&engine.detect_fragility(&tests))
        }
        Some(("render", args)) => {
            let engine = AuthoringEngine::try_new(config)?;
            let steps: Vec<Step> = read_json(string_arg(args, "steps")?)?;
            println!("{}", engine.render(string_arg(args, "name")?, &steps));
            Ok(())
        }
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("no command given"),
    }
}

fn string_arg<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a str> {
    args.get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("missing --{id}"))
}

fn strings(args: &ArgMatches, id: &str) -> Vec<String> {
    args.get_many::<String>(id)
        .into_iter()
        .flatten()
        .cloned()
        .collect()
}

fn read_input(path: &str) -> Result<String> {
    tracing::debug!(path, "Reading input");
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(Path::new(path)).with_context(|| format!("reading {path}"))
}

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let text = read_input(path)?;
    serde_json::from_str(&text).with_context(|| format!("parsing JSON from {path}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn command_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn parses_refine_with_repeated_feedback() {
        let matches = build_cli()
            .try_get_matches_from([
                "qae", "refine", "--steps", "steps.json", "-f", "Add a screenshot", "-f", "Remove the wait",
            ])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "refine");
        assert_eq!(strings(args, "feedback").len(), 2);
    }

    #[test]
    fn refine_rejects_steps_and_code_together() {
        let result = build_cli().try_get_matches_from([
            "qae", "refine", "--steps", "a.json", "--code", "b.ts", "-f", "x",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn min_confidence_is_range_checked() {
        let result = build_cli().try_get_matches_from([
            "qae", "fragility", "--tests", "t.json", "--min-confidence", "150",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let matches = build_cli()
            .try_get_matches_from(["qae", "parse", "Navigate to /", "--config", "qae.toml"])
            .unwrap();
        assert!(matches.get_one::<std::path::PathBuf>("config").is_some());
    }

    #[test]
    fn render_reads_steps_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id":"step-1","action":"navigate","value":"/","order":0}}]"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let matches = build_cli()
            .try_get_matches_from(["qae", "render", "--steps", path.as_str()])
            .unwrap();
        assert!(run(&matches).is_ok());
    }

    #[test]
    fn config_file_is_loaded_before_dispatch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_load_wait_ms = 500").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let matches = build_cli()
            .try_get_matches_from(["qae", "--config", path.as_str(), "parse", "Navigate to /"])
            .unwrap();
        assert!(run(&matches).is_ok());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_load_wait_ms = 0").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let matches = build_cli()
            .try_get_matches_from(["qae", "--config", path.as_str(), "parse", "x"])
            .unwrap();
        assert!(run(&matches).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let matches = build_cli()
            .try_get_matches_from(["qae", "--config", "/no/such/qae.toml", "parse", "x"])
            .unwrap();
        let err = run(&matches).unwrap_err();
        assert!(format!("{err:#}").contains("loading config"));
    }
}
