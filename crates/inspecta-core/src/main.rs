//! `inspecta` command line: normalize, inspect and check checklist files

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use inspecta_answers::{build_initial_answers, collect_responses, validate_answers, AnswerMap};
use inspecta_core::{telemetry, ChecklistEngine, EngineConfig};
use inspecta_schema::{Node, RawNode};
use inspecta_store::{ChecklistRecord, ChecklistStore, InMemoryStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn cli() -> Command {
    let tree = || {
        Arg::new("tree")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("JSON file holding a raw checklist tree")
    };
    let answers = || {
        Arg::new("answers")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("JSON file holding an answer map")
    };

    Command::new("inspecta")
        .version(inspecta_core::VERSION)
        .about("Versioned inspection checklists")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Engine configuration (.toml, .yaml or .yml)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("normalize")
                .about("Print the normalized tree")
                .arg(tree()),
        )
        .subcommand(
            Command::new("skeleton")
                .about("Print the initial answers for a tree")
                .arg(tree()),
        )
        .subcommand(
            Command::new("validate")
                .about("Check required answers; exits 1 when any are missing")
                .arg(tree())
                .arg(answers()),
        )
        .subcommand(
            Command::new("collect")
                .about("Print the ordered response list")
                .arg(tree())
                .arg(answers()),
        )
        .subcommand(
            Command::new("resolve")
                .about("Print the public view of a stored checklist record")
                .arg(
                    Arg::new("record")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON file holding a checklist record"),
                )
                .arg(
                    Arg::new("version")
                        .long("version")
                        .value_parser(value_parser!(u32))
                        .help("Version to resolve; latest when omitted"),
                )
                .arg(
                    Arg::new("structure")
                        .long("structure")
                        .action(ArgAction::SetTrue)
                        .help("Include the structure and version history"),
                ),
        )
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn path<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a PathBuf> {
    args.get_one::<PathBuf>(name)
        .with_context(|| format!("missing argument <{name}>"))
}

fn load_tree(engine: &ChecklistEngine, args: &ArgMatches) -> Result<Vec<Node>> {
    let file = path(args, "tree")?;
    let raw: Vec<RawNode> = read_json(file)?;
    engine
        .normalize(&raw)
        .with_context(|| format!("normalizing {}", file.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    telemetry::init_tracing(matches.get_flag("json-logs"))
        .map_err(|e| anyhow::anyhow!(e))
        .context("installing tracing subscriber")?;

    let config = match matches.get_one::<PathBuf>("config") {
        Some(file) => EngineConfig::from_path(file)
            .with_context(|| format!("loading config {}", file.display()))?,
        None => EngineConfig::default(),
    };
    let store = Arc::new(InMemoryStore::new());
    let engine = ChecklistEngine::new(Arc::clone(&store), config);

    match matches.subcommand() {
        Some(("normalize", args)) => print_json(&load_tree(&engine, args)?),
        Some(("skeleton", args)) => print_json(&build_initial_answers(&load_tree(&engine, args)?)),
        Some(("validate", args)) => {
            let nodes = load_tree(&engine, args)?;
            let answers: AnswerMap = read_json(path(args, "answers")?)?;
            let report = validate_answers(&nodes, &answers);
            print_json(&report)?;
            if !report.valid {
                tracing::warn!(
                    missing = %report.summary(engine.config().missing_preview),
                    "answers incomplete"
                );
                std::process::exit(1);
            }
            Ok(())
        }
        Some(("collect", args)) => {
            let nodes = load_tree(&engine, args)?;
            let answers: AnswerMap = read_json(path(args, "answers")?)?;
            print_json(&collect_responses(&nodes, &answers))
        }
        Some(("resolve", args)) => {
            let record: ChecklistRecord = read_json(path(args, "record")?)?;
            let id = record.id;
            store.insert(record).await?;
            let view = engine
                .resolve(
                    id,
                    args.get_flag("structure"),
                    args.get_one::<u32>("version").copied(),
                )
                .await?;
            print_json(&view)
        }
        _ => Ok(()),
    }
}
