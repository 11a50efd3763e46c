use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use cms_cli::{run_commands, Fixtures};
use cms_core::{CmsConfig, CommandError};
use cms_schema::{try_compile, SchemaHash};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("cms-admin")
        .version(cms_cli::VERSION)
        .about("Run CMS admin commands against in-memory stores")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(["text", "json"])
                .help("Log output format (filtered by RUST_LOG)"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a command and print its descriptor")
                .arg(Arg::new("command").required(true).help("Command text")),
        )
        .subcommand(
            Command::new("compile")
                .about("Compile a props schema and print the result")
                .arg(Arg::new("schema").required(true).help("Schema Definition as JSON")),
        )
        .subcommand(
            Command::new("run")
                .about("Execute commands in order against seeded in-memory stores")
                .arg(
                    Arg::new("fixtures")
                        .long("fixtures")
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON file with components and contacts to seed"),
                )
                .arg(Arg::new("actor").long("actor").help("Acting administrator id"))
                .arg(
                    Arg::new("audit")
                        .long("audit")
                        .action(ArgAction::SetTrue)
                        .help("Also print the audit trail"),
                )
                .arg(
                    Arg::new("commands")
                        .required(true)
                        .num_args(1..)
                        .help("Command texts"),
                ),
        )
}

fn init_tracing(format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = if format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn load_config(matches: &ArgMatches) -> Result<CmsConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => CmsConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(CmsConfig::default()),
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_command(args: &ArgMatches) -> Result<bool> {
    let text = args.get_one::<String>("command").context("missing command")?;
    match cms_command::parse(text) {
        Ok(descriptor) => {
            print_json(&serde_json::to_value(&descriptor)?)?;
            Ok(true)
        }
        Err(err) => {
            print_json(&CommandError::from(err).to_json())?;
            Ok(false)
        }
    }
}

fn compile_schema(args: &ArgMatches) -> Result<bool> {
    let text = args.get_one::<String>("schema").context("missing schema")?;
    let definition: Value = serde_json::from_str(text).context("schema is not valid JSON")?;

    match try_compile(&definition) {
        Ok(compiled) => {
            print_json(&json!({
                "hash": SchemaHash::of(&definition).to_string(),
                "kind": compiled.kind(),
                "validator": compiled.validator(),
                "unknownTags": compiled.unknown_tags(),
            }))?;
            Ok(true)
        }
        Err(err) => {
            print_json(&json!({ "error": err.to_string() }))?;
            Ok(false)
        }
    }
}

async fn run(args: &ArgMatches, config: CmsConfig) -> Result<bool> {
    let fixtures = match args.get_one::<PathBuf>("fixtures") {
        Some(path) => Fixtures::load(path)
            .with_context(|| format!("loading fixtures from {}", path.display()))?,
        None => Fixtures::default(),
    };
    let session = fixtures.into_executor(config)?;

    let actor = args.get_one::<String>("actor").map(String::as_str);
    let commands = args
        .get_many::<String>("commands")
        .context("missing commands")?;

    let outcomes = run_commands(&session.executor, commands, actor).await;
    let all_ok = outcomes.iter().all(|o| o.ok);

    let mut report = json!({ "outcomes": outcomes });
    if args.get_flag("audit") {
        report["audit"] = serde_json::to_value(session.audit.entries())?;
    }
    print_json(&report)?;
    Ok(all_ok)
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let log_format = matches
        .get_one::<String>("log-format")
        .map_or("text", String::as_str);
    init_tracing(log_format);

    let config = load_config(&matches)?;

    let ok = match matches.subcommand() {
        Some(("parse", args)) => parse_command(args)?,
        Some(("compile", args)) => compile_schema(args)?,
        Some(("run", args)) => run(args, config).await?,
        _ => unreachable!("subcommand required"),
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn run_collects_many_commands() {
        let matches = cli()
            .try_get_matches_from([
                "cms-admin",
                "--log-format",
                "json",
                "run",
                "--actor",
                "admin",
                "create page /a",
                "publish page /a",
            ])
            .unwrap();

        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "run");
        assert_eq!(args.get_many::<String>("commands").unwrap().count(), 2);
        assert_eq!(args.get_one::<String>("actor").map(String::as_str), Some("admin"));
    }
}
