//! Entry point for the mibtop TUI. Parses args, fetches the dataset once, derives views, runs the App.

mod app;
mod ui;

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use mibtop::rules::load_rules;
use mibtop::{derive, Classifier, PipelineOptions, Source};
use tracing_subscriber::EnvFilter;

use app::App;

struct ParsedArgs {
    source: String,
    rules: Option<PathBuf>,
    json: bool,
}

enum Cli {
    Run(ParsedArgs),
    Help(String),
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [--rules RULES_JSON|-r RULES_JSON] [--json] <FILE.json|FILE.json.gz|FILE.log|ws://HOST:PORT/ws>"
    )
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Cli, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "mibtop".into());
    let mut source: Option<String> = None;
    let mut rules: Option<PathBuf> = None;
    let mut json = false; // --json

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Cli::Help(usage(&prog))),
            "--rules" | "-r" => {
                rules = it.next().map(PathBuf::from);
                if rules.is_none() {
                    return Err(format!("--rules needs a path. {}", usage(&prog)));
                }
            }
            "--json" => json = true,
            _ if arg.starts_with("--rules=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        rules = Some(PathBuf::from(v));
                    }
                }
            }
            _ => {
                if source.is_none() {
                    source = Some(arg);
                } else {
                    return Err(format!("Unexpected argument `{arg}`. {}", usage(&prog)));
                }
            }
        }
    }
    let source = source.ok_or_else(|| usage(&prog))?;
    Ok(Cli::Run(ParsedArgs {
        source,
        rules,
        json,
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()).map_err(anyhow::Error::msg)? {
        Cli::Run(p) => p,
        Cli::Help(text) => {
            println!("{text}");
            return Ok(());
        }
    };

    // stderr logging would draw over the alternate screen, so it is opt-in
    if env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let table = load_rules(parsed.rules.as_deref()).context("loading classifier rules")?;
    let classifier = Classifier::new(&table).context("compiling classifier rules")?;
    let opts = PipelineOptions::from_env();

    let data = Source::parse(&parsed.source)
        .fetch()
        .await
        .with_context(|| format!("fetching dataset from {}", parsed.source))?;
    let views = derive(&data, &classifier, &opts);

    if parsed.json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    let mut app = App::new(data, views, opts);
    app.run()
}
