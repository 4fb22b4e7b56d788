//! Minimal CLI: classify documents, or run the classifier checks.
use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};

use crate::harness::Harness;
use crate::lift::lift;
use crate::logging::LogSettings;
use crate::report::Report;
use crate::suite::{self, cases::CaseFile};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// classify JSON values by run-time type (shallow and refined), or run the classifier checks
#[derive(Parser, Debug)]
#[command(name = "realtype", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// more log output on stderr (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// when to color check markers and log output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    color: ColorChoice,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print a type report per input document
    Classify(ClassifyOut),
    /// run the built-in checks and any case files, printing [OK]/[FAIL] lines
    Check(CheckOut),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; every output is classified on its own
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ClassifyOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// also classify the elements of array documents
    #[arg(long)]
    items: bool,

    /// pretty-print each report
    #[arg(long)]
    pretty: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    /// JSON case files; literal paths or quoted glob patterns
    #[arg(long, num_args = 1..)]
    cases: Vec<String>,

    /// skip the built-in checks
    #[arg(long)]
    no_builtin: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

/// One input document, with where it came from.
#[derive(Debug, Clone)]
pub struct Document {
    pub source: String,
    pub json: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Stdin,
    Path(PathBuf),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl ColorChoice {
    /// `None` leaves the decision to the terminal.
    fn forced(self) -> Option<bool> {
        match self {
            ColorChoice::Auto => None,
            ColorChoice::Always => Some(true),
            ColorChoice::Never => Some(false),
        }
    }
}

impl InputSettings {
    fn load_process(&self, mut apply: impl FnMut(Document)) -> Result<()> {
        let sources = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        for source in sources {
            let (name, text) = read_source(&source)?;
            for (label, json) in self.parse_documents(&name, &text)? {
                let json = match self.json_pointer.as_deref() {
                    None => json,
                    Some(pointer) => match json.pointer(pointer) {
                        Some(node) => node.clone(),
                        None => {
                            warn!(source = %label, pointer, "JSON pointer matched nothing; skipping document");
                            continue;
                        }
                    },
                };
                match self.jq_expr.as_deref() {
                    None => apply(Document { source: label, json }),
                    Some(jq_expr) => {
                        let outputs = crate::jq_exec::run_filter(jq_expr, &json).with_context(|| {
                            format!("failed to apply jq expression to {label}")
                        })?;
                        for (k, json) in outputs.into_iter().enumerate() {
                            apply(Document { source: format!("{label}#{k}"), json });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn parse_documents(&self, name: &str, text: &str) -> Result<Vec<(String, serde_json::Value)>> {
        if !self.ndjson {
            let json = serde_json::from_str(text)
                .with_context(|| format!("failed to parse JSON source ({name})"))?;
            return Ok(vec![(name.to_owned(), json)]);
        }
        let mut docs = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let label = format!("{name}:{}", i + 1);
            let json = serde_json::from_str(line)
                .with_context(|| format!("failed to parse NDJSON line ({label})"))?;
            docs.push((label, json));
        }
        debug!(source = name, documents = docs.len(), "parsed NDJSON");
        Ok(docs)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings::from_flags(self.verbose, self.quiet).with_ansi(self.color.forced())
    }

    pub fn run(&self) -> Result<()> {
        if let Some(color) = self.color.forced() {
            colored::control::set_override(color);
        }
        match &self.cmd {
            Command::Classify(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                // 1) gather documents
                let mut docs = Vec::new();
                target.input_settings.load_process(|doc| docs.push(doc))?;
                info!(documents = docs.len(), "classifying");

                // 2) lift & classify; order follows input
                let reports = docs
                    .iter()
                    .map(|doc| -> Result<Report> {
                        let value = lift(&doc.json).with_context(|| format!("in {}", doc.source))?;
                        Ok(Report::of(doc.source.as_str(), &value, target.items))
                    })
                    .collect::<Result<Vec<_>>>()?;

                // 3) render
                let mut rendered = String::new();
                for report in &reports {
                    let line = if target.pretty {
                        serde_json::to_string_pretty(report)?
                    } else {
                        serde_json::to_string(report)?
                    };
                    rendered.push_str(&line);
                    rendered.push('\n');
                }
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                    std::fs::write(out, &rendered)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                } else {
                    print!("{rendered}");
                }
                Ok(())
            }
            Command::Check(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                // 1) load and validate every case file before printing anything
                let mut blocks = Vec::new();
                if !target.cases.is_empty() {
                    for source in resolve_file_path_patterns(&target.cases)? {
                        let Source::Path(path) = source else {
                            bail!("case files cannot be read from stdin");
                        };
                        blocks.extend(CaseFile::load(&path)?.prepare()?);
                    }
                }

                // 2) run; failures are reported, never fatal
                let mut harness = Harness::new(std::io::stdout().lock()).with_color(true);
                if !target.no_builtin {
                    suite::run_builtin(&mut harness);
                }
                suite::cases::run_blocks(&mut harness, &blocks);
                let summary = harness.finish();
                info!(passed = summary.passed, failed = summary.failed, "checks finished");
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn read_source(source: &Source) -> Result<(String, String)> {
    match source {
        Source::Stdin => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(("<stdin>".to_owned(), text))
        }
        Source::Path(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read source file {}", path.display()))?;
            Ok((path.display().to_string(), text))
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<Source>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<Source>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if pattern == "-" {
            out.push(Source::Stdin);
        } else if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(Source::Path(entry?));
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(Source::Path(PathBuf::from(pattern)));
        }
    }

    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
