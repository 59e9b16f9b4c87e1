//! `adc`: statistical administrative division codes.
//!
//! Datasets are JSON files in the datapack directory:
//!
//! ```json
//! {
//!     "title": "Division codes (2023)",
//!     "year": 2023,
//!     "data": { "110000000000": "北京市", "110105000000": "朝阳区" }
//! }
//! ```
//!
//! Loaded datasets are kept in the shell context under [`CONTEXT_KEY`],
//! keyed by file stem, so `adc load` once and `adc search` many times.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::command::{Command, Flow, Group, Session, parse_args};
use crate::context::Context as ShellContext;
use crate::errors::AdcError;
use crate::registry::Source;
use crate::streams::ReadOutcome;
use crate::ui::Table;

/// Context key holding the loaded [`Datasets`].
pub const CONTEXT_KEY: &str = "adc";

/// Loaded datasets by file stem.
pub type Datasets = BTreeMap<String, Dataset>;

const REQUIRED_FIELDS: [&str; 3] = ["title", "year", "data"];

/// Digit offsets of province, prefecture, county, township, village.
const BOUNDS: [usize; 6] = [0, 2, 4, 6, 9, 12];

/// Number of levels in a division code.
pub const LEVELS: usize = 5;

const CODE_LEN: usize = 12;

pub fn source() -> Source {
    Source::new(file!(), units)
}

fn units() -> Result<Vec<Rc<dyn Command>>> {
    let list: Rc<dyn Command> = Rc::new(ListDatasets);
    let load: Rc<dyn Command> = Rc::new(LoadDatasets);
    let search: Rc<dyn Command> = Rc::new(SearchDatasets);
    let parse: Rc<dyn Command> = Rc::new(ParseCode);

    let group = Group::new("manager", "Administrative division codes")
        .about(
            "Load administrative division code datasets, then search them or \
             break a code down level by level.",
        )
        .member(list.clone())
        .member(load.clone())
        .member(search.clone())
        .member(parse.clone());

    Ok(vec![list, load, search, parse, Rc::new(group)])
}

/// A statistical division code, always twelve digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionCode {
    digits: String,
}

impl DivisionCode {
    /// Right-pad `code` with zeros to twelve digits.
    pub fn from_code(code: &str) -> Result<Self, AdcError> {
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(AdcError::InvalidCode(code.to_string()));
        }
        let digits = format!("{:0<width$}", &code[..code.len().min(CODE_LEN)], width = CODE_LEN);
        Ok(Self { digits })
    }

    /// Digits of one level, `0` being the province. Levels past the village read as the village.
    pub fn part(&self, level: usize) -> &str {
        let level = level.min(LEVELS - 1);
        &self.digits[BOUNDS[level]..BOUNDS[level + 1]]
    }

    /// The code cut after `levels` levels and padded back to twelve digits.
    pub fn code(&self, levels: usize) -> String {
        let end = BOUNDS[levels.min(LEVELS)];
        format!("{:0<width$}", &self.digits[..end], width = CODE_LEN)
    }
}

impl fmt::Display for DivisionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub title: String,
    pub year: i64,
    /// code → area name
    pub data: BTreeMap<String, String>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self, AdcError> {
        let content = std::fs::read_to_string(path).map_err(|source| AdcError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse dataset JSON, checking the shape before the field types.
    pub fn parse(content: &str, path: &Path) -> Result<Self, AdcError> {
        let parse_err = |source| AdcError::Parse {
            path: path.to_path_buf(),
            source,
        };
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let value: Value = serde_json::from_str(content).map_err(parse_err)?;
        let Value::Object(fields) = &value else {
            return Err(AdcError::NotAnObject { file });
        };
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|f| !fields.contains_key(**f))
            .map(|f| f.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AdcError::MissingFields {
                file,
                fields: missing,
            });
        }
        serde_json::from_value(value).map_err(parse_err)
    }
}

/// `*.json` files in the datapack, sorted by name.
fn dataset_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.json",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let mut files = Vec::new();
    for entry in glob::glob(&pattern).context("Invalid datapack path")? {
        files.push(entry.context("Failed to read datapack entry")?);
    }
    files.sort();
    Ok(files)
}

/// The datasets loaded so far in this shell.
fn loaded(context: &mut ShellContext) -> Result<&mut Datasets> {
    context
        .get_or_default::<Datasets>(CONTEXT_KEY)
        .context("Shell context cannot hold the loaded datasets")
}

fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

/// Stems to work on: every loaded dataset, or only `filename`.
/// The error is the warning to show.
fn select(datasets: &Datasets, filename: Option<&str>) -> Result<Vec<String>, String> {
    match filename {
        None if datasets.is_empty() => Err("No data loaded.".to_string()),
        None => Ok(datasets.keys().cloned().collect()),
        Some(f) if datasets.contains_key(f) => Ok(vec![f.to_string()]),
        Some(f) => Err(format!("{}.json is not loaded or does not exist.", f)),
    }
}

fn missing_datapack(datapack: &Path) -> String {
    format!("Data directory does not exist: {}", datapack.display())
}

fn spinner(visible: bool, message: String) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// List loaded and available datasets.
#[derive(Parser, Debug)]
#[command(name = "list")]
struct ListArgs {}

pub struct ListDatasets;

impl Command for ListDatasets {
    fn name(&self) -> &str {
        "list"
    }

    fn description(&self) -> &str {
        "List loaded and available datasets"
    }

    fn invoke(&self, args: &[String], session: &mut Session<'_>) -> Result<Flow> {
        if parse_args::<ListArgs>("list", args, session)?.is_none() {
            return Ok(Flow::Continue);
        }

        let datapack = session.config.datapack();
        let datasets = loaded(session.context)?;
        if !datapack.is_dir() {
            session.streams.warning(missing_datapack(&datapack))?;
            return Ok(Flow::Continue);
        }

        let mut table = Table::new(["File", "Year", "Title", "Count"]);
        for (stem, dataset) in datasets.iter() {
            table.add_row([
                format!("{}.json", stem),
                dataset.year.to_string(),
                dataset.title.clone(),
                dataset.data.len().to_string(),
            ]);
        }
        for path in dataset_files(&datapack)? {
            let Some(stem) = file_stem(&path) else {
                continue;
            };
            if datasets.contains_key(stem) {
                continue;
            }
            table.add_row([
                format!("{}.json", stem),
                "(not loaded)".to_string(),
                "(not loaded)".to_string(),
                "(not loaded)".to_string(),
            ]);
        }
        session.streams.write(&table.render())?;
        Ok(Flow::Continue)
    }
}

/// Load datasets from the datapack directory.
#[derive(Parser, Debug)]
#[command(name = "load")]
struct LoadArgs {
    /// Only load this dataset
    #[arg(short = 'd', long, value_name = "STEM")]
    datafile: Option<String>,

    /// Do not reload datasets that are already loaded
    #[arg(short = 'r', long)]
    skip_reload: bool,

    /// Load without asking
    #[arg(short, long)]
    yes: bool,
}

pub struct LoadDatasets;

impl Command for LoadDatasets {
    fn name(&self) -> &str {
        "load"
    }

    fn description(&self) -> &str {
        "Load datasets"
    }

    fn invoke(&self, args: &[String], session: &mut Session<'_>) -> Result<Flow> {
        let Some(parsed) = parse_args::<LoadArgs>("load", args, session)? else {
            return Ok(Flow::Continue);
        };

        let datapack = session.config.datapack();
        if !datapack.is_dir() {
            session.streams.warning(missing_datapack(&datapack))?;
            return Ok(Flow::Continue);
        }

        let mut matched = false;
        for path in dataset_files(&datapack)? {
            let Some(stem) = file_stem(&path) else {
                continue;
            };
            if parsed.datafile.as_deref().is_some_and(|d| d != stem) {
                continue;
            }
            matched = true;

            let is_reload = loaded(session.context)?.contains_key(stem);
            if parsed.skip_reload && is_reload {
                continue;
            }

            if !parsed.yes {
                let question = format!("Load {}.json? y/[N] ", stem);
                match session.streams.ask(&question)? {
                    ReadOutcome::Line(answer) if answer.trim() == "y" => {}
                    ReadOutcome::Line(_) => continue,
                    ReadOutcome::Interrupted | ReadOutcome::Eof => break,
                }
            }

            let bar = spinner(
                session.streams.is_err_tty(),
                format!("Loading {}", path.display()),
            );
            let load_result = Dataset::load(&path);
            bar.finish_and_clear();

            match load_result {
                Ok(dataset) => {
                    tracing::debug!(file = %path.display(), entries = dataset.data.len(), "Loaded dataset");
                    loaded(session.context)?.insert(stem.to_string(), dataset);
                    let verb = if is_reload { "Reloaded" } else { "Loaded" };
                    session
                        .streams
                        .info(format!("{} {}", verb, path.display()))?;
                }
                Err(e) => session.streams.warning(e)?,
            }
        }

        if let Some(stem) = &parsed.datafile
            && !matched
        {
            session.streams.warning(format!(
                "{}.json does not exist in {}",
                stem,
                datapack.display()
            ))?;
        }
        Ok(Flow::Continue)
    }
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})", pattern))
}

/// Search codes or area names in the loaded datasets.
///
/// Plain conditions match anywhere; regular expressions match from the start.
#[derive(Parser, Debug)]
#[command(name = "search")]
struct SearchArgs {
    /// Code contains this text
    #[arg(short = 'c', long)]
    code: Vec<String>,

    /// Code matches this regular expression
    #[arg(short = 'C', long, value_name = "REGEX", value_parser = anchored)]
    code_reg: Vec<Regex>,

    /// Area name contains this text
    #[arg(short = 'n', long)]
    name: Vec<String>,

    /// Area name matches this regular expression
    #[arg(short = 'N', long, value_name = "REGEX", value_parser = anchored)]
    name_reg: Vec<Regex>,

    /// Every condition must match
    #[arg(short = 'A', long, overrides_with = "any")]
    all: bool,

    /// Any condition may match (default)
    #[arg(short = 'a', long, overrides_with = "all")]
    any: bool,

    /// Only search this dataset
    #[arg(short = 'f', long, value_name = "STEM")]
    filename: Option<String>,
}

impl SearchArgs {
    fn has_conditions(&self) -> bool {
        !(self.code.is_empty()
            && self.code_reg.is_empty()
            && self.name.is_empty()
            && self.name_reg.is_empty())
    }

    fn matches(&self, code: &str, name: &str) -> bool {
        let mut hits = self
            .code
            .iter()
            .map(|c| code.contains(c.as_str()))
            .chain(self.name.iter().map(|n| name.contains(n.as_str())))
            .chain(self.code_reg.iter().map(|r| r.is_match(code)))
            .chain(self.name_reg.iter().map(|r| r.is_match(name)));
        if self.all {
            hits.all(|hit| hit)
        } else {
            hits.any(|hit| hit)
        }
    }
}

pub struct SearchDatasets;

impl Command for SearchDatasets {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search codes or area names"
    }

    fn invoke(&self, args: &[String], session: &mut Session<'_>) -> Result<Flow> {
        let Some(parsed) = parse_args::<SearchArgs>("search", args, session)? else {
            return Ok(Flow::Continue);
        };
        if !parsed.has_conditions() {
            session.streams.warning("No search conditions.")?;
            return Ok(Flow::Continue);
        }

        let datasets = loaded(session.context)?;
        let files = match select(datasets, parsed.filename.as_deref()) {
            Ok(files) => files,
            Err(warning) => {
                session.streams.warning(warning)?;
                return Ok(Flow::Continue);
            }
        };

        for file in &files {
            let Some(dataset) = datasets.get(file) else {
                continue;
            };
            for (code, name) in &dataset.data {
                if parsed.matches(code, name) {
                    session
                        .streams
                        .output(format!("{}.json | {}\t{}", file, code, name))?;
                }
            }
        }
        Ok(Flow::Continue)
    }
}

/// Break a division code down level by level.
#[derive(Parser, Debug)]
#[command(name = "parse")]
struct ParseArgs {
    /// Division code, digits only
    code: String,

    /// Only look names up in this dataset
    #[arg(short = 'f', long, value_name = "STEM")]
    filename: Option<String>,
}

pub struct ParseCode;

impl Command for ParseCode {
    fn name(&self) -> &str {
        "parse"
    }

    fn description(&self) -> &str {
        "Break a code down level by level"
    }

    fn invoke(&self, args: &[String], session: &mut Session<'_>) -> Result<Flow> {
        let Some(parsed) = parse_args::<ParseArgs>("parse", args, session)? else {
            return Ok(Flow::Continue);
        };
        let code = match DivisionCode::from_code(&parsed.code) {
            Ok(code) => code,
            Err(e) => {
                session.streams.warning(e)?;
                return Ok(Flow::Continue);
            }
        };

        let datasets = loaded(session.context)?;
        let files = match select(datasets, parsed.filename.as_deref()) {
            Ok(files) => files,
            Err(warning) => {
                session.streams.warning(warning)?;
                return Ok(Flow::Continue);
            }
        };

        let tree = render_tree(&code, datasets, &files);
        session.streams.write(&tree)?;
        Ok(Flow::Continue)
    }
}

/// One node per level; under each, the area name from every selected dataset.
pub fn render_tree(code: &DivisionCode, datasets: &Datasets, files: &[String]) -> String {
    let mut out = String::from("│\n");
    for level in 0..LEVELS {
        let (branch, indent) = if level + 1 == LEVELS {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        let full = code.code(level + 1);
        let (start, end) = (BOUNDS[level], BOUNDS[level + 1]);
        out.push_str(branch);
        out.push_str(&format!(
            "{}{}{}\n",
            style(&full[..start]).dim(),
            style(&full[start..end]).magenta(),
            style(&full[end..]).dim()
        ));

        for (i, file) in files.iter().enumerate() {
            let twig = if i + 1 == files.len() { "└── " } else { "├── " };
            let name = datasets
                .get(file)
                .and_then(|d| d.data.get(&full))
                .map(String::as_str)
                .unwrap_or("");
            out.push_str(indent);
            out.push_str(twig);
            out.push_str(&format!(
                "{}{}\n",
                name,
                style(format!("({}.json)", file)).dim()
            ));
        }
    }
    out
}
