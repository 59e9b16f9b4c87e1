//! `wp`: convert between Windows paths and their WSL mount paths.
//!
//! `C:\Users\me\a.jpg` ⇄ `/mnt/c/Users/me/a.jpg`

use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

use crate::command::{Command, Flow, Session, parse_args};
use crate::errors::WpError;
use crate::registry::Source;
use crate::streams::ReadOutcome;

/// Exit code for a path that cannot be converted.
pub const EXIT_UNCONVERTIBLE: i32 = 255;

pub fn source() -> Source {
    Source::new(file!(), units)
}

fn units() -> Result<Vec<Rc<dyn Command>>> {
    Ok(vec![Rc::new(WslPath)])
}

/// Convert between Windows paths and WSL mount paths.
///
/// Without PATH, asks for one; an empty answer uses the current directory.
#[derive(Parser, Debug)]
#[command(name = "wp")]
struct WpArgs {
    /// Absolute Windows path or /mnt/<drive>/... path
    path: Option<String>,
}

pub struct WslPath;

impl Command for WslPath {
    fn name(&self) -> &str {
        "converter"
    }

    fn description(&self) -> &str {
        "Convert between Windows paths and WSL mount paths"
    }

    fn invoke(&self, args: &[String], session: &mut Session<'_>) -> Result<Flow> {
        let Some(parsed) = parse_args::<WpArgs>("wp", args, session)? else {
            return Ok(Flow::Continue);
        };

        let path = match parsed.path {
            Some(p) => p,
            None => match ask_path(session)? {
                Some(p) => p,
                None => return Ok(Flow::Exit(0)),
            },
        };
        let path = if path.trim().is_empty() {
            std::env::current_dir()
                .context("Failed to get current directory")?
                .display()
                .to_string()
        } else {
            path.trim().to_string()
        };

        match convert(&path) {
            Ok(converted) => {
                session.streams.output(converted)?;
                Ok(Flow::Continue)
            }
            Err(e) => {
                session.streams.warning(e)?;
                Ok(Flow::Exit(EXIT_UNCONVERTIBLE))
            }
        }
    }
}

/// `None` when the user interrupted the prompt.
fn ask_path(session: &mut Session<'_>) -> Result<Option<String>> {
    use dialoguer::Input;

    if session.streams.is_tty() {
        return match Input::<String>::new()
            .with_prompt("Absolute path")
            .allow_empty(true)
            .interact_text()
        {
            Ok(answer) => Ok(Some(answer)),
            Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => {
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to read path"),
        };
    }

    match session.streams.ask("Absolute path: ")? {
        ReadOutcome::Line(answer) => Ok(Some(answer)),
        ReadOutcome::Interrupted | ReadOutcome::Eof => Ok(None),
    }
}

/// Pick the direction from the separators in `path`.
pub fn convert(path: &str) -> Result<String, WpError> {
    if path.contains('\\') {
        to_wsl(path)
    } else if path.contains('/') {
        to_windows(path)
    } else {
        Err(WpError::NotAbsolute(path.to_string()))
    }
}

/// `C:\Users\me` → `/mnt/c/Users/me`
pub fn to_wsl(path: &str) -> Result<String, WpError> {
    let mut parts = path.split(['\\', '/']).filter(|p| !p.is_empty());
    let drive = parts
        .next()
        .and_then(|d| d.strip_suffix(':'))
        .filter(|d| d.len() == 1 && d.chars().all(|c| c.is_ascii_alphabetic()))
        .ok_or_else(|| WpError::NotAbsolute(path.to_string()))?;

    let mut out = format!("/mnt/{}", drive.to_ascii_lowercase());
    for part in parts {
        out.push('/');
        out.push_str(part);
    }
    Ok(out)
}

/// `/mnt/c/Users/me` → `C:\Users\me`
pub fn to_windows(path: &str) -> Result<String, WpError> {
    let mut parts = path.split('/').filter(|p| !p.is_empty() && *p != ".");
    if parts.next() != Some("mnt") {
        return Err(WpError::NotMountPath(path.to_string()));
    }
    let drive = parts
        .next()
        .filter(|d| d.len() == 1 && d.chars().all(|c| c.is_ascii_alphabetic()))
        .ok_or_else(|| WpError::NotMountPath(path.to_string()))?;

    let rest: Vec<&str> = parts.collect();
    Ok(format!("{}:\\{}", drive.to_ascii_uppercase(), rest.join("\\")))
}
