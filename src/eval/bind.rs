//! Argument contract enforcement.
//!
//! [`shape_arguments`] runs at parse time and needs no filesystem: flags,
//! arity, structural path classification. [`bind_stage`] runs immediately
//! before a stage executes and resolves everything against the live working
//! directory.

use std::path::PathBuf;

use log::debug;

use crate::commands::{ArgShape, ArgumentContract, Call, Requirement, ResolvedArgument};
use crate::error::{Result, ShellError, display_arg};
use crate::fs::EntryKind;
use crate::parse::{Argument, PathClass, RedirectKind, Stage};
use crate::path::{WildcardPolicy, classify};

use super::Session;

/// A stage's redirection resolved to an absolute target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRedirect {
    pub kind: RedirectKind,
    pub target: PathBuf,
}

/// Turn the words after the command name into typed arguments.
pub fn shape_arguments(
    command: &str,
    words: &[String],
    contract: &ArgumentContract,
) -> Result<Vec<Argument>> {
    let mut flags = Vec::new();
    let mut operands = Vec::new();
    for word in words {
        if contract.flags.contains(&word.as_str()) {
            flags.push(Argument::Flag(word.clone()));
        } else if !contract.flags.is_empty() && word.len() > 1 && word.starts_with('-') {
            return Err(ShellError::argument(format!(
                "{command}: unknown option {}",
                display_arg(word)
            )));
        } else {
            operands.push(word);
        }
    }

    let count = operands.len();
    if count < contract.min {
        return Err(ShellError::argument(format!(
            "{command}: too few arguments (expects {}, got {count})",
            contract.arity()
        )));
    }
    if contract.max.is_some_and(|max| count > max) {
        return Err(ShellError::argument(format!(
            "{command}: too many arguments (expects {}, got {count})",
            contract.arity()
        )));
    }

    let mut args = flags;
    for (index, word) in operands.into_iter().enumerate() {
        let requirement = contract.requirement(index, count);
        if !requirement.is_path() {
            args.push(Argument::Literal(word.clone()));
            continue;
        }
        let class = classify(word)?;
        if class == PathClass::Wildcard && !requirement.allows_wildcard() {
            return Err(ShellError::argument(format!(
                "{command}: {} must be a single path, not a wildcard",
                display_arg(word)
            )));
        }
        args.push(Argument::Path {
            raw: word.clone(),
            class,
        });
    }
    Ok(args)
}

/// Resolve a parsed stage against the session, producing the [`Call`] its
/// command runs with and the resolved redirection target.
pub fn bind_stage(
    stage: &Stage,
    contract: &ArgumentContract,
    policy: WildcardPolicy,
    session: &Session,
    piped: Option<String>,
) -> Result<(Call, Option<ResolvedRedirect>)> {
    let command = stage.command.as_str();
    let operands: Vec<&Argument> = stage.operands().collect();
    let count = operands.len();

    let mut args = Vec::with_capacity(count);
    for (index, arg) in operands.iter().enumerate() {
        let resolved = match arg {
            Argument::Path {
                raw,
                class: PathClass::Singleton,
            } => {
                let path = session.resolve(raw);
                if contract.requirement(index, count) == Requirement::MustResolveToDirectory
                    && session.fs().stat(&path) != EntryKind::Dir
                {
                    return Err(ShellError::argument(format!(
                        "{command}: {} is not a directory",
                        display_arg(raw)
                    )));
                }
                ResolvedArgument::Path(path)
            }
            Argument::Path {
                raw,
                class: PathClass::Wildcard,
            } => ResolvedArgument::Expanded(session.expand(raw, policy)?),
            other => ResolvedArgument::Literal(other.raw().to_string()),
        };
        args.push(resolved);
    }

    if let ArgShape::SourcesThenDestination { .. } = contract.shape {
        check_destination(command, &operands, &args, session)?;
    }

    let redirect = match &stage.redirection.target {
        Some(target) if !stage.redirection.is_none() => Some(ResolvedRedirect {
            kind: stage.redirection.kind,
            target: session.resolve(target),
        }),
        _ => None,
    };

    let call = Call {
        command: stage.command.clone(),
        flags: stage.flags().map(String::from).collect(),
        args,
        piped,
    };
    debug!(
        "bound {command}: {} path(s), flags {:?}, redirect {:?}",
        call.paths().len(),
        call.flags,
        redirect
    );
    Ok((call, redirect))
}

/// Copying many things, or a directory, onto one non-directory is ambiguous.
/// A destination written with a trailing separator must already be a
/// directory, whatever the sources are.
fn check_destination(
    command: &str,
    operands: &[&Argument],
    args: &[ResolvedArgument],
    session: &Session,
) -> Result<()> {
    let Some((destination, sources)) = args.split_last() else {
        return Ok(());
    };
    let raw = operands.last().map(|a| a.raw()).unwrap_or_default();
    let is_directory = destination
        .paths()
        .first()
        .is_some_and(|p| session.fs().stat(p) == EntryKind::Dir);

    if raw.ends_with(std::path::is_separator) && !is_directory {
        return Err(ShellError::argument(format!(
            "{command}: {} is not a directory",
            display_arg(raw)
        )));
    }

    let source_paths: Vec<&PathBuf> = sources.iter().flat_map(|a| a.paths()).collect();
    let needs_directory = source_paths.len() > 1
        || source_paths
            .iter()
            .any(|p| session.fs().stat(p) == EntryKind::Dir);
    if !needs_directory || is_directory {
        return Ok(());
    }
    Err(ShellError::argument(format!(
        "{command}: destination {} is ambiguous: not an existing directory",
        display_arg(raw)
    )))
}
