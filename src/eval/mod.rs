pub mod bind;
pub mod context;

pub use bind::ResolvedRedirect;
pub use context::{CommandContext, Session};

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::commands::{CommandSpec, HelpEntry};
use crate::config::{Config, Settings, WildcardConfig};
use crate::console::Console;
use crate::error::{Result, ShellError, display_arg};
use crate::fs::WriteMode;
use crate::logging::oneline;
use crate::parse::{self, Pipeline, RedirectKind, Stage};
use crate::path::WildcardPolicy;

/// Registry of all command specs, keyed by command name, plus the settings
/// the parser and executor need.
pub struct CommandRegistry {
    specs: HashMap<String, Box<dyn CommandSpec>>,
    catalogue: Vec<HelpEntry>,
    disabled: Vec<String>,
    wildcard: WildcardConfig,
    settings: Settings,
}

impl CommandRegistry {
    /// Build the registry from configuration.
    pub fn from_config(config: &Config) -> Self {
        use crate::commands::{
            cat::CatSpec,
            copy::CopySpec,
            dirs::{CdSpec, MkdirSpec, PwdSpec},
            info::{ArgsSpec, DateSpec, ExitSpec, HelpSpec},
            list::LsSpec,
            more::MoreSpec,
            remove::RemoveSpec,
        };

        let all: Vec<Box<dyn CommandSpec>> = vec![
            Box::new(CopySpec::copy()),
            Box::new(CopySpec::moving()),
            Box::new(RemoveSpec::rm()),
            Box::new(RemoveSpec::rmdir()),
            Box::new(MkdirSpec),
            Box::new(CdSpec),
            Box::new(PwdSpec),
            Box::new(LsSpec),
            Box::new(CatSpec),
            Box::new(MoreSpec),
            Box::new(HelpSpec),
            Box::new(ArgsSpec),
            Box::new(DateSpec),
            Box::new(ExitSpec),
        ];

        let mut specs: HashMap<String, Box<dyn CommandSpec>> = HashMap::new();
        let mut disabled = Vec::new();
        for spec in all {
            let name = spec.name();
            if config.is_disabled(name) {
                disabled.push(name.to_string());
            } else {
                specs.insert(name.to_string(), spec);
            }
        }

        let mut catalogue: Vec<HelpEntry> = specs.values().map(|s| s.help_entry()).collect();
        catalogue.sort_by_key(|e| e.name);

        Self {
            specs,
            catalogue,
            disabled,
            wildcard: config.wildcard.clone(),
            settings: config.settings.clone(),
        }
    }

    pub fn catalogue(&self) -> &[HelpEntry] {
        &self.catalogue
    }

    /// Look up a spec by exact command name.
    fn lookup(&self, name: &str) -> Result<&dyn CommandSpec> {
        if let Some(spec) = self.specs.get(name) {
            return Ok(spec.as_ref());
        }
        if self.disabled.iter().any(|d| d == name) {
            return Err(ShellError::argument(format!(
                "{name}: command disabled by configuration"
            )));
        }
        Err(ShellError::argument(format!(
            "{} is not a supported command",
            display_arg(name)
        )))
    }

    /// The wildcard policy configured for `command`.
    pub fn wildcard_policy(&self, command: &str) -> WildcardPolicy {
        self.wildcard.policy(command)
    }

    /// Parse a full line into a pipeline of stages.
    ///
    /// Everything that can be checked without the filesystem is checked here:
    /// syntax, command names, flags, arity and path classification.
    pub fn parse(&self, line: &str) -> Result<Pipeline> {
        let texts = parse::split_pipeline(line, self.settings.quote_aware_pipes)?;
        let last = texts.len() - 1;

        let mut stages = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            let (words, redirection) = parse::split_stage(text)?;
            if i != last && !redirection.is_none() {
                return Err(ShellError::syntax(format!(
                    "output redirection ({}) is only allowed on the last stage",
                    redirection.kind.as_str()
                )));
            }
            let command = words[0].clone();
            let spec = self.lookup(&command)?;
            let args = bind::shape_arguments(&command, &words[1..], &spec.contract())?;
            stages.push(Stage {
                command,
                args,
                redirection,
            });
        }
        debug!("parsed {} stage(s)", stages.len());
        Ok(Pipeline { stages })
    }

    /// Run every stage in order, feeding each stage's output to the next.
    ///
    /// A stage is bound (resolved against the working directory, wildcards
    /// expanded) right before it runs, so a `cd` is visible to later stages.
    /// The first failure aborts the rest of the pipeline.
    pub fn execute(
        &self,
        pipeline: &Pipeline,
        session: &mut Session,
        console: &mut dyn Console,
    ) -> Result<()> {
        let total = pipeline.stages.len();
        let mut piped: Option<String> = None;

        for (i, stage) in pipeline.stages.iter().enumerate() {
            let spec = self.lookup(&stage.command)?;
            let policy = self.wildcard_policy(&stage.command);
            let (call, redirect) =
                bind::bind_stage(stage, &spec.contract(), policy, session, piped.take())?;

            info!("stage {}/{total}: {}", i + 1, stage.command);
            let mut ctx = CommandContext {
                session: &mut *session,
                console: &mut *console,
                catalogue: &self.catalogue,
                settings: &self.settings,
            };
            let output = spec.run(&call, &mut ctx)?;

            if i + 1 < total {
                piped = Some(output);
            } else {
                deliver(&output, redirect.as_ref(), session, console)?;
            }
        }
        Ok(())
    }

    /// Parse and execute one input line.
    pub fn run_line(
        &self,
        line: &str,
        session: &mut Session,
        console: &mut dyn Console,
    ) -> Result<()> {
        info!("line: {}", oneline(line));
        let result = self
            .parse(line)
            .and_then(|pipeline| self.execute(&pipeline, session, console));
        if let Err(e) = &result
            && !e.is_halt()
        {
            warn!("{} error: {e}", e.kind());
        }
        result
    }
}

/// Hand the last stage's output to the console or its redirection target.
fn deliver(
    output: &str,
    redirect: Option<&ResolvedRedirect>,
    session: &Session,
    console: &mut dyn Console,
) -> Result<()> {
    let Some(redirect) = redirect else {
        if !output.is_empty() {
            console.write(output.strip_suffix('\n').unwrap_or(output));
        }
        return Ok(());
    };

    let (contents, mode) = match redirect.kind {
        RedirectKind::Append => (format!("\n{output}"), WriteMode::Append),
        _ => (output.to_string(), WriteMode::Truncate),
    };
    session
        .fs()
        .write(&redirect.target, &contents, mode)
        .map_err(|e| {
            ShellError::execution(format!(
                "cannot write {}: {e}",
                redirect.target.display()
            ))
        })?;
    debug!(
        "wrote {} byte(s) to {} ({})",
        contents.len(),
        redirect.target.display(),
        redirect.kind.as_str()
    );
    Ok(())
}
