//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;

use cdkpipe_core::application::Completion;

use crate::cli::GlobalArgs;
use crate::config::AppConfig;

const MANUAL_STEPS_HEADER: &str = "--- Final manual steps required: ---";

/// Writes operator-facing messages to stdout.
pub struct OutputManager {
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    ///
    /// Colour is off when requested or when stdout is not a terminal.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        Self {
            no_color: args.no_color || config.output.no_color || !io::stdout().is_terminal(),
            term: Term::stdout(),
        }
    }

    /// Generic message.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Print what the operator gets, or still has to do, after a run.
    pub fn completion(&self, completion: &Completion) -> io::Result<()> {
        match completion {
            Completion::Deployed { .. } => {
                for line in completion_lines(completion) {
                    self.success(&line)?;
                }
            }
            Completion::ManualSteps { .. } => {
                let mut lines = completion_lines(completion).into_iter();
                if let Some(header) = lines.next() {
                    self.header(&header)?;
                }
                for line in lines {
                    self.print(&line)?;
                }
            }
        }
        Ok(())
    }
}

/// Plain lines describing a completion.
pub fn completion_lines(completion: &Completion) -> Vec<String> {
    match completion {
        Completion::Deployed { pipeline_url } => vec![format!("CodePipeline URL: {pipeline_url}")],
        Completion::ManualSteps { commands } => std::iter::once(MANUAL_STEPS_HEADER.to_string())
            .chain(commands.iter().cloned())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_manager(no_color: bool) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            no_color,
            config: None,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn deployed_prints_pipeline_url() {
        let lines = completion_lines(&Completion::Deployed {
            pipeline_url: "https://eu-west-1.console.aws.amazon.com/x".into(),
        });
        assert_eq!(
            lines,
            vec!["CodePipeline URL: https://eu-west-1.console.aws.amazon.com/x"]
        );
    }

    #[test]
    fn manual_steps_follow_the_header() {
        let lines = completion_lines(&Completion::ManualSteps {
            commands: vec!["cd demo-app".into(), "git push".into()],
        });
        assert_eq!(lines, vec![MANUAL_STEPS_HEADER, "cd demo-app", "git push"]);
    }

    #[test]
    fn writing_without_a_terminal_succeeds() {
        let out = make_manager(true);
        assert!(
            out.completion(&Completion::ManualSteps {
                commands: vec!["cd demo-app".into()],
            })
            .is_ok()
        );
    }
}
