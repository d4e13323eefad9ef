// UI layer: the console transcript, the confirmation prompt and the
// top-level flow that strings the stages together.

use crate::api::FileHost;
use crate::config::UploadConfig;
use crate::context::UploadContext;
use crate::select::{select_files, SelectionSet};
use crate::upload::{upload_all, UploadOutcome};
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use dialoguer::Input;
use std::io::{BufRead, Write};

pub const CONFIRM_PROMPT: &str = "Ok to upload? [type \"y\"]";

/// How a run ended. `Aborted` maps to a non-zero exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Completed(Vec<(String, UploadOutcome)>),
    Aborted,
}

/// Source of the operator's answer to the confirmation prompt.
pub trait Prompt {
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// Asks through `dialoguer` when stdin is a terminal, otherwise reads one
/// line from stdin so a piped answer still counts.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        let stdin = std::io::stdin();
        if !stdin.is_tty() {
            return LinePrompt::new(stdin.lock(), std::io::stdout()).ask(prompt);
        }
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read confirmation")?;
        Ok(answer)
    }
}

/// Writes the prompt on its own line and reads a single line back. End of
/// input reads as an empty answer.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LinePrompt { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        writeln!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut answer = String::new();
        self.input
            .read_line(&mut answer)
            .context("Failed to read confirmation")?;
        Ok(answer)
    }
}

/// Only an exact `y` (surrounding whitespace ignored) counts as yes.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim() == "y"
}

/// Operator-facing output. Colour is only used when writing to a terminal.
pub struct Transcript<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Transcript<W> {
    pub fn new(out: W, color: bool) -> Self {
        Transcript { out, color }
    }

    pub fn plain(out: W) -> Self {
        Self::new(out, false)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn selection(&mut self, selection: &SelectionSet) -> Result<()> {
        for (filename, description) in selection {
            writeln!(self.out, "{}", filename)?;
            writeln!(self.out, "   {}", description)?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn outcome(&mut self, outcome: &UploadOutcome) -> Result<()> {
        match outcome {
            UploadOutcome::Succeeded { location } => {
                if self.color {
                    writeln!(self.out, "{} {}", "OK:".green(), location)?;
                } else {
                    writeln!(self.out, "OK: {}", location)?;
                }
            }
            UploadOutcome::Failed { status, reason } => {
                if self.color {
                    writeln!(self.out, "{} {} ({})", "Error:".red(), reason, status)?;
                } else {
                    writeln!(self.out, "Error: {} ({})", reason, status)?;
                }
            }
        }
        Ok(())
    }

    pub fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Load, select, confirm, upload. Startup failures are returned as errors;
/// an operator refusal comes back as `RunStatus::Aborted` before anything is
/// sent to the host.
pub fn run<H, P, W>(
    config: &UploadConfig,
    host: &H,
    prompt: &mut P,
    transcript: &mut Transcript<W>,
) -> Result<RunStatus>
where
    H: FileHost,
    P: Prompt,
    W: Write,
{
    let ctx = UploadContext::load(config).context("Failed to load upload context")?;
    let selection = select_files(&config.dist_dir, &ctx.version, &ctx.descriptions)?;
    transcript.selection(&selection)?;

    let answer = prompt.ask(CONFIRM_PROMPT)?;
    if !is_affirmative(&answer) {
        tracing::info!(answer = %answer.trim(), "upload declined");
        transcript.line("Aborted.")?;
        return Ok(RunStatus::Aborted);
    }

    let outcomes = upload_all(host, config, &ctx.credential, &selection, transcript)?;
    transcript.line("Done!")?;
    Ok(RunStatus::Completed(outcomes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_y_confirms() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("  y\n"));
        for answer in ["", "Y", "yes", "n", "y y"] {
            assert!(!is_affirmative(answer), "{answer:?}");
        }
    }

    #[test]
    fn line_prompt_prints_prompt_and_reads_one_line() {
        let mut prompt = LinePrompt::new(&b"y\nignored\n"[..], Vec::new());
        let answer = prompt.ask(CONFIRM_PROMPT).unwrap();
        assert_eq!(answer, "y\n");
        assert!(is_affirmative(&answer));
        assert_eq!(
            String::from_utf8(prompt.into_output()).unwrap(),
            "Ok to upload? [type \"y\"]\n"
        );
    }

    #[test]
    fn line_prompt_at_end_of_input_declines() {
        let mut prompt = LinePrompt::new(&b""[..], Vec::new());
        let answer = prompt.ask(CONFIRM_PROMPT).unwrap();
        assert_eq!(answer, "");
        assert!(!is_affirmative(&answer));
    }

    #[test]
    fn selection_lists_name_then_indented_description() {
        let mut transcript = Transcript::plain(Vec::new());
        let selection: SelectionSet = [("avbin-7.zip".to_string(), "AVbin".to_string())]
            .into_iter()
            .collect();
        transcript.selection(&selection).unwrap();
        assert_eq!(String::from_utf8(transcript.into_inner()).unwrap(), "avbin-7.zip\n   AVbin\n");
    }

    #[test]
    fn plain_outcome_lines() {
        let mut transcript = Transcript::plain(Vec::new());
        transcript
            .outcome(&UploadOutcome::Succeeded {
                location: "https://example/f".into(),
            })
            .unwrap();
        transcript
            .outcome(&UploadOutcome::Failed {
                status: 500,
                reason: "Internal Server Error".into(),
            })
            .unwrap();
        assert_eq!(
            String::from_utf8(transcript.into_inner()).unwrap(),
            "OK: https://example/f\nError: Internal Server Error (500)\n"
        );
    }
}
