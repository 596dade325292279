//! Interactive input adapters: console line reader and native OS dialogs.

use std::io::{self, BufRead, Write};
use std::process::Command;

use postsync_vault::TitleProvider;

const DIALOG_TITLE: &str = "Create Post";

pub const TITLE_MESSAGE: &str = "Enter post title:";
pub const TAGS_MESSAGE: &str = "Enter tags (comma-separated, blank for none):";
pub const DATE_MESSAGE: &str = "Enter date (YYYY-MM-DD, blank for today):";

/// Where `postsync new` asks for what the command line left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PromptKind {
    /// Read lines from standard input.
    Console,
    /// Native input dialog (zenity, osascript or PowerShell), falling back
    /// to the console when none is available.
    Dialog,
}

/// Asks a human one question at a time.
pub trait Prompter {
    /// Show `message` and return the trimmed answer. `Ok(None)` means the
    /// user cancelled or left the answer blank.
    fn ask(&mut self, message: &str) -> io::Result<Option<String>>;
}

/// Prints a message and reads one line. EOF or a blank line is a cancel.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompt<R, W> {
    fn ask(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}\n> ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(non_empty(&line))
    }
}

impl<R: BufRead, W: Write> TitleProvider for ConsolePrompt<R, W> {
    fn title(&mut self) -> io::Result<Option<String>> {
        self.ask(TITLE_MESSAGE)
    }
}

/// Asks through the platform's native input dialog.
#[derive(Debug, Default)]
pub struct DialogPrompt;

impl DialogPrompt {
    fn command(message: &str) -> Command {
        if cfg!(target_os = "windows") {
            let mut cmd = Command::new("powershell");
            cmd.arg("-Command").arg(format!(
                "Add-Type -AssemblyName Microsoft.VisualBasic; \
                 [Microsoft.VisualBasic.Interaction]::InputBox('{message}', '{DIALOG_TITLE}')"
            ));
            cmd
        } else if cfg!(target_os = "macos") {
            let mut cmd = Command::new("osascript");
            cmd.arg("-e")
                .arg(format!(
                    "Tell application \"System Events\" to display dialog \"{message}\" default answer \"\""
                ))
                .arg("-e")
                .arg("text returned of result");
            cmd
        } else {
            let mut cmd = Command::new("zenity");
            cmd.arg("--entry")
                .arg(format!("--title={DIALOG_TITLE}"))
                .arg(format!("--text={message}"));
            cmd
        }
    }
}

impl Prompter for DialogPrompt {
    fn ask(&mut self, message: &str) -> io::Result<Option<String>> {
        let outcome = match Self::command(message).output() {
            Ok(output) => dialog_outcome(
                output.status.success(),
                &String::from_utf8_lossy(&output.stdout),
                &String::from_utf8_lossy(&output.stderr),
            ),
            Err(e) => {
                tracing::debug!(error = %e, "no native dialog available");
                DialogOutcome::Unavailable
            }
        };

        match outcome {
            DialogOutcome::Answer(answer) => Ok(Some(answer)),
            DialogOutcome::Cancelled => Ok(None),
            DialogOutcome::Unavailable => {
                tracing::debug!("using console prompt");
                let stdin = io::stdin();
                ConsolePrompt::new(stdin.lock(), io::stderr()).ask(message)
            }
        }
    }
}

impl TitleProvider for DialogPrompt {
    fn title(&mut self) -> io::Result<Option<String>> {
        self.ask(TITLE_MESSAGE)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum DialogOutcome {
    Answer(String),
    Cancelled,
    /// The dialog program ran but could not show anything (no display,
    /// missing GUI session).
    Unavailable,
}

/// Reads a finished dialog process. Dismissing a dialog exits non-zero
/// quietly, except osascript which reports error -128. Any other failure
/// with stderr output means the dialog never appeared.
fn dialog_outcome(success: bool, stdout: &str, stderr: &str) -> DialogOutcome {
    if success {
        return non_empty(stdout).map_or(DialogOutcome::Cancelled, DialogOutcome::Answer);
    }
    if stderr.trim().is_empty() || stderr.contains("(-128)") {
        DialogOutcome::Cancelled
    } else {
        DialogOutcome::Unavailable
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
