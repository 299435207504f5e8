use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::completion::Message;
use crate::error::IntentError;

pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant who can write to files and take screenshots of documents.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Write,
    Screenshot,
}

impl FromStr for Mode {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "write" => Ok(Mode::Write),
            "screenshot" => Ok(Mode::Screenshot),
            other => Err(IntentError::InvalidMode(other.to_string())),
        }
    }
}

/// What the user asked for, with the mode-specific fields filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Write { filename: String, content: String },
    Screenshot { filepath: String, output_image: String },
}

impl Intent {
    /// Natural-language instruction sent as the user message.
    pub fn instruction(&self) -> String {
        match self {
            Intent::Write { filename, content } => format!(
                "Write the following content to a file named {}: {}",
                filename, content
            ),
            Intent::Screenshot { filepath, output_image } => format!(
                "Take a screenshot of the first page of {} and save it as {}",
                filepath, output_image
            ),
        }
    }

    /// The full conversation for this run: system prompt, then the instruction.
    pub fn conversation(&self) -> Vec<Message> {
        vec![Message::system(SYSTEM_PROMPT), Message::user(self.instruction())]
    }
}

/// Print `label` and read one trimmed line.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    field: &'static str,
) -> Result<String, IntentError> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(IntentError::InputClosed(field));
    }
    Ok(line.trim().to_string())
}

/// Ask for the mode, then for that mode's fields.
///
/// An unknown mode is returned as an error before any further prompt.
pub fn collect<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Intent, IntentError> {
    let mode: Mode = prompt(input, output, "What do you want to do? (write/screenshot): ", "a mode")?
        .parse()?;

    let intent = match mode {
        Mode::Write => Intent::Write {
            filename: prompt(input, output, "Enter filename (e.g., hello.txt): ", "a filename")?,
            content: prompt(input, output, "Enter content to write: ", "the content")?,
        },
        Mode::Screenshot => Intent::Screenshot {
            filepath: prompt(input, output, "Enter full path to the PDF file: ", "a PDF path")?,
            output_image: prompt(
                input,
                output,
                "Enter output image filename (e.g., shot.png): ",
                "an output filename",
            )?,
        },
    };

    log::info!("Collected {:?} intent", mode);
    Ok(intent)
}
