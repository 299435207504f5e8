use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::completion::ToolCall;
use crate::config::Config;
use crate::error::DispatchError;
use crate::tools::schema::{SCREENSHOT_FILE, WRITE_FILE};
use crate::tools::{FileWriter, PdfScreenshot, ScreenshotArgs, Tool, WriteFileArgs};

/// Tools the dispatcher knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    WriteFile,
    ScreenshotFile,
}

impl ToolName {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            WRITE_FILE => Some(ToolName::WriteFile),
            SCREENSHOT_FILE => Some(ToolName::ScreenshotFile),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::WriteFile => WRITE_FILE,
            ToolName::ScreenshotFile => SCREENSHOT_FILE,
        }
    }
}

/// A tool call whose arguments decoded cleanly.
#[derive(Debug, Clone)]
pub enum ToolRequest {
    WriteFile(WriteFileArgs),
    ScreenshotFile(ScreenshotArgs),
}

impl ToolRequest {
    pub fn decode(call: &ToolCall) -> Result<Self, DispatchError> {
        let name = ToolName::parse(&call.function.name)
            .ok_or_else(|| DispatchError::UnknownTool(call.function.name.clone()))?;

        match name {
            ToolName::WriteFile => decode_args(name, &call.function.arguments).map(ToolRequest::WriteFile),
            ToolName::ScreenshotFile => {
                decode_args(name, &call.function.arguments).map(ToolRequest::ScreenshotFile)
            }
        }
    }
}

fn decode_args<T: DeserializeOwned>(name: ToolName, arguments: &str) -> Result<T, DispatchError> {
    serde_json::from_str(arguments).map_err(|source| DispatchError::MalformedArguments {
        tool: name.as_str(),
        source,
    })
}

/// Result of one invocation, printed as a single status notice.
#[derive(Debug)]
pub struct InvocationOutcome {
    pub tool: String,
    pub result: Result<String, DispatchError>,
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for InvocationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(message) => write!(f, "✅ {}", message),
            Err(e) => write!(f, "❌ {}", e),
        }
    }
}

/// Runs the model's tool calls against the local filesystem.
pub struct Dispatcher {
    file_writer: FileWriter,
    screenshot: PdfScreenshot,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            file_writer: FileWriter::new(),
            screenshot: PdfScreenshot::new(&config.screenshot),
        }
    }

    /// Process every call in order. A failed call never stops the ones after it.
    pub async fn dispatch(&self, calls: &[ToolCall]) -> Vec<InvocationOutcome> {
        let mut outcomes = Vec::with_capacity(calls.len());

        for call in calls {
            log::info!("Dispatching {} (id: {})", call.function.name, call.id);

            let result = match ToolRequest::decode(call) {
                Ok(request) => self.execute(request).await,
                Err(e) => Err(e),
            };

            if let Err(e) = &result {
                log::warn!("Tool call {} failed: {}", call.function.name, e);
            }

            outcomes.push(InvocationOutcome {
                tool: call.function.name.clone(),
                result,
            });
        }

        outcomes
    }

    async fn execute(&self, request: ToolRequest) -> Result<String, DispatchError> {
        match request {
            ToolRequest::WriteFile(args) => {
                let written = self.file_writer.run(args).await.map_err(DispatchError::Write)?;
                log::debug!("{}: {} bytes", FileWriter::NAME, written.bytes);
                Ok(format!(
                    "File '{}' created with content:\n{}",
                    written.path.display(),
                    written.content
                ))
            }
            ToolRequest::ScreenshotFile(args) => {
                let source = Path::new(&args.filepath);
                if !source.is_file() {
                    return Err(DispatchError::NotFound(source.to_path_buf()));
                }

                let saved = self.screenshot.run(args).await.map_err(DispatchError::Screenshot)?;
                log::debug!("{}: {}x{} page", PdfScreenshot::NAME, saved.width, saved.height);
                Ok(format!("Screenshot saved as '{}'.", saved.path.display()))
            }
        }
    }
}
