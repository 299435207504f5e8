use std::path::PathBuf;
use thiserror::Error;

/// Problems collecting the user's intent. All of them end the run.
#[derive(Debug, Error)]
pub enum IntentError {
    #[error("Invalid choice '{0}'. Please enter 'write' or 'screenshot'.")]
    InvalidMode(String),

    #[error("Input closed before {0} was entered")]
    InputClosed(&'static str),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single tool invocation. Reported, never fatal.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unrecognized tool '{0}'")]
    UnknownTool(String),

    #[error("Invalid arguments for '{tool}': {source}")]
    MalformedArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("File '{}' does not exist.", .0.display())]
    NotFound(PathBuf),

    #[error("{0:#}")]
    Write(anyhow::Error),

    #[error("Error taking screenshot: {0:#}")]
    Screenshot(anyhow::Error),
}
