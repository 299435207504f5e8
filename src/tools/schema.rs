use serde::Serialize;
use serde_json::{json, Value};

pub const WRITE_FILE: &str = "write_file";
pub const SCREENSHOT_FILE: &str = "screenshot_file";

/// A function the model may call, in the chat-completions `tools` shape.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub function: FunctionSchema,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionSchema {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON Schema of the arguments object.
    pub parameters: Value,
}

impl ToolDefinition {
    fn function(name: &'static str, description: &'static str, parameters: Value) -> Self {
        Self {
            tool_type: "function",
            function: FunctionSchema {
                name,
                description,
                parameters,
            },
        }
    }
}

/// The two tools offered to the model on every request.
pub fn registry() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::function(
            WRITE_FILE,
            "Write content to a file",
            json!({
                "type": "object",
                "properties": {
                    "filename": { "type": "string" },
                    "content": { "type": "string" }
                },
                "required": ["filename", "content"]
            }),
        ),
        ToolDefinition::function(
            SCREENSHOT_FILE,
            "Take a screenshot of a document or file and save as PNG.",
            json!({
                "type": "object",
                "properties": {
                    "filepath": {
                        "type": "string",
                        "description": "Absolute path to the file"
                    },
                    "output_image": {
                        "type": "string",
                        "description": "Filename to save screenshot as (e.g., output.png)"
                    }
                },
                "required": ["filepath", "output_image"]
            }),
        ),
    ]
}
