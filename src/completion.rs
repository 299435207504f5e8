use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::tools::schema::ToolDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    // only the model speaks as assistant; replies are read, never sent back
    #[allow(dead_code)]
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// A function call requested by the model. `arguments` is undecoded JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// What the model answered: plain text, or tool calls to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    ToolCalls(Vec<ToolCall>),
}

/// Parameters for a chat-completion request.
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
}

#[derive(Serialize)]
struct RequestBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    tools: &'a [ToolDefinition],
    tool_choice: &'static str,
    stream: bool,
}

#[derive(Deserialize)]
struct ResponseBody {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

/// HTTP client for an OpenAI-compatible chat-completions endpoint (Groq by default).
pub struct CompletionClient {
    pub base_url: String,
    pub model: String,
    api_key: String,
    client: reqwest::Client,
}

impl CompletionClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Send one chat request with automatic tool choice and return the first choice.
    pub async fn chat(&self, request: ChatRequest) -> Result<Reply> {
        let body = RequestBody {
            model: &self.model,
            messages: &request.messages,
            tools: &request.tools,
            tool_choice: "auto",
            stream: false,
        };

        log::info!(
            "Sending {} message(s) with {} tool(s) to {}",
            request.messages.len(),
            request.tools.len(),
            self.model
        );

        let response = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Groq")?;

        log::debug!("Groq HTTP status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Groq API error ({}): {}", status, error_text);
        }

        let response_body: ResponseBody = response.json().await
            .context("Failed to parse Groq response")?;

        let message = response_body
            .choices
            .into_iter()
            .next()
            .context("No choices in Groq response")?
            .message;

        match message.tool_calls {
            Some(calls) if !calls.is_empty() => {
                log::info!("Model requested {} tool call(s)", calls.len());
                Ok(Reply::ToolCalls(calls))
            }
            _ => Ok(Reply::Text(message.content.unwrap_or_default())),
        }
    }
}
