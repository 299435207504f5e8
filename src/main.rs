mod completion;
mod config;
mod dispatcher;
mod error;
mod intent;
mod tools;

use anyhow::Result;
use completion::{ChatRequest, CompletionClient, Reply};
use config::Config;
use dispatcher::Dispatcher;
use error::IntentError;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    pretty_env_logger::init();

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Load configuration, API key included
    let config = Config::load(CONFIG_PATH)?;
    log::info!("Configuration loaded (model: {})", config.api.model);

    let client = CompletionClient::new(&config.api);

    // Collect the user's intent; nothing is sent until a valid mode is chosen
    let intent = {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        match intent::collect(&mut input, &mut output) {
            Ok(intent) => intent,
            Err(e @ IntentError::InvalidMode(_)) => {
                log::error!("{}", e);
                println!("❌ {}", e);
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        }
    };

    let reply = client
        .chat(ChatRequest {
            messages: intent.conversation(),
            tools: tools::schema::registry(),
        })
        .await?;

    match reply {
        Reply::Text(text) => println!("🤖 Assistant: {}", text),
        Reply::ToolCalls(calls) => {
            let dispatcher = Dispatcher::new(&config);
            let outcomes = dispatcher.dispatch(&calls).await;

            for outcome in &outcomes {
                println!("{}", outcome);
            }

            let failed: Vec<&str> = outcomes
                .iter()
                .filter(|o| !o.is_success())
                .map(|o| o.tool.as_str())
                .collect();
            if failed.is_empty() {
                log::info!("Dispatched {} tool call(s)", outcomes.len());
            } else {
                log::warn!(
                    "Dispatched {} tool call(s), failed: {}",
                    outcomes.len(),
                    failed.join(", ")
                );
            }
        }
    }

    Ok(())
}
