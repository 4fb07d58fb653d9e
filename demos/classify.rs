//! Classifies a few sample requests with the live oracle and prints each decision.
//!
//! Needs `GEMINI_API_KEY` (or a `.env` file). Extra command-line arguments are
//! classified instead of the samples.

use std::sync::Arc;

use switchboard::config::Settings;
use switchboard::core::decision::DecisionMaker;
use switchboard::llm::{Client, GeminiOracle};

const SAMPLES: &[&str] = &[
    "hi there, how are you?",
    "what's in this picture https://example.com/cat.jpg",
    "summarize https://www.youtube.com/watch?v=dQw4w9WgXcQ",
    "draw a lighthouse at dusk in watercolor",
    "write a python function that reverses a linked list",
    "forget everything we talked about",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    let client = Client::new().with_gemini_at(settings.api_key.clone(), settings.base_url.clone());
    let oracle = GeminiOracle::new(client, settings.router_model.clone());
    println!("routing with {}", oracle.model());
    let maker = DecisionMaker::new(Arc::new(oracle));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let queries: Vec<&str> = if args.is_empty() {
        SAMPLES.to_vec()
    } else {
        args.iter().map(String::as_str).collect()
    };

    for query in queries {
        let decision = maker.decide("demo", query).await;
        println!("{query}\n  -> {}", serde_json::to_string(&decision)?);
    }
    Ok(())
}
