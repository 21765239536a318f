//! Confab terminal client.
//!
//! A line-based chat against a running gateway. The conversation carries a
//! hidden system prompt, renders user and assistant turns, and settles failed
//! sends into an apology bubble instead of crashing.

use std::io::Write;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use confab::client::ChatClient;
use confab::conversation::Conversation;
use confab::view::{ConversationView, THINKING_PLACEHOLDER};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confab=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = ChatClient::from_env();
    let mut view = ConversationView::new(
        Conversation::new()
            .with_system("You are a helpful assistant.")
            .with_assistant("Namaste! Ask me anything 😊"),
    );

    println!("💬 Confab, talking to {}", client.base_url());
    println!("Press Ctrl-D or type /quit to leave.\n");
    for line in view.transcript() {
        println!("{line}");
    }

    let stdin = std::io::stdin();
    let mut input = String::new();
    loop {
        print!("\nYou> ");
        std::io::stdout().flush()?;

        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break; // EOF
        }
        let line = input.trim();
        if line == "/quit" {
            break;
        }

        // Blank lines bounce off the view without a round trip.
        let Some(history) = view.submit(line) else {
            continue;
        };

        print!("Bot: {THINKING_PLACEHOLDER}");
        std::io::stdout().flush()?;

        match client.send(&history).await {
            Ok(response) => view.complete(&response.reply),
            Err(error) => {
                tracing::error!(%error, "chat request failed");
                view.fail();
            }
        }

        // Replace the placeholder line with the settled bubble.
        let last = view.transcript().pop().unwrap_or_default();
        println!("\r\x1b[2K{last}");
    }

    println!("\n👋 Bye!");
    Ok(())
}
