use std::fmt::Write;
use std::future;

use engace_api::{Acknowledgement, ConversationHistory, Message, RequestOptions};

use crate::utilities::{indent, input};
use crate::{samples, App};

pub async fn run(app: &App) -> anyhow::Result<()> {
    println!("Chat with EngAce. /clear starts over, /history lists past conversations, /exit leaves.");
    let mut transcript = vec![samples::welcome_message()];
    print!("{}", format_message(&transcript[0]));

    loop {
        let line = input("you> ")?;
        if line.is_empty() {
            break;
        }
        match line.trim() {
            "" => continue,
            "/exit" | "/quit" => break,
            "/clear" => {
                if clear(app).await {
                    transcript.truncate(1);
                    print!("{}", format_message(&transcript[0]));
                }
            }
            "/history" => history(app).await,
            content => {
                let question = Message::from_user(content);
                print!("{}", format_message(&question));
                transcript.push(question.clone());

                let tracker = app.tracker::<Message>();
                let reply = if app.use_samples {
                    tracker
                        .request(
                            || future::ready(Ok(samples::reply(&question))),
                            RequestOptions::new(),
                        )
                        .await
                } else {
                    let consultation = app.client.consultation();
                    tracker
                        .request(|| consultation.send_message(content), RequestOptions::new())
                        .await
                };
                if let Some(reply) = reply {
                    print!("{}", format_message(&reply));
                    transcript.push(reply);
                }
            }
        }
    }
    tracing::debug!(messages = transcript.len(), "left consultation");
    Ok(())
}

async fn clear(app: &App) -> bool {
    if app.use_samples {
        return true;
    }
    let consultation = app.client.consultation();
    app.tracker::<Acknowledgement>()
        .request(
            || consultation.clear_conversation(),
            RequestOptions::new().success_message("Conversation cleared"),
        )
        .await
        .is_some()
}

async fn history(app: &App) {
    if app.use_samples {
        println!("Conversation history is not available with sample data.");
        return;
    }
    let consultation = app.client.consultation();
    let history = app
        .tracker::<Vec<ConversationHistory>>()
        .request(|| consultation.conversation_history(), RequestOptions::new())
        .await;
    match history {
        Some(conversations) if conversations.is_empty() => println!("No past conversations."),
        Some(conversations) => {
            for conversation in conversations {
                println!(
                    "  {:<12} {} messages, last active {}",
                    conversation.id,
                    conversation.messages.len(),
                    conversation.updated_at
                );
            }
        }
        None => {}
    }
}

fn format_message(message: &Message) -> String {
    let speaker = if message.is_user { "You" } else { "EngAce" };
    let mut out = String::new();
    if message.timestamp.is_empty() {
        let _ = writeln!(out, "{speaker}:");
    } else {
        let _ = writeln!(out, "{speaker} ({}):", message.timestamp);
    }
    let _ = writeln!(out, "{}", indent(&message.content, 2));
    out
}
