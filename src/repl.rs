use std::error::Error;
use std::io::Write;
use std::sync::Arc;

use log::info;
use tokio::io::{ AsyncBufReadExt, BufReader };

use crate::models::chat::{ Message, Role };
use crate::session::{ ChatSession, SendOutcome };

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Send(String),
    Clear,
    Quit,
    Blank,
}

pub fn parse_input(line: &str) -> Input {
    match line.trim() {
        "" => Input::Blank,
        "/clear" => Input::Clear,
        "/quit" | "/exit" => Input::Quit,
        text => Input::Send(text.to_string()),
    }
}

pub fn header(message_count: usize) -> String {
    if message_count > 0 {
        format!("{} messages in conversation", message_count)
    } else {
        "Ready to help you".to_string()
    }
}

pub fn render(message: &Message) -> String {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    format!("[{}] {}: {}", message.local_time(), speaker, message.text)
}

/// Line-oriented chat loop over stdin/stdout.
pub async fn run(session: Arc<ChatSession>) -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("{}", header(session.message_count()));
    for message in session.messages() {
        println!("{}", render(&message));
    }
    println!("Type a message and press Enter. /clear resets the chat, /quit leaves.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Blank => continue,
            Input::Quit => break,
            Input::Clear => {
                session.clear();
                println!("{}", header(0));
            }
            Input::Send(text) => {
                let outcome = session.send(&text).await;
                if outcome == SendOutcome::Skipped {
                    continue;
                }
                if let Some(reply) = session.messages().last() {
                    println!("{}", render(reply));
                }
            }
        }
    }

    info!("Leaving chat with {} message(s) saved", session.message_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_text() {
        assert_eq!(parse_input("  /clear "), Input::Clear);
        assert_eq!(parse_input("/exit"), Input::Quit);
        assert_eq!(parse_input("   "), Input::Blank);
        assert_eq!(parse_input(" hello "), Input::Send("hello".into()));
    }

    #[test]
    fn header_reflects_message_count() {
        assert_eq!(header(0), "Ready to help you");
        assert_eq!(header(4), "4 messages in conversation");
    }

    #[test]
    fn render_includes_speaker_and_text() {
        let line = render(&Message::new("Hello there!", Role::Assistant));
        assert!(line.ends_with("assistant: Hello there!"));
    }
}
