//! Interactive mode. The pantry and search results only live as long as the
//! session, so this is where most of the app is used.

use std::io::Write;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::Command;
use crate::api_connection::RecipeProvider;
use crate::app::App;
use crate::storage::Storage;

/// One line typed at the prompt.
#[derive(Debug, clap::Parser)]
#[command(no_binary_name = true, name = "meal-planner")]
pub(super) struct Line {
    #[command(subcommand)]
    pub(super) command: Command,
}

/// Splits a line on whitespace, keeping double-quoted runs together.
fn split_words(line: &str) -> Result<Vec<String>, &'static str> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quoted {
        return Err("unterminated quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

pub async fn run<P: RecipeProvider, S: Storage>(app: &mut App<P, S>) -> anyhow::Result<()> {
    println!("Meal planner. Type `help` for commands, `quit` to leave.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let words = match split_words(&line) {
            Ok(words) => words,
            Err(message) => {
                println!("{message}");
                prompt()?;
                continue;
            }
        };
        match words.first().map(String::as_str) {
            None => {}
            Some("quit" | "exit") => break,
            Some(_) => match Line::try_parse_from(&words) {
                Ok(line) => {
                    if let Err(err) = line.command.run(app).await {
                        tracing::debug!("command failed: {err:#}");
                        println!("Error: {err:#}");
                    }
                }
                Err(err) => err.print()?,
            },
        }
        prompt()?;
    }
    Ok(())
}
