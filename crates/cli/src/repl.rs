//! Terminal input source for the dispatch loop
//!
//! rustyline blocks, so the editor lives on its own thread. Each acquisition sends a prompt
//! request and waits for the line with a timeout. A line still being typed when the timeout
//! fires is not lost: the request stays outstanding and the next acquisition picks it up.

use std::{sync::mpsc, thread, time::Duration};

use async_trait::async_trait;
use colored::Colorize;
use rustyline::{error::ReadlineError, DefaultEditor};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::warn;
use zade::{InputError, InputSource};

use crate::output::print_info;

enum ReadEvent {
    Line(String),
    Interrupted,
    Eof,
    Failed(String),
}

/// Line-based input with history, standing in for a microphone
pub struct ConsoleInput {
    prompts: mpsc::Sender<String>,
    events: UnboundedReceiver<ReadEvent>,
    prompt: String,
    outstanding: bool,
}

impl ConsoleInput {
    pub fn spawn() -> Self {
        let (prompts, prompt_rx) = mpsc::channel::<String>();
        let (event_tx, events) = unbounded_channel();

        // Without the thread the first acquisition reports the input closed
        if let Err(e) = thread::Builder::new()
            .name("zade-readline".to_string())
            .spawn(move || read_lines(prompt_rx, event_tx))
        {
            warn!("Failed to start input thread: {}", e);
        }

        Self {
            prompts,
            events,
            prompt: format!("{} ", "you >".bright_green().bold()),
            outstanding: false,
        }
    }
}

fn read_lines(prompts: mpsc::Receiver<String>, events: UnboundedSender<ReadEvent>) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            let _ = events.send(ReadEvent::Failed(e.to_string()));
            return;
        }
    };

    while let Ok(prompt) = prompts.recv() {
        let event = match editor.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                ReadEvent::Line(line)
            }
            Err(ReadlineError::Interrupted) => ReadEvent::Interrupted,
            Err(ReadlineError::Eof) => ReadEvent::Eof,
            Err(e) => ReadEvent::Failed(e.to_string()),
        };

        let last = matches!(event, ReadEvent::Eof | ReadEvent::Failed(_));
        if events.send(event).is_err() || last {
            break;
        }
    }
}

#[async_trait]
impl InputSource for ConsoleInput {
    async fn acquire_utterance(&mut self, timeout: Duration) -> Result<Option<String>, InputError> {
        if !self.outstanding {
            self.prompts
                .send(self.prompt.clone())
                .map_err(|_| InputError::Closed)?;
            self.outstanding = true;
        }

        let event = match tokio::time::timeout(timeout, self.events.recv()).await {
            Ok(event) => event,
            // Nothing heard in time
            Err(_) => return Ok(None),
        };
        self.outstanding = false;

        match event {
            Some(ReadEvent::Line(line)) => Ok(Some(line)),
            Some(ReadEvent::Interrupted) => {
                println!();
                print_info("Say \"exit\" or \"quit\" to end the session.");
                Ok(None)
            }
            Some(ReadEvent::Eof) | None => Err(InputError::Closed),
            Some(ReadEvent::Failed(message)) => Err(InputError::ServiceUnavailable(message)),
        }
    }
}
