use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{logger::EventLogger, types::Recency};

use super::events::LoggerEvent;

/// Failures of the async front end; backend operations themselves never fail.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The command loop has stopped, usually after `shutdown`.
    #[error("logger command loop has stopped")]
    ChannelClosed,
    /// A blocking backend call panicked or was cancelled.
    #[error("blocking logger call failed: {0}")]
    Join(String),
}

/// Channel sizing for [`spawn_event_logger`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pending commands before senders wait.
    pub command_queue_bound: usize,
    /// Broadcast buffer; slow subscribers lag past this.
    pub event_channel_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_channel_capacity: 1024,
        }
    }
}

/// Cloneable async front end to one backend.
///
/// Commands run in order on a single loop; backend I/O is moved onto the
/// blocking pool.
pub struct EventLogHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<LoggerEvent>,
}

impl Clone for EventLogHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Add {
        address: String,
        message: String,
        resp: oneshot::Sender<Result<String, RuntimeError>>,
    },
    Tail {
        n: Recency,
        resp: oneshot::Sender<Result<Vec<String>, RuntimeError>>,
    },
    SetActive {
        active: bool,
        resp: oneshot::Sender<()>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

/// Moves `logger` into a command loop on the current tokio runtime.
pub fn spawn_event_logger(logger: Arc<dyn EventLogger>, config: RuntimeConfig) -> EventLogHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<LoggerEvent>(config.event_channel_capacity);

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            let done = handle_command(cmd, &logger, &events_tx_loop).await;
            if done {
                break;
            }
        }
    });

    EventLogHandle { cmd_tx, events_tx }
}

impl EventLogHandle {
    /// Subscribes to recorded lines and state changes.
    pub fn subscribe(&self) -> broadcast::Receiver<LoggerEvent> {
        self.events_tx.subscribe()
    }

    /// Records an event with an empty address.
    pub async fn add(&self, message: impl Into<String>) -> Result<String, RuntimeError> {
        self.add_with_address("", message).await
    }

    /// Records an event; resolves to the backend's returned line.
    pub async fn add_with_address(
        &self,
        address: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<String, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Add {
                address: address.into(),
                message: message.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Runs the backend's `tail_last_n`.
    pub async fn tail_last_n(&self, n: Recency) -> Result<Vec<String>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Tail { n, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Resumes recording.
    pub async fn enable(&self) -> Result<(), RuntimeError> {
        self.set_active(true).await
    }

    /// Suspends recording.
    pub async fn disable(&self) -> Result<(), RuntimeError> {
        self.set_active(false).await
    }

    async fn set_active(&self, active: bool) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SetActive { active, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Shuts the backend down and stops the loop. Later calls on any clone
    /// return [`RuntimeError::ChannelClosed`].
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

async fn handle_command(
    cmd: Command,
    logger: &Arc<dyn EventLogger>,
    events_tx: &broadcast::Sender<LoggerEvent>,
) -> bool {
    match cmd {
        Command::Add {
            address,
            message,
            resp,
        } => {
            let logger = Arc::clone(logger);
            let res = run_blocking(move || logger.add_with_address(&address, &message)).await;
            if let Ok(line) = &res {
                if !line.is_empty() {
                    let _ = events_tx.send(LoggerEvent::Recorded { line: line.clone() });
                }
            }
            let _ = resp.send(res);
        }
        Command::Tail { n, resp } => {
            let logger = Arc::clone(logger);
            let _ = resp.send(run_blocking(move || logger.tail_last_n(n)).await);
        }
        Command::SetActive { active, resp } => {
            if active {
                logger.enable();
                let _ = events_tx.send(LoggerEvent::Enabled);
            } else {
                logger.disable();
                let _ = events_tx.send(LoggerEvent::Disabled);
            }
            let _ = resp.send(());
        }
        Command::Shutdown { resp } => {
            let logger = Arc::clone(logger);
            let res = run_blocking(move || logger.shutdown()).await;
            let _ = events_tx.send(LoggerEvent::ShutDown);
            let _ = resp.send(res);
            return true;
        }
    }

    false
}

async fn run_blocking<T, F>(f: F) -> Result<T, RuntimeError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RuntimeError::Join(e.to_string()))
}
