use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use logharbor_types::LogEvent;

use crate::parse::{FeedError, parse_event};

/// Lifecycle and data events emitted by a feed connection.
#[derive(Debug)]
pub enum FeedEvent {
    /// Handshake succeeded; the consumer should transition to Connected.
    Opened,
    /// One parsed log event.
    Message(LogEvent),
    /// A frame that failed to parse; discarded, nothing forwarded.
    Malformed { reason: String },
    /// The source closed the connection.
    Closed,
    /// Transport failure; the consumer should transition to Disconnected.
    Error(String),
}

/// One persistent connection to a log-event source.
///
/// `open` spawns a reader task that delivers `FeedEvent`s over the given
/// channel; `close` tears it down and is idempotent. There is no automatic
/// reconnect: after a close or a transport failure, calling `open` again is
/// the resume path.
pub struct FeedConnection {
    endpoint: String,
    cancel: CancellationToken,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl FeedConnection {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Start (or restart) the reader task.
    pub fn open(&mut self, tx: mpsc::UnboundedSender<FeedEvent>) {
        // Tear down any previous task so at most one reader is live
        self.close();

        let endpoint = self.endpoint.clone();
        let cancel = self.cancel.clone();
        self.task = Some(tokio::spawn(async move {
            run_feed(endpoint, tx, cancel).await;
        }));
    }

    /// Stop the reader task. Safe to call any number of times; already
    /// delivered events and downstream buffer state are unaffected.
    pub fn close(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        // Fresh token so a later open() can resume
        self.cancel = CancellationToken::new();
    }

    /// Whether a reader task is currently live.
    pub fn is_open(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for FeedConnection {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_feed(
    endpoint: String,
    tx: mpsc::UnboundedSender<FeedEvent>,
    cancel: CancellationToken,
) {
    let stream = match TcpStream::connect(&endpoint).await {
        Ok(stream) => stream,
        Err(source) => {
            let err = FeedError::Connect { endpoint, source };
            let _ = tx.send(FeedEvent::Error(err.to_string()));
            return;
        }
    };

    if tx.send(FeedEvent::Opened).is_err() {
        return;
    }

    let mut lines = BufReader::new(stream).lines();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => {
                        // Blank keep-alive lines are not frames
                        if line.trim().is_empty() {
                            continue;
                        }
                        let event = match parse_event(&line) {
                            Ok(event) => FeedEvent::Message(event),
                            Err(err) => {
                                tracing::warn!(%err, "discarding malformed feed frame");
                                FeedEvent::Malformed {
                                    reason: err.to_string(),
                                }
                            }
                        };
                        if tx.send(event).is_err() {
                            // Consumer gone, stop reading
                            break;
                        }
                    }
                    Ok(None) => {
                        let _ = tx.send(FeedEvent::Closed);
                        break;
                    }
                    Err(err) => {
                        let _ = tx.send(FeedEvent::Error(err.to_string()));
                        break;
                    }
                }
            }
        }
    }
}
