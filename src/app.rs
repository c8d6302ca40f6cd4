use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use logharbor_feed::{FeedConnection, FeedEvent};
use logharbor_types::{ConnectionState, LogLevel};
use logharbor_view::{Snapshot, ViewState};

use crate::commands::Command;
use crate::config::Config;

/// Run the monitor: one event loop owning the view state, fed by the
/// connection reader task and the operator's stdin.
///
/// Each feed event is applied and fully recomputed before the next one is
/// taken from the channel, so derived state is never observed stale.
pub async fn run(config: Config) -> Result<()> {
    let (feed_tx, mut feed_rx) = mpsc::unbounded_channel();
    let mut feed = FeedConnection::new(config.endpoint.clone());
    feed.open(feed_tx.clone());

    let mut view = ViewState::new(config.capacity);
    view.set_criteria(config.criteria.clone());

    let mut input = command_lines();
    let mut tick = tokio::time::interval(config.interval);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                print_snapshot(&view.snapshot());
            }

            Some(event) = feed_rx.recv() => {
                apply_feed_event(&mut view, event);
            }

            line = input.recv() => {
                // stdin EOF ends the session, like a piped command script
                let Some(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match Command::parse(&line) {
                    Ok(command) => {
                        if apply_command(&mut view, &mut feed, &feed_tx, command) {
                            break;
                        }
                    }
                    Err(err) => tracing::warn!(%err, "ignoring operator input"),
                }
            }
        }
    }

    feed.close();
    Ok(())
}

/// Apply one feed event to the view state.
fn apply_feed_event(view: &mut ViewState, event: FeedEvent) {
    match event {
        FeedEvent::Opened => {
            tracing::info!("feed connected");
            view.connection_changed(ConnectionState::Connected);
        }
        FeedEvent::Message(event) => {
            view.on_feed_event(event);
        }
        FeedEvent::Malformed { reason } => {
            // Discarded upstream; the buffer is not mutated
            tracing::warn!(%reason, "dropped malformed feed frame");
        }
        FeedEvent::Closed => {
            tracing::info!("feed closed by source");
            view.connection_changed(ConnectionState::Disconnected);
        }
        FeedEvent::Error(reason) => {
            tracing::warn!(%reason, "feed transport error");
            view.connection_changed(ConnectionState::Disconnected);
        }
    }
}

/// Apply one operator command. Returns true when the session should end.
fn apply_command(
    view: &mut ViewState,
    feed: &mut FeedConnection,
    feed_tx: &mpsc::UnboundedSender<FeedEvent>,
    command: Command,
) -> bool {
    match command {
        Command::Search(term) => {
            let mut criteria = view.criteria().clone();
            criteria.search_term = term;
            view.set_criteria(criteria);
        }
        Command::Level(level) => {
            let mut criteria = view.criteria().clone();
            criteria.level = level;
            view.set_criteria(criteria);
        }
        Command::Clear => {
            view.clear();
        }
        Command::Open => {
            feed.open(feed_tx.clone());
        }
        Command::Close => {
            feed.close();
            view.connection_changed(ConnectionState::Disconnected);
        }
        Command::Stats => {
            print_stats(&view.snapshot());
        }
        Command::Quit => return true,
    }
    false
}

fn print_snapshot(snapshot: &Snapshot) {
    let stats = snapshot.stats;
    println!(
        "[{}] total={} shown={}/{} info={} warn={} error={} debug={}",
        snapshot.connection_state.label(),
        stats.total,
        snapshot.filtered.len(),
        snapshot.total_buffered,
        stats.info,
        stats.warn,
        stats.error,
        stats.debug,
    );
}

/// Detailed printout for the `stats` command, including the proportions the
/// chart collaborator consumes.
fn print_stats(snapshot: &Snapshot) {
    print_snapshot(snapshot);
    for level in [LogLevel::Info, LogLevel::Warn, LogLevel::Error, LogLevel::Debug] {
        let count = snapshot.stats.bucket(&level).unwrap_or(0);
        let pct = snapshot.stats.proportion(&level) * 100.0;
        println!("  {:<5} {:>6}  {:>5.1}%", level.as_str(), count, pct);
    }
}

fn command_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use logharbor_types::{FilterCriteria, LevelFilter, LogEvent};

    fn message(level: LogLevel, text: &str) -> FeedEvent {
        FeedEvent::Message(LogEvent::new(level, "svc", text))
    }

    #[test]
    fn test_open_and_close_drive_connection_state() {
        let mut view = ViewState::new(10);
        apply_feed_event(&mut view, FeedEvent::Opened);
        assert_eq!(view.connection_state(), ConnectionState::Connected);

        apply_feed_event(&mut view, FeedEvent::Closed);
        assert_eq!(view.connection_state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_transport_error_disconnects_but_keeps_buffer() {
        let mut view = ViewState::new(10);
        apply_feed_event(&mut view, FeedEvent::Opened);
        apply_feed_event(&mut view, message(LogLevel::Info, "kept"));

        apply_feed_event(&mut view, FeedEvent::Error("connection reset".into()));
        assert_eq!(view.connection_state(), ConnectionState::Disconnected);
        assert_eq!(view.total_buffered(), 1);
    }

    #[test]
    fn test_malformed_frame_between_two_valid_events() {
        let mut view = ViewState::new(10);
        apply_feed_event(&mut view, message(LogLevel::Info, "first"));
        apply_feed_event(
            &mut view,
            FeedEvent::Malformed {
                reason: "malformed log event".into(),
            },
        );
        apply_feed_event(&mut view, message(LogLevel::Info, "second"));

        assert_eq!(view.total_buffered(), 2);
        let messages: Vec<_> = view.filtered().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["second", "first"]);
    }

    #[test]
    fn test_search_command_updates_term_and_keeps_level() {
        let mut view = ViewState::new(10);
        let mut feed = FeedConnection::new("127.0.0.1:1");
        let (tx, _rx) = mpsc::unbounded_channel();
        view.set_criteria(FilterCriteria {
            search_term: String::new(),
            level: LevelFilter::Level(LogLevel::Error),
        });

        let quit = apply_command(&mut view, &mut feed, &tx, Command::Search("timeout".into()));
        assert!(!quit);
        assert_eq!(view.criteria().search_term, "timeout");
        assert_eq!(view.criteria().level, LevelFilter::Level(LogLevel::Error));

        // Bare search clears the term only
        apply_command(&mut view, &mut feed, &tx, Command::Search(String::new()));
        assert!(view.criteria().search_term.is_empty());
        assert_eq!(view.criteria().level, LevelFilter::Level(LogLevel::Error));
    }

    #[test]
    fn test_clear_command_empties_view() {
        let mut view = ViewState::new(10);
        let mut feed = FeedConnection::new("127.0.0.1:1");
        let (tx, _rx) = mpsc::unbounded_channel();
        apply_feed_event(&mut view, message(LogLevel::Warn, "stale"));

        apply_command(&mut view, &mut feed, &tx, Command::Clear);
        assert_eq!(view.total_buffered(), 0);
        assert_eq!(view.stats().total, 0);
        assert!(view.filtered().is_empty());
    }

    #[test]
    fn test_quit_command_ends_session() {
        let mut view = ViewState::new(10);
        let mut feed = FeedConnection::new("127.0.0.1:1");
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(apply_command(&mut view, &mut feed, &tx, Command::Quit));
    }

    #[tokio::test]
    async fn test_close_command_disconnects_without_clearing() {
        let mut view = ViewState::new(10);
        let mut feed = FeedConnection::new("127.0.0.1:1");
        let (tx, _rx) = mpsc::unbounded_channel();
        apply_feed_event(&mut view, FeedEvent::Opened);
        apply_feed_event(&mut view, message(LogLevel::Info, "kept"));

        apply_command(&mut view, &mut feed, &tx, Command::Close);
        assert_eq!(view.connection_state(), ConnectionState::Disconnected);
        assert_eq!(view.total_buffered(), 1);
        assert!(!feed.is_open());
    }
}
