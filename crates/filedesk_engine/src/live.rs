//! Duplex listener for live spreadsheet sessions.
//!
//! One WebSocket per session. The session id is sent as the first text
//! frame; afterwards the server pushes `update` rows and one final `saved`
//! frame, and the client may send `{"type":"done"}`. The connection is never
//! retried once it drops.

use std::sync::Arc;

use filedesk_core::{LiveAction, LiveServerEvent, LiveSession};
use filedesk_logging::{desk_debug, desk_info, desk_warn};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::wire::{InboundFrame, OutboundFrame};

/// What the listener reports back while a session runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveSignal {
    /// Connected and the session id was sent.
    Opened,
    Event(LiveServerEvent),
    TransportError(String),
    /// Always the last signal of a session.
    Closed,
}

pub trait LiveSink: Send + Sync {
    fn emit(&self, signal: LiveSignal);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveCommand {
    Done,
}

/// Handle to a running listener task. Dropping it stops the session.
#[derive(Debug)]
pub struct LiveChannel {
    commands: mpsc::UnboundedSender<LiveCommand>,
    cancel: CancellationToken,
    task: JoinHandle<LiveSession>,
}

impl LiveChannel {
    pub fn spawn(
        runtime: &tokio::runtime::Handle,
        url: String,
        session_id: String,
        sink: Arc<dyn LiveSink>,
    ) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = runtime.spawn(async move {
            run_live_session(&url, &session_id, command_rx, token, sink.as_ref()).await
        });
        Self {
            commands,
            cancel,
            task,
        }
    }

    /// Returns `false` when the session already ended.
    pub fn send_done(&self) -> bool {
        self.commands.send(LiveCommand::Done).is_ok()
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Drive one session from connect to close.
///
/// Returns the final session state, already reset to idle.
pub async fn run_live_session(
    url: &str,
    session_id: &str,
    mut commands: mpsc::UnboundedReceiver<LiveCommand>,
    cancel: CancellationToken,
    sink: &dyn LiveSink,
) -> LiveSession {
    let mut session = LiveSession::new();
    if let Err(err) = session.begin(session_id) {
        sink.emit(LiveSignal::TransportError(err.to_string()));
        sink.emit(LiveSignal::Closed);
        return session;
    }

    desk_info!("Connecting live session {} to {}", session_id, url);
    let connected = tokio::select! {
        _ = cancel.cancelled() => None,
        result = connect_async(url) => Some(result),
    };
    let stream = match connected {
        None => return finish(session, sink),
        Some(Ok((stream, _response))) => stream,
        Some(Err(err)) => {
            return fail(session, sink, format!("could not connect to {url}: {err}"));
        }
    };
    let (mut write, mut read) = stream.split();

    if let Some(id) = session.opened() {
        if let Err(err) = write.send(Message::text(id)).await {
            return fail(session, sink, err.to_string());
        }
        sink.emit(LiveSignal::Opened);
    }

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                desk_debug!("Live session {} cancelled", session_id);
                let _ = write.close().await;
                break;
            }
            command = commands.recv() => match command {
                Some(LiveCommand::Done) => {
                    let frame = match serde_json::to_string(&OutboundFrame::Done) {
                        Ok(frame) => frame,
                        Err(err) => return fail(session, sink, err.to_string()),
                    };
                    if let Err(err) = write.send(Message::text(frame)).await {
                        return fail(session, sink, err.to_string());
                    }
                }
                None => {
                    let _ = write.close().await;
                    break;
                }
            },
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<InboundFrame>(text.as_str()) {
                        Ok(frame) => {
                            let event = LiveServerEvent::from(frame);
                            match session.apply(event.clone()) {
                                LiveAction::Ignore => {}
                                LiveAction::RowAppended { .. } => sink.emit(LiveSignal::Event(event)),
                                LiveAction::Close => {
                                    sink.emit(LiveSignal::Event(event));
                                    let _ = write.close().await;
                                    break;
                                }
                            }
                        }
                        Err(err) => desk_warn!("Ignoring live frame {:?}: {}", text.as_str(), err),
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    desk_info!("Server closed live session: {:?}", frame);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return fail(session, sink, err.to_string()),
                None => break,
            },
        }
    }

    finish(session, sink)
}

fn fail(mut session: LiveSession, sink: &dyn LiveSink, message: String) -> LiveSession {
    desk_warn!("Live session error: {}", message);
    session.fail(message.clone());
    sink.emit(LiveSignal::TransportError(message));
    finish(session, sink)
}

fn finish(mut session: LiveSession, sink: &dyn LiveSink) -> LiveSession {
    session.closed();
    sink.emit(LiveSignal::Closed);
    session
}
