//! Per-connection session handler.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::BufReader;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Settings;
use crate::dispatch::Dispatcher;
use crate::error::{ProtocolErrorKind, ServerError};
use crate::protocol::{banner, prompt, read_line, write_line};

/// Handle a single client session.
///
/// Sends the greeting, then processes command lines one at a time: the
/// next line is not read until the current command's response and prompt
/// are fully written, so responses are delivered in the order their
/// commands were received. Returns when the peer disconnects.
pub async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    settings: Arc<Settings>,
    dispatcher: Arc<Dispatcher>,
) -> Result<(), ServerError> {
    let session_id = Uuid::new_v4();
    info!(session_id = %session_id, peer = %peer_addr, "Client connected");

    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    // Greeting: banner, then the prompt after a minimal delay so the two
    // arrive as distinct writes.
    write_line(&mut writer, &banner()).await?;
    tokio::time::sleep(Duration::from_millis(settings.limits.prompt_delay_ms)).await;
    write_line(&mut writer, &prompt()).await?;

    loop {
        let line = match read_line(&mut reader, settings.limits.max_line_bytes).await {
            Ok(line) => line,
            Err(ServerError::Protocol {
                kind: ProtocolErrorKind::ConnectionClosed,
            }) => {
                info!(session_id = %session_id, peer = %peer_addr, "Client disconnected");
                return Ok(());
            }
            Err(ServerError::Protocol {
                kind: kind @ ProtocolErrorKind::LineTooLong { .. },
            }) => {
                // The stream cannot be resynchronized mid-line; drop the session.
                warn!(session_id = %session_id, peer = %peer_addr, error = %kind, "Dropping session");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        debug!(session_id = %session_id, line = %line, "Line received");
        match dispatcher.dispatch(session_id, &line, &mut writer).await {
            Ok(()) => {}
            // Peer went away mid-response; the in-flight result is discarded.
            Err(ServerError::Io(e)) if is_disconnect(&e) => {
                info!(session_id = %session_id, peer = %peer_addr, "Client disconnected mid-response");
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    }
}

fn is_disconnect(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
    )
}
