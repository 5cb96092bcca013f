//! Per-command dispatch.
//!
//! Each inbound line moves through parse, validate, execute, respond, and
//! every path converges on re-sending the prompt. Responses for one
//! command are fully written before the session reads the next line, so
//! per-connection ordering holds by construction.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWrite;
use tracing::info;
use uuid::Uuid;

use crate::error::ServerError;
use crate::protocol::{
    ack_line, error_line, failure_block, find_block, help_block, parse, prompt, quit_notice,
    read_block, success_block, validate, write_line, Action, Command, KNOWN_ACTIONS,
};
use crate::socket::ConnectionMetrics;
use crate::store::{FileStore, OperationOutcome};

/// Dispatches command lines for every session.
pub struct Dispatcher {
    store: FileStore,
    metrics: Arc<ConnectionMetrics>,
    prompt_delay: Duration,
}

impl Dispatcher {
    /// Create a dispatcher over a file store.
    pub fn new(store: FileStore, metrics: Arc<ConnectionMetrics>, prompt_delay: Duration) -> Self {
        Self {
            store,
            metrics,
            prompt_delay,
        }
    }

    /// Run one command line through parse, validate, execute, respond.
    ///
    /// Writes the full response sequence for the command, ending with the
    /// prompt. Only transport failures surface as errors; protocol and
    /// filesystem problems are reported to the client and recovered.
    pub async fn dispatch<W>(
        &self,
        session_id: Uuid,
        line: &str,
        writer: &mut W,
    ) -> Result<(), ServerError>
    where
        W: AsyncWrite + Unpin,
    {
        let cmd = parse(line);
        let validation = validate(&cmd, &KNOWN_ACTIONS);

        info!(
            session_id = %session_id,
            valid = validation.valid,
            raw = line,
            "Request received"
        );
        self.metrics.record_command(validation.valid);

        if !validation.valid {
            write_line(writer, &error_line(&validation.message)).await?;
            self.prompt_after_delay(writer).await?;
            return Ok(());
        }

        // validate() and Action::from_token() recognize the same token set
        let Some(action) = cmd.action.as_deref().and_then(Action::from_token) else {
            return Ok(());
        };

        self.execute(session_id, action, &cmd, writer).await?;

        if action == Action::Help {
            write_line(writer, &prompt()).await?;
        } else {
            self.prompt_after_delay(writer).await?;
        }

        Ok(())
    }

    /// Execute a validated command and write its response block.
    async fn execute<W>(
        &self,
        session_id: Uuid,
        action: Action,
        cmd: &Command,
        writer: &mut W,
    ) -> Result<(), ServerError>
    where
        W: AsyncWrite + Unpin,
    {
        // Validation guarantees presence where the action requires them.
        let filename = cmd.filename.as_deref().unwrap_or_default();
        let payload = cmd.payload.as_deref().unwrap_or_default();

        if let Some(ack) = ack_line(action, filename) {
            write_line(writer, &ack).await?;
        }

        match action {
            Action::Help => {
                write_line(writer, &help_block()).await?;
            }
            Action::Quit => {
                // Server-side quit is a validated no-op; disconnecting is
                // client-initiated.
                write_line(writer, &quit_notice()).await?;
            }
            Action::Read => match self.store.read(filename).await {
                OperationOutcome::Success { data } => {
                    let content = data.unwrap_or_default();
                    info!(session_id = %session_id, filename, "Read served");
                    write_line(writer, &read_block(filename, &content)).await?;
                }
                OperationOutcome::Failure { reason } => {
                    write_line(writer, &failure_block(&reason)).await?;
                }
            },
            Action::Write | Action::Append | Action::Delete => {
                let outcome = match action {
                    Action::Write => self.store.write(filename, payload).await,
                    Action::Append => self.store.append(filename, payload).await,
                    _ => self.store.delete(filename).await,
                };

                info!(
                    session_id = %session_id,
                    action = ?action,
                    filename,
                    success = outcome.is_success(),
                    "Command executed"
                );

                match outcome {
                    OperationOutcome::Success { .. } => {
                        if let Some(block) = success_block(action, filename) {
                            write_line(writer, &block).await?;
                        }
                    }
                    OperationOutcome::Failure { reason } => {
                        write_line(writer, &failure_block(&reason)).await?;
                    }
                }
            }
            Action::Find => match self.store.find(filename).await {
                OperationOutcome::Success { data } => {
                    let data = data.unwrap_or_default();
                    let matches: Vec<String> = data.lines().map(String::from).collect();
                    info!(
                        session_id = %session_id,
                        pattern = filename,
                        matches = matches.len(),
                        "Find served"
                    );
                    write_line(writer, &find_block(filename, &matches)).await?;
                }
                OperationOutcome::Failure { reason } => {
                    write_line(writer, &failure_block(&reason)).await?;
                }
            },
        }

        Ok(())
    }

    /// Send the prompt after the configured delay.
    async fn prompt_after_delay<W>(&self, writer: &mut W) -> Result<(), ServerError>
    where
        W: AsyncWrite + Unpin,
    {
        tokio::time::sleep(self.prompt_delay).await;
        write_line(writer, &prompt()).await
    }
}
