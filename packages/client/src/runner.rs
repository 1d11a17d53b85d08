//! Client execution logic.

use std::pin::pin;

use onechat_shared::TransportError;
use tokio::sync::mpsc;

use crate::{
    connection::dial,
    error::ClientError,
    formatter::MessageFormatter,
    input::{InputEvent, spawn_line_reader},
    session::{ClientConfig, InputEnd, Session},
};

/// Join the room at `addr` as `name` and chat from the terminal until the
/// link fails or the user quits.
///
/// There is no reconnection: the first transport failure ends the client.
///
/// # Errors
///
/// Returns the [`ClientError`] that ended the session. Quitting with Ctrl+C
/// is not an error.
pub async fn run_client(addr: &str, name: &str, config: ClientConfig) -> Result<(), ClientError> {
    run_client_with(addr, name, config, spawn_line_reader(), |line| {
        println!("{}", line)
    })
    .await
}

/// [`run_client`] with the input events and the output sink supplied by the caller.
///
/// Once input ends with EOF, received messages are still rendered until
/// the link fails.
pub async fn run_client_with<R>(
    addr: &str,
    name: &str,
    config: ClientConfig,
    mut events: mpsc::UnboundedReceiver<InputEvent>,
    mut render: R,
) -> Result<(), ClientError>
where
    R: FnMut(String),
{
    let link = dial(addr, config.transport).await?;
    let session = Session::handshake(link, name).await?;

    match session.user_id() {
        Some(id) => render(MessageFormatter::format_user_id(id)),
        None => tracing::debug!("Handshake answered without a user id"),
    }

    let (receiver, sender, handle) = session.into_loops(config.poll_interval);
    let mut receiving = pin!(receiver.run(&mut render));

    let result = tokio::select! {
        reason = &mut receiving => Err(ClientError::Transport(reason)),
        end = sender.run(&mut events) => match end {
            // Nothing left to send; keep printing until the link fails.
            Ok(InputEnd::Eof) => Err(ClientError::Transport(receiving.await)),
            Ok(InputEnd::Interrupted) => {
                tracing::info!("Interrupted, leaving the room");
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    handle.close(TransportError::Closed);
    result
}
