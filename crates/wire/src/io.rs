// SPDX-License-Identifier: MIT

//! Async read/write helpers over a connected socket, in the idiom of this
//! corpus's other length-prefixed wire crate, adapted to this protocol's
//! chunked-read-is-one-message framing.

use crate::error::ProtocolFrameError;
use crate::frame::{decode_frame, Frame, MAX_READ_SIZE};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Reads up to `MAX_READ_SIZE` bytes and decodes them as one frame.
/// Returns `Ok(None)` when the peer has closed the connection (a zero-byte
/// read), matching the original `while True: data = recv(2048); if not
/// data: break` loop.
pub async fn read_frame<R: AsyncRead + Unpin>(
    stream: &mut R,
) -> Result<Option<Frame>, ProtocolFrameError> {
    let mut buf = vec![0u8; MAX_READ_SIZE];
    let n = stream.read(&mut buf).await?;
    if n == 0 {
        return Ok(None);
    }
    buf.truncate(n);
    Ok(Some(decode_frame(&buf)?))
}

/// Writes a response payload with no additional framing — the deployment
/// protocol's responses are bare XML, `connection.sendall(response)` in
/// the original.
pub async fn write_response<W: AsyncWrite + Unpin>(
    stream: &mut W,
    response: &[u8],
) -> Result<(), ProtocolFrameError> {
    stream.write_all(response).await?;
    stream.flush().await?;
    Ok(())
}
