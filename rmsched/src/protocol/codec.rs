/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Length-prefixed framing.
//!
//! ```text
//! ┌──────────────────────┬───────────────────────────┐
//! │ length: u32 (big-end) │ payload: `length` bytes   │
//! └──────────────────────┴───────────────────────────┘
//! ```
//!
//! The byte order is fixed so that requester and responder agree regardless
//! of the host architecture.  Every read is exact: a peer that closes the
//! stream mid-frame surfaces as `UnexpectedEof`.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::ProtocolError;

/// Default upper bound on a single frame payload (1 MiB).
pub const DEFAULT_MAX_FRAME_BYTES: usize = 1 << 20;

/// Frame reader / writer over any async byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCodec {
    max_frame_bytes: usize,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_BYTES)
    }
}

impl FrameCodec {
    pub fn new(max_frame_bytes: usize) -> Self {
        Self { max_frame_bytes }
    }

    pub fn max_frame_bytes(&self) -> usize {
        self.max_frame_bytes
    }

    /// Header + payload as one buffer, so the frame goes out in a single
    /// `write_all`.
    pub fn encode_frame(&self, payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        let len = self.check_len(payload.len())?;
        let mut frame = Vec::with_capacity(4 + payload.len());
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(payload);
        Ok(frame)
    }

    /// Write one frame and flush it.
    pub async fn write_frame<W>(&self, writer: &mut W, payload: &[u8]) -> Result<(), ProtocolError>
    where
        W: AsyncWrite + Unpin,
    {
        let frame = self.encode_frame(payload)?;
        writer.write_all(&frame).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Read exactly one frame.
    pub async fn read_frame<R>(&self, reader: &mut R) -> Result<Vec<u8>, ProtocolError>
    where
        R: AsyncRead + Unpin,
    {
        let len = reader.read_u32().await? as usize;
        if len > self.max_frame_bytes {
            return Err(ProtocolError::FrameTooLarge {
                len,
                limit: self.max_frame_bytes,
            });
        }

        let mut payload = vec![0u8; len];
        reader.read_exact(&mut payload).await?;
        Ok(payload)
    }

    fn check_len(&self, len: usize) -> Result<u32, ProtocolError> {
        if len > self.max_frame_bytes {
            return Err(ProtocolError::FrameTooLarge {
                len,
                limit: self.max_frame_bytes,
            });
        }
        u32::try_from(len).map_err(|_| ProtocolError::FrameTooLarge {
            len,
            limit: u32::MAX as usize,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn header_is_big_endian() {
        let frame = FrameCodec::default().encode_frame(b"A 1 4").unwrap();
        assert_eq!(&frame[..4], &[0, 0, 0, 5]);
        assert_eq!(&frame[4..], b"A 1 4");
    }

    #[tokio::test]
    async fn frame_crosses_a_stream_unchanged() {
        let codec = FrameCodec::default();
        let (mut client, mut server) = tokio::io::duplex(64);

        let line = "A 1 3 B 1 4 C 2 6 \t ünïcödé";
        let writer = tokio::spawn(async move {
            codec.write_frame(&mut client, line.as_bytes()).await.unwrap();
        });

        let got = codec.read_frame(&mut server).await.unwrap();
        writer.await.unwrap();
        assert_eq!(String::from_utf8(got).unwrap(), line);
    }

    #[tokio::test]
    async fn empty_frame_is_allowed() {
        let codec = FrameCodec::default();
        let (mut client, mut server) = tokio::io::duplex(16);
        codec.write_frame(&mut client, b"").await.unwrap();
        assert!(codec.read_frame(&mut server).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn short_header_is_an_io_error() {
        let codec = FrameCodec::default();
        let (mut client, mut server) = tokio::io::duplex(16);
        client.write_all(&[0, 0]).await.unwrap();
        drop(client);

        match codec.read_frame(&mut server).await {
            Err(ProtocolError::Io(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
            other => panic!("expected UnexpectedEof, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn short_payload_is_an_io_error() {
        let codec = FrameCodec::default();
        let (mut client, mut server) = tokio::io::duplex(16);
        client.write_all(&[0, 0, 0, 10, b'A', b' ']).await.unwrap();
        drop(client);

        assert!(matches!(
            codec.read_frame(&mut server).await,
            Err(ProtocolError::Io(_))
        ));
    }

    #[tokio::test]
    async fn oversized_frame_is_rejected_before_allocation() {
        let codec = FrameCodec::new(4);
        let (mut client, mut server) = tokio::io::duplex(16);
        client.write_all(&[0, 0, 0, 10]).await.unwrap();

        assert!(matches!(
            codec.read_frame(&mut server).await,
            Err(ProtocolError::FrameTooLarge { len: 10, limit: 4 })
        ));
    }

    #[test]
    fn oversized_payload_is_not_encoded() {
        let codec = FrameCodec::new(2);
        assert!(matches!(
            codec.encode_frame(b"abc"),
            Err(ProtocolError::FrameTooLarge { len: 3, limit: 2 })
        ));
    }
}
