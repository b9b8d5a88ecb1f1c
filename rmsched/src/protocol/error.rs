/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Transport-level failures of the remote protocol.
//!
//! Every variant is fatal for the requesting process: the exchange is not
//! retried at this layer.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Name resolution failed or the peer refused the connection.
    #[error("cannot connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Short read / write or any other socket failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A frame header announced more bytes than the configured limit.
    #[error("frame of {len} bytes exceeds the {limit}-byte limit")]
    FrameTooLarge { len: usize, limit: usize },

    #[error("frame is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The response text does not follow `<utilization> <horizon> <payload>`.
    #[error("malformed response '{payload}': {reason}")]
    MalformedResponse {
        payload: String,
        reason: &'static str,
    },
}
