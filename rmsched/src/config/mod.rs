/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Configuration loading for `rmsched` and `rmsched-worker`.
//!
//! Every key is optional; a missing file section falls back to the built-in
//! defaults, so an empty file is a valid configuration.
//!
//! The expected YAML structure is:
//! ```yaml
//! analysis:
//!   max_horizon: 1000000
//! remote:
//!   host: "localhost"
//!   port: 50060
//!   max_frame_bytes: 1048576
//! output:
//!   blank_lines_between_reports: 2
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::analysis::{AnalysisLimits, DEFAULT_MAX_HORIZON};
use crate::protocol::{FrameCodec, DEFAULT_MAX_FRAME_BYTES, DEFAULT_PORT};

// ── Sections ──────────────────────────────────────────────────────────────────

/// Limits applied by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisSection {
    /// Largest hyperperiod that is simulated tick by tick.
    pub max_horizon: u64,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            max_horizon: DEFAULT_MAX_HORIZON,
        }
    }
}

/// Where the remote worker lives and how large a frame may be.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteSection {
    pub host: String,
    pub port: u16,
    pub max_frame_bytes: usize,
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: DEFAULT_PORT,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub blank_lines_between_reports: usize,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            blank_lines_between_reports: 2,
        }
    }
}

// ── SchedConfig ───────────────────────────────────────────────────────────────

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedConfig {
    pub analysis: AnalysisSection,
    pub remote: RemoteSection,
    pub output: OutputSection,
}

impl SchedConfig {
    /// Parse `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, the YAML is invalid or
    /// a value is out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        debug!(
            max_horizon = config.analysis.max_horizon,
            host = %config.remote.host,
            port = config.remote.port,
            max_frame_bytes = config.remote.max_frame_bytes,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Parse YAML text.  An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: SchedConfig = if content.trim().is_empty() {
            SchedConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.analysis.max_horizon == 0 {
            bail!("analysis.max_horizon must be at least 1");
        }
        if self.remote.max_frame_bytes == 0 {
            bail!("remote.max_frame_bytes must be at least 1");
        }
        Ok(())
    }

    pub fn analysis_limits(&self) -> AnalysisLimits {
        AnalysisLimits {
            max_horizon: self.analysis.max_horizon,
        }
    }

    pub fn frame_codec(&self) -> FrameCodec {
        FrameCodec::new(self.remote.max_frame_bytes)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
