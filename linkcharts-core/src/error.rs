// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Analysis error types
//!
//! The analyses themselves are infallible: missing endpoints are dropped and
//! absent paths are `None`. Only loading snapshots and configuration can fail.

use thiserror::Error;

/// Result type for fallible loading operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors raised while loading snapshots or configuration
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration file could not be decoded
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    /// Configuration decoded but holds an unusable value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for AnalysisError {
    fn from(e: serde_json::Error) -> Self {
        AnalysisError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for AnalysisError {
    fn from(e: toml::de::Error) -> Self {
        AnalysisError::ConfigParse(e.to_string())
    }
}
