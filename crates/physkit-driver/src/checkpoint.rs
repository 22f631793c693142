//! Checkpoint serialization for restart and replay.
//!
//! A checkpoint is the driver clock followed by a driver-specific payload,
//! serialized with `bincode` for compact binary output. The clock comes
//! first so tools can read it without knowing the payload type.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use physkit_types::{PhysError, PhysResult, Scalar};

/// Driver clock at the moment a checkpoint was taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckpointHeader {
    /// Frame the driver resumes at.
    pub frame: u32,
    pub time_within_frame: Scalar,
    /// Simulation time since the start frame.
    pub elapsed: Scalar,
}

impl CheckpointHeader {
    /// Decodes only the clock of an encoded checkpoint.
    pub fn from_bytes(data: &[u8]) -> PhysResult<Self> {
        bincode::deserialize(data)
            .map_err(|e| PhysError::Serialization(format!("checkpoint header: {e}")))
    }

    /// Reads only the clock of a checkpoint file.
    pub fn load<P: AsRef<Path>>(path: P) -> PhysResult<Self> {
        Self::from_bytes(&std::fs::read(path)?)
    }
}

/// A complete restartable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint<T> {
    pub header: CheckpointHeader,
    pub payload: T,
}

impl<T> Checkpoint<T> {
    pub fn new(header: CheckpointHeader, payload: T) -> Self {
        Self { header, payload }
    }
}

impl<T: Serialize> Checkpoint<T> {
    /// Serializes to compact binary format.
    pub fn to_bytes(&self) -> PhysResult<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| PhysError::Serialization(format!("checkpoint encode: {e}")))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> PhysResult<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

impl<T: DeserializeOwned> Checkpoint<T> {
    /// Deserializes from binary format.
    pub fn from_bytes(data: &[u8]) -> PhysResult<Self> {
        bincode::deserialize(data)
            .map_err(|e| PhysError::Serialization(format!("checkpoint decode: {e}")))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> PhysResult<Self> {
        Self::from_bytes(&std::fs::read(path)?)
    }
}
