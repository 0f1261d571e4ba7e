use super::{EditorSession, SessionState};
use crate::dsl::{DslMode, EditorMeta};
use crate::error::SnapshotError;
use crate::tree::{BlockView, Forest, ForestRole};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// A point-in-time copy of a session, including unsaved visual edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub mode: DslMode,
    pub meta: EditorMeta,
    pub state: SessionState,
    pub statements: Vec<BlockView>,
    pub preconditions: Vec<BlockView>,
    pub source: Option<String>,
}

impl SessionSnapshot {
    /// Saves the snapshot to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), SnapshotError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })?;
        file.write_all(&bytes).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })?;
        Ok(())
    }

    /// Loads a snapshot from a file.
    pub fn from_file(path: &str) -> Result<Self, SnapshotError> {
        let mut file = fs::File::open(path).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|source| SnapshotError::Io {
                path: path.to_string(),
                source,
            })?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        encode_to_vec(self, standard()).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        decode_from_slice(bytes, standard())
            .map(|(snapshot, _)| snapshot)
            .map_err(|e| SnapshotError::Decode(e.to_string()))
    }
}

impl EditorSession {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            meta: self.meta.clone(),
            state: self.state,
            statements: self.statements.to_views(),
            preconditions: self.preconditions.to_views(),
            source: self.source.clone(),
        }
    }

    /// Rebuilds a session from a snapshot. Block ids are kept and new ids are drawn
    /// past the largest restored one. Listeners are not part of a snapshot.
    pub fn restore(snapshot: SessionSnapshot) -> Self {
        let mut session = EditorSession::new(snapshot.mode, snapshot.meta);
        session.statements = Forest::from_views(ForestRole::Statements, &snapshot.statements);
        session.preconditions =
            Forest::from_views(ForestRole::Preconditions, &snapshot.preconditions);
        for (_, block) in session
            .statements
            .walk()
            .into_iter()
            .chain(session.preconditions.walk())
        {
            session.ids.reserve_past(block.id);
        }
        session.source = snapshot.source;
        session.state = snapshot.state;
        session.regenerate();
        session
    }
}
