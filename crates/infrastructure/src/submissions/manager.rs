use super::ParticipantSubmissions;
use crate::{Error, Result};
use leaderboard_domain::{is_legal_filename, ParticipantError, ParticipantName};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Registry of participants backed by the submissions directory.
///
/// Participants whose directories disappear are pruned on the next
/// [`participants`](Self::participants) access. Directories created out of
/// band are only picked up by [`reload_participants`](Self::reload_participants).
#[derive(Debug)]
pub struct SubmissionManager {
    root: PathBuf,
    participants: BTreeMap<String, ParticipantSubmissions>,
}

impl SubmissionManager {
    /// Open the submissions directory, creating it if needed, and load every
    /// participant found in it.
    #[instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(Error::io(&root))?;

        let mut manager = Self {
            root,
            participants: BTreeMap::new(),
        };
        manager.reload_participants()?;
        info!(participants = manager.participants.len(), "submission manager ready");
        Ok(manager)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rescan the submissions directory.
    ///
    /// Participants already loaded keep their cached results.
    pub fn reload_participants(&mut self) -> Result<()> {
        let mut found = BTreeMap::new();
        for entry in fs::read_dir(&self.root).map_err(Error::io(&self.root))? {
            let entry = entry.map_err(Error::io(&self.root))?;
            if !entry.file_type().map_err(Error::io(entry.path()))?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 directory");
                continue;
            };
            if !is_legal_filename(&name) {
                warn!(name = %name, "skipping directory with illegal participant name");
                continue;
            }

            let participant = match self.participants.remove(&name) {
                Some(existing) => existing,
                None => ParticipantSubmissions::open(entry.path())?,
            };
            found.insert(name, participant);
        }

        self.participants = found;
        debug!(participants = self.participants.len(), "participants reloaded");
        Ok(())
    }

    /// Registered participants, after pruning those deleted from disk.
    pub fn participants(&mut self) -> &BTreeMap<String, ParticipantSubmissions> {
        self.prune_deleted();
        &self.participants
    }

    /// Mutable access to every registered participant, after pruning.
    pub fn participants_mut(&mut self) -> impl Iterator<Item = &mut ParticipantSubmissions> {
        self.prune_deleted();
        self.participants.values_mut()
    }

    /// Register a participant and create its directory.
    ///
    /// Fails with `InvalidName` for names that are not legal file names and
    /// with `AlreadyExists` for a registered name unless `exists_ok` is set.
    #[instrument(skip(self))]
    pub fn add_participant(
        &mut self,
        name: &str,
        exists_ok: bool,
    ) -> Result<&mut ParticipantSubmissions> {
        let name = ParticipantName::parse(name)?.into_inner();

        if self.participants.contains_key(&name) {
            if !exists_ok {
                return Err(ParticipantError::AlreadyExists(name).into());
            }
        } else {
            let participant = ParticipantSubmissions::open(self.root.join(&name))?;
            info!(participant = %name, "participant registered");
            self.participants.insert(name.clone(), participant);
        }

        self.participants
            .get_mut(&name)
            .ok_or_else(|| ParticipantError::NotFound(name).into())
    }

    pub fn get_participant(&self, name: &str) -> Option<&ParticipantSubmissions> {
        self.participants.get(name)
    }

    pub fn get_participant_mut(&mut self, name: &str) -> Option<&mut ParticipantSubmissions> {
        self.participants.get_mut(name)
    }

    pub fn participant_exists(&self, name: &str) -> bool {
        self.participants.contains_key(name)
    }

    fn prune_deleted(&mut self) {
        self.participants.retain(|name, participant| {
            let exists = participant.exists();
            if !exists {
                info!(participant = %name, "participant directory removed, pruning");
            }
            exists
        });
    }
}
