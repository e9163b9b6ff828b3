//=========================================================================
// File Profile Store
//=========================================================================
//
// One pretty-printed JSON file per user under a root directory:
//
//   <root>/<user-id>.json   { "userId": "...", "gameState": { ... } }
//
// The file name keeps ASCII letters, digits and `-`; every other byte of
// the id (including `_`) becomes `_xx` hex, so distinct ids never share a
// file and no id can leave the root directory.
//
// Writes go to a sibling temp file and are renamed into place, so a crash
// mid-write leaves the previous profile intact.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::{PersistenceError, Profile, ProfileStore, UserId};

//=== On-disk Record ======================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileRecord {
    user_id: String,
    game_state: Option<serde_json::Value>,
}

//=== FileProfileStore ====================================================

#[derive(Debug, Clone)]
pub struct FileProfileStore {
    root: PathBuf,
}

impl FileProfileStore {
    /// Opens (creating if needed) a profile directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, user: &UserId) -> PathBuf {
        self.root.join(format!("{}.json", encode_file_stem(user.as_str())))
    }
}

/// Injective, single-segment encoding of a user id.
fn encode_file_stem(id: &str) -> String {
    let mut stem = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("_{:02x}", byte));
        }
    }
    stem
}

impl ProfileStore for FileProfileStore {
    fn fetch_profile(&self, user: &UserId) -> Result<Option<Profile>, PersistenceError> {
        let path = self.path_for(user);
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: ProfileRecord = serde_json::from_str(&source)?;
        if record.user_id != user.as_str() {
            warn!(
                "Profile file {} belongs to {}, not {}",
                path.display(),
                record.user_id,
                user
            );
            return Ok(None);
        }

        Ok(Some(Profile {
            user_id: user.clone(),
            game_state: record.game_state,
        }))
    }

    fn save_profile(&self, user: &UserId, game_state: serde_json::Value) -> Result<(), PersistenceError> {
        let path = self.path_for(user);
        let record = ProfileRecord {
            user_id: user.as_str().to_owned(),
            game_state: Some(game_state),
        };

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&record)?)?;
        fs::rename(&tmp, &path)?;

        debug!("Wrote profile {}", path.display());
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
