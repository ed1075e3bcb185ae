//! Savable session state: the profile collection and its wire format.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATA_POINT: f64 = 0.5;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    From, Into,
)]
#[serde(transparent)]
pub struct ProfileId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: ProfileId,
    pub name: Option<String>,
    pub visible: bool,
    pub data_points: Vec<f64>,
}

impl Profile {
    pub fn new(id: ProfileId, category_count: usize) -> Self {
        Self {
            id,
            name: None,
            visible: true,
            data_points: vec![DEFAULT_DATA_POINT; category_count],
        }
    }

    /// Keeps `data_points` aligned with the category count, clamped to [0, 1].
    pub fn normalize(&mut self, category_count: usize) {
        self.data_points.resize(category_count, DEFAULT_DATA_POINT);
        for value in &mut self.data_points {
            *value = value.clamp(0.0, 1.0);
        }
    }
}

/// Profiles keyed by id. Removal deletes the key, ids are never reused and
/// the current selection lives here rather than in a global.
#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: BTreeMap<ProfileId, Profile>,
    next_id: u64,
    current: Option<ProfileId>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, category_count: usize) -> ProfileId {
        let id = ProfileId::from(self.next_id);
        self.next_id += 1;
        self.profiles.insert(id, Profile::new(id, category_count));
        if self.current.is_none() {
            self.current = Some(id);
        }
        id
    }

    pub fn remove(&mut self, id: ProfileId) -> Option<Profile> {
        let removed = self.profiles.remove(&id);
        if self.current == Some(id) {
            self.current = None;
        }
        removed
    }

    pub fn get(&self, id: ProfileId) -> Option<&Profile> {
        self.profiles.get(&id)
    }

    pub fn get_mut(&mut self, id: ProfileId) -> Option<&mut Profile> {
        self.profiles.get_mut(&id)
    }

    pub fn current_id(&self) -> Option<ProfileId> {
        self.current
    }

    pub fn current(&self) -> Option<&Profile> {
        self.current.and_then(|id| self.profiles.get(&id))
    }

    pub fn current_mut(&mut self) -> Option<&mut Profile> {
        self.current.and_then(|id| self.profiles.get_mut(&id))
    }

    pub fn set_current(&mut self, id: ProfileId) -> bool {
        if self.profiles.contains_key(&id) {
            self.current = Some(id);
            true
        } else {
            false
        }
    }

    /// Moves the current selection to the next profile in id order,
    /// wrapping around.
    pub fn cycle_current(&mut self) {
        let next = match self.current {
            Some(id) => self
                .profiles
                .range((std::ops::Bound::Excluded(id), std::ops::Bound::Unbounded))
                .next()
                .or_else(|| self.profiles.iter().next())
                .map(|(id, _)| *id),
            None => self.profiles.keys().next().copied(),
        };
        self.current = next;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.profiles.clear();
        self.current = None;
    }

    fn insert_loaded(&mut self, profile: Profile) {
        self.next_id = self.next_id.max(u64::from(profile.id) + 1);
        self.profiles.insert(profile.id, profile);
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed session data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("no data directory available")]
    DataDirNotFound,
}

/// Wire format of one profile entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfile {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    pub is_visible: bool,
    pub data_points: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct SessionData {
    pub profiles: Vec<SessionProfile>,
    #[serde(rename = "currentProfileID")]
    pub current_profile_id: Option<u64>,
    #[serde(rename = "activeCategoryCorners")]
    pub active_category_corners: Vec<usize>,
}

/// Top-level shape check happens on this loose form so one bad profile
/// entry cannot fail the whole decode.
#[derive(Debug, Deserialize)]
struct RawSession {
    profiles: Vec<serde_json::Value>,
    #[serde(rename = "currentProfileID")]
    current_profile_id: Option<u64>,
    #[serde(rename = "activeCategoryCorners")]
    active_category_corners: Vec<serde_json::Value>,
}

/// A fully validated session, ready to apply. Per-item failures have been
/// skipped and logged; `corners[i] == None` leaves category `i` untouched.
#[derive(Debug)]
pub struct LoadedSession {
    pub profiles: Vec<SessionProfile>,
    pub current_profile_id: Option<u64>,
    pub corners: Vec<Option<usize>>,
}

/// Decodes and validates a session payload without touching any live state.
pub fn decode_session(payload: &str) -> Result<LoadedSession, SessionError> {
    let raw: RawSession = serde_json::from_str(payload)?;

    let mut profiles = Vec::with_capacity(raw.profiles.len());
    for (i, value) in raw.profiles.into_iter().enumerate() {
        match serde_json::from_value::<SessionProfile>(value) {
            Ok(profile) => profiles.push(profile),
            Err(e) => log::warn!("skipping invalid profile at index {i}: {e}"),
        }
    }

    let corners = raw
        .active_category_corners
        .into_iter()
        .enumerate()
        .map(|(i, value)| match value.as_u64() {
            Some(corner) if corner <= 2 => Some(corner as usize),
            _ => {
                log::warn!("skipping invalid corner index for category {i}: {value}");
                None
            }
        })
        .collect();

    Ok(LoadedSession {
        profiles,
        current_profile_id: raw.current_profile_id,
        corners,
    })
}

/// Replaces the store contents with a validated session. Data points are
/// resized and clamped to the current category count.
pub fn apply_profiles(store: &mut ProfileStore, loaded: &LoadedSession, category_count: usize) {
    store.clear();

    for entry in &loaded.profiles {
        let mut profile = Profile {
            id: ProfileId::from(entry.id),
            name: entry.name.clone(),
            visible: entry.is_visible,
            data_points: entry.data_points.clone(),
        };
        profile.normalize(category_count);
        store.insert_loaded(profile);
    }

    if let Some(id) = loaded.current_profile_id
        && !store.set_current(ProfileId::from(id))
    {
        log::warn!("current profile {id} not present in loaded session");
    }
}

pub fn default_session_path() -> Result<PathBuf, SessionError> {
    let dirs = directories::ProjectDirs::from("org", "motivrad", "motivrad")
        .ok_or(SessionError::DataDirNotFound)?;
    Ok(dirs.data_dir().join("session.json"))
}

pub fn load_from_file(path: &Path) -> Result<LoadedSession, SessionError> {
    let payload = fs_err::read_to_string(path)?;
    decode_session(&payload)
}

pub fn save_to_file(path: &Path, data: &SessionData) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    let payload = serde_json::to_string_pretty(data)?;
    fs_err::write(path, payload)?;
    Ok(())
}
