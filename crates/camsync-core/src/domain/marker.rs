//! Marker file definitions
//!
//! Marker files are zero-byte sentinels whose presence configures the
//! external camera hook. The set is closed: identity is by enum member, so a
//! typo can never create a phantom marker. Filenames are a bit-exact contract
//! with the hook and must not change.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// One of the five marker files understood by the camera hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Marker {
    /// Disable the hook module entirely
    DisableModule,
    /// Suppress the hook's toast messages
    SuppressToasts,
    /// Show a toast with the directory the hook reads from
    ForcePathToast,
    /// Read media from a per-app subdirectory of the base directory
    PrivatePerAppDirectory,
    /// Allow video audio playback
    EnableAudio,
}

impl Marker {
    /// Every marker, in display order
    pub const ALL: [Marker; 5] = [
        Marker::DisableModule,
        Marker::SuppressToasts,
        Marker::ForcePathToast,
        Marker::PrivatePerAppDirectory,
        Marker::EnableAudio,
    ];

    /// Filename of the marker inside its directory
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Marker::DisableModule => "disable.jpg",
            Marker::SuppressToasts => "no_toast.jpg",
            Marker::ForcePathToast => "force_show.jpg",
            Marker::PrivatePerAppDirectory => "private_dir.jpg",
            Marker::EnableAudio => "no-silent.jpg",
        }
    }

    /// Short human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Marker::DisableModule => "Disable module",
            Marker::SuppressToasts => "Hide toasts",
            Marker::ForcePathToast => "Force path toast",
            Marker::PrivatePerAppDirectory => "Private dir per app",
            Marker::EnableAudio => "Enable audio",
        }
    }

    /// One-line description of the effect on the hook
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Marker::DisableModule => "Disable the camera hook module",
            Marker::SuppressToasts => "Suppress module toast messages",
            Marker::ForcePathToast => "Show the camera directory in a toast",
            Marker::PrivatePerAppDirectory => "Use a private camera directory per target app",
            Marker::EnableAudio => "Allow video audio if supported",
        }
    }

    /// Stable kebab-case key used in configuration and on the command line
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Marker::DisableModule => "disable-module",
            Marker::SuppressToasts => "suppress-toasts",
            Marker::ForcePathToast => "force-path-toast",
            Marker::PrivatePerAppDirectory => "private-per-app-directory",
            Marker::EnableAudio => "enable-audio",
        }
    }

    /// Whether this marker is an input to active directory derivation
    ///
    /// Such a marker lives in the base directory, never in the derived one.
    #[must_use]
    pub const fn is_directory_input(self) -> bool {
        matches!(self, Marker::PrivatePerAppDirectory)
    }
}

impl Display for Marker {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Marker {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Marker::ALL
            .into_iter()
            .find(|m| m.key() == needle || m.file_name() == needle)
            .ok_or_else(|| DomainError::UnknownMarker(needle.to_string()))
    }
}

/// Presence of every marker file
///
/// Always total over [`Marker::ALL`]; markers default to absent until probed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerStates(BTreeMap<Marker, bool>);

impl MarkerStates {
    /// All markers absent
    #[must_use]
    pub fn new() -> Self {
        Self(Marker::ALL.into_iter().map(|m| (m, false)).collect())
    }

    /// Whether the marker is present
    #[must_use]
    pub fn get(&self, marker: Marker) -> bool {
        self.0.get(&marker).copied().unwrap_or(false)
    }

    /// Record the presence of a marker
    pub fn set(&mut self, marker: Marker, present: bool) {
        self.0.insert(marker, present);
    }

    /// Iterate over every marker and its presence, in display order
    pub fn iter(&self) -> impl Iterator<Item = (Marker, bool)> + '_ {
        Marker::ALL.into_iter().map(|m| (m, self.get(m)))
    }
}

impl Default for MarkerStates {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(Marker, bool)> for MarkerStates {
    fn from_iter<I: IntoIterator<Item = (Marker, bool)>>(iter: I) -> Self {
        let mut states = Self::new();
        for (marker, present) in iter {
            states.set(marker, present);
        }
        states
    }
}
