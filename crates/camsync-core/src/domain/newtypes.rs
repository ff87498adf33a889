//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for the identifiers that flow
//! through the orchestrator. Each newtype ensures data validity at
//! construction time, so an invalid package name can never reach a shell
//! command or a derived directory path.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// ContentRef
// ============================================================================

/// An opaque locator for user-selected content
///
/// The orchestrator never interprets the locator itself; it is handed to an
/// `IContentResolver` during staging. The only requirement is that it is
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentRef(String);

impl ContentRef {
    /// Create a new ContentRef, rejecting blank locators
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::InvalidContentRef(
                "locator cannot be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Get the locator as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContentRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ContentRef {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContentRef> for String {
    fn from(value: ContentRef) -> Self {
        value.0
    }
}

// ============================================================================
// TargetPackage
// ============================================================================

/// Identifier of the target application (e.g. `com.example.app`)
///
/// The package becomes a single path component of the private per-app
/// directory, so it must not be empty, contain `/` or NUL, or be one of the
/// relative components `.` and `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetPackage(String);

impl TargetPackage {
    /// Create a new TargetPackage after validating it is a safe path component
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidPackage(
                "package cannot be empty".to_string(),
            ));
        }
        if trimmed == "." || trimmed == ".." {
            return Err(DomainError::InvalidPackage(format!(
                "'{trimmed}' is not a valid package"
            )));
        }
        if trimmed.contains('/') || trimmed.contains('\0') {
            return Err(DomainError::InvalidPackage(format!(
                "'{trimmed}' must not contain path separators"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Get the package identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TargetPackage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TargetPackage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TargetPackage {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TargetPackage> for String {
    fn from(value: TargetPackage) -> Self {
        value.0
    }
}

// ============================================================================
// TargetApp
// ============================================================================

/// The application the synced media and private directory are bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetApp {
    /// Package identifier
    pub package: TargetPackage,
    /// Human-readable label (defaults to the package identifier)
    pub label: String,
}

impl TargetApp {
    /// Create a target with an explicit label
    pub fn new(package: TargetPackage, label: impl Into<String>) -> Self {
        Self {
            package,
            label: label.into(),
        }
    }

    /// Create a target whose label is its package identifier
    pub fn from_package(package: TargetPackage) -> Self {
        let label = package.as_str().to_string();
        Self { package, label }
    }
}
