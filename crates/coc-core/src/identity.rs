//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout the engine.
//! Each identifier is a distinct type — you cannot pass a [`FileId`]
//! where a [`TransferId`] is expected.
//!
//! UUID-based identifiers are always valid by construction. The
//! string-based [`EvidenceTag`] validates its format at construction time
//! and re-validates on deserialization.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor so that invalid values are
/// rejected at deserialization time — not silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// UUID-based identifiers (always valid by construction)
// ---------------------------------------------------------------------------

/// A unique identifier for a registered user (actor) of the system.
///
/// The engine never resolves these to profiles — authentication and the
/// user catalog live with the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Create a new random user identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a user identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

/// A unique identifier for an evidence item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvidenceId(Uuid);

impl EvidenceId {
    /// Create a new random evidence identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an evidence identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EvidenceId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EvidenceId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EvidenceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

/// A unique identifier for an evidence or analysis file attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(Uuid);

impl FileId {
    /// Create a new random file identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a file identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for FileId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for FileId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

/// A unique identifier for a custody transfer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferId(Uuid);

impl TransferId {
    /// Create a new random transfer identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a transfer identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TransferId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TransferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TransferId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

/// A unique identifier for an analysis record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisId(Uuid);

impl AnalysisId {
    /// Create a new random analysis identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an analysis identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AnalysisId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AnalysisId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

// ---------------------------------------------------------------------------
// EvidenceTag (validated composite business key)
// ---------------------------------------------------------------------------

/// The human-facing composite business key of an evidence item:
/// `{agency}-{case_no}-{item_no}`.
///
/// Globally unique across the registry. Segments are trimmed and must be
/// non-empty with no internal whitespace; the joined form is the
/// uniqueness key, so segments containing `-` remain unambiguous for
/// lookup even though they cannot be split back apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EvidenceTag(String);

impl_validating_deserialize!(EvidenceTag);

impl EvidenceTag {
    /// Validate a pre-joined tag string.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::InvalidEvidenceTag(
                "tag must not be empty".to_string(),
            ));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidEvidenceTag(format!(
                "tag must not contain whitespace: {s:?}"
            )));
        }
        Ok(Self(s))
    }

    /// Compose a tag from its three business segments.
    pub fn compose(agency: &str, case_no: &str, item_no: &str) -> Result<Self, ValidationError> {
        for (label, segment) in [("agency", agency), ("case_no", case_no), ("item_no", item_no)] {
            let trimmed = segment.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::InvalidEvidenceTag(format!(
                    "{label} must not be empty"
                )));
            }
            if trimmed.chars().any(char::is_whitespace) {
                return Err(ValidationError::InvalidEvidenceTag(format!(
                    "{label} must not contain whitespace: {trimmed:?}"
                )));
            }
        }
        Ok(Self(format!(
            "{}-{}-{}",
            agency.trim(),
            case_no.trim(),
            item_no.trim()
        )))
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EvidenceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Roles and actors
// ---------------------------------------------------------------------------

/// The role of an authenticated caller.
///
/// Role assignment and authentication are the caller's concern; the
/// engine only consumes the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Administrative user. For evidence visibility, behaves like a
    /// regular user (creator/custodian scope), not like an auditor.
    #[serde(rename = "ADMIN")]
    Admin,
    /// Field collector; may create evidence.
    #[serde(rename = "COLLECTOR")]
    Collector,
    /// Lab analyst; may create evidence and analyses.
    #[serde(rename = "ANALYST")]
    Analyst,
    /// Read-everything oversight role; may never hold custody actions
    /// it is not custodian for.
    #[serde(rename = "AUDITOR")]
    Auditor,
}

impl Role {
    /// The canonical string name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Collector => "COLLECTOR",
            Self::Analyst => "ANALYST",
            Self::Auditor => "AUDITOR",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "COLLECTOR" => Ok(Self::Collector),
            "ANALYST" => Ok(Self::Analyst),
            "AUDITOR" => Ok(Self::Auditor),
            other => Err(ValidationError::UnknownRole(other.to_string())),
        }
    }
}

/// A pre-authenticated caller identity, as handed to the engine by the
/// transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The caller's user id.
    pub id: UserId,
    /// The caller's role.
    pub role: Role,
}

impl Actor {
    /// Convenience constructor.
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}
