//! Entity lifecycle status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status carried by every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "released")]
    Released,
    #[serde(rename = "deleted")]
    Deleted,
    #[serde(rename = "replaced")]
    Replaced,
    #[serde(rename = "revoked")]
    Revoked,
    #[serde(rename = "obsolete")]
    Obsolete,
    #[serde(rename = "uploading")]
    Uploading,
    #[serde(rename = "upload failed")]
    UploadFailed,
}

impl Status {
    /// Statuses that every audit rule skips.
    pub const RETIRED: &'static [Status] = &[Status::Deleted, Status::Replaced, Status::Revoked];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in progress",
            Self::Released => "released",
            Self::Deleted => "deleted",
            Self::Replaced => "replaced",
            Self::Revoked => "revoked",
            Self::Obsolete => "obsolete",
            Self::Uploading => "uploading",
            Self::UploadFailed => "upload failed",
        }
    }

    /// True for deleted, replaced and revoked records.
    pub fn is_retired(&self) -> bool {
        Self::RETIRED.contains(self)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
