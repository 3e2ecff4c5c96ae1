// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Supporting documents uploaded during registration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kind of supporting document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum DocumentType {
    ResidenceProof,
    IncomeProof,
    EnrollmentProof,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::ResidenceProof,
        DocumentType::IncomeProof,
        DocumentType::EnrollmentProof,
    ];

    /// Wire name as used in the persisted records and routes.
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::ResidenceProof => "residenceProof",
            DocumentType::IncomeProof => "incomeProof",
            DocumentType::EnrollmentProof => "enrollmentProof",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown document type: {}", s))
    }
}

/// Review state. Nothing in this service moves a document out of `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum DocumentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Uploaded document, persisted as part of the `documents` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Document {
    pub id: String,
    pub student_id: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub file_url: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub updated_at: DateTime<Utc>,
}
