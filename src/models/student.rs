// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Student profile and the registration form that creates it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// Course option that asks for a free-text course name.
pub const OTHER_COURSE: &str = "outro";

/// Student record, persisted under the `student` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub registration_number: String,
    pub course: String,
    pub graduation_year: String,
    pub campus: String,
    /// Blob URL of the uploaded photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    /// `STU-XXXXXX`, generated once at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_code: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub updated_at: DateTime<Utc>,
}

/// Personal-information form submitted on the registration page.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_course"))]
pub struct StudentForm {
    #[validate(length(min = 1, max = 120, message = "Informe um nome de até 120 caracteres"))]
    pub name: String,
    #[validate(email(message = "E-mail inválido"))]
    pub email: String,
    /// Encoded in the card QR code, so it stays short
    #[validate(length(min = 1, max = 32, message = "Informe uma matrícula de até 32 caracteres"))]
    pub registration_number: String,
    /// Course option; `outro` means `other_course` holds the name
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub other_course: Option<String>,
    #[validate(length(min = 1, message = "Ano de formatura é obrigatório"))]
    pub graduation_year: String,
    #[validate(length(min = 1, max = 80, message = "Informe um campus de até 80 caracteres"))]
    pub campus: String,
}

impl StudentForm {
    /// Course name after resolving the `outro` option.
    pub fn resolved_course(&self) -> String {
        if self.course == OTHER_COURSE {
            self.other_course.clone().unwrap_or_default()
        } else {
            self.course.clone()
        }
    }

    /// Trim every text field so whitespace-only input counts as empty.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.registration_number = self.registration_number.trim().to_string();
        self.course = self.course.trim().to_string();
        self.other_course = self.other_course.map(|c| c.trim().to_string());
        self.graduation_year = self.graduation_year.trim().to_string();
        self.campus = self.campus.trim().to_string();
        self
    }
}

fn validate_course(form: &StudentForm) -> Result<(), ValidationError> {
    if form.resolved_course().trim().is_empty() {
        let mut err = ValidationError::new("course_required");
        err.message = Some("Por favor, selecione ou informe seu curso.".into());
        return Err(err);
    }
    Ok(())
}
