// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! ID card layout, download and share.
//!
//! The card is built in two steps: [`CardLayout::build`] turns a student
//! record into plain display data, then a [`Rasterizer`] draws it. The
//! service glues them together and materializes the profile photo from the
//! blob store before rasterizing, so a missing or broken photo falls back to
//! the placeholder glyph instead of a blank area.

use chrono::{NaiveDate, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::BlobStore;
use crate::models::{CardColor, Notice, NoticeCode, Student};
use crate::services::raster::{RenderError, Rasterizer};
use crate::services::share::{ShareError, ShareTarget};
use crate::time_utils::{add_months, format_br_date};

/// Months a card stays valid, counted from the day it is rendered.
pub const VALIDITY_MONTHS: u32 = 6;
/// Device-pixel scale of exported cards.
pub const EXPORT_SCALE: u32 = 2;
/// JPEG quality of exported cards (1.0 in browser terms).
pub const JPEG_QUALITY: u8 = 100;
/// File name used when sharing.
pub const SHARE_FILE_NAME: &str = "carteirinha.jpg";
pub const SHARE_TITLE: &str = "Minha Carteirinha MOVES SSP";

/// Start of the transport semester printed on the card.
pub fn semester_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 1).unwrap_or_default()
}

/// Text encoded in the card's QR code.
pub fn qr_payload(tag: &str, registration_number: &str, unique_code: &str) -> String {
    format!("{}:{}:{}", tag, registration_number, unique_code)
}

/// Download file name for a registration number.
pub fn download_file_name(registration_number: &str) -> String {
    let suffix = if registration_number.trim().is_empty() {
        "estudante"
    } else {
        registration_number
    };
    format!("carteirinha-{}.jpg", suffix)
}

/// Display data for one card. Pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CardLayout {
    pub title: String,
    pub subtitle: String,
    pub name: String,
    /// Blob URL of the photo, if the student uploaded one
    pub photo_url: Option<String>,
    /// `<course> • <graduationYear>`
    pub course_line: String,
    /// `Campus: <campus>`
    pub campus_line: String,
    pub registration_number: String,
    pub unique_code: String,
    /// `dd/mm/yyyy`, today plus six months
    pub valid_until: String,
    pub semester_start: String,
    pub qr_payload: String,
    pub footer: String,
    pub color: CardColor,
}

impl CardLayout {
    pub fn build(student: &Student, today: NaiveDate, color: CardColor, tag: &str) -> Self {
        let unique_code = student.unique_code.clone().unwrap_or_default();
        Self {
            title: "MOVES SSP".to_string(),
            subtitle: "Transporte Universitário".to_string(),
            name: student.name.clone(),
            photo_url: student.profile_picture.clone(),
            course_line: format!("{} • {}", student.course, student.graduation_year),
            campus_line: format!("Campus: {}", student.campus),
            registration_number: student.registration_number.clone(),
            qr_payload: qr_payload(tag, &student.registration_number, &unique_code),
            unique_code,
            valid_until: format_br_date(add_months(today, VALIDITY_MONTHS)),
            semester_start: format!("Início do semestre: {}", format_br_date(semester_start())),
            footer: "Escaneie o QR Code para verificar a autenticidade".to_string(),
            color,
        }
    }
}

/// Encoded card image ready to save or share.
#[derive(Debug, Clone)]
pub struct CardArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Result of a share attempt. Sharing never fails past this point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareReport {
    pub shared: bool,
    pub notice: Notice,
}

/// Renders cards and hands them to the download or share path.
#[derive(Clone)]
pub struct CardService {
    blobs: BlobStore,
    rasterizer: Arc<dyn Rasterizer>,
    share_target: Option<Arc<dyn ShareTarget>>,
    qr_tag: String,
}

impl CardService {
    pub fn new(
        blobs: BlobStore,
        rasterizer: Arc<dyn Rasterizer>,
        share_target: Option<Arc<dyn ShareTarget>>,
        qr_tag: impl Into<String>,
    ) -> Self {
        Self {
            blobs,
            rasterizer,
            share_target,
            qr_tag: qr_tag.into(),
        }
    }

    /// Layout for today's date.
    pub fn layout(&self, student: &Student, color: CardColor) -> CardLayout {
        CardLayout::build(student, Utc::now().date_naive(), color, &self.qr_tag)
    }

    /// Decode the profile photo if it is still available.
    fn materialize_photo(&self, layout: &CardLayout) -> Option<DynamicImage> {
        let url = layout.photo_url.as_deref()?;
        let Some(blob) = self.blobs.resolve(url) else {
            tracing::warn!(url, "Profile picture no longer available, using placeholder");
            return None;
        };
        match image::load_from_memory(&blob.bytes) {
            Ok(img) => Some(img),
            Err(e) => {
                tracing::warn!(error = %e, "Profile picture could not be decoded, using placeholder");
                None
            }
        }
    }

    /// Rasterize and JPEG-encode a card.
    pub async fn render(&self, student: &Student, color: CardColor) -> Result<Vec<u8>, RenderError> {
        let layout = self.layout(student, color);
        let photo = self.materialize_photo(&layout);
        let rasterizer = Arc::clone(&self.rasterizer);

        tokio::task::spawn_blocking(move || {
            let bitmap = rasterizer.rasterize(&layout, photo.as_ref(), EXPORT_SCALE)?;
            encode_jpeg(&bitmap)
        })
        .await
        .map_err(|e| RenderError::Task(e.to_string()))?
    }

    /// Render the card as a downloadable JPEG.
    pub async fn download(
        &self,
        student: &Student,
        color: CardColor,
    ) -> Result<(CardArtifact, Notice), Notice> {
        match self.render(student, color).await {
            Ok(bytes) => {
                let artifact = CardArtifact {
                    filename: download_file_name(&student.registration_number),
                    content_type: "image/jpeg",
                    bytes,
                };
                tracing::info!(
                    filename = %artifact.filename,
                    size = artifact.bytes.len(),
                    "Card rendered for download"
                );
                Ok((
                    artifact,
                    Notice::success(
                        NoticeCode::CardSaved,
                        "Carteirinha salva",
                        "Sua carteirinha foi salva com sucesso.",
                    ),
                ))
            }
            Err(e) => {
                tracing::error!(error = %e, "Error generating card image");
                Err(Notice::destructive(
                    NoticeCode::CardSaveFailed,
                    "Erro ao salvar",
                    "Ocorreu um erro ao salvar sua carteirinha.",
                ))
            }
        }
    }

    /// Render the card and pass it to the share target, if any.
    pub async fn share(&self, student: &Student, color: CardColor) -> ShareReport {
        let failed = || ShareReport {
            shared: false,
            notice: Notice::destructive(
                NoticeCode::ShareFailed,
                "Erro ao compartilhar",
                "Ocorreu um erro ao compartilhar sua carteirinha.",
            ),
        };

        let bytes = match self.render(student, color).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "Error rendering card for sharing");
                return failed();
            }
        };

        let Some(target) = self.share_target.as_ref() else {
            return ShareReport {
                shared: false,
                notice: Notice::destructive(
                    NoticeCode::ShareUnsupported,
                    "Compartilhamento não suportado",
                    "Seu navegador não suporta a função de compartilhamento.",
                ),
            };
        };

        let artifact = CardArtifact {
            filename: SHARE_FILE_NAME.to_string(),
            content_type: "image/jpeg",
            bytes,
        };

        match target.share(&artifact, SHARE_TITLE) {
            Ok(()) => ShareReport {
                shared: true,
                notice: Notice::success(
                    NoticeCode::ShareStarted,
                    "Compartilhamento iniciado",
                    "Escolha onde deseja compartilhar sua carteirinha.",
                ),
            },
            Err(ShareError::Unsupported) => ShareReport {
                shared: false,
                notice: Notice::destructive(
                    NoticeCode::ShareUnsupported,
                    "Compartilhamento não suportado",
                    "Seu navegador não suporta a função de compartilhamento.",
                ),
            },
            Err(e) => {
                tracing::error!(error = %e, "Error sharing card");
                failed()
            }
        }
    }
}

/// Encode an RGB bitmap as JPEG.
pub fn encode_jpeg(bitmap: &RgbImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
        .encode_image(bitmap)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(bytes)
}
