// SPDX-License-Identifier: MIT
// Copyright 2026 The campuspass authors

//! Card colour palette.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// 8-bit RGB triple.
pub type Rgb = [u8; 3];

const WHITE: Rgb = [255, 255, 255];
const GRAY_800: Rgb = [31, 41, 55];

/// Selectable card colour, persisted under the `card-color` key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum CardColor {
    #[default]
    Purple,
    Emerald,
    Blue,
    Amber,
    Pink,
}

/// Resolved colours for one palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPalette {
    pub name: &'static str,
    /// Gradient start (left edge)
    pub from: Rgb,
    /// Gradient end (right edge)
    pub to: Rgb,
    pub text: Rgb,
    /// Accent for the placeholder glyph and badge
    pub accent: Rgb,
}

impl CardColor {
    pub const ALL: [CardColor; 5] = [
        CardColor::Purple,
        CardColor::Emerald,
        CardColor::Blue,
        CardColor::Amber,
        CardColor::Pink,
    ];

    pub fn palette(self) -> CardPalette {
        match self {
            CardColor::Purple => CardPalette {
                name: "Purple",
                from: [147, 51, 234],
                to: [192, 132, 252],
                text: WHITE,
                accent: [147, 51, 234],
            },
            CardColor::Emerald => CardPalette {
                name: "Emerald",
                from: [5, 150, 105],
                to: [52, 211, 153],
                text: WHITE,
                accent: [5, 150, 105],
            },
            CardColor::Blue => CardPalette {
                name: "Blue",
                from: [37, 99, 235],
                to: [96, 165, 250],
                text: WHITE,
                accent: [37, 99, 235],
            },
            CardColor::Amber => CardPalette {
                name: "Amber",
                from: [245, 158, 11],
                to: [252, 211, 77],
                text: GRAY_800,
                accent: [217, 119, 6],
            },
            CardColor::Pink => CardPalette {
                name: "Pink",
                from: [236, 72, 153],
                to: [249, 168, 212],
                text: WHITE,
                accent: [219, 39, 119],
            },
        }
    }
}

impl FromStr for CardColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardColor::ALL
            .into_iter()
            .find(|c| c.palette().name.eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown card color: {}", s))
    }
}
