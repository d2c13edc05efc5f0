// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Typed measurement survey payloads.
//!
//! Survey details are a tagged variant per pergola type instead of an open
//! JSON map: the tag is stable in storage, each variant keeps its fields
//! optional so partially-filled surveys remain representable.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Site dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width_mm: u32,
    pub depth_mm: u32,
    pub height_mm: u32,
}

impl Dimensions {
    /// Largest plausible single span for any product line, in millimetres.
    const MAX_SPAN_MM: u32 = 20_000;

    /// Creates dimensions after a plausibility check.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDimensions` if any dimension is zero or
    /// exceeds the maximum span.
    pub const fn new(width_mm: u32, depth_mm: u32, height_mm: u32) -> Result<Self, DomainError> {
        if width_mm == 0 || depth_mm == 0 || height_mm == 0 {
            return Err(DomainError::InvalidDimensions("dimensions must be non-zero"));
        }
        if width_mm > Self::MAX_SPAN_MM || depth_mm > Self::MAX_SPAN_MM {
            return Err(DomainError::InvalidDimensions("span exceeds 20 metres"));
        }
        Ok(Self {
            width_mm,
            depth_mm,
            height_mm,
        })
    }
}

/// Anchoring surface found at the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchoringSurface {
    Concrete,
    Pavement,
    Facade,
    Soil,
}

/// Survey details, tagged by pergola type.
///
/// All fields are optional: a surveyor may file a partial survey and
/// complete it on a later visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pergola_type", rename_all = "snake_case")]
pub enum MeasurementDetails {
    /// Bioclimatic pergola with rotating lamellas.
    Klimo {
        #[serde(skip_serializing_if = "Option::is_none")]
        lamella_count: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        led_lighting: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        side_screens: Option<u8>,
        #[serde(skip_serializing_if = "Option::is_none")]
        anchoring: Option<AnchoringSurface>,
        #[serde(skip_serializing_if = "Option::is_none")]
        construction_notes: Option<String>,
    },
    /// Horizontal shading with a rolling mechanism.
    Horizontal {
        #[serde(skip_serializing_if = "Option::is_none")]
        guide_rail_length_mm: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        motorized: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        fabric_code: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        construction_notes: Option<String>,
    },
    /// Classic pergola with a fixed roof.
    Klasik {
        #[serde(skip_serializing_if = "Option::is_none")]
        roof_panel_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        gutter_side: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        anchoring: Option<AnchoringSurface>,
        #[serde(skip_serializing_if = "Option::is_none")]
        construction_notes: Option<String>,
    },
    /// Vertical screen shading.
    Screen {
        #[serde(skip_serializing_if = "Option::is_none")]
        openings: Option<u8>,
        #[serde(skip_serializing_if = "Option::is_none")]
        fabric_code: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        crank_or_motor: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        construction_notes: Option<String>,
    },
    /// ZIP screen shading.
    Zip {
        #[serde(skip_serializing_if = "Option::is_none")]
        openings: Option<u8>,
        #[serde(skip_serializing_if = "Option::is_none")]
        fabric_code: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        wind_class: Option<u8>,
        #[serde(skip_serializing_if = "Option::is_none")]
        construction_notes: Option<String>,
    },
}
