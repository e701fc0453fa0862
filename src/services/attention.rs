//! Attention estimation from webcam frames. The frame arrives as a base64
//! data URL; decoding and format validation happen here so routes can map
//! failures straight to 400s. The scorer itself is a trait: the default is
//! a deterministic byte-statistics stand-in for a real gaze model.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FrameError {
    #[error("frame is empty")]
    Empty,
    #[error("invalid base64 image data")]
    InvalidBase64,
    #[error("unsupported image format")]
    UnsupportedFormat,
}

/// Decodes a `data:image/...;base64,` URL (or bare base64) and checks the
/// payload actually starts like a PNG or JPEG.
pub fn decode_frame(data: &str) -> Result<Vec<u8>, FrameError> {
    let data = data.trim();
    if data.is_empty() {
        return Err(FrameError::Empty);
    }

    let encoded = match data.split_once(";base64,") {
        Some((header, rest)) => {
            if !header.starts_with("data:image/") {
                return Err(FrameError::UnsupportedFormat);
            }
            rest
        }
        None => data,
    };

    let bytes = BASE64
        .decode(encoded.as_bytes())
        .map_err(|_| FrameError::InvalidBase64)?;

    if !is_png(&bytes) && !is_jpeg(&bytes) {
        return Err(FrameError::UnsupportedFormat);
    }
    Ok(bytes)
}

fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a])
}

fn is_jpeg(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0xff, 0xd8, 0xff])
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttentionResult {
    pub score: f64,
    pub attentive: bool,
}

pub trait AttentionScorer: Send + Sync {
    fn score(&self, frame: &[u8]) -> AttentionResult;
}

/// Placeholder model: derives a stable score in [0, 1] from frame byte
/// statistics, so identical frames always score identically. Dark frames
/// (camera covered, lights off) score low.
pub struct ByteStatScorer;

const ATTENTIVE_THRESHOLD: f64 = 0.5;

impl AttentionScorer for ByteStatScorer {
    fn score(&self, frame: &[u8]) -> AttentionResult {
        let body = &frame[frame.len().min(64)..];
        let sample = if body.is_empty() { frame } else { body };

        let mean = sample.iter().map(|&b| b as f64).sum::<f64>() / sample.len() as f64;
        let variance = sample
            .iter()
            .map(|&b| {
                let d = b as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / sample.len() as f64;

        // brightness and contrast both near zero means no face is visible
        let brightness = (mean / 255.0).clamp(0.0, 1.0);
        let contrast = (variance.sqrt() / 128.0).clamp(0.0, 1.0);
        let score = ((0.6 * brightness + 0.4 * contrast) * 1000.0).round() / 1000.0;

        AttentionResult {
            score,
            attentive: score >= ATTENTIVE_THRESHOLD,
        }
    }
}
