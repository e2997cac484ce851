//! Media attachment: MIME allow-list plus per-class size ceilings.

use base64::Engine;

use crate::tools::types::{ToolError, ToolPayload};
use crate::tools::ExecutionContext;

const IMAGE_DOCUMENT_CEILING: u64 = 20 * 1024 * 1024;
const AUDIO_VIDEO_CEILING: u64 = 100 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaClass {
    Image,
    Document,
    Audio,
    Video,
}

impl MediaClass {
    fn ceiling(self) -> u64 {
        match self {
            MediaClass::Image | MediaClass::Document => IMAGE_DOCUMENT_CEILING,
            MediaClass::Audio | MediaClass::Video => AUDIO_VIDEO_CEILING,
        }
    }

    fn label(self) -> &'static str {
        match self {
            MediaClass::Image => "image",
            MediaClass::Document => "document",
            MediaClass::Audio => "audio",
            MediaClass::Video => "video",
        }
    }
}

fn media_type_for(extension: &str) -> Option<(&'static str, MediaClass)> {
    let entry = match extension {
        "jpg" | "jpeg" => ("image/jpeg", MediaClass::Image),
        "png" => ("image/png", MediaClass::Image),
        "gif" => ("image/gif", MediaClass::Image),
        "webp" => ("image/webp", MediaClass::Image),
        "bmp" => ("image/bmp", MediaClass::Image),
        "svg" => ("image/svg+xml", MediaClass::Image),
        "pdf" => ("application/pdf", MediaClass::Document),
        "mp3" => ("audio/mpeg", MediaClass::Audio),
        "wav" => ("audio/wav", MediaClass::Audio),
        "ogg" => ("audio/ogg", MediaClass::Audio),
        "m4a" => ("audio/mp4", MediaClass::Audio),
        "flac" => ("audio/flac", MediaClass::Audio),
        "mp4" => ("video/mp4", MediaClass::Video),
        "mov" => ("video/quicktime", MediaClass::Video),
        "webm" => ("video/webm", MediaClass::Video),
        "avi" => ("video/x-msvideo", MediaClass::Video),
        "mkv" => ("video/x-matroska", MediaClass::Video),
        _ => return None,
    };
    Some(entry)
}

pub fn process_file(ctx: &ExecutionContext, path: &str) -> Result<ToolPayload, ToolError> {
    let full = ctx.authorize(path)?;
    if !full.exists() {
        return Err(ToolError::NotFound {
            path: full.display().to_string(),
        });
    }
    if !full.is_file() {
        return Err(ToolError::WrongType {
            path: full.display().to_string(),
            expected: "file",
        });
    }

    let extension = full
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let (mime, class) = media_type_for(&extension).ok_or_else(|| {
        ToolError::InvalidInput(format!(
            "unsupported media type '.{extension}' for {}",
            full.display()
        ))
    })?;

    let size_bytes = std::fs::metadata(&full)
        .map_err(|e| ToolError::Execution(format!("failed to stat {}: {e}", full.display())))?
        .len();
    if size_bytes > class.ceiling() {
        return Err(ToolError::InvalidInput(format!(
            "{} exceeds the {} MB limit for {} files",
            full.display(),
            class.ceiling() / (1024 * 1024),
            class.label()
        )));
    }

    let bytes = std::fs::read(&full)
        .map_err(|e| ToolError::Execution(format!("failed to read {}: {e}", full.display())))?;
    let data_base64 = base64::engine::general_purpose::STANDARD.encode(bytes);

    Ok(ToolPayload::Media {
        path: full.display().to_string(),
        mime: mime.to_string(),
        size_bytes,
        data_base64,
    })
}
