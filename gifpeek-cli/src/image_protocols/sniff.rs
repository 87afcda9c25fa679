// ABOUTME: Magic-byte sniffing for image payloads handed to terminal protocols
// ABOUTME: Picks the inline file name hint and reads pixel dimensions from headers

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Gif,
    Png,
    Jpeg,
    Unknown,
}

const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub fn detect_image_kind(data: &[u8]) -> ImageKind {
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        ImageKind::Gif
    } else if data.starts_with(PNG_SIGNATURE) {
        ImageKind::Png
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        ImageKind::Jpeg
    } else {
        ImageKind::Unknown
    }
}

/// Formats an iTerm-style terminal renders from raw bytes.
pub fn is_iterm_supported(data: &[u8]) -> bool {
    detect_image_kind(data) != ImageKind::Unknown
}

/// File name hint sent alongside inline payloads.
pub fn inline_name(data: &[u8]) -> &'static str {
    match detect_image_kind(data) {
        ImageKind::Gif => "thumb.gif",
        ImageKind::Png => "thumb.png",
        ImageKind::Jpeg => "thumb.jpg",
        ImageKind::Unknown => "thumb.bin",
    }
}

/// Pixel size from a GIF logical screen or PNG IHDR header.
pub fn dimensions(data: &[u8]) -> Option<(u32, u32)> {
    match detect_image_kind(data) {
        ImageKind::Gif if data.len() >= 10 => {
            let width = u16::from_le_bytes([data[6], data[7]]);
            let height = u16::from_le_bytes([data[8], data[9]]);
            Some((u32::from(width), u32::from(height)))
        }
        ImageKind::Png if data.len() >= 24 && &data[12..16] == b"IHDR" => {
            let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
            let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
            Some((width, height))
        }
        _ => None,
    }
    .filter(|(w, h)| *w > 0 && *h > 0)
}
