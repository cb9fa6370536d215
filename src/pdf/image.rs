//! Logo embedding: JPEG is passed through as `DCTDecode`, 8-bit
//! non-interlaced greyscale/RGB PNG as `FlateDecode` with the PNG predictor.

use lopdf::{Stream, dictionary};

/// An image XObject ready to be added to the document.
pub(crate) struct Logo {
    pub width: u32,
    pub height: u32,
    pub stream: Stream,
}

/// Build an image XObject from PNG or JPEG bytes.
pub(crate) fn logo_xobject(bytes: &[u8]) -> Result<Logo, String> {
    if bytes.starts_with(PNG_SIGNATURE) {
        png(bytes)
    } else if bytes.starts_with(&[0xFF, 0xD8]) {
        jpeg(bytes)
    } else {
        Err("unsupported image format (expected PNG or JPEG)".into())
    }
}

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn png(bytes: &[u8]) -> Result<Logo, String> {
    let mut pos = PNG_SIGNATURE.len();
    let mut header: Option<(u32, u32, u8, u8, u8)> = None;
    let mut idat = Vec::new();

    while pos + 8 <= bytes.len() {
        let len = be_u32(&bytes[pos..pos + 4]) as usize;
        let kind = &bytes[pos + 4..pos + 8];
        let data_start = pos + 8;
        let data_end = data_start
            .checked_add(len)
            .filter(|end| *end <= bytes.len())
            .ok_or("truncated PNG chunk")?;
        let data = &bytes[data_start..data_end];

        match kind {
            b"IHDR" if data.len() >= 13 => {
                header = Some((be_u32(&data[0..4]), be_u32(&data[4..8]), data[8], data[9], data[12]));
            }
            b"IDAT" => idat.extend_from_slice(data),
            b"IEND" => break,
            _ => {}
        }
        // chunk data is followed by a 4-byte CRC
        pos = data_end + 4;
    }

    let (width, height, bit_depth, color_type, interlace) = header.ok_or("PNG without IHDR")?;
    if bit_depth != 8 || interlace != 0 {
        return Err(format!(
            "unsupported PNG (bit depth {bit_depth}, interlace {interlace})"
        ));
    }
    let (colour_space, colours): (&str, i64) = match color_type {
        0 => ("DeviceGray", 1),
        2 => ("DeviceRGB", 3),
        other => return Err(format!("unsupported PNG colour type {other}")),
    };
    if idat.is_empty() {
        return Err("PNG without image data".into());
    }

    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => colour_space,
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
            "DecodeParms" => dictionary! {
                "Predictor" => 15,
                "Colors" => colours,
                "BitsPerComponent" => 8,
                "Columns" => i64::from(width),
            },
        },
        idat,
    )
    .with_compression(false);

    Ok(Logo {
        width,
        height,
        stream,
    })
}

fn jpeg(bytes: &[u8]) -> Result<Logo, String> {
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return Err("malformed JPEG marker".into());
        }
        let marker = bytes[pos + 1];
        match marker {
            0xFF => {
                pos += 1;
                continue;
            }
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            0xD9 | 0xDA => break,
            _ => {}
        }

        let len = usize::from(u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]));
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            let seg = bytes
                .get(pos + 4..pos + 10)
                .ok_or("truncated JPEG frame header")?;
            let height = u32::from(u16::from_be_bytes([seg[1], seg[2]]));
            let width = u32::from(u16::from_be_bytes([seg[3], seg[4]]));
            let colour_space = match seg[5] {
                1 => "DeviceGray",
                3 => "DeviceRGB",
                4 => "DeviceCMYK",
                n => return Err(format!("unsupported JPEG component count {n}")),
            };

            let stream = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(width),
                    "Height" => i64::from(height),
                    "ColorSpace" => colour_space,
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                bytes.to_vec(),
            )
            .with_compression(false);
            return Ok(Logo {
                width,
                height,
                stream,
            });
        }
        pos += 2 + len;
    }
    Err("JPEG without frame header".into())
}

fn be_u32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}
