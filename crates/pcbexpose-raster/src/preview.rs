//! Preview records: a fixed header followed by a run-length payload.

use crate::codec;
use crate::error::{RasterError, RasterResult};
use image::{RgbImage, RgbaImage};

/// Eight little-endian `u32` fields.
pub const HEADER_SIZE: usize = 32;

/// An encoded image plus its header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRecord {
    pub resolution_x: u32,
    pub resolution_y: u32,
    pub payload: Vec<u8>,
    /// Carried through untouched.
    pub reserved: [u32; 4],
}

impl PreviewRecord {
    pub fn from_image(image: &RgbImage) -> Self {
        Self {
            resolution_x: image.width(),
            resolution_y: image.height(),
            payload: codec::encode(image),
            reserved: [0; 4],
        }
    }

    pub fn from_rgba(image: &RgbaImage) -> Self {
        Self {
            resolution_x: image.width(),
            resolution_y: image.height(),
            payload: codec::encode_rgba(image),
            reserved: [0; 4],
        }
    }

    pub fn to_image(&self) -> RasterResult<RgbImage> {
        codec::decode(&self.payload, self.resolution_x, self.resolution_y)
    }

    /// Header plus payload.
    pub fn byte_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Serialize for placement at `start_address` in a file; the payload
    /// offset field points just past the header.
    pub fn to_bytes(&self, start_address: u32) -> Vec<u8> {
        let image_address = start_address + HEADER_SIZE as u32;
        let fields = [
            self.resolution_x,
            self.resolution_y,
            image_address,
            self.payload.len() as u32,
            self.reserved[0],
            self.reserved[1],
            self.reserved[2],
            self.reserved[3],
        ];

        let mut out = Vec::with_capacity(self.byte_size());
        for field in fields {
            out.extend_from_slice(&field.to_le_bytes());
        }
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parse a record whose header sits at `address` in `file`. The payload
    /// is read from the offset the header names.
    pub fn from_bytes(file: &[u8], address: usize) -> RasterResult<Self> {
        let header = address
            .checked_add(HEADER_SIZE)
            .and_then(|end| file.get(address..end))
            .ok_or(RasterError::ShortHeader {
                offset: address,
                len: file.len(),
            })?;

        let mut fields = [0u32; 8];
        for (field, chunk) in fields.iter_mut().zip(header.chunks_exact(4)) {
            *field = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        let [resolution_x, resolution_y, image_address, data_size, r0, r1, r2, r3] = fields;

        let (start, size) = (image_address as usize, data_size as usize);
        let payload = start
            .checked_add(size)
            .and_then(|end| file.get(start..end))
            .ok_or(RasterError::PayloadOutOfRange {
                offset: start,
                size,
                len: file.len(),
            })?;

        tracing::debug!(
            resolution_x,
            resolution_y,
            payload = size,
            "Read preview record"
        );

        Ok(Self {
            resolution_x,
            resolution_y,
            payload: payload.to_vec(),
            reserved: [r0, r1, r2, r3],
        })
    }
}
