// Licensed under the Apache-2.0 license
#![cfg_attr(not(test), no_std)]

use zerocopy::{byteorder::U32, FromBytes, Immutable, IntoBytes, KnownLayout};

/// Magic value identifying a signed container prepended to a host firmware
/// image. Stored big-endian on flash.
pub const CONTAINER_MAGIC: u32 = 0x1708_2011;

/// A signed image carries a fixed-size container header before the payload.
pub const CONTAINER_HEADER_SIZE: usize = 4096;

const MAGIC_SIZE: usize = core::mem::size_of::<ContainerHeader>();

/// Leading bytes of a signed container header. Only the magic matters for
/// locating the payload; the rest of the 4K region is opaque here.
#[repr(C)]
#[derive(Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct ContainerHeader {
    pub magic: U32<zerocopy::byteorder::BigEndian>,
}

impl ContainerHeader {
    pub fn verify(&self) -> bool {
        self.magic.get() == CONTAINER_MAGIC
    }
}

/// Locates the NUL-terminated version string in a raw image buffer.
///
/// A signed image starts with the container magic and keeps its version
/// string after the 4K container header; an unsigned image keeps it at
/// offset 0. Returns the string bytes without the terminator, or `None`
/// when the buffer is too short or carries no terminated string.
pub fn version_bytes(image: &[u8]) -> Option<&[u8]> {
    if image.len() < MAGIC_SIZE {
        return None;
    }
    let (header, _) = ContainerHeader::read_from_prefix(image).ok()?;
    let offset = if header.verify() {
        CONTAINER_HEADER_SIZE
    } else {
        0
    };
    let content = image.get(offset..)?;
    let nul = content.iter().position(|&b| b == 0)?;
    Some(&content[..nul])
}
