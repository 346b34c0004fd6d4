// Licensed under the Apache-2.0 license

//! Parsing of the flash utility's partition listing.
//!
//! Each listing line describes one partition, e.g.
//! `ID=06 MVPD 0x0012d000..0x001bd000 (actual=0x00090000) [E--P--F-C-]`.
//! The bracketed cluster holds single-letter flags; `F` marks a partition
//! that must be cleared on factory reset and `E` marks one whose erase must
//! preserve error-correction metadata. The listing is produced by the
//! utility itself and is not re-validated here: lines that do not carry the
//! expected tokens are skipped.

/// How a partition must be erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseMode {
    /// Plain erase of the partition region.
    Raw,
    /// Erase that regenerates the partition's error-correction metadata.
    EccClear,
}

/// A partition selected for clearing during factory reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionEntry {
    /// Partition name as the flash utility reports it.
    pub name: String,
    /// Set when the descriptor flags the partition as ECC-protected.
    pub ecc: bool,
}

impl PartitionEntry {
    pub fn erase_mode(&self) -> EraseMode {
        if self.ecc {
            EraseMode::EccClear
        } else {
            EraseMode::Raw
        }
    }
}

/// Extracts the partitions to clear from a partition listing.
///
/// Only reprovision-flagged (`F`) entries are returned, in listing order.
/// Header lines and lines missing the expected tokens are skipped.
pub fn parts_to_clear(info: &str) -> Vec<PartitionEntry> {
    let mut parts = Vec::new();
    for line in info.lines() {
        // The flag cluster runs from '[' to the end of the line.
        let Some(bracket) = line.find('[') else {
            continue;
        };
        let flags = &line[bracket..];
        if !flags.contains('F') {
            continue;
        }
        // The name is the token after the leading "ID=xx" field.
        let Some(id_end) = line.find(' ') else {
            continue;
        };
        let rest = &line[id_end..];
        let Some(name_start) = rest.find(|c: char| c != ' ') else {
            continue;
        };
        let rest = &rest[name_start..];
        let Some(name_end) = rest.find(' ') else {
            continue;
        };
        parts.push(PartitionEntry {
            name: rest[..name_end].to_string(),
            ecc: flags.contains('E'),
        });
    }
    parts
}
