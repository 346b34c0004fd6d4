// Licensed under the Apache-2.0 license

use hostfw_partitions::EraseMode;
use log::{error, info};

use crate::flash::{FlashAccess, VERSION_PARTITION};
use crate::version::{read_version, version_id, SplitVersion};

/// Activation state of a stored image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Active,
    Invalid,
    /// Part of the published vocabulary; the single-slot store has no
    /// multi-step activation, so this state is never produced here.
    Activating,
}

/// What a version record is for. The single-slot store only carries host
/// firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionPurpose {
    Host,
}

/// Version metadata for the stored host firmware image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareVersionRecord {
    /// Stable short identifier derived from the combined version string.
    /// Empty iff both version halves are empty.
    pub id: String,
    pub version: String,
    pub extended_version: String,
    pub purpose: VersionPurpose,
}

/// Activation bookkeeping for the stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationRecord {
    pub status: Activation,
    /// The store holds at most one image, so its record is functional from
    /// the moment it exists.
    pub functional: bool,
}

/// The record pair describing the one stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareSlot {
    pub version: FirmwareVersionRecord,
    pub activation: ActivationRecord,
}

/// Inventory of the single-slot host firmware store.
///
/// Nothing is persisted: every `discover` re-derives the record pair from
/// the flash device.
pub struct FirmwareInventory<F: FlashAccess, S: SplitVersion> {
    flash: F,
    splitter: S,
    current: Option<FirmwareSlot>,
}

impl<F: FlashAccess, S: SplitVersion> FirmwareInventory<F, S> {
    pub fn new(flash: F, splitter: S) -> Self {
        Self {
            flash,
            splitter,
            current: None,
        }
    }

    /// Re-derives the record pair from the flash device.
    ///
    /// An unreadable or version-less store is a valid state, not a fault:
    /// the inventory just ends up empty.
    pub fn discover(&mut self) -> Option<&FirmwareSlot> {
        let image = match self.flash.read_partition(VERSION_PARTITION) {
            Ok(image) => image,
            Err(e) => {
                error!("Failed to read {}: {}", VERSION_PARTITION, e);
                Vec::new()
            }
        };
        let full = read_version(&image);
        let id = version_id(&full);
        let (version, extended_version) = self.splitter.split(&full);
        if id.is_empty() || (version.is_empty() && extended_version.is_empty()) {
            // Possibly a corrupted store.
            self.current = None;
            return None;
        }

        let mut status = Activation::Active;
        if version.is_empty() {
            error!("Failed to read version from {:?}", full);
            status = Activation::Invalid;
        }
        if extended_version.is_empty() {
            error!("Failed to read extendedVersion from {:?}", full);
            status = Activation::Invalid;
        }

        info!("Discovered firmware version {} ({:?})", id, status);
        self.current = Some(FirmwareSlot {
            version: FirmwareVersionRecord {
                id,
                version,
                extended_version,
                purpose: VersionPurpose::Host,
            },
            activation: ActivationRecord {
                status,
                functional: true,
            },
        });
        self.current.as_ref()
    }

    /// The currently tracked record pair, if any.
    pub fn current(&self) -> Option<&FirmwareSlot> {
        self.current.as_ref()
    }

    /// Whether `id` names the functional firmware version.
    pub fn is_functional(&self, id: &str) -> bool {
        self.current
            .as_ref()
            .is_some_and(|slot| slot.activation.functional && slot.version.id == id)
    }

    /// Erases the stored image and drops its records.
    ///
    /// With no Active record the store is already empty (or holds nothing
    /// worth keeping) and there is nothing to erase.
    pub fn erase_current(&mut self) -> bool {
        let Some(slot) = &self.current else {
            return true;
        };
        if slot.activation.status != Activation::Active {
            return true;
        }
        match self
            .flash
            .erase_partition(VERSION_PARTITION, EraseMode::EccClear)
        {
            Ok(()) => {
                info!("Erased firmware version {}", slot.version.id);
                self.current = None;
                true
            }
            Err(e) => {
                error!("Failed to erase firmware version {}: {}", slot.version.id, e);
                false
            }
        }
    }

    /// Priority bookkeeping applies to multi-slot layouts only.
    pub fn free_priority(&mut self, _priority: u8, _version_id: &str) {}

    /// The single-slot store has nothing to evict.
    pub fn delete_all(&mut self) {}
}
