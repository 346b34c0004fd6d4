// Licensed under the Apache-2.0 license

use anyhow::{Context, Result};
use hostfw_partitions::{parts_to_clear, EraseMode, PartitionEntry};
use log::{error, info};

use crate::arbiter::{AccessArbiter, SuspendGuard};
use crate::flash::{FlashAccess, FlashError, GUARD_PARTITION};

/// Result of one partition's erase during a factory reset.
#[derive(Debug)]
pub struct PartitionOutcome {
    pub name: String,
    pub mode: EraseMode,
    pub result: Result<(), FlashError>,
}

impl PartitionOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Orchestrates factory-reset erasures over the flash utility.
pub struct FlashResetEngine<F: FlashAccess, A: AccessArbiter> {
    flash: F,
    arbiter: A,
}

impl<F: FlashAccess, A: AccessArbiter> FlashResetEngine<F, A> {
    pub fn new(flash: F, arbiter: A) -> Self {
        Self { flash, arbiter }
    }

    /// Clears every reprovision-flagged partition, in listing order.
    ///
    /// The reset is best-effort: a partition that fails to erase is
    /// recorded and the loop moves on. Only failure to obtain the
    /// partition list, or to suspend the arbiter, aborts before any erase.
    pub fn reset(&self) -> Result<Vec<PartitionOutcome>> {
        let info = self
            .flash
            .list_partitions()
            .context("cannot reset without a partition list")?;
        let partitions = parts_to_clear(&info);

        let _suspension = SuspendGuard::acquire(&self.arbiter)?;

        let mut outcomes = Vec::with_capacity(partitions.len());
        for part in partitions {
            outcomes.push(self.clear_partition(part));
        }
        Ok(outcomes)
    }

    fn clear_partition(&self, part: PartitionEntry) -> PartitionOutcome {
        let mode = part.erase_mode();
        let result = self.flash.erase_partition(&part.name, mode);
        match &result {
            Ok(()) => info!("Cleared partition {}", part.name),
            Err(e) => error!("Failed to clear partition {}: {}", part.name, e),
        }
        PartitionOutcome {
            name: part.name,
            mode,
            result,
        }
    }

    /// Clears the hardware guard records.
    pub fn clear_guard(&self) -> Result<()> {
        let _suspension = SuspendGuard::acquire(&self.arbiter)?;
        self.flash
            .erase_partition(GUARD_PARTITION, EraseMode::EccClear)
            .with_context(|| format!("failed to clear {}", GUARD_PARTITION))?;
        info!("Cleared partition {}", GUARD_PARTITION);
        Ok(())
    }
}
