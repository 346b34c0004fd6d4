// Licensed under the Apache-2.0 license

use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use log::error;

/// Arbiter of shared access to the flash device.
///
/// The daemon that normally owns the device must stay off it while
/// partitions are erased, so every erase sequence is bracketed by
/// `suspend`/`resume`.
pub trait AccessArbiter {
    fn suspend(&self) -> Result<()>;
    fn resume(&self) -> Result<()>;
}

/// An acquired suspension, released on drop.
///
/// Holding the resume in `Drop` keeps it on every exit path out of an
/// erase loop, including unwinding.
pub struct SuspendGuard<'a, A: AccessArbiter + ?Sized> {
    arbiter: &'a A,
}

impl<'a, A: AccessArbiter + ?Sized> SuspendGuard<'a, A> {
    pub fn acquire(arbiter: &'a A) -> Result<Self> {
        arbiter.suspend().context("failed to suspend flash access")?;
        Ok(Self { arbiter })
    }
}

impl<A: AccessArbiter + ?Sized> Drop for SuspendGuard<'_, A> {
    fn drop(&mut self) {
        if let Err(e) = self.arbiter.resume() {
            error!("Failed to resume flash access: {:#}", e);
        }
    }
}

/// Control tool of the flash-access daemon.
pub struct Mboxctl {
    program: PathBuf,
}

impl Mboxctl {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    fn run(&self, arg: &str) -> Result<()> {
        let status = Command::new(&self.program)
            .arg(arg)
            .status()
            .with_context(|| format!("failed to run {}", self.program.display()))?;
        if !status.success() {
            bail!("{} {} failed with {}", self.program.display(), arg, status);
        }
        Ok(())
    }
}

impl AccessArbiter for Mboxctl {
    fn suspend(&self) -> Result<()> {
        self.run("--suspend")
    }

    fn resume(&self) -> Result<()> {
        self.run("--resume")
    }
}
