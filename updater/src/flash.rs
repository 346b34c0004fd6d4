// Licensed under the Apache-2.0 license

use std::path::PathBuf;
use std::process::Command;

use hostfw_partitions::EraseMode;
use log::debug;
use thiserror::Error;

/// Partition holding the image's version string.
pub const VERSION_PARTITION: &str = "VERSION";

/// Partition holding the hardware guard records.
pub const GUARD_PARTITION: &str = "GUARD";

/// Errors crossing the flash utility boundary.
#[derive(Error, Debug)]
pub enum FlashError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Command {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Access to the flash device through the platform's flash utility.
///
/// The trait is the process boundary: implementations own command
/// invocation, callers own what the bytes and listing text mean.
pub trait FlashAccess {
    /// Returns the utility's raw multi-line partition listing.
    fn list_partitions(&self) -> Result<String, FlashError>;

    /// Reads the full content of the named partition.
    fn read_partition(&self, name: &str) -> Result<Vec<u8>, FlashError>;

    /// Erases the named partition with the given mode.
    fn erase_partition(&self, name: &str, mode: EraseMode) -> Result<(), FlashError>;
}

/// The `pflash` command-line utility.
pub struct Pflash {
    program: PathBuf,
}

impl Pflash {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>, FlashError> {
        debug!("Running: {} {}", self.program.display(), args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| FlashError::Spawn {
                program: self.program.display().to_string(),
                source: e,
            })?;
        if !output.status.success() {
            return Err(FlashError::Command {
                program: self.program.display().to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output.stdout)
    }
}

impl FlashAccess for Pflash {
    fn list_partitions(&self) -> Result<String, FlashError> {
        let stdout = self.run(&["-i"])?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    fn read_partition(&self, name: &str) -> Result<Vec<u8>, FlashError> {
        // The utility only reads into a file, so bounce through a temp dir.
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(name.to_lowercase());
        let path_arg = path.to_string_lossy();
        self.run(&["-P", name, "-r", &path_arg])?;
        Ok(std::fs::read(&path)?)
    }

    fn erase_partition(&self, name: &str, mode: EraseMode) -> Result<(), FlashError> {
        let op = match mode {
            EraseMode::EccClear => "-c",
            EraseMode::Raw => "-e",
        };
        self.run(&["-P", name, op, "-f"])?;
        Ok(())
    }
}
