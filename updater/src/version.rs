// Licensed under the Apache-2.0 license

use log::error;
use sha2::{Digest, Sha512};

/// Hex digits kept from the digest for a version id.
const ID_LENGTH: usize = 8;

/// Reads the combined version string out of a raw image buffer.
///
/// Failure (short buffer, missing terminator) is signaled by emptiness,
/// never by an error.
pub fn read_version(image: &[u8]) -> String {
    match hostfw_image::version_bytes(image) {
        Some(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        None => String::new(),
    }
}

/// Splits an image's combined version string into its version and
/// extended-version halves.
///
/// The delimiter convention belongs to the implementation; the inventory
/// treats the combined string as opaque and only reads emptiness of the
/// halves as failure.
pub trait SplitVersion {
    fn split(&self, full: &str) -> (String, String);
}

/// Line-based convention: the first line is the version, the remaining
/// lines joined with `,` form the extended version.
pub struct LineSplit;

impl SplitVersion for LineSplit {
    fn split(&self, full: &str) -> (String, String) {
        let mut lines = full.lines();
        let Some(version) = lines.next() else {
            error!("Unexpected empty version");
            return (String::new(), String::new());
        };
        let extended = lines.collect::<Vec<_>>().join(",");
        (version.to_string(), extended)
    }
}

/// Derives the stable short identifier for a combined version string.
///
/// Empty input derives an empty id, which callers read as "no usable
/// image". The id is a pure function of the string, so repeated discovery
/// of the same image always reproduces it.
pub fn version_id(full: &str) -> String {
    if full.is_empty() {
        return String::new();
    }
    let digest = Sha512::digest(full.as_bytes());
    hex::encode(digest)[..ID_LENGTH].to_string()
}
