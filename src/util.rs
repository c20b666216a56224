//! Misc helpers: config file de/serialization.

use std::{fs, io, path::Path};

use bincode::{config, Decode, Encode};

/// Serialize `data` to `path` with bincode.
pub fn save<T: Encode>(path: &Path, data: &T) -> io::Result<()> {
    let encoded = bincode::encode_to_vec(data, config::standard())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    fs::write(path, encoded)
}

/// Load a bincode-encoded value from `path`.
pub fn load<T: Decode<()>>(path: &Path) -> io::Result<T> {
    let bytes = fs::read(path)?;

    let (value, _len) = bincode::decode_from_slice(&bytes, config::standard())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    Ok(value)
}
