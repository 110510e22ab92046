use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::Result;

/// Default read chunk for streamed hashing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Compute SHA-256 hash of a file's contents using streaming.
/// Memory stays bounded by `buffer_size` regardless of file size.
pub fn hash_file(path: &Path, buffer_size: usize) -> Result<String> {
    let buffer_size = buffer_size.max(1);
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(buffer_size, file);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; buffer_size];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Compute SHA-256 hash of a byte slice.
#[cfg(test)]
#[must_use]
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn hash_bytes_deterministic() {
        let h1 = hash_bytes(b"hello world");
        let h2 = hash_bytes(b"hello world");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn hash_file_matches_bytes() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "test content").unwrap();
        let h = hash_file(tmp.path(), DEFAULT_BUFFER_SIZE).unwrap();
        assert_eq!(h, hash_bytes(b"test content"));
    }

    #[test]
    fn hash_is_independent_of_chunk_size() {
        let mut tmp = NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        tmp.write_all(&data).unwrap();

        let expected = hash_bytes(&data);
        for size in [1, 7, 4096, DEFAULT_BUFFER_SIZE, 1 << 20] {
            assert_eq!(hash_file(tmp.path(), size).unwrap(), expected);
        }
    }

    #[test]
    fn hash_missing_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(hash_file(&tmp.path().join("gone"), DEFAULT_BUFFER_SIZE).is_err());
    }
}
