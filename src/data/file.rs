//! Data file container.
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬─────────┬─────────────────────────┐
//! │ marker   │ checksum │ count    │ version │ records...              │
//! │ 3 bytes  │ 4 raw    │ 2 digits │ 1 digit │ names + DATA_SIZE block │
//! └──────────┴──────────┴──────────┴─────────┴─────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::data::record::{DataRecord, read_names};
use crate::error::{Error, Result};
use crate::protocol::number;

/// Size of the file header.
pub const HEADER_SIZE: usize = 10;

const IN_MEMORY: &str = "<memory>";

/// An ordered, read-only collection of records of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile<R> {
    version: u8,
    checksum: [u8; 4],
    records: Vec<R>,
}

impl<R: DataRecord> DataFile<R> {
    /// Creates a file from records already numbered 1..=N.
    #[must_use]
    pub const fn new(version: u8, checksum: [u8; 4], records: Vec<R>) -> Self {
        Self {
            version,
            checksum,
            records,
        }
    }

    /// Loads a data file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileLoad`] if the file cannot be read or is not a
    /// well-formed file of this kind, and [`Error::UnsupportedVersion`] if its
    /// version has no offset table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::FileLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let file = Self::parse(&bytes, path)?;
        info!(
            "loaded {} {} records from {} (version {})",
            file.len(),
            R::KIND,
            path.display(),
            file.version
        );
        Ok(file)
    }

    /// Parses a data file held in memory.
    ///
    /// # Errors
    ///
    /// Same as [`DataFile::load`], with `<memory>` as the path.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::parse(bytes, Path::new(IN_MEMORY))
    }

    fn parse(bytes: &[u8], path: &Path) -> Result<Self> {
        let fail = |reason: String| Error::FileLoad {
            path: path.to_path_buf(),
            reason,
        };

        if bytes.len() < HEADER_SIZE {
            return Err(fail(format!(
                "header truncated: {} of {HEADER_SIZE} bytes",
                bytes.len()
            )));
        }

        let marker = R::KIND.marker();
        if &bytes[..3] != marker {
            return Err(fail(format!(
                "expected {} marker, found {}",
                String::from_utf8_lossy(marker),
                hex::encode(&bytes[..3])
            )));
        }

        let mut checksum = [0u8; 4];
        checksum.copy_from_slice(&bytes[3..7]);
        let count = number::decode(&bytes[7..9]).map_err(|e| fail(format!("record count: {e}")))?;
        let version = number::decode(&bytes[9..10])
            .map_err(|e| fail(format!("version: {e}")))? as u8;

        if !R::supports_version(version) {
            return Err(Error::UnsupportedVersion {
                kind: R::KIND,
                version,
            });
        }

        debug!(
            "{} header: {count} records, version {version}, checksum {}",
            R::KIND,
            hex::encode(checksum)
        );

        let mut records = Vec::with_capacity(count as usize);
        let mut pos = HEADER_SIZE;
        for id in 1..=count {
            let rest = &bytes[pos..];
            let (names, consumed) =
                read_names(rest, R::NAME_COUNT).map_err(|e| fail(format!("record {id}: {e}")))?;

            let Some(fields) = rest.get(consumed..consumed + R::DATA_SIZE) else {
                return Err(fail(format!(
                    "record {id}: truncated after {} of {count} records",
                    id - 1
                )));
            };

            let record = R::deserialize(id, names, version, fields).map_err(|e| match e {
                Error::Codec(e) => fail(format!("record {id}: {e}")),
                other => other,
            })?;
            records.push(record);
            pos += consumed + R::DATA_SIZE;
        }

        Ok(Self {
            version,
            checksum,
            records,
        })
    }

    /// Serializes the header followed by every record.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.records.len() * R::DATA_SIZE);
        out.extend_from_slice(R::KIND.marker());
        out.extend_from_slice(&self.checksum);
        out.extend_from_slice(&number::encode(self.records.len() as u32, 2));
        out.extend_from_slice(&number::encode(u32::from(self.version), 1));
        for record in &self.records {
            out.extend_from_slice(&record.to_bytes());
        }
        out
    }

    /// Writes the file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_bytes())?;
        info!("saved {} {} records to {}", self.len(), R::KIND, path.display());
        Ok(())
    }

    /// Returns the record with `id`, if any. ID 0 never matches.
    #[must_use]
    pub fn find_by_id(&self, id: u32) -> Option<&R> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.records.get(index)
    }

    /// Returns the first record matching `pred`.
    pub fn find_first(&self, mut pred: impl FnMut(&R) -> bool) -> Option<&R> {
        self.records.iter().find(|r| pred(r))
    }

    /// Returns every record matching `pred`, in file order.
    pub fn find_all(&self, mut pred: impl FnMut(&R) -> bool) -> Vec<&R> {
        self.records.iter().filter(|r| pred(r)).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub const fn version(&self) -> u8 {
        self.version
    }

    #[must_use]
    pub const fn checksum(&self) -> [u8; 4] {
        self.checksum
    }

    /// Path used in errors for files parsed from memory.
    #[must_use]
    pub fn in_memory_path() -> PathBuf {
        PathBuf::from(IN_MEMORY)
    }
}

impl<'a, R> IntoIterator for &'a DataFile<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
