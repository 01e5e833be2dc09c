//! This submodule exists to map a `.tt` file as a "memory map", and holds the header check that
//! rejects foreign files before any of the expensive scans run.
use chaps_tt_core::errors::TtError;
use chaps_tt_core::text::decode_cp1250;
use chaps_tt_core::{HEADER_PROBE_LEN, MIN_FILE_LEN};

use memmap2::{Mmap, MmapOptions};
use std::path::Path;

/// A memory map with the underlying `.tt` file handle.
pub struct MappedTt {
    pub(crate) map: Mmap,
    _file: std::fs::File,
}

impl MappedTt {
    /// Map the file read-only.
    pub(crate) fn new(file_name: &Path) -> Result<MappedTt, TtError> {
        let (map, file) = map_file_to_memory(file_name)?;
        Ok(MappedTt { map, _file: file })
    }

    /// The mapped bytes. All decoder offsets are positions into this slice.
    pub(crate) fn bytes(&self) -> &[u8] {
        &self.map
    }
}

fn map_file_to_memory(file_name: &Path) -> Result<(Mmap, std::fs::File), TtError> {
    let file = std::fs::File::open(file_name)?;
    let map = unsafe { MmapOptions::new().map(&file) }.map_err(TtError::MapFile)?;
    Ok((map, file))
}

/// Check the fixed header: the first 60 bytes, read as code page 1250, must
/// contain the `TT`, `TimeTable` and `CHAPS` markers, and the file must be
/// long enough to carry the header at all.
pub fn verify_header(data: &[u8]) -> Result<(), TtError> {
    if data.len() < MIN_FILE_LEN {
        return Err(TtError::HeaderMismatch);
    }
    let header = decode_cp1250(&data[..HEADER_PROBE_LEN]);
    if header.contains("TT") && header.contains("TimeTable") && header.contains("CHAPS") {
        Ok(())
    } else {
        Err(TtError::HeaderMismatch)
    }
}
