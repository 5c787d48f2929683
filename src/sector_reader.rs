use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use log::debug;

use crate::eltorito_parser::{Result, ToritoError};

/// ISO9660 logical sector size. All structural addresses on the disc (volume
/// descriptors, the boot catalog, the boot image's load address) count these.
/// ECMA-119 6.1.2 https://ecma-international.org/publications-and-standards/standards/ecma-119/
pub const SECTOR_SIZE: usize = 2048;

/// El Torito "virtual sector" size. Boot image lengths are expressed in these
/// 512-byte units, a leftover from floppy emulation.
/// El Torito 1.0 section 2.4 Sector Count
pub const VIRTUAL_SECTOR_SIZE: usize = 512;

/// Read `count` units of `unit_size` bytes starting at `sector_offset`.
///
/// The seek unit is always the 2048-byte logical sector regardless of
/// `unit_size`: sector addresses count logical sectors even when the data
/// they point at is measured in 512-byte virtual sectors. Returns fewer
/// bytes than requested only at end-of-file.
pub fn read_sectors_from<R: Read + Seek>(
    reader: &mut R,
    sector_offset: u64,
    unit_size: usize,
    count: usize,
) -> io::Result<Vec<u8>> {
    reader.seek(SeekFrom::Start(sector_offset * SECTOR_SIZE as u64))?;
    let mut buf = vec![0u8; unit_size * count];
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    buf.truncate(filled);
    Ok(buf)
}

/// Open `path` read-only and read sectors from it.
///
/// Each call is a scoped open-seek-read-close with no lock taken, so live
/// optical media concurrently open elsewhere can still be read. One attempt,
/// no retries.
pub fn read_sectors(
    path: &Path,
    sector_offset: u64,
    unit_size: usize,
    count: usize,
) -> Result<Vec<u8>> {
    debug!(
        "read_sectors: path={:?} sector_offset={} unit_size={} count={}",
        path, sector_offset, unit_size, count
    );
    let offset = sector_offset * SECTOR_SIZE as u64;
    let wrap = |source: io::Error| ToritoError::Io {
        path: path.to_path_buf(),
        offset,
        source,
    };
    let mut file = File::open(path).map_err(wrap)?;
    read_sectors_from(&mut file, sector_offset, unit_size, count).map_err(wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    #[test]
    fn test_seek_unit_is_logical_sector_for_virtual_reads() {
        // marker bytes at the start of logical sector 1
        let mut data = vec![0u8; 3 * SECTOR_SIZE];
        data[SECTOR_SIZE..SECTOR_SIZE + 4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

        let mut cursor = Cursor::new(data);
        let buf = read_sectors_from(&mut cursor, 1, VIRTUAL_SECTOR_SIZE, 1).unwrap();
        assert_eq!(buf.len(), VIRTUAL_SECTOR_SIZE);
        assert_eq!(&buf[..4], &[0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_multi_count_read() {
        let data: Vec<u8> = (0..4 * SECTOR_SIZE).map(|i| (i % 251) as u8).collect();
        let expected = data[2 * SECTOR_SIZE..2 * SECTOR_SIZE + 4 * VIRTUAL_SECTOR_SIZE].to_vec();

        let mut cursor = Cursor::new(data);
        let buf = read_sectors_from(&mut cursor, 2, VIRTUAL_SECTOR_SIZE, 4).unwrap();
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_short_read_at_end_of_file() {
        let data = vec![0xabu8; 2 * SECTOR_SIZE + 904];
        let mut cursor = Cursor::new(data);
        let buf = read_sectors_from(&mut cursor, 2, SECTOR_SIZE, 1).unwrap();
        assert_eq!(buf.len(), 904);
        assert!(buf.iter().all(|&b| b == 0xab));
    }

    #[test]
    fn test_read_past_end_of_file_is_empty() {
        let mut cursor = Cursor::new(vec![0u8; SECTOR_SIZE]);
        let buf = read_sectors_from(&mut cursor, 17, SECTOR_SIZE, 1).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_read_sectors_missing_path_is_io_error() {
        let err = read_sectors(Path::new("/nonexistent/image.iso"), 17, SECTOR_SIZE, 1)
            .unwrap_err();
        match err {
            ToritoError::Io { offset, .. } => assert_eq!(offset, 17 * SECTOR_SIZE as u64),
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
