use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::eltorito::{BootRecordDescriptor, CatalogEntry};
use crate::sector_reader::{read_sectors, SECTOR_SIZE, VIRTUAL_SECTOR_SIZE};

#[derive(Error, Debug)]
pub enum ToritoError {
    #[error("IO error on {path:?} at byte offset {offset}: {source}")]
    Io {
        path: PathBuf,
        offset: u64,
        source: io::Error,
    },
    #[error("could not write boot image to {path:?}: {source}")]
    WriteOutput { path: PathBuf, source: io::Error },
    #[error("{path:?}: \"Booting catalog\" does not validate")]
    CatalogInvalid { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, ToritoError>;

/// Absolute sector of the boot record volume descriptor.
/// El Torito 1.0 section 2.0 places it at 0x11, after the 16-sector system
/// area and the primary volume descriptor at 16.
pub const BOOT_RECORD_SECTOR: u64 = 17;

/// Find the boot catalog's sector address via the boot record volume
/// descriptor at sector 17.
///
/// `Ok(None)` covers every structural miss: a short read (image truncated
/// before sector 17), a descriptor that is not an El Torito boot record, or
/// a decoded catalog address of 0 (sector 0 is the system area and can never
/// hold a catalog). Most ISO images are not bootable, so none of these is an
/// error; only an I/O failure is.
pub fn locate_catalog(path: &Path) -> Result<Option<u32>> {
    let sector = read_sectors(path, BOOT_RECORD_SECTOR, SECTOR_SIZE, 1)?;
    if sector.len() < SECTOR_SIZE {
        debug!(
            "locate_catalog: short read of {} bytes at sector {}",
            sector.len(),
            BOOT_RECORD_SECTOR
        );
        return Ok(None);
    }
    let descriptor = BootRecordDescriptor::read(&sector);
    if !descriptor.is_el_torito() {
        debug!("locate_catalog: not an El Torito boot record: {:?}", descriptor);
        return Ok(None);
    }
    if descriptor.catalog_sector == 0 {
        debug!("locate_catalog: descriptor names sector 0, treating as absent");
        return Ok(None);
    }
    debug!(
        "locate_catalog: boot catalog at sector {}",
        descriptor.catalog_sector
    );
    Ok(Some(descriptor.catalog_sector))
}

/// Result of a decode run. Structural absence of a catalog is a value, not
/// an error.
#[derive(Debug)]
pub enum Catalog {
    /// No El Torito boot record, or the image is too short to hold one
    NoCatalog,
    /// A catalog was located and its initial entry decoded
    Decoded(DecodedCatalog),
}

/// A located and decoded boot catalog, tied to the image it came from.
/// Validity and bootability are derived predicates, not stored flags.
#[derive(Debug)]
pub struct DecodedCatalog {
    /// Image the catalog was decoded from
    pub source: PathBuf,
    /// Absolute sector of the catalog, always nonzero
    pub catalog_sector: u32,
    /// The initial/default entry
    pub entry: CatalogEntry,
}

/// Locate the boot catalog and decode its initial entry.
///
/// Decoding is unconditional field extraction; an entry that fails
/// validation is still returned so it can be inspected and reported.
pub fn decode(path: &Path) -> Result<Catalog> {
    let Some(catalog_sector) = locate_catalog(path)? else {
        return Ok(Catalog::NoCatalog);
    };
    let block = read_sectors(path, catalog_sector as u64, SECTOR_SIZE, 1)?;
    if block.len() < CatalogEntry::BLOCK_SIZE {
        debug!(
            "decode: catalog sector {} truncated to {} bytes",
            catalog_sector,
            block.len()
        );
        return Ok(Catalog::NoCatalog);
    }
    let entry = CatalogEntry::read(&block[..CatalogEntry::BLOCK_SIZE]);
    debug!("decode: {:?}", entry);
    Ok(Catalog::Decoded(DecodedCatalog {
        source: path.to_path_buf(),
        catalog_sector,
        entry,
    }))
}

impl DecodedCatalog {
    /// Key-bytes and checksum gate of the initial entry.
    pub fn is_valid(&self) -> bool {
        self.entry.is_valid()
    }

    /// Boot indicator of the initial entry, independent of `is_valid`.
    pub fn is_bootable(&self) -> bool {
        self.entry.is_bootable()
    }

    /// Read the boot image: `sector_cnt` virtual sectors of 512 bytes,
    /// seeking at logical sector `load_addr`. Only defined for a valid
    /// entry; an invalid one yields `CatalogInvalid`.
    pub fn disk_image(&self) -> Result<Vec<u8>> {
        if !self.is_valid() {
            return Err(ToritoError::CatalogInvalid {
                path: self.source.clone(),
            });
        }
        read_sectors(
            &self.source,
            self.entry.load_addr as u64,
            VIRTUAL_SECTOR_SIZE,
            self.entry.sector_cnt as usize,
        )
    }
}

impl fmt::Display for DecodedCatalog {
    /// The decoded-entry report: one `field: value` line per field, in
    /// declaration order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.entry;
        writeln!(f, "source: {}", self.source.display())?;
        writeln!(f, "cat_addr: {}", self.catalog_sector)?;
        writeln!(f, "header: {:#04x}", e.header)?;
        writeln!(f, "platform: {:#04x} ({})", e.platform, e.platform_name())?;
        writeln!(f, "manufacturer: {:?}", e.manufacturer_str())?;
        writeln!(f, "checksum: {:#06x}", e.checksum)?;
        writeln!(f, "key_bytes: {:#06x}", e.key_bytes)?;
        writeln!(f, "bootable: {:#04x}", e.bootable)?;
        writeln!(
            f,
            "media_type: {:#04x} ({})",
            e.media_type,
            e.media_type_name()
        )?;
        writeln!(f, "load_seg: {:#06x}", e.load_seg)?;
        writeln!(f, "sector_cnt: {}", e.sector_cnt)?;
        write!(f, "load_addr: {}", e.load_addr)
    }
}
