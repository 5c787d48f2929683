use std::fmt::Debug;

/// Strip the padding mastering tools put in fixed-width identifier fields:
/// drop null bytes, then trim surrounding whitespace. Padding conventions
/// vary between tools (nulls, spaces, or a mix), so both must go.
pub fn strip_padding(bytes: &[u8]) -> String {
    let s: String = bytes
        .iter()
        .filter(|&&b| b != 0)
        .map(|&b| b as char)
        .collect();
    s.trim().to_string()
}

/// ISO9660 Boot Record Volume Descriptor, found at absolute sector 17.
///
/// For an El Torito disc this descriptor carries the absolute sector number
/// of the boot catalog in its otherwise unused area.
/// El Torito 1.0 section 2.0 Figure 7
/// https://pdos.csail.mit.edu/6.828/2018/readings/boot-cdrom.pdf
#[derive(Default, Clone, PartialEq)]
pub struct BootRecordDescriptor {
    /// Volume descriptor type; 0 indicates a boot record
    pub descriptor_type: u8,
    /// ISO9660 standard identifier, always "CD001"
    pub standard_identifier: [u8; 5],
    /// Descriptor version, always 1
    pub version: u8,
    /// Boot system identifier, "EL TORITO SPECIFICATION" padded to 32 bytes
    pub boot_system_identifier: [u8; 32],
    /// Boot identifier, unused padding in El Torito
    pub boot_identifier: [u8; 32],
    /// Absolute sector of the boot catalog
    pub catalog_sector: u32,
}

impl BootRecordDescriptor {
    /// Descriptor type marking a boot record (ECMA-119 8.2.1)
    pub const BOOT_RECORD_TYPE: u8 = 0;
    /// ISO9660 standard identifier (ECMA-119 8.2.2)
    pub const STANDARD_IDENTIFIER: &'static [u8; 5] = b"CD001";
    /// Descriptor version (ECMA-119 8.2.3)
    pub const VERSION: u8 = 1;
    /// Boot system identifier announcing an El Torito catalog
    pub const BOOT_SYSTEM_IDENTIFIER: &'static str = "EL TORITO SPECIFICATION";

    /// Number of meaningful bytes at the head of the 2048-byte descriptor
    pub const fn size() -> usize {
        75
    }

    pub fn read(bytes: &[u8]) -> Self {
        let mut r = Self::default();
        r.descriptor_type = bytes[0];
        r.standard_identifier.copy_from_slice(&bytes[1..6]);
        r.version = bytes[6];
        r.boot_system_identifier.copy_from_slice(&bytes[7..39]);
        r.boot_identifier.copy_from_slice(&bytes[39..71]);
        r.catalog_sector = u32::from_le_bytes([bytes[71], bytes[72], bytes[73], bytes[74]]);
        r
    }

    pub fn write(&self, bytes: &mut [u8]) {
        bytes[0] = self.descriptor_type;
        bytes[1..6].copy_from_slice(&self.standard_identifier);
        bytes[6] = self.version;
        bytes[7..39].copy_from_slice(&self.boot_system_identifier);
        bytes[39..71].copy_from_slice(&self.boot_identifier);
        bytes[71..75].copy_from_slice(&self.catalog_sector.to_le_bytes());
    }

    /// True iff this descriptor announces an El Torito boot catalog: type 0,
    /// "CD001", version 1, and a padded "EL TORITO SPECIFICATION" identifier.
    pub fn is_el_torito(&self) -> bool {
        self.descriptor_type == Self::BOOT_RECORD_TYPE
            && &self.standard_identifier == Self::STANDARD_IDENTIFIER
            && self.version == Self::VERSION
            && strip_padding(&self.boot_system_identifier) == Self::BOOT_SYSTEM_IDENTIFIER
    }
}

impl Debug for BootRecordDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootRecordDescriptor")
            .field("descriptor_type", &self.descriptor_type)
            .field(
                "standard_identifier",
                &strip_padding(&self.standard_identifier),
            )
            .field("version", &self.version)
            .field(
                "boot_system_identifier",
                &strip_padding(&self.boot_system_identifier),
            )
            .field("catalog_sector", &self.catalog_sector)
            .finish()
    }
}

/// Initial/default entry of the El Torito boot catalog, decoded from the
/// first 64 bytes of the catalog sector.
///
/// The first 32 bytes are the validation entry (header, platform,
/// manufacturer, checksum, key bytes); the next 32 bytes are the default
/// boot entry (boot indicator, media type, load segment, sector count, load
/// address). El Torito 1.0 sections 2.1 and 2.4.
#[derive(Default, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Validation entry header ID. Not part of the validity gate; key bytes
    /// and the checksum alone decide validity.
    pub header: u8,
    /// Platform ID (0 = 80x86, 1 = PowerPC, 2 = Mac, 0xEF = EFI)
    pub platform: u8,
    /// Manufacturer/developer ID string, null-padded
    pub manufacturer: [u8; 24],
    /// Checksum word; chosen so all words of the validation entry sum to zero
    pub checksum: u16,
    /// Key bytes, 0xAA55 for a well-formed entry
    pub key_bytes: u16,
    /// Boot indicator, 0x88 marks the entry bootable
    pub bootable: u8,
    /// Boot media type
    pub media_type: u8,
    /// Load segment for the boot loader (informational)
    pub load_seg: u16,
    /// Boot image length in 512-byte virtual sectors
    pub sector_cnt: u16,
    /// Absolute sector of the boot image
    pub load_addr: u32,
    /// Bytes 0..28 as little-endian words, checksum input only
    pub data_words: [u16; 14],
}

impl CatalogEntry {
    /// Bytes of the catalog block the entry is decoded from
    pub const BLOCK_SIZE: usize = 64;
    /// Key bytes value of a well-formed validation entry (0x55, 0xAA on disc)
    pub const KEY_BYTES: u16 = 0xAA55;
    /// Boot indicator value marking a bootable entry
    pub const BOOT_INDICATOR: u8 = 0x88;

    /// Decode every field from a catalog block. Extraction only; validity
    /// and bootability are separate predicates so a bad entry can still be
    /// inspected and reported.
    pub fn read(block: &[u8]) -> Self {
        let mut data_words = [0u16; 14];
        for (i, word) in data_words.iter_mut().enumerate() {
            *word = u16::from_le_bytes([block[i * 2], block[i * 2 + 1]]);
        }
        let mut manufacturer = [0u8; 24];
        manufacturer.copy_from_slice(&block[4..28]);
        Self {
            header: block[0],
            platform: block[1],
            manufacturer,
            checksum: u16::from_le_bytes([block[28], block[29]]),
            key_bytes: u16::from_le_bytes([block[30], block[31]]),
            bootable: block[32],
            media_type: block[33],
            load_seg: u16::from_le_bytes([block[34], block[35]]),
            sector_cnt: u16::from_le_bytes([block[38], block[39]]),
            load_addr: u32::from_le_bytes([block[40], block[41], block[42], block[43]]),
            data_words,
        }
    }

    /// Write the named fields back to a catalog block. `data_words` is
    /// derived from bytes 0..28 on read and is not written.
    pub fn write(&self, block: &mut [u8]) {
        block[0] = self.header;
        block[1] = self.platform;
        block[4..28].copy_from_slice(&self.manufacturer);
        block[28..30].copy_from_slice(&self.checksum.to_le_bytes());
        block[30..32].copy_from_slice(&self.key_bytes.to_le_bytes());
        block[32] = self.bootable;
        block[33] = self.media_type;
        block[34..36].copy_from_slice(&self.load_seg.to_le_bytes());
        block[38..40].copy_from_slice(&self.sector_cnt.to_le_bytes());
        block[40..44].copy_from_slice(&self.load_addr.to_le_bytes());
    }

    /// Checksum gate from El Torito 1.0 section 2.1: key bytes must be
    /// 0xAA55 and the 16-bit wrapping sum of checksum, key bytes, and the 14
    /// data words must be zero.
    pub fn is_valid(&self) -> bool {
        if self.key_bytes != Self::KEY_BYTES {
            return false;
        }
        let mut sum = self.checksum.wrapping_add(self.key_bytes);
        for word in self.data_words {
            sum = sum.wrapping_add(word);
        }
        sum == 0
    }

    /// True iff the boot indicator marks the entry bootable. Independent of
    /// `is_valid`; both predicates are evaluated on their own.
    pub fn is_bootable(&self) -> bool {
        self.bootable == Self::BOOT_INDICATOR
    }

    pub fn manufacturer_str(&self) -> String {
        strip_padding(&self.manufacturer)
    }

    /// Platform ID names per El Torito 1.0 section 2.1
    pub fn platform_name(&self) -> &'static str {
        match self.platform {
            0x00 => "80x86",
            0x01 => "PowerPC",
            0x02 => "Mac",
            0xEF => "EFI",
            _ => "unknown",
        }
    }

    /// Boot media type names per El Torito 1.0 section 2.4
    pub fn media_type_name(&self) -> &'static str {
        match self.media_type {
            0x00 => "no emulation",
            0x01 => "1.2M floppy",
            0x02 => "1.44M floppy",
            0x03 => "2.88M floppy",
            0x04 => "hard disk",
            _ => "unknown",
        }
    }
}

impl Debug for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("header", &self.header)
            .field("platform", &self.platform)
            .field("manufacturer", &self.manufacturer_str())
            .field("checksum", &self.checksum)
            .field("key_bytes", &self.key_bytes)
            .field("bootable", &self.bootable)
            .field("media_type", &self.media_type)
            .field("load_seg", &self.load_seg)
            .field("sector_cnt", &self.sector_cnt)
            .field("load_addr", &self.load_addr)
            .finish()
    }
}
