//! Reads a bootable "El Torito" CD-ROM image or device, locates its boot
//! catalog through the ISO9660 volume descriptor chain, validates the
//! initial/default catalog entry, and extracts the boot image it describes.
//!
//! See the "El Torito" Bootable CD-ROM Format Specification 1.0
//! https://pdos.csail.mit.edu/6.828/2018/readings/boot-cdrom.pdf

pub mod eltorito;
pub mod eltorito_parser;
pub mod sector_reader;
