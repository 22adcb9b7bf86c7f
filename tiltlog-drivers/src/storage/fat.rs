//! FAT geometry, free cluster count and quick format
//!
//! The volume manager only reads and writes files, so the filesystem-wide
//! operations are done here directly on the block device:
//!
//! - [`Layout::read`] locates a FAT16 or FAT32 volume, either through the
//!   MBR partition table or as a partitionless card with the boot sector in
//!   block 0.
//! - [`Layout::space_info`] counts free clusters by scanning the first FAT.
//! - [`Layout::quick_format`] rebuilds an empty filesystem in the existing
//!   layout: both FATs cleared, root directory emptied, FSInfo rewritten.

use embedded_sdmmc::{Block, BlockDevice, BlockIdx};
use tiltlog_core::traits::SpaceInfo;

const BLOCK_LEN: usize = Block::LEN;

/// Offset of the first MBR partition entry
const PARTITION_TABLE: usize = 446;
const PARTITION_ENTRY_LEN: usize = 16;

/// MBR partition types holding a FAT16 or FAT32 volume
const FAT_PARTITION_TYPES: [u8; 5] = [0x04, 0x06, 0x0E, 0x0B, 0x0C];

/// Fewer clusters than this is FAT12, which is not supported
const MIN_FAT16_CLUSTERS: u32 = 4085;
/// Fewer clusters than this is FAT16
const MIN_FAT32_CLUSTERS: u32 = 65525;

const FSINFO_LEAD_SIG: u32 = 0x4161_5252;
const FSINFO_STRUCT_SIG: u32 = 0x6141_7272;
const FSINFO_TRAIL_SIG: u32 = 0xAA55_0000;

/// Blocks written per transfer while clearing regions
const ZERO_BATCH: usize = 4;

/// Errors from the raw filesystem helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatError<E> {
    /// Block device failure
    Device(E),
    /// No FAT16/FAT32 volume where one was expected
    NoFilesystem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FatType {
    Fat16,
    Fat32,
}

/// Position and geometry of one FAT volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    pub fat_type: FatType,
    /// First block of the volume (the boot sector)
    pub start: u32,
    pub reserved_sectors: u32,
    pub num_fats: u32,
    /// Sectors per FAT copy
    pub fat_size: u32,
    /// Fixed root directory region (FAT16 only)
    pub root_dir_sectors: u32,
    pub sectors_per_cluster: u32,
    /// Usable data clusters
    pub clusters: u32,
    /// First cluster of the root directory (FAT32 only)
    pub root_cluster: u32,
    /// FSInfo sector relative to `start` (FAT32 only, 0 if none)
    pub fs_info_sector: u32,
    pub media: u8,
}

fn le16(buf: &[u8], offset: usize) -> u32 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]]) as u32
}

fn le32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

fn put32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn has_signature(block: &Block) -> bool {
    block.contents[510] == 0x55 && block.contents[511] == 0xAA
}

fn read_block<D: BlockDevice>(device: &D, idx: u32) -> Result<Block, FatError<D::Error>> {
    let mut blocks = [Block::new()];
    device
        .read(&mut blocks, BlockIdx(idx))
        .map_err(FatError::Device)?;
    let [block] = blocks;
    Ok(block)
}

fn write_block<D: BlockDevice>(
    device: &D,
    idx: u32,
    block: &Block,
) -> Result<(), FatError<D::Error>> {
    device
        .write(core::slice::from_ref(block), BlockIdx(idx))
        .map_err(FatError::Device)
}

fn zero_blocks<D: BlockDevice>(
    device: &D,
    first: u32,
    count: u32,
) -> Result<(), FatError<D::Error>> {
    let zeros = [Block::new(), Block::new(), Block::new(), Block::new()];
    let mut done = 0;
    while done < count {
        let n = (count - done).min(ZERO_BATCH as u32);
        device
            .write(&zeros[..n as usize], BlockIdx(first + done))
            .map_err(FatError::Device)?;
        done += n;
    }
    Ok(())
}

/// Whether a boot sector looks like a FAT BPB
fn is_boot_sector(block: &Block) -> bool {
    let b = &block.contents;
    has_signature(block) && (b[0] == 0xEB || b[0] == 0xE9) && le16(b, 11) == BLOCK_LEN as u32
}

impl Layout {
    /// Locate volume `index` on the device
    pub fn read<D: BlockDevice>(device: &D, index: usize) -> Result<Self, FatError<D::Error>> {
        let first = read_block(device, 0)?;
        if !has_signature(&first) {
            return Err(FatError::NoFilesystem);
        }
        if is_boot_sector(&first) {
            return if index == 0 {
                Self::parse(&first, 0)
            } else {
                Err(FatError::NoFilesystem)
            };
        }
        if index >= 4 {
            return Err(FatError::NoFilesystem);
        }

        let entry = PARTITION_TABLE + index * PARTITION_ENTRY_LEN;
        let kind = first.contents[entry + 4];
        if !FAT_PARTITION_TYPES.contains(&kind) {
            return Err(FatError::NoFilesystem);
        }
        let start = le32(&first.contents, entry + 8);
        let boot = read_block(device, start)?;
        if !is_boot_sector(&boot) {
            return Err(FatError::NoFilesystem);
        }
        Self::parse(&boot, start)
    }

    fn parse<E>(boot: &Block, start: u32) -> Result<Self, FatError<E>> {
        let b = &boot.contents;
        let sectors_per_cluster = b[13] as u32;
        let reserved_sectors = le16(b, 14);
        let num_fats = b[16] as u32;
        let root_entries = le16(b, 17);
        let media = b[21];
        let total = match le16(b, 19) {
            0 => le32(b, 32),
            n => n,
        };
        let fat_size = match le16(b, 22) {
            0 => le32(b, 36),
            n => n,
        };
        if sectors_per_cluster == 0 || num_fats == 0 || fat_size == 0 {
            return Err(FatError::NoFilesystem);
        }

        // Every block of the volume must be addressable
        if start.checked_add(total).is_none() {
            return Err(FatError::NoFilesystem);
        }
        let root_dir_sectors = (root_entries * 32).div_ceil(BLOCK_LEN as u32);
        let overhead = num_fats
            .checked_mul(fat_size)
            .and_then(|fats| fats.checked_add(reserved_sectors + root_dir_sectors))
            .ok_or(FatError::NoFilesystem)?;
        let clusters = total
            .checked_sub(overhead)
            .ok_or(FatError::NoFilesystem)?
            / sectors_per_cluster;

        let (fat_type, root_cluster, fs_info_sector) = if clusters < MIN_FAT16_CLUSTERS {
            return Err(FatError::NoFilesystem);
        } else if clusters < MIN_FAT32_CLUSTERS {
            (FatType::Fat16, 0, 0)
        } else {
            let root_cluster = le32(b, 44);
            if !root_cluster.checked_sub(2).is_some_and(|n| n < clusters) {
                return Err(FatError::NoFilesystem);
            }
            // FSInfo lives in the reserved region or nowhere
            let fs_info_sector = match le16(b, 48) {
                n if n < reserved_sectors => n,
                _ => 0,
            };
            (FatType::Fat32, root_cluster, fs_info_sector)
        };

        let entry_len = match fat_type {
            FatType::Fat16 => 2,
            FatType::Fat32 => 4,
        };
        let entries = u64::from(fat_size) * (BLOCK_LEN / entry_len) as u64;
        if entries < u64::from(clusters) + 2 {
            return Err(FatError::NoFilesystem);
        }

        Ok(Self {
            fat_type,
            start,
            reserved_sectors,
            num_fats,
            fat_size,
            root_dir_sectors,
            sectors_per_cluster,
            clusters,
            root_cluster,
            fs_info_sector,
            media,
        })
    }

    fn fat_start(&self) -> u32 {
        self.start + self.reserved_sectors
    }

    fn root_dir_start(&self) -> u32 {
        self.fat_start() + self.num_fats * self.fat_size
    }

    fn data_start(&self) -> u32 {
        self.root_dir_start() + self.root_dir_sectors
    }

    fn cluster_start(&self, cluster: u32) -> u32 {
        self.data_start() + (cluster - 2) * self.sectors_per_cluster
    }

    fn entry_len(&self) -> usize {
        match self.fat_type {
            FatType::Fat16 => 2,
            FatType::Fat32 => 4,
        }
    }

    fn entry(&self, block: &Block, slot: usize) -> u32 {
        match self.fat_type {
            FatType::Fat16 => le16(&block.contents, slot * 2),
            FatType::Fat32 => le32(&block.contents, slot * 4) & 0x0FFF_FFFF,
        }
    }

    fn set_entry(&self, block: &mut Block, slot: usize, value: u32) {
        match self.fat_type {
            FatType::Fat16 => {
                block.contents[slot * 2..slot * 2 + 2].copy_from_slice(&(value as u16).to_le_bytes())
            }
            FatType::Fat32 => put32(&mut block.contents, slot * 4, value),
        }
    }

    /// Count free clusters in the first FAT
    pub fn space_info<D: BlockDevice>(&self, device: &D) -> Result<SpaceInfo, FatError<D::Error>> {
        let per_block = BLOCK_LEN / self.entry_len();
        let last = self.clusters + 2;
        let mut free = 0;
        let mut cluster = 2;
        while cluster < last {
            let idx = cluster as usize / per_block;
            let block = read_block(device, self.fat_start() + idx as u32)?;
            let mut slot = cluster as usize % per_block;
            while slot < per_block && cluster < last {
                if self.entry(&block, slot) == 0 {
                    free += 1;
                }
                slot += 1;
                cluster += 1;
            }
        }

        Ok(SpaceInfo {
            total_clusters: self.clusters,
            free_clusters: free,
            sectors_per_cluster: self.sectors_per_cluster,
        })
    }

    /// Rebuild an empty filesystem in this layout
    pub fn quick_format<D: BlockDevice>(&self, device: &D) -> Result<(), FatError<D::Error>> {
        let end_of_chain = match self.fat_type {
            FatType::Fat16 => 0xFFFF,
            FatType::Fat32 => 0x0FFF_FFFF,
        };
        let per_block = BLOCK_LEN / self.entry_len();

        for copy in 0..self.num_fats {
            let fat = self.fat_start() + copy * self.fat_size;
            zero_blocks(device, fat, self.fat_size)?;

            let mut head = Block::new();
            self.set_entry(&mut head, 0, 0x0FFF_FF00 | self.media as u32);
            self.set_entry(&mut head, 1, end_of_chain);
            if self.fat_type == FatType::Fat32 {
                let slot = self.root_cluster as usize;
                if slot < per_block {
                    self.set_entry(&mut head, slot, end_of_chain);
                } else {
                    let mut block = Block::new();
                    self.set_entry(&mut block, slot % per_block, end_of_chain);
                    write_block(device, fat + (slot / per_block) as u32, &block)?;
                }
            }
            write_block(device, fat, &head)?;
        }

        match self.fat_type {
            FatType::Fat16 => zero_blocks(device, self.root_dir_start(), self.root_dir_sectors),
            FatType::Fat32 => {
                zero_blocks(
                    device,
                    self.cluster_start(self.root_cluster),
                    self.sectors_per_cluster,
                )?;
                if self.fs_info_sector != 0 {
                    self.write_fs_info(device)?;
                }
                Ok(())
            }
        }
    }

    fn write_fs_info<D: BlockDevice>(&self, device: &D) -> Result<(), FatError<D::Error>> {
        let mut info = Block::new();
        put32(&mut info.contents, 0, FSINFO_LEAD_SIG);
        put32(&mut info.contents, 484, FSINFO_STRUCT_SIG);
        put32(&mut info.contents, 488, self.clusters - 1);
        put32(&mut info.contents, 492, self.root_cluster + 1);
        put32(&mut info.contents, 508, FSINFO_TRAIL_SIG);
        write_block(device, self.start + self.fs_info_sector, &info)
    }
}
