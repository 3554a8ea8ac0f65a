//! Binary layout of a dataset file.
//!
//! ```text
//! offset  size  field
//! 0       4     magic "DSNV"
//! 4       2     format version (LE)
//! 6       2     reserved
//! 8       4     header block length in bytes (LE)
//! 12      4     JSON header length in bytes (LE)
//! 16      ...   JSON header, zero padded to the header block length
//! ...     ...   samples, f32 LE, dimension 0 contiguous
//! ```

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::error::DatasetError;
use super::header::DatasetHeader;

/// File magic
pub const DATASET_MAGIC: &[u8; 4] = b"DSNV";

/// Current on-disk format version
pub const DATASET_FORMAT_VERSION: u16 = 1;

/// Size of the fixed preamble before the JSON header
pub const PREAMBLE_LEN: u64 = 16;

const MIN_HEADER_BLOCK: usize = 4096;
const HEADER_ALIGN: usize = 512;

/// Header block length to reserve for a new file.
///
/// Leaves room for explicit axis values to be added to every dimension later.
pub fn header_block_for(header: &DatasetHeader, json_len: usize) -> usize {
    let axis_room: usize = header.dims.iter().map(|d| d.size * 32).sum();
    let wanted = (json_len * 2 + axis_room).max(MIN_HEADER_BLOCK);
    (wanted + HEADER_ALIGN - 1) / HEADER_ALIGN * HEADER_ALIGN
}

/// Write the preamble and the JSON header at the start of `file`.
pub fn write_header_block(
    file: &mut File,
    header: &DatasetHeader,
    header_block: usize,
) -> Result<(), DatasetError> {
    let json = serde_json::to_vec(header)?;
    if json.len() > header_block {
        return Err(DatasetError::HeaderTooLarge {
            needed: json.len(),
            reserved: header_block,
        });
    }

    let mut block = Vec::with_capacity(PREAMBLE_LEN as usize + header_block);
    block.extend_from_slice(DATASET_MAGIC);
    block.write_u16::<LittleEndian>(DATASET_FORMAT_VERSION)?;
    block.write_u16::<LittleEndian>(0)?;
    block.write_u32::<LittleEndian>(header_block as u32)?;
    block.write_u32::<LittleEndian>(json.len() as u32)?;
    block.extend_from_slice(&json);
    block.resize(PREAMBLE_LEN as usize + header_block, 0);

    file.seek(SeekFrom::Start(0))?;
    file.write_all(&block)?;
    Ok(())
}

/// Read the preamble and JSON header, returning the header and the block length.
pub fn read_header_block(file: &mut File) -> Result<(DatasetHeader, usize), DatasetError> {
    file.seek(SeekFrom::Start(0))?;

    let mut magic = [0u8; 4];
    file.read_exact(&mut magic).map_err(|_| {
        DatasetError::InvalidFormat("file too short for dataset preamble".to_string())
    })?;
    if &magic != DATASET_MAGIC {
        return Err(DatasetError::InvalidFormat(format!(
            "bad magic {:?}, expected {:?}",
            magic, DATASET_MAGIC
        )));
    }

    let version = file.read_u16::<LittleEndian>()?;
    if version != DATASET_FORMAT_VERSION {
        return Err(DatasetError::InvalidFormat(format!(
            "unsupported format version {}",
            version
        )));
    }
    let _reserved = file.read_u16::<LittleEndian>()?;
    let header_block = file.read_u32::<LittleEndian>()? as usize;
    let json_len = file.read_u32::<LittleEndian>()? as usize;
    if json_len > header_block {
        return Err(DatasetError::InvalidFormat(format!(
            "header length {} exceeds header block {}",
            json_len, header_block
        )));
    }

    let mut json = vec![0u8; json_len];
    file.read_exact(&mut json)?;
    let header: DatasetHeader = serde_json::from_slice(&json)?;
    header.validate()?;

    Ok((header, header_block))
}

/// Read `count` samples starting at sample `start`, `stride` samples apart.
pub fn read_line(
    file: &File,
    data_offset: u64,
    start: usize,
    stride: usize,
    count: usize,
) -> Result<Vec<f32>, DatasetError> {
    let mut reader = file;
    let mut line = vec![0f32; count];
    if stride == 1 {
        reader.seek(SeekFrom::Start(data_offset + start as u64 * 4))?;
        reader.read_f32_into::<LittleEndian>(&mut line)?;
    } else {
        for (i, value) in line.iter_mut().enumerate() {
            let pos = start + i * stride;
            reader.seek(SeekFrom::Start(data_offset + pos as u64 * 4))?;
            *value = reader.read_f32::<LittleEndian>()?;
        }
    }
    Ok(line)
}

/// Write samples starting at sample `start`, `stride` samples apart.
pub fn write_line(
    file: &mut File,
    data_offset: u64,
    start: usize,
    stride: usize,
    values: &[f32],
) -> Result<(), DatasetError> {
    if stride == 1 {
        let mut bytes = Vec::with_capacity(values.len() * 4);
        for &value in values {
            bytes.write_f32::<LittleEndian>(value)?;
        }
        file.seek(SeekFrom::Start(data_offset + start as u64 * 4))?;
        file.write_all(&bytes)?;
    } else {
        for (i, &value) in values.iter().enumerate() {
            let pos = start + i * stride;
            file.seek(SeekFrom::Start(data_offset + pos as u64 * 4))?;
            file.write_f32::<LittleEndian>(value)?;
        }
    }
    Ok(())
}
