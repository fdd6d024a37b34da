// src/buffer/io.rs

//! Raw buffer persistence.
//!
//! The layout is `[width: u32][height: u32][width * height samples]` with no
//! header or type tag: the reader must know the sample type. Every field is
//! written in the platform's native byte order, or byte-swapped when the
//! caller asks for it.

use super::{Buffer, Sample};
use crate::utils::error::{Result, WaveError};
use crate::utils::log::debug;
use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// The byte order opposite to the platform's.
#[cfg(target_endian = "little")]
type Swapped = byteorder::BigEndian;
#[cfg(target_endian = "big")]
type Swapped = byteorder::LittleEndian;

/// Samples read per allocation step.
const READ_CHUNK: usize = 1 << 16;

fn dimension_to_u32(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        WaveError::InvalidArg(format!("dimension {} does not fit the u32 header", value))
    })
}

impl<T: Sample> Buffer<T> {
    /// Serializes the buffer. Fails if the buffer is asleep.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W, swap_endian: bool) -> Result<()> {
        let data = self.try_data()?;
        let width = dimension_to_u32(self.width())?;
        let height = dimension_to_u32(self.height())?;

        if swap_endian {
            writer.write_u32::<Swapped>(width)?;
            writer.write_u32::<Swapped>(height)?;
            for &v in data {
                v.write_sample::<Swapped, _>(writer)?;
            }
        } else {
            writer.write_u32::<NativeEndian>(width)?;
            writer.write_u32::<NativeEndian>(height)?;
            writer.write_all(bytemuck::cast_slice(data))?;
        }
        Ok(())
    }

    /// Deserializes a buffer written by [`write_to`](Self::write_to) with the
    /// same `swap_endian` flag.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R, swap_endian: bool) -> Result<Self> {
        let (width, height) = if swap_endian {
            (reader.read_u32::<Swapped>()?, reader.read_u32::<Swapped>()?)
        } else {
            (
                reader.read_u32::<NativeEndian>()?,
                reader.read_u32::<NativeEndian>()?,
            )
        };
        let (width, height) = (width as usize, height as usize);
        let count = width.checked_mul(height).ok_or_else(|| {
            WaveError::InvalidArg(format!("{}x{} buffer is too large", width, height))
        })?;

        // Grow in chunks so a corrupt header fails on EOF instead of allocating.
        let mut data: Vec<T> = Vec::with_capacity(count.min(READ_CHUNK));
        while data.len() < count {
            let start = data.len();
            let n = (count - start).min(READ_CHUNK);
            if swap_endian {
                for _ in 0..n {
                    data.push(T::read_sample::<Swapped, _>(reader)?);
                }
            } else {
                data.resize(start + n, T::zero());
                reader.read_exact(bytemuck::cast_slice_mut(&mut data[start..]))?;
            }
        }
        Buffer::from_vec(width, height, data)
    }

    /// Writes the buffer to a file, replacing any existing content.
    pub fn save<P: AsRef<Path>>(&self, path: P, swap_endian: bool) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer, swap_endian)?;
        writer.flush()?;
        debug!(
            "saved {}x{} buffer to {}",
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }

    /// Reads a buffer from a file.
    pub fn load<P: AsRef<Path>>(path: P, swap_endian: bool) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let buffer = Self::read_from(&mut reader, swap_endian)?;
        debug!(
            "loaded {}x{} buffer from {}",
            buffer.width(),
            buffer.height(),
            path.display()
        );
        Ok(buffer)
    }
}
