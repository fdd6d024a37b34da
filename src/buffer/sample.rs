// src/buffer/sample.rs

//! Element types a [`Buffer`](super::Buffer) can hold.

use bytemuck::Pod;
use byteorder::{ByteOrder, ReadBytesExt, WriteBytesExt};
use num_traits::{Bounded, Num};
use std::fmt::Debug;
use std::io::{self, Read, Write};

/// A plain numeric sample.
///
/// Arithmetic that needs a common real domain (quantization, resampling,
/// statistics) goes through [`to_real`](Sample::to_real) and
/// [`from_real`](Sample::from_real). Conversion back to an integer sample
/// truncates toward zero and saturates at the type bounds.
pub trait Sample:
    Pod + Num + Bounded + PartialOrd + Debug + Default + Send + Sync + 'static
{
    fn to_real(self) -> f64;

    fn from_real(value: f64) -> Self;

    /// Absolute value; the identity for unsigned samples.
    fn magnitude(self) -> Self;

    fn write_sample<E: ByteOrder, W: Write + ?Sized>(self, writer: &mut W) -> io::Result<()>;

    fn read_sample<E: ByteOrder, R: Read + ?Sized>(reader: &mut R) -> io::Result<Self>;
}

macro_rules! impl_sample {
    ($t:ty, $abs:expr, $write:ident, $read:ident) => {
        impl Sample for $t {
            #[inline]
            fn to_real(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_real(value: f64) -> Self {
                value as $t
            }

            #[inline]
            fn magnitude(self) -> Self {
                let abs: fn($t) -> $t = $abs;
                abs(self)
            }

            fn write_sample<E: ByteOrder, W: Write + ?Sized>(
                self,
                writer: &mut W,
            ) -> io::Result<()> {
                writer.$write::<E>(self)
            }

            fn read_sample<E: ByteOrder, R: Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
                reader.$read::<E>()
            }
        }
    };
}

impl Sample for u8 {
    #[inline]
    fn to_real(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_real(value: f64) -> Self {
        value as u8
    }

    #[inline]
    fn magnitude(self) -> Self {
        self
    }

    fn write_sample<E: ByteOrder, W: Write + ?Sized>(self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self)
    }

    fn read_sample<E: ByteOrder, R: Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        reader.read_u8()
    }
}

impl_sample!(i16, |v| v.wrapping_abs(), write_i16, read_i16);
impl_sample!(u16, |v| v, write_u16, read_u16);
impl_sample!(i32, |v| v.wrapping_abs(), write_i32, read_i32);
impl_sample!(u32, |v| v, write_u32, read_u32);
impl_sample!(f32, |v| v.abs(), write_f32, read_f32);
impl_sample!(f64, |v| v.abs(), write_f64, read_f64);
