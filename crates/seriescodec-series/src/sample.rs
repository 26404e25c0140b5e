use bytes::{Buf, BufMut};

use crate::data_type::DataType;

/// A fixed-width Rust primitive that maps onto a [`DataType`].
///
/// Samples are always stored little-endian.
pub trait Sample: Copy {
    /// The data type a series built from this primitive carries.
    const DATA_TYPE: DataType;

    /// Append this sample's little-endian bytes to `dst`.
    fn put(self, dst: &mut impl BufMut);

    /// Read one sample from the front of `src`.
    ///
    /// `src` must hold at least one sample's width of bytes.
    fn get(src: &mut impl Buf) -> Self;

    /// Returns true if a series of `data_type` can be read back as this primitive.
    fn accepts(data_type: DataType) -> bool {
        data_type == Self::DATA_TYPE
    }
}

macro_rules! impl_sample {
    ($ty:ty, $dt:expr, $put:ident, $get:ident) => {
        impl Sample for $ty {
            const DATA_TYPE: DataType = $dt;

            fn put(self, dst: &mut impl BufMut) {
                dst.$put(self);
            }

            fn get(src: &mut impl Buf) -> Self {
                src.$get()
            }
        }
    };
}

impl_sample!(u8, DataType::Uint8, put_u8, get_u8);
impl_sample!(u16, DataType::Uint16, put_u16_le, get_u16_le);
impl_sample!(u32, DataType::Uint32, put_u32_le, get_u32_le);
impl_sample!(u64, DataType::Uint64, put_u64_le, get_u64_le);
impl_sample!(i8, DataType::Int8, put_i8, get_i8);
impl_sample!(i16, DataType::Int16, put_i16_le, get_i16_le);
impl_sample!(i32, DataType::Int32, put_i32_le, get_i32_le);
impl_sample!(f32, DataType::Float32, put_f32_le, get_f32_le);
impl_sample!(f64, DataType::Float64, put_f64_le, get_f64_le);

impl Sample for i64 {
    const DATA_TYPE: DataType = DataType::Int64;

    fn put(self, dst: &mut impl BufMut) {
        dst.put_i64_le(self);
    }

    fn get(src: &mut impl Buf) -> Self {
        src.get_i64_le()
    }

    // Timestamps share the i64 layout.
    fn accepts(data_type: DataType) -> bool {
        matches!(data_type, DataType::Int64 | DataType::Timestamp)
    }
}

impl Sample for [u8; 16] {
    const DATA_TYPE: DataType = DataType::Uuid;

    fn put(self, dst: &mut impl BufMut) {
        dst.put_slice(&self);
    }

    fn get(src: &mut impl Buf) -> Self {
        let mut out = [0u8; 16];
        src.copy_to_slice(&mut out);
        out
    }
}
