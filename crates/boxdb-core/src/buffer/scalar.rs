mod sealed {
    pub trait Sealed {}
}

///
/// Scalar
///
/// Fixed-width value stored inline in a table field.
/// Encoded little-endian, without alignment padding.
///

pub trait Scalar: Copy + PartialEq + sealed::Sealed {
    const WIDTH: usize;

    fn write_le(self, out: &mut Vec<u8>);

    /// Decode from exactly `WIDTH` bytes.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Scalar for $ty {
                const WIDTH: usize = size_of::<$ty>();

                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..size_of::<$ty>()]);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl sealed::Sealed for bool {}

impl Scalar for bool {
    const WIDTH: usize = 1;

    fn write_le(self, out: &mut Vec<u8>) {
        out.push(u8::from(self));
    }

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}
