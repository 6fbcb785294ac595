#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

/// Element type of a tensor argument.
///
/// Parses from and displays as its lowercase name (`float32`, `int64`, ...).
/// The alternate form (`{:#}`) gives the short spelling (`f32`, `i64`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DType {
    /// Boolean value, stored on a full byte.
    Bool,

    /// 8-bit unsigned integer.
    UInt8,

    /// 8-bit signed integer.
    Int8,

    /// 16-bit signed integer.
    Int16,

    /// 32-bit signed integer.
    Int32,

    /// 64-bit signed integer. Default integer type of most model frontends.
    Int64,

    /// 16-bit floating point value (IEEE-754 binary16)
    /// Also known as "half precision".
    Float16,

    /// 16-bit "brain" floating point value (7-bit significand). Same number of
    /// exponent bits as `DType::Float32`, with greatly reduced precision.
    BFloat16,

    /// 32-bit floating point value (IEEE-754 binary32)
    /// Corresponds to Rust's `f32` type.
    Float32,

    /// 64-bit floating point value (IEEE-754 binary64)
    /// Corresponds to Rust's `f64` type.
    Float64,

    /// Complex number made of two `Float32` components.
    Complex64,

    /// Complex number made of two `Float64` components.
    Complex128,
}

impl DType {
    /// Returns the number of bits of a single element.
    #[inline]
    pub const fn num_bits(&self) -> u32 {
        match self {
            DType::Bool | DType::UInt8 | DType::Int8 => 8,
            DType::Int16 | DType::Float16 | DType::BFloat16 => 16,
            DType::Int32 | DType::Float32 => 32,
            DType::Int64 | DType::Float64 | DType::Complex64 => 64,
            DType::Complex128 => 128,
        }
    }

    /// Returns the number of bytes required to store a single element.
    #[inline]
    pub const fn byte_size(&self) -> u32 {
        self.num_bits() / 8
    }

    #[inline]
    pub const fn is_floating_point(&self) -> bool {
        matches!(
            self,
            DType::Float16 | DType::BFloat16 | DType::Float32 | DType::Float64
        )
    }

    #[inline]
    pub const fn is_complex(&self) -> bool {
        matches!(self, DType::Complex64 | DType::Complex128)
    }

    /// Returns `true` for integer types. `Bool` is not considered an integer.
    #[inline]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            DType::UInt8 | DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64
        )
    }

    /// Returns `true` if the type can represent negative values.
    #[inline]
    pub const fn is_signed(&self) -> bool {
        !matches!(self, DType::Bool | DType::UInt8)
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            let s = match self {
                DType::Bool => "i1",
                DType::UInt8 => "ui8",
                DType::Int8 => "i8",
                DType::Int16 => "i16",
                DType::Int32 => "i32",
                DType::Int64 => "i64",
                DType::Float16 => "f16",
                DType::BFloat16 => "bf16",
                DType::Float32 => "f32",
                DType::Float64 => "f64",
                DType::Complex64 => "c64",
                DType::Complex128 => "c128",
            };
            write!(f, "{}", s)
        } else {
            let s: &'static str = self.into();
            write!(f, "{}", s)
        }
    }
}
