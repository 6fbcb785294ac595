//! Runtime values passed to and returned from module methods.
use strum::{EnumIs, EnumTryAs};

use crate::dtype::DType;

/// Symbolic tensor: only the concrete shape and element type are carried.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tensor {
    pub shape: Vec<usize>,
    pub dtype: DType,
}

impl Tensor {
    pub fn new(shape: impl Into<Vec<usize>>, dtype: DType) -> Self {
        Self {
            shape: shape.into(),
            dtype,
        }
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }
}

/// A value stored on a module or passed to one of its methods.
#[derive(Debug, Clone, PartialEq, Default, EnumIs, EnumTryAs)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tensor(Tensor),
}

impl From<Tensor> for Value {
    fn from(tensor: Tensor) -> Self {
        Value::Tensor(tensor)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}
