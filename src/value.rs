/// An index into a [`crate::memory::ArrayHeap`]'s backing storage. Stable for
/// the lifetime of the run; arrays are never moved or freed once allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArrayHandle(pub(crate) usize);

/// A value on the operand stack or in a memory slot.
///
/// ELI has exactly two shapes of data: plain integers and references to
/// arrays living in the append-only array heap. Arrays are never spilled
/// onto the operand stack element-by-element; only their handle travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    ArrayRef(ArrayHandle),
}

impl Value {
    pub fn as_integer(self, op: char) -> Result<i64, crate::error::Error> {
        match self {
            Value::Integer(n) => Ok(n),
            Value::ArrayRef(_) => Err(crate::error::Error::TypeMismatch { op }),
        }
    }

    pub fn as_array(self, op: char) -> Result<ArrayHandle, crate::error::Error> {
        match self {
            Value::ArrayRef(handle) => Ok(handle),
            Value::Integer(_) => Err(crate::error::Error::TypeMismatch { op }),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Integer(n)
    }
}
