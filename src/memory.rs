use std::collections::HashMap;

use crate::value::{ArrayHandle, Value};

/// Address-indexed store backing `T`/`F`/`B`/`S`. Unwritten addresses read as
/// the integer 0; this rewrite uses a sparse map rather than the fixed-size
/// region the native compiler allocates, since the interpreter has no static
/// memory budget to respect.
#[derive(Default)]
pub struct Memory {
    slots: HashMap<i64, Value>,
}

impl Memory {
    pub fn new() -> Memory {
        Memory {
            slots: HashMap::new(),
        }
    }

    pub fn load(&self, addr: i64) -> Value {
        self.slots.get(&addr).copied().unwrap_or(Value::Integer(0))
    }

    pub fn store(&mut self, addr: i64, value: Value) {
        self.slots.insert(addr, value);
    }
}

/// Append-only arena backing ELI arrays. Arrays are never freed or moved
/// during a run; a handle is stable for the arena's lifetime. The native
/// compiler's equivalent is a fixed bump region sized by the static memory
/// map, but the interpreter is free to grow this arena with the host
/// allocator.
#[derive(Default)]
pub struct ArrayHeap {
    arrays: Vec<Vec<i64>>,
}

impl ArrayHeap {
    pub fn new() -> ArrayHeap {
        ArrayHeap { arrays: Vec::new() }
    }

    pub fn alloc(&mut self, elements: Vec<i64>) -> ArrayHandle {
        self.arrays.push(elements);
        ArrayHandle(self.arrays.len() - 1)
    }

    pub fn alloc_scalar(&mut self, value: i64) -> ArrayHandle {
        self.alloc(vec![value])
    }

    pub fn len(&self, handle: ArrayHandle) -> i64 {
        self.arrays[handle.0].len() as i64
    }

    pub fn get(&self, handle: ArrayHandle, index: i64) -> Option<i64> {
        let array = &self.arrays[handle.0];
        if index < 0 || index as usize >= array.len() {
            None
        } else {
            Some(array[index as usize])
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unwritten_address_reads_as_zero() {
        let mem = Memory::new();
        assert_eq!(mem.load(42), Value::Integer(0));
    }

    #[test]
    fn store_then_load_round_trips() {
        let mut mem = Memory::new();
        mem.store(1, Value::Integer(99));
        assert_eq!(mem.load(1), Value::Integer(99));
        assert_eq!(mem.load(2), Value::Integer(0));
    }

    #[test]
    fn array_round_trip() {
        let mut heap = ArrayHeap::new();
        let handle = heap.alloc(vec![10, 20, 30]);
        assert_eq!(heap.len(handle), 3);
        assert_eq!(heap.get(handle, 0), Some(10));
        assert_eq!(heap.get(handle, 2), Some(30));
        assert_eq!(heap.get(handle, 3), None);
        assert_eq!(heap.get(handle, -1), None);
    }
}
