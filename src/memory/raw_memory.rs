use std::ops::{Index, IndexMut, Range};

// A chunk of primitive memory. Allows indexing on u32s instead of usizes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RawMemory(Vec<u8>);

impl RawMemory {
    pub fn new(size: u32) -> Self {
        Self(vec![0; size as usize])
    }

    pub fn from_vec(vec: Vec<u8>) -> Self {
        assert!(vec.len() <= u32::MAX as usize);
        Self(vec)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0[..]
    }

    pub fn maybe_slice(&self, range: Range<u32>) -> Option<&[u8]> {
        self.0.get(range.start as usize..range.end as usize)
    }

    // Overwrites bytes starting at `start`. Returns false, leaving memory untouched, if they don't fit.
    pub fn write_at(&mut self, start: u32, data: &[u8]) -> bool {
        let start = start as usize;
        let Some(end) = start.checked_add(data.len()) else {
            return false;
        };

        match self.0.get_mut(start..end) {
            Some(dest) => {
                dest.copy_from_slice(data);
                true
            }
            None => false,
        }
    }

    pub fn size(&self) -> u32 {
        self.0.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<u32> for RawMemory {
    type Output = u8;

    fn index(&self, index: u32) -> &u8 {
        &self.0[index as usize]
    }
}

impl IndexMut<u32> for RawMemory {
    fn index_mut(&mut self, index: u32) -> &mut u8 {
        &mut self.0[index as usize]
    }
}
