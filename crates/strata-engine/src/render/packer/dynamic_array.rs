use std::sync::Arc;

/// Default number of floats per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 65_500;

/// Growable `f32` storage made of fixed-size chunks.
///
/// Appending never moves floats already written: a full chunk is left alone
/// and a new one is started. [`freeze`](Self::freeze) concatenates the chunks
/// once, at the end of a build.
#[derive(Debug, Clone)]
pub struct DynamicF32Array {
    chunk_size: usize,
    chunks: Vec<Vec<f32>>,
    len: usize,
}

impl Default for DynamicF32Array {
    fn default() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }
}

impl DynamicF32Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self { chunk_size: chunk_size.max(1), chunks: Vec::new(), len: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn push(&mut self, value: f32) {
        self.current_chunk().push(value);
        self.len += 1;
    }

    pub fn extend_from_slice(&mut self, mut values: &[f32]) {
        while !values.is_empty() {
            let size = self.chunk_size;
            let chunk = self.current_chunk();
            let room = size - chunk.len();
            let (head, tail) = values.split_at(room.min(values.len()));
            chunk.extend_from_slice(head);
            self.len += head.len();
            values = tail;
        }
    }

    /// Value at `index` across chunks.
    pub fn get(&self, index: usize) -> Option<f32> {
        if index >= self.len {
            return None;
        }
        Some(self.chunks[index / self.chunk_size][index % self.chunk_size])
    }

    /// Concatenates every chunk into one contiguous slice.
    pub fn freeze(self) -> Arc<[f32]> {
        if let [single] = self.chunks.as_slice() {
            return Arc::from(single.as_slice());
        }
        let mut out = Vec::with_capacity(self.len);
        for chunk in &self.chunks {
            out.extend_from_slice(chunk);
        }
        out.into()
    }

    /// Returns the chunk with free room, starting a new one when full.
    fn current_chunk(&mut self) -> &mut Vec<f32> {
        let full = self.chunks.last().is_none_or(|c| c.len() == self.chunk_size);
        if full {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
        }
        let last = self.chunks.len() - 1;
        &mut self.chunks[last]
    }
}
