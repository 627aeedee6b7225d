//! Fixed-capacity circular buffer.
//!
//! Elements are addressed by *logical* index: `0` is the oldest retained
//! element and `len() - 1` the most recent one. Before the buffer has wrapped
//! the logical index equals the physical slot; afterwards it is offset by the
//! write cursor.
use crate::error::ReplayError;

/// A fixed-capacity ring store that overwrites its oldest element once full.
///
/// The buffer is generic over the element type. Numeric helpers such as
/// [`max`](CircularBuffer::max) are available when the element is
/// `Copy + PartialOrd`.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularBuffer<T> {
    /// Maximum number of elements.
    capacity: usize,

    /// Physical slot written by the next append.
    i: usize,

    /// Backing storage. Grows up to `capacity` and is then overwritten in place.
    data: Vec<T>,
}

impl<T> CircularBuffer<T> {
    /// Creates an empty buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::ZeroCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ReplayError> {
        if capacity == 0 {
            return Err(ReplayError::ZeroCapacity);
        }

        Ok(Self {
            capacity,
            i: 0,
            data: Vec::with_capacity(capacity),
        })
    }

    /// Returns the maximum number of elements.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of valid elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` once every slot holds a value.
    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// Returns the physical slot written by the next append.
    pub fn cursor(&self) -> usize {
        self.i
    }

    /// Physical slot of the oldest element.
    #[inline]
    fn start(&self) -> usize {
        if self.is_full() {
            self.i
        } else {
            0
        }
    }

    /// Maps a logical index to its physical slot.
    #[inline]
    fn physical(&self, ix: usize) -> Result<usize, ReplayError> {
        if ix >= self.data.len() {
            return Err(ReplayError::IndexOutOfRange {
                index: ix,
                len: self.data.len(),
            });
        }
        Ok((self.start() + ix) % self.capacity)
    }

    /// Appends a value, returning the element it evicted, if any.
    pub fn append(&mut self, value: T) -> Option<T> {
        let evicted = if self.data.len() < self.capacity {
            self.data.push(value);
            None
        } else {
            Some(std::mem::replace(&mut self.data[self.i], value))
        };
        self.i = (self.i + 1) % self.capacity;
        evicted
    }

    /// Returns the element at logical index `ix`.
    pub fn get(&self, ix: usize) -> Option<&T> {
        self.physical(ix).ok().map(|p| &self.data[p])
    }

    /// Returns a mutable reference to the element at logical index `ix`.
    pub fn get_mut(&mut self, ix: usize) -> Option<&mut T> {
        match self.physical(ix) {
            Ok(p) => Some(&mut self.data[p]),
            Err(_) => None,
        }
    }

    /// Overwrites the element at logical index `ix` and returns the old one.
    pub fn set(&mut self, ix: usize, value: T) -> Result<T, ReplayError> {
        let p = self.physical(ix)?;
        Ok(std::mem::replace(&mut self.data[p], value))
    }

    /// Applies `f` to each element addressed by `ixs`, paired with the
    /// corresponding entry of `values`.
    ///
    /// Indices are validated before anything is modified, so the buffer is
    /// left untouched on error. The cursor and length never change.
    pub fn batch_modify<V, F>(
        &mut self,
        ixs: &[usize],
        values: &[V],
        mut f: F,
    ) -> Result<(), ReplayError>
    where
        F: FnMut(&mut T, &V),
    {
        if ixs.len() != values.len() {
            return Err(ReplayError::LengthMismatch {
                expected: ixs.len(),
                actual: values.len(),
            });
        }

        let slots = ixs
            .iter()
            .map(|&ix| self.physical(ix))
            .collect::<Result<Vec<_>, _>>()?;

        for (p, v) in slots.into_iter().zip(values.iter()) {
            f(&mut self.data[p], v);
        }

        Ok(())
    }

    /// Returns an iterator over the elements from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (newer, older) = self.data.split_at(self.start());
        older.iter().chain(newer.iter())
    }

    /// Returns the largest `key` over the valid elements, or `default` if
    /// the buffer is empty. `NaN` keys are ignored.
    pub fn max_by_key<K, F>(&self, default: K, key: F) -> K
    where
        K: Copy + PartialOrd,
        F: Fn(&T) -> K,
    {
        let mut it = self.data.iter().map(key);
        match it.next() {
            None => default,
            Some(first) => it.fold(first, |m, k| {
                if k > m || m.partial_cmp(&m).is_none() {
                    k
                } else {
                    m
                }
            }),
        }
    }
}

impl<T: Clone> CircularBuffer<T> {
    /// Overwrites the elements addressed by `ixs` with `values`.
    pub fn batch_update(&mut self, ixs: &[usize], values: &[T]) -> Result<(), ReplayError> {
        self.batch_modify(ixs, values, |slot, v| *slot = v.clone())
    }

    /// Returns all valid elements in chronological order, oldest first.
    pub fn unravel(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Copy + PartialOrd> CircularBuffer<T> {
    /// Returns the maximum stored value, or `default` if the buffer is empty.
    ///
    /// Only valid slots are scanned.
    pub fn max(&self, default: T) -> T {
        self.max_by_key(default, |v| *v)
    }
}
