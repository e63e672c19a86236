use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("requested {requested} records but only {remaining} remain in the bucket")]
pub struct BucketExhausted {
    pub requested: usize,
    pub remaining: usize,
}

/// Cursor over a pre-shuffled list of record indices sharing one category.
///
/// Each index is handed out at most once; the cursor only moves forward.
#[derive(Debug, Clone)]
pub struct CategoryBucket {
    members: Vec<usize>,
    cursor: usize,
}

impl CategoryBucket {
    pub fn new(members: Vec<usize>) -> Self {
        Self { members, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.members.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Takes exactly `n` indices, or nothing at all.
    pub fn take(&mut self, n: usize) -> Result<&[usize], BucketExhausted> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(BucketExhausted {
                requested: n,
                remaining,
            });
        }

        let start = self.cursor;
        self.cursor += n;
        Ok(&self.members[start..self.cursor])
    }

    /// Takes `n` indices or whatever is left, whichever is smaller.
    pub fn take_up_to(&mut self, n: usize) -> &[usize] {
        let n = n.min(self.remaining());
        let start = self.cursor;
        self.cursor += n;
        &self.members[start..self.cursor]
    }
}
