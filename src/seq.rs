use crate::encseq::{EncodedChar, EncodedSequence, ReadMode};

/// Largest value representable with the top two bits clear. Values stored
/// in the output array may carry a round tag (`+ total_length`) and a sign
/// tag (bitwise complement) at the same time, so the fast method is only
/// safe when every tagged value stays below this bound.
pub(crate) const FIRST_TWO_BITS: usize = 1 << (usize::BITS - 2);

pub(crate) fn decide_fast_method(maxvalue: usize, len: usize) -> bool {
    maxvalue < FIRST_TWO_BITS && len > 1024
}

/// Per-symbol table that either owns its storage or is aliased onto the
/// unused tail of the output array. Aliased tables are plain offsets, so
/// dropping them never frees output memory.
pub(crate) enum Workspace {
    Owned(Vec<usize>),
    Suftab { offset: usize },
}

impl Workspace {
    #[inline]
    pub(crate) fn get(&self, suftab: &[usize], idx: usize) -> usize {
        match self {
            Workspace::Owned(values) => values[idx],
            Workspace::Suftab { offset } => suftab[offset + idx],
        }
    }

    #[inline]
    pub(crate) fn set(&mut self, suftab: &mut [usize], idx: usize, value: usize) {
        match self {
            Workspace::Owned(values) => values[idx] = value,
            Workspace::Suftab { offset } => suftab[*offset + idx] = value,
        }
    }
}

/// Where the per-symbol count of LMS suffixes lives. At the integer
/// levels it is reconstructed into the fill-pointer table once that table
/// is no longer needed for induction.
pub(crate) enum SstarStore {
    Absent,
    Owned(Vec<usize>),
    Fillptr,
}

pub(crate) enum Backend<'a> {
    Plain(&'a [u8]),
    Encoded {
        encseq: &'a dyn EncodedSequence,
        readmode: ReadMode,
    },
    /// Name sequence of a recursion level, stored inside the output array.
    Names { offset: usize },
}

/// One recursion level's view of the input plus its bucket state.
pub(crate) struct SainSeq<'a> {
    pub(crate) backend: Backend<'a>,
    pub(crate) total_length: usize,
    pub(crate) numofchars: usize,
    pub(crate) current_round: usize,
    pub(crate) bucket_size: Workspace,
    pub(crate) bucket_fillptr: Workspace,
    pub(crate) roundtable: Option<Workspace>,
    pub(crate) sstar: SstarStore,
}

impl<'a> SainSeq<'a> {
    pub(crate) fn from_plain(plainseq: &'a [u8]) -> Self {
        let total_length = plainseq.len();
        let numofchars = 256;
        let mut bucket_size = vec![0usize; numofchars];
        for &cc in plainseq {
            bucket_size[cc as usize] += 1;
        }
        let roundtable = if decide_fast_method(total_length + 1, total_length) {
            Some(Workspace::Owned(vec![0; 2 * numofchars]))
        } else {
            None
        };
        SainSeq {
            backend: Backend::Plain(plainseq),
            total_length,
            numofchars,
            current_round: 0,
            bucket_size: Workspace::Owned(bucket_size),
            bucket_fillptr: Workspace::Owned(vec![0; numofchars]),
            roundtable,
            sstar: SstarStore::Owned(vec![0; numofchars]),
        }
    }

    pub(crate) fn from_encseq(encseq: &'a dyn EncodedSequence, readmode: ReadMode) -> Self {
        let total_length = encseq.total_length();
        let numofchars = encseq.alphabet_size();
        let mut bucket_size = vec![0usize; numofchars];
        for idx in 0..numofchars {
            // Complement read modes relabel the alphabet, so the counts
            // of a symbol are those of its complement base.
            let symbol = if readmode.is_complement() {
                numofchars - 1 - idx
            } else {
                idx
            };
            bucket_size[idx] = encseq.char_count(symbol as u8);
        }
        let roundtable = if decide_fast_method(total_length + numofchars, total_length) {
            Some(Workspace::Owned(vec![0; 2 * numofchars]))
        } else {
            None
        };
        SainSeq {
            backend: Backend::Encoded { encseq, readmode },
            total_length,
            numofchars,
            current_round: 0,
            bucket_size: Workspace::Owned(bucket_size),
            bucket_fillptr: Workspace::Owned(vec![0; numofchars]),
            roundtable,
            sstar: SstarStore::Owned(vec![0; numofchars]),
        }
    }

    /// Builds the view for a recursion level over the name sequence at
    /// `suftab[offset..offset + len)`. The three bucket tables are placed
    /// into the unused tail `[firstusable, suftabentries)` of the output
    /// array when they fit, in the order size, fill pointers, round table.
    pub(crate) fn from_named_array(
        offset: usize,
        len: usize,
        numofchars: usize,
        suftab: &mut [usize],
        firstusable: usize,
        suftabentries: usize,
    ) -> Self {
        assert!(firstusable < suftabentries);
        let tail = suftabentries - firstusable;
        let bucket_size = if tail >= numofchars {
            Workspace::Suftab {
                offset: suftabentries - numofchars,
            }
        } else {
            log::debug!(
                "bucket sizes need {} entries, only {} usable; allocating separately",
                numofchars,
                tail
            );
            Workspace::Owned(vec![0; numofchars])
        };
        let bucket_fillptr = if tail >= 2 * numofchars {
            Workspace::Suftab {
                offset: suftabentries - 2 * numofchars,
            }
        } else {
            log::debug!(
                "fill pointers need {} entries, only {} usable; allocating separately",
                numofchars,
                tail
            );
            Workspace::Owned(vec![0; numofchars])
        };
        let roundtable = if decide_fast_method(len + 1, len) {
            Some(if tail >= 4 * numofchars {
                Workspace::Suftab {
                    offset: suftabentries - 4 * numofchars,
                }
            } else {
                log::debug!(
                    "round table needs {} entries, only {} usable; allocating separately",
                    2 * numofchars,
                    tail
                );
                Workspace::Owned(vec![0; 2 * numofchars])
            })
        } else {
            None
        };
        let mut seq = SainSeq {
            backend: Backend::Names { offset },
            total_length: len,
            numofchars,
            current_round: 0,
            bucket_size,
            bucket_fillptr,
            roundtable,
            sstar: SstarStore::Absent,
        };
        for charidx in 0..numofchars {
            seq.bucket_size.set(suftab, charidx, 0);
        }
        for idx in 0..len {
            let cc = suftab[offset + idx];
            let count = seq.bucket_size.get(suftab, cc);
            seq.bucket_size.set(suftab, cc, count + 1);
        }
        seq
    }

    /// Symbol at `pos`. Special positions of an encoded sequence read as
    /// a position-unique rank above every regular symbol.
    #[inline]
    pub(crate) fn get(&self, suftab: &[usize], pos: usize) -> usize {
        match &self.backend {
            Backend::Plain(plainseq) => plainseq[pos] as usize,
            Backend::Names { offset } => suftab[offset + pos],
            Backend::Encoded { encseq, readmode } => {
                match encseq.get_encoded_char(pos, *readmode) {
                    EncodedChar::Regular(cc) => cc as usize,
                    EncodedChar::Special => self.unique_rank(pos),
                }
            }
        }
    }

    #[inline]
    pub(crate) fn unique_rank(&self, pos: usize) -> usize {
        self.total_length - pos + self.numofchars
    }

    #[inline]
    pub(crate) fn fillptr_at(&self, suftab: &[usize], cc: usize) -> usize {
        self.bucket_fillptr.get(suftab, cc)
    }

    #[inline]
    pub(crate) fn set_fillptr(&mut self, suftab: &mut [usize], cc: usize, value: usize) {
        self.bucket_fillptr.set(suftab, cc, value);
    }

    /// Decrements the fill pointer of `cc` and returns the new value.
    #[inline]
    pub(crate) fn dec_fillptr(&mut self, suftab: &mut [usize], cc: usize) -> usize {
        let value = self.bucket_fillptr.get(suftab, cc) - 1;
        self.bucket_fillptr.set(suftab, cc, value);
        value
    }

    #[inline]
    pub(crate) fn bucket_size_at(&self, suftab: &[usize], cc: usize) -> usize {
        self.bucket_size.get(suftab, cc)
    }

    #[inline]
    pub(crate) fn roundtable_at(&self, suftab: &[usize], key: usize) -> usize {
        self.roundtable
            .as_ref()
            .expect("round table accessed in the simple variant")
            .get(suftab, key)
    }

    #[inline]
    pub(crate) fn set_roundtable(&mut self, suftab: &mut [usize], key: usize, value: usize) {
        self.roundtable
            .as_mut()
            .expect("round table accessed in the simple variant")
            .set(suftab, key, value);
    }

    pub(crate) fn has_sstar_counts(&self) -> bool {
        !matches!(self.sstar, SstarStore::Absent)
    }

    #[inline]
    pub(crate) fn sstar_count_at(&self, suftab: &[usize], cc: usize) -> usize {
        match &self.sstar {
            SstarStore::Owned(values) => values[cc],
            SstarStore::Fillptr => self.bucket_fillptr.get(suftab, cc),
            SstarStore::Absent => panic!("LMS counts not available"),
        }
    }

    #[inline]
    pub(crate) fn sstar_inc(&mut self, suftab: &mut [usize], cc: usize) {
        match &mut self.sstar {
            SstarStore::Owned(values) => values[cc] += 1,
            SstarStore::Fillptr => {
                let value = self.bucket_fillptr.get(suftab, cc) + 1;
                self.bucket_fillptr.set(suftab, cc, value);
            }
            SstarStore::Absent => panic!("LMS counts not available"),
        }
    }

    /// Repurposes the fill-pointer table as LMS counts and clears both it
    /// and the bucket sizes for recounting.
    pub(crate) fn reset_counts_into_fillptr(&mut self, suftab: &mut [usize]) {
        debug_assert!(matches!(self.sstar, SstarStore::Absent));
        self.sstar = SstarStore::Fillptr;
        for charidx in 0..self.numofchars {
            self.bucket_fillptr.set(suftab, charidx, 0);
            self.bucket_size.set(suftab, charidx, 0);
        }
    }

    /// `fill[c] = sum of bucket sizes below c` (head pointers).
    pub(crate) fn start_buckets(&mut self, suftab: &mut [usize]) {
        let mut previous = 0;
        self.bucket_fillptr.set(suftab, 0, 0);
        for charidx in 1..self.numofchars {
            previous += self.bucket_size.get(suftab, charidx - 1);
            self.bucket_fillptr.set(suftab, charidx, previous);
        }
    }

    /// `fill[c] = sum of bucket sizes up to and including c` (one past
    /// the bucket tail).
    pub(crate) fn end_buckets(&mut self, suftab: &mut [usize]) {
        let mut previous = self.bucket_size.get(suftab, 0);
        self.bucket_fillptr.set(suftab, 0, previous);
        for charidx in 1..self.numofchars {
            previous += self.bucket_size.get(suftab, charidx);
            self.bucket_fillptr.set(suftab, charidx, previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_resets() {
        let seq = b"abacabad";
        let mut sainseq = SainSeq::from_plain(seq);
        let mut suftab = vec![0usize; seq.len() + 1];
        sainseq.start_buckets(&mut suftab);
        assert_eq!(sainseq.fillptr_at(&suftab, b'a' as usize), 0);
        assert_eq!(sainseq.fillptr_at(&suftab, b'b' as usize), 4);
        assert_eq!(sainseq.fillptr_at(&suftab, b'c' as usize), 6);
        assert_eq!(sainseq.fillptr_at(&suftab, b'd' as usize), 7);
        sainseq.end_buckets(&mut suftab);
        assert_eq!(sainseq.fillptr_at(&suftab, b'a' as usize), 4);
        assert_eq!(sainseq.fillptr_at(&suftab, b'b' as usize), 6);
        assert_eq!(sainseq.fillptr_at(&suftab, b'c' as usize), 7);
        assert_eq!(sainseq.fillptr_at(&suftab, b'd' as usize), 8);
    }

    #[test]
    fn named_array_aliases_into_tail() {
        // 4 names over a 3-symbol alphabet; plenty of tail room.
        let mut suftab = vec![0usize; 32];
        suftab[8..12].copy_from_slice(&[2, 0, 1, 0]);
        let seq = SainSeq::from_named_array(8, 4, 3, &mut suftab, 16, 32);
        assert!(matches!(seq.bucket_size, Workspace::Suftab { offset: 29 }));
        assert!(matches!(seq.bucket_fillptr, Workspace::Suftab { offset: 26 }));
        assert!(seq.roundtable.is_none());
        assert_eq!(seq.bucket_size_at(&suftab, 0), 2);
        assert_eq!(seq.bucket_size_at(&suftab, 1), 1);
        assert_eq!(seq.bucket_size_at(&suftab, 2), 1);
    }

    #[test]
    fn named_array_falls_back_to_owned() {
        let mut suftab = vec![0usize; 8];
        suftab[2..5].copy_from_slice(&[1, 0, 1]);
        let seq = SainSeq::from_named_array(2, 3, 2, &mut suftab, 6, 8);
        assert!(matches!(seq.bucket_size, Workspace::Suftab { offset: 6 }));
        assert!(matches!(seq.bucket_fillptr, Workspace::Owned(_)));
    }

    #[test]
    fn unique_ranks_are_distinct_and_large() {
        let encseq = crate::encseq::DnaEncodedSequence::from_ascii(b"ACNNGT").unwrap();
        let sainseq = SainSeq::from_encseq(&encseq, ReadMode::Forward);
        let suftab = vec![0usize; 7];
        let first = sainseq.get(&suftab, 2);
        let second = sainseq.get(&suftab, 3);
        assert!(first >= sainseq.numofchars && second >= sainseq.numofchars);
        assert!(first > second);
    }
}
