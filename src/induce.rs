use crate::encseq::{range_reverse, EncodedSequence, ReadMode};
use crate::seq::{Backend, SainSeq};

/// Cached head/tail pointer of the bucket currently being appended to.
/// The fill pointer of a symbol is only touched when the symbol changes;
/// in between, writes go through the cached index.
struct BucketPtr {
    idx: Option<usize>,
    lastupdatecc: usize,
}

impl BucketPtr {
    fn new() -> Self {
        BucketPtr {
            idx: None,
            lastupdatecc: 0,
        }
    }

    #[inline]
    fn locate(&mut self, seq: &mut SainSeq, suftab: &mut [usize], currentcc: usize) -> usize {
        match self.idx {
            Some(idx) if self.lastupdatecc == currentcc => idx,
            Some(idx) => {
                seq.set_fillptr(suftab, self.lastupdatecc, idx);
                let idx = seq.fillptr_at(suftab, currentcc);
                self.idx = Some(idx);
                self.lastupdatecc = currentcc;
                idx
            }
            None => {
                let idx = seq.fillptr_at(suftab, currentcc);
                self.idx = Some(idx);
                self.lastupdatecc = currentcc;
                idx
            }
        }
    }

    #[inline]
    fn store(&mut self, idx: usize) {
        self.idx = Some(idx);
    }
}

fn encoded_backend<'a>(seq: &SainSeq<'a>) -> Option<(&'a dyn EncodedSequence, ReadMode)> {
    match &seq.backend {
        Backend::Encoded { encseq, readmode } => Some((*encseq, *readmode)),
        _ => None,
    }
}

/// Seeds the rightmost suffix at the head of its bucket. The suffix at
/// `total_length - 1` is L-type (the implicit terminator is smaller than
/// every symbol) and cannot be reached by scanning the output array, so
/// both L-passes start from it. `substring_pass` selects the pre-naming
/// value convention (predecessor position, round-tagged in the fast
/// variant) over the post-naming one (actual position).
fn seed_last_suffix(seq: &mut SainSeq, suftab: &mut [usize], substring_pass: bool) {
    let last = seq.total_length - 1;
    let currentcc = seq.get(suftab, last);
    if currentcc >= seq.numofchars {
        return;
    }
    let putidx = seq.fillptr_at(suftab, currentcc);
    seq.set_fillptr(suftab, currentcc, putidx + 1);
    if substring_pass {
        debug_assert!(last > 0);
        let mut value = last - 1;
        let leftcontextcc = seq.get(suftab, value);
        if seq.roundtable.is_some() {
            let key = (currentcc << 1) | usize::from(leftcontextcc < currentcc);
            if seq.roundtable_at(suftab, key) < seq.current_round {
                let round = seq.current_round;
                seq.set_roundtable(suftab, key, round);
            }
            value += seq.total_length;
        }
        suftab[putidx] = if leftcontextcc < currentcc { !value } else { value };
    } else {
        let tagged = last > 0 && seq.get(suftab, last - 1) < currentcc;
        suftab[putidx] = if tagged { !last } else { last };
    }
}

/// Pre-naming L-induction: left-to-right scan appending the predecessor
/// of every defined suffix to the head of its bucket. Entries store the
/// predecessor position of the suffix they stand for; a complemented
/// entry marks a suffix whose predecessor is S-type and is left for the
/// S-pass. Processed slots are cleared.
pub(crate) fn induce_l_substrings(seq: &mut SainSeq, suftab: &mut [usize], nonspecialentries: usize) {
    let mut bucketptr = BucketPtr::new();
    seq.current_round = 0;
    seed_last_suffix(seq, suftab, true);
    for idx in 0..nonspecialentries {
        let entry = suftab[idx] as isize;
        if entry > 0 {
            let mut position = entry as usize;
            if position >= seq.total_length {
                debug_assert!(seq.roundtable.is_some());
                seq.current_round += 1;
                position -= seq.total_length;
            }
            let currentcc = seq.get(suftab, position);
            if currentcc < seq.numofchars {
                if position > 0 {
                    position -= 1;
                    let leftcontextcc = seq.get(suftab, position);
                    if seq.roundtable.is_some() {
                        let key = (currentcc << 1) | usize::from(leftcontextcc < currentcc);
                        debug_assert!(seq.roundtable_at(suftab, key) <= seq.current_round);
                        if seq.roundtable_at(suftab, key) < seq.current_round {
                            position += seq.total_length;
                            let round = seq.current_round;
                            seq.set_roundtable(suftab, key, round);
                        }
                    }
                    let putidx = bucketptr.locate(seq, suftab, currentcc);
                    debug_assert!(idx < putidx);
                    suftab[putidx] = if leftcontextcc < currentcc { !position } else { position };
                    bucketptr.store(putidx + 1);
                    suftab[idx] = 0;
                }
            } else {
                suftab[idx] = 0;
            }
        } else if entry < 0 {
            suftab[idx] = !(entry as usize);
        }
    }
    if seq.roundtable.is_none() {
        return;
    }
    // Round-tag cleanup: every untagged in-range entry becomes tagged and
    // the nearest tagged entry to its left loses the tag, keeping one
    // tagged representative per name class and round.
    let total = seq.total_length as isize;
    let mut idx = nonspecialentries as isize - 1;
    while idx >= 0 {
        let entry = suftab[idx as usize] as isize;
        if entry > 0 && entry < total {
            suftab[idx as usize] = entry as usize + seq.total_length;
            let mut nextgteq = idx - 1;
            while nextgteq >= 0 && (suftab[nextgteq as usize] as isize) < total {
                nextgteq -= 1;
            }
            if nextgteq >= 0 && suftab[nextgteq as usize] as isize >= total {
                suftab[nextgteq as usize] -= seq.total_length;
            }
            idx = nextgteq - 1;
        } else {
            idx -= 1;
        }
    }
}

/// Seeds the S-type suffix `position` at the tail of its bucket in the
/// pre-naming pass. Used for suffixes immediately left of a special
/// range, which the array scan cannot reach.
fn single_s_substring(seq: &mut SainSeq, suftab: &mut [usize], position: usize) {
    let currentcc = seq.get(suftab, position);
    if currentcc >= seq.numofchars {
        return;
    }
    let putidx = seq.dec_fillptr(suftab, currentcc);
    debug_assert!(position > 0);
    let mut position = position - 1;
    let leftcontextcc = seq.get(suftab, position);
    if seq.roundtable.is_some() {
        let key = (currentcc << 1) | usize::from(leftcontextcc > currentcc);
        debug_assert!(seq.roundtable_at(suftab, key) <= seq.current_round);
        if seq.roundtable_at(suftab, key) < seq.current_round {
            let round = seq.current_round;
            seq.set_roundtable(suftab, key, round);
        }
        position += seq.total_length;
    }
    suftab[putidx] = if leftcontextcc > currentcc {
        !(position + 1)
    } else {
        position
    };
}

/// Suffixes whose right neighbor is special rank highest within their
/// bucket, earlier positions above later ones, so ranges are visited in
/// ascending read order and each seed takes the next free tail slot.
fn seed_s_substrings_from_special_ranges(
    seq: &mut SainSeq,
    encseq: &dyn EncodedSequence,
    readmode: ReadMode,
    suftab: &mut [usize],
) {
    if !encseq.has_special_ranges() {
        return;
    }
    for range in encseq.special_ranges(readmode.is_reverse()) {
        let range = if readmode.is_reverse() {
            range_reverse(seq.total_length, &range)
        } else {
            range
        };
        if range.start > 1 {
            single_s_substring(seq, suftab, range.start - 1);
        }
    }
}

/// Pre-naming S-induction: right-to-left scan appending predecessors to
/// bucket tails. A complemented entry stores the actual position of an
/// LMS suffix; those survive the pass and are collected afterwards.
pub(crate) fn induce_s_substrings(seq: &mut SainSeq, suftab: &mut [usize], nonspecialentries: usize) {
    let mut bucketptr = BucketPtr::new();
    if let Some((encseq, readmode)) = encoded_backend(seq) {
        seed_s_substrings_from_special_ranges(seq, encseq, readmode, suftab);
    }
    if nonspecialentries == 0 {
        return;
    }
    for idx in (0..nonspecialentries).rev() {
        let entry = suftab[idx] as isize;
        if entry > 0 {
            let mut position = entry as usize;
            if position >= seq.total_length {
                debug_assert!(seq.roundtable.is_some());
                seq.current_round += 1;
                position -= seq.total_length;
            }
            if position > 0 {
                let currentcc = seq.get(suftab, position);
                if currentcc < seq.numofchars {
                    position -= 1;
                    let leftcontextcc = seq.get(suftab, position);
                    if seq.roundtable.is_some() {
                        let key = (currentcc << 1) | usize::from(leftcontextcc > currentcc);
                        debug_assert!(seq.roundtable_at(suftab, key) <= seq.current_round);
                        if seq.roundtable_at(suftab, key) < seq.current_round {
                            position += seq.total_length;
                            let round = seq.current_round;
                            seq.set_roundtable(suftab, key, round);
                        }
                    }
                    let putidx = bucketptr.locate(seq, suftab, currentcc) - 1;
                    debug_assert!(putidx < idx);
                    suftab[putidx] = if leftcontextcc > currentcc {
                        !(position + 1)
                    } else {
                        position
                    };
                    bucketptr.store(putidx);
                }
            }
            suftab[idx] = 0;
        }
    }
}

/// Post-naming L-induction. Entries hold actual suffix positions; every
/// visited slot is complemented to mark it finalized, and the S-pass
/// flips it back.
pub(crate) fn induce_l_suffixes(seq: &mut SainSeq, suftab: &mut [usize], nonspecialentries: usize) {
    let mut bucketptr = BucketPtr::new();
    seed_last_suffix(seq, suftab, false);
    for idx in 0..nonspecialentries {
        let entry = suftab[idx] as isize;
        suftab[idx] = !(entry as usize);
        if entry > 0 {
            let position = entry as usize - 1;
            let currentcc = seq.get(suftab, position);
            if currentcc < seq.numofchars {
                let putidx = bucketptr.locate(seq, suftab, currentcc);
                debug_assert!(idx < putidx);
                let tagged = position > 0 && seq.get(suftab, position - 1) < currentcc;
                suftab[putidx] = if tagged { !position } else { position };
                bucketptr.store(putidx + 1);
            }
        }
    }
}

fn single_s_suffix(
    seq: &mut SainSeq,
    suftab: &mut [usize],
    position: usize,
    nonspecialentries: usize,
) {
    let position = position - 1;
    let currentcc = seq.get(suftab, position);
    if currentcc >= seq.numofchars {
        return;
    }
    let putidx = seq.dec_fillptr(suftab, currentcc);
    debug_assert!(putidx < nonspecialentries);
    let tagged = position == 0 || seq.get(suftab, position - 1) > currentcc;
    suftab[putidx] = if tagged { !position } else { position };
}

fn seed_s_suffixes_from_special_ranges(
    seq: &mut SainSeq,
    encseq: &dyn EncodedSequence,
    readmode: ReadMode,
    suftab: &mut [usize],
    nonspecialentries: usize,
) {
    if !encseq.has_special_ranges() {
        return;
    }
    for range in encseq.special_ranges(readmode.is_reverse()) {
        let range = if readmode.is_reverse() {
            range_reverse(seq.total_length, &range)
        } else {
            range
        };
        if range.start > 0 {
            single_s_suffix(seq, suftab, range.start, nonspecialentries);
        }
    }
}

/// Post-naming S-induction; its output is the final suffix order.
pub(crate) fn induce_s_suffixes(seq: &mut SainSeq, suftab: &mut [usize], nonspecialentries: usize) {
    let mut bucketptr = BucketPtr::new();
    if let Some((encseq, readmode)) = encoded_backend(seq) {
        seed_s_suffixes_from_special_ranges(seq, encseq, readmode, suftab, nonspecialentries);
    }
    if nonspecialentries == 0 {
        return;
    }
    for idx in (0..nonspecialentries).rev() {
        let entry = suftab[idx] as isize;
        if entry > 0 {
            let position = entry as usize - 1;
            let currentcc = seq.get(suftab, position);
            if currentcc < seq.numofchars {
                let putidx = bucketptr.locate(seq, suftab, currentcc) - 1;
                debug_assert!(putidx < idx);
                let tagged = position == 0 || seq.get(suftab, position - 1) > currentcc;
                suftab[putidx] = if tagged { !position } else { position };
                bucketptr.store(putidx);
            }
        } else {
            suftab[idx] = !(entry as usize);
        }
    }
}
