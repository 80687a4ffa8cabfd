use std::cmp::Ordering;

use crate::buffer::SainBuffer;
use crate::check::compare_lms_substrings;
use crate::seq::{Backend, SainSeq};

/// One reverse classification pass. Each position is S-type when its
/// suffix is smaller than the right neighbor's; the implicit terminator
/// is smaller than every symbol, so the rightmost position is L-type. An
/// S-type position with an L-type left neighbor is an LMS position; every
/// LMS suffix is seeded at the tail of its first-character bucket.
/// Returns the number of LMS positions.
pub(crate) fn seed_lms_suffixes(seq: &mut SainSeq, suftab: &mut [usize]) -> usize {
    let mut count_lms = 0;
    let mut buffer = SainBuffer::new(seq.numofchars);
    seq.end_buckets(suftab);
    let mut nextcc = 0;
    let mut next_is_s = false;
    for position in (0..seq.total_length).rev() {
        let currentcc = seq.get(suftab, position);
        let current_is_s = currentcc < nextcc || (currentcc == nextcc && next_is_s);
        if !current_is_s && next_is_s {
            count_lms += 1;
            if seq.has_sstar_counts() {
                seq.sstar_inc(suftab, nextcc);
            }
            // The stored value is the predecessor of the LMS position,
            // ready for the first L-induction hop.
            match &mut buffer {
                Some(buf) => buf.push(seq, suftab, nextcc, position),
                None => {
                    let putidx = seq.dec_fillptr(suftab, nextcc);
                    suftab[putidx] = position;
                }
            }
        }
        next_is_s = current_is_s;
        nextcc = currentcc;
    }
    if let Some(buf) = &mut buffer {
        buf.flush_all(seq, suftab);
    }
    assert!(2 * count_lms <= seq.total_length);
    count_lms
}

/// Fast variant setup: round-tags the first seeded LMS entry of every
/// bucket and clears the round table.
pub(crate) fn increment_first_lms(seq: &mut SainSeq, suftab: &mut [usize]) {
    let numofchars = seq.numofchars;
    let mut sum = 0;
    for charidx in 0..numofchars {
        sum += seq.bucket_size_at(suftab, charidx);
        let fill = seq.fillptr_at(suftab, charidx);
        debug_assert!(fill <= sum);
        if fill < sum {
            suftab[fill] += seq.total_length;
        }
        seq.set_roundtable(suftab, charidx, 0);
        seq.set_roundtable(suftab, charidx + numofchars, 0);
    }
}

/// Stores the length of each LMS substring at `suftab[count_lms + p/2]`,
/// where `p` is the LMS position. LMS positions are at least two apart,
/// so the half-slots are disjoint. The rightmost substring's length
/// reaches one past the sequence end, covering the terminator.
pub(crate) fn assign_lms_lengths(seq: &SainSeq, suftab: &mut [usize], count_lms: usize) {
    let mut next_lms_pos = seq.total_length;
    let mut nextcc = 0;
    let mut next_is_s = false;
    for position in (0..seq.total_length).rev() {
        let currentcc = seq.get(suftab, position);
        let current_is_s = currentcc < nextcc || (currentcc == nextcc && next_is_s);
        if !current_is_s && next_is_s {
            debug_assert!(position < next_lms_pos);
            suftab[count_lms + (position + 1) / 2] = next_lms_pos - position;
            next_lms_pos = position + 1;
        }
        next_is_s = current_is_s;
        nextcc = currentcc;
    }
}

/// Compacts the complemented LMS entries left behind by the S-pass to the
/// front of the output array, clearing every slot behind them.
pub(crate) fn move_lms_to_front(suftab: &mut [usize], count_lms: usize, nonspecialentries: usize) {
    let mut readidx = 0;
    loop {
        let entry = suftab[readidx] as isize;
        if entry >= 0 {
            break;
        }
        suftab[readidx] = !(entry as usize);
        readidx += 1;
    }
    let mut writeidx = readidx;
    if readidx < count_lms {
        readidx += 1;
        loop {
            debug_assert!(readidx < nonspecialentries);
            let entry = suftab[readidx] as isize;
            if entry < 0 {
                debug_assert!(writeidx < readidx);
                suftab[writeidx] = !(entry as usize);
                writeidx += 1;
                suftab[readidx] = 0;
                if writeidx == count_lms {
                    break;
                }
            } else {
                suftab[readidx] = 0;
            }
            readidx += 1;
        }
    }
    assert!(writeidx == count_lms);
}

/// Round-table variant of the compaction. Keeps the round tags on the
/// compacted values and returns the number of tagged entries, which is
/// exactly the number of distinct LMS substring names.
pub(crate) fn simple_move_lms_to_front(
    seq: &SainSeq,
    suftab: &mut [usize],
    count_lms: usize,
    nonspecialentries: usize,
) -> usize {
    debug_assert!(seq.roundtable.is_some());
    let mut namecount = 0;
    let mut readidx = 0;
    loop {
        let entry = suftab[readidx] as isize;
        if entry >= 0 {
            break;
        }
        let position = !(entry as usize);
        if position >= seq.total_length {
            namecount += 1;
        }
        suftab[readidx] = position;
        readidx += 1;
    }
    let mut writeidx = readidx;
    if readidx < count_lms {
        readidx += 1;
        loop {
            debug_assert!(readidx < nonspecialentries);
            let entry = suftab[readidx] as isize;
            if entry < 0 {
                let position = !(entry as usize);
                if position >= seq.total_length {
                    namecount += 1;
                }
                debug_assert!(writeidx < readidx);
                suftab[writeidx] = position;
                writeidx += 1;
                suftab[readidx] = 0;
                if writeidx == count_lms {
                    break;
                }
            } else {
                suftab[readidx] = 0;
            }
            readidx += 1;
        }
    }
    assert!(writeidx == count_lms);
    namecount
}

/// Assigns names by explicit substring comparison over the compacted
/// entries. Two neighbors share a name exactly when their LMS substrings
/// have equal length and equal symbols. Names are written to the second
/// half with a +1 offset so that zero keeps meaning "empty".
pub(crate) fn assign_lms_names(seq: &SainSeq, suftab: &mut [usize], count_lms: usize) -> usize {
    let mut previouspos = suftab[0];
    let mut previouslen = suftab[count_lms + previouspos / 2];
    let mut currentname = 1;
    suftab[count_lms + previouspos / 2] = currentname;
    for idx in 1..count_lms {
        let position = suftab[idx];
        let currentlen = suftab[count_lms + position / 2];
        let cmp = if previouslen == currentlen {
            let cmp = compare_lms_substrings(seq, suftab, previouspos, position, currentlen);
            debug_assert!(cmp != Ordering::Greater);
            cmp
        } else {
            Ordering::Less
        };
        if cmp == Ordering::Less {
            currentname += 1;
        }
        previouslen = currentlen;
        suftab[count_lms + position / 2] = currentname;
        previouspos = position;
    }
    currentname
}

/// Round-table variant of name assignment: the tags produced during
/// induction already mark the first entry of every name class, so no
/// substring comparison is needed. Scanning right to left, each tagged
/// entry closes a class and its name is one lower.
pub(crate) fn simple_assign_lms_names(
    seq: &SainSeq,
    suftab: &mut [usize],
    count_lms: usize,
    numberofnames: usize,
    nonspecialentries: usize,
) {
    if numberofnames < count_lms {
        let mut currentname = numberofnames + 1;
        for idx in (0..nonspecialentries).rev() {
            let mut position = suftab[idx];
            if position >= seq.total_length {
                position -= seq.total_length;
                debug_assert!(currentname > 0);
                currentname -= 1;
            }
            if currentname <= numberofnames {
                suftab[count_lms + position / 2] = currentname;
            }
        }
    } else {
        for idx in 0..nonspecialentries {
            if suftab[idx] >= seq.total_length {
                suftab[idx] -= seq.total_length;
            }
        }
    }
}

/// Packs the sparsely stored names contiguously behind the compacted LMS
/// entries, dropping the +1 offset.
pub(crate) fn move_names_to_front(suftab: &mut [usize], count_lms: usize, total_length: usize) {
    debug_assert!(total_length >= 2);
    let mut writeidx = count_lms;
    for readidx in count_lms..=count_lms + (total_length - 2) / 2 {
        let position = suftab[readidx];
        if position > 0 {
            suftab[writeidx] = position - 1;
            writeidx += 1;
        }
    }
    assert!(writeidx == 2 * count_lms);
}

/// Translates the recursion result (sorted indices into the LMS-position
/// list) back to original sequence positions. The LMS positions are
/// rematerialized in ascending order into the second half by one more
/// reverse scan; at the integer levels the bucket sizes and LMS counts
/// were clobbered by the sub-level and are recounted on the way.
pub(crate) fn expand_order_to_original(
    seq: &mut SainSeq,
    suftab: &mut [usize],
    numberofsuffixes: usize,
) {
    let int_backend = matches!(seq.backend, Backend::Names { .. });
    if int_backend {
        seq.reset_counts_into_fillptr(suftab);
    }
    let mut writeidx = numberofsuffixes - 1;
    let mut nextcc = 0;
    let mut next_is_s = false;
    for position in (0..seq.total_length).rev() {
        let currentcc = seq.get(suftab, position);
        let current_is_s = currentcc < nextcc || (currentcc == nextcc && next_is_s);
        if !current_is_s && next_is_s {
            if int_backend {
                seq.sstar_inc(suftab, nextcc);
            }
            suftab[numberofsuffixes + writeidx] = position + 1;
            writeidx = writeidx.wrapping_sub(1);
        }
        if int_backend {
            let size = seq.bucket_size.get(suftab, currentcc) + 1;
            seq.bucket_size.set(suftab, currentcc, size);
        }
        next_is_s = current_is_s;
        nextcc = currentcc;
    }
    for idx in 0..numberofsuffixes {
        let rank = suftab[idx];
        suftab[idx] = suftab[numberofsuffixes + rank];
    }
}

/// Recounts bucket sizes and per-symbol LMS counts for an integer level
/// whose LMS substrings were all distinct, so no recursion ran and no
/// statistics survive from construction.
pub(crate) fn determine_lms_distribution(seq: &mut SainSeq, suftab: &mut [usize]) {
    debug_assert!(matches!(seq.backend, Backend::Names { .. }));
    let mut nextcc = 0;
    let mut next_is_s = false;
    for position in (0..seq.total_length).rev() {
        let currentcc = seq.get(suftab, position);
        let current_is_s = currentcc < nextcc || (currentcc == nextcc && next_is_s);
        if !current_is_s && next_is_s {
            seq.sstar_inc(suftab, nextcc);
        }
        let size = seq.bucket_size.get(suftab, currentcc) + 1;
        seq.bucket_size.set(suftab, currentcc, size);
        next_is_s = current_is_s;
        nextcc = currentcc;
    }
}
