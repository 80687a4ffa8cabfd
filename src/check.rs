use std::cmp::Ordering;

use crate::encseq::{range_reverse, EncodedChar, EncodedSequence, ReadMode};
use crate::seq::SainSeq;

/// Compares two LMS substrings of equal stored length symbol by symbol.
/// Running into the sequence end means running into the terminator, which
/// is smaller than every symbol.
pub(crate) fn compare_lms_substrings(
    seq: &SainSeq,
    suftab: &[usize],
    mut start1: usize,
    mut start2: usize,
    len: usize,
) -> Ordering {
    debug_assert!(start1 <= seq.total_length && start2 <= seq.total_length && start1 != start2);
    let end1 = start1 + len;
    while start1 < end1 {
        if start1 == seq.total_length {
            return Ordering::Less;
        }
        if start2 == seq.total_length {
            return Ordering::Greater;
        }
        let cc1 = seq.get(suftab, start1);
        let cc2 = seq.get(suftab, start2);
        match cc1.cmp(&cc2) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        start1 += 1;
        start2 += 1;
    }
    Ordering::Equal
}

pub(crate) fn compare_suffixes(
    seq: &SainSeq,
    suftab: &[usize],
    mut start1: usize,
    mut start2: usize,
) -> Ordering {
    debug_assert!(start1 <= seq.total_length && start2 <= seq.total_length && start1 != start2);
    loop {
        if start1 == seq.total_length {
            return Ordering::Less;
        }
        if start2 == seq.total_length {
            return Ordering::Greater;
        }
        let cc1 = seq.get(suftab, start1);
        let cc2 = seq.get(suftab, start2);
        match cc1.cmp(&cc2) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        start1 += 1;
        start2 += 1;
    }
}

/// Verifies that `suftab[start..=end]` is strictly increasing in suffix
/// order. A violation is a programming error and aborts.
pub(crate) fn check_order(seq: &SainSeq, suftab: &[usize], start: usize, end: usize) {
    for idx in start + 1..=end {
        let cmp = compare_suffixes(seq, suftab, suftab[idx - 1], suftab[idx]);
        if cmp != Ordering::Less {
            panic!(
                "order check in [{}, {}] failed at {}: suffix {} >= suffix {}",
                start,
                end,
                idx,
                suftab[idx - 1],
                suftab[idx]
            );
        }
    }
}

fn special_rank(encseq: &dyn EncodedSequence, pos: usize) -> usize {
    encseq.total_length() - pos + encseq.alphabet_size()
}

/// Linear-time verification of a finished table over an encoded sequence.
///
/// Checks that `suftab[0..=total_length]` is a permutation of all
/// positions plus the empty suffix, that the non-special prefix is in
/// strict suffix order (first characters non-decreasing, ties broken by
/// the ranks of the successor suffixes), and that the tail holds the
/// special positions in read order followed by the empty suffix.
/// Panics on any violation.
pub fn suftab_lightweight_check(
    encseq: &dyn EncodedSequence,
    readmode: ReadMode,
    totallength: usize,
    suftab: &[usize],
) {
    assert!(suftab.len() > totallength);
    let numofchars = encseq.alphabet_size();
    let nonspecial = totallength - encseq.special_characters();

    let mut inverse = vec![usize::MAX; totallength + 1];
    for (rank, &position) in suftab[..=totallength].iter().enumerate() {
        assert!(position <= totallength, "entry {} out of range", position);
        assert!(
            inverse[position] == usize::MAX,
            "position {} occurs twice",
            position
        );
        inverse[position] = rank;
    }
    assert_eq!(suftab[totallength], totallength, "empty suffix misplaced");

    for idx in 1..nonspecial {
        let prev = suftab[idx - 1];
        let cur = suftab[idx];
        let prevcc = match encseq.get_encoded_char(prev, readmode) {
            EncodedChar::Regular(cc) => cc as usize,
            EncodedChar::Special => panic!("special suffix {} in sorted prefix", prev),
        };
        let curcc = match encseq.get_encoded_char(cur, readmode) {
            EncodedChar::Regular(cc) => cc as usize,
            EncodedChar::Special => panic!("special suffix {} in sorted prefix", cur),
        };
        assert!(
            prevcc <= curcc,
            "first characters out of order at rank {}: {} > {}",
            idx,
            prevcc,
            curcc
        );
        if prevcc == curcc {
            // Tails: the terminator is smallest, specials are above every
            // regular symbol with earlier positions ranking higher, and
            // regular tails compare by their already-verified ranks.
            let prev_tail = prev + 1;
            let cur_tail = cur + 1;
            let ordered = if prev_tail == totallength {
                true
            } else if cur_tail == totallength {
                false
            } else {
                let prev_special =
                    matches!(encseq.get_encoded_char(prev_tail, readmode), EncodedChar::Special);
                let cur_special =
                    matches!(encseq.get_encoded_char(cur_tail, readmode), EncodedChar::Special);
                match (prev_special, cur_special) {
                    (true, true) => special_rank(encseq, prev_tail) < special_rank(encseq, cur_tail),
                    (true, false) => false,
                    (false, true) => true,
                    (false, false) => inverse[prev_tail] < inverse[cur_tail],
                }
            };
            assert!(
                ordered,
                "suffixes {} and {} out of order at rank {}",
                prev, cur, idx
            );
        }
    }

    let mut tailidx = nonspecial;
    for range in encseq.special_ranges(readmode.is_reverse()) {
        let range = if readmode.is_reverse() {
            range_reverse(totallength, &range)
        } else {
            range
        };
        for position in range {
            assert_eq!(
                suftab[tailidx], position,
                "special position misplaced at rank {}",
                tailidx
            );
            tailidx += 1;
        }
    }
    assert_eq!(tailidx, totallength, "special count mismatch");
}
