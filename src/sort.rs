use crate::check::{check_order, suftab_lightweight_check};
use crate::encseq::{range_reverse, EncodedSequence, ReadMode};
use crate::induce::{induce_l_substrings, induce_l_suffixes, induce_s_substrings, induce_s_suffixes};
use crate::name::{
    assign_lms_lengths, assign_lms_names, determine_lms_distribution, expand_order_to_original,
    increment_first_lms, move_lms_to_front, move_names_to_front, seed_lms_suffixes,
    simple_assign_lms_names, simple_move_lms_to_front,
};
use crate::seq::{Backend, SainSeq};
use crate::timer::PhaseTimer;

fn show_progress(timer: &mut Option<&mut PhaseTimer>, description: &str) {
    if let Some(timer) = timer.as_deref_mut() {
        timer.show_progress(description);
    }
}

fn set_undefined(suftab: &mut [usize], start: usize, end: usize) {
    for slot in &mut suftab[start..=end] {
        *slot = 0;
    }
}

/// Distributes the sorted LMS suffixes from the front of the output array
/// to the tails of their first-character buckets, right to left, clearing
/// the bucket slack in between.
fn insert_sorted_lms_suffixes(
    seq: &SainSeq,
    suftab: &mut [usize],
    readidx: usize,
    nonspecialentries: usize,
) {
    let mut readidx = readidx;
    let mut fillidx = nonspecialentries;
    for cc in (0..seq.numofchars).rev() {
        let lms_count = seq.sstar_count_at(suftab, cc);
        if lms_count > 0 {
            let putidx = fillidx - 1;
            debug_assert!(readidx <= putidx);
            if readidx < putidx {
                for offset in 0..lms_count {
                    suftab[putidx - offset] = suftab[readidx - offset];
                    suftab[readidx - offset] = 0;
                }
            }
        }
        let size = seq.bucket_size_at(suftab, cc);
        debug_assert!(fillidx >= size && size >= lms_count);
        fillidx -= size;
        if size > lms_count {
            set_undefined(suftab, fillidx, fillidx + size - lms_count - 1);
        }
        readidx = readidx.wrapping_sub(lms_count);
    }
}

/// Appends every special position in read order behind the sorted
/// non-special suffixes, then the empty suffix.
fn fill_tail_suffixes(suftab_tail: &mut [usize], encseq: &dyn EncodedSequence, readmode: ReadMode) {
    let specialcharacters = encseq.special_characters();
    let totallength = encseq.total_length();
    let mut countspecial = 0;
    for range in encseq.special_ranges(readmode.is_reverse()) {
        let range = if readmode.is_reverse() {
            range_reverse(totallength, &range)
        } else {
            range
        };
        for idx in range {
            debug_assert!(countspecial < specialcharacters && idx < totallength);
            suftab_tail[countspecial] = idx;
            countspecial += 1;
        }
    }
    assert!(countspecial == specialcharacters);
    suftab_tail[specialcharacters] = totallength;
}

fn sort_recursive(
    level: u32,
    seq: &mut SainSeq,
    suftab: &mut [usize],
    firstusable: usize,
    nonspecialentries: usize,
    suftabentries: usize,
    intermediate_check: bool,
    verbose: bool,
    timer: &mut Option<&mut PhaseTimer>,
) {
    if verbose {
        println!(
            "level {}: sort sequence of length {} over {} symbols ({:.2})",
            level,
            seq.total_length,
            seq.numofchars,
            seq.numofchars as f64 / seq.total_length as f64
        );
    }
    show_progress(timer, "seed LMS suffixes");
    let count_lms = seed_lms_suffixes(seq, suftab);
    if verbose {
        println!(
            "LMS positions: {} ({:.2})",
            count_lms,
            count_lms as f64 / seq.total_length as f64
        );
    }
    if count_lms > 0 {
        if seq.roundtable.is_some() {
            increment_first_lms(seq, suftab);
        }
        seq.start_buckets(suftab);
        show_progress(timer, "induce L suffixes");
        induce_l_substrings(seq, suftab, nonspecialentries);
        seq.end_buckets(suftab);
        show_progress(timer, "induce S suffixes");
        induce_s_substrings(seq, suftab, nonspecialentries);
        let numberofnames = if seq.roundtable.is_none() {
            show_progress(timer, "compact LMS suffixes");
            move_lms_to_front(suftab, count_lms, nonspecialentries);
            show_progress(timer, "assign LMS substring lengths");
            assign_lms_lengths(seq, suftab, count_lms);
            show_progress(timer, "assign LMS names");
            assign_lms_names(seq, suftab, count_lms)
        } else {
            show_progress(timer, "compact LMS suffixes");
            let numberofnames = simple_move_lms_to_front(seq, suftab, count_lms, nonspecialentries);
            // The sub-level may reuse the aliased round-table region.
            seq.roundtable = None;
            show_progress(timer, "assign LMS names");
            simple_assign_lms_names(seq, suftab, count_lms, numberofnames, nonspecialentries);
            numberofnames
        };
        assert!(numberofnames <= count_lms);
        if numberofnames < count_lms {
            // The name sequence now sits at [count_lms, 2 * count_lms).
            show_progress(timer, "compact names");
            set_undefined(suftab, 0, count_lms - 1);
            move_names_to_front(suftab, count_lms, seq.total_length);
            let firstusable = if level == 0 { 2 * count_lms } else { firstusable };
            let mut subseq = SainSeq::from_named_array(
                count_lms,
                count_lms,
                numberofnames,
                suftab,
                firstusable,
                suftabentries,
            );
            sort_recursive(
                level + 1,
                &mut subseq,
                suftab,
                firstusable,
                count_lms,
                suftabentries,
                intermediate_check,
                verbose,
                timer,
            );
            show_progress(timer, "expand to original positions");
            expand_order_to_original(seq, suftab, count_lms);
        } else if matches!(seq.backend, Backend::Names { .. }) {
            seq.reset_counts_into_fillptr(suftab);
            determine_lms_distribution(seq, suftab);
        }
    }
    if intermediate_check && count_lms > 0 {
        check_order(seq, suftab, 0, count_lms - 1);
    }
    show_progress(timer, "insert sorted LMS suffixes");
    if count_lms > 0 {
        insert_sorted_lms_suffixes(seq, suftab, count_lms - 1, nonspecialentries);
    }
    seq.start_buckets(suftab);
    show_progress(timer, "induce L suffixes");
    induce_l_suffixes(seq, suftab, nonspecialentries);
    seq.end_buckets(suftab);
    show_progress(timer, "induce S suffixes");
    induce_s_suffixes(seq, suftab, nonspecialentries);
    if intermediate_check && nonspecialentries > 0 {
        check_order(seq, suftab, 0, nonspecialentries - 1);
    }
}

/// Sorts all suffixes of a byte sequence.
///
/// Returns the output array of `seq.len() + 1` words; the first
/// `seq.len()` entries are the suffix start positions in lexicographic
/// order, where the implicit terminator is smaller than every byte.
///
/// `intermediate_check` verifies the partial orders after each recursion
/// level and aborts on a violation. `verbose` prints per-level statistics
/// to stdout. `timer` reports the elapsed time of each phase.
pub fn sort_suffixes_plain(
    plainseq: &[u8],
    intermediate_check: bool,
    verbose: bool,
    mut timer: Option<&mut PhaseTimer>,
) -> Vec<usize> {
    let suftabentries = plainseq.len() + 1;
    let mut suftab = vec![0; suftabentries];
    if !plainseq.is_empty() {
        let mut seq = SainSeq::from_plain(plainseq);
        sort_recursive(
            0,
            &mut seq,
            &mut suftab,
            0,
            plainseq.len(),
            suftabentries,
            intermediate_check,
            verbose,
            &mut timer,
        );
    }
    suftab
}

/// Sorts the suffixes of an encoded sequence under the given read mode.
///
/// All non-special suffixes land in `SUF[0..nonspecial)` in lexicographic
/// order; special positions compare above every regular symbol and are
/// not sorted in place. With `final_check`, the special positions are
/// appended in read order, the empty suffix is placed at `SUF[N]`, and
/// the finished table is verified.
pub fn sort_suffixes_encoded(
    encseq: &dyn EncodedSequence,
    readmode: ReadMode,
    intermediate_check: bool,
    final_check: bool,
    verbose: bool,
    mut timer: Option<&mut PhaseTimer>,
) -> Vec<usize> {
    let totallength = encseq.total_length();
    let nonspecialentries = totallength - encseq.special_characters();
    let suftabentries = totallength + 1;
    let mut suftab = vec![0; suftabentries];
    if totallength > 0 {
        let mut seq = SainSeq::from_encseq(encseq, readmode);
        sort_recursive(
            0,
            &mut seq,
            &mut suftab,
            0,
            nonspecialentries,
            suftabentries,
            intermediate_check,
            verbose,
            &mut timer,
        );
    }
    if final_check {
        show_progress(&mut timer, "fill tail suffixes");
        fill_tail_suffixes(&mut suftab[nonspecialentries..], encseq, readmode);
        show_progress(&mut timer, "check suffix order");
        suftab_lightweight_check(encseq, readmode, totallength, &suftab);
    }
    suftab
}
