use quickcheck::{QuickCheck, Testable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sainsort::{
    sort_suffixes_encoded, sort_suffixes_plain, DnaEncodedSequence, EncodedChar, EncodedSequence,
    PhaseTimer, ReadMode, SuffixTable,
};

fn qc<T: Testable>(f: T) {
    QuickCheck::new().tests(1000).max_tests(10000).quickcheck(f);
}

/// Reference implementation: sort all start positions by suffix slice.
/// Slice comparison ranks a proper prefix below its extensions, which is
/// exactly the implicit-terminator contract of the sorter.
fn naive_suffix_array(text: &[u8]) -> Vec<usize> {
    let mut table: Vec<usize> = (0..text.len()).collect();
    table.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
    table
}

fn sais(text: &[u8]) -> Vec<usize> {
    let suftab = sort_suffixes_plain(text, true, false, None);
    suftab[..text.len()].to_vec()
}

#[test]
fn matches_naive_on_random_bytes() {
    fn prop(text: Vec<u8>) -> bool {
        sais(&text) == naive_suffix_array(&text)
    }
    qc(prop as fn(Vec<u8>) -> bool);
}

#[test]
fn matches_naive_on_small_alphabets() {
    fn prop(text: Vec<u8>, width: u8) -> bool {
        let sigma = [2u8, 4, 26][(width % 3) as usize];
        let text: Vec<u8> = text.into_iter().map(|byte| byte % sigma).collect();
        sais(&text) == naive_suffix_array(&text)
    }
    qc(prop as fn(Vec<u8>, u8) -> bool);
}

#[test]
fn output_is_a_permutation() {
    fn prop(text: Vec<u8>) -> bool {
        let mut table = sais(&text);
        table.sort_unstable();
        table == (0..text.len()).collect::<Vec<usize>>()
    }
    qc(prop as fn(Vec<u8>) -> bool);
}

#[test]
fn sorting_is_deterministic() {
    fn prop(text: Vec<u8>) -> bool {
        sort_suffixes_plain(&text, false, false, None)
            == sort_suffixes_plain(&text, false, false, None)
    }
    qc(prop as fn(Vec<u8>) -> bool);
}

/// Both induction variants, exercised over the whole length grid: inputs
/// above 1024 symbols take the round-table path at the top level while
/// their recursion levels fall back to the simple one.
#[test]
fn length_and_alphabet_grid() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for &len in &[0usize, 1, 2, 8, 64, 1024, 8192] {
        for &sigma in &[2u16, 4, 26, 256] {
            let text: Vec<u8> = (0..len).map(|_| (rng.gen_range(0..sigma)) as u8).collect();
            assert_eq!(
                sais(&text),
                naive_suffix_array(&text),
                "mismatch for len {} sigma {}",
                len,
                sigma
            );
        }
    }
}

#[test]
fn repetitive_inputs_force_deep_recursion() {
    let mut text = Vec::new();
    for idx in 0..4096u32 {
        text.push(b"ab"[(idx % 2) as usize]);
    }
    assert_eq!(sais(&text), naive_suffix_array(&text));

    // Thue-Morse keeps many duplicate LMS substrings at every level.
    let thue_morse: Vec<u8> = (0..4096u32)
        .map(|idx| (idx.count_ones() % 2) as u8)
        .collect();
    assert_eq!(sais(&thue_morse), naive_suffix_array(&thue_morse));
}

#[test]
fn all_equal_and_sorted_runs() {
    for text in [
        vec![7u8; 2000],
        (0..=255u8).collect::<Vec<u8>>(),
        (0..=255u8).rev().collect::<Vec<u8>>(),
    ] {
        assert_eq!(sais(&text), naive_suffix_array(&text));
    }
}

fn random_dna(rng: &mut StdRng, len: usize, wildcard_permille: u32) -> Vec<u8> {
    (0..len)
        .map(|_| {
            if rng.gen_range(0..1000) < wildcard_permille {
                b'N'
            } else {
                b"ACGT"[rng.gen_range(0..4)]
            }
        })
        .collect()
}

/// Reference for the encoded sorter: materialize per-position ranks under
/// the read mode (specials become position-unique sentinels above the
/// alphabet) and sort the non-special positions by rank-slice suffix.
fn naive_encoded(encseq: &DnaEncodedSequence, readmode: ReadMode) -> Vec<usize> {
    let total = encseq.total_length();
    let ranks: Vec<usize> = (0..total)
        .map(|pos| match encseq.get_encoded_char(pos, readmode) {
            EncodedChar::Regular(cc) => cc as usize,
            EncodedChar::Special => total - pos + encseq.alphabet_size(),
        })
        .collect();
    let mut table: Vec<usize> = (0..total)
        .filter(|&pos| ranks[pos] < encseq.alphabet_size())
        .collect();
    table.sort_by(|&a, &b| ranks[a..].cmp(&ranks[b..]));
    table
}

#[test]
fn encoded_matches_naive_in_every_read_mode() {
    let mut rng = StdRng::seed_from_u64(0xacc);
    for &len in &[1usize, 2, 8, 64, 1024, 3000] {
        for &wildcards in &[0u32, 30, 300] {
            let ascii = random_dna(&mut rng, len, wildcards);
            let encseq = DnaEncodedSequence::from_ascii(&ascii).unwrap();
            for readmode in [
                ReadMode::Forward,
                ReadMode::Reverse,
                ReadMode::Complement,
                ReadMode::ReverseComplement,
            ] {
                let suftab =
                    sort_suffixes_encoded(&encseq, readmode, true, true, false, None);
                let nonspecial = len - encseq.special_characters();
                assert_eq!(
                    &suftab[..nonspecial],
                    naive_encoded(&encseq, readmode).as_slice(),
                    "len {} wildcards {} mode {:?}",
                    len,
                    wildcards,
                    readmode
                );
                assert_eq!(suftab[len], len);
            }
        }
    }
}

#[test]
fn encoded_tail_is_a_permutation_with_final_check() {
    let mut rng = StdRng::seed_from_u64(7);
    let ascii = random_dna(&mut rng, 500, 100);
    let encseq = DnaEncodedSequence::from_ascii(&ascii).unwrap();
    let suftab = sort_suffixes_encoded(&encseq, ReadMode::Forward, false, true, false, None);
    let mut seen = suftab.clone();
    seen.sort_unstable();
    assert_eq!(seen, (0..=500).collect::<Vec<usize>>());
}

#[test]
fn encoded_leading_and_trailing_wildcards() {
    for ascii in [&b"NNNACGT"[..], b"ACGTNNN", b"NACGTN", b"N", b"NAN"] {
        let encseq = DnaEncodedSequence::from_ascii(ascii).unwrap();
        let suftab =
            sort_suffixes_encoded(&encseq, ReadMode::Forward, true, true, false, None);
        let nonspecial = ascii.len() - encseq.special_characters();
        assert_eq!(
            &suftab[..nonspecial],
            naive_encoded(&encseq, ReadMode::Forward).as_slice()
        );
        let specials: Vec<usize> = (0..ascii.len())
            .filter(|&pos| {
                matches!(
                    encseq.get_encoded_char(pos, ReadMode::Forward),
                    EncodedChar::Special
                )
            })
            .collect();
        assert_eq!(&suftab[nonspecial..ascii.len()], specials.as_slice());
    }
}

#[test]
fn timed_verbose_sorts_match_silent_ones() {
    let mut rng = StdRng::seed_from_u64(42);
    let text: Vec<u8> = (0..2000).map(|_| rng.gen_range(0..4u8)).collect();
    let mut timer = PhaseTimer::new();
    let timed = sort_suffixes_plain(&text, true, true, Some(&mut timer));
    timer.finish();
    assert_eq!(timed, sort_suffixes_plain(&text, false, false, None));

    let ascii = random_dna(&mut rng, 800, 50);
    let encseq = DnaEncodedSequence::from_ascii(&ascii).unwrap();
    let mut timer = PhaseTimer::new();
    let timed = sort_suffixes_encoded(&encseq, ReadMode::Forward, true, true, true, Some(&mut timer));
    timer.finish();
    assert_eq!(
        timed,
        sort_suffixes_encoded(&encseq, ReadMode::Forward, false, true, false, None)
    );
}

#[test]
fn table_positions_match_scanning() {
    fn prop(text: Vec<u8>, needle: Vec<u8>) -> bool {
        let needle: Vec<u8> = needle.into_iter().map(|byte| byte % 4).collect();
        let text: Vec<u8> = text.into_iter().map(|byte| byte % 4).collect();
        let table = SuffixTable::new(text.clone());
        let mut positions = table.positions(&needle).to_vec();
        positions.sort_unstable();
        let expected: Vec<usize> = if needle.is_empty() {
            Vec::new()
        } else {
            (0..text.len())
                .filter(|&pos| text[pos..].starts_with(&needle))
                .collect()
        };
        positions == expected && table.contains(&needle) == !expected.is_empty()
    }
    qc(prop as fn(Vec<u8>, Vec<u8>) -> bool);
}

#[test]
fn table_roundtrips_through_disk() {
    let table = SuffixTable::new(&b"mississippi"[..]);
    let path = std::env::temp_dir().join(format!("sainsort-table-{}.bin", std::process::id()));
    table.save(&path).unwrap();
    let loaded = SuffixTable::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(table, loaded);
}

#[test]
#[should_panic(expected = "out of order")]
fn lightweight_check_rejects_swapped_entries() {
    let encseq = DnaEncodedSequence::from_ascii(b"ACGTACGT").unwrap();
    let mut suftab = sort_suffixes_encoded(&encseq, ReadMode::Forward, false, false, false, None);
    suftab[8] = 8;
    suftab.swap(0, 1);
    sainsort::suftab_lightweight_check(&encseq, ReadMode::Forward, 8, &suftab);
}
