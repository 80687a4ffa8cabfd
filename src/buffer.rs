use crate::seq::SainSeq;

/// Per-symbol write cache for the initial LMS seeding pass.
///
/// Seeding writes through decremented tail pointers, which scatters badly
/// for large inputs. Buffering a power-of-two number of positions per
/// symbol turns those writes into descending bursts. Only worthwhile for
/// byte-sized alphabets; the whole cache fits in a small constant number
/// of words. Semantically identical to writing directly.
pub(crate) struct SainBuffer {
    values: Vec<usize>,
    nextidx: Vec<u16>,
    buf_size: usize,
    log_bufsize: u32,
    numofchars: usize,
}

const CACHE_BUDGET_LOG: u32 = 18;

fn bits_per_value(mut value: usize) -> u32 {
    let mut bits = 0;
    while value > 0 {
        bits += 1;
        value >>= 1;
    }
    bits
}

impl SainBuffer {
    pub(crate) fn new(numofchars: usize) -> Option<SainBuffer> {
        if numofchars > 256 {
            return None;
        }
        let word_log = if std::mem::size_of::<usize>() == 4 { 1 } else { 2 };
        let log_bufsize = CACHE_BUDGET_LOG - word_log - bits_per_value(numofchars);
        let buf_size = 1usize << log_bufsize;
        debug_assert!(buf_size <= u16::MAX as usize);
        let cachesize = numofchars << log_bufsize;
        log::debug!(
            "LMS seed cache: {} buckets of {} positions ({} words)",
            numofchars,
            buf_size,
            cachesize
        );
        Some(SainBuffer {
            values: vec![0; cachesize],
            nextidx: vec![0; numofchars],
            buf_size,
            log_bufsize,
            numofchars,
        })
    }

    pub(crate) fn push(
        &mut self,
        seq: &mut SainSeq,
        suftab: &mut [usize],
        charidx: usize,
        value: usize,
    ) {
        let offset = charidx << self.log_bufsize;
        self.values[offset + self.nextidx[charidx] as usize] = value;
        if (self.nextidx[charidx] as usize) < self.buf_size - 1 {
            self.nextidx[charidx] += 1;
        } else {
            let mut writeidx = seq.fillptr_at(suftab, charidx) - 1;
            for readidx in offset..offset + self.buf_size {
                suftab[writeidx] = self.values[readidx];
                writeidx = writeidx.wrapping_sub(1);
            }
            self.nextidx[charidx] = 0;
            let fill = seq.fillptr_at(suftab, charidx) - self.buf_size;
            seq.set_fillptr(suftab, charidx, fill);
        }
    }

    pub(crate) fn flush_all(&mut self, seq: &mut SainSeq, suftab: &mut [usize]) {
        for charidx in 0..self.numofchars {
            let bufleft = self.nextidx[charidx] as usize;
            if bufleft > 0 {
                let offset = charidx << self.log_bufsize;
                let mut writeidx = seq.fillptr_at(suftab, charidx) - 1;
                for readidx in offset..offset + bufleft {
                    suftab[writeidx] = self.values[readidx];
                    writeidx = writeidx.wrapping_sub(1);
                }
                self.nextidx[charidx] = 0;
                let fill = seq.fillptr_at(suftab, charidx) - bufleft;
                seq.set_fillptr(suftab, charidx, fill);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffered_writes_match_direct_writes() {
        let text: Vec<u8> = (0..4000u32).map(|i| (i * 7 % 5) as u8).collect();

        let mut direct_seq = SainSeq::from_plain(&text);
        let mut direct = vec![0usize; text.len() + 1];
        direct_seq.end_buckets(&mut direct);

        let mut buffered_seq = SainSeq::from_plain(&text);
        let mut buffered = vec![0usize; text.len() + 1];
        buffered_seq.end_buckets(&mut buffered);
        let mut buf = SainBuffer::new(buffered_seq.numofchars).unwrap();

        for (pos, &cc) in text.iter().enumerate().rev() {
            let cc = cc as usize;
            let putidx = direct_seq.dec_fillptr(&mut direct, cc);
            direct[putidx] = pos;
            buf.push(&mut buffered_seq, &mut buffered, cc, pos);
        }
        buf.flush_all(&mut buffered_seq, &mut buffered);

        assert_eq!(direct, buffered);
        for cc in 0..5 {
            assert_eq!(
                direct_seq.fillptr_at(&direct, cc),
                buffered_seq.fillptr_at(&buffered, cc)
            );
        }
    }

    #[test]
    fn wide_alphabets_disable_the_cache() {
        assert!(SainBuffer::new(257).is_none());
        assert!(SainBuffer::new(256).is_some());
    }
}
