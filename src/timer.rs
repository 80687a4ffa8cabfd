use std::time::Instant;

/// Wall-clock progress reporting for the sorting phases.
///
/// Each call to [`show_progress`](PhaseTimer::show_progress) closes the
/// currently running phase, printing its elapsed time to stdout, and opens
/// the next one under the given description. Entry points accept
/// `Option<&mut PhaseTimer>`; `None` disables all reporting.
pub struct PhaseTimer {
    start: Instant,
    phase_start: Instant,
    current: Option<String>,
}

impl PhaseTimer {
    pub fn new() -> Self {
        let now = Instant::now();
        PhaseTimer {
            start: now,
            phase_start: now,
            current: None,
        }
    }

    pub fn show_progress(&mut self, description: &str) {
        let now = Instant::now();
        if let Some(desc) = self.current.take() {
            println!("# TIME {} {:.2}s", desc, (now - self.phase_start).as_secs_f64());
        }
        self.phase_start = now;
        self.current = Some(description.to_string());
    }

    /// Closes the last open phase and prints the overall elapsed time.
    pub fn finish(&mut self) {
        let now = Instant::now();
        if let Some(desc) = self.current.take() {
            println!("# TIME {} {:.2}s", desc, (now - self.phase_start).as_secs_f64());
        }
        println!("# TIME overall {:.2}s", (now - self.start).as_secs_f64());
    }
}

impl Default for PhaseTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_open_and_close() {
        let mut timer = PhaseTimer::new();
        assert!(timer.current.is_none());
        timer.show_progress("first phase");
        assert_eq!(timer.current.as_deref(), Some("first phase"));
        timer.show_progress("second phase");
        assert_eq!(timer.current.as_deref(), Some("second phase"));
        timer.finish();
        assert!(timer.current.is_none());
    }

    #[test]
    fn finish_without_phases_reports_overall_only() {
        let mut timer = PhaseTimer::default();
        timer.finish();
        assert!(timer.current.is_none());
    }
}
