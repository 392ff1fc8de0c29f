//! # Scroll header controller
//!
//! Derives a header-visibility signal from the stream of vertical scroll
//! offsets. Two states, seeded visible; only the previous offset is
//! retained. Scrolling up always reveals the header; scrolling down hides
//! it once past a fixed pixel threshold. The sampler is a pair of
//! comparisons and must stay that cheap: it runs once per native scroll
//! event on the UI thread.

/// Offset below which downward scrolling never hides the header.
pub const HIDE_THRESHOLD_PX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    Visible,
    Hidden,
}

/// Per-screen visibility state machine. Instantiated on mount, dropped on
/// unmount; scroll state never persists across screens.
#[derive(Debug, Clone)]
pub struct ScrollHeaderController {
    state: HeaderState,
    last_offset: f64,
}

impl ScrollHeaderController {
    pub fn new() -> Self {
        Self {
            state: HeaderState::Visible,
            last_offset: 0.0,
        }
    }

    /// Feed one scroll sample and return the resulting state.
    ///
    /// Decreasing offsets always win: any upward movement reveals the
    /// header regardless of position. Downward movement hides it only
    /// past [`HIDE_THRESHOLD_PX`]; inside the top band, and on no change,
    /// the state is left as-is. The previous offset is updated on every
    /// sample either way.
    pub fn sample(&mut self, offset: f64) -> HeaderState {
        if offset < self.last_offset {
            self.state = HeaderState::Visible;
        } else if offset > self.last_offset && offset > HIDE_THRESHOLD_PX {
            self.state = HeaderState::Hidden;
        }
        self.last_offset = offset;
        self.state
    }

    pub fn state(&self) -> HeaderState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == HeaderState::Visible
    }
}

impl Default for ScrollHeaderController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(samples: &[f64]) -> Vec<HeaderState> {
        let mut c = ScrollHeaderController::new();
        samples.iter().map(|&y| c.sample(y)).collect()
    }

    #[test]
    fn seeded_visible() {
        let c = ScrollHeaderController::new();
        assert!(c.is_visible());
    }

    #[test]
    fn reference_sequence() {
        use HeaderState::*;
        // 150 > 100 and increasing -> hidden; 140 < 150 -> visible,
        // since decreasing wins over the threshold rule.
        assert_eq!(
            run(&[0.0, 50.0, 150.0, 140.0, 30.0]),
            vec![Visible, Visible, Hidden, Visible, Visible]
        );
    }

    #[test]
    fn decreasing_always_reveals() {
        let mut c = ScrollHeaderController::new();
        c.sample(500.0);
        assert_eq!(c.state(), HeaderState::Hidden);
        // Even deep in the page, a single upward tick reveals.
        assert_eq!(c.sample(499.0), HeaderState::Visible);
    }

    #[test]
    fn never_hidden_within_top_band() {
        for seq in [
            vec![0.0, 10.0, 99.0, 100.0, 40.0, 100.0],
            vec![100.0, 0.0, 100.0, 0.0],
        ] {
            let states = run(&seq);
            assert!(
                states.iter().all(|s| *s == HeaderState::Visible),
                "sequence {seq:?} produced {states:?}"
            );
        }
    }

    #[test]
    fn unchanged_offset_keeps_state() {
        let mut c = ScrollHeaderController::new();
        c.sample(200.0);
        assert_eq!(c.state(), HeaderState::Hidden);
        assert_eq!(c.sample(200.0), HeaderState::Hidden);
    }

    #[test]
    fn downward_within_band_after_reveal_keeps_visible() {
        let mut c = ScrollHeaderController::new();
        c.sample(150.0);
        c.sample(20.0);
        assert_eq!(c.sample(90.0), HeaderState::Visible);
    }
}
