/// Loading gate: blocks all input between sending a command and the
/// next snapshot, and animates the "Dreaming" ellipsis meanwhile.

pub const LOADING_TEXT: &str = "Dreaming";
/// Ellipsis advance per frame tick. One dot every ~33 frames.
pub const ELLIPSIS_STEP: f32 = 0.03;
const MAX_DOTS: f32 = 4.0;

#[derive(Clone, Debug)]
pub struct LoadingGate {
    engaged: bool,
    phase: f32,
}

impl LoadingGate {
    /// Starts engaged: nothing is on screen until the first snapshot.
    pub fn new() -> Self {
        LoadingGate { engaged: true, phase: 0.0 }
    }

    pub fn engage(&mut self) {
        if !self.engaged {
            self.engaged = true;
            self.phase = 0.0;
        }
    }

    pub fn release(&mut self) {
        self.engaged = false;
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Advance the ellipsis by one frame. No-op while idle.
    pub fn tick(&mut self) {
        if self.engaged {
            self.phase = (self.phase + ELLIPSIS_STEP) % MAX_DOTS;
        }
    }

    pub fn dots(&self) -> usize {
        self.phase as usize
    }

    /// Overlay text, padded so the word does not shift as dots appear.
    pub fn label(&self) -> String {
        let dots = self.dots();
        format!("{LOADING_TEXT}{}{}", ".".repeat(dots), " ".repeat(3 - dots))
    }
}

impl Default for LoadingGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_engaged_until_released() {
        let mut gate = LoadingGate::new();
        assert!(gate.is_engaged());
        gate.release();
        assert!(!gate.is_engaged());
        gate.engage();
        assert!(gate.is_engaged());
    }

    #[test]
    fn ellipsis_cycles_through_four_states() {
        let mut gate = LoadingGate::new();
        assert_eq!(gate.label(), "Dreaming   ");
        let mut seen = Vec::new();
        for _ in 0..140 {
            gate.tick();
            if seen.last() != Some(&gate.dots()) {
                seen.push(gate.dots());
            }
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn idle_gate_does_not_animate() {
        let mut gate = LoadingGate::new();
        gate.release();
        for _ in 0..100 {
            gate.tick();
        }
        assert_eq!(gate.dots(), 0);
    }

    #[test]
    fn re_engaging_restarts_the_ellipsis() {
        let mut gate = LoadingGate::new();
        for _ in 0..50 {
            gate.tick();
        }
        assert_eq!(gate.dots(), 1);
        gate.release();
        gate.engage();
        assert_eq!(gate.dots(), 0);
    }
}
