// Hysteresis fade controller.
//
// Adaptation is a small Copy value; `step` is a pure transition
// (state, input) -> state, so the whole lifecycle is testable without a host.
//
// Reversal is only allowed mid-fade (FadingIn <-> FadingOut). Idle and Active
// are re-entered only after a fade completes.

/// Strength within this distance of 0 or 1 snaps to the endpoint.
pub const STRENGTH_EPSILON: f32 = 1e-4;

/// Shortest fade; zero-length fades complete in one step.
pub const MIN_FADE_SECONDS: f32 = 0.0001;

/// Step length substituted when the host reports no elapsed time.
pub const NOMINAL_FRAME_SECONDS: f32 = 1.0 / 60.0;

/// Lifecycle of the correction effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Bright scene, strength 0.
    #[default]
    Idle,
    /// Dark, dwell time not yet satisfied.
    WaitingForThreshold,
    /// Strength ramping 0 -> 1.
    FadingIn,
    /// Strength 1.
    Active,
    /// Strength ramping 1 -> 0.
    FadingOut,
}

/// Threshold and durations in seconds, already floored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeTiming {
    /// Normalized luminance at or below which the scene counts as dark.
    pub darkness_threshold: f32,
    pub dwell_seconds: f32,
    pub fade_in_seconds: f32,
    pub fade_out_seconds: f32,
}

impl FadeTiming {
    pub fn new(
        darkness_threshold: f32,
        threshold_duration_ms: f32,
        fade_in_ms: f32,
        fade_out_ms: f32,
    ) -> Self {
        Self {
            darkness_threshold,
            dwell_seconds: (threshold_duration_ms / 1000.0).max(0.0),
            fade_in_seconds: (fade_in_ms / 1000.0).max(MIN_FADE_SECONDS),
            fade_out_seconds: (fade_out_ms / 1000.0).max(MIN_FADE_SECONDS),
        }
    }

    fn dwell_met(&self, accumulated: f32) -> bool {
        self.dwell_seconds <= 0.0 || accumulated >= self.dwell_seconds
    }
}

/// Inputs for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInput {
    pub delta_seconds: f32,
    pub smoothed_luminance: f32,
    pub timing: FadeTiming,
}

/// Fade state: lifecycle, strength and the two dwell accumulators.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Adaptation {
    pub lifecycle: Lifecycle,
    pub effect_strength: f32,
    pub time_below_threshold: f32,
    pub time_above_threshold: f32,
}

impl Adaptation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one evaluation.
    pub fn step(mut self, input: StepInput) -> Self {
        let delta = if input.delta_seconds > 0.0 {
            input.delta_seconds
        } else {
            NOMINAL_FRAME_SECONDS
        };
        let timing = input.timing;
        let is_dark = input.smoothed_luminance <= timing.darkness_threshold;

        if is_dark {
            self.time_below_threshold += delta;
            self.time_above_threshold = 0.0;
        } else {
            self.time_above_threshold += delta;
            self.time_below_threshold = 0.0;
        }

        let dark_met = timing.dwell_met(self.time_below_threshold);
        let light_met = timing.dwell_met(self.time_above_threshold);

        match self.lifecycle {
            Lifecycle::Idle => {
                self.effect_strength = 0.0;
                if is_dark {
                    self.lifecycle = if dark_met {
                        Lifecycle::FadingIn
                    } else {
                        Lifecycle::WaitingForThreshold
                    };
                }
            }
            Lifecycle::WaitingForThreshold => {
                if !is_dark {
                    self.lifecycle = Lifecycle::Idle;
                    self.time_below_threshold = 0.0;
                } else if dark_met {
                    self.lifecycle = Lifecycle::FadingIn;
                }
            }
            Lifecycle::FadingIn => {
                if !is_dark {
                    if light_met {
                        self.lifecycle = Lifecycle::FadingOut;
                    }
                } else {
                    self.effect_strength =
                        (self.effect_strength + delta / timing.fade_in_seconds).clamp(0.0, 1.0);
                    if self.effect_strength >= 1.0 - STRENGTH_EPSILON {
                        self.effect_strength = 1.0;
                        self.lifecycle = Lifecycle::Active;
                    }
                }
            }
            Lifecycle::Active => {
                self.effect_strength = 1.0;
                if !is_dark && light_met {
                    self.lifecycle = Lifecycle::FadingOut;
                }
            }
            Lifecycle::FadingOut => {
                if is_dark && dark_met {
                    self.lifecycle = Lifecycle::FadingIn;
                } else {
                    self.effect_strength =
                        (self.effect_strength - delta / timing.fade_out_seconds).clamp(0.0, 1.0);
                    if self.effect_strength <= STRENGTH_EPSILON {
                        self.effect_strength = 0.0;
                        self.lifecycle = Lifecycle::Idle;
                    }
                }
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn timing(threshold: f32, dwell_ms: f32, fade_in_ms: f32, fade_out_ms: f32) -> FadeTiming {
        FadeTiming::new(threshold, dwell_ms, fade_in_ms, fade_out_ms)
    }

    fn input(luminance: f32, timing: FadeTiming) -> StepInput {
        StepInput {
            delta_seconds: FRAME,
            smoothed_luminance: luminance,
            timing,
        }
    }

    /// Run `frames` steps at constant luminance, returning the lifecycle after each.
    fn run(
        state: &mut Adaptation,
        luminance: f32,
        timing: FadeTiming,
        frames: usize,
    ) -> Vec<Lifecycle> {
        (0..frames)
            .map(|_| {
                *state = state.step(input(luminance, timing));
                state.lifecycle
            })
            .collect()
    }

    #[test]
    fn test_bright_scene_stays_idle() {
        let t = timing(0.3, 600.0, 200.0, 450.0);
        let mut state = Adaptation::new();
        let history = run(&mut state, 0.8, t, 120);
        assert!(history.iter().all(|&l| l == Lifecycle::Idle));
        assert_eq!(state.effect_strength, 0.0);
        assert_eq!(state.time_below_threshold, 0.0);
    }

    #[test]
    fn test_zero_dwell_enters_fade_in_immediately() {
        let t = timing(0.3, 0.0, 200.0, 450.0);
        let state = Adaptation::new().step(input(0.1, t));
        assert_eq!(state.lifecycle, Lifecycle::FadingIn);
        assert_eq!(state.effect_strength, 0.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let t = timing(0.3, 0.0, 200.0, 450.0);
        let state = Adaptation::new().step(input(0.3, t));
        assert_eq!(state.lifecycle, Lifecycle::FadingIn);
    }

    #[test]
    fn test_waiting_returns_to_idle_on_recovery() {
        let t = timing(0.3, 600.0, 200.0, 450.0);
        let mut state = Adaptation::new();
        run(&mut state, 0.1, t, 10);
        assert_eq!(state.lifecycle, Lifecycle::WaitingForThreshold);
        assert!(state.time_below_threshold > 0.0);

        state = state.step(input(0.9, t));
        assert_eq!(state.lifecycle, Lifecycle::Idle);
        assert_eq!(state.time_below_threshold, 0.0);
    }

    #[test]
    fn test_scenario_threshold_30_dwell_600_fade_in_200() {
        let t = timing(0.30, 600.0, 200.0, 450.0);
        let mut state = Adaptation::new();
        state = state.step(input(1.0, t));
        assert_eq!(state.lifecycle, Lifecycle::Idle);

        let mut entered_fade_in = None;
        let mut entered_active = None;
        let mut last_strength = 0.0f32;
        for frame in 1..=60 {
            let before = state.lifecycle;
            state = state.step(input(0.1, t));
            let elapsed = frame as f32 * FRAME;

            if frame == 1 {
                assert_eq!(state.lifecycle, Lifecycle::WaitingForThreshold);
            }
            if before != Lifecycle::FadingIn && state.lifecycle == Lifecycle::FadingIn {
                entered_fade_in = Some(elapsed);
            }
            if before != Lifecycle::Active && state.lifecycle == Lifecycle::Active {
                entered_active = Some(elapsed);
            }
            assert!(
                state.effect_strength >= last_strength,
                "strength decreased at frame {}",
                frame
            );
            last_strength = state.effect_strength;
        }

        let fade_in = entered_fade_in.expect("never entered FadingIn");
        let active = entered_active.expect("never reached Active");
        assert!((fade_in - 0.6).abs() <= 2.0 * FRAME, "FadingIn at {}", fade_in);
        assert!((active - 0.8).abs() <= 2.0 * FRAME, "Active at {}", active);
        assert_eq!(state.effect_strength, 1.0);
    }

    #[test]
    fn test_active_fades_out_to_idle() {
        let t = timing(0.3, 100.0, 100.0, 450.0);
        let mut state = Adaptation::new();
        run(&mut state, 0.05, t, 30);
        assert_eq!(state.lifecycle, Lifecycle::Active);

        let mut last_strength = state.effect_strength;
        let mut fading_out_frames = 0usize;
        for _ in 0..60 {
            state = state.step(input(0.9, t));
            if state.lifecycle == Lifecycle::FadingOut {
                fading_out_frames += 1;
            }
            assert!(state.effect_strength <= last_strength, "strength rose while fading out");
            last_strength = state.effect_strength;
        }
        assert_eq!(state.lifecycle, Lifecycle::Idle);
        assert_eq!(state.effect_strength, 0.0);
        // 450 ms fade at 60 fps, give or take the snap frame.
        assert!((26..=28).contains(&fading_out_frames), "fading out {} frames", fading_out_frames);
    }

    #[test]
    fn test_fade_in_reverses_without_reset() {
        let t = timing(0.3, 0.0, 1000.0, 1000.0);
        let mut state = Adaptation::new();
        run(&mut state, 0.1, t, 20);
        assert_eq!(state.lifecycle, Lifecycle::FadingIn);
        let mid = state.effect_strength;
        assert!(mid > 0.0 && mid < 1.0);

        state = state.step(input(0.9, t));
        assert_eq!(state.lifecycle, Lifecycle::FadingOut);
        assert_eq!(state.effect_strength, mid, "reversal must not snap strength");

        state = state.step(input(0.9, t));
        assert!(state.effect_strength < mid);
    }

    #[test]
    fn test_fade_out_reverses_without_reset() {
        let t = timing(0.3, 0.0, 100.0, 1000.0);
        let mut state = Adaptation::new();
        run(&mut state, 0.1, t, 10);
        assert_eq!(state.lifecycle, Lifecycle::Active);

        run(&mut state, 0.9, t, 20);
        assert_eq!(state.lifecycle, Lifecycle::FadingOut);
        let mid = state.effect_strength;

        state = state.step(input(0.1, t));
        assert_eq!(state.lifecycle, Lifecycle::FadingIn);
        assert_eq!(state.effect_strength, mid);
    }

    #[test]
    fn test_fade_in_holds_while_light_dwell_pending() {
        let t = timing(0.3, 200.0, 1000.0, 1000.0);
        let mut state = Adaptation::new();
        run(&mut state, 0.1, t, 30);
        assert_eq!(state.lifecycle, Lifecycle::FadingIn);
        let held = state.effect_strength;

        let history = run(&mut state, 0.9, t, 5);
        assert!(history.iter().all(|&l| l == Lifecycle::FadingIn));
        assert_eq!(state.effect_strength, held);
    }

    #[test]
    fn test_zero_length_fades_are_instant() {
        let t = timing(0.3, 0.0, 0.0, 0.0);
        let mut state = Adaptation::new();
        run(&mut state, 0.1, t, 2);
        assert_eq!(state.lifecycle, Lifecycle::Active);
        assert_eq!(state.effect_strength, 1.0);

        run(&mut state, 0.9, t, 2);
        assert_eq!(state.lifecycle, Lifecycle::Idle);
        assert_eq!(state.effect_strength, 0.0);
    }

    #[test]
    fn test_non_positive_delta_still_progresses() {
        let t = timing(0.3, 0.0, 200.0, 450.0);
        let mut state = Adaptation::new().step(input(0.1, t));
        for _ in 0..20 {
            state = state.step(StepInput {
                delta_seconds: 0.0,
                smoothed_luminance: 0.1,
                timing: t,
            });
        }
        assert_eq!(state.lifecycle, Lifecycle::Active);
    }
}
