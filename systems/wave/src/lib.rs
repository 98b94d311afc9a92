#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure planner that turns a main-target hit into a chain of decaying impulses.

use std::time::Duration;

use lane_blast_core::{Amplitude, CellCoord, CellId, CellSnapshot, WaveTuning};

/// Secondary impulse scheduled by a main-target hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveImpulse {
    /// Cell that receives the impulse.
    pub cell: CellId,
    /// Position of the cell when the wave was planned.
    pub coord: CellCoord,
    /// Delay between the main hit and the impulse.
    pub delay: Duration,
    /// Strength of the impulse.
    pub amplitude: Amplitude,
    /// Distance in rows from the main hit, starting at one.
    pub step: u32,
}

/// Wave planner that walks a lane upward from a main hit.
#[derive(Clone, Debug, Default)]
pub struct WavePropagation {
    tuning: WaveTuning,
}

impl WavePropagation {
    /// Creates a planner using the provided tuning.
    #[must_use]
    pub const fn new(tuning: WaveTuning) -> Self {
        Self { tuning }
    }

    /// Plans the impulses for a main hit at `origin_row` of `lane`.
    ///
    /// `lane` lists the lane's cells from row zero upward. Impulse `k` lands
    /// `k * base_delay` after the hit with `base_amplitude * decay^k`; the walk
    /// ends before the first amplitude below the cutoff or at the top of the
    /// lane. Inactive cells receive nothing but still count as a step.
    ///
    /// The output buffer is cleared before it is populated.
    pub fn plan(&self, lane: &[CellSnapshot], origin_row: u32, out: &mut Vec<WaveImpulse>) {
        out.clear();

        let start = origin_row as usize + 1;
        let Some(above) = lane.get(start..) else {
            return;
        };

        for (offset, cell) in above.iter().enumerate() {
            let step = offset as u32 + 1;
            let amplitude = self.amplitude_at(step);
            if !(amplitude >= self.tuning.cutoff) {
                break;
            }
            if !cell.active {
                continue;
            }

            out.push(WaveImpulse {
                cell: cell.id,
                coord: cell.coord,
                delay: self.tuning.base_delay.saturating_mul(step),
                amplitude: Amplitude::from_f32(amplitude),
                step,
            });
        }
    }

    fn amplitude_at(&self, step: u32) -> f32 {
        let exponent = i32::try_from(step).unwrap_or(i32::MAX);
        self.tuning.base_amplitude * self.tuning.decay.powi(exponent)
    }
}
