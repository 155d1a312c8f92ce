use std::time::Duration;

use rand::Rng;
use tokio::sync::broadcast;

use crate::driver::{Transmitter, Transport};
use crate::fuzzy;
use crate::synth::{Decision, Synthesizer};
use crate::{consts, Result};

/// Stability sweep parameters.
#[derive(Clone, Debug)]
pub struct SweepConfig {
    /// Stability increment between levels.
    pub step: f64,
    /// Frames transmitted at each level.
    pub frames_per_level: usize,
    /// Inter-frame delay.
    pub delay: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            step: consts::DEFAULT_SWEEP_STEP,
            frames_per_level: consts::DEFAULT_FRAMES_PER_LEVEL,
            delay: consts::DEFAULT_SWEEP_DELAY,
        }
    }
}

/// Flood parameters.
#[derive(Clone, Debug)]
pub struct FloodConfig {
    /// Inter-frame delay.
    pub delay: Duration,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            delay: consts::DEFAULT_FLOOD_DELAY,
        }
    }
}

/// Campaign operating mode.
#[derive(Clone, Debug)]
pub enum Mode {
    /// Step stability from 0.0 to 1.0 inclusive, biasing frames toward
    /// valid commands as stability rises. Terminates after the last level.
    SweepWithBias(SweepConfig),
    /// Flood fully randomized frames until cancelled.
    ContinuousRandom(FloodConfig),
}

/// Fuzzing campaign over a single transport.
///
/// One synthesizer/transmitter pair drives both modes. Frame generation and
/// transmission are strictly sequential; one frame is fully handled before
/// the next is considered.
pub struct Campaign<T, R> {
    transmitter: Transmitter<T>,
    synthesizer: Synthesizer<R>,
}

impl<T: Transport, R: Rng> Campaign<T, R> {
    pub fn new(transport: T, rng: R) -> Self {
        Self {
            transmitter: Transmitter::new(transport),
            synthesizer: Synthesizer::new(rng),
        }
    }

    pub fn transmitter(&self) -> &Transmitter<T> {
        &self.transmitter
    }

    /// Run the selected mode to completion. Returns the number of frames
    /// attempted.
    pub async fn run(&mut self, mode: &Mode, shutdown: broadcast::Receiver<()>) -> Result<usize> {
        match mode {
            Mode::SweepWithBias(config) => self.sweep(config).await,
            Mode::ContinuousRandom(config) => self.flood(config, shutdown).await,
        }
    }

    /// Run the stability sweep to completion.
    ///
    /// Levels are derived from an integer index so that repeated addition of
    /// the step cannot drift past 1.0.
    pub async fn sweep(&mut self, config: &SweepConfig) -> Result<usize> {
        let mut attempts = 0;

        let levels = (1.0 / config.step).round() as u32;
        for level in 0..=levels {
            let stability = (level as f64 * config.step).min(1.0);

            debug!("Stability level {:.1}", stability);

            for _ in 0..config.frames_per_level {
                let probability = fuzzy::command_probability(stability)?;
                let (frame, decision) = self.synthesizer.biased(probability)?;

                match &decision {
                    Decision::Command(command) => info!(
                        "Valid command '{}' at probability {:.2}",
                        String::from_utf8_lossy(&command[..]),
                        probability
                    ),
                    Decision::Noise(_) => {
                        info!("Random payload at probability {:.2}", probability)
                    }
                }

                self.transmitter.send(&frame).await;
                attempts += 1;

                tokio::time::sleep(config.delay).await;
            }
        }

        Ok(attempts)
    }

    /// Flood randomized frames until the shutdown channel fires.
    ///
    /// Cancellation is checked at the iteration boundary only; a
    /// transmission already in flight completes.
    pub async fn flood(
        &mut self,
        config: &FloodConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<usize> {
        let mut attempts = 0;

        loop {
            match shutdown.try_recv() {
                Err(broadcast::error::TryRecvError::Empty) => {}
                _ => break,
            }

            let frame = self.synthesizer.flood()?;
            self.transmitter.send(&frame).await;
            attempts += 1;

            tokio::time::sleep(config.delay).await;
        }

        Ok(attempts)
    }
}
