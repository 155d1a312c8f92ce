use rand::Rng;

use crate::frame::{Frame, FrameBuilder, Id, ID_MAX, PDU_MAX};
use crate::Result;

/// Well-formed 4-byte commands recognized by the target ECU.
pub const COMMAND_CATALOG: [&[u8; 4]; 8] = [
    b"ENGS", b"ENGO", b"TEMP", b"INJT", b"OXYG", b"FUEL", b"THRO", b"RPMS",
];

/// Outcome of a single probability draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// A catalog command goes on the wire.
    Command(&'static [u8; 4]),
    /// Arbitrary bytes go on the wire.
    Noise([u8; 4]),
}

/// Frame synthesizer over an injected random source.
///
/// Holds the generator for the whole campaign so that a seeded generator
/// reproduces the exact frame sequence.
pub struct Synthesizer<R> {
    rng: R,
}

impl<R: Rng> Synthesizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn random_id(&mut self) -> Result<Id> {
        Id::new(self.rng.gen_range(0..=ID_MAX))
    }

    /// Draw against `probability` and synthesize either a catalog command
    /// frame or a 4-byte noise frame. Length is fixed at 4 in this mode.
    pub fn biased(&mut self, probability: f64) -> Result<(Frame, Decision)> {
        let decision = if self.rng.gen::<f64>() < probability {
            let index = self.rng.gen_range(0..COMMAND_CATALOG.len());
            Decision::Command(COMMAND_CATALOG[index])
        } else {
            let mut noise = [0u8; 4];
            self.rng.fill(&mut noise[..]);
            Decision::Noise(noise)
        };

        let pdu: &[u8] = match &decision {
            Decision::Command(command) => &command[..],
            Decision::Noise(noise) => &noise[..],
        };

        let frame = FrameBuilder::new(self.random_id()?)
            .copy_from_slice(pdu)
            .build()?;

        Ok((frame, decision))
    }

    /// Synthesize a fully randomized frame: random identifier, random length
    /// in 1..=8 and random payload bytes.
    pub fn flood(&mut self) -> Result<Frame> {
        let length = self.rng.gen_range(1..=PDU_MAX);

        let mut pdu = [0u8; PDU_MAX];
        self.rng.fill(&mut pdu[..length]);

        FrameBuilder::new(self.random_id()?)
            .copy_from_slice(&pdu[..length])
            .build()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn biased_certain_yields_catalog_command() {
        let mut synthesizer = Synthesizer::new(StdRng::seed_from_u64(7));

        for _ in 0..100 {
            let (frame, decision) = synthesizer.biased(1.0).unwrap();

            assert_eq!(frame.len(), 4);
            assert!(frame.id().as_raw() <= ID_MAX);
            assert!(matches!(decision, Decision::Command(_)));
            assert!(COMMAND_CATALOG
                .iter()
                .any(|command| &command[..] == frame.pdu()));
        }
    }

    #[test]
    fn biased_never_yields_noise_frame() {
        let mut synthesizer = Synthesizer::new(StdRng::seed_from_u64(7));

        for _ in 0..100 {
            let (frame, decision) = synthesizer.biased(0.0).unwrap();

            assert_eq!(frame.len(), 4);
            assert!(matches!(decision, Decision::Noise(_)));
        }
    }

    #[test]
    fn biased_deterministic_under_seed() {
        let mut synthesizer_a = Synthesizer::new(StdRng::seed_from_u64(42));
        let mut synthesizer_b = Synthesizer::new(StdRng::seed_from_u64(42));

        for _ in 0..50 {
            let (frame_a, _) = synthesizer_a.biased(0.3).unwrap();
            let (frame_b, _) = synthesizer_b.biased(0.3).unwrap();

            assert_eq!(frame_a, frame_b);
        }
    }

    #[test]
    fn flood_within_frame_bounds() {
        let mut synthesizer = Synthesizer::new(StdRng::seed_from_u64(13));

        for _ in 0..1_000 {
            let frame = synthesizer.flood().unwrap();

            assert!(frame.id().as_raw() <= ID_MAX);
            assert!((1..=PDU_MAX).contains(&frame.len()));
        }
    }

    #[test]
    fn noise_bytes_uniform() {
        let mut synthesizer = Synthesizer::new(StdRng::seed_from_u64(99));

        let mut cells = [0u32; 256];
        let mut samples = 0usize;

        while samples < 65_536 {
            let (frame, _) = synthesizer.biased(0.0).unwrap();
            for byte in frame.pdu() {
                cells[*byte as usize] += 1;
                samples += 1;
            }
        }

        let expected = samples as f64 / 256.0;
        let statistic: f64 = cells
            .iter()
            .map(|observed| {
                let delta = *observed as f64 - expected;
                delta * delta / expected
            })
            .sum();

        // Chi-square with 255 degrees of freedom; anything below 400 is far
        // inside the acceptance region.
        assert!(statistic < 400.0, "chi-square statistic {}", statistic);
    }
}
