// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

/// The `canfuzz-runtime` library provides the frame synthesis and decision
/// engine for the Canfuzz ECU fuzzer.
///
/// This library contains the CAN frame model, the catalog of well-formed ECU
/// commands, the fuzzy decision engine that biases traffic composition on a
/// stability signal, the frame synthesizer, the transmission driver and the
/// campaign controller. A `can` module provides the raw SocketCAN transport.
///
/// Campaigns are strictly sequential: one frame is synthesized and handed to
/// the transport before the next is considered. The decision engine itself is
/// pure and callable from any thread.
pub mod campaign;
pub mod can;
pub mod driver;
pub mod frame;
pub mod fuzzy;
pub mod synth;

#[macro_use]
extern crate log;

mod config;

pub use self::config::*;

mod error;

pub use self::error::Error;

pub type Result<T = ()> = std::result::Result<T, Error>;

/// Canfuzz runtime module containing various constants.
pub mod consts {
    use std::time::Duration;

    /// Canfuzz runtime version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Stability increment between sweep levels.
    pub const DEFAULT_SWEEP_STEP: f64 = 0.1;

    /// Frames transmitted at each stability level.
    pub const DEFAULT_FRAMES_PER_LEVEL: usize = 10;

    /// Inter-frame delay in sweep mode.
    pub const DEFAULT_SWEEP_DELAY: Duration = Duration::from_millis(200);

    /// Inter-frame delay in flood mode.
    pub const DEFAULT_FLOOD_DELAY: Duration = Duration::from_millis(100);
}
