use async_trait::async_trait;

use crate::frame::Frame;

/// Bus endpoint able to put a frame on the wire.
#[async_trait]
pub trait Transport {
    /// Transmit a single frame. On success, returns the number of bytes
    /// written.
    async fn transmit(&self, frame: &Frame) -> std::io::Result<usize>;
}

/// Per-frame transmission driver.
///
/// A failed send is logged and counted, never escalated; the next scheduled
/// frame proceeds regardless. No retry of the failed frame.
pub struct Transmitter<T> {
    transport: T,
    sent: usize,
    failed: usize,
}

impl<T: Transport> Transmitter<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sent: 0,
            failed: 0,
        }
    }

    /// Send the frame through the transport. Returns whether the frame made
    /// it onto the bus.
    pub async fn send(&mut self, frame: &Frame) -> bool {
        match self.transport.transmit(frame).await {
            Ok(_) => {
                self.sent += 1;
                info!("Sent {}", frame);
                true
            }
            Err(e) => {
                self.failed += 1;
                error!("Failed to send {}: {}", frame, e);
                false
            }
        }
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Frames transmitted so far.
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// Frames that failed to transmit.
    pub fn failed(&self) -> usize {
        self.failed
    }
}
