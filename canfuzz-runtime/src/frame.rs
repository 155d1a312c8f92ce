use crate::{Error, Result};

/// Highest valid 11-bit CAN identifier.
pub const ID_MAX: u16 = 0x7FF;

/// Payload capacity of a classic CAN frame.
pub const PDU_MAX: usize = 8;

/// Standard 11-bit CAN identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Id(u16);

impl Id {
    /// Construct an identifier from its raw value.
    pub fn new(id: u16) -> Result<Self> {
        if id > ID_MAX {
            Err(Error::InvalidId(id))
        } else {
            Ok(Self(id))
        }
    }

    #[inline]
    pub fn as_raw(&self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:03X}", self.0)
    }
}

/// Classic CAN frame.
///
/// The payload buffer is fixed at capacity 8 with an explicit length. Bytes
/// beyond the length are never exposed. A frame is immutable once built and
/// lives for exactly one fuzz iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    id: Id,
    length: usize,
    pdu: [u8; PDU_MAX],
}

impl Frame {
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Meaningful payload bytes.
    #[inline]
    pub fn pdu(&self) -> &[u8] {
        &self.pdu[..self.length]
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.id, self.length)?;
        for byte in self.pdu() {
            write!(f, " {:02X}", byte)?;
        }
        Ok(())
    }
}

/// Frame construction.
pub struct FrameBuilder {
    id: Id,
    length: usize,
    pdu: [u8; PDU_MAX],
}

impl FrameBuilder {
    pub fn new(id: Id) -> Self {
        Self {
            id,
            length: 0,
            pdu: [0; PDU_MAX],
        }
    }

    /// Copy the slice into the payload buffer and take its length.
    pub fn copy_from_slice(mut self, src: &[u8]) -> Self {
        let length = src.len().min(PDU_MAX);
        self.pdu[..length].copy_from_slice(&src[..length]);
        self.length = length;
        self
    }

    pub fn set_len(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Finalize the frame. Rejects a length outside 1..=8 so that no
    /// partially constructed frame reaches the transport.
    pub fn build(self) -> Result<Frame> {
        if self.length == 0 || self.length > PDU_MAX {
            return Err(Error::InvalidLength(self.length));
        }

        Ok(Frame {
            id: self.id,
            length: self.length,
            pdu: self.pdu,
        })
    }
}
