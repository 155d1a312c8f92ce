use canfuzz::{Configurable, GlobalConfig};

#[derive(Clone, Debug)]
pub struct ProbeConfig {
    /// CAN network interface.
    pub interface: String,
    /// Seed for the frame generator.
    pub seed: Option<u64>,
    /// Global configuration.
    pub global: GlobalConfig,
}

impl Configurable for ProbeConfig {
    fn global(&self) -> &GlobalConfig {
        &self.global
    }
}
