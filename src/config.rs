//! Chain configuration
//!
//! Everything here is meant to be fixed at compile time:
//!
//! ```
//! use apa102_spi_chain::Config;
//!
//! const CHAIN: Config = Config::new().with_leds(30);
//! ```

/// Default number of leds in the chain
pub const DEFAULT_LEDS: usize = 1;
/// Default number of bytes in a start/end marker
pub const DEFAULT_FRAME_SIZE: usize = 4;
/// Default start-of-frame byte
pub const DEFAULT_SOF: u8 = 0x00;
/// Default end-of-frame byte
pub const DEFAULT_EOF: u8 = 0xFF;
pub const DEFAULT_MIN_INTENSITY: u8 = 0x01;
pub const DEFAULT_MAX_INTENSITY: u8 = 0x1F;
/// Mode byte prefix of a lit led
pub const DEFAULT_ENABLE_FLAG: u8 = 0xE0;
/// Mode byte prefix putting a led to sleep, only understood by some parts
pub const DEFAULT_SLEEP_FLAG: u8 = 0xA0;

/// Immutable description of one led chain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    leds: usize,
    frame_size: usize,
    sof: u8,
    eof: u8,
    min_intensity: u8,
    max_intensity: u8,
    enable_flag: u8,
    sleep_flag: u8,
}

impl Config {
    /// A single led with the usual apa102 markers and flags
    pub const fn new() -> Self {
        Self {
            leds: DEFAULT_LEDS,
            frame_size: DEFAULT_FRAME_SIZE,
            sof: DEFAULT_SOF,
            eof: DEFAULT_EOF,
            min_intensity: DEFAULT_MIN_INTENSITY,
            max_intensity: DEFAULT_MAX_INTENSITY,
            enable_flag: DEFAULT_ENABLE_FLAG,
            sleep_flag: DEFAULT_SLEEP_FLAG,
        }
    }

    /// Number of leds in the chain
    ///
    /// A chain of zero leds is allowed, it only ever sends the markers.
    pub const fn with_leds(mut self, leds: usize) -> Self {
        self.leds = leds;
        self
    }

    /// How often the start and end marker bytes are repeated
    pub const fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self
    }

    pub const fn with_sof(mut self, sof: u8) -> Self {
        self.sof = sof;
        self
    }

    pub const fn with_eof(mut self, eof: u8) -> Self {
        self.eof = eof;
        self
    }

    /// Intensity used for "off" frames
    pub const fn with_min_intensity(mut self, min_intensity: u8) -> Self {
        self.min_intensity = min_intensity;
        self
    }

    /// Highest intensity, doubles as the mask applied to every mode byte
    pub const fn with_max_intensity(mut self, max_intensity: u8) -> Self {
        self.max_intensity = max_intensity;
        self
    }

    pub const fn with_enable_flag(mut self, enable_flag: u8) -> Self {
        self.enable_flag = enable_flag;
        self
    }

    pub const fn with_sleep_flag(mut self, sleep_flag: u8) -> Self {
        self.sleep_flag = sleep_flag;
        self
    }

    pub const fn leds(&self) -> usize {
        self.leds
    }

    pub const fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub const fn sof(&self) -> u8 {
        self.sof
    }

    pub const fn eof(&self) -> u8 {
        self.eof
    }

    pub const fn min_intensity(&self) -> u8 {
        self.min_intensity
    }

    pub const fn max_intensity(&self) -> u8 {
        self.max_intensity
    }

    pub const fn enable_flag(&self) -> u8 {
        self.enable_flag
    }

    pub const fn sleep_flag(&self) -> u8 {
        self.sleep_flag
    }

    /// Number of bytes of one complete sequence (markers plus one frame per led)
    ///
    /// Saturates at `usize::MAX` for absurdly long chains.
    pub const fn sequence_len(&self) -> usize {
        let markers = self.frame_size.saturating_mul(2);
        let frames = self.leds.saturating_mul(4);
        markers.saturating_add(frames)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_apa102_datasheet() {
        let config = Config::default();

        assert_eq!(config.leds(), 1);
        assert_eq!(config.frame_size(), 4);
        assert_eq!(config.sof(), 0x00);
        assert_eq!(config.eof(), 0xFF);
        assert_eq!(config.min_intensity(), 0x01);
        assert_eq!(config.max_intensity(), 0x1F);
        assert_eq!(config.enable_flag(), 0xE0);
        assert_eq!(config.sleep_flag(), 0xA0);
    }

    #[test]
    fn builder_is_usable_in_const_context() {
        const CHAIN: Config = Config::new()
            .with_leds(12)
            .with_frame_size(8)
            .with_eof(0x00);

        assert_eq!(CHAIN.leds(), 12);
        assert_eq!(CHAIN.frame_size(), 8);
        assert_eq!(CHAIN.eof(), 0x00);
        // untouched fields keep their defaults
        assert_eq!(CHAIN.sof(), DEFAULT_SOF);
        assert_eq!(CHAIN.enable_flag(), DEFAULT_ENABLE_FLAG);
    }

    #[test]
    fn sequence_len_counts_markers_and_frames() {
        assert_eq!(Config::new().sequence_len(), 12);
        assert_eq!(Config::new().with_leds(3).sequence_len(), 20);
        assert_eq!(Config::new().with_leds(0).sequence_len(), 8);
        assert_eq!(Config::new().with_leds(2).with_frame_size(0).sequence_len(), 8);
    }

    #[test]
    fn sequence_len_saturates_instead_of_overflowing() {
        assert_eq!(Config::new().with_leds(usize::MAX).sequence_len(), usize::MAX);
        assert_eq!(
            Config::new().with_frame_size(usize::MAX / 2 + 1).sequence_len(),
            usize::MAX
        );
    }
}
