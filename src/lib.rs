//! # Use apa102 leds via spi
//!
//! - Complete start/data/end sequences (`initialize`, `set_all`, `turn_off_all`)
//! - Single frames for composing your own sequences (`send_marker`, `set_single`, ...)
//! - Implements the `SmartLedsWrite` trait for usage with `smart-leds`
//!
//! Needs a type implementing the `spi::FullDuplex` trait, configured with [`MODE`].
//!
//! The apa102 is clocked, so unlike the ws28xx family the spi frequency isn't
//! critical. Anything the leds can keep up with works.

#![cfg_attr(not(test), no_std)]

use embedded_hal as hal;

pub mod config;

pub use config::Config;

use hal::spi::{FullDuplex, Mode, Phase, Polarity};

use core::marker::PhantomData;

use smart_leds_trait::{SmartLedsWrite, RGB8};

use nb::block;

/// SPI mode needed for apa102 leds
///
/// Clock idles low, data is sampled on the rising edge. Bit order has to be
/// MSB first, which is what every common hal defaults to.
pub const MODE: Mode = Mode {
    polarity: Polarity::IdleLow,
    phase: Phase::CaptureOnFirstTransition,
};

/// Intensity mask of the public single led path
///
/// Wider than `Config::max_intensity`: bit 5 ends up in the mode byte flag.
const SINGLE_INTENSITY_MASK: u8 = 0x3F;

pub mod devices {
    /// Plain apa102, "off" frames keep the enable flag
    pub struct Apa102;
    /// Parts understanding the sleep command, "off" frames use the sleep flag
    pub struct Apa102Sleep;

    pub trait Device {
        const POWER_SAVING: bool;
    }

    impl Device for Apa102 {
        const POWER_SAVING: bool = false;
    }

    impl Device for Apa102Sleep {
        const POWER_SAVING: bool = true;
    }

    #[cfg(not(feature = "power_saving"))]
    pub type DefaultDevice = Apa102;
    #[cfg(feature = "power_saving")]
    pub type DefaultDevice = Apa102Sleep;
}

/// Intensity and color of one led
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color {
    pub intensity: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const OFF: Color = Color::new(0, 0, 0, 0);

    pub const fn new(intensity: u8, red: u8, green: u8, blue: u8) -> Self {
        Self {
            intensity,
            red,
            green,
            blue,
        }
    }
}

impl From<RGB8> for Color {
    /// Plain rgb values are shown at full intensity
    fn from(rgb: RGB8) -> Self {
        Self::new(config::DEFAULT_MAX_INTENSITY, rgb.r, rgb.g, rgb.b)
    }
}

impl From<(u8, u8, u8, u8)> for Color {
    /// `(intensity, red, green, blue)`
    fn from((intensity, red, green, blue): (u8, u8, u8, u8)) -> Self {
        Self::new(intensity, red, green, blue)
    }
}

/// Delimiters around a sequence of led frames
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Marker {
    Start,
    End,
}

impl Marker {
    /// The byte this marker repeats on the wire
    pub fn byte(self, config: &Config) -> u8 {
        match self {
            Marker::Start => config.sof(),
            Marker::End => config.eof(),
        }
    }
}

pub struct Apa102<SPI, DEVICE = devices::DefaultDevice> {
    spi: SPI,
    config: Config,
    device: PhantomData<DEVICE>,
}

impl<SPI, E> Apa102<SPI>
where
    SPI: FullDuplex<u8, Error = E>,
{
    /// Use apa102 devices via spi
    ///
    /// Power saving is used if the `power_saving` feature is enabled.
    ///
    /// The spi peripheral has to be set up with [`MODE`] already. Call
    /// [`Apa102::initialize`] before anything else.
    pub fn new(spi: SPI, config: Config) -> Self {
        Self {
            spi,
            config,
            device: PhantomData {},
        }
    }
}

impl<SPI, E> Apa102<SPI, devices::Apa102>
where
    SPI: FullDuplex<u8, Error = E>,
{
    /// Use plain apa102 devices, regardless of the `power_saving` feature
    pub fn new_apa102(spi: SPI, config: Config) -> Self {
        Self {
            spi,
            config,
            device: PhantomData {},
        }
    }
}

impl<SPI, E> Apa102<SPI, devices::Apa102Sleep>
where
    SPI: FullDuplex<u8, Error = E>,
{
    /// Use apa102 compatible devices with a sleep command
    ///
    /// `turn_off_*` put the leds to sleep instead of just darkening them.
    pub fn new_power_saving(spi: SPI, config: Config) -> Self {
        Self {
            spi,
            config,
            device: PhantomData {},
        }
    }
}

impl<SPI, D, E> Apa102<SPI, D>
where
    SPI: FullDuplex<u8, Error = E>,
    D: devices::Device,
{
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Release the spi peripheral
    pub fn free(self) -> SPI {
        self.spi
    }

    /// Blocking transfer of a single byte, the received byte is dropped
    fn transfer(&mut self, byte: u8) -> Result<(), E> {
        block!(self.spi.send(byte))?;
        block!(self.spi.read()).ok();
        Ok(())
    }

    /// Switch every led of the chain off
    ///
    /// Has to be called once before any other operation. Repeating it just
    /// resends the same sequence.
    pub fn initialize(&mut self) -> Result<(), E> {
        #[cfg(feature = "defmt")]
        defmt::trace!("apa102: initialize {=usize} leds", self.config.leds());

        let flag = self.config.enable_flag();
        self.send_marker(Marker::Start)?;
        for _ in 0..self.config.leds() {
            self.encode_and_send_frame(flag, &Color::OFF)?;
        }
        self.send_marker(Marker::End)
    }

    /// Send the marker byte `frame_size` times
    pub fn send_marker(&mut self, marker: Marker) -> Result<(), E> {
        let byte = marker.byte(&self.config);
        for _ in 0..self.config.frame_size() {
            self.transfer(byte)?;
        }
        Ok(())
    }

    /// Send one led frame: mode byte, then blue, green and red
    ///
    /// The mode byte is `flag` with the intensity masked to `max_intensity` or'd in.
    pub fn encode_and_send_frame(&mut self, flag: u8, color: &Color) -> Result<(), E> {
        let mode = flag | (color.intensity & self.config.max_intensity());

        self.transfer(mode)?;
        self.transfer(color.blue)?;
        self.transfer(color.green)?;
        self.transfer(color.red)
    }

    /// Send a single led frame without any markers
    ///
    /// The caller is responsible for the surrounding `Marker::Start` and
    /// `Marker::End`.
    pub fn set_single(&mut self, color: &Color) -> Result<(), E> {
        // Masked with 0x3F instead of max_intensity, kept as the hardware saw it
        let flag = self.config.enable_flag() | (color.intensity & SINGLE_INTENSITY_MASK);
        self.encode_and_send_frame(flag, color)
    }

    /// Set the whole chain to one color
    pub fn set_all(&mut self, color: &Color) -> Result<(), E> {
        #[cfg(feature = "defmt")]
        defmt::trace!("apa102: set {=usize} leds to {}", self.config.leds(), color);

        self.send_marker(Marker::Start)?;
        for _ in 0..self.config.leds() {
            self.set_single(color)?;
        }
        self.send_marker(Marker::End)
    }

    /// Send a single "off" frame without any markers
    pub fn turn_off_single(&mut self) -> Result<(), E> {
        let flag = if D::POWER_SAVING {
            self.config.sleep_flag()
        } else {
            self.config.enable_flag()
        };
        let off = Color::new(self.config.min_intensity(), 0x00, 0x00, 0x00);
        self.encode_and_send_frame(flag, &off)
    }

    /// Switch off (or put to sleep) the whole chain
    pub fn turn_off_all(&mut self) -> Result<(), E> {
        #[cfg(feature = "defmt")]
        defmt::trace!("apa102: turn off {=usize} leds", self.config.leds());

        self.send_marker(Marker::Start)?;
        for _ in 0..self.config.leds() {
            self.turn_off_single()?;
        }
        self.send_marker(Marker::End)
    }
}

impl<SPI, D, E> SmartLedsWrite for Apa102<SPI, D>
where
    SPI: FullDuplex<u8, Error = E>,
    D: devices::Device,
{
    type Error = E;
    type Color = Color;
    /// Write all the items of an iterator to an apa102 strip
    ///
    /// The number of frames is given by the iterator, not by `Config::leds`.
    fn write<T, I>(&mut self, iterator: T) -> Result<(), E>
    where
        T: Iterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.send_marker(Marker::Start)?;
        for item in iterator {
            let item = item.into();
            self.set_single(&item)?;
        }
        self.send_marker(Marker::End)
    }
}
