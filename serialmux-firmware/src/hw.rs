//! STM32 peripheral adapters
//!
//! Wraps embassy-stm32 drivers in the serialmux-hal traits so the
//! application crates never see a concrete chip type.

use core::convert::Infallible;

use embassy_stm32::adc::{Adc, Temperature};
use embassy_stm32::mode::Async;
use embassy_stm32::peripherals::{ADC1, TIM2};
use embassy_stm32::timer::simple_pwm::SimplePwmChannel;
use embassy_stm32::usart;

use serialmux_hal::gpio::{Level, OutputPin};
use serialmux_hal::uart::{DataBits, DmaRx, Parity, StopBits, UartConfig, UartError};
use serialmux_hal::{AdcChannel, PwmChannel, UartTx};

use crate::board::DMA_BUFFER;

/// Map a USART driver error onto the HAL error
pub fn uart_error(e: usart::Error) -> UartError {
    match e {
        usart::Error::Framing => UartError::Framing,
        usart::Error::Noise => UartError::Noise,
        usart::Error::Overrun => UartError::Overrun,
        usart::Error::Parity => UartError::Parity,
        usart::Error::BufferTooLong => UartError::BufferTooSmall,
        #[allow(unreachable_patterns)]
        _ => UartError::Other,
    }
}

/// Translate the board line settings into a USART driver config
pub fn usart_config(cfg: &UartConfig) -> usart::Config {
    let mut config = usart::Config::default();
    config.baudrate = cfg.baudrate;
    config.data_bits = match cfg.data_bits {
        DataBits::Seven => usart::DataBits::DataBits7,
        DataBits::Eight => usart::DataBits::DataBits8,
        DataBits::Nine => usart::DataBits::DataBits9,
    };
    config.parity = match cfg.parity {
        Parity::None => usart::Parity::ParityNone,
        Parity::Even => usart::Parity::ParityEven,
        Parity::Odd => usart::Parity::ParityOdd,
    };
    config.stop_bits = match cfg.stop_bits {
        StopBits::One => usart::StopBits::STOP1,
        StopBits::Two => usart::StopBits::STOP2,
    };
    config
}

/// Push-pull GPIO output with its level tracked in software
pub struct GpioOutput<P> {
    pin: P,
    level: Level,
}

impl<P> GpioOutput<P>
where
    P: embedded_hal::digital::OutputPin<Error = Infallible>,
{
    /// `level` must match the level the pin was created with
    pub fn new(pin: P, level: Level) -> Self {
        Self { pin, level }
    }
}

impl<P> OutputPin for GpioOutput<P>
where
    P: embedded_hal::digital::OutputPin<Error = Infallible>,
{
    fn set_level(&mut self, level: Level) {
        let _ = match level {
            Level::High => self.pin.set_high(),
            Level::Low => self.pin.set_low(),
        };
        self.level = level;
    }

    fn level(&self) -> Level {
        self.level
    }
}

/// Blocking transmitter used for console replies and PONG frames
pub struct SerialTx(usart::UartTx<'static, Async>);

impl SerialTx {
    pub fn new(tx: usart::UartTx<'static, Async>) -> Self {
        Self(tx)
    }
}

impl UartTx for SerialTx {
    type Error = UartError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), UartError> {
        self.0.blocking_write(data).map_err(uart_error)
    }

    fn flush(&mut self) -> Result<(), UartError> {
        self.0.blocking_flush().map_err(uart_error)
    }
}

/// DMA receiver driven by the USART idle-line interrupt
///
/// Each [`receive`](IdleDmaRx::receive) call lets the DMA fill the buffer
/// from the current position until the line goes idle, so the buffer is
/// written front to back and wraps to 0 once full, like a circular channel.
/// At the wrap the position reads `DMA_BUFFER`, which the window maps back
/// to 0.
///
/// The DMA is idle between two `receive` calls; bytes arriving then can
/// overrun the USART and are reported as [`UartError::Overrun`].
pub struct IdleDmaRx {
    rx: usart::UartRx<'static, Async>,
    buf: &'static mut [u8; DMA_BUFFER],
    pos: usize,
}

impl IdleDmaRx {
    pub fn new(rx: usart::UartRx<'static, Async>, buf: &'static mut [u8; DMA_BUFFER]) -> Self {
        Self { rx, buf, pos: 0 }
    }

    /// Wait for the next burst of bytes, returning how many arrived
    pub async fn receive(&mut self) -> Result<usize, UartError> {
        if self.pos >= DMA_BUFFER {
            self.pos = 0;
        }
        let n = self
            .rx
            .read_until_idle(&mut self.buf[self.pos..])
            .await
            .map_err(uart_error)?;
        self.pos += n;
        Ok(n)
    }
}

impl DmaRx for IdleDmaRx {
    type Error = UartError;

    fn buffer(&self) -> &[u8] {
        &self.buf[..]
    }

    fn write_position(&self) -> usize {
        self.pos
    }

    fn restart(&mut self) -> Result<(), UartError> {
        // The driver clears its error flags before the next transfer
        self.pos = 0;
        Ok(())
    }
}

/// Servo output on a TIM2 channel
pub struct ServoPwm {
    channel: SimplePwmChannel<'static, TIM2>,
    period_us: u32,
}

impl ServoPwm {
    /// `period_us` must match the frequency the timer was configured with
    pub fn new(channel: SimplePwmChannel<'static, TIM2>, period_us: u32) -> Self {
        Self { channel, period_us }
    }
}

impl PwmChannel for ServoPwm {
    fn max_duty(&self) -> u32 {
        u32::from(self.channel.max_duty_cycle())
    }

    fn set_duty(&mut self, duty: u32) {
        self.channel
            .set_duty_cycle(u16::try_from(duty).unwrap_or(u16::MAX));
    }

    fn period_us(&self) -> u32 {
        self.period_us
    }

    fn enable(&mut self) {
        self.channel.enable();
    }
}

/// Internal temperature sensor on ADC1
pub struct ChipTemperature {
    adc: Adc<'static, ADC1>,
    channel: Temperature,
}

impl ChipTemperature {
    pub fn new(adc: Adc<'static, ADC1>, channel: Temperature) -> Self {
        Self { adc, channel }
    }
}

impl AdcChannel for ChipTemperature {
    type Error = Infallible;

    fn read_raw(&mut self) -> Result<u16, Infallible> {
        Ok(self.adc.blocking_read(&mut self.channel))
    }
}
