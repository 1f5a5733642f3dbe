//! UART serial communication abstractions
//!
//! Reception is modelled the way a circular DMA channel behaves: the
//! hardware owns a fixed buffer and keeps overwriting it, reporting only
//! how far it has written. Transmission is a plain blocking write.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Circular DMA receiver
///
/// The hardware writes received bytes into [`buffer`](DmaRx::buffer)
/// starting at index 0, wrapping back to 0 after the last slot.
/// [`write_position`](DmaRx::write_position) reports the index the hardware
/// will write next. Some peripherals report `buffer().len()` itself at the
/// wrap boundary instead of 0; consumers must accept both.
pub trait DmaRx {
    /// Error type for receive operations
    type Error;

    /// The hardware-managed receive buffer
    fn buffer(&self) -> &[u8];

    /// Current hardware write position, in `0..=buffer().len()`
    fn write_position(&self) -> usize;

    /// Reinitialise reception after a receive error
    ///
    /// Contract: on success the hardware write position is back at 0. The
    /// caller must reset its own position tracking at the same time.
    fn restart(&mut self) -> Result<(), Self::Error>;
}

/// Receive-side line errors reported by UART peripherals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error (data arrived faster than it was drained)
    Overrun,
    /// Parity error
    Parity,
    /// Buffer too small for the requested transfer
    BufferTooSmall,
    /// Other error
    Other,
}

/// UART configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
