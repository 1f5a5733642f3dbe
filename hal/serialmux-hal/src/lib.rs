//! serialmux Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific code (the STM32F4 firmware, host-side mocks in tests).
//! The protocol core and the drivers are written against these traits only.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (serialmux-app, firmware)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  serialmux-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ firmware      │       │ test mocks    │
//! │ (embassy)     │       │ (host)        │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::DmaRx`] - Circular DMA receiver (write position + restart)
//! - [`uart::UartTx`] - Serial transmit for replies
//! - [`gpio::OutputPin`] - Digital output with read-back level
//! - [`pwm::PwmChannel`] - PWM compare channel
//! - [`adc::AdcChannel`] - Single-shot ADC conversion

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod pwm;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use adc::AdcChannel;
pub use gpio::{Level, OutputPin};
pub use pwm::PwmChannel;
pub use uart::{DmaRx, UartConfig, UartTx};
