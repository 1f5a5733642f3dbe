//! serialmux firmware
//!
//! One USART carries two protocols at once: newline-terminated text
//! commands for humans and checksummed binary frames for host software.
//! Bytes arrive by DMA, pass through a lock-free ring and are routed by the
//! console task.
//!
//! Board: STM32F411 "black pill"
//! - USART1: PA9 = TX, PA10 = RX (DMA2 stream 7 / stream 2)
//! - Status LED: PC13 (active low)
//! - Servo: PA0, TIM2 channel 1
//! - Temperature: internal sensor on ADC1

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::adc::{Adc, SampleTime};
use embassy_stm32::gpio::{self, Output, OutputType, Speed};
use embassy_stm32::time::Hertz;
use embassy_stm32::timer::low_level::CountingMode;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::usart::{self, Uart};
use embassy_stm32::{bind_interrupts, peripherals};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use serialmux_app::{Console, Controller};
use serialmux_drivers::{Led, Servo, TemperatureSensor};
use serialmux_hal::Level;

mod board;
mod channels;
mod hw;
mod tasks;

bind_interrupts!(struct Irqs {
    USART1 => usart::InterruptHandler<peripherals::USART1>;
});

// DMA target buffer (must live forever)
static DMA_RX_BUF: StaticCell<[u8; board::DMA_BUFFER]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("serialmux firmware starting...");

    let p = embassy_stm32::init(Default::default());
    info!("Peripherals initialized");

    // USART1 with DMA on both directions
    let uart_config = hw::usart_config(&board::uart_config());
    let uart = unwrap!(Uart::new(
        p.USART1,
        p.PA10,
        p.PA9,
        Irqs,
        p.DMA2_CH7,
        p.DMA2_CH2,
        uart_config,
    ));
    let (tx, rx) = uart.split();
    let dma_buf = DMA_RX_BUF.init([0u8; board::DMA_BUFFER]);
    let rx = hw::IdleDmaRx::new(rx, dma_buf);
    info!("USART1 initialized at {} baud", board::UART_BAUDRATE);

    // Status LED, created in its off state
    let off = Level::from(board::LED_ACTIVE_LOW);
    let initial = match off {
        Level::High => gpio::Level::High,
        Level::Low => gpio::Level::Low,
    };
    let led_pin = hw::GpioOutput::new(Output::new(p.PC13, initial, Speed::Low), off);
    let led = Led::new(led_pin, board::LED_ACTIVE_LOW);

    // Servo PWM
    let pwm = SimplePwm::new(
        p.TIM2,
        Some(PwmPin::new(p.PA0, OutputType::PushPull)),
        None,
        None,
        None,
        Hertz::hz(1_000_000 / board::SERVO_PERIOD_US),
        CountingMode::EdgeAlignedUp,
    );
    let servo_pwm = hw::ServoPwm::new(pwm.split().ch1, board::SERVO_PERIOD_US);
    let servo = unwrap!(Servo::new(servo_pwm, board::servo_config()));
    info!("Servo PWM initialized");

    // Internal temperature sensor
    let mut adc = Adc::new(p.ADC1);
    adc.set_sample_time(SampleTime::CYCLES480);
    let temp_channel = adc.enable_temperature();
    let sensor = unwrap!(TemperatureSensor::new(
        hw::ChipTemperature::new(adc, temp_channel),
        board::temperature_config(),
    ));
    info!("ADC initialized");

    let controller = Controller::new(led, servo, sensor, hw::SerialTx::new(tx));
    let console: tasks::BoardConsole = Console::new(controller);

    spawner.spawn(tasks::rx_task(rx)).unwrap();
    spawner.spawn(tasks::console_task(console)).unwrap();

    info!("All tasks spawned, type HELP for commands");
}
