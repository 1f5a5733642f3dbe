//! Board configuration
//!
//! Constants are generated by build.rs from board.toml.

use serialmux_drivers::{ServoConfig, TemperatureConfig};
use serialmux_hal::uart::{DataBits, Parity, StopBits, UartConfig};

include!(concat!(env!("OUT_DIR"), "/board_config.rs"));

pub fn uart_config() -> UartConfig {
    UartConfig {
        baudrate: UART_BAUDRATE,
        data_bits: UART_DATA_BITS,
        parity: UART_PARITY,
        stop_bits: UART_STOP_BITS,
    }
}

pub fn servo_config() -> ServoConfig {
    ServoConfig {
        min_pulse_us: SERVO_MIN_PULSE_US,
        max_pulse_us: SERVO_MAX_PULSE_US,
        max_angle: SERVO_MAX_ANGLE,
    }
}

pub fn temperature_config() -> TemperatureConfig {
    TemperatureConfig {
        vdda_mv: TEMP_VDDA_MV,
        v25_mv: TEMP_V25_MV,
        avg_slope_uv: TEMP_AVG_SLOPE_UV,
    }
}
