//! Build script for serialmux-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time
//! - Generates `board_config.rs` constants into OUT_DIR

use std::env;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();

    let board = load_board();
    let config = validate_board(&board);
    generate_config(&config);

    println!("cargo:warning=board.toml validated successfully");
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Abort the build with a boxed list of problems
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", truncate(e, 62)))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn truncate(line: &str, width: usize) -> String {
    if line.chars().count() > width {
        let mut cut: String = line.chars().take(width - 3).collect();
        cut.push_str("...");
        cut
    } else {
        line.to_string()
    }
}

/// Read and parse board.toml
fn load_board() -> toml::Value {
    // Re-run if board.toml changes
    println!("cargo:rerun-if-changed=board.toml");

    let path = Path::new("board.toml");
    if !path.exists() {
        fail(
            "board.toml not found",
            &["The firmware requires a board.toml next to Cargo.toml".to_string()],
        );
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read board.toml", &[e.to_string()]),
    };

    match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in board.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    }
}

/// Validated board parameters
struct BoardConfig {
    baudrate: i64,
    data_bits: i64,
    parity: String,
    stop_bits: i64,
    dma_buffer: i64,
    ring_capacity: i64,
    line_capacity: i64,
    led_active_low: bool,
    servo_period_us: i64,
    servo_min_pulse_us: i64,
    servo_max_pulse_us: i64,
    servo_max_angle: i64,
    vdda_mv: i64,
    v25_mv: i64,
    avg_slope_uv: i64,
}

/// Collects problems while reading typed values out of the table
struct Reader<'a> {
    config: &'a toml::Value,
    errors: Vec<String>,
}

impl<'a> Reader<'a> {
    fn get(&mut self, section: &str, key: &str) -> Option<&'a toml::Value> {
        let value = self.config.get(section).and_then(|s| s.get(key));
        if value.is_none() {
            self.errors.push(format!("[{}] missing '{}'", section, key));
        }
        value
    }

    fn int(&mut self, section: &str, key: &str, min: i64, max: i64) -> i64 {
        match self.get(section, key).map(toml::Value::as_integer) {
            Some(Some(v)) if (min..=max).contains(&v) => v,
            Some(Some(_)) => {
                self.errors
                    .push(format!("[{}] {} must be {}-{}", section, key, min, max));
                min
            }
            Some(None) => {
                self.errors
                    .push(format!("[{}] {} must be an integer", section, key));
                min
            }
            None => min,
        }
    }

    fn bool(&mut self, section: &str, key: &str) -> bool {
        match self.get(section, key).map(toml::Value::as_bool) {
            Some(Some(v)) => v,
            Some(None) => {
                self.errors
                    .push(format!("[{}] {} must be true or false", section, key));
                false
            }
            None => false,
        }
    }

    fn choice(&mut self, section: &str, key: &str, allowed: &[&str]) -> String {
        match self.get(section, key).map(toml::Value::as_str) {
            Some(Some(v)) if allowed.contains(&v) => v.to_string(),
            Some(_) => {
                self.errors.push(format!(
                    "[{}] {} must be one of: {}",
                    section,
                    key,
                    allowed.join(", ")
                ));
                allowed[0].to_string()
            }
            None => allowed[0].to_string(),
        }
    }
}

fn validate_board(board: &toml::Value) -> BoardConfig {
    let mut r = Reader {
        config: board,
        errors: Vec::new(),
    };

    let config = BoardConfig {
        baudrate: r.int("uart", "baudrate", 1200, 4_000_000),
        data_bits: r.int("uart", "data_bits", 7, 9),
        parity: r.choice("uart", "parity", &["none", "even", "odd"]),
        stop_bits: r.int("uart", "stop_bits", 1, 2),
        // DMA transfer counter is 16 bits wide
        dma_buffer: r.int("uart", "dma_buffer", 16, 65535),
        ring_capacity: r.int("ring", "capacity", 2, 65536),
        line_capacity: r.int("line", "capacity", 2, 1024),
        led_active_low: r.bool("led", "active_low"),
        servo_period_us: r.int("servo", "period_us", 1000, 100_000),
        servo_min_pulse_us: r.int("servo", "min_pulse_us", 0, 100_000),
        servo_max_pulse_us: r.int("servo", "max_pulse_us", 1, 100_000),
        servo_max_angle: r.int("servo", "max_angle", 1, 360),
        vdda_mv: r.int("temperature", "vdda_mv", 1000, 3600),
        v25_mv: r.int("temperature", "v25_mv", 0, 3600),
        avg_slope_uv: r.int("temperature", "avg_slope_uv", 1, 100_000),
    };

    let mut errors = r.errors;
    if config.servo_min_pulse_us >= config.servo_max_pulse_us {
        errors.push("[servo] min_pulse_us must be below max_pulse_us".to_string());
    }
    if config.servo_max_pulse_us > config.servo_period_us {
        errors.push("[servo] max_pulse_us must fit in period_us".to_string());
    }
    if config.ring_capacity <= config.line_capacity {
        errors.push("[ring] capacity must exceed [line] capacity".to_string());
    }

    if !errors.is_empty() {
        fail("Invalid board configuration", &errors);
    }
    config
}

/// Write board_config.rs into OUT_DIR
fn generate_config(c: &BoardConfig) {
    let data_bits = match c.data_bits {
        7 => "Seven",
        8 => "Eight",
        _ => "Nine",
    };
    let parity = match c.parity.as_str() {
        "even" => "Even",
        "odd" => "Odd",
        _ => "None",
    };
    let stop_bits = if c.stop_bits == 2 { "Two" } else { "One" };

    let mut out = String::new();
    out.push_str("// Generated by build.rs from board.toml. Do not edit.\n\n");
    let _ = writeln!(out, "pub const UART_BAUDRATE: u32 = {};", c.baudrate);
    let _ = writeln!(out, "pub const UART_DATA_BITS: DataBits = DataBits::{};", data_bits);
    let _ = writeln!(out, "pub const UART_PARITY: Parity = Parity::{};", parity);
    let _ = writeln!(out, "pub const UART_STOP_BITS: StopBits = StopBits::{};", stop_bits);
    let _ = writeln!(out, "pub const DMA_BUFFER: usize = {};", c.dma_buffer);
    let _ = writeln!(out, "pub const RING_CAPACITY: usize = {};", c.ring_capacity);
    let _ = writeln!(out, "pub const LINE_CAPACITY: usize = {};", c.line_capacity);
    let _ = writeln!(out, "pub const LED_ACTIVE_LOW: bool = {};", c.led_active_low);
    let _ = writeln!(out, "pub const SERVO_PERIOD_US: u32 = {};", c.servo_period_us);
    let _ = writeln!(out, "pub const SERVO_MIN_PULSE_US: u32 = {};", c.servo_min_pulse_us);
    let _ = writeln!(out, "pub const SERVO_MAX_PULSE_US: u32 = {};", c.servo_max_pulse_us);
    let _ = writeln!(out, "pub const SERVO_MAX_ANGLE: u16 = {};", c.servo_max_angle);
    let _ = writeln!(out, "pub const TEMP_VDDA_MV: u32 = {};", c.vdda_mv);
    let _ = writeln!(out, "pub const TEMP_V25_MV: u32 = {};", c.v25_mv);
    let _ = writeln!(out, "pub const TEMP_AVG_SLOPE_UV: u32 = {};", c.avg_slope_uv);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("board_config.rs"), out).unwrap();
}
