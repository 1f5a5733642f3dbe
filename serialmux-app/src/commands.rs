//! Line command table
//!
//! | Command  | Arguments            | Reply                     |
//! |----------|----------------------|---------------------------|
//! | `LED`    | `ON`, `OFF`, `TOGGLE`| `LED -> ON`               |
//! | `MOTOR`  | angle, 0-180         | `MOTOR -> 90`             |
//! | `TEMP`   | none                 | `TEMP 31.5C`              |
//! | `REBOOT` | none                 | `OK: Rebooting...`        |
//! | `HELP`   | none                 | one line per command      |
//!
//! Handlers are generic over the device so the same unit structs serve the
//! `dyn Device` table used by the firmware and concrete mocks in tests.

use serialmux_protocol::{Command, CommandError, CommandTable, Handler};

use crate::device::Device;

/// `LED ON|OFF|TOGGLE`
pub struct Led;

impl<D: Device + ?Sized> Handler<D> for Led {
    fn execute(
        &self,
        dev: &mut D,
        args: &str,
        _: &CommandTable<'_, D>,
    ) -> Result<(), CommandError> {
        let on = match args.split_ascii_whitespace().next() {
            None => return Err(CommandError::MissingArgument),
            Some("ON") => {
                dev.set_led(true);
                true
            }
            Some("OFF") => {
                dev.set_led(false);
                false
            }
            Some("TOGGLE") => dev.toggle_led(),
            Some(_) => return Err(CommandError::InvalidArgument),
        };

        dev.reply(format_args!("LED -> {}", if on { "ON" } else { "OFF" }));
        Ok(())
    }
}

/// `MOTOR <angle>`, angles above the servo range are clamped
pub struct Motor;

impl<D: Device + ?Sized> Handler<D> for Motor {
    fn execute(
        &self,
        dev: &mut D,
        args: &str,
        _: &CommandTable<'_, D>,
    ) -> Result<(), CommandError> {
        let arg = args
            .split_ascii_whitespace()
            .next()
            .ok_or(CommandError::MissingArgument)?;
        let angle: u16 = arg.parse().map_err(|_| CommandError::InvalidArgument)?;

        let applied = dev.set_servo_angle(angle);
        dev.reply(format_args!("MOTOR -> {}", applied));
        Ok(())
    }
}

/// `TEMP`
pub struct Temp;

impl<D: Device + ?Sized> Handler<D> for Temp {
    fn execute(&self, dev: &mut D, _: &str, _: &CommandTable<'_, D>) -> Result<(), CommandError> {
        let temperature = dev.read_temperature()?;
        dev.reply(format_args!("TEMP {}C", temperature));
        Ok(())
    }
}

/// `REBOOT`
pub struct Reboot;

impl<D: Device + ?Sized> Handler<D> for Reboot {
    fn execute(&self, dev: &mut D, _: &str, _: &CommandTable<'_, D>) -> Result<(), CommandError> {
        dev.reply(format_args!("OK: Rebooting..."));
        dev.request_reboot();
        Ok(())
    }
}

/// `HELP`, lists every entry of the table it was invoked from
pub struct Help;

impl<D: Device + ?Sized> Handler<D> for Help {
    fn execute(
        &self,
        dev: &mut D,
        _: &str,
        commands: &CommandTable<'_, D>,
    ) -> Result<(), CommandError> {
        dev.reply(format_args!("--- Commands ---"));
        for command in commands.iter() {
            dev.reply(format_args!("{:<10} : {}", command.name(), command.help()));
        }
        dev.reply(format_args!("--------------------------"));
        Ok(())
    }
}

static ENTRIES: [Command<'static, dyn Device>; 5] = [
    Command::new("LED", "Control LED (Usage: LED ON/OFF/TOGGLE)", &Led),
    Command::new("MOTOR", "Set servo angle (Usage: MOTOR 0-180)", &Motor),
    Command::new("TEMP", "Read chip temperature", &Temp),
    Command::new("REBOOT", "Reboot System", &Reboot),
    Command::new("HELP", "Show help list", &Help),
];

/// The command table served on the console
pub static COMMANDS: CommandTable<'static, dyn Device> = CommandTable::new(&ENTRIES);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDevice;

    fn run(line: &str) -> (Result<(), CommandError>, MockDevice) {
        let mut dev = MockDevice::default();
        let (name, args) = line.split_once(' ').unwrap_or((line, ""));
        let command = COMMANDS.find(name).unwrap();
        let result = command.execute(&mut dev, args, &COMMANDS);
        (result, dev)
    }

    #[test]
    fn test_led_on_off() {
        let (result, dev) = run("LED ON");
        assert_eq!(result, Ok(()));
        assert!(dev.led);
        assert_eq!(dev.replies, ["LED -> ON"]);

        let (_, dev) = run("LED OFF");
        assert!(!dev.led);
        assert_eq!(dev.replies, ["LED -> OFF"]);
    }

    #[test]
    fn test_led_toggle() {
        let (result, dev) = run("LED TOGGLE");
        assert_eq!(result, Ok(()));
        assert!(dev.led);
        assert_eq!(dev.replies, ["LED -> ON"]);
    }

    #[test]
    fn test_led_argument_errors() {
        assert_eq!(run("LED").0, Err(CommandError::MissingArgument));
        assert_eq!(run("LED on").0, Err(CommandError::InvalidArgument));
        assert_eq!(run("LED BLINK").0, Err(CommandError::InvalidArgument));
    }

    #[test]
    fn test_motor_sets_angle() {
        let (result, dev) = run("MOTOR 90");
        assert_eq!(result, Ok(()));
        assert_eq!(dev.angle, Some(90));
        assert_eq!(dev.replies, ["MOTOR -> 90"]);
    }

    #[test]
    fn test_motor_clamps() {
        let (_, dev) = run("MOTOR 270");
        assert_eq!(dev.angle, Some(180));
        assert_eq!(dev.replies, ["MOTOR -> 180"]);
    }

    #[test]
    fn test_motor_argument_errors() {
        assert_eq!(run("MOTOR").0, Err(CommandError::MissingArgument));
        assert_eq!(run("MOTOR abc").0, Err(CommandError::InvalidArgument));
        assert_eq!(run("MOTOR -5").0, Err(CommandError::InvalidArgument));
        assert_eq!(run("MOTOR 99999").0, Err(CommandError::InvalidArgument));
    }

    #[test]
    fn test_temp_reply() {
        let (result, dev) = run("TEMP");
        assert_eq!(result, Ok(()));
        assert_eq!(dev.replies, ["TEMP 31.5C"]);
    }

    #[test]
    fn test_temp_unavailable() {
        let mut dev = MockDevice {
            temperature: None,
            ..Default::default()
        };
        let command = COMMANDS.find("TEMP").unwrap();
        assert_eq!(
            command.execute(&mut dev, "", &COMMANDS),
            Err(CommandError::Unavailable)
        );
        assert!(dev.replies.is_empty());
    }

    #[test]
    fn test_reboot_replies_then_requests() {
        let (result, dev) = run("REBOOT");
        assert_eq!(result, Ok(()));
        assert!(dev.reboot);
        assert_eq!(dev.replies, ["OK: Rebooting..."]);
    }

    #[test]
    fn test_help_lists_every_command() {
        let (result, dev) = run("HELP");
        assert_eq!(result, Ok(()));
        assert_eq!(dev.replies.len(), COMMANDS.len() + 2);
        assert_eq!(dev.replies[1], "LED        : Control LED (Usage: LED ON/OFF/TOGGLE)");
        assert_eq!(dev.replies[4], "REBOOT     : Reboot System");
        for command in COMMANDS.iter() {
            assert!(dev.replies.iter().any(|r| r.starts_with(command.name())));
        }
    }
}
