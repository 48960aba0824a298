use sensor_emulator::Peripheral;
use sensor_emulator::sensirion::{Precision, Sht31Command, Sht4xCommand};

use crate::sensor::Emulator;
use crate::util;

/// Print the register file, 16 bytes per row, or what each Sensirion command returns.
pub(crate) fn action(emulator: &mut Emulator) {
    match emulator {
        Emulator::Bme280(bme) => {
            let bytes = bme.registers().as_bytes();
            for (row, chunk) in bytes.chunks(16).enumerate() {
                println!("{:#04X}  {}", row * 16, util::hex(chunk));
            }
        }
        Emulator::Sht31(sht) => {
            let commands = [
                (
                    "measure",
                    Sht31Command::Measure {
                        repeatability: Precision::High,
                        clock_stretching: false,
                    },
                ),
                ("status", Sht31Command::ReadStatus),
                ("serial", Sht31Command::ReadSerial),
            ];
            for (name, command) in commands {
                sht.on_write(&command.code().to_be_bytes());
                println!("{name:<8} {:#06X}  {}", command.code(), util::hex(sht.on_read_request()));
            }
        }
        Emulator::Sht4x(sht) => {
            let commands = [
                ("measure", Sht4xCommand::Measure(Precision::High)),
                ("serial", Sht4xCommand::ReadSerial),
            ];
            for (name, command) in commands {
                sht.on_write(&[command.code()]);
                println!("{name:<8} {:#04X}  {}", command.code(), util::hex(sht.on_read_request()));
            }
        }
    }
}
