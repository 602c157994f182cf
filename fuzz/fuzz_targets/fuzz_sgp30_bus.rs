//! Fuzz target: `Sgp30` response handling
//!
//! Replays arbitrary bytes as the sensor's I2C responses and drives the
//! driver through every command.  Checks that corrupted responses are
//! rejected by CRC rather than panicking or being accepted silently.
//!
//! cargo fuzz run fuzz_sgp30_bus

#![no_main]

use aqmon::sensors::sgp30::{Sgp30, crc8};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use libfuzzer_sys::fuzz_target;

struct FuzzBus<'a> {
    data: &'a [u8],
}

impl ErrorType for FuzzBus<'_> {
    type Error = ErrorKind;
}

impl I2c for FuzzBus<'_> {
    fn transaction(&mut self, _addr: u8, ops: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        for op in ops {
            if let Operation::Read(buf) = op {
                if self.data.len() < buf.len() {
                    return Err(ErrorKind::Other);
                }
                let (head, tail) = self.data.split_at(buf.len());
                buf.copy_from_slice(head);
                self.data = tail;
            }
        }
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn words_valid(raw: &[u8]) -> bool {
    raw.chunks(3).all(|c| c.len() == 3 && crc8(&c[..2]) == c[2])
}

fuzz_target!(|data: &[u8]| {
    let mut sgp = Sgp30::new(FuzzBus { data }, NoDelay);

    if sgp.measure_iaq().is_ok() {
        assert!(words_valid(&data[..6]), "measurement accepted with bad CRC");
    }
    let _ = sgp.serial();
    let _ = sgp.get_iaq_baseline();
    let _ = sgp.iaq_init();
});
