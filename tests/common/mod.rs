//! Shared helpers for integration tests that swap process-wide state.

#![allow(dead_code)]

use std::io::{self, Read};

use parking_lot::{Mutex, MutexGuard};

static SERIAL: Mutex<()> = parking_lot::const_mutex(());

/// Tests in one binary share the process-wide slots; hold this while swapping.
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock()
}

/// Read `text.len()` bytes from process input one at a time and check each.
pub fn assert_input_provides(text: &str) -> io::Result<()> {
    let mut input = scoped_stdin::stream::stdin();
    for expected in text.bytes() {
        let mut byte = [0_u8; 1];
        assert_eq!(input.read(&mut byte)?, 1, "input ended before {text:?}");
        assert_eq!(byte[0], expected);
    }
    Ok(())
}

/// Single-byte read from process input; `None` at end-of-stream.
pub fn read_one() -> io::Result<Option<u8>> {
    let mut byte = [0_u8; 1];
    let count = scoped_stdin::stream::stdin().read(&mut byte)?;
    Ok((count == 1).then_some(byte[0]))
}
