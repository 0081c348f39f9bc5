use super::interrupts::{Interrupt, Interrupts};

/// Serial port registers (SB at 0xFF01, SC at 0xFF02).
///
/// There is no link cable: a transfer started with the internal clock
/// completes immediately, shifting in 0xFF and raising the serial
/// interrupt. Outgoing bytes are kept for inspection; several test ROMs
/// report their results over this port.
pub(crate) struct Serial {
    sb: u8,
    sc: u8,
    output: Vec<u8>,
}

impl Serial {
    pub(crate) fn new() -> Self {
        Self {
            sb: 0,
            sc: 0,
            output: Vec::new(),
        }
    }

    pub(crate) fn read_sb(&self) -> u8 {
        self.sb
    }

    pub(crate) fn read_sc(&self) -> u8 {
        self.sc | 0b0111_1110
    }

    pub(crate) fn write_sb(&mut self, value: u8) {
        self.sb = value;
    }

    pub(crate) fn write_sc(&mut self, value: u8, ints: &mut Interrupts) {
        self.sc = value & 0x83;
        if value & 0x80 != 0 && value & 0x01 != 0 {
            // Internal clock with no partner: the byte goes out, 0xFF
            // comes in, and the transfer-complete interrupt fires.
            log::debug!("[serial] sent 0x{:02X}", self.sb);
            self.output.push(self.sb);
            self.sb = 0xFF;
            self.sc &= 0x7F;
            ints.request(Interrupt::Serial);
        }
    }

    /// Bytes written out so far (consumed by tests and debug logging).
    #[allow(dead_code)]
    pub(crate) fn output(&self) -> &[u8] {
        &self.output
    }
}
