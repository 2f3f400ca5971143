/***********************************************************************************************************************
 * Copyright (c) 2019 by the authors
 *
 * Author: André Borrmann
 * License: Apache License 2.0
 **********************************************************************************************************************/

//! # Uart (PL011) line API
//!
//! The Raspberry Pi 4 provides several PL011 UARTs. This crate drives two of them as numbered lines: line 1 is the
//! console on UART0 (GPIO 14/15) and line 2 is UART3 (GPIO 4-7) talking to a Märklin digital controller. The baud
//! rate and framing of each line are fixed and selected by the line id.
//!
//! All I/O is polling based. [Uart::get_byte] and [Uart::put_byte] busy wait on the flag register without any
//! timeout, a line without incoming data blocks the caller forever. Use the ``_timeout`` variants where this is not
//! acceptable.
//!

use crate::errors::{HalError, HalErrorType::*};
use crate::interface::RegisterBlock;
use crate::numfmt::{self, FORMAT_BUFFER_LEN};
use log::debug;

mod interface;

pub type UartResult<T> = Result<T, HalError>;

/// Baud rate divisors and stop bits of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaudProfile {
    pub integer_divisor: u32,
    pub fractional_divisor: u32,
    pub two_stop_bits: bool,
}

/// approx. 115246.09844 baud (best we can do), 1 stop bit
pub const PROFILE_115200: BaudProfile = BaudProfile {
    integer_divisor: 26,
    fractional_divisor: 2,
    two_stop_bits: false,
};

/// 2400 baud, 2 stop bits
pub const PROFILE_2400: BaudProfile = BaudProfile {
    integer_divisor: 125,
    fractional_divisor: 0,
    two_stop_bits: true,
};

/// Numeric identifier of a UART line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineId(u32);

impl LineId {
    /// The console line on UART0
    pub const CONSOLE: LineId = LineId(1);
    /// The Märklin line on UART3
    pub const MARKLIN: LineId = LineId(2);

    /// Wrap any raw line id. Ids without a baud profile are ignored by [Uart::configure_and_enable].
    pub const fn new(raw: u32) -> Self {
        LineId(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The hardwired baud profile of this line, if the id is known
    pub const fn baud_profile(self) -> Option<BaudProfile> {
        match self.0 {
            1 | 3 => Some(PROFILE_115200),
            2 => Some(PROFILE_2400),
            _ => None,
        }
    }
}

/// Configuration state of a line. Only an ``Enabled`` line may send or receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Unconfigured,
    Configuring,
    Enabled,
}

/// Uart (PL011) line accessor owning the register block of one UART instance
pub struct Uart {
    line: LineId,
    registers: RegisterBlock,
    state: LineState,
}

impl Uart {
    pub(crate) const fn new(line: LineId, registers: RegisterBlock) -> Self {
        Uart {
            line,
            registers,
            state: LineState::Unconfigured,
        }
    }

    /// Get the accessor of a line whose PL011 register block lives at ``base``.
    ///
    /// # Safety
    /// ``base`` must point to a PL011 register block (or at least 0x34 bytes of memory acting as one) and no other
    /// accessor for it may exist.
    pub const unsafe fn from_base(line: LineId, base: usize) -> Self {
        Uart::new(line, RegisterBlock::new(base))
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    pub fn state(&self) -> LineState {
        self.state
    }

    /// Program baud rate, 8 bit words, FIFOs and stop bits of this line and enable it for transmit and receive.
    /// Lines without a baud profile are silently left untouched. Calling this again re-runs the whole
    /// disable/configure/enable sequence.
    /// # Example
    /// ```no_run
    /// # use ruspiro_uart_gpio::*;
    /// # fn doc() {
    /// let mut peripherals = Peripherals::take().unwrap();
    /// gpio_init(&mut peripherals.gpio);
    /// peripherals.console.configure_and_enable();
    /// assert_eq!(peripherals.console.state(), LineState::Enabled);
    /// # }
    /// ```
    pub fn configure_and_enable(&mut self) {
        let profile = match self.line.baud_profile() {
            Some(profile) => profile,
            None => {
                debug!("ignoring configuration of unknown UART line {}", self.line.raw());
                return;
            }
        };

        self.state = LineState::Configuring;
        interface::configure(&self.registers, &profile);
        self.state = LineState::Enabled;
        debug!("UART line {} enabled with {:?}", self.line.raw(), profile);
    }

    /// Check without blocking whether the receive FIFO holds data.
    pub fn has_data(&self) -> bool {
        interface::has_data(&self.registers)
    }

    /// Wait for the next received byte. Blocks as long as the receive FIFO is empty.
    pub fn get_byte(&self) -> UartResult<u8> {
        self.ensure_enabled()?;
        interface::receive_byte(&self.registers, None)
    }

    /// Wait for the next received byte, giving up once the receive FIFO has been found empty ``max_polls`` times.
    /// The FIFO is always checked at least once.
    pub fn get_byte_timeout(&self, max_polls: u32) -> UartResult<u8> {
        self.ensure_enabled()?;
        interface::receive_byte(&self.registers, Some(max_polls))
    }

    /// Send one byte. Blocks as long as the transmit FIFO is full.
    pub fn put_byte(&self, data: u8) -> UartResult<()> {
        self.ensure_enabled()?;
        interface::send_byte(&self.registers, data, None)
    }

    /// Send one byte, giving up once the transmit FIFO has been found full ``max_polls`` times. The FIFO is always
    /// checked at least once.
    pub fn put_byte_timeout(&self, data: u8, max_polls: u32) -> UartResult<()> {
        self.ensure_enabled()?;
        interface::send_byte(&self.registers, data, Some(max_polls))
    }

    /// Send every byte of the buffer, each one waiting for room in the transmit FIFO.
    /// # Example
    /// ```no_run
    /// # use ruspiro_uart_gpio::*;
    /// # fn doc() -> UartResult<()> {
    /// # let mut peripherals = Peripherals::take().unwrap();
    /// # peripherals.marklin.configure_and_enable();
    /// // Märklin "go" command
    /// peripherals.marklin.put_bytes(&[0x60])?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn put_bytes(&self, data: &[u8]) -> UartResult<()> {
        self.ensure_enabled()?;
        for byte in data {
            interface::send_byte(&self.registers, *byte, None)?;
        }
        Ok(())
    }

    /// Send the string up to its end or up to the first NUL character, whichever comes first.
    pub fn put_string(&self, text: &str) -> UartResult<()> {
        self.ensure_enabled()?;
        for byte in text.bytes().take_while(|&byte| byte != 0) {
            interface::send_byte(&self.registers, byte, None)?;
        }
        Ok(())
    }

    /// Send the digits of ``value`` in the given base (2 to 36).
    pub fn put_unsigned(&self, value: u32, base: u32) -> UartResult<()> {
        let mut buffer = [0u8; FORMAT_BUFFER_LEN];
        let digits = numfmt::format_unsigned(value, base, &mut buffer)?;
        self.put_string(digits)
    }

    /// Send ``value`` in decimal, with a leading ``-`` if negative.
    pub fn put_signed(&self, value: i32) -> UartResult<()> {
        let mut buffer = [0u8; FORMAT_BUFFER_LEN];
        let digits = numfmt::format_signed(value, &mut buffer)?;
        self.put_string(digits)
    }

    fn ensure_enabled(&self) -> UartResult<()> {
        if self.state == LineState::Enabled {
            Ok(())
        } else {
            Err(HalError::new(LineNotEnabled))
        }
    }
}

/// Formatted output through ``write!``/``writeln!``
impl core::fmt::Write for Uart {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.put_bytes(s.as_bytes()).map_err(|_| core::fmt::Error)
    }
}
