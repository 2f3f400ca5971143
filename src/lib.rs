/***********************************************************************************************************************
 * Copyright (c) 2019 by the authors
 *
 * Author: André Borrmann
 * License: Apache License 2.0
 **********************************************************************************************************************/
#![doc(html_root_url = "https://docs.rs/ruspiro-uart-gpio/0.1.0")]
#![cfg_attr(not(test), no_std)]

//! # GPIO and UART access for the Raspberry Pi 4
//!
//! Bare metal access to the GPIO pin multiplexer and to two PL011 UART lines of the Raspberry Pi 4. The lines use
//! fixed, polling based configurations: the console line (UART0 on GPIO 14/15, ~115200 baud, 8N1) and the Märklin
//! line (UART3 on GPIO 4-7, 2400 baud, 8N2).
//!
//! Each register block has exactly one owner. [Peripherals::take] hands out the GPIO bank and both lines once, so
//! configuring a pin or a line requires exclusive access by the type system. Sharing them between execution contexts
//! needs an explicit hand-off or a lock provided by the embedding firmware.
//!
//! # Usage
//! ```no_run
//! use ruspiro_uart_gpio::*;
//!
//! fn main() -> UartResult<()> {
//!     let mut peripherals = Peripherals::take().expect("peripherals already taken");
//!     gpio_init(&mut peripherals.gpio);
//!
//!     let console = &mut peripherals.console;
//!     console.configure_and_enable();
//!     console.put_string("hi\r\n")?;
//!     if console.has_data() {
//!         let echo = console.get_byte()?;
//!         console.put_byte(echo)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//! - ``ruspiro_pi4`` (default): use the peripheral address space of the Raspberry Pi 4 (BCM2711)
//!

use core::sync::atomic::{AtomicBool, Ordering};
use log::debug;

pub mod errors;
pub mod gpio;
pub mod interface;
pub mod numfmt;
pub mod uart;

pub use self::errors::{HalError, HalErrorType};
pub use self::gpio::{Function, Gpio, Pin, Pull};
pub use self::uart::{LineId, LineState, Uart, UartResult};

use self::interface::RegisterBlock;

// Peripheral MMIO base address - depends on the right feature
#[cfg(feature = "ruspiro_pi4")]
pub const PERIPHERAL_BASE: usize = 0xFE00_0000;

/// GPIO MMIO base address
pub const GPIO_BASE: usize = PERIPHERAL_BASE + 0x0020_0000;
/// PL011 UART0 MMIO base address, the console line
pub const UART0_BASE: usize = PERIPHERAL_BASE + 0x0020_1000;
/// PL011 UART3 MMIO base address, the Märklin line
pub const UART3_BASE: usize = PERIPHERAL_BASE + 0x0020_1600;

static TAKEN: AtomicBool = AtomicBool::new(false);

/// The register blocks this crate gives access to
pub struct Peripherals {
    pub gpio: Gpio,
    /// ``LineId::CONSOLE`` on UART0
    pub console: Uart,
    /// ``LineId::MARKLIN`` on UART3
    pub marklin: Uart,
}

impl Peripherals {
    /// Get the peripherals. This succeeds only once, every further call returns ``None``.
    pub fn take() -> Option<Self> {
        if TAKEN.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(unsafe { Self::steal() })
        }
    }

    /// Get the peripherals regardless of whether they were handed out already.
    ///
    /// # Safety
    /// The caller has to ensure exclusive access to every register block it uses through the returned accessors.
    pub unsafe fn steal() -> Self {
        TAKEN.store(true, Ordering::Release);
        Peripherals {
            gpio: Gpio::new(RegisterBlock::new(GPIO_BASE)),
            console: Uart::new(LineId::CONSOLE, RegisterBlock::new(UART0_BASE)),
            marklin: Uart::new(LineId::MARKLIN, RegisterBlock::new(UART3_BASE)),
        }
    }
}

// UART3 TXD/RXD/CTS/RTS on GPIO 4-7 (ALT4), UART0 TXD/RXD on GPIO 14/15 (ALT0)
const UART3_PINS: [u32; 4] = [4, 5, 6, 7];
const UART0_PINS: [u32; 2] = [14, 15];

/// Route the UART signals to the GPIO header, to be called once before the lines are configured.
///
/// UART3 is connected to GPIO 4-7 where the Märklin interface expects it. GPIO 14/15 are usually routed to UART0 by
/// the boot loader already and are set again here so the console does not depend on it.
pub fn gpio_init(gpio: &mut Gpio) {
    for &number in UART3_PINS.iter() {
        gpio.configure(Pin::new_unchecked(number), Function::Alt4, Pull::None);
    }
    for &number in UART0_PINS.iter() {
        gpio.configure(Pin::new_unchecked(number), Function::Alt0, Pull::None);
    }
    debug!("GPIO routed to UART3 (4-7) and UART0 (14/15)");
}
