/***********************************************************************************************************************
 * Copyright (c) 2019 by the authors
 *
 * Author: André Borrmann
 * License: Apache License 2.0
 **********************************************************************************************************************/

//! # GPIO pin multiplexer API
//!
//! Each GPIO pin of the BCM2711 carries a function select setting (input, output or one of six alternative
//! functions that route the pin to a peripheral like a UART) and a pull resistor setting. Both settings are bit
//! fields packed together with the settings of the neighbouring pins, so updating one pin is always a
//! read-modify-write of the whole register. The [Gpio] accessor therefore requires ``&mut self`` to configure a pin,
//! which keeps two execution contexts from interleaving updates of the same register.
//!

use crate::errors::{HalError, HalErrorType::*};
use crate::interface::RegisterBlock;
use log::debug;

mod interface;

/// Highest pin number of the GPIO bank
pub const MAX_PIN: u32 = 57;

/// A validated GPIO pin number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pin(u32);

impl Pin {
    /// Get the pin with the given number, failing for numbers outside of the GPIO bank.
    pub const fn new(number: u32) -> Result<Self, HalError> {
        if number > MAX_PIN {
            Err(HalError::new(InvalidPin))
        } else {
            Ok(Pin(number))
        }
    }

    // for the pin numbers hardwired in this crate
    pub(crate) const fn new_unchecked(number: u32) -> Self {
        Pin(number)
    }

    pub const fn number(self) -> u32 {
        self.0
    }
}

/// Pin function select values. The alternative function encodings are given by the hardware and are not in
/// sequence with their numbering.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Input = 0b000,
    Output = 0b001,
    Alt0 = 0b100,
    Alt1 = 0b101,
    Alt2 = 0b110,
    Alt3 = 0b111,
    Alt4 = 0b011,
    Alt5 = 0b010,
}

impl Function {
    /// Convert a raw function select code as stored in the GPFSEL registers.
    pub const fn from_code(code: u32) -> Result<Self, HalError> {
        if code > 0b111 {
            Err(HalError::new(InvalidFunction))
        } else {
            Ok(Function::from_bits(code))
        }
    }

    // every 3 bit value selects a function, higher bits are ignored
    const fn from_bits(bits: u32) -> Self {
        match bits & 0b111 {
            0b000 => Function::Input,
            0b001 => Function::Output,
            0b100 => Function::Alt0,
            0b101 => Function::Alt1,
            0b110 => Function::Alt2,
            0b111 => Function::Alt3,
            0b011 => Function::Alt4,
            _ => Function::Alt5,
        }
    }

    pub const fn code(self) -> u32 {
        self as u32
    }
}

/// Pull resistor setting of a pin
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    None = 0b00,
    Up = 0b01,
    Down = 0b10,
}

impl Pull {
    /// Convert a raw pull control code as stored in the GPIO_PUP_PDN_CNTRL registers. ``0b11`` is reserved.
    pub const fn from_code(code: u32) -> Result<Self, HalError> {
        match code {
            0b00 => Ok(Pull::None),
            0b01 => Ok(Pull::Up),
            0b10 => Ok(Pull::Down),
            _ => Err(HalError::new(InvalidPull)),
        }
    }

    pub const fn code(self) -> u32 {
        self as u32
    }
}

/// GPIO bank accessor
pub struct Gpio {
    registers: RegisterBlock,
}

impl Gpio {
    pub(crate) const fn new(registers: RegisterBlock) -> Self {
        Gpio { registers }
    }

    /// Get a GPIO accessor for a register block at an arbitrary address, e.g. an identity mapping different from
    /// the default peripheral base.
    ///
    /// # Safety
    /// ``base`` must point to the GPIO register block (or memory of at least 0xf4 bytes acting as one) and no other
    /// accessor for it may exist.
    pub const unsafe fn from_base(base: usize) -> Self {
        Gpio::new(RegisterBlock::new(base))
    }

    /// Select the function and the pull resistor of a pin. All other pins sharing the registers keep their
    /// settings.
    /// # Example
    /// ```no_run
    /// # use ruspiro_uart_gpio::*;
    /// # use ruspiro_uart_gpio::gpio::*;
    /// # fn doc() -> Result<(), HalError> {
    /// # let mut gpio = Peripherals::take().unwrap().gpio;
    /// gpio.configure(Pin::new(21)?, Function::Output, Pull::Down);
    /// # Ok(())
    /// # }
    /// ```
    pub fn configure(&mut self, pin: Pin, function: Function, pull: Pull) {
        interface::set_function(&self.registers, pin.number(), function.code());
        interface::set_pull(&self.registers, pin.number(), pull.code());
        debug!("GPIO {} set to {:?}, pull {:?}", pin.number(), function, pull);
    }

    /// Configure a pin from raw numbers and codes, validating each of them first. Nothing is written if any value
    /// is out of range.
    pub fn configure_raw(&mut self, pin: u32, function: u32, pull: u32) -> Result<(), HalError> {
        let pin = Pin::new(pin)?;
        let function = Function::from_code(function)?;
        let pull = Pull::from_code(pull)?;
        self.configure(pin, function, pull);
        Ok(())
    }

    /// The currently selected function of a pin
    pub fn function(&self, pin: Pin) -> Function {
        Function::from_bits(interface::function_code(&self.registers, pin.number()))
    }

    /// The current pull resistor setting of a pin, ``None`` if the register holds the reserved code.
    pub fn pull(&self, pin: Pin) -> Option<Pull> {
        Pull::from_code(interface::pull_code(&self.registers, pin.number())).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HalErrorType;

    const ALL_FUNCTIONS: [Function; 8] = [
        Function::Input,
        Function::Output,
        Function::Alt0,
        Function::Alt1,
        Function::Alt2,
        Function::Alt3,
        Function::Alt4,
        Function::Alt5,
    ];

    // GPFSEL0..5 at 0x00..0x14 and GPIO_PUP_PDN_CNTRL0..3 at 0xe4..0xf0
    const REGISTER_WORDS: usize = 0xf4 / 4;

    fn word(base: usize, offset: usize) -> u32 {
        unsafe { RegisterBlock::new(base) }.register(offset).get()
    }

    #[test]
    fn raw_values_are_validated() {
        assert_eq!(Pin::new(57).map(Pin::number), Ok(57));
        assert_eq!(Pin::new(58).map_err(|e| e.error_type()), Err(HalErrorType::InvalidPin));
        assert_eq!(Function::from_code(0b011), Ok(Function::Alt4));
        assert_eq!(Function::from_code(8).map_err(|e| e.error_type()), Err(HalErrorType::InvalidFunction));
        assert_eq!(Pull::from_code(0b10), Ok(Pull::Down));
        assert_eq!(Pull::from_code(3).map_err(|e| e.error_type()), Err(HalErrorType::InvalidPull));
    }

    #[test]
    fn alternative_function_encoding() {
        let codes: [u32; 8] = [0x0, 0x1, 0x4, 0x5, 0x6, 0x7, 0x3, 0x2];
        for (function, code) in ALL_FUNCTIONS.iter().zip(codes.iter()) {
            assert_eq!(function.code(), *code);
            assert_eq!(Function::from_code(*code), Ok(*function));
        }
    }

    #[test]
    fn function_reads_back_any_register_content() {
        let mut regs = [0u32; REGISTER_WORDS];
        let base = regs.as_mut_ptr() as usize;
        let gpio = unsafe { Gpio::from_base(base) };

        // pins 10..17 hold the codes 0..7 as written by some other agent
        let gpfsel1 = (0..8u32).fold(0, |acc, code| acc | code << (code * 3));
        unsafe { RegisterBlock::new(base) }.register(0x04).set(gpfsel1);

        for code in 0..8u32 {
            let function = gpio.function(Pin::new(10 + code).unwrap());
            assert_eq!(function.code(), code);
            assert_eq!(Function::from_code(code), Ok(function));
        }
    }

    #[test]
    fn configure_sets_only_the_pin_fields() {
        let mut regs = [0u32; REGISTER_WORDS];
        let base = regs.as_mut_ptr() as usize;
        let mut gpio = unsafe { Gpio::from_base(base) };

        for number in 0..=MAX_PIN {
            let pin = Pin::new(number).unwrap();
            for &function in ALL_FUNCTIONS.iter() {
                for &pull in [Pull::Up, Pull::Down, Pull::None].iter() {
                    let fsel = interface::function_field(number);
                    let pud = interface::pull_field(number);
                    let fsel_before = word(base, fsel.0);
                    let pud_before = word(base, pud.0);

                    gpio.configure(pin, function, pull);

                    assert_eq!(gpio.function(pin), function);
                    assert_eq!(gpio.pull(pin), Some(pull));
                    assert_eq!(word(base, fsel.0) & !fsel.1.mask(), fsel_before & !fsel.1.mask());
                    assert_eq!(word(base, pud.0) & !pud.1.mask(), pud_before & !pud.1.mask());
                }
            }
            // leave a distinct pattern behind so neighbours are checked against non zero content
            gpio.configure(pin, ALL_FUNCTIONS[(number % 8) as usize], Pull::Up);
        }
    }

    #[test]
    fn configure_raw_writes_nothing_on_invalid_input() {
        let mut regs = [0u32; REGISTER_WORDS];
        let base = regs.as_mut_ptr() as usize;
        let mut gpio = unsafe { Gpio::from_base(base) };

        assert!(gpio.configure_raw(60, 0, 0).is_err());
        assert!(gpio.configure_raw(3, 9, 0).is_err());
        assert!(gpio.configure_raw(3, 1, 3).is_err());
        assert!((0..REGISTER_WORDS).all(|w| word(base, w * 4) == 0));

        assert_eq!(gpio.configure_raw(3, 1, 2), Ok(()));
        assert_eq!(word(base, 0x00), 0b001 << 9);
        assert_eq!(word(base, 0xe4), 0b10 << 6);
    }
}
