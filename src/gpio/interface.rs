/***********************************************************************************************************************
 * Copyright (c) 2019 by the authors
 *
 * Author: André Borrmann
 * License: Apache License 2.0
 **********************************************************************************************************************/

//! # Low-Level GPIO interface implementation
//!

use crate::interface::RegisterBlock;
use log::trace;
use ruspiro_register::RegisterField;

// function select registers, 10 pins with 3 bits each per register
const GPFSEL_OFFSETS: [usize; 6] = [0x00, 0x04, 0x08, 0x0c, 0x10, 0x14];
const GPFSEL_PINS: u32 = 10;
const GPFSEL_BITS: u32 = 3;

// pull-up/down control registers, 16 pins with 2 bits each per register
const GPIO_PUP_PDN_CNTRL_OFFSETS: [usize; 4] = [0xe4, 0xe8, 0xec, 0xf0];
const PUP_PDN_PINS: u32 = 16;
const PUP_PDN_BITS: u32 = 2;

/// The register offset and the bit field of the function select setting of a pin
pub(crate) fn function_field(pin: u32) -> (usize, RegisterField<u32>) {
    let reg = (pin / GPFSEL_PINS) as usize;
    let shift = (pin % GPFSEL_PINS) * GPFSEL_BITS;
    (
        GPFSEL_OFFSETS[reg],
        RegisterField::<u32>::new((1 << GPFSEL_BITS) - 1, shift),
    )
}

/// The register offset and the bit field of the pull resistor setting of a pin
pub(crate) fn pull_field(pin: u32) -> (usize, RegisterField<u32>) {
    let reg = (pin / PUP_PDN_PINS) as usize;
    let shift = (pin % PUP_PDN_PINS) * PUP_PDN_BITS;
    (
        GPIO_PUP_PDN_CNTRL_OFFSETS[reg],
        RegisterField::<u32>::new((1 << PUP_PDN_BITS) - 1, shift),
    )
}

// read-modify-write of the function select field, other pins of the register are kept
pub(crate) fn set_function(regs: &RegisterBlock, pin: u32, code: u32) {
    let (offset, field) = function_field(pin);
    let value = regs.register(offset).modify(field, code);
    trace!("GPFSEL[{:#x}] <- {:#010x} (pin {})", offset, value, pin);
}

pub(crate) fn set_pull(regs: &RegisterBlock, pin: u32, code: u32) {
    let (offset, field) = pull_field(pin);
    let value = regs.register(offset).modify(field, code);
    trace!("GPIO_PUP_PDN_CNTRL[{:#x}] <- {:#010x} (pin {})", offset, value, pin);
}

pub(crate) fn function_code(regs: &RegisterBlock, pin: u32) -> u32 {
    let (offset, field) = function_field(pin);
    regs.register(offset).read(field)
}

pub(crate) fn pull_code(regs: &RegisterBlock, pin: u32) -> u32 {
    let (offset, field) = pull_field(pin);
    regs.register(offset).read(field)
}
