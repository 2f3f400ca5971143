/***********************************************************************************************************************
 * Copyright (c) 2019 by the authors
 *
 * Author: André Borrmann
 * License: Apache License 2.0
 **********************************************************************************************************************/

//! # Low-Level PL011 interface implementation
//!

use super::BaudProfile;
use crate::errors::{HalError, HalErrorType::*};
use crate::interface::RegisterBlock;
use log::trace;
use ruspiro_register::{RegisterField, RegisterFieldValue};

// PL011 register offsets
pub(crate) const DR: usize = 0x00;
pub(crate) const FR: usize = 0x18;
pub(crate) const IBRD: usize = 0x24;
pub(crate) const FBRD: usize = 0x28;
pub(crate) const LCRH: usize = 0x2c;
pub(crate) const CR: usize = 0x30;

// flag register fields
pub(crate) const FR_RXFE: RegisterField<u32> = RegisterField::<u32>::new(1, 4);
pub(crate) const FR_TXFF: RegisterField<u32> = RegisterField::<u32>::new(1, 5);
#[cfg(test)]
pub(crate) const FR_RXFF: RegisterField<u32> = RegisterField::<u32>::new(1, 6);
#[cfg(test)]
pub(crate) const FR_TXFE: RegisterField<u32> = RegisterField::<u32>::new(1, 7);

// control register fields, the ones not owned by the line configuration are kept as found
pub(crate) const CR_UARTEN: RegisterField<u32> = RegisterField::<u32>::new(1, 0);
#[cfg(test)]
pub(crate) const CR_LBE: RegisterField<u32> = RegisterField::<u32>::new(1, 7);
pub(crate) const CR_TXE: RegisterField<u32> = RegisterField::<u32>::new(1, 8);
pub(crate) const CR_RXE: RegisterField<u32> = RegisterField::<u32>::new(1, 9);
#[cfg(test)]
pub(crate) const CR_RTS: RegisterField<u32> = RegisterField::<u32>::new(1, 11);
#[cfg(test)]
pub(crate) const CR_RTSEN: RegisterField<u32> = RegisterField::<u32>::new(1, 14);
#[cfg(test)]
pub(crate) const CR_CTSEN: RegisterField<u32> = RegisterField::<u32>::new(1, 15);

// line control register fields, parity (PEN/EPS) stays disabled
const LCRH_STP2: RegisterField<u32> = RegisterField::<u32>::new(1, 3);
const LCRH_FEN: RegisterField<u32> = RegisterField::<u32>::new(1, 4);
const LCRH_WLEN: RegisterField<u32> = RegisterField::<u32>::new(0b11, 5);

const WLEN_8BIT: u32 = 0b11;

/// Program the baud rate and the framing of the line and enable it for transmit and receive.
///
/// The line control registers must not change while the UART is enabled, so the UART is disabled first. All other
/// control bits (loopback, flow control, ...) set up by earlier boot stages are restored on re-enable.
pub(crate) fn configure(regs: &RegisterBlock, profile: &BaudProfile) {
    let cr = regs.register(CR);
    let cr_state = cr.get();
    cr.set(cr_state & !CR_UARTEN.mask());

    regs.register(IBRD).set(profile.integer_divisor);
    regs.register(FBRD).set(profile.fractional_divisor);

    // 8 bit, no parity, 1 or 2 stop bits, FIFOs enabled
    regs.register(LCRH).write_value(
        RegisterFieldValue::<u32>::new(LCRH_WLEN, WLEN_8BIT)
            | RegisterFieldValue::<u32>::new(LCRH_FEN, 1)
            | RegisterFieldValue::<u32>::new(LCRH_STP2, profile.two_stop_bits as u32),
    );

    cr.set(cr_state | CR_UARTEN.mask() | CR_TXE.mask() | CR_RXE.mask());
    trace!("PL011 @ {:#x}: {:?}, CR was {:#x}", regs.base(), profile, cr_state);
}

pub(crate) fn has_data(regs: &RegisterBlock) -> bool {
    regs.register(FR).read(FR_RXFE) == 0
}

// busy wait until the given flag is cleared
fn wait_flag_cleared(regs: &RegisterBlock, flag: RegisterField<u32>, poll_limit: Option<u32>) -> bool {
    let fr = regs.register(FR);
    poll_while(poll_limit, || fr.read(flag) == 1)
}

// spin as long as the condition holds. With a poll limit given this gives up once the condition has been seen true
// that many times, a limit of 0 still checks once
fn poll_while<F: FnMut() -> bool>(poll_limit: Option<u32>, mut condition: F) -> bool {
    let mut polls: u32 = 0;
    while condition() {
        if let Some(limit) = poll_limit {
            polls += 1;
            if polls >= limit {
                return false;
            }
        }
        core::hint::spin_loop();
    }
    true
}

pub(crate) fn receive_byte(regs: &RegisterBlock, poll_limit: Option<u32>) -> Result<u8, HalError> {
    if wait_flag_cleared(regs, FR_RXFE, poll_limit) {
        Ok((regs.register(DR).get() & 0xFF) as u8)
    } else {
        Err(HalError::new(ReceiveDataTimeOut))
    }
}

pub(crate) fn send_byte(regs: &RegisterBlock, data: u8, poll_limit: Option<u32>) -> Result<(), HalError> {
    // make sure there is room in the transmit FIFO
    if wait_flag_cleared(regs, FR_TXFF, poll_limit) {
        regs.register(DR).set(data as u32);
        Ok(())
    } else {
        Err(HalError::new(SendDataTimeOut))
    }
}
