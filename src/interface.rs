/***********************************************************************************************************************
 * Copyright (c) 2019 by the authors
 *
 * Author: André Borrmann
 * License: Apache License 2.0
 **********************************************************************************************************************/

//! # Low-Level register access
//!
//! Every peripheral of this crate is a block of 32Bit registers living at a fixed offset from its base address.
//! The actual volatile access is provided by the ``ruspiro-mmio-register`` types, so reads always observe the current
//! hardware state and writes are never merged, reordered or elided by the compiler.
//!

use ruspiro_mmio_register::ReadWrite;

/// A peripheral register block identified by its base address.
#[derive(Debug)]
pub struct RegisterBlock {
    base: usize,
}

impl RegisterBlock {
    /// Create the accessor for the register block starting at ``base``.
    ///
    /// # Safety
    /// ``base`` must be the start of a mapped peripheral (or memory acting as one) that is large enough for every
    /// offset the owner will access, and there must be only one owner for it.
    pub const unsafe fn new(base: usize) -> Self {
        RegisterBlock { base }
    }

    /// The base address of this register block
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Get the volatile handle of the 32Bit register at the given byte offset.
    #[inline]
    pub fn register(&self, offset: usize) -> ReadWrite<u32> {
        ReadWrite::<u32>::new(self.base + offset)
    }
}
