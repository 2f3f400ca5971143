/***************************************************************************************************
 * Copyright (c) 2019 by the authors
 *
 * Author: André Borrmann
 * License: Apache License 2.0
 **************************************************************************************************/

//! # HAL Errors
//! Definition of the error type that can occur within the ``ruspiro-uart-gpio`` crate.
//!

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalErrorType {
    /// pin number outside of the GPIO bank
    InvalidPin,
    /// raw function select code that is not one of the 8 hardware encodings
    InvalidFunction,
    /// raw pull control code that is not none, pull-up or pull-down
    InvalidPull,
    /// byte level I/O requested on a line that has not been configured and enabled
    LineNotEnabled,
    ReceiveDataTimeOut,
    SendDataTimeOut,
    /// numeric base outside of 2..=36
    InvalidBase,
    /// output buffer can not hold the digits and the terminating NUL
    BufferTooSmall,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct HalError {
    error_type: HalErrorType,
}

impl HalError {
    pub const fn new(error_type: HalErrorType) -> Self {
        Self { error_type }
    }

    /// The kind of failure this error represents
    pub const fn error_type(&self) -> HalErrorType {
        self.error_type
    }
}

impl From<HalErrorType> for HalError {
    fn from(error_type: HalErrorType) -> Self {
        Self::new(error_type)
    }
}

impl core::error::Error for HalError {}

impl core::fmt::Display for HalError {
    /// Provide the human readable text for this error
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.error_type {
            HalErrorType::InvalidPin | HalErrorType::InvalidFunction | HalErrorType::InvalidPull => {
                write!(f, "{:?} Error in Gpio", self.error_type)
            }
            HalErrorType::InvalidBase | HalErrorType::BufferTooSmall => {
                write!(f, "{:?} Error in number formatting", self.error_type)
            }
            _ => write!(f, "{:?} Error in Uart", self.error_type),
        }
    }
}

impl core::fmt::Debug for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // debug just calls the diplay implementation
        <HalError as core::fmt::Display>::fmt(self, f)
    }
}
