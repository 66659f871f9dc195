//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in btnos-core:
//!
//! - Display adapter over any `embedded-graphics` RGB565 draw target
//! - FT6x36 capacitive touch panel over `embedded-hal` I2C

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod touch;
