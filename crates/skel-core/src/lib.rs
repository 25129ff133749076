//! Hardware-independent core library for esp-skel
//!
//! This crate contains the boot hooks the firmware hands to the runtime:
//! the RF calibration sector query, the Wi-Fi system event callback and the
//! init hook that installs it. None of it touches a peripheral, so it
//! compiles on the ESP32-S3 target and on desktop hosts (for the host
//! harness and tests).

#![cfg_attr(not(test), no_std)]

pub mod boot;
pub mod config;
pub mod event;
pub mod flash;
pub mod services;
