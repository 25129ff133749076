use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::event::SSID_MAX_LEN;
use crate::flash::FlashLayout;

/// WPA2 passphrase bounds, in bytes.
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 64;

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(bound(deserialize = "'de: 'a"))]
pub struct Config<'a> {
    pub internet: InternetConfig<'a>,
    pub flash: FlashLayout,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InternetConfig<'a> {
    pub ssid: &'a str,
    /// Empty for an open network.
    pub password: &'a str,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Wi-Fi SSID is empty")]
    SsidEmpty,
    #[error("Wi-Fi SSID is {0} bytes, at most 32 allowed")]
    SsidTooLong(usize),
    #[error("Wi-Fi password is {0} bytes, expected 8 to 64")]
    PasswordLength(usize),
    #[error("64-byte Wi-Fi password must be a hex PSK")]
    PskNotHex,
}

impl<'a> Config<'a> {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.internet.validate()
    }
}

impl<'a> InternetConfig<'a> {
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.ssid.len() {
            0 => return Err(ConfigError::SsidEmpty),
            len if len > SSID_MAX_LEN => return Err(ConfigError::SsidTooLong(len)),
            _ => {}
        }

        let len = self.password.len();
        if !self.is_open() && !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
            return Err(ConfigError::PasswordLength(len));
        }

        // 8..=63 bytes is a passphrase, exactly 64 is the raw PSK in hex.
        if len == PASSWORD_MAX_LEN && !self.password.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ConfigError::PskNotHex);
        }

        Ok(())
    }
}
