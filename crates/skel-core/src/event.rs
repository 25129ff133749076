//! Wi-Fi system events and the callback slot the runtime reports them through

use core::cell::Cell;
use core::net::Ipv4Addr;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Longest SSID 802.11 allows, in bytes.
pub const SSID_MAX_LEN: usize = 32;

pub type Ssid = heapless::String<SSID_MAX_LEN>;
pub type MacAddress = [u8; 6];

/// Station authentication modes, numbered like the SDK's `AUTH_*` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Open = 0,
    Wep = 1,
    WpaPsk = 2,
    Wpa2Psk = 3,
    WpaWpa2Psk = 4,
}

/// Address configuration handed out by DHCP (or set statically).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpInfo {
    pub ip: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub gateway: Ipv4Addr,
}

impl IpInfo {
    /// Address info from a CIDR prefix length, e.g. `/24`.
    pub fn from_prefix(ip: Ipv4Addr, prefix_len: u8, gateway: Ipv4Addr) -> Self {
        let mask = match prefix_len {
            0 => 0,
            len if len >= 32 => u32::MAX,
            len => u32::MAX << (32 - u32::from(len)),
        };
        Self {
            ip,
            netmask: Ipv4Addr::from(mask),
            gateway,
        }
    }
}

/// Events the Wi-Fi driver reports to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemEvent {
    StaConnected { ssid: Ssid, channel: u8 },
    StaDisconnected { ssid: Ssid, reason: u8 },
    StaAuthModeChange { old: AuthMode, new: AuthMode },
    /// Station has an address; anything that needs the network can start now.
    StaGotIp(IpInfo),
    StaDhcpTimeout,
    SoftApStaConnected { mac: MacAddress, aid: u8 },
    SoftApStaDisconnected { mac: MacAddress, aid: u8 },
    SoftApProbeRequest { mac: MacAddress, rssi: i8 },
}

impl SystemEvent {
    /// Numeric event id, matching the SDK's `EVENT_*` constants.
    pub fn id(&self) -> u8 {
        match self {
            SystemEvent::StaConnected { .. } => 0,
            SystemEvent::StaDisconnected { .. } => 1,
            SystemEvent::StaAuthModeChange { .. } => 2,
            SystemEvent::StaGotIp(_) => 3,
            SystemEvent::StaDhcpTimeout => 4,
            SystemEvent::SoftApStaConnected { .. } => 5,
            SystemEvent::SoftApStaDisconnected { .. } => 6,
            SystemEvent::SoftApProbeRequest { .. } => 7,
        }
    }
}

pub type EventCallback = fn(&SystemEvent);

/// Single callback slot for Wi-Fi events.
///
/// Installing replaces whatever was there before. The callback runs outside
/// the critical section, so it may itself install or dispatch.
pub struct EventDispatcher {
    handler: Mutex<CriticalSectionRawMutex, Cell<Option<EventCallback>>>,
}

impl EventDispatcher {
    pub const fn new() -> Self {
        Self {
            handler: Mutex::const_new(CriticalSectionRawMutex::new(), Cell::new(None)),
        }
    }

    pub fn install(&self, callback: EventCallback) {
        self.handler.lock(|handler| handler.set(Some(callback)));
    }

    pub fn clear(&self) {
        self.handler.lock(|handler| handler.set(None));
    }

    pub fn is_installed(&self) -> bool {
        self.handler.lock(|handler| handler.get().is_some())
    }

    /// Deliver `event` to the installed callback.
    ///
    /// Returns `false` if no callback is installed and the event was dropped.
    pub fn dispatch(&self, event: &SystemEvent) -> bool {
        match self.handler.lock(|handler| handler.get()) {
            Some(callback) => {
                callback(event);
                true
            }
            None => {
                log::debug!("Dropping Wi-Fi event {} with no handler installed", event.id());
                false
            }
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the firmware's Wi-Fi driver glue reports events.
pub static WIFI_EVENTS: EventDispatcher = EventDispatcher::new();
