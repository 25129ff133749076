//! Release network services once the station has an address
//!
//! The default Wi-Fi event handler feeds [`SERVICES`]. Tasks that need the
//! network (servers, time sync, telemetry) park on
//! [`ServiceGate::wait_ready`] and are released by the first `StaGotIp`.
//! Later `StaGotIp` events, e.g. after a reconnect, only update the link
//! state.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::{info, warn};

use crate::event::{IpInfo, SystemEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Down,
    /// Associated with the AP, no address yet
    Associated,
    Up(IpInfo),
}

/// What the gate did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    /// First address: waiting services were released
    Started(IpInfo),
    /// Address (re)acquired while services were already running
    Renewed(IpInfo),
    Associated,
    LinkDown,
    Ignored,
}

pub struct ServiceGate {
    running: AtomicBool,
    link: Mutex<CriticalSectionRawMutex, Cell<LinkState>>,
    ready: Signal<CriticalSectionRawMutex, IpInfo>,
}

impl ServiceGate {
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            link: Mutex::const_new(CriticalSectionRawMutex::new(), Cell::new(LinkState::Down)),
            ready: Signal::new(),
        }
    }

    pub fn on_event(&self, event: &SystemEvent) -> GateAction {
        match event {
            SystemEvent::StaConnected { .. } => {
                self.set_link(LinkState::Associated);
                GateAction::Associated
            }
            SystemEvent::StaGotIp(ip_info) => {
                self.set_link(LinkState::Up(*ip_info));
                if self.running.swap(true, Ordering::AcqRel) {
                    GateAction::Renewed(*ip_info)
                } else {
                    self.ready.signal(*ip_info);
                    GateAction::Started(*ip_info)
                }
            }
            SystemEvent::StaDisconnected { .. } | SystemEvent::StaDhcpTimeout => {
                self.set_link(LinkState::Down);
                GateAction::LinkDown
            }
            _ => GateAction::Ignored,
        }
    }

    /// Wait until the station first gets an address.
    ///
    /// Only one task may wait; the address is handed over exactly once.
    pub async fn wait_ready(&self) -> IpInfo {
        self.ready.wait().await
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn link_state(&self) -> LinkState {
        self.link.lock(|link| link.get())
    }

    pub fn current_ip(&self) -> Option<IpInfo> {
        match self.link_state() {
            LinkState::Up(ip_info) => Some(ip_info),
            _ => None,
        }
    }

    fn set_link(&self, state: LinkState) {
        self.link.lock(|link| link.set(state));
    }
}

impl Default for ServiceGate {
    fn default() -> Self {
        Self::new()
    }
}

pub static SERVICES: ServiceGate = ServiceGate::new();

/// Default Wi-Fi event callback, installed by [`crate::boot::user_init`].
pub fn wifi_event_handler(event: &SystemEvent) {
    match SERVICES.on_event(event) {
        GateAction::Started(ip_info) => {
            info!(
                "Got IP {} mask {} gw {}, starting services",
                ip_info.ip, ip_info.netmask, ip_info.gateway
            );
        }
        GateAction::Renewed(ip_info) => info!("IP renewed: {}", ip_info.ip),
        GateAction::Associated => info!("Wi-Fi associated"),
        GateAction::LinkDown => warn!("Wi-Fi link down (event {})", event.id()),
        GateAction::Ignored => log::debug!("Ignoring Wi-Fi event {}", event.id()),
    }
}
