//! Device discovery orchestration and bookkeeping.
//!
//! Wraps a [`BacnetIpTransport`] to run Who-Is/I-Am discovery windows and
//! keeps a deduplicated table of the devices seen on the network, keyed by
//! device instance.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::app::Apdu;
use crate::network::Npdu;
use crate::object::ObjectIdentifier;
use crate::service::{UnconfirmedServiceChoice, WhoIsRequest};
use crate::transport::{BacnetIpTransport, TransportError};

/// A device discovered via an I-Am reply, or added programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    /// Device object identifier.
    pub device_identifier: ObjectIdentifier,
    /// Vendor identifier reported in the I-Am.
    pub vendor_identifier: u32,
    /// Maximum APDU length the device accepts.
    pub max_apdu_length_accepted: u32,
    /// Segmentation support the device advertised.
    pub segmentation_supported: u32,
    /// Transport address the I-Am arrived from.
    pub address: SocketAddr,
}

/// Events published as the device table changes.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// First time this device instance was observed via I-Am.
    Discovered(DeviceRecord),
    /// A record was added programmatically (not from the network).
    Added(DeviceRecord),
    /// A device instance was removed from the table.
    Removed(u32),
}

/// Cooperative cancellation signal for long-running discovery windows.
///
/// Cloning shares the same underlying flag; `cancel()` wakes any thread
/// parked in `wait_timeout`.
#[derive(Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    condvar: Arc<Condvar>,
    mutex: Arc<Mutex<()>>,
}

impl CancelToken {
    /// Create a new, not-yet-cancelled token.
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            condvar: Arc::new(Condvar::new()),
            mutex: Arc::new(Mutex::new(())),
        }
    }

    /// Signal cancellation and wake anyone waiting on this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.condvar.notify_all();
    }

    /// Whether `cancel()` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Sleep for up to `duration`, waking early if cancelled.
    fn wait(&self, duration: Duration) {
        if self.is_cancelled() || duration.is_zero() {
            return;
        }
        let guard = self.mutex.lock().unwrap();
        let _ = self
            .condvar
            .wait_timeout_while(guard, duration, |_| !self.is_cancelled());
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Maintains the set of known devices and runs discovery windows.
pub struct DeviceManager {
    devices: Mutex<HashMap<u32, DeviceRecord>>,
    events: Mutex<Vec<DeviceEvent>>,
}

impl DeviceManager {
    /// Create an empty device manager.
    pub fn new() -> Self {
        Self {
            devices: Mutex::new(HashMap::new()),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Add a device record programmatically, publishing `Added`.
    pub fn add_device(&self, record: DeviceRecord) {
        let instance = record.device_identifier.instance;
        self.devices.lock().unwrap().insert(instance, record.clone());
        self.events.lock().unwrap().push(DeviceEvent::Added(record));
    }

    /// Remove a device by instance, publishing `Removed` if it was present.
    pub fn remove_device(&self, instance: u32) -> bool {
        let removed = self.devices.lock().unwrap().remove(&instance).is_some();
        if removed {
            self.events.lock().unwrap().push(DeviceEvent::Removed(instance));
        }
        removed
    }

    /// Drain and return events published since the last call.
    pub fn drain_events(&self) -> Vec<DeviceEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    /// Return the current device table as a snapshot.
    pub fn devices(&self) -> Vec<DeviceRecord> {
        self.devices.lock().unwrap().values().cloned().collect()
    }

    /// Look up a known device by instance.
    pub fn get(&self, instance: u32) -> Option<DeviceRecord> {
        self.devices.lock().unwrap().get(&instance).cloned()
    }

    /// Broadcast a Who-Is and collect I-Am replies for `window`, deduplicated
    /// by device instance (first reply for a given instance wins). Returns
    /// early if `cancel` is signalled, returning whatever was collected so
    /// far. Newly discovered instances are recorded in the table and publish
    /// `Discovered`; replies for instances we already know about still count
    /// toward the returned set but do not publish a second event.
    pub fn discover_devices(
        &self,
        transport: &mut BacnetIpTransport,
        broadcast_addr: SocketAddr,
        window: Duration,
        cancel: &CancelToken,
    ) -> Result<Vec<DeviceRecord>, TransportError> {
        let who_is = WhoIsRequest::new();
        let mut service_data = Vec::new();
        who_is
            .encode(&mut service_data)
            .map_err(|e| TransportError::InvalidBvll(e.to_string()))?;
        let apdu = Apdu::UnconfirmedRequest {
            service_choice: UnconfirmedServiceChoice::WhoIs as u8,
            service_data,
        };

        let npdu = Npdu::global_broadcast();
        let mut frame = npdu.encode();
        frame.extend_from_slice(&apdu.encode());
        transport.send_npdu_broadcast(&frame, broadcast_addr)?;

        let mut found = HashMap::new();
        let deadline = Instant::now() + window;

        while Instant::now() < deadline && !cancel.is_cancelled() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let poll = remaining.min(Duration::from_millis(200));
            match transport.receive_bvll_timeout(poll) {
                Ok((message, src)) => {
                    if let Some(record) = decode_iam(&message.data, src) {
                        let instance = record.device_identifier.instance;
                        if !found.contains_key(&instance) {
                            found.insert(instance, record.clone());
                            let is_new = {
                                let mut devices = self.devices.lock().unwrap();
                                let is_new = !devices.contains_key(&instance);
                                devices.insert(instance, record.clone());
                                is_new
                            };
                            if is_new {
                                self.events
                                    .lock()
                                    .unwrap()
                                    .push(DeviceEvent::Discovered(record));
                            }
                        }
                    }
                }
                Err(TransportError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    continue;
                }
                Err(_) => continue,
            }
        }

        Ok(found.into_values().collect())
    }
}

impl Default for DeviceManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Try to decode an I-Am reply out of a raw NPDU+APDU frame received from
/// `src`. Returns `None` for anything that isn't an unconfirmed I-Am.
fn decode_iam(data: &[u8], src: SocketAddr) -> Option<DeviceRecord> {
    let (_npdu, consumed) = Npdu::decode(data).ok()?;
    let apdu = Apdu::decode(&data[consumed..]).ok()?;
    match apdu {
        Apdu::UnconfirmedRequest {
            service_choice,
            service_data,
        } if service_choice == UnconfirmedServiceChoice::IAm as u8 => {
            let iam = crate::service::IAmRequest::decode(&service_data).ok()?;
            Some(DeviceRecord {
                device_identifier: iam.device_identifier,
                vendor_identifier: iam.vendor_identifier,
                max_apdu_length_accepted: iam.max_apdu_length_accepted,
                segmentation_supported: iam.segmentation_supported,
                address: src,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectType;

    fn sample_record(instance: u32) -> DeviceRecord {
        DeviceRecord {
            device_identifier: ObjectIdentifier::new(ObjectType::Device, instance),
            vendor_identifier: 260,
            max_apdu_length_accepted: 1476,
            segmentation_supported: 0,
            address: "127.0.0.1:47808".parse().unwrap(),
        }
    }

    #[test]
    fn add_and_remove_publish_events() {
        let manager = DeviceManager::new();
        manager.add_device(sample_record(1));
        assert_eq!(manager.devices().len(), 1);

        let events = manager.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], DeviceEvent::Added(_)));

        assert!(manager.remove_device(1));
        let events = manager.drain_events();
        assert_eq!(events, vec![DeviceEvent::Removed(1)]);
    }

    #[test]
    fn remove_missing_device_is_noop() {
        let manager = DeviceManager::new();
        assert!(!manager.remove_device(99));
        assert!(manager.drain_events().is_empty());
    }

    #[test]
    fn cancel_token_wakes_immediately() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
        // Should return promptly rather than sleeping the full duration.
        let start = Instant::now();
        token.wait(Duration::from_secs(5));
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
