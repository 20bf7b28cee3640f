//! BACnet Application Layer Services
//!
//! This module implements the BACnet application layer services this crate's core
//! supports, as defined in ASHRAE Standard 135: device discovery (`WhoIs`/`IAm`) and
//! object-property access (`ReadProperty`/`WriteProperty`), plus the Error/Reject/Abort
//! reply builders shared by every confirmed service.
//!
//! # Overview
//!
//! BACnet services define the application-level protocols for device communication. They
//! abstract the underlying network complexity and provide a consistent interface for
//! building automation operations. Each service defines:
//!
//! - **Request Structure**: Parameters needed to invoke the service
//! - **Response Structure**: Data returned by the service
//! - **Error Handling**: Standardized error codes and descriptions
//! - **Encoding Rules**: How requests and responses are serialized
//!
//! # Service Categories
//!
//! ## Object Access Services
//! Core services for reading and writing object properties:
//! - **ReadProperty**: Read a single property value
//! - **WriteProperty**: Write a single property value
//!
//! ## Remote Device Discovery
//! Services for network discovery and device identification:
//! - **WhoIs**: Discover devices on the network
//! - **IAm**: Device identification response
//!
//! Everything else in the standard's service vocabulary — alarm/event services,
//! COV subscriptions, atomic file access, time synchronization, the `*Multiple`
//! composite property services — is out of scope for this core (see the crate's
//! design notes). `ConfirmedServiceChoice`/`UnconfirmedServiceChoice` still enumerate
//! the full numeric wire vocabulary, since a peer may legitimately send any of them,
//! but only `ReadProperty`, `WriteProperty`, `WhoIs`, and `IAm` have request/response
//! types and dispatch logic here; anything else a peer asks for is answered with
//! Reject/`UnrecognizedService`.
//!
//! # Service Types
//!
//! BACnet services are classified by their reliability requirements:
//!
//! ## Confirmed Services
//! These services require acknowledgment from the recipient and provide reliable delivery:
//! - Use an invoke id for response correlation
//! - Provide error responses for failed operations
//! - Include timeout and retry mechanisms at the transport layer
//!
//! ## Unconfirmed Services
//! These services are "fire-and-forget" with no acknowledgment:
//! - Lower overhead and faster transmission
//! - No delivery guarantee
//! - Suitable for broadcasts such as `WhoIs`
//! - No error reporting mechanism
//!
//! # Examples
//!
//! ## Reading a Property
//!
//! ```rust
//! use bacnet_rs::service::{ConfirmedServiceChoice, ReadPropertyRequest};
//! use bacnet_rs::object::{ObjectIdentifier, ObjectType, PropertyIdentifier};
//!
//! // Create a read property request
//! let object_id = ObjectIdentifier::new(ObjectType::AnalogInput, 1);
//! let request = ReadPropertyRequest::new(object_id, PropertyIdentifier::PresentValue.into());
//!
//! // This would be sent as a confirmed service
//! let service_choice = ConfirmedServiceChoice::ReadProperty;
//! ```
//!
//! ## Device Discovery
//!
//! ```rust
//! use bacnet_rs::service::{UnconfirmedServiceChoice, WhoIsRequest};
//!
//! // Create a Who-Is request to discover all devices
//! let who_is = WhoIsRequest::new();
//!
//! // This would be sent as an unconfirmed service
//! let service_choice = UnconfirmedServiceChoice::WhoIs;
//! ```
//!
//! # Error Handling
//!
//! Services can fail for various reasons, and BACnet defines standardized error responses:
//!
//! ```rust
//! use bacnet_rs::service::ServiceError;
//!
//! // Example error handling
//! let error = ServiceError::InvalidParameters("Missing required property".to_string());
//!
//! match error {
//!     ServiceError::UnsupportedService => println!("Service not supported"),
//!     ServiceError::InvalidParameters(msg) => println!("Invalid parameters: {}", msg),
//!     ServiceError::Timeout => println!("Request timed out"),
//!     ServiceError::EncodingError(msg) => println!("Encoding error: {}", msg),
//!     _ => println!("Other error: {:?}", error),
//! }
//! ```
//!
//! # Protocol Integration
//!
//! Services integrate with the lower protocol layers:
//!
//! 1. **Application Layer**: Services define the high-level operations
//! 2. **Transport Layer**: Handles reliability, segmentation, and flow control
//! 3. **Network Layer**: Provides routing and addressing
//! 4. **Data Link Layer**: Manages frame transmission and media access
//!
//! This layered approach allows services to work across different network types
//! and provides a consistent programming interface regardless of the underlying
//! communication technology.

#[cfg(feature = "std")]
use std::error::Error;

#[cfg(feature = "std")]
use std::fmt;

#[cfg(not(feature = "std"))]
use core::fmt;

#[cfg(not(feature = "std"))]
use alloc::{format, string::String, vec::Vec};

/// Result type for service operations
#[cfg(feature = "std")]
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(not(feature = "std"))]
pub type Result<T> = core::result::Result<T, ServiceError>;

/// Errors that can occur during service operations
#[derive(Debug)]
pub enum ServiceError {
    /// Service is not supported
    UnsupportedService,
    /// Invalid service parameters
    InvalidParameters(String),
    /// Service timeout
    Timeout,
    /// Service rejected by remote device
    Rejected(RejectReason),
    /// Service aborted by remote device
    Aborted(AbortReason),
    /// Encoding/decoding error
    EncodingError(String),
    /// Unsupported service choice
    UnsupportedServiceChoice(u8),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::UnsupportedService => write!(f, "Service not supported"),
            ServiceError::InvalidParameters(msg) => write!(f, "Invalid parameters: {}", msg),
            ServiceError::Timeout => write!(f, "Service timeout"),
            ServiceError::Rejected(reason) => write!(f, "Service rejected: {:?}", reason),
            ServiceError::Aborted(reason) => write!(f, "Service aborted: {:?}", reason),
            ServiceError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
            ServiceError::UnsupportedServiceChoice(choice) => {
                write!(f, "Unsupported service choice: {}", choice)
            }
        }
    }
}

#[cfg(feature = "std")]
impl Error for ServiceError {}

/// Confirmed service choices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConfirmedServiceChoice {
    // Alarm and Event Services
    AcknowledgeAlarm = 0,
    ConfirmedEventNotification = 2,
    GetAlarmSummary = 3,
    GetEnrollmentSummary = 4,
    GetEventInformation = 29,

    // File Access Services
    AtomicReadFile = 6,
    AtomicWriteFile = 7,

    // Object Access Services
    AddListElement = 8,
    RemoveListElement = 9,
    CreateObject = 10,
    DeleteObject = 11,
    ReadProperty = 12,
    ReadPropertyMultiple = 14,
    WriteProperty = 15,
    WritePropertyMultiple = 16,

    // Remote Device Management Services
    DeviceCommunicationControl = 17,
    ReinitializeDevice = 20,

    // Virtual Terminal Services
    VtOpen = 21,
    VtClose = 22,
    VtData = 23,

    // Security Services
    Authenticate = 24,
    RequestKey = 25,

    // Other Services
    ReadRange = 26,
    SubscribeCOV = 5,
    SubscribeCOVProperty = 28,

    // Protocol Revision 30 - Security Services
    AuthRequest = 34,
}

impl TryFrom<u8> for ConfirmedServiceChoice {
    type Error = ServiceError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::AcknowledgeAlarm),
            2 => Ok(Self::ConfirmedEventNotification),
            3 => Ok(Self::GetAlarmSummary),
            4 => Ok(Self::GetEnrollmentSummary),
            29 => Ok(Self::GetEventInformation),
            6 => Ok(Self::AtomicReadFile),
            7 => Ok(Self::AtomicWriteFile),
            8 => Ok(Self::AddListElement),
            9 => Ok(Self::RemoveListElement),
            10 => Ok(Self::CreateObject),
            11 => Ok(Self::DeleteObject),
            12 => Ok(Self::ReadProperty),
            14 => Ok(Self::ReadPropertyMultiple),
            15 => Ok(Self::WriteProperty),
            16 => Ok(Self::WritePropertyMultiple),
            17 => Ok(Self::DeviceCommunicationControl),
            20 => Ok(Self::ReinitializeDevice),
            21 => Ok(Self::VtOpen),
            22 => Ok(Self::VtClose),
            23 => Ok(Self::VtData),
            24 => Ok(Self::Authenticate),
            25 => Ok(Self::RequestKey),
            26 => Ok(Self::ReadRange),
            5 => Ok(Self::SubscribeCOV),
            28 => Ok(Self::SubscribeCOVProperty),
            34 => Ok(Self::AuthRequest),
            _ => Err(ServiceError::UnsupportedServiceChoice(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UnconfirmedServiceChoice {
    IAm = 0,
    IHave = 1,
    UnconfirmedCOVNotification = 2,
    UnconfirmedEventNotification = 3,
    UnconfirmedPrivateTransfer = 4,
    UnconfirmedTextMessage = 5,
    TimeSynchronization = 6,
    WhoHas = 7,
    WhoIs = 8,
    UtcTimeSynchronization = 9,
    WriteGroup = 10,
    UnconfirmedCOVNotificationMultiple = 11,
    UnconfirmedAuditNotification = 12,
    WhoAmI = 13,
    YouAre = 14,
}

impl TryFrom<u8> for UnconfirmedServiceChoice {
    type Error = ServiceError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::IAm),
            1 => Ok(Self::IHave),
            2 => Ok(Self::UnconfirmedCOVNotification),
            3 => Ok(Self::UnconfirmedEventNotification),
            4 => Ok(Self::UnconfirmedPrivateTransfer),
            5 => Ok(Self::UnconfirmedTextMessage),
            6 => Ok(Self::TimeSynchronization),
            7 => Ok(Self::WhoHas),
            8 => Ok(Self::WhoIs),
            9 => Ok(Self::UtcTimeSynchronization),
            10 => Ok(Self::WriteGroup),
            11 => Ok(Self::UnconfirmedCOVNotificationMultiple),
            12 => Ok(Self::UnconfirmedAuditNotification),
            13 => Ok(Self::WhoAmI),
            14 => Ok(Self::YouAre),
            _ => Err(ServiceError::UnsupportedServiceChoice(value)),
        }
    }
}

/// Reject reason codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Other = 0,
    BufferOverflow = 1,
    InconsistentParameters = 2,
    InvalidParameterDataType = 3,
    InvalidTag = 4,
    MissingRequiredParameter = 5,
    ParameterOutOfRange = 6,
    TooManyArguments = 7,
    UndefinedEnumeration = 8,
    UnrecognizedService = 9,
}

/// Abort reason codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    Other = 0,
    BufferOverflow = 1,
    InvalidApduInThisState = 2,
    PreemptedByHigherPriorityTask = 3,
    SegmentationNotSupported = 4,
}

/// BACnet error class, carried in the first parameter of an Error PDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorClass {
    Device = 0,
    Object = 1,
    Property = 2,
    Resources = 3,
    Security = 4,
    Services = 5,
    Vt = 6,
    Communication = 7,
}

/// BACnet error codes this core's error-reply path actually produces
/// (`UnknownObject`, `UnknownProperty`, `InvalidDataType`, `ValueOutOfRange`,
/// `WriteAccessDenied`, `OptionalFunctionalityNotSupported`,
/// `InconsistentParameters`). Numeric values follow the published BACnet
/// error-code enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    Other = 0,
    InconsistentParameters = 7,
    InvalidDataType = 9,
    UnknownObject = 31,
    UnknownProperty = 32,
    ValueOutOfRange = 37,
    WriteAccessDenied = 40,
    OptionalFunctionalityNotSupported = 45,
}

/// Build the Error PDU for a rejected confirmed service.
pub fn build_error(
    invoke_id: u8,
    service_choice: u8,
    class: ErrorClass,
    code: ErrorCode,
) -> crate::app::Apdu {
    crate::app::Apdu::Error {
        invoke_id,
        service_choice,
        error_class: class as u8,
        error_code: code as u8,
    }
}

use crate::encoding::{
    decode_context_enumerated, decode_context_object_id, decode_context_unsigned,
    decode_enumerated, decode_object_identifier, decode_unsigned, encode_context_enumerated,
    encode_context_object_id, encode_context_unsigned, encode_enumerated, encode_object_identifier,
    encode_unsigned, Result as EncodingResult,
};
use crate::object::ObjectIdentifier;

/// Special array index value indicating all elements
pub const BACNET_ARRAY_ALL: u32 = 0xFFFFFFFF;

/// Who-Is request (unconfirmed service)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WhoIsRequest {
    /// Low limit of device instance range (optional)
    pub device_instance_range_low_limit: Option<u32>,
    /// High limit of device instance range (optional)
    pub device_instance_range_high_limit: Option<u32>,
}

impl WhoIsRequest {
    /// Create a new Who-Is request for all devices
    pub fn new() -> Self {
        Self {
            device_instance_range_low_limit: None,
            device_instance_range_high_limit: None,
        }
    }

    /// Create a new Who-Is request for a specific device
    pub fn for_device(device_instance: u32) -> Self {
        Self {
            device_instance_range_low_limit: Some(device_instance),
            device_instance_range_high_limit: Some(device_instance),
        }
    }

    /// Create a new Who-Is request for a range of devices
    pub fn for_range(low: u32, high: u32) -> Self {
        Self {
            device_instance_range_low_limit: Some(low),
            device_instance_range_high_limit: Some(high),
        }
    }

    /// Encode the Who-Is request
    pub fn encode(&self, buffer: &mut Vec<u8>) -> EncodingResult<()> {
        // Both low and high limits must be present together, or both absent
        // This matches bacnet-stack behavior
        if let (Some(low), Some(high)) = (
            self.device_instance_range_low_limit,
            self.device_instance_range_high_limit,
        ) {
            // Context tag 0 - low limit
            let low_bytes = encode_context_unsigned(low, 0)?;
            buffer.extend_from_slice(&low_bytes);

            // Context tag 1 - high limit
            let high_bytes = encode_context_unsigned(high, 1)?;
            buffer.extend_from_slice(&high_bytes);
        }
        // If only one limit is present, encode nothing (broadcast to all)

        Ok(())
    }

    /// Decode a Who-Is request
    pub fn decode(data: &[u8]) -> EncodingResult<Self> {
        let mut request = WhoIsRequest::new();
        let mut pos = 0;

        // Try to decode context tag 0 (low limit)
        if pos < data.len() {
            match decode_context_unsigned(&data[pos..], 0) {
                Ok((low, consumed)) => {
                    request.device_instance_range_low_limit = Some(low);
                    pos += consumed;

                    // If we have low limit, we must have high limit
                    if pos < data.len() {
                        match decode_context_unsigned(&data[pos..], 1) {
                            Ok((high, _consumed)) => {
                                request.device_instance_range_high_limit = Some(high);
                            }
                            Err(_) => {
                                // Invalid format - low without high
                                return Err(crate::encoding::EncodingError::InvalidFormat(
                                    "Who-Is request has low limit without high limit".to_string(),
                                ));
                            }
                        }
                    }
                }
                Err(_) => {
                    // No device range specified - broadcast to all
                }
            }
        }

        Ok(request)
    }

    /// Check if this request matches a device instance
    pub fn matches(&self, device_instance: u32) -> bool {
        match (
            self.device_instance_range_low_limit,
            self.device_instance_range_high_limit,
        ) {
            (None, None) => true, // Matches all devices
            (Some(low), Some(high)) => device_instance >= low && device_instance <= high,
            (Some(low), None) => device_instance >= low,
            (None, Some(high)) => device_instance <= high,
        }
    }
}

/// I-Am response (unconfirmed service)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IAmRequest {
    /// Device object identifier
    pub device_identifier: ObjectIdentifier,
    /// Maximum APDU length accepted
    pub max_apdu_length_accepted: u32,
    /// Segmentation supported
    pub segmentation_supported: u32,
    /// Vendor identifier
    pub vendor_identifier: u32,
}

impl IAmRequest {
    /// Create a new I-Am request
    pub fn new(
        device_identifier: ObjectIdentifier,
        max_apdu_length_accepted: u32,
        segmentation_supported: u32,
        vendor_identifier: u32,
    ) -> Self {
        Self {
            device_identifier,
            max_apdu_length_accepted,
            segmentation_supported,
            vendor_identifier,
        }
    }

    /// Encode the I-Am request
    pub fn encode(&self, buffer: &mut Vec<u8>) -> EncodingResult<()> {
        // Device identifier (object identifier) - application tag
        encode_object_identifier(
            buffer,
            self.device_identifier.object_type as u16,
            self.device_identifier.instance,
        )?;

        // Maximum APDU length accepted - application tag
        encode_unsigned(buffer, self.max_apdu_length_accepted)?;

        // Segmentation supported - application tag (enumerated)
        encode_enumerated(buffer, self.segmentation_supported)?;

        // Vendor identifier - application tag
        encode_unsigned(buffer, self.vendor_identifier)?;

        Ok(())
    }

    /// Decode an I-Am request
    pub fn decode(data: &[u8]) -> EncodingResult<Self> {
        let mut pos = 0;

        // Decode device identifier - application tag
        let ((object_type, instance), consumed) = decode_object_identifier(&data[pos..])?;
        let device_identifier = ObjectIdentifier {
            object_type: crate::object::ObjectType::try_from(object_type)
                .unwrap_or(crate::object::ObjectType::Device),
            instance,
        };
        pos += consumed;

        // Decode max APDU length accepted - application tag
        let (max_apdu_length_accepted, consumed) = decode_unsigned(&data[pos..])?;
        pos += consumed;

        // Decode segmentation supported - application tag (enumerated)
        let (segmentation_supported, consumed) = decode_enumerated(&data[pos..])?;
        pos += consumed;

        // Decode vendor identifier - application tag
        let (vendor_identifier, _consumed) = decode_unsigned(&data[pos..])?;

        Ok(IAmRequest::new(
            device_identifier,
            max_apdu_length_accepted,
            segmentation_supported,
            vendor_identifier,
        ))
    }
}

/// Read Property request (confirmed service)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPropertyRequest {
    /// Object identifier to read from
    pub object_identifier: ObjectIdentifier,
    /// Property identifier to read
    pub property_identifier: u32,
    /// Property array index (optional)
    pub property_array_index: Option<u32>,
}

impl ReadPropertyRequest {
    /// Create a new Read Property request
    pub fn new(object_identifier: ObjectIdentifier, property_identifier: u32) -> Self {
        Self {
            object_identifier,
            property_identifier,
            property_array_index: None,
        }
    }

    /// Create a new Read Property request with array index
    pub fn with_array_index(
        object_identifier: ObjectIdentifier,
        property_identifier: u32,
        array_index: u32,
    ) -> Self {
        Self {
            object_identifier,
            property_identifier,
            property_array_index: Some(array_index),
        }
    }

    /// Encode the Read Property request
    pub fn encode(&self, buffer: &mut Vec<u8>) -> EncodingResult<()> {
        // Object identifier - context tag 0
        let obj_id_bytes = encode_context_object_id(
            self.object_identifier.object_type as u16,
            self.object_identifier.instance,
            0,
        )?;
        buffer.extend_from_slice(&obj_id_bytes);

        // Property identifier - context tag 1 (as enumerated)
        let prop_id_bytes = encode_context_enumerated(self.property_identifier, 1)?;
        buffer.extend_from_slice(&prop_id_bytes);

        // Property array index - context tag 2 (optional)
        if let Some(array_index) = self.property_array_index {
            let array_bytes = encode_context_unsigned(array_index, 2)?;
            buffer.extend_from_slice(&array_bytes);
        }

        Ok(())
    }
}

/// Read Property response (confirmed service)
#[derive(Debug, Clone)]
pub struct ReadPropertyResponse {
    /// Object identifier that was read
    pub object_identifier: ObjectIdentifier,
    /// Property identifier that was read
    pub property_identifier: u32,
    /// Property array index (optional)
    pub property_array_index: Option<u32>,
    /// Property value
    pub property_value: Vec<u8>, // Raw encoded property value
}

impl ReadPropertyResponse {
    /// Create a new Read Property response
    pub fn new(
        object_identifier: ObjectIdentifier,
        property_identifier: u32,
        property_value: Vec<u8>,
    ) -> Self {
        Self {
            object_identifier,
            property_identifier,
            property_array_index: None,
            property_value,
        }
    }

    /// Encode the Read Property response
    pub fn encode(&self, buffer: &mut Vec<u8>) -> EncodingResult<()> {
        let obj_id_bytes = encode_context_object_id(
            self.object_identifier.object_type as u16,
            self.object_identifier.instance,
            0,
        )?;
        buffer.extend_from_slice(&obj_id_bytes);

        let prop_id_bytes = encode_context_enumerated(self.property_identifier, 1)?;
        buffer.extend_from_slice(&prop_id_bytes);

        if let Some(array_index) = self.property_array_index {
            let array_bytes = encode_context_unsigned(array_index, 2)?;
            buffer.extend_from_slice(&array_bytes);
        }

        crate::encoding::advanced::context::encode_opening_tag(buffer, 3)?;
        buffer.extend_from_slice(&self.property_value);
        crate::encoding::advanced::context::encode_closing_tag(buffer, 3)?;

        Ok(())
    }

    /// Decode a Read Property response
    pub fn decode(data: &[u8]) -> EncodingResult<Self> {
        let mut pos = 0;

        // Decode object identifier - context tag 0
        let ((object_type, instance), consumed) = decode_context_object_id(&data[pos..], 0)?;
        let object_identifier = ObjectIdentifier {
            object_type: crate::object::ObjectType::try_from(object_type)
                .unwrap_or(crate::object::ObjectType::Device),
            instance,
        };
        pos += consumed;

        // Decode property identifier - context tag 1
        let (property_identifier, consumed) = decode_context_enumerated(&data[pos..], 1)?;
        pos += consumed;

        // Property array index - context tag 2 (optional)
        let property_array_index = match decode_context_unsigned(&data[pos..], 2) {
            Ok((array_index, consumed)) => {
                pos += consumed;
                if array_index == BACNET_ARRAY_ALL {
                    None
                } else {
                    Some(array_index)
                }
            }
            Err(_) => None,
        };

        // Property value - context tag 3 (opening/closing braces)
        let (property_value, _consumed) = crate::encoding::decode_context_constructed(&data[pos..], 3)?;

        Ok(ReadPropertyResponse {
            object_identifier,
            property_identifier,
            property_array_index,
            property_value,
        })
    }
}

/// Write Property request (confirmed service)
#[derive(Debug, Clone)]
pub struct WritePropertyRequest {
    /// Object identifier to write to
    pub object_identifier: ObjectIdentifier,
    /// Property identifier to write
    pub property_identifier: u32,
    /// Property array index (optional)
    pub property_array_index: Option<u32>,
    /// Property value to write
    pub property_value: Vec<u8>, // Raw encoded property value
    /// Priority (optional, 1-16)
    pub priority: Option<u8>,
}

impl WritePropertyRequest {
    /// Create a new Write Property request
    pub fn new(
        object_identifier: ObjectIdentifier,
        property_identifier: u32,
        property_value: Vec<u8>,
    ) -> Self {
        Self {
            object_identifier,
            property_identifier,
            property_array_index: None,
            property_value,
            priority: None,
        }
    }

    /// Create a new Write Property request with priority
    pub fn with_priority(
        object_identifier: ObjectIdentifier,
        property_identifier: u32,
        property_value: Vec<u8>,
        priority: u8,
    ) -> Self {
        Self {
            object_identifier,
            property_identifier,
            property_array_index: None,
            property_value,
            priority: Some(priority),
        }
    }

    /// Create a new Write Property request with array index
    pub fn with_array_index(
        object_identifier: ObjectIdentifier,
        property_identifier: u32,
        array_index: u32,
        property_value: Vec<u8>,
    ) -> Self {
        Self {
            object_identifier,
            property_identifier,
            property_array_index: Some(array_index),
            property_value,
            priority: None,
        }
    }

    /// Encode the Write Property request
    pub fn encode(&self, buffer: &mut Vec<u8>) -> EncodingResult<()> {
        // Object identifier - context tag 0
        let obj_id_bytes = encode_context_object_id(
            self.object_identifier.object_type as u16,
            self.object_identifier.instance,
            0,
        )?;
        buffer.extend_from_slice(&obj_id_bytes);

        // Property identifier - context tag 1 (as enumerated)
        let prop_id_bytes = encode_context_enumerated(self.property_identifier, 1)?;
        buffer.extend_from_slice(&prop_id_bytes);

        // Property array index - context tag 2 (optional)
        if let Some(array_index) = self.property_array_index {
            let array_bytes = encode_context_unsigned(array_index, 2)?;
            buffer.extend_from_slice(&array_bytes);
        }

        // Property value - context tag 3 (opening/closing braces)
        crate::encoding::advanced::context::encode_opening_tag(buffer, 3)?;
        buffer.extend_from_slice(&self.property_value);
        crate::encoding::advanced::context::encode_closing_tag(buffer, 3)?;

        // Priority - context tag 4 (optional)
        if let Some(priority) = self.priority {
            let priority_bytes = encode_context_unsigned(priority as u32, 4)?;
            buffer.extend_from_slice(&priority_bytes);
        }

        Ok(())
    }

    /// Decode a Write Property request
    pub fn decode(data: &[u8]) -> EncodingResult<Self> {
        let mut pos = 0;

        // Decode object identifier - context tag 0
        let ((object_type, instance), consumed) = decode_context_object_id(&data[pos..], 0)?;
        let object_identifier = ObjectIdentifier {
            object_type: crate::object::ObjectType::try_from(object_type)
                .unwrap_or(crate::object::ObjectType::Device),
            instance,
        };
        pos += consumed;

        // Decode property identifier - context tag 1
        let (property_identifier, consumed) = decode_context_enumerated(&data[pos..], 1)?;
        pos += consumed;

        // Property array index - context tag 2 (optional)
        let property_array_index = match decode_context_unsigned(&data[pos..], 2) {
            Ok((array_index, consumed)) => {
                pos += consumed;
                Some(array_index)
            }
            Err(_) => None,
        };

        // Property value - context tag 3 (opening/closing braces)
        let (property_value, consumed) = crate::encoding::decode_context_constructed(&data[pos..], 3)?;
        pos += consumed;

        // Priority - context tag 4 (optional)
        let priority = match decode_context_unsigned(&data[pos..], 4) {
            Ok((priority, consumed)) => {
                pos += consumed;
                Some(priority as u8)
            }
            Err(_) => None,
        };
        let _ = pos;

        Ok(WritePropertyRequest {
            object_identifier,
            property_identifier,
            property_array_index,
            property_value,
            priority,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{ObjectIdentifier, ObjectType};

    #[test]
    fn test_whois_request() {
        // Test Who-Is for all devices
        let whois_all = WhoIsRequest::new();
        assert!(whois_all.matches(123));
        assert!(whois_all.matches(456));

        // Test Who-Is for specific device
        let whois_specific = WhoIsRequest::for_device(123);
        assert!(whois_specific.matches(123));
        assert!(!whois_specific.matches(124));

        // Test Who-Is for range
        let whois_range = WhoIsRequest::for_range(100, 200);
        assert!(whois_range.matches(150));
        assert!(!whois_range.matches(50));
        assert!(!whois_range.matches(250));
    }

    #[test]
    fn test_whois_encoding() {
        let mut buffer = Vec::new();

        // Test encoding Who-Is for all devices
        let whois_all = WhoIsRequest::new();
        whois_all.encode(&mut buffer).unwrap();
        assert_eq!(buffer.len(), 0); // No parameters for all devices

        // Test encoding Who-Is for specific device
        buffer.clear();
        let whois_specific = WhoIsRequest::for_device(123);
        whois_specific.encode(&mut buffer).unwrap();
        assert!(!buffer.is_empty());

        // Test decoding
        let decoded = WhoIsRequest::decode(&buffer).unwrap();
        assert_eq!(decoded, whois_specific);
    }

    #[test]
    fn test_iam_request() {
        let device_id = ObjectIdentifier::new(ObjectType::Device, 123);
        let iam = IAmRequest::new(device_id, 1476, 0, 999);

        assert_eq!(iam.device_identifier.instance, 123);
        assert_eq!(iam.max_apdu_length_accepted, 1476);
        assert_eq!(iam.vendor_identifier, 999);
    }

    #[test]
    fn test_read_property_request() {
        let object_id = ObjectIdentifier::new(ObjectType::AnalogInput, 1);
        let read_prop = ReadPropertyRequest::new(object_id, 85); // Present Value

        assert_eq!(read_prop.object_identifier.instance, 1);
        assert_eq!(read_prop.property_identifier, 85);
        assert_eq!(read_prop.property_array_index, None);

        let read_prop_array = ReadPropertyRequest::with_array_index(object_id, 85, 0);
        assert_eq!(read_prop_array.property_array_index, Some(0));
    }

    #[test]
    fn test_write_property_request() {
        let object_id = ObjectIdentifier::new(ObjectType::AnalogOutput, 1);
        let property_value = vec![0x44, 0x42, 0x20, 0x00, 0x00]; // Real 40.0
        let write_prop = WritePropertyRequest::new(object_id, 85, property_value.clone());

        assert_eq!(write_prop.object_identifier.instance, 1);
        assert_eq!(write_prop.property_identifier, 85);
        assert_eq!(write_prop.property_value, property_value);
        assert_eq!(write_prop.priority, None);

        // Test with priority
        let write_prop_priority =
            WritePropertyRequest::with_priority(object_id, 85, property_value.clone(), 8);
        assert_eq!(write_prop_priority.priority, Some(8));

        // Test encoding/decoding
        let mut buffer = Vec::new();
        write_prop.encode(&mut buffer).unwrap();
        assert!(!buffer.is_empty());

        let decoded = WritePropertyRequest::decode(&buffer).unwrap();
        assert_eq!(decoded.object_identifier.instance, 1);
        assert_eq!(decoded.property_identifier, 85);
        assert_eq!(decoded.property_value, property_value);
    }
}
