//! BACnet Application Layer Module
//!
//! This module implements the application layer functionality for BACnet communication.
//! The application layer is responsible for forming and processing Application Protocol
//! Data Units (APDUs) that carry BACnet services.
//!
//! # Overview
//!
//! The application layer handles:
//! - APDU formation and parsing
//! - Service request/response handling
//! - Error, reject, and abort PDU processing
//!
//! Segmentation flags are decoded and preserved on the wire type, but this
//! crate does not reassemble segmented APDUs: a segmented confirmed request
//! is answered with an Error PDU (`OptionalFunctionalityNotSupported`) at the
//! service dispatch boundary rather than here.
//!
//! # APDU Types
//!
//! - Confirmed Request PDU
//! - Unconfirmed Request PDU
//! - SimpleACK PDU
//! - ComplexACK PDU
//! - SegmentACK PDU
//! - Error PDU
//! - Reject PDU
//! - Abort PDU
//!
//! # Example
//!
//! ```no_run
//! use bacnet_rs::app::*;
//! use bacnet_rs::service::UnconfirmedServiceChoice;
//!
//! // Example of creating an APDU
//! let apdu = Apdu::UnconfirmedRequest {
//!     service_choice: UnconfirmedServiceChoice::WhoIs as u8,
//!     service_data: vec![],
//! };
//! ```

#[cfg(feature = "std")]
use std::error::Error;

#[cfg(feature = "std")]
use std::fmt;

#[cfg(not(feature = "std"))]
use core::fmt;

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use crate::encoding::{decode_enumerated, encode_enumerated};

/// Result type for application layer operations
#[cfg(feature = "std")]
pub type Result<T> = std::result::Result<T, ApplicationError>;

#[cfg(not(feature = "std"))]
pub type Result<T> = core::result::Result<T, ApplicationError>;

/// Errors that can occur in application layer operations
#[derive(Debug)]
pub enum ApplicationError {
    /// Invalid APDU format
    InvalidApdu(String),
    /// Unsupported APDU type
    UnsupportedApduType,
    /// Segmentation error
    SegmentationError(String),
    /// Transaction error
    TransactionError(String),
    /// Service error
    ServiceError(String),
    /// Timeout waiting for response
    Timeout,
    /// Maximum APDU length exceeded
    MaxApduLengthExceeded,
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationError::InvalidApdu(msg) => write!(f, "Invalid APDU: {}", msg),
            ApplicationError::UnsupportedApduType => write!(f, "Unsupported APDU type"),
            ApplicationError::SegmentationError(msg) => write!(f, "Segmentation error: {}", msg),
            ApplicationError::TransactionError(msg) => write!(f, "Transaction error: {}", msg),
            ApplicationError::ServiceError(msg) => write!(f, "Service error: {}", msg),
            ApplicationError::Timeout => write!(f, "Application timeout"),
            ApplicationError::MaxApduLengthExceeded => write!(f, "Maximum APDU length exceeded"),
        }
    }
}

#[cfg(feature = "std")]
impl Error for ApplicationError {}

/// APDU types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ApduType {
    ConfirmedRequest = 0,
    UnconfirmedRequest = 1,
    SimpleAck = 2,
    ComplexAck = 3,
    SegmentAck = 4,
    Error = 5,
    Reject = 6,
    Abort = 7,
}

/// Application Protocol Data Unit
#[derive(Debug, Clone)]
pub enum Apdu {
    /// Confirmed service request
    ConfirmedRequest {
        segmented: bool,
        more_follows: bool,
        segmented_response_accepted: bool,
        max_segments: MaxSegments,
        max_response_size: MaxApduSize,
        invoke_id: u8,
        sequence_number: Option<u8>,
        proposed_window_size: Option<u8>,
        service_choice: u8,
        service_data: Vec<u8>,
    },

    /// Unconfirmed service request
    UnconfirmedRequest {
        service_choice: u8,
        service_data: Vec<u8>,
    },

    /// Simple acknowledgment
    SimpleAck { invoke_id: u8, service_choice: u8 },

    /// Complex acknowledgment
    ComplexAck {
        segmented: bool,
        more_follows: bool,
        invoke_id: u8,
        sequence_number: Option<u8>,
        proposed_window_size: Option<u8>,
        service_choice: u8,
        service_data: Vec<u8>,
    },

    /// Segment acknowledgment
    SegmentAck {
        negative: bool,
        server: bool,
        invoke_id: u8,
        sequence_number: u8,
        window_size: u8,
    },

    /// Error PDU
    Error {
        invoke_id: u8,
        service_choice: u8,
        error_class: u8,
        error_code: u8,
    },

    /// Reject PDU
    Reject { invoke_id: u8, reject_reason: u8 },

    /// Abort PDU
    Abort {
        server: bool,
        invoke_id: u8,
        abort_reason: u8,
    },
}

/// Maximum segments that can be accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxSegments {
    Unspecified = 0,
    Two = 1,
    Four = 2,
    Eight = 3,
    Sixteen = 4,
    ThirtyTwo = 5,
    SixtyFour = 6,
    GreaterThan64 = 7,
}

/// Maximum APDU size that can be accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxApduSize {
    Up50 = 0,
    Up128 = 1,
    Up206 = 2,
    Up480 = 3,
    Up1024 = 4,
    Up1476 = 5,
}

impl MaxApduSize {
    /// Get the actual size in bytes
    pub fn size(&self) -> usize {
        match self {
            MaxApduSize::Up50 => 50,
            MaxApduSize::Up128 => 128,
            MaxApduSize::Up206 => 206,
            MaxApduSize::Up480 => 480,
            MaxApduSize::Up1024 => 1024,
            MaxApduSize::Up1476 => 1476,
        }
    }
}


impl Apdu {
    /// Encode APDU to bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut buffer = Vec::new();

        match self {
            Apdu::ConfirmedRequest {
                segmented,
                more_follows,
                segmented_response_accepted,
                max_segments,
                max_response_size,
                invoke_id,
                sequence_number,
                proposed_window_size,
                service_choice,
                service_data,
            } => {
                // PDU Type and flags
                let mut pdu_type = (ApduType::ConfirmedRequest as u8) << 4;
                if *segmented {
                    pdu_type |= 0x08;
                }
                if *more_follows {
                    pdu_type |= 0x04;
                }
                if *segmented_response_accepted {
                    pdu_type |= 0x02;
                }
                buffer.push(pdu_type);

                // Max segments and APDU size
                let max_info = ((*max_segments as u8) << 4) | (*max_response_size as u8);
                buffer.push(max_info);

                // Invoke ID
                buffer.push(*invoke_id);

                // Sequence number and window size (if segmented)
                if *segmented {
                    if let Some(seq_num) = sequence_number {
                        buffer.push(*seq_num);
                    }
                    if let Some(window_size) = proposed_window_size {
                        buffer.push(*window_size);
                    }
                }

                // Service choice
                buffer.push(*service_choice);

                // Service data
                buffer.extend_from_slice(service_data);
            }

            Apdu::UnconfirmedRequest {
                service_choice,
                service_data,
            } => {
                // PDU Type
                buffer.push((ApduType::UnconfirmedRequest as u8) << 4);
                // Service choice
                buffer.push(*service_choice);
                // Service data
                buffer.extend_from_slice(service_data);
            }

            Apdu::SimpleAck {
                invoke_id,
                service_choice,
            } => {
                // PDU Type
                buffer.push((ApduType::SimpleAck as u8) << 4);
                // Invoke ID
                buffer.push(*invoke_id);
                // Service choice
                buffer.push(*service_choice);
            }

            Apdu::ComplexAck {
                segmented,
                more_follows,
                invoke_id,
                sequence_number,
                proposed_window_size,
                service_choice,
                service_data,
            } => {
                // PDU Type and flags
                let mut pdu_type = (ApduType::ComplexAck as u8) << 4;
                if *segmented {
                    pdu_type |= 0x08;
                }
                if *more_follows {
                    pdu_type |= 0x04;
                }
                buffer.push(pdu_type);

                // Invoke ID
                buffer.push(*invoke_id);

                // Sequence number and window size (if segmented)
                if *segmented {
                    if let Some(seq_num) = sequence_number {
                        buffer.push(*seq_num);
                    }
                    if let Some(window_size) = proposed_window_size {
                        buffer.push(*window_size);
                    }
                }

                // Service choice
                buffer.push(*service_choice);

                // Service data
                buffer.extend_from_slice(service_data);
            }

            Apdu::SegmentAck {
                negative,
                server,
                invoke_id,
                sequence_number,
                window_size,
            } => {
                // PDU Type and flags
                let mut pdu_type = (ApduType::SegmentAck as u8) << 4;
                if *negative {
                    pdu_type |= 0x02;
                }
                if *server {
                    pdu_type |= 0x01;
                }
                buffer.push(pdu_type);

                // Invoke ID
                buffer.push(*invoke_id);
                // Sequence number
                buffer.push(*sequence_number);
                // Window size
                buffer.push(*window_size);
            }

            Apdu::Error {
                invoke_id,
                service_choice,
                error_class,
                error_code,
            } => {
                // PDU Type
                buffer.push((ApduType::Error as u8) << 4);
                // Invoke ID
                buffer.push(*invoke_id);
                // Service choice
                buffer.push(*service_choice);
                // Error class and code are application-tagged Enumerated
                // values, not raw bytes (e.g. `91 02 91 25` for
                // class=Property, code=ValueOutOfRange).
                let _ = encode_enumerated(&mut buffer, *error_class as u32);
                let _ = encode_enumerated(&mut buffer, *error_code as u32);
            }

            Apdu::Reject {
                invoke_id,
                reject_reason,
            } => {
                // PDU Type
                buffer.push((ApduType::Reject as u8) << 4);
                // Invoke ID
                buffer.push(*invoke_id);
                // Reject reason
                buffer.push(*reject_reason);
            }

            Apdu::Abort {
                server,
                invoke_id,
                abort_reason,
            } => {
                // PDU Type and flags
                let mut pdu_type = (ApduType::Abort as u8) << 4;
                if *server {
                    pdu_type |= 0x01;
                }
                buffer.push(pdu_type);

                // Invoke ID
                buffer.push(*invoke_id);
                // Abort reason
                buffer.push(*abort_reason);
            }
        }

        buffer
    }

    /// Decode APDU from bytes
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(ApplicationError::InvalidApdu("Empty APDU".to_string()));
        }

        let pdu_type_byte = data[0];
        let pdu_type_raw = (pdu_type_byte >> 4) & 0x0F;
        let pdu_type = match pdu_type_raw {
            0 => ApduType::ConfirmedRequest,
            1 => ApduType::UnconfirmedRequest,
            2 => ApduType::SimpleAck,
            3 => ApduType::ComplexAck,
            4 => ApduType::SegmentAck,
            5 => ApduType::Error,
            6 => ApduType::Reject,
            7 => ApduType::Abort,
            _ => return Err(ApplicationError::UnsupportedApduType),
        };

        match pdu_type {
            ApduType::ConfirmedRequest => {
                if data.len() < 4 {
                    return Err(ApplicationError::InvalidApdu(
                        "Confirmed request too short".to_string(),
                    ));
                }

                let segmented = (pdu_type_byte & 0x08) != 0;
                let more_follows = (pdu_type_byte & 0x04) != 0;
                let segmented_response_accepted = (pdu_type_byte & 0x02) != 0;

                let max_info = data[1];
                let max_segments = match (max_info >> 4) & 0x07 {
                    0 => MaxSegments::Unspecified,
                    1 => MaxSegments::Two,
                    2 => MaxSegments::Four,
                    3 => MaxSegments::Eight,
                    4 => MaxSegments::Sixteen,
                    5 => MaxSegments::ThirtyTwo,
                    6 => MaxSegments::SixtyFour,
                    7 => MaxSegments::GreaterThan64,
                    _ => MaxSegments::Unspecified,
                };

                let max_response_size = match max_info & 0x0F {
                    0 => MaxApduSize::Up50,
                    1 => MaxApduSize::Up128,
                    2 => MaxApduSize::Up206,
                    3 => MaxApduSize::Up480,
                    4 => MaxApduSize::Up1024,
                    5 => MaxApduSize::Up1476,
                    _ => MaxApduSize::Up50,
                };

                let invoke_id = data[2];
                let mut pos = 3;

                let (sequence_number, proposed_window_size) = if segmented {
                    let seq_num = if pos < data.len() { Some(data[pos]) } else { None };
                    pos += 1;
                    let win_size = if pos < data.len() { Some(data[pos]) } else { None };
                    pos += 1;
                    (seq_num, win_size)
                } else {
                    (None, None)
                };

                if pos >= data.len() {
                    return Err(ApplicationError::InvalidApdu(
                        "Missing service choice".to_string(),
                    ));
                }

                let service_choice = data[pos];
                pos += 1;

                let service_data = if pos < data.len() {
                    data[pos..].to_vec()
                } else {
                    Vec::new()
                };

                Ok(Apdu::ConfirmedRequest {
                    segmented,
                    more_follows,
                    segmented_response_accepted,
                    max_segments,
                    max_response_size,
                    invoke_id,
                    sequence_number,
                    proposed_window_size,
                    service_choice,
                    service_data,
                })
            }

            ApduType::UnconfirmedRequest => {
                if data.len() < 2 {
                    return Err(ApplicationError::InvalidApdu(
                        "Unconfirmed request too short".to_string(),
                    ));
                }

                let service_choice = data[1];
                let service_data = if data.len() > 2 {
                    data[2..].to_vec()
                } else {
                    Vec::new()
                };

                Ok(Apdu::UnconfirmedRequest {
                    service_choice,
                    service_data,
                })
            }

            ApduType::SimpleAck => {
                if data.len() < 3 {
                    return Err(ApplicationError::InvalidApdu("SimpleAck too short".to_string()));
                }

                let invoke_id = data[1];
                let service_choice = data[2];

                Ok(Apdu::SimpleAck {
                    invoke_id,
                    service_choice,
                })
            }

            ApduType::ComplexAck => {
                if data.len() < 3 {
                    return Err(ApplicationError::InvalidApdu("ComplexAck too short".to_string()));
                }

                let segmented = (pdu_type_byte & 0x08) != 0;
                let more_follows = (pdu_type_byte & 0x04) != 0;

                let invoke_id = data[1];
                let mut pos = 2;

                let (sequence_number, proposed_window_size) = if segmented {
                    let seq_num = if pos < data.len() { Some(data[pos]) } else { None };
                    pos += 1;
                    let win_size = if pos < data.len() { Some(data[pos]) } else { None };
                    pos += 1;
                    (seq_num, win_size)
                } else {
                    (None, None)
                };

                if pos >= data.len() {
                    return Err(ApplicationError::InvalidApdu(
                        "Missing service choice".to_string(),
                    ));
                }

                let service_choice = data[pos];
                pos += 1;

                let service_data = if pos < data.len() {
                    data[pos..].to_vec()
                } else {
                    Vec::new()
                };

                Ok(Apdu::ComplexAck {
                    segmented,
                    more_follows,
                    invoke_id,
                    sequence_number,
                    proposed_window_size,
                    service_choice,
                    service_data,
                })
            }

            ApduType::SegmentAck => {
                if data.len() < 4 {
                    return Err(ApplicationError::InvalidApdu("SegmentAck too short".to_string()));
                }

                let negative = (pdu_type_byte & 0x02) != 0;
                let server = (pdu_type_byte & 0x01) != 0;
                let invoke_id = data[1];
                let sequence_number = data[2];
                let window_size = data[3];

                Ok(Apdu::SegmentAck {
                    negative,
                    server,
                    invoke_id,
                    sequence_number,
                    window_size,
                })
            }

            ApduType::Error => {
                if data.len() < 5 {
                    return Err(ApplicationError::InvalidApdu("Error PDU too short".to_string()));
                }

                let invoke_id = data[1];
                let service_choice = data[2];

                let (class_value, consumed) = decode_enumerated(&data[3..]).map_err(|_| {
                    ApplicationError::InvalidApdu("Malformed error class".to_string())
                })?;
                let (code_value, _) = decode_enumerated(&data[3 + consumed..]).map_err(|_| {
                    ApplicationError::InvalidApdu("Malformed error code".to_string())
                })?;

                Ok(Apdu::Error {
                    invoke_id,
                    service_choice,
                    error_class: class_value as u8,
                    error_code: code_value as u8,
                })
            }

            ApduType::Reject => {
                if data.len() < 3 {
                    return Err(ApplicationError::InvalidApdu("Reject PDU too short".to_string()));
                }

                let invoke_id = data[1];
                let reject_reason = data[2];

                Ok(Apdu::Reject {
                    invoke_id,
                    reject_reason,
                })
            }

            ApduType::Abort => {
                if data.len() < 3 {
                    return Err(ApplicationError::InvalidApdu("Abort PDU too short".to_string()));
                }

                let server = (pdu_type_byte & 0x01) != 0;
                let invoke_id = data[1];
                let abort_reason = data[2];

                Ok(Apdu::Abort {
                    server,
                    invoke_id,
                    abort_reason,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfirmed_request_encode_decode() {
        let apdu = Apdu::UnconfirmedRequest {
            service_choice: 8, // WhoIs
            service_data: vec![0x08, 0x7B, 0x18, 0x7B], // Range 123-123
        };

        let encoded = apdu.encode();
        let decoded = Apdu::decode(&encoded).unwrap();

        match decoded {
            Apdu::UnconfirmedRequest {
                service_choice,
                service_data,
            } => {
                assert_eq!(service_choice, 8);
                assert_eq!(service_data, vec![0x08, 0x7B, 0x18, 0x7B]);
            }
            _ => panic!("Expected UnconfirmedRequest"),
        }
    }

    #[test]
    fn test_pdu_type_is_encoded_in_upper_nibble() {
        // Pins the PDU type to bits 7..4 of the first octet, per the
        // published standard, so a future edit can't silently move it
        // back into the lower nibble.
        let cases: &[(Apdu, u8)] = &[
            (
                Apdu::UnconfirmedRequest {
                    service_choice: 8,
                    service_data: vec![],
                },
                ApduType::UnconfirmedRequest as u8,
            ),
            (
                Apdu::SimpleAck {
                    invoke_id: 1,
                    service_choice: 12,
                },
                ApduType::SimpleAck as u8,
            ),
            (
                Apdu::Reject {
                    invoke_id: 1,
                    reject_reason: 9,
                },
                ApduType::Reject as u8,
            ),
        ];

        for (apdu, expected_type) in cases {
            let encoded = apdu.encode();
            assert_eq!(encoded[0] >> 4, *expected_type);
            assert_eq!(encoded[0] & 0x0F, 0); // no flag bits set for these variants
        }
    }

    #[test]
    fn test_simple_ack_encode_decode() {
        let apdu = Apdu::SimpleAck {
            invoke_id: 42,
            service_choice: 12, // ReadProperty
        };

        let encoded = apdu.encode();
        let decoded = Apdu::decode(&encoded).unwrap();

        match decoded {
            Apdu::SimpleAck {
                invoke_id,
                service_choice,
            } => {
                assert_eq!(invoke_id, 42);
                assert_eq!(service_choice, 12);
            }
            _ => panic!("Expected SimpleAck"),
        }
    }

    #[test]
    fn test_confirmed_request_encode_decode() {
        let apdu = Apdu::ConfirmedRequest {
            segmented: false,
            more_follows: false,
            segmented_response_accepted: true,
            max_segments: MaxSegments::Unspecified,
            max_response_size: MaxApduSize::Up1476,
            invoke_id: 123,
            sequence_number: None,
            proposed_window_size: None,
            service_choice: 12, // ReadProperty
            service_data: vec![0x0C, 0x02, 0x00, 0x00, 0x08, 0x19, 0x55],
        };

        let encoded = apdu.encode();
        let decoded = Apdu::decode(&encoded).unwrap();

        match decoded {
            Apdu::ConfirmedRequest {
                invoke_id,
                service_choice,
                segmented_response_accepted,
                ..
            } => {
                assert_eq!(invoke_id, 123);
                assert_eq!(service_choice, 12);
                assert_eq!(segmented_response_accepted, true);
            }
            _ => panic!("Expected ConfirmedRequest"),
        }
    }
}
