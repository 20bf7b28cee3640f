//! Server-side dispatch: binds incoming confirmed/unconfirmed request APDUs
//! to an [`ObjectDatabase`], producing the Ack/Error/Reject APDU to send
//! back.

use crate::app::Apdu;
use crate::object::{ObjectDatabase, ObjectError, ObjectIdentifier, ObjectType, PropertyIdentifier};
use crate::service::{
    build_error, ConfirmedServiceChoice, ErrorClass, ErrorCode, IAmRequest, ReadPropertyRequest,
    ReadPropertyResponse, RejectReason, UnconfirmedServiceChoice, WhoIsRequest,
    WritePropertyRequest, BACNET_ARRAY_ALL,
};

/// Map an object-registry error onto the (class, code) pair a BACnet peer
/// expects in an Error PDU.
fn classify(err: &ObjectError) -> (ErrorClass, ErrorCode) {
    match err {
        ObjectError::NotFound => (ErrorClass::Object, ErrorCode::UnknownObject),
        ObjectError::PropertyNotFound | ObjectError::UnknownProperty => {
            (ErrorClass::Property, ErrorCode::UnknownProperty)
        }
        ObjectError::PropertyNotWritable | ObjectError::WriteAccessDenied => {
            (ErrorClass::Property, ErrorCode::WriteAccessDenied)
        }
        ObjectError::InvalidPropertyType | ObjectError::InvalidValue(_) => {
            (ErrorClass::Property, ErrorCode::InvalidDataType)
        }
        ObjectError::ValueOutOfRange => (ErrorClass::Property, ErrorCode::ValueOutOfRange),
        ObjectError::Duplicate | ObjectError::InvalidConfiguration(_) => {
            (ErrorClass::Device, ErrorCode::Other)
        }
    }
}

/// Dispatch a single confirmed-service request against `database`, returning
/// the APDU to send back (SimpleAck, ComplexAck, Error, Reject, or Abort).
///
/// Segmented requests are rejected before any service-specific decoding is
/// attempted, since segmentation isn't supported.
pub fn dispatch_confirmed(
    database: &ObjectDatabase,
    invoke_id: u8,
    service_choice: u8,
    segmented: bool,
    service_data: &[u8],
) -> Apdu {
    if segmented {
        return build_error(
            invoke_id,
            service_choice,
            ErrorClass::Services,
            ErrorCode::OptionalFunctionalityNotSupported,
        );
    }

    let choice = match ConfirmedServiceChoice::try_from(service_choice) {
        Ok(choice) => choice,
        Err(_) => {
            return Apdu::Reject {
                invoke_id,
                reject_reason: RejectReason::UnrecognizedService as u8,
            }
        }
    };

    match choice {
        ConfirmedServiceChoice::ReadProperty => {
            dispatch_read_property(database, invoke_id, service_choice, service_data)
        }
        ConfirmedServiceChoice::WriteProperty => {
            dispatch_write_property(database, invoke_id, service_choice, service_data)
        }
        _ => Apdu::Reject {
            invoke_id,
            reject_reason: RejectReason::UnrecognizedService as u8,
        },
    }
}

fn dispatch_read_property(
    database: &ObjectDatabase,
    invoke_id: u8,
    service_choice: u8,
    service_data: &[u8],
) -> Apdu {
    let request = match ReadPropertyRequest::decode(service_data) {
        Ok(req) => req,
        Err(_) => {
            return Apdu::Reject {
                invoke_id,
                reject_reason: RejectReason::InvalidParameterDataType as u8,
            }
        }
    };

    let property = match PropertyIdentifier::try_from(request.property_identifier) {
        Ok(property) => property,
        Err(_) => {
            return build_error(
                invoke_id,
                service_choice,
                ErrorClass::Property,
                ErrorCode::UnknownProperty,
            )
        }
    };

    let array_index = match request.property_array_index {
        Some(BACNET_ARRAY_ALL) | None => None,
        Some(idx) => Some(idx),
    };

    match database.read_property(request.object_identifier, property, array_index) {
        Ok(value) => {
            let mut encoded = Vec::new();
            if value.encode_application(&mut encoded).is_err() {
                return build_error(
                    invoke_id,
                    service_choice,
                    ErrorClass::Property,
                    ErrorCode::Other,
                );
            }
            let response = ReadPropertyResponse {
                object_identifier: request.object_identifier,
                property_identifier: request.property_identifier,
                property_array_index: request.property_array_index,
                property_value: encoded,
            };
            let mut service_data = Vec::new();
            if response.encode(&mut service_data).is_err() {
                return build_error(
                    invoke_id,
                    service_choice,
                    ErrorClass::Property,
                    ErrorCode::Other,
                );
            }
            Apdu::ComplexAck {
                segmented: false,
                more_follows: false,
                invoke_id,
                sequence_number: None,
                proposed_window_size: None,
                service_choice,
                service_data,
            }
        }
        Err(err) => {
            let (class, code) = classify(&err);
            build_error(invoke_id, service_choice, class, code)
        }
    }
}

fn dispatch_write_property(
    database: &ObjectDatabase,
    invoke_id: u8,
    service_choice: u8,
    service_data: &[u8],
) -> Apdu {
    let request = match WritePropertyRequest::decode(service_data) {
        Ok(req) => req,
        Err(_) => {
            return Apdu::Reject {
                invoke_id,
                reject_reason: RejectReason::InvalidParameterDataType as u8,
            }
        }
    };

    let property = match PropertyIdentifier::try_from(request.property_identifier) {
        Ok(property) => property,
        Err(_) => {
            return build_error(
                invoke_id,
                service_choice,
                ErrorClass::Property,
                ErrorCode::UnknownProperty,
            )
        }
    };

    let (value, _consumed) = match crate::object::PropertyValue::decode_application(
        &request.property_value,
    ) {
        Ok(decoded) => decoded,
        Err(_) => {
            return build_error(
                invoke_id,
                service_choice,
                ErrorClass::Property,
                ErrorCode::InvalidDataType,
            )
        }
    };

    let array_index = match request.property_array_index {
        Some(BACNET_ARRAY_ALL) | None => None,
        Some(idx) => Some(idx),
    };

    match database.write_property(
        request.object_identifier,
        property,
        value,
        array_index,
        request.priority,
    ) {
        Ok(()) => Apdu::SimpleAck {
            invoke_id,
            service_choice,
        },
        Err(err) => {
            let (class, code) = classify(&err);
            build_error(invoke_id, service_choice, class, code)
        }
    }
}

/// Reply to an incoming Who-Is with an I-Am, if this device is in range (or
/// the request carries no range at all).
pub fn dispatch_who_is(
    database: &ObjectDatabase,
    service_data: &[u8],
    max_apdu_length_accepted: u32,
    segmentation_supported: u32,
    vendor_identifier: u32,
) -> Option<Apdu> {
    let request = WhoIsRequest::decode(service_data).ok()?;
    let device_instance = database.get_device_id().instance;
    if !request.matches(device_instance) {
        return None;
    }

    let iam = IAmRequest::new(
        ObjectIdentifier::new(ObjectType::Device, device_instance),
        max_apdu_length_accepted,
        segmentation_supported,
        vendor_identifier,
    );
    let mut service_data = Vec::new();
    iam.encode(&mut service_data).ok()?;

    Some(Apdu::UnconfirmedRequest {
        service_choice: UnconfirmedServiceChoice::IAm as u8,
        service_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{AnalogInput, Device};

    fn test_database() -> ObjectDatabase {
        let device = Device::new(1, "Test Device".to_string());
        let db = ObjectDatabase::new(device);
        db.add_object(Box::new(AnalogInput::new(1, "Temp".to_string())))
            .unwrap();
        db
    }

    #[test]
    fn read_property_returns_complex_ack() {
        let db = test_database();
        let request = ReadPropertyRequest::new(
            ObjectIdentifier::new(ObjectType::AnalogInput, 1),
            PropertyIdentifier::PresentValue as u32,
        );
        let mut data = Vec::new();
        request.encode(&mut data).unwrap();

        let reply = dispatch_confirmed(
            &db,
            1,
            ConfirmedServiceChoice::ReadProperty as u8,
            false,
            &data,
        );
        assert!(matches!(reply, Apdu::ComplexAck { .. }));
    }

    #[test]
    fn read_property_unknown_object_is_error() {
        let db = test_database();
        let request = ReadPropertyRequest::new(
            ObjectIdentifier::new(ObjectType::AnalogInput, 99),
            PropertyIdentifier::PresentValue as u32,
        );
        let mut data = Vec::new();
        request.encode(&mut data).unwrap();

        let reply = dispatch_confirmed(
            &db,
            1,
            ConfirmedServiceChoice::ReadProperty as u8,
            false,
            &data,
        );
        match reply {
            Apdu::Error {
                error_class,
                error_code,
                ..
            } => {
                assert_eq!(error_class, ErrorClass::Object as u8);
                assert_eq!(error_code, ErrorCode::UnknownObject as u8);
            }
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn segmented_request_is_rejected_before_decode() {
        let db = test_database();
        let reply = dispatch_confirmed(
            &db,
            1,
            ConfirmedServiceChoice::ReadProperty as u8,
            true,
            &[],
        );
        match reply {
            Apdu::Error {
                error_class,
                error_code,
                ..
            } => {
                assert_eq!(error_class, ErrorClass::Services as u8);
                assert_eq!(
                    error_code,
                    ErrorCode::OptionalFunctionalityNotSupported as u8
                );
            }
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn unsupported_service_is_rejected() {
        let db = test_database();
        let reply = dispatch_confirmed(
            &db,
            1,
            ConfirmedServiceChoice::ReadPropertyMultiple as u8,
            false,
            &[],
        );
        assert!(matches!(reply, Apdu::Reject { .. }));
    }

    #[test]
    fn who_is_in_range_produces_iam() {
        let db = test_database();
        let who_is = WhoIsRequest::for_device(1);
        let mut data = Vec::new();
        who_is.encode(&mut data).unwrap();

        let reply = dispatch_who_is(&db, &data, 1476, 0, 260);
        assert!(reply.is_some());
    }

    #[test]
    fn who_is_out_of_range_is_silent() {
        let db = test_database();
        let who_is = WhoIsRequest::for_device(42);
        let mut data = Vec::new();
        who_is.encode(&mut data).unwrap();

        let reply = dispatch_who_is(&db, &data, 1476, 0, 260);
        assert!(reply.is_none());
    }
}
