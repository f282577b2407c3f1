//! SOAP request envelope and response parsing for the VIES `checkVat` call.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use crate::core::xml::{XmlVisitor, malformed, walk};
use crate::core::{FinanceError, Result};

const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const VIES_TYPES_NS: &str = "urn:ec.europa.eu:taxud:vies:services:checkVat:types";

fn xml_io(e: std::io::Error) -> FinanceError {
    FinanceError::InvalidInput(format!("XML write error: {e}"))
}

/// Build the SOAP 1.1 `checkVat` request for one VAT number.
pub fn build_check_vat_envelope(country_code: &str, vat_number: &str) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut envelope = BytesStart::new("soapenv:Envelope");
    envelope.push_attribute(("xmlns:soapenv", SOAP_ENV_NS));
    writer.write_event(Event::Start(envelope)).map_err(xml_io)?;
    writer
        .write_event(Event::Empty(BytesStart::new("soapenv:Header")))
        .map_err(xml_io)?;
    writer
        .write_event(Event::Start(BytesStart::new("soapenv:Body")))
        .map_err(xml_io)?;

    let mut check_vat = BytesStart::new("checkVat");
    check_vat.push_attribute(("xmlns", VIES_TYPES_NS));
    writer.write_event(Event::Start(check_vat)).map_err(xml_io)?;
    for (name, value) in [("countryCode", country_code), ("vatNumber", vat_number)] {
        writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        writer
            .write_event(Event::Text(BytesText::new(value)))
            .map_err(xml_io)?;
        writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("checkVat")))
        .map_err(xml_io)?;

    writer
        .write_event(Event::End(BytesEnd::new("soapenv:Body")))
        .map_err(xml_io)?;
    writer
        .write_event(Event::End(BytesEnd::new("soapenv:Envelope")))
        .map_err(xml_io)?;

    let buf = writer.into_inner().into_inner();
    String::from_utf8(buf).map_err(|e| FinanceError::InvalidInput(format!("XML UTF-8 error: {e}")))
}

/// Payload of a successful `checkVatResponse`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckVatResponse {
    pub country_code: String,
    pub vat_number: String,
    pub request_date: Option<String>,
    pub valid: bool,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoapFault {
    pub code: String,
    pub message: String,
}

/// Body of a VIES SOAP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoapResponse {
    Success(CheckVatResponse),
    Fault(SoapFault),
}

#[derive(Default)]
struct RawCheckVat {
    country_code: String,
    vat_number: String,
    request_date: Option<String>,
    valid: String,
    name: String,
    address: String,
}

#[derive(Default)]
struct EnvelopeVisitor {
    path: Vec<String>,
    fault: Option<SoapFault>,
    response: Option<RawCheckVat>,
}

impl XmlVisitor for EnvelopeVisitor {
    fn open(&mut self, name: &str, _element: &BytesStart<'_>) -> Result<()> {
        if self.path.is_empty() && name != "Envelope" {
            return Err(malformed(format!("expected a SOAP Envelope, found <{name}>")));
        }
        self.path.push(name.to_string());

        let path: Vec<&str> = self.path.iter().map(String::as_str).collect();
        match path.as_slice() {
            ["Envelope", "Body", "Fault"] => self.fault = Some(SoapFault::default()),
            ["Envelope", "Body", "checkVatResponse"] => {
                self.response = Some(RawCheckVat::default());
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        let path: Vec<&str> = self.path.iter().map(String::as_str).collect();
        match path.as_slice() {
            ["Envelope", "Body", "Fault", field] => {
                if let Some(fault) = self.fault.as_mut() {
                    match *field {
                        "faultcode" => fault.code.push_str(text),
                        "faultstring" => fault.message.push_str(text),
                        _ => {}
                    }
                }
            }
            ["Envelope", "Body", "checkVatResponse", field] => {
                if let Some(resp) = self.response.as_mut() {
                    match *field {
                        "countryCode" => resp.country_code.push_str(text),
                        "vatNumber" => resp.vat_number.push_str(text),
                        "requestDate" => resp.request_date.get_or_insert_with(String::new).push_str(text),
                        "valid" => resp.valid.push_str(text),
                        "name" => resp.name.push_str(text),
                        "address" => resp.address.push_str(text),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, _name: &str) -> Result<()> {
        self.path.pop();
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        // an absent <valid> element reads as not valid
        "" | "false" | "0" => Ok(false),
        "true" | "1" => Ok(true),
        other => Err(malformed(format!("invalid boolean '{other}' in <valid>"))),
    }
}

/// Parse a VIES SOAP response envelope.
///
/// A `Fault` counts only when it carries a non-empty `faultstring`.
///
/// # Errors
///
/// [`FinanceError::MalformedResponse`] for invalid XML, a root other than
/// `Envelope`, or a body holding neither a fault nor a `checkVatResponse`.
pub fn parse_check_vat_response(bytes: &[u8]) -> Result<SoapResponse> {
    let mut visitor = EnvelopeVisitor::default();
    walk(bytes, &mut visitor)?;

    if let Some(fault) = visitor.fault.filter(|f| !f.message.is_empty()) {
        return Ok(SoapResponse::Fault(fault));
    }

    let raw = visitor
        .response
        .ok_or_else(|| malformed("SOAP body holds neither a checkVatResponse nor a fault"))?;

    Ok(SoapResponse::Success(CheckVatResponse {
        valid: parse_bool(&raw.valid)?,
        country_code: raw.country_code,
        vat_number: raw.vat_number,
        request_date: raw.request_date,
        name: raw.name,
        address: raw.address,
    }))
}
