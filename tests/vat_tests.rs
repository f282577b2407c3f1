#![cfg(feature = "vat")]

use std::time::Duration;

use eurofin::vat::*;
use eurofin::{EndpointConfig, FinanceError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_string_contains, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const NAME_APPLE: &str = "SRL APPLE RETAIL BELGIUM";
const ADDR_APPLE: &str = "Avenue du Port 86C/204\n1000 Bruxelles";

fn check_vat_response(country: &str, number: &str, valid: bool, name: &str, address: &str) -> String {
    format!(
        r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><ns2:checkVatResponse xmlns:ns2="urn:ec.europa.eu:taxud:vies:services:checkVat:types"><ns2:countryCode>{country}</ns2:countryCode><ns2:vatNumber>{number}</ns2:vatNumber><ns2:requestDate>2024-06-14+02:00</ns2:requestDate><ns2:valid>{valid}</ns2:valid><ns2:name>{name}</ns2:name><ns2:address>{address}</ns2:address></ns2:checkVatResponse></soap:Body></soap:Envelope>"#
    )
}

async fn vies_server(body: String) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;
    server
}

fn client(url: impl Into<String>) -> VatValidationClient {
    VatValidationClient::new(EndpointConfig::new(url)).unwrap()
}

/// Serves one response per connection that declares more bytes than it sends.
async fn truncated_body_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                // read headers and the whole envelope before answering
                while !request.ends_with(b"</soapenv:Envelope>") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\n")
                    .await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Successful checks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn check_vat_inputs() {
    struct Case {
        name: &'static str,
        vat_number: &'static str,
        country: &'static str,
        number: &'static str,
    }

    let cases = [
        Case { name: "valid-spaces", vat_number: "BE 0836 157 420", country: "BE", number: "0836157420" },
        Case { name: "valid-nospaces", vat_number: "BE0836157420", country: "BE", number: "0836157420" },
        Case { name: "valid-dots", vat_number: "BE 0836.157.420", country: "BE", number: "0836157420" },
        Case { name: "lowercase", vat_number: "be0836157420", country: "BE", number: "0836157420" },
    ];

    for case in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains(format!("<countryCode>{}</countryCode>", case.country)))
            .and(body_string_contains(format!("<vatNumber>{}</vatNumber>", case.number)))
            .respond_with(ResponseTemplate::new(200).set_body_string(check_vat_response(
                case.country,
                case.number,
                true,
                NAME_APPLE,
                ADDR_APPLE,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let info = client(server.uri()).check_vat(case.vat_number).await.unwrap();
        assert_eq!(info.country_code, case.country, "{}", case.name);
        assert_eq!(info.vat_number, case.number, "{}", case.name);
        assert!(info.is_valid, "{}", case.name);
        assert_eq!(info.name, NAME_APPLE, "{}", case.name);
        assert_eq!(info.address, ADDR_APPLE, "{}", case.name);
        assert_eq!(info.request_date, chrono::NaiveDate::from_ymd_opt(2024, 6, 14));
    }
}

#[tokio::test]
async fn check_vat_sanitized_requests_are_identical() {
    let server = vies_server(check_vat_response("BE", "0836157420", true, NAME_APPLE, ADDR_APPLE)).await;
    let vies = client(server.uri());

    vies.check_vat("BE 0836.157.420").await.unwrap();
    vies.check_vat("BE0836157420").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);
}

#[tokio::test]
async fn check_vat_posts_soap_xml() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("content-type", "text/xml;charset=UTF-8"))
        .and(body_string_contains("<checkVat xmlns=\"urn:ec.europa.eu:taxud:vies:services:checkVat:types\">"))
        .respond_with(ResponseTemplate::new(200).set_body_string(check_vat_response(
            "IE",
            "6388047V",
            true,
            "GOOGLE IRELAND LIMITED",
            "3RD FLOOR, GORDON HOUSE, BARROW STREET, DUBLIN 4",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let info = client(server.uri()).check_vat("IE6388047V").await.unwrap();
    assert_eq!(info.name, "GOOGLE IRELAND LIMITED");
}

#[tokio::test]
async fn check_vat_not_registered_is_a_result() {
    let server = vies_server(check_vat_response("BE", "0123456789", false, "---", "---")).await;
    let info = client(server.uri()).check_vat("BE0123456789").await.unwrap();
    assert!(!info.is_valid);
    assert!(info.name.is_empty());
    assert!(info.address.is_empty());
}

#[tokio::test]
async fn check_vat_invalid_drops_reported_details() {
    let server = vies_server(check_vat_response("BE", "0123456789", false, "ACME", "Somewhere")).await;
    let info = client(server.uri()).check_vat("BE0123456789").await.unwrap();
    assert!(!info.is_valid);
    assert_eq!(info.name, "");
    assert_eq!(info.address, "");
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn check_vat_too_short_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for input in ["", "BE", " B.E ", "  "] {
        let err = client(server.uri()).check_vat(input).await.unwrap_err();
        assert!(matches!(err, FinanceError::TooShort(_)), "{input:?}: {err:?}");
    }
}

#[tokio::test]
async fn check_vat_invalid_url() {
    let err = client("ht&@-tp://:aa")
        .check_vat("BE0836157420")
        .await
        .unwrap_err();
    assert!(matches!(err, FinanceError::ServiceUnreachable(_)));
}

#[tokio::test]
async fn check_vat_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("hello")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let vies = VatValidationClient::new(
        EndpointConfig::new(server.uri()).with_timeout(Duration::from_millis(250)),
    )
    .unwrap();
    let err = vies.check_vat("BE0836157420").await.unwrap_err();
    assert!(matches!(err, FinanceError::ServiceUnreachable(_)));
}

#[tokio::test]
async fn check_vat_truncated_body() {
    let url = truncated_body_server().await;
    let err = client(url).check_vat("BE0836157420").await.unwrap_err();
    assert!(matches!(err, FinanceError::ResponseRead(_)), "{err:?}");
}

#[tokio::test]
async fn check_vat_invalid_input_marker() {
    let server = vies_server("INVALID_INPUT".into()).await;
    let err = client(server.uri()).check_vat("BE0836157420").await.unwrap_err();
    assert!(matches!(err, FinanceError::NotValid));
}

#[tokio::test]
async fn check_vat_invalid_input_inside_valid_xml() {
    let body = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><soap:Fault><faultcode>soap:Server</faultcode><faultstring>INVALID_INPUT</faultstring></soap:Fault></soap:Body></soap:Envelope>"#;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(body))
        .mount(&server)
        .await;

    let err = client(server.uri()).check_vat("BE0836157420").await.unwrap_err();
    assert!(matches!(err, FinanceError::NotValid));
}

#[tokio::test]
async fn check_vat_invalid_xml() {
    let server = vies_server("<vies>".into()).await;
    let err = client(server.uri()).check_vat("BE0836157420").await.unwrap_err();
    assert!(matches!(err, FinanceError::MalformedResponse(_)));
}

#[tokio::test]
async fn check_vat_soap_fault() {
    let body = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><soap:Fault><faultcode>soap:Server</faultcode><faultstring>error</faultstring></soap:Fault></soap:Body></soap:Envelope>"#;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(body))
        .mount(&server)
        .await;

    let err = client(server.uri()).check_vat("BE0836157420").await.unwrap_err();
    match &err {
        FinanceError::ServiceFault(msg) => assert_eq!(msg, "error"),
        other => panic!("expected ServiceFault, got {other:?}"),
    }
    assert!(err.to_string().contains("error"));
}
