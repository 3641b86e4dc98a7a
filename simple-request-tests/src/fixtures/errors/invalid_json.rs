#[cfg(test)]
mod tests {
    use simple_request::{Error, ErrorKind};

    use crate::*;

    #[test]
    fn test_json_deserialization_error() {
        const PATH: &str = "errors/invalid_json_response";
        const INVALID_JSON: &str = r#"{"name": "Test User", "age": 30, invalid_json}"#;

        let _handle = crate::add_hyper_fixture(PATH, |_| async move {
            let res = Response::builder()
                .header(CONTENT_TYPE, "application/json")
                .body(Full::new(Bytes::from(INVALID_JSON)))
                .unwrap();
            (res, Ok(()))
        });
        let dir = tempfile::tempdir().unwrap();
        let client = crate::init_builder(dir.path()).build().unwrap();

        let (result, logs) = crate::capture_logs(|| client.get(&fixture_url(PATH), &[], &[]));
        let err = result.unwrap_err();
        assert!(matches!(err, Error::InvalidJson { .. }));
        assert_eq!(err.response_body(), Some(INVALID_JSON));
        assert!(logs.contains("response is not valid JSON"), "{logs}");
    }

    #[test]
    fn test_plain_text_response() {
        const PATH: &str = "errors/plain_text_response";

        let _handle = crate::add_hyper_fixture(PATH, |_| async move {
            let res = Response::new(Full::new(Bytes::from("Hello, world!")));
            (res, Ok(()))
        });
        let dir = tempfile::tempdir().unwrap();
        let client = crate::init_builder(dir.path()).build().unwrap();

        let err = client.post(&fixture_url(PATH), None, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidJson);
    }
}
