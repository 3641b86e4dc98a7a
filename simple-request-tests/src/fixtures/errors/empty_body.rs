#[cfg(test)]
mod tests {
    use simple_request::ErrorKind;

    use crate::*;

    #[test]
    fn test_empty_body() {
        const PATH: &str = "errors/empty_body";

        let _handle = crate::add_hyper_fixture(PATH, |_| async move {
            (Response::new(Full::new(Bytes::new())), Ok(()))
        });
        let dir = tempfile::tempdir().unwrap();
        let client = crate::init_builder(dir.path()).build().unwrap();

        let (result, logs) = crate::capture_logs(|| client.get(&fixture_url(PATH), &[], &[]));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::EmptyBody);
        assert!(logs.contains("request returned empty content"), "{logs}");
    }

    #[test]
    fn test_no_content_status() {
        const PATH: &str = "errors/no_content";

        let _handle = crate::add_hyper_fixture(PATH, |_| async move {
            let res = Response::builder()
                .status(StatusCode::NO_CONTENT)
                .body(Full::new(Bytes::new()))
                .unwrap();
            (res, Ok(()))
        });
        let dir = tempfile::tempdir().unwrap();
        let client = crate::init_builder(dir.path()).build().unwrap();

        let err = client.post(&fixture_url(PATH), None, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyBody);
    }
}
