fn main() {
    println!("Run `cargo test -p wire-compat` to execute backend wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use chatdrop_client::types::ErrorBody;
    use chatdrop_client::{RegisterUploadRequest, RegisterUploadResponse, StoredFile};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and
    /// compares the JSON values (order-independent comparison).
    ///
    /// Fixtures are captured from the backend's actual responses, so a
    /// mismatch here means our types drifted from the wire contract.
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  backend: {fixture}\n  rust:    {reserialized}"
        );
    }

    #[test]
    fn fixture_register_upload_request() {
        roundtrip_test::<RegisterUploadRequest>("register_upload_request.json");
    }

    #[test]
    fn fixture_register_upload_response() {
        roundtrip_test::<RegisterUploadResponse>("register_upload_response.json");
    }

    #[test]
    fn fixture_stored_file() {
        roundtrip_test::<StoredFile>("stored_file.json");
    }

    #[test]
    fn fixture_register_response_field_access() {
        let response: RegisterUploadResponse =
            serde_json::from_value(load_fixture("register_upload_response.json")).unwrap();

        assert!(response.url.starts_with("https://"));
        assert_eq!(response.expires_in, Some(600));
        assert!(
            response
                .file
                .filename
                .starts_with("chat/"),
            "storage key carries the chat prefix"
        );
        assert_eq!(response.file.original_name, "vacation.png");
        assert_eq!(response.file.mime_type, "image/png");
        assert!(response.file.upload_date.is_some());
    }

    /// Error bodies are only probed for `message`; unknown fields must not
    /// break deserialization.
    #[test]
    fn fixture_error_body_message_is_probed() {
        let body: ErrorBody =
            serde_json::from_value(load_fixture("error_body.json")).unwrap();
        assert_eq!(
            body.message.as_deref(),
            Some("Presigned URL could not be issued.")
        );
    }
}
