use querybridge_mcp::run_server;

#[tokio::test]
async fn server_starts_with_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::env::set_var("QUERYBRIDGE_STORE_DIR", dir.path());
    std::env::set_var("QUERYBRIDGE_HEADLESS", "true");
    let result = run_server().await;
    assert!(
        result.is_ok(),
        "expected headless server bootstrap to succeed: {result:?}"
    );
}
