use yt_auth::CallbackServer;

#[tokio::test]
async fn delivers_the_code_and_closes_the_listener() {
    let server = CallbackServer::bind(0).await.expect("bind ephemeral port");
    let addr = server.addr();
    assert_eq!(
        server.redirect_uri(),
        format!("http://localhost:{}", addr.port())
    );

    let body = reqwest::get(format!("http://{addr}/?code=first-code"))
        .await
        .expect("callback request")
        .text()
        .await
        .expect("confirmation body");
    assert!(body.contains("first-code"));
    assert!(body.contains("safely close this browser window"));

    let code = server.wait_for_code().await.expect("code delivered");
    assert_eq!(code, "first-code");

    // The listener is gone: further connections are refused.
    let second = reqwest::get(format!("http://{addr}/?code=second-code")).await;
    assert!(second.is_err());
}

#[tokio::test]
async fn second_request_cannot_overwrite_the_delivered_code() {
    let server = CallbackServer::bind(0).await.expect("bind ephemeral port");
    let addr = server.addr();

    reqwest::get(format!("http://{addr}/?code=winner"))
        .await
        .expect("first callback request");

    // The second request races listener teardown: it is either refused or
    // told the authorization already completed. Either way the delivered
    // code is untouched.
    if let Ok(response) = reqwest::get(format!("http://{addr}/?code=loser")).await {
        let body = response.text().await.expect("body");
        assert!(body.contains("already completed"));
    }

    let code = server.wait_for_code().await.expect("code delivered");
    assert_eq!(code, "winner");
}

#[tokio::test]
async fn provider_error_keeps_the_listener_waiting() {
    let server = CallbackServer::bind(0).await.expect("bind ephemeral port");
    let addr = server.addr();

    let body = reqwest::get(format!("http://{addr}/?error=access_denied"))
        .await
        .expect("error callback")
        .text()
        .await
        .expect("body");
    assert!(body.contains("Authorization failed"));
    assert!(body.contains("access_denied"));

    // The flow is still live; a later consent delivers normally.
    reqwest::get(format!("http://{addr}/?code=late-code"))
        .await
        .expect("late callback");
    let code = server.wait_for_code().await.expect("code delivered");
    assert_eq!(code, "late-code");
}

#[tokio::test]
async fn request_without_code_keeps_the_listener_waiting() {
    let server = CallbackServer::bind(0).await.expect("bind ephemeral port");
    let addr = server.addr();

    let body = reqwest::get(format!("http://{addr}/"))
        .await
        .expect("bare request")
        .text()
        .await
        .expect("body");
    assert!(body.contains("No authorization code received"));

    reqwest::get(format!("http://{addr}/?code=eventually"))
        .await
        .expect("callback request");
    let code = server.wait_for_code().await.expect("code delivered");
    assert_eq!(code, "eventually");
}

#[tokio::test]
async fn shutdown_without_a_code_stops_accepting_connections() {
    let server = CallbackServer::bind(0).await.expect("bind ephemeral port");
    let addr = server.addr();

    server.shutdown().await;

    let refused = reqwest::get(format!("http://{addr}/?code=too-late")).await;
    assert!(refused.is_err());
}

#[tokio::test]
async fn binding_an_occupied_port_is_fatal() {
    let server = CallbackServer::bind(0).await.expect("bind ephemeral port");
    let port = server.addr().port();

    let err = CallbackServer::bind(port)
        .await
        .expect_err("second bind on the same port must fail");
    assert!(matches!(err, yt_auth::AuthError::Bind { .. }));

    server.shutdown().await;
}
