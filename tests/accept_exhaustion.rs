//! Accepting while the process is out of file descriptors.
//!
//! Lowers the descriptor limit of the whole test process, so this file holds
//! a single test and runs as its own binary.
#![cfg(unix)]

use std::fs::File;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

mod common;

use common::{local_server, sleepy_router, wait_until_listening};

fn descriptor_limit() -> libc::rlimit {
    let mut limit = libc::rlimit { rlim_cur: 0, rlim_max: 0 };
    assert_eq!(unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut limit) }, 0);
    limit
}

fn set_descriptor_limit(limit: libc::rlimit) {
    assert_eq!(unsafe { libc::setrlimit(libc::RLIMIT_NOFILE, &limit) }, 0);
}

#[tokio::test]
async fn server_keeps_accepting_after_descriptor_exhaustion() {
    let (server, addr) = local_server(Duration::from_secs(5), Arc::default()).await;
    let ctx = CancellationToken::new();
    let serving = tokio::spawn(server.serve_http(ctx.clone(), sleepy_router()));
    wait_until_listening(addr).await;
    // Let the readiness connection close on the server side.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let original = descriptor_limit();
    set_descriptor_limit(libc::rlimit {
        rlim_cur: original.rlim_max.min(512),
        rlim_max: original.rlim_max,
    });

    let mut hog = Vec::new();
    while let Ok(file) = File::open("/dev/null") {
        hog.push(file);
    }
    // Room for the client socket only; the server's accept gets EMFILE.
    hog.pop();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!serving.is_finished(), "server stopped while descriptors were exhausted");

    drop(hog);
    set_descriptor_limit(original);

    let mut response = String::new();
    tokio::time::timeout(Duration::from_secs(3), stream.read_to_string(&mut response))
        .await
        .expect("queued connection should be served once descriptors free up")
        .unwrap();
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("ok"), "{response}");

    ctx.cancel();
    let result = tokio::time::timeout(Duration::from_secs(2), serving)
        .await
        .expect("serve_http should return after cancellation")
        .unwrap();
    assert!(result.is_ok(), "{result:?}");
}
