//! Integration tests for the runtime abstraction.

use core_async::signal::cancel_on_shutdown;
use core_async::sync::{self, CancellationToken};
use core_async::time::{self, Duration, Instant};
use std::sync::Arc;

#[core_async::test]
async fn test_gateway_call_within_deadline() {
    let reply = time::timeout(Duration::from_millis(200), async {
        time::sleep(Duration::from_millis(5)).await;
        "MY_F0001"
    })
    .await;

    assert_eq!(reply.ok(), Some("MY_F0001"));
}

#[core_async::test]
async fn test_hung_gateway_call_times_out() {
    let reply = time::timeout(Duration::from_millis(10), std::future::pending::<()>()).await;
    assert!(reply.is_err());
}

#[core_async::test]
async fn test_pause_between_cycles_completes() {
    let token = CancellationToken::new();
    assert!(time::sleep_or_cancelled(Duration::from_millis(5), &token).await);
}

#[core_async::test]
async fn test_pause_between_cycles_ends_on_shutdown() {
    let token = CancellationToken::new();
    let trigger = token.clone();

    core_async::spawn(async move {
        time::sleep(Duration::from_millis(10)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let completed = time::sleep_or_cancelled(Duration::from_secs(300), &token).await;

    assert!(!completed);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[core_async::test]
async fn test_signal_listener_leaves_token_alone_until_signalled() {
    let token = CancellationToken::new();
    let listener = cancel_on_shutdown(token.clone());

    time::sleep(Duration::from_millis(10)).await;
    assert!(!token.is_cancelled());

    listener.abort();
    assert!(listener.await.unwrap_err().is_cancelled());
    assert!(!token.is_cancelled());
}

#[core_async::test]
async fn test_records_lock_serializes_writers() {
    let records = Arc::new(sync::Mutex::new(Vec::<String>::new()));

    let mut handles = Vec::new();
    for id in ["MY_F0001", "MY_F0002", "MY_F0003"] {
        let records = Arc::clone(&records);
        handles.push(core_async::spawn(async move {
            records.lock().await.push(id.to_string());
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let mut saved = records.lock().await.clone();
    saved.sort();
    assert_eq!(saved, vec!["MY_F0001", "MY_F0002", "MY_F0003"]);
}

#[core_async::test]
async fn test_async_test_may_return_result() -> Result<(), String> {
    let reply = time::timeout(Duration::from_millis(50), async { 7 })
        .await
        .map_err(|e| e.to_string())?;
    assert_eq!(reply, 7);
    Ok(())
}

#[core_async::test]
#[should_panic(expected = "gateway bug")]
async fn test_async_test_keeps_extra_attributes() {
    panic!("gateway bug");
}
