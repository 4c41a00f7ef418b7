//! Tests for async task runtime primitives.

use futures::StreamExt;
use ghcmd::runtime::{AsyncStream, AsyncTask, spawn_detached};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[tokio::test]
async fn test_async_task_spawn_async() {
    let task = AsyncTask::spawn_async(async { 42 });
    let result = task.await.unwrap();
    assert_eq!(result, 42);
}

#[tokio::test]
async fn test_async_task_ready() {
    assert_eq!(AsyncTask::ready("done").await.unwrap(), "done");
}

#[tokio::test]
async fn test_async_stream_from_vec() {
    let mut stream = AsyncStream::from_vec(vec![1, 2, 3]);

    assert_eq!(stream.next().await, Some(1));
    assert_eq!(stream.next().await, Some(2));
    assert_eq!(stream.next().await, Some(3));
    assert_eq!(stream.next().await, None);
}

#[tokio::test]
async fn test_async_stream_from_batch_error() {
    let stream: AsyncStream<Result<u32, String>> =
        AsyncStream::from_batch(async { Err("boom".to_string()) });
    let items: Vec<_> = stream.collect().await;
    assert_eq!(items, vec![Err("boom".to_string())]);
}

#[tokio::test]
async fn test_spawn_detached_runs_work() {
    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    spawn_detached("test", async move {
        flag.store(true, Ordering::SeqCst);
        Err::<(), _>("reported, not propagated")
    });

    for _ in 0..50 {
        if ran.load(Ordering::SeqCst) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(ran.load(Ordering::SeqCst));
}

#[test]
fn test_spawn_detached_without_runtime_is_skipped() {
    spawn_detached("test", async { Ok::<(), String>(()) });
}
