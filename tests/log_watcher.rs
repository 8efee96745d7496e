// tests/log_watcher.rs

use std::error::Error;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use qualification_runner::watch::{ChannelLogSink, LogWatcher};
use qualification_runner_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

async fn next_line(rx: &mut UnboundedReceiver<String>) -> String {
    with_timeout(rx.recv()).await.expect("sink channel closed")
}

#[tokio::test]
async fn first_line_of_a_file_created_after_watch_is_not_lost() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("log.txt");
    let (sink, mut rx) = ChannelLogSink::channel();

    let guard = LogWatcher::default().watch(&path, Arc::new(sink));

    // Create and write within a few milliseconds of starting the watch.
    tokio::time::sleep(Duration::from_millis(5)).await;
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "line 1")?;
    file.flush()?;

    assert_eq!(next_line(&mut rx).await, "line 1");

    writeln!(file, "line 2")?;
    file.flush()?;
    assert_eq!(next_line(&mut rx).await, "line 2");

    guard.stop().await;
    Ok(())
}

#[tokio::test]
async fn lines_appended_by_another_writer_arrive_in_order() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("log.txt");
    let (sink, mut rx) = ChannelLogSink::channel();

    let guard = LogWatcher::default()
        .with_poll_interval(Duration::from_millis(10))
        .watch(&path, Arc::new(sink));

    let writer_path = path.clone();
    let writer = std::thread::spawn(move || -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&writer_path)?;
        for i in 0..200 {
            // Split writes so the watcher regularly sees half lines.
            write!(file, "entry ")?;
            file.flush()?;
            writeln!(file, "{i}")?;
            file.flush()?;
            if i % 20 == 0 {
                std::thread::sleep(Duration::from_millis(5));
            }
        }
        Ok(())
    });

    let mut received = Vec::new();
    while received.len() < 200 {
        received.push(next_line(&mut rx).await);
    }
    writer.join().expect("writer thread panicked")?;
    guard.stop().await;

    let expected: Vec<String> = (0..200).map(|i| format!("entry {i}")).collect();
    assert_eq!(received, expected);
    assert!(rx.try_recv().is_err(), "no extra lines expected");
    Ok(())
}

#[tokio::test]
async fn watcher_on_missing_directory_polls_and_stops_cleanly() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("not-yet").join("log.txt");
    let (sink, mut rx) = ChannelLogSink::channel();

    let guard = LogWatcher::default().watch(&path, Arc::new(sink));
    tokio::time::sleep(Duration::from_millis(60)).await;

    std::fs::create_dir(dir.path().join("not-yet"))?;
    std::fs::write(&path, "late\n")?;

    assert_eq!(next_line(&mut rx).await, "late");
    with_timeout(guard.stop()).await;
    Ok(())
}

#[tokio::test]
async fn dropping_the_guard_stops_the_watcher() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("log.txt");
    let (sink, mut rx) = ChannelLogSink::channel();

    let guard = LogWatcher::default().watch(&path, Arc::new(sink));
    drop(guard);

    // The task finishes on its own and drops the sink, closing the channel.
    assert_eq!(with_timeout(rx.recv()).await, None);
    Ok(())
}
