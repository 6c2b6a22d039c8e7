use pmprof::parser::{parse_log, read_capture_log, AnomalyReason, CallStack, Sample};
use pmprof::utils::config::TRACE_SEPARATOR;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn stack(frames: &[&str]) -> CallStack {
    frames.iter().copied().collect()
}

/// Two rounds as gdb prints them when attached to a two-thread process
fn realistic_log() -> String {
    format!(
        "[New LWP 4243]
[Thread debugging using libthread_db enabled]
Using host libthread_db library \"/lib/x86_64-linux-gnu/libthread_db.so.1\".
0x00007f3c2f0e9bbf in __GI___poll (fds=0x55d4c2a1b2c3, nfds=1, timeout=-1) at ../sysdeps/unix/sysv/linux/poll.c:29
29\t../sysdeps/unix/sysv/linux/poll.c: No such file or directory.
{sep}

Thread 2 (Thread 0x7f3c2e5fe700 (LWP 4243)):
#0  0x00007f3c2f0c4f7d in __lll_lock_wait () from /lib/x86_64-linux-gnu/libpthread.so.0
#1  0x00007f3c2f0bd4a9 in __GI___pthread_mutex_lock (mutex=0x55d4c2a1c040) at ../nptl/pthread_mutex_lock.c:80
#2  0x000055d4c2a1b1f2 in worker (arg=0x0) at worker.c:17
#3  0x00007f3c2f0bafa3 in start_thread () from /lib/x86_64-linux-gnu/libpthread.so.0
#4  0x00007f3c2f0f44cf in clone ()

Thread 1 (Thread 0x7f3c2f3ff740 (LWP 4242)):
#0  __GI___poll (fds=0x55d4c2a1b2c3, nfds=1, timeout=-1) at ../sysdeps/unix/sysv/linux/poll.c:29
#1  0x000055d4c2a1b3aa in main () at main.c:42
[Inferior 1 (process 4242) detached]
{sep}

Thread 2 (Thread 0x7f3c2e5fe700 (LWP 4243)):
#0  0x000055d4c2a1b1f2 in worker (arg=0x0) at worker.c:17
#1  0x00007f3c2f0bafa3 in start_thread () from /lib/x86_64-linux-gnu/libpthread.so.0
#2  0x00007f3c2f0f44cf in clone ()

Thread 1 (Thread 0x7f3c2f3ff740 (LWP 4242)):
#0  __GI___poll (fds=0x55d4c2a1b2c3, nfds=1, timeout=-1) at ../sysdeps/unix/sysv/linux/poll.c:29
#1  0x000055d4c2a1b3aa in main () at main.c:42
[Inferior 1 (process 4242) detached]
",
        sep = TRACE_SEPARATOR
    )
}

#[test]
fn test_parse_realistic_log() {
    let parsed = parse_log(&realistic_log());

    assert!(parsed.anomalies.is_empty(), "{:?}", parsed.anomalies);
    assert_eq!(parsed.profile.traces.len(), 2);

    let first = &parsed.profile.traces[0].samples;
    assert_eq!(
        first[0],
        Sample::new(
            "4243",
            stack(&[
                "__lll_lock_wait",
                "__GI___pthread_mutex_lock",
                "worker",
                "start_thread",
                "clone"
            ])
        )
    );
    assert_eq!(
        first[1],
        Sample::new("4242", stack(&["__GI___poll", "main"]))
    );

    let second = &parsed.profile.traces[1].samples;
    assert_eq!(
        second[0].stack,
        stack(&["worker", "start_thread", "clone"])
    );
}

#[test]
fn test_parsing_is_idempotent() {
    let log = realistic_log();
    assert_eq!(parse_log(&log), parse_log(&log));
}

#[test]
fn test_stray_line_is_reported_not_fatal() {
    let clean = format!(
        "{TRACE_SEPARATOR}\nThread 2 (LWP 101):\n#0  bar ()\n#1  main ()\nThread 1 (LWP 100):\n#0  foo ()\n#1  main ()\n"
    );
    let noisy = format!(
        "{TRACE_SEPARATOR}\nThread 2 (LWP 101):\n#0  bar ()\n#1  main ()\nptrace: Operation not permitted.\nThread 1 (LWP 100):\n#0  foo ()\n#1  main ()\n"
    );

    let clean = parse_log(&clean);
    let noisy = parse_log(&noisy);

    assert_eq!(noisy.profile, clean.profile);
    assert_eq!(noisy.anomalies.len(), 1);
    assert_eq!(noisy.anomalies[0].reason, AnomalyReason::Unrecognized);
    assert_eq!(noisy.anomalies[0].line_number, 5);
    assert_eq!(noisy.anomalies[0].text, "ptrace: Operation not permitted.");
}

#[test]
fn test_log_without_separator_is_one_trace() {
    let parsed = parse_log("Thread 1 (process 9):\n#0  main ()\n");
    assert_eq!(parsed.profile.traces.len(), 1);
    assert_eq!(parsed.profile.traces[0].samples[0].thread_id, "9");
}

#[test]
fn test_read_capture_log_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(realistic_log().as_bytes()).unwrap();

    let parsed = read_capture_log(file.path()).unwrap();
    assert_eq!(parsed.profile.sample_count(), 4);
}

#[test]
fn test_read_capture_log_invalid_utf8() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(format!("{TRACE_SEPARATOR}\nThread 1 (LWP 5):\n#0  ").as_bytes())
        .unwrap();
    file.write_all(&[0xff, 0xfe]).unwrap();
    file.write_all(b" ()\n").unwrap();

    let parsed = read_capture_log(file.path()).unwrap();
    assert_eq!(parsed.profile.traces[0].samples[0].stack.len(), 1);
}

#[test]
fn test_read_missing_capture_log() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_capture_log(dir.path().join("missing.log")).is_err());
}

#[test]
fn test_empty_log() {
    let parsed = parse_log("");
    assert!(parsed.profile.is_empty());
    assert!(parsed.anomalies.is_empty());
}
