use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use fauna_client::errors::{BadRequestError, ClientTimeoutError, Elapsed};
use fauna_client::errors::ErrorKind;
use fauna_client::errors::{NotFoundError, UnavailableError};
use fauna_client::{Executor, Inline, QueryResult};

const TIMEOUT: Duration = Duration::from_secs(10);

#[test]
#[should_panic(expected = "completed twice")]
fn complete_twice() {
    let result = QueryResult::new();
    result.succeed(1);
    result.succeed(2);
}

#[test]
fn callbacks_fire_once() {
    let fired = Arc::new(AtomicUsize::new(0));
    let result = QueryResult::<i64>::new();
    for _ in 0..2 {
        let fired = fired.clone();
        result.on_complete(None, move |outcome| {
            assert_eq!(outcome.unwrap(), 7);
            fired.fetch_add(1, Ordering::SeqCst);
        });
    }
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    result.succeed(7);
    assert_eq!(fired.load(Ordering::SeqCst), 2);

    let late = fired.clone();
    result.on_complete(Some(Arc::new(Inline)), move |_| {
        late.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(fired.load(Ordering::SeqCst), 3);
}

#[test]
fn concurrent_registration() {
    for _ in 0..50 {
        let fired = Arc::new(AtomicUsize::new(0));
        let result = QueryResult::<u32>::new();
        let registrars: Vec<_> = (0..4).map(|_| {
            let result = result.clone();
            let fired = fired.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    let fired = fired.clone();
                    result.on_complete(None, move |_| {
                        fired.fetch_add(1, Ordering::SeqCst);
                    });
                }
            })
        }).collect();
        result.succeed(1);
        for handle in registrars {
            handle.join().unwrap();
        }
        assert_eq!(fired.load(Ordering::SeqCst), 40);
    }
}

#[test]
fn wait_for_other_thread() {
    let result = QueryResult::new();
    let producer = result.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        producer.succeed("done".to_string());
    });
    assert_eq!(result.wait(TIMEOUT).unwrap(), "done");
}

#[test]
fn wait_times_out() {
    let result = QueryResult::<i64>::new();
    let start = Instant::now();
    let err = result.wait(Duration::from_millis(100)).unwrap_err();
    let elapsed = start.elapsed();
    assert!(err.is::<ClientTimeoutError>());
    let waited = Elapsed::find(&err).unwrap();
    assert!(waited >= Duration::from_millis(100));
    assert!(waited <= elapsed);
    assert!(format!("{:#}", err).contains("no result after"), "{:#}", err);
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(900), "waited {:?}", elapsed);
    // completing after the caller gave up is harmless
    result.succeed(1);
    assert_eq!(result.wait(Duration::ZERO).unwrap(), 1);
}

#[test]
fn map_success_and_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let doubled = QueryResult::successful(21).map(move |v| {
        counter.fetch_add(1, Ordering::SeqCst);
        v * 2
    });
    assert_eq!(doubled.wait(TIMEOUT).unwrap(), 42);

    let counter = calls.clone();
    let failed = QueryResult::<i64>::failed(NotFoundError::build())
        .map(move |v| {
            counter.fetch_add(1, Ordering::SeqCst);
            v * 2
        });
    assert!(failed.wait(TIMEOUT).unwrap_err().is::<NotFoundError>());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn flat_map_links_completion() {
    let inner = QueryResult::<String>::new();
    let linked = inner.clone();
    let outer = QueryResult::successful(5).flat_map(move |n| {
        linked.map(move |s| format!("{}{}", s, n))
    });
    assert!(!outer.is_completed());
    inner.succeed("x".into());
    assert_eq!(outer.wait(TIMEOUT).unwrap(), "x5");

    let outer = QueryResult::<i64>::failed(BadRequestError::build())
        .flat_map(|_| -> QueryResult<i64> {
            panic!("continuation must not run on failure")
        });
    assert!(outer.wait(TIMEOUT).unwrap_err().is::<BadRequestError>());
}

#[test]
fn map_err_recovers() {
    let recovered = QueryResult::<i64>::failed(NotFoundError::build())
        .map_err(|e| if e.is::<NotFoundError>() { Ok(0) } else { Err(e) });
    assert_eq!(recovered.wait(TIMEOUT).unwrap(), 0);

    let replaced = QueryResult::<i64>::failed(UnavailableError::build())
        .map_err(|e| Err(e.context("while reading spells")));
    let err = replaced.wait(TIMEOUT).unwrap_err();
    assert!(err.is::<UnavailableError>());
    assert_eq!(err.initial_message(), Some("while reading spells"));

    let untouched = QueryResult::successful(3)
        .map_err(|_| -> Result<i64, _> { panic!("must not run on success") });
    assert_eq!(untouched.wait(TIMEOUT).unwrap(), 3);
}

#[test]
fn flat_map_err_retries() {
    let retried = QueryResult::<i64>::failed(UnavailableError::build())
        .flat_map_err(|_| QueryResult::successful(9));
    assert_eq!(retried.wait(TIMEOUT).unwrap(), 9);

    let untouched = QueryResult::successful(1)
        .flat_map_err(|_| QueryResult::successful(2));
    assert_eq!(untouched.wait(TIMEOUT).unwrap(), 1);
}

#[test]
fn runtime_executor() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let executor: Arc<dyn Executor> = Arc::new(runtime.handle().clone());
    let caller = thread::current().id();
    let result = QueryResult::<i64>::new();
    let observed = QueryResult::new();
    let target = observed.clone();
    result.on_complete(Some(executor), move |outcome| {
        target.succeed((thread::current().id() != caller, outcome.unwrap()));
    });
    result.succeed(4);
    assert_eq!(observed.wait(TIMEOUT).unwrap(), (true, 4));
}

#[tokio::test]
async fn into_future() {
    let result = QueryResult::new();
    let producer = result.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        producer.succeed(vec![1, 2, 3]);
    });
    assert_eq!(result.await.unwrap(), vec![1, 2, 3]);
}
