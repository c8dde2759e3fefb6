use handoff::RuntimeBuilder;
use handoff::task::{JoinHandle, spawn};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;

#[test]
fn test_single_worker_thread() {
    let rt = RuntimeBuilder::new().worker_threads(1).build();

    let result = rt.block_on(async { 42 });
    assert_eq!(result, 42);
}

#[test]
fn test_worker_threads_parallel_execution() {
    let rt = RuntimeBuilder::new().worker_threads(4).build();

    let counter = Arc::new(Mutex::new(0));
    let results = Arc::new(Mutex::new(Vec::new()));

    let counter_clone = counter.clone();
    let results_clone = results.clone();

    rt.block_on(async move {
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let counter = counter_clone.clone();
                let results = results_clone.clone();

                spawn(async move {
                    *counter.lock().unwrap() += 1;
                    results.lock().unwrap().push(i);
                    i * 2
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
    });

    assert_eq!(*counter.lock().unwrap(), 10);
    assert_eq!(results.lock().unwrap().len(), 10);
}

#[test]
fn test_worker_threads_max_parallelism() {
    let num_threads = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);

    let rt = RuntimeBuilder::new().worker_threads(num_threads).build();

    let result = rt.block_on(async {
        let handles: Vec<_> = (1..=10).map(|i| spawn(async move { i })).collect();

        let mut sum = 0;
        for handle in handles {
            sum += handle.await.unwrap();
        }
        sum
    });

    assert_eq!(result, 55);
}

#[test]
fn test_worker_threads_chain_spawn() {
    let rt = RuntimeBuilder::new().worker_threads(4).build();

    let result = rt.block_on(async {
        let handle1 = spawn(async {
            let handle2 = spawn(async {
                let handle3 = spawn(async { 10 });
                handle3.await.unwrap() + 20
            });
            handle2.await.unwrap() + 30
        });
        handle1.await.unwrap() + 40
    });

    assert_eq!(result, 100);
}

#[test]
fn test_worker_threads_two_threads() {
    let rt = RuntimeBuilder::new().worker_threads(2).build();

    let completed = Arc::new(Mutex::new(HashSet::new()));
    let completed_clone = completed.clone();

    rt.block_on(async move {
        let handles: Vec<_> = (0..20)
            .map(|i| {
                let completed = completed_clone.clone();
                spawn(async move {
                    completed.lock().unwrap().insert(i);
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
    });

    let set = completed.lock().unwrap();
    assert_eq!(set.len(), 20);
}

#[test]
#[should_panic(expected = "worker_threads must be > 0")]
fn test_worker_threads_zero_panics() {
    let _ = RuntimeBuilder::new().worker_threads(0).build();
}

#[test]
fn test_worker_threads_sequential_runtimes() {
    for n in 1..=4 {
        let rt = RuntimeBuilder::new().worker_threads(n).build();
        let result = rt.block_on(async move { n * 10 });
        assert_eq!(result, n * 10);
        drop(rt);
    }
}

#[test]
fn test_runtime_spawn_returns_output() {
    let rt = RuntimeBuilder::new()
        .worker_threads(2)
        .thread_name("spawn-test")
        .build();

    let handle = rt.spawn(async { thread::current().name().map(str::to_owned) });
    let name = rt.block_on(handle).unwrap();

    assert!(name.unwrap().starts_with("spawn-test-"));
}

#[test]
#[should_panic(expected = "boom")]
fn test_block_on_resumes_panic() {
    let rt = RuntimeBuilder::new().worker_threads(1).build();

    let _: () = rt.block_on(async { panic!("boom") });
}

#[handoff::test(worker_threads = 1)]
async fn test_panicking_task_reports_join_error() {
    let handle: JoinHandle<()> = spawn(async { panic!("task failure") });

    let err = handle.await.unwrap_err();
    assert!(err.is_panic());
    assert!(err.to_string().contains("task failure"));

    let payload = err.try_into_panic().unwrap();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"task failure"));

    // The worker survives the panic.
    assert_eq!(spawn(async { 7 }).await.unwrap(), 7);
}
