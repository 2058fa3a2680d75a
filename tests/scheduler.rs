// tests/scheduler.rs

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tokio::time::{Duration, sleep};

use bme680_bridge::{config::RefreshInterval, scheduler::schedule_periodic};

fn counting(count: Arc<AtomicUsize>) -> impl Fn() -> std::future::Ready<()> + Send + Sync {
    move || {
        count.fetch_add(1, Ordering::SeqCst);
        std::future::ready(())
    }
}

#[tokio::test(start_paused = true)]
async fn first_tick_waits_one_period() {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = schedule_periodic(RefreshInterval::new(10).unwrap(), counting(Arc::clone(&count)));

    sleep(Duration::from_secs(9)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);

    sleep(Duration::from_secs(2)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    handle.cancel();
}

#[tokio::test(start_paused = true)]
async fn fires_every_period_until_cancelled() {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = schedule_periodic(RefreshInterval::new(5).unwrap(), counting(Arc::clone(&count)));

    sleep(Duration::from_secs(26)).await;
    assert_eq!(count.load(Ordering::SeqCst), 5);

    handle.cancel();
    sleep(Duration::from_millis(1)).await;
    assert!(handle.is_finished());

    sleep(Duration::from_secs(60)).await;
    assert_eq!(count.load(Ordering::SeqCst), 5);
}
