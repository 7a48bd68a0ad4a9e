use std::sync::Arc;
use std::time::Duration;

use todo_agent::application::services::RateLimiter;

fn limiter() -> RateLimiter {
    RateLimiter::new(5, 1.0, Duration::from_secs(60))
}

#[tokio::test(start_paused = true)]
async fn given_burst_of_five_when_sixth_request_arrives_then_it_is_denied() {
    let limiter = limiter();

    for _ in 0..5 {
        assert!(limiter.allow("10.0.0.1"));
    }
    assert!(!limiter.allow("10.0.0.1"));
}

#[tokio::test(start_paused = true)]
async fn given_exhausted_client_when_one_second_passes_then_one_request_is_allowed() {
    let limiter = limiter();
    for _ in 0..5 {
        limiter.allow("10.0.0.1");
    }

    tokio::time::advance(Duration::from_secs(1)).await;

    assert!(limiter.allow("10.0.0.1"));
    assert!(!limiter.allow("10.0.0.1"));
}

#[tokio::test(start_paused = true)]
async fn given_polling_faster_than_refill_when_time_adds_up_then_token_is_credited() {
    let limiter = limiter();
    for _ in 0..5 {
        limiter.allow("10.0.0.1");
    }

    tokio::time::advance(Duration::from_millis(600)).await;
    assert!(!limiter.allow("10.0.0.1"));

    tokio::time::advance(Duration::from_millis(600)).await;
    assert!(limiter.allow("10.0.0.1"));
}

#[tokio::test(start_paused = true)]
async fn given_two_clients_when_one_is_exhausted_then_other_is_unaffected() {
    let limiter = limiter();
    for _ in 0..6 {
        limiter.allow("10.0.0.1");
    }

    assert!(limiter.allow("10.0.0.2"));
    assert_eq!(limiter.remaining_tokens("10.0.0.2"), Some(4));
    assert_eq!(limiter.tracked_clients(), 2);
}

#[tokio::test(start_paused = true)]
async fn given_idle_client_when_sweeping_then_bucket_is_dropped_and_restarts_full() {
    let limiter = limiter();
    for _ in 0..5 {
        limiter.allow("10.0.0.1");
    }

    tokio::time::advance(Duration::from_secs(61)).await;

    assert_eq!(limiter.sweep_idle(), 1);
    assert_eq!(limiter.tracked_clients(), 0);
    assert_eq!(limiter.remaining_tokens("10.0.0.1"), None);

    assert!(limiter.allow("10.0.0.1"));
    assert_eq!(limiter.remaining_tokens("10.0.0.1"), Some(4));
}

#[tokio::test(start_paused = true)]
async fn given_recently_active_client_when_sweeping_then_bucket_is_kept() {
    let limiter = limiter();
    limiter.allow("10.0.0.1");

    tokio::time::advance(Duration::from_secs(30)).await;

    assert_eq!(limiter.sweep_idle(), 0);
    assert_eq!(limiter.tracked_clients(), 1);
}

#[tokio::test(start_paused = true)]
async fn given_background_sweep_when_interval_elapses_then_idle_buckets_disappear() {
    let limiter = Arc::new(limiter());
    limiter.allow("10.0.0.1");
    let sweeper = tokio::spawn(Arc::clone(&limiter).run_idle_sweep());

    tokio::time::sleep(Duration::from_secs(121)).await;

    assert_eq!(limiter.tracked_clients(), 0);
    sweeper.abort();
}
