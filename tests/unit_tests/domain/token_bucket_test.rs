use std::time::Duration;

use tokio::time::Instant;
use todo_agent::domain::TokenBucket;

#[test]
fn given_new_bucket_when_draining_then_allows_exactly_capacity() {
    let start = Instant::now();
    let mut bucket = TokenBucket::new(5, 1.0, start);

    for _ in 0..5 {
        assert!(bucket.try_acquire(start));
    }
    assert!(!bucket.try_acquire(start));
    assert_eq!(bucket.tokens(), 0);
}

#[test]
fn given_empty_bucket_when_one_second_passes_then_one_token_is_credited() {
    let start = Instant::now();
    let mut bucket = TokenBucket::new(2, 1.0, start);
    bucket.try_acquire(start);
    bucket.try_acquire(start);

    let later = start + Duration::from_secs(1);
    assert!(bucket.try_acquire(later));
    assert!(!bucket.try_acquire(later));
}

#[test]
fn given_frequent_polls_under_refill_period_when_time_accumulates_then_token_still_arrives() {
    let start = Instant::now();
    let mut bucket = TokenBucket::new(1, 1.0, start);
    assert!(bucket.try_acquire(start));

    assert!(!bucket.try_acquire(start + Duration::from_millis(400)));
    assert!(!bucket.try_acquire(start + Duration::from_millis(800)));
    assert!(bucket.try_acquire(start + Duration::from_millis(1200)));
}

#[test]
fn given_long_idle_when_refilling_then_tokens_are_capped_at_capacity() {
    let start = Instant::now();
    let mut bucket = TokenBucket::new(3, 10.0, start);
    bucket.try_acquire(start);

    assert!(bucket.try_acquire(start + Duration::from_secs(3600)));
    assert_eq!(bucket.tokens(), bucket.capacity() - 1);
}

#[test]
fn given_last_request_when_measuring_idle_then_counts_from_last_acquire() {
    let start = Instant::now();
    let mut bucket = TokenBucket::new(1, 1.0, start);
    bucket.try_acquire(start + Duration::from_secs(5));

    assert_eq!(
        bucket.idle_for(start + Duration::from_secs(8)),
        Duration::from_secs(3)
    );
}
