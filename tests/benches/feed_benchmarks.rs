//! # Photo-Feed Benchmarks
//!
//! | Subsystem | Operation | Input |
//! |-----------|-----------|-------|
//! | pf-02 Feed Stream | Sort + truncate candidate set | 100 to 10 000 posts |
//! | pf-02 Feed Stream | Full stream assembly, in-memory store | 10 authors, 10 to 200 posts each |

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use pf_01_post_store::test_utils::{seed_posts, seed_users};
use pf_01_post_store::{InMemoryPostStore, PostStoreWriter};
use pf_02_feed_stream::{
    select_most_recent, EnrichedPost, FeedStreamApi, StreamAssembler, StreamConfig,
    FEED_PAGE_LIMIT,
};
use shared_types::{PostId, PostTimestamp, UserId};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// PF-02: Recency ordering
// ============================================================================

fn candidates(count: u64) -> Vec<EnrichedPost> {
    (0..count)
        .map(|i| {
            // Spread over a few days with frequent timestamp collisions
            let day = 1 + (i * 7919) % 28;
            let minute = (i * 104_729) % 1440;
            let created = PostTimestamp::parse(
                &format!("2024-02-{:02}", day),
                &format!("{:02}:{:02}", minute / 60, minute % 60),
            )
            .expect("valid benchmark timestamp");
            EnrichedPost {
                post: PostId(i + 1),
                author: UserId(1 + i % 10),
                author_username: format!("user{}", i % 10),
                created,
                likes: BTreeSet::new(),
                comments: Vec::new(),
            }
        })
        .collect()
}

fn bench_select_most_recent(c: &mut Criterion) {
    let mut group = c.benchmark_group("pf-02-select-most-recent");

    for size in [100u64, 1_000, 10_000] {
        let input = candidates(size);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter_batched(
                || input.clone(),
                |items| black_box(select_most_recent(items, FEED_PAGE_LIMIT)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

// ============================================================================
// PF-02: Stream assembly
// ============================================================================

fn bench_user_stream(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");

    let mut group = c.benchmark_group("pf-02-user-stream");
    group.measurement_time(Duration::from_secs(10));

    for per_author in [10u32, 50, 200] {
        let store = Arc::new(InMemoryPostStore::new());
        let reader = runtime
            .block_on(async {
                let names: Vec<String> = (0..=10).map(|i| format!("user{}", i)).collect();
                let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                let users = seed_users(store.as_ref(), &refs).await?;
                for author in &users[1..] {
                    store.follow(users[0], *author).await?;
                    let posts = seed_posts(store.as_ref(), *author, "2024-01-01", per_author).await?;
                    for post in posts.iter().step_by(3) {
                        store.like(*post, users[0]).await?;
                        store.comment(*post, users[0], "nice").await?;
                    }
                }
                Ok::<_, pf_01_post_store::StoreError>(users[0])
            })
            .expect("seeded store");

        let assembler = StreamAssembler::new(Arc::clone(&store), &StreamConfig::default());
        group.throughput(Throughput::Elements(u64::from(per_author) * 10));
        group.bench_with_input(
            BenchmarkId::from_parameter(per_author * 10),
            &reader,
            |b, reader| {
                b.to_async(&runtime)
                    .iter(|| async { black_box(assembler.user_stream(*reader).await.is_ok()) })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_select_most_recent, bench_user_stream);
criterion_main!(benches);
