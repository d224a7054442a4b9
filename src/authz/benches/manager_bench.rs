//! Hot-path benchmark: engine lookup after construction

use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use domainguard_authz::adapter::{MemoryAdapter, PolicyRule};
use domainguard_authz::engine::MatcherEngineFactory;
use domainguard_authz::manager::{DomainConfig, EnforcerManager};

const MODEL: &str = r#"
[request_definition]
r = sub, obj, act

[policy_definition]
p = sub, obj, act

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = r.sub == p.sub && r.obj == p.obj && r.act == p.act
"#;

fn bench_get_or_create_hit(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let manager = runtime.block_on(async {
        let adapter = Arc::new(MemoryAdapter::with_rules(vec![PolicyRule::new(
            "p",
            ["alice", "data1", "read"],
        )]));
        let manager =
            EnforcerManager::new(adapter, MatcherEngineFactory::new_shared(), "default");
        manager
            .set_config("default", DomainConfig::from_text(MODEL))
            .await
            .unwrap();
        manager.get_default().await.unwrap();
        manager
    });

    c.bench_function("get_or_create_hit", |b| {
        b.to_async(&runtime)
            .iter(|| async { manager.get_or_create("default").await.unwrap() });
    });

    c.bench_function("enforce_after_hit", |b| {
        b.to_async(&runtime).iter(|| async {
            let engine = manager.get_or_create("default").await.unwrap();
            engine.enforce("alice", "data1", "read").await.unwrap()
        });
    });
}

criterion_group!(benches, bench_get_or_create_hit);
criterion_main!(benches);
