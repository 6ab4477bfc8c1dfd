//! End-to-end client-server benchmarks.

use bluepacket_calc::{packets, service, CalcClient, CalcMeanType};
use bluepacket_client::ClientConfig;
use bluepacket_server::{Server, ServerConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

struct TestSetup {
    _server: Arc<Server>,
    client: CalcClient,
}

fn setup_server_and_client(rt: &Runtime, workers: usize) -> TestSetup {
    let config = ServerConfig::new("127.0.0.1:0".parse().unwrap()).with_workers(workers);
    let server = Arc::new(service::server(
        config,
        Arc::new(packets::registry().unwrap()),
    ));

    let listener = rt.block_on(async { server.bind().unwrap() });
    let addr = listener.local_addr().unwrap();

    // Start server
    let serving = server.clone();
    rt.spawn(async move {
        let _ = serving.serve(listener).await;
    });

    let client_config = ClientConfig::new(addr.ip().to_string(), addr.port())
        .with_read_timeout(Duration::from_secs(5));
    let client = CalcClient::new(client_config).unwrap();

    TestSetup {
        _server: server,
        client,
    }
}

fn bench_sum_latency(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let setup = setup_server_and_client(&rt, 4);
    let values = [1.0, 2.0, 3.0, 4.0];

    let mut group = c.benchmark_group("rpc_sum");
    group.throughput(Throughput::Elements(1));

    group.bench_function("sum", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(setup.client.sum(&values).await.unwrap()) });
    });

    group.finish();
}

fn bench_concurrent_means(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let setup = setup_server_and_client(&rt, 10);
    let values: Vec<f32> = (1..=100).map(|i| i as f32).collect();

    let mut group = c.benchmark_group("rpc_concurrent_mean");

    for concurrency in [1, 8, 32] {
        group.throughput(Throughput::Elements(concurrency as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(concurrency),
            &concurrency,
            |b, &concurrency| {
                b.to_async(&rt).iter(|| {
                    let client = setup.client.clone();
                    let values = values.clone();
                    async move {
                        let mut tasks = tokio::task::JoinSet::new();
                        for _ in 0..concurrency {
                            let client = client.clone();
                            let values = values.clone();
                            tasks.spawn(async move {
                                client.mean(CalcMeanType::Harmonic, &values).await
                            });
                        }
                        while let Some(result) = tasks.join_next().await {
                            black_box(result.unwrap().unwrap());
                        }
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sum_latency, bench_concurrent_means);

criterion_main!(benches);
