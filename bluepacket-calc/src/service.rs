//! Server side of the calculator: handlers and error mapper.

use crate::packets::{CalcMean, CalcMeanType, CalcSum, RpcError, RpcResult};
use bluepacket_protocol::{Packet, PacketRegistry};
use bluepacket_server::{HandlerError, Server, ServerBuilder, ServerConfig, ServerError};
use std::sync::Arc;

/// Builder with the calculator handlers and error mapper installed.
pub fn builder(config: ServerConfig, registry: Arc<PacketRegistry>) -> ServerBuilder {
    Server::builder(config, registry)
        .on_receive(calculate_sum)
        .on_receive(calculate_mean)
        .on_error(map_error)
}

/// Calculator server ready to run.
pub fn server(config: ServerConfig, registry: Arc<PacketRegistry>) -> Server {
    builder(config, registry).build()
}

pub fn calculate_sum(request: CalcSum) -> Result<RpcResult, HandlerError> {
    Ok(RpcResult::new(sum(&request.values)))
}

pub fn calculate_mean(request: CalcMean) -> Result<RpcResult, HandlerError> {
    if request.values.is_empty() {
        return Err("No values provided".into());
    }
    let value = match request.r#type {
        CalcMeanType::Arithmetic => arithmetic(&request.values),
        CalcMeanType::Geometric => geometric(&request.values),
        CalcMeanType::Harmonic => harmonic(&request.values),
    };
    Ok(RpcResult::new(value))
}

/// Answers every error with an `RpcError` carrying its message.
pub fn map_error(error: &ServerError) -> Option<Box<dyn Packet>> {
    tracing::debug!("Mapping {} error: {}", error.kind(), error);
    Some(Box::new(RpcError::new(error.to_string())))
}

fn sum(values: &[f32]) -> f32 {
    values.iter().sum()
}

fn arithmetic(values: &[f32]) -> f32 {
    sum(values) / values.len() as f32
}

fn geometric(values: &[f32]) -> f32 {
    let product: f64 = values.iter().map(|&v| f64::from(v)).product();
    product.powf(1.0 / values.len() as f64) as f32
}

fn harmonic(values: &[f32]) -> f32 {
    let reciprocals: f32 = values.iter().map(|v| 1.0 / v).sum();
    values.len() as f32 / reciprocals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packets::registry;
    use bluepacket_client::{ClientConfig, RpcClient};
    use std::time::Duration;

    const SAMPLE: [f32; 5] = [4.0, 36.0, 45.0, 50.0, 75.0];

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_sum() {
        assert_eq!(calculate_sum(CalcSum::new([1.0, 2.0, 3.0, 4.0])).unwrap().value, 10.0);
        assert_eq!(calculate_sum(CalcSum::default()).unwrap().value, 0.0);
    }

    #[test]
    fn test_means() {
        let mean = |kind| calculate_mean(CalcMean::new(kind, SAMPLE)).unwrap().value;
        assert_close(mean(CalcMeanType::Arithmetic), 42.0);
        assert_close(mean(CalcMeanType::Geometric), 30.0);
        assert_close(mean(CalcMeanType::Harmonic), 15.0);
    }

    #[test]
    fn test_mean_of_nothing() {
        let err = calculate_mean(CalcMean::new(CalcMeanType::Harmonic, vec![])).unwrap_err();
        assert_eq!(err.to_string(), "No values provided");
    }

    #[test]
    fn test_error_mapper() {
        let packet = map_error(&ServerError::HandlerFailed("No values provided".into())).unwrap();
        assert_eq!(
            packet.downcast_ref::<RpcError>(),
            Some(&RpcError::new("No values provided"))
        );
    }

    async fn start(server: Server) -> (Arc<Server>, u16) {
        let server = Arc::new(server);
        let listener = server.bind().unwrap();
        let port = listener.local_addr().unwrap().port();
        let serving = server.clone();
        tokio::spawn(async move { serving.serve(listener).await });
        (server, port)
    }

    fn config() -> ServerConfig {
        ServerConfig::new("127.0.0.1:0".parse().unwrap()).with_workers(2)
    }

    fn rpc_client(port: u16) -> RpcClient {
        let config = ClientConfig::new("127.0.0.1", port).with_read_timeout(Duration::from_secs(2));
        RpcClient::new(config, Arc::new(registry().unwrap()))
    }

    #[tokio::test]
    async fn test_sum_over_rpc() {
        let (server, port) = start(server(config(), Arc::new(registry().unwrap()))).await;

        let result: RpcResult = rpc_client(port)
            .call(&CalcSum::new([1.0, 2.0, 3.0, 4.0]))
            .await
            .unwrap();
        assert_eq!(result, RpcResult::new(10.0));
        server.shutdown();
    }

    #[tokio::test]
    async fn test_handler_failure_over_rpc() {
        let (server, port) = start(server(config(), Arc::new(registry().unwrap()))).await;

        let error: RpcError = rpc_client(port)
            .call(&CalcMean::new(CalcMeanType::Geometric, vec![]))
            .await
            .unwrap();
        assert_eq!(error.message, "No values provided");
        server.shutdown();
    }

    #[tokio::test]
    async fn test_missing_handler_over_rpc() {
        let registry = Arc::new(registry().unwrap());
        let bare = Server::builder(config(), registry).on_error(map_error).build();
        let (server, port) = start(bare).await;

        let error: RpcError = rpc_client(port)
            .call(&CalcSum::new([1.0, 2.0]))
            .await
            .unwrap();
        assert!(!error.message.is_empty());
        assert!(error.message.contains("CalcSum"));
        server.shutdown();
    }
}
