//! Typed calculator client.

use crate::error::CalcError;
use crate::packets::{self, CalcMean, CalcMeanType, CalcSum, RpcError, RpcResult};
use bluepacket_client::{ClientConfig, RpcClient};
use bluepacket_protocol::Packet;
use std::sync::Arc;

/// Calculator client.
///
/// Unwraps `RpcResult` responses into their value and turns `RpcError`
/// responses into [`CalcError::Rpc`].
#[derive(Debug, Clone)]
pub struct CalcClient {
    rpc: RpcClient,
}

impl CalcClient {
    pub fn new(config: ClientConfig) -> Result<Self, CalcError> {
        let registry = Arc::new(packets::registry()?);
        Ok(Self {
            rpc: RpcClient::new(config, registry),
        })
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Sum of `values`.
    pub async fn sum(&self, values: &[f32]) -> Result<f32, CalcError> {
        self.exec(&CalcSum::new(values)).await
    }

    /// Mean of `values` of the given kind.
    pub async fn mean(&self, kind: CalcMeanType, values: &[f32]) -> Result<f32, CalcError> {
        self.exec(&CalcMean::new(kind, values)).await
    }

    async fn exec(&self, request: &dyn Packet) -> Result<f32, CalcError> {
        let response = self.rpc.send(request).await?;
        if let Some(result) = response.downcast_ref::<RpcResult>() {
            return Ok(result.value);
        }
        if let Some(error) = response.downcast_ref::<RpcError>() {
            return Err(CalcError::Rpc(error.message.clone()));
        }
        Err(CalcError::UnexpectedResponse(response.packet_name()))
    }
}
