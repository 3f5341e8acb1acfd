use {
    crate::error::EngineError,
    ethers::{
        providers::{
            Http,
            Middleware,
            Provider,
            ProviderError,
            Ws,
        },
        types::U256,
    },
    std::sync::Arc,
    url::Url,
};

/// Connection to the node. Only websocket endpoints carry subscriptions,
/// over http the mirror runs without block and event notifications.
#[derive(Clone, Debug)]
pub enum RpcProvider {
    Ws(Arc<Provider<Ws>>),
    Http(Arc<Provider<Http>>),
}

pub fn parse_rpc_addr(addr: &str) -> Result<Url, EngineError> {
    let url = Url::parse(addr).map_err(|err| {
        EngineError::ConnectionUnavailable(format!("invalid rpc address({addr}): {:?}", err))
    })?;
    match url.scheme() {
        "ws" | "wss" | "http" | "https" => Ok(url),
        scheme => Err(EngineError::ConnectionUnavailable(format!(
            "rpc address({addr}) uses unsupported scheme {scheme}"
        ))),
    }
}

impl RpcProvider {
    pub async fn connect(addr: &str) -> Result<Self, EngineError> {
        let url = parse_rpc_addr(addr)?;
        match url.scheme() {
            "ws" | "wss" => {
                let provider = Provider::<Ws>::connect(url.as_str())
                    .await
                    .map_err(|err| EngineError::ConnectionUnavailable(err.to_string()))?;
                Ok(RpcProvider::Ws(Arc::new(provider)))
            }
            _ => {
                tracing::warn!(
                    rpc_addr = addr,
                    "Http endpoint has no subscriptions, block counter and event refreshes are disabled"
                );
                Ok(RpcProvider::Http(Arc::new(Provider::new(Http::new(url)))))
            }
        }
    }

    pub async fn chain_id(&self) -> Result<U256, ProviderError> {
        match self {
            RpcProvider::Ws(provider) => provider.get_chainid().await,
            RpcProvider::Http(provider) => provider.get_chainid().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rpc_addr() {
        assert!(parse_rpc_addr("ws://127.0.0.1:8545").is_ok());
        assert!(parse_rpc_addr("wss://rpc.example.org/v1").is_ok());
        assert!(parse_rpc_addr("http://127.0.0.1:8545").is_ok());
        assert!(parse_rpc_addr("https://rpc.example.org").is_ok());
        assert!(matches!(
            parse_rpc_addr("ftp://127.0.0.1"),
            Err(EngineError::ConnectionUnavailable(_))
        ));
        assert!(parse_rpc_addr("not a url").is_err());
    }

    #[tokio::test]
    async fn test_http_endpoint_connects_without_network() {
        let provider = RpcProvider::connect("http://127.0.0.1:8545")
            .await
            .unwrap();
        assert!(matches!(provider, RpcProvider::Http(_)));
    }
}
