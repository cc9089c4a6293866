use std::future::Future;

use bytes::Bytes;
use http::{Request, Response};

use crate::effects::body::ResponseBody;

/// Asynchronous HTTP client abstraction.
///
/// Performs one exchange and returns the response with its body still
/// unread. Redirects, retries and authentication are the implementation's
/// business.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - [`MeteredClient`](crate::MeteredClient): measuring wrapper around any other client
pub trait HttpClient: Send + Sync {
    /// Error type for failed exchanges.
    type Error: std::error::Error + Send + Sync + 'static;

    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<ResponseBody>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_client {
    use super::*;
    use crate::effects::body::BodyMetadata;
    use reqwest::Client;

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: Client,
    }

    impl ReqwestClient {
        pub fn new() -> Result<Self, reqwest::Error> {
            let client = Client::builder().build()?;
            Ok(Self { client })
        }

        /// Wrap an already configured client.
        pub fn with_client(client: Client) -> Self { Self { client } }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn execute(
            &self,
            request: Request<Bytes>,
        ) -> Result<Response<ResponseBody>, Self::Error> {
            let request = reqwest::Request::try_from(request)?;
            let response = self.client.execute(request).await?;

            let status = response.status();
            let version = response.version();
            let headers = response.headers().clone();
            let metadata = BodyMetadata::from_headers(&headers);

            let body = ResponseBody::from_stream(metadata, response.bytes_stream());
            let mut converted = Response::new(body);
            *converted.status_mut() = status;
            *converted.version_mut() = version;
            *converted.headers_mut() = headers;
            Ok(converted)
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestClient;
