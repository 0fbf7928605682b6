use crate::AuthValidator;
use jsonrpsee_http_client::{HttpRequest, HttpResponse};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower::{Layer, Service};

/// A tower layer that refuses requests failing header validation before they
/// reach RPC dispatch.
#[derive(Debug, Clone)]
pub struct AuthLayer<V> {
    validator: V,
}

impl<V: AuthValidator> AuthLayer<V> {
    /// Creates the layer around the given validator.
    pub fn new(validator: V) -> Self {
        Self { validator }
    }
}

impl<S, V: AuthValidator + Clone> Layer<S> for AuthLayer<V> {
    type Service = AuthService<S, V>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService { validator: self.validator.clone(), inner }
    }
}

/// The service produced by [`AuthLayer`].
#[derive(Debug, Clone)]
pub struct AuthService<S, V> {
    validator: V,
    inner: S,
}

impl<S, V> Service<HttpRequest> for AuthService<S, V>
where
    S: Service<HttpRequest, Response = HttpResponse>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    V: AuthValidator,
{
    type Response = HttpResponse;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: HttpRequest) -> Self::Future {
        match self.validator.validate(request.headers()) {
            Ok(()) => {
                let fut = self.inner.call(request);
                Box::pin(fut)
            }
            Err(response) => Box::pin(std::future::ready(Ok(response))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Claims, JwtAuthValidator, JwtSecret};
    use http::{header, StatusCode};
    use jsonrpsee_http_client::HttpBody;
    use std::convert::Infallible;

    #[derive(Clone)]
    struct OkService;

    impl Service<HttpRequest> for OkService {
        type Response = HttpResponse;
        type Error = Infallible;
        type Future = std::future::Ready<Result<Self::Response, Self::Error>>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _: HttpRequest) -> Self::Future {
            std::future::ready(Ok(HttpResponse::new(HttpBody::from("ok"))))
        }
    }

    #[tokio::test]
    async fn passes_authenticated_requests_through() {
        let secret = JwtSecret::random();
        let iat = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let jwt = secret.encode(&Claims { iat, exp: None }).unwrap();
        let mut service = AuthLayer::new(JwtAuthValidator::new(secret)).layer(OkService);

        let request = HttpRequest::builder()
            .header(header::AUTHORIZATION, format!("Bearer {jwt}"))
            .body(HttpBody::empty())
            .unwrap();
        let response = service.call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn refuses_unauthenticated_requests() {
        let mut service =
            AuthLayer::new(JwtAuthValidator::new(JwtSecret::random())).layer(OkService);

        let request = HttpRequest::builder().body(HttpBody::empty()).unwrap();
        let response = service.call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
