use async_trait::async_trait;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Request, RequestInit, RequestMode, Response};

use crate::api::{HttpRequest, HttpResponse, Transport, TransportError};

/// [`Transport`] over the browser's `fetch`.
pub struct FetchTransport;

fn describe(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = &request.body {
            opts.set_body(&JsValue::from_str(body.as_str()));
        }

        let js_request = Request::new_with_str_and_init(&request.url, &opts)
            .map_err(|e| TransportError(format!("failed to create request: {}", describe(e))))?;
        for (name, value) in &request.headers {
            js_request
                .headers()
                .set(name, value)
                .map_err(|e| TransportError(format!("failed to set header {}: {}", name, describe(e))))?;
        }

        let window = window().ok_or_else(|| TransportError("no window".into()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&js_request))
            .await
            .map_err(|e| TransportError(describe(e)))?
            .dyn_into()
            .map_err(|_| TransportError("fetch did not return a Response".into()))?;

        let text_promise = response
            .text()
            .map_err(|e| TransportError(format!("failed to read response: {}", describe(e))))?;
        let body = JsFuture::from(text_promise)
            .await
            .map_err(|e| TransportError(format!("failed to read response: {}", describe(e))))?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse { status: response.status(), body })
    }
}
