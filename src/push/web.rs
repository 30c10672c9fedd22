use super::{PermissionState, PushError, PushMessage, PushProvider, SERVICE_WORKER_PATH};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{MessageEvent, ServiceWorkerContainer, ServiceWorkerRegistration};

fn describe(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

/// Push API provider for the browser.
#[derive(Clone, Debug)]
pub struct WebPushProvider {
    worker_path: String,
    vapid_key: Option<String>,
}

impl WebPushProvider {
    pub fn new(vapid_key: Option<String>) -> Self {
        Self {
            worker_path: SERVICE_WORKER_PATH.to_string(),
            vapid_key,
        }
    }

    fn container(&self) -> Result<ServiceWorkerContainer, PushError> {
        let window =
            web_sys::window().ok_or_else(|| PushError::Unsupported("no window".to_string()))?;
        Ok(window.navigator().service_worker())
    }

    /// Calls `on_message` for every push the worker forwards while a page is
    /// open. Replaces any earlier listener.
    pub fn listen_for_messages(&self, on_message: impl Fn(PushMessage) + 'static) -> Result<(), PushError> {
        let handler = Closure::<dyn Fn(MessageEvent)>::new(move |event: MessageEvent| {
            let raw = js_sys::JSON::stringify(&event.data())
                .ok()
                .and_then(|s| s.as_string());
            if let Some(message) = raw.as_deref().and_then(PushMessage::from_worker_json) {
                on_message(message);
            }
        });
        self.container()?
            .set_onmessage(Some(handler.as_ref().unchecked_ref()));
        handler.forget();
        Ok(())
    }

    fn subscribe_options(&self) -> Result<web_sys::PushSubscriptionOptionsInit, PushError> {
        let options = web_sys::PushSubscriptionOptionsInit::new();
        let set = |key: &str, value: &JsValue| {
            js_sys::Reflect::set(&options, &key.into(), value)
                .map(|_| ())
                .map_err(|e| PushError::Token(describe(e)))
        };
        set("userVisibleOnly", &JsValue::TRUE)?;

        if let Some(key) = self.vapid_key.as_deref() {
            let bytes = URL_SAFE_NO_PAD
                .decode(key.trim().trim_end_matches('='))
                .map_err(|e| PushError::Token(format!("invalid VAPID key: {e}")))?;
            set(
                "applicationServerKey",
                &js_sys::Uint8Array::from(bytes.as_slice()).into(),
            )?;
        }
        Ok(options)
    }
}

#[async_trait(?Send)]
impl PushProvider for WebPushProvider {
    type Registration = ServiceWorkerRegistration;

    async fn register_worker(&self) -> Result<ServiceWorkerRegistration, PushError> {
        let promise = self.container()?.register(&self.worker_path);
        JsFuture::from(promise)
            .await
            .map_err(|e| PushError::Registration(describe(e)))?
            .dyn_into::<ServiceWorkerRegistration>()
            .map_err(|e| PushError::Registration(describe(e)))
    }

    async fn wait_until_active(&self, registration: &ServiceWorkerRegistration) -> Result<(), PushError> {
        if registration.active().is_some() {
            return Ok(());
        }
        let ready = self
            .container()?
            .ready()
            .map_err(|e| PushError::Activation(describe(e)))?;
        JsFuture::from(ready)
            .await
            .map(|_| ())
            .map_err(|e| PushError::Activation(describe(e)))
    }

    async fn request_permission(&self) -> Result<PermissionState, PushError> {
        let promise = web_sys::Notification::request_permission()
            .map_err(|e| PushError::Permission(describe(e)))?;
        let answer = JsFuture::from(promise)
            .await
            .map_err(|e| PushError::Permission(describe(e)))?;
        Ok(match answer.as_string().as_deref() {
            Some("granted") => PermissionState::Granted,
            Some("denied") => PermissionState::Denied,
            _ => PermissionState::NotDetermined,
        })
    }

    /// The serialized push subscription is the delivery token.
    async fn obtain_token(
        &self,
        registration: &ServiceWorkerRegistration,
    ) -> Result<Option<String>, PushError> {
        let manager = registration
            .push_manager()
            .map_err(|e| PushError::Unsupported(describe(e)))?;
        let options = self.subscribe_options()?;
        let promise = manager
            .subscribe_with_options(&options)
            .map_err(|e| PushError::Token(describe(e)))?;
        let subscription = JsFuture::from(promise)
            .await
            .map_err(|e| PushError::Token(describe(e)))?;
        if subscription.is_null() || subscription.is_undefined() {
            return Ok(None);
        }
        let json = js_sys::JSON::stringify(&subscription).map_err(|e| PushError::Token(describe(e)))?;
        Ok(json.as_string().filter(|s| !s.is_empty() && s != "null"))
    }
}
