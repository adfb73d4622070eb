//! 게임 클라이언트(호스트)로 보내는 알림
//!
//! 알림은 최선 노력 방식이다. 재시도하지 않고, 실패는 로그만 남긴다.

use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use serde_json::{json, Value};

use super::fetcher::FetchState;

/// 호스트 알림
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    ClosePanel,
    ConnectionResult {
        success: bool,
        message: String,
        is_manual_check: bool,
    },
    /// 조회 상태 변화
    FetchStatus(FetchState),
}

impl HostEvent {
    /// 호스트 콜백 이름
    pub fn endpoint(&self) -> &'static str {
        match self {
            HostEvent::ClosePanel => "closePanel",
            HostEvent::ConnectionResult { .. } => "expressConnectionResult",
            HostEvent::FetchStatus(_) => "fetchStatus",
        }
    }

    pub fn body(&self) -> Value {
        match self {
            HostEvent::ClosePanel => json!({}),
            HostEvent::ConnectionResult {
                success,
                message,
                is_manual_check,
            } => json!({
                "success": success,
                "message": message,
                "isManualCheck": is_manual_check,
            }),
            HostEvent::FetchStatus(state) => json!({
                "state": state.label(),
                "attempt": state.attempt(),
                "message": state.message(),
            }),
        }
    }
}

/// 알림 포트
///
/// 호출 측을 막지 않아야 하며 실패를 돌려주지 않는다.
pub trait HostNotifier: Send + Sync {
    fn notify(&self, event: HostEvent);
}

/// 알림을 버리는 구현 (호스트 없이 실행할 때)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl HostNotifier for NoopNotifier {
    fn notify(&self, event: HostEvent) {
        debug!("호스트 알림 생략: {}", event.endpoint());
    }
}

/// `https://{resource}/{endpoint}`로 POST 하는 구현
#[derive(Debug, Clone)]
pub struct HttpHostNotifier {
    http: Client,
    resource: String,
    timeout: Duration,
}

impl HttpHostNotifier {
    pub fn new(http: Client, resource: impl Into<String>) -> Self {
        Self {
            http,
            resource: resource.into(),
            timeout: Duration::from_millis(1500),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url_for(&self, event: &HostEvent) -> String {
        format!("https://{}/{}", self.resource, event.endpoint())
    }
}

impl HostNotifier for HttpHostNotifier {
    fn notify(&self, event: HostEvent) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("런타임이 없어 호스트 알림을 보내지 못했습니다: {}", event.endpoint());
                return;
            }
        };

        let request = self
            .http
            .post(self.url_for(&event))
            .timeout(self.timeout)
            .json(&event.body());
        let endpoint = event.endpoint();

        handle.spawn(async move {
            if let Err(e) = request.send().await {
                warn!("호스트 알림 실패 ({}): {}", endpoint, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_result_body() {
        let event = HostEvent::ConnectionResult {
            success: false,
            message: "falhou".into(),
            is_manual_check: true,
        };
        assert_eq!(event.endpoint(), "expressConnectionResult");
        assert_eq!(
            event.body(),
            json!({"success": false, "message": "falhou", "isManualCheck": true})
        );
    }

    #[test]
    fn test_notifier_url() {
        let notifier = HttpHostNotifier::new(Client::new(), "thug");
        assert_eq!(notifier.url_for(&HostEvent::ClosePanel), "https://thug/closePanel");
    }

    #[test]
    fn test_notify_without_runtime_is_silent() {
        let notifier = HttpHostNotifier::new(Client::new(), "thug");
        notifier.notify(HostEvent::ClosePanel);
    }

    #[tokio::test]
    async fn test_notify_failure_is_swallowed() {
        let notifier = HttpHostNotifier::new(Client::new(), "127.0.0.1:1")
            .with_timeout(Duration::from_millis(50));
        notifier.notify(HostEvent::FetchStatus(FetchState::Idle));
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
