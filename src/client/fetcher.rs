//! 패널 데이터 조회 세션
//!
//! 패널이 열려 있는 동안 현재 job, 작업 데이터, 활성 서버 주소를 보관한다.
//! 조회 주기는 순차적이다: 주소 탐색이 끝난 뒤에 데이터 요청을 보낸다.
//!
//! 재시도 정책: 최대 `max_attempts`회, 전송 실패 시 `backoff_base * 2^(시도-1)` 대기.
//! 연결 불가 오류는 주기당 한 번 주소 재탐색을 일으키고, 재탐색이 성공하면
//! 그 시도는 횟수에 넣지 않는다.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use log::{debug, error, info, warn};
use reqwest::Client;
use serde::Deserialize;

use super::discovery::{check_health, endpoint, normalize_base, UrlDiscovery};
use super::error::FetchError;
use super::locale::{FailureKind, Locale};
use super::notifier::{HostEvent, HostNotifier};
use super::view::{DateWindow, PanelView};
use crate::api::models::FetchEntriesRequest;
use crate::ledger::LedgerEntryView;

/// 데이터 조회 경로
pub const DATA_PATH: &str = "api/laundry/data";

/// 조회 상태
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Idle,
    Loading { attempt: u32 },
    Success,
    Failed { kind: FailureKind, message: String },
}

impl FetchState {
    pub fn label(&self) -> &'static str {
        match self {
            FetchState::Idle => "idle",
            FetchState::Loading { .. } => "loading",
            FetchState::Success => "success",
            FetchState::Failed { .. } => "failed",
        }
    }

    pub fn attempt(&self) -> Option<u32> {
        match self {
            FetchState::Loading { attempt } => Some(*attempt),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            FetchState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// 조회 세션 설정
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// 후보 서버 주소 (첫 번째가 초기 활성 주소)
    pub candidates: Vec<String>,
    /// 패널 열기 및 연결 실패 시 주소 탐색 여부
    pub discovery_enabled: bool,
    pub probe_timeout: Duration,
    /// 데이터 요청 전에 헬스체크를 한 번 더 할지
    pub health_precheck: bool,
    pub precheck_timeout: Duration,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub locale: Locale,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            candidates: vec!["http://127.0.0.1:8000".into()],
            discovery_enabled: false,
            probe_timeout: Duration::from_secs(1),
            health_precheck: false,
            precheck_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(5),
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            locale: Locale::default(),
        }
    }
}

impl FetcherConfig {
    /// 게임 내 패널: 고정 주소 하나
    pub fn in_game(base_url: impl Into<String>) -> Self {
        Self {
            candidates: vec![base_url.into()],
            ..Default::default()
        }
    }

    /// 단독 실행 패널: 후보 탐색 + 사전 헬스체크
    pub fn standalone<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            discovery_enabled: true,
            health_precheck: true,
            ..Default::default()
        }
    }

    /// 실패한 `attempt`번째 시도 뒤의 대기 시간
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.backoff_base.saturating_mul(1u32 << exponent)
    }
}

#[derive(Debug, Deserialize)]
struct DataResponse {
    success: bool,
    #[serde(default)]
    data: Option<Vec<LedgerEntryView>>,
    #[serde(default)]
    message: Option<String>,
}

/// 패널 한 번의 수명 동안 쓰는 조회 세션
pub struct PanelSession {
    config: FetcherConfig,
    http: Client,
    discovery: UrlDiscovery,
    notifier: Arc<dyn HostNotifier>,
    current_job: Option<String>,
    active_url: String,
    entries: Vec<LedgerEntryView>,
    state: FetchState,
    is_open: bool,
}

impl PanelSession {
    pub fn new(config: FetcherConfig, notifier: Arc<dyn HostNotifier>) -> Result<Self, FetchError> {
        let http = Client::builder().build()?;
        Self::with_client(config, http, notifier)
    }

    pub fn with_client(
        config: FetcherConfig,
        http: Client,
        notifier: Arc<dyn HostNotifier>,
    ) -> Result<Self, FetchError> {
        let discovery = UrlDiscovery::new(&config.candidates, config.probe_timeout);
        let active_url = discovery
            .candidates()
            .first()
            .cloned()
            .ok_or_else(|| FetchError::InvalidUrl("nenhum endereço candidato".into()))?;
        // 설정 단계에서 잘못된 주소를 걸러낸다
        endpoint(&active_url, DATA_PATH)?;

        Ok(Self {
            config,
            http,
            discovery,
            notifier,
            current_job: None,
            active_url,
            entries: Vec::new(),
            state: FetchState::Idle,
            is_open: false,
        })
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn entries(&self) -> &[LedgerEntryView] {
        &self.entries
    }

    pub fn active_url(&self) -> &str {
        &self.active_url
    }

    pub fn current_job(&self) -> Option<&str> {
        self.current_job.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// 패널 열기: (설정 시) 주소 탐색 후 데이터 조회
    pub async fn open_panel(&mut self, job: impl Into<String>) -> &FetchState {
        self.is_open = true;
        self.current_job = Some(job.into());
        self.set_state(FetchState::Loading { attempt: 1 });

        if self.config.discovery_enabled {
            // 탐색이 실패해도 현재 주소로 조회는 진행한다
            let found = self.rediscover().await;
            info!(
                "패널 초기화: 주소 탐색 {}, 사용 주소 {}",
                if found { "성공" } else { "실패" },
                self.active_url
            );
        }

        self.fetch().await
    }

    /// 패널 닫기
    pub fn close_panel(&mut self) {
        self.is_open = false;
        self.set_state(FetchState::Idle);
        self.notifier.notify(HostEvent::ClosePanel);
    }

    /// 수동 새로고침
    pub async fn refresh(&mut self) -> &FetchState {
        self.fetch().await
    }

    /// 재시도 포함 데이터 조회 한 주기
    pub async fn fetch(&mut self) -> &FetchState {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;
        let mut rediscovered = false;
        let mut discovery_failed = false;

        loop {
            attempt += 1;
            self.set_state(FetchState::Loading { attempt });

            let err = match self.request_once().await {
                Ok(entries) => {
                    info!("세탁 기록 {}건 수신 ({})", entries.len(), self.active_url);
                    self.entries = entries;
                    self.set_state(FetchState::Success);
                    return &self.state;
                }
                Err(FetchError::Application(message)) => {
                    warn!("서버가 실패를 반환했습니다: {}", message);
                    self.set_state(FetchState::Failed {
                        kind: FailureKind::Application,
                        message,
                    });
                    return &self.state;
                }
                Err(err) => err,
            };

            warn!("시도 {}/{} 실패: {}", attempt, max_attempts, err);

            if err.is_unreachable() && self.config.discovery_enabled && !rediscovered {
                rediscovered = true;
                if self.rediscover().await {
                    info!("대체 주소로 재연결합니다: {}", self.active_url);
                    attempt -= 1;
                    continue;
                }
                discovery_failed = true;
            }

            if attempt >= max_attempts {
                let message = if err.is_unreachable() && discovery_failed {
                    self.config.locale.all_candidates_failed()
                } else {
                    self.config
                        .locale
                        .failure_message(err.failure_kind(), &self.active_url)
                };
                error!("재시도 소진: {}", message);

                self.notifier.notify(HostEvent::ConnectionResult {
                    success: false,
                    message: message.clone(),
                    is_manual_check: false,
                });
                self.set_state(FetchState::Failed {
                    kind: err.failure_kind(),
                    message,
                });
                return &self.state;
            }

            let wait = self.config.backoff(attempt);
            debug!("{}ms 후 재시도", wait.as_millis());
            tokio::time::sleep(wait).await;
        }
    }

    /// 연결 상태 확인
    ///
    /// `base_url`이 주어지면 그 주소만, 아니면 현재 주소를 확인한다. 수동 확인이
    /// 실패하면 후보 주소를 다시 탐색한다.
    pub async fn check_connection(&mut self, base_url: Option<&str>, is_manual_check: bool) -> bool {
        let target = base_url
            .map(normalize_base)
            .unwrap_or_else(|| self.active_url.clone());

        match check_health(&self.http, &target, self.config.precheck_timeout).await {
            Ok(health) => {
                let message = self.config.locale.online_since(&health.server_time);
                self.notify_connection(true, message, is_manual_check);
                return true;
            }
            Err(e) => warn!("연결 확인 실패 ({}): {}", target, e),
        }

        if base_url.is_none() && is_manual_check {
            if self.rediscover().await {
                let message = self.config.locale.reconnected(&self.active_url);
                self.notify_connection(true, message, is_manual_check);
                return true;
            }
            let message = self.config.locale.all_candidates_failed();
            self.notify_connection(false, message, is_manual_check);
        } else {
            let message = self.config.locale.connection_failed(&target);
            self.notify_connection(false, message, is_manual_check);
        }
        false
    }

    /// 현재 작업 데이터에 필터 적용
    pub fn view(&self, job_filter: &str, window: DateWindow) -> PanelView {
        PanelView::build(&self.entries, job_filter, window, &Local::now())
    }

    async fn request_once(&self) -> Result<Vec<LedgerEntryView>, FetchError> {
        if self.config.health_precheck {
            match check_health(&self.http, &self.active_url, self.config.precheck_timeout).await {
                Ok(health) => self.notify_connection(
                    true,
                    self.config.locale.online_since(&health.server_time),
                    false,
                ),
                Err(e) => {
                    let message = self
                        .config
                        .locale
                        .failure_message(e.failure_kind(), &self.active_url);
                    self.notify_connection(false, message, false);
                    return Err(e);
                }
            }
        }

        let url = endpoint(&self.active_url, DATA_PATH)?;
        debug!("데이터 요청: {} (job {:?})", url, self.current_job);

        let response = self
            .http
            .post(url)
            .timeout(self.config.request_timeout)
            .json(&FetchEntriesRequest {
                job: self.current_job.clone(),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // success:false 본문은 상태 코드와 관계없이 서버 메시지로 처리
        match serde_json::from_str::<DataResponse>(&body) {
            Ok(parsed) if parsed.success => Ok(parsed.data.unwrap_or_default()),
            Ok(parsed) => Err(FetchError::Application(parsed.message.unwrap_or_else(|| {
                self.config
                    .locale
                    .failure_message(FailureKind::Application, &self.active_url)
            }))),
            Err(_) if !status.is_success() => Err(FetchError::Status(status.as_u16())),
            Err(e) => Err(FetchError::Decode(e.to_string())),
        }
    }

    async fn rediscover(&mut self) -> bool {
        match self.discovery.discover(&self.http).await {
            Some(base) => {
                self.active_url = base;
                true
            }
            None => false,
        }
    }

    fn notify_connection(&self, success: bool, message: String, is_manual_check: bool) {
        self.notifier.notify(HostEvent::ConnectionResult {
            success,
            message,
            is_manual_check,
        });
    }

    fn set_state(&mut self, state: FetchState) {
        if self.state != state {
            debug!("조회 상태: {:?} → {:?}", self.state, state);
            self.notifier.notify(HostEvent::FetchStatus(state.clone()));
            self.state = state;
        }
    }
}
