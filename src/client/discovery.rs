//! 후보 서버 주소 탐색
//!
//! 후보를 순서대로 한 번씩 `/api/health`로 확인하고, 처음 응답한 주소를 쓴다.
//! 후보별 재시도는 없다.

use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Client;
use url::Url;

use super::error::FetchError;
use crate::api::models::HealthResponse;

/// 헬스체크 경로
pub const HEALTH_PATH: &str = "api/health";

/// 후보 주소에 붙어 있을 수 있는 API 접두어
const LEGACY_API_SUFFIX: &str = "/api/laundry";

/// 기본 주소와 상대 경로 결합
///
/// 기본 주소가 `/`로 끝나지 않으면 마지막 경로 조각이 사라지므로 먼저 보정한다.
pub fn endpoint(base: &str, path: &str) -> Result<Url, FetchError> {
    let mut base = Url::parse(base)?;
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path)?)
}

/// 후보 주소 정규화 (`.../api/laundry` 형태도 허용)
pub fn normalize_base(candidate: &str) -> String {
    let trimmed = candidate.trim().trim_end_matches('/');
    trimmed
        .strip_suffix(LEGACY_API_SUFFIX)
        .unwrap_or(trimmed)
        .to_string()
}

/// 헬스체크 응답 본문까지 확인
pub async fn check_health(
    http: &Client,
    base: &str,
    timeout: Duration,
) -> Result<HealthResponse, FetchError> {
    let url = endpoint(base, HEALTH_PATH)?;
    let response = http.get(url).timeout(timeout).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    Ok(response.json::<HealthResponse>().await?)
}

/// 순서가 있는 후보 주소 탐색기
#[derive(Debug, Clone)]
pub struct UrlDiscovery {
    candidates: Vec<String>,
    probe_timeout: Duration,
}

impl UrlDiscovery {
    pub fn new<I, S>(candidates: I, probe_timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            candidates: candidates
                .into_iter()
                .map(|c| normalize_base(c.as_ref()))
                .collect(),
            probe_timeout,
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// 후보 하나를 한 번만 확인 (2xx면 성공)
    pub async fn probe(&self, http: &Client, base: &str) -> Result<(), FetchError> {
        let url = endpoint(base, HEALTH_PATH)?;
        let response = http.get(url).timeout(self.probe_timeout).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(FetchError::Status(status.as_u16()))
        }
    }

    /// 처음 응답한 후보 반환
    pub async fn discover(&self, http: &Client) -> Option<String> {
        info!("후보 서버 주소 {}개 확인 중...", self.candidates.len());

        for base in &self.candidates {
            debug!("헬스체크: {}/{}", base, HEALTH_PATH);
            match self.probe(http, base).await {
                Ok(()) => {
                    info!("✅ 서버 연결 성공: {}", base);
                    return Some(base.clone());
                }
                Err(e) => warn!("서버 연결 실패 {}: {}", base, e),
            }
        }

        warn!("응답하는 서버 주소를 찾지 못했습니다");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let url = endpoint("https://host/proxy/express", HEALTH_PATH).unwrap();
        assert_eq!(url.as_str(), "https://host/proxy/express/api/health");

        let url = endpoint("http://127.0.0.1:8000", "api/laundry/data").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/laundry/data");
    }

    #[test]
    fn test_endpoint_rejects_garbage() {
        assert!(matches!(
            endpoint("not a url", HEALTH_PATH),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("http://127.0.0.1:8000/api/laundry"), "http://127.0.0.1:8000");
        assert_eq!(normalize_base("http://127.0.0.1:8000/"), "http://127.0.0.1:8000");
        assert_eq!(
            normalize_base("https://res/proxy/express/api/laundry/"),
            "https://res/proxy/express"
        );
    }
}
