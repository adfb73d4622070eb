use super::locale::FailureKind;

/// 데이터 요청 오류
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("tempo limite excedido")]
    Timeout,
    #[error("servidor inacessível: {0}")]
    Unreachable(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("resposta inválida: {0}")]
    Decode(String),
    #[error("URL inválida: {0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Other(String),
    /// 서버가 응답했지만 success:false
    #[error("{0}")]
    Application(String),
}

impl FetchError {
    pub fn is_transport(&self) -> bool {
        !matches!(self, FetchError::Application(_))
    }

    /// 주소 재탐색이 필요한 연결 실패인지
    pub fn is_unreachable(&self) -> bool {
        matches!(self, FetchError::Unreachable(_))
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            FetchError::Timeout => FailureKind::Timeout,
            FetchError::Unreachable(_) => FailureKind::Network,
            FetchError::Application(_) => FailureKind::Application,
            _ => FailureKind::Generic,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // 연결 단계 타임아웃도 타임아웃으로 분류
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Unreachable(err.to_string())
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Other(err.to_string())
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidUrl(err.to_string())
    }
}
