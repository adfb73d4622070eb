/// 패널에 표시할 메시지 언어
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    PtBr,
    En,
}

/// 재시도 소진 후 실패 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 요청 시간 초과
    Timeout,
    /// 서버에 연결할 수 없음
    Network,
    /// 그 밖의 전송 오류
    Generic,
    /// 서버가 success:false로 응답
    Application,
}

impl Locale {
    pub fn failure_message(&self, kind: FailureKind, url: &str) -> String {
        match (self, kind) {
            (Locale::PtBr, FailureKind::Timeout) => "A requisição excedeu o tempo limite.".into(),
            (Locale::PtBr, FailureKind::Network) => format!(
                "Falha na conexão com o servidor em {}. Verifique se o servidor está rodando.",
                url
            ),
            (Locale::PtBr, FailureKind::Generic) => "Erro ao conectar com o servidor.".into(),
            (Locale::PtBr, FailureKind::Application) => "Erro ao carregar dados.".into(),
            (Locale::En, FailureKind::Timeout) => "The request timed out.".into(),
            (Locale::En, FailureKind::Network) => format!(
                "Could not connect to the server at {}. Check that the server is running.",
                url
            ),
            (Locale::En, FailureKind::Generic) => "Error while contacting the server.".into(),
            (Locale::En, FailureKind::Application) => "Failed to load data.".into(),
        }
    }

    pub fn all_candidates_failed(&self) -> String {
        match self {
            Locale::PtBr => "Falha na conexão com todos os servidores testados. Verifique se o servidor está rodando.".into(),
            Locale::En => "Could not connect to any of the candidate servers. Check that the server is running.".into(),
        }
    }

    pub fn online_since(&self, server_time: &str) -> String {
        match self {
            Locale::PtBr => format!("Online desde {}", server_time),
            Locale::En => format!("Online since {}", server_time),
        }
    }

    pub fn reconnected(&self, url: &str) -> String {
        match self {
            Locale::PtBr => format!("Reconectado usando URL alternativa: {}", url),
            Locale::En => format!("Reconnected using alternate URL: {}", url),
        }
    }

    pub fn connection_failed(&self, url: &str) -> String {
        match self {
            Locale::PtBr => format!("Falha na conexão com {}", url),
            Locale::En => format!("Connection to {} failed", url),
        }
    }
}
