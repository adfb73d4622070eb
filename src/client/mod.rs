//! 패널용 데이터 클라이언트
//!
//! 서버 주소 탐색, 재시도 포함 데이터 조회, 호스트 알림, 표 필터/통계를 담당한다.

pub mod discovery;
pub mod error;
pub mod fetcher;
pub mod locale;
pub mod notifier;
pub mod view;

pub use discovery::UrlDiscovery;
pub use error::FetchError;
pub use fetcher::{FetchState, FetcherConfig, PanelSession};
pub use locale::{FailureKind, Locale};
pub use notifier::{HostEvent, HostNotifier, HttpHostNotifier, NoopNotifier};
pub use view::{DateWindow, LedgerStats, PanelView};
