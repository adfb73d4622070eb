use std::time::Duration;
use tokio::time;
use reqwest::Client;
use serde_json::{json, Value};
use rand::{Rng, thread_rng};
use log::{info, warn};

/// 조직별 세탁 패턴
#[derive(Debug, Clone)]
struct LaunderingProfile {
    job: String,
    citizens: Vec<String>,
    dirty_range: (i64, i64),
    rate_range: (f64, f64),
    frequency_ms: u64,
}

impl LaunderingProfile {
    fn new(job: &str, citizens: &[&str], dirty_range: (i64, i64), rate_range: (f64, f64), frequency_ms: u64) -> Self {
        Self {
            job: job.to_string(),
            citizens: citizens.iter().map(|c| c.to_string()).collect(),
            dirty_range,
            rate_range,
            frequency_ms,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    // 로깅 초기화
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let api_base_url = std::env::var("LEDGER_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
    info!("세탁 기록 시뮬레이션 시작: {}", api_base_url);

    let client = Client::new();

    let profiles = vec![
        // 클럽: 자주, 소액, 높은 비율
        LaunderingProfile::new("vanilla", &["VAN001", "VAN002", "VAN003"], (5_000, 20_000), (0.80, 0.90), 2000),
        // 경찰 부패 라인: 드물게, 큰 금액
        LaunderingProfile::new("bope", &["BOP101", "BOP102"], (50_000, 250_000), (0.65, 0.75), 6000),
        LaunderingProfile::new("tatico", &["TAT201", "TAT202"], (30_000, 120_000), (0.70, 0.80), 5000),
        LaunderingProfile::new("prf1", &["PRF301"], (10_000, 60_000), (0.75, 0.85), 4000),
        LaunderingProfile::new("prf2", &["PRF401", "PRF402"], (20_000, 90_000), (0.72, 0.82), 4500),
    ];

    let mut handles = Vec::new();

    for profile in profiles {
        let client_clone = client.clone();
        let base_url = api_base_url.clone();
        let handle = tokio::spawn(async move {
            simulate_laundering(client_clone, &base_url, profile).await;
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.await.map_err(|e| e.to_string())?;
    }

    Ok(())
}

async fn simulate_laundering(client: Client, api_base_url: &str, profile: LaunderingProfile) {
    let mut interval = time::interval(Duration::from_millis(profile.frequency_ms));

    info!("시뮬레이션 시작: {} ({}ms 간격)", profile.job, profile.frequency_ms);

    loop {
        interval.tick().await;

        let entry = create_random_entry(&profile);

        match submit_entry(&client, api_base_url, &entry).await {
            Ok(_) => {
                info!("✅ 기록 추가: {} {} - 더러운 돈: ${}, 깨끗한 돈: ${}",
                     entry["job"], entry["citizenid"], entry["amountDirty"], entry["amountClean"]);
            }
            Err(e) => {
                warn!("❌ 기록 추가 실패: {} - {}", profile.job, e);
                // 서버가 다운된 경우 잠시 대기
                time::sleep(Duration::from_secs(5)).await;
            }
        }
    }
}

fn create_random_entry(profile: &LaunderingProfile) -> Value {
    let mut rng = thread_rng();
    let citizen = &profile.citizens[rng.gen_range(0..profile.citizens.len())];
    let dirty = rng.gen_range(profile.dirty_range.0..=profile.dirty_range.1);
    let rate: f64 = rng.gen_range(profile.rate_range.0..profile.rate_range.1);
    let rate = (rate * 100.0).round() / 100.0;
    let clean = (dirty as f64 * rate).floor() as i64;

    json!({
        "citizenid": citizen,
        "amountDirty": dirty,
        "amountClean": clean,
        "rate": rate,
        "job": profile.job
    })
}

async fn submit_entry(client: &Client, api_base_url: &str, entry: &Value) -> Result<String, String> {
    let url = format!("{}/api/laundry/add", api_base_url);

    let response = client
        .post(&url)
        .json(entry)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    let body = response.text().await.map_err(|e| e.to_string())?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(format!("HTTP {}: {}", status, body))
    }
}
