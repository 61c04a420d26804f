use suumo_scraper::suumo::{towns, COLUMNS};
use suumo_scraper::{CrawlConfig, CrawlEvent, CrawlService, SearchFilter};
use tokio::sync::mpsc;
use tower::Service;

// 使い方: cargo run --example crawl_bunkyo -- 本郷 弥生
//   SUUMO_MIN_PRICE / SUUMO_MAX_PRICE（万円）, SUUMO_MAX_PAGES で条件を変更
#[tokio::main]
async fn main() {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let towns: Vec<String> = std::env::args().skip(1).collect();
    let min_price: f64 = env_or("SUUMO_MIN_PRICE", 7.0);
    let max_price: f64 = env_or("SUUMO_MAX_PRICE", 15.0);
    let max_pages: u32 = env_or("SUUMO_MAX_PAGES", 10);

    let filter = match SearchFilter::from_town_names(&towns, min_price, max_price) {
        Ok(f) => f.with_max_pages(max_pages),
        Err(e) => {
            eprintln!("エラー: {}", e);
            let valid: Vec<String> = towns::all()
                .map(|(name, code)| format!("{}({})", name, code))
                .collect();
            eprintln!("指定できる町名: {}", valid.join(" "));
            return;
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut service = CrawlService::new(CrawlConfig::default())
        .expect("HTTPクライアントを初期化できません")
        .with_events(tx);

    // 進捗表示
    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                CrawlEvent::Progress(p) => {
                    println!("[{:>3.0}%] {}", p.fraction * 100.0, p);
                }
                CrawlEvent::Completed { .. } => println!("スクレイピング完了"),
            }
        }
    });

    println!("=== SUUMOスクレイピング ===");

    let result = service.call(filter).await;
    drop(service);
    let _ = progress.await;

    match result {
        Ok(report) => {
            println!("\n全ての部屋情報");
            println!("{}", COLUMNS.join("\t"));
            for (record, duplicated) in report
                .records
                .iter()
                .zip(report.duplicates.duplicate_mask.iter())
            {
                let mark = if *duplicated { "*" } else { "" };
                println!("{}{}", mark, record.to_row().join("\t"));
            }
            println!("\n（* は重複物件）\n");
            println!("{}", report);
        }
        Err(e) => {
            eprintln!("エラー: {}", e);
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
