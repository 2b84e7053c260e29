// Static mock dataset
// Served when no PAT is configured, when mock mode is switched on,
// or when the Marketplace call fails
//
// Numan Thabit 2025 Nov

use crate::model::{DailyStat, Extension, ExtensionStats, StatsCount};
use chrono::{NaiveDate, TimeZone, Utc};

const MOCK_RATING: f64 = 5.0;

/// (year, month, day, page views, installs, downloads, uninstalls), most recent first.
/// Zero means the upstream would have omitted the counter.
#[rustfmt::skip]
const MOCK_DAYS: [(i32, u32, u32, u64, u64, u64, u64); 31] = [
    (2025, 7, 3, 21, 0, 6, 1),
    (2025, 7, 2, 11, 4, 10, 0),
    (2025, 7, 1, 9, 3, 8, 0),
    (2025, 6, 30, 2, 0, 6, 1),
    (2025, 6, 29, 7, 0, 15, 0),
    (2025, 6, 28, 3, 3, 4, 2),
    (2025, 6, 27, 2, 5, 21, 2),
    (2025, 6, 26, 11, 3, 25, 1),
    (2025, 6, 25, 8, 4, 12, 0),
    (2025, 6, 24, 12, 5, 17, 0),
    (2025, 6, 23, 8, 3, 6, 1),
    (2025, 6, 22, 3, 2, 1, 0),
    (2025, 6, 21, 5, 2, 2, 0),
    (2025, 6, 20, 13, 5, 20, 1),
    (2025, 6, 19, 14, 3, 9, 1),
    (2025, 6, 18, 19, 5, 12, 1),
    (2025, 6, 17, 19, 8, 6, 0),
    (2025, 6, 16, 10, 5, 6, 5),
    (2025, 6, 15, 12, 1, 1, 0),
    (2025, 6, 14, 54, 4, 2, 0),
    (2025, 6, 13, 7, 3, 3, 2),
    (2025, 6, 12, 12, 9, 4, 1),
    (2025, 6, 11, 16, 10, 8, 1),
    (2025, 6, 10, 9, 8, 3, 5),
    (2025, 6, 9, 8, 5, 0, 0),
    (2025, 6, 8, 9, 10, 4, 1),
    (2025, 6, 7, 4, 5, 2, 0),
    (2025, 6, 6, 3, 7, 5, 2),
    (2025, 6, 5, 9, 2, 2, 0),
    (2025, 6, 4, 6, 0, 12, 0),
    (2025, 6, 3, 8, 11, 11, 1),
];

fn non_zero(value: u64) -> Option<u64> {
    (value != 0).then_some(value)
}

/// Fixed 31-day history attributed to `extension_name` of `publisher`.
pub fn mock_stats(publisher: &str, extension_name: &str) -> ExtensionStats {
    let daily_stats: Vec<DailyStat> = MOCK_DAYS
        .iter()
        .filter_map(|&(y, m, d, views, installs, downloads, uninstalls)| {
            let date = NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(0, 0, 0)?;
            Some(DailyStat {
                version: None,
                statistic_date: Utc.from_utc_datetime(&date),
                counts: StatsCount {
                    web_page_views: non_zero(views),
                    install_count: non_zero(installs),
                    web_download_count: non_zero(downloads),
                    uninstall_count: non_zero(uninstalls),
                    average_rating: Some(MOCK_RATING),
                },
            })
        })
        .collect();

    ExtensionStats {
        extension_name: extension_name.to_string(),
        publisher_name: publisher.to_string(),
        stat_count: daily_stats.len() as u64,
        daily_stats,
    }
}

pub fn mock_extensions() -> Vec<Extension> {
    [
        (
            "vscode-demo-time",
            "Demo Time",
            "Script your coding demos to perfection",
        ),
        (
            "vscode-front-matter",
            "Front Matter CMS",
            "Front Matter is a CMS that runs within Visual Studio Code",
        ),
        (
            "vscode-remote-control",
            "Remote Control",
            "Control Visual Studio Code remotely via WebSockets",
        ),
    ]
    .into_iter()
    .map(|(name, display, description)| Extension {
        extension_name: name.to_string(),
        display_name: display.to_string(),
        short_description: description.to_string(),
    })
    .collect()
}
