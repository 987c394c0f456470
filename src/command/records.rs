extern crate chrono;
extern crate termcolor;

use crate::write::write_result;
use chrono::{Local, TimeZone};
use leet_tracker::{
    curve::{derive_status, next_review_at, Status},
    store::ProblemStore,
    tracker::now_millis,
};
use std::io::Write;
use termcolor::{Color, StandardStream};

fn status_color(status: Status) -> Color {
    match status {
        Status::Review => Color::Red,
        Status::Scheduled => Color::Yellow,
        Status::Archived => Color::Green,
    }
}
fn format_time(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map_or_else(|| millis.to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

#[allow(unused_must_use)]
pub async fn list(stdout: &mut StandardStream, store: &ProblemStore) {
    let settings = match store.load_settings().await {
        Ok(v) => v,
        Err(e) => {
            write_error!(stdout, "Error", "load settings: {}", e);
            return;
        }
    };
    let records = match store.list(&settings).await {
        Ok(v) => v,
        Err(e) => {
            write_error!(stdout, "Error", "list problems: {}", e);
            return;
        }
    };
    if records.is_empty() {
        write_info!(stdout, "Info", "No tracked problems");
        return;
    }
    let now = now_millis();
    for r in records {
        let status = derive_status(&r, &settings, now);
        let next = next_review_at(&r, &settings)
            .map_or_else(String::new, |t| format!(", next review {}", format_time(t)));
        write_color!(
            stdout,
            status_color(status),
            status,
            "{} proficiency {}/{}{}",
            r,
            r.proficiency,
            settings.levels(),
            next
        );
    }
}

#[allow(unused_must_use)]
pub async fn reconcile(stdout: &mut StandardStream, store: &ProblemStore, rebuild: bool) {
    let result = if rebuild {
        write_info!(stdout, "Info", "Rebuilding local tier from synchronized tier");
        store.rebuild_fast().await
    } else {
        store.reconcile_on_startup().await
    };
    match result {
        Ok(v) if v.failed > 0 => write_error!(
            stdout,
            "Partial",
            "{} replayed, {} copied, {} failed",
            v.replayed,
            v.copied,
            v.failed
        ),
        Ok(v) => write_ok!(
            stdout,
            "Success",
            "{} replayed, {} copied",
            v.replayed,
            v.copied
        ),
        Err(e) => write_error!(stdout, "Error", "reconcile: {}", e),
    }
}

#[allow(unused_must_use)]
pub async fn settings(stdout: &mut StandardStream, store: &ProblemStore) {
    match store.load_settings().await {
        Ok(v) => {
            write_info!(
                stdout,
                "Curve",
                "{:?} (days per proficiency level)",
                v.forgetting_curve
            );
            write_result(stdout, v.validate(), "Forgetting curve is well-formed");
        }
        Err(e) => write_error!(stdout, "Error", "load settings: {}", e),
    }
}
