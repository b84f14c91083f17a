use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rollcall_core::{
    match_roster, render, RenderOptions, Report, ReportColor, ReportKind, ReportOutcome,
    FIELD_BOT_STATUS, FIELD_OFFLINE_COUNT, FIELD_OFFLINE_LIST, FIELD_ONLINE_COUNT,
    FIELD_ONLINE_LIST, FIELD_UPDATED, FIELD_WATCHLIST, LIST_BUDGET,
};

fn options(first_run: bool) -> RenderOptions {
    RenderOptions {
        server_label: "One City".to_string(),
        first_run,
    }
}

fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|n| n.to_string()).collect()
}

#[test]
fn normal_report_renders_counts_and_lists() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let result = match_roster(&names(&["[86] Alice", "Bob"]), &names(&["[99] Alice"]));
    let report = Report::from_match(&result, 20, LIST_BUDGET, at);
    assert_eq!(report.kind(), ReportKind::Normal);
    assert_eq!(report.watch_count, 2);

    let rendered = render(&report, &options(false));
    assert_eq!(rendered.color, ReportColor::Blue);
    assert_eq!(rendered.title, "Player status report (One City)");
    assert_eq!(
        rendered.field(FIELD_UPDATED),
        Some(format!("<t:{}:R>", at.timestamp()).as_str())
    );
    assert_eq!(rendered.field(FIELD_WATCHLIST), Some("2 / 20 players"));
    assert_eq!(rendered.field(FIELD_ONLINE_COUNT), Some("1 players"));
    assert_eq!(rendered.field(FIELD_OFFLINE_COUNT), Some("1 players"));
    assert_eq!(rendered.field(FIELD_ONLINE_LIST), Some("• [86] Alice"));
    assert_eq!(rendered.field(FIELD_OFFLINE_LIST), Some("• Bob"));
    assert_eq!(rendered.field(FIELD_BOT_STATUS), None);
    assert_eq!(rendered.footer.as_deref(), Some("One City · auto-check"));
}

#[test]
fn empty_partitions_use_placeholders() {
    let at = Utc::now();
    let everyone_on = match_roster(&names(&["A"]), &names(&["a"]));
    let rendered = render(&Report::from_match(&everyone_on, 20, LIST_BUDGET, at), &options(false));
    assert_eq!(rendered.field(FIELD_OFFLINE_LIST), Some("Everyone is online!"));

    let nobody_on = match_roster(&names(&["A"]), &[]);
    let rendered = render(&Report::from_match(&nobody_on, 20, LIST_BUDGET, at), &options(false));
    assert_eq!(
        rendered.field(FIELD_ONLINE_LIST),
        Some("No watched players are online right now.")
    );
}

#[test]
fn short_circuit_variants_render_distinctly() {
    let at = Utc::now();
    let empty = Report::empty_watchlist(30, at);
    assert_eq!(empty.kind(), ReportKind::EmptyWatchlist);
    assert_eq!(render(&empty, &options(false)).color, ReportColor::Orange);

    let failed = Report::fetch_failed(3, 30, "timeout: deadline elapsed", at);
    assert_eq!(failed.kind(), ReportKind::FetchFailed);
    let rendered = render(&failed, &options(false));
    assert_eq!(rendered.color, ReportColor::Red);
    assert!(rendered.description.contains("timeout: deadline elapsed"));
}

#[test]
fn first_run_adds_status_field_to_every_variant() {
    let at = Utc::now();
    for report in [
        Report::empty_watchlist(20, at),
        Report::fetch_failed(1, 20, "network error", at),
        Report::from_match(&match_roster(&names(&["A"]), &[]), 20, LIST_BUDGET, at),
    ] {
        let rendered = render(&report, &options(true));
        assert_eq!(
            rendered.field(FIELD_BOT_STATUS),
            Some("Started / restarted successfully")
        );
    }
}

#[test]
fn long_lists_stay_within_budget() {
    let watch: Vec<String> = (0..300).map(|i| format!("[86] Player Number {i}")).collect();
    let result = match_roster(&watch, &[]);
    let report = Report::from_match(&result, 300, LIST_BUDGET, Utc::now());

    let ReportOutcome::Normal(summary) = &report.outcome else {
        panic!("expected a normal report");
    };
    assert_eq!(summary.absent_count, 300);
    assert!(summary.absent_list.len() <= LIST_BUDGET);
    assert!(summary.absent_list.ends_with("..."));
    assert!(summary.present_list.is_empty());
}

#[test]
fn plain_text_shows_readable_update_time() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let report = Report::from_match(&match_roster(&names(&["A"]), &[]), 20, LIST_BUDGET, at);
    let text = render(&report, &options(false)).to_plain_text();

    assert!(text.contains(&format!("{FIELD_UPDATED}\n2024-05-01T12:00:00Z\n")));
    assert!(!text.contains("<t:"));
    assert!(text.contains("• A"));
}
