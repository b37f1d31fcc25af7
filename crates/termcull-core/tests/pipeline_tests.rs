//! End-to-end pipeline: report text in, negative keyword list out.

use std::io::Write;

use termcull_core::{
    open_session, render_terms, Decision, ExportStyle, ReviewProfile, SessionState,
};

const REPORT: &str = "\
Search term,Search term status,Cost,Impressions,Clicks,Conversions,Cost / conv.
free shoes,None,12.00,840,31,0,--
buy sneakers online,None,45.10,2200,120,4,11.28
running shoes review,Excluded,18.00,950,44,2,9.00
cheap socks,None,2.00,90,4,1,2.00
discount boots,None,33.40,1500,80,0,--
Total: Search terms,,110.50,5580,279,7,15.79
";

fn profile() -> ReviewProfile {
    ReviewProfile::from_yaml(
        r#"
profile_version: "1.0"
name: "Pipeline test"
format: google-ads
thresholds:
  min_spend: 10.0
  min_cost_per_conversion: 5.0
"#,
    )
    .unwrap()
}

#[test]
fn review_produces_the_accepted_subsequence() {
    let mut setup = open_session(REPORT, &profile()).unwrap();

    // Survivors: free shoes, buy sneakers online, discount boots.
    // cheap socks fails both thresholds, the excluded row and the
    // footer never reach threshold checks.
    let terms: Vec<&str> = setup
        .session
        .candidates()
        .iter()
        .map(|c| c.term.as_str())
        .collect();
    assert_eq!(
        terms,
        ["free shoes", "buy sneakers online", "discount boots"]
    );

    setup.session.decide(Decision::Accept);
    setup.session.decide(Decision::Reject);
    let state = setup.session.decide(Decision::Accept);
    assert_eq!(state, SessionState::Complete);

    let list = render_terms(setup.session.accepted(), ExportStyle::Exact);
    assert_eq!(list, "[free shoes]\n[discount boots]");

    let summary = setup.session.summary();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.rejected, 1);
}

#[test]
fn profile_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
profile_version: "1.0"
name: "From disk"
thresholds:
  min_spend: 10.0
  min_cost_per_conversion: 5.0
export:
  style: plain
"#
    )
    .unwrap();

    let profile = ReviewProfile::from_yaml_file(file.path()).unwrap();
    assert_eq!(profile.name, "From disk");

    let setup = open_session(REPORT, &profile).unwrap();
    assert_eq!(setup.session.candidates().len(), 3);
}

#[test]
fn rejecting_everything_exports_nothing() {
    let mut setup = open_session(REPORT, &profile()).unwrap();
    while setup.session.current().is_some() {
        setup.session.decide(Decision::Reject);
    }

    assert!(setup.session.is_complete());
    assert_eq!(render_terms(setup.session.accepted(), ExportStyle::Exact), "");
}

#[test]
fn skipped_rows_carry_reasons_for_diagnostics() {
    let setup = open_session(REPORT, &profile()).unwrap();

    // cheap socks, the excluded row, and the footer row.
    assert_eq!(setup.skipped.len(), 3);
    assert!(setup.skipped.iter().all(|s| !s.term.is_empty()));
}
