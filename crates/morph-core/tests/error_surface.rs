use morph_core::errors::{ErrorInfo, MorphError};

#[test]
fn error_display_includes_code_context_and_hint() {
    let err = MorphError::Degenerate(
        ErrorInfo::new("singular-basis", "candidate basis matrix is singular")
            .with_context("condition", "inf")
            .with_hint("resample the candidate benchmarks"),
    );
    let rendered = err.to_string();
    assert!(rendered.contains("degenerate basis"));
    assert!(rendered.contains("singular-basis"));
    assert!(rendered.contains("condition=inf"));
    assert!(rendered.contains("resample the candidate benchmarks"));
}

#[test]
fn error_info_accessor_reaches_every_family() {
    let families = [
        MorphError::Config(ErrorInfo::new("a", "m")),
        MorphError::Degenerate(ErrorInfo::new("b", "m")),
        MorphError::Infeasible(ErrorInfo::new("c", "m")),
        MorphError::Serde(ErrorInfo::new("d", "m")),
    ];
    let codes: Vec<&str> = families.iter().map(|e| e.info().code.as_str()).collect();
    assert_eq!(codes, vec!["a", "b", "c", "d"]);
}

#[test]
fn errors_round_trip_through_json() {
    let err = MorphError::Infeasible(
        ErrorInfo::new("no-invertible-basis", "all trials degenerated")
            .with_context("n_trials", "100")
            .with_hint("increase n_trials or lower the degree budget"),
    );
    let json = serde_json::to_string(&err).unwrap();
    let restored: MorphError = serde_json::from_str(&json).unwrap();
    assert_eq!(err, restored);
}
